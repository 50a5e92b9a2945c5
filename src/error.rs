use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotesError {
    #[error("Not in a notes project. Run 'notes init' first.")]
    NotInitialized,

    #[error("Already initialized. Remove .notes/ to reinitialize.")]
    AlreadyInitialized,

    #[error("{0} - such a slug already exists, choose a unique value")]
    DuplicateSlug(String),

    /// Missing note or a note owned by someone else; callers cannot tell which.
    #[error("Note not found: {0}")]
    NotFound(String),

    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl NotesError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        NotesError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, NotesError>;
