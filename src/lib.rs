pub mod access;
pub mod cli;
pub mod config;
pub mod entity;
pub mod error;
pub mod form;
pub mod slug;
pub mod storage;
pub mod web;

pub use config::NotesConfig;
pub use error::{NotesError, Result};
pub use storage::{MemoryStore, NoteStore, SqliteStore};
pub use web::NotesApp;
