//! Input validation for the add and edit pages.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entity::{Note, NoteDraft, NoteUpdate};
use crate::error::{NotesError, Result};
use crate::slug;

pub const MAX_TITLE_LENGTH: usize = 100;

/// The note form shown on the add and edit pages and submitted back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteForm {
    pub title: String,
    pub text: String,
    pub slug: Option<String>,
    /// Field name -> message, filled when a submission is rejected
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: BTreeMap<String, String>,
}

impl NoteForm {
    pub fn new(title: impl Into<String>, text: impl Into<String>, slug: Option<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            slug,
            errors: BTreeMap::new(),
        }
    }

    /// Prefilled with an existing note, for the edit page.
    pub fn from_note(note: &Note) -> Self {
        Self::new(note.title.clone(), note.text.clone(), Some(note.slug.clone()))
    }

    pub fn is_bound_with_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check field shapes. Slug uniqueness is left to the store.
    pub fn validate(&self) -> Result<()> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(NotesError::validation("title", "this field is required"));
        }
        if title.chars().count() > MAX_TITLE_LENGTH {
            return Err(NotesError::validation(
                "title",
                format!("at most {} characters", MAX_TITLE_LENGTH),
            ));
        }
        if self.text.trim().is_empty() {
            return Err(NotesError::validation("text", "this field is required"));
        }
        self.resolved_slug().map(|_| ())
    }

    /// The slug this form will produce: the one entered, or one derived
    /// from the title.
    pub fn resolved_slug(&self) -> Result<String> {
        slug::resolve(self.slug.as_deref(), &self.title)
    }

    /// Attach the message of a rejected submission to the matching field.
    pub fn with_error(mut self, err: &NotesError) -> Self {
        let (field, message) = match err {
            NotesError::Validation { field, message } => (field.clone(), message.clone()),
            NotesError::DuplicateSlug(_) => ("slug".to_string(), err.to_string()),
            other => ("__all__".to_string(), other.to_string()),
        };
        self.errors.insert(field, message);
        self
    }

    pub fn to_draft(&self) -> NoteDraft {
        NoteDraft {
            title: self.title.trim().to_string(),
            text: self.text.clone(),
            slug: self.slug.clone(),
        }
    }

    /// An edit always submits a slug; a blank one is re-derived from the title.
    pub fn to_update(&self) -> NoteUpdate {
        NoteUpdate {
            title: self.title.trim().to_string(),
            text: self.text.clone(),
            slug: Some(self.slug.clone().unwrap_or_default()),
        }
    }
}
