// src/entity/note.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    /// Unique across all notes; used as the URL path segment
    pub slug: String,
    pub author: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    pub fn new(title: String, text: String, slug: String, author: UserId) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            text,
            slug,
            author,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_authored_by(&self, user: &UserId) -> bool {
        &self.author == user
    }
}

/// Input for creating a note. `slug: None` asks the store to derive one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteDraft {
    pub title: String,
    pub text: String,
    pub slug: Option<String>,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            slug: None,
        }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }
}

/// Replacement fields for an edit. `slug: None` keeps the current slug.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteUpdate {
    pub title: String,
    pub text: String,
    pub slug: Option<String>,
}

impl NoteUpdate {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            slug: None,
        }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }
}
