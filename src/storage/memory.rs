use std::collections::BTreeMap;

use tracing::info;

use super::{apply_update, guard, prepare_note, NoteStore};
use crate::access::Operation;
use crate::entity::{Note, NoteDraft, NoteUpdate, Requester, UserId};
use crate::error::{NotesError, Result};

/// Process-local store, keyed by slug.
#[derive(Debug, Default)]
pub struct MemoryStore {
    notes: BTreeMap<String, Note>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NoteStore for MemoryStore {
    fn create(&mut self, draft: NoteDraft, author: &UserId) -> Result<Note> {
        let note = prepare_note(draft, author)?;
        if self.notes.contains_key(&note.slug) {
            return Err(NotesError::DuplicateSlug(note.slug));
        }

        info!(slug = %note.slug, author = %author, "note created");
        self.notes.insert(note.slug.clone(), note.clone());
        Ok(note)
    }

    fn list_by_author(&self, author: &UserId) -> Result<Vec<Note>> {
        let mut notes: Vec<Note> = self
            .notes
            .values()
            .filter(|n| n.is_authored_by(author))
            .cloned()
            .collect();
        notes.sort_by_key(|n| n.created_at);
        Ok(notes)
    }

    fn get_by_slug(&self, slug: &str) -> Result<Option<Note>> {
        Ok(self.notes.get(slug).cloned())
    }

    fn update(&mut self, slug: &str, update: NoteUpdate, requester: &Requester) -> Result<Note> {
        let current = self.notes.get(slug);
        guard(Operation::Edit, slug, current, requester)?;
        let current = current.ok_or_else(|| NotesError::NotFound(slug.to_string()))?;

        let updated = apply_update(current, update)?;
        if updated.slug != slug && self.notes.contains_key(&updated.slug) {
            return Err(NotesError::DuplicateSlug(updated.slug));
        }

        self.notes.remove(slug);
        self.notes.insert(updated.slug.clone(), updated.clone());
        info!(slug = %updated.slug, "note updated");
        Ok(updated)
    }

    fn delete(&mut self, slug: &str, requester: &Requester) -> Result<()> {
        guard(Operation::Delete, slug, self.notes.get(slug), requester)?;
        self.notes.remove(slug);
        info!(slug, "note deleted");
        Ok(())
    }

    fn count(&self) -> Result<usize> {
        Ok(self.notes.len())
    }
}
