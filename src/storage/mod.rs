mod memory;
mod sqlite_store;

pub use memory::MemoryStore;
pub use sqlite_store::{SqliteStore, NOTES_DIR};

use chrono::Utc;
use tracing::warn;

use crate::access::{self, Operation};
use crate::entity::{Note, NoteDraft, NoteUpdate, Requester, UserId};
use crate::error::{NotesError, Result};
use crate::slug;

/// Repository of notes keyed by slug.
///
/// Slugs are unique: a create or edit that would reuse one fails with
/// `DuplicateSlug` and leaves the store untouched. Edits and deletes are
/// checked with [`access::authorize`] before anything changes.
pub trait NoteStore {
    fn create(&mut self, draft: NoteDraft, author: &UserId) -> Result<Note>;

    /// Notes owned by `author`, oldest first.
    fn list_by_author(&self, author: &UserId) -> Result<Vec<Note>>;

    fn get_by_slug(&self, slug: &str) -> Result<Option<Note>>;

    fn update(&mut self, slug: &str, update: NoteUpdate, requester: &Requester) -> Result<Note>;

    fn delete(&mut self, slug: &str, requester: &Requester) -> Result<()>;

    fn count(&self) -> Result<usize>;
}

/// Build the note a draft describes, deriving the slug when none is given.
fn prepare_note(draft: NoteDraft, author: &UserId) -> Result<Note> {
    if draft.title.trim().is_empty() {
        return Err(NotesError::validation("title", "this field is required"));
    }
    let slug = slug::resolve(draft.slug.as_deref(), &draft.title)?;
    Ok(Note::new(draft.title, draft.text, slug, author.clone()))
}

/// Apply an edit to a copy of `note`. Author, id and creation time carry over.
fn apply_update(note: &Note, update: NoteUpdate) -> Result<Note> {
    if update.title.trim().is_empty() {
        return Err(NotesError::validation("title", "this field is required"));
    }
    let slug = match update.slug.as_deref() {
        Some(s) => slug::resolve(Some(s), &update.title)?,
        None => note.slug.clone(),
    };
    Ok(Note {
        title: update.title,
        text: update.text,
        slug,
        updated_at: Utc::now(),
        ..note.clone()
    })
}

/// Ownership gate shared by the stores.
fn guard(
    operation: Operation,
    slug: &str,
    note: Option<&Note>,
    requester: &Requester,
) -> Result<()> {
    access::authorize(operation, slug, note, requester).map_err(|err| {
        warn!(%operation, slug, requester = %requester, error = %err, "mutation denied");
        err
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_note_derives_slug() {
        let note = prepare_note(NoteDraft::new("Заголовок", "Текст"), &UserId::new("a")).unwrap();
        assert_eq!(note.slug, "zagolovok");
        assert_eq!(note.author, UserId::new("a"));
    }

    #[test]
    fn test_prepare_note_requires_title() {
        let result = prepare_note(NoteDraft::new(" ", "Текст"), &UserId::new("a"));
        assert!(matches!(result, Err(NotesError::Validation { .. })));
    }

    #[test]
    fn test_apply_update_keeps_identity() {
        let note = prepare_note(
            NoteDraft::new("Заголовок", "Текст").with_slug("1996"),
            &UserId::new("a"),
        )
        .unwrap();
        let updated = apply_update(&note, NoteUpdate::new("Новый заголовок", "Новый текст")).unwrap();

        assert_eq!(updated.id, note.id);
        assert_eq!(updated.slug, "1996");
        assert_eq!(updated.author, note.author);
        assert_eq!(updated.created_at, note.created_at);
        assert_eq!(updated.title, "Новый заголовок");
        assert!(updated.updated_at >= note.updated_at);
    }

    #[test]
    fn test_apply_update_blank_slug_rederives() {
        let note = prepare_note(
            NoteDraft::new("Заголовок", "Текст").with_slug("1996"),
            &UserId::new("a"),
        )
        .unwrap();
        let updated =
            apply_update(&note, NoteUpdate::new("Новый заголовок", "x").with_slug("")).unwrap();
        assert_eq!(updated.slug, "novyj-zagolovok");
    }
}
