use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::types::Type;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use tracing::info;

use super::{apply_update, guard, prepare_note, NoteStore};
use crate::access::Operation;
use crate::config::NotesConfig;
use crate::entity::{Note, NoteDraft, NoteUpdate, Requester, UserId};
use crate::error::{NotesError, Result};

pub const NOTES_DIR: &str = ".notes";
const NOTES_DB: &str = "notes.db";

const NOTE_COLUMNS: &str = "id, title, text, slug, author, created_at, updated_at";

/// SQLite-backed store. The `UNIQUE` slug column makes the duplicate check
/// and the insert a single step.
pub struct SqliteStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Initialize a new notes project under `root`
    pub fn init(root: &Path) -> Result<Self> {
        let notes_dir = root.join(NOTES_DIR);

        if notes_dir.exists() {
            return Err(NotesError::AlreadyInitialized);
        }

        fs::create_dir_all(&notes_dir)?;
        NotesConfig::default().save(&notes_dir)?;

        Self::connect(notes_dir.join(NOTES_DB))
    }

    /// Open an existing notes project
    pub fn open(root: &Path) -> Result<Self> {
        let path = root.join(NOTES_DIR).join(NOTES_DB);

        if !path.exists() {
            return Err(NotesError::NotInitialized);
        }

        Self::connect(path)
    }

    /// A throwaway database that lives as long as the store
    pub fn in_memory() -> Result<Self> {
        let store = Self {
            conn: Connection::open_in_memory()?,
            path: None,
        };
        store.init_schema()?;
        Ok(store)
    }

    fn connect(path: PathBuf) -> Result<Self> {
        let conn = Connection::open(&path)?;
        let store = Self {
            conn,
            path: Some(path),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS notes (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                text TEXT NOT NULL,
                slug TEXT NOT NULL UNIQUE,
                author TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_notes_author ON notes(author)",
            [],
        )?;

        Ok(())
    }

    /// The `.notes` directory, if the store is file-backed
    pub fn notes_dir(&self) -> Option<&Path> {
        self.path.as_deref().and_then(Path::parent)
    }

    fn find(conn: &Connection, slug: &str) -> Result<Option<Note>> {
        let note = conn
            .query_row(
                &format!("SELECT {NOTE_COLUMNS} FROM notes WHERE slug = ?1"),
                [slug],
                note_from_row,
            )
            .optional()?;
        Ok(note)
    }
}

impl NoteStore for SqliteStore {
    fn create(&mut self, draft: NoteDraft, author: &UserId) -> Result<Note> {
        let note = prepare_note(draft, author)?;

        self.conn
            .execute(
                &format!("INSERT INTO notes ({NOTE_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
                params![
                    note.id.to_string(),
                    note.title,
                    note.text,
                    note.slug,
                    note.author.as_str(),
                    note.created_at.to_rfc3339(),
                    note.updated_at.to_rfc3339(),
                ],
            )
            .map_err(|e| duplicate_or(e, &note.slug))?;

        info!(slug = %note.slug, author = %author, "note created");
        Ok(note)
    }

    fn list_by_author(&self, author: &UserId) -> Result<Vec<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes WHERE author = ?1 ORDER BY created_at, rowid"
        ))?;

        let notes = stmt
            .query_map([author.as_str()], note_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(notes)
    }

    fn get_by_slug(&self, slug: &str) -> Result<Option<Note>> {
        Self::find(&self.conn, slug)
    }

    fn update(&mut self, slug: &str, update: NoteUpdate, requester: &Requester) -> Result<Note> {
        let tx = self.conn.transaction()?;

        let current = Self::find(&tx, slug)?;
        guard(Operation::Edit, slug, current.as_ref(), requester)?;
        let current = current.ok_or_else(|| NotesError::NotFound(slug.to_string()))?;

        let updated = apply_update(&current, update)?;
        tx.execute(
            "UPDATE notes SET title = ?1, text = ?2, slug = ?3, updated_at = ?4 WHERE id = ?5",
            params![
                updated.title,
                updated.text,
                updated.slug,
                updated.updated_at.to_rfc3339(),
                updated.id.to_string(),
            ],
        )
        .map_err(|e| duplicate_or(e, &updated.slug))?;
        tx.commit()?;

        info!(slug = %updated.slug, "note updated");
        Ok(updated)
    }

    fn delete(&mut self, slug: &str, requester: &Requester) -> Result<()> {
        let tx = self.conn.transaction()?;

        let current = Self::find(&tx, slug)?;
        guard(Operation::Delete, slug, current.as_ref(), requester)?;

        tx.execute("DELETE FROM notes WHERE slug = ?1", [slug])?;
        tx.commit()?;

        info!(slug, "note deleted");
        Ok(())
    }

    fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM notes", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

/// A unique-constraint failure on write means the slug is taken.
fn duplicate_or(err: rusqlite::Error, slug: &str) -> NotesError {
    if err.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) {
        NotesError::DuplicateSlug(slug.to_string())
    } else {
        NotesError::Sqlite(err)
    }
}

fn note_from_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    let id: String = row.get(0)?;
    let author: String = row.get(4)?;
    let created_at: String = row.get(5)?;
    let updated_at: String = row.get(6)?;

    Ok(Note {
        id: id
            .parse()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?,
        title: row.get(1)?,
        text: row.get(2)?,
        slug: row.get(3)?,
        author: UserId::new(author),
        created_at: parse_timestamp(5, &created_at)?,
        updated_at: parse_timestamp(6, &updated_at)?,
    })
}

fn parse_timestamp(idx: usize, raw: &str) -> rusqlite::Result<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn author() -> Requester {
        Requester::user("Автор заметки")
    }

    fn seeded() -> SqliteStore {
        let mut store = SqliteStore::in_memory().unwrap();
        store
            .create(
                NoteDraft::new("Заголовок", "Текст").with_slug("1996"),
                &UserId::new("Автор заметки"),
            )
            .unwrap();
        store
    }

    #[test]
    fn test_init_creates_notes_directory() {
        let tmp = TempDir::new().unwrap();
        let store = SqliteStore::init(tmp.path()).unwrap();

        assert!(tmp.path().join(".notes").exists());
        assert!(tmp.path().join(".notes/notes.db").exists());
        assert!(tmp.path().join(".notes/config.yaml").exists());
        assert_eq!(store.notes_dir(), Some(tmp.path().join(".notes").as_path()));
    }

    #[test]
    fn test_init_fails_if_already_initialized() {
        let tmp = TempDir::new().unwrap();
        SqliteStore::init(tmp.path()).unwrap();

        let result = SqliteStore::init(tmp.path());
        assert!(matches!(result, Err(NotesError::AlreadyInitialized)));
    }

    #[test]
    fn test_open_fails_if_not_initialized() {
        let tmp = TempDir::new().unwrap();

        let result = SqliteStore::open(tmp.path());
        assert!(matches!(result, Err(NotesError::NotInitialized)));
    }

    #[test]
    fn test_notes_survive_reopen() {
        let tmp = TempDir::new().unwrap();
        let mut store = SqliteStore::init(tmp.path()).unwrap();
        let created = store
            .create(NoteDraft::new("Заголовок", "Текст"), &UserId::new("reader"))
            .unwrap();
        drop(store);

        let store2 = SqliteStore::open(tmp.path()).unwrap();
        let note = store2.get_by_slug("zagolovok").unwrap().unwrap();
        assert_eq!(note, created);
    }

    #[test]
    fn test_duplicate_slug_rejected_by_constraint() {
        let mut store = seeded();
        let result = store.create(
            NoteDraft::new("Другое", "Текст").with_slug("1996"),
            &UserId::new("reader"),
        );
        assert!(matches!(result, Err(NotesError::DuplicateSlug(s)) if s == "1996"));
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_list_by_author() {
        let mut store = seeded();
        store
            .create(NoteDraft::new("Второй", "Текст"), &UserId::new("Автор заметки"))
            .unwrap();
        store
            .create(NoteDraft::new("Чужой", "Текст"), &UserId::new("reader"))
            .unwrap();

        let mine = store.list_by_author(&UserId::new("Автор заметки")).unwrap();
        let slugs: Vec<&str> = mine.iter().map(|n| n.slug.as_str()).collect();
        assert_eq!(slugs, vec!["1996", "vtoroj"]);
        assert_eq!(store.list_by_author(&UserId::new("reader")).unwrap().len(), 1);
    }

    #[test]
    fn test_owner_edit_with_new_slug() {
        let mut store = seeded();
        let note = store
            .update(
                "1996",
                NoteUpdate::new("Новый заголовок", "Новый текст").with_slug("19961"),
                &author(),
            )
            .unwrap();

        assert_eq!(note.slug, "19961");
        let stored = store.get_by_slug("19961").unwrap().unwrap();
        assert_eq!(stored.title, "Новый заголовок");
        assert_eq!(stored.text, "Новый текст");
        assert_eq!(stored.author, UserId::new("Автор заметки"));
        assert!(store.get_by_slug("1996").unwrap().is_none());
    }

    #[test]
    fn test_edit_onto_taken_slug_rolls_back() {
        let mut store = seeded();
        store
            .create(
                NoteDraft::new("Второй", "Текст").with_slug("taken"),
                &UserId::new("Автор заметки"),
            )
            .unwrap();

        let result = store.update(
            "1996",
            NoteUpdate::new("Новый", "Новый").with_slug("taken"),
            &author(),
        );
        assert!(matches!(result, Err(NotesError::DuplicateSlug(_))));
        assert_eq!(store.get_by_slug("1996").unwrap().unwrap().title, "Заголовок");
    }

    #[test]
    fn test_reader_cannot_edit_or_delete() {
        let mut store = seeded();
        let before = store.get_by_slug("1996").unwrap().unwrap();
        let reader = Requester::user("Читатель");

        let result = store.update("1996", NoteUpdate::new("x", "y"), &reader);
        assert!(matches!(result, Err(NotesError::NotFound(_))));
        let result = store.delete("1996", &reader);
        assert!(matches!(result, Err(NotesError::NotFound(_))));

        assert_eq!(store.get_by_slug("1996").unwrap().unwrap(), before);
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_owner_deletes() {
        let mut store = seeded();
        store.delete("1996", &author()).unwrap();
        assert_eq!(store.count().unwrap(), 0);
        assert!(store.get_by_slug("1996").unwrap().is_none());
    }
}
