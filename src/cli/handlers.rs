use std::env;
use std::io::{self, Read};
use std::path::PathBuf;

use crate::access::{self, Operation};
use crate::config::NotesConfig;
use crate::entity::{Note, NoteUpdate, Requester, UserId};
use crate::error::{NotesError, Result};
use crate::form::NoteForm;
use crate::storage::{NoteStore, SqliteStore, NOTES_DIR};
use crate::web::{NotesApp, Page, Reply};

/// Find the project root by looking for .notes/ or .git/
fn find_project_root() -> PathBuf {
    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let mut current = cwd.as_path();
    loop {
        if current.join(NOTES_DIR).exists() || current.join(".git").exists() {
            return current.to_path_buf();
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return cwd,
        }
    }
}

/// Tracing filter from the project config, or the default outside a project.
pub fn configured_log_filter() -> String {
    let notes_dir = find_project_root().join(NOTES_DIR);
    NotesConfig::load(&notes_dir)
        .unwrap_or_default()
        .log_filter
}

fn signed_in(requester: &Requester) -> Result<&UserId> {
    access::require_user(requester).map_err(|_| NotesError::AuthenticationRequired)
}

fn print_note(note: &Note) {
    println!("Note {} ({})", note.slug, &note.id.to_string()[..7]);
    println!("Title: {}", note.title);
    println!("Author: {}", note.author);
    println!("Created: {}", note.created_at.format("%Y-%m-%d %H:%M"));
    if note.updated_at != note.created_at {
        println!("Updated: {}", note.updated_at.format("%Y-%m-%d %H:%M"));
    }
    if !note.text.is_empty() {
        println!("\n{}", note.text);
    }
}

pub fn handle_init() -> Result<()> {
    let root = env::current_dir()?;

    let _store = SqliteStore::init(&root)?;

    println!("Initialized notes project in {}", root.display());
    Ok(())
}

pub fn handle_add(
    user: Option<String>,
    title: String,
    text: String,
    slug: Option<String>,
    stdin: bool,
    json: bool,
) -> Result<()> {
    let root = find_project_root();
    let mut store = SqliteStore::open(&root)?;

    let requester = Requester::from_name(user.as_deref());
    let author = signed_in(&requester)?;

    let mut text = text;
    if stdin {
        io::stdin().read_to_string(&mut text)?;
    }

    let form = NoteForm::new(title, text, slug);
    form.validate()?;
    let note = store.create(form.to_draft(), author)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&note)?);
    } else {
        println!("Created note {} - {}", note.slug, note.title);
    }

    Ok(())
}

pub fn handle_list(user: Option<String>, json: bool) -> Result<()> {
    let root = find_project_root();
    let store = SqliteStore::open(&root)?;

    let requester = Requester::from_name(user.as_deref());
    let notes = store.list_by_author(signed_in(&requester)?)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&notes)?);
    } else if notes.is_empty() {
        println!("No notes found.");
    } else {
        println!("Notes:\n");
        for n in notes {
            println!(
                "  {} ({}) {}",
                n.slug,
                n.created_at.format("%Y-%m-%d"),
                n.title
            );
        }
    }

    Ok(())
}

pub fn handle_get(user: Option<String>, slug: String, json: bool) -> Result<()> {
    let root = find_project_root();
    let store = SqliteStore::open(&root)?;

    let requester = Requester::from_name(user.as_deref());
    let note = store.get_by_slug(&slug)?;
    access::authorize(Operation::Detail, &slug, note.as_ref(), &requester)?;

    let note = note.ok_or(NotesError::NotFound(slug))?;
    if json {
        println!("{}", serde_json::to_string_pretty(&note)?);
    } else {
        print_note(&note);
    }

    Ok(())
}

pub fn handle_edit(
    user: Option<String>,
    slug: String,
    title: Option<String>,
    text: Option<String>,
    new_slug: Option<String>,
    json: bool,
) -> Result<()> {
    let root = find_project_root();
    let mut store = SqliteStore::open(&root)?;

    let requester = Requester::from_name(user.as_deref());
    let current = store.get_by_slug(&slug)?;
    access::authorize(Operation::Edit, &slug, current.as_ref(), &requester)?;
    let current = current.ok_or_else(|| NotesError::NotFound(slug.clone()))?;

    let form = NoteForm::new(
        title.unwrap_or(current.title),
        text.unwrap_or(current.text),
        Some(new_slug.clone().unwrap_or(current.slug)),
    );
    form.validate()?;

    let update = NoteUpdate {
        title: form.title.trim().to_string(),
        text: form.text,
        slug: new_slug,
    };
    let updated = store.update(&slug, update, &requester)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&updated)?);
    } else {
        println!("Updated note {} - {}", updated.slug, updated.title);
    }

    Ok(())
}

pub fn handle_delete(user: Option<String>, slug: String, force: bool) -> Result<()> {
    let root = find_project_root();
    let mut store = SqliteStore::open(&root)?;

    let requester = Requester::from_name(user.as_deref());
    let note = store.get_by_slug(&slug)?;
    access::authorize(Operation::Delete, &slug, note.as_ref(), &requester)?;
    let note = note.ok_or_else(|| NotesError::NotFound(slug.clone()))?;

    // Confirm deletion unless --force is used
    if !force {
        eprintln!("Delete note {} - {}? [y/N] ", note.slug, note.title);

        if atty::is(atty::Stream::Stdin) {
            let mut input = String::new();
            io::stdin().read_line(&mut input)?;
            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Cancelled.");
                return Ok(());
            }
        } else {
            return Err(NotesError::Storage(
                "Use --force to delete in non-interactive mode".to_string(),
            ));
        }
    }

    store.delete(&slug, &requester)?;

    println!("Deleted note {} - {}", note.slug, note.title);
    Ok(())
}

pub fn handle_route(user: Option<String>, path: String, json: bool) -> Result<()> {
    let root = find_project_root();
    let store = SqliteStore::open(&root)?;
    let config = NotesConfig::load(&root.join(NOTES_DIR))?;
    let app = NotesApp::new(store, config);

    let requester = Requester::from_name(user.as_deref());
    let reply = app.get_path(&path, &requester)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
        return Ok(());
    }

    match &reply {
        Reply::Redirect { location } => println!("{} -> {}", reply.status(), location),
        Reply::NotFound => println!("{} not found", reply.status()),
        Reply::Page { page } => {
            let name = match page {
                Page::Static { name } => name.as_str(),
                Page::List { .. } => "list",
                Page::Form { .. } => "form",
                Page::Detail { .. } => "detail",
                Page::ConfirmDelete { .. } => "confirm delete",
            };
            println!("{} {}", reply.status(), name);
            if let Some(notes) = reply.notes() {
                for n in notes {
                    println!("  {} {}", n.slug, n.title);
                }
            }
        }
    }

    Ok(())
}
