//! Request dispatch for the notes pages.
//!
//! [`NotesApp`] is what a web layer calls per request: it takes a route,
//! the requester and any submitted form, consults the access rules, runs the
//! operation against its [`NoteStore`] and says what to send back. Sessions,
//! HTTP and rendering stay with the caller.

mod routes;

pub use routes::{Page, Reply, Route};

use tracing::debug;

use crate::access::{self, Decision, Operation};
use crate::config::NotesConfig;
use crate::entity::Requester;
use crate::error::{NotesError, Result};
use crate::form::NoteForm;
use crate::storage::NoteStore;

pub struct NotesApp<S> {
    store: S,
    config: NotesConfig,
}

impl<S: NoteStore> NotesApp<S> {
    pub fn new(store: S, config: NotesConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &NotesConfig {
        &self.config
    }

    /// Serve a page.
    pub fn get(&self, route: &Route, requester: &Requester) -> Result<Reply> {
        let note = match route.slug() {
            Some(slug) => self.store.get_by_slug(slug)?,
            None => None,
        };

        let decision = access::decide(route.operation(), note.as_ref(), requester);
        if let Some(reply) = self.denied(route, decision) {
            return Ok(reply);
        }

        let page = match (route, note) {
            (Route::List, _) => Page::List {
                notes: match requester.as_user() {
                    Some(user) => self.store.list_by_author(user)?,
                    None => Vec::new(),
                },
            },
            (Route::Add, _) => Page::Form {
                form: NoteForm::default(),
            },
            (Route::Edit(_), Some(note)) => Page::Form {
                form: NoteForm::from_note(&note),
            },
            (Route::Detail(_), Some(note)) => Page::Detail { note },
            (Route::Delete(_), Some(note)) => Page::ConfirmDelete { note },
            (Route::Detail(_) | Route::Edit(_) | Route::Delete(_), None) => {
                return Ok(Reply::NotFound)
            }
            (route, _) => Page::Static {
                name: route.operation().to_string(),
            },
        };

        debug!(route = %route, requester = %requester, "page served");
        Ok(Reply::page(page))
    }

    /// Serve a page by URL path; unknown paths are not found.
    pub fn get_path(&self, path: &str, requester: &Requester) -> Result<Reply> {
        match Route::parse(path) {
            Some(route) => self.get(&route, requester),
            None => Ok(Reply::NotFound),
        }
    }

    /// Handle a submitted add form.
    pub fn submit_add(&mut self, form: NoteForm, requester: &Requester) -> Result<Reply> {
        let route = Route::Add;
        let decision = access::decide(Operation::Add, None, requester);
        if let Some(reply) = self.denied(&route, decision) {
            return Ok(reply);
        }
        let Some(author) = requester.as_user() else {
            return Ok(self.login_redirect(&route));
        };

        if let Err(err) = form.validate() {
            return Self::form_rejected(form, err);
        }

        match self.store.create(form.to_draft(), author) {
            Ok(_) => Ok(self.success()),
            Err(err) => self.rejected(&route, form, err),
        }
    }

    /// Handle a submitted edit form for the note at `slug`.
    pub fn submit_edit(
        &mut self,
        slug: &str,
        form: NoteForm,
        requester: &Requester,
    ) -> Result<Reply> {
        let route = Route::Edit(slug.to_string());
        let note = self.store.get_by_slug(slug)?;
        let decision = access::decide(Operation::Edit, note.as_ref(), requester);
        if let Some(reply) = self.denied(&route, decision) {
            return Ok(reply);
        }

        if let Err(err) = form.validate() {
            return Self::form_rejected(form, err);
        }

        match self.store.update(slug, form.to_update(), requester) {
            Ok(_) => Ok(self.success()),
            Err(err) => self.rejected(&route, form, err),
        }
    }

    /// Handle a delete confirmation for the note at `slug`.
    pub fn submit_delete(&mut self, slug: &str, requester: &Requester) -> Result<Reply> {
        let route = Route::Delete(slug.to_string());
        let note = self.store.get_by_slug(slug)?;
        let decision = access::decide(Operation::Delete, note.as_ref(), requester);
        if let Some(reply) = self.denied(&route, decision) {
            return Ok(reply);
        }

        match self.store.delete(slug, requester) {
            Ok(()) => Ok(self.success()),
            Err(err) => self.rejected(&route, NoteForm::default(), err),
        }
    }

    fn denied(&self, route: &Route, decision: Decision) -> Option<Reply> {
        match decision {
            Decision::Permit => None,
            Decision::NotFound => Some(Reply::NotFound),
            Decision::AuthenticationRequired => Some(self.login_redirect(route)),
        }
    }

    fn login_redirect(&self, route: &Route) -> Reply {
        Reply::redirect(self.config.login_redirect(&route.path()))
    }

    fn success(&self) -> Reply {
        Reply::redirect(self.config.success_path.clone())
    }

    /// Turn a store failure into a reply; errors the user cannot fix propagate.
    fn rejected(&self, route: &Route, form: NoteForm, err: NotesError) -> Result<Reply> {
        match err {
            NotesError::AuthenticationRequired => Ok(self.login_redirect(route)),
            NotesError::NotFound(_) => Ok(Reply::NotFound),
            err @ (NotesError::DuplicateSlug(_) | NotesError::Validation { .. }) => {
                Self::form_rejected(form, err)
            }
            err => Err(err),
        }
    }

    /// Re-render the form with the error attached.
    fn form_rejected(form: NoteForm, err: NotesError) -> Result<Reply> {
        debug!(error = %err, "form rejected");
        Ok(Reply::page(Page::Form {
            form: form.with_error(&err),
        }))
    }
}
