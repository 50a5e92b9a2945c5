use serde::Serialize;

use crate::access::Operation;
use crate::entity::Note;
use crate::form::NoteForm;

/// Every page the notes site serves
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Logout,
    Signup,
    List,
    Add,
    Success,
    Detail(String),
    Edit(String),
    Delete(String),
}

impl Route {
    pub fn operation(&self) -> Operation {
        match self {
            Route::Home => Operation::Home,
            Route::Login => Operation::Login,
            Route::Logout => Operation::Logout,
            Route::Signup => Operation::Signup,
            Route::List => Operation::List,
            Route::Add => Operation::Add,
            Route::Success => Operation::Success,
            Route::Detail(_) => Operation::Detail,
            Route::Edit(_) => Operation::Edit,
            Route::Delete(_) => Operation::Delete,
        }
    }

    pub fn slug(&self) -> Option<&str> {
        match self {
            Route::Detail(slug) | Route::Edit(slug) | Route::Delete(slug) => Some(slug.as_str()),
            _ => None,
        }
    }

    /// Reverse the route to its URL path.
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Login => "/auth/login/".to_string(),
            Route::Logout => "/auth/logout/".to_string(),
            Route::Signup => "/auth/signup/".to_string(),
            Route::List => "/notes/".to_string(),
            Route::Add => "/add/".to_string(),
            Route::Success => "/done/".to_string(),
            Route::Detail(slug) => format!("/note/{}/", slug),
            Route::Edit(slug) => format!("/edit/{}/", slug),
            Route::Delete(slug) => format!("/delete/{}/", slug),
        }
    }

    /// Resolve a URL path. Any query string is ignored; the trailing slash
    /// is optional.
    pub fn parse(path: &str) -> Option<Route> {
        let path = path.split('?').next().unwrap_or_default();
        if !path.starts_with('/') {
            return None;
        }

        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        let route = match segments.as_slice() {
            [""] => Route::Home,
            ["auth", "login"] => Route::Login,
            ["auth", "logout"] => Route::Logout,
            ["auth", "signup"] => Route::Signup,
            ["notes"] => Route::List,
            ["add"] => Route::Add,
            ["done"] => Route::Success,
            ["note", slug] if !slug.is_empty() => Route::Detail(slug.to_string()),
            ["edit", slug] if !slug.is_empty() => Route::Edit(slug.to_string()),
            ["delete", slug] if !slug.is_empty() => Route::Delete(slug.to_string()),
            _ => return None,
        };
        Some(route)
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// What a permitted request renders
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum Page {
    /// A page with no note content (home, auth pages, success)
    Static { name: String },
    List { notes: Vec<Note> },
    Form { form: NoteForm },
    Detail { note: Note },
    ConfirmDelete { note: Note },
}

/// Response to a request, independent of any transport
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reply", rename_all = "snake_case")]
pub enum Reply {
    Page { page: Page },
    Redirect { location: String },
    NotFound,
}

impl Reply {
    pub fn page(page: Page) -> Self {
        Reply::Page { page }
    }

    pub fn redirect(location: impl Into<String>) -> Self {
        Reply::Redirect {
            location: location.into(),
        }
    }

    /// HTTP status code equivalent.
    pub fn status(&self) -> u16 {
        match self {
            Reply::Page { .. } => 200,
            Reply::Redirect { .. } => 302,
            Reply::NotFound => 404,
        }
    }

    pub fn location(&self) -> Option<&str> {
        match self {
            Reply::Redirect { location } => Some(location.as_str()),
            _ => None,
        }
    }

    pub fn form(&self) -> Option<&NoteForm> {
        match self {
            Reply::Page {
                page: Page::Form { form },
            } => Some(form),
            _ => None,
        }
    }

    pub fn notes(&self) -> Option<&[Note]> {
        match self {
            Reply::Page {
                page: Page::List { notes },
            } => Some(notes.as_slice()),
            _ => None,
        }
    }
}
