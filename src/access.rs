//! Access decisions for note operations.
//!
//! A denial has two distinct shapes: an anonymous requester is asked to
//! authenticate, while an authenticated requester who does not own the note
//! gets "not found" so that a slug's existence is never confirmed to them.

use tracing::debug;

use crate::entity::{Note, Requester, UserId};
use crate::error::{NotesError, Result};

/// Something a requester can ask to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Home,
    Login,
    Logout,
    Signup,
    List,
    Add,
    Success,
    Detail,
    Edit,
    Delete,
}

impl Operation {
    /// Pages anyone may open, authenticated or not.
    pub fn is_public(self) -> bool {
        matches!(
            self,
            Operation::Home | Operation::Login | Operation::Logout | Operation::Signup
        )
    }

    /// Operations that target one specific note.
    pub fn targets_note(self) -> bool {
        matches!(self, Operation::Detail | Operation::Edit | Operation::Delete)
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Home => write!(f, "home"),
            Operation::Login => write!(f, "login"),
            Operation::Logout => write!(f, "logout"),
            Operation::Signup => write!(f, "signup"),
            Operation::List => write!(f, "list"),
            Operation::Add => write!(f, "add"),
            Operation::Success => write!(f, "success"),
            Operation::Detail => write!(f, "detail"),
            Operation::Edit => write!(f, "edit"),
            Operation::Delete => write!(f, "delete"),
        }
    }
}

/// Outcome of an access check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Permit,
    /// No such note, or the requester is not its author
    NotFound,
    /// Anonymous requester on an authenticated-only operation
    AuthenticationRequired,
}

impl Decision {
    pub fn is_permit(self) -> bool {
        self == Decision::Permit
    }
}

/// Authentication presence check.
pub fn require_user(requester: &Requester) -> std::result::Result<&UserId, Decision> {
    requester.as_user().ok_or(Decision::AuthenticationRequired)
}

/// Ownership check for an authenticated user.
pub fn check_owner(note: Option<&Note>, user: &UserId) -> Decision {
    match note {
        Some(note) if note.is_authored_by(user) => Decision::Permit,
        _ => Decision::NotFound,
    }
}

/// Decide whether `requester` may perform `operation` on `note`.
///
/// `note` is only consulted for operations that target a single note.
pub fn decide(operation: Operation, note: Option<&Note>, requester: &Requester) -> Decision {
    if operation.is_public() {
        return Decision::Permit;
    }

    let decision = match require_user(requester) {
        Err(denied) => denied,
        Ok(user) if operation.targets_note() => check_owner(note, user),
        Ok(_) => Decision::Permit,
    };

    debug!(
        operation = %operation,
        requester = %requester,
        slug = note.map(|n| n.slug.as_str()),
        ?decision,
        "access decision"
    );
    decision
}

/// Like [`decide`], but as a `Result` for use with `?`.
pub fn authorize(
    operation: Operation,
    slug: &str,
    note: Option<&Note>,
    requester: &Requester,
) -> Result<()> {
    match decide(operation, note, requester) {
        Decision::Permit => Ok(()),
        Decision::NotFound => Err(NotesError::NotFound(slug.to_string())),
        Decision::AuthenticationRequired => Err(NotesError::AuthenticationRequired),
    }
}
