//! Voice commands
//!
//! Two phrase sets exist. Before authentication a small set of phrases is
//! recognized directly ([`parse_auth_phrase`]). After authentication every
//! command must start with a wake word ([`parse_command`]) so background
//! speech is ignored.

/// Unauthenticated phrase set and field cleanup
pub mod auth;
/// Wake-phrase gate and command forms
pub mod grammar;

pub use auth::{clean_login, parse_auth_phrase};
pub use grammar::{has_wake_word, parse_command, strip_wake_word, WAKE_WORDS};

use std::fmt;

/// Authentication form input that can be filled by voice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Login (user name) field
    Login,
    /// Password field
    Password,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login => write!(f, "login"),
            Self::Password => write!(f, "password"),
        }
    }
}

/// A structured application command recognized from speech
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start capturing the given field from the next utterance
    SelectField(FieldKind),
    /// Content captured for a field
    FillField(FieldKind, String),
    /// Toggle the authentication form: `true` for login, `false` for account creation
    SwitchAuthMode(bool),
    /// Submit the authentication form
    SubmitAuthForm,
    /// Create a project with this name
    CreateProject(String),
    /// Create a file at this project-relative path
    CreateFile(String),
    /// Enter dictation mode
    EnterEdit,
    /// Leave dictation mode
    ExitEdit,
    /// Run the current code
    RunCode,
    /// Open the file best matching this query
    OpenFile(String),
    /// Save the currently selected file
    SaveCurrentFile,
    /// Log out
    LogOut,
    /// Nothing matched; dropped silently
    Unrecognized,
}

impl Command {
    /// Whether this command should be dispatched at all
    pub const fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized)
    }
}
