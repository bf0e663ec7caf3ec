//! Capabilities the engine is driven against
//!
//! Everything outside command interpretation (editor widget, file tree,
//! REST calls, authentication) is reached through these traits, injected
//! into the [`Dispatcher`](crate::session::Dispatcher) at construction.

use crate::command::FieldKind;
use crate::dictation::EditOperation;
use crate::error::ServiceError;
use crate::resolver::{CandidateFile, FileHandle};

/// Cursor location on the editing surface (1-based, like most editors)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// Line number, starting at 1
    pub line: usize,
    /// Column number, starting at 1
    pub column: usize,
}

impl Position {
    /// Position at `line`, `column`
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// The code editor edits are applied to
///
/// Implementations must tolerate a stale `at` position (clamp, never panic);
/// the cursor is read once per edit.
#[cfg_attr(test, mockall::automock)]
pub trait EditingSurface: Send {
    /// Current cursor position
    fn cursor(&self) -> Position;

    /// Apply an edit at the given position
    fn apply_edit(&mut self, at: Position, op: &EditOperation);

    /// Give the surface keyboard focus
    fn focus(&mut self);
}

/// Snapshot of the rendered file tree
#[cfg_attr(test, mockall::automock)]
pub trait FileCandidates: Send {
    /// Files currently shown, in display order
    fn list_file_candidates(&self) -> Vec<CandidateFile>;

    /// File currently open in the editor, if any
    fn current_file(&self) -> Option<FileHandle>;
}

/// Project and file REST operations
#[cfg_attr(test, mockall::automock)]
pub trait ProjectService: Send {
    /// Create a project and make it current
    ///
    /// # Errors
    /// Returns error if the service rejects or cannot be reached
    fn create_project(&self, name: &str) -> Result<(), ServiceError>;

    /// Create a file in the current project
    ///
    /// # Errors
    /// Returns error if the service rejects or cannot be reached
    fn create_file(&self, relative_path: &str) -> Result<(), ServiceError>;

    /// Load a file into the editor
    ///
    /// # Errors
    /// Returns error if the service rejects or cannot be reached
    fn open_file(&self, file: &FileHandle) -> Result<(), ServiceError>;

    /// Save the editor contents to a file
    ///
    /// # Errors
    /// Returns error if the service rejects or cannot be reached
    fn save_file(&self, file: &FileHandle) -> Result<(), ServiceError>;
}

/// Authentication form and session
#[cfg_attr(test, mockall::automock)]
pub trait AuthService: Send {
    /// Highlight the field about to be captured
    fn select_field(&mut self, field: FieldKind);

    /// Store captured field content
    fn fill_field(&mut self, field: FieldKind, value: &str);

    /// Switch the form between login (`true`) and account creation (`false`)
    fn set_login_mode(&mut self, login: bool);

    /// Submit the form
    ///
    /// # Errors
    /// Returns error if the credentials are refused or the service is down
    fn submit_login(&mut self) -> Result<(), ServiceError>;

    /// End the authenticated session
    ///
    /// # Errors
    /// Returns error if the service cannot be reached
    fn log_out(&mut self) -> Result<(), ServiceError>;
}

/// Runs the code currently in the editor
#[cfg_attr(test, mockall::automock)]
pub trait CodeRunner: Send {
    /// Start a run
    ///
    /// # Errors
    /// Returns error if the run could not be started
    fn run(&self) -> Result<(), ServiceError>;
}
