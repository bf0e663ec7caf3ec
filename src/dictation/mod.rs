//! Dictation-mode text handling
//!
//! Editing macros take priority over literal dictation: a phrase is first
//! offered to [`recognize_macro`], and only when no macro matches is it
//! normalized into text with [`dictate`].

use tracing::debug;

/// Editing macros (delete count/word/line)
pub mod macros;
/// Spoken-cue to literal-text rewriting
pub mod normalize;
/// Number-word lookup
pub mod numbers;

pub use macros::recognize_macro;
pub use normalize::{dictate, normalize_dictation};
pub use numbers::word_to_number;

/// An edit applied to the editing surface at its current cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOperation {
    /// Insert literal text at the cursor
    InsertText(String),
    /// Delete this many characters left of the cursor
    DeleteLeft(u32),
    /// Delete the word left of the cursor
    DeleteWord,
    /// Clear the whole current line
    DeleteLine,
}

/// Interpret one dictated phrase: macro first, then literal text
///
/// A `delete <token>` phrase whose count is invalid ("delete zero",
/// "delete banana") yields nothing instead of being typed out.
pub fn interpret(phrase: &str) -> Option<EditOperation> {
    if let Some(op) = recognize_macro(phrase) {
        return Some(op);
    }
    if macros::is_delete_form(phrase) {
        debug!(phrase, "delete with invalid count, dropped");
        return None;
    }
    dictate(phrase)
}
