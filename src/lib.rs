//! Voice IDE - speech-driven command and dictation engine
//!
//! Turns finalized speech transcripts into mode changes, application
//! commands, or text edits for a code editor. Collaborators (editor, file
//! tree, REST backend, auth) are injected as traits.

/// In-memory editing surface
pub mod buffer;
/// Collaborator traits
pub mod collaborators;
/// Voice command grammar
pub mod command;
/// Configuration management
pub mod config;
/// Dictation macros and text normalization
pub mod dictation;
/// Error types
pub mod error;
/// In-process collaborators
pub mod local;
/// Spoken file name resolution
pub mod resolver;
/// Session state machine, dispatch and speech subscription
pub mod session;
/// Edit-distance similarity
pub mod similarity;
/// Logging setup
pub mod telemetry;
/// Finalized transcripts
pub mod utterance;

pub use command::{Command, FieldKind};
pub use dictation::EditOperation;
pub use session::{Engine, Mode, Outcome};
pub use utterance::Utterance;
