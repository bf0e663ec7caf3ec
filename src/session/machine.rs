//! Voice session state machine
//!
//! Holds the current mode and routes each utterance to the phrase set that
//! is live in that mode:
//! - `AwaitingField`: authentication-form phrases, no wake word
//! - `CapturingField`: the next utterance is the field content
//! - `CommandMode`: wake-word gated commands
//! - `DictationMode`: editing macros, then literal dictation

use std::fmt;

use tokio::sync::watch;
use tracing::{debug, info};

use crate::command::{self, Command, FieldKind};
use crate::dictation::{self, EditOperation};
use crate::utterance::Utterance;

/// The four modes of a voice session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Not authenticated, waiting for a form phrase
    #[default]
    AwaitingField,
    /// Not authenticated, the next utterance fills this field
    CapturingField(FieldKind),
    /// Authenticated, listening for wake-word commands
    CommandMode,
    /// Authenticated, speech is typed into the editor
    DictationMode,
}

impl Mode {
    /// Whether this mode belongs to the authenticated pair
    pub const fn is_authenticated(self) -> bool {
        matches!(self, Self::CommandMode | Self::DictationMode)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AwaitingField => write!(f, "AwaitingField"),
            Self::CapturingField(kind) => write!(f, "CapturingField({kind})"),
            Self::CommandMode => write!(f, "CommandMode"),
            Self::DictationMode => write!(f, "DictationMode"),
        }
    }
}

/// What a single utterance produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A command for the dispatcher
    Command(Command),
    /// An edit for the editing surface
    Edit(EditOperation),
    /// Nothing to do
    Ignored,
}

/// Routes utterances according to the current [`Mode`]
///
/// Purely reactive: every call to [`Engine::handle`] runs to completion and
/// is the only place the mode changes, apart from
/// [`Engine::set_authenticated`].
pub struct Engine {
    mode: Mode,
    mode_tx: watch::Sender<Mode>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Engine in the initial, unauthenticated mode
    pub fn new() -> Self {
        let (mode_tx, _) = watch::channel(Mode::AwaitingField);
        Self {
            mode: Mode::AwaitingField,
            mode_tx,
        }
    }

    /// Current mode
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Receiver that observes every mode change (for UI indicators)
    pub fn watch_mode(&self) -> watch::Receiver<Mode> {
        self.mode_tx.subscribe()
    }

    /// React to the authentication collaborator's status
    ///
    /// Switches between the unauthenticated and authenticated mode pairs;
    /// does nothing if the current mode already matches.
    pub fn set_authenticated(&mut self, authenticated: bool) {
        if self.mode.is_authenticated() == authenticated {
            return;
        }
        let next = if authenticated {
            Mode::CommandMode
        } else {
            Mode::AwaitingField
        };
        self.transition_to(next);
    }

    /// Process one utterance
    ///
    /// Total over every mode: each utterance yields a command, an edit, or
    /// [`Outcome::Ignored`]. Blank utterances are always ignored.
    pub fn handle(&mut self, utterance: &Utterance) -> Outcome {
        if utterance.is_empty() {
            return Outcome::Ignored;
        }
        debug!(mode = %self.mode, %utterance, "handling utterance");

        match self.mode {
            Mode::AwaitingField => self.handle_awaiting(utterance),
            Mode::CapturingField(kind) => self.handle_capture(kind, utterance),
            Mode::CommandMode => self.handle_command(utterance),
            Mode::DictationMode => self.handle_dictation(utterance),
        }
    }

    fn handle_awaiting(&mut self, utterance: &Utterance) -> Outcome {
        let Some(command) = command::parse_auth_phrase(utterance.normalized()) else {
            return Outcome::Ignored;
        };
        if let Command::SelectField(kind) = command {
            self.transition_to(Mode::CapturingField(kind));
        }
        Outcome::Command(command)
    }

    fn handle_capture(&mut self, kind: FieldKind, utterance: &Utterance) -> Outcome {
        let value = match kind {
            FieldKind::Login => command::clean_login(utterance.raw()),
            FieldKind::Password => utterance.raw().to_owned(),
        };
        self.transition_to(Mode::AwaitingField);
        Outcome::Command(Command::FillField(kind, value))
    }

    fn handle_command(&mut self, utterance: &Utterance) -> Outcome {
        let command = command::parse_command(utterance.raw());
        match command {
            Command::Unrecognized => return Outcome::Ignored,
            Command::EnterEdit => self.transition_to(Mode::DictationMode),
            _ => {}
        }
        info!(?command, "command recognized");
        Outcome::Command(command)
    }

    fn handle_dictation(&mut self, utterance: &Utterance) -> Outcome {
        if utterance.normalized() == "quit" {
            self.transition_to(Mode::CommandMode);
            return Outcome::Command(Command::ExitEdit);
        }
        dictation::interpret(utterance.raw()).map_or(Outcome::Ignored, Outcome::Edit)
    }

    fn transition_to(&mut self, next: Mode) {
        let previous = self.mode;
        if previous == next {
            return;
        }
        info!(from = %previous, to = %next, "mode transition");
        self.mode = next;
        self.mode_tx.send_replace(next);
    }
}
