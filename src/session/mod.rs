//! Voice session: state machine, dispatch, and the speech subscription
//!
//! Data flows one way per utterance: transcript -> [`Engine`] ->
//! [`Outcome`] -> [`Dispatcher`] -> collaborators.

mod dispatch;
mod listener;
mod machine;
/// Speech recognition sources
pub mod recognizer;
mod worker;

pub use dispatch::{Collaborators, Dispatcher};
pub use listener::SpeechSubscription;
pub use machine::{Engine, Mode, Outcome};
pub use recognizer::{LineRecognizer, Recognizer, ScriptedRecognizer};

use crate::collaborators::EditingSurface;
use crate::utterance::Utterance;

/// An engine paired with the dispatcher that carries out its outcomes
pub struct Session<S> {
    engine: Engine,
    dispatcher: Dispatcher<S>,
}

impl<S: EditingSurface> Session<S> {
    /// Session starting in the unauthenticated mode
    pub fn new(dispatcher: Dispatcher<S>) -> Self {
        Self {
            engine: Engine::new(),
            dispatcher,
        }
    }

    /// Interpret one finalized transcript and dispatch the result
    ///
    /// Returns once the edit is applied or the collaborator call is queued.
    pub fn handle_transcript(&mut self, text: &str) -> Outcome {
        let utterance = Utterance::new(text);
        let outcome = self.engine.handle(&utterance);
        self.dispatcher.dispatch(&outcome);
        outcome
    }

    /// Forward the authentication status to the engine
    pub fn set_authenticated(&mut self, authenticated: bool) {
        self.engine.set_authenticated(authenticated);
    }

    /// The state machine
    pub const fn engine(&self) -> &Engine {
        &self.engine
    }

    /// The dispatcher
    pub const fn dispatcher(&self) -> &Dispatcher<S> {
        &self.dispatcher
    }
}
