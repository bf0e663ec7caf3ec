use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info, warn};

use crate::collaborators::EditingSurface;
use crate::config::SpeechConfig;
use crate::error::SpeechError;

use super::recognizer::Recognizer;
use super::Session;

/// A running speech subscription feeding a [`Session`]
///
/// Recognition sessions are reopened after they end while auto-restart is
/// enabled. [`SpeechSubscription::stop`] (or dropping the subscription)
/// cancels it; no utterance is processed after that.
pub struct SpeechSubscription<S> {
    handle: JoinHandle<Session<S>>,
    stop_tx: watch::Sender<bool>,
}

impl<S: EditingSurface + 'static> SpeechSubscription<S> {
    /// Start feeding transcripts from `recognizer` into `session`
    ///
    /// `auth` carries the authentication collaborator's status; every change
    /// is forwarded to the engine before the next utterance.
    pub fn start<R: Recognizer>(
        recognizer: R,
        session: Session<S>,
        auth: watch::Receiver<bool>,
        config: &SpeechConfig,
    ) -> Self {
        let (stop_tx, stop_rx) = watch::channel(false);
        let handle = tokio::spawn(listen(recognizer, session, auth, stop_rx, config.clone()));
        Self { handle, stop_tx }
    }

    /// Cancel the subscription
    pub fn stop(&self) {
        info!("stopping speech subscription");
        self.stop_tx.send_replace(true);
    }

    /// Whether the listening task has ended
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the subscription to end and take back the session
    ///
    /// # Errors
    /// Returns error if the listening task panicked or was aborted
    pub async fn join(self) -> Result<Session<S>, JoinError> {
        let Self { handle, stop_tx } = self;
        let session = handle.await;
        drop(stop_tx);
        session
    }
}

async fn listen<R: Recognizer, S: EditingSurface>(
    mut recognizer: R,
    mut session: Session<S>,
    mut auth: watch::Receiver<bool>,
    mut stop_rx: watch::Receiver<bool>,
    config: SpeechConfig,
) -> Session<S> {
    session.set_authenticated(*auth.borrow_and_update());
    let mut auth_open = true;
    let mut restarts: u32 = 0;

    info!("speech subscription started");

    'sessions: loop {
        let mut transcripts = match recognizer.start(config.channel_capacity) {
            Ok(rx) => rx,
            Err(SpeechError::Exhausted) => {
                debug!("recognizer exhausted, subscription ending");
                break;
            }
            Err(e) => {
                warn!(error = %e, "recognizer unavailable, subscription ending");
                break;
            }
        };

        loop {
            tokio::select! {
                biased;

                changed = stop_rx.changed() => {
                    // a closed channel means the subscription was dropped
                    if changed.is_err() || *stop_rx.borrow() {
                        break 'sessions;
                    }
                }
                changed = auth.changed(), if auth_open => {
                    if changed.is_ok() {
                        session.set_authenticated(*auth.borrow_and_update());
                    } else {
                        auth_open = false;
                    }
                }
                transcript = transcripts.recv() => match transcript {
                    Some(text) => {
                        session.handle_transcript(&text);
                    }
                    None => break,
                },
            }
        }

        if !config.auto_restart {
            break;
        }
        if config.max_restarts > 0 && restarts >= config.max_restarts {
            warn!(restarts, "restart limit reached");
            break;
        }
        restarts += 1;
        debug!(restarts, "recognition session ended, restarting");
    }

    info!("speech subscription stopped");
    session
}
