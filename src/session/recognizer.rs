use std::collections::VecDeque;
use std::io::{self, BufRead, BufReader, Stdin};
use std::thread;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::SpeechError;

/// A continuous speech recognizer
///
/// Each call to [`Recognizer::start`] opens one recognition session. The
/// returned channel yields finalized transcripts in recognition order and
/// closes when the session ends; the caller decides whether to restart.
pub trait Recognizer: Send + 'static {
    /// Open a recognition session
    ///
    /// # Errors
    /// Returns error if recognition is unavailable or refused. The
    /// subscription stops on any error.
    fn start(&mut self, capacity: usize) -> Result<mpsc::Receiver<String>, SpeechError>;
}

/// Replays prerecorded sessions, one per call to `start`
#[derive(Debug, Default, Clone)]
pub struct ScriptedRecognizer {
    sessions: VecDeque<Vec<String>>,
    end: Option<SpeechError>,
}

impl ScriptedRecognizer {
    /// Recognizer that will replay `sessions` in order
    pub fn new<I, S>(sessions: I) -> Self
    where
        I: IntoIterator<Item = Vec<S>>,
        S: Into<String>,
    {
        Self {
            sessions: sessions
                .into_iter()
                .map(|session| session.into_iter().map(Into::into).collect())
                .collect(),
            end: None,
        }
    }

    /// Fail with `error` instead of [`SpeechError::Exhausted`] once the
    /// sessions run out, like a platform without recognition or a refused
    /// microphone
    #[must_use]
    pub fn ending_with(mut self, error: SpeechError) -> Self {
        self.end = Some(error);
        self
    }
}

impl Recognizer for ScriptedRecognizer {
    fn start(&mut self, capacity: usize) -> Result<mpsc::Receiver<String>, SpeechError> {
        let Some(transcripts) = self.sessions.pop_front() else {
            return Err(self.end.clone().unwrap_or(SpeechError::Exhausted));
        };
        let (tx, rx) = mpsc::channel(capacity.max(1).max(transcripts.len()));
        for transcript in transcripts {
            tx.try_send(transcript)
                .map_err(|e| SpeechError::Start(e.to_string()))?;
        }
        Ok(rx)
    }
}

/// Reads one transcript per line as a single session
///
/// Lines are read on a dedicated thread that hands them to the async side
/// with `blocking_send`, so a read stuck on an idle terminal never holds up
/// runtime shutdown.
#[derive(Debug)]
pub struct LineRecognizer<R> {
    reader: Option<R>,
}

impl<R: BufRead + Send + 'static> LineRecognizer<R> {
    /// Recognizer over `reader`
    pub const fn new(reader: R) -> Self {
        Self {
            reader: Some(reader),
        }
    }
}

impl LineRecognizer<BufReader<Stdin>> {
    /// Recognizer over the process's standard input
    pub fn stdin() -> Self {
        Self::new(BufReader::new(io::stdin()))
    }
}

impl<R: BufRead + Send + 'static> Recognizer for LineRecognizer<R> {
    fn start(&mut self, capacity: usize) -> Result<mpsc::Receiver<String>, SpeechError> {
        let reader = self.reader.take().ok_or(SpeechError::Exhausted)?;

        let (tx, rx) = mpsc::channel(capacity.max(1));
        thread::Builder::new()
            .name("transcript-reader".to_owned())
            .spawn(move || read_lines(reader, &tx))
            .map_err(|e| SpeechError::Start(e.to_string()))?;
        Ok(rx)
    }
}

fn read_lines<R: BufRead>(reader: R, tx: &mpsc::Sender<String>) {
    for line in reader.lines() {
        match line {
            Ok(line) => {
                if tx.blocking_send(line).is_err() {
                    debug!("transcript receiver dropped");
                    return;
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to read transcript");
                return;
            }
        }
    }
    debug!("transcript source closed, session ended");
}
