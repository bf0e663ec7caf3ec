use thiserror::Error;

/// Failure reported by a network or auth collaborator
///
/// The engine never retries these; the dispatcher logs them and moves on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The service could not be reached
    #[error("service unreachable: {0}")]
    Network(String),

    /// The session token was rejected and could not be refreshed
    #[error("not authorized")]
    Unauthorized,

    /// The service refused the request
    #[error("request rejected: {0}")]
    Rejected(String),
}

/// Failure opening a speech recognition session
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpeechError {
    /// Continuous recognition is not available on this platform
    #[error("continuous speech recognition is not supported")]
    Unsupported,

    /// Microphone or recognition service access was refused
    #[error("speech recognition permission denied")]
    PermissionDenied,

    /// The recognizer has no further sessions to offer
    #[error("speech source exhausted")]
    Exhausted,

    /// The recognizer failed to start
    #[error("failed to start recognition: {0}")]
    Start(String),
}
