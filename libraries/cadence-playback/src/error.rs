//! Error types for playback sessions

use thiserror::Error;

/// Playback errors
///
/// Every command failure is reported synchronously to the caller as one of
/// these variants. No error is fatal to the session; state is left exactly
/// as it was before the rejected command.
#[derive(Debug, Error, PartialEq)]
pub enum PlaybackError {
    /// Operation is not valid in the current transport state
    #[error("Invalid state: {0}")]
    InvalidState(&'static str),

    /// Pause requested while already paused
    #[error("Playback is already paused")]
    AlreadyPaused,

    /// Resume requested while not paused
    #[error("Playback is not paused")]
    NotPaused,

    /// Track not found in the upcoming queue
    #[error("Track not found in upcoming queue: {0}")]
    TrackNotFound(String),

    /// Queue index out of range
    #[error("Index out of range: {index} (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Tuning input rejected by validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Queue has no tracks to advance to
    #[error("Queue is empty")]
    EmptyQueue,
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
