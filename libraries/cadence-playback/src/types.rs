//! Core types for playback sessions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Unique track identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackId(pub String);

impl TrackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TrackId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TrackId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Reference to the underlying playable source
///
/// Resolution and decoding happen in the render collaborator; the core only
/// carries the reference through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SourceRef {
    /// Remote stream URL
    Url(String),

    /// Local file path
    Path(String),

    /// Opaque pre-encoded track blob (base64)
    Encoded(String),
}

/// One playable item
///
/// Immutable once created. Owned by the queue while enqueued; dropped when
/// removed from both history and upcoming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,

    /// Total track duration
    pub duration: Duration,

    /// Where the renderer finds the audio
    pub source: SourceRef,

    /// Track title (optional, for presentation)
    pub title: Option<String>,

    /// Artist name (optional, for presentation)
    pub artist: Option<String>,
}

impl Track {
    /// Create a track with the minimum required fields
    pub fn new(id: impl Into<TrackId>, duration: Duration, source: SourceRef) -> Self {
        Self {
            id: id.into(),
            duration,
            source,
            title: None,
            artist: None,
        }
    }

    /// Track duration in whole milliseconds
    pub fn duration_ms(&self) -> u64 {
        self.duration.as_millis() as u64
    }
}

/// Transport status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackStatus {
    /// No track loaded
    Stopped,

    /// Currently playing
    Playing,

    /// Paused mid-track
    Paused,
}

/// Repeat mode
///
/// Takes effect on the next advancement, never retroactively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepeatMode {
    /// Stop when the queue ends
    Off,

    /// Replay the current track indefinitely
    Track,

    /// Cycle the whole queue
    Queue,
}

/// Policy for `previous()` when history is empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PreviousPolicy {
    /// Restart the current track from position 0 (if one is loaded)
    RestartCurrent,

    /// Do nothing
    NoOp,
}

/// Policy for out-of-range volume input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolumePolicy {
    /// Clamp into the valid range
    Clamp,

    /// Reject with a validation error
    Strict,
}

/// Configuration for a playback controller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// How many upcoming tracks a snapshot carries (default: 10)
    pub snapshot_upcoming: usize,

    /// Out-of-range volume handling (default: Clamp)
    pub volume_policy: VolumePolicy,

    /// `previous()` behavior on empty history (default: RestartCurrent)
    pub previous_policy: PreviousPolicy,

    /// Initial volume (default: 1.0 = unity)
    pub initial_volume: f32,

    /// Initial repeat mode (default: Off)
    pub repeat: RepeatMode,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            snapshot_upcoming: 10,
            volume_policy: VolumePolicy::Clamp,
            previous_policy: PreviousPolicy::RestartCurrent,
            initial_volume: 1.0,
            repeat: RepeatMode::Off,
        }
    }
}

/// Read-only projection of playback state for presentation collaborators
///
/// Emitted after every mutating command. Contains no live references, so it
/// can be read concurrently with in-flight position advancement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Transport status
    pub status: PlaybackStatus,

    /// Currently loaded track, if any
    pub track: Option<Track>,

    /// Playback position in milliseconds (0 when no track is loaded)
    pub position_ms: u64,

    /// The next few upcoming tracks (bounded by `snapshot_upcoming`)
    pub upcoming: Vec<Track>,

    /// Active repeat mode
    pub repeat_mode: RepeatMode,

    /// Active volume scalar
    pub volume: f32,
}
