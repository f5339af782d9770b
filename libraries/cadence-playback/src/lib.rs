//! Cadence - Playback Session Management
//!
//! Platform-agnostic playback controller for Cadence.
//!
//! This crate provides:
//! - Transport state machine (play/pause/resume/stop, wall-clock position)
//! - Ordered queue (history, current, upcoming) with repeat modes
//! - Seek/skip/next/previous with well-defined boundary behavior
//! - Queue mutation (remove, clear, shuffle, insert/move/swap)
//! - Audio tuning (volume scalar, validated filter chain)
//! - Per-session controllers behind one synchronized API
//!
//! # Architecture
//!
//! `cadence-playback` owns no audio: decoding, output, and track lookup
//! are collaborators behind the [`Renderer`] and [`TrackResolver`] traits.
//! The controller validates a command against current state, mutates the
//! queue/transport/tuning under the session lock, notifies the renderer,
//! and returns a read-only [`Snapshot`] for presentation.
//!
//! # Example: Basic Playback
//!
//! ```rust
//! use cadence_playback::{
//!     Controller, NullRenderer, PlayerConfig, SourceRef, Track,
//! };
//! use std::time::Duration;
//!
//! let controller = Controller::new(PlayerConfig::default(), Box::new(NullRenderer));
//!
//! let track = Track::new(
//!     "track1",
//!     Duration::from_secs(180),
//!     SourceRef::Url("https://tracks.example/track1".to_string()),
//! );
//!
//! let snapshot = controller.play(Some(track)).unwrap();
//! assert_eq!(snapshot.position_ms, 0);
//!
//! controller.pause().unwrap();
//! controller.resume().unwrap();
//! ```
//!
//! # Example: Queue and Repeat
//!
//! ```rust
//! use cadence_playback::{Command, Controller, NullRenderer, PlayerConfig, RepeatMode, SourceRef, Track};
//! use std::time::Duration;
//!
//! let controller = Controller::new(PlayerConfig::default(), Box::new(NullRenderer));
//! # let track = |id: &str| Track::new(id, Duration::from_secs(10), SourceRef::Encoded(String::new()));
//!
//! controller.apply(Command::Enqueue(track("a"))).unwrap();
//! controller.apply(Command::Enqueue(track("b"))).unwrap();
//! controller.apply(Command::SetRepeatMode(RepeatMode::Queue)).unwrap();
//! let snapshot = controller.apply(Command::Next).unwrap();
//! assert_eq!(snapshot.track.unwrap().id.as_str(), "a");
//! ```

mod controller;
mod error;
mod events;
mod queue;
mod renderer;
mod session;
mod shuffle;
mod transport;
mod tuning;
pub mod types;

// Public exports
pub use controller::{Command, Controller};
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use queue::Queue;
pub use renderer::{NullRenderer, Renderer, TrackResolver};
pub use session::{SessionId, SessionRegistry};
pub use transport::Transport;
pub use tuning::{EqualizerBand, FilterSpec, Tuning, MAX_VOLUME};
pub use types::{
    PlaybackStatus, PlayerConfig, PreviousPolicy, RepeatMode, Snapshot, SourceRef, Track, TrackId,
    VolumePolicy,
};
