//! Playback events
//!
//! Push-based channel to presentation collaborators. Every mutating
//! command leaves zero or more events on the controller's pending queue;
//! the embedder drains them with `Controller::take_events` and forwards
//! them to its UI layer alongside the returned snapshot.

use crate::types::{PlaybackStatus, RepeatMode};
use serde::{Deserialize, Serialize};

/// Events emitted by the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Transport status changed (playing, paused, stopped)
    StateChanged {
        /// The new transport status
        status: PlaybackStatus,
    },

    /// A different track became current
    TrackChanged {
        /// ID of the new current track
        track_id: String,
        /// ID of the previous current track, if any
        previous_track_id: Option<String>,
    },

    /// The current track finished naturally (renderer reported completion)
    TrackFinished {
        /// ID of the finished track
        track_id: String,
    },

    /// Queue membership or order changed
    QueueChanged {
        /// Number of upcoming tracks after the change
        upcoming_len: usize,
        /// Number of history tracks after the change
        history_len: usize,
    },

    /// Repeat mode changed
    RepeatModeChanged {
        /// The new repeat mode
        mode: RepeatMode,
    },

    /// Volume scalar changed
    VolumeChanged {
        /// The applied volume
        volume: f32,
    },

    /// Filter chain replaced
    FiltersChanged {
        /// Number of filters in the new chain (0 = bypass)
        chain_len: usize,
    },
}
