//! Transport state machine
//!
//! Owns the playback status and position. Position is never advanced by a
//! background timer: it is derived on read from a monotonic epoch recorded
//! when playback (re)starts, plus a frozen base. A superseding command
//! (pause, stop, seek, track change) replaces the epoch under the session
//! lock, so a stale position write racing a new track load cannot happen.

use crate::error::{PlaybackError, Result};
use crate::types::PlaybackStatus;
use std::time::{Duration, Instant};

/// Wall-clock position tracking
///
/// `base` is the position accumulated while paused or at the last seek;
/// `running_since` is set while the transport is playing.
#[derive(Debug, Clone)]
struct PositionClock {
    base: Duration,
    running_since: Option<Instant>,
}

impl PositionClock {
    fn stopped() -> Self {
        Self {
            base: Duration::ZERO,
            running_since: None,
        }
    }

    fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    fn start_at(&mut self, now: Instant) {
        if self.running_since.is_none() {
            self.running_since = Some(now);
        }
    }

    /// Fold elapsed time into `base` and stop the clock
    fn freeze_at(&mut self, now: Instant) {
        if let Some(since) = self.running_since.take() {
            self.base += now.saturating_duration_since(since);
        }
    }

    /// Jump to `position`, preserving the running/frozen state
    fn set_at(&mut self, position: Duration, now: Instant) {
        self.base = position;
        if self.running_since.is_some() {
            self.running_since = Some(now);
        }
    }

    fn position_at(&self, now: Instant) -> Duration {
        match self.running_since {
            Some(since) => self.base + now.saturating_duration_since(since),
            None => self.base,
        }
    }
}

/// Transport state machine: status plus position
///
/// Track identity and queue advancement live in [`crate::queue::Queue`];
/// the controller coordinates the two so that every transition here happens
/// together with the matching queue mutation.
#[derive(Debug, Clone)]
pub struct Transport {
    status: PlaybackStatus,
    clock: PositionClock,
}

impl Transport {
    /// Create a stopped transport with no position
    pub fn new() -> Self {
        Self {
            status: PlaybackStatus::Stopped,
            clock: PositionClock::stopped(),
        }
    }

    /// Current transport status
    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    /// Current position
    ///
    /// Monotonically advances with wall-clock time while playing, frozen
    /// while paused, zero when stopped.
    pub fn position(&self) -> Duration {
        self.position_at(Instant::now())
    }

    /// Current position in whole milliseconds
    pub fn position_ms(&self) -> u64 {
        self.position().as_millis() as u64
    }

    pub(crate) fn position_at(&self, now: Instant) -> Duration {
        self.clock.position_at(now)
    }

    /// Begin playing a freshly loaded track from position 0
    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    pub(crate) fn start_at(&mut self, now: Instant) {
        self.clock = PositionClock::stopped();
        self.clock.start_at(now);
        self.status = PlaybackStatus::Playing;
    }

    /// Re-load the current track at position 0, preserving the status
    ///
    /// Used by skip/next while paused: Paused stays Paused at position 0.
    pub fn restart(&mut self) {
        self.restart_at(Instant::now());
    }

    pub(crate) fn restart_at(&mut self, now: Instant) {
        let status = self.status;
        self.clock = PositionClock::stopped();
        if status == PlaybackStatus::Playing {
            self.clock.start_at(now);
        }
        if status == PlaybackStatus::Stopped {
            // A track is loaded now; stopped-with-track is not a state
            self.clock.start_at(now);
            self.status = PlaybackStatus::Playing;
        }
    }

    /// Freeze the position and pause
    pub fn pause(&mut self) -> Result<()> {
        self.pause_at(Instant::now())
    }

    pub(crate) fn pause_at(&mut self, now: Instant) -> Result<()> {
        match self.status {
            PlaybackStatus::Playing => {
                self.clock.freeze_at(now);
                self.status = PlaybackStatus::Paused;
                Ok(())
            }
            PlaybackStatus::Paused => Err(PlaybackError::AlreadyPaused),
            PlaybackStatus::Stopped => Err(PlaybackError::InvalidState("no track loaded")),
        }
    }

    /// Restart the clock from the frozen position
    pub fn resume(&mut self) -> Result<()> {
        self.resume_at(Instant::now())
    }

    pub(crate) fn resume_at(&mut self, now: Instant) -> Result<()> {
        match self.status {
            PlaybackStatus::Paused => {
                self.clock.start_at(now);
                self.status = PlaybackStatus::Playing;
                Ok(())
            }
            _ => Err(PlaybackError::NotPaused),
        }
    }

    /// Stop: no track, position 0
    ///
    /// Valid from any state.
    pub fn stop(&mut self) {
        self.status = PlaybackStatus::Stopped;
        self.clock = PositionClock::stopped();
    }

    /// Set the position, preserving the current status
    ///
    /// The caller has already validated that a track is loaded and that
    /// `position` is within the track; overshoot is handled as completion
    /// by the controller before it reaches here.
    pub fn seek(&mut self, position: Duration) {
        self.seek_at(position, Instant::now());
    }

    pub(crate) fn seek_at(&mut self, position: Duration, now: Instant) {
        self.clock.set_at(position, now);
    }

    /// True while the position clock is advancing
    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }
}

impl Default for Transport {
    fn default() -> Self {
        Self::new()
    }
}
