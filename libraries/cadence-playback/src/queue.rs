//! Ordered playback queue
//!
//! Three-part model around a single active track:
//!
//! ```text
//! History (oldest first):
//!   - Track A
//!   - Track B
//! ─────────────────────────────
//! Current: Track C
//! ─────────────────────────────
//! Upcoming (soonest first):
//!   - Track D
//!   - Track E
//! ```
//!
//! History is append-only except for explicit clear/remove and reflects
//! playback order. Advancement honors the repeat mode; shuffles permute a
//! segment without changing its membership or crossing the
//! history/upcoming partition.

use crate::error::{PlaybackError, Result};
use crate::shuffle::shuffle_deque;
use crate::types::{RepeatMode, Track, TrackId};
use std::collections::{HashSet, VecDeque};

/// Playback queue with history, current track, and upcoming tracks
#[derive(Debug, Clone)]
pub struct Queue {
    /// Previously played tracks, oldest first
    history: VecDeque<Track>,

    /// The track actively loaded for playback
    current: Option<Track>,

    /// Tracks queued to play next, soonest first
    upcoming: VecDeque<Track>,

    /// Advancement policy, applied on the next `advance`/`step_back`
    repeat_mode: RepeatMode,
}

impl Queue {
    /// Create a new empty queue
    pub fn new() -> Self {
        Self {
            history: VecDeque::new(),
            current: None,
            upcoming: VecDeque::new(),
            repeat_mode: RepeatMode::Off,
        }
    }

    // ===== Enqueue =====

    /// Append a track to the end of upcoming
    pub fn enqueue(&mut self, track: Track) {
        self.upcoming.push_back(track);
    }

    /// Push a track to the front of upcoming (plays next)
    pub fn enqueue_front(&mut self, track: Track) {
        self.upcoming.push_front(track);
    }

    /// Insert a track at `position` in upcoming
    ///
    /// `position == len` appends. Anything beyond that is rejected.
    pub fn insert(&mut self, track: Track, position: usize) -> Result<()> {
        if position > self.upcoming.len() {
            return Err(PlaybackError::IndexOutOfRange {
                index: position,
                len: self.upcoming.len(),
            });
        }
        self.upcoming.insert(position, track);
        Ok(())
    }

    // ===== Reordering =====

    /// Move the upcoming track at `from` to `to`
    pub fn move_track(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.upcoming.len();
        if from >= len {
            return Err(PlaybackError::IndexOutOfRange { index: from, len });
        }
        if to >= len {
            return Err(PlaybackError::IndexOutOfRange { index: to, len });
        }
        if from == to {
            return Ok(());
        }

        // Validated above, remove cannot fail
        if let Some(track) = self.upcoming.remove(from) {
            self.upcoming.insert(to, track);
        }
        Ok(())
    }

    /// Swap two upcoming tracks
    pub fn swap(&mut self, i: usize, j: usize) -> Result<()> {
        let len = self.upcoming.len();
        if i >= len {
            return Err(PlaybackError::IndexOutOfRange { index: i, len });
        }
        if j >= len {
            return Err(PlaybackError::IndexOutOfRange { index: j, len });
        }
        self.upcoming.swap(i, j);
        Ok(())
    }

    // ===== Removal =====

    /// Remove every track whose id is in `ids` from history and upcoming
    ///
    /// The current track is never removed, even when its id matches.
    /// Returns the number of tracks removed.
    pub fn remove(&mut self, ids: &HashSet<TrackId>) -> usize {
        let before = self.history.len() + self.upcoming.len();
        self.history.retain(|t| !ids.contains(&t.id));
        self.upcoming.retain(|t| !ids.contains(&t.id));
        before - self.history.len() - self.upcoming.len()
    }

    /// Empty both history and upcoming; current is untouched
    pub fn clear(&mut self) {
        self.history.clear();
        self.upcoming.clear();
    }

    // ===== Shuffle =====

    /// Uniformly permute upcoming; history and current unaffected
    pub fn shuffle_upcoming(&mut self) {
        shuffle_deque(&mut self.upcoming);
    }

    /// Uniformly permute history; upcoming and current unaffected
    pub fn shuffle_history(&mut self) {
        shuffle_deque(&mut self.history);
    }

    /// Permute upcoming and history independently
    ///
    /// The partition is preserved: a track that already played is never
    /// shuffled into the future queue.
    pub fn shuffle_all(&mut self) {
        shuffle_deque(&mut self.upcoming);
        shuffle_deque(&mut self.history);
    }

    // ===== Repeat =====

    /// Set the repeat mode
    ///
    /// Pure state update; takes effect on the next advancement.
    pub fn set_repeat_mode(&mut self, mode: RepeatMode) {
        self.repeat_mode = mode;
    }

    /// Get the active repeat mode
    pub fn repeat_mode(&self) -> RepeatMode {
        self.repeat_mode
    }

    // ===== Advancement =====

    /// Load `track` as current
    ///
    /// The previously current track (if any) was played, so it moves to
    /// history.
    pub fn load(&mut self, track: Track) {
        if let Some(played) = self.current.take() {
            self.history.push_back(played);
        }
        self.current = Some(track);
    }

    /// Discard the current track without recording it in history
    ///
    /// Used by `stop`: an interrupted track is not treated as played.
    pub fn discard_current(&mut self) {
        self.current = None;
    }

    /// Advance to the next track, honoring the repeat mode
    ///
    /// - `Track`: the current track is re-loaded unchanged; history and
    ///   upcoming are untouched.
    /// - `Queue`: when upcoming runs out, history (including the track that
    ///   just finished) is drained back into upcoming in original playback
    ///   order before popping.
    /// - `Off`: current moves to history and the head of upcoming becomes
    ///   current; `None` is returned when nothing is left.
    pub fn advance(&mut self) -> Option<&Track> {
        if self.repeat_mode == RepeatMode::Track && self.current.is_some() {
            return self.current.as_ref();
        }

        if let Some(played) = self.current.take() {
            self.history.push_back(played);
        }

        if self.upcoming.is_empty() && self.repeat_mode == RepeatMode::Queue {
            self.upcoming = std::mem::take(&mut self.history);
        }

        self.current = self.upcoming.pop_front();
        self.current.as_ref()
    }

    /// Step back to the most recently played track
    ///
    /// The current track (if any) returns to the front of upcoming so a
    /// subsequent `advance` plays it again. Returns `None` when history is
    /// empty; the caller applies its fallback policy.
    pub fn step_back(&mut self) -> Option<&Track> {
        let previous = self.history.pop_back()?;
        if let Some(cur) = self.current.take() {
            self.upcoming.push_front(cur);
        }
        self.current = Some(previous);
        self.current.as_ref()
    }

    /// Skip directly to a track in upcoming
    ///
    /// All upcoming tracks before the target move into history in order,
    /// after the current track (which was playing and therefore precedes
    /// them). Fails with `TrackNotFound` when the id is not in upcoming.
    pub fn skip_to(&mut self, id: &TrackId) -> Result<&Track> {
        let pos = self
            .upcoming
            .iter()
            .position(|t| &t.id == id)
            .ok_or_else(|| PlaybackError::TrackNotFound(id.to_string()))?;

        let target = self
            .upcoming
            .remove(pos)
            .ok_or_else(|| PlaybackError::TrackNotFound(id.to_string()))?;

        if let Some(played) = self.current.take() {
            self.history.push_back(played);
        }
        self.history.extend(self.upcoming.drain(..pos));

        Ok(&*self.current.insert(target))
    }

    // ===== Accessors =====

    /// The track actively loaded for playback
    pub fn current(&self) -> Option<&Track> {
        self.current.as_ref()
    }

    /// Upcoming tracks, soonest first
    pub fn upcoming(&self) -> impl Iterator<Item = &Track> {
        self.upcoming.iter()
    }

    /// Previously played tracks, oldest first
    pub fn history(&self) -> impl Iterator<Item = &Track> {
        self.history.iter()
    }

    /// Number of upcoming tracks
    pub fn upcoming_len(&self) -> usize {
        self.upcoming.len()
    }

    /// Number of history tracks
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// True when history and upcoming are both empty
    pub fn is_empty(&self) -> bool {
        self.history.is_empty() && self.upcoming.is_empty()
    }
}

impl Default for Queue {
    fn default() -> Self {
        Self::new()
    }
}
