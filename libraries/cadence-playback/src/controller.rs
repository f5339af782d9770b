//! Playback controller - core orchestration
//!
//! Composes the queue, transport, and tuning state behind one synchronized
//! API. All mutations for a session are serialized through a single lock,
//! so no two commands ever observe an inconsistent intermediate state; a
//! `next` interleaved with a `remove` cannot lose track of the current
//! track. Commands either fully apply or fully reject.

use crate::error::{PlaybackError, Result};
use crate::events::PlaybackEvent;
use crate::queue::Queue;
use crate::renderer::Renderer;
use crate::transport::Transport;
use crate::tuning::{FilterSpec, Tuning};
use crate::types::{
    PlaybackStatus, PlayerConfig, PreviousPolicy, RepeatMode, Snapshot, Track, TrackId,
};
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

/// Every command the controller accepts, as a tagged variant
///
/// The chat/CLI layer parses user input into one of these and hands it to
/// [`Controller::apply`]; the match there is exhaustive, so adding a
/// variant without handling it is a compile error.
#[derive(Debug, Clone)]
pub enum Command {
    /// Load and play a track, or resume when `None`
    Play(Option<Track>),
    Pause,
    Resume,
    Stop,
    /// Seek to a millisecond timestamp; negatives clamp to 0, overshoot
    /// past the track duration completes the track
    SeekToMs(i64),
    /// Jump to a track in upcoming
    SkipTo(TrackId),
    Next,
    Previous,
    /// Append to the end of upcoming
    Enqueue(Track),
    /// Push to the front of upcoming (plays next)
    EnqueueFront(Track),
    Insert { track: Track, position: usize },
    Move { from: usize, to: usize },
    Swap { i: usize, j: usize },
    /// Remove matching tracks from history and upcoming (never current)
    Remove(HashSet<TrackId>),
    Clear,
    ShuffleUpcoming,
    ShuffleHistory,
    ShuffleAll,
    SetRepeatMode(RepeatMode),
    SetVolume(f32),
    SetFilters(Vec<FilterSpec>),
}

/// One playback session: queue + transport + tuning behind a lock
///
/// Commands take `&self` and serialize internally, so a controller can be
/// shared (`Arc<Controller>`) between the command layer and the renderer's
/// completion callback. Independent sessions share no state and run fully
/// in parallel.
pub struct Controller {
    inner: Mutex<Inner>,
}

struct Inner {
    queue: Queue,
    transport: Transport,
    tuning: Tuning,
    renderer: Box<dyn Renderer>,
    config: PlayerConfig,
    pending_events: Vec<PlaybackEvent>,
}

impl Controller {
    /// Create a controller with the given config and render collaborator
    pub fn new(config: PlayerConfig, renderer: Box<dyn Renderer>) -> Self {
        let mut queue = Queue::new();
        queue.set_repeat_mode(config.repeat);
        let tuning = Tuning::new(config.initial_volume, config.volume_policy);

        Self {
            inner: Mutex::new(Inner {
                queue,
                transport: Transport::new(),
                tuning,
                renderer,
                config,
                pending_events: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panic mid-command cannot leave state partially mutated
        // (commands validate before they touch anything), so a poisoned
        // lock is still consistent.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Dispatch a command, returning the post-command snapshot
    pub fn apply(&self, command: Command) -> Result<Snapshot> {
        debug!(?command, "applying command");
        let result = match command {
            Command::Play(track) => self.play(track),
            Command::Pause => self.pause(),
            Command::Resume => self.resume(),
            Command::Stop => self.stop(),
            Command::SeekToMs(ms) => self.seek_to_ms(ms),
            Command::SkipTo(id) => self.skip_to(&id),
            Command::Next => self.next(),
            Command::Previous => self.previous(),
            Command::Enqueue(track) => self.enqueue(track),
            Command::EnqueueFront(track) => self.enqueue_front(track),
            Command::Insert { track, position } => self.insert(track, position),
            Command::Move { from, to } => self.move_track(from, to),
            Command::Swap { i, j } => self.swap(i, j),
            Command::Remove(ids) => self.remove(&ids).map(|(_, snapshot)| snapshot),
            Command::Clear => self.clear(),
            Command::ShuffleUpcoming => self.shuffle_upcoming(),
            Command::ShuffleHistory => self.shuffle_history(),
            Command::ShuffleAll => self.shuffle_all(),
            Command::SetRepeatMode(mode) => self.set_repeat_mode(mode),
            Command::SetVolume(volume) => self.set_volume(volume),
            Command::SetFilters(chain) => self.set_filters(chain),
        };
        if let Err(ref err) = result {
            warn!(%err, "command rejected");
        }
        result
    }

    // ===== Transport =====

    /// Load and play a track, or resume the current one
    ///
    /// With a track: it becomes current (the previously current track was
    /// played and moves to history), position resets to 0, status becomes
    /// Playing. Without one: resume semantics; `InvalidState` when nothing
    /// is loaded, even if upcoming is non-empty.
    pub fn play(&self, track: Option<Track>) -> Result<Snapshot> {
        let mut inner = self.lock();
        match track {
            Some(track) => {
                let previous_id = inner.current_id();
                inner.queue.load(track);
                inner.transport.start();
                inner.notify_track_loaded(previous_id);
                Ok(inner.finish())
            }
            None => match inner.transport.status() {
                PlaybackStatus::Paused => {
                    inner.resume()?;
                    Ok(inner.finish())
                }
                PlaybackStatus::Playing => Ok(inner.finish()),
                PlaybackStatus::Stopped => Err(PlaybackError::InvalidState(
                    "play without a track requires a loaded track",
                )),
            },
        }
    }

    /// Pause playback, freezing the position
    pub fn pause(&self) -> Result<Snapshot> {
        let mut inner = self.lock();
        inner.transport.pause()?;
        inner.renderer.set_paused(true);
        inner.push_state_changed();
        Ok(inner.finish())
    }

    /// Resume from pause, restarting the clock at the frozen position
    pub fn resume(&self) -> Result<Snapshot> {
        let mut inner = self.lock();
        inner.resume()?;
        Ok(inner.finish())
    }

    /// Stop playback
    ///
    /// The current track is discarded, not pushed to history; the queue
    /// itself is untouched.
    pub fn stop(&self) -> Result<Snapshot> {
        let mut inner = self.lock();
        inner.transport.stop();
        inner.queue.discard_current();
        inner.renderer.unload();
        inner.push_state_changed();
        Ok(inner.finish())
    }

    /// Seek to a millisecond timestamp in the current track
    ///
    /// Negative timestamps clamp to 0 (restart, queue untouched); a
    /// timestamp past the track duration is treated as completion and
    /// behaves exactly like `next`. Status is preserved either way.
    pub fn seek_to_ms(&self, timestamp_ms: i64) -> Result<Snapshot> {
        let mut inner = self.lock();
        let Some(current) = inner.queue.current() else {
            return Err(PlaybackError::InvalidState("no track loaded"));
        };

        if timestamp_ms > current.duration_ms() as i64 {
            debug!(timestamp_ms, "seek past end of track, completing");
            inner.advance_queue();
            return Ok(inner.finish());
        }

        let position_ms = timestamp_ms.max(0) as u64;
        inner
            .transport
            .seek(std::time::Duration::from_millis(position_ms));
        inner.renderer.seek(position_ms);
        Ok(inner.finish())
    }

    /// Jump to a track in upcoming
    ///
    /// Everything before it in upcoming moves to history in order; the
    /// target becomes current at position 0 with the status preserved
    /// (Paused stays Paused at 0). `TrackNotFound` when the id is not in
    /// upcoming.
    pub fn skip_to(&self, id: &TrackId) -> Result<Snapshot> {
        let mut inner = self.lock();
        let previous_id = inner.current_id();
        inner.queue.skip_to(id)?;
        inner.transport.restart();
        inner.notify_track_loaded(previous_id);
        Ok(inner.finish())
    }

    /// Advance to the next track, honoring the repeat mode
    ///
    /// Transitions to Stopped when the queue is exhausted in `Off` mode.
    pub fn next(&self) -> Result<Snapshot> {
        let mut inner = self.lock();
        inner.advance_queue();
        Ok(inner.finish())
    }

    /// Step back to the most recently played track
    ///
    /// On empty history, applies the configured policy: restart the
    /// current track from 0, or do nothing.
    pub fn previous(&self) -> Result<Snapshot> {
        let mut inner = self.lock();
        let previous_id = inner.current_id();

        if inner.queue.step_back().is_some() {
            inner.transport.restart();
            inner.notify_track_loaded(previous_id);
            return Ok(inner.finish());
        }

        match inner.config.previous_policy {
            PreviousPolicy::RestartCurrent if inner.queue.current().is_some() => {
                inner.transport.restart();
                inner.renderer.seek(0);
            }
            PreviousPolicy::RestartCurrent | PreviousPolicy::NoOp => {}
        }
        Ok(inner.finish())
    }

    /// Called by the platform when the renderer reports natural track end
    pub fn on_playback_complete(&self) -> Result<Snapshot> {
        let mut inner = self.lock();
        if let Some(track_id) = inner.current_id() {
            inner.pending_events.push(PlaybackEvent::TrackFinished {
                track_id: track_id.to_string(),
            });
        }
        inner.advance_queue();
        Ok(inner.finish())
    }

    // ===== Queue =====

    /// Append a track to the end of upcoming
    pub fn enqueue(&self, track: Track) -> Result<Snapshot> {
        let mut inner = self.lock();
        inner.queue.enqueue(track);
        inner.push_queue_changed();
        Ok(inner.finish())
    }

    /// Push a track to the front of upcoming
    pub fn enqueue_front(&self, track: Track) -> Result<Snapshot> {
        let mut inner = self.lock();
        inner.queue.enqueue_front(track);
        inner.push_queue_changed();
        Ok(inner.finish())
    }

    /// Insert a track at a position in upcoming
    pub fn insert(&self, track: Track, position: usize) -> Result<Snapshot> {
        let mut inner = self.lock();
        inner.queue.insert(track, position)?;
        inner.push_queue_changed();
        Ok(inner.finish())
    }

    /// Move an upcoming track to a new position
    pub fn move_track(&self, from: usize, to: usize) -> Result<Snapshot> {
        let mut inner = self.lock();
        inner.queue.move_track(from, to)?;
        inner.push_queue_changed();
        Ok(inner.finish())
    }

    /// Swap two upcoming tracks
    pub fn swap(&self, i: usize, j: usize) -> Result<Snapshot> {
        let mut inner = self.lock();
        inner.queue.swap(i, j)?;
        inner.push_queue_changed();
        Ok(inner.finish())
    }

    /// Remove matching tracks from history and upcoming
    ///
    /// The current track is never removed; removing it requires an
    /// explicit skip or stop. Returns how many tracks were removed.
    pub fn remove(&self, ids: &HashSet<TrackId>) -> Result<(usize, Snapshot)> {
        let mut inner = self.lock();
        let removed = inner.queue.remove(ids);
        debug!(removed, "removed tracks from queue");
        if removed > 0 {
            inner.push_queue_changed();
        }
        Ok((removed, inner.finish()))
    }

    /// Empty history and upcoming; the current track keeps playing
    pub fn clear(&self) -> Result<Snapshot> {
        let mut inner = self.lock();
        inner.queue.clear();
        inner.push_queue_changed();
        Ok(inner.finish())
    }

    /// Uniformly permute upcoming
    pub fn shuffle_upcoming(&self) -> Result<Snapshot> {
        let mut inner = self.lock();
        inner.queue.shuffle_upcoming();
        inner.push_queue_changed();
        Ok(inner.finish())
    }

    /// Uniformly permute history
    pub fn shuffle_history(&self) -> Result<Snapshot> {
        let mut inner = self.lock();
        inner.queue.shuffle_history();
        inner.push_queue_changed();
        Ok(inner.finish())
    }

    /// Permute upcoming and history independently
    pub fn shuffle_all(&self) -> Result<Snapshot> {
        let mut inner = self.lock();
        inner.queue.shuffle_all();
        inner.push_queue_changed();
        Ok(inner.finish())
    }

    /// Set the repeat mode; takes effect on the next advancement
    pub fn set_repeat_mode(&self, mode: RepeatMode) -> Result<Snapshot> {
        let mut inner = self.lock();
        inner.queue.set_repeat_mode(mode);
        inner
            .pending_events
            .push(PlaybackEvent::RepeatModeChanged { mode });
        Ok(inner.finish())
    }

    // ===== Tuning =====

    /// Set the volume scalar, per the configured out-of-range policy
    pub fn set_volume(&self, volume: f32) -> Result<Snapshot> {
        let mut inner = self.lock();
        let applied = inner.tuning.set_volume(volume)?;
        inner.renderer.set_volume(applied);
        inner
            .pending_events
            .push(PlaybackEvent::VolumeChanged { volume: applied });
        Ok(inner.finish())
    }

    /// Replace the filter chain atomically; an empty chain is bypass
    pub fn set_filters(&self, chain: Vec<FilterSpec>) -> Result<Snapshot> {
        let mut inner = self.lock();
        inner.tuning.set_filters(chain)?;
        let chain_len = inner.tuning.filters().len();
        let filters = inner.tuning.filters().to_vec();
        inner.renderer.set_filters(&filters);
        inner
            .pending_events
            .push(PlaybackEvent::FiltersChanged { chain_len });
        Ok(inner.finish())
    }

    // ===== Queries =====

    /// Read-only snapshot of the session
    ///
    /// May be called concurrently with in-flight position advancement; the
    /// position is derived from the monotonic clock at read time.
    pub fn snapshot(&self) -> Snapshot {
        self.lock().snapshot()
    }

    /// Drain events accumulated since the last call
    pub fn take_events(&self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.lock().pending_events)
    }
}

impl Inner {
    fn current_id(&self) -> Option<TrackId> {
        self.queue.current().map(|t| t.id.clone())
    }

    fn resume(&mut self) -> Result<()> {
        self.transport.resume()?;
        self.renderer.set_paused(false);
        self.push_state_changed();
        Ok(())
    }

    /// Repeat-aware advancement shared by `next`, seek-past-end, and
    /// completion callbacks
    fn advance_queue(&mut self) {
        let previous_id = self.current_id();

        if self.queue.advance().is_some() {
            self.transport.restart();
            self.notify_track_loaded(previous_id);
        } else {
            self.transport.stop();
            self.renderer.unload();
            self.push_state_changed();
        }
    }

    /// Tell the renderer about a freshly loaded current track and emit the
    /// matching events
    fn notify_track_loaded(&mut self, previous_id: Option<TrackId>) {
        if let Some(track) = self.queue.current().cloned() {
            self.renderer.load(&track);
            self.pending_events.push(PlaybackEvent::TrackChanged {
                track_id: track.id.to_string(),
                previous_track_id: previous_id.map(|id| id.to_string()),
            });
        }
        self.push_state_changed();
    }

    fn push_state_changed(&mut self) {
        self.pending_events.push(PlaybackEvent::StateChanged {
            status: self.transport.status(),
        });
    }

    fn push_queue_changed(&mut self) {
        self.pending_events.push(PlaybackEvent::QueueChanged {
            upcoming_len: self.queue.upcoming_len(),
            history_len: self.queue.history_len(),
        });
    }

    /// Post-command snapshot for the presentation collaborator
    fn finish(&self) -> Snapshot {
        self.snapshot()
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            status: self.transport.status(),
            track: self.queue.current().cloned(),
            position_ms: self.transport.position_ms(),
            upcoming: self
                .queue
                .upcoming()
                .take(self.config.snapshot_upcoming)
                .cloned()
                .collect(),
            repeat_mode: self.queue.repeat_mode(),
            volume: self.tuning.volume(),
        }
    }
}
