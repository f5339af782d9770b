//! Collaborator traits at the controller boundary
//!
//! Audio decoding/output and track search live outside this crate. The
//! controller talks to them through these traits; platform code provides
//! the implementations.

use crate::error::Result;
use crate::tuning::FilterSpec;
use crate::types::Track;

/// External audio renderer
///
/// Receives state the controller has already committed. Calls are plain
/// in-memory notifications by contract: a renderer queues real I/O on its
/// own thread rather than blocking the controller lock. When a track ends
/// naturally the platform calls `Controller::on_playback_complete`, which
/// advances the queue.
pub trait Renderer: Send {
    /// A new track was loaded as current; start decoding it from zero
    fn load(&mut self, track: &Track);

    /// Playback stopped; release the active source
    fn unload(&mut self);

    /// Position changed within the current track
    fn seek(&mut self, position_ms: u64);

    /// Playback paused (true) or resumed (false)
    fn set_paused(&mut self, paused: bool);

    /// Volume scalar changed
    fn set_volume(&mut self, volume: f32);

    /// Filter chain replaced
    fn set_filters(&mut self, chain: &[FilterSpec]);
}

/// External track search/resolve collaborator
///
/// Turns a user query into a playable [`Track`]. Implemented by platform
/// code against whatever lookup backend it has; the core never calls this
/// itself.
pub trait TrackResolver {
    fn resolve(&self, query: &str) -> Result<Track>;
}

/// Renderer that ignores every notification
///
/// For sessions without an attached output (and for tests).
#[derive(Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn load(&mut self, _track: &Track) {}
    fn unload(&mut self) {}
    fn seek(&mut self, _position_ms: u64) {}
    fn set_paused(&mut self, _paused: bool) {}
    fn set_volume(&mut self, _volume: f32) {}
    fn set_filters(&mut self, _chain: &[FilterSpec]) {}
}
