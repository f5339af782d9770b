//! Shuffle helpers for queue randomization
//!
//! Uniform Fisher-Yates permutation over one segment of the queue at a time.
//! History and upcoming are always shuffled independently so a track that
//! already played is never permuted into the future queue.

use crate::types::Track;
use rand::seq::SliceRandom;
use rand::thread_rng;
use std::collections::VecDeque;

/// Uniformly permute a slice of tracks in place
pub fn shuffle_tracks(tracks: &mut [Track]) {
    let mut rng = thread_rng();
    tracks.shuffle(&mut rng);
}

/// Uniformly permute a deque of tracks in place
///
/// `VecDeque` has no in-place shuffle; `make_contiguous` exposes the
/// underlying slice without reallocating.
pub fn shuffle_deque(tracks: &mut VecDeque<Track>) {
    shuffle_tracks(tracks.make_contiguous());
}
