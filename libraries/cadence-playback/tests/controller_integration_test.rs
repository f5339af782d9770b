//! Controller integration tests
//!
//! End-to-end transport scenarios through the public API, with a recording
//! renderer standing in for the platform audio layer.

use cadence_playback::{
    Command, Controller, FilterSpec, PlaybackError, PlaybackEvent, PlaybackStatus, PlayerConfig,
    Renderer, SourceRef, Track, TrackId, VolumePolicy,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ===== Test Helpers =====

fn create_track(id: &str, duration_ms: u64) -> Track {
    let mut track = Track::new(
        id,
        Duration::from_millis(duration_ms),
        SourceRef::Url(format!("https://tracks.example/{}", id)),
    );
    track.title = Some(format!("Title {}", id));
    track.artist = Some("Test Artist".to_string());
    track
}

/// Renderer that records every notification it receives
#[derive(Debug, Clone, Default)]
struct RecordingRenderer {
    calls: Arc<Mutex<Vec<String>>>,
}

impl RecordingRenderer {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Renderer for RecordingRenderer {
    fn load(&mut self, track: &Track) {
        self.calls.lock().unwrap().push(format!("load:{}", track.id));
    }

    fn unload(&mut self) {
        self.calls.lock().unwrap().push("unload".to_string());
    }

    fn seek(&mut self, position_ms: u64) {
        self.calls.lock().unwrap().push(format!("seek:{}", position_ms));
    }

    fn set_paused(&mut self, paused: bool) {
        self.calls.lock().unwrap().push(format!("paused:{}", paused));
    }

    fn set_volume(&mut self, volume: f32) {
        self.calls.lock().unwrap().push(format!("volume:{}", volume));
    }

    fn set_filters(&mut self, chain: &[FilterSpec]) {
        self.calls
            .lock()
            .unwrap()
            .push(format!("filters:{}", chain.len()));
    }
}

fn controller_with_renderer() -> (Controller, RecordingRenderer) {
    let renderer = RecordingRenderer::default();
    let controller = Controller::new(PlayerConfig::default(), Box::new(renderer.clone()));
    (controller, renderer)
}

// ===== Transport Scenarios =====

#[test]
fn test_full_playback_lifecycle() {
    let (controller, renderer) = controller_with_renderer();

    let snapshot = controller.play(Some(create_track("a", 180_000))).unwrap();
    assert_eq!(snapshot.status, PlaybackStatus::Playing);

    controller.pause().unwrap();
    controller.resume().unwrap();
    let snapshot = controller.stop().unwrap();
    assert_eq!(snapshot.status, PlaybackStatus::Stopped);
    assert!(snapshot.track.is_none());

    assert_eq!(
        renderer.calls(),
        vec!["load:a", "paused:true", "paused:false", "unload"]
    );
}

#[test]
fn test_position_advances_while_playing() {
    let (controller, _) = controller_with_renderer();
    controller.play(Some(create_track("a", 180_000))).unwrap();

    std::thread::sleep(Duration::from_millis(30));
    let snapshot = controller.snapshot();
    assert!(snapshot.position_ms >= 30, "position did not advance");
    assert_eq!(snapshot.status, PlaybackStatus::Playing);
}

#[test]
fn test_position_frozen_while_paused() {
    let (controller, _) = controller_with_renderer();
    controller.play(Some(create_track("a", 180_000))).unwrap();
    controller.pause().unwrap();

    let first = controller.snapshot().position_ms;
    std::thread::sleep(Duration::from_millis(30));
    let second = controller.snapshot().position_ms;
    assert_eq!(first, second, "position moved while paused");
}

#[test]
fn test_seek_completion_scenario() {
    // current=A(duration=1000ms), seekTo(1500) is equivalent to next()
    let (controller, _) = controller_with_renderer();
    controller.play(Some(create_track("a", 1000))).unwrap();
    controller.enqueue(create_track("b", 1000)).unwrap();

    let snapshot = controller.seek_to_ms(1500).unwrap();
    assert_eq!(snapshot.track.unwrap().id.as_str(), "b");
    assert_eq!(snapshot.position_ms, 0);

    // a ended up in history
    let snapshot = controller.previous().unwrap();
    assert_eq!(snapshot.track.unwrap().id.as_str(), "a");
}

#[test]
fn test_seek_exactly_at_duration_is_not_completion() {
    let (controller, _) = controller_with_renderer();
    controller.play(Some(create_track("a", 1000))).unwrap();
    controller.enqueue(create_track("b", 1000)).unwrap();
    controller.pause().unwrap();

    let snapshot = controller.seek_to_ms(1000).unwrap();
    assert_eq!(snapshot.track.unwrap().id.as_str(), "a");
    assert_eq!(snapshot.position_ms, 1000);
}

#[test]
fn test_next_then_previous_restores_track() {
    let (controller, _) = controller_with_renderer();
    controller.play(Some(create_track("a", 1000))).unwrap();
    controller.enqueue(create_track("b", 1000)).unwrap();

    let snapshot = controller.next().unwrap();
    assert_eq!(snapshot.track.unwrap().id.as_str(), "b");

    let snapshot = controller.previous().unwrap();
    assert_eq!(snapshot.track.as_ref().unwrap().id.as_str(), "a");
    assert_eq!(snapshot.position_ms, 0);
    // b is next again
    assert_eq!(snapshot.upcoming[0].id.as_str(), "b");
}

#[test]
fn test_skip_to_moves_skipped_tracks_to_history() {
    let (controller, renderer) = controller_with_renderer();
    controller.play(Some(create_track("a", 1000))).unwrap();
    for id in ["b", "c", "d"] {
        controller.enqueue(create_track(id, 1000)).unwrap();
    }

    let snapshot = controller.skip_to(&TrackId::from("d")).unwrap();
    assert_eq!(snapshot.track.unwrap().id.as_str(), "d");
    assert!(snapshot.upcoming.is_empty());
    assert!(renderer.calls().contains(&"load:d".to_string()));

    // History is [a, b, c]: previous steps back to c
    let snapshot = controller.previous().unwrap();
    assert_eq!(snapshot.track.unwrap().id.as_str(), "c");
}

#[test]
fn test_stop_while_seeking_wins() {
    // A later command supersedes an earlier one: the last write under the
    // session lock determines the final state.
    let (controller, _) = controller_with_renderer();
    controller.play(Some(create_track("a", 60_000))).unwrap();

    controller.seek_to_ms(30_000).unwrap();
    let snapshot = controller.stop().unwrap();

    assert_eq!(snapshot.status, PlaybackStatus::Stopped);
    assert_eq!(snapshot.position_ms, 0);
    assert!(snapshot.track.is_none());
}

// ===== Repeat Scenarios =====

#[test]
fn test_repeat_queue_exhaustion_scenario() {
    // repeatMode=Queue, upcoming=[], history=[A,B], current=C:
    // next() drains history (with C appended) back into upcoming
    let (controller, _) = controller_with_renderer();
    controller.play(Some(create_track("a", 1000))).unwrap();
    controller.enqueue(create_track("b", 1000)).unwrap();
    controller.enqueue(create_track("c", 1000)).unwrap();
    controller.next().unwrap(); // current=b, history=[a]
    controller.next().unwrap(); // current=c, history=[a,b]
    controller
        .apply(Command::SetRepeatMode(cadence_playback::RepeatMode::Queue))
        .unwrap();

    let snapshot = controller.next().unwrap();
    assert_eq!(snapshot.track.unwrap().id.as_str(), "a");
    assert_eq!(snapshot.upcoming[0].id.as_str(), "b");
    assert_eq!(snapshot.upcoming[1].id.as_str(), "c");
}

#[test]
fn test_repeat_track_scenario() {
    // repeatMode=Track, current=A, next() reloads A at position 0
    let (controller, _) = controller_with_renderer();
    controller.play(Some(create_track("a", 1000))).unwrap();
    controller.enqueue(create_track("b", 1000)).unwrap();
    controller
        .apply(Command::SetRepeatMode(cadence_playback::RepeatMode::Track))
        .unwrap();

    let snapshot = controller.on_playback_complete().unwrap();
    assert_eq!(snapshot.track.unwrap().id.as_str(), "a");
    assert_eq!(snapshot.position_ms, 0);
    assert_eq!(snapshot.upcoming.len(), 1);
}

// ===== Tuning =====

#[test]
fn test_volume_reaches_renderer() {
    let (controller, renderer) = controller_with_renderer();
    controller.set_volume(0.25).unwrap();
    assert!(renderer.calls().contains(&"volume:0.25".to_string()));
}

#[test]
fn test_strict_volume_policy_never_touches_renderer() {
    let renderer = RecordingRenderer::default();
    let config = PlayerConfig {
        volume_policy: VolumePolicy::Strict,
        ..Default::default()
    };
    let controller = Controller::new(config, Box::new(renderer.clone()));

    let err = controller.set_volume(9.0).unwrap_err();
    assert!(matches!(err, PlaybackError::Validation(_)));
    assert!(renderer.calls().is_empty());
}

#[test]
fn test_filter_chain_replacement_is_atomic() {
    let (controller, renderer) = controller_with_renderer();
    controller
        .set_filters(vec![FilterSpec::LowPass { smoothing: 15.0 }])
        .unwrap();

    // Invalid chain rejected wholesale; renderer keeps the old one
    let result = controller.set_filters(vec![
        FilterSpec::Rotation { rotation_hz: 0.2 },
        FilterSpec::LowPass { smoothing: 0.5 },
    ]);
    assert!(result.is_err());

    // Bypass is valid
    controller.set_filters(vec![]).unwrap();
    assert_eq!(renderer.calls(), vec!["filters:1", "filters:0"]);
}

// ===== Events =====

#[test]
fn test_track_change_events_carry_previous_id() {
    let (controller, _) = controller_with_renderer();
    controller.play(Some(create_track("a", 1000))).unwrap();
    controller.enqueue(create_track("b", 1000)).unwrap();
    controller.take_events();

    controller.next().unwrap();
    let events = controller.take_events();

    let changed = events
        .iter()
        .find_map(|e| match e {
            PlaybackEvent::TrackChanged {
                track_id,
                previous_track_id,
            } => Some((track_id.clone(), previous_track_id.clone())),
            _ => None,
        })
        .expect("no TrackChanged event");
    assert_eq!(changed.0, "b");
    assert_eq!(changed.1.as_deref(), Some("a"));
}

#[test]
fn test_exhausted_queue_emits_stopped() {
    let (controller, _) = controller_with_renderer();
    controller.play(Some(create_track("a", 1000))).unwrap();
    controller.take_events();

    controller.on_playback_complete().unwrap();
    let events = controller.take_events();

    assert!(events.iter().any(|e| matches!(
        e,
        PlaybackEvent::TrackFinished { track_id } if track_id == "a"
    )));
    assert!(events.iter().any(|e| matches!(
        e,
        PlaybackEvent::StateChanged {
            status: PlaybackStatus::Stopped
        }
    )));
}
