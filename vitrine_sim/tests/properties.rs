// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end controller behavior against the simulated host.

use std::time::Duration;

use vitrine_core::controller::{PlaybackEvent, PlaybackState, ResetTrigger, StartOutcome};
use vitrine_core::env::{
    ConnectionHint, EffectiveConnectionType, EnvironmentSignals, EnvironmentSnapshot, classify,
};
use vitrine_core::media::{FallbackDisplay, InteractionKind, PlayRejected, ReadyState};
use vitrine_debug::recorder::{RecordedEvent, RecorderSink};
use vitrine_sim::{PlayPolicy, Simulation};

const DESKTOP: EnvironmentSnapshot = EnvironmentSnapshot {
    is_mobile: false,
    is_slow_connection: false,
    prefers_reduced_motion: false,
};

fn traced(policy: PlayPolicy) -> (Simulation, RecorderSink) {
    let mut sim = Simulation::new(policy);
    let recorder = RecorderSink::new();
    sim.controller.set_trace_sink(Box::new(recorder.clone()));
    (sim, recorder)
}

/// Starts a desktop session whose play commands are always rejected and runs
/// it until the attempt budget is spent.
fn exhausted() -> (Simulation, RecorderSink) {
    let (mut sim, recorder) = traced(PlayPolicy::Reject(PlayRejected::NotAllowed));
    sim.start(&DESKTOP);
    sim.dispatch(PlaybackEvent::CanPlay);
    sim.advance(Duration::from_secs(2));
    assert_eq!(sim.controller.attempts(), 3, "budget spent");
    (sim, recorder)
}

#[test]
fn reduced_motion_shows_fallback_without_attempts() {
    for is_mobile in [false, true] {
        for is_slow_connection in [false, true] {
            let env = EnvironmentSnapshot {
                is_mobile,
                is_slow_connection,
                prefers_reduced_motion: true,
            };
            let mut sim = Simulation::new(PlayPolicy::Accept);
            assert_eq!(sim.start(&env), StartOutcome::MotionDisabled);
            sim.dispatch(PlaybackEvent::CanPlay);
            sim.dispatch(PlaybackEvent::Interaction(InteractionKind::Click));
            sim.advance(Duration::from_secs(10));

            assert!(!sim.host.surface.visible, "surface hidden for {env:?}");
            assert_eq!(sim.host.fallback.display, Some(FallbackDisplay::Shown));
            assert_eq!(sim.host.report().play_requests, 0, "{env:?}");
            assert_eq!(sim.host.surface.source, None, "no source attached");
        }
    }
}

#[test]
fn slow_mobile_shows_fallback_without_attempts() {
    let signals = EnvironmentSignals {
        viewport_width: 390.0,
        user_agent: "Mozilla/5.0 (Linux; Android 14; Pixel 8)".into(),
        connection: Some(ConnectionHint {
            save_data: Some(false),
            effective_type: Some(EffectiveConnectionType::TwoG),
        }),
        prefers_reduced_motion: false,
    };
    let env = classify(&signals);
    assert!(env.is_mobile && env.is_slow_connection, "{env:?}");

    let mut sim = Simulation::new(PlayPolicy::Accept);
    assert_eq!(sim.start(&env), StartOutcome::MotionDisabled);
    sim.advance(Duration::from_secs(10));

    assert!(!sim.host.surface.visible, "surface hidden");
    assert!(sim.host.fallback.is_visible(), "fallback visible");
    assert_eq!(sim.host.report().play_requests, 0);
    assert_eq!(sim.controller.state(), PlaybackState::FallbackShown);
}

#[test]
fn rejections_stop_after_three_attempts() {
    let (mut sim, recorder) = traced(PlayPolicy::Reject(PlayRejected::NotAllowed));
    sim.start(&DESKTOP);

    // Five independent play triggers, each of which ends in a rejection when
    // it gets through.
    for _ in 0..5 {
        sim.dispatch(PlaybackEvent::CanPlay);
        sim.advance(Duration::from_millis(250));
    }
    sim.advance(Duration::from_secs(10));

    assert_eq!(sim.host.report().play_requests, 3);
    assert_eq!(sim.host.report().plays_rejected, 3);
    assert_eq!(recorder.play_attempts(), 3);
    assert_eq!(sim.controller.attempts(), 3);
    assert_eq!(sim.host.pending_wakes(), 0, "nothing left scheduled");
}

#[test]
fn retry_recovers_after_transient_rejection() {
    let mut sim = Simulation::new(PlayPolicy::RejectFirst(2));
    sim.start(&DESKTOP);
    sim.dispatch(PlaybackEvent::CanPlay);
    assert_eq!(sim.controller.state(), PlaybackState::Loading);

    // Bootstrap and retry wakes keep trying.
    sim.advance(Duration::from_millis(400));
    assert_eq!(sim.controller.state(), PlaybackState::Playing);
    assert!(sim.host.surface.playing, "playing class");
    assert!(!sim.host.surface.loading, "loading class cleared");
    assert_eq!(sim.host.fallback.display, Some(FallbackDisplay::Hidden));
    assert_eq!(sim.host.report().play_requests, 3);
}

#[test]
fn visibility_resets_exhausted_counter() {
    let (mut sim, recorder) = exhausted();
    let before = sim.host.report().play_requests;

    sim.set_hidden(true);
    assert_eq!(sim.host.report().play_requests, before, "hidden: nothing");

    recorder.clear();
    sim.set_hidden(false);
    assert_eq!(sim.host.report().play_requests, before + 1, "new attempt");
    assert_eq!(
        recorder.events()[0],
        RecordedEvent::AttemptsReset {
            trigger: ResetTrigger::Visible,
            previous_attempts: 3,
        }
    );
    assert_eq!(sim.controller.attempts(), 1, "counted from zero");
}

#[test]
fn visibility_while_playing_keeps_counter() {
    let (mut sim, recorder) = traced(PlayPolicy::Accept);
    sim.start(&DESKTOP);
    sim.dispatch(PlaybackEvent::CanPlay);
    sim.advance(Duration::from_secs(1));
    assert_eq!(sim.controller.state(), PlaybackState::Playing);
    let attempts = sim.controller.attempts();
    let before = sim.host.report().play_requests;
    recorder.clear();

    sim.set_hidden(true);
    sim.set_hidden(false);

    assert_eq!(sim.host.report().play_requests, before, "no new attempt");
    assert_eq!(sim.controller.attempts(), attempts, "counter untouched");
    assert_eq!(recorder.resets(), 0, "no reset while playing");
}

#[test]
fn first_interaction_fires_once() {
    let (mut sim, recorder) = exhausted();
    let before = sim.host.report().play_requests;
    recorder.clear();

    sim.dispatch(PlaybackEvent::Interaction(InteractionKind::Click));
    sim.dispatch(PlaybackEvent::Interaction(InteractionKind::Scroll));

    assert_eq!(recorder.resets(), 1);
    assert_eq!(sim.host.report().play_requests, before + 1);
    assert!(!sim.host.interaction_listeners, "listeners detached");

    // Even if a stale listener delivered another event, the controller
    // ignores it.
    sim.controller.handle_event(
        PlaybackEvent::Interaction(InteractionKind::TouchEnd),
        &mut sim.host,
    );
    assert_eq!(recorder.resets(), 1);
}

#[test]
fn interaction_detaches_when_already_playing() {
    let mut sim = Simulation::new(PlayPolicy::Accept);
    sim.start(&DESKTOP);
    sim.dispatch(PlaybackEvent::CanPlay);
    assert!(sim.controller.is_playing(), "autoplay allowed");

    // Surface is already playing, so the interaction attempt is a no-op,
    // but the listener still goes away.
    let before = sim.host.report().play_requests;
    sim.dispatch(PlaybackEvent::Interaction(InteractionKind::TouchStart));
    assert_eq!(sim.host.report().play_requests, before);
    assert!(sim.controller.has_interacted(), "flag set");
    assert!(!sim.host.interaction_listeners, "listeners detached");
}

#[test]
fn near_end_time_update_loops_to_start() {
    let mut sim = Simulation::new(PlayPolicy::Accept);
    sim.start(&DESKTOP);
    sim.host.surface.duration = 30.0;
    sim.host.surface.current_time = 30.0 - 0.1;

    sim.dispatch(PlaybackEvent::TimeUpdate);
    assert_eq!(sim.host.surface.current_time, 0.0);
}

#[test]
fn deadline_reveals_fallback_when_data_is_short() {
    let (mut sim, recorder) = traced(PlayPolicy::Reject(PlayRejected::NotAllowed));
    sim.start(&DESKTOP);
    sim.host.surface.ready_state = ReadyState::HaveMetadata;

    sim.advance(Duration::from_millis(4999));
    assert!(!sim.host.fallback.opaque, "not yet");

    sim.advance(Duration::from_millis(1));
    assert!(sim.host.fallback.opaque, "fallback fully visible");
    assert!(sim.host.surface.visible, "surface not hidden outright");
    assert!(!sim.host.surface.loading, "loading indicator cleared");
    assert_eq!(sim.controller.state(), PlaybackState::FallbackShown);
    assert!(
        recorder.events().contains(&RecordedEvent::Deadline {
            ready_state: ReadyState::HaveMetadata,
            fallback_revealed: true,
        }),
        "deadline traced"
    );
}

#[test]
fn playback_after_deadline_hides_fallback() {
    let mut sim = Simulation::new(PlayPolicy::Reject(PlayRejected::NotAllowed));
    sim.start(&DESKTOP);
    sim.advance(Duration::from_secs(6));
    assert_eq!(sim.controller.state(), PlaybackState::FallbackShown);

    sim.host.set_policy(PlayPolicy::Accept);
    sim.dispatch(PlaybackEvent::Interaction(InteractionKind::Click));
    assert_eq!(sim.controller.state(), PlaybackState::Playing);
    assert_eq!(sim.host.fallback.display, Some(FallbackDisplay::Hidden));
}

#[test]
fn unexpected_pause_resumes_on_next_frame() {
    let mut sim = Simulation::new(PlayPolicy::Accept);
    sim.start(&DESKTOP);
    sim.dispatch(PlaybackEvent::CanPlay);
    assert_eq!(sim.host.report().play_requests, 1);

    sim.external_pause();
    assert_eq!(sim.controller.state(), PlaybackState::Paused);
    assert_eq!(sim.host.report().frame_requests, 1);

    sim.advance(Duration::from_millis(20));
    assert_eq!(sim.host.report().play_requests, 2, "resumed on next frame");
    assert_eq!(sim.controller.state(), PlaybackState::Playing);
}

#[test]
fn bootstrap_wakes_start_playback_without_media_events() {
    let mut sim = Simulation::new(PlayPolicy::Accept);
    let env = EnvironmentSnapshot {
        is_mobile: true,
        ..DESKTOP
    };
    sim.start(&env);
    assert_eq!(
        sim.host.surface.source.map(|s| s.url),
        Some("/static/background-mobile.mp4")
    );
    assert_eq!(sim.host.surface.loads, 1);

    sim.advance(Duration::from_millis(100));
    assert!(sim.controller.is_playing(), "first bootstrap wake plays");

    sim.advance(Duration::from_millis(400));
    assert_eq!(sim.host.report().play_requests, 1, "second wake is a no-op");
}
