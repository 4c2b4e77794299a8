// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scripted playback scenarios that exercise the tracing pipeline.
//!
//! Runs the media controller against the simulated host under a few
//! environments and autoplay policies, printing every controller event with a
//! [`PrettyPrintSink`] while a [`RecorderSink`] collects them. The recording
//! is exported as `playback_trace.json`.

use std::fs::File;
use std::io::BufWriter;
use std::time::Duration;

use vitrine_core::controller::PlaybackEvent;
use vitrine_core::env::EnvironmentSnapshot;
use vitrine_core::media::{InteractionKind, PlayRejected, ReadyState};
use vitrine_core::trace::{
    AttemptsResetEvent, DeadlineEvent, EnvironmentEvent, PlayAttemptEvent, PlayOutcomeEvent,
    TraceSink, TransitionEvent,
};
use vitrine_debug::pretty::PrettyPrintSink;
use vitrine_debug::recorder::RecorderSink;
use vitrine_sim::{PlayPolicy, Simulation};

/// Forwards every event to the pretty printer and the recorder.
struct Tee {
    pretty: PrettyPrintSink,
    recorder: RecorderSink,
}

impl TraceSink for Tee {
    fn on_environment(&mut self, e: &EnvironmentEvent) {
        self.pretty.on_environment(e);
        self.recorder.on_environment(e);
    }

    fn on_transition(&mut self, e: &TransitionEvent) {
        self.pretty.on_transition(e);
        self.recorder.on_transition(e);
    }

    fn on_play_attempt(&mut self, e: &PlayAttemptEvent) {
        self.pretty.on_play_attempt(e);
        self.recorder.on_play_attempt(e);
    }

    fn on_play_outcome(&mut self, e: &PlayOutcomeEvent) {
        self.pretty.on_play_outcome(e);
        self.recorder.on_play_outcome(e);
    }

    fn on_attempts_reset(&mut self, e: &AttemptsResetEvent) {
        self.pretty.on_attempts_reset(e);
        self.recorder.on_attempts_reset(e);
    }

    fn on_deadline(&mut self, e: &DeadlineEvent) {
        self.pretty.on_deadline(e);
        self.recorder.on_deadline(e);
    }
}

const DESKTOP: EnvironmentSnapshot = EnvironmentSnapshot {
    is_mobile: false,
    is_slow_connection: false,
    prefers_reduced_motion: false,
};

fn simulation(policy: PlayPolicy, recorder: &RecorderSink) -> Simulation {
    let mut sim = Simulation::new(policy);
    sim.controller.set_trace_sink(Box::new(Tee {
        pretty: PrettyPrintSink::new(Box::new(std::io::stdout())),
        recorder: recorder.clone(),
    }));
    sim
}

fn autoplay_allowed(recorder: &RecorderSink) -> Simulation {
    let mut sim = simulation(PlayPolicy::Accept, recorder);
    sim.start(&DESKTOP);
    sim.dispatch(PlaybackEvent::LoadedMetadata);
    sim.dispatch(PlaybackEvent::CanPlay);
    sim.advance(Duration::from_secs(6));
    sim
}

fn blocked_until_interaction(recorder: &RecorderSink) -> Simulation {
    let mut sim = simulation(PlayPolicy::Reject(PlayRejected::NotAllowed), recorder);
    sim.start(&DESKTOP);
    sim.host.surface.ready_state = ReadyState::HaveEnoughData;
    sim.dispatch(PlaybackEvent::CanPlay);
    sim.advance(Duration::from_secs(2));
    sim.host.set_policy(PlayPolicy::Accept);
    sim.dispatch(PlaybackEvent::Interaction(InteractionKind::TouchStart));
    sim.advance(Duration::from_secs(4));
    sim
}

fn reduced_motion(recorder: &RecorderSink) -> Simulation {
    let mut sim = simulation(PlayPolicy::Accept, recorder);
    sim.start(&EnvironmentSnapshot {
        prefers_reduced_motion: true,
        ..DESKTOP
    });
    sim.advance(Duration::from_secs(6));
    sim
}

fn stalled_network(recorder: &RecorderSink) -> Simulation {
    let mut sim = simulation(PlayPolicy::Reject(PlayRejected::Aborted), recorder);
    sim.start(&EnvironmentSnapshot {
        is_mobile: true,
        ..DESKTOP
    });
    sim.host.surface.ready_state = ReadyState::HaveMetadata;
    sim.advance(Duration::from_secs(6));
    sim
}

type Scenario = fn(&RecorderSink) -> Simulation;

fn main() {
    let scenarios: [(&str, Scenario); 4] = [
        ("autoplay allowed", autoplay_allowed),
        ("blocked until interaction", blocked_until_interaction),
        ("reduced motion", reduced_motion),
        ("stalled network", stalled_network),
    ];

    let recorder = RecorderSink::new();
    for (name, run) in scenarios {
        println!("== {name} ==");
        let sim = run(&recorder);
        let report = sim.host.report();
        println!(
            "-> state={:?} plays={} accepted={} rejected={} fallback_visible={}\n",
            sim.controller.state(),
            report.play_requests,
            report.plays_accepted,
            report.plays_rejected,
            sim.host.fallback.is_visible(),
        );
    }

    let path = "playback_trace.json";
    let file = File::create(path).expect("failed to create playback_trace.json");
    let mut writer = BufWriter::new(file);
    vitrine_debug::export::export_json(&recorder.events(), &mut writer)
        .expect("failed to write playback trace");

    println!("Wrote {path} ({} events)", recorder.len());
}
