// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adaptive background-media controller.
//!
//! [`PlaybackController`] decides whether to show motion media or a static
//! fallback, then keeps motion media playing. It is an explicit state machine
//! driven by three kinds of input, all delivered by the host:
//!
//! ```text
//!   Idle ── start, motion disabled ───────────► FallbackShown (terminal)
//!   Idle ── start ────────────────────────────► Loading
//!   Loading | Paused | FallbackShown ── play ok ──► Playing
//!   Playing ── pause ─────────────────────────► Paused
//!   any but Playing ── deadline, little data ─► FallbackShown
//! ```
//!
//! - [`PlaybackEvent`]s from the media surface and the document.
//! - [`Wake`]s from timers and animation frames the controller scheduled.
//! - Play outcomes via [`on_play_resolved`](PlaybackController::on_play_resolved).
//!
//! # Attempts
//!
//! Every automatic play command counts against
//! [`PlaybackConfig::max_attempts`]. A rejected command is retried after
//! [`PlaybackConfig::retry_delay`] until the cap is reached; after that
//! nothing is attempted until a [`ResetTrigger`] (tab becomes visible while
//! paused, or the first user interaction) zeroes the counter.
//!
//! Timer and frame wakes are never cancelled. Each one re-checks the paused
//! flag and the counter when it fires, so overlapping wakes are harmless.

use alloc::boxed::Box;

use crate::config::PlaybackConfig;
use crate::env::EnvironmentSnapshot;
use crate::media::{
    FallbackDisplay, InteractionKind, MediaHost, PlayRejected, ReadyState, SurfaceClass, Wake,
};
use crate::trace::{
    AttemptsResetEvent, DeadlineEvent, EnvironmentEvent, PlayAttemptEvent, PlayOutcomeEvent,
    TraceSink, Tracer, TransitionEvent,
};

/// Controller state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlaybackState {
    /// Not started yet.
    Idle,
    /// Source attached, waiting for playback to begin.
    Loading,
    /// Playback is running.
    Playing,
    /// Playback stopped after having run.
    Paused,
    /// The fallback is on display, either permanently (motion disabled) or
    /// because the readiness deadline passed.
    FallbackShown,
}

/// Why a state transition happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionCause {
    /// The environment disallows motion.
    MotionDisabled,
    /// The source was attached and preloading began.
    Preload,
    /// A play command succeeded.
    PlayStarted,
    /// The surface reported a pause.
    Paused,
    /// The readiness deadline passed with too little data.
    Deadline,
}

/// External event that zeroes the attempt counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResetTrigger {
    /// The document became visible while the surface was paused.
    Visible,
    /// The first user interaction on the page.
    FirstInteraction(InteractionKind),
}

/// Result of [`PlaybackController::start`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StartOutcome {
    /// The fallback is shown for the rest of the page load.
    MotionDisabled,
    /// The source is loading; the host should attach its listeners.
    Preloading,
}

/// Events the host forwards from the media surface and the document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlaybackEvent {
    /// `loadedmetadata` on the surface.
    LoadedMetadata,
    /// `canplaythrough` on the surface.
    CanPlayThrough,
    /// `canplay` on the surface.
    CanPlay,
    /// `timeupdate` on the surface.
    TimeUpdate,
    /// `pause` on the surface.
    Pause,
    /// `visibilitychange` on the document.
    VisibilityChange,
    /// A first-interaction candidate on the document.
    Interaction(InteractionKind),
}

/// Adaptive background-media state machine.
///
/// One instance exists per page load. It owns the playback session (attempt
/// counter, interaction flag, state) and commands a [`MediaHost`] it does not
/// own.
#[derive(Debug)]
pub struct PlaybackController {
    config: PlaybackConfig,
    state: PlaybackState,
    motion_enabled: bool,
    attempts: u32,
    has_interacted: bool,
    metadata_seen: bool,
    play_through_seen: bool,
    tracer: Tracer,
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self::new(PlaybackConfig::standard())
    }
}

impl PlaybackController {
    /// Creates an idle controller.
    #[must_use]
    pub const fn new(config: PlaybackConfig) -> Self {
        Self {
            config,
            state: PlaybackState::Idle,
            motion_enabled: true,
            attempts: 0,
            has_interacted: false,
            metadata_seen: false,
            play_through_seen: false,
            tracer: Tracer::none(),
        }
    }

    /// Installs a trace sink. Events are only delivered with the `trace`
    /// feature enabled.
    pub fn set_trace_sink(&mut self, sink: Box<dyn TraceSink>) {
        self.tracer = Tracer::new(sink);
    }

    /// Removes the installed trace sink, if any.
    pub fn take_trace_sink(&mut self) -> Option<Box<dyn TraceSink>> {
        self.tracer.take_sink()
    }

    /// The constants this controller runs with.
    #[must_use]
    pub const fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> PlaybackState {
        self.state
    }

    /// Play attempts made since the last reset.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Whether the first-interaction trigger has fired.
    #[must_use]
    pub const fn has_interacted(&self) -> bool {
        self.has_interacted
    }

    /// Whether playback is running.
    #[must_use]
    pub const fn is_playing(&self) -> bool {
        matches!(self.state, PlaybackState::Playing)
    }

    /// `false` once the environment has disabled motion.
    #[must_use]
    pub const fn motion_enabled(&self) -> bool {
        self.motion_enabled
    }

    /// Runs the initialization contract.
    ///
    /// When the environment disallows motion the surface is hidden, the
    /// fallback shown, and the controller ignores every later input.
    /// Otherwise the source for the device class is attached, loading begins,
    /// and the bootstrap and deadline wakes are scheduled.
    ///
    /// Calling this more than once has no further effect.
    pub fn start(&mut self, env: &EnvironmentSnapshot, host: &mut impl MediaHost) -> StartOutcome {
        if self.state != PlaybackState::Idle {
            return if self.motion_enabled {
                StartOutcome::Preloading
            } else {
                StartOutcome::MotionDisabled
            };
        }

        let motion_allowed = env.allows_motion();
        self.tracer.environment(&EnvironmentEvent {
            snapshot: *env,
            motion_allowed,
        });

        host.configure(&self.config.surface_setup(env));

        if !motion_allowed {
            self.motion_enabled = false;
            host.set_surface_visible(false);
            host.set_fallback(FallbackDisplay::Shown);
            self.transition(PlaybackState::FallbackShown, TransitionCause::MotionDisabled);
            return StartOutcome::MotionDisabled;
        }

        host.attach_source(&self.config.source_for(env));
        host.set_surface_class(SurfaceClass::Loading, true);
        self.transition(PlaybackState::Loading, TransitionCause::Preload);
        host.load();

        for delay in self.config.bootstrap_delays {
            host.schedule(Wake::Bootstrap, delay);
        }
        host.schedule(Wake::Deadline, self.config.deadline);

        StartOutcome::Preloading
    }

    /// Issues a play command if the surface is paused and attempts remain.
    ///
    /// Returns `true` if a command was issued.
    pub fn attempt_play(&mut self, host: &mut impl MediaHost) -> bool {
        if !self.motion_enabled
            || self.state == PlaybackState::Idle
            || !host.is_paused()
            || self.attempts >= self.config.max_attempts
        {
            return false;
        }

        self.attempts += 1;
        host.set_muted(true);
        self.tracer.play_attempt(&PlayAttemptEvent {
            attempt: self.attempts,
            max_attempts: self.config.max_attempts,
        });
        host.request_play();
        true
    }

    /// Handles the outcome of a play command issued by
    /// [`attempt_play`](Self::attempt_play).
    pub fn on_play_resolved(
        &mut self,
        result: Result<(), PlayRejected>,
        host: &mut impl MediaHost,
    ) {
        if !self.motion_enabled {
            return;
        }

        let mut retry_scheduled = false;
        match result {
            Ok(()) => {
                host.set_surface_class(SurfaceClass::Loading, false);
                host.set_surface_class(SurfaceClass::Playing, true);
                host.set_fallback(FallbackDisplay::Hidden);
                self.transition(PlaybackState::Playing, TransitionCause::PlayStarted);
            }
            Err(_) => {
                if self.attempts < self.config.max_attempts {
                    host.schedule(Wake::Retry, self.config.retry_delay);
                    retry_scheduled = true;
                }
            }
        }

        self.tracer.play_outcome(&PlayOutcomeEvent {
            attempt: self.attempts,
            result,
            retry_scheduled,
        });
    }

    /// Reacts to a surface or document event.
    pub fn handle_event(&mut self, event: PlaybackEvent, host: &mut impl MediaHost) {
        if !self.motion_enabled || self.state == PlaybackState::Idle {
            return;
        }

        match event {
            PlaybackEvent::LoadedMetadata => {
                if !self.metadata_seen {
                    self.metadata_seen = true;
                    host.set_surface_class(SurfaceClass::Loading, false);
                }
            }
            PlaybackEvent::CanPlayThrough => {
                if !self.play_through_seen {
                    self.play_through_seen = true;
                    self.attempt_play(host);
                }
            }
            PlaybackEvent::CanPlay => {
                self.attempt_play(host);
            }
            PlaybackEvent::TimeUpdate => {
                let duration = host.duration();
                if duration.is_finite()
                    && duration > 0.0
                    && host.current_time() > duration - self.config.loop_tail
                {
                    host.seek(0.0);
                }
            }
            PlaybackEvent::Pause => {
                if self.state == PlaybackState::Playing {
                    self.transition(PlaybackState::Paused, TransitionCause::Paused);
                }
                if !host.document_hidden() {
                    host.request_frame(Wake::Frame);
                }
            }
            PlaybackEvent::VisibilityChange => {
                if !host.document_hidden() && host.is_paused() {
                    self.reset_attempts(ResetTrigger::Visible);
                    self.attempt_play(host);
                }
            }
            PlaybackEvent::Interaction(kind) => {
                if !self.has_interacted {
                    self.has_interacted = true;
                    self.reset_attempts(ResetTrigger::FirstInteraction(kind));
                    self.attempt_play(host);
                    host.detach_interaction_listeners();
                }
            }
        }
    }

    /// Handles a timer or animation-frame wake scheduled earlier.
    pub fn on_wake(&mut self, wake: Wake, host: &mut impl MediaHost) {
        if !self.motion_enabled || self.state == PlaybackState::Idle {
            return;
        }

        match wake {
            Wake::Retry | Wake::Bootstrap | Wake::Frame => {
                self.attempt_play(host);
            }
            Wake::Deadline => {
                let ready_state = host.ready_state();
                let fallback_revealed = ready_state < ReadyState::HaveFutureData;
                if fallback_revealed {
                    host.set_surface_class(SurfaceClass::Loading, false);
                    host.set_fallback(FallbackDisplay::Opaque);
                    if self.state != PlaybackState::Playing {
                        self.transition(PlaybackState::FallbackShown, TransitionCause::Deadline);
                    }
                }
                self.tracer.deadline(&DeadlineEvent {
                    ready_state,
                    fallback_revealed,
                });
            }
        }
    }

    fn reset_attempts(&mut self, trigger: ResetTrigger) {
        self.tracer.attempts_reset(&AttemptsResetEvent {
            trigger,
            previous_attempts: self.attempts,
        });
        self.attempts = 0;
    }

    fn transition(&mut self, to: PlaybackState, cause: TransitionCause) {
        let from = self.state;
        if from == to {
            return;
        }
        self.state = to;
        self.tracer.transition(&TransitionEvent { from, to, cause });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MediaSource, SurfaceSetup};
    use alloc::vec::Vec;
    use core::time::Duration;

    #[derive(Clone, Debug, PartialEq)]
    enum Call {
        Configure,
        Source(&'static str),
        Load,
        Muted(bool),
        Play,
        Class(SurfaceClass, bool),
        SurfaceVisible(bool),
        Fallback(FallbackDisplay),
        Schedule(Wake, Duration),
        Frame(Wake),
        Seek(f64),
        Detach,
    }

    struct FakeHost {
        paused: bool,
        hidden: bool,
        ready_state: ReadyState,
        current_time: f64,
        duration: f64,
        calls: Vec<Call>,
    }

    impl FakeHost {
        fn new() -> Self {
            Self {
                paused: true,
                hidden: false,
                ready_state: ReadyState::HaveNothing,
                current_time: 0.0,
                duration: f64::NAN,
                calls: Vec::new(),
            }
        }

        fn plays(&self) -> usize {
            self.calls.iter().filter(|c| **c == Call::Play).count()
        }

        fn has(&self, call: &Call) -> bool {
            self.calls.contains(call)
        }
    }

    impl MediaHost for FakeHost {
        fn is_paused(&self) -> bool {
            self.paused
        }
        fn ready_state(&self) -> ReadyState {
            self.ready_state
        }
        fn current_time(&self) -> f64 {
            self.current_time
        }
        fn duration(&self) -> f64 {
            self.duration
        }
        fn seek(&mut self, seconds: f64) {
            self.current_time = seconds;
            self.calls.push(Call::Seek(seconds));
        }
        fn document_hidden(&self) -> bool {
            self.hidden
        }
        fn configure(&mut self, _setup: &SurfaceSetup) {
            self.calls.push(Call::Configure);
        }
        fn attach_source(&mut self, source: &MediaSource) {
            self.calls.push(Call::Source(source.url));
        }
        fn load(&mut self) {
            self.calls.push(Call::Load);
        }
        fn set_muted(&mut self, muted: bool) {
            self.calls.push(Call::Muted(muted));
        }
        fn request_play(&mut self) {
            self.calls.push(Call::Play);
        }
        fn set_surface_class(&mut self, class: SurfaceClass, enabled: bool) {
            self.calls.push(Call::Class(class, enabled));
        }
        fn set_surface_visible(&mut self, visible: bool) {
            self.calls.push(Call::SurfaceVisible(visible));
        }
        fn set_fallback(&mut self, display: FallbackDisplay) {
            self.calls.push(Call::Fallback(display));
        }
        fn schedule(&mut self, wake: Wake, delay: Duration) {
            self.calls.push(Call::Schedule(wake, delay));
        }
        fn request_frame(&mut self, wake: Wake) {
            self.calls.push(Call::Frame(wake));
        }
        fn detach_interaction_listeners(&mut self) {
            self.calls.push(Call::Detach);
        }
    }

    fn desktop() -> EnvironmentSnapshot {
        EnvironmentSnapshot::default()
    }

    fn started(host: &mut FakeHost) -> PlaybackController {
        let mut ctl = PlaybackController::default();
        assert_eq!(ctl.start(&desktop(), host), StartOutcome::Preloading);
        host.calls.clear();
        ctl
    }

    #[test]
    fn reduced_motion_shows_fallback_and_stops() {
        let mut host = FakeHost::new();
        let mut ctl = PlaybackController::default();
        let env = EnvironmentSnapshot {
            prefers_reduced_motion: true,
            ..desktop()
        };

        assert_eq!(ctl.start(&env, &mut host), StartOutcome::MotionDisabled);
        assert!(host.has(&Call::SurfaceVisible(false)), "surface hidden");
        assert!(host.has(&Call::Fallback(FallbackDisplay::Shown)), "fallback");
        assert_eq!(ctl.state(), PlaybackState::FallbackShown);

        ctl.handle_event(PlaybackEvent::CanPlay, &mut host);
        ctl.on_wake(Wake::Bootstrap, &mut host);
        ctl.handle_event(PlaybackEvent::VisibilityChange, &mut host);
        assert_eq!(host.plays(), 0, "no attempt after motion is disabled");
        assert!(
            !host.calls.iter().any(|c| matches!(c, Call::Schedule(..))),
            "nothing scheduled"
        );
    }

    #[test]
    fn start_attaches_source_and_schedules_wakes() {
        let mut host = FakeHost::new();
        let mut ctl = PlaybackController::default();
        let env = EnvironmentSnapshot {
            is_mobile: true,
            ..desktop()
        };
        ctl.start(&env, &mut host);

        assert!(host.has(&Call::Source("/static/background-mobile.mp4")));
        assert!(host.has(&Call::Class(SurfaceClass::Loading, true)));
        assert!(host.has(&Call::Load));
        let scheduled: Vec<_> = host
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::Schedule(w, d) => Some((*w, d.as_millis())),
                _ => None,
            })
            .collect();
        assert_eq!(
            scheduled,
            [
                (Wake::Bootstrap, 100),
                (Wake::Bootstrap, 500),
                (Wake::Deadline, 5000)
            ]
        );
        assert_eq!(ctl.state(), PlaybackState::Loading);
        assert_eq!(host.plays(), 0, "start never plays by itself");
    }

    #[test]
    fn second_start_is_ignored() {
        let mut host = FakeHost::new();
        let mut ctl = started(&mut host);
        assert_eq!(ctl.start(&desktop(), &mut host), StartOutcome::Preloading);
        assert!(host.calls.is_empty(), "no side effects on restart");
    }

    #[test]
    fn attempt_requires_paused_surface() {
        let mut host = FakeHost::new();
        let mut ctl = started(&mut host);
        host.paused = false;
        assert!(!ctl.attempt_play(&mut host), "already playing");
        assert_eq!(ctl.attempts(), 0);
    }

    #[test]
    fn attempt_forces_mute_before_play() {
        let mut host = FakeHost::new();
        let mut ctl = started(&mut host);
        assert!(ctl.attempt_play(&mut host), "attempt issued");
        assert_eq!(host.calls, [Call::Muted(true), Call::Play]);
    }

    #[test]
    fn rejections_retry_until_cap() {
        let mut host = FakeHost::new();
        let mut ctl = started(&mut host);

        for n in 1..=3 {
            assert!(ctl.attempt_play(&mut host), "attempt {n}");
            host.calls.clear();
            ctl.on_play_resolved(Err(PlayRejected::NotAllowed), &mut host);
            let retried = host.has(&Call::Schedule(Wake::Retry, Duration::from_millis(200)));
            assert_eq!(retried, n < 3, "retry after attempt {n}");
        }
        assert!(!ctl.attempt_play(&mut host), "cap reached");
        assert_eq!(ctl.attempts(), 3);
    }

    #[test]
    fn success_marks_playing_and_hides_fallback() {
        let mut host = FakeHost::new();
        let mut ctl = started(&mut host);
        ctl.attempt_play(&mut host);
        host.calls.clear();

        ctl.on_play_resolved(Ok(()), &mut host);
        assert_eq!(
            host.calls,
            [
                Call::Class(SurfaceClass::Loading, false),
                Call::Class(SurfaceClass::Playing, true),
                Call::Fallback(FallbackDisplay::Hidden),
            ]
        );
        assert!(ctl.is_playing(), "playing after success");
    }

    #[test]
    fn pause_while_visible_requests_frame() {
        let mut host = FakeHost::new();
        let mut ctl = started(&mut host);
        ctl.attempt_play(&mut host);
        ctl.on_play_resolved(Ok(()), &mut host);
        host.calls.clear();

        ctl.handle_event(PlaybackEvent::Pause, &mut host);
        assert_eq!(host.calls, [Call::Frame(Wake::Frame)]);
        assert_eq!(ctl.state(), PlaybackState::Paused);

        host.calls.clear();
        host.hidden = true;
        ctl.handle_event(PlaybackEvent::Pause, &mut host);
        assert!(host.calls.is_empty(), "hidden tab does not resume");
    }

    #[test]
    fn time_update_near_end_seeks_to_start() {
        let mut host = FakeHost::new();
        let mut ctl = started(&mut host);
        host.duration = 12.0;
        host.current_time = 11.9;
        ctl.handle_event(PlaybackEvent::TimeUpdate, &mut host);
        assert_eq!(host.calls, [Call::Seek(0.0)]);

        host.calls.clear();
        host.current_time = 11.5;
        ctl.handle_event(PlaybackEvent::TimeUpdate, &mut host);
        assert!(host.calls.is_empty(), "not yet at the tail");

        host.duration = f64::INFINITY;
        host.current_time = 1e9;
        ctl.handle_event(PlaybackEvent::TimeUpdate, &mut host);
        assert!(host.calls.is_empty(), "unknown duration never loops");
    }

    #[test]
    fn metadata_and_play_through_fire_once() {
        let mut host = FakeHost::new();
        let mut ctl = started(&mut host);

        ctl.handle_event(PlaybackEvent::LoadedMetadata, &mut host);
        ctl.handle_event(PlaybackEvent::LoadedMetadata, &mut host);
        let cleared = host
            .calls
            .iter()
            .filter(|c| **c == Call::Class(SurfaceClass::Loading, false))
            .count();
        assert_eq!(cleared, 1);

        host.calls.clear();
        ctl.handle_event(PlaybackEvent::CanPlayThrough, &mut host);
        ctl.on_play_resolved(Err(PlayRejected::NotAllowed), &mut host);
        ctl.handle_event(PlaybackEvent::CanPlayThrough, &mut host);
        assert_eq!(host.plays(), 1, "canplaythrough is one-shot");

        ctl.handle_event(PlaybackEvent::CanPlay, &mut host);
        assert_eq!(host.plays(), 2, "canplay is not");
    }

    #[test]
    fn deadline_reveals_fallback_without_hiding_surface() {
        let mut host = FakeHost::new();
        let mut ctl = started(&mut host);
        host.ready_state = ReadyState::HaveCurrentData;

        ctl.on_wake(Wake::Deadline, &mut host);
        assert!(host.has(&Call::Fallback(FallbackDisplay::Opaque)), "opaque");
        assert!(host.has(&Call::Class(SurfaceClass::Loading, false)));
        assert!(!host.has(&Call::SurfaceVisible(false)), "surface stays");
        assert_eq!(ctl.state(), PlaybackState::FallbackShown);
        assert!(ctl.motion_enabled(), "still trying to play");
    }

    #[test]
    fn deadline_with_enough_data_does_nothing() {
        let mut host = FakeHost::new();
        let mut ctl = started(&mut host);
        host.ready_state = ReadyState::HaveFutureData;
        ctl.on_wake(Wake::Deadline, &mut host);
        assert!(host.calls.is_empty(), "no reveal");
        assert_eq!(ctl.state(), PlaybackState::Loading);
    }

    #[test]
    fn first_interaction_is_one_shot() {
        let mut host = FakeHost::new();
        let mut ctl = started(&mut host);

        ctl.handle_event(
            PlaybackEvent::Interaction(InteractionKind::Click),
            &mut host,
        );
        ctl.handle_event(
            PlaybackEvent::Interaction(InteractionKind::Scroll),
            &mut host,
        );
        assert!(ctl.has_interacted(), "flag set");
        assert_eq!(host.plays(), 1);
        assert_eq!(
            host.calls.iter().filter(|c| **c == Call::Detach).count(),
            1,
            "listeners detached once"
        );
    }

    #[test]
    fn events_before_start_are_ignored() {
        let mut host = FakeHost::new();
        let mut ctl = PlaybackController::default();
        ctl.handle_event(PlaybackEvent::CanPlay, &mut host);
        ctl.on_wake(Wake::Retry, &mut host);
        assert_eq!(host.plays(), 0);
        assert_eq!(ctl.state(), PlaybackState::Idle);
    }
}
