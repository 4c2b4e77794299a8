// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic simulated host for the media controller.
//!
//! [`SimHost`] implements [`MediaHost`] over plain fields and a virtual clock.
//! [`Simulation`] pairs it with a [`PlaybackController`] and plays the part of
//! the browser event loop: it resolves play commands according to a
//! [`PlayPolicy`], delivers timer and animation-frame wakes in due order, and
//! only forwards interaction events while the listeners are attached.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::time::Duration;

use vitrine_core::config::{MediaSource, PlaybackConfig, SurfaceSetup};
use vitrine_core::controller::{PlaybackController, PlaybackEvent, StartOutcome};
use vitrine_core::env::EnvironmentSnapshot;
use vitrine_core::media::{
    FallbackDisplay, MediaHost, PlayRejected, ReadyState, SurfaceClass, Wake,
};

/// Simulated time between animation frames (≈60 Hz).
pub const FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

/// How the simulated host answers play commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayPolicy {
    /// Every command succeeds.
    Accept,
    /// Every command is rejected with the given reason.
    Reject(PlayRejected),
    /// The first `n` commands are rejected, later ones succeed.
    RejectFirst(u32),
}

/// State of the simulated media surface.
#[derive(Clone, Debug)]
pub struct SimSurface {
    /// Paused flag.
    pub paused: bool,
    /// Muted flag.
    pub muted: bool,
    /// Whether the surface is laid out at all.
    pub visible: bool,
    /// Readiness.
    pub ready_state: ReadyState,
    /// Playback position in seconds.
    pub current_time: f64,
    /// Duration in seconds; NaN until known.
    pub duration: f64,
    /// `loading` class present.
    pub loading: bool,
    /// `playing` class present.
    pub playing: bool,
    /// Attached source.
    pub source: Option<MediaSource>,
    /// Applied attributes.
    pub setup: Option<SurfaceSetup>,
    /// Number of `load()` calls.
    pub loads: u32,
}

impl Default for SimSurface {
    fn default() -> Self {
        Self {
            paused: true,
            muted: false,
            visible: true,
            ready_state: ReadyState::HaveNothing,
            current_time: 0.0,
            duration: f64::NAN,
            loading: false,
            playing: false,
            source: None,
            setup: None,
            loads: 0,
        }
    }
}

/// State of the simulated fallback image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimFallback {
    /// Last `display` applied; `None` while untouched.
    pub display: Option<FallbackDisplay>,
    /// Forced fully opaque.
    pub opaque: bool,
}

impl SimFallback {
    /// Whether the fallback is visible: shown, or forced opaque and not
    /// removed from layout.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        match self.display {
            Some(FallbackDisplay::Hidden) => false,
            Some(FallbackDisplay::Shown) => true,
            _ => self.opaque,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct PendingWake {
    due: Duration,
    seq: u64,
    wake: Wake,
}

/// Counters gathered over a simulation run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimReport {
    /// Play commands issued.
    pub play_requests: u32,
    /// Play commands that succeeded.
    pub plays_accepted: u32,
    /// Play commands that were rejected.
    pub plays_rejected: u32,
    /// Animation frames requested.
    pub frame_requests: u32,
    /// Timer or frame wakes delivered.
    pub wakes_delivered: u32,
}

/// [`MediaHost`] over plain fields with a virtual clock.
#[derive(Debug)]
pub struct SimHost {
    /// The media surface.
    pub surface: SimSurface,
    /// The fallback image.
    pub fallback: SimFallback,
    /// Document hidden flag.
    pub hidden: bool,
    /// Whether first-interaction listeners are still attached.
    pub interaction_listeners: bool,
    policy: PlayPolicy,
    now: Duration,
    seq: u64,
    queue: Vec<PendingWake>,
    pending_plays: u32,
    report: SimReport,
}

impl SimHost {
    /// Creates a host at time zero.
    #[must_use]
    pub fn new(policy: PlayPolicy) -> Self {
        Self {
            surface: SimSurface::default(),
            fallback: SimFallback::default(),
            hidden: false,
            interaction_listeners: true,
            policy,
            now: Duration::ZERO,
            seq: 0,
            queue: Vec::new(),
            pending_plays: 0,
            report: SimReport::default(),
        }
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Counters so far.
    #[must_use]
    pub fn report(&self) -> SimReport {
        self.report
    }

    /// Changes how later play commands are answered.
    pub fn set_policy(&mut self, policy: PlayPolicy) {
        self.policy = policy;
    }

    /// Number of wakes not yet delivered.
    #[must_use]
    pub fn pending_wakes(&self) -> usize {
        self.queue.len()
    }

    fn push_wake(&mut self, wake: Wake, delay: Duration) {
        self.seq += 1;
        self.queue.push(PendingWake {
            due: self.now + delay,
            seq: self.seq,
            wake,
        });
    }

    /// Removes the earliest wake due at or before `limit`.
    fn pop_due(&mut self, limit: Duration) -> Option<PendingWake> {
        let (idx, _) = self
            .queue
            .iter()
            .enumerate()
            .filter(|(_, w)| w.due <= limit)
            .min_by_key(|(_, w)| (w.due, w.seq))?;
        Some(self.queue.swap_remove(idx))
    }

    fn take_play(&mut self) -> Option<Result<(), PlayRejected>> {
        if self.pending_plays == 0 {
            return None;
        }
        self.pending_plays -= 1;
        let n = self.report.play_requests - self.pending_plays;
        let result = match self.policy {
            PlayPolicy::Accept => Ok(()),
            PlayPolicy::Reject(reason) => Err(reason),
            PlayPolicy::RejectFirst(k) if n <= k => Err(PlayRejected::NotAllowed),
            PlayPolicy::RejectFirst(_) => Ok(()),
        };
        match result {
            Ok(()) => {
                self.surface.paused = false;
                self.report.plays_accepted += 1;
            }
            Err(_) => {
                self.surface.paused = true;
                self.report.plays_rejected += 1;
            }
        }
        Some(result)
    }
}

impl MediaHost for SimHost {
    fn is_paused(&self) -> bool {
        self.surface.paused
    }

    fn ready_state(&self) -> ReadyState {
        self.surface.ready_state
    }

    fn current_time(&self) -> f64 {
        self.surface.current_time
    }

    fn duration(&self) -> f64 {
        self.surface.duration
    }

    fn seek(&mut self, seconds: f64) {
        self.surface.current_time = seconds;
    }

    fn document_hidden(&self) -> bool {
        self.hidden
    }

    fn configure(&mut self, setup: &SurfaceSetup) {
        self.surface.muted = setup.muted;
        self.surface.setup = Some(*setup);
    }

    fn attach_source(&mut self, source: &MediaSource) {
        self.surface.source = Some(*source);
    }

    fn load(&mut self) {
        self.surface.loads += 1;
    }

    fn set_muted(&mut self, muted: bool) {
        self.surface.muted = muted;
    }

    fn request_play(&mut self) {
        self.report.play_requests += 1;
        self.pending_plays += 1;
    }

    fn set_surface_class(&mut self, class: SurfaceClass, enabled: bool) {
        match class {
            SurfaceClass::Loading => self.surface.loading = enabled,
            SurfaceClass::Playing => self.surface.playing = enabled,
        }
    }

    fn set_surface_visible(&mut self, visible: bool) {
        self.surface.visible = visible;
    }

    fn set_fallback(&mut self, display: FallbackDisplay) {
        match display {
            FallbackDisplay::Opaque => self.fallback.opaque = true,
            other => self.fallback.display = Some(other),
        }
    }

    fn schedule(&mut self, wake: Wake, delay: Duration) {
        self.push_wake(wake, delay);
    }

    fn request_frame(&mut self, wake: Wake) {
        self.report.frame_requests += 1;
        self.push_wake(wake, FRAME_INTERVAL);
    }

    fn detach_interaction_listeners(&mut self) {
        self.interaction_listeners = false;
    }
}

/// A controller driven by a [`SimHost`].
#[derive(Debug)]
pub struct Simulation {
    /// The controller under test.
    pub controller: PlaybackController,
    /// Its host.
    pub host: SimHost,
}

impl Simulation {
    /// Creates an idle simulation with the standard configuration.
    #[must_use]
    pub fn new(policy: PlayPolicy) -> Self {
        Self::with_config(PlaybackConfig::standard(), policy)
    }

    /// Creates an idle simulation with an explicit configuration.
    #[must_use]
    pub fn with_config(config: PlaybackConfig, policy: PlayPolicy) -> Self {
        Self {
            controller: PlaybackController::new(config),
            host: SimHost::new(policy),
        }
    }

    /// Runs the controller's initialization contract.
    pub fn start(&mut self, env: &EnvironmentSnapshot) -> StartOutcome {
        let outcome = self.controller.start(env, &mut self.host);
        self.settle();
        outcome
    }

    /// Delivers a surface or document event.
    ///
    /// Interaction events are dropped once the listeners are detached, as the
    /// browser would never dispatch them to the controller.
    pub fn dispatch(&mut self, event: PlaybackEvent) {
        if matches!(event, PlaybackEvent::Interaction(_)) && !self.host.interaction_listeners {
            return;
        }
        self.controller.handle_event(event, &mut self.host);
        self.settle();
    }

    /// Changes document visibility and dispatches `visibilitychange`.
    pub fn set_hidden(&mut self, hidden: bool) {
        self.host.hidden = hidden;
        self.dispatch(PlaybackEvent::VisibilityChange);
    }

    /// Pauses the surface from outside and dispatches `pause`.
    pub fn external_pause(&mut self) {
        self.host.surface.paused = true;
        self.dispatch(PlaybackEvent::Pause);
    }

    /// Advances the virtual clock by `by`, delivering every wake that falls
    /// due on the way, in due order.
    pub fn advance(&mut self, by: Duration) {
        let target = self.host.now + by;
        while let Some(pending) = self.host.pop_due(target) {
            self.host.now = pending.due;
            self.host.report.wakes_delivered += 1;
            self.controller.on_wake(pending.wake, &mut self.host);
            self.settle();
        }
        self.host.now = target;
    }

    /// Resolves outstanding play commands.
    pub fn settle(&mut self) {
        while let Some(result) = self.host.take_play() {
            self.controller.on_play_resolved(result, &mut self.host);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wakes_fire_in_due_order() {
        let mut host = SimHost::new(PlayPolicy::Accept);
        host.schedule(Wake::Deadline, Duration::from_millis(50));
        host.schedule(Wake::Bootstrap, Duration::from_millis(10));
        host.schedule(Wake::Retry, Duration::from_millis(10));

        let order: Vec<_> = core::iter::from_fn(|| host.pop_due(Duration::from_secs(1)))
            .map(|p| p.wake)
            .collect();
        assert_eq!(order, [Wake::Bootstrap, Wake::Retry, Wake::Deadline]);
    }

    #[test]
    fn reject_first_then_accept() {
        let mut host = SimHost::new(PlayPolicy::RejectFirst(1));
        host.request_play();
        assert_eq!(host.take_play(), Some(Err(PlayRejected::NotAllowed)));
        host.request_play();
        assert_eq!(host.take_play(), Some(Ok(())));
        assert!(!host.surface.paused, "accepted play unpauses");
        assert_eq!(host.take_play(), None);
    }

    #[test]
    fn opaque_fallback_counts_as_visible() {
        let mut fallback = SimFallback::default();
        assert!(!fallback.is_visible(), "untouched");
        fallback.opaque = true;
        assert!(fallback.is_visible(), "opaque");
        fallback.display = Some(FallbackDisplay::Hidden);
        assert!(!fallback.is_visible(), "display none wins");
    }
}
