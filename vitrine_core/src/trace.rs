// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the media controller.
//!
//! [`TraceSink`] has one method per controller event, each defaulting to a
//! no-op, so a sink only implements what it cares about.
//!
//! [`Tracer`] owns an optional boxed sink and is held by the controller. When
//! the `trace` feature is **off**, every `Tracer` method compiles to nothing
//! and the sink passed to [`Tracer::new`] is dropped immediately. When **on**,
//! each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace` — enables the `Tracer` method bodies (one branch per call).

use alloc::boxed::Box;

use crate::controller::{PlaybackState, ResetTrigger, TransitionCause};
use crate::env::EnvironmentSnapshot;
use crate::media::{PlayRejected, ReadyState};

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted once, when the controller classifies its environment.
#[derive(Clone, Copy, Debug)]
pub struct EnvironmentEvent {
    /// The derived snapshot.
    pub snapshot: EnvironmentSnapshot,
    /// Whether the motion path is enabled for this page load.
    pub motion_allowed: bool,
}

/// Emitted on every state change.
#[derive(Clone, Copy, Debug)]
pub struct TransitionEvent {
    /// State before the change.
    pub from: PlaybackState,
    /// State after the change.
    pub to: PlaybackState,
    /// What caused it.
    pub cause: TransitionCause,
}

/// Emitted when a play command is issued.
#[derive(Clone, Copy, Debug)]
pub struct PlayAttemptEvent {
    /// 1-based attempt number since the last reset.
    pub attempt: u32,
    /// Attempt cap.
    pub max_attempts: u32,
}

/// Emitted when the host reports the outcome of a play command.
#[derive(Clone, Copy, Debug)]
pub struct PlayOutcomeEvent {
    /// Attempt counter at the time the outcome arrived.
    pub attempt: u32,
    /// `Err` when the host rejected playback.
    pub result: Result<(), PlayRejected>,
    /// A retry was scheduled in response.
    pub retry_scheduled: bool,
}

/// Emitted when an external trigger resets the attempt counter.
#[derive(Clone, Copy, Debug)]
pub struct AttemptsResetEvent {
    /// What reset it.
    pub trigger: ResetTrigger,
    /// Counter value before the reset.
    pub previous_attempts: u32,
}

/// Emitted when the readiness deadline fires.
#[derive(Clone, Copy, Debug)]
pub struct DeadlineEvent {
    /// Readiness observed at the deadline.
    pub ready_state: ReadyState,
    /// The fallback was forced opaque.
    pub fallback_revealed: bool,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the media controller.
///
/// All methods have default no-op implementations.
pub trait TraceSink {
    /// Called after the environment has been classified.
    fn on_environment(&mut self, e: &EnvironmentEvent) {
        _ = e;
    }

    /// Called on every state change.
    fn on_transition(&mut self, e: &TransitionEvent) {
        _ = e;
    }

    /// Called when a play command is issued.
    fn on_play_attempt(&mut self, e: &PlayAttemptEvent) {
        _ = e;
    }

    /// Called when a play command resolves.
    fn on_play_outcome(&mut self, e: &PlayOutcomeEvent) {
        _ = e;
    }

    /// Called when the attempt counter is reset.
    fn on_attempts_reset(&mut self, e: &AttemptsResetEvent) {
        _ = e;
    }

    /// Called when the readiness deadline fires.
    fn on_deadline(&mut self, e: &DeadlineEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Owned wrapper around an optional [`TraceSink`].
pub struct Tracer {
    #[cfg(feature = "trace")]
    sink: Option<Box<dyn TraceSink>>,
}

impl core::fmt::Debug for Tracer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl Default for Tracer {
    fn default() -> Self {
        Self::none()
    }
}

impl Tracer {
    /// Creates a tracer that dispatches to `sink`.
    #[must_use]
    pub fn new(sink: Box<dyn TraceSink>) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {}
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub const fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {}
        }
    }

    /// Removes and returns the sink, leaving the tracer disabled.
    ///
    /// Always `None` when the `trace` feature is off.
    pub fn take_sink(&mut self) -> Option<Box<dyn TraceSink>> {
        #[cfg(feature = "trace")]
        {
            self.sink.take()
        }
        #[cfg(not(feature = "trace"))]
        {
            None
        }
    }

    /// Emits an [`EnvironmentEvent`].
    #[inline]
    pub fn environment(&mut self, e: &EnvironmentEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_environment(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TransitionEvent`].
    #[inline]
    pub fn transition(&mut self, e: &TransitionEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_transition(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PlayAttemptEvent`].
    #[inline]
    pub fn play_attempt(&mut self, e: &PlayAttemptEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_play_attempt(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PlayOutcomeEvent`].
    #[inline]
    pub fn play_outcome(&mut self, e: &PlayOutcomeEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_play_outcome(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`AttemptsResetEvent`].
    #[inline]
    pub fn attempts_reset(&mut self, e: &AttemptsResetEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_attempts_reset(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`DeadlineEvent`].
    #[inline]
    pub fn deadline(&mut self, e: &DeadlineEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_deadline(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
