// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory event recording.
//!
//! [`RecorderSink`] implements [`TraceSink`] and appends a [`RecordedEvent`] per
//! call to a log shared between clones. Box one clone into the controller and
//! keep the other to read the log back.

use std::cell::RefCell;
use std::rc::Rc;

use vitrine_core::controller::{PlaybackState, ResetTrigger, TransitionCause};
use vitrine_core::env::EnvironmentSnapshot;
use vitrine_core::media::{PlayRejected, ReadyState};
use vitrine_core::trace::{
    AttemptsResetEvent, DeadlineEvent, EnvironmentEvent, PlayAttemptEvent, PlayOutcomeEvent,
    TraceSink, TransitionEvent,
};

/// A recorded controller event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RecordedEvent {
    /// Environment classified.
    Environment {
        /// The snapshot.
        snapshot: EnvironmentSnapshot,
        /// Motion path enabled.
        motion_allowed: bool,
    },
    /// State changed.
    Transition {
        /// Previous state.
        from: PlaybackState,
        /// New state.
        to: PlaybackState,
        /// Cause.
        cause: TransitionCause,
    },
    /// Play command issued.
    PlayAttempt {
        /// 1-based attempt number.
        attempt: u32,
        /// Cap.
        max_attempts: u32,
    },
    /// Play command resolved.
    PlayOutcome {
        /// Attempt counter when it resolved.
        attempt: u32,
        /// Rejection reason, `None` on success.
        rejected: Option<PlayRejected>,
        /// A retry was scheduled.
        retry_scheduled: bool,
    },
    /// Attempt counter reset.
    AttemptsReset {
        /// What reset it.
        trigger: ResetTrigger,
        /// Counter before the reset.
        previous_attempts: u32,
    },
    /// Readiness deadline fired.
    Deadline {
        /// Observed readiness.
        ready_state: ReadyState,
        /// Fallback forced opaque.
        fallback_revealed: bool,
    },
}

/// A [`TraceSink`] that appends events to a shared in-memory log.
#[derive(Clone, Debug, Default)]
pub struct RecorderSink {
    log: Rc<RefCell<Vec<RecordedEvent>>>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every event recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.log.borrow().clone()
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.log.borrow().len()
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.log.borrow().is_empty()
    }

    /// Number of recorded play attempts.
    #[must_use]
    pub fn play_attempts(&self) -> usize {
        self.count(|e| matches!(e, RecordedEvent::PlayAttempt { .. }))
    }

    /// Number of recorded attempt-counter resets.
    #[must_use]
    pub fn resets(&self) -> usize {
        self.count(|e| matches!(e, RecordedEvent::AttemptsReset { .. }))
    }

    /// Drops everything recorded so far.
    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }

    fn count(&self, pred: impl Fn(&RecordedEvent) -> bool) -> usize {
        self.log.borrow().iter().filter(|e| pred(e)).count()
    }

    fn push(&self, event: RecordedEvent) {
        self.log.borrow_mut().push(event);
    }
}

impl TraceSink for RecorderSink {
    fn on_environment(&mut self, e: &EnvironmentEvent) {
        self.push(RecordedEvent::Environment {
            snapshot: e.snapshot,
            motion_allowed: e.motion_allowed,
        });
    }

    fn on_transition(&mut self, e: &TransitionEvent) {
        self.push(RecordedEvent::Transition {
            from: e.from,
            to: e.to,
            cause: e.cause,
        });
    }

    fn on_play_attempt(&mut self, e: &PlayAttemptEvent) {
        self.push(RecordedEvent::PlayAttempt {
            attempt: e.attempt,
            max_attempts: e.max_attempts,
        });
    }

    fn on_play_outcome(&mut self, e: &PlayOutcomeEvent) {
        self.push(RecordedEvent::PlayOutcome {
            attempt: e.attempt,
            rejected: e.result.err(),
            retry_scheduled: e.retry_scheduled,
        });
    }

    fn on_attempts_reset(&mut self, e: &AttemptsResetEvent) {
        self.push(RecordedEvent::AttemptsReset {
            trigger: e.trigger,
            previous_attempts: e.previous_attempts,
        });
    }

    fn on_deadline(&mut self, e: &DeadlineEvent) {
        self.push(RecordedEvent::Deadline {
            ready_state: e.ready_state,
            fallback_revealed: e.fallback_revealed,
        });
    }
}
