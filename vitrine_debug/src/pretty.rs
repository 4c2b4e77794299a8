// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use vitrine_core::trace::{
    AttemptsResetEvent, DeadlineEvent, EnvironmentEvent, PlayAttemptEvent, PlayOutcomeEvent,
    TraceSink, TransitionEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns its writer.
    #[must_use]
    pub fn into_writer(self) -> W {
        self.writer
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_environment(&mut self, e: &EnvironmentEvent) {
        let _ = writeln!(
            self.writer,
            "[env] mobile={} slow={} reduced_motion={} motion={}",
            e.snapshot.is_mobile,
            e.snapshot.is_slow_connection,
            e.snapshot.prefers_reduced_motion,
            on_off(e.motion_allowed),
        );
    }

    fn on_transition(&mut self, e: &TransitionEvent) {
        let _ = writeln!(
            self.writer,
            "[state] {:?} -> {:?} ({:?})",
            e.from, e.to, e.cause,
        );
    }

    fn on_play_attempt(&mut self, e: &PlayAttemptEvent) {
        let _ = writeln!(
            self.writer,
            "[play] attempt {}/{}",
            e.attempt, e.max_attempts,
        );
    }

    fn on_play_outcome(&mut self, e: &PlayOutcomeEvent) {
        let _ = match e.result {
            Ok(()) => writeln!(self.writer, "[play] attempt {} ok", e.attempt),
            Err(reason) => writeln!(
                self.writer,
                "[play] attempt {} rejected: {reason} retry={}",
                e.attempt,
                on_off(e.retry_scheduled),
            ),
        };
    }

    fn on_attempts_reset(&mut self, e: &AttemptsResetEvent) {
        let _ = writeln!(
            self.writer,
            "[reset] {:?} attempts={}->0",
            e.trigger, e.previous_attempts,
        );
    }

    fn on_deadline(&mut self, e: &DeadlineEvent) {
        let _ = writeln!(
            self.writer,
            "[deadline] ready_state={:?} fallback={}",
            e.ready_state,
            if e.fallback_revealed { "revealed" } else { "kept" },
        );
    }
}
