// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`TraceSink`] that writes to the browser console.

use alloc::format;
use alloc::string::String;

use vitrine_core::trace::{
    AttemptsResetEvent, DeadlineEvent, EnvironmentEvent, PlayAttemptEvent, PlayOutcomeEvent,
    TraceSink, TransitionEvent,
};
use wasm_bindgen::JsValue;
use web_sys::console;

/// Logs one line per controller event with `console.debug`, and rejected
/// play commands with `console.warn`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    /// Creates a console sink.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn debug(line: &str) {
    console::debug_1(&JsValue::from_str(line));
}

fn environment_line(e: &EnvironmentEvent) -> String {
    format!(
        "[vitrine] env mobile={} slow={} reduced_motion={} -> {}",
        e.snapshot.is_mobile,
        e.snapshot.is_slow_connection,
        e.snapshot.prefers_reduced_motion,
        if e.motion_allowed { "video" } else { "fallback" },
    )
}

fn transition_line(e: &TransitionEvent) -> String {
    format!("[vitrine] {:?} -> {:?} ({:?})", e.from, e.to, e.cause)
}

fn outcome_line(e: &PlayOutcomeEvent) -> String {
    match e.result {
        Ok(()) => format!("[vitrine] play {} ok", e.attempt),
        Err(reason) => format!(
            "[vitrine] play {} rejected: {reason}{}",
            e.attempt,
            if e.retry_scheduled { ", retrying" } else { "" },
        ),
    }
}

impl TraceSink for ConsoleSink {
    fn on_environment(&mut self, e: &EnvironmentEvent) {
        debug(&environment_line(e));
    }

    fn on_transition(&mut self, e: &TransitionEvent) {
        debug(&transition_line(e));
    }

    fn on_play_attempt(&mut self, e: &PlayAttemptEvent) {
        debug(&format!(
            "[vitrine] play attempt {}/{}",
            e.attempt, e.max_attempts
        ));
    }

    fn on_play_outcome(&mut self, e: &PlayOutcomeEvent) {
        let line = outcome_line(e);
        if e.result.is_ok() {
            debug(&line);
        } else {
            console::warn_1(&JsValue::from_str(&line));
        }
    }

    fn on_attempts_reset(&mut self, e: &AttemptsResetEvent) {
        debug(&format!(
            "[vitrine] attempts reset by {:?} (was {})",
            e.trigger, e.previous_attempts
        ));
    }

    fn on_deadline(&mut self, e: &DeadlineEvent) {
        debug(&format!(
            "[vitrine] deadline: {:?}{}",
            e.ready_state,
            if e.fallback_revealed {
                ", fallback revealed"
            } else {
                ""
            },
        ));
    }
}
