// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON export of recorded events.
//!
//! [`export_json`] writes the events of a
//! [`RecorderSink`](super::recorder::RecorderSink) as a JSON array with one
//! object per event. Every object carries a `seq` index and a `name`; the rest
//! of the fields sit under `args`.

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::RecordedEvent;

/// Converts a single event to its JSON object.
#[must_use]
pub fn event_to_json(seq: usize, event: &RecordedEvent) -> Value {
    match *event {
        RecordedEvent::Environment {
            snapshot,
            motion_allowed,
        } => json!({
            "seq": seq,
            "name": "Environment",
            "args": {
                "is_mobile": snapshot.is_mobile,
                "is_slow_connection": snapshot.is_slow_connection,
                "prefers_reduced_motion": snapshot.prefers_reduced_motion,
                "motion_allowed": motion_allowed,
            }
        }),
        RecordedEvent::Transition { from, to, cause } => json!({
            "seq": seq,
            "name": "Transition",
            "args": {
                "from": format!("{from:?}"),
                "to": format!("{to:?}"),
                "cause": format!("{cause:?}"),
            }
        }),
        RecordedEvent::PlayAttempt {
            attempt,
            max_attempts,
        } => json!({
            "seq": seq,
            "name": "PlayAttempt",
            "args": {
                "attempt": attempt,
                "max_attempts": max_attempts,
            }
        }),
        RecordedEvent::PlayOutcome {
            attempt,
            rejected,
            retry_scheduled,
        } => json!({
            "seq": seq,
            "name": "PlayOutcome",
            "args": {
                "attempt": attempt,
                "rejected": rejected.map(|r| format!("{r:?}")),
                "retry_scheduled": retry_scheduled,
            }
        }),
        RecordedEvent::AttemptsReset {
            trigger,
            previous_attempts,
        } => json!({
            "seq": seq,
            "name": "AttemptsReset",
            "args": {
                "trigger": format!("{trigger:?}"),
                "previous_attempts": previous_attempts,
            }
        }),
        RecordedEvent::Deadline {
            ready_state,
            fallback_revealed,
        } => json!({
            "seq": seq,
            "name": "Deadline",
            "args": {
                "ready_state": ready_state as u8,
                "fallback_revealed": fallback_revealed,
            }
        }),
    }
}

/// Writes `events` as a pretty-printed JSON array.
pub fn export_json(events: &[RecordedEvent], writer: &mut dyn Write) -> io::Result<()> {
    let values: Vec<Value> = events
        .iter()
        .enumerate()
        .map(|(seq, event)| event_to_json(seq, event))
        .collect();
    serde_json::to_writer_pretty(writer, &values)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::controller::ResetTrigger;
    use vitrine_core::media::{InteractionKind, ReadyState};

    #[test]
    fn export_produces_valid_json() {
        let events = [
            RecordedEvent::PlayAttempt {
                attempt: 1,
                max_attempts: 3,
            },
            RecordedEvent::AttemptsReset {
                trigger: ResetTrigger::FirstInteraction(InteractionKind::Click),
                previous_attempts: 3,
            },
            RecordedEvent::Deadline {
                ready_state: ReadyState::HaveMetadata,
                fallback_revealed: true,
            },
        ];
        let mut buf = Vec::new();
        export_json(&events, &mut buf).unwrap();

        let parsed: Vec<Value> = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0]["name"], "PlayAttempt");
        assert_eq!(parsed[1]["args"]["trigger"], "FirstInteraction(Click)");
        assert_eq!(parsed[2]["args"]["ready_state"], 1);
        assert_eq!(parsed[2]["seq"], 2);
    }

    #[test]
    fn export_empty() {
        let mut buf = Vec::new();
        export_json(&[], &mut buf).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&buf).unwrap();
        assert!(parsed.is_empty());
    }
}
