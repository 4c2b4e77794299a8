// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reads [`EnvironmentSignals`] from the browser.
//!
//! The Network Information API (`navigator.connection`) is not exposed by
//! every engine, so it is read reflectively and missing fields stay `None`.

use alloc::string::String;

use js_sys::Reflect;
use vitrine_core::env::{
    ConnectionHint, EffectiveConnectionType, EnvironmentSignals, EnvironmentSnapshot, classify,
};
use wasm_bindgen::JsValue;
use web_sys::{Navigator, Window};

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// Collects the raw environment signals from `window`.
///
/// Signals the browser cannot provide fall back to values that do not push
/// the classification toward the fallback.
#[must_use]
pub fn read_signals(window: &Window) -> EnvironmentSignals {
    let navigator = window.navigator();
    EnvironmentSignals {
        viewport_width: window
            .inner_width()
            .ok()
            .and_then(|w| w.as_f64())
            .unwrap_or(f64::INFINITY),
        user_agent: navigator.user_agent().unwrap_or_else(|_| String::new()),
        connection: connection_hint(&navigator),
        prefers_reduced_motion: window
            .match_media(REDUCED_MOTION_QUERY)
            .ok()
            .flatten()
            .is_some_and(|query| query.matches()),
    }
}

/// Reads and classifies the environment in one step.
#[must_use]
pub fn snapshot(window: &Window) -> EnvironmentSnapshot {
    classify(&read_signals(window))
}

fn connection_hint(navigator: &Navigator) -> Option<ConnectionHint> {
    let connection = Reflect::get(navigator, &JsValue::from_str("connection")).ok()?;
    if connection.is_undefined() || connection.is_null() {
        return None;
    }
    let field = |name: &str| Reflect::get(&connection, &JsValue::from_str(name)).ok();
    Some(hint_from_parts(
        field("saveData").and_then(|v| v.as_bool()),
        field("effectiveType").and_then(|v| v.as_string()).as_deref(),
    ))
}

fn hint_from_parts(save_data: Option<bool>, effective_type: Option<&str>) -> ConnectionHint {
    ConnectionHint {
        save_data,
        effective_type: effective_type.and_then(EffectiveConnectionType::parse),
    }
}
