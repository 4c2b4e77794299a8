// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One-shot timer and animation-frame callbacks.
//!
//! Every wake the controller schedules is fire-and-forget: nothing is ever
//! cancelled, so the callbacks are handed to the browser with
//! [`Closure::once_into_js`] and freed after they run.

use core::time::Duration;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

// Direct global bindings instead of `web_sys::Window` methods, so scheduling
// does not need to fetch (and check) the Window object each time.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = "setTimeout")]
    fn set_timeout(callback: &JsValue, millis: i32) -> i32;

    #[wasm_bindgen(js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> i32;
}

/// Runs `f` once after `delay`.
pub(crate) fn after(delay: Duration, f: impl FnOnce() + 'static) {
    let callback = Closure::once_into_js(f);
    set_timeout(&callback, delay_millis(delay));
}

/// Runs `f` once on the next animation frame.
pub(crate) fn next_frame(f: impl FnOnce() + 'static) {
    let callback = Closure::once_into_js(move |_timestamp_ms: f64| f());
    request_animation_frame(&callback);
}

/// `setTimeout` delay for `delay`, saturating at the largest value the
/// browser accepts.
fn delay_millis(delay: Duration) -> i32 {
    i32::try_from(delay.as_millis()).unwrap_or(i32::MAX)
}
