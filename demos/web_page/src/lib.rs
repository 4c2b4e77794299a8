// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web demo: every page behavior on a static landing page.
//!
//! Installs night mode, the adaptive background video, alert dismissal,
//! smooth anchors and scroll reveal once the document is parsed. Page scripts
//! can call `showNotification`, `apiCall`, `formatTime` and `formatDate`.
//!
//! Build with: `wasm-pack build --target web demos/web_page`
//! Then serve `demos/web_page/` and open `index.html`. Build with
//! `--features trace` to log controller events to the console.

#![no_std]
#![cfg_attr(
    not(target_arch = "wasm32"),
    allow(dead_code, reason = "this crate only runs in the browser")
)]

extern crate alloc;

use alloc::boxed::Box;

use vitrine_backend_web::{ConsoleSink, TraceSink, install_page, when_ready};
use wasm_bindgen::prelude::*;

fn trace_sink() -> Option<Box<dyn TraceSink>> {
    if cfg!(feature = "trace") {
        Some(Box::new(ConsoleSink::new()))
    } else {
        None
    }
}

/// Entry point for the web-page demo.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;

    when_ready(&document, || match install_page(trace_sink()) {
        // The session lives for the rest of the page load.
        Ok(Some(session)) => core::mem::forget(session),
        Ok(None) => {}
        Err(err) => web_sys::console::error_2(&JsValue::from_str("vitrine: install failed"), &err),
    })
}
