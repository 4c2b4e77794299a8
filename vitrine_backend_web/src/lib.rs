// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for vitrine.
//!
//! This crate binds the host-independent logic in `vitrine_core` to browser
//! APIs:
//!
//! - [`install_media_controller`]: the adaptive background-video controller
//!   over `#bgVideo`, via [`WebMediaHost`]
//! - [`env`]: environment signals from `window`, `navigator` and media queries
//! - [`page`]: night mode, alert dismissal, notifications, smooth anchors,
//!   scroll reveal
//! - [`api`]: JSON `fetch` helper
//! - [`ConsoleSink`]: controller trace events on the browser console
//!
//! [`install_page`] runs all of it in the order the page expects.

#![no_std]

extern crate alloc;

pub mod api;
mod console;
pub mod env;
mod host;
pub mod page;
mod timer;

pub use console::ConsoleSink;
pub use host::{
    FALLBACK_SELECTOR, MediaSession, VIDEO_ELEMENT_ID, WebMediaHost, install_media_controller,
};
pub use vitrine_core::media::MediaHost;
pub use vitrine_core::trace::TraceSink;

use alloc::boxed::Box;

use vitrine_core::cosmetic::alert::DismissTiming;
use vitrine_core::cosmetic::reveal::RevealOptions;
use wasm_bindgen::JsCast as _;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Document, Event, console as web_console};

/// Runs `f` once the document has been parsed.
///
/// If parsing is already done `f` runs immediately; otherwise it runs on
/// `DOMContentLoaded`.
pub fn when_ready(document: &Document, f: impl FnOnce() + 'static) -> Result<(), JsValue> {
    if !is_loading(&document.ready_state()) {
        f();
        return Ok(());
    }
    let callback = Closure::once_into_js(move |_event: Event| f());
    let options = AddEventListenerOptions::new();
    options.set_once(true);
    document.add_event_listener_with_callback_and_add_event_listener_options(
        "DOMContentLoaded",
        callback.unchecked_ref(),
        &options,
    )
}

/// Whether `document.readyState` says parsing is still in progress.
fn is_loading(ready_state: &str) -> bool {
    ready_state == "loading"
}

/// Installs every page behavior on the current document.
///
/// Night mode, the media controller and alert dismissal run first; anchors and
/// scroll reveal are wired after. A behavior whose elements are missing is
/// skipped. A behavior whose browser API fails is logged and does not stop the
/// others.
///
/// Returns the media session when the page has a usable background video.
/// Only a missing `window` or `document` is an error.
pub fn install_page(sink: Option<Box<dyn TraceSink>>) -> Result<Option<MediaSession>, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    report("night mode", page::install_night_mode(&document));
    let snapshot = env::snapshot(&window);
    let session = report(
        "background video",
        install_media_controller(&document, &snapshot, sink),
    )
    .flatten();
    report("alerts", page::dismiss_alerts(&document, DismissTiming::standard()));
    report("anchors", page::install_smooth_anchors(&document));
    report(
        "scroll reveal",
        page::install_reveal(&document, &RevealOptions::standard()),
    );
    Ok(session)
}

/// Logs a failed behavior and yields its value otherwise.
fn report<T>(behavior: &str, result: Result<T, JsValue>) -> Option<T> {
    report_to(behavior, result, |message, err| {
        web_console::warn_2(&JsValue::from_str(message), err);
    })
}

fn report_to<T>(
    behavior: &str,
    result: Result<T, JsValue>,
    warn: impl FnOnce(&str, &JsValue),
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            warn(&alloc::format!("vitrine: {behavior} unavailable"), &err);
            None
        }
    }
}
