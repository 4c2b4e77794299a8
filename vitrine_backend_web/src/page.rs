// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM side of the cosmetic page behaviors.
//!
//! The policies (which hours, which selectors, which styles) live in
//! [`vitrine_core::cosmetic`]; this module only finds elements and applies
//! them.

use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use vitrine_core::cosmetic::StyleDecl;
use vitrine_core::cosmetic::alert::{
    self, ALERT_SELECTOR, DEFAULT_KIND, DismissTiming, FADE_OUT_STYLE,
    NOTIFICATION_CONTAINER_SELECTOR,
};
use vitrine_core::cosmetic::anchor::{ANCHOR_SELECTOR, anchor_target};
use vitrine_core::cosmetic::format::{CalendarDate, format_clock};
use vitrine_core::cosmetic::night::{NIGHT_MODE_CLASS, NightWindow};
use vitrine_core::cosmetic::reveal::{HIDDEN_STYLE, REVEAL_SELECTOR, RevealOptions, style_for_entry};
use wasm_bindgen::JsCast as _;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, Event, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, ScrollBehavior, ScrollIntoViewOptions,
};

use crate::timer;

fn apply_style(element: &HtmlElement, decls: &[StyleDecl]) {
    let style = element.style();
    for (property, value) in decls {
        let _ = style.set_property(property, value);
    }
}

/// Every element matching `selector` that is an `HtmlElement`.
fn html_elements(document: &Document, selector: &str) -> Result<Vec<HtmlElement>, JsValue> {
    let nodes = document.query_selector_all(selector)?;
    Ok((0..nodes.length())
        .filter_map(|idx| nodes.item(idx))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect())
}

// ---------------------------------------------------------------------------
// Night mode
// ---------------------------------------------------------------------------

/// Adds the night-mode class to `<body>` if `hour` falls in `window`.
///
/// Returns whether night mode applies.
pub fn apply_night_mode(
    document: &Document,
    window: NightWindow,
    hour: u8,
) -> Result<bool, JsValue> {
    let night = window.contains(hour);
    if night && let Some(body) = document.body() {
        body.class_list().add_1(NIGHT_MODE_CLASS)?;
    }
    Ok(night)
}

/// Applies night mode for the current local hour.
pub fn install_night_mode(document: &Document) -> Result<bool, JsValue> {
    let hour = u8::try_from(js_sys::Date::new_0().get_hours()).unwrap_or(0);
    apply_night_mode(document, NightWindow::standard(), hour)
}

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------

fn schedule_dismissal(alert: HtmlElement, timing: DismissTiming) {
    timer::after(timing.visible, move || {
        apply_style(&alert, &FADE_OUT_STYLE);
        timer::after(timing.fade, move || alert.remove());
    });
}

/// Starts the dismissal sequence for every alert already in the document.
///
/// Returns how many alerts were found.
pub fn dismiss_alerts(document: &Document, timing: DismissTiming) -> Result<usize, JsValue> {
    let alerts = html_elements(document, ALERT_SELECTOR)?;
    let count = alerts.len();
    for alert in alerts {
        schedule_dismissal(alert, timing);
    }
    Ok(count)
}

/// Prepends a transient notification to the page container.
///
/// The message is inserted as text, never parsed as markup.
pub fn show_notification(
    document: &Document,
    message: &str,
    kind: &str,
    timing: DismissTiming,
) -> Result<HtmlElement, JsValue> {
    let container = match document.query_selector(NOTIFICATION_CONTAINER_SELECTOR)? {
        Some(container) => container,
        None => document
            .body()
            .map(Element::from)
            .ok_or_else(|| JsValue::from_str("document has no body"))?,
    };

    let notification: HtmlElement = document.create_element("div")?.unchecked_into();
    notification.set_class_name(&alert::class_name(kind));
    let icon = document.create_element("i")?;
    icon.set_class_name(alert::icon_class(kind));
    notification.append_child(&icon)?;
    notification.append_child(&document.create_text_node(&format!(" {message}")))?;

    container.insert_before(&notification, container.first_child().as_ref())?;
    schedule_dismissal(notification.clone(), timing);
    Ok(notification)
}

/// `showNotification(message, type = 'success')` for page scripts.
#[wasm_bindgen(js_name = showNotification)]
pub fn show_notification_js(message: &str, kind: Option<String>) -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    show_notification(
        &document,
        message,
        kind.as_deref().unwrap_or(DEFAULT_KIND),
        DismissTiming::standard(),
    )?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Anchors
// ---------------------------------------------------------------------------

/// Makes in-page anchor links scroll their target smoothly into view.
///
/// Returns how many links were wired.
pub fn install_smooth_anchors(document: &Document) -> Result<usize, JsValue> {
    let links = document.query_selector_all(ANCHOR_SELECTOR)?;
    let mut wired = 0;
    for idx in 0..links.length() {
        let Some(link) = links.item(idx).and_then(|node| node.dyn_into::<Element>().ok()) else {
            continue;
        };
        let doc = document.clone();
        let target_link = link.clone();
        let closure = Closure::wrap(Box::new(move |event: Event| {
            event.prevent_default();
            let href = target_link.get_attribute("href");
            let Some(selector) = href.as_deref().and_then(anchor_target) else {
                return;
            };
            // An invalid selector is treated like a missing target.
            if let Ok(Some(target)) = doc.query_selector(selector) {
                let options = ScrollIntoViewOptions::new();
                options.set_behavior(ScrollBehavior::Smooth);
                target.scroll_into_view_with_scroll_into_view_options(&options);
            }
        }) as Box<dyn FnMut(_)>);
        link.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        wired += 1;
    }
    Ok(wired)
}

// ---------------------------------------------------------------------------
// Scroll reveal
// ---------------------------------------------------------------------------

/// Hides every reveal candidate and fades each one in the first time it
/// intersects the viewport.
pub fn install_reveal(
    document: &Document,
    options: &RevealOptions,
) -> Result<IntersectionObserver, JsValue> {
    let callback = Closure::wrap(Box::new(
        move |entries: js_sys::Array, _observer: IntersectionObserver| {
            for entry in entries.iter() {
                let entry: IntersectionObserverEntry = entry.unchecked_into();
                let Some(decls) = style_for_entry(entry.is_intersecting()) else {
                    continue;
                };
                if let Ok(target) = entry.target().dyn_into::<HtmlElement>() {
                    apply_style(&target, decls);
                }
            }
        },
    ) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(options.threshold));
    init.set_root_margin(options.root_margin);
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
    callback.forget();

    for element in html_elements(document, REVEAL_SELECTOR)? {
        apply_style(&element, &HIDDEN_STYLE);
        observer.observe(&element);
    }
    Ok(observer)
}

// ---------------------------------------------------------------------------
// Formatting exports
// ---------------------------------------------------------------------------

/// `formatTime(seconds)`: `MM:SS`.
///
/// Fractional seconds are floored. Negative, `NaN` and infinite input formats
/// as `00:00`.
#[wasm_bindgen(js_name = formatTime)]
#[must_use]
pub fn format_time(seconds: f64) -> String {
    format_clock(whole_seconds(seconds))
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "positive finite input; the cast truncates toward zero and saturates"
)]
fn whole_seconds(seconds: f64) -> u64 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    }
}

/// `formatDate(isoString)`: `DD/MM/YYYY`, or `undefined` for input that does
/// not start with a `YYYY-MM-DD` date.
#[wasm_bindgen(js_name = formatDate)]
#[must_use]
pub fn format_date(value: &str) -> Option<String> {
    CalendarDate::parse_iso(value).map(|date| date.format_pt_br())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exported_formatters() {
        assert_eq!(format_time(125.0), "02:05");
        assert_eq!(format_date("2024-03-07T10:00:00Z").as_deref(), Some("07/03/2024"));
        assert_eq!(format_date("yesterday"), None);
    }

    #[test]
    fn format_time_floors_and_clamps() {
        assert_eq!(format_time(65.9), "01:05");
        assert_eq!(format_time(0.4), "00:00");
        assert_eq!(format_time(-3.0), "00:00");
        assert_eq!(format_time(f64::NAN), "00:00");
        assert_eq!(format_time(f64::INFINITY), "00:00");
    }
}
