// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-page anchors.

/// Selector for links that scroll smoothly instead of jumping.
pub const ANCHOR_SELECTOR: &str = "a[href^=\"#\"]";

/// Returns the selector to scroll to for an anchor `href`.
///
/// Only fragment links qualify. A bare `#` has no target; the click is still
/// swallowed by the host so the page does not jump to the top.
#[must_use]
pub fn anchor_target(href: &str) -> Option<&str> {
    (href.starts_with('#') && href.len() > 1).then_some(href)
}
