// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transient alerts.
//!
//! Every `.alert` present at load, and every notification shown later, stays
//! visible for [`DismissTiming::visible`], fades out with [`FADE_OUT_STYLE`],
//! and is removed from the document after [`DismissTiming::fade`].

use alloc::format;
use alloc::string::String;
use core::time::Duration;

use super::StyleDecl;

/// Existing alerts picked up at load.
pub const ALERT_SELECTOR: &str = ".alert";

/// Where new notifications are inserted; `<body>` when absent.
pub const NOTIFICATION_CONTAINER_SELECTOR: &str = ".container";

/// Style that starts the fade-out.
pub const FADE_OUT_STYLE: [StyleDecl; 2] =
    [("opacity", "0"), ("transform", "translateY(-10px)")];

/// Notification kind used when the caller does not name one.
pub const DEFAULT_KIND: &str = "success";

/// Timing of the dismissal sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DismissTiming {
    /// How long the alert stays fully visible.
    pub visible: Duration,
    /// How long the fade runs before the element is removed.
    pub fade: Duration,
}

impl DismissTiming {
    /// Five seconds visible, 300 ms fade.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            visible: Duration::from_millis(5000),
            fade: Duration::from_millis(300),
        }
    }
}

impl Default for DismissTiming {
    fn default() -> Self {
        Self::standard()
    }
}

/// Class attribute for a notification of `kind`.
#[must_use]
pub fn class_name(kind: &str) -> String {
    format!("alert alert-{kind}")
}

/// Icon classes for a notification of `kind`.
///
/// Only `success` gets the check mark; every other kind is shown with the
/// warning icon.
#[must_use]
pub fn icon_class(kind: &str) -> &'static str {
    if kind == "success" {
        "fas fa-check-circle"
    } else {
        "fas fa-exclamation-circle"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markup_by_kind() {
        assert_eq!(class_name("success"), "alert alert-success");
        assert_eq!(class_name("error"), "alert alert-error");
        assert_eq!(icon_class("success"), "fas fa-check-circle");
        assert_eq!(icon_class("warning"), "fas fa-exclamation-circle");
    }

    #[test]
    fn standard_timing() {
        let timing = DismissTiming::standard();
        assert_eq!(timing.visible.as_millis(), 5000);
        assert_eq!(timing.fade.as_millis(), 300);
    }
}
