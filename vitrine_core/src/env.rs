// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Environment classification.
//!
//! Backends read raw host signals into an [`EnvironmentSignals`] value (viewport
//! width, user-agent string, network-information hint, motion preference).
//! [`classify`] reduces those to an [`EnvironmentSnapshot`], the read-once
//! record the [`PlaybackController`](crate::controller::PlaybackController)
//! makes its decisions from. Keeping the sniffing here means the decision logic
//! can be exercised without a browser.

use alloc::string::String;

/// Viewports at or below this width (in CSS pixels) count as mobile.
pub const MOBILE_MAX_VIEWPORT_WIDTH: f64 = 768.0;

/// User-agent tokens that mark a mobile device. Matched case-insensitively.
pub const MOBILE_USER_AGENT_TOKENS: [&str; 8] = [
    "Android",
    "webOS",
    "iPhone",
    "iPad",
    "iPod",
    "BlackBerry",
    "IEMobile",
    "Opera Mini",
];

/// Effective connection class reported by the Network Information API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectiveConnectionType {
    /// `slow-2g`
    Slow2g,
    /// `2g`
    TwoG,
    /// `3g`
    ThreeG,
    /// `4g`
    FourG,
}

impl EffectiveConnectionType {
    /// Parses the platform's `effectiveType` string.
    ///
    /// Returns `None` for values the platform may add later.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "slow-2g" => Some(Self::Slow2g),
            "2g" => Some(Self::TwoG),
            "3g" => Some(Self::ThreeG),
            "4g" => Some(Self::FourG),
            _ => None,
        }
    }

    /// Returns the platform string for this class.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Slow2g => "slow-2g",
            Self::TwoG => "2g",
            Self::ThreeG => "3g",
            Self::FourG => "4g",
        }
    }

    /// Whether this class is too slow for background video.
    #[must_use]
    pub const fn is_slow(self) -> bool {
        matches!(self, Self::Slow2g | Self::TwoG)
    }
}

/// Optional fields of the host's network-information object.
///
/// Every field may be missing; an absent field never marks the connection as
/// slow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConnectionHint {
    /// The user asked the browser to reduce data usage.
    pub save_data: Option<bool>,
    /// Effective connection class, if reported.
    pub effective_type: Option<EffectiveConnectionType>,
}

/// Raw signals read from the host at initialization time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnvironmentSignals {
    /// Viewport width in CSS pixels.
    pub viewport_width: f64,
    /// The user-agent string.
    pub user_agent: String,
    /// Network-information hint, `None` when the API is unavailable.
    pub connection: Option<ConnectionHint>,
    /// Result of the `(prefers-reduced-motion: reduce)` media query.
    pub prefers_reduced_motion: bool,
}

/// Derived environment facts, computed once per page load.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct EnvironmentSnapshot {
    /// Mobile user agent or narrow viewport.
    pub is_mobile: bool,
    /// Data-saver enabled or a 2G-class connection.
    pub is_slow_connection: bool,
    /// The user asked for reduced motion.
    pub prefers_reduced_motion: bool,
}

impl EnvironmentSnapshot {
    /// Whether motion media may be shown at all.
    ///
    /// Motion is disabled when reduced motion is preferred, or when a mobile
    /// device is on a slow connection.
    #[must_use]
    pub const fn allows_motion(&self) -> bool {
        !(self.prefers_reduced_motion || (self.is_slow_connection && self.is_mobile))
    }
}

/// Reduces raw host signals to an [`EnvironmentSnapshot`].
#[must_use]
pub fn classify(signals: &EnvironmentSignals) -> EnvironmentSnapshot {
    let is_mobile = is_mobile_user_agent(&signals.user_agent)
        || signals.viewport_width <= MOBILE_MAX_VIEWPORT_WIDTH;
    let is_slow_connection = signals.connection.is_some_and(|hint| {
        hint.save_data == Some(true) || hint.effective_type.is_some_and(|t| t.is_slow())
    });
    EnvironmentSnapshot {
        is_mobile,
        is_slow_connection,
        prefers_reduced_motion: signals.prefers_reduced_motion,
    }
}

/// Returns `true` if `user_agent` contains any mobile token, ignoring ASCII case.
#[must_use]
pub fn is_mobile_user_agent(user_agent: &str) -> bool {
    MOBILE_USER_AGENT_TOKENS
        .iter()
        .any(|token| contains_ignore_ascii_case(user_agent, token))
}

fn contains_ignore_ascii_case(haystack: &str, needle: &str) -> bool {
    let (haystack, needle) = (haystack.as_bytes(), needle.as_bytes());
    if needle.is_empty() {
        return true;
    }
    haystack
        .windows(needle.len())
        .any(|window| window.eq_ignore_ascii_case(needle))
}
