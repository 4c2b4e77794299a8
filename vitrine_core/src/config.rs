// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed playback constants and the media-surface setup derived from them.
//!
//! There is no runtime configuration input. [`PlaybackConfig::standard`] is the
//! only preset; it exists as a value so the controller, backends and tests all
//! read the same numbers.

use core::time::Duration;

use crate::env::EnvironmentSnapshot;

/// Preload hint applied to the media surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Preload {
    /// Fetch only metadata until playback starts.
    Metadata,
    /// Let the host fetch as much as it likes.
    Auto,
}

impl Preload {
    /// Returns the attribute value for the `preload` property.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Metadata => "metadata",
            Self::Auto => "auto",
        }
    }
}

/// A selected media resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MediaSource {
    /// Resource URL.
    pub url: &'static str,
    /// MIME type announced on the `<source>` element.
    pub mime: &'static str,
}

/// Attributes applied to the media surface before anything is loaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SurfaceSetup {
    /// Start muted; autoplay policies only admit muted playback.
    pub muted: bool,
    /// Native loop flag.
    pub looping: bool,
    /// Show native controls.
    pub controls: bool,
    /// Play inline on mobile instead of going fullscreen.
    pub plays_inline: bool,
    /// Disable picture-in-picture and remote playback.
    pub disable_remote: bool,
    /// Preload hint.
    pub preload: Preload,
}

/// Constants for the adaptive media controller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaybackConfig {
    /// Automatic play attempts allowed between reset triggers.
    pub max_attempts: u32,
    /// Delay before retrying a rejected play command.
    pub retry_delay: Duration,
    /// Delays after initialization at which a play attempt is made regardless
    /// of media events.
    pub bootstrap_delays: [Duration; 2],
    /// Time after initialization at which the fallback is revealed if too
    /// little data has loaded.
    pub deadline: Duration,
    /// Seconds before the end at which playback seeks back to the start.
    pub loop_tail: f64,
    /// Source used on mobile devices.
    pub mobile_source: MediaSource,
    /// Source used everywhere else.
    pub default_source: MediaSource,
}

impl PlaybackConfig {
    /// The fixed preset used by every backend.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::from_millis(200),
            bootstrap_delays: [Duration::from_millis(100), Duration::from_millis(500)],
            deadline: Duration::from_millis(5000),
            loop_tail: 0.2,
            mobile_source: MediaSource {
                url: "/static/background-mobile.mp4",
                mime: "video/mp4",
            },
            default_source: MediaSource {
                url: "/static/background.mp4",
                mime: "video/mp4",
            },
        }
    }

    /// Picks the source variant for the device class.
    #[must_use]
    pub const fn source_for(&self, env: &EnvironmentSnapshot) -> MediaSource {
        if env.is_mobile {
            self.mobile_source
        } else {
            self.default_source
        }
    }

    /// Surface attributes for the device class.
    #[must_use]
    pub const fn surface_setup(&self, env: &EnvironmentSnapshot) -> SurfaceSetup {
        SurfaceSetup {
            muted: true,
            looping: true,
            controls: false,
            plays_inline: true,
            disable_remote: true,
            preload: if env.is_mobile {
                Preload::Metadata
            } else {
                Preload::Auto
            },
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self::standard()
    }
}
