// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host contract for the media controller.
//!
//! The [`PlaybackController`](crate::controller::PlaybackController) never
//! touches the DOM or a timer API directly. Everything it needs goes through
//! [`MediaHost`]:
//!
//! - **Media surface** — the video-like element: paused flag, readiness,
//!   position, mute, play command, class toggles and visibility.
//! - **Fallback** — the static image shown instead of (or under) the surface.
//! - **Document** — the visibility flag.
//! - **Scheduling** — one-shot timers and animation-frame callbacks, both of
//!   which come back to the controller as a [`Wake`].
//! - **Interaction listeners** — the host owns them; the controller only asks
//!   for them to be detached after the first one fires.
//!
//! Play commands are asynchronous on every host. [`MediaHost::request_play`]
//! only issues the command; the host reports the outcome later through
//! [`PlaybackController::on_play_resolved`].
//!
//! [`PlaybackController::on_play_resolved`]: crate::controller::PlaybackController::on_play_resolved

use core::fmt;
use core::time::Duration;

use crate::config::{MediaSource, SurfaceSetup};

/// HTML media readiness (`HTMLMediaElement.readyState`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReadyState {
    /// No information about the resource.
    HaveNothing = 0,
    /// Duration and dimensions are known.
    HaveMetadata = 1,
    /// Data for the current position only.
    HaveCurrentData = 2,
    /// Enough data to advance a little.
    HaveFutureData = 3,
    /// Enough data to play through without stalling.
    HaveEnoughData = 4,
}

impl ReadyState {
    /// Converts the raw attribute value, clamping unknown values to
    /// [`HaveEnoughData`](Self::HaveEnoughData).
    #[must_use]
    pub const fn from_raw(raw: u16) -> Self {
        match raw {
            0 => Self::HaveNothing,
            1 => Self::HaveMetadata,
            2 => Self::HaveCurrentData,
            3 => Self::HaveFutureData,
            _ => Self::HaveEnoughData,
        }
    }
}

/// Classes the controller toggles on the media surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SurfaceClass {
    /// Data is still arriving.
    Loading,
    /// Playback has started.
    Playing,
}

impl SurfaceClass {
    /// CSS class name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Playing => "playing",
        }
    }
}

/// How the fallback element should be displayed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FallbackDisplay {
    /// Removed from layout (`display: none`).
    Hidden,
    /// In layout (`display: block`).
    Shown,
    /// Forced fully opaque (`opacity: 1`) without touching layout.
    Opaque,
}

/// Reason a scheduled callback fired.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Wake {
    /// Retry after a rejected play command.
    Retry,
    /// One of the post-initialization bootstrap attempts.
    Bootstrap,
    /// The readiness deadline.
    Deadline,
    /// Next animation frame after an unexpected pause.
    Frame,
}

/// Document events that count as a first user interaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    /// `touchstart`
    TouchStart,
    /// `touchend`
    TouchEnd,
    /// `click`
    Click,
    /// `scroll`
    Scroll,
}

impl InteractionKind {
    /// Every tracked interaction, in registration order.
    pub const ALL: [Self; 4] = [Self::TouchStart, Self::TouchEnd, Self::Click, Self::Scroll];

    /// DOM event type name.
    #[must_use]
    pub const fn event_type(self) -> &'static str {
        match self {
            Self::TouchStart => "touchstart",
            Self::TouchEnd => "touchend",
            Self::Click => "click",
            Self::Scroll => "scroll",
        }
    }
}

/// Why the host refused to start playback.
///
/// Rejections are expected under autoplay policies; the controller retries
/// and never surfaces them to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayRejected {
    /// The host requires a user gesture (`NotAllowedError`).
    NotAllowed,
    /// The resource cannot be played (`NotSupportedError`).
    NotSupported,
    /// A later `pause()` or `load()` interrupted the request (`AbortError`).
    Aborted,
    /// Any other failure.
    Other,
}

impl PlayRejected {
    /// Maps a DOM exception name to a rejection reason.
    #[must_use]
    pub fn from_exception_name(name: &str) -> Self {
        match name {
            "NotAllowedError" => Self::NotAllowed,
            "NotSupportedError" => Self::NotSupported,
            "AbortError" => Self::Aborted,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for PlayRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAllowed => f.write_str("playback requires a user gesture"),
            Self::NotSupported => f.write_str("media resource is not playable"),
            Self::Aborted => f.write_str("play request was interrupted"),
            Self::Other => f.write_str("playback failed to start"),
        }
    }
}

impl core::error::Error for PlayRejected {}

/// Everything the media controller reads from or commands on its host.
///
/// The web backend implements this over an `HTMLVideoElement`; the simulated
/// host in `vitrine_sim` implements it over plain fields with a virtual clock.
pub trait MediaHost {
    /// `true` while the surface is paused.
    fn is_paused(&self) -> bool;

    /// Current readiness of the surface.
    fn ready_state(&self) -> ReadyState;

    /// Playback position in seconds.
    fn current_time(&self) -> f64;

    /// Resource duration in seconds; NaN or infinite while unknown.
    fn duration(&self) -> f64;

    /// Moves the playback position.
    fn seek(&mut self, seconds: f64);

    /// `true` while the document is hidden (background tab).
    fn document_hidden(&self) -> bool;

    /// Applies static attributes to the surface.
    fn configure(&mut self, setup: &SurfaceSetup);

    /// Attaches the media resource.
    fn attach_source(&mut self, source: &MediaSource);

    /// Starts fetching the attached resource.
    fn load(&mut self);

    /// Sets the muted flag.
    fn set_muted(&mut self, muted: bool);

    /// Issues a play command. The outcome is reported asynchronously.
    fn request_play(&mut self);

    /// Adds or removes a class on the surface.
    fn set_surface_class(&mut self, class: SurfaceClass, enabled: bool);

    /// Shows or hides the surface entirely.
    fn set_surface_visible(&mut self, visible: bool);

    /// Updates the fallback element. A missing fallback is a no-op.
    fn set_fallback(&mut self, display: FallbackDisplay);

    /// Arranges for `wake` to be delivered after `delay`.
    fn schedule(&mut self, wake: Wake, delay: Duration);

    /// Arranges for `wake` to be delivered on the next animation frame.
    fn request_frame(&mut self, wake: Wake);

    /// Detaches every first-interaction listener.
    fn detach_interaction_listeners(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_state_ordering_and_clamp() {
        assert!(ReadyState::HaveCurrentData < ReadyState::HaveFutureData);
        assert_eq!(ReadyState::from_raw(3), ReadyState::HaveFutureData);
        assert_eq!(ReadyState::from_raw(9), ReadyState::HaveEnoughData);
    }

    #[test]
    fn rejection_from_exception_name() {
        assert_eq!(
            PlayRejected::from_exception_name("NotAllowedError"),
            PlayRejected::NotAllowed
        );
        assert_eq!(
            PlayRejected::from_exception_name("SecurityError"),
            PlayRejected::Other
        );
    }

    #[test]
    fn interaction_event_types() {
        let names = InteractionKind::ALL.map(InteractionKind::event_type);
        assert_eq!(names, ["touchstart", "touchend", "click", "scroll"]);
    }
}
