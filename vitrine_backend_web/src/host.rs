// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`MediaHost`] over an `HTMLVideoElement`.
//!
//! [`install_media_controller`] wires a [`PlaybackController`] to the page's
//! background video: it runs the initialization contract, then forwards media
//! events, visibility changes, first interactions, timer and animation-frame
//! wakes, and play-promise outcomes back into the controller.
//!
//! The controller and its host live together in one `Rc<RefCell<_>>`. Every
//! browser callback holds only a `Weak` to it, so dropping the returned
//! [`MediaSession`] turns all pending callbacks into no-ops.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;
use core::time::Duration;

use vitrine_core::config::{MediaSource, PlaybackConfig, SurfaceSetup};
use vitrine_core::controller::{PlaybackController, PlaybackEvent, PlaybackState, StartOutcome};
use vitrine_core::env::EnvironmentSnapshot;
use vitrine_core::media::{
    FallbackDisplay, InteractionKind, MediaHost, PlayRejected, ReadyState, SurfaceClass, Wake,
};
use vitrine_core::trace::TraceSink;
use wasm_bindgen::JsCast as _;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    AddEventListenerOptions, Document, DomException, Event, EventTarget, HtmlElement,
    HtmlSourceElement, HtmlVideoElement, console,
};

use crate::timer;

/// `id` of the background video element.
pub const VIDEO_ELEMENT_ID: &str = "bgVideo";

/// Selector of the static fallback shown instead of, or behind, the video.
pub const FALLBACK_SELECTOR: &str = ".video-fallback";

type EventClosure = Closure<dyn FnMut(Event)>;

struct Session {
    controller: PlaybackController,
    host: WebMediaHost,
}

/// Runs `f` against the live session, if it still exists and is not already
/// borrowed by an outer callback.
fn with_session(
    session: &Weak<RefCell<Session>>,
    f: impl FnOnce(&mut PlaybackController, &mut WebMediaHost),
) {
    let Some(session) = session.upgrade() else {
        return;
    };
    let Ok(mut guard) = session.try_borrow_mut() else {
        console::warn_1(&JsValue::from_str("vitrine: re-entrant media callback dropped"));
        return;
    };
    let Session { controller, host } = &mut *guard;
    f(controller, host);
}

/// [`MediaHost`] implementation over a video element and its fallback.
pub struct WebMediaHost {
    video: HtmlVideoElement,
    document: Document,
    fallback: Option<HtmlElement>,
    session: Weak<RefCell<Session>>,
    /// First-interaction listeners. They stay owned here after removal: the
    /// closure that triggers the removal is one of them and is still running.
    interaction: Vec<(InteractionKind, EventClosure)>,
    interaction_attached: bool,
}

impl core::fmt::Debug for WebMediaHost {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WebMediaHost")
            .field("video", &"HtmlVideoElement")
            .field("has_fallback", &self.fallback.is_some())
            .field("interaction_attached", &self.interaction_attached)
            .finish_non_exhaustive()
    }
}

impl WebMediaHost {
    fn append_source(&self, source: &MediaSource) -> Result<(), JsValue> {
        let element: HtmlSourceElement = self.document.create_element("source")?.unchecked_into();
        element.set_src(source.url);
        element.set_type(source.mime);
        self.video.append_child(&element)?;
        Ok(())
    }
}

impl MediaHost for WebMediaHost {
    fn is_paused(&self) -> bool {
        self.video.paused()
    }

    fn ready_state(&self) -> ReadyState {
        ReadyState::from_raw(self.video.ready_state())
    }

    fn current_time(&self) -> f64 {
        self.video.current_time()
    }

    fn duration(&self) -> f64 {
        self.video.duration()
    }

    fn seek(&mut self, seconds: f64) {
        self.video.set_current_time(seconds);
    }

    fn document_hidden(&self) -> bool {
        self.document.hidden()
    }

    fn configure(&mut self, setup: &SurfaceSetup) {
        let video = &self.video;
        video.set_muted(setup.muted);
        video.set_loop(setup.looping);
        video.set_controls(setup.controls);
        video.set_preload(setup.preload.as_str());
        if setup.muted {
            let _ = video.set_attribute("muted", "");
        }
        if setup.plays_inline {
            let _ = video.set_attribute("playsinline", "true");
            let _ = video.set_attribute("webkit-playsinline", "true");
        }
        if setup.disable_remote {
            let _ = video.set_attribute("disablepictureinpicture", "");
            let _ = video.set_attribute("disableremoteplayback", "");
        }
    }

    fn attach_source(&mut self, source: &MediaSource) {
        if let Err(err) = self.append_source(source) {
            console::warn_2(&JsValue::from_str("vitrine: could not attach media source"), &err);
        }
    }

    fn load(&mut self) {
        self.video.load();
    }

    fn set_muted(&mut self, muted: bool) {
        self.video.set_muted(muted);
    }

    fn request_play(&mut self) {
        // `play()` can also throw synchronously; either way the outcome is
        // reported from a microtask, after the current borrow is released.
        let promise = self.video.play();
        let session = self.session.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let outcome = match promise {
                Ok(promise) => JsFuture::from(promise).await.map(drop),
                Err(err) => Err(err),
            };
            let outcome = outcome.map_err(|err| rejection_reason(&err));
            with_session(&session, |controller, host| {
                controller.on_play_resolved(outcome, host);
            });
        });
    }

    fn set_surface_class(&mut self, class: SurfaceClass, enabled: bool) {
        let _ = self
            .video
            .class_list()
            .toggle_with_force(class.as_str(), enabled);
    }

    fn set_surface_visible(&mut self, visible: bool) {
        let style = self.video.style();
        if visible {
            let _ = style.remove_property("display");
        } else {
            let _ = style.set_property("display", "none");
        }
    }

    fn set_fallback(&mut self, display: FallbackDisplay) {
        let Some(fallback) = &self.fallback else {
            return;
        };
        let style = fallback.style();
        let _ = match display {
            FallbackDisplay::Hidden => style.set_property("display", "none"),
            FallbackDisplay::Shown => style.set_property("display", "block"),
            FallbackDisplay::Opaque => style.set_property("opacity", "1"),
        };
    }

    fn schedule(&mut self, wake: Wake, delay: Duration) {
        let session = self.session.clone();
        timer::after(delay, move || {
            with_session(&session, |controller, host| controller.on_wake(wake, host));
        });
    }

    fn request_frame(&mut self, wake: Wake) {
        let session = self.session.clone();
        timer::next_frame(move || {
            with_session(&session, |controller, host| controller.on_wake(wake, host));
        });
    }

    fn detach_interaction_listeners(&mut self) {
        if !self.interaction_attached {
            return;
        }
        self.interaction_attached = false;
        for (kind, closure) in &self.interaction {
            let _ = self.document.remove_event_listener_with_callback(
                kind.event_type(),
                closure.as_ref().unchecked_ref(),
            );
        }
    }
}

/// Maps a play-promise rejection to its reason.
fn rejection_reason(err: &JsValue) -> PlayRejected {
    err.dyn_ref::<DomException>()
        .map_or(PlayRejected::Other, |exception| {
            PlayRejected::from_exception_name(&exception.name())
        })
}

fn listener_options(once: bool) -> AddEventListenerOptions {
    let options = AddEventListenerOptions::new();
    options.set_passive(true);
    options.set_once(once);
    options
}

/// Handle to an installed media controller.
///
/// Keep it alive for as long as the page should be managed; on the web that
/// usually means `core::mem::forget`.
pub struct MediaSession {
    inner: Rc<RefCell<Session>>,
}

impl core::fmt::Debug for MediaSession {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut s = f.debug_struct("MediaSession");
        match self.inner.try_borrow() {
            Ok(session) => s
                .field("state", &session.controller.state())
                .field("attempts", &session.controller.attempts())
                .finish_non_exhaustive(),
            Err(_) => s.finish_non_exhaustive(),
        }
    }
}

impl MediaSession {
    /// Current controller state.
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.inner.borrow().controller.state()
    }

    /// Play attempts made since the last reset.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.inner.borrow().controller.attempts()
    }

    /// Removes the installed trace sink, if any.
    pub fn take_trace_sink(&self) -> Option<Box<dyn TraceSink>> {
        self.inner.borrow_mut().controller.take_trace_sink()
    }
}

/// Installs the adaptive background-media controller on `document`.
///
/// Returns `Ok(None)` when the page has no `#bgVideo` element. When the
/// environment disallows motion the fallback is shown and no listener is
/// attached.
pub fn install_media_controller(
    document: &Document,
    env: &EnvironmentSnapshot,
    sink: Option<Box<dyn TraceSink>>,
) -> Result<Option<MediaSession>, JsValue> {
    let Some(video) = document.get_element_by_id(VIDEO_ELEMENT_ID) else {
        return Ok(None);
    };
    let video: HtmlVideoElement = video.dyn_into()?;
    let fallback = document
        .query_selector(FALLBACK_SELECTOR)?
        .and_then(|el| el.dyn_into::<HtmlElement>().ok());

    let mut controller = PlaybackController::new(PlaybackConfig::standard());
    if let Some(sink) = sink {
        controller.set_trace_sink(sink);
    }

    let inner = Rc::new_cyclic(|weak| {
        RefCell::new(Session {
            controller,
            host: WebMediaHost {
                video: video.clone(),
                document: document.clone(),
                fallback,
                session: weak.clone(),
                interaction: Vec::new(),
                interaction_attached: false,
            },
        })
    });

    let outcome = {
        let mut guard = inner.borrow_mut();
        let Session { controller, host } = &mut *guard;
        controller.start(env, host)
    };
    if outcome == StartOutcome::Preloading {
        let weak = Rc::downgrade(&inner);
        attach_media_listeners(&video, document, &weak)?;
        let interaction = attach_interaction_listeners(document, &weak)?;
        let mut guard = inner.borrow_mut();
        guard.host.interaction = interaction;
        guard.host.interaction_attached = true;
    }

    Ok(Some(MediaSession { inner }))
}

fn listen(
    target: &EventTarget,
    event_type: &str,
    once: bool,
    session: &Weak<RefCell<Session>>,
    event: PlaybackEvent,
) -> Result<EventClosure, JsValue> {
    let session = session.clone();
    let closure = Closure::wrap(Box::new(move |_event: Event| {
        with_session(&session, |controller, host| controller.handle_event(event, host));
    }) as Box<dyn FnMut(_)>);
    target.add_event_listener_with_callback_and_add_event_listener_options(
        event_type,
        closure.as_ref().unchecked_ref(),
        &listener_options(once),
    )?;
    Ok(closure)
}

fn attach_media_listeners(
    video: &HtmlVideoElement,
    document: &Document,
    session: &Weak<RefCell<Session>>,
) -> Result<(), JsValue> {
    const MEDIA_EVENTS: [(&str, bool, PlaybackEvent); 5] = [
        ("loadedmetadata", true, PlaybackEvent::LoadedMetadata),
        ("canplaythrough", true, PlaybackEvent::CanPlayThrough),
        ("canplay", false, PlaybackEvent::CanPlay),
        ("timeupdate", false, PlaybackEvent::TimeUpdate),
        ("pause", false, PlaybackEvent::Pause),
    ];
    for (event_type, once, event) in MEDIA_EVENTS {
        listen(video, event_type, once, session, event)?.forget();
    }
    listen(
        document,
        "visibilitychange",
        false,
        session,
        PlaybackEvent::VisibilityChange,
    )?
    .forget();
    Ok(())
}

fn attach_interaction_listeners(
    document: &Document,
    session: &Weak<RefCell<Session>>,
) -> Result<Vec<(InteractionKind, EventClosure)>, JsValue> {
    InteractionKind::ALL
        .into_iter()
        .map(|kind| {
            let closure = listen(
                document,
                kind.event_type(),
                false,
                session,
                PlaybackEvent::Interaction(kind),
            )?;
            Ok((kind, closure))
        })
        .collect()
}
