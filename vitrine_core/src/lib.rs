// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host-independent logic for ambient page behaviors.
//!
//! `vitrine_core` holds every decision the page makes, separated from the
//! browser so it can be exercised without one. It is `no_std` compatible
//! (with `alloc`).
//!
//! # Architecture
//!
//! The centerpiece is the adaptive background-media controller:
//!
//! ```text
//!   Backend (reads host signals)
//!       │
//!       ▼
//!   EnvironmentSignals ──► env::classify() ──► EnvironmentSnapshot
//!                                                   │
//!                 ┌─────────────────────────────────┘
//!                 ▼
//!   PlaybackController::start() ──► MediaHost (configure, load, schedule)
//!                 ▲                        │
//!                 │   PlaybackEvent, Wake, play outcome
//!                 └────────────────────────┘
//! ```
//!
//! **[`env`]** — Environment classification: mobile detection, slow
//! connection detection, motion preference.
//!
//! **[`config`]** — Fixed playback constants and the surface setup derived
//! from them.
//!
//! **[`media`]** — The [`MediaHost`](media::MediaHost) trait that backends
//! implement, and the small types that cross it.
//!
//! **[`controller`]** — The [`PlaybackController`](controller::PlaybackController)
//! state machine.
//!
//! **[`cosmetic`]** — Night mode, alert dismissal, anchor scrolling,
//! scroll-reveal and formatting policies.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types for
//! controller instrumentation, with a zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod config;
pub mod controller;
pub mod cosmetic;
pub mod env;
pub mod media;
pub mod trace;
