// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cosmetic page policies.
//!
//! Small, host-independent decisions behind the page's visual behaviors. The
//! web backend owns the DOM side of each one.
//!
//! - [`night`] — night-mode window by local hour.
//! - [`alert`] — alert markup and the timed dismissal sequence.
//! - [`anchor`] — in-page anchor targets for smooth scrolling.
//! - [`reveal`] — scroll-triggered fade-in styles and observer options.
//! - [`format`] — clock and date display helpers.

pub mod alert;
pub mod anchor;
pub mod format;
pub mod night;
pub mod reveal;

/// A single inline style declaration: `(property, value)`.
pub type StyleDecl = (&'static str, &'static str);
