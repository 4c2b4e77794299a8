// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and JSON export for vitrine diagnostics.
//!
//! This crate provides [`TraceSink`](vitrine_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`] — human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`] — in-memory event log with a shared handle, so
//!   the log stays readable after the sink is boxed into a controller.
//! - [`export::export_json`] — writes a recorded log as a JSON array.

pub mod export;
pub mod pretty;
pub mod recorder;
