// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll-triggered fade-in.
//!
//! Matching elements start transparent and shifted down. The first time one
//! intersects the viewport it transitions to its resting style. Elements are
//! never hidden again once revealed.

use super::StyleDecl;

/// Elements that fade in on scroll.
pub const REVEAL_SELECTOR: &str = ".card, .stat-card, .feature-card";

/// Style applied before the element is first seen.
pub const HIDDEN_STYLE: [StyleDecl; 3] = [
    ("opacity", "0"),
    ("transform", "translateY(20px)"),
    ("transition", "opacity 0.5s ease, transform 0.5s ease"),
];

/// Style applied once the element intersects the viewport.
pub const SHOWN_STYLE: [StyleDecl; 2] = [("opacity", "1"), ("transform", "translateY(0)")];

/// Intersection observer parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealOptions {
    /// Fraction of the element that must be visible.
    pub threshold: f64,
    /// Root margin; the negative bottom inset delays the reveal slightly.
    pub root_margin: &'static str,
}

impl RevealOptions {
    /// 10% visibility, 50px before the bottom edge.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            threshold: 0.1,
            root_margin: "0px 0px -50px 0px",
        }
    }
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self::standard()
    }
}

/// Style to apply for an intersection observer entry, if any.
#[must_use]
pub fn style_for_entry(is_intersecting: bool) -> Option<&'static [StyleDecl]> {
    is_intersecting.then_some(&SHOWN_STYLE[..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_intersecting_entries_change() {
        assert_eq!(style_for_entry(false), None);
        let shown = style_for_entry(true).expect("shown style");
        assert!(shown.contains(&("opacity", "1")), "fully opaque");
    }

    #[test]
    fn hidden_style_sets_transition() {
        assert!(
            HIDDEN_STYLE.iter().any(|(prop, _)| *prop == "transition"),
            "reveal must animate"
        );
    }
}
