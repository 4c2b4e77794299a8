// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Night mode.

/// Class added to `<body>` during the night window.
pub const NIGHT_MODE_CLASS: &str = "night-mode";

/// Local-time window during which night mode applies.
///
/// The window may wrap past midnight: `start_hour` is inclusive, `end_hour`
/// exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NightWindow {
    /// First night hour (0-23).
    pub start_hour: u8,
    /// First day hour after the night (0-23).
    pub end_hour: u8,
}

impl NightWindow {
    /// 22:00 to 06:00.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            start_hour: 22,
            end_hour: 6,
        }
    }

    /// Whether `hour` (0-23) falls inside the window.
    #[must_use]
    pub const fn contains(&self, hour: u8) -> bool {
        if self.start_hour > self.end_hour {
            hour >= self.start_hour || hour < self.end_hour
        } else {
            hour >= self.start_hour && hour < self.end_hour
        }
    }
}

impl Default for NightWindow {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_window_wraps_midnight() {
        let night = NightWindow::standard();
        let on: [u8; 8] = [22, 23, 0, 1, 2, 3, 4, 5];
        for hour in 0..24 {
            assert_eq!(night.contains(hour), on.contains(&hour), "hour {hour}");
        }
    }

    #[test]
    fn non_wrapping_window() {
        let siesta = NightWindow {
            start_hour: 13,
            end_hour: 15,
        };
        assert!(siesta.contains(13), "start is inclusive");
        assert!(!siesta.contains(15), "end is exclusive");
        assert!(!siesta.contains(2), "outside");
    }
}
