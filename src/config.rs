// SPDX-FileCopyrightText: The inpulse authors
// SPDX-License-Identifier: MPL-2.0

use crate::ColorMap;

/// LED values of a pad or button in its on and off state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PadColors {
    pub on: u8,
    pub off: u8,
}

impl PadColors {
    #[must_use]
    pub const fn new(on: u8, off: u8) -> Self {
        Self { on, off }
    }

    #[must_use]
    pub const fn select(self, on: bool) -> u8 {
        if on {
            self.on
        } else {
            self.off
        }
    }
}

/// Colors of the beat jump and pitch pads, pairwise grouped.
pub const PAIR_COLORS: [PadColors; 8] = [
    PadColors::new(0x1f, 0x12),
    PadColors::new(0x1f, 0x12),
    PadColors::new(0x03, 0x02),
    PadColors::new(0x03, 0x02),
    PadColors::new(0x74, 0x4c),
    PadColors::new(0x74, 0x4c),
    PadColors::new(0x60, 0x40),
    PadColors::new(0x60, 0x40),
];

/// Static policy options.
///
/// Loaded once at startup and immutable afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    /// Scroll the playlist instead of the library when the host
    /// window is not focused.
    pub browser_off_focus_mode: bool,

    /// Initial vinyl (scratch) mode of all decks.
    pub initial_vinyl_mode: bool,

    /// Hotcue colors
    pub pad_colors: ColorMap,

    pub pair_colors: [PadColors; 8],
}

impl Default for Config {
    fn default() -> Self {
        Self {
            browser_off_focus_mode: false,
            initial_vinyl_mode: true,
            pad_colors: ColorMap::default(),
            pair_colors: PAIR_COLORS,
        }
    }
}
