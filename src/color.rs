// SPDX-FileCopyrightText: The inpulse authors
// SPDX-License-Identifier: MPL-2.0

//! Mapping of RGB colors onto the limited pad color palette.

/// Pad color codes for a selection of RGB colors.
///
/// Arbitrary RGB colors are matched to the nearest entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorMap {
    entries: Vec<(u32, u8)>,
}

const DEFAULT_ENTRIES: [(u32, u8); 18] = [
    (0xff_00_00, 0x60),
    (0xff_ff_00, 0x7c),
    (0x00_ff_00, 0x1c),
    (0x00_ff_ff, 0x1f),
    (0x00_00_ff, 0x03),
    (0xff_00_ff, 0x42),
    (0xff_88_ff, 0x63),
    (0xff_ff_ff, 0x7f),
    (0x00_00_88, 0x02),
    (0x00_88_00, 0x10),
    (0x00_88_88, 0x12),
    (0x22_88_00, 0x30),
    (0x88_00_00, 0x40),
    (0x88_22_00, 0x4c),
    (0x88_88_00, 0x50),
    (0x88_88_88, 0x52),
    (0x88_ff_00, 0x5c),
    (0xff_88_00, 0x74),
];

fn rgb_components(rgb: u32) -> [i32; 3] {
    let [_, red, green, blue] = rgb.to_be_bytes();
    [i32::from(red), i32::from(green), i32::from(blue)]
}

fn distance_squared(lhs: u32, rhs: u32) -> i32 {
    let lhs = rgb_components(lhs);
    let rhs = rgb_components(rhs);
    lhs.iter()
        .zip(rhs.iter())
        .map(|(l, r)| (l - r) * (l - r))
        .sum()
}

impl ColorMap {
    #[must_use]
    pub fn new(entries: impl IntoIterator<Item = (u32, u8)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Device color code of the nearest entry.
    ///
    /// Returns `None` if the map is empty.
    #[must_use]
    pub fn nearest_code(&self, rgb: u32) -> Option<u8> {
        self.entries
            .iter()
            .min_by_key(|(entry_rgb, _)| distance_squared(*entry_rgb, rgb))
            .map(|(_, code)| *code)
    }
}

impl Default for ColorMap {
    fn default() -> Self {
        Self::new(DEFAULT_ENTRIES)
    }
}
