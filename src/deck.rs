// SPDX-FileCopyrightText: The inpulse authors
// SPDX-License-Identifier: MPL-2.0

//! Physical channel strips and logical decks.

use strum::{Display, EnumCount, EnumIter, FromRepr};

use crate::{PadMode, SlicerState};

/// One of the two physical halves of the device.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumCount, EnumIter, FromRepr,
)]
#[repr(u8)]
pub enum Strip {
    A,
    B,
}

impl Strip {
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// MIDI channel (0-based)
    #[must_use]
    pub const fn midi_channel(self) -> u8 {
        self as u8 + 1
    }

    /// Buttons
    #[must_use]
    pub const fn note_status(self) -> u8 {
        0x90 + self.midi_channel()
    }

    /// Knobs, faders, and encoders
    #[must_use]
    pub const fn cc_status(self) -> u8 {
        0xb0 + self.midi_channel()
    }

    /// Buttons while shift is pressed
    #[must_use]
    pub const fn shifted_note_status(self) -> u8 {
        0x93 + self.midi_channel()
    }

    /// Encoders while shift is pressed
    #[must_use]
    pub const fn shifted_cc_status(self) -> u8 {
        0xb3 + self.midi_channel()
    }

    /// Performance pads
    #[must_use]
    pub const fn pad_status(self) -> u8 {
        0x95 + self.midi_channel()
    }

    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }

    /// The two decks that this strip may control.
    #[must_use]
    pub const fn home_decks(self) -> [LogicalDeck; 2] {
        match self {
            Self::A => [LogicalDeck::One, LogicalDeck::Three],
            Self::B => [LogicalDeck::Two, LogicalDeck::Four],
        }
    }

    #[must_use]
    pub const fn initial_deck(self) -> LogicalDeck {
        self.home_decks()[0]
    }
}

/// One of the four decks of the host.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumCount, EnumIter, FromRepr,
)]
#[repr(u8)]
pub enum LogicalDeck {
    #[strum(to_string = "[Channel1]")]
    One,
    #[strum(to_string = "[Channel2]")]
    Two,
    #[strum(to_string = "[Channel3]")]
    Three,
    #[strum(to_string = "[Channel4]")]
    Four,
}

impl LogicalDeck {
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// 1-based number
    #[must_use]
    pub const fn number(self) -> u8 {
        self as u8 + 1
    }

    /// Name of the control group in the host.
    #[must_use]
    pub const fn group(self) -> &'static str {
        match self {
            Self::One => "[Channel1]",
            Self::Two => "[Channel2]",
            Self::Three => "[Channel3]",
            Self::Four => "[Channel4]",
        }
    }

    /// The strip that controls this deck by default.
    ///
    /// Decks 1 and 3 are controlled by strip A, decks 2 and 4 by strip B.
    #[must_use]
    pub const fn home_strip(self) -> Strip {
        match self {
            Self::One | Self::Three => Strip::A,
            Self::Two | Self::Four => Strip::B,
        }
    }

    /// The other deck with the same home strip.
    #[must_use]
    pub const fn sibling(self) -> Self {
        match self {
            Self::One => Self::Three,
            Self::Two => Self::Four,
            Self::Three => Self::One,
            Self::Four => Self::Two,
        }
    }
}

/// Selectable pitch fader ranges (+/-)
pub const PITCH_RANGES: [f64; 7] = [0.08, 0.10, 0.15, 0.16, 0.24, 0.50, 0.90];

/// Index into [`PITCH_RANGES`].
///
/// Stepping beyond either end is clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PitchRange {
    index: usize,
}

impl PitchRange {
    pub const MAX_INDEX: usize = PITCH_RANGES.len() - 1;

    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }

    #[must_use]
    pub const fn value(self) -> f64 {
        PITCH_RANGES[self.index]
    }

    #[must_use]
    pub fn increased(self) -> Self {
        Self {
            index: (self.index + 1).min(Self::MAX_INDEX),
        }
    }

    #[must_use]
    pub fn decreased(self) -> Self {
        Self {
            index: self.index.saturating_sub(1),
        }
    }

    #[must_use]
    pub fn reset() -> Self {
        Self::default()
    }
}

/// Controller-side state of a logical deck.
#[derive(Debug, Clone, Default)]
pub struct DeckState {
    pub slicer: SlicerState,
    pub pitch_range: PitchRange,
    pub vinyl_mode: bool,

    /// Pausing a playing deck brakes instead of stopping immediately.
    pub slow_pause: bool,
}

impl DeckState {
    #[must_use]
    pub fn new(vinyl_mode: bool) -> Self {
        Self {
            vinyl_mode,
            ..Default::default()
        }
    }
}

/// Controller-side state of a physical strip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StripState {
    pub shift: bool,

    /// The most recently selected pad mode.
    ///
    /// `None` until a pad mode button has been pressed.
    pub pad_mode: Option<PadMode>,

    /// The filter knob controls the effect unit instead of the filter.
    pub only_effect: bool,

    /// The filter knob controls both the effect unit and the filter.
    pub filter_and_effect: bool,
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator as _;

    use super::*;

    #[test]
    fn strip_addresses() {
        assert_eq!(0x91, Strip::A.note_status());
        assert_eq!(0xb2, Strip::B.cc_status());
        assert_eq!(0x94, Strip::A.shifted_note_status());
        assert_eq!(0xb5, Strip::B.shifted_cc_status());
        assert_eq!(0x96, Strip::A.pad_status());
        assert_eq!(0x97, Strip::B.pad_status());
    }

    #[test]
    fn deck_group_matches_display() {
        for deck in LogicalDeck::iter() {
            assert_eq!(deck.group(), deck.to_string());
            assert_eq!(
                format!("[Channel{number}]", number = deck.number()),
                deck.group()
            );
        }
    }

    #[test]
    fn home_strips_and_siblings() {
        for strip in Strip::iter() {
            for deck in strip.home_decks() {
                assert_eq!(strip, deck.home_strip());
                assert_eq!(strip, deck.sibling().home_strip());
                assert_ne!(deck, deck.sibling());
            }
        }
        assert_eq!(LogicalDeck::One, Strip::A.initial_deck());
        assert_eq!(LogicalDeck::Two, Strip::B.initial_deck());
    }

    #[test]
    fn pitch_range_is_clamped() {
        let mut range = PitchRange::default();
        for _ in 0..20 {
            range = range.increased();
        }
        assert_eq!(6, range.index());
        assert!(float_cmp::approx_eq!(f64, 0.90, range.value()));
        for _ in 0..20 {
            range = range.decreased();
        }
        assert_eq!(0, range.index());
        assert!(float_cmp::approx_eq!(f64, 0.08, range.value()));
    }
}
