// SPDX-FileCopyrightText: The inpulse authors
// SPDX-License-Identifier: MPL-2.0

//! Beat-synchronized slicer.
//!
//! The slicer divides a domain of 8 to 64 beats into 8 equal slices,
//! one for each pad. Pressing a pad jumps to the start of its slice,
//! relative to the current position within the domain. The jump is
//! performed in slip mode and the slip ends at the next beat, i.e.
//! playback continues where it would have been without the jump.
//!
//! Only a constant beatgrid is supported.

use std::time::Duration;

use float_cmp::approx_eq;
use strum::{Display, EnumCount, EnumIter, FromRepr};

use crate::{Engine, PADS_PER_MODE};

#[cfg(test)]
mod tests;

/// Number of beats covered by all 8 slices.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Display, EnumCount, EnumIter, FromRepr,
)]
#[repr(u8)]
pub enum SlicerDomain {
    #[default]
    #[strum(to_string = "8 beats")]
    Eight,
    #[strum(to_string = "16 beats")]
    Sixteen,
    #[strum(to_string = "32 beats")]
    ThirtyTwo,
    #[strum(to_string = "64 beats")]
    SixtyFour,
}

impl SlicerDomain {
    #[must_use]
    pub const fn beats(self) -> i64 {
        8 << self as u8
    }

    #[must_use]
    pub const fn beats_per_slice(self) -> i64 {
        self.beats() / PADS_PER_MODE as i64
    }

    /// Step through the domains, clamped at both ends.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub fn stepped(self, delta: i32) -> Self {
        let max_index = Self::COUNT as i32 - 1;
        let index = (self as i32).saturating_add(delta).clamp(0, max_index);
        // Index is within bounds after clamping
        Self::from_repr(index as u8).unwrap_or(self)
    }
}

/// Slicer pad LEDs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadLed {
    /// The slice that is currently playing
    Current,
    /// All other slices
    Other,
    /// The pressed pad until the slip ends
    Pressed,
}

impl PadLed {
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::Current => 0x7f,
            Self::Other => 0x03,
            Self::Pressed => 0x62,
        }
    }
}

/// Beat position relative to which a jump at the fractional beat
/// position is considered as being too close to the next beat.
const LATE_PRESS_BEAT_FRACTION: f64 = 0.8;

/// Delay between the two loop toggles when ending the slip.
pub const RELOOP_DELAY: Duration = Duration::from_millis(2);

/// Result of a pad press.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlicerJump {
    pub beats: f64,

    /// Delay of the timer that ends the slip, if a new timer
    /// needs to be scheduled.
    pub slip_end_delay: Option<Duration>,
}

/// Slicer of a single deck.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlicerState {
    pub domain: SlicerDomain,

    /// Beats since the start of the track
    pub beats_passed: i64,

    /// The slicer pad mode is selected for this deck
    pub active: bool,

    /// A timer for ending the slip is pending
    pub pending: bool,

    pub last_triggered_pad: Option<u8>,
}

/// Delay until the slip ends, i.e. until the next beat.
///
/// Presses shortly before the next beat are extended by another beat,
/// unless a loop is playing the last beat of the domain.
#[must_use]
pub fn slip_end_delay(
    beat_distance: f64,
    bpm: f64,
    loop_enabled: bool,
    beats_passed: i64,
    domain: SlicerDomain,
) -> Option<Duration> {
    if bpm <= 0.0 || !bpm.is_finite() {
        return None;
    }
    let beat_secs = 60.0 / bpm;
    let mut delay_secs = (1.0 - beat_distance) * beat_secs;
    let last_beat_of_looped_domain =
        loop_enabled && beats_passed.rem_euclid(domain.beats()) == domain.beats() - 1;
    if beat_distance >= LATE_PRESS_BEAT_FRACTION && !last_beat_of_looped_domain {
        delay_secs += beat_secs;
    }
    Duration::try_from_secs_f64(delay_secs.max(0.0)).ok()
}

impl SlicerState {
    /// Slice in which the current beat is located.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub const fn position_in_section(&self) -> u8 {
        (self.beats_passed.rem_euclid(self.domain.beats()) / self.domain.beats_per_slice()) as u8
    }

    /// Beats to jump for reaching the start of the slice of `pad`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn beats_to_jump(&self, pad: u8, beat_distance: f64) -> f64 {
        let target = i64::from(pad) * self.domain.beats_per_slice();
        let current = self.beats_passed.rem_euclid(self.domain.beats());
        (target - current) as f64 - beat_distance
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Handle a pad press.
    ///
    /// Reads the authoritative state of the deck immediately before
    /// jumping. Returns `None` if the slicer is not active.
    pub fn press<E: Engine>(&mut self, engine: &mut E, group: &str, pad: u8) -> Option<SlicerJump> {
        if !self.active {
            return None;
        }
        debug_assert!(pad < PADS_PER_MODE);
        let beat_distance = engine.get_value(group, "beat_distance");
        let loop_enabled = engine.is_enabled(group, "loop_enabled");
        self.last_triggered_pad = Some(pad);
        let beats = self.beats_to_jump(pad, beat_distance);
        let slip_end_delay = if self.pending {
            None
        } else {
            let delay = slip_end_delay(
                beat_distance,
                engine.get_value(group, "bpm"),
                loop_enabled,
                self.beats_passed,
                self.domain,
            );
            if delay.is_some() {
                self.pending = true;
            } else {
                log::debug!("Not scheduling slip end of {group} without tempo");
            }
            delay
        };
        engine.set_value(group, "slip_enabled", 1.0);
        // Jumping requires a disabled loop
        if loop_enabled {
            engine.set_value(group, "reloop_toggle", 1.0);
        }
        engine.set_value(group, "beatjump", beats);
        if loop_enabled {
            engine.set_value(group, "reloop_toggle", 1.0);
        }
        log::debug!("Slicer of {group} jumped {beats} beats to pad {pad}");
        Some(SlicerJump {
            beats,
            slip_end_delay,
        })
    }

    /// End the slip after a jump.
    ///
    /// If a loop is enabled it is toggled off and must be toggled on
    /// again after [`RELOOP_DELAY`], i.e. the returned value indicates if
    /// a follow-up is needed.
    pub fn end_slip<E: Engine>(&mut self, engine: &mut E, group: &str) -> bool {
        let reloop = engine.is_enabled(group, "loop_enabled");
        if reloop {
            engine.set_value(group, "reloop_toggle", 1.0);
        }
        engine.set_value(group, "slip_enabled", 0.0);
        self.pending = false;
        self.last_triggered_pad = None;
        reloop
    }

    /// Abandon a pending slip whose timer will never expire.
    ///
    /// The slicer becomes inactive until its pad mode is selected again.
    pub fn cancel<E: Engine>(&mut self, engine: &mut E, group: &str) {
        if self.pending {
            engine.set_value(group, "slip_enabled", 0.0);
        }
        self.active = false;
        self.pending = false;
        self.last_triggered_pad = None;
    }

    /// Second half of ending the slip within a loop.
    pub fn finish_reloop<E: Engine>(engine: &mut E, group: &str) {
        engine.set_value(group, "reloop_toggle", 1.0);
    }

    /// Handle a beat crossing of the deck.
    ///
    /// Returns the LEDs that need to be repainted.
    #[allow(clippy::cast_possible_truncation)]
    pub fn on_beat<E: Engine>(&mut self, engine: &E, group: &str) -> Vec<(u8, PadLed)> {
        let beat_closest = engine.get_value(group, "beat_closest");
        let beat_next = engine.get_value(group, "beat_next");
        if approx_eq!(f64, beat_closest, beat_next) {
            log::debug!("Ignoring ambiguous beat of {group}");
            return Vec::new();
        }
        let file_bpm = engine.get_value(group, "file_bpm");
        let playposition = engine.get_value(group, "playposition");
        let duration = engine.get_value(group, "duration");
        self.beats_passed = (playposition * duration * file_bpm / 60.0).floor() as i64;
        if !self.active {
            self.last_triggered_pad = None;
            return Vec::new();
        }
        let position = self.position_in_section();
        match self.last_triggered_pad {
            Some(pad) if pad == position => vec![(pad, PadLed::Pressed)],
            _ => (0..PADS_PER_MODE)
                .map(|pad| {
                    let led = if pad == position {
                        PadLed::Current
                    } else {
                        PadLed::Other
                    };
                    (pad, led)
                })
                .collect(),
        }
    }
}
