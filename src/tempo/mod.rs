// SPDX-FileCopyrightText: The inpulse authors
// SPDX-License-Identifier: MPL-2.0

//! Tempo and phase matching indicator for the current decks of both strips.

use std::time::Duration;

use crate::{Engine, LED_OFF, LED_ON};

/// Polling period
pub const TEMPO_POLL_PERIOD: Duration = Duration::from_millis(250);

/// Tempo ratio above which one deck is considered to play at double
/// the tempo of the other deck.
const DOUBLE_TEMPO_RATIO: f64 = 1.5;

/// Maximum tempo difference in bpm for matching tempos.
const TEMPO_TOLERANCE_BPM: f64 = 0.25;

/// Maximum phase difference in beats for aligned phases.
const PHASE_TOLERANCE: f64 = 0.02;

// LEDs of each strip
const TEMPO_FASTER: u8 = 0x1e;
const TEMPO_SLOWER: u8 = 0x1f;
const TEMPO_MATCHED: u8 = 0x2c;
const PHASE_LEADING: u8 = 0x1c;
const PHASE_LAGGING: u8 = 0x1d;
const PHASE_ALIGNED: u8 = 0x2d;

/// Snapshot of the tempo and phase of a deck.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DeckTempo {
    pub bpm: f64,

    /// Fractional position between the previous and the next beat
    pub beat_distance: f64,

    pub playing: bool,
}

impl DeckTempo {
    pub fn read<E: Engine>(engine: &E, group: &str) -> Self {
        Self {
            bpm: engine.get_value(group, "bpm"),
            beat_distance: engine.get_value(group, "beat_distance"),
            playing: engine.is_enabled(group, "play_latched"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TempoMatch {
    Faster,
    Slower,
    Matched,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseMatch {
    Aligned,
    Lagging,
    Leading,
}

/// Tempo and phase of one deck relative to another deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TempoIndication {
    pub tempo: TempoMatch,

    /// Only available if the tempo matches and both decks are playing
    pub phase: Option<PhaseMatch>,

    /// One deck plays at double the tempo of the other deck
    pub double_tempo: bool,
}

impl TempoIndication {
    /// The same relation from the perspective of the other deck.
    #[must_use]
    pub const fn mirrored(self) -> Self {
        let Self {
            tempo,
            phase,
            double_tempo,
        } = self;
        let tempo = match tempo {
            TempoMatch::Faster => TempoMatch::Slower,
            TempoMatch::Slower => TempoMatch::Faster,
            TempoMatch::Matched => TempoMatch::Matched,
        };
        let phase = match phase {
            Some(PhaseMatch::Lagging) => Some(PhaseMatch::Leading),
            Some(PhaseMatch::Leading) => Some(PhaseMatch::Lagging),
            phase => phase,
        };
        Self {
            tempo,
            phase,
            double_tempo,
        }
    }

    /// Values of the six LEDs, as pairs of control and value.
    #[must_use]
    pub fn led_values(self) -> [(u8, u8); 6] {
        let led = |on: bool| if on { LED_ON } else { LED_OFF };
        [
            (TEMPO_FASTER, led(self.tempo == TempoMatch::Faster)),
            (TEMPO_SLOWER, led(self.tempo == TempoMatch::Slower)),
            (TEMPO_MATCHED, led(self.tempo == TempoMatch::Matched)),
            (PHASE_LEADING, led(self.phase == Some(PhaseMatch::Leading))),
            (PHASE_LAGGING, led(self.phase == Some(PhaseMatch::Lagging))),
            (PHASE_ALIGNED, led(self.phase == Some(PhaseMatch::Aligned))),
        ]
    }
}

/// Map the beat distance of the slower deck onto the beats of the
/// faster deck that plays at double tempo.
fn double_beat_distance(beat_distance: f64) -> f64 {
    let beat_distance = if beat_distance > 0.5 {
        beat_distance - 0.5
    } else {
        beat_distance
    };
    beat_distance * 2.0
}

/// Compare deck `a` to deck `b`.
#[must_use]
pub fn classify_tempo(a: DeckTempo, b: DeckTempo) -> TempoIndication {
    let mut bpm_diff = a.bpm - b.bpm;
    let mut double_tempo = false;
    if a.bpm > 0.0 && b.bpm > 0.0 {
        if bpm_diff > 0.0 && a.bpm / b.bpm > DOUBLE_TEMPO_RATIO {
            double_tempo = true;
            bpm_diff = a.bpm / 2.0 - b.bpm;
        } else if bpm_diff <= 0.0 && b.bpm / a.bpm > DOUBLE_TEMPO_RATIO {
            double_tempo = true;
            bpm_diff = a.bpm - b.bpm / 2.0;
        }
    }
    if bpm_diff < -TEMPO_TOLERANCE_BPM {
        return TempoIndication {
            tempo: TempoMatch::Slower,
            phase: None,
            double_tempo,
        };
    }
    if bpm_diff > TEMPO_TOLERANCE_BPM {
        return TempoIndication {
            tempo: TempoMatch::Faster,
            phase: None,
            double_tempo,
        };
    }
    let phase = (a.playing && b.playing).then(|| {
        let mut a_distance = a.beat_distance;
        let mut b_distance = b.beat_distance;
        if double_tempo {
            if a.bpm > b.bpm {
                b_distance = double_beat_distance(b_distance);
            } else {
                a_distance = double_beat_distance(a_distance);
            }
        }
        let phase_diff = (a_distance - b_distance).rem_euclid(1.0);
        if !(PHASE_TOLERANCE..=1.0 - PHASE_TOLERANCE).contains(&phase_diff) {
            PhaseMatch::Aligned
        } else if phase_diff < 0.5 {
            PhaseMatch::Lagging
        } else {
            PhaseMatch::Leading
        }
    });
    TempoIndication {
        tempo: TempoMatch::Matched,
        phase,
        double_tempo,
    }
}
