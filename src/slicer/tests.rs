// SPDX-FileCopyrightText: The inpulse authors
// SPDX-License-Identifier: MPL-2.0

use float_cmp::approx_eq;
use strum::IntoEnumIterator as _;

use super::*;
use crate::engine::MemoryEngine;

const GROUP: &str = "[Channel1]";

fn active_slicer(domain: SlicerDomain, beats_passed: i64) -> SlicerState {
    SlicerState {
        domain,
        beats_passed,
        active: true,
        ..Default::default()
    }
}

fn engine_at_beat(beat_distance: f64, bpm: f64) -> MemoryEngine {
    let mut engine = MemoryEngine::new();
    engine.preset(GROUP, "beat_distance", beat_distance);
    engine.preset(GROUP, "bpm", bpm);
    engine
}

/// Position such that `floor(playposition * duration * file_bpm / 60)`
/// equals `beats` exactly.
fn preset_beats_passed(engine: &mut MemoryEngine, beats: i64) {
    // 1 beat per second
    engine.preset(GROUP, "file_bpm", 60.0);
    engine.preset(GROUP, "duration", 1000.0);
    #[allow(clippy::cast_precision_loss)]
    let playposition = (beats as f64 + 0.5) / 1000.0;
    engine.preset(GROUP, "playposition", playposition);
    engine.preset(GROUP, "beat_closest", 1.0);
    engine.preset(GROUP, "beat_next", 2.0);
}

#[test]
fn domains() {
    assert_eq!(
        vec![8, 16, 32, 64],
        SlicerDomain::iter().map(SlicerDomain::beats).collect::<Vec<_>>()
    );
    assert_eq!(SlicerDomain::Eight, SlicerDomain::default());
    assert_eq!(SlicerDomain::Sixteen, SlicerDomain::Eight.stepped(1));
    assert_eq!(SlicerDomain::SixtyFour, SlicerDomain::Eight.stepped(10));
    assert_eq!(SlicerDomain::Eight, SlicerDomain::SixtyFour.stepped(-10));
    assert_eq!(SlicerDomain::Eight, SlicerDomain::Eight.stepped(-1));
}

#[test]
fn jump_target_matches_position_read_back() {
    for domain in SlicerDomain::iter() {
        for beats_passed in [0, 5, 17, 100] {
            for pad in 0..PADS_PER_MODE {
                let slicer = active_slicer(domain, beats_passed);
                let beats = slicer.beats_to_jump(pad, 0.0);
                #[allow(clippy::cast_possible_truncation)]
                let landed = SlicerState {
                    beats_passed: beats_passed + beats as i64,
                    ..slicer
                };
                assert_eq!(pad, landed.position_in_section());
            }
        }
    }
}

#[test]
fn fractional_beat_position_is_subtracted() {
    let slicer = active_slicer(SlicerDomain::Eight, 17);
    assert!(approx_eq!(f64, 3.0 - 0.25, slicer.beats_to_jump(4, 0.25)));
    assert!(approx_eq!(f64, -1.0 - 0.5, slicer.beats_to_jump(0, 0.5)));
}

#[test]
fn slip_end_delay_until_next_beat() {
    let delay = slip_end_delay(0.5, 120.0, false, 0, SlicerDomain::Eight).unwrap();
    assert_eq!(Duration::from_millis(250), delay);
}

#[test]
fn slip_end_delay_of_late_press_is_extended() {
    let delay = slip_end_delay(0.875, 120.0, false, 0, SlicerDomain::Eight).unwrap();
    assert_eq!(Duration::from_micros(62_500 + 500_000), delay);
}

#[test]
fn slip_end_delay_not_extended_on_last_looped_beat() {
    let delay = slip_end_delay(0.875, 120.0, true, 15, SlicerDomain::Eight).unwrap();
    assert_eq!(Duration::from_micros(62_500), delay);
    // Extended if not looping
    let delay = slip_end_delay(0.875, 120.0, false, 15, SlicerDomain::Eight).unwrap();
    assert_eq!(Duration::from_micros(562_500), delay);
}

#[test]
fn no_slip_end_without_tempo() {
    assert_eq!(None, slip_end_delay(0.5, 0.0, false, 0, SlicerDomain::Eight));
}

#[test]
fn ignore_press_while_idle() {
    let mut engine = engine_at_beat(0.5, 120.0);
    let mut slicer = SlicerState::default();
    assert_eq!(None, slicer.press(&mut engine, GROUP, 3));
    assert!(engine.writes().is_empty());
    assert_eq!(None, slicer.last_triggered_pad);
}

#[test]
fn press_jumps_in_slip_mode() {
    let mut engine = engine_at_beat(0.5, 120.0);
    let mut slicer = active_slicer(SlicerDomain::Eight, 2);
    let jump = slicer.press(&mut engine, GROUP, 5).unwrap();
    assert!(approx_eq!(f64, 2.5, jump.beats));
    assert_eq!(Some(Duration::from_millis(250)), jump.slip_end_delay);
    assert!(slicer.pending);
    assert_eq!(Some(5), slicer.last_triggered_pad);
    assert_eq!(vec![1.0], engine.writes_to(GROUP, "slip_enabled"));
    assert_eq!(vec![2.5], engine.writes_to(GROUP, "beatjump"));
    assert!(engine.writes_to(GROUP, "reloop_toggle").is_empty());
}

#[test]
fn press_within_loop_toggles_loop_around_jump() {
    let mut engine = engine_at_beat(0.0, 120.0);
    engine.preset(GROUP, "loop_enabled", 1.0);
    let mut slicer = active_slicer(SlicerDomain::Eight, 0);
    slicer.press(&mut engine, GROUP, 1).unwrap();
    let keys = engine
        .writes()
        .iter()
        .map(|write| write.key.as_str())
        .collect::<Vec<_>>();
    assert_eq!(
        vec!["slip_enabled", "reloop_toggle", "beatjump", "reloop_toggle"],
        keys
    );
}

#[test]
fn second_press_while_pending_schedules_no_timer() {
    let mut engine = engine_at_beat(0.5, 120.0);
    let mut slicer = active_slicer(SlicerDomain::Eight, 0);
    assert!(slicer
        .press(&mut engine, GROUP, 1)
        .unwrap()
        .slip_end_delay
        .is_some());
    let second = slicer.press(&mut engine, GROUP, 2).unwrap();
    assert_eq!(None, second.slip_end_delay);
    assert_eq!(Some(2), slicer.last_triggered_pad);
    assert!(slicer.pending);
}

#[test]
fn end_slip_outside_loop() {
    let mut engine = engine_at_beat(0.5, 120.0);
    let mut slicer = active_slicer(SlicerDomain::Eight, 0);
    slicer.press(&mut engine, GROUP, 1).unwrap();
    engine.take_writes();
    assert!(!slicer.end_slip(&mut engine, GROUP));
    assert_eq!(vec![0.0], engine.writes_to(GROUP, "slip_enabled"));
    assert!(engine.writes_to(GROUP, "reloop_toggle").is_empty());
    assert!(!slicer.pending);
    assert_eq!(None, slicer.last_triggered_pad);
}

#[test]
fn end_slip_within_loop_needs_reloop() {
    let mut engine = engine_at_beat(0.5, 120.0);
    engine.preset(GROUP, "loop_enabled", 1.0);
    let mut slicer = active_slicer(SlicerDomain::Eight, 0);
    assert!(slicer.end_slip(&mut engine, GROUP));
    assert_eq!(vec![1.0], engine.writes_to(GROUP, "reloop_toggle"));
    SlicerState::finish_reloop(&mut engine, GROUP);
    assert_eq!(vec![1.0, 1.0], engine.writes_to(GROUP, "reloop_toggle"));
}

#[test]
fn cancel_ends_pending_slip() {
    let mut engine = engine_at_beat(0.5, 120.0);
    let mut slicer = active_slicer(SlicerDomain::Sixteen, 0);
    slicer.press(&mut engine, GROUP, 1).unwrap();
    engine.take_writes();
    slicer.cancel(&mut engine, GROUP);
    assert_eq!(vec![0.0], engine.writes_to(GROUP, "slip_enabled"));
    assert!(!slicer.active);
    assert!(!slicer.pending);
    assert_eq!(None, slicer.last_triggered_pad);
    assert_eq!(SlicerDomain::Sixteen, slicer.domain);

    // Nothing to end
    engine.take_writes();
    slicer.cancel(&mut engine, GROUP);
    assert!(engine.writes().is_empty());
}

#[test]
fn beat_repaints_all_pads() {
    let mut engine = MemoryEngine::new();
    preset_beats_passed(&mut engine, 17);
    let mut slicer = active_slicer(SlicerDomain::Eight, 0);
    let leds = slicer.on_beat(&engine, GROUP);
    assert_eq!(17, slicer.beats_passed);
    assert_eq!(1, slicer.position_in_section());
    assert_eq!(8, leds.len());
    for (pad, led) in leds {
        if pad == 1 {
            assert_eq!(PadLed::Current, led);
        } else {
            assert_eq!(PadLed::Other, led);
        }
    }
}

#[test]
fn beat_keeps_pressed_pad_lit() {
    let mut engine = MemoryEngine::new();
    preset_beats_passed(&mut engine, 19);
    let mut slicer = active_slicer(SlicerDomain::Eight, 0);
    slicer.last_triggered_pad = Some(3);
    assert_eq!(vec![(3, PadLed::Pressed)], slicer.on_beat(&engine, GROUP));
}

#[test]
fn beat_in_larger_domain() {
    let mut engine = MemoryEngine::new();
    preset_beats_passed(&mut engine, 37);
    let mut slicer = active_slicer(SlicerDomain::ThirtyTwo, 0);
    let leds = slicer.on_beat(&engine, GROUP);
    // (37 mod 32) / 4
    assert_eq!(1, slicer.position_in_section());
    assert!(leds.contains(&(1, PadLed::Current)));
}

#[test]
fn ambiguous_beat_is_ignored() {
    let mut engine = MemoryEngine::new();
    preset_beats_passed(&mut engine, 17);
    engine.preset(GROUP, "beat_next", 1.0);
    let mut slicer = active_slicer(SlicerDomain::Eight, 5);
    assert!(slicer.on_beat(&engine, GROUP).is_empty());
    assert_eq!(5, slicer.beats_passed);
}

#[test]
fn idle_beat_resets_bookkeeping() {
    let mut engine = MemoryEngine::new();
    preset_beats_passed(&mut engine, 17);
    let mut slicer = SlicerState {
        last_triggered_pad: Some(2),
        ..Default::default()
    };
    assert!(slicer.on_beat(&engine, GROUP).is_empty());
    assert_eq!(17, slicer.beats_passed);
    assert_eq!(None, slicer.last_triggered_pad);
}
