// SPDX-FileCopyrightText: The inpulse authors
// SPDX-License-Identifier: MPL-2.0

use std::collections::HashSet;

use strum::IntoEnumIterator as _;

use super::*;
use crate::{BindingRegistry, LogicalDeck, PAIR_COLORS};

fn trigger_key(action: Option<&Action>) -> Option<String> {
    match action? {
        Action::Trigger(target) | Action::Hold(target) => {
            Some(target.key.resolve(LogicalDeck::One).into_owned())
        }
        _ => None,
    }
}

#[test]
fn mode_addresses() {
    assert_eq!(ControlAddress::new(0x96, 0x00), pad_address(Strip::A, PadMode::Hotcue, 0));
    assert_eq!(ControlAddress::new(0x97, 0x67), pad_address(Strip::B, PadMode::Slicer, 7));
    assert_eq!(0x0f, PadMode::Hotcue.select_control());
    assert_eq!(0x16, PadMode::Sampler.select_control());
    assert_eq!(Some(PadMode::Slicer), PadMode::from_repr(6));
}

#[test]
fn all_modes_are_registered_without_collisions() {
    let config = Config::default();
    let mut registry = BindingRegistry::new();
    for strip in Strip::iter() {
        for mode in PadMode::iter() {
            let bindings = mode_bindings(strip, mode, &config);
            assert_eq!(usize::from(PADS_PER_MODE), bindings.len());
            for binding in bindings {
                registry.register(binding).unwrap();
            }
        }
    }
    assert_eq!(2 * 64, registry.len());
    for strip in Strip::iter() {
        assert_eq!(64, registry.iter_strip(strip).count());
        let addresses = registry
            .iter_strip(strip)
            .flat_map(|(_, binding)| binding.output_addresses().collect::<Vec<_>>())
            .collect::<HashSet<_>>();
        // unshifted and shifted layer
        assert_eq!(128, addresses.len());
    }
}

#[test]
fn beat_jump_directions_alternate() {
    let config = Config::default();
    let bindings = mode_bindings(Strip::A, PadMode::BeatJump, &config);
    assert_eq!(
        Some("beatjump_1_backward".to_owned()),
        trigger_key(bindings[0].handler.select(false))
    );
    assert_eq!(
        Some("beatjump_1_forward".to_owned()),
        trigger_key(bindings[1].handler.select(false))
    );
    assert_eq!(
        Some("beatjump_128_forward".to_owned()),
        trigger_key(bindings[7].handler.select(true))
    );
    for (binding, colors) in bindings.iter().zip(PAIR_COLORS) {
        assert_eq!(Some(colors), binding.echo);
    }
}

#[test]
fn loop_sizes() {
    let config = Config::default();
    let bindings = mode_bindings(Strip::B, PadMode::Loop, &config);
    assert_eq!(
        Some("beatloop_0.125_toggle".to_owned()),
        trigger_key(bindings[0].handler.select(false))
    );
    assert_eq!(
        Some("beatloop_0.03125_toggle".to_owned()),
        trigger_key(bindings[0].handler.select(true))
    );
    assert_eq!(
        Some("beatloop_512_toggle".to_owned()),
        trigger_key(bindings[7].handler.select(true))
    );
}

#[test]
fn pitch_pads_use_pair_colors() {
    let config = Config::default();
    let bindings = mode_bindings(Strip::A, PadMode::Pitch, &config);
    assert_eq!(Some(PAIR_COLORS[6]), bindings[4].echo);
    assert_eq!(Some(PAIR_COLORS[4]), bindings[6].echo);
    assert_eq!(
        Some(&Action::PitchRange(PitchRangeStep::Increase)),
        bindings[6].handler.select(false)
    );
    assert_eq!(Some(PAIR_COLORS[7]), bindings[7].echo);
}

#[test]
fn effect_pads_use_strip_effect_unit() {
    let config = Config::default();
    let bindings = mode_bindings(Strip::B, PadMode::Effect, &config);
    assert_eq!(
        Some(&Action::EffectSlot { unit: 2, slot: 1 }),
        bindings[0].handler.select(false)
    );
    let routing = bindings[7].feedback.as_ref().unwrap();
    assert_eq!(GroupRef::EffectUnit(2), routing.group);
    assert_eq!(vec![KeyRef::DeckRouting], routing.keys);
    assert_eq!(Some(0x30), bindings[4].echo.map(|colors| colors.off));
    assert_eq!(None, bindings[6].echo);
}

#[test]
fn slicer_pads_have_neither_echo_nor_feedback() {
    let config = Config::default();
    for (pad, binding) in mode_bindings(Strip::A, PadMode::Slicer, &config)
        .into_iter()
        .enumerate()
    {
        assert_eq!(None, binding.echo);
        assert_eq!(None, binding.feedback);
        assert_eq!(
            Some(&Action::SlicerPad(u8::try_from(pad).unwrap())),
            binding.handler.select(true)
        );
    }
}
