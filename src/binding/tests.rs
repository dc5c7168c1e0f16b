// SPDX-FileCopyrightText: The inpulse authors
// SPDX-License-Identifier: MPL-2.0

use super::*;

#[test]
fn resolve_groups() {
    let deck = LogicalDeck::Three;
    assert_eq!("[Channel3]", GroupRef::CurrentDeck.resolve(deck));
    assert_eq!(
        "[EqualizerRack1_[Channel3]_Effect1]",
        GroupRef::Equalizer.resolve(deck)
    );
    assert_eq!(
        "[QuickEffectRack1_[Channel3]]",
        GroupRef::QuickEffect.resolve(deck)
    );
    assert_eq!(
        "[EffectRack1_EffectUnit2]",
        GroupRef::EffectUnit(2).resolve(deck)
    );
    assert_eq!(
        "[EffectRack1_EffectUnit1_Effect3]",
        GroupRef::EffectSlot { unit: 1, slot: 3 }.resolve(deck)
    );
    assert_eq!("[Sampler8]", GroupRef::Sampler(8).resolve(deck));
    assert_eq!("[Master]", GroupRef::Fixed("[Master]").resolve(deck));
}

#[test]
fn resolve_deck_routing_key() {
    assert_eq!(
        "group_[Channel4]_enable",
        KeyRef::DeckRouting.resolve(LogicalDeck::Four)
    );
    assert_eq!("play", KeyRef::from("play").resolve(LogicalDeck::Four));
}

#[test]
fn select_handler_by_shift_state() {
    let unshifted = Action::Trigger(Target::deck("loop_in"));
    let shifted = Action::Trigger(Target::deck("loop_in_goto"));
    let handler = Handler::shiftable(unshifted.clone(), shifted.clone());
    assert_eq!(Some(&unshifted), handler.select(false));
    assert_eq!(Some(&shifted), handler.select(true));

    let plain = Handler::Plain(Action::Browser);
    assert_eq!(plain.select(false), plain.select(true));

    assert_eq!(None, Handler::None.select(false));
}

#[test]
fn render_on_off() {
    let config = Config::default();
    let render = Render::OnOff(PadColors::new(0x5c, 0x30));
    assert_eq!(0x5c, render.render(&[1.0], &config));
    assert_eq!(0x30, render.render(&[0.0], &config));
    assert_eq!(0x30, render.render(&[], &config));
}

#[test]
fn render_hotcue() {
    let config = Config::default();
    assert_eq!(LED_OFF, Render::Hotcue.render(&[0.0, 255.0], &config));
    assert_eq!(
        0x1c,
        Render::Hotcue.render(&[1.0, f64::from(0x00_ff_00)], &config)
    );
    assert_eq!(LED_ON, Render::Hotcue.render(&[1.0, -1.0], &config));
}

#[test]
fn render_sampler() {
    let config = Config::default();
    assert_eq!(SAMPLER_EMPTY, Render::Sampler.render(&[0.0, 1.0, 1.0], &config));
    assert_eq!(SAMPLER_LOADED, Render::Sampler.render(&[1.0, 0.0, 0.0], &config));
    assert_eq!(SAMPLER_PLAYING, Render::Sampler.render(&[1.0, 1.0, 0.0], &config));
    assert_eq!(
        SAMPLER_REPEATING,
        Render::Sampler.render(&[1.0, 1.0, 1.0], &config)
    );
}

#[test]
fn render_vu_meter() {
    let config = Config::default();
    assert_eq!(0, Render::VuMeter.render(&[0.0], &config));
    assert_eq!(63, Render::VuMeter.render(&[0.5], &config));
    assert_eq!(125, Render::VuMeter.render(&[1.0], &config));
    assert_eq!(125, Render::VuMeter.render(&[1.5], &config));
}

#[test]
fn register_and_find_aliases() {
    let mut registry = BindingRegistry::new();
    let address = ControlAddress::new(0x91, 0x09);
    let alias = ControlAddress::new(0x94, 0x09);
    let id = registry
        .register(
            ControlBinding::new(
                Owner::Strip(Strip::A),
                address,
                Handler::Plain(Action::Trigger(Target::deck("loop_in"))),
            )
            .with_alias(alias),
        )
        .unwrap();
    assert_eq!(Some(id), registry.find(address));
    assert_eq!(Some(id), registry.find(alias));
    assert_eq!(None, registry.find(ControlAddress::new(0x92, 0x09)));
    assert_eq!(1, registry.iter_strip(Strip::A).count());
    assert_eq!(0, registry.iter_strip(Strip::B).count());
}

#[test]
fn reject_occupied_addresses() {
    let mut registry = BindingRegistry::new();
    let address = ControlAddress::new(0x90, 0x14);
    registry
        .register(ControlBinding::new(
            Owner::Global,
            address,
            Handler::Plain(Action::SelectDeck(LogicalDeck::One)),
        ))
        .unwrap();
    let err = registry
        .register(ControlBinding::new(
            Owner::Global,
            ControlAddress::new(0x90, 0x15),
            Handler::None,
        )
        .with_alias(address))
        .unwrap_err();
    assert!(matches!(err, RegisterError::AddressOccupied { address: occupied } if occupied == address));
    // Unmodified after the error
    assert_eq!(1, registry.len());
    assert_eq!(None, registry.find(ControlAddress::new(0x90, 0x15)));
}

#[test]
fn reject_duplicate_alias() {
    let mut registry = BindingRegistry::new();
    let address = ControlAddress::new(0x91, 0x04);
    assert!(registry
        .register(ControlBinding::new(Owner::Global, address, Handler::None).with_alias(address))
        .is_err());
    assert!(registry.is_empty());
}
