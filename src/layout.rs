// SPDX-FileCopyrightText: The inpulse authors
// SPDX-License-Identifier: MPL-2.0

//! Control layout of the device.

use strum::IntoEnumIterator as _;

use crate::{
    pad::mode_bindings, Action, BindingRegistry, Config, ControlAddress, ControlBinding, Feedback,
    GroupRef, Handler, LogicalDeck, Owner, PadMode, PotScale, RegisterError, Render, Strip,
    Target,
};

// Buttons of each strip
pub(crate) const SLIP: u8 = 0x01;
pub(crate) const QUANTIZE: u8 = 0x02;
pub(crate) const VINYL: u8 = 0x03;
pub(crate) const SHIFT: u8 = 0x04;
pub(crate) const SYNC: u8 = 0x05;
pub(crate) const CUE: u8 = 0x06;
pub(crate) const PLAY: u8 = 0x07;
pub(crate) const JOG_TOUCH: u8 = 0x08;
pub(crate) const LOOP_IN: u8 = 0x09;
pub(crate) const LOOP_OUT: u8 = 0x0a;
pub(crate) const PFL: u8 = 0x0c;
pub(crate) const LOAD: u8 = 0x0d;
pub(crate) const LOOP_ENCODER_PUSH: u8 = 0x2c;
pub(crate) const PLAY_INDICATOR: u8 = 0x30;
pub(crate) const PEAK_INDICATOR: u8 = 0x39;

// Knobs, faders, and encoders of each strip
pub(crate) const VOLUME: u8 = 0x00;
pub(crate) const FILTER: u8 = 0x01;
pub(crate) const EQ_FIRST: u8 = 0x02;
pub(crate) const GAIN: u8 = 0x05;
pub(crate) const PITCH_FADER: u8 = 0x08;
pub(crate) const JOG_WHEEL: u8 = 0x0a;
pub(crate) const LOOP_ENCODER: u8 = 0x0e;
pub(crate) const VU_METER: u8 = 0x40;

// Global controls on channel 0
pub(crate) const GLOBAL_NOTE_STATUS: u8 = 0x90;
pub(crate) const GLOBAL_CC_STATUS: u8 = 0xb0;
pub(crate) const CROSSFADER: u8 = 0x00;
pub(crate) const BROWSER: u8 = 0x01;
pub(crate) const BROWSER_LED: u8 = 0x05;
pub(crate) const DECK_SELECT_FIRST: u8 = 0x14;

/// Special message that requests or terminates a dump of all
/// knob and fader positions.
pub(crate) const STATE_DUMP: ControlAddress = ControlAddress::new(GLOBAL_CC_STATUS, 0x7f);
pub(crate) const STATE_DUMP_REQUEST: u8 = 0x7f;
pub(crate) const STATE_DUMP_TERMINATE: u8 = 0x7e;

pub(crate) const BROWSER_LED_ON: u8 = 0x10;

/// Selector button of a deck.
#[must_use]
pub(crate) const fn deck_select_address(deck: LogicalDeck) -> ControlAddress {
    ControlAddress::new(GLOBAL_NOTE_STATUS, DECK_SELECT_FIRST + deck as u8)
}

pub(crate) const fn note_address(strip: Strip, control: u8) -> ControlAddress {
    ControlAddress::new(strip.note_status(), control)
}

pub(crate) const fn cc_address(strip: Strip, control: u8) -> ControlAddress {
    ControlAddress::new(strip.cc_status(), control)
}

/// A button that is also reported on the shifted layer.
fn button(strip: Strip, control: u8, handler: Handler) -> ControlBinding {
    ControlBinding::new(Owner::Strip(strip), note_address(strip, control), handler)
        .with_alias(ControlAddress::new(strip.shifted_note_status(), control))
}

fn pot(strip: Strip, control: u8, target: Target) -> ControlBinding {
    ControlBinding::new(
        Owner::Strip(strip),
        cc_address(strip, control),
        Handler::Plain(Action::Pot {
            target,
            scale: PotScale::Parameter,
        }),
    )
}

/// A button that toggles a control of the current deck and reflects
/// its state.
fn toggle_button(strip: Strip, control: u8, key: &'static str) -> ControlBinding {
    button(
        strip,
        control,
        Handler::Plain(Action::Toggle(Target::deck(key))),
    )
    .with_feedback(Feedback::deck(key, Render::LED))
}

fn strip_bindings(strip: Strip, config: &Config) -> Vec<ControlBinding> {
    let mut bindings = vec![
        button(strip, SHIFT, Handler::Plain(Action::Shift)),
        button(
            strip,
            LOAD,
            Handler::shiftable(
                Action::Trigger(Target::deck("LoadSelectedTrack")),
                Action::Trigger(Target::deck("eject")),
            ),
        ),
        button(
            strip,
            PLAY,
            Handler::shiftable(
                Action::Play,
                Action::Trigger(Target::deck("play_stutter")),
            ),
        )
        .with_feedback(Feedback::deck("play_indicator", Render::LED)),
        button(
            strip,
            CUE,
            Handler::shiftable(
                Action::Hold(Target::deck("cue_default")),
                Action::Trigger(Target::deck("start_play")),
            ),
        )
        .with_feedback(Feedback::deck("cue_indicator", Render::LED)),
        button(
            strip,
            SYNC,
            Handler::shiftable(
                Action::Trigger(Target::deck("beatsync")),
                Action::Trigger(Target::deck("sync_key")),
            ),
        )
        .with_feedback(Feedback::deck("sync_enabled", Render::LED)),
        toggle_button(strip, PFL, "pfl"),
        toggle_button(strip, SLIP, "slip_enabled"),
        button(
            strip,
            QUANTIZE,
            Handler::shiftable(
                Action::Toggle(Target::deck("quantize")),
                Action::Toggle(Target::deck("keylock")),
            ),
        )
        .with_feedback(Feedback::deck("quantize", Render::LED)),
        // The LED reflects controller state and is painted explicitly
        button(strip, VINYL, Handler::shiftable(Action::Vinyl, Action::SlowPause)),
        button(strip, JOG_TOUCH, Handler::Plain(Action::JogTouch)),
        ControlBinding::new(
            Owner::Strip(strip),
            cc_address(strip, JOG_WHEEL),
            Handler::shiftable(
                Action::JogWheel { speed: 1.0 },
                Action::JogWheel { speed: 4.0 },
            ),
        )
        .with_alias(ControlAddress::new(strip.shifted_cc_status(), JOG_WHEEL)),
        button(
            strip,
            LOOP_IN,
            Handler::shiftable(
                Action::Trigger(Target::deck("loop_in")),
                Action::Trigger(Target::deck("loop_in_goto")),
            ),
        )
        .with_feedback(Feedback::deck("loop_enabled", Render::LED)),
        button(
            strip,
            LOOP_OUT,
            Handler::shiftable(
                Action::Trigger(Target::deck("loop_out")),
                Action::Trigger(Target::deck("loop_out_goto")),
            ),
        )
        .with_feedback(Feedback::deck("loop_enabled", Render::LED)),
        button(
            strip,
            LOOP_ENCODER_PUSH,
            Handler::shiftable(
                Action::Trigger(Target::deck("reloop_toggle")),
                Action::Trigger(Target::deck("beatloop_4_activate")),
            ),
        ),
        ControlBinding::new(
            Owner::Strip(strip),
            cc_address(strip, LOOP_ENCODER),
            Handler::shiftable(Action::LoopResize, Action::SlicerDomain),
        )
        .with_alias(ControlAddress::new(strip.shifted_cc_status(), LOOP_ENCODER)),
        pot(strip, VOLUME, Target::deck("volume")),
        ControlBinding::new(
            Owner::Strip(strip),
            cc_address(strip, FILTER),
            Handler::Plain(Action::FilterKnob),
        ),
        pot(strip, GAIN, Target::deck("pregain")),
        pot(strip, PITCH_FADER, Target::deck("rate")),
        ControlBinding::new(
            Owner::Strip(strip),
            note_address(strip, PLAY_INDICATOR),
            Handler::None,
        )
        .with_feedback(Feedback::deck("play_indicator", Render::LED)),
        ControlBinding::new(Owner::Strip(strip), cc_address(strip, VU_METER), Handler::None)
            .with_feedback(Feedback::deck("vu_meter", Render::VuMeter)),
        ControlBinding::new(
            Owner::Strip(strip),
            note_address(strip, PEAK_INDICATOR),
            Handler::None,
        )
        .with_feedback(Feedback::deck("peak_indicator", Render::LED)),
    ];
    bindings.extend(["parameter1", "parameter2", "parameter3"].into_iter().zip(EQ_FIRST..).map(
        |(key, control)| pot(strip, control, Target::new(GroupRef::Equalizer, key)),
    ));
    bindings.extend(PadMode::iter().map(|mode| {
        ControlBinding::new(
            Owner::Strip(strip),
            note_address(strip, mode.select_control()),
            Handler::Plain(Action::PadMode(mode)),
        )
    }));
    for mode in PadMode::iter() {
        bindings.extend(mode_bindings(strip, mode, config));
    }
    bindings
}

fn global_bindings() -> Vec<ControlBinding> {
    let mut bindings = LogicalDeck::iter()
        .map(|deck| {
            ControlBinding::new(
                Owner::Global,
                deck_select_address(deck),
                Handler::Plain(Action::SelectDeck(deck)),
            )
        })
        .collect::<Vec<_>>();
    bindings.push(ControlBinding::new(
        Owner::Global,
        ControlAddress::new(GLOBAL_CC_STATUS, BROWSER),
        Handler::Plain(Action::Browser),
    ));
    bindings.push(ControlBinding::new(
        Owner::Global,
        ControlAddress::new(GLOBAL_CC_STATUS, CROSSFADER),
        Handler::Plain(Action::Pot {
            target: Target::new(GroupRef::Fixed("[Master]"), "crossfader"),
            scale: PotScale::Bipolar,
        }),
    ));
    bindings
}

/// Register the bindings of all physical controls.
pub(crate) fn build_registry(config: &Config) -> Result<BindingRegistry, RegisterError> {
    let mut registry = BindingRegistry::new();
    for binding in global_bindings() {
        registry.register(binding)?;
    }
    for strip in Strip::iter() {
        for binding in strip_bindings(strip, config) {
            registry.register(binding)?;
        }
    }
    Ok(registry)
}
