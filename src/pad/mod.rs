// SPDX-FileCopyrightText: The inpulse authors
// SPDX-License-Identifier: MPL-2.0

//! Performance pads and their modes.
//!
//! Each strip has 8 pads that are multiplexed across 8 modes. Every
//! mode uses its own, fixed range of addresses. The device selects the
//! visible mode autonomously, i.e. the pads of all modes are always
//! live and never torn down when switching modes.

use strum::{Display, EnumCount, EnumIter, FromRepr};

use crate::{
    Action, Config, ControlAddress, ControlBinding, Feedback, GroupRef, Handler, KeyRef, Owner,
    PadColors, PitchRangeStep, Render, Strip, Target,
};

#[cfg(test)]
mod tests;

pub const PADS_PER_MODE: u8 = 8;

/// Control offset of the shifted pad layer.
pub(crate) const SHIFTED_PAD_OFFSET: u8 = 8;

const MODE_CONTROL_STRIDE: u8 = 0x10;

const MODE_SELECT_CONTROL_BASE: u8 = 0x0f;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumCount, EnumIter, FromRepr)]
#[repr(u8)]
pub enum PadMode {
    Hotcue,
    Loop,
    Effect,
    BeatJump,
    Pitch,
    Roll,
    Slicer,
    Sampler,
}

impl PadMode {
    /// Control of the first pad.
    #[must_use]
    pub const fn control_offset(self) -> u8 {
        self as u8 * MODE_CONTROL_STRIDE
    }

    /// Control of the mode select button.
    #[must_use]
    pub const fn select_control(self) -> u8 {
        MODE_SELECT_CONTROL_BASE + self as u8
    }
}

/// Address of an unshifted pad.
#[must_use]
pub const fn pad_address(strip: Strip, mode: PadMode, pad: u8) -> ControlAddress {
    debug_assert!(pad < PADS_PER_MODE);
    ControlAddress::new(strip.pad_status(), mode.control_offset() + pad)
}

/// Loop and roll sizes in beats
const LOOP_SIZES: [&str; 8] = ["0.125", "0.25", "0.5", "1", "2", "4", "8", "16"];
const SHIFTED_LOOP_SIZES: [&str; 8] = ["0.03125", "0.0625", "32", "64", "128", "256", "512", "512"];

/// Beat jump sizes in beats
const JUMP_SIZES: [u8; 8] = [1, 1, 2, 2, 4, 4, 8, 8];
const SHIFTED_JUMP_SIZES: [u8; 8] = [16, 16, 32, 32, 64, 64, 128, 128];

const LOOP_COLORS: PadColors = PadColors::new(0x5c, 0x30);
const ROLL_COLORS: PadColors = PadColors::new(0x1f, 0x12);
const EFFECT_COLORS: PadColors = PadColors::new(0x7f, 0x7c);
const EFFECT_ROUTING_COLORS: PadColors = PadColors::new(0x74, 0x00);
const CHAIN_SELECTOR_COLORS: PadColors = PadColors::new(0x5c, 0x30);
const QUICK_EFFECT_COLORS: PadColors = PadColors::new(0x1c, 0x60);

/// Slots of the pitch pads in the pair colors
const PITCH_PAD_COLOR_SLOTS: [usize; 8] = [0, 1, 2, 3, 6, 5, 4, 7];

/// Bindings of the unshifted and shifted pads of a single mode.
#[must_use]
pub(crate) fn mode_bindings(strip: Strip, mode: PadMode, config: &Config) -> Vec<ControlBinding> {
    (0..PADS_PER_MODE)
        .map(|pad| {
            let address = pad_address(strip, mode, pad);
            let (handler, echo, feedback) = pad_function(strip, mode, pad, config);
            let mut binding = ControlBinding::new(Owner::Strip(strip), address, handler)
                .with_alias(address.with_control_offset(SHIFTED_PAD_OFFSET));
            binding.echo = echo;
            binding.feedback = feedback;
            binding
        })
        .collect()
}

fn pad_echo(mode: PadMode, pad: u8, config: &Config) -> Option<PadColors> {
    let slot = usize::from(pad);
    match mode {
        PadMode::BeatJump => Some(config.pair_colors[slot]),
        PadMode::Pitch => Some(config.pair_colors[PITCH_PAD_COLOR_SLOTS[slot]]),
        PadMode::Effect if matches!(pad, 4 | 5) => Some(CHAIN_SELECTOR_COLORS),
        _ => None,
    }
}

fn pad_function(
    strip: Strip,
    mode: PadMode,
    pad: u8,
    config: &Config,
) -> (Handler, Option<PadColors>, Option<Feedback>) {
    let slot = usize::from(pad);
    let number = pad + 1;
    let echo = pad_echo(mode, pad, config);
    match mode {
        PadMode::Hotcue => (
            Handler::shiftable(
                Action::Hold(Target::deck(format!("hotcue_{number}_activate"))),
                Action::Trigger(Target::deck(format!("hotcue_{number}_clear"))),
            ),
            echo,
            Some(Feedback::new(
                GroupRef::CurrentDeck,
                vec![
                    KeyRef::from(format!("hotcue_{number}_status")),
                    KeyRef::from(format!("hotcue_{number}_color")),
                ],
                Render::Hotcue,
            )),
        ),
        PadMode::Loop => (
            Handler::shiftable(
                Action::Trigger(Target::deck(format!(
                    "beatloop_{size}_toggle",
                    size = LOOP_SIZES[slot]
                ))),
                Action::Trigger(Target::deck(format!(
                    "beatloop_{size}_toggle",
                    size = SHIFTED_LOOP_SIZES[slot]
                ))),
            ),
            echo,
            Some(Feedback::deck(
                format!("beatloop_{size}_enabled", size = LOOP_SIZES[slot]),
                Render::OnOff(LOOP_COLORS),
            )),
        ),
        PadMode::Effect => effect_pad_function(strip, pad, echo),
        PadMode::BeatJump => {
            let direction = if pad % 2 == 0 { "backward" } else { "forward" };
            (
                Handler::shiftable(
                    Action::Trigger(Target::deck(format!(
                        "beatjump_{size}_{direction}",
                        size = JUMP_SIZES[slot]
                    ))),
                    Action::Trigger(Target::deck(format!(
                        "beatjump_{size}_{direction}",
                        size = SHIFTED_JUMP_SIZES[slot]
                    ))),
                ),
                echo,
                None,
            )
        }
        PadMode::Pitch => {
            let handler = match pad {
                0 => Handler::Plain(Action::Repeat {
                    target: Target::deck("pitch_down"),
                    count: 2,
                }),
                1 => Handler::Plain(Action::Trigger(Target::deck("pitch_down"))),
                2 => Handler::Plain(Action::Trigger(Target::deck("pitch_up"))),
                3 => Handler::Plain(Action::Repeat {
                    target: Target::deck("pitch_up"),
                    count: 2,
                }),
                4 => Handler::Plain(Action::PitchRange(PitchRangeStep::Reset)),
                5 => Handler::Plain(Action::PitchRange(PitchRangeStep::Decrease)),
                6 => Handler::Plain(Action::PitchRange(PitchRangeStep::Increase)),
                _ => Handler::shiftable(
                    Action::Trigger(Target::deck("hotcue_focus_color_next")),
                    Action::Trigger(Target::deck("hotcue_focus_color_prev")),
                ),
            };
            (handler, echo, None)
        }
        PadMode::Roll => (
            Handler::shiftable(
                Action::Hold(Target::deck(format!(
                    "beatlooproll_{size}_activate",
                    size = LOOP_SIZES[slot]
                ))),
                Action::Hold(Target::deck(format!(
                    "beatlooproll_{size}_activate",
                    size = SHIFTED_LOOP_SIZES[slot]
                ))),
            ),
            echo,
            Some(Feedback::deck(
                format!("beatlooproll_{size}_activate", size = LOOP_SIZES[slot]),
                Render::OnOff(ROLL_COLORS),
            )),
        ),
        PadMode::Slicer => (Handler::Plain(Action::SlicerPad(pad)), echo, None),
        PadMode::Sampler => (
            Handler::shiftable(Action::SamplerPlay(number), Action::SamplerStop(number)),
            echo,
            Some(Feedback::new(
                GroupRef::Sampler(number),
                vec![
                    KeyRef::from("track_loaded"),
                    KeyRef::from("play"),
                    KeyRef::from("repeat"),
                ],
                Render::Sampler,
            )),
        ),
    }
}

/// The effect pads.
///
/// Pads 1-3 toggle the effects of the strip's own effect unit, pads 4
/// and 8 route the current deck into effect unit 1 and 2, pads 5 and
/// 6 select the quick effect chain, and pad 7 toggles the quick effect.
fn effect_pad_function(
    strip: Strip,
    pad: u8,
    echo: Option<PadColors>,
) -> (Handler, Option<PadColors>, Option<Feedback>) {
    let unit = strip.midi_channel();
    match pad {
        0..=2 => {
            let slot = pad + 1;
            let group = GroupRef::EffectSlot { unit, slot };
            (
                Handler::shiftable(
                    Action::EffectSlot { unit, slot },
                    Action::Step {
                        target: Target::new(group, "effect_selector"),
                        value: 1.0,
                    },
                ),
                echo,
                Some(Feedback::new(
                    group,
                    vec![KeyRef::from("enabled")],
                    Render::OnOff(EFFECT_COLORS),
                )),
            )
        }
        3 | 7 => {
            let group = GroupRef::EffectUnit(if pad == 3 { 1 } else { 2 });
            (
                Handler::Plain(Action::Toggle(Target::new(group, KeyRef::DeckRouting))),
                echo,
                Some(Feedback::new(
                    group,
                    vec![KeyRef::DeckRouting],
                    Render::OnOff(EFFECT_ROUTING_COLORS),
                )),
            )
        }
        4 | 5 => (
            Handler::Plain(Action::Step {
                target: Target::new(GroupRef::QuickEffect, "chain_preset_selector"),
                value: if pad == 4 { -1.0 } else { 1.0 },
            }),
            echo,
            None,
        ),
        _ => (
            Handler::Plain(Action::Toggle(Target::new(GroupRef::QuickEffect, "enabled"))),
            echo,
            Some(Feedback::new(
                GroupRef::QuickEffect,
                vec![KeyRef::from("enabled")],
                Render::OnOff(QUICK_EFFECT_COLORS),
            )),
        ),
    }
}
