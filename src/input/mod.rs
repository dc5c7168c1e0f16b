// SPDX-FileCopyrightText: The inpulse authors
// SPDX-License-Identifier: MPL-2.0

//! Physical inputs and their decoded values.

#[cfg(test)]
mod tests;

/// Address of a physical control.
///
/// Inputs and outputs share the same address space: the MIDI status
/// byte (message type and channel) and the note/controller number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
#[display("{status:02x}/{control:02x}")]
pub struct ControlAddress {
    pub status: u8,
    pub control: u8,
}

impl ControlAddress {
    #[must_use]
    pub const fn new(status: u8, control: u8) -> Self {
        Self { status, control }
    }

    /// MIDI channel (0-based)
    #[must_use]
    pub const fn channel(self) -> u8 {
        self.status & 0x0f
    }

    #[must_use]
    pub const fn with_control_offset(self, offset: u8) -> Self {
        Self {
            status: self.status,
            control: self.control + offset,
        }
    }
}

/// A raw input event from the physical surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub address: ControlAddress,

    /// 7-bit value
    pub value: u8,
}

impl InputEvent {
    #[must_use]
    pub const fn new(address: ControlAddress, value: u8) -> Self {
        Self { address, value }
    }

    #[must_use]
    pub const fn button(self) -> ButtonInput {
        ButtonInput::from_u7(self.value)
    }

    /// Edge of a button press, i.e. not a release.
    #[must_use]
    pub const fn is_press(self) -> bool {
        matches!(self.button(), ButtonInput::Pressed)
    }
}

/// A simple two-state button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonInput {
    Pressed,
    Released,
}

impl ButtonInput {
    #[must_use]
    pub const fn from_u7(input: u8) -> Self {
        // Some controls report a reduced velocity instead of 0x7f
        if input == 0 {
            Self::Released
        } else {
            Self::Pressed
        }
    }
}

/// An endless encoder that sends discrete delta values when rotated
/// in CW (positive) or CCW (negative) direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepEncoderInput {
    pub delta: i32,
}

impl StepEncoderInput {
    /// Decode a 7-bit two's complement delta.
    #[must_use]
    pub fn from_u7(input: u8) -> Self {
        debug_assert_eq!(input, input & 0x7f);
        let delta = if input < 0x40 {
            i32::from(input)
        } else {
            i32::from(input) - 0x80
        };
        Self { delta }
    }
}

/// A continuous fader or knob.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderInput {
    /// Position in the interval [0, 1]
    pub position: f32,
}

impl SliderInput {
    pub const MIN_POSITION: f32 = 0.0;
    pub const MAX_POSITION: f32 = 1.0;

    #[must_use]
    pub fn from_u7(input: u8) -> Self {
        let position = f32::from(input.min(0x7f)) / 127.0;
        Self { position }
    }
}

/// A continuous fader or knob with a symmetric center position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterSliderInput {
    /// Position in the interval [-1, 1]
    pub position: f32,
}

impl CenterSliderInput {
    pub const MIN_POSITION: f32 = -1.0;
    pub const MAX_POSITION: f32 = 1.0;
    pub const CENTER_POSITION: f32 = 0.0;

    /// Decode a 7-bit value with the center at 64.
    ///
    /// The lower half has 64 steps and the upper half only 63 steps.
    /// Both halves are scaled independently to hit the center exactly.
    #[must_use]
    pub fn from_u7(input: u8) -> Self {
        let input = input.min(0x7f);
        let position = if input < 0x40 {
            (f32::from(input) - 64.0) / 64.0
        } else {
            (f32::from(input) - 64.0) / 63.0
        };
        Self { position }
    }

    /// Map the position onto the interval [0, 1].
    #[must_use]
    pub fn to_unipolar(self) -> f32 {
        (self.position + 1.0) / 2.0
    }
}
