// SPDX-FileCopyrightText: The inpulse authors
// SPDX-License-Identifier: MPL-2.0

//! MIDI short message decoding.

use thiserror::Error;

use crate::{ControlAddress, InputEvent};

#[cfg(feature = "midir")]
mod midir;
#[cfg(feature = "midir")]
pub use self::midir::{connect_midir_ports, MidiPortError, MidirConnections, PORT_NAME_PREFIX};

pub const MIDI_CMD_NOTE_OFF: u8 = 0x80;
pub const MIDI_CMD_NOTE_ON: u8 = 0x90;
pub const MIDI_CMD_CC: u8 = 0xb0;

const MIDI_CMD_MASK: u8 = 0xf0;
const MIDI_CHANNEL_MASK: u8 = 0x0f;

#[derive(Debug, Error)]
#[error("undecodable MIDI input")]
pub struct MidiInputDecodeError;

#[must_use]
pub const fn note_status(channel: u8) -> u8 {
    MIDI_CMD_NOTE_ON | (channel & MIDI_CHANNEL_MASK)
}

#[must_use]
pub const fn cc_status(channel: u8) -> u8 {
    MIDI_CMD_CC | (channel & MIDI_CHANNEL_MASK)
}

/// Decode a MIDI short message into an [`InputEvent`].
///
/// Note-off messages are normalized into note-on messages with
/// value 0. Messages other than notes and control changes are
/// skipped, i.e. `Ok(None)` is not an error.
pub fn try_decode_midi_input(input: &[u8]) -> Result<Option<InputEvent>, MidiInputDecodeError> {
    let [status, data1, data2] = *input else {
        return Err(MidiInputDecodeError);
    };
    if status & 0x80 == 0 || data1 & 0x80 != 0 || data2 & 0x80 != 0 {
        return Err(MidiInputDecodeError);
    }
    let channel = status & MIDI_CHANNEL_MASK;
    let event = match status & MIDI_CMD_MASK {
        MIDI_CMD_NOTE_OFF => InputEvent::new(ControlAddress::new(note_status(channel), data1), 0),
        MIDI_CMD_NOTE_ON | MIDI_CMD_CC => InputEvent::new(ControlAddress::new(status, data1), data2),
        _ => {
            return Ok(None);
        }
    };
    Ok(Some(event))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_note_on() {
        let event = try_decode_midi_input(&[0x91, 0x07, 0x7f]).unwrap().unwrap();
        assert_eq!(ControlAddress::new(0x91, 0x07), event.address);
        assert!(event.is_press());
    }

    #[test]
    fn decode_note_off_as_release() {
        let event = try_decode_midi_input(&[0x86, 0x60, 0x40]).unwrap().unwrap();
        assert_eq!(ControlAddress::new(0x96, 0x60), event.address);
        assert_eq!(0, event.value);
    }

    #[test]
    fn decode_control_change() {
        let event = try_decode_midi_input(&[0xb2, 0x0a, 0x7e]).unwrap().unwrap();
        assert_eq!(ControlAddress::new(0xb2, 0x0a), event.address);
        assert_eq!(0x7e, event.value);
    }

    #[test]
    fn skip_pitch_bend() {
        assert!(try_decode_midi_input(&[0xe0, 0x00, 0x40]).unwrap().is_none());
    }

    #[test]
    fn reject_malformed_input() {
        assert!(try_decode_midi_input(&[0x90, 0x07]).is_err());
        assert!(try_decode_midi_input(&[0x10, 0x07, 0x7f]).is_err());
        assert!(try_decode_midi_input(&[0x90, 0x87, 0x7f]).is_err());
    }
}
