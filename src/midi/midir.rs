// SPDX-FileCopyrightText: The inpulse authors
// SPDX-License-Identifier: MPL-2.0

use std::sync::mpsc;

use midir::{
    ConnectError, Ignore, InitError, MidiInput, MidiInputConnection, MidiOutput,
    MidiOutputConnection, SendError,
};
use thiserror::Error;

use super::try_decode_midi_input;
use crate::{ControlOutput, InputEvent, OutputError, OutputResult, OutputSink};

/// Port name prefix of the device for auto-detection.
pub const PORT_NAME_PREFIX: &str = "DJControl Inpulse 500";

#[derive(Debug, Error)]
pub enum MidiPortError {
    #[error("no port found with prefix \"{prefix}\"")]
    NotFound { prefix: &'static str },
    #[error(transparent)]
    Init(#[from] InitError),
    #[error(transparent)]
    ConnectInput(#[from] ConnectError<MidiInput>),
    #[error(transparent)]
    ConnectOutput(#[from] ConnectError<MidiOutput>),
}

impl From<SendError> for OutputError {
    fn from(err: SendError) -> Self {
        OutputError::Send {
            msg: err.to_string().into(),
        }
    }
}

impl OutputSink for MidiOutputConnection {
    fn send_output(&mut self, output: ControlOutput) -> OutputResult<()> {
        self.send(&output.to_midi_message())?;
        Ok(())
    }
}

/// Open input and output connections to the device.
#[allow(missing_debug_implementations)]
pub struct MidirConnections {
    pub input: MidiInputConnection<mpsc::Sender<InputEvent>>,
    pub output: MidiOutputConnection,
}

impl MidirConnections {
    pub fn close(self) {
        let Self { input, output } = self;
        input.close();
        output.close();
    }
}

// Adapter for the midir callback closure
fn handle_input(micros: u64, input: &[u8], event_tx: &mut mpsc::Sender<InputEvent>) {
    log::trace!("Received MIDI input @ {micros} us: {input:02x?}");
    match try_decode_midi_input(input) {
        Ok(Some(event)) => {
            if event_tx.send(event).is_err() {
                log::debug!("Dropping MIDI input {input:02x?}: receiver disconnected");
            }
        }
        Ok(None) => (),
        Err(err) => {
            log::warn!("Failed to decode MIDI input {input:02x?}: {err}");
        }
    }
}

/// Connect to the first input and output ports whose names start
/// with [`PORT_NAME_PREFIX`].
///
/// Decoded input events are forwarded into `event_tx`.
pub fn connect_midir_ports(
    client_name: &str,
    event_tx: mpsc::Sender<InputEvent>,
) -> Result<MidirConnections, MidiPortError> {
    let mut input = MidiInput::new(client_name)?;
    input.ignore(Ignore::All);
    let input_port = input
        .ports()
        .into_iter()
        .find(|port| {
            input
                .port_name(port)
                .is_ok_and(|name| name.starts_with(PORT_NAME_PREFIX))
        })
        .ok_or(MidiPortError::NotFound {
            prefix: PORT_NAME_PREFIX,
        })?;
    let output = MidiOutput::new(client_name)?;
    let output_port = output
        .ports()
        .into_iter()
        .find(|port| {
            output
                .port_name(port)
                .is_ok_and(|name| name.starts_with(PORT_NAME_PREFIX))
        })
        .ok_or(MidiPortError::NotFound {
            prefix: PORT_NAME_PREFIX,
        })?;
    log::info!("Connecting MIDI ports of {PORT_NAME_PREFIX}");
    let input = input.connect(&input_port, client_name, handle_input, event_tx)?;
    let output = output.connect(&output_port, client_name)?;
    Ok(MidirConnections { input, output })
}
