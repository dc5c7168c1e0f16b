// SPDX-FileCopyrightText: The inpulse authors
// SPDX-License-Identifier: MPL-2.0

use std::borrow::Cow;

use thiserror::Error;

use crate::ControlAddress;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("disconnected")]
    Disconnected,
    #[error("send: {msg}")]
    Send { msg: Cow<'static, str> },
}

pub type OutputResult<T> = std::result::Result<T, OutputError>;

pub const LED_OFF: u8 = 0x00;
pub const LED_ON: u8 = 0x7f;

/// A single write to an addressable LED or meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlOutput {
    pub address: ControlAddress,

    /// 7-bit value
    pub value: u8,
}

impl ControlOutput {
    #[must_use]
    pub const fn new(address: ControlAddress, value: u8) -> Self {
        Self { address, value }
    }

    #[must_use]
    pub const fn to_midi_message(self) -> [u8; 3] {
        let Self { address, value } = self;
        [address.status, address.control, value & 0x7f]
    }
}

/// Fire-and-forget output endpoint.
///
/// There is neither read-back nor acknowledgement.
pub trait OutputSink {
    fn send_output(&mut self, output: ControlOutput) -> OutputResult<()>;
}

impl<S> OutputSink for &mut S
where
    S: OutputSink + ?Sized,
{
    fn send_output(&mut self, output: ControlOutput) -> OutputResult<()> {
        (**self).send_output(output)
    }
}

impl<S> OutputSink for Box<S>
where
    S: OutputSink + ?Sized,
{
    fn send_output(&mut self, output: ControlOutput) -> OutputResult<()> {
        (**self).send_output(output)
    }
}

/// Records all outputs in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    outputs: Vec<ControlOutput>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn outputs(&self) -> &[ControlOutput] {
        &self.outputs
    }

    pub fn take_outputs(&mut self) -> Vec<ControlOutput> {
        std::mem::take(&mut self.outputs)
    }

    pub fn clear(&mut self) {
        self.outputs.clear();
    }

    /// The most recent value written to `address`.
    #[must_use]
    pub fn last_value(&self, address: ControlAddress) -> Option<u8> {
        self.outputs
            .iter()
            .rev()
            .find(|output| output.address == address)
            .map(|output| output.value)
    }

    #[must_use]
    pub fn count_writes(&self, address: ControlAddress) -> usize {
        self.outputs
            .iter()
            .filter(|output| output.address == address)
            .count()
    }
}

impl OutputSink for RecordingSink {
    fn send_output(&mut self, output: ControlOutput) -> OutputResult<()> {
        self.outputs.push(output);
        Ok(())
    }
}
