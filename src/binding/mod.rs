// SPDX-FileCopyrightText: The inpulse authors
// SPDX-License-Identifier: MPL-2.0

//! Declarative bindings of physical controls to host controls.

use std::{borrow::Cow, collections::HashMap};

use thiserror::Error;

use crate::{Config, ControlAddress, LogicalDeck, PadColors, PadMode, Strip, LED_OFF, LED_ON};

#[cfg(test)]
mod tests;

/// Host control group, resolved against the current deck of the owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupRef {
    /// `[ChannelN]`
    CurrentDeck,
    /// `[EqualizerRack1_[ChannelN]_Effect1]`
    Equalizer,
    /// `[QuickEffectRack1_[ChannelN]]`
    QuickEffect,
    /// `[EffectRack1_EffectUnitU]`
    EffectUnit(u8),
    /// `[EffectRack1_EffectUnitU_EffectS]`
    EffectSlot { unit: u8, slot: u8 },
    /// `[SamplerN]`
    Sampler(u8),
    Fixed(&'static str),
}

impl GroupRef {
    #[must_use]
    pub fn resolve(self, deck: LogicalDeck) -> Cow<'static, str> {
        match self {
            Self::CurrentDeck => Cow::Borrowed(deck.group()),
            Self::Equalizer => format!("[EqualizerRack1_{deck}_Effect1]").into(),
            Self::QuickEffect => format!("[QuickEffectRack1_{deck}]").into(),
            Self::EffectUnit(unit) => format!("[EffectRack1_EffectUnit{unit}]").into(),
            Self::EffectSlot { unit, slot } => {
                format!("[EffectRack1_EffectUnit{unit}_Effect{slot}]").into()
            }
            Self::Sampler(number) => format!("[Sampler{number}]").into(),
            Self::Fixed(group) => Cow::Borrowed(group),
        }
    }
}

/// Host control key, resolved against the current deck of the owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyRef {
    Name(Cow<'static, str>),
    /// `group_[ChannelN]_enable` of an effect unit
    DeckRouting,
}

impl KeyRef {
    #[must_use]
    pub fn resolve(&self, deck: LogicalDeck) -> Cow<'static, str> {
        match self {
            Self::Name(name) => name.clone(),
            Self::DeckRouting => format!("group_{deck}_enable").into(),
        }
    }
}

impl From<&'static str> for KeyRef {
    fn from(name: &'static str) -> Self {
        Self::Name(Cow::Borrowed(name))
    }
}

impl From<String> for KeyRef {
    fn from(name: String) -> Self {
        Self::Name(Cow::Owned(name))
    }
}

/// A host control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub group: GroupRef,
    pub key: KeyRef,
}

impl Target {
    #[must_use]
    pub fn new(group: GroupRef, key: impl Into<KeyRef>) -> Self {
        Self {
            group,
            key: key.into(),
        }
    }

    #[must_use]
    pub fn deck(key: impl Into<KeyRef>) -> Self {
        Self::new(GroupRef::CurrentDeck, key)
    }

    #[must_use]
    pub fn resolve(&self, deck: LogicalDeck) -> (Cow<'static, str>, Cow<'static, str>) {
        (self.group.resolve(deck), self.key.resolve(deck))
    }
}

/// Mapping of continuous inputs onto host values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PotScale {
    /// Normalized parameter in the interval [0, 1]
    Parameter,
    /// Plain value in the interval [-1, 1] with the center at 0
    Bipolar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PitchRangeStep {
    Reset,
    Decrease,
    Increase,
}

/// What happens when a physical control is operated.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Toggle on press.
    Toggle(Target),
    /// Write 1 on press.
    Trigger(Target),
    /// Write 1 on press, repeatedly.
    Repeat { target: Target, count: u8 },
    /// Write 1 on press and 0 on release.
    Hold(Target),
    /// Write a fixed value on press.
    Step { target: Target, value: f64 },
    Pot { target: Target, scale: PotScale },
    /// Toggle play of the current deck, braking if slow pause is set.
    Play,
    /// Toggle the per-deck vinyl (scratch) mode.
    Vinyl,
    /// Toggle the per-deck slow pause.
    SlowPause,
    JogTouch,
    /// Rotation, scaled by the given factor.
    JogWheel { speed: f64 },
    /// Halve or double the loop of the current deck.
    LoopResize,
    /// Change the slicer domain of the current deck.
    SlicerDomain,
    Shift,
    PadMode(PadMode),
    /// Toggle one of the effect slots that also determine the
    /// behavior of the filter knob.
    EffectSlot { unit: u8, slot: u8 },
    FilterKnob,
    PitchRange(PitchRangeStep),
    SlicerPad(u8),
    /// Play from the cue point or load a track.
    SamplerPlay(u8),
    /// Stop at the cue point or eject a track.
    SamplerStop(u8),
    Browser,
    SelectDeck(LogicalDeck),
}

/// Selects the action of a binding.
#[derive(Debug, Clone, PartialEq)]
pub enum Handler {
    /// Output only
    None,
    /// Same action regardless of shift
    Plain(Action),
    /// Action selected by the shift state of the owning strip
    Shiftable { unshifted: Action, shifted: Action },
}

impl Handler {
    #[must_use]
    pub fn shiftable(unshifted: Action, shifted: Action) -> Self {
        Self::Shiftable { unshifted, shifted }
    }

    /// Select the active action.
    #[must_use]
    pub fn select(&self, shift: bool) -> Option<&Action> {
        match self {
            Self::None => None,
            Self::Plain(action) => Some(action),
            Self::Shiftable { unshifted, shifted } => Some(if shift { shifted } else { unshifted }),
        }
    }
}

/// Computes the LED value from the subscribed values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Render {
    /// On if the first value is non-zero
    OnOff(PadColors),
    /// `hotcue_N_status` and `hotcue_N_color`
    Hotcue,
    /// `track_loaded`, `play`, and `repeat`
    Sampler,
    /// Level in the interval [0, 1]
    VuMeter,
}

pub const SAMPLER_EMPTY: u8 = 0x00;
pub const SAMPLER_LOADED: u8 = 0x42;
pub const SAMPLER_PLAYING: u8 = 0x63;
pub const SAMPLER_REPEATING: u8 = 0x74;

const VU_METER_MAX: f64 = 125.0;

impl Render {
    pub const LED: Self = Self::OnOff(PadColors::new(LED_ON, LED_OFF));

    /// Compute the output value.
    ///
    /// Missing values are treated as 0.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn render(self, values: &[f64], config: &Config) -> u8 {
        let value = |index: usize| values.get(index).copied().unwrap_or_default();
        match self {
            Self::OnOff(colors) => colors.select(value(0) > 0.0),
            Self::Hotcue => {
                if value(0) <= 0.0 {
                    return LED_OFF;
                }
                let color = value(1);
                if color < 0.0 {
                    // No color assigned
                    return LED_ON;
                }
                config
                    .pad_colors
                    .nearest_code(color as u32)
                    .unwrap_or(LED_ON)
            }
            Self::Sampler => {
                if value(0) <= 0.0 {
                    SAMPLER_EMPTY
                } else if value(1) <= 0.0 {
                    SAMPLER_LOADED
                } else if value(2) > 0.0 {
                    SAMPLER_REPEATING
                } else {
                    SAMPLER_PLAYING
                }
            }
            Self::VuMeter => (value(0).clamp(0.0, 1.0) * VU_METER_MAX).round() as u8,
        }
    }
}

/// Host controls that are reflected by an output.
#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    pub group: GroupRef,
    pub keys: Vec<KeyRef>,
    pub render: Render,
}

impl Feedback {
    #[must_use]
    pub fn new(group: GroupRef, keys: Vec<KeyRef>, render: Render) -> Self {
        Self {
            group,
            keys,
            render,
        }
    }

    /// A single key of the current deck.
    #[must_use]
    pub fn deck(key: impl Into<KeyRef>, render: Render) -> Self {
        Self::new(GroupRef::CurrentDeck, vec![key.into()], render)
    }
}

/// Who owns a binding.
///
/// Strip bindings resolve their groups against the current deck and
/// their actions against the shift state of the strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    Global,
    Strip(Strip),
}

impl Owner {
    #[must_use]
    pub const fn strip(self) -> Option<Strip> {
        match self {
            Self::Global => None,
            Self::Strip(strip) => Some(strip),
        }
    }
}

/// A physical control bound to host controls.
///
/// Created once at startup and never destroyed. Only the resolved
/// groups change when the owning strip is reassigned to another deck.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlBinding {
    pub owner: Owner,
    pub address: ControlAddress,

    /// Additional input addresses, e.g. of the shifted layer.
    ///
    /// Outputs are sent to both the address and all aliases.
    pub aliases: Vec<ControlAddress>,

    pub handler: Handler,

    /// LED values echoed on press and release.
    pub echo: Option<PadColors>,

    pub feedback: Option<Feedback>,
}

impl ControlBinding {
    #[must_use]
    pub fn new(owner: Owner, address: ControlAddress, handler: Handler) -> Self {
        Self {
            owner,
            address,
            aliases: Vec::new(),
            handler,
            echo: None,
            feedback: None,
        }
    }

    #[must_use]
    pub fn with_alias(mut self, alias: ControlAddress) -> Self {
        self.aliases.push(alias);
        self
    }

    #[must_use]
    pub fn with_feedback(mut self, feedback: Feedback) -> Self {
        self.feedback = Some(feedback);
        self
    }

    /// The primary address followed by all aliases.
    pub fn output_addresses(&self) -> impl Iterator<Item = ControlAddress> + '_ {
        std::iter::once(self.address).chain(self.aliases.iter().copied())
    }
}

/// Identifier of registered bindings
///
/// Opaque, 0-based, consecutive index in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
#[repr(transparent)]
pub struct BindingId(usize);

#[derive(Debug, Error)]
pub enum RegisterError {
    #[error("address {address} is already occupied")]
    AddressOccupied { address: ControlAddress },
}

/// All bindings, addressable by their input addresses.
#[derive(Debug, Default)]
pub struct BindingRegistry {
    bindings: Vec<ControlBinding>,
    address_to_id: HashMap<ControlAddress, BindingId>,
}

impl BindingRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a binding.
    ///
    /// Neither the address nor any of the aliases must be occupied by
    /// another binding. The registry remains unmodified on error.
    pub fn register(&mut self, binding: ControlBinding) -> Result<BindingId, RegisterError> {
        let mut addresses = binding.output_addresses().collect::<Vec<_>>();
        addresses.sort_unstable();
        if let Some(address) = addresses
            .windows(2)
            .find_map(|pair| (pair[0] == pair[1]).then_some(pair[0]))
        {
            return Err(RegisterError::AddressOccupied { address });
        }
        if let Some(address) = addresses
            .iter()
            .find(|address| self.address_to_id.contains_key(address))
        {
            return Err(RegisterError::AddressOccupied { address: *address });
        }
        let id = BindingId(self.bindings.len());
        self.address_to_id
            .extend(addresses.into_iter().map(|address| (address, id)));
        self.bindings.push(binding);
        Ok(id)
    }

    #[must_use]
    pub fn find(&self, address: ControlAddress) -> Option<BindingId> {
        self.address_to_id.get(&address).copied()
    }

    /// Panics on ids that have not been returned by this registry.
    #[must_use]
    pub fn get(&self, id: BindingId) -> &ControlBinding {
        &self.bindings[id.0]
    }

    pub fn iter(&self) -> impl Iterator<Item = (BindingId, &ControlBinding)> {
        self.bindings
            .iter()
            .enumerate()
            .map(|(index, binding)| (BindingId(index), binding))
    }

    /// Bindings owned by a strip.
    pub fn iter_strip(&self, strip: Strip) -> impl Iterator<Item = (BindingId, &ControlBinding)> {
        self.iter()
            .filter(move |(_, binding)| binding.owner == Owner::Strip(strip))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
