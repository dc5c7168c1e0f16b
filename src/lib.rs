// SPDX-FileCopyrightText: The inpulse authors
// SPDX-License-Identifier: MPL-2.0

#![allow(rustdoc::invalid_rust_codeblocks)]
#![doc = include_str!("../README.md")]
#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![warn(missing_debug_implementations)]
//#![warn(missing_docs)] // FIXME
#![warn(unreachable_pub)]
#![warn(unsafe_code)]
#![warn(clippy::pedantic)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(rustdoc::broken_intra_doc_links)]
// Repetitions of module/type names occur frequently when using many
// modules for keeping the size of the source files handy. Often
// types have the same name as their parent module.
#![allow(clippy::module_name_repetitions)]
// Repeating the type name in `..Default::default()` expressions
// is not needed since the context is obvious.
#![allow(clippy::default_trait_access)]

mod assignment;
pub use self::assignment::{AssignmentError, DeckAssignment, BEAT_ACTIVE_KEY};

mod binding;
pub use self::binding::{
    Action, BindingId, BindingRegistry, ControlBinding, Feedback, GroupRef, Handler, KeyRef,
    Owner, PitchRangeStep, PotScale, RegisterError, Render, Target, SAMPLER_EMPTY, SAMPLER_LOADED,
    SAMPLER_PLAYING, SAMPLER_REPEATING,
};

mod color;
pub use self::color::ColorMap;

mod config;
pub use self::config::{Config, PadColors, PAIR_COLORS};

mod controller;
pub use self::controller::{Controller, ControllerDescriptor, DEVICE_NAME};

mod deck;
pub use self::deck::{DeckState, LogicalDeck, PitchRange, Strip, StripState, PITCH_RANGES};

pub mod engine;
pub use self::engine::{ConnectionHandle, Engine, TimerHandle, TimerMode};

mod input;
pub use self::input::{
    ButtonInput, CenterSliderInput, ControlAddress, InputEvent, SliderInput, StepEncoderInput,
};

mod layout;

pub mod midi;
pub use self::midi::{try_decode_midi_input, MidiInputDecodeError};

mod output;
pub use self::output::{
    ControlOutput, OutputError, OutputResult, OutputSink, RecordingSink, LED_OFF, LED_ON,
};

mod pad;
pub use self::pad::{pad_address, PadMode, PADS_PER_MODE};

mod slicer;
pub use self::slicer::{
    slip_end_delay, PadLed, SlicerDomain, SlicerJump, SlicerState, RELOOP_DELAY,
};

mod tempo;
pub use self::tempo::{
    classify_tempo, DeckTempo, PhaseMatch, TempoIndication, TempoMatch, TEMPO_POLL_PERIOD,
};
