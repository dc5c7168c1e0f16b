// SPDX-FileCopyrightText: The inpulse authors
// SPDX-License-Identifier: MPL-2.0

use std::collections::HashMap;

use strum::{EnumCount as _, IntoEnumIterator as _};

use crate::{
    layout::{self, note_address},
    pad_address,
    slicer::SlicerState,
    tempo::classify_tempo,
    Action, BindingId, ButtonInput, CenterSliderInput, Config, ConnectionHandle, ControlAddress,
    ControlBinding, ControlOutput, DeckAssignment, DeckState, DeckTempo, Engine, GroupRef,
    InputEvent, LogicalDeck, Owner, PadMode, PitchRangeStep, PotScale, SliderInput,
    StepEncoderInput, Strip, StripState, TimerHandle, TimerMode, OutputSink, PitchRange,
    TEMPO_POLL_PERIOD, LED_OFF, LED_ON,
};

/// Braking factor of the slow pause.
const SLOW_PAUSE_BRAKE_FACTOR: f64 = 54.0;

/// What a subscription is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Subscription {
    Feedback(BindingId),
    BeatActive(LogicalDeck),
}

/// What a timer is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum TimerPurpose {
    TempoPoll,
    SlipEnd(LogicalDeck),
    Reloop(LogicalDeck),
}

/// Mutable state of the controller, separate from the immutable bindings.
#[derive(Debug)]
pub(super) struct Context<E, S> {
    pub(super) engine: E,
    pub(super) sink: S,
    pub(super) config: Config,
    pub(super) running: bool,
    pub(super) assignment: DeckAssignment,
    pub(super) strips: [StripState; Strip::COUNT],
    pub(super) decks: [DeckState; LogicalDeck::COUNT],
    pub(super) subscriptions: HashMap<ConnectionHandle, Subscription>,
    pub(super) feedback_connections: HashMap<BindingId, Vec<ConnectionHandle>>,
    pub(super) timers: HashMap<TimerHandle, TimerPurpose>,
}

impl<E, S> Context<E, S>
where
    E: Engine,
    S: OutputSink,
{
    pub(super) fn new(engine: E, sink: S, config: Config) -> Self {
        let decks = std::array::from_fn(|_| DeckState::new(config.initial_vinyl_mode));
        Self {
            engine,
            sink,
            config,
            running: false,
            assignment: DeckAssignment::new(),
            strips: Default::default(),
            decks,
            subscriptions: HashMap::new(),
            feedback_connections: HashMap::new(),
            timers: HashMap::new(),
        }
    }

    pub(super) fn send(&mut self, address: ControlAddress, value: u8) {
        if let Err(err) = self.sink.send_output(ControlOutput::new(address, value)) {
            log::warn!("Failed to send {value:#04x} to {address}: {err}");
        }
    }

    /// The deck against which the bindings of an owner are resolved.
    ///
    /// Global bindings only address fixed groups.
    pub(super) fn owner_deck(&self, owner: Owner) -> LogicalDeck {
        match owner {
            Owner::Global => LogicalDeck::One,
            Owner::Strip(strip) => self.assignment.current_deck(strip),
        }
    }

    pub(super) fn is_shifted(&self, owner: Owner) -> bool {
        owner
            .strip()
            .is_some_and(|strip| self.strips[strip.index()].shift)
    }

    fn deck_state_mut(&mut self, deck: LogicalDeck) -> &mut DeckState {
        &mut self.decks[deck.index()]
    }

    fn begin_timer(&mut self, delay: std::time::Duration, mode: TimerMode, purpose: TimerPurpose) {
        let timer = self.engine.begin_timer(delay, mode);
        log::debug!("Scheduled {timer} for {purpose:?} in {delay:?}");
        self.timers.insert(timer, purpose);
    }

    /// Start polling the tempos.
    ///
    /// Periodic timers cannot be cancelled. The timer of a previous run
    /// is reused.
    pub(super) fn start_tempo_timer(&mut self) {
        if self
            .timers
            .values()
            .any(|purpose| *purpose == TimerPurpose::TempoPoll)
        {
            return;
        }
        self.begin_timer(TEMPO_POLL_PERIOD, TimerMode::Periodic, TimerPurpose::TempoPoll);
    }

    /// Discard all one-shot timers and put the slicers to rest.
    ///
    /// Slips that would have been ended by a discarded timer are ended
    /// immediately.
    pub(super) fn cancel_pending_timers(&mut self) {
        let mut relooped = Vec::new();
        self.timers.retain(|timer, purpose| match purpose {
            TimerPurpose::TempoPoll => true,
            TimerPurpose::SlipEnd(_) => {
                log::debug!("Discarding {timer} for {purpose:?}");
                false
            }
            TimerPurpose::Reloop(deck) => {
                relooped.push(*deck);
                false
            }
        });
        for deck in relooped {
            self.reloop(deck);
        }
        for deck in LogicalDeck::iter() {
            self.decks[deck.index()]
                .slicer
                .cancel(&mut self.engine, deck.group());
        }
    }

    /// Subscribe to the feedback of a binding and paint its current state.
    ///
    /// Existing subscriptions of the binding are disconnected first.
    pub(super) fn connect_feedback(&mut self, id: BindingId, binding: &ControlBinding) {
        self.disconnect_feedback(id);
        let Some(feedback) = &binding.feedback else {
            return;
        };
        let deck = self.owner_deck(binding.owner);
        let group = feedback.group.resolve(deck);
        let connections = feedback
            .keys
            .iter()
            .map(|key| {
                let connection = self.engine.make_connection(&group, &key.resolve(deck));
                self.subscriptions
                    .insert(connection, Subscription::Feedback(id));
                connection
            })
            .collect();
        self.feedback_connections.insert(id, connections);
        self.render(binding);
    }

    pub(super) fn disconnect_feedback(&mut self, id: BindingId) {
        for connection in self.feedback_connections.remove(&id).unwrap_or_default() {
            self.subscriptions.remove(&connection);
            self.engine.disconnect(connection);
        }
    }

    /// Paint the current state of the host controls of a binding.
    pub(super) fn render(&mut self, binding: &ControlBinding) {
        let Some(feedback) = &binding.feedback else {
            return;
        };
        let deck = self.owner_deck(binding.owner);
        let group = feedback.group.resolve(deck);
        let values = feedback
            .keys
            .iter()
            .map(|key| self.engine.get_value(&group, &key.resolve(deck)))
            .collect::<Vec<_>>();
        let value = feedback.render.render(&values, &self.config);
        for address in binding.output_addresses() {
            self.send(address, value);
        }
    }

    /// Subscribe to the beat crossings of the current deck of a strip
    /// and trigger the subscription.
    pub(super) fn rebind_beat_connection(&mut self, strip: Strip) {
        let (disconnected, connection) = self
            .assignment
            .rebind_beat_connection(&mut self.engine, strip);
        if let Some(disconnected) = disconnected {
            self.subscriptions.remove(&disconnected);
        }
        let deck = self.assignment.current_deck(strip);
        self.subscriptions
            .insert(connection, Subscription::BeatActive(deck));
        self.on_beat(deck);
    }

    pub(super) fn disconnect_all(&mut self) {
        let ids = self.feedback_connections.keys().copied().collect::<Vec<_>>();
        for id in ids {
            self.disconnect_feedback(id);
        }
        for strip in [Strip::A, Strip::B] {
            if let Some(connection) = self
                .assignment
                .disconnect_beat_connection(&mut self.engine, strip)
            {
                self.subscriptions.remove(&connection);
            }
        }
        debug_assert!(self.subscriptions.is_empty());
    }

    pub(super) fn paint_vinyl(&mut self, strip: Strip) {
        let deck = self.assignment.current_deck(strip);
        let value = if self.decks[deck.index()].vinyl_mode {
            LED_ON
        } else {
            LED_OFF
        };
        self.send(note_address(strip, layout::VINYL), value);
    }

    pub(super) fn paint_deck_selectors(&mut self) {
        for deck in [
            LogicalDeck::One,
            LogicalDeck::Two,
            LogicalDeck::Three,
            LogicalDeck::Four,
        ] {
            let value = if self.assignment.owner_of(deck).is_some() {
                LED_ON
            } else {
                LED_OFF
            };
            self.send(layout::deck_select_address(deck), value);
        }
    }

    fn paint_slicer_pad(&mut self, deck: LogicalDeck, pad: u8, value: u8) {
        self.send(pad_address(deck.home_strip(), PadMode::Slicer, pad), value);
    }

    pub(super) fn on_beat(&mut self, deck: LogicalDeck) {
        let leds = self.decks[deck.index()]
            .slicer
            .on_beat(&self.engine, deck.group());
        for (pad, led) in leds {
            self.paint_slicer_pad(deck, pad, led.value());
        }
    }

    pub(super) fn end_slip(&mut self, deck: LogicalDeck) {
        let reloop = self.decks[deck.index()]
            .slicer
            .end_slip(&mut self.engine, deck.group());
        if reloop {
            self.begin_timer(
                crate::slicer::RELOOP_DELAY,
                TimerMode::OneShot,
                TimerPurpose::Reloop(deck),
            );
        }
    }

    pub(super) fn reloop(&mut self, deck: LogicalDeck) {
        SlicerState::finish_reloop(&mut self.engine, deck.group());
    }

    pub(super) fn update_tempo_leds(&mut self) {
        let tempo_a = DeckTempo::read(&self.engine, self.assignment.current_deck(Strip::A).group());
        let tempo_b = DeckTempo::read(&self.engine, self.assignment.current_deck(Strip::B).group());
        let indication = classify_tempo(tempo_a, tempo_b);
        for (strip, indication) in [(Strip::A, indication), (Strip::B, indication.mirrored())] {
            for (control, value) in indication.led_values() {
                self.send(note_address(strip, control), value);
            }
        }
    }

    /// Perform the action of a binding.
    ///
    /// Deck selection is not handled here, because it needs to
    /// reconnect bindings.
    #[allow(clippy::too_many_lines)]
    pub(super) fn perform(&mut self, owner: Owner, action: &Action, event: InputEvent) {
        let deck = self.owner_deck(owner);
        let pressed = event.is_press();
        log::trace!("Performing {action:?} for {event:?}");
        match action {
            Action::Toggle(target) => {
                if pressed {
                    let (group, key) = target.resolve(deck);
                    self.engine.toggle_value(&group, &key);
                }
            }
            Action::Trigger(target) => {
                if pressed {
                    let (group, key) = target.resolve(deck);
                    self.engine.set_value(&group, &key, 1.0);
                }
            }
            Action::Repeat { target, count } => {
                if pressed {
                    let (group, key) = target.resolve(deck);
                    for _ in 0..*count {
                        self.engine.set_value(&group, &key, 1.0);
                    }
                }
            }
            Action::Hold(target) => {
                let (group, key) = target.resolve(deck);
                self.engine
                    .set_value(&group, &key, if pressed { 1.0 } else { 0.0 });
            }
            Action::Step { target, value } => {
                if pressed {
                    let (group, key) = target.resolve(deck);
                    self.engine.set_value(&group, &key, *value);
                }
            }
            Action::Pot { target, scale } => {
                let (group, key) = target.resolve(deck);
                match scale {
                    PotScale::Parameter => {
                        let position = SliderInput::from_u7(event.value).position;
                        self.engine.set_parameter(&group, &key, position.into());
                    }
                    PotScale::Bipolar => {
                        let position = CenterSliderInput::from_u7(event.value).position;
                        self.engine.set_value(&group, &key, position.into());
                    }
                }
            }
            Action::Play => {
                if !pressed {
                    return;
                }
                if self.decks[deck.index()].slow_pause
                    && self.engine.is_enabled(deck.group(), "play_latched")
                {
                    log::debug!("Braking {deck}");
                    self.engine.brake(deck.group(), SLOW_PAUSE_BRAKE_FACTOR);
                } else {
                    self.engine.toggle_value(deck.group(), "play");
                }
            }
            Action::Vinyl => {
                if pressed {
                    let deck_state = self.deck_state_mut(deck);
                    deck_state.vinyl_mode = !deck_state.vinyl_mode;
                    let vinyl_mode = deck_state.vinyl_mode;
                    log::debug!("Vinyl mode of {deck}: {vinyl_mode}");
                    if let Some(strip) = owner.strip() {
                        self.paint_vinyl(strip);
                    }
                }
            }
            Action::SlowPause => {
                if pressed {
                    let deck_state = self.deck_state_mut(deck);
                    deck_state.slow_pause = !deck_state.slow_pause;
                    log::debug!(
                        "Slow pause of {deck}: {slow_pause}",
                        slow_pause = deck_state.slow_pause
                    );
                }
            }
            Action::JogTouch => {
                let scratch = pressed && self.decks[deck.index()].vinyl_mode;
                self.engine.set_value(
                    deck.group(),
                    "scratch2_enable",
                    if scratch { 1.0 } else { 0.0 },
                );
            }
            Action::JogWheel { speed } => {
                let delta = f64::from(StepEncoderInput::from_u7(event.value).delta) * speed;
                let key = if self.engine.is_enabled(deck.group(), "scratch2_enable") {
                    "scratch2"
                } else {
                    "jog"
                };
                self.engine.set_value(deck.group(), key, delta);
            }
            Action::LoopResize => {
                let delta = StepEncoderInput::from_u7(event.value).delta;
                if delta < 0 {
                    self.engine.set_value(deck.group(), "loop_halve", 1.0);
                } else if delta > 0 {
                    self.engine.set_value(deck.group(), "loop_double", 1.0);
                }
            }
            Action::SlicerDomain => {
                let delta = StepEncoderInput::from_u7(event.value).delta.signum();
                let slicer = &mut self.deck_state_mut(deck).slicer;
                slicer.domain = slicer.domain.stepped(delta);
                log::debug!("Slicer domain of {deck}: {domain}", domain = slicer.domain);
            }
            Action::Shift => {
                if let Some(strip) = owner.strip() {
                    self.strips[strip.index()].shift = pressed;
                }
            }
            Action::PadMode(mode) => {
                if !pressed {
                    return;
                }
                if let Some(strip) = owner.strip() {
                    self.strips[strip.index()].pad_mode = Some(*mode);
                }
                let slicer = &mut self.deck_state_mut(deck).slicer;
                if *mode == PadMode::Slicer {
                    slicer.activate();
                } else {
                    slicer.deactivate();
                }
                log::debug!("Selected pad mode {mode} for {deck}");
            }
            Action::EffectSlot { unit, slot } => {
                if !pressed {
                    return;
                }
                let group = GroupRef::EffectSlot {
                    unit: *unit,
                    slot: *slot,
                }
                .resolve(deck);
                let enabled = self.engine.is_enabled(&group, "enabled");
                if let Some(strip) = owner.strip() {
                    let strip_state = &mut self.strips[strip.index()];
                    strip_state.filter_and_effect = false;
                    strip_state.only_effect = !enabled;
                }
                self.engine.toggle_value(&group, "enabled");
            }
            Action::FilterKnob => {
                let Some(strip) = owner.strip() else {
                    return;
                };
                let StripState {
                    only_effect,
                    filter_and_effect,
                    ..
                } = self.strips[strip.index()];
                let input = CenterSliderInput::from_u7(event.value);
                if only_effect || filter_and_effect {
                    let group = GroupRef::EffectUnit(strip.midi_channel()).resolve(deck);
                    self.engine
                        .set_value(&group, "super1", input.position.abs().into());
                }
                if filter_and_effect || !only_effect {
                    let group = GroupRef::QuickEffect.resolve(deck);
                    self.engine
                        .set_value(&group, "super1", input.to_unipolar().into());
                }
            }
            Action::PitchRange(step) => {
                if !pressed {
                    return;
                }
                let deck_state = self.deck_state_mut(deck);
                deck_state.pitch_range = match step {
                    PitchRangeStep::Reset => PitchRange::reset(),
                    PitchRangeStep::Decrease => deck_state.pitch_range.decreased(),
                    PitchRangeStep::Increase => deck_state.pitch_range.increased(),
                };
                let range = deck_state.pitch_range;
                log::debug!(
                    "Pitch range of {deck}: {value}",
                    value = range.value()
                );
                self.engine.set_value(deck.group(), "rateRange", range.value());
            }
            Action::SlicerPad(pad) => {
                if !pressed {
                    return;
                }
                let Some(jump) = self.decks[deck.index()]
                    .slicer
                    .press(&mut self.engine, deck.group(), *pad)
                else {
                    log::debug!("Ignoring slicer pad {pad} of {deck}: inactive");
                    return;
                };
                if let Some(delay) = jump.slip_end_delay {
                    self.begin_timer(delay, TimerMode::OneShot, TimerPurpose::SlipEnd(deck));
                }
                self.paint_slicer_pad(deck, *pad, crate::PadLed::Pressed.value());
            }
            Action::SamplerPlay(number) => {
                if pressed {
                    let group = GroupRef::Sampler(*number).resolve(deck);
                    let key = if self.engine.is_enabled(&group, "track_loaded") {
                        "cue_gotoandplay"
                    } else {
                        "LoadSelectedTrack"
                    };
                    self.engine.set_value(&group, key, 1.0);
                }
            }
            Action::SamplerStop(number) => {
                if pressed {
                    let group = GroupRef::Sampler(*number).resolve(deck);
                    let key = if self.engine.is_enabled(&group, "play") {
                        "cue_gotoandstop"
                    } else {
                        "eject"
                    };
                    self.engine.set_value(&group, key, 1.0);
                }
            }
            Action::Browser => {
                let delta = StepEncoderInput::from_u7(event.value).delta;
                if delta == 0 {
                    return;
                }
                let up = delta < 0;
                if self.config.browser_off_focus_mode {
                    self.engine.set_value(
                        "[Playlist]",
                        "SelectTrackKnob",
                        if up { -1.0 } else { 1.0 },
                    );
                } else {
                    self.engine.set_value(
                        "[Library]",
                        if up { "MoveUp" } else { "MoveDown" },
                        1.0,
                    );
                }
            }
            Action::SelectDeck(_) => {
                debug_assert!(false, "deck selection must be handled by the controller");
            }
        }
    }

    /// Echo the state of a button on its LED.
    pub(super) fn echo(&mut self, binding: &ControlBinding, event: InputEvent) {
        let Some(colors) = binding.echo else {
            return;
        };
        let value = colors.select(matches!(event.button(), ButtonInput::Pressed));
        self.send(event.address, value);
    }
}
