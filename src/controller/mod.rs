// SPDX-FileCopyrightText: The inpulse authors
// SPDX-License-Identifier: MPL-2.0

//! Event dispatch between the physical surface and the host engine.

use std::time::Duration;

use strum::IntoEnumIterator as _;

use crate::{
    engine::MemoryEngine,
    layout::{self, build_registry},
    Action, BindingRegistry, Config, ConnectionHandle, DeckState, Engine, InputEvent,
    LogicalDeck, OutputSink, PadMode, RegisterError, Strip, StripState, TimerHandle, LED_OFF,
    PADS_PER_MODE,
};

mod context;
use self::context::{Context, Subscription, TimerPurpose};


/// Product name of the supported device.
pub const DEVICE_NAME: &str = "Hercules DJControl Inpulse 500";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerDescriptor {
    /// Number of physical strips
    pub num_strips: u8,

    /// Number of logical decks
    ///
    /// Each strip switches between two decks.
    pub num_decks: u8,

    /// Number of pads per strip and mode
    pub num_pads_per_mode: u8,

    /// Number of pad modes
    pub num_pad_modes: u8,

    /// Number of effect units
    pub num_effect_units: u8,
}

/// Binds the physical controls of the device to the controls of
/// a host engine.
///
/// All handlers are invoked from a single thread. Inputs, change
/// notifications, and timers must never be delivered concurrently.
#[derive(Debug)]
pub struct Controller<E, S> {
    registry: BindingRegistry,
    context: Context<E, S>,
}

impl<E, S> Controller<E, S>
where
    E: Engine,
    S: OutputSink,
{
    pub const DESCRIPTOR: ControllerDescriptor = ControllerDescriptor {
        num_strips: 2,
        num_decks: 4,
        num_pads_per_mode: PADS_PER_MODE,
        num_pad_modes: 8,
        num_effect_units: 2,
    };

    /// Register all bindings.
    ///
    /// Nothing is sent or subscribed until [`Self::init()`] is invoked.
    pub fn new(engine: E, sink: S, config: Config) -> Result<Self, RegisterError> {
        let registry = build_registry(&config)?;
        log::debug!("Registered {num} bindings", num = registry.len());
        Ok(Self {
            registry,
            context: Context::new(engine, sink, config),
        })
    }

    #[must_use]
    pub const fn engine(&self) -> &E {
        &self.context.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.context.engine
    }

    #[must_use]
    pub const fn sink(&self) -> &S {
        &self.context.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.context.sink
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.context.config
    }

    #[must_use]
    pub const fn registry(&self) -> &BindingRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.context.running
    }

    #[must_use]
    pub const fn current_deck(&self, strip: Strip) -> LogicalDeck {
        self.context.assignment.current_deck(strip)
    }

    #[must_use]
    pub const fn strip_state(&self, strip: Strip) -> &StripState {
        &self.context.strips[strip.index()]
    }

    #[must_use]
    pub const fn deck_state(&self, deck: LogicalDeck) -> &DeckState {
        &self.context.decks[deck.index()]
    }

    /// Bring the device and all subscriptions into their initial state.
    pub fn init(&mut self) {
        if self.context.running {
            log::warn!("{DEVICE_NAME} is already initialized");
            return;
        }
        log::info!("Initializing {DEVICE_NAME}");
        self.context.running = true;
        // Pad modes and shift are unknown until reported again
        self.context.strips = Default::default();
        for strip in Strip::iter() {
            self.context.paint_vinyl(strip);
        }
        self.context.send(
            crate::ControlAddress::new(layout::GLOBAL_NOTE_STATUS, layout::BROWSER_LED),
            layout::BROWSER_LED_ON,
        );
        for (_, binding) in self.registry.iter() {
            let Some(colors) = binding.echo else {
                continue;
            };
            for address in binding.output_addresses() {
                self.context.send(address, colors.off);
            }
        }
        self.context.paint_deck_selectors();
        self.context
            .send(layout::STATE_DUMP, layout::STATE_DUMP_REQUEST);
        for strip in Strip::iter() {
            self.connect_strip(strip);
        }
        self.context.start_tempo_timer();
    }

    /// Release all subscriptions and put the device to rest.
    ///
    /// Scheduled timers cannot be cancelled and are ignored when they
    /// expire afterwards. Pending slips are ended immediately.
    pub fn shutdown(&mut self) {
        if !self.context.running {
            log::debug!("{DEVICE_NAME} is not running");
            return;
        }
        log::info!("Shutting down {DEVICE_NAME}");
        self.context.disconnect_all();
        self.context.cancel_pending_timers();
        self.context.running = false;
        self.context.send(
            crate::ControlAddress::new(layout::GLOBAL_NOTE_STATUS, layout::BROWSER_LED),
            LED_OFF,
        );
        self.context
            .send(layout::STATE_DUMP, layout::STATE_DUMP_TERMINATE);
    }

    /// Dispatch an input event of the physical surface.
    pub fn handle_input(&mut self, event: InputEvent) {
        if !self.context.running {
            log::debug!("Ignoring {event:?} while not running");
            return;
        }
        let Some(id) = self.registry.find(event.address) else {
            log::debug!("Ignoring unmapped input {event:?}");
            return;
        };
        let binding = self.registry.get(id);
        let shift = self.context.is_shifted(binding.owner);
        let Some(action) = binding.handler.select(shift) else {
            log::debug!("Ignoring input {event:?} of output-only binding {id}");
            return;
        };
        if let Action::SelectDeck(deck) = action {
            let deck = *deck;
            if event.is_press() {
                self.select_deck(deck);
            }
            return;
        }
        self.context.perform(binding.owner, action, event);
        self.context.echo(binding, event);
    }

    /// Dispatch a change notification of the host engine.
    pub fn handle_connection(&mut self, connection: ConnectionHandle, value: f64) {
        if !self.context.running {
            log::debug!("Ignoring notification of {connection} while not running");
            return;
        }
        match self.context.subscriptions.get(&connection).copied() {
            None => {
                log::debug!("Ignoring notification of stale {connection}");
            }
            Some(Subscription::Feedback(id)) => {
                log::trace!("{connection} changed to {value}");
                self.context.render(self.registry.get(id));
            }
            Some(Subscription::BeatActive(deck)) => {
                log::trace!("Beat of {deck}: {value}");
                self.context.on_beat(deck);
            }
        }
    }

    /// Dispatch the expiration of a timer.
    pub fn handle_timer(&mut self, timer: TimerHandle) {
        if !self.context.running {
            log::debug!("Ignoring {timer} while not running");
            return;
        }
        let Some(purpose) = self.context.timers.get(&timer).copied() else {
            // Discarded during a previous shutdown
            log::debug!("Ignoring unknown {timer}");
            return;
        };
        match purpose {
            TimerPurpose::TempoPoll => self.context.update_tempo_leds(),
            TimerPurpose::SlipEnd(deck) => {
                self.context.timers.remove(&timer);
                self.context.end_slip(deck);
            }
            TimerPurpose::Reloop(deck) => {
                self.context.timers.remove(&timer);
                self.context.reloop(deck);
            }
        }
    }

    /// Assign a deck to its home strip.
    ///
    /// Equivalent to pressing the selector button of the deck.
    pub fn select_deck(&mut self, deck: LogicalDeck) {
        if !self.context.running {
            log::debug!("Ignoring selection of {deck} while not running");
            return;
        }
        let strip = deck.home_strip();
        let previous = match self.context.assignment.assign(strip, deck) {
            Ok(previous) => previous,
            Err(err) => {
                log::warn!("Failed to select {deck}: {err}");
                return;
            }
        };
        log::info!("Strip {strip} controls {deck}");
        if previous != deck
            && self.context.strips[strip.index()].pad_mode == Some(PadMode::Slicer)
        {
            self.context.decks[previous.index()].slicer.deactivate();
            self.context.decks[deck.index()].slicer.activate();
        }
        self.context.paint_deck_selectors();
        self.connect_strip(strip);
        self.context.paint_vinyl(strip);
    }

    /// Resubscribe all bindings of a strip to its current deck.
    fn connect_strip(&mut self, strip: Strip) {
        for (id, binding) in self.registry.iter_strip(strip) {
            self.context.connect_feedback(id, binding);
        }
        self.context.rebind_beat_connection(strip);
    }
}

impl<S> Controller<MemoryEngine, S>
where
    S: OutputSink,
{
    const MAX_PUMPED_NOTIFICATIONS: usize = 4096;

    /// Deliver all pending change notifications.
    ///
    /// Returns the number of delivered notifications.
    pub fn pump_notifications(&mut self) -> usize {
        let mut count = 0;
        while count < Self::MAX_PUMPED_NOTIFICATIONS {
            let Some((connection, value)) = self.context.engine.pop_notification() else {
                return count;
            };
            self.handle_connection(connection, value);
            count += 1;
        }
        log::warn!(
            "Stopped delivering notifications after {count} with {pending} pending",
            pending = self.context.engine.pending_notifications()
        );
        count
    }

    /// Move the clock forward and dispatch all expired timers.
    ///
    /// Change notifications are delivered after each timer.
    pub fn advance_time(&mut self, delta: Duration) {
        let until = self.context.engine.now() + delta;
        while let Some(timer) = self.context.engine.expire_next_timer(until) {
            self.handle_timer(timer);
            self.pump_notifications();
        }
        self.context.engine.advance_clock_to(until);
    }
}
