// SPDX-FileCopyrightText: The inpulse authors
// SPDX-License-Identifier: MPL-2.0

//! Host engine interface.
//!
//! The host owns all mixing state. Controls are addressed by a
//! `(group, key)` pair of names, e.g. `("[Channel1]", "play")`.
//!
//! All callbacks are delivered by the host by invoking the controller,
//! one at a time and each to completion:
//!
//! - physical input: [`Controller::handle_input`](crate::Controller::handle_input)
//! - value changes of subscribed controls:
//!   [`Controller::handle_connection`](crate::Controller::handle_connection)
//! - expired timers: [`Controller::handle_timer`](crate::Controller::handle_timer)

use std::time::Duration;

pub mod memory;
pub use self::memory::MemoryEngine;

/// Subscription to value changes of a single control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
#[display("connection#{_0}")]
#[repr(transparent)]
pub struct ConnectionHandle(u64);

impl ConnectionHandle {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// A scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
#[display("timer#{_0}")]
#[repr(transparent)]
pub struct TimerHandle(u64);

impl TimerHandle {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Timers cannot be cancelled.
///
/// One-shot timers expire exactly once. Periodic timers expire until
/// the host shuts down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerMode {
    OneShot,
    Periodic,
}

pub trait Engine {
    /// Read the current value of a control.
    ///
    /// Unknown controls read as 0.
    fn get_value(&self, group: &str, key: &str) -> f64;

    fn set_value(&mut self, group: &str, key: &str, value: f64);

    /// Write a normalized value in the interval [0, 1].
    ///
    /// The host maps the normalized value onto the actual range of
    /// the control, e.g. a non-linear gain curve.
    fn set_parameter(&mut self, group: &str, key: &str, value: f64) {
        self.set_value(group, key, value);
    }

    /// Subscribe to value changes of a control.
    fn make_connection(&mut self, group: &str, key: &str) -> ConnectionHandle;

    fn disconnect(&mut self, connection: ConnectionHandle);

    fn begin_timer(&mut self, delay: Duration, mode: TimerMode) -> TimerHandle;

    /// Slow down a deck until it stops.
    ///
    /// Higher factors stop faster.
    fn brake(&mut self, group: &str, factor: f64);

    /// Toggle a boolean control.
    fn toggle_value(&mut self, group: &str, key: &str) {
        let value = self.get_value(group, key);
        self.set_value(group, key, if value > 0.0 { 0.0 } else { 1.0 });
    }

    #[must_use]
    fn is_enabled(&self, group: &str, key: &str) -> bool {
        self.get_value(group, key) > 0.0
    }
}
