// SPDX-FileCopyrightText: The inpulse authors
// SPDX-License-Identifier: MPL-2.0

//! In-memory host engine with a virtual clock.

use std::{
    collections::{BTreeMap, HashMap, VecDeque},
    time::Duration,
};

use super::{ConnectionHandle, Engine, TimerHandle, TimerMode};

type ControlKey = (String, String);

fn control_key(group: &str, key: &str) -> ControlKey {
    (group.to_owned(), key.to_owned())
}

#[derive(Debug, Clone, Copy)]
struct ScheduledTimer {
    due: Duration,
    period: Duration,
    mode: TimerMode,
}

/// A control write as recorded by [`MemoryEngine`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValueWrite {
    pub group: String,
    pub key: String,
    pub value: f64,
}

/// Reference host engine for tests and demos.
///
/// Every write, including writes by the controller itself, queues a
/// change notification for each connection to the written control.
/// Notifications are delivered in order by draining the queue.
#[derive(Debug, Default)]
pub struct MemoryEngine {
    values: HashMap<ControlKey, f64>,
    connections: BTreeMap<ConnectionHandle, ControlKey>,
    next_connection_id: u64,
    notifications: VecDeque<(ConnectionHandle, f64)>,
    writes: Vec<ValueWrite>,
    now: Duration,
    timers: BTreeMap<TimerHandle, ScheduledTimer>,
    next_timer_id: u64,
}

impl MemoryEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Initialize a value without recording a write or notifying
    /// any connections.
    pub fn preset(&mut self, group: &str, key: &str, value: f64) {
        self.values.insert(control_key(group, key), value);
    }

    #[must_use]
    pub fn writes(&self) -> &[ValueWrite] {
        &self.writes
    }

    pub fn take_writes(&mut self) -> Vec<ValueWrite> {
        std::mem::take(&mut self.writes)
    }

    /// Recorded writes to a single control, oldest first.
    #[must_use]
    pub fn writes_to(&self, group: &str, key: &str) -> Vec<f64> {
        self.writes
            .iter()
            .filter(|write| write.group == group && write.key == key)
            .map(|write| write.value)
            .collect()
    }

    pub fn pop_notification(&mut self) -> Option<(ConnectionHandle, f64)> {
        self.notifications.pop_front()
    }

    #[must_use]
    pub fn pending_notifications(&self) -> usize {
        self.notifications.len()
    }

    /// Number of active connections to a control.
    #[must_use]
    pub fn connections_to(&self, group: &str, key: &str) -> usize {
        self.connections
            .values()
            .filter(|(g, k)| g == group && k == key)
            .count()
    }

    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of timers that will expire at least once more.
    #[must_use]
    pub fn scheduled_timers(&self) -> usize {
        self.timers.len()
    }

    #[must_use]
    pub fn scheduled_one_shot_timers(&self) -> usize {
        self.timers
            .values()
            .filter(|timer| timer.mode == TimerMode::OneShot)
            .count()
    }

    /// Expire the next timer that is due no later than `until`.
    ///
    /// The clock is moved forward to the expiration time. Timers that
    /// are due at the same time expire in the order of scheduling.
    pub fn expire_next_timer(&mut self, until: Duration) -> Option<TimerHandle> {
        let (handle, timer) = self
            .timers
            .iter()
            .filter(|(_, timer)| timer.due <= until)
            .min_by_key(|(handle, timer)| (timer.due, **handle))
            .map(|(handle, timer)| (*handle, *timer))?;
        debug_assert!(timer.due >= self.now);
        self.now = timer.due;
        match timer.mode {
            TimerMode::OneShot => {
                self.timers.remove(&handle);
            }
            TimerMode::Periodic => {
                if let Some(timer) = self.timers.get_mut(&handle) {
                    timer.due += timer.period;
                }
            }
        }
        Some(handle)
    }

    /// Move the clock forward to an absolute time without expiring
    /// any timers.
    pub fn advance_clock_to(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    /// Move the clock forward and collect all expired timers in order.
    pub fn advance(&mut self, delta: Duration) -> Vec<TimerHandle> {
        let until = self.now + delta;
        let mut expired = Vec::new();
        while let Some(handle) = self.expire_next_timer(until) {
            expired.push(handle);
        }
        self.advance_clock_to(until);
        expired
    }
}

impl Engine for MemoryEngine {
    fn get_value(&self, group: &str, key: &str) -> f64 {
        self.values
            .get(&control_key(group, key))
            .copied()
            .unwrap_or_default()
    }

    fn set_value(&mut self, group: &str, key: &str, value: f64) {
        let control = control_key(group, key);
        for (handle, connected) in &self.connections {
            if *connected == control {
                self.notifications.push_back((*handle, value));
            }
        }
        self.writes.push(ValueWrite {
            group: group.to_owned(),
            key: key.to_owned(),
            value,
        });
        self.values.insert(control, value);
    }

    fn make_connection(&mut self, group: &str, key: &str) -> ConnectionHandle {
        self.next_connection_id += 1;
        let handle = ConnectionHandle::new(self.next_connection_id);
        self.connections.insert(handle, control_key(group, key));
        handle
    }

    fn disconnect(&mut self, connection: ConnectionHandle) {
        if self.connections.remove(&connection).is_none() {
            log::debug!("Disconnecting unknown {connection}");
        }
        // Pending notifications must not be delivered after disconnecting
        self.notifications
            .retain(|(handle, _)| *handle != connection);
    }

    fn begin_timer(&mut self, delay: Duration, mode: TimerMode) -> TimerHandle {
        self.next_timer_id += 1;
        let handle = TimerHandle::new(self.next_timer_id);
        // Periodic timers with a zero period would never let the clock advance
        let period = delay.max(Duration::from_millis(1));
        self.timers.insert(
            handle,
            ScheduledTimer {
                due: self.now + delay,
                period,
                mode,
            },
        );
        handle
    }

    /// Recorded as a write of the pseudo control `brake`. The deck
    /// stops immediately.
    fn brake(&mut self, group: &str, factor: f64) {
        self.set_value(group, "brake", factor);
        self.set_value(group, "play", 0.0);
    }
}
