// SPDX-FileCopyrightText: The inpulse authors
// SPDX-License-Identifier: MPL-2.0

//! Assignment of logical decks to physical strips.

use strum::EnumCount as _;
use thiserror::Error;

use crate::{ConnectionHandle, Engine, LogicalDeck, Strip};

#[cfg(test)]
mod tests;

/// Control that signals beat crossings of a deck.
pub const BEAT_ACTIVE_KEY: &str = "beat_active";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssignmentError {
    #[error("{deck} is owned by strip {owner}")]
    DeckOwnedByOtherStrip { deck: LogicalDeck, owner: Strip },
}

/// The current deck of each strip.
///
/// No two strips ever reference the same deck. Each strip has at most
/// one subscription to the beat crossings of its current deck.
#[derive(Debug)]
pub struct DeckAssignment {
    current: [LogicalDeck; Strip::COUNT],
    beat_connections: [Option<ConnectionHandle>; Strip::COUNT],
}

impl DeckAssignment {
    /// Strip A controls deck 1 and strip B controls deck 2.
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: [Strip::A.initial_deck(), Strip::B.initial_deck()],
            beat_connections: [None; Strip::COUNT],
        }
    }

    #[must_use]
    pub const fn current_deck(&self, strip: Strip) -> LogicalDeck {
        self.current[strip.index()]
    }

    /// The strip that currently controls a deck.
    #[must_use]
    pub fn owner_of(&self, deck: LogicalDeck) -> Option<Strip> {
        [Strip::A, Strip::B]
            .into_iter()
            .find(|strip| self.current_deck(*strip) == deck)
    }

    /// Assign a deck to a strip.
    ///
    /// Returns the previously assigned deck. Reassigning the current
    /// deck is permitted.
    pub fn assign(&mut self, strip: Strip, deck: LogicalDeck) -> Result<LogicalDeck, AssignmentError> {
        match self.owner_of(deck) {
            Some(owner) if owner != strip => {
                return Err(AssignmentError::DeckOwnedByOtherStrip { deck, owner });
            }
            _ => (),
        }
        let previous = std::mem::replace(&mut self.current[strip.index()], deck);
        Ok(previous)
    }

    #[must_use]
    pub const fn beat_connection(&self, strip: Strip) -> Option<ConnectionHandle> {
        self.beat_connections[strip.index()]
    }

    /// Subscribe to the beat crossings of the current deck.
    ///
    /// The previous subscription of the strip is disconnected first.
    /// Returns the disconnected and the new subscription.
    pub fn rebind_beat_connection<E: Engine>(
        &mut self,
        engine: &mut E,
        strip: Strip,
    ) -> (Option<ConnectionHandle>, ConnectionHandle) {
        let disconnected = self.disconnect_beat_connection(engine, strip);
        let deck = self.current_deck(strip);
        let connection = engine.make_connection(deck.group(), BEAT_ACTIVE_KEY);
        self.beat_connections[strip.index()] = Some(connection);
        (disconnected, connection)
    }

    pub fn disconnect_beat_connection<E: Engine>(
        &mut self,
        engine: &mut E,
        strip: Strip,
    ) -> Option<ConnectionHandle> {
        let connection = self.beat_connections[strip.index()].take()?;
        engine.disconnect(connection);
        Some(connection)
    }
}

impl Default for DeckAssignment {
    fn default() -> Self {
        Self::new()
    }
}
