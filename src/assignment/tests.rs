// SPDX-FileCopyrightText: The inpulse authors
// SPDX-License-Identifier: MPL-2.0

use strum::IntoEnumIterator as _;

use super::*;
use crate::engine::MemoryEngine;

#[test]
fn initial_assignment() {
    let assignment = DeckAssignment::new();
    assert_eq!(LogicalDeck::One, assignment.current_deck(Strip::A));
    assert_eq!(LogicalDeck::Two, assignment.current_deck(Strip::B));
    assert_eq!(Some(Strip::A), assignment.owner_of(LogicalDeck::One));
    assert_eq!(None, assignment.owner_of(LogicalDeck::Three));
}

#[test]
fn assign_home_decks() {
    let mut assignment = DeckAssignment::new();
    for deck in LogicalDeck::iter() {
        let strip = deck.home_strip();
        assignment.assign(strip, deck).unwrap();
        assert_eq!(deck, assignment.current_deck(strip));
        assert_ne!(deck, assignment.current_deck(strip.other()));
    }
}

#[test]
fn reject_deck_of_other_strip() {
    let mut assignment = DeckAssignment::new();
    assert_eq!(
        Err(AssignmentError::DeckOwnedByOtherStrip {
            deck: LogicalDeck::Two,
            owner: Strip::B,
        }),
        assignment.assign(Strip::A, LogicalDeck::Two)
    );
    assert_eq!(LogicalDeck::One, assignment.current_deck(Strip::A));
}

#[test]
fn reassign_current_deck() {
    let mut assignment = DeckAssignment::new();
    assert_eq!(Ok(LogicalDeck::One), assignment.assign(Strip::A, LogicalDeck::One));
}

#[test]
fn at_most_one_beat_connection_per_strip() {
    let mut engine = MemoryEngine::new();
    let mut assignment = DeckAssignment::new();
    let (disconnected, first) = assignment.rebind_beat_connection(&mut engine, Strip::A);
    assert_eq!(None, disconnected);
    assert_eq!(1, engine.connections_to("[Channel1]", BEAT_ACTIVE_KEY));

    assignment.assign(Strip::A, LogicalDeck::Three).unwrap();
    let (disconnected, second) = assignment.rebind_beat_connection(&mut engine, Strip::A);
    assert_eq!(Some(first), disconnected);
    assert_eq!(Some(second), assignment.beat_connection(Strip::A));
    assert_eq!(0, engine.connections_to("[Channel1]", BEAT_ACTIVE_KEY));
    assert_eq!(1, engine.connections_to("[Channel3]", BEAT_ACTIVE_KEY));
    assert_eq!(1, engine.connection_count());

    assert_eq!(
        Some(second),
        assignment.disconnect_beat_connection(&mut engine, Strip::A)
    );
    assert_eq!(0, engine.connection_count());
    assert_eq!(None, assignment.beat_connection(Strip::A));
}
