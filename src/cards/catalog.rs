//! The fixed 106-card deck.
//!
//! `build_catalog` is a pure function: it always returns the same cards in
//! the same order with the same ids. Sessions shuffle a fresh copy.
//!
//! | Category | Count |
//! |----------|-------|
//! | Property | 28    |
//! | Wildcard | 11    |
//! | Action   | 34    |
//! | Rent     | 13    |
//! | Money    | 20    |

use super::color::Color;
use super::definition::{ActionEffect, Card, RentTarget};

/// Total number of cards in the deck.
pub const CATALOG_SIZE: usize = 106;

/// Build the full deck in catalog order.
#[must_use]
pub fn build_catalog() -> Vec<Card> {
    let mut cards = Vec::with_capacity(CATALOG_SIZE);
    cards.extend(property_cards());
    cards.extend(wildcard_cards());
    cards.extend(action_cards());
    cards.extend(rent_cards());
    cards.extend(money_cards());
    debug_assert_eq!(cards.len(), CATALOG_SIZE);
    cards
}

fn property_cards() -> Vec<Card> {
    // (id suffix, name, value, color)
    const PROPERTIES: [(&str, &str, u32, Color); 28] = [
        ("j", "J", 1, Color::Brown),
        ("z", "Z", 1, Color::Brown),
        ("a", "A", 1, Color::Blue),
        ("c", "C", 1, Color::Blue),
        ("e", "E", 1, Color::Blue),
        ("42nd_shuttle", "42nd St Shuttle", 2, Color::Pink),
        ("franklin_shuttle", "Franklin Ave Shuttle", 2, Color::Pink),
        ("rockaway_shuttle", "Rockaway Park Shuttle", 2, Color::Pink),
        ("b", "B", 2, Color::Orange),
        ("d", "D", 2, Color::Orange),
        ("f", "F", 2, Color::Orange),
        ("1", "1", 3, Color::Red),
        ("2", "2", 3, Color::Red),
        ("3", "3", 3, Color::Red),
        ("n", "N", 3, Color::Yellow),
        ("q", "Q", 3, Color::Yellow),
        ("r", "R", 3, Color::Yellow),
        ("penn", "Penn Station", 4, Color::Green),
        ("grand_central", "Grand Central", 4, Color::Green),
        ("atlantic", "Atlantic Terminal", 4, Color::Green),
        ("citi_field", "Citi Field", 4, Color::DarkBlue),
        ("yankee_stadium", "Yankee Stadium", 4, Color::DarkBlue),
        ("lirr", "LIRR", 2, Color::Railroad),
        ("metro_north", "Metro-North", 2, Color::Railroad),
        ("nj_transit", "NJ Transit", 2, Color::Railroad),
        ("path", "PATH", 2, Color::Railroad),
        ("g", "G", 2, Color::Utility),
        ("l", "L", 2, Color::Utility),
    ];

    PROPERTIES
        .iter()
        .map(|&(suffix, name, value, color)| Card::property(format!("prop_{suffix}"), name, value, color))
        .collect()
}

fn wildcard_cards() -> Vec<Card> {
    let mut cards = vec![
        Card::wildcard("wild_broadway", "Broadway Junction", 1, &[Color::Blue, Color::Brown]),
        Card::wildcard("wild_jamaica", "Jamaica Station", 4, &[Color::Blue, Color::Railroad]),
    ];
    for i in 1..=2 {
        cards.push(Card::wildcard(
            format!("wild_service_advisory_{i}"),
            "Service Advisory",
            2,
            &[Color::Pink, Color::Orange],
        ));
    }
    for i in 1..=2 {
        cards.push(Card::wildcard(
            format!("wild_times_square_{i}"),
            "Times Square",
            3,
            &[Color::Red, Color::Yellow],
        ));
    }
    cards.push(Card::wildcard("wild_big_game", "Big Game", 4, &[Color::DarkBlue, Color::Green]));
    cards.push(Card::wildcard("wild_grand_central", "Grand Central", 4, &[Color::Green, Color::Railroad]));
    cards.push(Card::wildcard("wild_weekend_service", "Weekend Service", 2, &[Color::Utility, Color::Railroad]));

    // Any color, no cash value. Starts as blue.
    for i in 1..=2 {
        let mut fulton = Card::wildcard(format!("wild_fulton_{i}"), "Fulton Center", 0, &Color::ALL);
        fulton.set_wildcard_color(Color::Blue);
        cards.push(fulton);
    }
    cards
}

fn action_cards() -> Vec<Card> {
    // (effect, id stem, copies, value)
    const ACTIONS: [(ActionEffect, &str, u32, u32); 10] = [
        (ActionEffect::SwipeIn, "swipe_in", 10, 1),
        (ActionEffect::FareEvasion, "fare_evasion", 3, 4),
        (ActionEffect::PowerBroker, "power_broker", 3, 3),
        (ActionEffect::ServiceChange, "service_change", 3, 3),
        (ActionEffect::LineClosure, "line_closure", 2, 5),
        (ActionEffect::MissedYourTrain, "missed_train", 3, 3),
        (ActionEffect::ItsMyStop, "its_my_stop", 3, 2),
        (ActionEffect::RushHour, "rush_hour", 2, 1),
        (ActionEffect::ExpressService, "express_service", 3, 3),
        (ActionEffect::NewStation, "new_station", 2, 4),
    ];

    ACTIONS
        .iter()
        .flat_map(|&(effect, stem, copies, value)| {
            (1..=copies).map(move |i| Card::action(format!("action_{stem}_{i}"), value, effect))
        })
        .collect()
}

fn rent_cards() -> Vec<Card> {
    const PAIRS: [(&str, Color, Color); 5] = [
        ("blue_brown", Color::Blue, Color::Brown),
        ("pink_orange", Color::Pink, Color::Orange),
        ("red_yellow", Color::Red, Color::Yellow),
        ("darkblue_green", Color::DarkBlue, Color::Green),
        ("railroad_utility", Color::Railroad, Color::Utility),
    ];

    let mut cards = Vec::with_capacity(13);
    for (stem, first, second) in PAIRS {
        for i in 1..=2 {
            cards.push(Card::rent(format!("rent_{stem}_{i}"), "Rent", 1, &[first, second], RentTarget::All));
        }
    }
    for i in 1..=3 {
        cards.push(Card::rent(format!("rent_wild_{i}"), "Wild Rent", 3, &[], RentTarget::One));
    }
    cards
}

fn money_cards() -> Vec<Card> {
    // (denomination, copies)
    const DENOMINATIONS: [(u32, u32); 6] = [(1, 6), (2, 5), (3, 3), (4, 3), (5, 2), (10, 1)];

    DENOMINATIONS
        .iter()
        .flat_map(|&(denomination, copies)| {
            (1..=copies).map(move |i| Card::money(format!("money_{denomination}_{i}"), denomination))
        })
        .collect()
}
