//! Players: hand, bank and property sets.
//!
//! ## PlayerId
//!
//! Seat-derived string identifier (`"player_0"`, `"player_1"`, ...). The
//! host maps connections to ids; the engine only compares them.
//!
//! ## Player
//!
//! Property sets are keyed by color in an `im::OrdMap`, so iteration is
//! always in canonical color order and clones are cheap.
//!
//! ## Payment
//!
//! [`Player::pay`] sorts the bank ascending by value and removes cards
//! until the running total reaches the amount. It may overpay (no change
//! is given) or underpay (the bank runs out).

use std::fmt;

use im::OrdMap;
use serde::{Deserialize, Serialize};

use super::error::RulesError;
use super::property_set::PropertySet;
use crate::cards::{Card, CardId, Color};

/// Player identifier.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id for the player in seat `index`.
    ///
    /// ```
    /// use metro_deal::core::PlayerId;
    ///
    /// assert_eq!(PlayerId::seat(2).as_str(), "player_2");
    /// ```
    #[must_use]
    pub fn seat(index: usize) -> Self {
        Self(format!("player_{index}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A participant in the session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    hand: Vec<Card>,
    bank: Vec<Card>,
    properties: OrdMap<Color, PropertySet>,
}

impl Player {
    #[must_use]
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            hand: Vec::new(),
            bank: Vec::new(),
            properties: OrdMap::new(),
        }
    }

    // === Hand ===

    #[must_use]
    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    pub fn add_to_hand(&mut self, card: Card) {
        self.hand.push(card);
    }

    /// Remove a card from the hand by id.
    pub fn remove_from_hand(&mut self, card_id: &CardId) -> Result<Card, RulesError> {
        let pos = self
            .hand
            .iter()
            .position(|c| &c.id == card_id)
            .ok_or_else(|| RulesError::NotFound(card_id.clone()))?;
        Ok(self.hand.remove(pos))
    }

    /// Look up a hand card without removing it.
    #[must_use]
    pub fn card_in_hand(&self, card_id: &CardId) -> Option<&Card> {
        self.hand.iter().find(|c| &c.id == card_id)
    }

    /// Remove and return the most recently added hand card.
    pub fn pop_hand(&mut self) -> Option<Card> {
        self.hand.pop()
    }

    // === Bank ===

    #[must_use]
    pub fn bank(&self) -> &[Card] {
        &self.bank
    }

    pub fn add_to_bank(&mut self, card: Card) {
        self.bank.push(card);
    }

    /// Sum of banked card values.
    #[must_use]
    pub fn bank_total(&self) -> u32 {
        self.bank.iter().map(|c| c.value).sum()
    }

    /// Pay `amount` out of the bank.
    ///
    /// Returns the removed cards and their total, which may be above
    /// `amount` (overpay) or below it (bank exhausted). Paying 0 is a no-op.
    pub fn pay(&mut self, amount: u32) -> (Vec<Card>, u32) {
        if amount == 0 {
            return (Vec::new(), 0);
        }

        let mut order: Vec<usize> = (0..self.bank.len()).collect();
        order.sort_by_key(|&i| self.bank[i].value);

        let mut chosen = Vec::new();
        let mut total = 0;
        for i in order {
            if total >= amount {
                break;
            }
            total += self.bank[i].value;
            chosen.push(i);
        }

        let mut slots: Vec<Option<Card>> = std::mem::take(&mut self.bank).into_iter().map(Some).collect();
        let paid = chosen.iter().filter_map(|&i| slots[i].take()).collect();
        self.bank = slots.into_iter().flatten().collect();
        (paid, total)
    }

    // === Properties ===

    /// All property sets in canonical color order.
    pub fn property_sets(&self) -> impl Iterator<Item = &PropertySet> {
        self.properties.values()
    }

    /// Existing set for `color`, if any.
    #[must_use]
    pub fn property_set(&self, color: Color) -> Option<&PropertySet> {
        self.properties.get(&color)
    }

    /// Set for `color`, created empty on first use.
    pub fn property_set_mut(&mut self, color: Color) -> &mut PropertySet {
        self.properties
            .entry(color)
            .or_insert_with(|| PropertySet::new(color))
    }

    /// Existing set for `color`, mutably. Never creates one.
    pub fn existing_set_mut(&mut self, color: Color) -> Option<&mut PropertySet> {
        self.properties.get_mut(&color)
    }

    /// Cards owned in `color`.
    #[must_use]
    pub fn property_count(&self, color: Color) -> usize {
        self.property_set(color).map_or(0, PropertySet::len)
    }

    /// File a property-like card under its current color.
    pub fn add_property(&mut self, card: Card) -> Result<Color, RulesError> {
        let color = card.property_color().ok_or_else(|| {
            RulesError::InvalidOperation(format!("{} is not a property", card.id))
        })?;
        self.property_set_mut(color).add_card(card);
        Ok(color)
    }

    /// Locate a card among the property sets.
    #[must_use]
    pub fn find_property(&self, card_id: &CardId) -> Option<(Color, &Card)> {
        self.properties
            .iter()
            .find_map(|(color, set)| set.get(card_id).map(|card| (*color, card)))
    }

    /// Number of complete sets.
    #[must_use]
    pub fn complete_set_count(&self) -> usize {
        self.properties.values().filter(|s| s.is_complete()).count()
    }

    /// Whether this player holds at least `threshold` complete sets.
    #[must_use]
    pub fn has_won(&self, threshold: usize) -> bool {
        self.complete_set_count() >= threshold
    }

    /// Every card this player holds, in any zone.
    pub fn all_cards(&self) -> impl Iterator<Item = &Card> {
        self.hand
            .iter()
            .chain(self.bank.iter())
            .chain(self.properties.values().flat_map(|s| s.cards().iter()))
    }
}
