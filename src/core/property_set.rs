//! Per-color property holdings.
//!
//! A `PropertySet` belongs to one player and one color. It holds property
//! cards and wildcards currently showing that color, plus any improvements
//! built on it.

use serde::{Deserialize, Serialize};

use super::error::RulesError;
use crate::cards::{Card, CardId, Color};

/// A rent improvement on a complete set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Improvement {
    /// Express Service, +3 rent.
    Express,
    /// New Station, +4 rent. Requires express.
    Station,
}

impl Improvement {
    /// Flat rent bonus.
    #[must_use]
    pub const fn rent_bonus(self) -> u32 {
        match self {
            Improvement::Express => 3,
            Improvement::Station => 4,
        }
    }
}

/// One player's cards of one color.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySet {
    color: Color,
    cards: Vec<Card>,
    improvements: Vec<Improvement>,
}

impl PropertySet {
    /// Create an empty set.
    #[must_use]
    pub fn new(color: Color) -> Self {
        Self {
            color,
            cards: Vec::new(),
            improvements: Vec::new(),
        }
    }

    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Cards in the order they were added.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub fn improvements(&self) -> &[Improvement] {
        &self.improvements
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards needed for completion.
    #[must_use]
    pub fn required_size(&self) -> usize {
        self.color.required_size()
    }

    #[must_use]
    pub fn contains(&self, card_id: &CardId) -> bool {
        self.cards.iter().any(|c| &c.id == card_id)
    }

    #[must_use]
    pub fn get(&self, card_id: &CardId) -> Option<&Card> {
        self.cards.iter().find(|c| &c.id == card_id)
    }

    /// Append a card.
    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Remove a card by id.
    pub fn remove_card(&mut self, card_id: &CardId) -> Result<Card, RulesError> {
        let pos = self
            .cards
            .iter()
            .position(|c| &c.id == card_id)
            .ok_or_else(|| RulesError::NotFound(card_id.clone()))?;
        Ok(self.cards.remove(pos))
    }

    /// Empty the set, returning its cards and improvements.
    pub fn take_all(&mut self) -> (Vec<Card>, Vec<Improvement>) {
        (std::mem::take(&mut self.cards), std::mem::take(&mut self.improvements))
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.cards.len() >= self.required_size()
    }

    #[must_use]
    pub fn has_improvement(&self, improvement: Improvement) -> bool {
        self.improvements.contains(&improvement)
    }

    /// Whether `improvement` may be built here now.
    ///
    /// The set must be complete and not railroad/utility; express must be
    /// absent, station needs express and must itself be absent.
    #[must_use]
    pub fn can_add_improvement(&self, improvement: Improvement) -> bool {
        if !self.is_complete() || !self.color.allows_improvements() {
            return false;
        }
        match improvement {
            Improvement::Express => !self.has_improvement(Improvement::Express),
            Improvement::Station => {
                self.has_improvement(Improvement::Express) && !self.has_improvement(Improvement::Station)
            }
        }
    }

    /// Build an improvement.
    pub fn add_improvement(&mut self, improvement: Improvement) -> Result<(), RulesError> {
        if !self.can_add_improvement(improvement) {
            return Err(RulesError::InvalidOperation(format!(
                "cannot add {improvement:?} to {} set",
                self.color
            )));
        }
        self.improvements.push(improvement);
        Ok(())
    }

    /// Merge improvements taken from another set, skipping ones already here.
    pub fn absorb_improvements(&mut self, improvements: impl IntoIterator<Item = Improvement>) {
        for improvement in improvements {
            if !self.has_improvement(improvement) {
                self.improvements.push(improvement);
            }
        }
    }

    /// Current rent: base rent at the owned count plus improvement bonuses.
    ///
    /// Base rent comes from any property card in the set. A set made only of
    /// wildcards uses its color's own table.
    #[must_use]
    pub fn rent(&self) -> u32 {
        let count = self.cards.len();
        if count == 0 {
            return 0;
        }

        let base = self
            .cards
            .iter()
            .find_map(|c| c.rent_for(count))
            .unwrap_or_else(|| {
                let table = self.color.rent_table();
                table.get(count - 1).or_else(|| table.last()).copied().unwrap_or(0)
            });

        let bonus: u32 = self.improvements.iter().map(|i| i.rent_bonus()).sum();
        base + bonus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blue(n: usize) -> PropertySet {
        let mut set = PropertySet::new(Color::Blue);
        for i in 0..n {
            set.add_card(Card::property(format!("blue_{i}"), "A", 1, Color::Blue));
        }
        set
    }

    fn green_complete() -> PropertySet {
        let mut set = PropertySet::new(Color::Green);
        for i in 0..3 {
            set.add_card(Card::property(format!("green_{i}"), "Penn", 4, Color::Green));
        }
        set
    }

    #[test]
    fn test_completion() {
        assert!(!blue(0).is_complete());
        assert!(!blue(2).is_complete());
        assert!(blue(3).is_complete());
        assert!(blue(4).is_complete());
    }

    #[test]
    fn test_required_sizes() {
        assert_eq!(PropertySet::new(Color::Brown).required_size(), 2);
        assert_eq!(PropertySet::new(Color::Railroad).required_size(), 4);
        assert_eq!(PropertySet::new(Color::Utility).required_size(), 2);
        assert_eq!(PropertySet::new(Color::Yellow).required_size(), 3);
    }

    #[test]
    fn test_add_remove_card() {
        let mut set = blue(2);
        let removed = set.remove_card(&CardId::new("blue_0")).unwrap();
        assert_eq!(removed.id, CardId::new("blue_0"));
        assert_eq!(set.len(), 1);

        let missing = set.remove_card(&CardId::new("blue_0"));
        assert_eq!(missing, Err(RulesError::NotFound(CardId::new("blue_0"))));
    }

    #[test]
    fn test_improvement_gate() {
        let mut set = green_complete();
        assert!(!set.can_add_improvement(Improvement::Station));
        assert!(set.can_add_improvement(Improvement::Express));

        set.add_improvement(Improvement::Express).unwrap();
        assert!(!set.can_add_improvement(Improvement::Express));
        assert!(set.can_add_improvement(Improvement::Station));

        set.add_improvement(Improvement::Station).unwrap();
        assert!(!set.can_add_improvement(Improvement::Station));
        assert!(set.add_improvement(Improvement::Station).is_err());
    }

    #[test]
    fn test_improvement_needs_complete_set() {
        let mut set = blue(2);
        assert!(matches!(
            set.add_improvement(Improvement::Express),
            Err(RulesError::InvalidOperation(_))
        ));
        assert!(set.improvements().is_empty());
    }

    #[test]
    fn test_no_improvements_on_railroad_or_utility() {
        let mut rail = PropertySet::new(Color::Railroad);
        for i in 0..4 {
            rail.add_card(Card::property(format!("rr_{i}"), "LIRR", 2, Color::Railroad));
        }
        let mut utility = PropertySet::new(Color::Utility);
        for i in 0..2 {
            utility.add_card(Card::property(format!("ut_{i}"), "G", 2, Color::Utility));
        }
        assert!(rail.is_complete());
        assert!(utility.is_complete());
        assert!(!rail.can_add_improvement(Improvement::Express));
        assert!(!utility.can_add_improvement(Improvement::Express));
    }

    #[test]
    fn test_rent() {
        assert_eq!(blue(0).rent(), 0);
        assert_eq!(blue(1).rent(), 1);
        assert_eq!(blue(2).rent(), 2);
        assert_eq!(blue(3).rent(), 3);
        assert_eq!(blue(4).rent(), 3);
    }

    #[test]
    fn test_rent_with_improvements() {
        let mut set = green_complete();
        assert_eq!(set.rent(), 7);
        set.add_improvement(Improvement::Express).unwrap();
        assert_eq!(set.rent(), 10);
        set.add_improvement(Improvement::Station).unwrap();
        assert_eq!(set.rent(), 14);
    }

    #[test]
    fn test_rent_of_wildcard_only_set() {
        let mut set = PropertySet::new(Color::Red);
        set.add_card(Card::wildcard("wild_times_square_1", "Times Square", 3, &[Color::Red, Color::Yellow]));
        assert_eq!(set.rent(), 2);
    }

    #[test]
    fn test_take_all_and_absorb() {
        let mut from = green_complete();
        from.add_improvement(Improvement::Express).unwrap();
        let (cards, improvements) = from.take_all();
        assert!(from.is_empty());
        assert!(from.improvements().is_empty());

        let mut to = PropertySet::new(Color::Green);
        to.absorb_improvements([Improvement::Express]);
        for card in cards {
            to.add_card(card);
        }
        to.absorb_improvements(improvements);
        assert_eq!(to.improvements(), &[Improvement::Express]);
        assert_eq!(to.len(), 3);
    }
}
