//! Card definitions.
//!
//! Every card shares an identity, a display name and a money value (used
//! when banked). The variant-specific data lives in [`CardKind`], a closed
//! sum type: the set of card kinds is fixed and every consumer matches on
//! it exhaustively.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::color::Color;

/// Unique identifier for a card in the catalog (e.g. `"prop_a"`).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub String);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw ID value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CardId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Variant tag, as exposed to clients.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    Property,
    Wildcard,
    Action,
    Rent,
    Money,
}

/// Special behavior of an action card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionEffect {
    /// Draw two extra cards.
    SwipeIn,
    /// Cancel an action played against you.
    FareEvasion,
    /// Steal one property from an incomplete set.
    PowerBroker,
    /// Swap one of your properties for another player's.
    ServiceChange,
    /// Steal a complete set, improvements included.
    LineClosure,
    /// One player pays you the debt amount.
    MissedYourTrain,
    /// Every other player pays you the birthday amount.
    ItsMyStop,
    /// Doubles a rent card played alongside it.
    RushHour,
    /// First improvement on a complete set.
    ExpressService,
    /// Second improvement, requires express.
    NewStation,
}

impl ActionEffect {
    /// Printed card name.
    #[must_use]
    pub const fn card_name(self) -> &'static str {
        match self {
            ActionEffect::SwipeIn => "Swipe In",
            ActionEffect::FareEvasion => "Fare Evasion",
            ActionEffect::PowerBroker => "Power Broker",
            ActionEffect::ServiceChange => "Service Change",
            ActionEffect::LineClosure => "Line Closure",
            ActionEffect::MissedYourTrain => "Missed Your Train",
            ActionEffect::ItsMyStop => "It's My Stop!",
            ActionEffect::RushHour => "Rush Hour",
            ActionEffect::ExpressService => "Express Service",
            ActionEffect::NewStation => "New Station",
        }
    }

    /// Rules text.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            ActionEffect::SwipeIn => "Draw 2 extra cards",
            ActionEffect::FareEvasion => "Cancel any action card played against you",
            ActionEffect::PowerBroker => "Steal a property from any player (not from a complete set)",
            ActionEffect::ServiceChange => {
                "Swap one of your properties with another player's (not from complete sets)"
            }
            ActionEffect::LineClosure => {
                "Steal a complete property set from any player (includes improvements)"
            }
            ActionEffect::MissedYourTrain => "Force any player to pay you $5",
            ActionEffect::ItsMyStop => "All players pay you $2",
            ActionEffect::RushHour => "Play with a rent card to double the rent amount",
            ActionEffect::ExpressService => {
                "Add to a complete set to add $3 to rent (not on Railroads/Utilities)"
            }
            ActionEffect::NewStation => "Add to a complete set with Express Service to add $4 to rent",
        }
    }
}

/// Who a rent card charges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RentTarget {
    /// Every other player.
    All,
    /// One named opponent.
    One,
}

/// Variant-specific card data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardKind {
    Property {
        color: Color,
        /// Cards needed to complete the set.
        set_size: usize,
        /// Rent by owned count; index 0 is one card.
        rent: SmallVec<[u32; 4]>,
    },
    Wildcard {
        colors: SmallVec<[Color; 2]>,
        current_color: Color,
    },
    Action {
        effect: ActionEffect,
    },
    Rent {
        /// Empty for wild rent.
        colors: SmallVec<[Color; 2]>,
        target: RentTarget,
    },
    Money {
        denomination: u32,
    },
}

/// A single physical card.
///
/// ## Example
///
/// ```
/// use metro_deal::cards::{Card, CardType, Color};
///
/// let card = Card::property("prop_a", "A", 1, Color::Blue);
/// assert_eq!(card.card_type(), CardType::Property);
/// assert_eq!(card.rent_for(2), Some(2));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub name: String,
    /// Money value when banked or paid.
    pub value: u32,
    pub kind: CardKind,
}

impl Card {
    /// Create a property card using its color's rent table.
    #[must_use]
    pub fn property(id: impl Into<String>, name: impl Into<String>, value: u32, color: Color) -> Self {
        Self {
            id: CardId::new(id),
            name: name.into(),
            value,
            kind: CardKind::Property {
                color,
                set_size: color.required_size(),
                rent: SmallVec::from_slice(color.rent_table()),
            },
        }
    }

    /// Create a wildcard; it starts as the first listed color.
    #[must_use]
    pub fn wildcard(id: impl Into<String>, name: impl Into<String>, value: u32, colors: &[Color]) -> Self {
        Self {
            id: CardId::new(id),
            name: name.into(),
            value,
            kind: CardKind::Wildcard {
                colors: SmallVec::from_slice(colors),
                current_color: colors.first().copied().unwrap_or(Color::Blue),
            },
        }
    }

    /// Create an action card named after its effect.
    #[must_use]
    pub fn action(id: impl Into<String>, value: u32, effect: ActionEffect) -> Self {
        Self {
            id: CardId::new(id),
            name: effect.card_name().to_string(),
            value,
            kind: CardKind::Action { effect },
        }
    }

    /// Create a rent card. An empty color list makes it wild.
    #[must_use]
    pub fn rent(id: impl Into<String>, name: impl Into<String>, value: u32, colors: &[Color], target: RentTarget) -> Self {
        Self {
            id: CardId::new(id),
            name: name.into(),
            value,
            kind: CardKind::Rent {
                colors: SmallVec::from_slice(colors),
                target,
            },
        }
    }

    /// Create a money card.
    #[must_use]
    pub fn money(id: impl Into<String>, denomination: u32) -> Self {
        Self {
            id: CardId::new(id),
            name: format!("${denomination}"),
            value: denomination,
            kind: CardKind::Money { denomination },
        }
    }

    /// Variant tag.
    #[must_use]
    pub fn card_type(&self) -> CardType {
        match self.kind {
            CardKind::Property { .. } => CardType::Property,
            CardKind::Wildcard { .. } => CardType::Wildcard,
            CardKind::Action { .. } => CardType::Action,
            CardKind::Rent { .. } => CardType::Rent,
            CardKind::Money { .. } => CardType::Money,
        }
    }

    /// Color this card is filed under when played as a property.
    ///
    /// `None` for cards that cannot sit in a property set.
    #[must_use]
    pub fn property_color(&self) -> Option<Color> {
        match &self.kind {
            CardKind::Property { color, .. } => Some(*color),
            CardKind::Wildcard { current_color, .. } => Some(*current_color),
            _ => None,
        }
    }

    /// Whether this is a property or wildcard.
    #[must_use]
    pub fn is_property_like(&self) -> bool {
        self.property_color().is_some()
    }

    /// Action effect, if this is an action card.
    #[must_use]
    pub fn effect(&self) -> Option<ActionEffect> {
        match self.kind {
            CardKind::Action { effect } => Some(effect),
            _ => None,
        }
    }

    /// Rent for owning `count` cards of this property's color.
    ///
    /// Counts past the end of the table use the last entry. `None` for
    /// anything but a property card or a zero count.
    #[must_use]
    pub fn rent_for(&self, count: usize) -> Option<u32> {
        match &self.kind {
            CardKind::Property { rent, .. } if count > 0 => {
                rent.get(count - 1).or_else(|| rent.last()).copied()
            }
            _ => None,
        }
    }

    /// Whether a wildcard may represent `color`.
    #[must_use]
    pub fn can_be_color(&self, color: Color) -> bool {
        match &self.kind {
            CardKind::Wildcard { colors, .. } => colors.contains(&color),
            _ => false,
        }
    }

    /// Set a wildcard's current color. Returns false if it cannot be that color.
    pub fn set_wildcard_color(&mut self, color: Color) -> bool {
        match &mut self.kind {
            CardKind::Wildcard { colors, current_color } if colors.contains(&color) => {
                *current_color = color;
                true
            }
            _ => false,
        }
    }

    /// Advance a wildcard to its next color, wrapping.
    ///
    /// A wildcard whose current color is not in its list resets to the
    /// first listed color. Returns the new color.
    pub fn flip_color(&mut self) -> Option<Color> {
        match &mut self.kind {
            CardKind::Wildcard { colors, current_color } => {
                let next = match colors.iter().position(|c| *c == *current_color) {
                    Some(i) => colors[(i + 1) % colors.len()],
                    None => *colors.first()?,
                };
                *current_color = next;
                Some(next)
            }
            _ => None,
        }
    }

    /// Whether this rent card may charge any color.
    #[must_use]
    pub fn is_wild_rent(&self) -> bool {
        matches!(&self.kind, CardKind::Rent { colors, .. } if colors.is_empty())
    }
}
