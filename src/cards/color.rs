//! Property colors.
//!
//! The ten colors have a fixed canonical order (the order of the board).
//! `Color`'s `Ord` follows that order, so any ordered map keyed by color
//! iterates the same way in every session.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::RulesError;

/// A property color group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Brown,
    Blue,
    Pink,
    Orange,
    Red,
    Yellow,
    Green,
    DarkBlue,
    Railroad,
    Utility,
}

impl Color {
    /// All colors in canonical order.
    pub const ALL: [Color; 10] = [
        Color::Brown,
        Color::Blue,
        Color::Pink,
        Color::Orange,
        Color::Red,
        Color::Yellow,
        Color::Green,
        Color::DarkBlue,
        Color::Railroad,
        Color::Utility,
    ];

    /// Number of cards that complete a set of this color.
    #[must_use]
    pub const fn required_size(self) -> usize {
        match self {
            Color::Brown | Color::DarkBlue | Color::Utility => 2,
            Color::Railroad => 4,
            _ => 3,
        }
    }

    /// Rent by owned count; index 0 is the rent for one card.
    #[must_use]
    pub const fn rent_table(self) -> &'static [u32] {
        match self {
            Color::Brown => &[1, 2],
            Color::Blue => &[1, 2, 3],
            Color::Pink => &[1, 2, 4],
            Color::Orange => &[1, 3, 5],
            Color::Red => &[2, 3, 6],
            Color::Yellow => &[2, 4, 6],
            Color::Green => &[2, 4, 7],
            Color::DarkBlue => &[3, 8],
            Color::Railroad => &[1, 2, 3, 4],
            Color::Utility => &[1, 2],
        }
    }

    /// Whether improvements (express/station) may be built on this color.
    #[must_use]
    pub const fn allows_improvements(self) -> bool {
        !matches!(self, Color::Railroad | Color::Utility)
    }

    /// Wire name, as used in action data.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Color::Brown => "brown",
            Color::Blue => "blue",
            Color::Pink => "pink",
            Color::Orange => "orange",
            Color::Red => "red",
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::DarkBlue => "darkblue",
            Color::Railroad => "railroad",
            Color::Utility => "utility",
        }
    }

    /// Human-facing group name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Color::Brown => "Brown",
            Color::Blue => "Light Blue",
            Color::Pink => "Pink",
            Color::Orange => "Orange",
            Color::Red => "Red",
            Color::Yellow => "Yellow",
            Color::Green => "Green",
            Color::DarkBlue => "Dark Blue",
            Color::Railroad => "Railroad",
            Color::Utility => "Utility",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Color {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| RulesError::InvalidOperation(format!("unknown color: {s}")))
    }
}
