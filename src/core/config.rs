//! Rules configuration.
//!
//! Every numeric constant of the game lives here. The defaults are the
//! standard rules; hosts may deserialize a `RulesConfig` (missing fields
//! fall back to defaults) or build one with the `with_*` methods.
//!
//! ```
//! use metro_deal::core::RulesConfig;
//!
//! let config = RulesConfig::default().with_hand_limit(9);
//! assert_eq!(config.max_actions_per_turn, 3);
//! assert_eq!(config.hand_limit, 9);
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use super::error::RulesError;
use crate::cards::catalog::CATALOG_SIZE;

/// Numeric rule constants for a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RulesConfig {
    /// Action-consuming plays allowed per turn.
    pub max_actions_per_turn: u32,
    /// Cards a player may keep at end of turn.
    pub hand_limit: usize,
    /// Cards dealt to each player at session start.
    pub initial_hand_size: usize,
    /// Cards drawn at the start of a turn.
    pub cards_per_turn: usize,
    /// Cards drawn at the start of a turn when the hand is empty.
    pub empty_hand_draw: usize,
    /// Complete sets needed to win.
    pub win_set_count: usize,
    pub min_players: usize,
    pub max_players: usize,
    /// Cards drawn by Swipe In.
    pub swipe_in_draw: usize,
    /// Amount demanded by Missed Your Train.
    pub debt_amount: u32,
    /// Amount each opponent pays for It's My Stop!.
    pub birthday_amount: u32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            max_actions_per_turn: 3,
            hand_limit: 7,
            initial_hand_size: 5,
            cards_per_turn: 2,
            empty_hand_draw: 5,
            win_set_count: 3,
            min_players: 2,
            max_players: 5,
            swipe_in_draw: 2,
            debt_amount: 5,
            birthday_amount: 2,
        }
    }
}

impl RulesConfig {
    /// Set the per-turn action cap.
    #[must_use]
    pub fn with_max_actions(mut self, max: u32) -> Self {
        self.max_actions_per_turn = max;
        self
    }

    /// Set the end-of-turn hand limit.
    #[must_use]
    pub fn with_hand_limit(mut self, limit: usize) -> Self {
        self.hand_limit = limit;
        self
    }

    /// Set the number of complete sets needed to win.
    #[must_use]
    pub fn with_win_set_count(mut self, count: usize) -> Self {
        self.win_set_count = count;
        self
    }

    /// Set the allowed player range.
    #[must_use]
    pub fn with_player_range(mut self, min: usize, max: usize) -> Self {
        self.min_players = min;
        self.max_players = max;
        self
    }

    /// Check the configuration is playable.
    pub fn validate(&self) -> Result<(), RulesError> {
        if self.max_actions_per_turn == 0 {
            return Err(RulesError::InvalidConfig("max_actions_per_turn must be positive".into()));
        }
        if self.win_set_count == 0 {
            return Err(RulesError::InvalidConfig("win_set_count must be positive".into()));
        }
        if self.min_players < 2 || self.min_players > self.max_players {
            return Err(RulesError::InvalidConfig(format!(
                "player range {}..={} is not playable",
                self.min_players, self.max_players
            )));
        }
        if self.max_players * self.initial_hand_size > CATALOG_SIZE {
            return Err(RulesError::InvalidConfig(format!(
                "dealing {} cards to {} players exhausts the deck",
                self.initial_hand_size, self.max_players
            )));
        }
        Ok(())
    }

    /// Check a player count against the configured range.
    pub fn check_player_count(&self, count: usize) -> Result<(), RulesError> {
        if (self.min_players..=self.max_players).contains(&count) {
            Ok(())
        } else {
            Err(RulesError::PlayerCount {
                count,
                min: self.min_players,
                max: self.max_players,
            })
        }
    }
}
