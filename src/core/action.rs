//! Inbound actions and outbound results.
//!
//! An action is a kind (the "verb"), the acting player and a flat
//! string-to-string data map carrying the "nouns": card ids, a target
//! player, a color. Typed getters parse the well-known keys.
//!
//! ```
//! use metro_deal::cards::Color;
//! use metro_deal::core::{Action, ActionKind, PlayerId};
//!
//! let action = Action::new(ActionKind::PlayRent, PlayerId::seat(0))
//!     .with(Action::CARD_ID, "rent_blue_brown_1")
//!     .with(Action::COLOR, "blue");
//!
//! assert_eq!(action.color(), Some(Color::Blue));
//! assert!(action.target_player().is_none());
//! ```

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::player::PlayerId;
use crate::cards::{ActionEffect, CardId, Color};

/// Every action a client may submit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    DrawCards,
    EndTurn,
    PlayProperty,
    PlayMoney,
    PlayRent,
    /// Play the named action card; dispatches on its effect.
    PlayAction,
    FlipWildcard,
    SwipeIn,
    PowerBroker,
    ServiceChange,
    LineClosure,
    MissedYourTrain,
    ItsMyStop,
    RushHour,
    ExpressService,
    NewStation,
    /// Accept (pay or yield to) the pending action.
    Accept,
    /// Cancel the pending action with a Fare Evasion card.
    PlayFareEvasion,
}

impl ActionKind {
    /// Whether this is a response to a pending action.
    #[must_use]
    pub const fn is_response(self) -> bool {
        matches!(self, ActionKind::Accept | ActionKind::PlayFareEvasion)
    }

    /// The specific kind for an action card effect.
    ///
    /// Fare Evasion has no standalone play and maps to `None`.
    #[must_use]
    pub const fn for_effect(effect: ActionEffect) -> Option<ActionKind> {
        match effect {
            ActionEffect::SwipeIn => Some(ActionKind::SwipeIn),
            ActionEffect::FareEvasion => None,
            ActionEffect::PowerBroker => Some(ActionKind::PowerBroker),
            ActionEffect::ServiceChange => Some(ActionKind::ServiceChange),
            ActionEffect::LineClosure => Some(ActionKind::LineClosure),
            ActionEffect::MissedYourTrain => Some(ActionKind::MissedYourTrain),
            ActionEffect::ItsMyStop => Some(ActionKind::ItsMyStop),
            ActionEffect::RushHour => Some(ActionKind::RushHour),
            ActionEffect::ExpressService => Some(ActionKind::ExpressService),
            ActionEffect::NewStation => Some(ActionKind::NewStation),
        }
    }

    /// The action card effect this kind plays, if any.
    #[must_use]
    pub const fn effect(self) -> Option<ActionEffect> {
        match self {
            ActionKind::SwipeIn => Some(ActionEffect::SwipeIn),
            ActionKind::PowerBroker => Some(ActionEffect::PowerBroker),
            ActionKind::ServiceChange => Some(ActionEffect::ServiceChange),
            ActionKind::LineClosure => Some(ActionEffect::LineClosure),
            ActionKind::MissedYourTrain => Some(ActionEffect::MissedYourTrain),
            ActionKind::ItsMyStop => Some(ActionEffect::ItsMyStop),
            ActionKind::RushHour => Some(ActionEffect::RushHour),
            ActionKind::ExpressService => Some(ActionEffect::ExpressService),
            ActionKind::NewStation => Some(ActionEffect::NewStation),
            ActionKind::PlayFareEvasion => Some(ActionEffect::FareEvasion),
            _ => None,
        }
    }
}

/// A player action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    pub player_id: PlayerId,
    #[serde(default)]
    pub data: FxHashMap<String, String>,
}

impl Action {
    pub const CARD_ID: &'static str = "cardId";
    pub const TARGET_PLAYER_ID: &'static str = "targetPlayerId";
    pub const COLOR: &'static str = "color";
    pub const TARGET_CARD_ID: &'static str = "targetCardId";
    pub const RUSH_HOUR_CARD_ID: &'static str = "rushHourCardId";
    pub const PLAYER_CARD_ID: &'static str = "playerCardId";
    pub const PLAYER_COLOR: &'static str = "playerColor";

    /// Create an action with no data.
    #[must_use]
    pub fn new(kind: ActionKind, player_id: PlayerId) -> Self {
        Self {
            kind,
            player_id,
            data: FxHashMap::default(),
        }
    }

    /// Add a data entry.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.data.insert(key.to_string(), value.into());
        self
    }

    /// Raw data value; empty strings count as absent.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }

    #[must_use]
    pub fn card_id(&self) -> Option<CardId> {
        self.get(Self::CARD_ID).map(CardId::from)
    }

    #[must_use]
    pub fn target_player(&self) -> Option<PlayerId> {
        self.get(Self::TARGET_PLAYER_ID).map(PlayerId::from)
    }

    /// Parsed `color`. Unknown color names read as `None`; see
    /// [`Action::unknown_color`].
    #[must_use]
    pub fn color(&self) -> Option<Color> {
        self.get(Self::COLOR).and_then(|c| c.parse().ok())
    }

    #[must_use]
    pub fn target_card_id(&self) -> Option<CardId> {
        self.get(Self::TARGET_CARD_ID).map(CardId::from)
    }

    #[must_use]
    pub fn rush_hour_card_id(&self) -> Option<CardId> {
        self.get(Self::RUSH_HOUR_CARD_ID).map(CardId::from)
    }

    #[must_use]
    pub fn player_card_id(&self) -> Option<CardId> {
        self.get(Self::PLAYER_CARD_ID).map(CardId::from)
    }

    #[must_use]
    pub fn player_color(&self) -> Option<Color> {
        self.get(Self::PLAYER_COLOR).and_then(|c| c.parse().ok())
    }

    /// The first color value present that names no color.
    #[must_use]
    pub fn unknown_color(&self) -> Option<&str> {
        [Self::COLOR, Self::PLAYER_COLOR]
            .into_iter()
            .filter_map(|key| self.get(key))
            .find(|raw| raw.parse::<Color>().is_err())
    }
}

/// One responder's payment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResult {
    pub from_player: PlayerId,
    /// Value actually handed over.
    pub amount: u32,
    /// How far short of the demand the payment fell.
    pub shortfall: u32,
}

/// Outcome of submitting an action.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResult {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub payments: Vec<PaymentResult>,
    /// True when the action created a pending action.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub pending_action: bool,
}

impl ActionResult {
    /// A successful result.
    #[must_use]
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            ..Self::default()
        }
    }

    /// A failed result carrying `error`.
    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// Mark that a pending action now awaits responses.
    #[must_use]
    pub fn pending(mut self) -> Self {
        self.pending_action = true;
        self
    }

    #[must_use]
    pub fn with_payment(mut self, payment: PaymentResult) -> Self {
        self.payments.push(payment);
        self
    }
}
