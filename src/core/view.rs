//! Client-facing projections of the game state.
//!
//! The public view is safe to broadcast: opponents' hands appear only as
//! counts. The private view adds the owner's hand. Both serialize to
//! camelCase JSON.

use serde::{Deserialize, Serialize};

use super::action::ActionKind;
use super::player::{Player, PlayerId};
use super::property_set::{Improvement, PropertySet};
use super::state::{GamePhase, GameState, PendingAction, TurnPhase};
use crate::cards::{Card, CardId, CardType, Color};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSummary {
    pub id: CardId,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySetView {
    pub color: Color,
    pub cards: Vec<CardSummary>,
    pub card_count: usize,
    pub set_size: usize,
    pub complete: bool,
    pub improvements: Vec<Improvement>,
    pub rent: u32,
}

impl From<&PropertySet> for PropertySetView {
    fn from(set: &PropertySet) -> Self {
        Self {
            color: set.color(),
            cards: set
                .cards()
                .iter()
                .map(|c| CardSummary {
                    id: c.id.clone(),
                    name: c.name.clone(),
                })
                .collect(),
            card_count: set.len(),
            set_size: set.required_size(),
            complete: set.is_complete(),
            improvements: set.improvements().to_vec(),
            rent: set.rent(),
        }
    }
}

/// What everyone may see about a player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    pub id: PlayerId,
    pub name: String,
    pub hand_count: usize,
    pub bank_value: u32,
    pub complete_sets: usize,
    /// Non-empty sets in canonical color order.
    pub properties: Vec<PropertySetView>,
}

impl From<&Player> for PlayerSummary {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id.clone(),
            name: player.name.clone(),
            hand_count: player.hand().len(),
            bank_value: player.bank_total(),
            complete_sets: player.complete_set_count(),
            properties: player
                .property_sets()
                .filter(|s| !s.is_empty())
                .map(PropertySetView::from)
                .collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingView {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    pub source_player_id: PlayerId,
    pub outstanding_targets: Vec<PlayerId>,
    pub amount: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    pub multiplier: u32,
}

impl From<&PendingAction> for PendingView {
    fn from(pending: &PendingAction) -> Self {
        Self {
            kind: pending.action.kind,
            source_player_id: pending.source.clone(),
            outstanding_targets: pending.outstanding().cloned().collect(),
            amount: pending.amount,
            color: pending.rent_color,
            multiplier: pending.rent_multiplier,
        }
    }
}

/// State safe to send to every client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicView {
    pub players: Vec<PlayerSummary>,
    pub current_player: PlayerId,
    pub phase: GamePhase,
    pub turn_phase: TurnPhase,
    pub actions_played_this_turn: u32,
    pub max_actions_per_turn: u32,
    pub deck_size: usize,
    pub discard_size: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<PlayerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_action: Option<PendingView>,
}

impl PublicView {
    #[must_use]
    pub fn from_state(state: &GameState) -> Self {
        Self {
            players: state.players().iter().map(PlayerSummary::from).collect(),
            current_player: state.current_player_id().clone(),
            phase: state.phase,
            turn_phase: state.turn_phase,
            actions_played_this_turn: state.actions_played,
            max_actions_per_turn: state.config.max_actions_per_turn,
            deck_size: state.deck.len(),
            discard_size: state.discard.len(),
            winner: state.winner.clone(),
            pending_action: state.pending.as_ref().map(PendingView::from),
        }
    }
}

/// A hand card as shown to its owner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandCard {
    pub id: CardId,
    #[serde(rename = "type")]
    pub card_type: CardType,
    pub name: String,
    pub value: u32,
}

impl From<&Card> for HandCard {
    fn from(card: &Card) -> Self {
        Self {
            id: card.id.clone(),
            card_type: card.card_type(),
            name: card.name.clone(),
            value: card.value,
        }
    }
}

/// The public view plus one player's hand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateView {
    #[serde(flatten)]
    pub public: PublicView,
    pub hand: Vec<HandCard>,
}

impl PrivateView {
    /// View for `player`, or `None` if no such player is seated.
    #[must_use]
    pub fn for_player(state: &GameState, player: &PlayerId) -> Option<Self> {
        let owner = state.player(player)?;
        Some(Self {
            public: PublicView::from_state(state),
            hand: owner.hand().iter().map(HandCard::from).collect(),
        })
    }
}
