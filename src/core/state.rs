//! Session state: players, piles, phases and the pending action.
//!
//! ## GameState
//!
//! One owned aggregate per session. The validator reads it, the executor
//! and turn helpers mutate it; nothing keeps a private copy.
//!
//! - Players in seat order with a turn cursor
//! - Deck (top = back of the vector) and discard pile
//! - Game phase and turn phase
//! - Per-turn action counter
//! - At most one [`PendingAction`]
//! - The session RNG
//!
//! Deck and discard are `im::Vector`s so snapshots and clones stay cheap.
//! The whole state round-trips through `bincode` via [`GameState::to_bytes`].

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, info};

use super::action::Action;
use super::config::RulesConfig;
use super::error::RulesError;
use super::player::{Player, PlayerId};
use super::rng::GameRng;
use crate::cards::{build_catalog, Card, CardId, Color};

/// Overall session phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    Setup,
    Playing,
    /// Terminal.
    Finished,
}

/// Sub-state within the current player's turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnPhase {
    Draw,
    Actions,
    /// Waiting on targets of the pending action.
    Response,
    /// Enforcing the hand limit at end of turn.
    Discard,
}

/// A contested action awaiting its targets' responses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAction {
    /// The originating action, resolved to its specific kind.
    pub action: Action,
    pub source: PlayerId,
    pub targets: SmallVec<[PlayerId; 4]>,
    pub responded: SmallVec<[PlayerId; 4]>,
    /// 2 when a Rush Hour was played with the rent card.
    pub rent_multiplier: u32,
    pub rent_color: Option<Color>,
    /// Amount each target owes, multiplier already applied.
    pub amount: u32,
}

impl PendingAction {
    /// A pending action against `targets` with nothing owed yet.
    #[must_use]
    pub fn new(action: Action, source: PlayerId, targets: impl IntoIterator<Item = PlayerId>) -> Self {
        Self {
            action,
            source,
            targets: targets.into_iter().collect(),
            responded: SmallVec::new(),
            rent_multiplier: 1,
            rent_color: None,
            amount: 0,
        }
    }

    #[must_use]
    pub fn with_amount(mut self, amount: u32) -> Self {
        self.amount = amount;
        self
    }

    #[must_use]
    pub fn with_rent(mut self, color: Color, base: u32, multiplier: u32) -> Self {
        self.rent_color = Some(color);
        self.rent_multiplier = multiplier;
        self.amount = base * multiplier;
        self
    }

    /// Targets that have not responded, in target order.
    pub fn outstanding(&self) -> impl Iterator<Item = &PlayerId> {
        self.targets.iter().filter(|t| !self.responded.contains(t))
    }

    /// Whether `player` still owes a response.
    #[must_use]
    pub fn is_outstanding(&self, player: &PlayerId) -> bool {
        self.targets.contains(player) && !self.responded.contains(player)
    }

    #[must_use]
    pub fn all_responded(&self) -> bool {
        self.outstanding().next().is_none()
    }

    #[must_use]
    pub fn is_single_target(&self) -> bool {
        self.targets.len() == 1
    }
}

/// Complete mutable state of one session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    players: Vec<Player>,
    current: usize,

    pub deck: Vector<Card>,
    pub discard: Vector<Card>,

    pub phase: GamePhase,
    pub turn_phase: TurnPhase,
    /// Action-consuming plays so far this turn.
    pub actions_played: u32,

    pub winner: Option<PlayerId>,
    pub pending: Option<PendingAction>,

    pub config: RulesConfig,
    pub rng: GameRng,
}

impl GameState {
    /// Create a state in setup with empty piles and hands.
    ///
    /// Players get seat ids `player_0..`. Fails if the configuration is
    /// unplayable or the name count is outside the configured player range.
    pub fn new<S: AsRef<str>>(names: &[S], config: RulesConfig, rng: GameRng) -> Result<Self, RulesError> {
        config.validate()?;
        config.check_player_count(names.len())?;

        let players = names
            .iter()
            .enumerate()
            .map(|(i, name)| Player::new(PlayerId::seat(i), name.as_ref()))
            .collect();

        Ok(Self {
            players,
            current: 0,
            deck: Vector::new(),
            discard: Vector::new(),
            phase: GamePhase::Setup,
            turn_phase: TurnPhase::Draw,
            actions_played: 0,
            winner: None,
            pending: None,
            config,
            rng,
        })
    }

    /// Load the catalog, shuffle it and deal opening hands.
    ///
    /// Leaves the first player current in the draw phase of a playing game.
    pub fn deal(&mut self) {
        self.deck = build_catalog().into_iter().collect();
        self.discard = Vector::new();
        self.shuffle_deck();

        for index in 0..self.players.len() {
            self.draw_into(index, self.config.initial_hand_size);
        }

        self.current = 0;
        self.phase = GamePhase::Playing;
        self.turn_phase = TurnPhase::Draw;
        self.actions_played = 0;
        info!(
            players = self.players.len(),
            deck = self.deck.len(),
            seed = self.rng.seed(),
            "dealt opening hands"
        );
    }

    // === Players ===

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    #[must_use]
    pub fn index_of(&self, id: &PlayerId) -> Option<usize> {
        self.players.iter().position(|p| &p.id == id)
    }

    #[must_use]
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    pub fn player_mut(&mut self, id: &PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| &p.id == id)
    }

    /// Player by id, or an error naming the id.
    pub fn require_player_mut(&mut self, id: &PlayerId) -> Result<&mut Player, RulesError> {
        self.player_mut(id)
            .ok_or_else(|| RulesError::InvalidOperation(format!("unknown player {id}")))
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_player(&self) -> &Player {
        &self.players[self.current]
    }

    pub fn current_player_mut(&mut self) -> &mut Player {
        &mut self.players[self.current]
    }

    #[must_use]
    pub fn current_player_id(&self) -> &PlayerId {
        &self.current_player().id
    }

    #[must_use]
    pub fn is_current(&self, id: &PlayerId) -> bool {
        self.current_player_id() == id
    }

    /// Every player except `id`, in seat order.
    #[must_use]
    pub fn opponents_of(&self, id: &PlayerId) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|p| &p.id != id)
            .map(|p| p.id.clone())
            .collect()
    }

    /// Move the cursor to the next seat, wrapping, and reset per-turn state.
    pub fn advance_player(&mut self) {
        self.current = (self.current + 1) % self.players.len();
        self.actions_played = 0;
        self.turn_phase = TurnPhase::Draw;
    }

    // === Deck ===

    /// Shuffle the deck with the session RNG.
    pub fn shuffle_deck(&mut self) {
        self.rng.shuffle_vector(&mut self.deck);
    }

    /// Draw the top card.
    ///
    /// An empty deck is refilled from the discard pile and reshuffled
    /// first. Returns `None` only when both piles are empty.
    pub fn draw_card(&mut self) -> Option<Card> {
        if self.deck.is_empty() && !self.discard.is_empty() {
            self.deck = std::mem::take(&mut self.discard);
            self.shuffle_deck();
            debug!(deck = self.deck.len(), "reshuffled discard pile into deck");
        }
        self.deck.pop_back()
    }

    /// Draw up to `count` cards into the hand of the player in seat `index`.
    ///
    /// Returns the number actually drawn.
    pub fn draw_into(&mut self, index: usize, count: usize) -> usize {
        let mut drawn = 0;
        while drawn < count {
            let Some(card) = self.draw_card() else { break };
            self.players[index].add_to_hand(card);
            drawn += 1;
        }
        drawn
    }

    pub fn discard_card(&mut self, card: Card) {
        self.discard.push_back(card);
    }

    // === Pending action ===

    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Targets that have not yet responded.
    #[must_use]
    pub fn outstanding_targets(&self) -> Vec<PlayerId> {
        self.pending
            .as_ref()
            .map(|p| p.outstanding().cloned().collect())
            .unwrap_or_default()
    }

    /// Install a pending action and enter the response phase.
    pub fn set_pending(&mut self, pending: PendingAction) {
        info!(
            kind = ?pending.action.kind,
            source = %pending.source,
            targets = pending.targets.len(),
            amount = pending.amount,
            "pending action created"
        );
        self.pending = Some(pending);
        self.turn_phase = TurnPhase::Response;
    }

    pub fn mark_responded(&mut self, id: &PlayerId) {
        if let Some(pending) = self.pending.as_mut() {
            if !pending.responded.contains(id) {
                pending.responded.push(id.clone());
            }
        }
    }

    #[must_use]
    pub fn all_responded(&self) -> bool {
        self.pending.as_ref().map_or(true, PendingAction::all_responded)
    }

    /// Drop the pending action and return to the action phase.
    pub fn clear_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            info!(kind = ?pending.action.kind, source = %pending.source, "pending action resolved");
        }
        self.turn_phase = TurnPhase::Actions;
    }

    // === Win condition ===

    /// Record the first player in seat order holding enough complete sets.
    ///
    /// Moves the game to finished the first time it succeeds; later calls
    /// return the recorded winner without re-checking.
    pub fn check_win(&mut self) -> Option<&PlayerId> {
        if self.phase == GamePhase::Playing {
            let threshold = self.config.win_set_count;
            if let Some(player) = self.players.iter().find(|p| p.has_won(threshold)) {
                info!(winner = %player.id, sets = player.complete_set_count(), "game finished");
                self.winner = Some(player.id.clone());
                self.phase = GamePhase::Finished;
            }
        }
        self.winner.as_ref()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == GamePhase::Finished
    }

    // === Bookkeeping ===

    /// Ids of every card in the session, wherever it sits.
    #[must_use]
    pub fn all_card_ids(&self) -> Vec<CardId> {
        self.deck
            .iter()
            .chain(self.discard.iter())
            .chain(self.players.iter().flat_map(Player::all_cards))
            .map(|c| c.id.clone())
            .collect()
    }

    /// Encode a snapshot.
    pub fn to_bytes(&self) -> Result<Vec<u8>, RulesError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode a snapshot produced by [`GameState::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RulesError> {
        Ok(bincode::deserialize(bytes)?)
    }
}
