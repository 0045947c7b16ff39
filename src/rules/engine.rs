//! Session orchestration.
//!
//! [`Engine`] owns the [`GameState`] and is the single entry point a host
//! talks to. Every action runs validate, then execute, then the win check.
//! No legality logic lives here.

use tracing::debug;

use super::executor::Executor;
use super::turn;
use super::validator::{Rejection, Validator};
use crate::core::{
    Action, ActionKind, ActionResult, GameRng, GameState, PlayerId, PrivateView, PublicView, RulesConfig, RulesError,
};

/// One game session.
#[derive(Clone, Debug)]
pub struct Engine {
    state: GameState,
}

impl Engine {
    /// Seat `names` in order, shuffle and deal.
    ///
    /// The first player is current and in the draw phase.
    pub fn new<S: AsRef<str>>(names: &[S], config: RulesConfig, rng: GameRng) -> Result<Self, RulesError> {
        let mut state = GameState::new(names, config, rng)?;
        state.deal();
        Ok(Self { state })
    }

    /// Default rules with a seeded shuffle.
    pub fn with_seed<S: AsRef<str>>(names: &[S], seed: u64) -> Result<Self, RulesError> {
        Self::new(names, RulesConfig::default(), GameRng::new(seed))
    }

    /// Resume from an existing state.
    #[must_use]
    pub fn from_state(state: GameState) -> Self {
        Self { state }
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn into_state(self) -> GameState {
        self.state
    }

    #[must_use]
    pub fn winner(&self) -> Option<&PlayerId> {
        self.state.winner.as_ref()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// Validate and apply `action`, surfacing the rejection as an error.
    pub fn try_execute(&mut self, action: &Action) -> Result<ActionResult, Rejection> {
        if let Err(rejection) = Validator::validate(&self.state, action) {
            debug!(kind = ?action.kind, player = %action.player_id, reason = %rejection, "action rejected");
            return Err(rejection);
        }

        let result = Executor::execute(&mut self.state, action);
        if result.success {
            self.state.check_win();
        }
        Ok(result)
    }

    /// Validate and apply `action`. A rejection becomes a failed result
    /// carrying the reason.
    pub fn execute(&mut self, action: &Action) -> ActionResult {
        self.try_execute(action)
            .unwrap_or_else(|rejection| ActionResult::failed(rejection.to_string()))
    }

    /// Start-of-turn draw for the current player. Returns cards drawn.
    ///
    /// Legal exactly when `DRAW_CARDS` would be for the current player.
    pub fn start_turn(&mut self) -> Result<usize, Rejection> {
        self.validate_for_current(ActionKind::DrawCards)?;
        Ok(turn::start_turn(&mut self.state))
    }

    /// Close the current turn and start the next. Returns cards discarded.
    ///
    /// Legal exactly when `END_TURN` would be for the current player, so
    /// never while a pending action awaits responses.
    pub fn end_turn(&mut self) -> Result<usize, Rejection> {
        self.validate_for_current(ActionKind::EndTurn)?;
        Ok(turn::end_turn(&mut self.state))
    }

    #[must_use]
    pub fn public_view(&self) -> PublicView {
        PublicView::from_state(&self.state)
    }

    /// View for one seated player, hand included.
    #[must_use]
    pub fn player_view(&self, player: &PlayerId) -> Option<PrivateView> {
        PrivateView::for_player(&self.state, player)
    }

    /// Checkpoint the whole session.
    pub fn snapshot(&self) -> Result<Vec<u8>, RulesError> {
        self.state.to_bytes()
    }

    /// Replace the session with a checkpoint.
    pub fn restore(&mut self, bytes: &[u8]) -> Result<(), RulesError> {
        self.state = GameState::from_bytes(bytes)?;
        Ok(())
    }

    fn validate_for_current(&self, kind: ActionKind) -> Result<(), Rejection> {
        let action = Action::new(kind, self.state.current_player_id().clone());
        Validator::validate(&self.state, &action).map_err(|rejection| {
            debug!(kind = ?kind, reason = %rejection, "turn call rejected");
            rejection
        })
    }
}
