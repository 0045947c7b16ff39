//! Turn boundaries.
//!
//! Shared by the executor (`DRAW_CARDS`, `END_TURN`) and by the engine's
//! host-facing `start_turn` / `end_turn`.

use tracing::info;

use crate::core::{GameState, TurnPhase};

/// Begin the current player's turn: draw, then enter the action phase.
///
/// Draws `cards_per_turn`, or `empty_hand_draw` when the hand is empty.
/// Returns the number of cards actually drawn, which is short when both
/// piles run dry.
pub fn start_turn(state: &mut GameState) -> usize {
    state.turn_phase = TurnPhase::Draw;

    let count = if state.current_player().hand().is_empty() {
        state.config.empty_hand_draw
    } else {
        state.config.cards_per_turn
    };
    let drawn = state.draw_into(state.current_index(), count);

    state.turn_phase = TurnPhase::Actions;
    info!(player = %state.current_player_id(), drawn, deck = state.deck.len(), "turn started");
    drawn
}

/// Finish the current turn and start the next player's.
///
/// Callers have already ruled out an open pending action. Excess hand
/// cards are discarded from the end of the hand down to the hand limit,
/// with no player choice. Returns how many were discarded.
pub fn end_turn(state: &mut GameState) -> usize {
    state.turn_phase = TurnPhase::Discard;
    let limit = state.config.hand_limit;
    let mut discarded = 0;
    while state.current_player().hand().len() > limit {
        let Some(card) = state.current_player_mut().pop_hand() else { break };
        state.discard_card(card);
        discarded += 1;
    }

    let finished = state.current_player_id().clone();
    state.advance_player();
    info!(player = %finished, discarded, next = %state.current_player_id(), "turn ended");

    start_turn(state);
    discarded
}
