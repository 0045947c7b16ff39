//! Engine integration tests.
//!
//! Drive full sessions through `Engine::execute` and check turn flow,
//! action limits, the win condition and rejection atomicity.

use metro_deal::cards::{ActionEffect, Card, Color, RentTarget};
use metro_deal::core::{
    Action, ActionKind, GamePhase, GameRng, GameState, PlayerId, RulesConfig, TurnPhase,
};
use metro_deal::rules::{Engine, Rejection};

fn p(i: usize) -> PlayerId {
    PlayerId::seat(i)
}

fn engine_with(n: usize, setup: impl FnOnce(&mut GameState)) -> Engine {
    let names: Vec<String> = (0..n).map(|i| format!("P{i}")).collect();
    let mut state = GameState::new(&names, RulesConfig::default(), GameRng::new(21)).unwrap();
    state.phase = GamePhase::Playing;
    state.turn_phase = TurnPhase::Actions;
    setup(&mut state);
    Engine::from_state(state)
}

fn give(state: &mut GameState, i: usize, card: Card) {
    state.player_mut(&p(i)).unwrap().add_to_hand(card);
}

fn own(state: &mut GameState, i: usize, card: Card) {
    state.player_mut(&p(i)).unwrap().add_property(card).unwrap();
}

fn play_property(i: usize, id: &str) -> Action {
    Action::new(ActionKind::PlayProperty, p(i)).with(Action::CARD_ID, id)
}

// =============================================================================
// Turn flow
// =============================================================================

/// A dealt game starts in the draw phase; drawing then ending cycles seats.
#[test]
fn test_full_rotation() {
    let mut engine = Engine::with_seed(&["Ana", "Ben", "Cat"], 99).unwrap();
    for round in 0..2 {
        for seat in 0..3 {
            let current = p(seat);
            assert_eq!(engine.state().current_player_id(), &current, "round {round}");
            if engine.state().turn_phase == TurnPhase::Draw {
                assert!(engine.execute(&Action::new(ActionKind::DrawCards, current.clone())).success);
            }
            assert_eq!(engine.state().turn_phase, TurnPhase::Actions);
            assert!(engine.execute(&Action::new(ActionKind::EndTurn, current)).success);
        }
    }
    assert!(engine.state().players().iter().all(|pl| pl.hand().len() <= 9));
}

/// Card count is conserved across a stretch of play.
#[test]
fn test_cards_conserved_through_turns() {
    let mut engine = Engine::with_seed(&["Ana", "Ben"], 5).unwrap();
    engine.start_turn().unwrap();
    for _ in 0..20 {
        let current = engine.state().current_player_id().clone();
        let hand: Vec<_> = engine.state().current_player().hand().to_vec();
        for card in hand.iter().filter(|c| c.value > 0).take(3) {
            let kind = if card.is_property_like() {
                ActionKind::PlayProperty
            } else {
                ActionKind::PlayMoney
            };
            engine.execute(&Action::new(kind, current.clone()).with(Action::CARD_ID, card.id.as_str()));
        }
        if engine.is_finished() {
            break;
        }
        engine.end_turn().unwrap();
    }
    let mut ids = engine.state().all_card_ids();
    assert_eq!(ids.len(), 106);
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 106);
}

/// Only three plays per turn.
#[test]
fn test_action_cap_through_engine() {
    let mut engine = engine_with(2, |s| {
        for i in 0..4 {
            give(s, 0, Card::money(format!("money_1_{i}"), 1));
        }
    });
    for i in 0..3 {
        let play = Action::new(ActionKind::PlayMoney, p(0)).with(Action::CARD_ID, format!("money_1_{i}"));
        assert!(engine.execute(&play).success);
    }
    let fourth = Action::new(ActionKind::PlayMoney, p(0)).with(Action::CARD_ID, "money_1_3");
    assert_eq!(engine.try_execute(&fourth), Err(Rejection::ActionLimit));
    assert_eq!(
        engine.execute(&fourth).error.as_deref(),
        Some("maximum actions per turn exceeded")
    );
}

/// Flipping a wildcard is free.
#[test]
fn test_flip_does_not_count() {
    let mut engine = engine_with(2, |s| {
        own(s, 0, Card::wildcard("wild_times_square_1", "Times Square", 3, &[Color::Red, Color::Yellow]));
    });
    let flip = Action::new(ActionKind::FlipWildcard, p(0)).with(Action::CARD_ID, "wild_times_square_1");
    assert!(engine.execute(&flip).success);
    assert_eq!(engine.state().actions_played, 0);
    assert_eq!(engine.state().player(&p(0)).unwrap().property_count(Color::Yellow), 1);
}

/// Swipe In through the generic action play.
#[test]
fn test_swipe_in_via_play_action() {
    let mut engine = Engine::with_seed(&["Ana", "Ben"], 3).unwrap();
    engine.start_turn().unwrap();
    let mut state = engine.into_state();
    state
        .current_player_mut()
        .add_to_hand(Card::action("action_swipe_in_extra", 1, ActionEffect::SwipeIn));
    let mut engine = Engine::from_state(state);

    let before = engine.state().current_player().hand().len();
    let play = Action::new(ActionKind::PlayAction, p(0)).with(Action::CARD_ID, "action_swipe_in_extra");
    assert!(engine.execute(&play).success);
    assert_eq!(engine.state().current_player().hand().len(), before - 1 + 2);
}

// =============================================================================
// Win condition
// =============================================================================

/// The third completed set ends the game; nothing is legal afterwards.
#[test]
fn test_third_set_wins() {
    let mut engine = engine_with(2, |s| {
        own(s, 0, Card::property("prop_j", "J", 1, Color::Brown));
        own(s, 0, Card::property("prop_z", "Z", 1, Color::Brown));
        own(s, 0, Card::property("prop_wtc", "WTC", 4, Color::DarkBlue));
        own(s, 0, Card::property("prop_gc", "GC", 4, Color::DarkBlue));
        own(s, 0, Card::property("prop_water", "Water", 2, Color::Utility));
        give(s, 0, Card::property("prop_power", "Power", 2, Color::Utility));
        give(s, 0, Card::money("money_1_1", 1));
    });
    assert!(engine.winner().is_none());

    assert!(engine.execute(&play_property(0, "prop_power")).success);
    assert_eq!(engine.winner(), Some(&p(0)));
    assert_eq!(engine.state().phase, GamePhase::Finished);

    let late = Action::new(ActionKind::PlayMoney, p(0)).with(Action::CARD_ID, "money_1_1");
    assert_eq!(engine.try_execute(&late), Err(Rejection::GameNotActive));
    assert!(engine.end_turn().is_err());

    let view = serde_json::to_value(engine.public_view()).unwrap();
    assert_eq!(view["winner"], "player_0");
    assert_eq!(view["phase"], "finished");
}

/// A stolen set can win the game on accept.
#[test]
fn test_win_on_accept() {
    let mut engine = engine_with(2, |s| {
        own(s, 0, Card::property("prop_j", "J", 1, Color::Brown));
        own(s, 0, Card::property("prop_z", "Z", 1, Color::Brown));
        own(s, 0, Card::property("prop_wtc", "WTC", 4, Color::DarkBlue));
        own(s, 0, Card::property("prop_gc", "GC", 4, Color::DarkBlue));
        own(s, 1, Card::property("prop_water", "Water", 2, Color::Utility));
        own(s, 1, Card::property("prop_power", "Power", 2, Color::Utility));
        give(s, 0, Card::action("action_line_closure_1", 5, ActionEffect::LineClosure));
    });
    let play = Action::new(ActionKind::LineClosure, p(0))
        .with(Action::CARD_ID, "action_line_closure_1")
        .with(Action::TARGET_PLAYER_ID, "player_1")
        .with(Action::COLOR, "utility");
    assert!(engine.execute(&play).success);
    assert!(engine.winner().is_none());

    assert!(engine.execute(&Action::new(ActionKind::Accept, p(1))).success);
    assert_eq!(engine.winner(), Some(&p(0)));
}

// =============================================================================
// Atomicity
// =============================================================================

/// Every rejection leaves the serialized state byte-identical.
#[test]
fn test_rejections_do_not_mutate() {
    let mut engine = engine_with(3, |s| {
        give(s, 0, Card::wildcard("wild_fulton_1", "Fulton Center", 0, &Color::ALL));
        give(s, 0, Card::rent("rent_blue_brown_1", "Rent", 1, &[Color::Blue, Color::Brown], RentTarget::All));
        give(s, 1, Card::money("money_3_1", 3));
    });
    let before = engine.snapshot().unwrap();

    let attempts = [
        Action::new(ActionKind::PlayMoney, p(0)).with(Action::CARD_ID, "wild_fulton_1"),
        Action::new(ActionKind::PlayRent, p(0))
            .with(Action::CARD_ID, "rent_blue_brown_1")
            .with(Action::COLOR, "blue"),
        Action::new(ActionKind::PlayRent, p(0))
            .with(Action::CARD_ID, "rent_blue_brown_1")
            .with(Action::COLOR, "red"),
        Action::new(ActionKind::PlayMoney, p(1)).with(Action::CARD_ID, "money_3_1"),
        Action::new(ActionKind::Accept, p(1)),
        Action::new(ActionKind::DrawCards, p(0)),
        play_property(0, "missing"),
    ];
    for action in &attempts {
        let result = engine.execute(action);
        assert!(!result.success, "{action:?} should be rejected");
        assert!(result.error.is_some());
        assert_eq!(engine.snapshot().unwrap(), before, "{action:?} mutated state");
    }
}

/// Rent without owning the color names the color in the reason.
#[test]
fn test_rent_rejection_reason() {
    let mut engine = engine_with(2, |s| {
        give(s, 0, Card::rent("rent_darkblue_green_1", "Rent", 1, &[Color::DarkBlue, Color::Green], RentTarget::All));
    });
    let play = Action::new(ActionKind::PlayRent, p(0))
        .with(Action::CARD_ID, "rent_darkblue_green_1")
        .with(Action::COLOR, "darkblue");
    assert_eq!(
        engine.execute(&play).error.as_deref(),
        Some("you don't own any darkblue properties")
    );
}
