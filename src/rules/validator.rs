//! Legality checks.
//!
//! [`Validator::validate`] is a pure function of the state and the action:
//! it never mutates, and every rejection carries a readable reason.
//!
//! ## Gates, in order
//!
//! 1. The game must be playing.
//! 2. Responses (`ACCEPT`, `PLAY_FARE_EVASION`) need a pending action on
//!    which the actor is still an outstanding target.
//! 3. Nothing else is legal while a response is awaited.
//! 4. Turn ownership, turn phase and the per-turn action cap.
//! 5. Card presence and type, then per-effect checks.

use thiserror::Error;

use crate::cards::{ActionEffect, Card, CardId, CardKind, Color, RentTarget};
use crate::core::{Action, ActionKind, GamePhase, GameState, Improvement, Player, PlayerId, TurnPhase};

/// Why an action was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("game is not in progress")]
    GameNotActive,

    #[error("not your turn")]
    NotYourTurn,

    #[error("waiting for response to pending action")]
    AwaitingResponse,

    #[error("no pending action to respond to")]
    NoPendingAction,

    #[error("you are not a target of this action")]
    NotATarget,

    #[error("{0}")]
    WrongPhase(&'static str),

    #[error("maximum actions per turn exceeded")]
    ActionLimit,

    #[error("missing {0}")]
    MissingData(&'static str),

    #[error("unknown color {0:?}")]
    UnknownColor(String),

    #[error("card {0} not in hand")]
    NotInHand(CardId),

    #[error("card {card} is not {expected}")]
    WrongCardType { card: CardId, expected: &'static str },

    #[error("card {0} has no money value")]
    NoMoneyValue(CardId),

    #[error("wildcard {card} cannot be {color}")]
    WildcardColor { card: CardId, color: Color },

    #[error("rent card {card} cannot charge {color}")]
    RentColor { card: CardId, color: Color },

    #[error("you don't own any {0} properties")]
    NoProperties(Color),

    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),

    #[error("cannot target yourself")]
    SelfTarget,

    #[error("card {card} is not in the {color} set")]
    NotInSet { card: CardId, color: Color },

    #[error("cannot take from a complete {0} set")]
    CompleteSet(Color),

    #[error("{0} set is not complete")]
    IncompleteSet(Color),

    #[error("cannot add {improvement:?} to {color} set")]
    CannotImprove { improvement: Improvement, color: Color },

    #[error("card {0} is not a wildcard")]
    NotAWildcard(CardId),

    #[error("card {0} is not among your properties")]
    NotInProperties(CardId),

    #[error("cannot flip wildcard in complete set")]
    WildcardInCompleteSet,

    #[error("Rush Hour can only be played with a rent card")]
    RushHourAlone,

    #[error("Fare Evasion can only be played in response to an action")]
    FareEvasionResponseOnly,
}

/// Stateless legality checker.
pub struct Validator;

impl Validator {
    /// Check `action` against `state`.
    pub fn validate(state: &GameState, action: &Action) -> Result<(), Rejection> {
        if state.phase != GamePhase::Playing {
            return Err(Rejection::GameNotActive);
        }

        if let Some(raw) = action.unknown_color() {
            return Err(Rejection::UnknownColor(raw.to_string()));
        }

        if action.kind.is_response() {
            return Self::validate_response(state, action);
        }

        if state.turn_phase == TurnPhase::Response {
            return Err(Rejection::AwaitingResponse);
        }

        match action.kind {
            ActionKind::DrawCards => Self::validate_draw(state, action),
            ActionKind::EndTurn => Self::require_current(state, action),
            ActionKind::PlayProperty => Self::validate_play_property(state, action),
            ActionKind::PlayMoney => Self::validate_play_money(state, action),
            ActionKind::PlayRent => Self::validate_play_rent(state, action),
            ActionKind::FlipWildcard => Self::validate_flip_wildcard(state, action),
            ActionKind::PlayAction => {
                Self::require_action_phase(state, action, "can only play actions during action phase")?;
                let kind = Self::resolve_kind(state, action)?;
                Self::validate_effect(state, action, kind)
            }
            kind => {
                Self::require_action_phase(state, action, "can only play actions during action phase")?;
                Self::validate_effect(state, action, kind)
            }
        }
    }

    /// The specific kind a `PLAY_ACTION` stands for, read off the named card.
    ///
    /// Any other kind is returned unchanged.
    pub fn resolve_kind(state: &GameState, action: &Action) -> Result<ActionKind, Rejection> {
        if action.kind != ActionKind::PlayAction {
            return Ok(action.kind);
        }
        let card = Self::hand_card(state, action, Action::CARD_ID)?;
        let effect = card.effect().ok_or_else(|| Rejection::WrongCardType {
            card: card.id.clone(),
            expected: "an action card",
        })?;
        ActionKind::for_effect(effect).ok_or(Rejection::FareEvasionResponseOnly)
    }

    // === Shared gates ===

    fn actor<'a>(state: &'a GameState, action: &Action) -> Result<&'a Player, Rejection> {
        state
            .player(&action.player_id)
            .ok_or_else(|| Rejection::UnknownPlayer(action.player_id.clone()))
    }

    fn require_current(state: &GameState, action: &Action) -> Result<(), Rejection> {
        if state.is_current(&action.player_id) {
            Ok(())
        } else {
            Err(Rejection::NotYourTurn)
        }
    }

    fn require_action_phase(state: &GameState, action: &Action, reason: &'static str) -> Result<(), Rejection> {
        if state.turn_phase != TurnPhase::Actions {
            return Err(Rejection::WrongPhase(reason));
        }
        Self::require_current(state, action)
    }

    fn require_action_available(state: &GameState) -> Result<(), Rejection> {
        if state.actions_played >= state.config.max_actions_per_turn {
            Err(Rejection::ActionLimit)
        } else {
            Ok(())
        }
    }

    fn require_key<T>(value: Option<T>, key: &'static str) -> Result<T, Rejection> {
        value.ok_or(Rejection::MissingData(key))
    }

    /// The actor's hand card named by `key`.
    fn hand_card<'a>(state: &'a GameState, action: &Action, key: &'static str) -> Result<&'a Card, Rejection> {
        let id = Self::require_key(action.get(key).map(CardId::from), key)?;
        Self::actor(state, action)?
            .card_in_hand(&id)
            .ok_or(Rejection::NotInHand(id))
    }

    /// The named target: must be seated and not the actor.
    fn target<'a>(state: &'a GameState, action: &Action) -> Result<&'a Player, Rejection> {
        let id = Self::require_key(action.target_player(), Action::TARGET_PLAYER_ID)?;
        if id == action.player_id {
            return Err(Rejection::SelfTarget);
        }
        state.player(&id).ok_or(Rejection::UnknownPlayer(id))
    }

    /// Require `card` to sit in `owner`'s `color` set.
    fn require_in_set(owner: &Player, color: Color, card: &CardId) -> Result<(), Rejection> {
        match owner.property_set(color) {
            Some(set) if set.contains(card) => Ok(()),
            _ => Err(Rejection::NotInSet {
                card: card.clone(),
                color,
            }),
        }
    }

    fn is_complete(owner: &Player, color: Color) -> bool {
        owner.property_set(color).is_some_and(|s| s.is_complete())
    }

    // === Per-kind checks ===

    fn validate_draw(state: &GameState, action: &Action) -> Result<(), Rejection> {
        if state.turn_phase != TurnPhase::Draw {
            return Err(Rejection::WrongPhase("can only draw cards at start of turn"));
        }
        Self::require_current(state, action)
    }

    fn validate_play_property(state: &GameState, action: &Action) -> Result<(), Rejection> {
        Self::require_action_phase(state, action, "can only play cards during action phase")?;
        let card = Self::hand_card(state, action, Action::CARD_ID)?;

        match &card.kind {
            CardKind::Property { .. } => {}
            CardKind::Wildcard { .. } => {
                if let Some(color) = action.color() {
                    if !card.can_be_color(color) {
                        return Err(Rejection::WildcardColor {
                            card: card.id.clone(),
                            color,
                        });
                    }
                }
            }
            _ => {
                return Err(Rejection::WrongCardType {
                    card: card.id.clone(),
                    expected: "a property",
                })
            }
        }
        Self::require_action_available(state)
    }

    fn validate_play_money(state: &GameState, action: &Action) -> Result<(), Rejection> {
        Self::require_action_phase(state, action, "can only play cards during action phase")?;
        let card = Self::hand_card(state, action, Action::CARD_ID)?;
        if card.value == 0 {
            return Err(Rejection::NoMoneyValue(card.id.clone()));
        }
        Self::require_action_available(state)
    }

    fn validate_play_rent(state: &GameState, action: &Action) -> Result<(), Rejection> {
        Self::require_action_phase(state, action, "can only play rent during action phase")?;
        let card = Self::hand_card(state, action, Action::CARD_ID)?;
        let CardKind::Rent { colors, target } = &card.kind else {
            return Err(Rejection::WrongCardType {
                card: card.id.clone(),
                expected: "a rent card",
            });
        };

        let color = Self::require_key(action.color(), Action::COLOR)?;
        let wild = colors.is_empty();
        if !wild && !colors.contains(&color) {
            return Err(Rejection::RentColor {
                card: card.id.clone(),
                color,
            });
        }

        let actor = Self::actor(state, action)?;
        if !wild && actor.property_count(color) == 0 {
            return Err(Rejection::NoProperties(color));
        }

        if *target == RentTarget::One {
            Self::target(state, action)?;
        }

        if let Some(rush_id) = action.rush_hour_card_id() {
            if rush_id == card.id {
                return Err(Rejection::WrongCardType {
                    card: rush_id,
                    expected: "a Rush Hour card",
                });
            }
            let rush = actor.card_in_hand(&rush_id).ok_or_else(|| Rejection::NotInHand(rush_id.clone()))?;
            if rush.effect() != Some(ActionEffect::RushHour) {
                return Err(Rejection::WrongCardType {
                    card: rush_id,
                    expected: "a Rush Hour card",
                });
            }
        }

        Self::require_action_available(state)
    }

    fn validate_flip_wildcard(state: &GameState, action: &Action) -> Result<(), Rejection> {
        Self::require_action_phase(state, action, "can only flip wildcards during action phase")?;
        let id = Self::require_key(action.card_id(), Action::CARD_ID)?;
        let actor = Self::actor(state, action)?;

        let (color, card) = actor
            .find_property(&id)
            .ok_or_else(|| Rejection::NotInProperties(id.clone()))?;
        if !matches!(card.kind, CardKind::Wildcard { .. }) {
            return Err(Rejection::NotAWildcard(id));
        }
        if Self::is_complete(actor, color) {
            return Err(Rejection::WildcardInCompleteSet);
        }
        Ok(())
    }

    /// Checks for playing an action card as `kind`.
    fn validate_effect(state: &GameState, action: &Action, kind: ActionKind) -> Result<(), Rejection> {
        Self::require_action_available(state)?;

        let Some(effect) = kind.effect() else {
            return Err(Rejection::WrongCardType {
                card: action.card_id().unwrap_or_else(|| CardId::new("")),
                expected: "an action card",
            });
        };
        let card = Self::hand_card(state, action, Action::CARD_ID)?;
        if card.effect() != Some(effect) {
            return Err(Rejection::WrongCardType {
                card: card.id.clone(),
                expected: effect.card_name(),
            });
        }

        match effect {
            ActionEffect::SwipeIn | ActionEffect::ItsMyStop => Ok(()),
            ActionEffect::RushHour => Err(Rejection::RushHourAlone),
            ActionEffect::FareEvasion => Err(Rejection::FareEvasionResponseOnly),
            ActionEffect::MissedYourTrain => Self::target(state, action).map(|_| ()),
            ActionEffect::PowerBroker => {
                let target = Self::target(state, action)?;
                let color = Self::require_key(action.color(), Action::COLOR)?;
                let card_id = Self::require_key(action.target_card_id(), Action::TARGET_CARD_ID)?;
                Self::require_in_set(target, color, &card_id)?;
                if Self::is_complete(target, color) {
                    return Err(Rejection::CompleteSet(color));
                }
                Ok(())
            }
            ActionEffect::LineClosure => {
                let target = Self::target(state, action)?;
                let color = Self::require_key(action.color(), Action::COLOR)?;
                if !Self::is_complete(target, color) {
                    return Err(Rejection::IncompleteSet(color));
                }
                Ok(())
            }
            ActionEffect::ServiceChange => {
                let target = Self::target(state, action)?;
                let actor = Self::actor(state, action)?;

                let color = Self::require_key(action.color(), Action::COLOR)?;
                let target_card = Self::require_key(action.target_card_id(), Action::TARGET_CARD_ID)?;
                let own_color = Self::require_key(action.player_color(), Action::PLAYER_COLOR)?;
                let own_card = Self::require_key(action.player_card_id(), Action::PLAYER_CARD_ID)?;

                Self::require_in_set(target, color, &target_card)?;
                Self::require_in_set(actor, own_color, &own_card)?;
                if Self::is_complete(actor, own_color) {
                    return Err(Rejection::CompleteSet(own_color));
                }
                if Self::is_complete(target, color) {
                    return Err(Rejection::CompleteSet(color));
                }
                Ok(())
            }
            ActionEffect::ExpressService | ActionEffect::NewStation => {
                let improvement = if effect == ActionEffect::ExpressService {
                    Improvement::Express
                } else {
                    Improvement::Station
                };
                let color = Self::require_key(action.color(), Action::COLOR)?;
                let actor = Self::actor(state, action)?;
                let allowed = actor
                    .property_set(color)
                    .is_some_and(|s| s.can_add_improvement(improvement));
                if allowed {
                    Ok(())
                } else {
                    Err(Rejection::CannotImprove { improvement, color })
                }
            }
        }
    }

    fn validate_response(state: &GameState, action: &Action) -> Result<(), Rejection> {
        let pending = match (&state.pending, state.turn_phase) {
            (Some(pending), TurnPhase::Response) => pending,
            _ => return Err(Rejection::NoPendingAction),
        };
        if !pending.is_outstanding(&action.player_id) {
            return Err(Rejection::NotATarget);
        }

        if action.kind == ActionKind::PlayFareEvasion {
            let card = Self::hand_card(state, action, Action::CARD_ID)?;
            if card.effect() != Some(ActionEffect::FareEvasion) {
                return Err(Rejection::WrongCardType {
                    card: card.id.clone(),
                    expected: "a Fare Evasion card",
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameRng, PendingAction, RulesConfig};

    fn p(i: usize) -> PlayerId {
        PlayerId::seat(i)
    }

    /// Three players, player 0 in the action phase with empty hands.
    fn state() -> GameState {
        let mut s = GameState::new(&["A", "B", "C"], RulesConfig::default(), GameRng::new(1)).unwrap();
        s.phase = GamePhase::Playing;
        s.turn_phase = TurnPhase::Actions;
        s
    }

    fn give(s: &mut GameState, player: usize, card: Card) {
        s.player_mut(&p(player)).unwrap().add_to_hand(card);
    }

    fn own(s: &mut GameState, player: usize, card: Card) {
        s.player_mut(&p(player)).unwrap().add_property(card).unwrap();
    }

    fn act(kind: ActionKind, player: usize) -> Action {
        Action::new(kind, p(player))
    }

    #[test]
    fn test_nothing_legal_before_or_after_play() {
        let mut s = state();
        s.phase = GamePhase::Setup;
        assert_eq!(Validator::validate(&s, &act(ActionKind::EndTurn, 0)), Err(Rejection::GameNotActive));
        s.phase = GamePhase::Finished;
        assert_eq!(Validator::validate(&s, &act(ActionKind::EndTurn, 0)), Err(Rejection::GameNotActive));
    }

    #[test]
    fn test_turn_ownership() {
        let mut s = state();
        give(&mut s, 1, Card::money("money_1_1", 1));
        let action = act(ActionKind::PlayMoney, 1).with(Action::CARD_ID, "money_1_1");
        assert_eq!(Validator::validate(&s, &action), Err(Rejection::NotYourTurn));
        assert_eq!(Validator::validate(&s, &act(ActionKind::EndTurn, 2)), Err(Rejection::NotYourTurn));
    }

    #[test]
    fn test_draw_only_in_draw_phase() {
        let mut s = state();
        assert!(matches!(
            Validator::validate(&s, &act(ActionKind::DrawCards, 0)),
            Err(Rejection::WrongPhase(_))
        ));
        s.turn_phase = TurnPhase::Draw;
        assert_eq!(Validator::validate(&s, &act(ActionKind::DrawCards, 0)), Ok(()));
        assert_eq!(Validator::validate(&s, &act(ActionKind::EndTurn, 0)), Ok(()));

        give(&mut s, 0, Card::money("money_1_1", 1));
        let play = act(ActionKind::PlayMoney, 0).with(Action::CARD_ID, "money_1_1");
        assert!(matches!(Validator::validate(&s, &play), Err(Rejection::WrongPhase(_))));
    }

    #[test]
    fn test_action_cap() {
        let mut s = state();
        give(&mut s, 0, Card::money("money_1_1", 1));
        let play = act(ActionKind::PlayMoney, 0).with(Action::CARD_ID, "money_1_1");
        s.actions_played = 3;
        assert_eq!(Validator::validate(&s, &play), Err(Rejection::ActionLimit));
        s.actions_played = 2;
        assert_eq!(Validator::validate(&s, &play), Ok(()));
    }

    #[test]
    fn test_play_property() {
        let mut s = state();
        give(&mut s, 0, Card::property("prop_a", "A", 1, Color::Blue));
        give(&mut s, 0, Card::money("money_1_1", 1));
        give(&mut s, 0, Card::wildcard("wild_x", "X", 3, &[Color::Red, Color::Yellow]));

        let ok = act(ActionKind::PlayProperty, 0).with(Action::CARD_ID, "prop_a");
        assert_eq!(Validator::validate(&s, &ok), Ok(()));

        let money = act(ActionKind::PlayProperty, 0).with(Action::CARD_ID, "money_1_1");
        assert!(matches!(Validator::validate(&s, &money), Err(Rejection::WrongCardType { .. })));

        let missing = act(ActionKind::PlayProperty, 0).with(Action::CARD_ID, "prop_c");
        assert_eq!(Validator::validate(&s, &missing), Err(Rejection::NotInHand(CardId::new("prop_c"))));

        let wild_ok = act(ActionKind::PlayProperty, 0)
            .with(Action::CARD_ID, "wild_x")
            .with(Action::COLOR, "yellow");
        assert_eq!(Validator::validate(&s, &wild_ok), Ok(()));

        let wild_bad = act(ActionKind::PlayProperty, 0)
            .with(Action::CARD_ID, "wild_x")
            .with(Action::COLOR, "blue");
        assert!(matches!(Validator::validate(&s, &wild_bad), Err(Rejection::WildcardColor { .. })));
    }

    #[test]
    fn test_zero_value_cards_cannot_be_banked() {
        let mut s = state();
        give(&mut s, 0, Card::wildcard("wild_fulton_1", "Fulton Center", 0, &Color::ALL));
        let action = act(ActionKind::PlayMoney, 0).with(Action::CARD_ID, "wild_fulton_1");
        assert_eq!(
            Validator::validate(&s, &action),
            Err(Rejection::NoMoneyValue(CardId::new("wild_fulton_1")))
        );
    }

    #[test]
    fn test_rent_requires_owned_color() {
        let mut s = state();
        give(&mut s, 0, Card::rent("rent_blue_brown_1", "Rent", 1, &[Color::Blue, Color::Brown], RentTarget::All));
        let action = act(ActionKind::PlayRent, 0)
            .with(Action::CARD_ID, "rent_blue_brown_1")
            .with(Action::COLOR, "blue");
        assert_eq!(Validator::validate(&s, &action), Err(Rejection::NoProperties(Color::Blue)));

        own(&mut s, 0, Card::property("prop_a", "A", 1, Color::Blue));
        assert_eq!(Validator::validate(&s, &action), Ok(()));

        let wrong_color = act(ActionKind::PlayRent, 0)
            .with(Action::CARD_ID, "rent_blue_brown_1")
            .with(Action::COLOR, "green");
        assert!(matches!(Validator::validate(&s, &wrong_color), Err(Rejection::RentColor { .. })));

        let no_color = act(ActionKind::PlayRent, 0).with(Action::CARD_ID, "rent_blue_brown_1");
        assert_eq!(Validator::validate(&s, &no_color), Err(Rejection::MissingData("color")));
    }

    #[test]
    fn test_wild_rent_needs_a_valid_target() {
        let mut s = state();
        give(&mut s, 0, Card::rent("rent_wild_1", "Wild Rent", 3, &[], RentTarget::One));
        let base = act(ActionKind::PlayRent, 0)
            .with(Action::CARD_ID, "rent_wild_1")
            .with(Action::COLOR, "green");

        assert_eq!(Validator::validate(&s, &base), Err(Rejection::MissingData("targetPlayerId")));
        let me = base.clone().with(Action::TARGET_PLAYER_ID, "player_0");
        assert_eq!(Validator::validate(&s, &me), Err(Rejection::SelfTarget));
        let ghost = base.clone().with(Action::TARGET_PLAYER_ID, "player_9");
        assert_eq!(Validator::validate(&s, &ghost), Err(Rejection::UnknownPlayer(p(9))));
        let ok = base.with(Action::TARGET_PLAYER_ID, "player_2");
        assert_eq!(Validator::validate(&s, &ok), Ok(()));
    }

    #[test]
    fn test_rush_hour_companion() {
        let mut s = state();
        own(&mut s, 0, Card::property("prop_a", "A", 1, Color::Blue));
        give(&mut s, 0, Card::rent("rent_blue_brown_1", "Rent", 1, &[Color::Blue, Color::Brown], RentTarget::All));
        give(&mut s, 0, Card::action("action_rush_hour_1", 1, ActionEffect::RushHour));
        give(&mut s, 0, Card::action("action_swipe_in_1", 1, ActionEffect::SwipeIn));

        let rent = act(ActionKind::PlayRent, 0)
            .with(Action::CARD_ID, "rent_blue_brown_1")
            .with(Action::COLOR, "blue");
        let doubled = rent.clone().with(Action::RUSH_HOUR_CARD_ID, "action_rush_hour_1");
        assert_eq!(Validator::validate(&s, &doubled), Ok(()));

        let wrong = rent.clone().with(Action::RUSH_HOUR_CARD_ID, "action_swipe_in_1");
        assert!(matches!(Validator::validate(&s, &wrong), Err(Rejection::WrongCardType { .. })));

        let absent = rent.with(Action::RUSH_HOUR_CARD_ID, "action_rush_hour_2");
        assert!(matches!(Validator::validate(&s, &absent), Err(Rejection::NotInHand(_))));

        let alone = act(ActionKind::RushHour, 0).with(Action::CARD_ID, "action_rush_hour_1");
        assert_eq!(Validator::validate(&s, &alone), Err(Rejection::RushHourAlone));
    }

    #[test]
    fn test_play_action_resolves_effect() {
        let mut s = state();
        give(&mut s, 0, Card::action("action_swipe_in_1", 1, ActionEffect::SwipeIn));
        give(&mut s, 0, Card::action("action_fare_evasion_1", 4, ActionEffect::FareEvasion));
        give(&mut s, 0, Card::money("money_1_1", 1));

        let swipe = act(ActionKind::PlayAction, 0).with(Action::CARD_ID, "action_swipe_in_1");
        assert_eq!(Validator::resolve_kind(&s, &swipe), Ok(ActionKind::SwipeIn));
        assert_eq!(Validator::validate(&s, &swipe), Ok(()));

        let fare = act(ActionKind::PlayAction, 0).with(Action::CARD_ID, "action_fare_evasion_1");
        assert_eq!(Validator::validate(&s, &fare), Err(Rejection::FareEvasionResponseOnly));

        let money = act(ActionKind::PlayAction, 0).with(Action::CARD_ID, "money_1_1");
        assert!(matches!(Validator::validate(&s, &money), Err(Rejection::WrongCardType { .. })));

        // The specific kind must match the card.
        let mismatched = act(ActionKind::ItsMyStop, 0).with(Action::CARD_ID, "action_swipe_in_1");
        assert!(matches!(Validator::validate(&s, &mismatched), Err(Rejection::WrongCardType { .. })));
    }

    #[test]
    fn test_power_broker_targets_incomplete_sets_only() {
        let mut s = state();
        give(&mut s, 0, Card::action("action_power_broker_1", 3, ActionEffect::PowerBroker));
        own(&mut s, 1, Card::property("prop_a", "A", 1, Color::Blue));
        own(&mut s, 1, Card::property("prop_j", "J", 1, Color::Brown));
        own(&mut s, 1, Card::property("prop_z", "Z", 1, Color::Brown));

        let steal = |color: &str, card: &str| {
            act(ActionKind::PowerBroker, 0)
                .with(Action::CARD_ID, "action_power_broker_1")
                .with(Action::TARGET_PLAYER_ID, "player_1")
                .with(Action::COLOR, color)
                .with(Action::TARGET_CARD_ID, card)
        };

        assert_eq!(Validator::validate(&s, &steal("blue", "prop_a")), Ok(()));
        assert_eq!(Validator::validate(&s, &steal("brown", "prop_j")), Err(Rejection::CompleteSet(Color::Brown)));
        assert!(matches!(
            Validator::validate(&s, &steal("blue", "prop_c")),
            Err(Rejection::NotInSet { .. })
        ));
    }

    #[test]
    fn test_line_closure_needs_complete_set() {
        let mut s = state();
        give(&mut s, 0, Card::action("action_line_closure_1", 5, ActionEffect::LineClosure));
        own(&mut s, 1, Card::property("prop_j", "J", 1, Color::Brown));

        let closure = act(ActionKind::LineClosure, 0)
            .with(Action::CARD_ID, "action_line_closure_1")
            .with(Action::TARGET_PLAYER_ID, "player_1")
            .with(Action::COLOR, "brown");
        assert_eq!(Validator::validate(&s, &closure), Err(Rejection::IncompleteSet(Color::Brown)));

        own(&mut s, 1, Card::property("prop_z", "Z", 1, Color::Brown));
        assert_eq!(Validator::validate(&s, &closure), Ok(()));
    }

    #[test]
    fn test_service_change_rejects_complete_sets() {
        let mut s = state();
        give(&mut s, 0, Card::action("action_service_change_1", 3, ActionEffect::ServiceChange));
        own(&mut s, 0, Card::property("prop_j", "J", 1, Color::Brown));
        own(&mut s, 0, Card::property("prop_z", "Z", 1, Color::Brown));
        own(&mut s, 0, Card::property("prop_a", "A", 1, Color::Blue));
        own(&mut s, 1, Card::property("prop_1", "1", 3, Color::Red));

        let swap = |own_color: &str, own_card: &str| {
            act(ActionKind::ServiceChange, 0)
                .with(Action::CARD_ID, "action_service_change_1")
                .with(Action::TARGET_PLAYER_ID, "player_1")
                .with(Action::COLOR, "red")
                .with(Action::TARGET_CARD_ID, "prop_1")
                .with(Action::PLAYER_COLOR, own_color)
                .with(Action::PLAYER_CARD_ID, own_card)
        };

        assert_eq!(Validator::validate(&s, &swap("blue", "prop_a")), Ok(()));
        assert_eq!(Validator::validate(&s, &swap("brown", "prop_j")), Err(Rejection::CompleteSet(Color::Brown)));
        assert!(matches!(
            Validator::validate(&s, &swap("blue", "prop_c")),
            Err(Rejection::NotInSet { .. })
        ));
    }

    #[test]
    fn test_improvements_gate() {
        let mut s = state();
        give(&mut s, 0, Card::action("action_express_service_1", 3, ActionEffect::ExpressService));
        give(&mut s, 0, Card::action("action_new_station_1", 4, ActionEffect::NewStation));
        own(&mut s, 0, Card::property("prop_j", "J", 1, Color::Brown));

        let express = act(ActionKind::ExpressService, 0)
            .with(Action::CARD_ID, "action_express_service_1")
            .with(Action::COLOR, "brown");
        assert!(matches!(Validator::validate(&s, &express), Err(Rejection::CannotImprove { .. })));

        own(&mut s, 0, Card::property("prop_z", "Z", 1, Color::Brown));
        assert_eq!(Validator::validate(&s, &express), Ok(()));

        let station = act(ActionKind::NewStation, 0)
            .with(Action::CARD_ID, "action_new_station_1")
            .with(Action::COLOR, "brown");
        assert!(matches!(Validator::validate(&s, &station), Err(Rejection::CannotImprove { .. })));
    }

    #[test]
    fn test_flip_wildcard() {
        let mut s = state();
        own(&mut s, 0, Card::wildcard("wild_x", "X", 3, &[Color::Red, Color::Yellow]));
        own(&mut s, 0, Card::property("prop_a", "A", 1, Color::Blue));

        let flip = act(ActionKind::FlipWildcard, 0).with(Action::CARD_ID, "wild_x");
        assert_eq!(Validator::validate(&s, &flip), Ok(()));

        let not_wild = act(ActionKind::FlipWildcard, 0).with(Action::CARD_ID, "prop_a");
        assert_eq!(Validator::validate(&s, &not_wild), Err(Rejection::NotAWildcard(CardId::new("prop_a"))));

        own(&mut s, 0, Card::property("prop_1", "1", 3, Color::Red));
        own(&mut s, 0, Card::property("prop_2", "2", 3, Color::Red));
        assert_eq!(Validator::validate(&s, &flip), Err(Rejection::WildcardInCompleteSet));

        s.turn_phase = TurnPhase::Draw;
        assert!(matches!(Validator::validate(&s, &flip), Err(Rejection::WrongPhase(_))));
    }

    #[test]
    fn test_response_gates() {
        let mut s = state();
        give(&mut s, 1, Card::action("action_fare_evasion_1", 4, ActionEffect::FareEvasion));
        give(&mut s, 2, Card::money("money_1_1", 1));

        assert_eq!(Validator::validate(&s, &act(ActionKind::Accept, 1)), Err(Rejection::NoPendingAction));

        let pending = PendingAction::new(act(ActionKind::MissedYourTrain, 0), p(0), [p(1)]).with_amount(5);
        s.set_pending(pending);

        assert_eq!(Validator::validate(&s, &act(ActionKind::Accept, 1)), Ok(()));
        assert_eq!(Validator::validate(&s, &act(ActionKind::Accept, 2)), Err(Rejection::NotATarget));
        assert_eq!(Validator::validate(&s, &act(ActionKind::Accept, 0)), Err(Rejection::NotATarget));
        assert_eq!(Validator::validate(&s, &act(ActionKind::EndTurn, 0)), Err(Rejection::AwaitingResponse));

        let fare = act(ActionKind::PlayFareEvasion, 1).with(Action::CARD_ID, "action_fare_evasion_1");
        assert_eq!(Validator::validate(&s, &fare), Ok(()));

        s.mark_responded(&p(1));
        assert_eq!(Validator::validate(&s, &act(ActionKind::Accept, 1)), Err(Rejection::NotATarget));
    }

    #[test]
    fn test_fare_evasion_requires_the_card() {
        let mut s = state();
        give(&mut s, 1, Card::money("money_1_1", 1));
        s.set_pending(PendingAction::new(act(ActionKind::MissedYourTrain, 0), p(0), [p(1)]));

        let absent = act(ActionKind::PlayFareEvasion, 1).with(Action::CARD_ID, "action_fare_evasion_1");
        assert!(matches!(Validator::validate(&s, &absent), Err(Rejection::NotInHand(_))));

        let wrong = act(ActionKind::PlayFareEvasion, 1).with(Action::CARD_ID, "money_1_1");
        assert!(matches!(Validator::validate(&s, &wrong), Err(Rejection::WrongCardType { .. })));
    }

    #[test]
    fn test_unknown_color_is_named() {
        let mut s = state();
        give(&mut s, 0, Card::wildcard("wild_times_square_1", "Times Square", 3, &[Color::Red, Color::Yellow]));
        give(&mut s, 0, Card::rent("rent_red_yellow_1", "Rent", 1, &[Color::Red, Color::Yellow], RentTarget::All));
        own(&mut s, 0, Card::property("prop_1", "1", 3, Color::Red));

        let wild = act(ActionKind::PlayProperty, 0)
            .with(Action::CARD_ID, "wild_times_square_1")
            .with(Action::COLOR, "purple");
        assert_eq!(
            Validator::validate(&s, &wild),
            Err(Rejection::UnknownColor("purple".into()))
        );

        let rent = act(ActionKind::PlayRent, 0)
            .with(Action::CARD_ID, "rent_red_yellow_1")
            .with(Action::COLOR, "purple");
        let rejection = Validator::validate(&s, &rent).unwrap_err();
        assert_eq!(rejection.to_string(), "unknown color \"purple\"");
    }

    #[test]
    fn test_rejection_messages() {
        assert_eq!(Rejection::NotYourTurn.to_string(), "not your turn");
        assert_eq!(Rejection::ActionLimit.to_string(), "maximum actions per turn exceeded");
        assert_eq!(
            Rejection::NoProperties(Color::DarkBlue).to_string(),
            "you don't own any darkblue properties"
        );
    }
}
