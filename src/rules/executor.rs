//! Effect application.
//!
//! [`Executor::execute`] applies an action that already passed validation.
//! Three families:
//!
//! - **Immediate**: property/money plays, Swipe In, improvements, wildcard
//!   flips and the turn boundary mutate the state directly.
//! - **Contested**: rent, Power Broker, Service Change, Line Closure,
//!   Missed Your Train and It's My Stop! discard their card(s) and install
//!   a [`PendingAction`]; the effect happens when targets accept.
//! - **Responses**: `ACCEPT` resolves the pending effect for one
//!   responder; `PLAY_FARE_EVASION` cancels it for that responder, or
//!   outright when it had a single target.
//!
//! Execution is all-or-nothing: the state is checkpointed before the
//! handler runs and restored if the handler fails, so a consumed card is
//! back in the actor's hand and a pending action is untouched.

use tracing::{debug, warn};

use crate::cards::{ActionEffect, Card, CardId, CardKind, Color, RentTarget};
use crate::core::{
    Action, ActionKind, ActionResult, GameState, Improvement, PaymentResult, PendingAction, PlayerId, RulesError,
};
use crate::rules::turn;

/// Stateless effect applier.
pub struct Executor;

impl Executor {
    /// Apply `action`, returning a failed result (and an unchanged state)
    /// if it cannot be carried out.
    pub fn execute(state: &mut GameState, action: &Action) -> ActionResult {
        let checkpoint = state.clone();
        match Self::apply(state, action) {
            Ok(result) => {
                debug!(
                    kind = ?action.kind,
                    player = %action.player_id,
                    actions_played = state.actions_played,
                    pending = result.pending_action,
                    "action executed"
                );
                result
            }
            Err(err) => {
                warn!(kind = ?action.kind, player = %action.player_id, error = %err, "action failed");
                *state = checkpoint;
                ActionResult::failed(err.to_string())
            }
        }
    }

    fn apply(state: &mut GameState, action: &Action) -> Result<ActionResult, RulesError> {
        if let Some(raw) = action.unknown_color() {
            return Err(RulesError::InvalidOperation(format!("unknown color {raw:?}")));
        }

        match action.kind {
            ActionKind::DrawCards => {
                let drawn = turn::start_turn(state);
                Ok(ActionResult::ok(format!("{} drew {drawn} cards", name_of(state, &action.player_id))))
            }
            ActionKind::EndTurn => {
                let discarded = turn::end_turn(state);
                let mut message = String::from("turn ended");
                if discarded > 0 {
                    message.push_str(&format!(", discarded {discarded} cards"));
                }
                Ok(ActionResult::ok(message))
            }
            ActionKind::PlayProperty => Self::play_property(state, action),
            ActionKind::PlayMoney => Self::play_money(state, action),
            ActionKind::FlipWildcard => Self::flip_wildcard(state, action),
            ActionKind::PlayRent => Self::play_rent(state, action),
            ActionKind::PlayAction => {
                let resolved = Self::resolve_play_action(state, action)?;
                Self::apply(state, &resolved)
            }
            ActionKind::SwipeIn => Self::swipe_in(state, action),
            ActionKind::ExpressService => Self::improve(state, action, Improvement::Express),
            ActionKind::NewStation => Self::improve(state, action, Improvement::Station),
            ActionKind::PowerBroker | ActionKind::LineClosure | ActionKind::ServiceChange => {
                Self::play_targeted(state, action)
            }
            ActionKind::MissedYourTrain => Self::play_debt_collector(state, action),
            ActionKind::ItsMyStop => Self::play_birthday(state, action),
            ActionKind::RushHour => Err(RulesError::InvalidOperation(
                "Rush Hour can only be played with a rent card".into(),
            )),
            ActionKind::Accept => Self::accept(state, action),
            ActionKind::PlayFareEvasion => Self::fare_evasion(state, action),
        }
    }

    /// Rewrite a `PLAY_ACTION` as the specific kind its card plays.
    fn resolve_play_action(state: &GameState, action: &Action) -> Result<Action, RulesError> {
        let card_id = required(action.card_id(), Action::CARD_ID)?;
        let card = state
            .player(&action.player_id)
            .and_then(|p| p.card_in_hand(&card_id))
            .ok_or(RulesError::NotFound(card_id))?;
        let kind = card
            .effect()
            .and_then(ActionKind::for_effect)
            .ok_or_else(|| RulesError::InvalidOperation(format!("{} cannot be played as an action", card.id)))?;
        Ok(Action {
            kind,
            ..action.clone()
        })
    }

    // === Immediate ===

    fn play_property(state: &mut GameState, action: &Action) -> Result<ActionResult, RulesError> {
        let player = state.require_player_mut(&action.player_id)?;
        let mut card = player.remove_from_hand(&required(action.card_id(), Action::CARD_ID)?)?;

        if let (CardKind::Wildcard { .. }, Some(color)) = (&card.kind, action.color()) {
            if !card.set_wildcard_color(color) {
                return Err(RulesError::InvalidOperation(format!("{} cannot be {color}", card.id)));
            }
        }

        let name = card.name.clone();
        let color = player.add_property(card)?;
        let message = format!("{} played {name} as {color}", player.name);
        state.actions_played += 1;
        Ok(ActionResult::ok(message))
    }

    fn play_money(state: &mut GameState, action: &Action) -> Result<ActionResult, RulesError> {
        let player = state.require_player_mut(&action.player_id)?;
        let card = player.remove_from_hand(&required(action.card_id(), Action::CARD_ID)?)?;
        if card.value == 0 {
            return Err(RulesError::InvalidOperation(format!("{} has no money value", card.id)));
        }

        let message = format!("{} banked {} (${})", player.name, card.name, card.value);
        player.add_to_bank(card);
        state.actions_played += 1;
        Ok(ActionResult::ok(message))
    }

    fn flip_wildcard(state: &mut GameState, action: &Action) -> Result<ActionResult, RulesError> {
        let card_id = required(action.card_id(), Action::CARD_ID)?;
        let player = state.require_player_mut(&action.player_id)?;
        let (from, _) = player
            .find_property(&card_id)
            .ok_or_else(|| RulesError::NotFound(card_id.clone()))?;

        let mut card = player.property_set_mut(from).remove_card(&card_id)?;
        let to = card
            .flip_color()
            .ok_or_else(|| RulesError::InvalidOperation(format!("{card_id} is not a wildcard")))?;
        player.add_property(card)?;

        Ok(ActionResult::ok(format!("{} flipped wildcard from {from} to {to}", player.name)))
    }

    fn swipe_in(state: &mut GameState, action: &Action) -> Result<ActionResult, RulesError> {
        let card = take_action_card(state, action, ActionEffect::SwipeIn)?;
        state.discard_card(card);

        let index = state
            .index_of(&action.player_id)
            .ok_or_else(|| unknown_player(&action.player_id))?;
        let drawn = state.draw_into(index, state.config.swipe_in_draw);
        state.actions_played += 1;

        Ok(ActionResult::ok(format!(
            "{} used Swipe In and drew {drawn} cards",
            name_of(state, &action.player_id)
        )))
    }

    fn improve(state: &mut GameState, action: &Action, improvement: Improvement) -> Result<ActionResult, RulesError> {
        let effect = match improvement {
            Improvement::Express => ActionEffect::ExpressService,
            Improvement::Station => ActionEffect::NewStation,
        };
        let card = take_action_card(state, action, effect)?;
        let color = required(action.color(), Action::COLOR)?;

        let player = state.require_player_mut(&action.player_id)?;
        let set = player
            .existing_set_mut(color)
            .ok_or_else(|| RulesError::InvalidOperation(format!("no {color} set to improve")))?;
        set.add_improvement(improvement)?;
        let message = format!(
            "{} added {} to {color} set (+${} rent)",
            player.name,
            effect.card_name(),
            improvement.rent_bonus()
        );

        state.discard_card(card);
        state.actions_played += 1;
        Ok(ActionResult::ok(message))
    }

    // === Contested ===

    fn play_rent(state: &mut GameState, action: &Action) -> Result<ActionResult, RulesError> {
        let source = action.player_id.clone();
        let color = required(action.color(), Action::COLOR)?;
        let player = state.require_player_mut(&source)?;

        let card = player.remove_from_hand(&required(action.card_id(), Action::CARD_ID)?)?;
        let CardKind::Rent { colors, target } = &card.kind else {
            return Err(RulesError::InvalidOperation(format!("{} is not a rent card", card.id)));
        };
        if !colors.is_empty() && !colors.contains(&color) {
            return Err(RulesError::InvalidOperation(format!("{} cannot charge {color}", card.id)));
        }
        let target = *target;
        let base = player.property_set(color).map_or(0, |s| s.rent());

        let mut companion = None;
        if let Some(rush_id) = action.rush_hour_card_id() {
            let rush = player.remove_from_hand(&rush_id)?;
            if rush.effect() != Some(ActionEffect::RushHour) {
                return Err(RulesError::InvalidOperation(format!("{rush_id} is not a Rush Hour card")));
            }
            companion = Some(rush);
        }
        let multiplier = if companion.is_some() { 2 } else { 1 };

        let targets = match target {
            RentTarget::All => state.opponents_of(&source),
            RentTarget::One => vec![target_of(state, action)?],
        };

        if let Some(rush) = companion {
            state.discard_card(rush);
        }
        state.discard_card(card);

        let pending = PendingAction::new(action.clone(), source.clone(), targets).with_rent(color, base, multiplier);
        let mut message = format!("{} demands ${} rent on {color}", name_of(state, &source), pending.amount);
        if multiplier == 2 {
            message.push_str(" (Rush Hour!)");
        }

        state.set_pending(pending);
        state.actions_played += 1;
        Ok(ActionResult::ok(message).pending())
    }

    /// Power Broker, Line Closure and Service Change: one named target and
    /// a set-completeness precondition checked again at play time.
    fn play_targeted(state: &mut GameState, action: &Action) -> Result<ActionResult, RulesError> {
        let Some(effect) = action.kind.effect() else {
            return Err(RulesError::InvalidOperation(format!("{:?} is not an action card play", action.kind)));
        };
        let target = target_of(state, action)?;
        let color = required(action.color(), Action::COLOR)?;
        let target_complete = set_complete(state, &target, color);

        match effect {
            ActionEffect::PowerBroker if target_complete => {
                return Err(RulesError::InvalidOperation("cannot steal from complete set".into()));
            }
            ActionEffect::LineClosure if !target_complete => {
                return Err(RulesError::InvalidOperation("can only steal complete sets".into()));
            }
            ActionEffect::ServiceChange => {
                let own_color = required(action.player_color(), Action::PLAYER_COLOR)?;
                if set_complete(state, &action.player_id, own_color) {
                    return Err(RulesError::InvalidOperation("cannot swap from your complete set".into()));
                }
                if target_complete {
                    return Err(RulesError::InvalidOperation("cannot swap from opponent's complete set".into()));
                }
            }
            _ => {}
        }

        let card = take_action_card(state, action, effect)?;
        state.discard_card(card);

        let message = format!(
            "{} plays {} against {}'s {color} set",
            name_of(state, &action.player_id),
            effect.card_name(),
            name_of(state, &target)
        );
        state.set_pending(PendingAction::new(action.clone(), action.player_id.clone(), [target]));
        state.actions_played += 1;
        Ok(ActionResult::ok(message).pending())
    }

    fn play_debt_collector(state: &mut GameState, action: &Action) -> Result<ActionResult, RulesError> {
        let target = target_of(state, action)?;
        let card = take_action_card(state, action, ActionEffect::MissedYourTrain)?;
        state.discard_card(card);

        let amount = state.config.debt_amount;
        let message = format!(
            "{} demands ${amount} from {} (Missed Your Train)",
            name_of(state, &action.player_id),
            name_of(state, &target)
        );
        state.set_pending(PendingAction::new(action.clone(), action.player_id.clone(), [target]).with_amount(amount));
        state.actions_played += 1;
        Ok(ActionResult::ok(message).pending())
    }

    fn play_birthday(state: &mut GameState, action: &Action) -> Result<ActionResult, RulesError> {
        let card = take_action_card(state, action, ActionEffect::ItsMyStop)?;
        state.discard_card(card);

        let amount = state.config.birthday_amount;
        let targets = state.opponents_of(&action.player_id);
        let message = format!("{} demands ${amount} from everyone (It's My Stop!)", name_of(state, &action.player_id));
        state.set_pending(PendingAction::new(action.clone(), action.player_id.clone(), targets).with_amount(amount));
        state.actions_played += 1;
        Ok(ActionResult::ok(message).pending())
    }

    // === Responses ===

    fn accept(state: &mut GameState, action: &Action) -> Result<ActionResult, RulesError> {
        let pending = state
            .pending
            .clone()
            .ok_or_else(|| RulesError::InvalidOperation("no pending action".into()))?;
        let responder = &action.player_id;
        if !pending.is_outstanding(responder) {
            return Err(RulesError::InvalidOperation(format!("{responder} is not a target of this action")));
        }

        let result = Self::resolve_for(state, &pending, responder)?;

        state.mark_responded(responder);
        if state.all_responded() {
            state.clear_pending();
        }
        Ok(result)
    }

    fn fare_evasion(state: &mut GameState, action: &Action) -> Result<ActionResult, RulesError> {
        let pending = state
            .pending
            .clone()
            .ok_or_else(|| RulesError::InvalidOperation("no pending action".into()))?;
        let responder = &action.player_id;
        if !pending.is_outstanding(responder) {
            return Err(RulesError::InvalidOperation(format!("{responder} is not a target of this action")));
        }

        let card = take_action_card(state, action, ActionEffect::FareEvasion)?;
        state.discard_card(card);
        state.mark_responded(responder);

        let name = name_of(state, responder);
        if pending.is_single_target() {
            state.clear_pending();
            return Ok(ActionResult::ok(format!("{name} blocked the action with Fare Evasion!")));
        }

        if state.all_responded() {
            state.clear_pending();
        }
        Ok(ActionResult::ok(format!("{name} blocked with Fare Evasion!")))
    }

    /// Carry out the pending effect against one responder.
    fn resolve_for(state: &mut GameState, pending: &PendingAction, responder: &PlayerId) -> Result<ActionResult, RulesError> {
        let source = &pending.source;
        let trigger = &pending.action;

        match trigger.kind {
            ActionKind::PlayRent | ActionKind::MissedYourTrain | ActionKind::ItsMyStop => {
                let owed = pending.amount;
                let (paid, total) = state.require_player_mut(responder)?.pay(owed);
                let receiver = state.require_player_mut(source)?;
                for card in paid {
                    receiver.add_to_bank(card);
                }

                let shortfall = owed.saturating_sub(total);
                debug!(from = %responder, to = %source, owed, paid = total, shortfall, "payment");
                Ok(ActionResult::ok(format!("{} paid ${total}", name_of(state, responder))).with_payment(
                    PaymentResult {
                        from_player: responder.clone(),
                        amount: total,
                        shortfall,
                    },
                ))
            }

            ActionKind::PowerBroker => {
                let color = required(trigger.color(), Action::COLOR)?;
                let card_id = required(trigger.target_card_id(), Action::TARGET_CARD_ID)?;
                let stolen = take_from_set(state, responder, color, &card_id)?;
                let name = stolen.name.clone();
                state.require_player_mut(source)?.add_property(stolen)?;

                Ok(ActionResult::ok(format!(
                    "{} stole {name} from {}",
                    name_of(state, source),
                    name_of(state, responder)
                )))
            }

            ActionKind::LineClosure => {
                let color = required(trigger.color(), Action::COLOR)?;
                let (cards, improvements) = state
                    .require_player_mut(responder)?
                    .existing_set_mut(color)
                    .map(|set| set.take_all())
                    .ok_or_else(|| RulesError::InvalidOperation(format!("no {color} set to take")))?;
                if cards.is_empty() {
                    return Err(RulesError::InvalidOperation(format!("{color} set is empty")));
                }

                let set = state.require_player_mut(source)?.property_set_mut(color);
                for card in cards {
                    set.add_card(card);
                }
                set.absorb_improvements(improvements);

                Ok(ActionResult::ok(format!(
                    "{} stole complete {color} set from {}",
                    name_of(state, source),
                    name_of(state, responder)
                )))
            }

            ActionKind::ServiceChange => {
                let own_color = required(trigger.player_color(), Action::PLAYER_COLOR)?;
                let own_id = required(trigger.player_card_id(), Action::PLAYER_CARD_ID)?;
                let their_color = required(trigger.color(), Action::COLOR)?;
                let their_id = required(trigger.target_card_id(), Action::TARGET_CARD_ID)?;

                let given = take_from_set(state, source, own_color, &own_id)?;
                let received = take_from_set(state, responder, their_color, &their_id)?;
                let message = format!("Swapped {} for {}", given.name, received.name);

                state.require_player_mut(source)?.add_property(received)?;
                state.require_player_mut(responder)?.add_property(given)?;
                Ok(ActionResult::ok(message))
            }

            other => Err(RulesError::InvalidOperation(format!("{other:?} has no pending effect"))),
        }
    }
}

// === Helpers ===

fn required<T>(value: Option<T>, key: &str) -> Result<T, RulesError> {
    value.ok_or_else(|| RulesError::InvalidOperation(format!("missing {key}")))
}

fn unknown_player(id: &PlayerId) -> RulesError {
    RulesError::InvalidOperation(format!("unknown player {id}"))
}

fn name_of(state: &GameState, id: &PlayerId) -> String {
    state.player(id).map_or_else(|| id.to_string(), |p| p.name.clone())
}

/// The action's target: seated and not the actor.
fn target_of(state: &GameState, action: &Action) -> Result<PlayerId, RulesError> {
    let target = required(action.target_player(), Action::TARGET_PLAYER_ID)?;
    if target == action.player_id {
        return Err(RulesError::InvalidOperation("cannot target yourself".into()));
    }
    if state.player(&target).is_none() {
        return Err(unknown_player(&target));
    }
    Ok(target)
}

fn set_complete(state: &GameState, owner: &PlayerId, color: Color) -> bool {
    state
        .player(owner)
        .and_then(|p| p.property_set(color))
        .is_some_and(|s| s.is_complete())
}

/// Remove the named action card from the actor's hand, checking its effect.
fn take_action_card(state: &mut GameState, action: &Action, effect: ActionEffect) -> Result<Card, RulesError> {
    let card_id = required(action.card_id(), Action::CARD_ID)?;
    let card = state.require_player_mut(&action.player_id)?.remove_from_hand(&card_id)?;
    if card.effect() != Some(effect) {
        return Err(RulesError::InvalidOperation(format!("{card_id} is not {}", effect.card_name())));
    }
    Ok(card)
}

fn take_from_set(state: &mut GameState, owner: &PlayerId, color: Color, card_id: &CardId) -> Result<Card, RulesError> {
    state
        .require_player_mut(owner)?
        .existing_set_mut(color)
        .ok_or_else(|| RulesError::NotFound(card_id.clone()))?
        .remove_card(card_id)
}
