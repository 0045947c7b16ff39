//! # metro-deal
//!
//! Rules engine for a subway-themed set-collection card game for 2-5
//! players: bank money, lay down stations by line color, charge rent, and
//! steal or swap holdings. Three complete lines win.
//!
//! ## Design Principles
//!
//! 1. **One owned aggregate**: all session data lives in [`GameState`].
//!    The validator reads it, the executor mutates it, the engine owns it.
//!
//! 2. **Validate, then execute**: legality checks never mutate state, and
//!    a rejected action leaves the state byte-identical.
//!
//! 3. **N-Player First**: targets, payments and responses are per player.
//!    Nothing assumes two seats.
//!
//! 4. **Deterministic**: a seeded ChaCha RNG drives every shuffle, and
//!    persistent `im` collections keep clones cheap and iteration ordered.
//!
//! ## Modules
//!
//! - `cards`: colors, card definitions and the 106-card catalog
//! - `core`: players, property sets, state, actions, views, RNG, config
//! - `rules`: validator, executor, turn boundaries and the [`Engine`]
//!
//! ## Example
//!
//! ```
//! use metro_deal::{Action, ActionKind, Engine, PlayerId};
//!
//! let mut engine = Engine::with_seed(&["Ana", "Ben"], 7).unwrap();
//! let result = engine.execute(&Action::new(ActionKind::DrawCards, PlayerId::seat(0)));
//! assert!(result.success);
//! assert_eq!(engine.state().current_player().hand().len(), 7);
//! ```

pub mod cards;
pub mod core;
pub mod rules;

pub use crate::cards::{build_catalog, ActionEffect, Card, CardId, CardKind, CardType, Color, RentTarget};

pub use crate::core::{
    Action, ActionKind, ActionResult, PaymentResult,
    GamePhase, GameState, PendingAction, TurnPhase,
    GameRng, GameRngState,
    Improvement, Player, PlayerId, PropertySet,
    PrivateView, PublicView,
    RulesConfig, RulesError,
};

pub use crate::rules::{Engine, Executor, Rejection, Validator};
