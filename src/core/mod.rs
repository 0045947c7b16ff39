//! Core types: players, property sets, state, actions, RNG, configuration.
//!
//! Everything the rules layer reads or mutates lives here. The rules
//! themselves (legality, effects, turn boundaries) live in [`crate::rules`].

pub mod action;
pub mod config;
pub mod error;
pub mod player;
pub mod property_set;
pub mod rng;
pub mod state;
pub mod view;

pub use action::{Action, ActionKind, ActionResult, PaymentResult};
pub use config::RulesConfig;
pub use error::RulesError;
pub use player::{Player, PlayerId};
pub use property_set::{Improvement, PropertySet};
pub use rng::{GameRng, GameRngState};
pub use state::{GamePhase, GameState, PendingAction, TurnPhase};
pub use view::{CardSummary, HandCard, PendingView, PlayerSummary, PrivateView, PropertySetView, PublicView};
