//! Legality, effects and orchestration.
//!
//! - [`Validator`]: pure `(state, action) -> Result<(), Rejection>`.
//! - [`Executor`]: applies a validated action, all-or-nothing.
//! - [`turn`]: start/end-of-turn boundaries.
//! - [`Engine`]: validate, execute, check the win condition.

pub mod engine;
pub mod executor;
pub mod turn;
pub mod validator;

pub use engine::Engine;
pub use executor::Executor;
pub use validator::{Rejection, Validator};
