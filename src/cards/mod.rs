//! Card data: colors, card definitions and the fixed deck.
//!
//! Cards are plain data. Their special behavior is applied by the rules
//! executor, which matches on [`CardKind`] and [`ActionEffect`].

pub mod catalog;
pub mod color;
pub mod definition;

pub use catalog::{build_catalog, CATALOG_SIZE};
pub use color::Color;
pub use definition::{ActionEffect, Card, CardId, CardKind, CardType, RentTarget};
