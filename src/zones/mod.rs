//! Pile system.
//!
//! Klondike has a fixed layout: one stock, one waste, four foundations and
//! seven tableaux. `PileId` names a pile; `Pile` is the persistent vector
//! holding its cards.

pub mod pile;

pub use pile::{Pile, PileExt, PileId, FOUNDATION_COUNT, TABLEAU_COUNT};
