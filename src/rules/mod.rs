//! Klondike rules.
//!
//! - `validate`: the two placement predicates
//! - `resolve`: player intent (selection + drop target) to action
//! - `engine`: the `RulesEngine` trait and the pure transition function
//! - `scoring`: game-over detection and the time bonus
//!
//! Resolution decides legality; the engine applies whatever it is given.

pub mod engine;
pub mod resolve;
pub mod scoring;
pub mod validate;

pub use engine::{GameResult, Klondike, RulesEngine};
pub use resolve::{
    legal_destinations, movable_run, resolve_action, resolve_auto_foundation, resolve_move,
    resolve_stock_click, Selection,
};
pub use scoring::{final_score, is_game_over};
pub use validate::{is_valid_foundation_move, is_valid_run, is_valid_tableau_move};
