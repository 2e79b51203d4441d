//! Card model and deck.
//!
//! ## Key Types
//!
//! - `CardId`: Stable per-game identity of a physical card
//! - `Rank`, `Suit`, `Color`: Card values
//! - `Card`: A card with its face-up flag
//! - `deck`: Building, shuffling and dealing the 52-card deck

pub mod card;
pub mod deck;

pub use card::{Card, CardId, Color, Rank, Suit};
pub use deck::{build_deck, deal, shuffle, Deal, DECK_SIZE};
