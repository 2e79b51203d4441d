//! Card identity: rank, suit, color, and the per-game card id.
//!
//! A `Card` is a small `Copy` value. Its `id` never changes during a game;
//! `face_up` is only ever changed by the transition engine, which produces
//! a new card value rather than mutating a stored one.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Stable identifier of one physical card (1..=52).
///
/// Human-readable formats (JSON) write it as `"c<N>"` and accept either that
/// string or a bare integer. Binary formats write the raw byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardId(pub u8);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }

    fn parse(text: &str) -> Option<Self> {
        let digits = text.strip_prefix('c').unwrap_or(text);
        digits.parse().ok().map(Self)
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "c{}", self.0)
    }
}

impl Serialize for CardId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.collect_str(self)
        } else {
            serializer.serialize_u8(self.0)
        }
    }
}

impl<'de> Deserialize<'de> for CardId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CardIdVisitor;

        impl<'de> Visitor<'de> for CardIdVisitor {
            type Value = CardId;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a card id such as \"c12\" or 12")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<CardId, E> {
                u8::try_from(v)
                    .map(CardId)
                    .map_err(|_| E::custom(format!("card id {} out of range", v)))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<CardId, E> {
                u8::try_from(v)
                    .map(CardId)
                    .map_err(|_| E::custom(format!("card id {} out of range", v)))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<CardId, E> {
                CardId::parse(v).ok_or_else(|| E::custom(format!("malformed card id `{}`", v)))
            }
        }

        if deserializer.is_human_readable() {
            deserializer.deserialize_any(CardIdVisitor)
        } else {
            u8::deserialize(deserializer).map(CardId)
        }
    }
}

/// Card rank, ace low.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rank {
    Ace = 1,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

impl Rank {
    /// All ranks, ace first.
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Ordinal value, ace = 1 through king = 13.
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Rank for an ordinal value.
    #[must_use]
    pub fn from_value(value: u8) -> Option<Self> {
        Self::ALL.get(usize::from(value).checked_sub(1)?).copied()
    }

    fn symbol(self) -> &'static str {
        match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        }
    }
}

/// Suit color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Black,
}

/// Card suit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Spade,
    Club,
    Diamond,
    Heart,
}

impl Suit {
    /// All suits in deck-building order.
    pub const ALL: [Suit; 4] = [Suit::Spade, Suit::Club, Suit::Diamond, Suit::Heart];

    /// Diamonds and hearts are red; spades and clubs are black.
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Suit::Diamond | Suit::Heart => Color::Red,
            Suit::Spade | Suit::Club => Color::Black,
        }
    }

    fn symbol(self) -> char {
        match self {
            Suit::Spade => '♠',
            Suit::Club => '♣',
            Suit::Diamond => '♦',
            Suit::Heart => '♥',
        }
    }
}

/// A playing card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Stable identity for the whole game.
    pub id: CardId,

    pub rank: Rank,

    pub suit: Suit,

    /// Whether the face is showing.
    pub face_up: bool,
}

impl Card {
    /// Create a face-down card.
    #[must_use]
    pub const fn new(id: CardId, rank: Rank, suit: Suit) -> Self {
        Self {
            id,
            rank,
            suit,
            face_up: false,
        }
    }

    #[must_use]
    pub const fn color(&self) -> Color {
        self.suit.color()
    }

    /// This card turned face up.
    #[must_use]
    pub const fn turned_up(self) -> Self {
        Self {
            face_up: true,
            ..self
        }
    }

    /// This card turned face down.
    #[must_use]
    pub const fn turned_down(self) -> Self {
        Self {
            face_up: false,
            ..self
        }
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.rank.symbol(), self.suit.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_values() {
        assert_eq!(Rank::Ace.value(), 1);
        assert_eq!(Rank::King.value(), 13);
        assert_eq!(Rank::from_value(11), Some(Rank::Jack));
        assert_eq!(Rank::from_value(0), None);
        assert_eq!(Rank::from_value(14), None);
    }

    #[test]
    fn test_suit_colors() {
        assert_eq!(Suit::Heart.color(), Color::Red);
        assert_eq!(Suit::Diamond.color(), Color::Red);
        assert_eq!(Suit::Spade.color(), Color::Black);
        assert_eq!(Suit::Club.color(), Color::Black);
    }

    #[test]
    fn test_turning() {
        let card = Card::new(CardId::new(1), Rank::Ace, Suit::Spade);
        assert!(!card.face_up);

        let up = card.turned_up();
        assert!(up.face_up);
        assert_eq!(up.id, card.id);
        assert!(!up.turned_down().face_up);
    }

    #[test]
    fn test_display() {
        let card = Card::new(CardId::new(40), Rank::Ten, Suit::Heart);
        assert_eq!(format!("{}", card), "10♥");
        assert_eq!(format!("{}", card.id), "c40");
    }

    #[test]
    fn test_card_json_shape() {
        let card = Card::new(CardId::new(7), Rank::Two, Suit::Diamond).turned_up();
        let json = serde_json::to_value(card).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"id": "c7", "rank": "two", "suit": "diamond", "faceUp": true})
        );
    }

    #[test]
    fn test_card_id_accepts_integer() {
        let card: Card =
            serde_json::from_str(r#"{"id": 7, "rank": "two", "suit": "diamond", "faceUp": false}"#)
                .unwrap();
        assert_eq!(card.id, CardId::new(7));

        assert!(serde_json::from_str::<CardId>(r#""cX""#).is_err());
        assert!(serde_json::from_str::<CardId>("300").is_err());
    }

    #[test]
    fn test_card_id_binary() {
        let bytes = bincode::serialize(&CardId::new(52)).unwrap();
        assert_eq!(bytes, vec![52]);
        assert_eq!(bincode::deserialize::<CardId>(&bytes).unwrap(), CardId::new(52));
    }
}
