//! Game configuration types.
//!
//! Callers configure a game at startup by providing:
//! - `DrawMode`: how many cards a draw moves from stock to waste
//! - `ScoringRules`: every point value the engine awards or deducts
//! - `GameConfig`: combines the two with an optional deal seed
//!
//! The engine never hardcodes point values - it reads them from `ScoringRules`.

use serde::{Deserialize, Serialize};

/// Number of cards moved per draw. Fixed for the lifetime of a game.
///
/// Serialized as the bare integer `1` or `3`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DrawMode {
    /// Draw one card; recycling the waste costs points.
    One,
    /// Draw three cards; recycling is free.
    #[default]
    Three,
}

impl DrawMode {
    /// Cards moved per draw.
    #[must_use]
    pub const fn count(self) -> usize {
        match self {
            DrawMode::One => 1,
            DrawMode::Three => 3,
        }
    }
}

impl TryFrom<u8> for DrawMode {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(DrawMode::One),
            3 => Ok(DrawMode::Three),
            other => Err(format!("draw mode must be 1 or 3, got {}", other)),
        }
    }
}

impl From<DrawMode> for u8 {
    fn from(mode: DrawMode) -> Self {
        mode.count() as u8
    }
}

impl std::fmt::Display for DrawMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Draw {}", self.count())
    }
}

/// Point values for every scored transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringRules {
    /// Waste card placed on a tableau.
    pub waste_to_tableau: u32,

    /// Tableau run moved without revealing a face-down card.
    pub tableau_run: u32,

    /// Any card placed on a foundation from waste or tableau.
    pub to_foundation: u32,

    /// Deducted when a foundation card returns to a tableau.
    pub foundation_to_tableau_penalty: u32,

    /// Deducted on waste recycle in draw-one games.
    pub recycle_penalty: u32,

    /// Numerator of the time bonus: `round(time_bonus / seconds)`.
    pub time_bonus: u32,
}

impl ScoringRules {
    /// Standard Windows-style Klondike scoring.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            waste_to_tableau: 5,
            tableau_run: 5,
            to_foundation: 10,
            foundation_to_tableau_penalty: 15,
            recycle_penalty: 100,
            time_bonus: 700_000,
        }
    }
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self::standard()
    }
}

/// Complete game configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    /// Cards per draw.
    pub draw_mode: DrawMode,

    /// Deal seed. `None` draws one from the entropy source.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Point values.
    #[serde(default)]
    pub scoring: ScoringRules,
}

impl GameConfig {
    /// Create a configuration with standard scoring and a random deal.
    pub fn new(draw_mode: DrawMode) -> Self {
        Self {
            draw_mode,
            seed: None,
            scoring: ScoringRules::standard(),
        }
    }

    /// Fix the deal seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Replace the scoring rules.
    #[must_use]
    pub fn with_scoring(mut self, scoring: ScoringRules) -> Self {
        self.scoring = scoring;
        self
    }
}
