//! Rules engine: the Klondike transition function.
//!
//! `RulesEngine::apply_action` takes a snapshot and a resolved action and
//! returns the next snapshot. The input is never modified; the output shares
//! every untouched pile with it.
//!
//! | Action | Effect | Score |
//! |---|---|---|
//! | draw | up to `draw_mode` stock cards, turned up, reversed onto waste | - |
//! | reset_waste | waste turned down, reversed, becomes stock | draw-1: -100, floored |
//! | waste → tableau | top waste card to tableau | +5 |
//! | tableau → tableau | run from card to end; origin top turned up | +5 unless a hidden card was revealed |
//! | tableau → foundation | top card; origin top turned up | +10 |
//! | waste → foundation | top waste card | +10 |
//! | foundation → tableau | top foundation card | -15, floored |
//! | foundation → foundation | top foundation card | - |
//! | invalid_move | none | - |
//! | update_duration | duration + 1 | - |

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, instrument};

use super::resolve::{self, Selection};
use super::scoring::{final_score, is_game_over};
use crate::cards::{build_deck, deal, shuffle, CardId};
use crate::core::action::{Action, ActionKind, MovePayload};
use crate::core::config::{DrawMode, GameConfig, ScoringRules};
use crate::core::error::{EngineError, Result};
use crate::core::rng::GameRng;
use crate::core::state::GameState;
use crate::history::History;
use crate::zones::pile::{reveal_top, take_top};
use crate::zones::{Pile, PileId};

/// Result of a completed game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    /// Score before the time bonus.
    pub score: u32,

    /// Score including the time bonus.
    pub final_score: u32,

    /// Seconds played.
    pub duration: u64,

    pub draw_mode: DrawMode,
}

/// Rules engine trait.
///
/// The session calls these methods on every player action.
///
/// ## Implementation Notes
///
/// - `apply_action`: must be deterministic and must not touch its input
/// - `is_terminal`: return `None` while the game continues
pub trait RulesEngine {
    /// Get the game configuration.
    fn config(&self) -> &GameConfig;

    /// Apply a resolved action, producing the next snapshot.
    ///
    /// Errors mean the action was not produced by resolution against this
    /// state; they are caller bugs, never illegal player moves.
    fn apply_action(&self, state: &GameState, action: &Action) -> Result<GameState>;

    /// Check if the game is over.
    fn is_terminal(&self, state: &GameState) -> Option<GameResult>;

    // === Convenience Methods ===

    /// Every pile `selection` could legally be dropped on.
    fn legal_destinations(&self, state: &GameState, selection: Selection) -> SmallVec<[PileId; 11]> {
        resolve::legal_destinations(state, selection)
    }

    /// Apply `action` to the snapshot at `cursor` and commit the result.
    ///
    /// Returns the new cursor. Clock ticks rewrite the cursor snapshot in
    /// place and leave the cursor where it is; everything else truncates any
    /// redoable states and appends.
    fn apply_move(&self, history: &mut History, cursor: usize, action: &Action) -> Result<usize> {
        let next = self.apply_action(history.get(cursor)?, action)?;
        if *action == Action::UpdateDuration {
            history.replace(cursor, next)?;
            return Ok(cursor);
        }
        history.commit(cursor, next)
    }

    /// `apply_move` with the action given by wire name.
    fn apply_named_move(
        &self,
        history: &mut History,
        cursor: usize,
        kind: &str,
        payload: Option<MovePayload>,
    ) -> Result<usize> {
        let action = Action::from_parts(kind, payload)?;
        self.apply_move(history, cursor, &action)
    }
}

/// Standard Klondike rules.
#[derive(Clone, Debug, Default)]
pub struct Klondike {
    config: GameConfig,
}

impl Klondike {
    /// Create a rules engine for the given configuration.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self { config }
    }

    fn scoring(&self) -> &ScoringRules {
        &self.config.scoring
    }

    /// Shuffle a fresh deck and deal the opening state.
    ///
    /// Uses the configured seed if there is one.
    #[instrument(skip(self), fields(draw_mode = %self.config.draw_mode))]
    pub fn deal(&self) -> GameState {
        let mut rng = match self.config.seed {
            Some(seed) => GameRng::new(seed),
            None => GameRng::from_entropy(),
        };
        debug!(seed = rng.seed(), "dealing");

        let mut deck = build_deck();
        shuffle(&mut deck, &mut rng);
        GameState::from_deal(deal(deck), self.config.draw_mode)
    }

    /// Deal a new game and start its history.
    #[must_use]
    pub fn new_game(&self) -> (GameState, History) {
        let state = self.deal();
        let history = History::new(state.clone());
        (state, history)
    }

    fn draw(&self, mut next: GameState) -> Result<GameState> {
        if next.stock.is_empty() {
            return Err(EngineError::IllegalTransition {
                action: ActionKind::Draw,
                reason: "stock is empty",
            });
        }
        let count = next.draw_mode.count().min(next.stock.len());
        let drawn = next.stock.split_off(next.stock.len() - count);
        next.waste
            .append(drawn.iter().rev().map(|c| c.turned_up()).collect());
        Ok(next)
    }

    fn reset_waste(&self, mut next: GameState) -> Result<GameState> {
        if !next.stock.is_empty() {
            return Err(EngineError::IllegalTransition {
                action: ActionKind::ResetWaste,
                reason: "stock is not empty",
            });
        }
        next.stock = next.waste.iter().rev().map(|c| c.turned_down()).collect();
        next.waste = Pile::new();
        if next.draw_mode == DrawMode::One {
            next.score = next.score.saturating_sub(self.scoring().recycle_penalty);
        }
        Ok(next)
    }

    fn waste_to_tableau(&self, mut next: GameState, card: CardId, target: u8) -> Result<GameState> {
        let moving = take_top(&mut next.waste, card, PileId::Waste)?;
        next.pile_mut(PileId::Tableau(target))?.push_back(moving.turned_up());
        next.score = next.score.saturating_add(self.scoring().waste_to_tableau);
        Ok(next)
    }

    fn tableau_to_tableau(&self, mut next: GameState, card: CardId, target: u8) -> Result<GameState> {
        let dest = PileId::Tableau(target).checked()?;
        let (origin, pos) = find_in(&next, card, PileId::is_tableau)?;
        if origin == dest {
            return Err(EngineError::IllegalTransition {
                action: ActionKind::MoveTableauToTableau,
                reason: "origin and destination are the same tableau",
            });
        }

        let pile = next.pile_mut(origin)?;
        if !pile[pos].face_up {
            return Err(EngineError::CardNotExposed { card, pile: origin });
        }
        let run = pile.split_off(pos);
        let revealed = reveal_top(pile);

        next.pile_mut(dest)?.append(run);
        if !revealed {
            next.score = next.score.saturating_add(self.scoring().tableau_run);
        }
        Ok(next)
    }

    fn tableau_to_foundation(&self, mut next: GameState, card: CardId, target: u8) -> Result<GameState> {
        let dest = PileId::Foundation(target).checked()?;
        let (origin, _) = find_in(&next, card, PileId::is_tableau)?;

        let pile = next.pile_mut(origin)?;
        let moving = take_top(pile, card, origin)?;
        reveal_top(pile);

        next.pile_mut(dest)?.push_back(moving.turned_up());
        next.score = next.score.saturating_add(self.scoring().to_foundation);
        Ok(next)
    }

    fn waste_to_foundation(&self, mut next: GameState, card: CardId, target: u8) -> Result<GameState> {
        let dest = PileId::Foundation(target).checked()?;
        let moving = take_top(&mut next.waste, card, PileId::Waste)?;
        next.pile_mut(dest)?.push_back(moving.turned_up());
        next.score = next.score.saturating_add(self.scoring().to_foundation);
        Ok(next)
    }

    fn foundation_to_tableau(&self, mut next: GameState, card: CardId, target: u8) -> Result<GameState> {
        let dest = PileId::Tableau(target).checked()?;
        let (origin, _) = find_in(&next, card, PileId::is_foundation)?;
        let moving = take_top(next.pile_mut(origin)?, card, origin)?;

        next.pile_mut(dest)?.push_back(moving);
        next.score = next
            .score
            .saturating_sub(self.scoring().foundation_to_tableau_penalty);
        Ok(next)
    }

    fn foundation_to_foundation(&self, mut next: GameState, card: CardId, target: u8) -> Result<GameState> {
        let dest = PileId::Foundation(target).checked()?;
        let (origin, _) = find_in(&next, card, PileId::is_foundation)?;
        let moving = take_top(next.pile_mut(origin)?, card, origin)?;

        next.pile_mut(dest)?.push_back(moving);
        Ok(next)
    }
}

/// Locate `card` and require its pile to satisfy `kind`.
fn find_in(state: &GameState, card: CardId, kind: fn(PileId) -> bool) -> Result<(PileId, usize)> {
    match state.locate(card) {
        Some((pile, pos)) if kind(pile) => Ok((pile, pos)),
        Some((pile, _)) => Err(EngineError::CardNotFound { card, pile }),
        None => Err(EngineError::CardNotFound {
            card,
            pile: PileId::Stock,
        }),
    }
}

impl RulesEngine for Klondike {
    fn config(&self) -> &GameConfig {
        &self.config
    }

    fn apply_action(&self, state: &GameState, action: &Action) -> Result<GameState> {
        let next = state.clone();
        let next = match *action {
            Action::Draw => self.draw(next)?,
            Action::ResetWaste => self.reset_waste(next)?,
            Action::MoveWasteToTableau { card, target } => self.waste_to_tableau(next, card, target)?,
            Action::MoveTableauToTableau { card, target } => {
                self.tableau_to_tableau(next, card, target)?
            }
            Action::MoveTableauToFoundation { card, target } => {
                self.tableau_to_foundation(next, card, target)?
            }
            Action::MoveWasteToFoundation { card, target } => {
                self.waste_to_foundation(next, card, target)?
            }
            Action::MoveFoundationToTableau { card, target } => {
                self.foundation_to_tableau(next, card, target)?
            }
            Action::MoveFoundationToFoundation { card, target } => {
                self.foundation_to_foundation(next, card, target)?
            }
            Action::InvalidMove => next,
            Action::UpdateDuration => GameState {
                duration: next.duration + 1,
                ..next
            },
        };
        Ok(next)
    }

    fn is_terminal(&self, state: &GameState) -> Option<GameResult> {
        if !is_game_over(state) {
            return None;
        }
        Some(GameResult {
            score: state.score,
            final_score: final_score(state, self.scoring()),
            duration: state.duration,
            draw_mode: state.draw_mode,
        })
    }
}
