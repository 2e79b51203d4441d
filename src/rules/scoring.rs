//! Game-over detection and final scoring.

use crate::cards::Rank;
use crate::core::config::ScoringRules;
use crate::core::state::GameState;

/// Every foundation holds a complete suit.
#[must_use]
pub fn is_game_over(state: &GameState) -> bool {
    state
        .foundations
        .iter()
        .all(|f| f.len() == Rank::ALL.len())
}

/// Score including the time bonus.
///
/// While the game is running this is just the score. Once it is over,
/// `round(time_bonus / duration)` is added, with the duration clamped to at
/// least one second.
#[must_use]
pub fn final_score(state: &GameState, rules: &ScoringRules) -> u32 {
    if !is_game_over(state) {
        return state.score;
    }
    let duration = state.duration.max(1);
    let bonus = (u64::from(rules.time_bonus) + duration / 2) / duration;
    state
        .score
        .saturating_add(u32::try_from(bonus).unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{build_deck, Suit};
    use crate::core::config::DrawMode;
    use crate::zones::Pile;

    fn won(score: u32, duration: u64) -> GameState {
        let deck = build_deck();
        let foundations: [Pile; 4] = std::array::from_fn(|i| {
            let suit = Suit::ALL[i];
            deck.iter()
                .filter(|c| c.suit == suit)
                .map(|c| c.turned_up())
                .collect()
        });
        GameState {
            draw_mode: DrawMode::Three,
            score,
            stock: Pile::new(),
            waste: Pile::new(),
            foundations,
            tableaux: std::array::from_fn(|_| Pile::new()),
            duration,
        }
    }

    #[test]
    fn test_game_over() {
        let state = won(0, 10);
        assert!(is_game_over(&state));
        state.check_invariants().unwrap();

        let mut partial = state.clone();
        let king = partial.foundations[2].pop_back().unwrap();
        partial.tableaux[0].push_back(king);
        assert!(!is_game_over(&partial));
    }

    #[test]
    fn test_final_score_running_game_is_score() {
        let mut state = won(120, 10);
        let king = state.foundations[0].pop_back().unwrap();
        state.waste.push_back(king);

        assert_eq!(final_score(&state, &ScoringRules::standard()), 120);
    }

    #[test]
    fn test_final_score_adds_time_bonus() {
        let rules = ScoringRules::standard();

        assert_eq!(final_score(&won(500, 100), &rules), 500 + 7000);
        // 700000 / 300 = 2333.33
        assert_eq!(final_score(&won(0, 300), &rules), 2333);
        // 700000 / 600 = 1166.67
        assert_eq!(final_score(&won(0, 600), &rules), 1167);
    }

    #[test]
    fn test_final_score_zero_duration_clamped() {
        let rules = ScoringRules::standard();
        assert_eq!(final_score(&won(10, 0), &rules), 10 + 700_000);
        assert_eq!(final_score(&won(10, 0), &rules), final_score(&won(10, 1), &rules));
    }
}
