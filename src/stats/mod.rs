//! Per-draw-mode statistics.
//!
//! A [`StatsSink`] hears about every game start and every win. [`ScoreBoard`]
//! is the stock implementation: counts, best score, and the most recent wins,
//! serialized with the same field names older score files used.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::config::DrawMode;
use crate::rules::GameResult;

/// How many wins each mode remembers.
pub const RECENT_WINS: usize = 10;

/// One completed game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    /// Final score, time bonus included.
    pub score: u32,

    /// Completion time in Unix milliseconds.
    pub date: u64,

    /// Seconds played.
    pub duration: u64,

    pub draw_mode: DrawMode,
}

impl GameRecord {
    /// Record a result completed at `date` (Unix milliseconds).
    #[must_use]
    pub fn new(result: &GameResult, date: u64) -> Self {
        Self {
            score: result.final_score,
            date,
            duration: result.duration,
            draw_mode: result.draw_mode,
        }
    }

    /// Record a result completed now.
    #[must_use]
    pub fn now(result: &GameResult) -> Self {
        let date = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or(0);
        Self::new(result, date)
    }
}

/// Receives game lifecycle events.
pub trait StatsSink {
    /// A game was dealt or restarted.
    fn record_started(&mut self, _draw_mode: DrawMode) {}

    /// A game was won. Called exactly once per completed game.
    fn record_win(&mut self, record: &GameRecord);
}

/// Discards every event.
impl StatsSink for () {
    fn record_win(&mut self, _record: &GameRecord) {}
}

/// Statistics for one draw mode.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModeStats {
    pub games_played: u32,
    pub games_won: u32,
    pub best_score: u32,

    /// Most recent wins, newest first.
    pub scores: Vec<GameRecord>,
}

impl ModeStats {
    fn record_win(&mut self, record: &GameRecord) {
        self.games_won += 1;
        self.best_score = self.best_score.max(record.score);
        self.scores.insert(0, record.clone());
        self.scores.truncate(RECENT_WINS);
    }

    /// Fraction of started games that were won.
    #[must_use]
    pub fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        f64::from(self.games_won) / f64::from(self.games_played)
    }
}

/// Statistics for both draw modes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoreBoard {
    pub draw_one: ModeStats,
    pub draw_three: ModeStats,
}

impl ScoreBoard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn mode(&self, draw_mode: DrawMode) -> &ModeStats {
        match draw_mode {
            DrawMode::One => &self.draw_one,
            DrawMode::Three => &self.draw_three,
        }
    }

    fn mode_mut(&mut self, draw_mode: DrawMode) -> &mut ModeStats {
        match draw_mode {
            DrawMode::One => &mut self.draw_one,
            DrawMode::Three => &mut self.draw_three,
        }
    }
}

impl StatsSink for ScoreBoard {
    fn record_started(&mut self, draw_mode: DrawMode) {
        self.mode_mut(draw_mode).games_played += 1;
    }

    fn record_win(&mut self, record: &GameRecord) {
        debug!(score = record.score, mode = %record.draw_mode, "recording win");
        self.mode_mut(record.draw_mode).record_win(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn win(score: u32, draw_mode: DrawMode, date: u64) -> GameRecord {
        GameRecord {
            score,
            date,
            duration: 100,
            draw_mode,
        }
    }

    #[test]
    fn test_record_from_result() {
        let result = GameResult {
            score: 500,
            final_score: 7500,
            duration: 100,
            draw_mode: DrawMode::One,
        };
        let record = GameRecord::new(&result, 1_700_000_000_000);

        assert_eq!(record.score, 7500);
        assert_eq!(record.duration, 100);
        assert_eq!(record.draw_mode, DrawMode::One);
        assert!(GameRecord::now(&result).date > 0);
    }

    #[test]
    fn test_modes_are_separate() {
        let mut board = ScoreBoard::new();
        board.record_started(DrawMode::One);
        board.record_started(DrawMode::Three);
        board.record_started(DrawMode::Three);
        board.record_win(&win(900, DrawMode::Three, 1));

        assert_eq!(board.draw_one.games_played, 1);
        assert_eq!(board.draw_one.games_won, 0);
        assert_eq!(board.draw_three.games_played, 2);
        assert_eq!(board.draw_three.games_won, 1);
        assert_eq!(board.mode(DrawMode::Three).best_score, 900);
        assert!((board.draw_three.win_rate() - 0.5).abs() < f64::EPSILON);
        assert_eq!(board.draw_one.win_rate(), 0.0);
    }

    #[test]
    fn test_best_score_and_recent_wins() {
        let mut board = ScoreBoard::new();
        for i in 0..12u64 {
            board.record_win(&win(100 + i as u32, DrawMode::One, i));
        }
        board.record_win(&win(50, DrawMode::One, 99));

        let stats = board.mode(DrawMode::One);
        assert_eq!(stats.games_won, 13);
        assert_eq!(stats.best_score, 111);
        assert_eq!(stats.scores.len(), RECENT_WINS);
        assert_eq!(stats.scores[0].date, 99);
        assert_eq!(stats.scores[1].date, 11);
    }

    #[test]
    fn test_scoreboard_json_shape() {
        let mut board = ScoreBoard::new();
        board.record_win(&win(10, DrawMode::One, 5));

        let json = serde_json::to_value(&board).unwrap();
        assert_eq!(json["drawOne"]["gamesWon"], 1);
        assert_eq!(json["drawOne"]["scores"][0]["drawMode"], 1);

        let partial: ScoreBoard = serde_json::from_str(r#"{"drawThree": {"gamesPlayed": 4}}"#).unwrap();
        assert_eq!(partial.draw_three.games_played, 4);
        assert!(partial.draw_one.scores.is_empty());
    }
}
