//! Property tests: deal invariants and card conservation under random play.

use proptest::prelude::*;

use klondike_engine::rules::{resolve_move, resolve_stock_click, Klondike, RulesEngine};
use klondike_engine::{
    Action, DrawMode, GameConfig, GameState, History, PileExt, PileId, Selection,
};

/// One random player input, as indices into `PileId::all()`.
#[derive(Clone, Debug)]
enum Input {
    Stock,
    Drop { origin: usize, depth: usize, dest: usize },
    Undo,
}

fn input() -> impl Strategy<Value = Input> {
    prop_oneof![
        2 => Just(Input::Stock),
        6 => (0usize..13, 0usize..13, 0usize..13)
            .prop_map(|(origin, depth, dest)| Input::Drop { origin, depth, dest }),
        1 => Just(Input::Undo),
    ]
}

fn draw_mode() -> impl Strategy<Value = DrawMode> {
    prop_oneof![Just(DrawMode::One), Just(DrawMode::Three)]
}

fn pile_at(index: usize) -> PileId {
    PileId::all().nth(index % 13).unwrap_or(PileId::Stock)
}

/// Turn an input into an action the way a UI would.
fn resolve(state: &GameState, input: &Input) -> Option<Action> {
    match *input {
        Input::Stock => Some(resolve_stock_click(state)),
        Input::Undo => None,
        Input::Drop { origin, depth, dest } => {
            let origin = pile_at(origin);
            let pile = state.pile(origin).ok()?;
            // pick a card `depth` below the top, clamped to the pile
            let card = pile.iter().rev().nth(depth.min(pile.len().saturating_sub(1)))?;
            Some(resolve_move(state, Selection::new(card.id, origin), pile_at(dest)))
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_fresh_deal_is_valid(seed in any::<u64>(), mode in draw_mode()) {
        let state = Klondike::new(GameConfig::new(mode).with_seed(seed)).deal();

        prop_assert!(state.check_invariants().is_ok());
        prop_assert_eq!(state.stock.len(), 24);
        prop_assert_eq!(state.draw_mode, mode);
        for (i, tableau) in state.tableaux.iter().enumerate() {
            prop_assert_eq!(tableau.len(), i + 1);
            let face_up = tableau.iter().filter(|c| c.face_up).count();
            prop_assert_eq!(face_up, 1);
            prop_assert!(tableau.top().is_some_and(|c| c.face_up));
        }
    }

    #[test]
    fn prop_random_play_conserves_cards(
        seed in any::<u64>(),
        mode in draw_mode(),
        inputs in prop::collection::vec(input(), 1..120),
    ) {
        let rules = Klondike::new(GameConfig::new(mode).with_seed(seed));
        let (_, mut history) = rules.new_game();

        for input in &inputs {
            let Some(action) = resolve(history.current(), input) else {
                history.undo();
                continue;
            };
            let before = history.current().clone();
            let cursor = history.cursor();
            let next_cursor = rules.apply_move(&mut history, cursor, &action).unwrap();
            let after = history.current();

            prop_assert_eq!(next_cursor, cursor + 1);
            prop_assert!(after.check_invariants().is_ok());
            prop_assert!(after.check_layout().is_ok());
            prop_assert_eq!(after.draw_mode, mode);
            if action == Action::InvalidMove {
                prop_assert_eq!(after, &before);
            }
            // every tableau keeps its face-down cards underneath
            for tableau in &after.tableaux {
                let first_up = tableau.iter().position(|c| c.face_up).unwrap_or(tableau.len());
                prop_assert!(tableau.iter().skip(first_up).all(|c| c.face_up));
                prop_assert!(tableau.is_empty() || tableau.top().is_some_and(|c| c.face_up));
            }
        }
    }

    #[test]
    fn prop_undo_all_returns_to_deal(
        seed in any::<u64>(),
        inputs in prop::collection::vec(input(), 1..60),
    ) {
        let rules = Klondike::new(GameConfig::new(DrawMode::Three).with_seed(seed));
        let (opening, mut history) = rules.new_game();

        for input in &inputs {
            if let Some(action) = resolve(history.current(), input) {
                let cursor = history.cursor();
                rules.apply_move(&mut history, cursor, &action).unwrap();
            }
        }
        while history.undo() {}

        prop_assert_eq!(history.current(), &opening);
    }

    #[test]
    fn prop_history_round_trips(
        seed in any::<u64>(),
        inputs in prop::collection::vec(input(), 1..40),
    ) {
        let rules = Klondike::new(GameConfig::new(DrawMode::One).with_seed(seed));
        let (_, mut history) = rules.new_game();
        for input in &inputs {
            if let Some(action) = resolve(history.current(), input) {
                let cursor = history.cursor();
                rules.apply_move(&mut history, cursor, &action).unwrap();
            }
        }

        let json = klondike_engine::persist::to_json(&history).unwrap();
        let restored = klondike_engine::restore_game(&json).unwrap();
        prop_assert_eq!(&restored.history, &history);

        let bytes = klondike_engine::persist::to_bytes(&history).unwrap();
        let restored: History = klondike_engine::persist::from_bytes(&bytes).unwrap().history;
        prop_assert_eq!(&restored, &history);
    }
}
