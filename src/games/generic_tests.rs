//! Test functions that work for every variant. They aren't tests on their own; each variant instantiates them.
use std::marker::PhantomData;

use itertools::Itertools;
use proptest::prelude::*;
use proptest::test_runner::{Config, TestRunner};
use rand::SeedableRng;
use rand::rngs::StdRng;
use strum::IntoEnumIterator;

use crate::game_state::GameState;
use crate::games::{CharType, Color, PieceType, Variant};
use crate::general::board::Board;
use crate::general::moves::Move;
use crate::general::rules::Outcome;
use crate::output::Logger;
use crate::play::play_random_game;

pub struct GenericTests<V: Variant> {
    _phantom: PhantomData<V>,
}

impl<V: Variant> GenericTests<V> {
    fn named_positions() -> Vec<GameState<V>> {
        V::named_positions()
            .into_iter()
            .map(|pos| GameState::from_fen(pos.val).unwrap())
            .collect()
    }

    /// Checks everything that must hold for any reachable position.
    fn check_position(state: &GameState<V>) {
        let board = *state.board();
        let active = state.active();
        assert!(board.verify().is_ok(), "{state}");
        assert!(!board.is_in_check(active.other()), "{state}");
        assert_eq!(GameState::<V>::from_fen(&state.as_fen()).unwrap().as_fen(), state.as_fen());
        let moves = state.legal_moves();
        assert_eq!(moves.len(), moves.iter().unique().count());
        assert_eq!(state.is_over(), moves.is_empty());
        for mov in &moves {
            let piece = board.piece_at(mov.from).unwrap();
            assert_eq!(piece.side, active);
            assert!(board.piece_at(mov.to).is_none_or(|target| target.side != active));
            let after = board.with_move(*mov);
            assert!(!after.is_in_check(active), "{0} leaves {active} in check in {state}", mov.text(V::SIZE));
            assert_eq!(after.piece_at(mov.to).unwrap().id(), piece.id());
            assert!(after.is_empty(mov.from));
        }
        // the board is a value, nothing above changed it
        assert_eq!(&board, state.board());
    }

    fn startpos_test() {
        let state = GameState::<V>::default();
        assert_eq!(state.as_fen(), V::START_FEN);
        assert_eq!(*state.board(), Board::<V>::startpos());
        assert_eq!(state.outcome(), Outcome::Ongoing);
        assert!(!state.legal_moves().is_empty());
        for side in V::Color::iter() {
            assert!(Board::<V>::startpos().has_legal_moves(side));
            assert_eq!(
                Board::<V>::startpos().pieces_of(side).count(),
                Board::<V>::startpos().pieces_of(side.other()).count()
            );
        }
        Self::check_position(&state);
    }

    fn named_positions_test() {
        assert!(V::named_positions().iter().any(|pos| pos.name == "startpos"));
        for state in Self::named_positions() {
            Self::check_position(&state);
        }
    }

    fn piece_char_test() {
        for kind in V::PieceType::iter() {
            for side in V::Color::iter() {
                let c = kind.to_char(side, CharType::Ascii);
                assert_eq!(V::PieceType::from_char(c), Some((kind, side)));
                assert_eq!(c.is_ascii_uppercase(), side.is_first());
                assert!(!kind.to_char(side, CharType::Unicode).is_ascii());
            }
        }
        assert_eq!(V::PieceType::iter().filter(|kind| kind.is_royal()).count(), 1);
        for side in V::Color::iter() {
            assert_eq!(V::Color::from_char(side.to_char()), Some(side));
        }
    }

    fn legal_targets_test() {
        for state in Self::named_positions() {
            let board = *state.board();
            for (pos, piece) in board.pieces() {
                let first = board.legal_targets(pos);
                // repeated queries give the same answer and don't change the board
                assert_eq!(board.legal_targets(pos), first);
                assert_eq!(&board, state.board());
                assert!(first.iter().all(|to| board.pseudolegal_targets(pos).contains(to)));
                let from_state = state.legal_targets(pos);
                if piece.side == state.active() {
                    assert_eq!(from_state, first);
                } else {
                    assert!(from_state.is_empty());
                }
            }
            let all = board.legal_moves(state.active());
            let by_piece = board
                .pieces_of(state.active())
                .flat_map(|(from, _)| board.legal_targets(from).into_iter().map(move |to| Move::new(from, to)))
                .collect_vec();
            assert_eq!(all, by_piece);
        }
    }

    /// Random games from the start position, with every position along the way checked.
    fn random_playout_test() {
        let cases = if cfg!(debug_assertions) { 8 } else { 64 };
        let mut runner = TestRunner::new(Config::with_cases(cases));
        runner
            .run(&(any::<u64>(), 1_usize..60), |(seed, plies)| {
                let mut rng = StdRng::seed_from_u64(seed);
                let end = play_random_game(GameState::<V>::default(), &mut rng, plies, &mut Logger::silent());
                prop_assert!(end.ply() <= plies);
                // replay the game move by move
                let mut state = GameState::<V>::default();
                for &mov in end.history() {
                    Self::check_position(&state);
                    let num_pieces = state.board().num_pieces();
                    let capture = state.board().piece_at(mov.to).is_some();
                    let next = state.play(mov).unwrap();
                    prop_assert_eq!(next.board().num_pieces(), num_pieces - usize::from(capture));
                    prop_assert_eq!(next.active(), state.active().other());
                    state = next;
                }
                Self::check_position(&state);
                prop_assert_eq!(&state, &end);
                let captured = V::Color::iter().map(|side| end.captured_from(side).len()).sum::<usize>();
                prop_assert_eq!(captured + end.board().num_pieces(), Board::<V>::startpos().num_pieces());
                Ok(())
            })
            .unwrap();
    }

    pub fn all_tests() {
        Self::startpos_test();
        Self::named_positions_test();
        Self::piece_char_test();
        Self::legal_targets_test();
        Self::random_playout_test();
    }
}
