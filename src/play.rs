/*
 *  Gambits, rule engines for chess-like grid games.
 *  Copyright (C) 2024 ToTheAnd
 *
 *  Gambits is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  Gambits is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 *  GNU General Public License for more details.
 *
 *  You should have received a copy of the GNU General Public License
 *  along with Gambits. If not, see <https://www.gnu.org/licenses/>.
 */

//! Random self-play. Useful to explore the rules and to check that every reachable position is consistent.

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::game_state::GameState;
use crate::games::Variant;
use crate::general::moves::Move;
use crate::output::{Logger, Message};

/// A uniformly chosen legal move, or `None` if the game is over.
pub fn random_legal_move<V: Variant, R: Rng + ?Sized>(state: &GameState<V>, rng: &mut R) -> Option<Move> {
    state.legal_moves().choose(rng).copied()
}

/// Plays random moves until the game ends or `max_plies` moves have been played, and returns the final state.
/// Moves are logged as debug messages, captures and the result as info messages.
pub fn play_random_game<V: Variant, R: Rng + ?Sized>(
    mut state: GameState<V>,
    rng: &mut R,
    max_plies: usize,
    logger: &mut Logger,
) -> GameState<V> {
    let size = V::SIZE;
    for ply in 0..max_plies {
        let Some(mov) = random_legal_move(&state, rng) else {
            break;
        };
        let mover = state.active();
        if let Some(victim) = state.board().piece_at(mov.to) {
            logger.display_message(
                Message::Info,
                &format!("{mover} captures the {0} on {1}", victim.label(), mov.to.algebraic(size)),
            );
        }
        // `mov` comes from the legal moves of `state`, so it can't be rejected
        state = match state.play(mov) {
            Ok(next) => next,
            Err(err) => {
                logger.display_message(Message::Error, &format!("Random move {0} was rejected: {err}", mov.text(size)));
                break;
            }
        };
        logger.display_message(Message::Debug, &format!("{0}. {mover}: {1}", ply + 1, mov.text(size)));
    }
    let summary = match (state.is_over(), state.winner()) {
        (false, _) => format!("No result after {} plies", state.ply()),
        (true, Some(winner)) => format!("{winner} wins after {} plies", state.ply()),
        (true, None) => format!("Draw after {} plies", state.ply()),
    };
    logger.display_message(Message::Info, &summary);
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::chess::Chess;
    use crate::games::xiangqi::Xiangqi;
    use crate::output::TextStream;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn random_move_test() {
        let mut rng = StdRng::seed_from_u64(42);
        let state = GameState::<Chess>::default();
        for _ in 0..20 {
            let mov = random_legal_move(&state, &mut rng).unwrap();
            assert!(state.legal_moves().contains(&mov));
        }
        let mate = GameState::<Chess>::from_fen("k7/1Q6/1K6/8/8/8/8/8 b").unwrap();
        assert_eq!(random_legal_move(&mate, &mut rng), None);
    }

    #[test]
    fn random_game_test() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut logger = Logger::with_debug(TextStream::Memory(vec![]), true);
        let state = play_random_game(GameState::<Xiangqi>::default(), &mut rng, 30, &mut logger);
        assert!(state.ply() <= 30);
        assert!(state.is_over() || state.ply() == 30);
        let log = logger.stream.contents().unwrap();
        assert!(log.contains("1. red: "));
        assert!(log.contains("plies"));

        // the same seed gives the same game
        let mut rng = StdRng::seed_from_u64(0);
        let again = play_random_game(GameState::<Xiangqi>::default(), &mut rng, 30, &mut Logger::silent());
        assert_eq!(again, state);
    }

    #[test]
    fn finished_game_test() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut logger = Logger::with_debug(TextStream::Memory(vec![]), false);
        let stalemate = GameState::<Xiangqi>::from_fen("4k4/R8/9/9/9/3R1R3/9/9/9/3K5 b").unwrap();
        let state = play_random_game(stalemate.clone(), &mut rng, 10, &mut logger);
        assert_eq!(state, stalemate);
        assert!(logger.stream.contents().unwrap().contains("red wins after 0 plies"));
    }
}
