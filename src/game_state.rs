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

//! The state of a game in progress: the board, the side to move, the outcome so far, captured pieces and the moves
//! that led here. A [`GameState`] is never changed in place; [`GameState::play`] returns the successor state.

use std::fmt;
use std::fmt::{Display, Formatter};

use anyhow::{bail, ensure};
use colored::Colorize;
use itertools::Itertools;
use strum::IntoEnumIterator;

use crate::games::{Color, Variant};
use crate::general::board::{Board, Piece};
use crate::general::common::Res;
use crate::general::movegen::Targets;
use crate::general::moves::Move;
use crate::general::rules::{Outcome, StalemateRule};
use crate::general::squares::Position;

/// Runtime options of a game. Anything left at `None` uses the variant's rule.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
#[must_use]
pub struct GameSettings {
    pub stalemate: Option<StalemateRule>,
}

impl GameSettings {
    pub fn stalemate_rule<V: Variant>(self) -> StalemateRule {
        self.stalemate.unwrap_or(V::STALEMATE)
    }
}

/// Why [`GameState::play`] rejected a move. The state it was called on is unaffected.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum MoveError {
    #[error("the game is already over")]
    GameOver,
    #[error("there is no piece on {0}")]
    EmptySquare(Position),
    #[error("the piece on {0} belongs to the opponent")]
    OpponentPiece(Position),
    #[error("the piece on {from} can't move to {to}")]
    IllegalDestination { from: Position, to: Position },
}

#[derive(Debug, Clone, Eq, PartialEq)]
#[must_use]
pub struct GameState<V: Variant> {
    board: Board<V>,
    active: V::Color,
    outcome: Outcome<V::Color>,
    settings: GameSettings,
    captured: Vec<Piece<V>>,
    history: Vec<Move>,
}

impl<V: Variant> Default for GameState<V> {
    fn default() -> Self {
        Self::new(GameSettings::default())
    }
}

impl<V: Variant> GameState<V> {
    /// A new game from the start position, with the first side to move.
    pub fn new(settings: GameSettings) -> Self {
        Self::from_board(V::startpos(), V::Color::first(), settings)
    }

    fn from_board(board: Board<V>, active: V::Color, settings: GameSettings) -> Self {
        Self {
            board,
            active,
            outcome: board.outcome(active),
            settings,
            captured: vec![],
            history: vec![],
        }
    }

    /// Parses `<placement> [<side to move>]`, e.g. `4k3/8/8/8/8/8/8/R3K3 b`. Without a side, the first side moves.
    ///
    /// Rejects positions that can't come up in a game: each side needs exactly one royal piece,
    /// and the side that just moved can't be in check.
    pub fn from_fen(fen: &str) -> Res<Self> {
        let parts = fen.split_whitespace().collect_vec();
        let (placement, active) = match parts.as_slice() {
            [placement] => (*placement, V::Color::first()),
            [placement, side] => {
                let mut chars = side.chars();
                let (Some(c), None) = (chars.next(), chars.next()) else {
                    bail!("The side to move must be a single character, not '{}'", side.red())
                };
                let Some(color) = V::Color::from_char(c) else {
                    bail!(
                        "Invalid side to move '{0}', expected one of {1}",
                        side.red(),
                        V::Color::iter().map(|c| c.to_char()).join(", ")
                    )
                };
                (*placement, color)
            }
            [] => bail!("Empty position"),
            _ => bail!(
                "Too many parts in '{}', expected the piece placement and the side to move",
                fen.red()
            ),
        };
        let board = Board::from_fen_placement(placement)?;
        board.verify()?;
        ensure!(
            !board.is_in_check(active.other()),
            "{0} is in check, but it's {1}'s turn",
            active.other(),
            active
        );
        Ok(Self::from_board(board, active, GameSettings::default()))
    }

    pub fn with_settings(mut self, settings: GameSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn as_fen(&self) -> String {
        format!("{0} {1}", self.board.fen_placement(), self.active.to_char())
    }

    pub fn board(&self) -> &Board<V> {
        &self.board
    }

    pub fn active(&self) -> V::Color {
        self.active
    }

    pub fn outcome(&self) -> Outcome<V::Color> {
        self.outcome
    }

    pub fn settings(&self) -> GameSettings {
        self.settings
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Number of moves played since this state was created from a position.
    pub fn ply(&self) -> usize {
        self.history.len()
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_over()
    }

    /// The winner once the game is over, using the stalemate rule of the settings. `None` for a draw.
    pub fn winner(&self) -> Option<V::Color> {
        self.outcome.winner(self.settings.stalemate_rule::<V>())
    }

    /// Pieces of `side` that were captured so far, in the display order of the piece types.
    pub fn captured_from(&self, side: V::Color) -> Vec<Piece<V>> {
        let order = |piece: &Piece<V>| V::PieceType::iter().position(|kind| kind == piece.kind);
        self.captured
            .iter()
            .filter(|piece| piece.side == side)
            .copied()
            .sorted_by_key(order)
            .collect()
    }

    /// The legal destinations of the piece on `pos`. Empty unless it belongs to the side to move.
    pub fn legal_targets(&self, pos: Position) -> Targets {
        match self.board.piece_at(pos) {
            Some(piece) if piece.side == self.active && !self.is_over() => self.board.legal_targets(pos),
            _ => Targets::new(),
        }
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        if self.is_over() {
            return vec![];
        }
        self.board.legal_moves(self.active)
    }

    /// Plays `mov` and returns the resulting state. `self` is left as it was, even if the move is rejected.
    pub fn play(&self, mov: Move) -> Result<Self, MoveError> {
        if self.is_over() {
            return Err(MoveError::GameOver);
        }
        let Some(piece) = self.board.piece_at(mov.from) else {
            return Err(MoveError::EmptySquare(mov.from));
        };
        if piece.side != self.active {
            return Err(MoveError::OpponentPiece(mov.from));
        }
        if !self.board.is_move_legal(mov) {
            return Err(MoveError::IllegalDestination {
                from: mov.from,
                to: mov.to,
            });
        }
        let mut captured = self.captured.clone();
        captured.extend(self.board.piece_at(mov.to));
        let mut history = self.history.clone();
        history.push(mov);
        let board = self.board.with_move(mov);
        let active = self.active.other();
        Ok(Self {
            board,
            active,
            outcome: board.outcome(active),
            settings: self.settings,
            captured,
            history,
        })
    }
}

impl<V: Variant> Display for GameState<V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_fen())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::chess::ChessColor::{Black, White};
    use crate::games::chess::ChessPieceType::{Bishop, Knight, Pawn, Queen};
    use crate::games::chess::{Chess, START_FEN};
    use crate::games::xiangqi::XiangqiColor::Red;
    use crate::games::xiangqi::Xiangqi;

    fn mov<V: Variant>(text: &str) -> Move {
        Move::parse(text, V::SIZE).unwrap()
    }

    fn play_all<V: Variant>(state: GameState<V>, moves: &[&str]) -> GameState<V> {
        moves
            .iter()
            .fold(state, |state, text| state.play(mov::<V>(text)).unwrap())
    }

    #[test]
    fn new_game_test() {
        let state = GameState::<Chess>::default();
        assert_eq!(state.as_fen(), START_FEN);
        assert_eq!(state.active(), White);
        assert_eq!(state.outcome(), Outcome::Ongoing);
        assert_eq!(state.legal_moves().len(), 20);
        assert_eq!(state.ply(), 0);
        assert!(state.captured_from(White).is_empty());
        assert_eq!(GameState::<Chess>::from_fen(START_FEN).unwrap(), state);
        let state = GameState::<Xiangqi>::default();
        assert_eq!(state.active(), Red);
        assert_eq!(state.to_string(), crate::games::xiangqi::START_FEN);
    }

    #[test]
    fn fen_test() {
        let state = GameState::<Chess>::from_fen("4k3/8/8/8/8/8/8/R3K3 b").unwrap();
        assert_eq!(state.active(), Black);
        assert_eq!(state.as_fen(), "4k3/8/8/8/8/8/8/R3K3 b");
        let state = GameState::<Chess>::from_fen("4k3/8/8/8/8/8/8/R3K3").unwrap();
        assert_eq!(state.active(), White);
        let state = GameState::<Xiangqi>::from_fen("4k4/9/9/9/9/9/9/9/9/3K5 r").unwrap();
        assert_eq!(state.active(), Red);
        assert_eq!(state.as_fen(), "4k4/9/9/9/9/9/9/9/9/3K5 w");

        assert!(GameState::<Chess>::from_fen("").is_err());
        assert!(GameState::<Chess>::from_fen("4k3/8/8/8/8/8/8/R3K3 x").is_err());
        assert!(GameState::<Chess>::from_fen("4k3/8/8/8/8/8/8/R3K3 bw").is_err());
        assert!(GameState::<Chess>::from_fen("4k3/8/8/8/8/8/8/R3K3 b 0 1").is_err());
        // missing king
        assert!(GameState::<Chess>::from_fen("8/8/8/8/8/8/8/R3K3 b").is_err());
        // black is in check, so it can't be white's turn
        assert!(GameState::<Chess>::from_fen("R3k3/8/8/8/8/8/8/4K3 w").is_err());
        assert!(GameState::<Chess>::from_fen("R3k3/8/8/8/8/8/8/4K3 b").is_ok());
        // facing generals
        assert!(GameState::<Xiangqi>::from_fen("4k4/9/9/9/9/9/9/9/9/4K4 w").is_err());
    }

    #[test]
    fn play_test() {
        let start = GameState::<Chess>::default();
        let state = start.play(mov::<Chess>("e2e4")).unwrap();
        assert_eq!(state.active(), Black);
        assert_eq!(state.history(), &[mov::<Chess>("e2e4")]);
        assert_eq!(state.as_fen(), "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b");
        // the original state is unchanged
        assert_eq!(start, GameState::default());
        assert!(state.board().piece_at(mov::<Chess>("e2e4").to).unwrap().has_moved);
    }

    #[test]
    fn rejected_moves_test() {
        let state = GameState::<Chess>::default();
        assert_eq!(
            state.play(mov::<Chess>("e3e4")),
            Err(MoveError::EmptySquare(Position::new(5, 4)))
        );
        assert_eq!(
            state.play(mov::<Chess>("e7e5")),
            Err(MoveError::OpponentPiece(Position::new(1, 4)))
        );
        assert_eq!(
            state.play(mov::<Chess>("e2e5")),
            Err(MoveError::IllegalDestination {
                from: Position::new(6, 4),
                to: Position::new(3, 4)
            })
        );
        assert!(state.play(mov::<Chess>("e1e2")).is_err());
        assert!(state.legal_targets(Position::new(1, 4)).is_empty());
        assert_eq!(state.legal_targets(Position::new(6, 4)).len(), 2);
        assert_eq!(state, GameState::default());
    }

    #[test]
    fn fools_mate_test() {
        let state = play_all(GameState::<Chess>::default(), &["f2f3", "e7e5", "g2g4", "d8h4"]);
        assert_eq!(state.outcome(), Outcome::Checkmate { winner: Black });
        assert!(state.is_over());
        assert_eq!(state.winner(), Some(Black));
        assert!(state.legal_moves().is_empty());
        assert!(state.legal_targets(Position::new(6, 0)).is_empty());
        // the game is over, even for moves that would be pseudo-legal
        assert_eq!(state.play(mov::<Chess>("a2a3")), Err(MoveError::GameOver));
    }

    #[test]
    fn captures_test() {
        let state = play_all(
            GameState::<Chess>::default(),
            &["e2e4", "d7d5", "e4d5", "d8d5", "b1c3", "d5a2", "a1a2", "c8g4", "a2a7", "g4d1"],
        );
        let white_losses = state.captured_from(White);
        assert_eq!(
            white_losses.iter().map(|p| p.kind).collect_vec(),
            [Queen, Pawn, Pawn]
        );
        let black_losses = state.captured_from(Black);
        assert_eq!(
            black_losses.iter().map(|p| p.kind).collect_vec(),
            [Queen, Pawn, Pawn]
        );
        assert_eq!(state.board().num_pieces(), 32 - 6);
        let state = play_all(state, &["e1d1", "b8c6", "a7b7", "c6b4", "b7c7"]);
        assert_eq!(
            state.captured_from(Black).iter().map(|p| p.kind).collect_vec(),
            [Queen, Bishop, Pawn, Pawn, Pawn, Pawn]
        );
        assert!(state.captured_from(White).iter().all(|p| p.kind != Knight));
    }

    #[test]
    fn stalemate_override_test() {
        let fen = "k7/8/1Q6/8/8/8/8/K7 b";
        let state = GameState::<Chess>::from_fen(fen).unwrap();
        assert_eq!(state.outcome(), Outcome::Stalemate { stalemated: Black });
        assert_eq!(state.winner(), None);
        let settings = GameSettings {
            stalemate: Some(StalemateRule::LossForStalemated),
        };
        assert_eq!(state.clone().with_settings(settings).winner(), Some(White));

        let fen = "4k4/R8/9/9/9/3R1R3/9/9/9/3K5 b";
        let state = GameState::<Xiangqi>::from_fen(fen).unwrap();
        assert_eq!(state.winner(), Some(Red));
        let settings = GameSettings {
            stalemate: Some(StalemateRule::Draw),
        };
        assert_eq!(state.with_settings(settings).winner(), None);
    }

    #[test]
    fn settings_as_keys_test() {
        let all = [None, Some(StalemateRule::Draw), Some(StalemateRule::LossForStalemated)]
            .map(|stalemate| GameSettings { stalemate });
        let set: std::collections::HashSet<GameSettings> = all.into_iter().chain(all).collect();
        assert_eq!(set.len(), 3);
        assert!(set.contains(&GameSettings::default()));
    }
}
