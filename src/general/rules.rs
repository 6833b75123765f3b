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

//! The variant-independent part of the rule engine: check detection, the legality filter,
//! and classification of terminal positions. Everything here is a pure function of a [`Board`]
//! and the side in question; speculative moves are played on copies that are dropped afterwards.

use derive_more::Display;
use strum_macros::EnumIter;

use crate::games::{Color, Variant};
use crate::general::board::Board;
use crate::general::movegen::Targets;
use crate::general::moves::Move;
use crate::general::squares::Position;

/// What happens when the side to move isn't in check but has no legal moves.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, EnumIter, clap::ValueEnum)]
pub enum StalemateRule {
    /// Nobody wins.
    #[display("draw")]
    Draw,
    /// The stalemated side loses.
    #[display("loss")]
    LossForStalemated,
}

/// The state of the game from the perspective of the side to move.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[must_use]
pub enum Outcome<C: Color> {
    Ongoing,
    Checkmate { winner: C },
    Stalemate { stalemated: C },
}

impl<C: Color> Outcome<C> {
    pub fn is_over(self) -> bool {
        self != Outcome::Ongoing
    }

    /// `None` while the game goes on and for drawn stalemates.
    pub fn winner(self, rule: StalemateRule) -> Option<C> {
        match self {
            Outcome::Ongoing => None,
            Outcome::Checkmate { winner } => Some(winner),
            Outcome::Stalemate { stalemated } => match rule {
                StalemateRule::Draw => None,
                StalemateRule::LossForStalemated => Some(stalemated.other()),
            },
        }
    }
}

impl<V: Variant> Board<V> {
    /// Pseudo-legal targets of the piece on `from`, or nothing if the square is empty.
    pub fn pseudolegal_targets(&self, from: Position) -> Targets {
        let mut targets = Targets::new();
        if let Some(piece) = self.piece_at(from) {
            V::pseudolegal_targets(self, from, piece, &mut targets);
        }
        targets
    }

    /// True iff any piece of `attacker` has `square` among its pseudo-legal targets.
    pub fn is_attacked_by(&self, square: Position, attacker: V::Color) -> bool {
        self.pieces_of(attacker)
            .any(|(from, _)| self.pseudolegal_targets(from).contains(&square))
    }

    /// A side without a royal piece counts as being in check, which makes it lose instead of
    /// breaking the evaluation. Facing royals (in variants with that rule) are check for both sides.
    pub fn is_in_check(&self, side: V::Color) -> bool {
        let Some(royal) = self.royal_square(side) else {
            return true;
        };
        V::royals_facing(self) || self.is_attacked_by(royal, side.other())
    }

    /// The destinations the piece on `from` can legally move to: pseudo-legal targets that don't hold a piece
    /// of the mover's side and after which the mover is not in check.
    ///
    /// The order is that of the pseudo-legal targets, so repeated calls return the same sequence.
    pub fn legal_targets(&self, from: Position) -> Targets {
        let Some(piece) = self.piece_at(from) else {
            return Targets::new();
        };
        self.pseudolegal_targets(from)
            .into_iter()
            .filter(|&to| self.piece_at(to).is_none_or(|target| target.side != piece.side))
            .filter(|&to| {
                let simulated = self.with_move(Move::new(from, to));
                // `is_in_check` includes the rule against facing royals
                !simulated.is_in_check(piece.side)
            })
            .collect()
    }

    pub fn is_move_legal(&self, mov: Move) -> bool {
        self.legal_targets(mov.from).contains(&mov.to)
    }

    /// All legal moves of `side`, ordered by origin square (row by row from the top).
    pub fn legal_moves(&self, side: V::Color) -> Vec<Move> {
        self.pieces_of(side)
            .flat_map(|(from, _)| {
                self.legal_targets(from)
                    .into_iter()
                    .map(move |to| Move::new(from, to))
            })
            .collect()
    }

    /// Stops at the first piece with a legal move.
    pub fn has_legal_moves(&self, side: V::Color) -> bool {
        self.pieces_of(side)
            .any(|(from, _)| !self.legal_targets(from).is_empty())
    }

    /// Classifies the position for `side`, which is about to move.
    pub fn outcome(&self, side: V::Color) -> Outcome<V::Color> {
        if self.has_legal_moves(side) {
            Outcome::Ongoing
        } else if self.is_in_check(side) {
            Outcome::Checkmate {
                winner: side.other(),
            }
        } else {
            Outcome::Stalemate { stalemated: side }
        }
    }

    /// The winner if `side` is to move, using the variant's stalemate rule, or `None` if there is no winner (yet).
    pub fn calculate_winner(&self, side: V::Color) -> Option<V::Color> {
        self.outcome(side).winner(V::STALEMATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::chess::ChessColor::{Black, White};

    #[test]
    fn winner_test() {
        let mate = Outcome::Checkmate { winner: White };
        assert_eq!(mate.winner(StalemateRule::Draw), Some(White));
        assert_eq!(mate.winner(StalemateRule::LossForStalemated), Some(White));
        let stalemate = Outcome::Stalemate { stalemated: White };
        assert_eq!(stalemate.winner(StalemateRule::Draw), None);
        assert_eq!(stalemate.winner(StalemateRule::LossForStalemated), Some(Black));
        assert!(stalemate.is_over());
        let ongoing: Outcome<crate::games::chess::ChessColor> = Outcome::Ongoing;
        assert!(!ongoing.is_over());
        assert_eq!(ongoing.winner(StalemateRule::LossForStalemated), None);
    }
}
