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

use std::fmt;
use std::fmt::{Display, Formatter};

use anyhow::{bail, ensure};
use colored::Colorize;
use itertools::Itertools;
use strum::IntoEnumIterator;

use crate::games::{CharType, PieceType, Variant};
use crate::general::common::Res;
use crate::general::moves::Move;
use crate::general::squares::{DimT, Position};

/// Enough for the largest supported grid, xiangqi's 10x9.
pub const MAX_SQUARES: usize = 90;

/// The stable identity of a piece: the square it started the game on.
/// No two pieces share a starting square, so this is unique within a game.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[must_use]
pub struct PieceId(pub Position);

/// A piece is a value snapshot. Moving it produces a new value through [`Piece::moved`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[must_use]
pub struct Piece<V: Variant> {
    pub origin: Position,
    pub side: V::Color,
    pub kind: V::PieceType,
    pub has_moved: bool,
}

impl<V: Variant> Piece<V> {
    pub fn new(origin: Position, side: V::Color, kind: V::PieceType) -> Self {
        Self {
            origin,
            side,
            kind,
            has_moved: false,
        }
    }

    pub fn id(self) -> PieceId {
        PieceId(self.origin)
    }

    /// A human-readable form of the identity, like `white-pawn-6-4`.
    pub fn label(self) -> String {
        format!(
            "{0}-{1}-{2}-{3}",
            self.side, self.kind, self.origin.row, self.origin.column
        )
    }

    pub fn moved(self) -> Self {
        Self {
            has_moved: true,
            ..self
        }
    }

    pub fn is_royal(self) -> bool {
        self.kind.is_royal()
    }

    pub fn to_char(self, typ: CharType) -> char {
        self.kind.to_char(self.side, typ)
    }
}

/// A rectangular grid where each square holds at most one piece.
///
/// Boards are `Copy` values and never change after they have been handed out:
/// every transformation, such as [`Board::with_move`], returns a new board.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[must_use]
pub struct Board<V: Variant> {
    squares: [Option<Piece<V>>; MAX_SQUARES],
}

impl<V: Variant> Default for Board<V> {
    fn default() -> Self {
        V::startpos()
    }
}

impl<V: Variant> Board<V> {
    pub fn empty() -> Self {
        debug_assert!(V::SIZE.num_squares() <= MAX_SQUARES);
        Self {
            squares: [None; MAX_SQUARES],
        }
    }

    /// The position every game starts from.
    pub fn startpos() -> Self {
        V::startpos()
    }

    pub fn is_in_bounds(pos: Position) -> bool {
        V::SIZE.contains(pos)
    }

    /// Returns the piece on `pos`, or `None` if the square is empty or not on the board.
    pub fn piece_at(&self, pos: Position) -> Option<Piece<V>> {
        if Self::is_in_bounds(pos) {
            self.squares[V::SIZE.to_idx(pos)]
        } else {
            None
        }
    }

    pub fn is_empty(&self, pos: Position) -> bool {
        self.piece_at(pos).is_none()
    }

    /// Returns a copy where `pos` holds `piece`. Only used while building a board.
    pub fn with_piece(mut self, pos: Position, piece: Option<Piece<V>>) -> Self {
        debug_assert!(Self::is_in_bounds(pos));
        self.squares[V::SIZE.to_idx(pos)] = piece;
        self
    }

    /// Plays `mov` on a copy of this board: the moving piece is marked as moved, its origin square
    /// is cleared, and whatever stood on the destination is gone. `self` stays untouched.
    ///
    /// Does not check legality; moving from an empty square returns an unchanged copy.
    pub fn with_move(self, mov: Move) -> Self {
        let Some(piece) = self.piece_at(mov.from) else {
            return self;
        };
        self.with_piece(mov.from, None)
            .with_piece(mov.to, Some(piece.moved()))
    }

    /// All pieces with their squares, row by row from the top.
    pub fn pieces(&self) -> impl Iterator<Item = (Position, Piece<V>)> + '_ {
        V::SIZE
            .positions()
            .filter_map(|pos| self.piece_at(pos).map(|piece| (pos, piece)))
    }

    pub fn pieces_of(&self, side: V::Color) -> impl Iterator<Item = (Position, Piece<V>)> + '_ {
        self.pieces().filter(move |(_, piece)| piece.side == side)
    }

    pub fn num_pieces(&self) -> usize {
        self.pieces().count()
    }

    /// The square of `side`'s royal piece. `None` only if it has been removed, which legal play never does.
    pub fn royal_square(&self, side: V::Color) -> Option<Position> {
        self.pieces_of(side)
            .find(|(_, piece)| piece.is_royal())
            .map(|(pos, _)| pos)
    }

    /// Parses the piece placement part of a text layout, e.g. `rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR`.
    pub fn from_fen_placement(placement: &str) -> Res<Self> {
        let size = V::SIZE;
        let rows = placement.split('/').collect_vec();
        ensure!(
            rows.len() == size.height.0 as usize,
            "Expected {0} rows in '{1}', found {2}",
            size.height,
            placement.red(),
            rows.len()
        );
        let mut board = Self::empty();
        for (row, text) in rows.into_iter().enumerate() {
            let mut column = 0_usize;
            let mut chars = text.chars().peekable();
            while let Some(c) = chars.next() {
                if let Some(digit) = c.to_digit(10) {
                    ensure!(digit > 0, "Empty runs must not start with 0 in row '{}'", text.red());
                    let mut skip = digit as usize;
                    // a width of 10 or more can need two digits
                    while let Some(next) = chars.peek().and_then(|n| n.to_digit(10)) {
                        skip = skip * 10 + next as usize;
                        ensure!(column + skip <= size.width.0 as usize, "Row '{}' is too long", text.red());
                        _ = chars.next();
                    }
                    ensure!(column + skip <= size.width.0 as usize, "Row '{}' is too long", text.red());
                    column += skip;
                    continue;
                }
                let Some((kind, side)) = V::PieceType::from_char(c) else {
                    bail!(
                        "Invalid piece character '{0}' for {1}",
                        c.to_string().red(),
                        V::static_short_name().bold()
                    )
                };
                ensure!(
                    column < size.width.0 as usize,
                    "Row '{}' is too long",
                    text.red()
                );
                let pos = Position::new(row as DimT, column as DimT);
                board = board.with_piece(pos, Some(Piece::new(pos, side, kind)));
                column += 1;
            }
            ensure!(
                column == size.width.0 as usize,
                "Row '{0}' has {1} columns, expected {2}",
                text.red(),
                column,
                size.width
            );
        }
        Ok(board)
    }

    pub fn fen_placement(&self) -> String {
        let size = V::SIZE;
        (0..size.height.0)
            .map(|row| {
                let mut res = String::new();
                let mut empty = 0;
                for column in 0..size.width.0 {
                    match self.piece_at(Position::new(row, column)) {
                        None => empty += 1,
                        Some(piece) => {
                            if empty > 0 {
                                res += &empty.to_string();
                                empty = 0;
                            }
                            res.push(piece.to_char(CharType::Ascii));
                        }
                    }
                }
                if empty > 0 {
                    res += &empty.to_string();
                }
                res
            })
            .join("/")
    }

    /// Checks the invariants legal play maintains: exactly one royal piece per side.
    pub fn verify(&self) -> Res<()> {
        for side in V::Color::iter() {
            let num_royals = self
                .pieces_of(side)
                .filter(|(_, piece)| piece.is_royal())
                .count();
            ensure!(
                num_royals == 1,
                "{side} has {num_royals} royal pieces, but there must be exactly one"
            );
        }
        Ok(())
    }
}

impl<V: Variant> Display for Board<V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fen_placement())
    }
}
