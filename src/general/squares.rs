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
use derive_more::{Display as DeriveDisplay, From};

use crate::general::common::{Res, parse_int_from_str};

pub type DimT = u8;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default, DeriveDisplay, From)]
#[must_use]
pub struct Height(pub DimT);

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default, DeriveDisplay, From)]
#[must_use]
pub struct Width(pub DimT);

#[must_use]
pub fn file_to_char(file: DimT) -> char {
    debug_assert!(file < 26);
    (file + b'a') as char
}

#[must_use]
pub fn char_to_file(file: char) -> DimT {
    debug_assert!(file.is_ascii_lowercase());
    file as DimT - b'a'
}

/// A square of the grid. Row 0 is the top row, which is the second player's back rank in all variants.
///
/// Positions are plain values; whether a position lies on the board depends on the variant's [`GridSize`].
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
#[must_use]
pub struct Position {
    pub row: DimT,
    pub column: DimT,
}

impl Position {
    pub const fn new(row: DimT, column: DimT) -> Self {
        Self { row, column }
    }

    /// Moves `dr` rows down and `dc` columns right.
    /// Returns `None` if the result would leave the grid, so callers never see out-of-bounds positions.
    pub fn offset(self, dr: isize, dc: isize, size: GridSize) -> Option<Self> {
        let row = self.row as isize + dr;
        let column = self.column as isize + dc;
        if row < 0 || column < 0 || row >= size.height.0 as isize || column >= size.width.0 as isize {
            return None;
        }
        Some(Self::new(row as DimT, column as DimT))
    }

    /// Formats the position as file letter and rank, where rank 1 is the bottom row.
    pub fn algebraic(self, size: GridSize) -> Algebraic {
        Algebraic { pos: self, size }
    }

    pub fn from_algebraic(text: &str, size: GridSize) -> Res<Self> {
        let text = text.trim();
        let mut chars = text.chars();
        let Some(file) = chars.next() else {
            bail!("Empty square")
        };
        if !file.is_ascii_alphabetic() {
            bail!("file (column) '{}' must be an ascii letter", file.to_string().red());
        }
        let column = char_to_file(file.to_ascii_lowercase());
        let rank: usize = parse_int_from_str(chars.as_str(), "rank (row)")?;
        ensure!(
            column < size.width.0 && rank >= 1 && rank <= size.height.0 as usize,
            "The square '{}' is not on a board with {} rows and {} columns",
            text.red(),
            size.height,
            size.width
        );
        Ok(Self::new(size.height.0 - rank as DimT, column))
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({0}, {1})", self.row, self.column)
    }
}

#[derive(Copy, Clone, Debug)]
pub struct Algebraic {
    pos: Position,
    size: GridSize,
}

impl Display for Algebraic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if !self.size.contains(self.pos) {
            return write!(f, "<invalid>");
        }
        write!(
            f,
            "{0}{1}",
            file_to_char(self.pos.column),
            self.size.height.0 - self.pos.row
        )
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[must_use]
pub struct GridSize {
    pub height: Height,
    pub width: Width,
}

impl GridSize {
    pub const fn new(height: Height, width: Width) -> Self {
        Self { height, width }
    }

    pub const fn num_squares(self) -> usize {
        self.height.0 as usize * self.width.0 as usize
    }

    pub fn contains(self, pos: Position) -> bool {
        pos.row < self.height.0 && pos.column < self.width.0
    }

    /// Row-major index; only meaningful for positions inside the grid.
    pub fn to_idx(self, pos: Position) -> usize {
        debug_assert!(self.contains(pos));
        pos.row as usize * self.width.0 as usize + pos.column as usize
    }

    pub fn idx_to_position(self, idx: usize) -> Position {
        Position::new(
            (idx / self.width.0 as usize) as DimT,
            (idx % self.width.0 as usize) as DimT,
        )
    }

    /// All positions, row by row from the top.
    pub fn positions(self) -> impl Iterator<Item = Position> {
        (0..self.num_squares()).map(move |idx| self.idx_to_position(idx))
    }
}

impl Display for GridSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{0}x{1}", self.height, self.width)
    }
}
