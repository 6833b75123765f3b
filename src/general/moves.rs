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

use crate::general::common::Res;
use crate::general::squares::{GridSize, Position};

/// A move from one square to another. Captures are implied by an occupied destination.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
#[must_use]
pub struct Move {
    pub from: Position,
    pub to: Position,
}

impl Move {
    pub const fn new(from: Position, to: Position) -> Self {
        Self { from, to }
    }

    /// Compact text like `e2e4` or, on the 10 row board, `b10c8`.
    pub fn text(self, size: GridSize) -> CompactMove {
        CompactMove { mov: self, size }
    }

    pub fn parse(text: &str, size: GridSize) -> Res<Self> {
        let text = text.trim();
        ensure!(text.is_ascii(), "Invalid move '{}'", text.red());
        // the second square starts at the first letter after the first character
        let Some(split) = text
            .char_indices()
            .skip(1)
            .find(|(_, c)| c.is_ascii_alphabetic())
            .map(|(idx, _)| idx)
        else {
            bail!(
                "Invalid move '{}', expected two squares like 'e2e4'",
                text.red()
            )
        };
        let (from, to) = text.split_at(split);
        Ok(Self::new(
            Position::from_algebraic(from, size)?,
            Position::from_algebraic(to, size)?,
        ))
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{0} -> {1}", self.from, self.to)
    }
}

#[derive(Copy, Clone, Debug)]
pub struct CompactMove {
    mov: Move,
    size: GridSize,
}

impl Display for CompactMove {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{0}{1}",
            self.mov.from.algebraic(self.size),
            self.mov.to.algebraic(self.size)
        )
    }
}
