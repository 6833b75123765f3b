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

use std::fmt::{Debug, Display};
use std::hash::Hash;

use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use crate::general::board::{Board, Piece};
use crate::general::common::{EntityList, GenericSelect, StaticallyNamedEntity};
use crate::general::movegen::Targets;
use crate::general::rules::StalemateRule;
use crate::general::squares::{GridSize, Position};

pub mod chess;
pub mod xiangqi;

#[cfg(test)]
pub(crate) mod generic_tests;

#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, EnumIter)]
pub enum CharType {
    #[default]
    Ascii,
    Unicode,
}

/// One of the two sides of a variant. The first side (the `Default`) moves first.
pub trait Color:
    Debug + Display + Default + Copy + Clone + Eq + PartialEq + Hash + Send + Sync + IntoEnumIterator + 'static
{
    #[must_use]
    fn other(self) -> Self {
        if self.is_first() { Self::second() } else { Self::first() }
    }

    fn first() -> Self {
        Self::default()
    }

    fn second() -> Self;

    fn is_first(self) -> bool {
        self == Self::first()
    }

    /// The character used for the side to move in the text layout.
    fn to_char(self) -> char;

    fn from_char(c: char) -> Option<Self> {
        Self::iter().find(|color| color.to_char().eq_ignore_ascii_case(&c))
    }
}

/// The movement class of a piece. The enum order is the order used to display captured pieces.
pub trait PieceType<V: Variant>:
    Debug + Display + Copy + Clone + Eq + PartialEq + Hash + Send + Sync + IntoEnumIterator + 'static
{
    /// Royal pieces are the ones whose attack is check. There is exactly one per side.
    fn is_royal(self) -> bool;

    /// Ascii chars are uppercase for the first side, lowercase for the second side.
    fn to_char(self, color: V::Color, typ: CharType) -> char;

    /// Parses an ascii char as it appears in the text layout.
    fn from_char(c: char) -> Option<(Self, V::Color)>;
}

/// A variant fixes the grid, the pieces, how they move, and how the game ends.
///
/// The generic parts of the rule engine (check detection, legality filtering and terminal state evaluation)
/// are implemented once on [`Board`], and only need the hooks of this trait.
pub trait Variant:
    Debug + Copy + Clone + Eq + PartialEq + Hash + Default + Send + Sync + StaticallyNamedEntity + 'static
{
    type Color: Color;
    type PieceType: PieceType<Self>;

    const SIZE: GridSize;

    const STALEMATE: StalemateRule;

    const START_FEN: &'static str;

    /// Terminal columns taken up by the unicode chars of the pieces.
    const UNICODE_CELL_WIDTH: usize = 1;

    /// The start position, built square by square.
    fn startpos() -> Board<Self>;

    /// Appends all pseudo-legal targets of `piece`, which stands on `from`. Targets may hold pieces of
    /// either side; same-side targets are removed by the legality filter.
    fn pseudolegal_targets(board: &Board<Self>, from: Position, piece: Piece<Self>, targets: &mut Targets);

    /// Variant rules where the two royal pieces must not see each other.
    /// A position where this returns `true` counts as check for both sides.
    fn royals_facing(_board: &Board<Self>) -> bool {
        false
    }

    /// Well-known positions as text layouts, such as the start position.
    fn named_positions() -> EntityList<GenericSelect<&'static str>> {
        vec![GenericSelect {
            name: "startpos",
            val: Self::START_FEN,
        }]
    }
}
