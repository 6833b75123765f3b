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

//! Xiangqi (Chinese chess) on a 10x9 board. The generals may not face each other on an open file,
//! and a side without legal moves loses even if it is not in check.

use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

use crate::games::xiangqi::XiangqiColor::{Black, Red};
use crate::games::xiangqi::XiangqiPieceType::*;
use crate::games::{CharType, Color, PieceType, Variant};
use crate::general::board::{Board, Piece};
use crate::general::common::{EntityList, GenericSelect, StaticallyNamedEntity};
use crate::general::movegen::{DIAGONAL, Leg, ORTHOGONAL, Offset, Targets, leap, screened_slide, slide, step};
use crate::general::rules::StalemateRule;
use crate::general::squares::{DimT, GridSize, Height, Position, Width};

pub const START_FEN: &str = "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR w";

/// The last row of black's half. The river lies between this row and the next one.
const BLACK_RIVER_BANK: DimT = 4;

const PALACE_COLUMNS: [DimT; 3] = [3, 4, 5];

const HORSE_LEGS: [Leg; 8] = [
    Leg::new((-2, -1), (-1, 0)),
    Leg::new((-2, 1), (-1, 0)),
    Leg::new((-1, -2), (0, -1)),
    Leg::new((1, -2), (0, -1)),
    Leg::new((2, -1), (1, 0)),
    Leg::new((2, 1), (1, 0)),
    Leg::new((-1, 2), (0, 1)),
    Leg::new((1, 2), (0, 1)),
];

const ELEPHANT_LEGS: [Leg; 4] = [
    Leg::new((-2, -2), (-1, -1)),
    Leg::new((-2, 2), (-1, 1)),
    Leg::new((2, -2), (1, -1)),
    Leg::new((2, 2), (1, 1)),
];

const BACK_RANK: [XiangqiPieceType; 9] = [
    Chariot, Horse, Elephant, Advisor, General, Advisor, Elephant, Horse, Chariot,
];

#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
#[must_use]
pub enum XiangqiColor {
    #[default]
    Red,
    Black,
}

impl Color for XiangqiColor {
    fn second() -> Self {
        Black
    }

    /// Red uses the same side char as white in chess.
    fn to_char(self) -> char {
        match self {
            Red => 'w',
            Black => 'b',
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'w' | 'r' => Some(Red),
            'b' => Some(Black),
            _ => None,
        }
    }
}

impl XiangqiColor {
    pub fn forward(self) -> isize {
        match self {
            Red => -1,
            Black => 1,
        }
    }

    pub fn in_own_half(self, pos: Position) -> bool {
        match self {
            Red => pos.row > BLACK_RIVER_BANK,
            Black => pos.row <= BLACK_RIVER_BANK,
        }
    }

    pub fn in_palace(self, pos: Position) -> bool {
        let rows = match self {
            Red => 7..=9,
            Black => 0..=2,
        };
        rows.contains(&pos.row) && PALACE_COLUMNS.contains(&pos.column)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
#[must_use]
pub enum XiangqiPieceType {
    General,
    Advisor,
    Elephant,
    Horse,
    Chariot,
    Cannon,
    Soldier,
}

impl XiangqiPieceType {
    fn ascii_char(self) -> char {
        match self {
            General => 'K',
            Advisor => 'A',
            Elephant => 'B',
            Horse => 'N',
            Chariot => 'R',
            Cannon => 'C',
            Soldier => 'P',
        }
    }
}

impl PieceType<Xiangqi> for XiangqiPieceType {
    fn is_royal(self) -> bool {
        self == General
    }

    fn to_char(self, color: XiangqiColor, typ: CharType) -> char {
        match typ {
            CharType::Ascii => {
                let c = self.ascii_char();
                if color == Red { c } else { c.to_ascii_lowercase() }
            }
            CharType::Unicode => match (color, self) {
                (Red, General) => '帥',
                (Red, Advisor) => '仕',
                (Red, Elephant) => '相',
                (Red, Horse) => '傌',
                (Red, Chariot) => '俥',
                (Red, Cannon) => '炮',
                (Red, Soldier) => '兵',
                (Black, General) => '將',
                (Black, Advisor) => '士',
                (Black, Elephant) => '象',
                (Black, Horse) => '馬',
                (Black, Chariot) => '車',
                (Black, Cannon) => '砲',
                (Black, Soldier) => '卒',
            },
        }
    }

    fn from_char(c: char) -> Option<(Self, XiangqiColor)> {
        let upper = c.to_ascii_uppercase();
        let typ = match upper {
            'H' => Horse,
            'E' => Elephant,
            _ => Self::iter().find(|typ| typ.ascii_char() == upper)?,
        };
        let color = if c.is_ascii_uppercase() { Red } else { Black };
        Some((typ, color))
    }
}

#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Xiangqi;

impl StaticallyNamedEntity for Xiangqi {
    fn static_short_name() -> &'static str {
        "xiangqi"
    }

    fn static_long_name() -> String {
        "Xiangqi (Chinese Chess)".to_string()
    }

    fn static_description() -> String {
        "Chinese chess. The generals may not face each other, and a stalemated side loses.".to_string()
    }
}

impl Variant for Xiangqi {
    type Color = XiangqiColor;
    type PieceType = XiangqiPieceType;

    const SIZE: GridSize = GridSize::new(Height(10), Width(9));

    const STALEMATE: StalemateRule = StalemateRule::LossForStalemated;

    const START_FEN: &'static str = START_FEN;

    // CJK glyphs are two columns wide
    const UNICODE_CELL_WIDTH: usize = 2;

    fn startpos() -> Board<Self> {
        let mut board = Board::empty();
        let mut place = |row: DimT, column: DimT, color: XiangqiColor, kind: XiangqiPieceType| {
            let pos = Position::new(row, column);
            board = board.with_piece(pos, Some(Piece::new(pos, color, kind)));
        };
        for (column, kind) in BACK_RANK.into_iter().enumerate() {
            place(0, column as DimT, Black, kind);
            place(9, column as DimT, Red, kind);
        }
        for column in [1, 7] {
            place(2, column, Black, Cannon);
            place(7, column, Red, Cannon);
        }
        for column in (0..9).step_by(2) {
            place(3, column, Black, Soldier);
            place(6, column, Red, Soldier);
        }
        board
    }

    fn pseudolegal_targets(board: &Board<Self>, from: Position, piece: Piece<Self>, targets: &mut Targets) {
        let side = piece.side;
        match piece.kind {
            General => step::<Self>(from, &ORTHOGONAL, |to| side.in_palace(to), targets),
            Advisor => step::<Self>(from, &DIAGONAL, |to| side.in_palace(to), targets),
            Elephant => leap(board, from, &ELEPHANT_LEGS, |to| side.in_own_half(to), targets),
            Horse => leap(board, from, &HORSE_LEGS, |_| true, targets),
            Chariot => slide(board, from, &ORTHOGONAL, targets),
            Cannon => screened_slide(board, from, &ORTHOGONAL, targets),
            Soldier => {
                let forward: Offset = (side.forward(), 0);
                if side.in_own_half(from) {
                    step::<Self>(from, &[forward], |_| true, targets);
                } else {
                    step::<Self>(from, &[forward, (0, -1), (0, 1)], |_| true, targets);
                }
            }
        }
    }

    /// Both generals on one file without any piece between them.
    fn royals_facing(board: &Board<Self>) -> bool {
        let (Some(red), Some(black)) = (board.royal_square(Red), board.royal_square(Black)) else {
            return false;
        };
        if red.column != black.column {
            return false;
        }
        let (top, bottom) = (red.row.min(black.row), red.row.max(black.row));
        (top + 1..bottom).all(|row| board.is_empty(Position::new(row, red.column)))
    }

    fn named_positions() -> EntityList<GenericSelect<&'static str>> {
        vec![
            GenericSelect {
                name: "startpos",
                val: START_FEN,
            },
            GenericSelect {
                name: "chariot_endgame",
                val: "3k5/9/9/9/9/9/9/9/4R4/5K3 w",
            },
            GenericSelect {
                name: "cannon_check",
                val: "3k5/9/3P5/9/9/9/9/1C7/9/4K4 w",
            },
        ]
    }
}
