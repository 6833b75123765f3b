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

//! Chess on an 8x8 board, as played by the rule engine: no castling, no en passant and no promotion.
//! Stalemate is a draw.

use strum_macros::{Display, EnumIter};

use crate::games::chess::ChessColor::{Black, White};
use crate::games::chess::ChessPieceType::*;
use crate::games::{CharType, Color, PieceType, Variant};
use crate::general::board::{Board, Piece};
use crate::general::common::{EntityList, GenericSelect, StaticallyNamedEntity};
use crate::general::movegen::{DIAGONAL, ORTHOGONAL, Offset, Targets, slide, step};
use crate::general::rules::StalemateRule;
use crate::general::squares::{DimT, GridSize, Height, Position, Width};

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w";

const KNIGHT_OFFSETS: [Offset; 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_OFFSETS: [Offset; 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const BACK_RANK: [ChessPieceType; 8] = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];

#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
#[must_use]
pub enum ChessColor {
    #[default]
    White,
    Black,
}

impl Color for ChessColor {
    fn second() -> Self {
        Black
    }

    fn to_char(self) -> char {
        match self {
            White => 'w',
            Black => 'b',
        }
    }
}

impl ChessColor {
    /// Pawns move towards row 0 for white and towards row 7 for black.
    pub fn forward(self) -> isize {
        match self {
            White => -1,
            Black => 1,
        }
    }

    pub fn pawn_start_row(self) -> DimT {
        match self {
            White => 6,
            Black => 1,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
#[must_use]
pub enum ChessPieceType {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl PieceType<Chess> for ChessPieceType {
    fn is_royal(self) -> bool {
        self == King
    }

    fn to_char(self, color: ChessColor, typ: CharType) -> char {
        match typ {
            CharType::Ascii => {
                let c = match self {
                    King => 'K',
                    Queen => 'Q',
                    Rook => 'R',
                    Bishop => 'B',
                    Knight => 'N',
                    Pawn => 'P',
                };
                if color == White { c } else { c.to_ascii_lowercase() }
            }
            CharType::Unicode => match (color, self) {
                (White, King) => '♔',
                (White, Queen) => '♕',
                (White, Rook) => '♖',
                (White, Bishop) => '♗',
                (White, Knight) => '♘',
                (White, Pawn) => '♙',
                (Black, King) => '♚',
                (Black, Queen) => '♛',
                (Black, Rook) => '♜',
                (Black, Bishop) => '♝',
                (Black, Knight) => '♞',
                (Black, Pawn) => '♟',
            },
        }
    }

    fn from_char(c: char) -> Option<(Self, ChessColor)> {
        let typ = match c.to_ascii_uppercase() {
            'K' => King,
            'Q' => Queen,
            'R' => Rook,
            'B' => Bishop,
            'N' => Knight,
            'P' => Pawn,
            _ => return None,
        };
        let color = if c.is_ascii_uppercase() { White } else { Black };
        Some((typ, color))
    }
}

#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Chess;

impl StaticallyNamedEntity for Chess {
    fn static_short_name() -> &'static str {
        "chess"
    }

    fn static_long_name() -> String {
        "Chess".to_string()
    }

    fn static_description() -> String {
        "Chess without castling, en passant or promotion. Stalemate is a draw.".to_string()
    }
}

impl Variant for Chess {
    type Color = ChessColor;
    type PieceType = ChessPieceType;

    const SIZE: GridSize = GridSize::new(Height(8), Width(8));

    const STALEMATE: StalemateRule = StalemateRule::Draw;

    const START_FEN: &'static str = START_FEN;

    fn startpos() -> Board<Self> {
        let mut board = Board::empty();
        for (column, kind) in BACK_RANK.into_iter().enumerate() {
            let column = column as DimT;
            for (row, color, kind) in [(0, Black, kind), (1, Black, Pawn), (6, White, Pawn), (7, White, kind)] {
                let pos = Position::new(row, column);
                board = board.with_piece(pos, Some(Piece::new(pos, color, kind)));
            }
        }
        board
    }

    fn pseudolegal_targets(board: &Board<Self>, from: Position, piece: Piece<Self>, targets: &mut Targets) {
        match piece.kind {
            Pawn => gen_pawn_targets(board, from, piece.side, targets),
            Knight => step::<Self>(from, &KNIGHT_OFFSETS, |_| true, targets),
            Bishop => slide(board, from, &DIAGONAL, targets),
            Rook => slide(board, from, &ORTHOGONAL, targets),
            Queen => {
                slide(board, from, &ORTHOGONAL, targets);
                slide(board, from, &DIAGONAL, targets);
            }
            King => step::<Self>(from, &KING_OFFSETS, |_| true, targets),
        }
    }

    fn named_positions() -> EntityList<GenericSelect<&'static str>> {
        vec![
            GenericSelect {
                name: "startpos",
                val: START_FEN,
            },
            // Only kings and a lone queen, with lots of mates and stalemates close by
            GenericSelect {
                name: "queen_endgame",
                val: "8/8/8/3k4/8/8/2Q5/3K4 w",
            },
            GenericSelect {
                name: "fools_mate",
                val: "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w",
            },
        ]
    }
}

fn gen_pawn_targets(board: &Board<Chess>, from: Position, color: ChessColor, targets: &mut Targets) {
    let dir = color.forward();
    if let Some(one) = from.offset(dir, 0, Chess::SIZE) {
        if board.is_empty(one) {
            targets.push(one);
            if from.row == color.pawn_start_row() {
                if let Some(two) = one.offset(dir, 0, Chess::SIZE) {
                    if board.is_empty(two) {
                        targets.push(two);
                    }
                }
            }
        }
    }
    // diagonal moves exist only as captures of the opponent's pieces
    for dc in [-1, 1] {
        let Some(to) = from.offset(dir, dc, Chess::SIZE) else {
            continue;
        };
        if board.piece_at(to).is_some_and(|target| target.side != color) {
            targets.push(to);
        }
    }
}
