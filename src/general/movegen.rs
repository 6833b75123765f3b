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

//! Building blocks for pseudo-legal move generation, shared by all variants.
//!
//! Each function appends destinations to a [`Targets`] list in a fixed order, which keeps movegen deterministic.
//! None of them looks at the side of an occupant; same-side destinations are removed by the legality filter.

use arrayvec::ArrayVec;

use crate::games::Variant;
use crate::general::board::Board;
use crate::general::squares::Position;

/// Upper bound on the pseudo-legal targets of a single piece: a queen in the center of a chess board has 27.
pub const MAX_TARGETS: usize = 32;

pub type Targets = ArrayVec<Position, MAX_TARGETS>;

pub type Offset = (isize, isize);

pub const ORTHOGONAL: [Offset; 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

pub const DIAGONAL: [Offset; 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// A jump that is blocked if the `leg` square (relative to the origin) is occupied.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Leg {
    pub offset: Offset,
    pub leg: Offset,
}

impl Leg {
    pub const fn new(offset: Offset, leg: Offset) -> Self {
        Self { offset, leg }
    }
}

/// Rays: every empty square is a target, and so is the first occupied square, which ends the ray.
pub fn slide<V: Variant>(board: &Board<V>, from: Position, dirs: &[Offset], targets: &mut Targets) {
    for &(dr, dc) in dirs {
        let mut current = from;
        while let Some(next) = current.offset(dr, dc, V::SIZE) {
            targets.push(next);
            if !board.is_empty(next) {
                break;
            }
            current = next;
        }
    }
}

/// Fixed offsets, restricted to the board and to the squares `allowed` accepts.
pub fn step<V: Variant>(
    from: Position,
    offsets: &[Offset],
    allowed: impl Fn(Position) -> bool,
    targets: &mut Targets,
) {
    for &(dr, dc) in offsets {
        if let Some(to) = from.offset(dr, dc, V::SIZE) {
            if allowed(to) {
                targets.push(to);
            }
        }
    }
}

/// Like [`step`], but each jump needs its leg square to be empty.
pub fn leap<V: Variant>(
    board: &Board<V>,
    from: Position,
    legs: &[Leg],
    allowed: impl Fn(Position) -> bool,
    targets: &mut Targets,
) {
    for leg in legs {
        let Some(to) = from.offset(leg.offset.0, leg.offset.1, V::SIZE) else {
            continue;
        };
        // the leg lies between origin and target, so it's on the board whenever the target is
        let blocked = from
            .offset(leg.leg.0, leg.leg.1, V::SIZE)
            .is_none_or(|square| !board.is_empty(square));
        if !blocked && allowed(to) {
            targets.push(to);
        }
    }
}

/// Rays for screening pieces: empty squares up to the first occupant (the screen) are quiet targets,
/// and the first occupant behind the screen is a capture target.
pub fn screened_slide<V: Variant>(board: &Board<V>, from: Position, dirs: &[Offset], targets: &mut Targets) {
    for &(dr, dc) in dirs {
        let mut current = from;
        let mut screened = false;
        while let Some(next) = current.offset(dr, dc, V::SIZE) {
            let occupied = !board.is_empty(next);
            if !screened {
                if occupied {
                    screened = true;
                } else {
                    targets.push(next);
                }
            } else if occupied {
                targets.push(next);
                break;
            }
            current = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::chess::Chess;
    use crate::games::xiangqi::Xiangqi;
    use itertools::Itertools;

    fn sorted(targets: Targets) -> Vec<Position> {
        targets.into_iter().sorted().collect()
    }

    #[test]
    fn slide_stops_at_first_occupant_test() {
        // rook on d4 with a friendly pawn on d6 and an enemy pawn on f4
        let board = Board::<Chess>::from_fen_placement("8/8/3P4/8/3R1p2/8/8/8").unwrap();
        let mut targets = Targets::new();
        slide(&board, Position::new(4, 3), &ORTHOGONAL, &mut targets);
        let expected = [
            (3, 3),
            (2, 3),
            (5, 3),
            (6, 3),
            (7, 3),
            (4, 2),
            (4, 1),
            (4, 0),
            (4, 4),
            (4, 5),
        ]
        .map(|(r, c)| Position::new(r, c));
        assert_eq!(targets.as_slice(), expected.as_slice());
    }

    #[test]
    fn step_filters_region_test() {
        let mut targets = Targets::new();
        step::<Chess>(Position::new(0, 0), &DIAGONAL, |_| true, &mut targets);
        assert_eq!(targets.as_slice(), &[Position::new(1, 1)]);
        let mut targets = Targets::new();
        step::<Chess>(Position::new(4, 4), &ORTHOGONAL, |p| p.row >= 4, &mut targets);
        assert_eq!(
            sorted(targets),
            vec![Position::new(4, 3), Position::new(4, 5), Position::new(5, 4)]
        );
    }

    #[test]
    fn leap_blocked_by_leg_test() {
        let legs = [Leg::new((-2, -1), (-1, 0)), Leg::new((-1, 2), (0, 1))];
        let board = Board::<Xiangqi>::from_fen_placement("9/9/9/9/9/4p4/9/9/9/9").unwrap();
        let mut targets = Targets::new();
        leap(&board, Position::new(6, 4), &legs, |_| true, &mut targets);
        assert_eq!(targets.as_slice(), &[Position::new(5, 6)]);
    }

    #[test]
    fn screened_slide_test() {
        // cannon on a1, screen on a4, target on a6, another piece on a7 behind it
        let board = Board::<Xiangqi>::from_fen_placement("9/9/9/p8/r8/9/P8/9/9/C8").unwrap();
        let mut targets = Targets::new();
        screened_slide(&board, Position::new(9, 0), &ORTHOGONAL, &mut targets);
        let up = [(8, 0), (7, 0), (4, 0)].map(|(r, c)| Position::new(r, c));
        let right = (1..9).map(|c| Position::new(9, c));
        assert_eq!(sorted(targets), up.into_iter().chain(right).sorted().collect_vec());
    }
}
