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

//! Counting the leaves of the legal move tree. The numbers are well known for the standard start positions,
//! which makes this the most thorough test of move generation and legality checks.

use std::fmt;
use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};

use derive_more::Display as DeriveDisplay;
use rayon::prelude::*;

use crate::games::{Color, Variant};
use crate::general::board::Board;
use crate::general::moves::Move;

/// Simulate-and-check movegen gets slow quickly, so there's no point in allowing deeper searches.
pub const MAX_PERFT_DEPTH: Depth = Depth(12);

#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, DeriveDisplay)]
#[must_use]
pub struct Depth(usize);

impl Depth {
    pub const fn new(val: usize) -> Self {
        debug_assert!(val <= MAX_PERFT_DEPTH.0);
        Self(val)
    }

    pub const fn get(self) -> usize {
        self.0
    }
}

#[derive(Copy, Clone, Debug)]
pub struct PerftRes {
    pub time: Duration,
    pub nodes: u64,
    pub depth: Depth,
}

impl PerftRes {
    pub fn nps(&self) -> u64 {
        self.nodes * 1_000_000 / (self.time.as_micros() as u64).max(1)
    }
}

impl Display for PerftRes {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "depth {depth} nodes {nodes} time {time} nps {nps}",
            depth = self.depth,
            nodes = self.nodes,
            time = self.time.as_millis(),
            nps = self.nps()
        )
    }
}

#[derive(Debug)]
pub struct SplitPerftRes<V: Variant> {
    pub perft_res: PerftRes,
    pub children: Vec<(Move, u64)>,
    board: Board<V>,
}

impl<V: Variant> Display for SplitPerftRes<V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.perft_res)?;
        for (mov, nodes) in &self.children {
            let piece = self.board.piece_at(mov.from).map(|p| p.kind.to_string()).unwrap_or_default();
            write!(f, "\n{0}\t{1}\t{2}", mov.text(V::SIZE), nodes, piece)?;
        }
        Ok(())
    }
}

fn do_perft<V: Variant>(depth: usize, board: Board<V>, side: V::Color) -> u64 {
    let moves = board.legal_moves(side);
    if depth == 1 {
        return moves.len() as u64;
    }
    // a terminal position has no moves, so it contributes 0 leaves at any remaining depth
    moves
        .into_iter()
        .map(|mov| do_perft(depth - 1, board.with_move(mov), side.other()))
        .sum()
}

/// Counts the positions reachable in exactly `depth` plies from `board` with `side` to move.
pub fn perft<V: Variant>(depth: Depth, board: Board<V>, side: V::Color) -> PerftRes {
    let depth = depth.min(MAX_PERFT_DEPTH);
    let start = Instant::now();
    let nodes = if depth.get() == 0 {
        1
    } else {
        do_perft(depth.get(), board, side)
    };
    let time = start.elapsed();
    PerftRes { time, nodes, depth }
}

/// Like [`perft`], but also reports the number of leaves below each legal move of the root.
/// Root moves are counted in parallel; each of them works on its own copy of the board.
pub fn split_perft<V: Variant>(depth: Depth, board: Board<V>, side: V::Color) -> SplitPerftRes<V> {
    let depth = depth.clamp(Depth::new(1), MAX_PERFT_DEPTH);
    let start = Instant::now();
    let mut children: Vec<(Move, u64)> = board
        .legal_moves(side)
        .into_par_iter()
        .map(|mov| {
            let nodes = if depth.get() == 1 {
                1
            } else {
                do_perft(depth.get() - 1, board.with_move(mov), side.other())
            };
            (mov, nodes)
        })
        .collect();
    let time = start.elapsed();
    children.sort_by_key(|(mov, _)| mov.text(V::SIZE).to_string());
    let nodes = children.iter().map(|(_, nodes)| nodes).sum();
    SplitPerftRes {
        perft_res: PerftRes { time, nodes, depth },
        children,
        board,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::chess::Chess;
    use crate::games::chess::ChessColor::{Black, White};
    use crate::games::xiangqi::Xiangqi;
    use crate::games::xiangqi::XiangqiColor::Red;
    use crate::general::squares::Position;

    #[test]
    fn depth_zero_test() {
        let res = perft(Depth::new(0), Board::<Chess>::startpos(), White);
        assert_eq!(res.nodes, 1);
    }

    #[test]
    fn terminal_position_test() {
        let mate = Board::<Chess>::from_fen_placement("k7/1Q6/1K6/8/8/8/8/8").unwrap();
        assert_eq!(perft(Depth::new(1), mate, Black).nodes, 0);
        assert_eq!(perft(Depth::new(3), mate, Black).nodes, 0);
    }

    #[test]
    fn split_perft_test() {
        let board = Board::<Chess>::startpos();
        let res = split_perft(Depth::new(2), board, White);
        assert_eq!(res.perft_res.nodes, 400);
        assert_eq!(res.children.len(), 20);
        assert!(res.children.iter().all(|(_, nodes)| *nodes == 20));
        assert_eq!(res.children[0].0, Move::new(Position::new(6, 0), Position::new(5, 0)));
        assert!(res.to_string().contains("\na2a3\t20\tpawn"));

        let res = split_perft(Depth::new(1), Board::<Xiangqi>::startpos(), Red);
        assert_eq!(res.perft_res.nodes, 44);
        assert!(res.children.iter().all(|(_, nodes)| *nodes == 1));
        // the cannon can capture the horse
        assert!(res.children.iter().any(|(mov, _)| mov.text(Xiangqi::SIZE).to_string() == "b3b10"));
    }
}
