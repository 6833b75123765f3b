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

use clap::{Parser, Subcommand};
use itertools::Itertools;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, IntoStaticStr};

use crate::games::Variant;
use crate::games::chess::Chess;
use crate::games::xiangqi::Xiangqi;
use crate::general::common::Description::{NoDescription, WithDescription};
use crate::general::common::{NamedEntity, Res, StaticallyNamedEntity, select_name_static};
use crate::general::rules::StalemateRule;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, IntoStaticStr, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Game {
    /// Chess without castling, en passant or promotion.
    #[default]
    Chess,
    /// Chinese chess.
    Xiangqi,
}

impl NamedEntity for Game {
    fn short_name(&self) -> &str {
        self.into()
    }

    fn long_name(&self) -> String {
        match self {
            Game::Chess => Chess::static_long_name(),
            Game::Xiangqi => Xiangqi::static_long_name(),
        }
    }

    fn description(&self) -> Option<String> {
        Some(match self {
            Game::Chess => Chess::static_description(),
            Game::Xiangqi => Xiangqi::static_description(),
        })
    }
}

pub fn select_game(game_name: &str) -> Res<Game> {
    select_name_static(
        game_name,
        Game::iter().collect_vec().iter(),
        "game",
        "gambits",
        WithDescription,
    )
    .copied()
}

/// Resolves `text` as the name of a well-known position if it isn't a text layout already.
pub fn select_position<V: Variant>(text: &str) -> Res<String> {
    if text.contains('/') {
        return Ok(text.to_string());
    }
    let positions = V::named_positions();
    let pos = select_name_static(
        text,
        positions.iter(),
        "position",
        V::static_short_name(),
        NoDescription,
    )?;
    Ok(pos.val.to_string())
}

/// Rule engines for chess and xiangqi.
#[derive(Parser, Debug)]
#[command(name = "gambits", author = "ToTheAnd", version, about, long_about = None)]
pub struct CommandLineArgs {
    /// The variant, `chess` or `xiangqi`.
    #[arg(long, short, default_value = "chess")]
    pub game: String,
    /// The position, either by name (like `startpos`) or as a text layout like `4k3/8/8/8/8/8/8/R3K3 b`.
    #[arg(long, short)]
    pub fen: Option<String>,
    /// Overrides the variant's rule for a side that isn't in check and can't move.
    #[arg(long, value_enum)]
    pub stalemate: Option<StalemateRule>,
    /// Where to write log messages: `stdout`, `stderr` or a file name.
    #[arg(long, default_value = "stderr")]
    pub log: String,
    /// Also log debug messages, such as every move of a game.
    #[arg(long, short)]
    pub debug: bool,
    /// Draw pieces with unicode chars instead of letters.
    #[arg(long, short)]
    pub unicode: bool,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Eq, PartialEq)]
pub enum Command {
    /// Print the position. This is the default.
    Show,
    /// List the legal moves, or only those of the piece on the given square.
    Moves { square: Option<String> },
    /// Play moves like `e2e4` in order and print the resulting position.
    Play { moves: Vec<String> },
    /// Count the leaves of the legal move tree.
    Perft {
        #[arg(default_value_t = 3)]
        depth: usize,
        /// Also list the count below each move.
        #[arg(long, short)]
        split: bool,
    },
    /// Play a game of random moves.
    Selfplay {
        #[arg(long, default_value_t = 200)]
        plies: usize,
        #[arg(long)]
        seed: Option<u64>,
    },
}
