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

//! Rule engines for chess-like games on rectangular grids.
//!
//! This project is grouped in a few broad modules:
//! - `general`: the variant-independent parts. Positions, boards, movegen building blocks,
//!   and the generic check detection, legality filter and terminal state evaluation
//! - `games`: the variants (implementing the `Variant` trait), currently chess and xiangqi
//! - `game_state`: a game in progress, which only changes by playing legal moves
//! - `play` and `output`: random self-play, logging and board diagrams
//! - `cli`: the command line interface of the binary

use std::io::{Write, stdout};

use anyhow::bail;
use clap::Parser;
use colored::Colorize;
use itertools::Itertools;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::cli::{Command, CommandLineArgs, Game, select_game, select_position};
use crate::game_state::{GameSettings, GameState};
use crate::games::chess::Chess;
use crate::games::xiangqi::Xiangqi;
use crate::games::{CharType, Variant};
use crate::general::common::Res;
use crate::general::moves::Move;
use crate::general::perft::{Depth, MAX_PERFT_DEPTH, perft, split_perft};
use crate::general::squares::Position;
use crate::output::{Logger, Message, TextStream, state_diagram};
use crate::play::play_random_game;

pub mod cli;
pub mod game_state;
pub mod games;
pub mod general;
pub mod output;
pub mod play;

fn initial_state<V: Variant>(args: &CommandLineArgs) -> Res<GameState<V>> {
    let settings = GameSettings {
        stalemate: args.stalemate,
    };
    let state = match &args.fen {
        None => GameState::new(settings),
        Some(fen) => GameState::from_fen(&select_position::<V>(fen)?)?.with_settings(settings),
    };
    Ok(state)
}

fn play_moves<V: Variant>(mut state: GameState<V>, moves: &[String], logger: &mut Logger) -> Res<GameState<V>> {
    for text in moves {
        let mov = Move::parse(text, V::SIZE)?;
        let victim = state.board().piece_at(mov.to);
        let mover = state.active();
        state = match state.play(mov) {
            Ok(next) => next,
            Err(err) => {
                logger.display_message(Message::Error, &format!("Can't play '{text}': {err}"));
                logger.show(&state, CharType::Ascii);
                bail!("Illegal move '{0}' in position '{1}': {err}", text.red(), state.as_fen());
            }
        };
        if let Some(victim) = victim {
            logger.display_message(Message::Info, &format!("{mover} captures the {0}", victim.label()));
        }
        logger.display_message(Message::Debug, &format!("Played {text}"));
    }
    if let Some(winner) = state.winner() {
        logger.display_message(Message::Info, &format!("{winner} wins"));
    } else if state.is_over() {
        logger.display_message(Message::Info, "The game is drawn");
    }
    Ok(state)
}

/// Runs `command` for the variant `V`, writing the results to `out` and log messages to `logger`.
pub fn run_command<V: Variant>(args: &CommandLineArgs, out: &mut dyn Write, logger: &mut Logger) -> Res<()> {
    let state = initial_state::<V>(args)?;
    let typ = if args.unicode { CharType::Unicode } else { CharType::Ascii };
    logger.display_message(
        Message::Debug,
        &format!(
            "Starting {0} from '{1}', stalemate rule: {2}",
            V::static_short_name(),
            state.as_fen(),
            state.settings().stalemate_rule::<V>()
        ),
    );
    match args.command.clone().unwrap_or(Command::Show) {
        Command::Show => writeln!(out, "{}", state_diagram(&state, typ, true))?,
        Command::Moves { square } => {
            let moves = match square {
                None => state.legal_moves(),
                Some(square) => {
                    let from = Position::from_algebraic(&square, V::SIZE)?;
                    state.legal_targets(from).into_iter().map(|to| Move::new(from, to)).collect()
                }
            };
            writeln!(out, "{}", moves.iter().map(|mov| mov.text(V::SIZE)).join(" "))?;
            logger.display_message(Message::Info, &format!("{} legal moves", moves.len()));
        }
        Command::Play { moves } => {
            let state = play_moves(state, &moves, logger)?;
            writeln!(out, "{}\n{}", state_diagram(&state, typ, true), state.as_fen())?;
        }
        Command::Perft { depth, split } => {
            if depth > MAX_PERFT_DEPTH.get() {
                logger.display_message(
                    Message::Warning,
                    &format!("Depth {depth} is too large, using {MAX_PERFT_DEPTH} instead"),
                );
            }
            let depth = Depth::new(depth.min(MAX_PERFT_DEPTH.get()));
            if split {
                writeln!(out, "{}", split_perft(depth, *state.board(), state.active()))?;
            } else {
                writeln!(out, "{}", perft(depth, *state.board(), state.active()))?;
            }
        }
        Command::Selfplay { plies, seed } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };
            let state = play_random_game(state, &mut rng, plies, logger);
            let moves = state.history().iter().map(|mov| mov.text(V::SIZE)).join(" ");
            writeln!(out, "{}\n{moves}", state_diagram(&state, typ, true))?;
        }
    }
    Ok(())
}

pub fn run_program() -> Res<()> {
    let args = CommandLineArgs::parse();
    let mut logger = Logger::with_debug(TextStream::from_name(&args.log)?, args.debug);
    let mut out = stdout();
    let res = match select_game(&args.game)? {
        Game::Chess => run_command::<Chess>(&args, &mut out, &mut logger),
        Game::Xiangqi => run_command::<Xiangqi>(&args, &mut out, &mut logger),
    };
    if let Err(err) = &res {
        if logs_errors_separately(&logger.stream) {
            logger.display_message(Message::Error, &err.to_string());
        }
    }
    res
}

/// `main` prints errors to stderr, so only other log targets need them.
fn logs_errors_separately(stream: &TextStream) -> bool {
    !matches!(stream, TextStream::Stderr(_))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run<V: Variant>(args: &[&str]) -> (Res<()>, String, String) {
        let args = CommandLineArgs::try_parse_from(std::iter::once("gambits").chain(args.iter().copied())).unwrap();
        let mut out = vec![];
        let mut logger = Logger::with_debug(TextStream::Memory(vec![]), true);
        let res = run_command::<V>(&args, &mut out, &mut logger);
        let log = logger.stream.contents().unwrap_or_default();
        (res, String::from_utf8(out).unwrap(), log)
    }

    #[test]
    fn error_logging_test() {
        assert!(!logs_errors_separately(&TextStream::from_name("stderr").unwrap()));
        assert!(logs_errors_separately(&TextStream::from_name("stdout").unwrap()));
        assert!(logs_errors_separately(&TextStream::Memory(vec![])));
    }

    #[test]
    fn show_test() {
        colored::control::set_override(false);
        let (res, out, _) = run::<Chess>(&[]);
        assert!(res.is_ok());
        assert!(out.starts_with(" 8 r n b q k b n r"));
        assert!(out.contains("white to move"));
        let (res, out, _) = run::<Xiangqi>(&["--fen", "cannon_check"]);
        assert!(res.is_ok());
        assert!(out.contains("red to move"));
        let (res, out, _) = run::<Chess>(&["--fen", "queen_endgame"]);
        assert!(res.is_ok());
        assert!(out.contains("white to move"));
        let (res, _, _) = run::<Chess>(&["--fen", "not_a_position"]);
        assert!(res.is_err());
    }

    #[test]
    fn moves_test() {
        let (res, out, log) = run::<Chess>(&["moves", "e2"]);
        assert!(res.is_ok());
        assert_eq!(out.trim(), "e2e3 e2e4");
        assert!(log.contains("2 legal moves"));
        let (_, out, _) = run::<Xiangqi>(&["moves"]);
        assert_eq!(out.split_whitespace().count(), 44);
        let (res, _, _) = run::<Chess>(&["moves", "z9"]);
        assert!(res.is_err());
    }

    #[test]
    fn play_test() {
        let (res, out, log) = run::<Chess>(&["play", "f2f3", "e7e5", "g2g4", "d8h4"]);
        assert!(res.is_ok());
        assert!(out.contains("black wins"));
        assert!(log.contains("] black wins"));
        let (res, _, log) = run::<Chess>(&["play", "e2e4", "e2e4"]);
        assert!(res.is_err());
        assert!(log.contains("Error: Can't play 'e2e4'"));
        // a rejected move onto an own piece is not a capture
        let (res, _, log) = run::<Chess>(&["play", "e1e2"]);
        assert!(res.is_err());
        assert!(!log.contains("captures"), "{log}");
        let (res, _, log) = run::<Chess>(&["play", "e2e4", "d7d5", "e4d5"]);
        assert!(res.is_ok());
        assert!(log.contains("white captures the black-pawn-1-3"), "{log}");
        let fen = "k7/8/1Q6/8/8/8/8/K7 w";
        let (res, out, _) = run::<Chess>(&["--fen", fen, "--stalemate", "loss-for-stalemated", "play", "a1a2"]);
        assert!(res.is_ok());
        assert!(out.contains("white wins"), "{out}");
    }

    #[test]
    fn perft_and_selfplay_test() {
        let (res, out, _) = run::<Xiangqi>(&["perft", "1"]);
        assert!(res.is_ok());
        assert!(out.starts_with("depth 1 nodes 44 "));
        let (res, out, _) = run::<Chess>(&["perft", "2", "--split"]);
        assert!(res.is_ok());
        assert!(out.contains("nodes 400"));
        assert_eq!(out.lines().count(), 21);
        let (res, _, log) = run::<Chess>(&["selfplay", "--plies", "10", "--seed", "3"]);
        assert!(res.is_ok());
        assert!(log.contains("] Debug: 1. white: "));
    }
}
