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

//! Text output: log messages with a timestamp and a severity prefix, and board diagrams.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{Stderr, Stdout, Write, stderr, stdout};
use std::path::Path;

use anyhow::{bail, ensure};
use colored::Colorize;
use itertools::Itertools;
use strum::IntoEnumIterator;
use strum_macros::Display;

use crate::game_state::GameState;
use crate::games::{CharType, Color, Variant};
use crate::general::board::Board;
use crate::general::common::Res;
use crate::general::squares::{DimT, Position, file_to_char};

#[derive(Debug, Display, Eq, PartialEq, Copy, Clone)]
pub enum Message {
    Info,
    Warning,
    Error,
    Debug,
}

impl Message {
    fn message_prefix(self) -> &'static str {
        match self {
            Message::Info => "",
            Message::Warning => "Warning:",
            Message::Error => "Error:",
            Message::Debug => "Debug:",
        }
    }
}

#[derive(Debug)]
pub enum TextStream {
    File(File, String), // Not buffered, so the log file is up to date if the program crashes.
    Stdout(Stdout),
    Stderr(Stderr),
    /// Keeps everything in memory, so the log can be inspected afterwards.
    Memory(Vec<u8>),
}

impl TextStream {
    pub fn write(&mut self, prefix: &str, msg: &str) {
        let time = chrono::Local::now().format("%H:%M:%S%.3f");
        let prefix = if prefix.is_empty() { String::new() } else { format!("{prefix} ") };
        for line in msg.lines() {
            _ = writeln!(self.stream(), "[{time}] {prefix}{line}");
        }
    }

    pub fn stream(&mut self) -> &mut dyn Write {
        match self {
            TextStream::File(f, _) => f,
            TextStream::Stdout(out) => out,
            TextStream::Stderr(err) => err,
            TextStream::Memory(buf) => buf,
        }
    }

    /// `stdout`, `stderr`, or a file name, which must contain a `.` to catch typos.
    pub fn from_name(name: &str) -> Res<Self> {
        let stream = match name.trim() {
            "" | "stderr" => TextStream::Stderr(stderr()),
            "stdout" => TextStream::Stdout(stdout()),
            s => TextStream::from_filename(s)?,
        };
        Ok(stream)
    }

    pub fn from_filename(name: &str) -> Res<Self> {
        ensure!(
            name.contains('.'),
            "'{}' does not appear to be a valid log filename (it does not contain a '.'). \
            Expected either a filename, 'stdout' or 'stderr'.",
            name.red()
        );
        let path = Path::new(name);
        let file = match File::create(path) {
            Ok(file) => file,
            Err(err) => bail!("Couldn't create log file '{0}': {1}", name.red(), err),
        };
        let name = path
            .canonicalize()
            .ok()
            .as_ref()
            .and_then(|p| p.to_str())
            .unwrap_or(name)
            .to_string();
        Ok(TextStream::File(file, name))
    }

    pub fn name(&self) -> String {
        match self {
            TextStream::File(_, name) => name.clone(),
            TextStream::Stdout(_) => "stdout".to_string(),
            TextStream::Stderr(_) => "stderr".to_string(),
            TextStream::Memory(_) => "memory".to_string(),
        }
    }

    /// The text written so far, for streams that keep it.
    pub fn contents(&self) -> Option<String> {
        match self {
            TextStream::Memory(buf) => Some(String::from_utf8_lossy(buf).to_string()),
            _ => None,
        }
    }
}

/// Writes the messages of the accepted kinds to its stream and drops all others.
#[derive(Debug)]
#[must_use]
pub struct Logger {
    pub stream: TextStream,
    pub accepted: Vec<Message>,
}

impl Logger {
    pub fn new(stream: TextStream, accepted: Vec<Message>) -> Self {
        let mut res = Self { stream, accepted };
        let msg = format!(
            "[Starting logging to {0} at {1}]",
            res.stream.name(),
            chrono::offset::Utc::now().to_rfc2822()
        );
        res.display_message(Message::Debug, &msg);
        res
    }

    /// Everything but debug messages, unless `debug` is set.
    pub fn with_debug(stream: TextStream, debug: bool) -> Self {
        let mut accepted = vec![Message::Info, Message::Warning, Message::Error];
        if debug {
            accepted.push(Message::Debug);
        }
        Self::new(stream, accepted)
    }

    /// A logger that drops every message.
    pub fn silent() -> Self {
        Self::new(TextStream::Memory(vec![]), vec![])
    }

    pub fn display_message(&mut self, typ: Message, message: &str) {
        if self.accepted.contains(&typ) {
            self.stream.write(typ.message_prefix(), message);
        }
    }

    pub fn show<V: Variant>(&mut self, state: &GameState<V>, typ: CharType) {
        let text = state_diagram(state, typ, false);
        self.display_message(Message::Info, &text);
    }
}

fn rank_label<V: Variant>(row: DimT) -> String {
    format!("{:>2}", V::SIZE.height.0 - row)
}

/// A 2D drawing of the board, with ranks on the left and files below. Empty squares are `.`.
///
/// With `colored`, pieces of the first side are bold and the others are dimmed.
pub fn board_diagram<V: Variant>(board: &Board<V>, typ: CharType, colored: bool) -> String {
    let size = V::SIZE;
    let cell_width = if typ == CharType::Unicode { V::UNICODE_CELL_WIDTH } else { 1 };
    let mut res = String::new();
    for row in 0..size.height.0 {
        let cells = (0..size.width.0)
            .map(|column| match board.piece_at(Position::new(row, column)) {
                None => format!("{:<cell_width$}", '.'),
                Some(piece) => {
                    let c = piece.to_char(typ).to_string();
                    if !colored {
                        c
                    } else if piece.side.is_first() {
                        c.bold().to_string()
                    } else {
                        c.dimmed().to_string()
                    }
                }
            })
            .join(" ");
        _ = writeln!(res, "{0} {1}", rank_label::<V>(row), cells);
    }
    let files = (0..size.width.0)
        .map(|column| format!("{:<cell_width$}", file_to_char(column)))
        .join(" ");
    _ = write!(res, "   {files}");
    res
}

/// The diagram of the board, followed by the side to move (or the result) and the captured pieces.
pub fn state_diagram<V: Variant>(state: &GameState<V>, typ: CharType, colored: bool) -> String {
    let mut res = board_diagram(state.board(), typ, colored);
    if state.is_over() {
        let result = match state.winner() {
            Some(winner) => format!("{winner} wins"),
            None => "Draw".to_string(),
        };
        _ = write!(res, "\n{result}");
    } else {
        _ = write!(res, "\n{} to move", state.active());
        if state.board().is_in_check(state.active()) {
            res += " (in check)";
        }
    }
    for side in V::Color::iter() {
        let captured = state.captured_from(side);
        if !captured.is_empty() {
            let pieces = captured.iter().map(|p| p.to_char(typ)).join(" ");
            _ = write!(res, "\nCaptured {side} pieces: {pieces}");
        }
    }
    res
}
