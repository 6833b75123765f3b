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

use std::fmt::Debug;
use std::str::FromStr;

use anyhow::anyhow;
use colored::Colorize;
use edit_distance::edit_distance;
use itertools::Itertools;

use crate::general::common::Description::WithDescription;

pub type Res<T> = anyhow::Result<T>;

pub type EntityList<T> = Vec<T>;

pub fn parse_int_from_str<T: FromStr>(as_str: &str, name: &str) -> Res<T> {
    // `parse::<T>()` has an error type we can't name generically, so we write the message ourselves
    as_str
        .parse::<T>()
        .map_err(|_err| anyhow!("Couldn't parse {name} ('{}')", as_str.red()))
}

/// The name is used to identify the entity throughout the command line interface.
/// Examples are games ('chess', 'xiangqi') and named positions ('startpos').
pub trait NamedEntity: Debug {
    /// The short name must consist of a single word in lowercase letters
    fn short_name(&self) -> &str;

    /// The long name can be prettier than the short name and consist of more than one word
    fn long_name(&self) -> String;

    fn description(&self) -> Option<String>;

    fn matches(&self, name: &str) -> bool {
        self.short_name().eq_ignore_ascii_case(name)
    }
}

pub trait StaticallyNamedEntity: NamedEntity {
    fn static_short_name() -> &'static str
    where
        Self: Sized;

    fn static_long_name() -> String
    where
        Self: Sized;

    fn static_description() -> String
    where
        Self: Sized;
}

impl<T: StaticallyNamedEntity> NamedEntity for T {
    fn short_name(&self) -> &str {
        Self::static_short_name()
    }

    fn long_name(&self) -> String {
        Self::static_long_name()
    }

    fn description(&self) -> Option<String> {
        Some(Self::static_description())
    }
}

#[derive(Debug)]
pub struct GenericSelect<T: Debug> {
    pub name: &'static str,
    pub val: T,
}

impl<T: Debug> NamedEntity for GenericSelect<T> {
    fn short_name(&self) -> &str {
        self.name
    }

    fn long_name(&self) -> String {
        self.name.to_string()
    }

    fn description(&self) -> Option<String> {
        None
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Description {
    WithDescription,
    NoDescription,
}

pub fn to_name_and_optional_description<T: NamedEntity + ?Sized>(
    x: &T,
    description: Description,
) -> String {
    if description == WithDescription {
        format!(
            "\n{name:<18} {descr}",
            name = format!("'{}':", x.short_name().bold()),
            descr = x
                .description()
                .unwrap_or_else(|| "<No description>".to_string())
        )
    } else {
        format!("'{}'", x.short_name().bold())
    }
}

/// Looks up `name` in `list`. On failure, the error lists the valid names, or the near matches if there are any.
pub fn select_name_static<'a, T: NamedEntity, I: ExactSizeIterator<Item = &'a T> + Clone>(
    name: &str,
    mut list: I,
    typ: &str,
    game_name: &str,
    descr: Description,
) -> Res<&'a T> {
    if let Some(res) = list.clone().find(|entity| entity.matches(name)) {
        return Ok(res);
    }
    let to_name = |x: &&T| to_name_and_optional_description(*x, descr);
    let list_as_string = match list.len() {
        0 => format!("There are no valid {typ} names"),
        1 => format!(
            "The only valid {typ} is {}",
            list.next().map(|x| to_name(&x)).unwrap_or_default()
        ),
        _ => {
            let near_matches = list
                .clone()
                .filter(|x| {
                    edit_distance(
                        &x.short_name().to_ascii_lowercase(),
                        &name.to_ascii_lowercase(),
                    ) <= 3
                })
                .collect_vec();
            if near_matches.is_empty() {
                format!("Valid {typ} names are {}", list.map(|x| to_name(&x)).join(", "))
            } else {
                format!(
                    "Perhaps you meant: {}",
                    near_matches.iter().map(to_name).join(", ")
                )
            }
        }
    };
    Err(anyhow!(
        "Couldn't find {typ} '{name}' for {game_name}. {list_as_string}.",
        name = name.red(),
        game_name = game_name.bold()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::general::common::Description::NoDescription;

    #[test]
    fn select_by_name_test() {
        let list = vec![
            GenericSelect { name: "startpos", val: 1 },
            GenericSelect { name: "endgame", val: 2 },
        ];
        let found = select_name_static("ENDGAME", list.iter(), "position", "chess", NoDescription);
        assert_eq!(found.unwrap().val, 2);
        let err = select_name_static("startps", list.iter(), "position", "chess", NoDescription)
            .unwrap_err()
            .to_string();
        assert!(err.contains("Perhaps you meant"));
        let err = select_name_static("xyzzy_foo", list.iter(), "position", "chess", NoDescription)
            .unwrap_err()
            .to_string();
        assert!(err.contains("Valid position names are"));
    }

    #[test]
    fn parse_int_test() {
        assert_eq!(parse_int_from_str::<usize>("42", "depth").unwrap(), 42);
        assert!(parse_int_from_str::<usize>("-3", "depth").is_err());
    }
}
