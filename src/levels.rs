/*
levels.rs

Copyright 2025 Hervé Quatremain

This file is part of Turtle Tail.

Turtle Tail is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Turtle Tail is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Turtle Tail. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Levels and the level repository.
//!
//! A [`Level`] is an ordered list of [`Puzzle`] objects that the player solves one after the
//! other.
//! The [`LevelRepository`] object keeps the levels in memory, indexed by their number.
//! It starts with the built-in levels, and the levels that the generator builds at runtime are
//! added to it. Generated levels are not saved: they are generated again after a restart.

// For developers: add your new level to this list of modules and to `built_in_levels()`.
pub mod level_1;
pub mod level_2;

use log::{debug, error};
use std::collections::BTreeMap;
use std::fmt;

use crate::grid::GridConfig;
use crate::puzzle::{Puzzle, PuzzleError};

/// Background color of a level.
///
/// Color components are integers between 0 and 255.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    /// Create a [`Color`] object from a `0xRRGGBB` value.
    pub const fn from_rgb(rgb: u32) -> Self {
        Self {
            red: ((rgb >> 16) & 0xff) as u8,
            green: ((rgb >> 8) & 0xff) as u8,
            blue: (rgb & 0xff) as u8,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

/// Sea blue background of the built-in levels.
pub const SEA_BLUE: Color = Color::from_rgb(0x82d4fa);

/// Level object.
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    /// Level number, starting at 1.
    number: u32,

    /// Puzzles to solve, in order.
    puzzles: Vec<Puzzle>,

    /// Background color.
    pub background: Color,
}

/// Error returned when a level definition is inconsistent.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LevelError {
    #[error("level numbers start at 1")]
    InvalidNumber,

    #[error("level {0} has no puzzle")]
    NoPuzzle(u32),

    #[error("puzzle {index} of level {level}: {source}")]
    Puzzle {
        level: u32,
        index: usize,
        source: PuzzleError,
    },
}

/// Return a function that wraps a [`PuzzleError`] for the given puzzle of a level.
pub(crate) fn puzzle_error(level: u32, index: usize) -> impl Fn(PuzzleError) -> LevelError {
    move |source| LevelError::Puzzle {
        level,
        index,
        source,
    }
}

impl Level {
    /// Create a [`Level`] object.
    ///
    /// # Errors
    ///
    /// The number must be at least 1, and the level must have at least one puzzle.
    pub fn new(number: u32, puzzles: Vec<Puzzle>, background: Color) -> Result<Self, LevelError> {
        if number == 0 {
            return Err(LevelError::InvalidNumber);
        }
        if puzzles.is_empty() {
            return Err(LevelError::NoPuzzle(number));
        }
        Ok(Self {
            number,
            puzzles,
            background,
        })
    }

    /// Create a [`Level`] object with a single puzzle.
    ///
    /// A level number of 0 is replaced by 1.
    pub fn with_puzzle(number: u32, puzzle: Puzzle, background: Color) -> Self {
        Self {
            number: number.max(1),
            puzzles: vec![puzzle],
            background,
        }
    }

    /// Return the level number.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Return the puzzles, in order.
    pub fn puzzles(&self) -> &[Puzzle] {
        &self.puzzles
    }

    /// Return the puzzle at the given position.
    pub fn puzzle(&self, index: usize) -> Option<&Puzzle> {
        self.puzzles.get(index)
    }

    /// Number of puzzles in the level.
    pub fn len(&self) -> usize {
        self.puzzles.len()
    }

    /// Whether the level has no puzzle. Always false for a level built with [`Level::new`].
    pub fn is_empty(&self) -> bool {
        self.puzzles.is_empty()
    }

    /// Whether all the cells of all the puzzles lie within the grid.
    pub fn fits(&self, grid: &GridConfig) -> bool {
        self.puzzles.iter().all(|puzzle| {
            grid.contains(puzzle.start_cell())
                && puzzle
                    .all_paths()
                    .iter()
                    .all(|p| grid.contains(p.start) && grid.contains(p.end))
        })
    }
}

/// Return the hand-authored levels.
pub fn built_in_levels() -> Vec<Result<Level, LevelError>> {
    vec![level_1::level(), level_2::level()]
}

/// In-memory store of the levels, indexed by the level number.
#[derive(Debug, Clone, Default)]
pub struct LevelRepository {
    levels: BTreeMap<u32, Level>,
}

impl LevelRepository {
    /// Create an empty [`LevelRepository`] object.
    pub fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
        }
    }

    /// Create a [`LevelRepository`] object that contains the built-in levels.
    pub fn with_default_levels() -> Self {
        let mut repository: LevelRepository = Self::new();
        for level in built_in_levels() {
            match level {
                Ok(l) => repository.put(l.number(), l),
                Err(e) => error!("Skipping invalid built-in level: {e}"),
            }
        }
        repository
    }

    /// Return the level with the given number, or None if that level does not exist yet.
    pub fn get(&self, number: u32) -> Option<&Level> {
        self.levels.get(&number)
    }

    /// Store a level. A previous level with the same number is replaced.
    pub fn put(&mut self, number: u32, level: Level) {
        debug!("Storing level {number} ({} puzzles)", level.len());
        self.levels.insert(number, level);
    }

    /// Whether the level with the given number exists.
    pub fn has(&self, number: u32) -> bool {
        self.levels.contains_key(&number)
    }

    /// Return all the levels, sorted by number.
    pub fn levels(&self) -> impl Iterator<Item = &Level> {
        self.levels.values()
    }

    /// Number of levels in the repository.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Whether the repository has no level.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}
