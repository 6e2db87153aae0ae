/*
grid.rs

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

//! Grid coordinate space.
//!
//! The turtle moves on a rectangular grid of tiles.
//! Cells are addressed by their column (`x`) and their row (`y`), starting from the top left
//! corner. The `y` coordinate grows downward, so moving [`Direction::Down`] increases `y`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum_macros::FromRepr;
use thiserror::Error;

/// Number of rows in the default grid.
pub const DEFAULT_ROWS: i32 = 7;

/// Number of columns in the default grid.
pub const DEFAULT_COLS: i32 = 13;

/// Position of a tile in the grid.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Cell {
    /// Column, from 0 (left) to `cols - 1`.
    pub x: i32,

    /// Row, from 0 (top) to `rows - 1`.
    pub y: i32,
}

impl Cell {
    /// Create a [`Cell`] object.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Error returned when a drag payload does not name a direction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectionError {
    #[error("unknown direction label {0:?}")]
    UnknownLabel(String),

    #[error("unknown direction code {0}")]
    UnknownCode(i32),
}

/// Direction of a move.
///
/// The numeric codes are the ones the arrows carry when the player drags them into the slots.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, FromRepr)]
#[repr(i32)]
pub enum Direction {
    Up = 1,
    Down = 2,
    Left = 3,
    Right = 4,
}

impl Direction {
    /// Return the [`Direction`] for the given arrow code, or None for an unknown code.
    pub fn from_code(code: i32) -> Option<Self> {
        Self::from_repr(code)
    }

    /// Return the arrow code of the direction.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Convert a list of arrow codes. The first unknown code aborts the conversion.
    pub fn from_codes(codes: &[i32]) -> Result<Vec<Self>, DirectionError> {
        codes
            .iter()
            .map(|c| Self::from_code(*c).ok_or(DirectionError::UnknownCode(*c)))
            .collect()
    }

    /// Arrow glyph, for terminal output.
    pub fn arrow(self) -> char {
        match self {
            Direction::Up => '↑',
            Direction::Down => '↓',
            Direction::Left => '←',
            Direction::Right => '→',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
        }
    }
}

/// Parse a drag label.
///
/// Accepted labels are the direction names, their first letter, and the arrow glyphs. The
/// comparison ignores case and surrounding spaces. Anything else is rejected.
impl FromStr for Direction {
    type Err = DirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "up" | "u" | "↑" => Ok(Direction::Up),
            "down" | "d" | "↓" => Ok(Direction::Down),
            "left" | "l" | "←" => Ok(Direction::Left),
            "right" | "r" | "→" => Ok(Direction::Right),
            _ => Err(DirectionError::UnknownLabel(s.to_string())),
        }
    }
}

/// Classify the move between two cells.
///
/// Return None when the two cells are the same, or when both coordinates differ (diagonal move).
pub fn cell_direction_to(from: Cell, to: Cell) -> Option<Direction> {
    match (to.x - from.x, to.y - from.y) {
        (dx, 0) if dx > 0 => Some(Direction::Right),
        (dx, 0) if dx < 0 => Some(Direction::Left),
        (0, dy) if dy > 0 => Some(Direction::Down),
        (0, dy) if dy < 0 => Some(Direction::Up),
        _ => None,
    }
}

/// Return the cells covered by an axis-aligned segment, both ends included.
///
/// A diagonal segment covers no cell, and a zero-length segment covers its single cell.
pub fn cells_between(start: Cell, end: Cell) -> Vec<Cell> {
    if start == end {
        return vec![start];
    }
    if start.x != end.x && start.y != end.y {
        return Vec::new();
    }
    let steps: i32 = (end.x - start.x).abs() + (end.y - start.y).abs();
    let (sx, sy) = ((end.x - start.x).signum(), (end.y - start.y).signum());
    (0..=steps)
        .map(|i| Cell::new(start.x + sx * i, start.y + sy * i))
        .collect()
}

/// Grid dimensions.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct GridConfig {
    /// Number of rows.
    pub rows: i32,

    /// Number of columns.
    pub cols: i32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
        }
    }
}

impl GridConfig {
    /// Create a [`GridConfig`] object.
    pub fn new(rows: i32, cols: i32) -> Self {
        Self { rows, cols }
    }

    /// Whether the cell lies within the grid bounds.
    pub fn contains(&self, cell: Cell) -> bool {
        (0..self.cols).contains(&cell.x) && (0..self.rows).contains(&cell.y)
    }

    /// Row in the middle of the grid.
    pub fn middle_row(&self) -> i32 {
        self.rows / 2
    }
}
