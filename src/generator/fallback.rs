/*
fallback.rs

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

//! Built-in level used when generating a level fails.
//!
//! The level has a single puzzle: one straight path across the middle of the grid.
//! It is not saved in the [`crate::levels::LevelRepository`], so the next session tries to
//! generate the level again.

use crate::grid::{Cell, Direction, GridConfig};
use crate::levels::{Level, SEA_BLUE};
use crate::puzzle::Puzzle;

/// ID of the fallback path.
pub const FALLBACK_PATH_ID: &str = "f1";

/// Return the fallback puzzle for the grid.
pub fn fallback_puzzle(grid: &GridConfig) -> Puzzle {
    let row: i32 = grid.middle_row();
    Puzzle::single_path(
        FALLBACK_PATH_ID,
        Cell::new(0, row),
        Cell::new((grid.cols - 1).max(1), row),
        Direction::Right,
    )
}

/// Return the fallback level with the given number.
pub fn fallback_level(number: u32, grid: &GridConfig) -> Level {
    Level::with_puzzle(number, fallback_puzzle(grid), SEA_BLUE)
}
