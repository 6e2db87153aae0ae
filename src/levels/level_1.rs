/*
level_1.rs

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

//! Level 1: a single staircase.

use crate::grid::{Cell, Direction};
use crate::puzzle::{PathSegment, Puzzle, Solution};

use super::{Level, LevelError, SEA_BLUE, puzzle_error};

/// Build the level.
pub fn level() -> Result<Level, LevelError> {
    // Right, up, right
    let staircase: Puzzle = Puzzle::new(
        Cell::new(0, 5),
        vec![
            PathSegment::new("p1", Cell::new(0, 5), Cell::new(6, 5)),
            PathSegment::new("p2", Cell::new(6, 5), Cell::new(6, 1)),
            PathSegment::new("p3", Cell::new(6, 1), Cell::new(12, 1)),
        ],
        vec![
            Solution::new(
                vec![Direction::Right, Direction::Up, Direction::Right],
                &["p1", "p2", "p3"],
            )
            .map_err(puzzle_error(1, 0))?,
        ],
    )
    .map_err(puzzle_error(1, 0))?;

    Level::new(1, vec![staircase], SEA_BLUE)
}
