/*
level_2.rs

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

//! Level 2: branching paths with two solutions and a dead end.

use crate::grid::{Cell, Direction};
use crate::puzzle::{PathSegment, Puzzle, Solution};

use super::{Level, LevelError, SEA_BLUE, puzzle_error};

use Direction::{Down, Right, Up};

/// Build the level.
pub fn level() -> Result<Level, LevelError> {
    let branches: Puzzle = Puzzle::new(
        Cell::new(0, 0),
        vec![
            // Common start
            PathSegment::new("b1", Cell::new(0, 0), Cell::new(5, 0)),
            PathSegment::new("b2", Cell::new(5, 0), Cell::new(5, 3)),
            // First branch at (5, 3)
            PathSegment::new("wrong1", Cell::new(5, 3), Cell::new(0, 3)),
            PathSegment::new("b3", Cell::new(5, 3), Cell::new(7, 3)),
            // Second branch at (7, 3)
            PathSegment::new("b4", Cell::new(7, 3), Cell::new(7, 6)),
            PathSegment::new("b5", Cell::new(7, 3), Cell::new(7, 0)),
            PathSegment::new("b6", Cell::new(7, 0), Cell::new(12, 0)),
            PathSegment::new("b5a", Cell::new(7, 6), Cell::new(12, 6)),
        ],
        vec![
            // Up to the top edge
            Solution::new(vec![Right, Down, Right, Up, Right], &["b1", "b2", "b3", "b5", "b6"])
                .map_err(puzzle_error(2, 0))?,
            // Down to the bottom edge
            Solution::new(
                vec![Right, Down, Right, Down, Right],
                &["b1", "b2", "b3", "b4", "b5a"],
            )
            .map_err(puzzle_error(2, 0))?,
        ],
    )
    .map_err(puzzle_error(2, 0))?;

    Level::new(2, vec![branches], SEA_BLUE)
}
