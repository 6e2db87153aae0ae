/*
lib.rs

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

//! Turtle Tail: children plan a path for a turtle by dragging direction arrows into slots.
//!
//! The crate implements the game core:
//!
//! * [`grid`], [`puzzle`], and [`levels`] describe the puzzles.
//! * [`evaluator`] verifies the moves that the player planned, and [`player_input`] manages the
//!   slots that the player fills.
//! * [`game`] tracks the level and the score, moves the player through the levels, and asks the
//!   [`generator`] for new levels when the built-in ones are exhausted.
//! * [`saver`] saves the progress between sessions.

pub mod cli_options;
pub mod config;
pub mod evaluator;
pub mod game;
pub mod generator;
pub mod grid;
pub mod levels;
pub mod player_input;
pub mod progress;
pub mod puzzle;
pub mod saver;
pub mod terminal;
