/*
generator.rs

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

//! Generate new levels when the built-in levels are exhausted.
//!
//! A [`LevelGenerator`] object builds the puzzles of a level.
//! The [`chat::ChatLevelGenerator`] implementation asks a chat-completion REST API to design the
//! level, and the [`response`] module cleans, parses, and validates the answer.
//!
//! Generating a level can fail or take too long. In that case [`crate::game::Game`] uses the
//! level that the [`fallback`] module provides, so that the player is never stuck.

pub mod chat;
pub mod fallback;
pub mod response;

use rand::seq::IndexedRandom;
use std::time::Duration;
use thiserror::Error;

use crate::grid::GridConfig;
use crate::levels::{Color, Level, LevelError, SEA_BLUE};
use crate::puzzle::Puzzle;

/// Background colors for generated levels.
const PALETTE: [Color; 5] = [
    SEA_BLUE,
    Color::from_rgb(0xa5d6a7),
    Color::from_rgb(0xffe082),
    Color::from_rgb(0xce93d8),
    Color::from_rgb(0xffab91),
];

/// Error returned when a level cannot be generated.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("{0}")]
    Http(#[from] ureq::Error),

    #[error("no API key configured")]
    MissingApiKey,

    #[error("the response has no choice")]
    NoChoice,

    #[error("cannot parse the generated level: {0}")]
    Json(#[from] serde_json::Error),

    #[error("the generated level has no valid game")]
    NoValidGame,

    #[error("{0}")]
    Level(#[from] LevelError),

    #[error("generation did not finish within {0:?}")]
    Timeout(Duration),

    #[error("the generation worker stopped without an answer")]
    WorkerStopped,
}

/// Parameters for generating a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Number of the level that the player just completed.
    pub previous_level: u32,

    /// Grid on which the puzzles must fit.
    pub grid: GridConfig,
}

impl GenerationRequest {
    /// Number of the level to generate.
    pub fn level(&self) -> u32 {
        self.previous_level.saturating_add(1)
    }
}

/// Source of new levels.
///
/// Implementations may block. [`crate::game::Game`] calls them from a worker thread.
pub trait LevelGenerator: Send + Sync {
    /// Build the puzzles for the level that follows `request.previous_level`.
    fn generate(&self, request: &GenerationRequest) -> Result<Vec<Puzzle>, GenerationError>;
}

/// Build a [`Level`] object from generated puzzles. The background color is random.
pub fn build_level(number: u32, puzzles: Vec<Puzzle>) -> Result<Level, GenerationError> {
    let background: Color = PALETTE
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(SEA_BLUE);
    Ok(Level::new(number, puzzles, background)?)
}
