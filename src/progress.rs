/*
progress.rs

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

//! Player progress: the level reached and the score.
//!
//! The [`Progress`] object is owned by [`crate::game::Game`], which saves it after every change.
//! See the [`crate::saver::progress`] module that saves and restores the object.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Points awarded for each solved puzzle.
pub const PUZZLE_AWARD: u32 = 10;

/// Bonus points awarded when moving to the next level.
pub const LEVEL_BONUS: u32 = 50;

/// Level and score checkpoint.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Level reached, starting at 1.
    pub level: u32,

    /// Total score.
    pub score: u32,

    /// When the progress was last changed.
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress {
    /// Create a [`Progress`] object for a new player: level 1, no point.
    pub fn new() -> Self {
        Self {
            level: 1,
            score: 0,
            saved_at: None,
        }
    }

    /// Add the points for a solved puzzle.
    pub fn puzzle_solved(&mut self) {
        self.score = self.score.saturating_add(PUZZLE_AWARD);
        self.touch();
    }

    /// Move to the next level and add the level bonus.
    pub fn level_completed(&mut self) {
        self.level = self.level.saturating_add(1);
        self.score = self.score.saturating_add(LEVEL_BONUS);
        self.touch();
    }

    /// Move to the next level without the bonus, when the player skips a level.
    pub fn level_skipped(&mut self) {
        self.level = self.level.saturating_add(1);
        self.touch();
    }

    /// Fix values that a hand-edited or corrupted file could contain.
    pub fn sanitize(mut self) -> Self {
        if self.level == 0 {
            self.level = 1;
        }
        self
    }

    fn touch(&mut self) {
        self.saved_at = Some(Utc::now());
    }
}
