/*
evaluator.rs

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

//! Verify the moves that the player planned.
//!
//! Each submission is evaluated on its own: there is no partial credit. After a wrong answer
//! the player can submit again right away.

use log::debug;

use crate::grid::Direction;
use crate::puzzle::{Puzzle, Solution};

/// Outcome of a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    /// The moves match this solution. The turtle can follow its paths.
    Correct(Solution),

    /// The moves do not match any solution.
    Incorrect,
}

impl Evaluation {
    /// Whether the submission was correct.
    pub fn is_correct(&self) -> bool {
        matches!(self, Evaluation::Correct(_))
    }
}

/// Status of the current attempt.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AttemptState {
    /// Waiting for the player to submit.
    #[default]
    Idle,

    /// The last submission was correct.
    Correct(Solution),

    /// The last submission was wrong. The player can try again.
    Incorrect,
}

/// Puzzle evaluator.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    state: AttemptState,

    // Number of wrong submissions since the last reset.
    mistakes: usize,
}

impl Evaluator {
    /// Create an [`Evaluator`] object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the status of the current attempt.
    pub fn state(&self) -> &AttemptState {
        &self.state
    }

    /// Return the number of wrong submissions for the current puzzle.
    pub fn mistakes(&self) -> usize {
        self.mistakes
    }

    /// Compare the planned moves with the puzzle solutions.
    ///
    /// An empty submission is always wrong.
    pub fn submit(&mut self, puzzle: &Puzzle, directions: &[Direction]) -> Evaluation {
        let matched: Option<&Solution> = if directions.is_empty() {
            None
        } else {
            puzzle.match_solution(directions)
        };
        match matched {
            Some(solution) => {
                debug!("Correct moves: {directions:?}");
                self.state = AttemptState::Correct(solution.clone());
                Evaluation::Correct(solution.clone())
            }
            None => {
                self.mistakes += 1;
                debug!("Wrong moves: {directions:?} (mistakes = {})", self.mistakes);
                self.state = AttemptState::Incorrect;
                Evaluation::Incorrect
            }
        }
    }

    /// Start a new attempt, for the next puzzle.
    pub fn reset(&mut self) {
        self.state = AttemptState::Idle;
        self.mistakes = 0;
    }
}
