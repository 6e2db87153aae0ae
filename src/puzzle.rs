/*
puzzle.rs

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

//! Puzzle internal representation.
//!
//! A [`Puzzle`] is one stage of a level: the cell where the turtle starts, all the path segments
//! drawn on the grid (the correct ones and the decoys), and the accepted [`Solution`] objects.
//!
//! Objects are validated when they are built and are read-only afterward.

use std::collections::HashSet;
use thiserror::Error;

use crate::grid::{Cell, Direction, cell_direction_to};

/// Error returned when a puzzle definition is inconsistent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("path ID {0:?} is used by several paths")]
    DuplicatePathId(String),

    #[error("the puzzle has no solution")]
    NoSolution,

    #[error("the puzzle has no path")]
    NoPath,

    #[error("solution {0} has no move")]
    EmptySolution(usize),

    #[error("solution {solution} references the unknown path ID {id:?}")]
    UnknownPathId { solution: usize, id: String },

    #[error("solution has {directions} directions but {path_ids} path IDs")]
    LengthMismatch { directions: usize, path_ids: usize },

    #[error("path {0:?} is not horizontal or vertical")]
    NotAxisAligned(String),
}

/// Path segment between two cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegment {
    /// Identifier, unique within the puzzle.
    pub id: String,

    /// First cell of the segment.
    pub start: Cell,

    /// Last cell of the segment.
    pub end: Cell,
}

impl PathSegment {
    /// Create a [`PathSegment`] object.
    pub fn new(id: &str, start: Cell, end: Cell) -> Self {
        Self {
            id: id.to_string(),
            start,
            end,
        }
    }

    /// Direction of the segment, or None if the segment is not axis-aligned.
    pub fn direction(&self) -> Option<Direction> {
        cell_direction_to(self.start, self.end)
    }
}

/// Accepted way of solving a puzzle.
#[derive(Debug, Clone)]
pub struct Solution {
    /// Moves that the player must plan, in order.
    directions: Vec<Direction>,

    /// Path segments that the turtle follows for these moves, in order.
    path_ids: Vec<String>,
}

/// Two solutions are the same when they have the same moves. The path IDs are only used to
/// animate the turtle.
impl PartialEq for Solution {
    fn eq(&self, other: &Self) -> bool {
        self.directions == other.directions
    }
}

impl Solution {
    /// Create a [`Solution`] object.
    ///
    /// # Errors
    ///
    /// The two lists must have the same length.
    pub fn new(directions: Vec<Direction>, path_ids: &[&str]) -> Result<Self, PuzzleError> {
        if directions.len() != path_ids.len() {
            return Err(PuzzleError::LengthMismatch {
                directions: directions.len(),
                path_ids: path_ids.len(),
            });
        }
        Ok(Self {
            directions,
            path_ids: path_ids.iter().map(|id| id.to_string()).collect(),
        })
    }

    /// Create a [`Solution`] that follows the given paths in order.
    ///
    /// The moves are derived from the direction of each path.
    pub fn from_paths(paths: &[PathSegment]) -> Result<Self, PuzzleError> {
        let mut directions: Vec<Direction> = Vec::with_capacity(paths.len());
        for p in paths {
            match p.direction() {
                Some(d) => directions.push(d),
                None => return Err(PuzzleError::NotAxisAligned(p.id.clone())),
            }
        }
        Ok(Self {
            directions,
            path_ids: paths.iter().map(|p| p.id.clone()).collect(),
        })
    }

    /// Return the moves of the solution.
    pub fn directions(&self) -> &[Direction] {
        &self.directions
    }

    /// Return the IDs of the paths that the turtle follows.
    pub fn path_ids(&self) -> &[String] {
        &self.path_ids
    }

    /// Number of moves.
    pub fn len(&self) -> usize {
        self.directions.len()
    }

    /// Whether the solution has no move.
    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }
}

/// Puzzle object.
#[derive(Debug, Clone, PartialEq)]
pub struct Puzzle {
    /// Where the turtle starts.
    start_cell: Cell,

    /// All the visible paths (correct and decoys).
    all_paths: Vec<PathSegment>,

    /// Accepted solutions, in priority order.
    solutions: Vec<Solution>,
}

impl Puzzle {
    /// Create a [`Puzzle`] object.
    ///
    /// # Errors
    ///
    /// The method returns an error when two paths share the same ID, when there is no solution,
    /// when a solution has no move, or when a solution references a path that does not exist.
    pub fn new(
        start_cell: Cell,
        all_paths: Vec<PathSegment>,
        solutions: Vec<Solution>,
    ) -> Result<Self, PuzzleError> {
        let mut ids: HashSet<&str> = HashSet::with_capacity(all_paths.len());
        for p in &all_paths {
            if !ids.insert(p.id.as_str()) {
                return Err(PuzzleError::DuplicatePathId(p.id.clone()));
            }
        }
        if solutions.is_empty() {
            return Err(PuzzleError::NoSolution);
        }
        for (i, s) in solutions.iter().enumerate() {
            if s.is_empty() {
                return Err(PuzzleError::EmptySolution(i));
            }
            if let Some(id) = s.path_ids.iter().find(|id| !ids.contains(id.as_str())) {
                return Err(PuzzleError::UnknownPathId {
                    solution: i,
                    id: id.clone(),
                });
            }
        }

        Ok(Self {
            start_cell,
            all_paths,
            solutions,
        })
    }

    /// Create a [`Puzzle`] object where the only solution is to follow all the paths in order.
    pub fn from_path_list(start_cell: Cell, paths: Vec<PathSegment>) -> Result<Self, PuzzleError> {
        if paths.is_empty() {
            return Err(PuzzleError::NoPath);
        }
        let solution: Solution = Solution::from_paths(&paths)?;
        Self::new(start_cell, paths, vec![solution])
    }

    /// Create a [`Puzzle`] object with a single path that the turtle follows in one move.
    pub fn single_path(id: &str, start: Cell, end: Cell, direction: Direction) -> Self {
        Self {
            start_cell: start,
            all_paths: vec![PathSegment::new(id, start, end)],
            solutions: vec![Solution {
                directions: vec![direction],
                path_ids: vec![id.to_string()],
            }],
        }
    }

    /// Return the cell where the turtle starts.
    pub fn start_cell(&self) -> Cell {
        self.start_cell
    }

    /// Return all the paths to draw.
    pub fn all_paths(&self) -> &[PathSegment] {
        &self.all_paths
    }

    /// Return the accepted solutions.
    pub fn solutions(&self) -> &[Solution] {
        &self.solutions
    }

    /// Return the path with the given ID.
    pub fn path(&self, id: &str) -> Option<&PathSegment> {
        self.all_paths.iter().find(|p| p.id == id)
    }

    /// Return the paths for the given IDs, in the same order.
    ///
    /// Unknown IDs are skipped.
    pub fn paths_for_ids<S: AsRef<str>>(&self, ids: &[S]) -> Vec<&PathSegment> {
        ids.iter().filter_map(|id| self.path(id.as_ref())).collect()
    }

    /// Return the paths that the turtle follows for the given solution.
    pub fn solution_paths(&self, solution: &Solution) -> Vec<&PathSegment> {
        self.paths_for_ids(solution.path_ids())
    }

    /// Return the first solution that has exactly the moves that the player planned, or None.
    pub fn match_solution(&self, directions: &[Direction]) -> Option<&Solution> {
        self.solutions
            .iter()
            .find(|s| s.directions.as_slice() == directions)
    }

    /// Number of moves of the shortest solution. The player gets that many slots.
    pub fn moves(&self) -> usize {
        self.solutions.iter().map(Solution::len).min().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Direction::*;

    fn staircase() -> Puzzle {
        let paths: Vec<PathSegment> = vec![
            PathSegment::new("p1", Cell::new(0, 5), Cell::new(6, 5)),
            PathSegment::new("p2", Cell::new(6, 5), Cell::new(6, 1)),
            PathSegment::new("p3", Cell::new(6, 1), Cell::new(12, 1)),
            PathSegment::new("decoy", Cell::new(6, 5), Cell::new(6, 6)),
        ];
        let solutions: Vec<Solution> = vec![
            Solution::new(vec![Right, Up, Right], &["p1", "p2", "p3"]).unwrap(),
            Solution::new(vec![Right, Down], &["p1", "decoy"]).unwrap(),
        ];
        Puzzle::new(Cell::new(0, 5), paths, solutions).unwrap()
    }

    #[test]
    fn test_stored_solutions_match_themselves() {
        let puzzle: Puzzle = staircase();
        for s in puzzle.solutions() {
            assert_eq!(puzzle.match_solution(s.directions()), Some(s));
        }
    }

    #[test]
    fn test_other_sequences_do_not_match() {
        let puzzle: Puzzle = staircase();
        assert_eq!(puzzle.match_solution(&[Right, Right, Up]), None);
        assert_eq!(puzzle.match_solution(&[Right, Up]), None);
        assert_eq!(puzzle.match_solution(&[Right, Up, Right, Right]), None);
        assert_eq!(puzzle.match_solution(&[]), None);
    }

    #[test]
    fn test_first_match_wins() {
        let paths: Vec<PathSegment> = vec![
            PathSegment::new("a", Cell::new(0, 0), Cell::new(3, 0)),
            PathSegment::new("b", Cell::new(0, 1), Cell::new(3, 1)),
        ];
        let solutions: Vec<Solution> = vec![
            Solution::new(vec![Right], &["a"]).unwrap(),
            Solution::new(vec![Right], &["b"]).unwrap(),
        ];
        let puzzle: Puzzle = Puzzle::new(Cell::new(0, 0), paths, solutions).unwrap();
        let s: &Solution = puzzle.match_solution(&[Right]).unwrap();
        assert_eq!(s.path_ids(), &["a".to_string()]);
    }

    #[test]
    fn test_paths_for_ids_drops_unknown_ids() {
        let puzzle: Puzzle = staircase();
        let paths: Vec<&PathSegment> = puzzle.paths_for_ids(&["x", "p1", "y"]);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].id, "p1");

        let ids: Vec<&str> = puzzle
            .paths_for_ids(&["p3", "p1", "p2"])
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, vec!["p3", "p1", "p2"]);
    }

    #[test]
    fn test_invalid_definitions() {
        let p1: PathSegment = PathSegment::new("p1", Cell::new(0, 0), Cell::new(2, 0));
        let solution: Solution = Solution::new(vec![Right], &["p1"]).unwrap();

        assert_eq!(
            Puzzle::new(
                Cell::new(0, 0),
                vec![p1.clone(), p1.clone()],
                vec![solution.clone()]
            ),
            Err(PuzzleError::DuplicatePathId("p1".to_string()))
        );
        assert_eq!(
            Puzzle::new(Cell::new(0, 0), vec![p1.clone()], Vec::new()),
            Err(PuzzleError::NoSolution)
        );
        let bad: Solution = Solution::new(vec![Right, Down], &["p1", "p9"]).unwrap();
        assert_eq!(
            Puzzle::new(Cell::new(0, 0), vec![p1], vec![bad]),
            Err(PuzzleError::UnknownPathId {
                solution: 0,
                id: "p9".to_string()
            })
        );
        assert_eq!(
            Solution::new(vec![Right, Down], &["p1"]).unwrap_err(),
            PuzzleError::LengthMismatch {
                directions: 2,
                path_ids: 1
            }
        );
    }

    #[test]
    fn test_empty_solution_is_rejected() {
        let p1: PathSegment = PathSegment::new("p1", Cell::new(0, 0), Cell::new(2, 0));
        let empty: Solution = Solution::new(Vec::new(), &[]).unwrap();
        let right: Solution = Solution::new(vec![Right], &["p1"]).unwrap();
        assert_eq!(
            Puzzle::new(Cell::new(0, 0), vec![p1], vec![right, empty]),
            Err(PuzzleError::EmptySolution(1))
        );
    }

    #[test]
    fn test_from_path_list() {
        let paths: Vec<PathSegment> = vec![
            PathSegment::new("p1", Cell::new(0, 0), Cell::new(4, 0)),
            PathSegment::new("p2", Cell::new(4, 0), Cell::new(4, 2)),
            PathSegment::new("p3", Cell::new(4, 2), Cell::new(1, 2)),
        ];
        let puzzle: Puzzle = Puzzle::from_path_list(Cell::new(0, 0), paths).unwrap();
        assert_eq!(puzzle.solutions().len(), 1);
        assert_eq!(puzzle.solutions()[0].directions(), &[Right, Down, Left]);
        assert_eq!(puzzle.moves(), 3);

        let diagonal: Vec<PathSegment> =
            vec![PathSegment::new("d", Cell::new(0, 0), Cell::new(2, 2))];
        assert_eq!(
            Puzzle::from_path_list(Cell::new(0, 0), diagonal),
            Err(PuzzleError::NotAxisAligned("d".to_string()))
        );
        assert_eq!(
            Puzzle::from_path_list(Cell::new(0, 0), Vec::new()),
            Err(PuzzleError::NoPath)
        );
    }
}
