/*
response.rs

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

//! Parse and validate the levels that the chat-completion API designs.
//!
//! The API is asked for JSON only, but it regularly wraps the document in Markdown code fences.
//! The fences are removed before parsing.
//!
//! Each generated game must describe a single continuous turtle path:
//!
//! * The first path starts on the game start cell.
//! * Each path starts where the previous one ends.
//! * Paths are horizontal or vertical, and stay within the grid.
//! * Paths do not cross each other.
//!
//! Games that break these rules are skipped. The solution of a valid game is to follow all its
//! paths in order.

use log::{debug, warn};
use serde::Deserialize;
use std::collections::HashSet;
use thiserror::Error;

use super::GenerationError;
use crate::grid::{Cell, GridConfig, cell_direction_to, cells_between};
use crate::puzzle::{PathSegment, Puzzle, PuzzleError};

/// Reason why a generated game is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("the game has no path")]
    Empty,

    #[error("path {id:?} leaves the grid at {cell}")]
    OutOfBounds { id: String, cell: Cell },

    #[error("path {0:?} is not horizontal or vertical")]
    NotAxisAligned(String),

    #[error("the first path starts at {found} instead of {expected}")]
    WrongStart { expected: Cell, found: Cell },

    #[error("path {0:?} does not start where the previous path ends")]
    Disconnected(String),

    #[error("paths {0:?} and {1:?} cross each other")]
    Crossing(String, String),

    #[error("{0}")]
    Puzzle(#[from] PuzzleError),
}

/// Generated level, as returned by the API.
#[derive(Deserialize, Debug)]
pub struct LevelResponse {
    /// Games of the level, in order.
    pub games: Vec<GameDto>,
}

/// Generated game.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GameDto {
    /// Where the turtle starts.
    pub start_cell: Cell,

    /// Paths of the game, in the order the turtle follows them.
    pub all_paths: Vec<PathDto>,
}

/// Generated path.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PathDto {
    pub id: String,
    pub start_cell: Cell,
    pub end_cell: Cell,
}

impl From<PathDto> for PathSegment {
    fn from(p: PathDto) -> Self {
        Self {
            id: p.id,
            start: p.start_cell,
            end: p.end_cell,
        }
    }
}

impl GameDto {
    /// Verify the game and build the corresponding [`Puzzle`] object.
    pub fn into_puzzle(self, grid: &GridConfig) -> Result<Puzzle, GameError> {
        let paths: Vec<PathSegment> = self.all_paths.into_iter().map(PathSegment::from).collect();
        validate_paths(self.start_cell, &paths, grid)?;
        Ok(Puzzle::from_path_list(self.start_cell, paths)?)
    }
}

/// Verify that the paths form a single continuous turtle path from the start cell.
pub fn validate_paths(
    start_cell: Cell,
    paths: &[PathSegment],
    grid: &GridConfig,
) -> Result<(), GameError> {
    let first: &PathSegment = paths.first().ok_or(GameError::Empty)?;
    if first.start != start_cell {
        return Err(GameError::WrongStart {
            expected: start_cell,
            found: first.start,
        });
    }

    for (i, p) in paths.iter().enumerate() {
        for cell in [p.start, p.end] {
            if !grid.contains(cell) {
                return Err(GameError::OutOfBounds {
                    id: p.id.clone(),
                    cell,
                });
            }
        }
        if cell_direction_to(p.start, p.end).is_none() {
            return Err(GameError::NotAxisAligned(p.id.clone()));
        }
        if i > 0 && paths[i - 1].end != p.start {
            return Err(GameError::Disconnected(p.id.clone()));
        }
    }

    // Consecutive paths share their joint cell and nothing else. Other paths share nothing.
    let covered: Vec<HashSet<Cell>> = paths
        .iter()
        .map(|p| cells_between(p.start, p.end).into_iter().collect())
        .collect();
    for i in 0..paths.len() {
        for j in (i + 1)..paths.len() {
            let allowed: usize = if j == i + 1 { 1 } else { 0 };
            if covered[i].intersection(&covered[j]).count() > allowed {
                return Err(GameError::Crossing(paths[i].id.clone(), paths[j].id.clone()));
            }
        }
    }
    Ok(())
}

/// Remove the Markdown code fences around the JSON document.
pub fn clean_content(content: &str) -> String {
    content
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Parse the message content that the API returned and build the puzzles.
///
/// # Errors
///
/// The function returns an error when the content is not valid JSON, or when no game passes the
/// verification.
pub fn parse_level(content: &str, grid: &GridConfig) -> Result<Vec<Puzzle>, GenerationError> {
    let json: String = clean_content(content);
    debug!("Cleaned JSON: {json}");

    let response: LevelResponse = serde_json::from_str(&json)?;
    let mut puzzles: Vec<Puzzle> = Vec::with_capacity(response.games.len());
    for (i, game) in response.games.into_iter().enumerate() {
        match game.into_puzzle(grid) {
            Ok(p) => puzzles.push(p),
            Err(e) => warn!("Skipping generated game {}: {e}", i + 1),
        }
    }

    if puzzles.is_empty() {
        return Err(GenerationError::NoValidGame);
    }
    Ok(puzzles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Direction;

    const TWO_GAMES: &str = r#"```json
{
    "games": [
        {
            "startCell": {"x": 0, "y": 0},
            "allPaths": [
                {"id": "p1", "startCell": {"x": 0, "y": 0}, "endCell": {"x": 6, "y": 0}},
                {"id": "p2", "startCell": {"x": 6, "y": 0}, "endCell": {"x": 6, "y": 3}}
            ]
        },
        {
            "startCell": {"x": 0, "y": 0},
            "allPaths": [
                {"id": "p1", "startCell": {"x": 0, "y": 0}, "endCell": {"x": 3, "y": 0}},
                {"id": "p2", "startCell": {"x": 3, "y": 0}, "endCell": {"x": 3, "y": 3}},
                {"id": "p3", "startCell": {"x": 3, "y": 3}, "endCell": {"x": 8, "y": 3}}
            ]
        }
    ]
}
```"#;

    fn segment(id: &str, start: (i32, i32), end: (i32, i32)) -> PathSegment {
        PathSegment::new(id, Cell::new(start.0, start.1), Cell::new(end.0, end.1))
    }

    #[test]
    fn test_clean_content() {
        assert_eq!(clean_content("```json\n{}\n```"), "{}");
        assert_eq!(clean_content("  {\"games\": []} "), "{\"games\": []}");
    }

    #[test]
    fn test_parse_fenced_level() {
        let puzzles: Vec<Puzzle> = parse_level(TWO_GAMES, &GridConfig::default()).unwrap();
        assert_eq!(puzzles.len(), 2);
        assert_eq!(
            puzzles[0].solutions()[0].directions(),
            &[Direction::Right, Direction::Down]
        );
        assert_eq!(
            puzzles[1].solutions()[0].directions(),
            &[Direction::Right, Direction::Down, Direction::Right]
        );
        assert_eq!(puzzles[1].solutions()[0].path_ids().len(), 3);
    }

    #[test]
    fn test_invalid_games_are_skipped() {
        let content: &str = r#"{"games": [
            {"startCell": {"x": 0, "y": 0}, "allPaths": [
                {"id": "p1", "startCell": {"x": 0, "y": 0}, "endCell": {"x": 3, "y": 3}}
            ]},
            {"startCell": {"x": 1, "y": 1}, "allPaths": [
                {"id": "p1", "startCell": {"x": 1, "y": 1}, "endCell": {"x": 1, "y": 4}}
            ]}
        ]}"#;
        let puzzles: Vec<Puzzle> = parse_level(content, &GridConfig::default()).unwrap();
        assert_eq!(puzzles.len(), 1);
        assert_eq!(puzzles[0].start_cell(), Cell::new(1, 1));
    }

    #[test]
    fn test_no_valid_game() {
        let content: &str = r#"{"games": [{"startCell": {"x": 0, "y": 0}, "allPaths": []}]}"#;
        assert!(matches!(
            parse_level(content, &GridConfig::default()),
            Err(GenerationError::NoValidGame)
        ));
        assert!(matches!(
            parse_level(r#"{"games": []}"#, &GridConfig::default()),
            Err(GenerationError::NoValidGame)
        ));
    }

    #[test]
    fn test_not_json() {
        assert!(matches!(
            parse_level("Here is your level!", &GridConfig::default()),
            Err(GenerationError::Json(_))
        ));
    }

    #[test]
    fn test_validation_errors() {
        let grid: GridConfig = GridConfig::default();
        let start: Cell = Cell::new(0, 0);

        assert_eq!(validate_paths(start, &[], &grid), Err(GameError::Empty));
        assert_eq!(
            validate_paths(start, &[segment("p1", (1, 0), (4, 0))], &grid),
            Err(GameError::WrongStart {
                expected: start,
                found: Cell::new(1, 0)
            })
        );
        assert_eq!(
            validate_paths(start, &[segment("p1", (0, 0), (13, 0))], &grid),
            Err(GameError::OutOfBounds {
                id: "p1".to_string(),
                cell: Cell::new(13, 0)
            })
        );
        assert_eq!(
            validate_paths(
                start,
                &[segment("p1", (0, 0), (4, 0)), segment("p2", (5, 0), (5, 3))],
                &grid
            ),
            Err(GameError::Disconnected("p2".to_string()))
        );
        assert_eq!(
            validate_paths(start, &[segment("p1", (0, 0), (0, 0))], &grid),
            Err(GameError::NotAxisAligned("p1".to_string()))
        );
    }

    #[test]
    fn test_crossing_paths() {
        let grid: GridConfig = GridConfig::default();
        let start: Cell = Cell::new(0, 2);

        // Right, up, left, down crosses the first path
        let crossing: Vec<PathSegment> = vec![
            segment("p1", (0, 2), (4, 2)),
            segment("p2", (4, 2), (4, 0)),
            segment("p3", (4, 0), (2, 0)),
            segment("p4", (2, 0), (2, 4)),
        ];
        assert_eq!(
            validate_paths(start, &crossing, &grid),
            Err(GameError::Crossing("p1".to_string(), "p4".to_string()))
        );

        // Going back over the previous path
        let backtrack: Vec<PathSegment> =
            vec![segment("p1", (0, 2), (4, 2)), segment("p2", (4, 2), (1, 2))];
        assert_eq!(
            validate_paths(start, &backtrack, &grid),
            Err(GameError::Crossing("p1".to_string(), "p2".to_string()))
        );

        let fine: Vec<PathSegment> = vec![
            segment("p1", (0, 2), (4, 2)),
            segment("p2", (4, 2), (4, 0)),
            segment("p3", (4, 0), (8, 0)),
        ];
        assert_eq!(validate_paths(start, &fine, &grid), Ok(()));
    }

    #[test]
    fn test_duplicated_ids() {
        let game: GameDto = GameDto {
            start_cell: Cell::new(0, 0),
            all_paths: vec![
                PathDto {
                    id: "p1".to_string(),
                    start_cell: Cell::new(0, 0),
                    end_cell: Cell::new(2, 0),
                },
                PathDto {
                    id: "p1".to_string(),
                    start_cell: Cell::new(2, 0),
                    end_cell: Cell::new(2, 2),
                },
            ],
        };
        assert_eq!(
            game.into_puzzle(&GridConfig::default()),
            Err(GameError::Puzzle(PuzzleError::DuplicatePathId(
                "p1".to_string()
            )))
        );
    }
}
