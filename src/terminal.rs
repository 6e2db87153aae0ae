/*
terminal.rs

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

//! Play in a terminal.
//!
//! The grid is drawn with characters: `T` is the turtle, `+` marks the path ends, and `-` and
//! `|` the paths. The player types the arrows on one line, for example `right up right`.

use log::debug;
use std::io::{self, BufRead, Write};

use crate::evaluator::Evaluation;
use crate::game::{Game, LevelStatus};
use crate::grid::{GridConfig, cells_between};
use crate::player_input::PlayerInput;
use crate::puzzle::Puzzle;

const HELP: &str = "Type the moves separated by spaces (up, down, left, right, or u d l r), \
    then press Enter.\nOther commands: help, restart, quit.";

/// Draw the puzzle on the grid.
pub fn render(puzzle: &Puzzle, grid: &GridConfig) -> String {
    let mut rows: Vec<Vec<char>> = vec![vec!['.'; grid.cols as usize]; grid.rows as usize];
    let mut put = |x: i32, y: i32, c: char| {
        if let Some(cell) = rows
            .get_mut(y as usize)
            .and_then(|r| r.get_mut(x as usize))
        {
            *cell = c;
        }
    };

    for p in puzzle.all_paths() {
        let c: char = if p.start.y == p.end.y { '-' } else { '|' };
        for cell in cells_between(p.start, p.end) {
            put(cell.x, cell.y, c);
        }
    }
    for p in puzzle.all_paths() {
        put(p.start.x, p.start.y, '+');
        put(p.end.x, p.end.y, '+');
    }
    let start = puzzle.start_cell();
    put(start.x, start.y, 'T');

    rows.into_iter()
        .map(|r| r.into_iter().collect::<String>())
        .collect::<Vec<String>>()
        .join("\n")
}

/// Parse a line of arrow labels into the player slots.
pub fn read_moves(line: &str) -> Result<PlayerInput, String> {
    let labels: Vec<&str> = line.split_whitespace().collect();
    let mut input: PlayerInput = PlayerInput::new(labels.len());
    for (slot, label) in labels.iter().enumerate() {
        input.drop_label(slot, label).map_err(|e| e.to_string())?;
    }
    Ok(input)
}

/// Print the state of the game.
fn show(game: &Game, out: &mut impl Write) -> io::Result<()> {
    let progress = game.progress();
    if let (Some(level), Some(puzzle)) = (game.level(), game.current_puzzle()) {
        writeln!(
            out,
            "\nLevel {} - puzzle {}/{} - score {}",
            progress.level,
            game.puzzle_index() + 1,
            level.len(),
            progress.score
        )?;
        writeln!(out, "{}", render(puzzle, game.grid()))?;
        writeln!(out, "{} moves:", puzzle.moves())?;
    }
    out.flush()
}

/// Run the game until the player quits or the input ends.
pub fn run(game: &mut Game) -> io::Result<()> {
    let stdin = io::stdin();
    let mut out = io::stdout();
    writeln!(out, "{HELP}")?;

    if game.status() == LevelStatus::Generating {
        writeln!(out, "Generating level {}...", game.progress().level)?;
        game.wait_for_level();
    }
    show(game, &mut out)?;

    for line in stdin.lock().lines() {
        let line: String = line?;
        match line.trim() {
            "" => continue,
            "quit" | "exit" => break,
            "help" => {
                writeln!(out, "{HELP}")?;
                continue;
            }
            "restart" => {
                game.restart();
                game.wait_for_level();
                show(game, &mut out)?;
                continue;
            }
            _ => (),
        }

        let input: PlayerInput = match read_moves(&line) {
            Ok(i) => i,
            Err(e) => {
                writeln!(out, "{e}")?;
                continue;
            }
        };
        debug!("Player moves: {:?}", input.sequence());

        match game.submit(&input.sequence()) {
            Evaluation::Correct(solution) => {
                let route: Vec<String> = game
                    .last_solved_puzzle()
                    .map(|p| {
                        p.solution_paths(&solution)
                            .iter()
                            .map(|s| format!("{}->{}", s.start, s.end))
                            .collect()
                    })
                    .unwrap_or_default();
                writeln!(out, "Well done! The turtle follows {}", route.join(" "))?;
            }
            Evaluation::Incorrect => {
                writeln!(out, "Not quite, try again.")?;
                continue;
            }
        }

        if game.status() == LevelStatus::LevelComplete {
            writeln!(out, "Level {} complete!", game.progress().level)?;
            if game.advance_level() == LevelStatus::Generating {
                writeln!(out, "Generating level {}...", game.progress().level)?;
                game.wait_for_level();
            }
        }
        show(game, &mut out)?;
    }
    Ok(())
}
