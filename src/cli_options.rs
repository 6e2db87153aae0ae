/*
cli_options.rs

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

//! Process command-line options.
//!
//! # Examples
//!
//! List the built-in levels and their solutions:
//!
//! ```text
//! $ turtle-tail --ls
//! Level 1 (#82d4fa): 1 puzzle
//!   Puzzle 1, start (0, 5): → ↑ →
//! Level 2 (#82d4fa): 1 puzzle
//!   Puzzle 1, start (0, 0): → ↓ → ↑ → | → ↓ → ↓ →
//! ```
//!
//! Play without saving the progress, with debug messages:
//!
//! ```text
//! $ OPENAI_API_KEY=... turtle-tail --no-save --debug
//! ```

use clap::Parser;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{API_KEY_ENV, DEFAULT_GENERATION_TIMEOUT, Settings, default_data_dir};
use crate::generator::chat::{DEFAULT_API_URL, DEFAULT_REQUEST_TIMEOUT};
use crate::grid::{DEFAULT_COLS, DEFAULT_ROWS, GridConfig};
use crate::levels::LevelRepository;

/// Plan the turtle's path through the grid.
#[derive(Parser, Debug)]
#[command(about, long_about = None, version)]
pub struct Args {
    /// List the built-in levels
    #[arg(short, long, default_value_t = false)]
    ls: bool,

    /// Start again from level 1
    #[arg(short, long, default_value_t = false)]
    restart: bool,

    /// Directory where the progress is saved
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Do not save the progress
    #[arg(long, default_value_t = false, conflicts_with = "data_dir")]
    no_save: bool,

    /// API key for generating new levels
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    api_key: Option<String>,

    /// Base URL of the chat-completion API
    #[arg(long, default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Seconds to wait for a generated level before using a simple one
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_GENERATION_TIMEOUT.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout: u64,

    /// Number of grid rows
    #[arg(
        long,
        default_value_t = DEFAULT_ROWS,
        value_parser = clap::value_parser!(i32).range(2..=50)
    )]
    rows: i32,

    /// Number of grid columns
    #[arg(
        long,
        default_value_t = DEFAULT_COLS,
        value_parser = clap::value_parser!(i32).range(2..=50)
    )]
    cols: i32,

    /// Enable debug messages
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

impl Args {
    /// Build the [`Settings`] object from the options.
    pub fn settings(&self) -> Settings {
        let data_dir: Option<PathBuf> = if self.no_save {
            None
        } else {
            self.data_dir.clone().or_else(default_data_dir)
        };
        // The request timeout never exceeds the generation timeout
        let generation_timeout: Duration = Duration::from_secs(self.timeout);
        Settings {
            grid: GridConfig::new(self.rows, self.cols),
            data_dir,
            api_url: self.api_url.clone(),
            api_key: self.api_key.clone(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT.min(generation_timeout),
            generation_timeout,
        }
    }
}

/// Options for starting a game.
#[derive(Debug)]
pub struct Options {
    /// Runtime settings.
    pub settings: Settings,

    /// Whether to start again from level 1.
    pub restart: bool,
}

/// Print the built-in levels.
fn list_levels() {
    let repository: LevelRepository = LevelRepository::with_default_levels();
    for level in repository.levels() {
        let n: usize = level.len();
        println!(
            "Level {} ({}): {n} puzzle{}",
            level.number(),
            level.background,
            if n > 1 { "s" } else { "" }
        );
        for (i, puzzle) in level.puzzles().iter().enumerate() {
            let solutions: Vec<String> = puzzle
                .solutions()
                .iter()
                .map(|s| {
                    s.directions()
                        .iter()
                        .map(|d| d.arrow().to_string())
                        .collect::<Vec<String>>()
                        .join(" ")
                })
                .collect();
            println!(
                "  Puzzle {}, start {}: {}",
                i + 1,
                puzzle.start_cell(),
                solutions.join(" | ")
            );
        }
    }
}

/// Parse and process command-line options.
///
/// Return None when the options were fully processed, such as `--ls`.
pub fn parse() -> Option<Options> {
    let args: Args = Args::parse();

    if args.debug {
        unsafe {
            env::set_var("RUST_LOG", "debug");
        }
    }
    env_logger::init();

    if args.ls {
        list_levels();
        return None;
    }

    Some(Options {
        settings: args.settings(),
        restart: args.restart,
    })
}
