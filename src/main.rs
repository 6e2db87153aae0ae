/*
main.rs

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

use log::{error, warn};
use std::process::ExitCode;
use std::sync::Arc;

use turtle_tail::cli_options;
use turtle_tail::config::Settings;
use turtle_tail::game::Game;
use turtle_tail::generator::chat::ChatLevelGenerator;
use turtle_tail::levels::LevelRepository;
use turtle_tail::saver::progress::{MemoryProgressStore, ProgressStore, SaverProgress};
use turtle_tail::terminal;

fn main() -> ExitCode {
    let Some(options) = cli_options::parse() else {
        return ExitCode::SUCCESS;
    };
    let settings: Settings = options.settings;

    let store: Box<dyn ProgressStore> = match &settings.data_dir {
        Some(dir) => Box::new(SaverProgress::new(dir.clone())),
        None => Box::new(MemoryProgressStore::new()),
    };
    let generator: ChatLevelGenerator = ChatLevelGenerator::new(
        &settings.api_url,
        settings.api_key.clone(),
        settings.request_timeout,
    );
    if !generator.has_api_key() {
        warn!("No API key: levels after the built-in ones use a simple fallback puzzle");
    }

    let mut game: Game = Game::new(
        &settings,
        LevelRepository::with_default_levels(),
        store,
        Arc::new(generator),
    );
    if options.restart {
        game.restart();
    }

    match terminal::run(&mut game) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Terminal error: {e}");
            ExitCode::FAILURE
        }
    }
}
