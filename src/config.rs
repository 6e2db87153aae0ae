/*
config.rs

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

//! Runtime settings.
//!
//! The settings come from the command line (see [`crate::cli_options`]) and from the
//! environment. [`Settings::default`] is the configuration used when nothing is provided.

use directories::ProjectDirs;
use std::path::PathBuf;
use std::time::Duration;

use crate::generator::chat::{DEFAULT_API_URL, DEFAULT_REQUEST_TIMEOUT};
use crate::grid::GridConfig;

/// Name of the environment variable that stores the API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Default time given to the level generator before the fallback level is used.
pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(90);

/// Turtle Tail settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Grid dimensions.
    pub grid: GridConfig,

    /// Directory where the progress is saved. None keeps the progress in memory only.
    pub data_dir: Option<PathBuf>,

    /// Base URL of the chat-completion API.
    pub api_url: String,

    /// API key. Without a key, levels after the built-in ones are replaced by the fallback level.
    pub api_key: Option<String>,

    /// Timeout for one HTTP request.
    pub request_timeout: Duration,

    /// Time after which a pending generation is abandoned.
    pub generation_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            data_dir: default_data_dir(),
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            generation_timeout: DEFAULT_GENERATION_TIMEOUT,
        }
    }
}

/// Return the platform data directory for Turtle Tail, if the home directory is known.
pub fn default_data_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "sorych", "TurtleTail").map(|d| d.data_dir().to_path_buf())
}
