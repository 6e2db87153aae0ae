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

//! Save and restore the player progress when quitting or starting Turtle Tail.
//!
//! The level and the score are saved together in the `progress.json` file, so that a crash
//! cannot leave a new level with an old score.
//! The file is first written under a temporary name and then renamed over the previous file.
//!
//! The saved object is a serialization of the [`Progress`] object in JSON format by using
//! [`serde`].

use log::debug;
use std::fs::{self, File, remove_file};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::progress::Progress;

/// Error returned when the progress cannot be read or written.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid progress file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("progress store is unavailable")]
    Unavailable,
}

/// Durable storage for the [`Progress`] object.
pub trait ProgressStore: Send {
    /// Return the last saved [`Progress`] object, or None if nothing has been saved yet.
    fn load(&self) -> Result<Option<Progress>, StoreError>;

    /// Save the [`Progress`] object, replacing the previous one.
    fn save(&self, progress: &Progress) -> Result<(), StoreError>;
}

/// Object to save and restore the progress in a JSON file.
pub struct SaverProgress {
    /// Absolute path to the save file.
    save_file: PathBuf,
}

impl SaverProgress {
    /// Create a [`SaverProgress`] object.
    ///
    /// The provided [`PathBuf`] is the path to the directory where the progress must be saved.
    /// The directory is created at the first save.
    pub fn new(mut data_dir: PathBuf) -> Self {
        data_dir.push("progress.json");
        debug!("Progress file: {data_dir:?}");
        Self {
            save_file: data_dir,
        }
    }

    /// Delete the progress file.
    pub fn delete_save(&self) {
        let _ = remove_file(&self.save_file);
    }
}

impl ProgressStore for SaverProgress {
    fn load(&self) -> Result<Option<Progress>, StoreError> {
        let file: File = match File::open(&self.save_file) {
            Ok(f) => f,
            Err(error) => match error.kind() {
                ErrorKind::NotFound => return Ok(None),
                _ => return Err(error.into()),
            },
        };
        let reader: BufReader<File> = BufReader::new(file);
        let progress: Progress = serde_json::from_reader(reader)?;
        Ok(Some(progress.sanitize()))
    }

    fn save(&self, progress: &Progress) -> Result<(), StoreError> {
        if let Some(dir) = self.save_file.parent() {
            fs::create_dir_all(dir)?;
        }
        let tmp_file: PathBuf = self.save_file.with_extension("json.tmp");
        {
            let file: File = File::create(&tmp_file)?;
            let mut writer: BufWriter<File> = BufWriter::new(file);
            serde_json::to_writer(&mut writer, progress)?;
            writer.flush()?;
        }
        fs::rename(&tmp_file, &self.save_file)?;
        Ok(())
    }
}

/// Progress kept in memory only.
///
/// Clones share the same storage, so a copy can observe what a [`crate::game::Game`] saves.
#[derive(Debug, Clone, Default)]
pub struct MemoryProgressStore {
    progress: Arc<Mutex<Option<Progress>>>,
}

impl MemoryProgressStore {
    /// Create an empty [`MemoryProgressStore`] object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a [`MemoryProgressStore`] object that already contains the given progress.
    pub fn with_progress(progress: Progress) -> Self {
        Self {
            progress: Arc::new(Mutex::new(Some(progress))),
        }
    }
}

impl ProgressStore for MemoryProgressStore {
    fn load(&self) -> Result<Option<Progress>, StoreError> {
        let guard = self.progress.lock().map_err(|_| StoreError::Unavailable)?;
        Ok(*guard)
    }

    fn save(&self, progress: &Progress) -> Result<(), StoreError> {
        let mut guard = self.progress.lock().map_err(|_| StoreError::Unavailable)?;
        *guard = Some(*progress);
        Ok(())
    }
}
