/*
game.rs

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

//! Manage the player progression through the levels.
//!
//! The [`Game`] object owns the player [`Progress`], the active level, and the position of the
//! active puzzle in that level. It is the only object that changes the progress, and it saves
//! the progress after every change.
//!
//! When the player reaches a level that the [`LevelRepository`] does not have, the level is
//! generated on a worker thread and the game reports [`LevelStatus::Generating`] until
//! [`Game::poll_generation`] collects the result. If generating the level fails or takes too
//! long, the fallback level is used instead.

use async_channel::{Receiver, Sender, TryRecvError};
use log::{debug, info, warn};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::config::Settings;
use crate::evaluator::{Evaluation, Evaluator};
use crate::generator::fallback::fallback_level;
use crate::generator::{GenerationError, GenerationRequest, LevelGenerator, build_level};
use crate::grid::{Direction, GridConfig};
use crate::levels::{Level, LevelRepository};
use crate::progress::Progress;
use crate::puzzle::Puzzle;
use crate::saver::progress::ProgressStore;

/// Delay between two checks when waiting for a generated level.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Result that the generation worker sends back.
type GenerationResult = Result<Vec<Puzzle>, GenerationError>;

/// Status of the active level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelStatus {
    /// A puzzle is waiting for the player.
    Ready,

    /// All the puzzles of the level are solved. Call [`Game::advance_level`].
    LevelComplete,

    /// The level is being generated. Call [`Game::poll_generation`].
    Generating,
}

/// Level generation in progress.
struct PendingGeneration {
    /// Number of the level being generated.
    level: u32,

    /// Receives the result from the worker thread.
    receiver: Receiver<GenerationResult>,

    /// Used to abandon the generation after the timeout.
    started: Instant,
}

/// Manage the progression of the player.
pub struct Game {
    /// Level and score.
    progress: Progress,

    /// Known levels.
    repository: LevelRepository,

    /// Where the progress is saved.
    store: Box<dyn ProgressStore>,

    /// Builds the levels that the repository does not have.
    generator: Arc<dyn LevelGenerator>,

    /// Grid dimensions.
    grid: GridConfig,

    /// Time after which a pending generation is abandoned.
    generation_timeout: Duration,

    /// Active level. None while the level is being generated.
    level: Option<Level>,

    /// Position of the active puzzle in the level.
    puzzle_index: usize,

    /// Status of the active level.
    status: LevelStatus,

    /// Verifies the player submissions.
    evaluator: Evaluator,

    /// Last puzzle that the player solved, for animating the turtle.
    last_solved: Option<Puzzle>,

    /// Level generation in progress.
    pending: Option<PendingGeneration>,
}

impl Game {
    /// Create a [`Game`] object.
    ///
    /// The saved progress is read from the store. When nothing is saved, or when the store
    /// cannot be read, the game starts at level 1 with no point.
    pub fn new(
        settings: &Settings,
        repository: LevelRepository,
        store: Box<dyn ProgressStore>,
        generator: Arc<dyn LevelGenerator>,
    ) -> Self {
        let progress: Progress = match store.load() {
            Ok(Some(p)) => {
                info!("Resuming at level {} with score {}", p.level, p.score);
                p
            }
            Ok(None) => {
                info!("No saved progress, starting a new game");
                Progress::new()
            }
            Err(e) => {
                warn!("Cannot read the saved progress, starting a new game: {e}");
                Progress::new()
            }
        };

        let mut game: Game = Self {
            progress,
            repository,
            store,
            generator,
            grid: settings.grid,
            generation_timeout: settings.generation_timeout,
            level: None,
            puzzle_index: 0,
            status: LevelStatus::Generating,
            evaluator: Evaluator::new(),
            last_solved: None,
            pending: None,
        };
        game.load_level(game.progress.level);
        game
    }

    /// Return the player progress.
    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    /// Return the status of the active level.
    pub fn status(&self) -> LevelStatus {
        self.status
    }

    /// Return the grid dimensions.
    pub fn grid(&self) -> &GridConfig {
        &self.grid
    }

    /// Return the known levels.
    pub fn repository(&self) -> &LevelRepository {
        &self.repository
    }

    /// Return the active level, or None while it is being generated.
    pub fn level(&self) -> Option<&Level> {
        self.level.as_ref()
    }

    /// Return the position of the active puzzle in the level.
    pub fn puzzle_index(&self) -> usize {
        self.puzzle_index
    }

    /// Return the active puzzle, or None while the level is being generated.
    pub fn current_puzzle(&self) -> Option<&Puzzle> {
        self.level.as_ref()?.puzzle(self.puzzle_index)
    }

    /// Return the last puzzle that the player solved.
    pub fn last_solved_puzzle(&self) -> Option<&Puzzle> {
        self.last_solved.as_ref()
    }

    /// Return the number of wrong submissions for the active puzzle.
    pub fn mistakes(&self) -> usize {
        self.evaluator.mistakes()
    }

    /// Verify the moves that the player planned for the active puzzle.
    ///
    /// A correct answer adds the puzzle points, saves the progress, and moves to the next
    /// puzzle. After the last puzzle of the level, the status becomes
    /// [`LevelStatus::LevelComplete`].
    /// A wrong answer changes nothing and the player can try again.
    pub fn submit(&mut self, directions: &[Direction]) -> Evaluation {
        if self.status != LevelStatus::Ready {
            debug!("Ignoring submission, the level is {:?}", self.status);
            return Evaluation::Incorrect;
        }
        let Some(puzzle) = self
            .level
            .as_ref()
            .and_then(|l| l.puzzle(self.puzzle_index))
        else {
            return Evaluation::Incorrect;
        };

        let outcome: Evaluation = self.evaluator.submit(puzzle, directions);
        if !outcome.is_correct() {
            return outcome;
        }
        self.last_solved = Some(puzzle.clone());

        self.progress.puzzle_solved();
        self.save_progress();

        let num_puzzles: usize = self.level.as_ref().map_or(0, Level::len);
        if self.puzzle_index + 1 < num_puzzles {
            self.puzzle_index += 1;
            self.evaluator.reset();
            debug!("Moving to puzzle {}", self.puzzle_index + 1);
        } else {
            info!("Level {} complete", self.progress.level);
            self.status = LevelStatus::LevelComplete;
        }
        outcome
    }

    /// Move to the next level.
    ///
    /// The level number is saved, and then the level is loaded from the repository or generated.
    /// The level bonus is only awarded when all the puzzles of the level are solved.
    pub fn advance_level(&mut self) -> LevelStatus {
        if self.status == LevelStatus::Generating {
            warn!("A level is already being generated");
            return self.status;
        }
        if self.status == LevelStatus::LevelComplete {
            self.progress.level_completed();
        } else {
            debug!("Skipping the rest of level {}, no bonus", self.progress.level);
            self.progress.level_skipped();
        }
        self.save_progress();
        self.load_level(self.progress.level);
        self.status
    }

    /// Start again from level 1 with no point.
    pub fn restart(&mut self) {
        self.progress = Progress::new();
        self.save_progress();
        self.load_level(self.progress.level);
    }

    /// Collect the generated level if it is available, without blocking.
    ///
    /// After the timeout, or when the generation fails, the fallback level is activated.
    pub fn poll_generation(&mut self) -> LevelStatus {
        let result: Option<GenerationResult> = match &self.pending {
            None => return self.status,
            Some(pending) => match pending.receiver.try_recv() {
                Ok(r) => Some(r),
                Err(TryRecvError::Closed) => Some(Err(GenerationError::WorkerStopped)),
                Err(TryRecvError::Empty) => {
                    if pending.started.elapsed() >= self.generation_timeout {
                        Some(Err(GenerationError::Timeout(self.generation_timeout)))
                    } else {
                        None
                    }
                }
            },
        };

        if let Some(r) = result {
            self.finish_generation(r);
        }
        self.status
    }

    /// Wait for the generated level. The wait is bounded by the generation timeout.
    pub fn wait_for_level(&mut self) -> LevelStatus {
        while self.poll_generation() == LevelStatus::Generating {
            thread::sleep(POLL_INTERVAL);
        }
        self.status
    }

    /// Save the progress. A failure is logged and the game continues with the in-memory values.
    fn save_progress(&self) {
        if let Err(e) = self.store.save(&self.progress) {
            warn!("Cannot save the progress: {e}");
        }
    }

    /// Activate the given level, from the repository or by generating it.
    fn load_level(&mut self, number: u32) {
        self.pending = None;
        match self.repository.get(number) {
            Some(level) if level.fits(&self.grid) => {
                debug!("Level {number} found in the repository");
                let level: Level = level.clone();
                self.activate(level);
            }
            Some(_) => {
                warn!(
                    "Level {number} does not fit on the {}x{} grid, generating another one",
                    self.grid.rows, self.grid.cols
                );
                self.start_generation(number);
            }
            None => self.start_generation(number),
        }
    }

    /// Generate the level on a worker thread.
    fn start_generation(&mut self, number: u32) {
        info!("Generating level {number}");
        let (sender, receiver): (Sender<GenerationResult>, Receiver<GenerationResult>) =
            async_channel::bounded(1);
        let generator: Arc<dyn LevelGenerator> = Arc::clone(&self.generator);
        let request: GenerationRequest = GenerationRequest {
            previous_level: number.saturating_sub(1),
            grid: self.grid,
        };

        let spawned = thread::Builder::new()
            .name("level-generator".to_string())
            .spawn(move || {
                let result: GenerationResult = generator.generate(&request);
                if sender.send_blocking(result).is_err() {
                    debug!("Level {} generated after the game moved on", request.level());
                }
            });

        match spawned {
            Ok(_) => {
                self.level = None;
                self.puzzle_index = 0;
                self.status = LevelStatus::Generating;
                self.pending = Some(PendingGeneration {
                    level: number,
                    receiver,
                    started: Instant::now(),
                });
            }
            Err(e) => {
                warn!("Cannot start the level generator: {e}");
                self.activate(fallback_level(number, &self.grid));
            }
        }
    }

    /// Store and activate the generated level, or activate the fallback level.
    fn finish_generation(&mut self, result: GenerationResult) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        let number: u32 = pending.level;

        match result.and_then(|puzzles| build_level(number, puzzles)) {
            Ok(level) => {
                info!("Level {number} generated with {} puzzles", level.len());
                self.repository.put(number, level.clone());
                self.activate(level);
            }
            Err(e) => {
                // The fallback level is not stored, so the next session tries again
                warn!("Cannot generate level {number}, using the fallback level: {e}");
                self.activate(fallback_level(number, &self.grid));
            }
        }
    }

    fn activate(&mut self, level: Level) {
        self.level = Some(level);
        self.puzzle_index = 0;
        self.evaluator.reset();
        self.status = LevelStatus::Ready;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Cell;
    use crate::levels::level_1;
    use crate::progress::{LEVEL_BONUS, PUZZLE_AWARD};
    use crate::saver::progress::{MemoryProgressStore, StoreError};
    use Direction::*;

    struct FailingGenerator;

    impl LevelGenerator for FailingGenerator {
        fn generate(&self, _: &GenerationRequest) -> GenerationResult {
            Err(GenerationError::NoChoice)
        }
    }

    struct StraightGenerator;

    impl LevelGenerator for StraightGenerator {
        fn generate(&self, request: &GenerationRequest) -> GenerationResult {
            let down: Puzzle = Puzzle::single_path("g1", Cell::new(2, 0), Cell::new(2, 5), Down);
            let left: Puzzle = Puzzle::single_path("g1", Cell::new(9, 1), Cell::new(3, 1), Left);
            assert_eq!(request.grid, GridConfig::default());
            Ok(vec![down, left])
        }
    }

    struct SlowGenerator;

    impl LevelGenerator for SlowGenerator {
        fn generate(&self, _: &GenerationRequest) -> GenerationResult {
            thread::sleep(Duration::from_secs(2));
            Err(GenerationError::NoChoice)
        }
    }

    struct BrokenStore;

    impl ProgressStore for BrokenStore {
        fn load(&self) -> Result<Option<Progress>, StoreError> {
            Err(StoreError::Unavailable)
        }

        fn save(&self, _: &Progress) -> Result<(), StoreError> {
            Err(StoreError::Unavailable)
        }
    }

    fn level_1_only() -> LevelRepository {
        let mut repository: LevelRepository = LevelRepository::new();
        repository.put(1, level_1::level().unwrap());
        repository
    }

    fn new_game(
        repository: LevelRepository,
        store: &MemoryProgressStore,
        generator: Arc<dyn LevelGenerator>,
    ) -> Game {
        Game::new(
            &Settings::default(),
            repository,
            Box::new(store.clone()),
            generator,
        )
    }

    #[test]
    fn test_empty_store_starts_at_level_1() {
        let store: MemoryProgressStore = MemoryProgressStore::new();
        let game: Game = new_game(
            LevelRepository::with_default_levels(),
            &store,
            Arc::new(FailingGenerator),
        );
        assert_eq!(game.progress().level, 1);
        assert_eq!(game.progress().score, 0);
        assert_eq!(game.status(), LevelStatus::Ready);
        assert_eq!(game.current_puzzle().unwrap().start_cell(), Cell::new(0, 5));
    }

    #[test]
    fn test_unreadable_store_starts_at_level_1() {
        let mut game: Game = Game::new(
            &Settings::default(),
            LevelRepository::with_default_levels(),
            Box::new(BrokenStore),
            Arc::new(FailingGenerator),
        );
        assert_eq!(game.progress().level, 1);

        // Saving fails, but the game continues with the in-memory progress
        assert!(game.submit(&[Right, Up, Right]).is_correct());
        assert_eq!(game.progress().score, PUZZLE_AWARD);
    }

    #[test]
    fn test_resume_saved_level() {
        let store: MemoryProgressStore = MemoryProgressStore::with_progress(Progress {
            level: 2,
            score: 60,
            saved_at: None,
        });
        let game: Game = new_game(
            LevelRepository::with_default_levels(),
            &store,
            Arc::new(FailingGenerator),
        );
        assert_eq!(game.progress().level, 2);
        assert_eq!(game.level().unwrap().number(), 2);
        assert_eq!(game.current_puzzle().unwrap().solutions().len(), 2);
    }

    #[test]
    fn test_correct_submission_completes_level() {
        let store: MemoryProgressStore = MemoryProgressStore::new();
        let mut game: Game = new_game(level_1_only(), &store, Arc::new(FailingGenerator));

        let moves: Vec<Direction> = Direction::from_codes(&[4, 1, 4]).unwrap();
        let outcome: Evaluation = game.submit(&moves);
        assert!(outcome.is_correct());
        assert_eq!(game.status(), LevelStatus::LevelComplete);
        assert_eq!(game.progress().score, PUZZLE_AWARD);
        assert_eq!(store.load().unwrap().unwrap().score, PUZZLE_AWARD);

        let solved: &Puzzle = game.last_solved_puzzle().unwrap();
        if let Evaluation::Correct(solution) = outcome {
            let ids: Vec<&str> = solved
                .solution_paths(&solution)
                .iter()
                .map(|p| p.id.as_str())
                .collect();
            assert_eq!(ids, vec!["p1", "p2", "p3"]);
        }

        // Nothing more to solve until the player moves on
        assert_eq!(game.submit(&moves), Evaluation::Incorrect);
        assert_eq!(game.progress().score, PUZZLE_AWARD);
    }

    #[test]
    fn test_wrong_submission_changes_nothing() {
        let store: MemoryProgressStore = MemoryProgressStore::new();
        let mut game: Game = new_game(level_1_only(), &store, Arc::new(FailingGenerator));

        assert_eq!(game.submit(&[Right, Right, Up]), Evaluation::Incorrect);
        assert_eq!(game.status(), LevelStatus::Ready);
        assert_eq!(game.progress().score, 0);
        assert_eq!(game.puzzle_index(), 0);
        assert_eq!(game.mistakes(), 1);
        assert!(store.load().unwrap().is_none());

        // The player can try again
        assert!(game.submit(&[Right, Up, Right]).is_correct());
    }

    #[test]
    fn test_generation_failure_uses_fallback() {
        let store: MemoryProgressStore = MemoryProgressStore::new();
        let mut game: Game = new_game(level_1_only(), &store, Arc::new(FailingGenerator));
        game.submit(&[Right, Up, Right]);

        game.advance_level();
        assert_eq!(game.progress().level, 2);
        assert_eq!(game.progress().score, PUZZLE_AWARD + LEVEL_BONUS);
        assert_eq!(store.load().unwrap().unwrap().level, 2);

        assert_eq!(game.wait_for_level(), LevelStatus::Ready);
        let puzzle: &Puzzle = game.current_puzzle().unwrap();
        assert_eq!(puzzle.all_paths().len(), 1);
        assert_eq!(puzzle.solutions()[0].directions(), &[Right]);
        assert!(!game.repository().has(2));
    }

    #[test]
    fn test_generated_level_is_stored() {
        let store: MemoryProgressStore = MemoryProgressStore::new();
        let mut game: Game = new_game(level_1_only(), &store, Arc::new(StraightGenerator));
        game.submit(&[Right, Up, Right]);

        assert_eq!(game.advance_level(), LevelStatus::Generating);
        assert!(game.current_puzzle().is_none());
        assert_eq!(game.submit(&[Down]), Evaluation::Incorrect);

        assert_eq!(game.wait_for_level(), LevelStatus::Ready);
        assert!(game.repository().has(2));
        assert_eq!(game.level().unwrap().len(), 2);

        assert!(game.submit(&[Down]).is_correct());
        assert_eq!(game.puzzle_index(), 1);
        assert_eq!(game.status(), LevelStatus::Ready);
        assert!(game.submit(&[Left]).is_correct());
        assert_eq!(game.status(), LevelStatus::LevelComplete);
        assert_eq!(game.progress().score, 3 * PUZZLE_AWARD + LEVEL_BONUS);
    }

    #[test]
    fn test_generation_timeout() {
        let store: MemoryProgressStore = MemoryProgressStore::new();
        let settings: Settings = Settings {
            generation_timeout: Duration::from_millis(100),
            ..Settings::default()
        };
        let mut game: Game = Game::new(
            &settings,
            level_1_only(),
            Box::new(store.clone()),
            Arc::new(SlowGenerator),
        );
        game.advance_level();
        assert_eq!(game.poll_generation(), LevelStatus::Generating);

        let started: Instant = Instant::now();
        assert_eq!(game.wait_for_level(), LevelStatus::Ready);
        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(game.current_puzzle().unwrap().all_paths()[0].id, "f1");
    }

    #[test]
    fn test_levels_larger_than_the_grid_are_replaced() {
        let store: MemoryProgressStore = MemoryProgressStore::new();
        let settings: Settings = Settings {
            grid: GridConfig::new(4, 6),
            ..Settings::default()
        };
        let mut game: Game = Game::new(
            &settings,
            LevelRepository::with_default_levels(),
            Box::new(store.clone()),
            Arc::new(FailingGenerator),
        );
        assert_eq!(game.status(), LevelStatus::Generating);
        assert_eq!(game.wait_for_level(), LevelStatus::Ready);

        let level: &Level = game.level().unwrap();
        assert!(level.fits(game.grid()));
        let puzzle: &Puzzle = game.current_puzzle().unwrap();
        assert_eq!(puzzle.start_cell(), Cell::new(0, 2));
        assert_eq!(puzzle.all_paths()[0].end, Cell::new(5, 2));

        // The built-in level stays in the repository for the default grid
        assert_eq!(
            game.repository().get(1).unwrap().puzzles()[0].start_cell(),
            Cell::new(0, 5)
        );
    }

    #[test]
    fn test_skipping_a_level_earns_no_bonus() {
        let store: MemoryProgressStore = MemoryProgressStore::new();
        let mut game: Game = new_game(
            LevelRepository::with_default_levels(),
            &store,
            Arc::new(FailingGenerator),
        );
        assert_eq!(game.advance_level(), LevelStatus::Ready);
        assert_eq!(game.progress().level, 2);
        assert_eq!(game.progress().score, 0);
        assert_eq!(store.load().unwrap().unwrap().score, 0);
    }

    #[test]
    fn test_restart() {
        let store: MemoryProgressStore = MemoryProgressStore::with_progress(Progress {
            level: 2,
            score: 60,
            saved_at: None,
        });
        let mut game: Game = new_game(
            LevelRepository::with_default_levels(),
            &store,
            Arc::new(FailingGenerator),
        );
        game.restart();
        assert_eq!(game.progress().level, 1);
        assert_eq!(game.progress().score, 0);
        assert_eq!(store.load().unwrap().unwrap().level, 1);
        assert_eq!(game.level().unwrap().number(), 1);
    }
}
