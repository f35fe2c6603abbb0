use anyhow::Result;
use rayon::prelude::*;
use tracing::{info, warn};

use crate::error::GameError;
use crate::feed::GameSource;
use crate::game::{FoldOptions, GameOutput, fold_game};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    pub parallelism: usize,
    pub fold: FoldOptions,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            parallelism: 4,
            fold: FoldOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub completed: Vec<String>,
    pub errored: Vec<(String, String)>,
    pub skipped: Vec<String>,
    pub player_rows: usize,
    pub team_rows: usize,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.completed.len() + self.errored.len() + self.skipped.len()
    }
}

/// Receives finished games. Called from one thread, in game-id order.
pub trait GameSink {
    fn write(&mut self, output: &GameOutput) -> Result<()>;
    fn record_failure(&mut self, game_id: &str, error: &GameError) -> Result<()>;
}

impl GameSink for Vec<GameOutput> {
    fn write(&mut self, output: &GameOutput) -> Result<()> {
        self.push(output.clone());
        Ok(())
    }

    fn record_failure(&mut self, _game_id: &str, _error: &GameError) -> Result<()> {
        Ok(())
    }
}

/// Fetches and folds one game.
pub fn process_game(
    source: &dyn GameSource,
    game_id: &str,
    options: &FoldOptions,
) -> Result<GameOutput, GameError> {
    let (roster, plays) = source.game(game_id)?;
    fold_game(game_id, &roster, &plays, options)
}

/// Folds every game in `game_ids` on a bounded pool. A failed game is recorded
/// and the batch moves on; only sink errors abort.
pub fn run_batch<S: GameSource>(
    source: &S,
    game_ids: &[String],
    options: &BatchOptions,
    sink: &mut dyn GameSink,
) -> Result<BatchSummary> {
    let parallelism = options.parallelism.clamp(1, 32);
    let pool = build_pool(parallelism);
    let mut summary = BatchSummary::default();
    info!(games = game_ids.len(), parallelism, "starting batch");

    // Bounded chunks keep at most a few games' rows in memory at once.
    for chunk in game_ids.chunks(parallelism * 2) {
        let results = with_pool(&pool, || {
            chunk
                .par_iter()
                .map(|game_id| (game_id, process_game(source, game_id, &options.fold)))
                .collect::<Vec<_>>()
        });

        for (game_id, result) in results {
            match result {
                Ok(output) => {
                    sink.write(&output)?;
                    summary.player_rows += output.player_rows.len();
                    summary.team_rows += output.team_rows.len();
                    summary.completed.push(game_id.clone());
                }
                Err(err) if err.is_skip() => {
                    info!(game_id = %game_id, error = %err, "skipping game");
                    sink.record_failure(game_id, &err)?;
                    summary.skipped.push(game_id.clone());
                }
                Err(err) => {
                    warn!(game_id = %game_id, error = %err, "game failed");
                    sink.record_failure(game_id, &err)?;
                    summary.errored.push((game_id.clone(), err.to_string()));
                }
            }
        }
    }

    info!(
        completed = summary.completed.len(),
        errored = summary.errored.len(),
        skipped = summary.skipped.len(),
        player_rows = summary.player_rows,
        "batch finished"
    );
    Ok(summary)
}

fn build_pool(threads: usize) -> Option<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .ok()
}

fn with_pool<T>(pool: &Option<rayon::ThreadPool>, action: impl FnOnce() -> T + Send) -> T
where
    T: Send,
{
    if let Some(pool) = pool.as_ref() {
        pool.install(action)
    } else {
        action()
    }
}
