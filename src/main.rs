use std::collections::HashSet;

use anyhow::{Context, Result, anyhow};

use pbp_boxscore::batch::{BatchOptions, run_batch};
use pbp_boxscore::config::{Config, init_tracing};
use pbp_boxscore::feed::FileSource;
use pbp_boxscore::store::BoxScoreStore;

fn main() -> Result<()> {
    let mut config = Config::from_env();
    init_tracing();
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    config.apply_args(&args);

    let source = FileSource::new(&config.feed_dir);
    let db_path = config
        .db_path
        .clone()
        .context("unable to resolve sqlite path (set PBP_DB_PATH or pass --db)")?;
    let mut store = BoxScoreStore::open(&db_path)?;

    let mut game_ids = if config.game_ids.is_empty() {
        source.list_game_ids()?
    } else {
        config.game_ids.clone()
    };
    let skipped = store
        .skipped_game_ids()?
        .into_iter()
        .collect::<HashSet<_>>();
    game_ids.retain(|id| !skipped.contains(id));
    if game_ids.is_empty() {
        return Err(anyhow!(
            "no games to process in {}",
            config.feed_dir.display()
        ));
    }

    let options = BatchOptions {
        parallelism: config.parallelism,
        fold: config.fold_options(),
    };
    let summary = run_batch(&source, &game_ids, &options, &mut store)?;

    println!("Box score build complete");
    println!("DB: {}", db_path.display());
    println!("Feeds: {}", config.feed_dir.display());
    println!(
        "Games: {}/{} complete, {} errored, {} skipped",
        summary.completed.len(),
        summary.total(),
        summary.errored.len(),
        summary.skipped.len()
    );
    if !skipped.is_empty() {
        println!("Previously skipped: {}", skipped.len());
    }
    println!(
        "Rows written: {} player, {} team",
        summary.player_rows, summary.team_rows
    );
    if !summary.errored.is_empty() {
        println!("errors: {}", summary.errored.len());
        for (game_id, err) in summary.errored.iter().take(10) {
            println!("   - {game_id}: {err}");
        }
    }

    Ok(())
}
