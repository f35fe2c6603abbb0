use std::fs;
use std::path::PathBuf;

use anyhow::Context;

use pbp_boxscore::config::init_tracing;
use pbp_boxscore::export::export_game_workbook;
use pbp_boxscore::feed::GameFeed;
use pbp_boxscore::game::{FoldOptions, fold_game};

fn main() -> anyhow::Result<()> {
    init_tracing();
    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tests/fixtures/sample_game.json"));
    let out = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| path.with_extension("xlsx"));

    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let feed = GameFeed::parse(&raw)?;
    let roster = feed.roster()?;

    // Exports a single feed without touching the database; handy for eyeballing a game.
    let output = fold_game(&feed.game_id, &roster, &feed.plays, &FoldOptions::default())?;
    let report = export_game_workbook(&out, &output)?;

    println!("Game: {}", report.game_id);
    println!(
        "Final: {} {} - {} {} (winner {})",
        output.result.home,
        output.result.home_score,
        output.result.away_score,
        output.result.away,
        output.result.winner
    );
    println!("Player rows: {}", report.players);
    println!("Team rows: {}", report.teams);
    println!("Diagnostics: {}", output.diagnostics.len());
    for diagnostic in output.diagnostics.iter().take(10) {
        println!("   - {diagnostic}");
    }
    println!("Workbook: {}", out.display());

    Ok(())
}
