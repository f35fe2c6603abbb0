use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::game::GameOutput;
use crate::rows::{Cell, PLAYER_COLUMNS, TEAM_COLUMNS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub game_id: String,
    pub players: usize,
    pub teams: usize,
}

/// Writes one game's rows to an xlsx workbook with `Players` and `Teams` sheets.
pub fn export_game_workbook(path: &Path, output: &GameOutput) -> Result<ExportReport> {
    let players = output
        .player_rows
        .iter()
        .map(|row| row.cells())
        .collect::<Vec<_>>();
    let teams = output
        .team_rows
        .iter()
        .map(|row| row.cells())
        .collect::<Vec<_>>();

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Players")?;
        write_header(sheet, &PLAYER_COLUMNS)?;
        write_rows(sheet, &players)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Teams")?;
        write_header(sheet, &TEAM_COLUMNS)?;
        write_rows(sheet, &teams)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        game_id: output.game_id.clone(),
        players: players.len(),
        teams: teams.len(),
    })
}

fn write_header(worksheet: &mut Worksheet, columns: &[&str]) -> Result<()> {
    for (col_idx, name) in columns.iter().enumerate() {
        worksheet
            .write_string(0, col_idx as u16, *name)
            .with_context(|| format!("write header {name}"))?;
    }
    Ok(())
}

// Data starts on the row after the header.
fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<Cell>]) -> Result<()> {
    for (idx, row) in rows.iter().enumerate() {
        let row_idx = (idx + 1) as u32;
        for (col_idx, cell) in row.iter().enumerate() {
            let col = col_idx as u16;
            let written = match cell {
                Cell::Text(value) => worksheet.write_string(row_idx, col, value.as_str()),
                Cell::Int(value) => worksheet.write_number(row_idx, col, *value as f64),
                Cell::Real(value) => worksheet.write_number(row_idx, col, *value),
                Cell::Bool(value) => worksheet.write_boolean(row_idx, col, *value),
                Cell::Null => continue,
            };
            written.with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
