use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::types::{ToSqlOutput, Value};
use rusqlite::{Connection, ToSql, params, params_from_iter};

use crate::batch::GameSink;
use crate::error::GameError;
use crate::game::GameOutput;
use crate::rows::{Cell, PLAYER_COLUMNS, TEAM_COLUMNS};

pub const PLAYER_TABLE: &str = "player_box_score";
pub const TEAM_TABLE: &str = "team_box_score";

/// SQLite-backed sink for box-score rows plus a per-game run ledger.
pub struct BoxScoreStore {
    conn: Connection,
}

impl BoxScoreStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let conn =
            Connection::open(path).with_context(|| format!("open sqlite db {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")
            .context("enable wal")?;
        Self::from_connection(conn)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory sqlite")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Replaces every row for the game in one transaction.
    pub fn write_game(&mut self, output: &GameOutput) -> Result<()> {
        let tx = self.conn.transaction().context("begin game transaction")?;
        delete_rows(&tx, &output.game_id)?;

        {
            let mut insert = tx
                .prepare(&insert_sql(PLAYER_TABLE, &PLAYER_COLUMNS))
                .context("prepare player insert")?;
            for row in &output.player_rows {
                insert
                    .execute(params_from_iter(row.cells()))
                    .with_context(|| format!("insert player row for {}", output.game_id))?;
            }
            let mut insert = tx
                .prepare(&insert_sql(TEAM_TABLE, &TEAM_COLUMNS))
                .context("prepare team insert")?;
            for row in &output.team_rows {
                insert
                    .execute(params_from_iter(row.cells()))
                    .with_context(|| format!("insert team row for {}", output.game_id))?;
            }
        }

        upsert_run(
            &tx,
            &output.game_id,
            "complete",
            None,
            output.player_rows.len(),
            output.team_rows.len(),
        )?;
        tx.commit().context("commit game transaction")?;
        Ok(())
    }

    /// Drops any partial rows and records why the game failed.
    pub fn record_failure(&mut self, game_id: &str, error: &GameError) -> Result<()> {
        let status = if error.is_skip() { "skipped" } else { "errored" };
        let tx = self.conn.transaction().context("begin failure transaction")?;
        delete_rows(&tx, game_id)?;
        upsert_run(&tx, game_id, status, Some(&error.to_string()), 0, 0)?;
        tx.commit().context("commit failure transaction")?;
        Ok(())
    }

    pub fn delete_game(&mut self, game_id: &str) -> Result<()> {
        let tx = self.conn.transaction().context("begin delete transaction")?;
        delete_rows(&tx, game_id)?;
        tx.execute("DELETE FROM game_runs WHERE game_id = ?1", params![game_id])
            .context("delete game run")?;
        tx.commit().context("commit delete transaction")?;
        Ok(())
    }

    /// Games a previous run marked as not worth retrying.
    pub fn skipped_game_ids(&self) -> Result<Vec<String>> {
        self.game_ids_with_status("skipped")
    }

    pub fn game_ids_with_status(&self, status: &str) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT game_id FROM game_runs WHERE status = ?1 ORDER BY game_id")
            .context("prepare status query")?;
        let rows = stmt
            .query_map(params![status], |row| row.get::<_, String>(0))
            .context("query game runs")?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row.context("decode game run")?);
        }
        Ok(out)
    }

    pub fn run_status(&self, game_id: &str) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT status FROM game_runs WHERE game_id = ?1")
            .context("prepare run status query")?;
        let mut rows = stmt.query(params![game_id]).context("query run status")?;
        match rows.next().context("read run status")? {
            Some(row) => Ok(Some(row.get(0).context("decode run status")?)),
            None => Ok(None),
        }
    }

    pub fn count_rows(&self, table: &str, game_id: &str) -> Result<usize> {
        let sql = format!("SELECT COUNT(*) FROM {table} WHERE gameid = ?1");
        let count: i64 = self
            .conn
            .query_row(&sql, params![game_id], |row| row.get(0))
            .with_context(|| format!("count {table} rows"))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}

impl GameSink for BoxScoreStore {
    fn write(&mut self, output: &GameOutput) -> Result<()> {
        self.write_game(output)
    }

    fn record_failure(&mut self, game_id: &str, error: &GameError) -> Result<()> {
        BoxScoreStore::record_failure(self, game_id, error)
    }
}

impl ToSql for Cell {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Cell::Text(text) => ToSqlOutput::from(text.as_str()),
            Cell::Int(value) => ToSqlOutput::from(*value),
            Cell::Real(value) => ToSqlOutput::from(*value),
            Cell::Bool(value) => ToSqlOutput::from(*value),
            Cell::Null => ToSqlOutput::Owned(Value::Null),
        })
    }
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    let stat_columns = PLAYER_COLUMNS[9..25]
        .iter()
        .map(|name| format!("\"{name}\" REAL NOT NULL"))
        .collect::<Vec<_>>()
        .join(",\n            ");
    let sql = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {PLAYER_TABLE} (
            gameid TEXT NOT NULL,
            quarter INTEGER NOT NULL,
            time TEXT NOT NULL,
            team TEXT NOT NULL,
            player TEXT NOT NULL,
            in_game INTEGER NOT NULL,
            "uPER" REAL NOT NULL,
            "PIR" REAL NOT NULL,
            "MIN" INTEGER NOT NULL,
            {stat_columns},
            home INTEGER NOT NULL,
            home_score INTEGER NOT NULL,
            away_score INTEGER NOT NULL,
            winner TEXT NOT NULL,
            play TEXT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_player_box_game ON {PLAYER_TABLE}(gameid);
        CREATE TABLE IF NOT EXISTS {TEAM_TABLE} (
            gameid TEXT NOT NULL,
            quarter INTEGER NOT NULL,
            time TEXT NOT NULL,
            team TEXT NOT NULL,
            "MIN" INTEGER NOT NULL,
            {stat_columns},
            winner TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_team_box_game ON {TEAM_TABLE}(gameid);
        CREATE TABLE IF NOT EXISTS game_runs (
            game_id TEXT PRIMARY KEY,
            status TEXT NOT NULL,
            error TEXT NULL,
            player_rows INTEGER NOT NULL,
            team_rows INTEGER NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#
    );
    conn.execute_batch(&sql).context("init box score schema")?;
    Ok(())
}

fn insert_sql(table: &str, columns: &[&str]) -> String {
    let names = columns
        .iter()
        .map(|name| format!("\"{name}\""))
        .collect::<Vec<_>>()
        .join(", ");
    let slots = (1..=columns.len())
        .map(|idx| format!("?{idx}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("INSERT INTO {table} ({names}) VALUES ({slots})")
}

fn delete_rows(tx: &rusqlite::Transaction<'_>, game_id: &str) -> Result<()> {
    for table in [PLAYER_TABLE, TEAM_TABLE] {
        tx.execute(
            &format!("DELETE FROM {table} WHERE gameid = ?1"),
            params![game_id],
        )
        .with_context(|| format!("clear {table} rows for {game_id}"))?;
    }
    Ok(())
}

fn upsert_run(
    tx: &rusqlite::Transaction<'_>,
    game_id: &str,
    status: &str,
    error: Option<&str>,
    player_rows: usize,
    team_rows: usize,
) -> Result<()> {
    tx.execute(
        r#"
        INSERT INTO game_runs (game_id, status, error, player_rows, team_rows, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        ON CONFLICT(game_id) DO UPDATE SET
            status = excluded.status,
            error = excluded.error,
            player_rows = excluded.player_rows,
            team_rows = excluded.team_rows,
            updated_at = excluded.updated_at
        "#,
        params![
            game_id,
            status,
            error,
            player_rows as i64,
            team_rows as i64,
            Utc::now().to_rfc3339(),
        ],
    )
    .context("upsert game run")?;
    Ok(())
}
