use std::env;
use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use crate::game::FoldOptions;

const APP_DIR: &str = "pbp_boxscore";
const DB_FILE: &str = "box_scores.sqlite";
const DEFAULT_FEED_DIR: &str = "feeds";
const DEFAULT_PARALLELISM: usize = 4;
const DOTENV_FILES: [&str; 2] = [".env.local", ".env"];

/// Runtime settings: environment first, then command-line overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub feed_dir: PathBuf,
    pub db_path: Option<PathBuf>,
    pub game_ids: Vec<String>,
    pub parallelism: usize,
    pub gap_fill: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed_dir: PathBuf::from(DEFAULT_FEED_DIR),
            db_path: default_db_path(),
            game_ids: Vec::new(),
            parallelism: DEFAULT_PARALLELISM,
            gap_fill: true,
        }
    }
}

impl Config {
    /// Loads `.env.local` then `.env` (neither is required) and reads `PBP_*`.
    pub fn from_env() -> Self {
        load_dotenv();

        let mut config = Self::default();
        if let Some(dir) = non_empty_var("PBP_FEED_DIR") {
            config.feed_dir = PathBuf::from(dir);
        }
        if let Some(path) = non_empty_var("PBP_DB_PATH") {
            config.db_path = Some(PathBuf::from(path));
        }
        config.parallelism = parse_parallelism(env::var("PBP_PARALLELISM").ok().as_deref());
        if let Some(raw) = non_empty_var("PBP_GAP_FILL") {
            config.gap_fill = parse_flag(&raw).unwrap_or(true);
        }
        config
    }

    /// Applies `--feeds`, `--db`, `--games`, `--parallelism` and `--no-gap-fill`.
    /// Both `--flag value` and `--flag=value` are accepted.
    pub fn apply_args(&mut self, args: &[String]) {
        if let Some(dir) = flag_value(args, "--feeds") {
            self.feed_dir = PathBuf::from(dir);
        }
        if let Some(path) = flag_value(args, "--db") {
            self.db_path = Some(PathBuf::from(path));
        }
        if let Some(raw) = flag_value(args, "--games") {
            self.game_ids = parse_game_ids(&raw);
        }
        if let Some(raw) = flag_value(args, "--parallelism") {
            self.parallelism = parse_parallelism(Some(&raw));
        }
        if args.iter().any(|arg| arg == "--no-gap-fill") {
            self.gap_fill = false;
        }
    }

    pub fn fold_options(&self) -> FoldOptions {
        FoldOptions {
            gap_fill: self.gap_fill,
        }
    }
}

/// `$XDG_CACHE_HOME/pbp_boxscore`, falling back to `~/.cache/pbp_boxscore`.
pub fn app_cache_dir() -> Option<PathBuf> {
    if let Some(base) = non_empty_var("XDG_CACHE_HOME") {
        return Some(PathBuf::from(base).join(APP_DIR));
    }
    let home = non_empty_var("HOME")?;
    Some(PathBuf::from(home).join(".cache").join(APP_DIR))
}

pub fn default_db_path() -> Option<PathBuf> {
    app_cache_dir().map(|dir| dir.join(DB_FILE))
}

/// Loads `.env.local` then `.env`. Missing files are fine and variables
/// already set win.
pub fn load_dotenv() {
    for name in DOTENV_FILES {
        let _ = dotenvy::from_filename(name);
    }
}

/// `PBP_LOG` as a filter directive, `info` when unset or malformed.
pub fn log_filter() -> EnvFilter {
    EnvFilter::try_from_env("PBP_LOG").unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global fmt subscriber, filtered by `PBP_LOG` (default `info`).
/// Dotenv files are loaded first so they can set the level. Later calls are
/// no-ops.
pub fn init_tracing() {
    load_dotenv();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_target(false)
        .try_init();
}

pub fn parse_parallelism(raw: Option<&str>) -> usize {
    raw.and_then(|val| val.trim().parse::<usize>().ok())
        .unwrap_or(DEFAULT_PARALLELISM)
        .clamp(1, 32)
}

pub fn parse_game_ids(raw: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for part in raw.split([',', ';', ' ']) {
        let id = part.trim();
        if id.is_empty() || out.iter().any(|seen| seen == id) {
            continue;
        }
        out.push(id.to_string());
    }
    out
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == flag
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.trim().to_string());
        }
    }
    None
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|val| !val.trim().is_empty())
}
