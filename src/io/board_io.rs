use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::model::activity::ActivityEntry;
use crate::model::filter::FilterPreset;
use crate::model::history::HistoryEntry;
use crate::model::migrate::{self, MigrateError, RawProject, SCHEMA_VERSION};
use crate::model::project::Project;

/// Name of the data directory discovered by walking up
pub const BOARD_DIR: &str = "tally";

pub const PROJECTS_FILE: &str = "projects.json";
pub const ARCHIVE_FILE: &str = "archive.json";
pub const ACTIVITY_FILE: &str = "activity.json";
pub const HISTORY_FILE: &str = "history.json";
pub const PRESETS_FILE: &str = "presets.json";

/// Error type for board I/O operations
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("not a tally board: no tally/ directory found")]
    NotABoard,
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{path} uses schema version {version}, newer than this build supports")]
    UnsupportedVersion { path: PathBuf, version: u32 },
    #[error("could not migrate record in {path}: {source}")]
    BadRecord {
        path: PathBuf,
        source: MigrateError,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: io::Error,
    },
}

/// Discover the board by walking up from the given directory, looking
/// for a `tally/` subdirectory holding a project list.
pub fn discover_board(start: &Path) -> Result<PathBuf, BoardError> {
    let mut current = start.to_path_buf();
    loop {
        let board_dir = current.join(BOARD_DIR);
        if board_dir.is_dir() && board_dir.join(PROJECTS_FILE).exists() {
            return Ok(board_dir);
        }
        if !current.pop() {
            return Err(BoardError::NotABoard);
        }
    }
}

/// Write a file atomically: temp file in the same directory, then rename
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Project lists (versioned envelope)
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ListFileOut<'a> {
    version: u32,
    projects: &'a [Project],
}

#[derive(Deserialize)]
struct ListFileIn {
    #[serde(default)]
    version: Option<u32>,
    #[serde(default)]
    projects: Vec<RawProject>,
}

/// Load the active project list from `projects.json`
pub fn load_projects(board_dir: &Path) -> Result<Vec<Project>, BoardError> {
    load_list(&board_dir.join(PROJECTS_FILE))
}

/// Load the archived project list from `archive.json`
pub fn load_archive(board_dir: &Path) -> Result<Vec<Project>, BoardError> {
    load_list(&board_dir.join(ARCHIVE_FILE))
}

pub fn save_projects(board_dir: &Path, projects: &[Project]) -> Result<(), BoardError> {
    save_list(&board_dir.join(PROJECTS_FILE), projects)
}

pub fn save_archive(board_dir: &Path, projects: &[Project]) -> Result<(), BoardError> {
    save_list(&board_dir.join(ARCHIVE_FILE), projects)
}

/// Load one list file. A missing file is an empty list. Accepts both the
/// current versioned envelope and the legacy bare array; every record
/// goes through the schema migration.
fn load_list(path: &Path) -> Result<Vec<Project>, BoardError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let text = read_file(path)?;
    let value: serde_json::Value = parse_json(path, &text)?;

    let raws: Vec<RawProject> = if value.is_array() {
        from_value(path, value)?
    } else {
        let file: ListFileIn = from_value(path, value)?;
        if let Some(version) = file.version
            && version > SCHEMA_VERSION
        {
            return Err(BoardError::UnsupportedVersion {
                path: path.to_path_buf(),
                version,
            });
        }
        file.projects
    };

    let now = Utc::now();
    raws.into_iter()
        .enumerate()
        .map(|(i, raw)| {
            migrate::migrate(raw, i as i64, now).map_err(|e| BoardError::BadRecord {
                path: path.to_path_buf(),
                source: e,
            })
        })
        .collect()
}

fn save_list(path: &Path, projects: &[Project]) -> Result<(), BoardError> {
    let out = ListFileOut {
        version: SCHEMA_VERSION,
        projects,
    };
    write_json(path, &out)
}

// ---------------------------------------------------------------------------
// Activity log, history map, presets
// ---------------------------------------------------------------------------

pub fn load_activity(board_dir: &Path) -> Result<Vec<ActivityEntry>, BoardError> {
    load_or_default(&board_dir.join(ACTIVITY_FILE))
}

pub fn save_activity(board_dir: &Path, log: &[ActivityEntry]) -> Result<(), BoardError> {
    write_json(&board_dir.join(ACTIVITY_FILE), &log)
}

pub fn load_history(
    board_dir: &Path,
) -> Result<IndexMap<String, Vec<HistoryEntry>>, BoardError> {
    load_or_default(&board_dir.join(HISTORY_FILE))
}

pub fn save_history(
    board_dir: &Path,
    history: &IndexMap<String, Vec<HistoryEntry>>,
) -> Result<(), BoardError> {
    write_json(&board_dir.join(HISTORY_FILE), history)
}

pub fn load_presets(board_dir: &Path) -> Result<Vec<FilterPreset>, BoardError> {
    load_or_default(&board_dir.join(PRESETS_FILE))
}

pub fn save_presets(board_dir: &Path, presets: &[FilterPreset]) -> Result<(), BoardError> {
    write_json(&board_dir.join(PRESETS_FILE), &presets)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load_or_default<T>(path: &Path) -> Result<T, BoardError>
where
    T: Default + serde::de::DeserializeOwned,
{
    if !path.exists() {
        return Ok(T::default());
    }
    let text = read_file(path)?;
    serde_json::from_str(&text).map_err(|e| BoardError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

fn read_file(path: &Path) -> Result<String, BoardError> {
    fs::read_to_string(path).map_err(|e| BoardError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })
}

fn parse_json(path: &Path, text: &str) -> Result<serde_json::Value, BoardError> {
    serde_json::from_str(text).map_err(|e| BoardError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

fn from_value<T: serde::de::DeserializeOwned>(
    path: &Path,
    value: serde_json::Value,
) -> Result<T, BoardError> {
    serde_json::from_value(value).map_err(|e| BoardError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), BoardError> {
    let content = serde_json::to_string_pretty(value).map_err(|e| BoardError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    atomic_write(path, content.as_bytes()).map_err(|e| BoardError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })
}
