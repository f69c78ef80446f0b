use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::activity::ActivityEntry;
use crate::model::history::HistoryEntry;
use crate::model::migrate::RawProject;
use crate::model::project::Project;

/// Version tag written into (and required from) backup documents
pub const BACKUP_VERSION: &str = "2.0";

/// Error decoding a backup document
#[derive(Debug, thiserror::Error)]
pub enum BackupError {
    #[error("backup is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported backup version: {0:?}")]
    UnsupportedVersion(String),
}

/// A decoded backup: full board state as stored, with project lists still
/// raw so restore can migrate them record by record.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupDoc {
    #[serde(default)]
    pub projects: Vec<RawProject>,
    #[serde(default)]
    pub archived_projects: Vec<RawProject>,
    #[serde(default)]
    pub activity_log: Vec<ActivityEntry>,
    #[serde(default)]
    pub project_history: IndexMap<String, Vec<HistoryEntry>>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub version: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BackupOut<'a> {
    projects: &'a [Project],
    archived_projects: &'a [Project],
    activity_log: &'a [ActivityEntry],
    project_history: &'a IndexMap<String, Vec<HistoryEntry>>,
    timestamp: DateTime<Utc>,
    version: &'static str,
}

/// Serialize the full board state as a pretty-printed backup document
pub fn encode_backup(
    projects: &[Project],
    archived: &[Project],
    activity: &[ActivityEntry],
    history: &IndexMap<String, Vec<HistoryEntry>>,
    now: DateTime<Utc>,
) -> Result<String, BackupError> {
    let out = BackupOut {
        projects,
        archived_projects: archived,
        activity_log: activity,
        project_history: history,
        timestamp: now,
        version: BACKUP_VERSION,
    };
    Ok(serde_json::to_string_pretty(&out)?)
}

/// Parse a backup document, rejecting any version other than the current
/// one. Board state is only touched later, by the store's restore.
pub fn decode_backup(text: &str) -> Result<BackupDoc, BackupError> {
    let doc: BackupDoc = serde_json::from_str(text)?;
    if doc.version != BACKUP_VERSION {
        return Err(BackupError::UnsupportedVersion(doc.version));
    }
    Ok(doc)
}
