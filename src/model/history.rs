use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::project::Project;

/// Maximum snapshots kept per project
pub const HISTORY_CAP: usize = 20;

/// Kind of mutation that produced a history snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    StatusChange,
    Update,
    Revert,
}

impl HistoryAction {
    pub fn label(self) -> &'static str {
        match self {
            HistoryAction::StatusChange => "status change",
            HistoryAction::Update => "update",
            HistoryAction::Revert => "revert",
        }
    }
}

/// One version-history snapshot: deep copies of the record before and
/// after a mutation, so a revert can restore `old_data` verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub action: HistoryAction,
    pub old_data: Project,
    pub new_data: Project,
    pub timestamp: DateTime<Utc>,
}

/// Prepend a snapshot and enforce the per-project cap
pub fn record(history: &mut Vec<HistoryEntry>, entry: HistoryEntry) {
    history.insert(0, entry);
    history.truncate(HISTORY_CAP);
}
