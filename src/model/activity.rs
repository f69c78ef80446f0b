use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Maximum number of activity entries kept in the log
pub const ACTIVITY_CAP: usize = 100;

/// One entry in the append-only activity log, newest first.
/// Detail values are free-form JSON (older logs carry numbers).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    /// Human-readable action label, e.g. "Added new project"
    pub action: String,
    /// Name of the project (or pseudo-subject like "Multiple") acted on
    pub project_name: String,
    #[serde(default)]
    pub details: IndexMap<String, Value>,
    pub timestamp: DateTime<Utc>,
}

impl ActivityEntry {
    pub fn new(action: impl Into<String>, project_name: impl Into<String>) -> Self {
        ActivityEntry {
            action: action.into(),
            project_name: project_name.into(),
            details: IndexMap::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

/// Prepend an entry and enforce the cap
pub fn record(log: &mut Vec<ActivityEntry>, entry: ActivityEntry) {
    log.insert(0, entry);
    log.truncate(ACTIVITY_CAP);
}
