use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use super::project::{Health, LinkStatus, Note, Priority, Progress, Project};

/// Current on-disk schema version for project list files
pub const SCHEMA_VERSION: u32 = 2;

/// Error upgrading a raw payload to the current schema
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    #[error("record has no name")]
    MissingName,
    #[error("unrecognized progress value: {0:?}")]
    BadProgress(String),
    #[error("unrecognized priority value: {0:?}")]
    BadPriority(String),
    #[error("invalid due date: {0:?}")]
    BadDueDate(String),
    #[error("invalid timestamp: {0:?}")]
    BadTimestamp(String),
}

/// A project as it appears in storage or import payloads: every field
/// optional so older or foreign records deserialize without error.
/// `migrate` turns one of these into a fully-populated record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProject {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub progress: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub favorite: Option<bool>,
    #[serde(default)]
    pub archived: Option<bool>,
    #[serde(default)]
    pub notes: Option<Vec<RawNote>>,
    #[serde(default)]
    pub dependencies: Option<Vec<String>>,
    #[serde(default)]
    pub link_status: Option<String>,
    #[serde(default)]
    pub health: Option<String>,
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawNote {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Upgrade a raw record to the current schema, back-filling absent fields
/// with defaults. `fallback_order` is used when the payload carries no
/// order (legacy records took their list position).
pub fn migrate(raw: RawProject, fallback_order: i64, now: DateTime<Utc>) -> Result<Project, MigrateError> {
    let name = match raw.name {
        Some(n) if !n.trim().is_empty() => n,
        _ => return Err(MigrateError::MissingName),
    };

    let progress = match raw.progress.as_deref() {
        None | Some("") => Progress::InProgress,
        Some(s) => Progress::parse(s).ok_or_else(|| MigrateError::BadProgress(s.to_string()))?,
    };
    let priority = match raw.priority.as_deref() {
        None | Some("") => Priority::Medium,
        Some(s) => Priority::parse(s).ok_or_else(|| MigrateError::BadPriority(s.to_string()))?,
    };

    // Soft fields: unrecognized values fall back to the default rather than
    // failing the record. Health is recomputed after load anyway.
    let link_status = match raw.link_status.as_deref() {
        Some("valid") => LinkStatus::Valid,
        Some("invalid") => LinkStatus::Invalid,
        _ => LinkStatus::Unknown,
    };
    let health = match raw.health.as_deref() {
        Some("excellent") => Health::Excellent,
        Some("fair") => Health::Fair,
        Some("poor") => Health::Poor,
        _ => Health::Good,
    };

    let due_date = parse_due_date(raw.due_date.as_deref())?;
    let created_at = parse_timestamp(raw.created_at.as_deref(), now)?;
    let updated_at = parse_timestamp(raw.updated_at.as_deref(), now)?;

    let notes = raw
        .notes
        .unwrap_or_default()
        .into_iter()
        .map(|n| {
            Ok(Note {
                text: n.text,
                timestamp: parse_timestamp(n.timestamp.as_deref(), now)?,
            })
        })
        .collect::<Result<Vec<_>, MigrateError>>()?;

    Ok(Project {
        id: raw.id.unwrap_or_default(),
        name,
        link: raw.link.unwrap_or_default(),
        progress,
        category: raw.category.unwrap_or_default(),
        description: raw.description.unwrap_or_default(),
        priority,
        due_date,
        tags: raw.tags.unwrap_or_default(),
        icon: raw.icon.unwrap_or_default(),
        color: raw.color.unwrap_or_default(),
        favorite: raw.favorite.unwrap_or(false),
        archived: raw.archived.unwrap_or(false),
        notes,
        dependencies: raw.dependencies.unwrap_or_default(),
        link_status,
        health,
        order: raw.order.unwrap_or(fallback_order),
        created_at,
        updated_at,
    })
}

/// Empty string and null both mean "no due date"
fn parse_due_date(value: Option<&str>) -> Result<Option<NaiveDate>, MigrateError> {
    match value {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| MigrateError::BadDueDate(s.to_string())),
    }
}

fn parse_timestamp(value: Option<&str>, now: DateTime<Utc>) -> Result<DateTime<Utc>, MigrateError> {
    match value {
        None | Some("") => Ok(now),
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|_| MigrateError::BadTimestamp(s.to_string())),
    }
}
