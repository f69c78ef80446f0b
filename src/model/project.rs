use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Progress status of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Progress {
    #[default]
    #[serde(rename = "in progress")]
    InProgress,
    #[serde(rename = "blocked")]
    Blocked,
    #[serde(rename = "complete")]
    Complete,
}

impl Progress {
    /// The storage/display label for this status
    pub fn label(self) -> &'static str {
        match self {
            Progress::InProgress => "in progress",
            Progress::Blocked => "blocked",
            Progress::Complete => "complete",
        }
    }

    /// Parse a status label (CLI accepts a hyphenated alias)
    pub fn parse(s: &str) -> Option<Progress> {
        match s {
            "in progress" | "in-progress" => Some(Progress::InProgress),
            "blocked" => Some(Progress::Blocked),
            "complete" => Some(Progress::Complete),
            _ => None,
        }
    }

    /// Sort rank: complete > in progress > blocked
    pub fn rank(self) -> u8 {
        match self {
            Progress::Complete => 3,
            Progress::InProgress => 2,
            Progress::Blocked => 1,
        }
    }
}

/// Priority level of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    pub fn parse(s: &str) -> Option<Priority> {
        match s {
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }

    /// Sort rank: high > medium > low
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

/// Result of the last link check on a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    Valid,
    Invalid,
    #[default]
    Unknown,
}

impl LinkStatus {
    pub fn label(self) -> &'static str {
        match self {
            LinkStatus::Valid => "valid",
            LinkStatus::Invalid => "invalid",
            LinkStatus::Unknown => "unknown",
        }
    }
}

/// Derived health band summarizing a project's risk signals
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Health {
    Poor,
    Fair,
    #[default]
    Good,
    Excellent,
}

impl Health {
    pub fn label(self) -> &'static str {
        match self {
            Health::Excellent => "excellent",
            Health::Good => "good",
            Health::Fair => "fair",
            Health::Poor => "poor",
        }
    }

    /// Map a health score to its band
    pub fn from_score(score: i32) -> Health {
        if score >= 80 {
            Health::Excellent
        } else if score >= 60 {
            Health::Good
        } else if score >= 40 {
            Health::Fair
        } else {
            Health::Poor
        }
    }
}

/// A timestamped free-text note on a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// One tracked project record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique, stable identifier (time-derived token)
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub progress: Progress,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    /// Optional due date (calendar date, no time component). Older
    /// payloads store an empty string for "none".
    #[serde(default, deserialize_with = "de_due_date")]
    pub due_date: Option<NaiveDate>,
    /// Membership treated as a set; order preserved for display
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub notes: Vec<Note>,
    /// Ids of other projects this one depends on
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub link_status: LinkStatus,
    /// Derived; recomputed whenever an input field changes
    #[serde(default)]
    pub health: Health,
    /// Manual sort position; relative order is what matters
    #[serde(default)]
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Whether the due date has passed and the project is not complete
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        match self.due_date {
            Some(due) => due < today && self.progress != Progress::Complete,
            None => false,
        }
    }
}

fn de_due_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Fields settable at creation time; everything else gets a default
#[derive(Debug, Clone, Default)]
pub struct ProjectDraft {
    pub name: String,
    pub link: String,
    pub category: String,
    pub description: String,
    pub progress: Option<Progress>,
    pub priority: Option<Priority>,
    pub due_date: Option<NaiveDate>,
    pub tags: Vec<String>,
    pub icon: String,
    pub color: String,
}

/// Partial update merged into an existing record. `due_date` distinguishes
/// "leave alone" (None) from "clear" (Some(None)).
#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub link: Option<String>,
    pub progress: Option<Progress>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<Option<NaiveDate>>,
    pub tags: Option<Vec<String>>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

impl ProjectPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.link.is_none()
            && self.progress.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.tags.is_none()
            && self.icon.is_none()
            && self.color.is_none()
    }

    /// Merge the set fields into `project`. Does not touch timestamps or
    /// derived fields; the store handles those.
    pub fn apply_to(&self, project: &mut Project) {
        if let Some(name) = &self.name {
            project.name = name.clone();
        }
        if let Some(link) = &self.link {
            project.link = link.clone();
        }
        if let Some(progress) = self.progress {
            project.progress = progress;
        }
        if let Some(category) = &self.category {
            project.category = category.clone();
        }
        if let Some(description) = &self.description {
            project.description = description.clone();
        }
        if let Some(priority) = self.priority {
            project.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            project.due_date = due_date;
        }
        if let Some(tags) = &self.tags {
            project.tags = tags.clone();
        }
        if let Some(icon) = &self.icon {
            project.icon = icon.clone();
        }
        if let Some(color) = &self.color {
            project.color = color.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_labels_round_trip() {
        for p in [Progress::InProgress, Progress::Blocked, Progress::Complete] {
            assert_eq!(Progress::parse(p.label()), Some(p));
        }
        assert_eq!(Progress::parse("in-progress"), Some(Progress::InProgress));
        assert_eq!(Progress::parse("done"), None);
    }

    #[test]
    fn progress_serde_uses_spaced_label() {
        let json = serde_json::to_string(&Progress::InProgress).unwrap();
        assert_eq!(json, "\"in progress\"");
        let back: Progress = serde_json::from_str("\"in progress\"").unwrap();
        assert_eq!(back, Progress::InProgress);
    }

    #[test]
    fn health_bands() {
        assert_eq!(Health::from_score(100), Health::Excellent);
        assert_eq!(Health::from_score(80), Health::Excellent);
        assert_eq!(Health::from_score(79), Health::Good);
        assert_eq!(Health::from_score(60), Health::Good);
        assert_eq!(Health::from_score(59), Health::Fair);
        assert_eq!(Health::from_score(40), Health::Fair);
        assert_eq!(Health::from_score(39), Health::Poor);
        assert_eq!(Health::from_score(-10), Health::Poor);
    }

    #[test]
    fn overdue_requires_past_due_and_not_complete() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let mut p = sample(Some(NaiveDate::from_ymd_opt(2025, 6, 14).unwrap()));
        assert!(p.is_overdue(today));

        p.progress = Progress::Complete;
        assert!(!p.is_overdue(today));

        p.progress = Progress::InProgress;
        p.due_date = Some(today);
        assert!(!p.is_overdue(today));

        p.due_date = None;
        assert!(!p.is_overdue(today));
    }

    #[test]
    fn patch_merges_only_set_fields() {
        let mut p = sample(None);
        let patch = ProjectPatch {
            name: Some("renamed".into()),
            due_date: Some(Some(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap())),
            ..Default::default()
        };
        patch.apply_to(&mut p);
        assert_eq!(p.name, "renamed");
        assert_eq!(p.due_date, Some(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()));
        assert_eq!(p.category, "Tool");

        let clear = ProjectPatch {
            due_date: Some(None),
            ..Default::default()
        };
        clear.apply_to(&mut p);
        assert_eq!(p.due_date, None);
    }

    #[test]
    fn project_json_uses_camel_case_keys() {
        let p = sample(Some(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()));
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"dueDate\":\"2025-03-01\""));
        assert!(json.contains("\"linkStatus\":\"unknown\""));
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"updatedAt\""));
        let back: Project = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn empty_due_date_string_deserializes_as_none() {
        let mut json = serde_json::to_value(sample(None)).unwrap();
        json["dueDate"] = serde_json::Value::String(String::new());
        let p: Project = serde_json::from_value(json).unwrap();
        assert_eq!(p.due_date, None);
    }

    fn sample(due: Option<NaiveDate>) -> Project {
        let now = "2025-01-01T00:00:00Z".parse().unwrap();
        Project {
            id: "1735689600000".into(),
            name: "Sample".into(),
            link: String::new(),
            progress: Progress::InProgress,
            category: "Tool".into(),
            description: "a sample".into(),
            priority: Priority::Medium,
            due_date: due,
            tags: vec!["tool".into()],
            icon: String::new(),
            color: String::new(),
            favorite: false,
            archived: false,
            notes: Vec::new(),
            dependencies: Vec::new(),
            link_status: LinkStatus::Unknown,
            health: Health::Good,
            order: 0,
            created_at: now,
            updated_at: now,
        }
    }
}
