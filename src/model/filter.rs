use serde::{Deserialize, Serialize};

use super::project::{Priority, Progress};

/// Filter criteria applied as a conjunction; unset fields always match
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    #[serde(default)]
    pub progress: Option<Progress>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    /// Case-insensitive substring match on name, description, or any tag
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub favorites_only: bool,
    #[serde(default)]
    pub archived: bool,
}

impl Filter {
    pub fn is_empty(&self) -> bool {
        self.progress.is_none()
            && self.category.is_none()
            && self.priority.is_none()
            && self.search.is_empty()
            && !self.favorites_only
    }
}

/// Field a view can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Name,
    Progress,
    Priority,
    DueDate,
    CreatedAt,
    UpdatedAt,
    #[default]
    Order,
}

impl SortField {
    pub fn label(self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Progress => "progress",
            SortField::Priority => "priority",
            SortField::DueDate => "due",
            SortField::CreatedAt => "created",
            SortField::UpdatedAt => "updated",
            SortField::Order => "order",
        }
    }

    pub fn parse(s: &str) -> Option<SortField> {
        match s {
            "name" => Some(SortField::Name),
            "progress" => Some(SortField::Progress),
            "priority" => Some(SortField::Priority),
            "due" | "due-date" | "dueDate" => Some(SortField::DueDate),
            "created" | "createdAt" => Some(SortField::CreatedAt),
            "updated" | "updatedAt" => Some(SortField::UpdatedAt),
            "order" => Some(SortField::Order),
            _ => None,
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn parse(s: &str) -> Option<SortDir> {
        match s {
            "asc" | "ascending" => Some(SortDir::Asc),
            "desc" | "descending" => Some(SortDir::Desc),
            _ => None,
        }
    }
}

/// Sort criteria: field plus direction, ties broken by input order
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDir,
}

/// A named filter + sort combination saved for reuse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterPreset {
    pub name: String,
    #[serde(default)]
    pub filter: Filter,
    #[serde(default)]
    pub sort: Sort,
}
