use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::model::project::Project;

/// Structured result from `ty check`, suitable for --json output.
#[derive(Debug, Default, Serialize)]
pub struct CheckResult {
    pub valid: bool,
    pub errors: Vec<CheckError>,
    pub warnings: Vec<CheckWarning>,
}

/// A board integrity error (something that should be fixed).
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum CheckError {
    /// The same id appears on more than one record
    #[serde(rename = "duplicate_id")]
    DuplicateId { id: String, count: usize },
    /// A record's archived flag disagrees with the list holding it
    #[serde(rename = "list_mismatch")]
    ListMismatch {
        id: String,
        name: String,
        archived_flag: bool,
    },
}

/// A non-critical issue.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum CheckWarning {
    /// A dependency references an id that exists on neither list
    #[serde(rename = "dangling_dependency")]
    DanglingDependency {
        id: String,
        name: String,
        dep_id: String,
    },
}

/// Validate board invariants and return structured results.
///
/// Read-only. Checks:
/// 1. Ids are unique across the active and archived lists together
/// 2. Each record's archived flag matches the list it lives in
/// 3. Every dependency resolves to an existing id (warning)
pub fn check_board(active: &[Project], archived: &[Project]) -> CheckResult {
    let mut result = CheckResult::default();

    let mut id_counts: HashMap<&str, usize> = HashMap::new();
    for p in active.iter().chain(archived) {
        *id_counts.entry(p.id.as_str()).or_default() += 1;
    }
    let mut duplicates: Vec<(&str, usize)> = id_counts
        .iter()
        .filter(|&(_, &count)| count > 1)
        .map(|(&id, &count)| (id, count))
        .collect();
    duplicates.sort();
    for (id, count) in duplicates {
        result.errors.push(CheckError::DuplicateId {
            id: id.to_string(),
            count,
        });
    }

    for p in active {
        if p.archived {
            result.errors.push(CheckError::ListMismatch {
                id: p.id.clone(),
                name: p.name.clone(),
                archived_flag: true,
            });
        }
    }
    for p in archived {
        if !p.archived {
            result.errors.push(CheckError::ListMismatch {
                id: p.id.clone(),
                name: p.name.clone(),
                archived_flag: false,
            });
        }
    }

    let all_ids: HashSet<&str> = active
        .iter()
        .chain(archived)
        .map(|p| p.id.as_str())
        .collect();
    for p in active.iter().chain(archived) {
        for dep_id in &p.dependencies {
            if !all_ids.contains(dep_id.as_str()) {
                result.warnings.push(CheckWarning::DanglingDependency {
                    id: p.id.clone(),
                    name: p.name.clone(),
                    dep_id: dep_id.clone(),
                });
            }
        }
    }

    result.valid = result.errors.is_empty();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::project::{Health, LinkStatus, Priority, Progress};

    fn project(id: &str, name: &str) -> Project {
        let now = "2025-01-01T00:00:00Z".parse().unwrap();
        Project {
            id: id.into(),
            name: name.into(),
            link: String::new(),
            progress: Progress::InProgress,
            category: String::new(),
            description: String::new(),
            priority: Priority::Medium,
            due_date: None,
            tags: Vec::new(),
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

    #[test]
    fn clean_board_is_valid() {
        let a = project("1", "A");
        let mut z = project("9", "Z");
        z.archived = true;
        let result = check_board(&[a], &[z]);
        assert!(result.valid);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn duplicate_id_across_lists_is_an_error() {
        let a = project("1", "A");
        let mut b = project("1", "B");
        b.archived = true;
        let result = check_board(&[a], &[b]);
        assert!(!result.valid);
        assert!(result
            .errors
            .iter()
            .any(|e| matches!(e, CheckError::DuplicateId { id, count } if id == "1" && *count == 2)));
    }

    #[test]
    fn flag_mismatch_is_an_error() {
        let mut a = project("1", "A");
        a.archived = true; // wrong: sits in active list
        let b = project("2", "B"); // wrong: sits in archived list
        let result = check_board(&[a], &[b]);
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 2);
        assert!(result.errors.iter().any(|e| matches!(
            e,
            CheckError::ListMismatch { id, archived_flag: true, .. } if id == "1"
        )));
        assert!(result.errors.iter().any(|e| matches!(
            e,
            CheckError::ListMismatch { id, archived_flag: false, .. } if id == "2"
        )));
    }

    #[test]
    fn dangling_dependency_is_a_warning() {
        let mut a = project("1", "A");
        a.dependencies = vec!["2".into(), "404".into()];
        let mut b = project("2", "B");
        b.archived = true;
        let result = check_board(&[a], &[b]);
        // Dep to an archived record is fine; only the missing id warns
        assert!(result.valid);
        assert_eq!(result.warnings.len(), 1);
        assert!(matches!(
            &result.warnings[0],
            CheckWarning::DanglingDependency { dep_id, .. } if dep_id == "404"
        ));
    }

    #[test]
    fn result_serializes_with_type_tags() {
        let mut a = project("1", "A");
        a.dependencies = vec!["404".into()];
        let result = check_board(&[a], &[]);
        let json = serde_json::to_string_pretty(&result).unwrap();
        assert!(json.contains("dangling_dependency"));
        assert!(json.contains("404"));
    }
}
