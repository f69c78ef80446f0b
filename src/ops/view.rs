use std::cmp::Ordering;

use crate::model::filter::{Filter, Sort, SortDir, SortField};
use crate::model::project::Project;

/// Apply filter criteria then sort criteria, returning records in view
/// order. Pure: never mutates, never touches storage.
pub fn view<'a>(projects: &'a [Project], filter: &Filter, sort: Sort) -> Vec<&'a Project> {
    let mut out: Vec<&Project> = projects.iter().filter(|p| matches(p, filter)).collect();
    sort_refs(&mut out, sort);
    out
}

/// Whether a single record satisfies every active predicate
pub fn matches(project: &Project, filter: &Filter) -> bool {
    if project.archived != filter.archived {
        return false;
    }
    if let Some(progress) = filter.progress
        && project.progress != progress
    {
        return false;
    }
    if let Some(category) = &filter.category
        && project.category != *category
    {
        return false;
    }
    if let Some(priority) = filter.priority
        && project.priority != priority
    {
        return false;
    }
    if filter.favorites_only && !project.favorite {
        return false;
    }
    if !filter.search.is_empty() && !matches_search(project, &filter.search) {
        return false;
    }
    true
}

/// Case-insensitive substring match against name, description, or any tag
fn matches_search(project: &Project, search: &str) -> bool {
    let term = search.to_lowercase();
    project.name.to_lowercase().contains(&term)
        || project.description.to_lowercase().contains(&term)
        || project.tags.iter().any(|t| t.to_lowercase().contains(&term))
}

/// Stable in-place sort of a reference slice
pub fn sort_refs(projects: &mut [&Project], sort: Sort) {
    projects.sort_by(|a, b| {
        let ord = compare(a, b, sort.field);
        match sort.direction {
            SortDir::Asc => ord,
            SortDir::Desc => ord.reverse(),
        }
    });
}

fn compare(a: &Project, b: &Project, field: SortField) -> Ordering {
    match field {
        SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortField::Progress => a.progress.rank().cmp(&b.progress.rank()),
        SortField::Priority => a.priority.rank().cmp(&b.priority.rank()),
        SortField::DueDate => due_key(a).cmp(&due_key(b)),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        SortField::Order => a.order.cmp(&b.order),
    }
}

/// Missing due date sorts as day 0 (first ascending)
fn due_key(p: &Project) -> i64 {
    use chrono::Datelike;
    p.due_date.map(|d| i64::from(d.num_days_from_ce())).unwrap_or(0)
}
