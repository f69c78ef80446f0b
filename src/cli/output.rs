use chrono::NaiveDate;
use serde::Serialize;

use crate::model::activity::ActivityEntry;
use crate::model::filter::{FilterPreset, SortDir, SortField};
use crate::model::history::HistoryEntry;
use crate::model::project::{LinkStatus, Priority, Progress, Project};
use crate::ops::health::health_score;
use crate::ops::links::LinkOutcome;
use crate::ops::stats::Stats;
use crate::parse::share::SharedProject;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

/// Compact history listing; the full before/after snapshots stay on disk
#[derive(Serialize)]
pub struct HistoryItemJson {
    pub index: usize,
    pub action: &'static str,
    pub timestamp: String,
    pub name: String,
    pub progress: Progress,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn history_item_to_json(index: usize, entry: &HistoryEntry) -> HistoryItemJson {
    HistoryItemJson {
        index,
        action: entry.action.label(),
        timestamp: entry.timestamp.to_rfc3339(),
        name: entry.new_data.name.clone(),
        progress: entry.new_data.progress,
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

fn progress_char(progress: Progress) -> char {
    match progress {
        Progress::InProgress => '>',
        Progress::Blocked => '-',
        Progress::Complete => 'x',
    }
}

/// Format a single project as a one-line summary
pub fn format_project_line(project: &Project, today: NaiveDate) -> String {
    let mut line = format!("[{}] {}", progress_char(project.progress), project.id);
    if project.favorite {
        line.push_str(" ★");
    }
    line.push(' ');
    line.push_str(&project.name);
    if project.priority == Priority::High {
        line.push_str(" !high");
    }
    for tag in &project.tags {
        line.push_str(" #");
        line.push_str(tag);
    }
    if let Some(due) = project.due_date {
        line.push_str(&format!(" due:{}", due.format("%Y-%m-%d")));
        if project.is_overdue(today) {
            line.push_str(" (overdue)");
        }
    }
    line
}

/// Format detailed project view
pub fn format_project_detail(
    project: &Project,
    history_count: usize,
    today: NaiveDate,
) -> Vec<String> {
    let mut lines = Vec::new();

    // Header
    lines.push(format!("{} ({})", project.name, project.id));

    lines.push(format!("  status:    {}", project.progress.label()));
    if !project.category.is_empty() {
        lines.push(format!("  category:  {}", project.category));
    }
    lines.push(format!("  priority:  {}", project.priority.label()));
    if let Some(due) = project.due_date {
        let mut value = due.format("%Y-%m-%d").to_string();
        if project.is_overdue(today) {
            value.push_str(" (overdue)");
        }
        lines.push(format!("  due:       {}", value));
    }
    if !project.tags.is_empty() {
        lines.push(format!(
            "  tags:      {}",
            project
                .tags
                .iter()
                .map(|t| format!("#{}", t))
                .collect::<Vec<_>>()
                .join(" ")
        ));
    }
    if !project.link.is_empty() {
        lines.push(format!(
            "  link:      {} ({})",
            project.link,
            project.link_status.label()
        ));
    }
    lines.push(format!(
        "  health:    {} (score {})",
        project.health.label(),
        health_score(project, today)
    ));
    if project.favorite {
        lines.push("  favorite:  yes".to_string());
    }
    if project.archived {
        lines.push("  archived:  yes".to_string());
    }
    if !project.dependencies.is_empty() {
        lines.push(format!("  deps:      {}", project.dependencies.join(", ")));
    }
    if history_count > 0 {
        lines.push(format!("  history:   {} versions", history_count));
    }
    lines.push(format!(
        "  created:   {}",
        project.created_at.format("%Y-%m-%d %H:%M")
    ));
    lines.push(format!(
        "  updated:   {}",
        project.updated_at.format("%Y-%m-%d %H:%M")
    ));

    if !project.description.is_empty() {
        lines.push(String::new());
        lines.push(format!("  {}", project.description));
    }

    // Notes, newest last
    if !project.notes.is_empty() {
        lines.push(String::new());
        lines.push("notes:".to_string());
        for note in &project.notes {
            lines.push(format!(
                "  [{}] {}",
                note.timestamp.format("%Y-%m-%d %H:%M"),
                note.text
            ));
        }
    }

    lines
}

pub fn format_activity_line(entry: &ActivityEntry) -> String {
    format!(
        "{}  {} ({})",
        entry.timestamp.format("%Y-%m-%d %H:%M"),
        entry.action,
        entry.project_name
    )
}

pub fn format_history_line(index: usize, entry: &HistoryEntry) -> String {
    let mut line = format!(
        "[{}] {}  {}",
        index,
        entry.timestamp.format("%Y-%m-%d %H:%M"),
        entry.action.label()
    );
    if entry.old_data.progress != entry.new_data.progress {
        line.push_str(&format!(
            ": {} -> {}",
            entry.old_data.progress.label(),
            entry.new_data.progress.label()
        ));
    }
    line
}

pub fn format_outcome_line(outcome: &LinkOutcome) -> String {
    let mark = match outcome.status {
        LinkStatus::Valid => '✓',
        LinkStatus::Invalid => '✗',
        LinkStatus::Unknown => '?',
    };
    format!("{} {} {} {}", mark, outcome.id, outcome.name, outcome.link)
}

pub fn format_stats(stats: &Stats) -> Vec<String> {
    vec![
        format!("total:        {}", stats.total),
        format!("in progress:  {}", stats.in_progress),
        format!("blocked:      {}", stats.blocked),
        format!("complete:     {}", stats.complete),
        format!("archived:     {}", stats.archived),
        format!("overdue:      {}", stats.overdue),
        format!("favorites:    {}", stats.favorites),
    ]
}

/// Format a preset as `name  part part part`
pub fn format_preset_line(preset: &FilterPreset) -> String {
    let mut parts = Vec::new();
    if let Some(progress) = preset.filter.progress {
        parts.push(format!("progress={}", progress.label()));
    }
    if let Some(category) = &preset.filter.category {
        parts.push(format!("category={}", category));
    }
    if let Some(priority) = preset.filter.priority {
        parts.push(format!("priority={}", priority.label()));
    }
    if !preset.filter.search.is_empty() {
        parts.push(format!("search={}", preset.filter.search));
    }
    if preset.filter.favorites_only {
        parts.push("favorites".to_string());
    }
    if preset.filter.archived {
        parts.push("archived".to_string());
    }
    if preset.sort.field != SortField::Order || preset.sort.direction == SortDir::Desc {
        let mut sort = format!("sort={}", preset.sort.field.label());
        if preset.sort.direction == SortDir::Desc {
            sort.push_str(" desc");
        }
        parts.push(sort);
    }
    if parts.is_empty() {
        format!("{}  (everything)", preset.name)
    } else {
        format!("{}  {}", preset.name, parts.join(" "))
    }
}

pub fn format_shared_line(shared: &SharedProject) -> String {
    let mut line = format!("[{}] {}", progress_char(shared.progress), shared.name);
    if !shared.category.is_empty() {
        line.push_str(&format!(" ({})", shared.category));
    }
    if !shared.link.is_empty() {
        line.push(' ');
        line.push_str(&shared.link);
    }
    line
}

/// Parse a status string into Progress
pub fn parse_progress(s: &str) -> Result<Progress, String> {
    Progress::parse(s).ok_or_else(|| {
        format!(
            "unknown status '{}' (expected: in-progress, blocked, complete)",
            s
        )
    })
}

/// Parse a priority string into Priority
pub fn parse_priority(s: &str) -> Result<Priority, String> {
    Priority::parse(s)
        .ok_or_else(|| format!("unknown priority '{}' (expected: high, medium, low)", s))
}

/// Parse a sort field name into SortField
pub fn parse_sort_field(s: &str) -> Result<SortField, String> {
    SortField::parse(s).ok_or_else(|| {
        format!(
            "unknown sort field '{}' (expected: order, name, progress, priority, due, created, updated)",
            s
        )
    })
}

/// Parse a YYYY-MM-DD due date
pub fn parse_due(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}' (expected: YYYY-MM-DD)", s))
}
