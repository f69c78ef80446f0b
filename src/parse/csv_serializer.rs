use crate::model::project::Project;

/// Column set for CSV export, in order
pub const CSV_HEADERS: [&str; 8] = [
    "Name",
    "Progress",
    "Category",
    "Priority",
    "Due Date",
    "Link",
    "Description",
    "Tags",
];

/// Serialize projects as CSV with the fixed column set.
///
/// Every data cell is quoted and embedded quotes are doubled. Commas inside
/// the description become `;`, and tags are `;`-joined, so the cells stay
/// single-valued for spreadsheet tools that split on commas regardless of
/// quoting.
pub fn serialize_csv(projects: &[Project]) -> String {
    let mut lines = Vec::with_capacity(projects.len() + 1);
    lines.push(CSV_HEADERS.join(","));

    for p in projects {
        let due = p
            .due_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        let cells = [
            p.name.clone(),
            p.progress.label().to_string(),
            p.category.clone(),
            p.priority.label().to_string(),
            due,
            p.link.clone(),
            p.description.replace(',', ";"),
            p.tags.join(";"),
        ];
        let row: Vec<String> = cells.iter().map(|cell| quote(cell)).collect();
        lines.push(row.join(","));
    }

    lines.join("\n")
}

fn quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}
