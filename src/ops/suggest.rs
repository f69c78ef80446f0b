use crate::model::project::Project;

/// Maximum suggestions returned
const SUGGESTION_CAP: usize = 5;
/// Maximum recent search terms mixed in
const RECENT_CAP: usize = 3;

/// Autocomplete candidates for a partial search term: project names
/// containing the query (excluding an exact match) first, then up to
/// three recent search terms, deduplicated, capped at five.
pub fn suggestions(projects: &[Project], history: &[String], query: &str) -> Vec<String> {
    let q = query.to_lowercase();

    let names = projects
        .iter()
        .filter(|p| {
            let lower = p.name.to_lowercase();
            lower.contains(&q) && lower != q
        })
        .map(|p| p.name.clone())
        .take(SUGGESTION_CAP);

    let recent = history
        .iter()
        .filter(|s| s.to_lowercase().contains(&q))
        .cloned()
        .take(RECENT_CAP);

    let mut out: Vec<String> = Vec::new();
    for candidate in names.chain(recent) {
        if !out.contains(&candidate) {
            out.push(candidate);
        }
    }
    out.truncate(SUGGESTION_CAP);
    out
}
