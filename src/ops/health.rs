use chrono::NaiveDate;

use crate::model::project::{Health, LinkStatus, Progress, Project};

/// Score a project's risk signals. Starts at 100 and deducts per issue;
/// the band mapping lives on `Health::from_score`.
pub fn health_score(project: &Project, today: NaiveDate) -> i32 {
    let mut score = 100;
    if project.progress == Progress::Blocked {
        score -= 30;
    }
    if project.is_overdue(today) {
        score -= 25;
    }
    if project.link_status == LinkStatus::Invalid {
        score -= 20;
    }
    if project.description.is_empty() {
        score -= 10;
    }
    if project.category.is_empty() {
        score -= 5;
    }
    if project.notes.is_empty() {
        score -= 5;
    }
    score
}

/// Compute the health band for a project as of `today`
pub fn health(project: &Project, today: NaiveDate) -> Health {
    Health::from_score(health_score(project, today))
}
