use chrono::NaiveDate;
use serde::Serialize;

use crate::model::project::{Progress, Project};

/// Board-wide counts, suitable for --json output
#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total: usize,
    pub in_progress: usize,
    pub blocked: usize,
    pub complete: usize,
    pub archived: usize,
    pub overdue: usize,
    pub favorites: usize,
}

/// Count active-list statuses plus the archive size. `total` counts the
/// active list only, matching the board header counters.
pub fn stats(active: &[Project], archived: &[Project], today: NaiveDate) -> Stats {
    let mut s = Stats {
        total: active.len(),
        archived: archived.len(),
        ..Default::default()
    };
    for p in active {
        match p.progress {
            Progress::InProgress => s.in_progress += 1,
            Progress::Blocked => s.blocked += 1,
            Progress::Complete => s.complete += 1,
        }
        if p.is_overdue(today) {
            s.overdue += 1;
        }
        if p.favorite {
            s.favorites += 1;
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::project::{Health, LinkStatus, Priority};

    fn project(name: &str, progress: Progress) -> Project {
        let now = "2025-01-01T00:00:00Z".parse().unwrap();
        Project {
            id: name.into(),
            name: name.into(),
            link: String::new(),
            progress,
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
    fn counts_each_bucket() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let mut a = project("A", Progress::InProgress);
        a.favorite = true;
        a.due_date = Some(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        let b = project("B", Progress::Blocked);
        let mut c = project("C", Progress::Complete);
        c.due_date = Some(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());

        let mut archived = project("Z", Progress::Complete);
        archived.archived = true;

        let s = stats(&[a, b, c], &[archived], today);
        assert_eq!(
            s,
            Stats {
                total: 3,
                in_progress: 1,
                blocked: 1,
                complete: 1,
                archived: 1,
                overdue: 1,
                favorites: 1,
            }
        );
    }

    #[test]
    fn empty_board_is_all_zeroes() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        assert_eq!(stats(&[], &[], today), Stats::default());
    }
}
