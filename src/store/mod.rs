//! The project store: owns the board state (active list, archived list,
//! activity log, per-project history, presets) and persists the affected
//! storage keys after every mutation.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use crate::io::board_io::{self, BoardError};
use crate::model::activity::{self, ACTIVITY_CAP, ActivityEntry};
use crate::model::filter::FilterPreset;
use crate::model::history::{self, HISTORY_CAP, HistoryAction, HistoryEntry};
use crate::model::migrate::{self, MigrateError, RawProject};
use crate::model::project::{
    Health, LinkStatus, Note, Priority, Progress, Project, ProjectDraft, ProjectPatch,
};
use crate::ops::health;
use crate::ops::links::{self, LinkOutcome};
use crate::parse::backup::BackupDoc;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("project not found: {0}")]
    NotFound(String),
    #[error("preset not found: {0}")]
    PresetNotFound(String),
    #[error("project name is required")]
    EmptyName,
    #[error("no note at index {index} for project {id}")]
    NoSuchNote { id: String, index: usize },
    #[error("no version at index {index} for project {id}")]
    NoSuchVersion { id: String, index: usize },
    #[error("dependency target not found: {0}")]
    UnknownDependency(String),
    #[error("a project cannot depend on itself")]
    SelfDependency,
    #[error("cannot restore {list} record {index}: {source}")]
    BadBackupRecord {
        list: &'static str,
        index: usize,
        source: MigrateError,
    },
    #[error(transparent)]
    Storage(#[from] BoardError),
}

/// Fields applied to every target of a bulk edit. Tags are appended
/// (set semantics); category and priority replace when set.
#[derive(Debug, Clone, Default)]
pub struct BulkEdit {
    pub category: Option<String>,
    pub priority: Option<Priority>,
    pub tags: Vec<String>,
}

/// Outcome of a best-effort import: every record is migrated independently,
/// failures are counted instead of aborting the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportResult {
    pub imported: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
}

/// The board state plus the directory it persists to. Every mutator stamps
/// `updated_at`, recomputes health where inputs may have changed, records
/// activity, and writes the affected storage keys through before returning.
pub struct Store {
    pub dir: PathBuf,
    pub projects: Vec<Project>,
    pub archived: Vec<Project>,
    pub activity: Vec<ActivityEntry>,
    pub history: IndexMap<String, Vec<HistoryEntry>>,
    pub presets: Vec<FilterPreset>,
}

impl Store {
    /// Load the full board from a `tally/` directory. Missing files load as
    /// empty; health bands are recomputed after migration so stale stored
    /// values never survive a load.
    pub fn load(board_dir: &Path) -> Result<Store, StoreError> {
        let mut projects = board_io::load_projects(board_dir)?;
        let mut archived = board_io::load_archive(board_dir)?;
        let activity = board_io::load_activity(board_dir)?;
        let history = board_io::load_history(board_dir)?;
        let presets = board_io::load_presets(board_dir)?;

        let today = Utc::now().date_naive();
        for project in projects.iter_mut().chain(archived.iter_mut()) {
            project.health = health::health(project, today);
        }

        Ok(Store {
            dir: board_dir.to_path_buf(),
            projects,
            archived,
            activity,
            history,
            presets,
        })
    }

    /// Look up a project in either list
    pub fn get(&self, id: &str) -> Option<&Project> {
        self.projects
            .iter()
            .chain(self.archived.iter())
            .find(|p| p.id == id)
    }

    /// Newest-first history snapshots for a project (empty if none)
    pub fn history_for(&self, id: &str) -> &[HistoryEntry] {
        self.history.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    // -----------------------------------------------------------------------
    // Creation and editing
    // -----------------------------------------------------------------------

    /// Create a project from a draft, filling unset fields with defaults
    pub fn create(&mut self, draft: ProjectDraft) -> Result<&Project, StoreError> {
        let name = draft.name.trim().to_string();
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }
        let now = Utc::now();
        let mut project = Project {
            id: self.new_id(),
            name,
            link: draft.link,
            progress: draft.progress.unwrap_or_default(),
            category: draft.category,
            description: draft.description,
            priority: draft.priority.unwrap_or_default(),
            due_date: draft.due_date,
            tags: draft.tags,
            icon: draft.icon,
            color: draft.color,
            favorite: false,
            archived: false,
            notes: Vec::new(),
            dependencies: Vec::new(),
            link_status: LinkStatus::Unknown,
            health: Health::Good,
            order: self.projects.len() as i64,
            created_at: now,
            updated_at: now,
        };
        project.health = health::health(&project, now.date_naive());

        let display = project.name.clone();
        let idx = self.projects.len();
        self.projects.push(project);
        self.log(ActivityEntry::new("Added new project", display));
        self.persist_projects()?;
        self.persist_activity()?;
        Ok(&self.projects[idx])
    }

    /// Merge a patch into an active project. Records an `update` history
    /// snapshot so the edit can be reverted.
    pub fn update(&mut self, id: &str, patch: &ProjectPatch) -> Result<&Project, StoreError> {
        let i = self.active_index(id)?;
        let now = Utc::now();
        let old = self.projects[i].clone();

        let project = &mut self.projects[i];
        patch.apply_to(project);
        project.updated_at = now;
        project.health = health::health(project, now.date_naive());
        let new = project.clone();
        let display = new.name.clone();

        self.snapshot(id, HistoryAction::Update, old, new, now);
        self.log(ActivityEntry::new("Updated project", display));
        self.persist_projects()?;
        self.persist_history()?;
        self.persist_activity()?;
        Ok(&self.projects[i])
    }

    /// Set progress, recording a `status_change` history snapshot.
    /// Setting the current value is a no-op.
    pub fn set_progress(&mut self, id: &str, progress: Progress) -> Result<&Project, StoreError> {
        let i = self.active_index(id)?;
        if self.projects[i].progress == progress {
            return Ok(&self.projects[i]);
        }
        let now = Utc::now();
        let old = self.projects[i].clone();
        let old_label = old.progress.label();

        let project = &mut self.projects[i];
        project.progress = progress;
        project.updated_at = now;
        project.health = health::health(project, now.date_naive());
        let new = project.clone();
        let display = new.name.clone();

        self.snapshot(id, HistoryAction::StatusChange, old, new, now);
        self.log(ActivityEntry::new(
            format!(
                "Changed status from \"{}\" to \"{}\"",
                old_label,
                progress.label()
            ),
            display,
        ));
        self.persist_projects()?;
        self.persist_history()?;
        self.persist_activity()?;
        Ok(&self.projects[i])
    }

    /// Set priority. Setting the current value is a no-op.
    pub fn set_priority(&mut self, id: &str, priority: Priority) -> Result<&Project, StoreError> {
        let i = self.active_index(id)?;
        if self.projects[i].priority == priority {
            return Ok(&self.projects[i]);
        }
        let now = Utc::now();
        let old_label = self.projects[i].priority.label();

        let project = &mut self.projects[i];
        project.priority = priority;
        project.updated_at = now;
        let display = project.name.clone();

        self.log(ActivityEntry::new(
            format!(
                "Changed priority from \"{}\" to \"{}\"",
                old_label,
                priority.label()
            ),
            display,
        ));
        self.persist_projects()?;
        self.persist_activity()?;
        Ok(&self.projects[i])
    }

    /// Set the favorite flag. Returns the new value; setting the current
    /// value is a no-op.
    pub fn set_favorite(&mut self, id: &str, favorite: bool) -> Result<bool, StoreError> {
        let i = self.active_index(id)?;
        if self.projects[i].favorite == favorite {
            return Ok(favorite);
        }
        let project = &mut self.projects[i];
        project.favorite = favorite;
        project.updated_at = Utc::now();
        let display = project.name.clone();

        let label = if favorite {
            "Favorited project"
        } else {
            "Unfavorited project"
        };
        self.log(ActivityEntry::new(label, display));
        self.persist_projects()?;
        self.persist_activity()?;
        Ok(favorite)
    }

    // -----------------------------------------------------------------------
    // Notes, tags, dependencies
    // -----------------------------------------------------------------------

    /// Append a timestamped note
    pub fn add_note(&mut self, id: &str, text: &str) -> Result<(), StoreError> {
        let i = self.active_index(id)?;
        let now = Utc::now();

        let project = &mut self.projects[i];
        project.notes.push(Note {
            text: text.to_string(),
            timestamp: now,
        });
        project.updated_at = now;
        project.health = health::health(project, now.date_naive());
        let display = project.name.clone();

        self.log(ActivityEntry::new("Added note", display));
        self.persist_projects()?;
        self.persist_activity()?;
        Ok(())
    }

    /// Remove the note at `index` (0 = oldest)
    pub fn remove_note(&mut self, id: &str, index: usize) -> Result<(), StoreError> {
        let i = self.active_index(id)?;
        let project = &mut self.projects[i];
        if index >= project.notes.len() {
            return Err(StoreError::NoSuchNote {
                id: id.to_string(),
                index,
            });
        }
        let now = Utc::now();
        project.notes.remove(index);
        project.updated_at = now;
        project.health = health::health(project, now.date_naive());
        self.persist_projects()?;
        Ok(())
    }

    /// Add a tag; already-present and empty tags are no-ops
    pub fn add_tag(&mut self, id: &str, tag: &str) -> Result<(), StoreError> {
        let i = self.active_index(id)?;
        let tag = tag.trim();
        if tag.is_empty() || self.projects[i].tags.iter().any(|t| t == tag) {
            return Ok(());
        }
        let project = &mut self.projects[i];
        project.tags.push(tag.to_string());
        project.updated_at = Utc::now();
        let display = project.name.clone();

        self.log(ActivityEntry::new("Updated project", display));
        self.persist_projects()?;
        self.persist_activity()?;
        Ok(())
    }

    /// Remove a tag; an absent tag is a no-op
    pub fn remove_tag(&mut self, id: &str, tag: &str) -> Result<(), StoreError> {
        let i = self.active_index(id)?;
        if !self.projects[i].tags.iter().any(|t| t == tag) {
            return Ok(());
        }
        let project = &mut self.projects[i];
        project.tags.retain(|t| t != tag);
        project.updated_at = Utc::now();
        let display = project.name.clone();

        self.log(ActivityEntry::new("Updated project", display));
        self.persist_projects()?;
        self.persist_activity()?;
        Ok(())
    }

    /// Add a dependency on another project. The target must exist in either
    /// list; a project cannot depend on itself.
    pub fn add_dependency(&mut self, id: &str, dep_id: &str) -> Result<(), StoreError> {
        let i = self.active_index(id)?;
        if id == dep_id {
            return Err(StoreError::SelfDependency);
        }
        if self.get(dep_id).is_none() {
            return Err(StoreError::UnknownDependency(dep_id.to_string()));
        }
        if self.projects[i].dependencies.iter().any(|d| d == dep_id) {
            return Ok(());
        }
        let project = &mut self.projects[i];
        project.dependencies.push(dep_id.to_string());
        project.updated_at = Utc::now();
        let display = project.name.clone();

        self.log(ActivityEntry::new("Updated project", display));
        self.persist_projects()?;
        self.persist_activity()?;
        Ok(())
    }

    /// Remove a dependency; an absent dependency is a no-op
    pub fn remove_dependency(&mut self, id: &str, dep_id: &str) -> Result<(), StoreError> {
        let i = self.active_index(id)?;
        if !self.projects[i].dependencies.iter().any(|d| d == dep_id) {
            return Ok(());
        }
        let project = &mut self.projects[i];
        project.dependencies.retain(|d| d != dep_id);
        project.updated_at = Utc::now();
        let display = project.name.clone();

        self.log(ActivityEntry::new("Updated project", display));
        self.persist_projects()?;
        self.persist_activity()?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Lifecycle: archive, delete, clone, reorder
    // -----------------------------------------------------------------------

    /// Move an active project to the archived list
    pub fn archive(&mut self, id: &str) -> Result<&Project, StoreError> {
        let i = self.active_index(id)?;
        let mut project = self.projects.remove(i);
        project.archived = true;
        project.updated_at = Utc::now();
        let display = project.name.clone();

        let idx = self.archived.len();
        self.archived.push(project);
        self.log(ActivityEntry::new("Archived project", display));
        self.persist_projects()?;
        self.persist_archive()?;
        self.persist_activity()?;
        Ok(&self.archived[idx])
    }

    /// Move an archived project back to the active list
    pub fn unarchive(&mut self, id: &str) -> Result<&Project, StoreError> {
        let i = self
            .archived
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let mut project = self.archived.remove(i);
        project.archived = false;
        project.updated_at = Utc::now();
        let display = project.name.clone();

        let idx = self.projects.len();
        self.projects.push(project);
        self.log(ActivityEntry::new("Unarchived project", display));
        self.persist_projects()?;
        self.persist_archive()?;
        self.persist_activity()?;
        Ok(&self.projects[idx])
    }

    /// Permanently remove a project from whichever list holds it, dropping
    /// its history. Irreversible.
    pub fn delete(&mut self, id: &str) -> Result<Project, StoreError> {
        let (removed, from_archive) = match self.projects.iter().position(|p| p.id == id) {
            Some(i) => (self.projects.remove(i), false),
            None => match self.archived.iter().position(|p| p.id == id) {
                Some(i) => (self.archived.remove(i), true),
                None => return Err(StoreError::NotFound(id.to_string())),
            },
        };
        let had_history = self.history.shift_remove(id).is_some();

        self.log(ActivityEntry::new("Deleted project", removed.name.clone()));
        if from_archive {
            self.persist_archive()?;
        } else {
            self.persist_projects()?;
        }
        if had_history {
            self.persist_history()?;
        }
        self.persist_activity()?;
        Ok(removed)
    }

    /// Duplicate an active project: new id, name suffixed " (Copy)", fresh
    /// timestamps, favorite cleared, empty history.
    pub fn clone_project(&mut self, id: &str) -> Result<&Project, StoreError> {
        let source = self
            .projects
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let mut cloned = source.clone();
        let original = source.name.clone();

        let now = Utc::now();
        cloned.id = self.new_id();
        cloned.name = format!("{original} (Copy)");
        cloned.created_at = now;
        cloned.updated_at = now;
        cloned.order = self.projects.len() as i64;
        cloned.favorite = false;
        cloned.health = health::health(&cloned, now.date_naive());

        let idx = self.projects.len();
        self.projects.push(cloned);
        self.log(ActivityEntry::new("Cloned project", original));
        self.persist_projects()?;
        self.persist_activity()?;
        Ok(&self.projects[idx])
    }

    /// Reassign `order` to each id's position in the given sequence.
    /// Unknown ids are ignored. Returns how many projects were moved.
    pub fn reorder(&mut self, ids: &[String]) -> Result<usize, StoreError> {
        let now = Utc::now();
        let mut moved = 0usize;
        for (position, id) in ids.iter().enumerate() {
            if let Some(project) = self.projects.iter_mut().find(|p| p.id == *id) {
                project.order = position as i64;
                project.updated_at = now;
                moved += 1;
            }
        }
        self.log(
            ActivityEntry::new("Reordered projects", "Multiple").with_detail("action", "reorder"),
        );
        self.persist_projects()?;
        self.persist_activity()?;
        Ok(moved)
    }

    // -----------------------------------------------------------------------
    // Bulk edit, revert
    // -----------------------------------------------------------------------

    /// Apply a bulk edit to each listed active project. Unknown ids are
    /// skipped. Returns how many projects were edited.
    pub fn bulk_edit(&mut self, ids: &[String], edit: &BulkEdit) -> Result<usize, StoreError> {
        let now = Utc::now();
        let today = now.date_naive();
        let mut edited = 0usize;
        for id in ids {
            let Some(project) = self.projects.iter_mut().find(|p| p.id == *id) else {
                continue;
            };
            if let Some(category) = &edit.category {
                project.category = category.clone();
            }
            if let Some(priority) = edit.priority {
                project.priority = priority;
            }
            for tag in &edit.tags {
                if !project.tags.iter().any(|t| t == tag) {
                    project.tags.push(tag.clone());
                }
            }
            project.updated_at = now;
            project.health = health::health(project, today);
            edited += 1;
        }

        self.log(
            ActivityEntry::new(format!("Bulk edited {edited} projects"), "Multiple")
                .with_detail("count", edited as i64),
        );
        self.persist_projects()?;
        self.persist_activity()?;
        Ok(edited)
    }

    /// Restore a project to the pre-mutation state captured in its history
    /// entry at `index` (0 = most recent). The revert itself is recorded as
    /// a history entry, so reverts are revertible.
    pub fn revert(&mut self, id: &str, index: usize) -> Result<&Project, StoreError> {
        let i = self.active_index(id)?;
        let version = self
            .history
            .get(id)
            .and_then(|entries| entries.get(index))
            .cloned()
            .ok_or_else(|| StoreError::NoSuchVersion {
                id: id.to_string(),
                index,
            })?;

        let now = Utc::now();
        let old = self.projects[i].clone();

        let project = &mut self.projects[i];
        *project = version.old_data;
        project.updated_at = now;
        project.health = health::health(project, now.date_naive());
        let new = project.clone();
        let display = new.name.clone();

        self.snapshot(id, HistoryAction::Revert, old, new, now);
        self.log(ActivityEntry::new(
            "Reverted project to previous version",
            display,
        ));
        self.persist_projects()?;
        self.persist_history()?;
        self.persist_activity()?;
        Ok(&self.projects[i])
    }

    // -----------------------------------------------------------------------
    // Import, restore, link validation
    // -----------------------------------------------------------------------

    /// Best-effort import: every record is migrated independently; failures
    /// are counted, successes get fresh id and timestamps and land on the
    /// active list.
    pub fn import(&mut self, raws: Vec<RawProject>) -> Result<ImportResult, StoreError> {
        let now = Utc::now();
        let today = now.date_naive();
        let mut result = ImportResult {
            imported: 0,
            skipped: 0,
            errors: Vec::new(),
        };

        for (i, raw) in raws.into_iter().enumerate() {
            let fallback_order = self.projects.len() as i64;
            match migrate::migrate(raw, fallback_order, now) {
                Ok(mut project) => {
                    project.id = self.new_id();
                    project.created_at = now;
                    project.updated_at = now;
                    // Imports always land on the active list
                    project.archived = false;
                    project.health = health::health(&project, today);
                    self.projects.push(project);
                    result.imported += 1;
                }
                Err(e) => {
                    result.skipped += 1;
                    result.errors.push(format!("record {}: {}", i + 1, e));
                }
            }
        }

        self.log(
            ActivityEntry::new(format!("Imported {} projects", result.imported), "Import")
                .with_detail("count", result.imported as i64),
        );
        self.persist_projects()?;
        self.persist_activity()?;
        Ok(result)
    }

    /// Wholesale replace the board from a decoded backup document. Any
    /// record that fails migration aborts the restore with state untouched.
    pub fn restore(&mut self, doc: BackupDoc) -> Result<(), StoreError> {
        let now = Utc::now();
        let today = now.date_naive();

        let mut active = Vec::with_capacity(doc.projects.len());
        for (i, raw) in doc.projects.into_iter().enumerate() {
            let project =
                migrate::migrate(raw, i as i64, now).map_err(|e| StoreError::BadBackupRecord {
                    list: "project",
                    index: i,
                    source: e,
                })?;
            active.push(project);
        }
        let mut archived = Vec::with_capacity(doc.archived_projects.len());
        for (i, raw) in doc.archived_projects.into_iter().enumerate() {
            let project =
                migrate::migrate(raw, i as i64, now).map_err(|e| StoreError::BadBackupRecord {
                    list: "archived",
                    index: i,
                    source: e,
                })?;
            archived.push(project);
        }

        for project in active.iter_mut().chain(archived.iter_mut()) {
            project.health = health::health(project, today);
        }

        self.projects = active;
        self.archived = archived;
        self.activity = doc.activity_log;
        self.activity.truncate(ACTIVITY_CAP);
        self.history = doc.project_history;
        for entries in self.history.values_mut() {
            entries.truncate(HISTORY_CAP);
        }

        self.persist_projects()?;
        self.persist_archive()?;
        self.persist_activity()?;
        self.persist_history()?;
        Ok(())
    }

    /// Probe every active project with a non-empty link, one at a time,
    /// and persist the updated statuses once at the end.
    pub fn validate_links(
        &mut self,
        timeout: Duration,
        offline: bool,
    ) -> Result<Vec<LinkOutcome>, StoreError> {
        let now = Utc::now();
        let today = now.date_naive();
        let mut outcomes = Vec::new();
        for project in &mut self.projects {
            if project.link.is_empty() {
                continue;
            }
            let status = links::check_link(&project.link, timeout, offline);
            project.link_status = status;
            project.updated_at = now;
            project.health = health::health(project, today);
            outcomes.push(LinkOutcome {
                id: project.id.clone(),
                name: project.name.clone(),
                link: project.link.clone(),
                status,
            });
        }
        if !outcomes.is_empty() {
            self.persist_projects()?;
        }
        Ok(outcomes)
    }

    // -----------------------------------------------------------------------
    // Presets
    // -----------------------------------------------------------------------

    /// Save a preset, replacing any existing preset with the same name
    pub fn save_preset(&mut self, preset: FilterPreset) -> Result<(), StoreError> {
        match self.presets.iter_mut().find(|p| p.name == preset.name) {
            Some(existing) => *existing = preset,
            None => self.presets.push(preset),
        }
        self.persist_presets()
    }

    /// Delete a preset by name
    pub fn delete_preset(&mut self, name: &str) -> Result<(), StoreError> {
        let before = self.presets.len();
        self.presets.retain(|p| p.name != name);
        if self.presets.len() == before {
            return Err(StoreError::PresetNotFound(name.to_string()));
        }
        self.persist_presets()
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn active_index(&self, id: &str) -> Result<usize, StoreError> {
        self.projects
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Millisecond-epoch token, bumped until unique across both lists
    fn new_id(&self) -> String {
        let mut millis = Utc::now().timestamp_millis();
        loop {
            let id = millis.to_string();
            if self.get(&id).is_none() {
                return id;
            }
            millis += 1;
        }
    }

    fn log(&mut self, entry: ActivityEntry) {
        activity::record(&mut self.activity, entry);
    }

    fn snapshot(
        &mut self,
        id: &str,
        action: HistoryAction,
        old: Project,
        new: Project,
        now: DateTime<Utc>,
    ) {
        let entries = self.history.entry(id.to_string()).or_default();
        history::record(
            entries,
            HistoryEntry {
                action,
                old_data: old,
                new_data: new,
                timestamp: now,
            },
        );
    }

    fn persist_projects(&self) -> Result<(), StoreError> {
        board_io::save_projects(&self.dir, &self.projects)?;
        Ok(())
    }

    fn persist_archive(&self) -> Result<(), StoreError> {
        board_io::save_archive(&self.dir, &self.archived)?;
        Ok(())
    }

    fn persist_activity(&self) -> Result<(), StoreError> {
        board_io::save_activity(&self.dir, &self.activity)?;
        Ok(())
    }

    fn persist_history(&self) -> Result<(), StoreError> {
        board_io::save_history(&self.dir, &self.history)?;
        Ok(())
    }

    fn persist_presets(&self) -> Result<(), StoreError> {
        board_io::save_presets(&self.dir, &self.presets)?;
        Ok(())
    }
}
