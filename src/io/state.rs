use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Cosmetic preference values the board accepts
pub const THEMES: [&str; 4] = ["default", "ocean", "sunset", "forest"];
pub const VIEW_MODES: [&str; 2] = ["table", "cards"];

/// Search terms remembered, most recent first
pub const SEARCH_HISTORY_CAP: usize = 10;

/// Persisted UI preferences and search history (written to state.json).
/// Missing or malformed state degrades to defaults; this file is never
/// load-bearing for project data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiState {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub dark_mode: bool,
    #[serde(default = "default_view_mode")]
    pub view_mode: String,
    /// Most recent first, deduplicated, capped
    #[serde(default)]
    pub search_history: Vec<String>,
}

impl Default for UiState {
    fn default() -> Self {
        UiState {
            theme: default_theme(),
            dark_mode: false,
            view_mode: default_view_mode(),
            search_history: Vec::new(),
        }
    }
}

fn default_theme() -> String {
    "default".to_string()
}

fn default_view_mode() -> String {
    "table".to_string()
}

/// Remember a search term: most recent first, no duplicates, capped.
/// A term already in the history keeps its position.
pub fn record_search(state: &mut UiState, term: &str) {
    if term.is_empty() {
        return;
    }
    if !state.search_history.iter().any(|t| t == term) {
        state.search_history.insert(0, term.to_string());
        state.search_history.truncate(SEARCH_HISTORY_CAP);
    }
}

/// Read state.json from the board directory
pub fn read_ui_state(board_dir: &Path) -> Option<UiState> {
    let path = board_dir.join("state.json");
    let content = fs::read_to_string(&path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write state.json to the board directory
pub fn write_ui_state(board_dir: &Path, state: &UiState) -> Result<(), std::io::Error> {
    let path = board_dir.join("state.json");
    let content = serde_json::to_string_pretty(state)?;
    fs::write(&path, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_and_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let state = UiState {
            theme: "ocean".into(),
            dark_mode: true,
            view_mode: "cards".into(),
            search_history: vec!["foo".into(), "bar".into()],
        };

        write_ui_state(dir.path(), &state).unwrap();
        let loaded = read_ui_state(dir.path()).unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn read_missing_file_returns_none() {
        let dir = TempDir::new().unwrap();
        assert!(read_ui_state(dir.path()).is_none());
    }

    #[test]
    fn read_malformed_json_returns_none() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("state.json"), "not json {{{").unwrap();
        assert!(read_ui_state(dir.path()).is_none());
    }

    #[test]
    fn serde_defaults_on_empty_object() {
        let state: UiState = serde_json::from_str("{}").unwrap();
        assert_eq!(state.theme, "default");
        assert!(!state.dark_mode);
        assert_eq!(state.view_mode, "table");
        assert!(state.search_history.is_empty());
    }

    #[test]
    fn record_search_dedups_and_caps() {
        let mut state = UiState::default();
        record_search(&mut state, "alpha");
        record_search(&mut state, "beta");
        record_search(&mut state, "alpha");
        // Existing term keeps its position
        assert_eq!(state.search_history, vec!["beta", "alpha"]);

        for i in 0..12 {
            record_search(&mut state, &format!("term{i}"));
        }
        assert_eq!(state.search_history.len(), SEARCH_HISTORY_CAP);
        assert_eq!(state.search_history[0], "term11");
    }

    #[test]
    fn record_search_ignores_empty() {
        let mut state = UiState::default();
        record_search(&mut state, "");
        assert!(state.search_history.is_empty());
    }
}
