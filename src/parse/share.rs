use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::project::{Progress, Project};

/// Error decoding a share token
#[derive(Debug, thiserror::Error)]
pub enum ShareError {
    #[error("share token is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("share payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// The read-only subset of a project carried in a share token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedProject {
    pub name: String,
    #[serde(default)]
    pub progress: Progress,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub link: String,
}

/// Share payload: a trimmed project list plus the moment it was captured
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharePayload {
    pub projects: Vec<SharedProject>,
    pub timestamp: DateTime<Utc>,
}

/// Encode a view of projects as a standalone base64 token
pub fn encode_share(projects: &[&Project], now: DateTime<Utc>) -> Result<String, ShareError> {
    let payload = SharePayload {
        projects: projects
            .iter()
            .map(|p| SharedProject {
                name: p.name.clone(),
                progress: p.progress,
                category: p.category.clone(),
                description: p.description.clone(),
                link: p.link.clone(),
            })
            .collect(),
        timestamp: now,
    };
    Ok(STANDARD.encode(serde_json::to_string(&payload)?))
}

/// Decode a share token back into its payload. Never touches board state.
pub fn decode_share(token: &str) -> Result<SharePayload, ShareError> {
    let bytes = STANDARD.decode(token.trim())?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::project::{Health, LinkStatus, Priority};

    fn project(name: &str) -> Project {
        let now = "2025-01-15T10:00:00Z".parse().unwrap();
        Project {
            id: "1".into(),
            name: name.into(),
            link: "https://example.dev".into(),
            progress: Progress::Blocked,
            category: "Tool".into(),
            description: "desc".into(),
            priority: Priority::Medium,
            due_date: None,
            tags: vec!["secret-tag".into()],
            icon: String::new(),
            color: String::new(),
            favorite: true,
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
    fn round_trips_the_shared_subset() {
        let p = project("Shared");
        let token = encode_share(&[&p], Utc::now()).unwrap();
        let payload = decode_share(&token).unwrap();

        assert_eq!(payload.projects.len(), 1);
        let shared = &payload.projects[0];
        assert_eq!(shared.name, "Shared");
        assert_eq!(shared.progress, Progress::Blocked);
        assert_eq!(shared.category, "Tool");
        assert_eq!(shared.link, "https://example.dev");
    }

    #[test]
    fn decodes_a_browser_generated_token() {
        // btoa(JSON.stringify(...)) output with millisecond timestamps
        let token = "eyJwcm9qZWN0cyI6W3sibmFtZSI6IkFscGhhIiwicHJvZ3Jlc3MiOiJpbiBwcm9ncmVzcyIsImNhdGVnb3J5IjoiV2ViIEFwcCIsImRlc2NyaXB0aW9uIjoiZmlyc3QiLCJsaW5rIjoiaHR0cHM6Ly9hbHBoYS5kZXYifV0sInRpbWVzdGFtcCI6IjIwMjUtMDEtMTVUMTA6MDA6MDAuMDAwWiJ9";
        let payload = decode_share(token).unwrap();
        assert_eq!(payload.projects[0].name, "Alpha");
        assert_eq!(payload.projects[0].progress, Progress::InProgress);
    }

    #[test]
    fn rejects_garbage_tokens() {
        assert!(matches!(
            decode_share("!!! not base64 !!!"),
            Err(ShareError::Base64(_))
        ));
        // Valid base64, invalid JSON inside
        assert!(matches!(
            decode_share("bm90IGpzb24gYXQgYWxs"),
            Err(ShareError::Json(_))
        ));
    }

    #[test]
    fn surrounding_whitespace_is_tolerated() {
        let p = project("P");
        let token = encode_share(&[&p], Utc::now()).unwrap();
        let padded = format!("  {token}\n");
        assert!(decode_share(&padded).is_ok());
    }
}
