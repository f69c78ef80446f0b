use serde::Serialize;

use super::project::Priority;

/// A starter preset: pre-filled fields for a common kind of project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Template {
    pub slug: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub priority: Priority,
    pub tags: &'static [&'static str],
}

pub static TEMPLATES: [Template; 3] = [
    Template {
        slug: "web-app",
        name: "Web App",
        category: "Web App",
        priority: Priority::High,
        tags: &["web", "app"],
    },
    Template {
        slug: "chrome-extension",
        name: "Chrome Extension",
        category: "Extension",
        priority: Priority::Medium,
        tags: &["extension", "chrome"],
    },
    Template {
        slug: "tool",
        name: "Tool",
        category: "Tool",
        priority: Priority::Medium,
        tags: &["tool", "utility"],
    },
];

/// Look up a template by its slug
pub fn find(slug: &str) -> Option<&'static Template> {
    TEMPLATES.iter().find(|t| t.slug == slug)
}
