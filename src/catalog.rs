use figment::providers::{Format, Toml};
use figment::Figment;
use schemars::JsonSchema;
use serde::Deserialize;
use std::path::Path;

use crate::AppResult;

pub const DEFAULT_EMOJI: &str = "🧰";
pub const PLACEHOLDER_LINK: &str = "#";

/// One entry of the gallery. Tag order is the display order.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, JsonSchema)]
pub struct ProjectRecord {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub emoji: Option<String>,
    #[serde(default)]
    pub links: Option<ProjectLinks>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, JsonSchema)]
pub struct ProjectLinks {
    #[serde(default)]
    pub demo: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

impl ProjectRecord {
    pub fn emoji_or_default(&self) -> &str {
        match self.emoji.as_deref() {
            Some(value) if !value.trim().is_empty() => value,
            _ => DEFAULT_EMOJI,
        }
    }
}

#[derive(Default, Deserialize, JsonSchema)]
pub struct CatalogFile {
    #[serde(default)]
    pub projects: Vec<ProjectRecord>,
}

fn project(title: &str, description: &str, tags: &[&str], emoji: &str) -> ProjectRecord {
    ProjectRecord {
        title: title.to_string(),
        description: description.to_string(),
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
        emoji: Some(emoji.to_string()),
        links: Some(ProjectLinks {
            demo: Some(PLACEHOLDER_LINK.to_string()),
            source: Some(PLACEHOLDER_LINK.to_string()),
        }),
    }
}

pub fn builtin_catalog() -> Vec<ProjectRecord> {
    vec![
        project(
            "Realtime Chat App",
            "WebSocket chat with rooms, presence, and optimistic UI.",
            &["TypeScript", "WebSocket", "Node.js"],
            "💬",
        ),
        project(
            "Image Classifier",
            "CNN-based classifier with transfer learning and Grad-CAM.",
            &["Python", "PyTorch", "ML"],
            "🧠",
        ),
        project(
            "Docs Generator",
            "Static site generator that converts Markdown to a docs site.",
            &["JavaScript", "Markdown", "Static"],
            "📚",
        ),
        project(
            "Task Manager API",
            "REST API with JWT auth, pagination, and OpenAPI docs.",
            &["Go", "PostgreSQL", "API"],
            "🧩",
        ),
    ]
}

pub fn load_catalog(path: Option<&Path>) -> AppResult<Vec<ProjectRecord>> {
    let Some(path) = path else {
        return Ok(builtin_catalog());
    };
    if !path.is_file() {
        return Err(format!("Catalog file not found: {}", path.display()).into());
    }
    let file: CatalogFile = Figment::from(Toml::file(path))
        .extract()
        .map_err(|err| format!("Failed to parse catalog {}: {}", path.display(), err))?;
    tracing::info!(
        path = %path.display(),
        projects = file.projects.len(),
        "loaded catalog"
    );
    Ok(file.projects)
}

pub fn catalog_schema() -> AppResult<String> {
    let schema = schemars::schema_for!(CatalogFile);
    Ok(serde_json::to_string_pretty(&schema)?)
}
