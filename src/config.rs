use figment::providers::{Format, Toml};
use figment::Figment;
use serde::Deserialize;
use std::collections::HashSet;
use std::env;
use std::path::{Path, PathBuf};

use crate::AppResult;

const DEFAULT_LOG_FILTER: &str = "folio=info";

#[derive(Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    site: Option<SiteSection>,
    #[serde(default)]
    catalog: Option<PathSection>,
    #[serde(default)]
    preferences: Option<PathSection>,
    #[serde(default)]
    theme: Option<ThemeSection>,
    #[serde(default)]
    logging: Option<LoggingSection>,
}

#[derive(Default, Deserialize)]
struct SiteSection {
    #[serde(default)]
    owner: Option<String>,
    #[serde(default)]
    about: Option<String>,
    #[serde(default)]
    contact: Option<Vec<String>>,
}

#[derive(Default, Deserialize)]
struct PathSection {
    #[serde(default)]
    path: Option<String>,
}

#[derive(Default, Deserialize)]
struct ThemeSection {
    #[serde(default)]
    prefers_dark: Option<bool>,
}

#[derive(Default, Deserialize)]
struct LoggingSection {
    #[serde(default)]
    file: Option<String>,
    #[serde(default)]
    filter: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SiteInfo {
    pub owner: String,
    pub about: String,
    pub contact: Vec<String>,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            owner: "Portfolio".to_string(),
            about: "Projects, experiments, and things I have shipped.".to_string(),
            contact: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LoadedConfig {
    pub site: SiteInfo,
    pub catalog_path: Option<PathBuf>,
    pub preferences_path: PathBuf,
    pub prefers_dark: bool,
    pub log_file: PathBuf,
    pub log_filter: String,
}

impl LoadedConfig {
    fn defaults(home: &Path) -> Self {
        Self {
            site: SiteInfo::default(),
            catalog_path: None,
            preferences_path: state_dir(home).join("folio/preferences.json"),
            prefers_dark: false,
            log_file: env::temp_dir().join("folio.log"),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }

    fn merge(&mut self, file: ConfigFile, base_dir: &Path, home: &Path) {
        if let Some(site) = file.site {
            if let Some(owner) = site.owner {
                self.site.owner = owner;
            }
            if let Some(about) = site.about {
                self.site.about = about;
            }
            if let Some(contact) = site.contact {
                self.site.contact = contact;
            }
        }
        if let Some(path) = file
            .catalog
            .and_then(|section| section.path)
            .and_then(|raw| expand_path(&raw, base_dir, home))
        {
            self.catalog_path = Some(path);
        }
        if let Some(path) = file
            .preferences
            .and_then(|section| section.path)
            .and_then(|raw| expand_path(&raw, base_dir, home))
        {
            self.preferences_path = path;
        }
        if let Some(prefers_dark) = file.theme.and_then(|section| section.prefers_dark) {
            self.prefers_dark = prefers_dark;
        }
        if let Some(logging) = file.logging {
            if let Some(path) = logging
                .file
                .and_then(|raw| expand_path(&raw, base_dir, home))
            {
                self.log_file = path;
            }
            if let Some(filter) = logging.filter.filter(|value| !value.trim().is_empty()) {
                self.log_filter = filter;
            }
        }
    }
}

fn home_dir() -> AppResult<PathBuf> {
    let value = env::var("HOME").map_err(|_| "HOME is not set")?;
    Ok(PathBuf::from(value))
}

fn state_dir(home: &Path) -> PathBuf {
    env::var("XDG_STATE_HOME")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| home.join(".local/state"))
}

pub fn load_config() -> AppResult<LoadedConfig> {
    let home = home_dir()?;
    load_config_from(&config_paths(&home), &home)
}

fn load_config_from(paths: &[PathBuf], home: &Path) -> AppResult<LoadedConfig> {
    let mut config = LoadedConfig::defaults(home);
    for path in paths {
        if !path.is_file() {
            continue;
        }
        let base_dir = path.parent().unwrap_or(home);
        let file: ConfigFile = Figment::from(Toml::file(path))
            .extract()
            .map_err(|err| format!("Failed to parse config {}: {}", path.display(), err))?;
        config.merge(file, base_dir, home);
    }
    Ok(config)
}

/// Candidate config files, lowest precedence first.
fn config_paths(home: &Path) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    paths.push(PathBuf::from("/etc/folio/config.toml"));
    let xdg = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home.join(".config"));
    paths.push(xdg.join("folio/config.toml"));
    paths.push(home.join(".config/folio/config.toml"));
    paths.push(home.join(".folio.toml"));
    if let Ok(cwd) = env::current_dir() {
        paths.push(cwd.join(".folio.toml"));
    }
    if let Ok(path) = env::var("FOLIO_CONFIG") {
        if !path.trim().is_empty() {
            paths.push(PathBuf::from(path));
        }
    }

    dedup_keep_last(paths)
}

/// Drops repeated paths, keeping each at its highest-precedence slot.
fn dedup_keep_last(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    let mut unique: Vec<PathBuf> = paths
        .into_iter()
        .rev()
        .filter(|path| seen.insert(path.to_string_lossy().to_string()))
        .collect();
    unique.reverse();
    unique
}

fn expand_path(raw: &str, base_dir: &Path, home: &Path) -> Option<PathBuf> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let mut value = trimmed.to_string();
    if value.starts_with("~/") {
        value = value.replacen("~", &home.to_string_lossy(), 1);
    }
    if value.contains("$HOME") {
        value = value.replace("$HOME", &home.to_string_lossy());
    }
    let mut path = PathBuf::from(value);
    if path.is_relative() {
        path = base_dir.join(path);
    }
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn missing_files_yield_defaults() {
        let home = tempfile::tempdir().unwrap();
        let config = load_config_from(&[home.path().join("nope.toml")], home.path()).unwrap();
        assert_eq!(config.site, SiteInfo::default());
        assert_eq!(config.catalog_path, None);
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
        assert!(config.preferences_path.ends_with("folio/preferences.json"));
    }

    #[test]
    fn later_files_override_and_paths_resolve() {
        let home = tempfile::tempdir().unwrap();
        let global = home.path().join("global.toml");
        let local_dir = home.path().join("work");
        fs::create_dir_all(&local_dir).unwrap();
        let local = local_dir.join(".folio.toml");
        fs::write(
            &global,
            r#"
[site]
owner = "Global Owner"
about = "Global about"

[catalog]
path = "~/projects.toml"

[theme]
prefers_dark = true
"#,
        )
        .unwrap();
        fs::write(
            &local,
            r#"
[site]
owner = "Local Owner"
contact = ["me@example.com"]

[preferences]
path = "state/prefs.json"

[logging]
filter = "folio=debug"
"#,
        )
        .unwrap();

        let config = load_config_from(&[global, local], home.path()).unwrap();
        assert_eq!(config.site.owner, "Local Owner");
        assert_eq!(config.site.about, "Global about");
        assert_eq!(config.site.contact, vec!["me@example.com"]);
        assert_eq!(config.catalog_path, Some(home.path().join("projects.toml")));
        assert_eq!(config.preferences_path, local_dir.join("state/prefs.json"));
        assert!(config.prefers_dark);
        assert_eq!(config.log_filter, "folio=debug");
    }

    #[test]
    fn repeated_override_path_keeps_top_precedence() {
        let home = tempfile::tempdir().unwrap();
        let home_file = home.path().join(".folio.toml");
        let cwd_file = home.path().join("cwd/.folio.toml");
        fs::create_dir_all(cwd_file.parent().unwrap()).unwrap();
        fs::write(&home_file, "[site]\nowner = \"from override\"\n").unwrap();
        fs::write(&cwd_file, "[site]\nowner = \"from cwd\"\n").unwrap();

        let paths = dedup_keep_last(vec![
            home_file.clone(),
            cwd_file.clone(),
            home_file.clone(),
        ]);
        assert_eq!(paths, vec![cwd_file, home_file]);

        let config = load_config_from(&paths, home.path()).unwrap();
        assert_eq!(config.site.owner, "from override");
    }

    #[test]
    fn malformed_config_names_the_file() {
        let home = tempfile::tempdir().unwrap();
        let path = home.path().join("bad.toml");
        fs::write(&path, "[site\nowner = ").unwrap();
        let err = load_config_from(&[path], home.path()).unwrap_err().to_string();
        assert!(err.contains("bad.toml"), "{err}");
    }

    #[test]
    fn expand_path_handles_home_and_blank() {
        let home = Path::new("/home/someone");
        let base = Path::new("/etc/folio");
        assert_eq!(
            expand_path("$HOME/x.json", base, home),
            Some(PathBuf::from("/home/someone/x.json"))
        );
        assert_eq!(
            expand_path("rel.toml", base, home),
            Some(PathBuf::from("/etc/folio/rel.toml"))
        );
        assert_eq!(expand_path("  ", base, home), None);
    }
}
