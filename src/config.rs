use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

const APP_DIR: &str = "workspace-launcher";
const FILE_NAMES: &[&str] = &["config.yaml", "config.yml", "config.toml"];

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub name: Option<String>,
    #[serde(default)]
    pub urls: Vec<UrlEntry>,
    #[serde(default)]
    pub apps: Vec<AppEntry>,
    #[serde(default)]
    pub shell_cmds: Vec<ShellCmdEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UrlEntry {
    pub url: String,
    pub browser: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppEntry {
    // `args` is the target being opened; `app` only selects the handler.
    pub app: Option<String>,
    pub args: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShellCmdEntry {
    pub cmd: Vec<String>,
}

impl UrlEntry {
    /// Browser to open with, treating an empty string like an absent one.
    pub fn browser(&self) -> Option<&str> {
        self.browser.as_deref().filter(|b| !b.is_empty())
    }
}

impl AppEntry {
    /// Handler to open with, treating an empty string like an absent one.
    pub fn handler(&self) -> Option<&str> {
        self.app.as_deref().filter(|a| !a.is_empty())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no config file found (searched {})", format_candidates(.searched))]
    NotFound { searched: Vec<PathBuf> },

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unrecognized config format: {} (expected .yaml, .yml or .toml)", .path.display())]
    UnrecognizedFormat { path: PathBuf },

    #[error("invalid config: {reason}")]
    Invalid { reason: String },
}

fn format_candidates(searched: &[PathBuf]) -> String {
    searched
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Loads the configuration, either from an explicit path or from the
/// first config file found on the search path.
pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };
    let config = load_file(&path)?;
    config.validate()?;
    tracing::info!(path = %path.display(), "using config file");
    Ok(config)
}

fn search_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![PathBuf::from("/etc").join(APP_DIR)];
    if let Ok(home) = env::var("HOME") {
        dirs.push(PathBuf::from(home).join(format!(".{APP_DIR}")));
    }
    dirs.push(PathBuf::from("."));
    dirs
}

fn find_config_file() -> Result<PathBuf, ConfigError> {
    let mut searched = Vec::new();
    for dir in search_dirs() {
        for name in FILE_NAMES {
            let candidate = dir.join(name);
            if candidate.is_file() {
                return Ok(candidate);
            }
            searched.push(candidate);
        }
    }
    Err(ConfigError::NotFound { searched })
}

fn load_file(path: &Path) -> Result<Config, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => {
            serde_yaml::from_str(&contents).map_err(|source| ConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            })
        }
        Some("toml") => toml::from_str(&contents).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        }),
        _ => Err(ConfigError::UnrecognizedFormat {
            path: path.to_path_buf(),
        }),
    }
}

impl Config {
    // Shape is already enforced by serde; this catches values serde can't,
    // like required strings that are present but empty.
    fn validate(&self) -> Result<(), ConfigError> {
        for (i, entry) in self.urls.iter().enumerate() {
            if entry.url.is_empty() {
                return Err(ConfigError::Invalid {
                    reason: format!("urls[{i}]: url must not be empty"),
                });
            }
        }
        for (i, entry) in self.apps.iter().enumerate() {
            if entry.args.is_empty() {
                return Err(ConfigError::Invalid {
                    reason: format!("apps[{i}]: args must not be empty"),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    const FULL_YAML: &str = r#"
name: side-project
urls:
  - url: https://example.com
    browser: firefox
  - url: https://docs.rs
apps:
  - app: code
    args: ~/src/project
  - args: notes.md
shell_cmds:
  - cmd: [git, fetch]
"#;

    #[test]
    fn yaml_document_parses() {
        let config: Config = serde_yaml::from_str(FULL_YAML).unwrap();
        assert_eq!(config.name.as_deref(), Some("side-project"));
        assert_eq!(config.urls.len(), 2);
        assert_eq!(config.urls[0].url, "https://example.com");
        assert_eq!(config.urls[0].browser(), Some("firefox"));
        assert_eq!(config.urls[1].browser(), None);
        assert_eq!(config.apps[0].handler(), Some("code"));
        assert_eq!(config.apps[1].handler(), None);
        assert_eq!(config.shell_cmds[0].cmd, vec!["git", "fetch"]);
    }

    #[test]
    fn entry_order_is_preserved() {
        let doc = r#"
urls:
  - url: first
  - url: second
  - url: third
"#;
        let config: Config = serde_yaml::from_str(doc).unwrap();
        let urls: Vec<_> = config.urls.iter().map(|e| e.url.as_str()).collect();
        assert_eq!(urls, ["first", "second", "third"]);
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let config: Config = serde_yaml::from_str("name: bare").unwrap();
        assert!(config.urls.is_empty());
        assert!(config.apps.is_empty());
        assert!(config.shell_cmds.is_empty());
    }

    #[test]
    fn unknown_top_level_key_is_rejected() {
        let doc = "name: x\nextra: 1\n";
        assert!(serde_yaml::from_str::<Config>(doc).is_err());
    }

    #[test]
    fn unknown_nested_key_is_rejected() {
        let doc = r#"
urls:
  - url: https://example.com
    profile: work
"#;
        assert!(serde_yaml::from_str::<Config>(doc).is_err());
    }

    #[test]
    fn empty_browser_counts_as_default() {
        let doc = "urls:\n  - url: https://example.com\n    browser: \"\"\n";
        let config: Config = serde_yaml::from_str(doc).unwrap();
        assert_eq!(config.urls[0].browser(), None);
    }

    #[test]
    fn toml_document_parses() {
        let doc = r#"
name = "side-project"

[[urls]]
url = "https://example.com"
browser = "firefox"

[[shell_cmds]]
cmd = ["git", "fetch"]
"#;
        let config: Config = toml::from_str(doc).unwrap();
        assert_eq!(config.urls[0].browser(), Some("firefox"));
        assert_eq!(config.shell_cmds[0].cmd, vec!["git", "fetch"]);
    }

    fn write_config(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn load_honors_yaml_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "config.yaml", FULL_YAML);
        let config = load(Some(&path)).unwrap();
        assert_eq!(config.urls.len(), 2);
    }

    #[test]
    fn load_honors_toml_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "config.toml", "[[urls]]\nurl = \"https://example.com\"\n");
        let config = load(Some(&path)).unwrap();
        assert_eq!(config.urls[0].url, "https://example.com");
    }

    #[test]
    fn load_rejects_unrecognized_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "config.ini", "name=x");
        assert!(matches!(
            load(Some(&path)),
            Err(ConfigError::UnrecognizedFormat { .. })
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        assert!(matches!(load(Some(&path)), Err(ConfigError::Read { .. })));
    }

    #[test]
    fn load_rejects_empty_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "config.yaml", "urls:\n  - url: \"\"\n");
        assert!(matches!(load(Some(&path)), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn load_rejects_empty_app_args() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "config.yaml", "apps:\n  - args: \"\"\n");
        assert!(matches!(load(Some(&path)), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn search_path_prefers_system_then_home_then_cwd() {
        let dirs = search_dirs();
        assert_eq!(dirs.first().unwrap(), &PathBuf::from("/etc/workspace-launcher"));
        assert_eq!(dirs.last().unwrap(), &PathBuf::from("."));
    }
}
