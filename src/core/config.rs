use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::error::{BuilderError, BuilderResult};
use crate::core::http::APP_USER_AGENT;

const APP_DIR_NAME: &str = "mcserver-fetch";
const SETTINGS_FILE: &str = "settings.json";

pub const DEFAULT_MANIFEST_URL: &str =
    "https://launchermeta.mojang.com/mc/game/version_manifest.json";
pub const DEFAULT_PAPER_API_BASE: &str = "https://papermc.io/api/v1";

/// Predefined server directory inside the container image.
pub const CONTAINER_SERVER_DIR: &str = "/mc";

pub const ENV_MANIFEST_URL: &str = "MCSERVER_MANIFEST_URL";
pub const ENV_PAPER_API: &str = "MCSERVER_PAPER_API";
pub const ENV_MINECRAFT_ROOT: &str = "MINECRAFT_ROOT";

/// Remote endpoints and client knobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FetcherSettings {
    pub manifest_url: String,
    pub paper_api_base: String,
    pub user_agent: String,
    /// No timeout when absent: a hung endpoint blocks the build.
    pub request_timeout_secs: Option<u64>,
}

impl Default for FetcherSettings {
    fn default() -> Self {
        Self {
            manifest_url: DEFAULT_MANIFEST_URL.to_string(),
            paper_api_base: DEFAULT_PAPER_API_BASE.to_string(),
            user_agent: APP_USER_AGENT.to_string(),
            request_timeout_secs: None,
        }
    }
}

impl FetcherSettings {
    /// Defaults, then the settings file, then environment overrides.
    ///
    /// An explicit `path` must exist; the default location is optional.
    pub fn load(path: Option<&Path>) -> BuilderResult<Self> {
        let mut settings = match path {
            Some(p) => read_settings_file(p)?,
            None => match default_settings_path() {
                Some(p) if p.is_file() => read_settings_file(&p)?,
                _ => Self::default(),
            },
        };
        settings.apply_overrides(|key| std::env::var(key).ok());
        settings.validate()?;
        Ok(settings)
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_MANIFEST_URL) {
            self.manifest_url = url;
        }
        if let Some(base) = lookup(ENV_PAPER_API) {
            self.paper_api_base = base;
        }
    }

    fn validate(&self) -> BuilderResult<()> {
        for (name, value) in [
            ("manifest_url", &self.manifest_url),
            ("paper_api_base", &self.paper_api_base),
        ] {
            if !(value.starts_with("http://") || value.starts_with("https://")) {
                return Err(BuilderError::InvalidConfig(format!(
                    "{name} must be an http(s) URL, got {value:?}"
                )));
            }
        }
        Ok(())
    }
}

fn read_settings_file(path: &Path) -> BuilderResult<FetcherSettings> {
    debug!("Loading settings from {:?}", path);
    let raw = std::fs::read_to_string(path).map_err(|e| BuilderError::io(path, e))?;
    Ok(serde_json::from_str(&raw)?)
}

fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join(APP_DIR_NAME).join(SETTINGS_FILE))
}

/// Locate the server directory: explicit flag, `MINECRAFT_ROOT`, then `/mc`.
pub fn find_server_dir(explicit: Option<PathBuf>) -> PathBuf {
    resolve_server_dir(explicit, std::env::var_os(ENV_MINECRAFT_ROOT).map(PathBuf::from))
}

fn resolve_server_dir(explicit: Option<PathBuf>, from_env: Option<PathBuf>) -> PathBuf {
    explicit
        .or(from_env)
        .unwrap_or_else(|| PathBuf::from(CONTAINER_SERVER_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_settings_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "paper_api_base": "http://127.0.0.1:9000/api/v1" }"#)
            .unwrap();

        let settings = read_settings_file(&path).unwrap();
        assert_eq!(settings.paper_api_base, "http://127.0.0.1:9000/api/v1");
        assert_eq!(settings.manifest_url, DEFAULT_MANIFEST_URL);
        assert_eq!(settings.request_timeout_secs, None);
    }

    #[test]
    fn malformed_settings_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            read_settings_file(&path),
            Err(BuilderError::Json(_))
        ));
    }

    #[test]
    fn missing_explicit_settings_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        let err = FetcherSettings::load(Some(missing.as_path())).unwrap_err();
        assert!(matches!(err, BuilderError::Io { .. }));
    }

    #[test]
    fn env_overrides_replace_endpoints() {
        let mut settings = FetcherSettings::default();
        settings.apply_overrides(|key| match key {
            ENV_MANIFEST_URL => Some("http://mirror/manifest.json".to_string()),
            _ => None,
        });
        assert_eq!(settings.manifest_url, "http://mirror/manifest.json");
        assert_eq!(settings.paper_api_base, DEFAULT_PAPER_API_BASE);
    }

    #[test]
    fn non_http_endpoint_is_rejected() {
        let settings = FetcherSettings {
            manifest_url: "ftp://x/manifest.json".into(),
            ..FetcherSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(BuilderError::InvalidConfig(_))
        ));
    }

    #[test]
    fn server_dir_precedence() {
        assert_eq!(
            resolve_server_dir(Some("/srv/a".into()), Some("/srv/b".into())),
            PathBuf::from("/srv/a")
        );
        assert_eq!(
            resolve_server_dir(None, Some("/srv/b".into())),
            PathBuf::from("/srv/b")
        );
        assert_eq!(resolve_server_dir(None, None), PathBuf::from("/mc"));
    }
}
