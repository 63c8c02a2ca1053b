use crate::error::{LogSearchError, Result};
use crate::error_ext::ResultExt;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const LOCAL_CONFIG_FILE: &str = ".logsearch/config.local.toml";
const GLOBAL_CONFIG_FILE: &str = ".logsearch/config.toml";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Central configuration for logsearch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSearchConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub startup_health_check: bool,
}

impl Default for LogSearchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            startup_health_check: true,
        }
    }
}

/// On-disk shape; every key is optional so files only need what they change
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    base_url: Option<String>,
    request_timeout_secs: Option<u64>,
    startup_health_check: Option<bool>,
}

/// Values given on the command line or through the environment
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub no_health_check: bool,
}

impl LogSearchConfig {
    /// Defaults, then `~/.logsearch/config.toml`, then
    /// `.logsearch/config.local.toml` in `workspace`, then `overrides`.
    pub fn load(workspace: &Path, overrides: ConfigOverrides) -> Result<Self> {
        let global_path =
            std::env::var_os("HOME").map(|home| PathBuf::from(home).join(GLOBAL_CONFIG_FILE));
        let local_path = workspace.join(LOCAL_CONFIG_FILE);

        Self::load_from(global_path.as_deref(), &local_path, overrides)
    }

    fn load_from(
        global_path: Option<&Path>,
        local_path: &Path,
        overrides: ConfigOverrides,
    ) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = global_path {
            config.merge(Self::read_file(path)?);
        }
        config.merge(Self::read_file(local_path)?);
        config.apply(overrides);

        config.base_url = normalize_base_url(&config.base_url)?;
        if config.request_timeout_secs == 0 {
            return Err(LogSearchError::Config(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        tracing::debug!(
            base_url = %config.base_url,
            timeout_secs = config.request_timeout_secs,
            "Configuration loaded"
        );

        Ok(config)
    }

    fn read_file(path: &Path) -> Result<ConfigFile> {
        if !path.exists() {
            return Ok(ConfigFile::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let file = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(file)
    }

    fn merge(&mut self, file: ConfigFile) {
        if let Some(url) = file.base_url {
            self.base_url = url;
        }
        if let Some(timeout) = file.request_timeout_secs {
            self.request_timeout_secs = timeout;
        }
        if let Some(check) = file.startup_health_check {
            self.startup_health_check = check;
        }
    }

    fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(url) = overrides.base_url {
            self.base_url = url;
        }
        if let Some(timeout) = overrides.request_timeout_secs {
            self.request_timeout_secs = timeout;
        }
        if overrides.no_health_check {
            self.startup_health_check = false;
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn normalize_base_url(url: &str) -> Result<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(LogSearchError::Config(format!(
            "Backend URL must start with http:// or https://, got '{}'",
            url
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = LogSearchConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.request_timeout_secs, 300);
        assert!(config.startup_health_check);
    }

    #[test]
    fn test_missing_files_use_defaults() {
        let dir = tempdir().unwrap();
        let config = LogSearchConfig::load_from(
            Some(dir.path().join("nope.toml").as_path()),
            &dir.path().join("also-nope.toml"),
            ConfigOverrides::default(),
        )
        .unwrap();
        assert_eq!(config, LogSearchConfig::default());
    }

    #[test]
    fn test_local_overrides_global_and_cli_overrides_both() {
        let dir = tempdir().unwrap();
        let global = dir.path().join("global.toml");
        let local = dir.path().join("local.toml");
        std::fs::write(
            &global,
            "base_url = \"http://global:9000/\"\nrequest_timeout_secs = 10\n",
        )
        .unwrap();
        std::fs::write(&local, "base_url = \"http://local:9001\"\n").unwrap();

        let config =
            LogSearchConfig::load_from(Some(global.as_path()), &local, ConfigOverrides::default())
                .unwrap();
        assert_eq!(config.base_url, "http://local:9001");
        assert_eq!(config.request_timeout_secs, 10);

        let overrides = ConfigOverrides {
            base_url: Some("https://cli.example/".to_string()),
            request_timeout_secs: None,
            no_health_check: true,
        };
        let config = LogSearchConfig::load_from(Some(global.as_path()), &local, overrides).unwrap();
        assert_eq!(config.base_url, "https://cli.example");
        assert_eq!(config.request_timeout_secs, 10);
        assert!(!config.startup_health_check);
    }

    #[test]
    fn test_rejects_bad_url_and_zero_timeout() {
        let dir = tempdir().unwrap();
        let local = dir.path().join("local.toml");

        let overrides = ConfigOverrides {
            base_url: Some("localhost:8000".to_string()),
            ..Default::default()
        };
        let err = LogSearchConfig::load_from(None, &local, overrides).unwrap_err();
        assert!(matches!(err, LogSearchError::Config(_)));

        let overrides = ConfigOverrides {
            request_timeout_secs: Some(0),
            ..Default::default()
        };
        assert!(LogSearchConfig::load_from(None, &local, overrides).is_err());
    }

    #[test]
    fn test_unknown_key_is_reported() {
        let dir = tempdir().unwrap();
        let local = dir.path().join("local.toml");
        std::fs::write(&local, "base_uri = \"http://typo\"\n").unwrap();

        let err = LogSearchConfig::load_from(None, &local, ConfigOverrides::default()).unwrap_err();
        assert!(matches!(err, LogSearchError::Context { .. }));
        assert!(err.hint().is_some());
    }
}
