//! Configuration loader using figment.
//!
//! # Feature Flags
//!
//! - `toml-config` *(default)*: enables TOML configuration files (`gatebind.toml`)
//! - `yaml-config`: enables YAML configuration files (`gatebind.yaml`, `gatebind.yml`)
//!
//! Both features can be enabled simultaneously; if so, both file formats are searched and loaded.
//!
//! # Configuration Priority (lowest to highest)
//!
//! 1. Built-in defaults
//! 2. Programmatic base configuration ([`ConfigLoader::merge`])
//! 3. Profile-specific config file (`gatebind.{profile}.toml` / `gatebind.{profile}.yaml`)
//! 4. Main config file (`gatebind.toml` / `gatebind.yaml`)
//! 5. Environment variables (`GATEBIND_*`)
//! 6. Explicit key overrides ([`ConfigLoader::set`])
//!
//! # Environment Variable Mapping
//!
//! Environment variables are mapped using the `GATEBIND_` prefix with `__` as separator:
//!
//! - `GATEBIND_LOGGING__LEVEL=debug` → `logging.level = "debug"`
//! - `GATEBIND_BINDING__BIND_FAILURE_STATUS=client_error` → `binding.bind_failure_status`
//! - `GATEBIND_BINDING__MESSAGES__NOTBLANK=required` → `binding.messages.notblank` (codes match case-insensitively)
//!
//! # Example
//!
//! ```rust,ignore
//! use gatebind_runtime::config::ConfigLoader;
//!
//! let config = ConfigLoader::new()
//!     .profile("production")
//!     .file("./config/gatebind.toml")
//!     .load()?;
//! ```

use std::path::{Path, PathBuf};

use figment::Figment;
#[cfg(any(feature = "yaml-config", feature = "toml-config"))]
use figment::providers::Format;
#[cfg(feature = "toml-config")]
use figment::providers::Toml;
#[cfg(feature = "yaml-config")]
use figment::providers::Yaml;
use figment::providers::{Env, Serialized};
use serde::Serialize;
use tracing::{debug, info, trace};

use super::error::{ConfigError, ConfigResult};
use super::schema::GatebindConfig;
use super::validation::validate_config;

/// Prefix of every environment variable read by the loader.
pub const ENV_PREFIX: &str = "GATEBIND_";

/// Environment variable selecting the profile.
pub const PROFILE_ENV: &str = "GATEBIND_PROFILE";

/// Configuration profile for environment-specific settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Profile {
    /// Development profile (default).
    #[default]
    Development,
    /// Production profile.
    Production,
    /// Custom profile name.
    Custom(String),
}

impl Profile {
    /// Returns the profile name as a string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Custom(name) => name,
        }
    }

    /// Parses a profile name; unknown names become [`Profile::Custom`].
    pub fn parse(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "development" | "dev" => Self::Development,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Reads the profile from `GATEBIND_PROFILE`, defaulting to development.
    pub fn from_env() -> Self {
        std::env::var(PROFILE_ENV)
            .map(|p| Self::parse(&p))
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Configuration loader with figment-based multi-source support.
pub struct ConfigLoader {
    /// Programmatic base configuration, merged right above the defaults.
    figment: Figment,
    /// Single-key overrides, merged last.
    overrides: Figment,
    profile: Profile,
    search_paths: Vec<PathBuf>,
    load_env: bool,
    /// Specific config file to load (overrides search).
    config_file: Option<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a new configuration loader with defaults.
    pub fn new() -> Self {
        Self {
            figment: Figment::new(),
            overrides: Figment::new(),
            profile: Profile::from_env(),
            search_paths: Vec::new(),
            load_env: true,
            config_file: None,
        }
    }

    /// Sets the configuration profile.
    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.profile = Profile::parse(profile.as_ref());
        self
    }

    /// Adds a search path for configuration files.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Sets a specific configuration file to load.
    pub fn file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enables loading environment variables (default: true).
    pub fn with_env(mut self) -> Self {
        self.load_env = true;
        self
    }

    /// Disables loading environment variables.
    pub fn without_env(mut self) -> Self {
        self.load_env = false;
        self
    }

    /// Merges a programmatic base configuration.
    ///
    /// Every field of `config` takes part, so it sits below files and
    /// environment variables; use [`set`](Self::set) to force a single value.
    pub fn merge(mut self, config: GatebindConfig) -> Self {
        self.figment = self.figment.merge(Serialized::defaults(config));
        self
    }

    /// Overrides the value at a dotted key path (e.g. `"logging.level"`)
    /// above every other source.
    pub fn set<V: Serialize>(mut self, key: &str, value: V) -> Self {
        self.overrides = self.overrides.merge(Serialized::default(key, value));
        self
    }

    /// Loads, validates and returns the configuration.
    pub fn load(self) -> ConfigResult<GatebindConfig> {
        let profile = self.profile.clone();
        let figment = self.build_figment()?;

        let config: GatebindConfig = figment.extract()?;
        validate_config(&config)?;

        debug!(
            profile = %profile,
            logging_level = %config.logging.level,
            bind_failure_status = ?config.binding.bind_failure_status,
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Builds the figment instance with all sources.
    fn build_figment(mut self) -> ConfigResult<Figment> {
        let mut figment = Figment::from(Serialized::defaults(GatebindConfig::default()));

        let base = std::mem::take(&mut self.figment);
        figment = figment.merge(base);

        if let Some(path) = self.config_file.take() {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path));
            }
            info!(path = %path.display(), "Loading configuration file");
            figment = Self::merge_config_file(figment, &path)?;
        } else {
            figment = self.load_config_files(figment);
        }

        if self.load_env {
            trace!(prefix = ENV_PREFIX, "Loading environment variables");
            figment = figment.merge(Env::prefixed(ENV_PREFIX).ignore(&["profile"]).split("__"));
        }

        let overrides = std::mem::take(&mut self.overrides);
        Ok(figment.merge(overrides))
    }

    /// Merges a single config file into the figment, dispatching on file extension.
    ///
    /// Only extensions enabled via feature flags are accepted.
    fn merge_config_file(figment: Figment, path: &Path) -> ConfigResult<Figment> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match ext {
            #[cfg(feature = "toml-config")]
            "toml" => Ok(figment.merge(Toml::file(path))),
            #[cfg(feature = "yaml-config")]
            "yaml" | "yml" => Ok(figment.merge(Yaml::file(path))),
            _ => Err(ConfigError::UnsupportedFormat(ext.to_string())),
        }
    }

    /// Resolves the effective list of search paths.
    fn resolve_search_paths(&self) -> Vec<PathBuf> {
        if !self.search_paths.is_empty() {
            return self.search_paths.clone();
        }
        let mut paths = Vec::new();
        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd);
        }
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("gatebind"));
        }
        paths
    }

    /// Common search logic for a single file format.
    ///
    /// Iterates `search_paths × base_names`, merging a profile-specific variant before the
    /// base file. Stops at the first directory holding a base file.
    #[cfg(any(feature = "toml-config", feature = "yaml-config"))]
    fn load_format_files<F>(
        &self,
        mut figment: Figment,
        search_paths: &[PathBuf],
        base_names: &[&str],
        merge_fn: F,
    ) -> (Figment, bool)
    where
        F: Fn(Figment, &Path) -> Figment,
    {
        for search_path in search_paths {
            for base_name in base_names {
                let Some((stem, ext)) = base_name.rsplit_once('.') else {
                    continue;
                };

                let profile_path =
                    search_path.join(format!("{stem}.{}.{ext}", self.profile.as_str()));
                if profile_path.exists() {
                    debug!(path = %profile_path.display(), "Loading profile-specific config");
                    figment = merge_fn(figment, &profile_path);
                }

                let base_path = search_path.join(base_name);
                if base_path.exists() {
                    info!(path = %base_path.display(), "Loading configuration file");
                    figment = merge_fn(figment, &base_path);
                    return (figment, true);
                }
            }
        }
        (figment, false)
    }

    /// Searches for and loads configuration files from search paths.
    fn load_config_files(&self, figment: Figment) -> Figment {
        let search_paths = self.resolve_search_paths();
        #[cfg_attr(
            not(any(feature = "toml-config", feature = "yaml-config")),
            allow(unused_mut)
        )]
        let mut figment = figment;
        let mut found = false;

        #[cfg(feature = "toml-config")]
        {
            let (f, ok) =
                self.load_format_files(figment, &search_paths, &["gatebind.toml"], |fig, path| {
                    fig.merge(Toml::file(path))
                });
            figment = f;
            found |= ok;
        }

        #[cfg(feature = "yaml-config")]
        {
            let (f, ok) = self.load_format_files(
                figment,
                &search_paths,
                &["gatebind.yaml", "gatebind.yml"],
                |fig, path| fig.merge(Yaml::file(path)),
            );
            figment = f;
            found |= ok;
        }

        if !found {
            debug!(paths = search_paths.len(), "No configuration file found, using defaults");
        }
        figment
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LogLevel, LoggingConfig};
    use figment::Jail;
    use gatebind_framework::BindFailureStatus;

    fn jailed(err: ConfigError) -> figment::Error {
        figment::Error::from(err.to_string())
    }

    #[test]
    fn test_default_config() {
        Jail::expect_with(|_jail| {
            let config = ConfigLoader::new().without_env().load().map_err(jailed)?;
            assert_eq!(config.logging.level.as_str(), "info");
            assert!(config.binding.ignore_unknown_fields);
            Ok(())
        });
    }

    #[test]
    fn test_profile_parse() {
        assert_eq!(Profile::parse("PROD"), Profile::Production);
        assert_eq!(Profile::parse("dev"), Profile::Development);
        assert_eq!(Profile::parse("staging").as_str(), "staging");
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn test_file_then_env_then_overrides() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "gatebind.toml",
                r#"
                [logging]
                level = "warn"

                [binding]
                ignore_unknown_fields = false

                [binding.messages]
                NotBlank = "required"
                "#,
            )?;
            jail.set_env("GATEBIND_BINDING__BIND_FAILURE_STATUS", "client_error");
            jail.set_env("GATEBIND_PROFILE", "development");

            let config = ConfigLoader::new()
                .search_path(jail.directory())
                .load()
                .map_err(jailed)?;
            assert_eq!(config.logging.level, LogLevel::Warn);
            assert!(!config.binding.ignore_unknown_fields);
            assert_eq!(
                config.binding.bind_failure_status,
                BindFailureStatus::ClientError
            );
            assert_eq!(
                config.binding.messages.get("NotBlank").map(String::as_str),
                Some("required")
            );
            Ok(())
        });
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn test_merge_keeps_file_and_env_values() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "gatebind.toml",
                "[logging]\nlevel = \"warn\"\n\n[binding]\nignore_unknown_fields = false\n",
            )?;
            jail.set_env("GATEBIND_BINDING__BIND_FAILURE_STATUS", "client_error");

            let config = ConfigLoader::new()
                .search_path(jail.directory())
                .merge(GatebindConfig {
                    logging: LoggingConfig {
                        level: LogLevel::Debug,
                        thread_ids: true,
                        ..Default::default()
                    },
                    ..Default::default()
                })
                .load()
                .map_err(jailed)?;
            assert_eq!(config.logging.level, LogLevel::Warn);
            assert!(config.logging.thread_ids);
            assert!(!config.binding.ignore_unknown_fields);
            assert_eq!(
                config.binding.bind_failure_status,
                BindFailureStatus::ClientError
            );
            Ok(())
        });
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn test_set_overrides_only_the_named_key() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "gatebind.toml",
                "[logging]\nlevel = \"warn\"\n\n[binding]\nignore_unknown_fields = false\n",
            )?;
            jail.set_env("GATEBIND_BINDING__BIND_FAILURE_STATUS", "client_error");

            let config = ConfigLoader::new()
                .search_path(jail.directory())
                .set("logging.level", "debug")
                .load()
                .map_err(jailed)?;
            assert_eq!(config.logging.level, LogLevel::Debug);
            assert!(!config.binding.ignore_unknown_fields);
            assert_eq!(
                config.binding.bind_failure_status,
                BindFailureStatus::ClientError
            );
            Ok(())
        });
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn test_profile_file_is_layered_below_main_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "gatebind.production.toml",
                "[logging]\nlevel = \"error\"\nthread_ids = true\n",
            )?;
            jail.create_file("gatebind.toml", "[logging]\nlevel = \"warn\"\n")?;

            let config = ConfigLoader::new()
                .profile("production")
                .search_path(jail.directory())
                .without_env()
                .load()
                .map_err(jailed)?;
            assert_eq!(config.logging.level, LogLevel::Warn);
            assert!(config.logging.thread_ids);
            Ok(())
        });
    }

    #[test]
    fn test_missing_and_unsupported_files() {
        let err = ConfigLoader::new()
            .file("/nonexistent/gatebind.toml")
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));

        Jail::expect_with(|jail| {
            jail.create_file("gatebind.ini", "level=debug")?;
            let err = ConfigLoader::new().file("gatebind.ini").load().unwrap_err();
            assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
            Ok(())
        });
    }
}
