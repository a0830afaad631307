//! Configuration loading
//!
//! # Settings Sources Priority
//!
//! 1. Command-line arguments
//! 2. Environment variables (`CASEBRIDGE_*`)
//! 3. TOML configuration file
//! 4. Built-in defaults (code constants)
//!
//! # Config File Location
//!
//! 1. Explicit `--config` path
//! 2. `CASEBRIDGE_CONFIG` environment variable
//! 3. `~/.config/casebridge/config.toml`
//! 4. `/etc/casebridge/config.toml`
//!
//! A missing config file is not an error: defaults are used and a warning is
//! logged. An explicitly named file that does not exist is an error.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "CASEBRIDGE_CONFIG";

/// Configuration loaded from TOML file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Interpretation request service
    #[serde(default)]
    pub source: ServiceConfig,

    /// Variant archive serving report events
    #[serde(default)]
    pub archive: ServiceConfig,

    /// Destination registry
    #[serde(default)]
    pub registry: RegistryConfig,

    #[serde(default)]
    pub transport: TransportConfig,

    #[serde(default)]
    pub submission: SubmissionConfig,

    /// Consequence selection allow-list overrides
    #[serde(default)]
    pub selection: SelectionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// URL and user credentials of a token-authenticated service
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// URL and API keys of the destination registry
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub system_key: Option<String>,
    #[serde(default)]
    pub user_key: Option<String>,
}

/// HTTP retry and paging behavior
#[derive(Debug, Clone, Deserialize)]
pub struct TransportConfig {
    /// Retries after the first attempt; negative means retry forever
    #[serde(default = "default_max_retries")]
    pub max_retries: i32,

    /// Backoff exponent ceiling (delay is drawn from `[0, 2^k - 1)` seconds)
    #[serde(default = "default_backoff_truncation")]
    pub backoff_truncation: u32,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Page size used for listings
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl TransportConfig {
    /// Retry bound, `None` when unbounded
    pub fn retry_limit(&self) -> Option<u32> {
        u32::try_from(self.max_retries).ok()
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            backoff_truncation: default_backoff_truncation(),
            timeout_secs: default_timeout_secs(),
            page_size: default_page_size(),
        }
    }
}

/// Case submission switches
#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionConfig {
    /// Submit phenotypes observed as absent
    #[serde(default)]
    pub send_absent_phenotypes: bool,

    /// Reject a case whose event justification names no recognised inheritance
    #[serde(default = "default_true")]
    pub strict_inheritance: bool,

    /// Archive variant calls carry pseudonymized participant ids
    #[serde(default)]
    pub archive_ids_pseudonymized: bool,

    /// Delete the created patient when a later step fails
    #[serde(default)]
    pub rollback_on_failure: bool,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            send_absent_phenotypes: false,
            strict_inheritance: true,
            archive_ids_pseudonymized: false,
            rollback_on_failure: false,
        }
    }
}

/// Optional replacements for the built-in selection allow-lists
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SelectionConfig {
    #[serde(default)]
    pub tier1_so_terms: Option<Vec<String>>,
    #[serde(default)]
    pub tier2_so_terms: Option<Vec<String>>,
    #[serde(default)]
    pub biotypes: Option<Vec<String>>,
    #[serde(default)]
    pub transcript_flags: Option<Vec<String>>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_max_retries() -> i32 {
    5
}

fn default_backoff_truncation() -> u32 {
    8
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_page_size() -> u32 {
    100
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load the config file if one can be found, otherwise built-in defaults
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
        }

        match locate_config_file(explicit) {
            Some(path) => {
                info!(path = %path.display(), "Loading configuration");
                Self::load(&path)
            }
            None => {
                warn!("No config file found, using built-in defaults");
                Ok(Self::default())
            }
        }
    }
}

/// Find the config file following the documented lookup order
pub fn locate_config_file(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
        warn!(path = %path.display(), "{} points to a missing file", CONFIG_ENV_VAR);
    }

    let user_config = dirs::config_dir().map(|d| d.join("casebridge").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    let system_config = PathBuf::from("/etc/casebridge/config.toml");
    if system_config.exists() {
        return Some(system_config);
    }

    None
}

/// Resolve one setting: CLI argument, then environment variable, then TOML
pub fn resolve_setting(
    cli_arg: Option<&str>,
    env_var_name: &str,
    toml_value: Option<&str>,
) -> Option<String> {
    if let Some(value) = cli_arg {
        return Some(value.to_string());
    }

    if let Ok(value) = std::env::var(env_var_name) {
        if !value.is_empty() {
            return Some(value);
        }
    }

    toml_value.map(str::to_string)
}

/// Like [`resolve_setting`], failing with a message that says where to set it
pub fn require_setting(
    flag: &str,
    cli_arg: Option<&str>,
    env_var_name: &str,
    toml_value: Option<&str>,
    toml_key: &str,
) -> Result<String> {
    resolve_setting(cli_arg, env_var_name, toml_value).ok_or_else(|| {
        Error::Config(format!(
            "Missing {}: pass --{}, set {} or add `{}` to the config file",
            flag, flag, env_var_name, toml_key
        ))
    })
}
