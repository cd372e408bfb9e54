//! Runtime configuration
//!
//! Loaded from a TOML file where every key is optional. Relative paths in the
//! file (rule files and the output file) are resolved against the directory
//! that contains it.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::errors::{ConfigError, ConfigResult};
use crate::ingestor::ParseOptions;
use crate::output::header_line;
use crate::sources::FetchSettings;
use crate::store::{DEFAULT_VOLATILE_PARAMS, UrlMatchMode, UrlMatcher};
use crate::utils::retry::RetryPolicy;

pub mod defaults;
pub mod duration_serde;
pub mod rule_files;

use defaults::*;

pub use rule_files::{GroupsFile, SourceList, load_aliases, load_groups, load_sources};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub user_agent: String,
    pub referrer: String,
    /// EPG URL advertised in the playlist header; empty for a bare header
    pub epg_url: String,
    #[serde(with = "duration_serde")]
    pub timeout: Duration,
    pub max_retries: u32,
    /// Delay before the first retry, doubled for every further retry
    #[serde(with = "duration_serde")]
    pub retry_backoff: Duration,
    pub max_concurrent_fetches: usize,

    pub keep_multiple_urls: bool,
    pub url_dedup: UrlMatchMode,
    pub volatile_query_params: Vec<String>,
    pub rename_channels: bool,
    pub default_group: String,

    pub output_file: PathBuf,
    pub generate_debug_file: bool,
    pub log_level: String,

    pub sources_file: PathBuf,
    pub groups_file: PathBuf,
    pub alias_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            referrer: DEFAULT_REFERRER.to_string(),
            epg_url: DEFAULT_EPG_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
            keep_multiple_urls: DEFAULT_KEEP_MULTIPLE_URLS,
            url_dedup: UrlMatchMode::default(),
            volatile_query_params: DEFAULT_VOLATILE_PARAMS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            rename_channels: DEFAULT_RENAME_CHANNELS,
            default_group: DEFAULT_GROUP.to_string(),
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            generate_debug_file: DEFAULT_GENERATE_DEBUG_FILE,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            sources_file: PathBuf::from(DEFAULT_SOURCES_FILE),
            groups_file: PathBuf::from(DEFAULT_GROUPS_FILE),
            alias_file: PathBuf::from(DEFAULT_ALIAS_FILE),
        }
    }
}

impl Config {
    /// Load from `path`, falling back to defaults when the file is absent
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            info!("{} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse { message, .. } => ConfigError::parse(path, message),
            other => other,
        })?;

        if let Some(base) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            config.resolve_paths(base);
        }

        info!("Config loaded: {}", path.display());
        Ok(config)
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(contents)
            .map_err(|e| ConfigError::parse(DEFAULT_CONFIG_FILE, e.message()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_concurrent_fetches == 0 {
            return Err(ConfigError::invalid("max_concurrent_fetches", "must be at least 1"));
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::invalid("timeout", "must be greater than zero"));
        }
        if self.default_group.trim().is_empty() {
            return Err(ConfigError::invalid("default_group", "must not be empty"));
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::invalid("user_agent", "must not be empty"));
        }
        if self.output_file.as_os_str().is_empty() {
            return Err(ConfigError::invalid("output_file", "must not be empty"));
        }
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::invalid(
                "log_level",
                format!("'{}' is not one of {}", self.log_level, LOG_LEVELS.join(", ")),
            ));
        }
        Ok(())
    }

    /// Resolve relative file paths against `base`
    pub fn resolve_paths(&mut self, base: &Path) {
        for path in [
            &mut self.sources_file,
            &mut self.groups_file,
            &mut self.alias_file,
            &mut self.output_file,
        ] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }

    pub fn header_line(&self) -> String {
        header_line(Some(&self.epg_url))
    }

    pub fn url_matcher(&self) -> UrlMatcher {
        UrlMatcher::new(self.url_dedup, &self.volatile_query_params)
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            default_group: self.default_group.clone(),
            rename_channels: self.rename_channels,
        }
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            user_agent: self.user_agent.clone(),
            referrer: Some(self.referrer.clone()).filter(|r| !r.trim().is_empty()),
            timeout: self.timeout,
            retry: RetryPolicy::new(self.max_retries, self.retry_backoff),
        }
    }
}
