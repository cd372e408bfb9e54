//! Configuration default values

use std::time::Duration;

// HTTP
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
pub const DEFAULT_REFERRER: &str = "";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_secs(1);
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 8;

// Merging
pub const DEFAULT_KEEP_MULTIPLE_URLS: bool = true;
pub const DEFAULT_RENAME_CHANNELS: bool = true;
pub const DEFAULT_GROUP: &str = "未分类";

// Output
pub const DEFAULT_EPG_URL: &str = "https://epg.catvod.com/epg.xml";
pub const DEFAULT_OUTPUT_FILE: &str = "kudog.m3u";
pub const DEFAULT_GENERATE_DEBUG_FILE: bool = false;

// Files
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";
pub const DEFAULT_SOURCES_FILE: &str = "sources.json";
pub const DEFAULT_GROUPS_FILE: &str = "groups.json";
pub const DEFAULT_ALIAS_FILE: &str = "alias.txt";

// Logging
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
