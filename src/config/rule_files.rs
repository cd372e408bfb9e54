//! Rule and source files
//!
//! `sources.json` declares where channels come from, `groups.json` holds
//! the group rules, the blocklist and pinned channels, and `alias.txt` maps
//! channel names to canonical names.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use tracing::{info, warn};

use crate::errors::{ConfigError, ConfigResult, SourceError};
use crate::models::{CustomChannel, SourceDescriptor};
use crate::rules::{AliasTable, BlockList, GroupRules};
use crate::utils::url::UrlUtils;

#[derive(Debug, Default, Deserialize)]
struct RawSources {
    #[serde(default)]
    local_files: Vec<Value>,
    #[serde(default)]
    remote_urls: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RemoteEntry {
    #[serde(default)]
    url: String,
    #[serde(default)]
    primary: bool,
    #[serde(default)]
    include_channels: Vec<String>,
}

/// Usable sources plus the entries that had to be rejected
#[derive(Debug, Default)]
pub struct SourceList {
    /// Local files first, then remote sources, each in file order
    pub descriptors: Vec<SourceDescriptor>,
    /// Label and reason for every unusable entry
    pub rejected: Vec<(String, SourceError)>,
}


/// Contents of `groups.json`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroupsFile {
    /// Group label to patterns, in declaration order
    #[serde(default)]
    pub rules: IndexMap<String, Vec<String>>,
    #[serde(default)]
    pub blocklist: Vec<String>,
    #[serde(default, alias = "custom_channels")]
    pub customchannels: Vec<CustomChannel>,
}

impl GroupsFile {
    pub fn group_rules(&self) -> GroupRules {
        GroupRules::from_map(&self.rules)
    }

    pub fn block_list(&self) -> BlockList {
        BlockList::new(&self.blocklist)
    }
}

fn read(path: &Path) -> ConfigResult<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Load the source declarations; a missing file is fatal
pub fn load_sources(path: &Path) -> ConfigResult<SourceList> {
    let contents = read(path)?.ok_or_else(|| ConfigError::Missing {
        path: path.to_path_buf(),
    })?;
    let list = parse_sources(&contents).map_err(|e| ConfigError::parse(path, e))?;

    info!(
        "Sources: {} usable, {} rejected ({})",
        list.descriptors.len(),
        list.rejected.len(),
        path.display()
    );
    Ok(list)
}

/// Interpret `sources.json` text
///
/// Entries that are not usable are collected in [`SourceList::rejected`]
/// instead of failing the whole file.
pub fn parse_sources(contents: &str) -> Result<SourceList, serde_json::Error> {
    let raw: RawSources = serde_json::from_str(contents)?;
    let mut list = SourceList::default();

    for (index, value) in raw.local_files.into_iter().enumerate() {
        match value {
            Value::String(path) if !path.trim().is_empty() => {
                list.descriptors.push(SourceDescriptor::local(path.trim()));
            }
            other => {
                let error = SourceError::InvalidDescriptor {
                    index,
                    message: format!("local file must be a non-empty path, got {other}"),
                };
                warn!("Rejected local_files[{}]: {}", index, error);
                list.rejected.push((format!("local_files[{index}]"), error));
            }
        }
    }

    for (index, value) in raw.remote_urls.into_iter().enumerate() {
        match remote_descriptor(index, value) {
            Ok(descriptor) => list.descriptors.push(descriptor),
            Err(error) => {
                warn!("Rejected remote_urls[{}]: {}", index, error);
                list.rejected.push((format!("remote_urls[{index}]"), error));
            }
        }
    }

    Ok(list)
}

fn remote_descriptor(index: usize, value: Value) -> Result<SourceDescriptor, SourceError> {
    let invalid = |message: String| SourceError::InvalidDescriptor { index, message };

    let entry = match value {
        Value::String(url) => RemoteEntry {
            url,
            primary: false,
            include_channels: Vec::new(),
        },
        Value::Object(_) => {
            serde_json::from_value::<RemoteEntry>(value).map_err(|e| invalid(e.to_string()))?
        }
        other => return Err(invalid(format!("expected a URL or an object, got {other}"))),
    };

    let url = entry.url.trim();
    if url.is_empty() {
        return Err(invalid("empty URL".to_string()));
    }
    if !UrlUtils::is_http(url) {
        return Err(invalid(format!(
            "not an http(s) URL: {}",
            UrlUtils::obfuscate_credentials(url)
        )));
    }

    let include_channels = entry
        .include_channels
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect();

    Ok(SourceDescriptor::remote(url, entry.primary, include_channels))
}

/// Load group rules; a missing file yields empty rules
pub fn load_groups(path: &Path) -> ConfigResult<GroupsFile> {
    let Some(contents) = read(path)? else {
        warn!("{} not found, no group rules loaded", path.display());
        return Ok(GroupsFile::default());
    };

    let groups: GroupsFile =
        serde_json::from_str(&contents).map_err(|e| ConfigError::parse(path, e))?;
    info!(
        "Groups: {} rules, {} blocklist patterns, {} custom channels",
        groups.rules.len(),
        groups.blocklist.len(),
        groups.customchannels.len()
    );
    Ok(groups)
}

/// Load the alias table; a missing file yields an empty table
pub fn load_aliases(path: &Path) -> ConfigResult<AliasTable> {
    let Some(contents) = read(path)? else {
        warn!("{} not found, no aliases loaded", path.display());
        return Ok(AliasTable::new());
    };

    let table = AliasTable::parse(&contents);
    info!("Loaded {} aliases", table.len());
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceLocation;
    use tempfile::TempDir;

    #[test]
    fn test_parse_sources_mixed_formats() {
        let list = parse_sources(
            r#"{
                "local_files": ["local.m3u", 42, ""],
                "remote_urls": [
                    "http://a.example/list.m3u",
                    {"url": "https://b.example/list.txt", "primary": true, "include_channels": ["CCTV", " "]},
                    {"url": ""},
                    {"include_channels": ["x"]},
                    "ftp://c.example/list.m3u",
                    7
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(list.descriptors.len(), 3);
        assert_eq!(
            list.descriptors[0].location,
            SourceLocation::Local("local.m3u".into())
        );
        assert!(list.descriptors[0].primary);

        let plain = &list.descriptors[1];
        assert_eq!(
            plain.location,
            SourceLocation::Remote("http://a.example/list.m3u".to_string())
        );
        assert!(!plain.primary);

        let detailed = &list.descriptors[2];
        assert!(detailed.primary);
        assert_eq!(detailed.include_channels, vec!["CCTV"]);

        let rejected: Vec<_> = list.rejected.iter().map(|(label, _)| label.as_str()).collect();
        assert_eq!(
            rejected,
            vec![
                "local_files[1]",
                "local_files[2]",
                "remote_urls[2]",
                "remote_urls[3]",
                "remote_urls[4]",
                "remote_urls[5]"
            ]
        );
    }

    #[test]
    fn test_parse_sources_missing_keys() {
        let list = parse_sources("{}").unwrap();
        assert!(list.descriptors.is_empty());
        assert!(list.rejected.is_empty());
        assert!(parse_sources("[1, 2]").is_err());
    }

    #[test]
    fn test_missing_sources_file_is_fatal() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            load_sources(&temp.path().join("sources.json")),
            Err(ConfigError::Missing { .. })
        ));
    }

    #[test]
    fn test_groups_file_preserves_rule_order() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("groups.json");
        std::fs::write(
            &path,
            r#"{
                "rules": {"体育": ["sport"], "央视": ["^CCTV"], "卫视": ["卫视"]},
                "blocklist": ["购物"],
                "customchannels": [{"name": "Pinned", "url": "http://p", "group": "置顶"}]
            }"#,
        )
        .unwrap();

        let groups = load_groups(&path).unwrap();
        assert_eq!(groups.group_rules().group_order(), vec!["体育", "央视", "卫视"]);
        assert!(groups.block_list().is_blocked("家有购物"));
        assert_eq!(groups.customchannels[0].logo, "");
    }

    #[test]
    fn test_missing_optional_files_are_empty() {
        let temp = TempDir::new().unwrap();
        assert!(load_groups(&temp.path().join("groups.json")).unwrap().rules.is_empty());
        assert!(load_aliases(&temp.path().join("alias.txt")).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_groups_file_is_fatal() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("groups.json");
        std::fs::write(&path, r#"{"rules": ["not", "a", "map"]}"#).unwrap();
        assert!(matches!(load_groups(&path), Err(ConfigError::Parse { .. })));
    }
}
