//! Turning raw source text into batches of accepted entries

use std::borrow::Cow;
use std::sync::Arc;
use tracing::info;

use crate::errors::{SourceError, SourceResult};
use crate::models::{SourceBatch, SourceDescriptor};
use crate::rules::{AllowList, RuleSet};

/// Byte order mark some editors put at the start of text files
const BOM: char = '\u{FEFF}';

pub mod extinf;
pub mod m3u_parser;
pub mod txt_converter;

pub use m3u_parser::{M3uParser, ParseOptions, UNKNOWN_CHANNEL};

/// Parses source content with the shared rules
///
/// Cheap to clone; every concurrent source task holds its own handle.
#[derive(Debug, Clone)]
pub struct Ingestor {
    rules: Arc<RuleSet>,
    options: Arc<ParseOptions>,
}

impl Ingestor {
    pub fn new(rules: Arc<RuleSet>, options: ParseOptions) -> Self {
        Self {
            rules,
            options: Arc::new(options),
        }
    }

    /// Normalize and parse one source's content
    pub fn ingest(&self, descriptor: &SourceDescriptor, content: &str) -> SourceResult<SourceBatch> {
        let label = descriptor.label();
        let content = content.strip_prefix(BOM).unwrap_or(content);
        if content.trim().is_empty() {
            return Err(SourceError::EmptyBody { source_name: label });
        }

        let converted = !txt_converter::is_m3u(content);
        let playlist = if converted {
            info!("Converting text list to M3U: {}", label);
            Cow::Owned(txt_converter::convert_content(
                content,
                &self.options.default_group,
            ))
        } else {
            Cow::Borrowed(content)
        };

        let allowlist = AllowList::new(&descriptor.include_channels);
        let mut batch = M3uParser::new(&self.rules, &allowlist, &self.options).parse(
            &label,
            descriptor.primary,
            &playlist,
        );
        batch.converted_from_txt = converted;
        if converted {
            batch.line_count = content.lines().count();
        }

        Ok(batch)
    }
}
