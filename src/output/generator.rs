//! Playlist rendering
//!
//! Output order is fixed: header, custom channels in input order, then the
//! stored channels group by group. Within a group channels keep their store
//! (first-insertion) order.

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::ingestor::extinf::{GROUP_TITLE, HEADER_PREFIX, TVG_LOGO, TVG_NAME, sanitize_value};
use crate::models::CustomChannel;
use crate::store::ChannelStore;

/// Header line for the merged playlist
pub fn header_line(epg_url: Option<&str>) -> String {
    match epg_url.map(str::trim).filter(|u| !u.is_empty()) {
        Some(url) => format!("{HEADER_PREFIX} x-tvg-url=\"{}\"", sanitize_value(url)),
        None => HEADER_PREFIX.to_string(),
    }
}

/// Metadata line for a pinned channel
pub fn custom_channel_line(channel: &CustomChannel) -> String {
    format!(
        "#EXTINF:-1 {TVG_NAME}=\"{}\" {TVG_LOGO}=\"{}\" {GROUP_TITLE}=\"{}\",{}",
        sanitize_value(&channel.name),
        sanitize_value(&channel.logo),
        sanitize_value(&channel.group),
        channel.name
    )
}

/// Rendered playlist and what went into it
#[derive(Debug, Clone, Default)]
pub struct RenderedPlaylist {
    pub content: String,
    /// Emitted channels per group, in output order
    pub group_counts: IndexMap<String, usize>,
    pub channel_count: usize,
    pub url_count: usize,
    pub custom_count: usize,
    /// Stored channels whose group is not part of the output order
    pub omitted: usize,
}

#[derive(Debug, Clone)]
pub struct PlaylistGenerator {
    header: String,
    group_order: Vec<String>,
    default_group: String,
    keep_multiple_urls: bool,
}

impl PlaylistGenerator {
    pub fn new(
        header: String,
        group_order: Vec<String>,
        default_group: String,
        keep_multiple_urls: bool,
    ) -> Self {
        Self {
            header,
            group_order,
            default_group,
            keep_multiple_urls,
        }
    }

    /// Groups in emission order: declared groups, then the default, each once
    pub fn output_groups(&self) -> Vec<&str> {
        let mut groups: Vec<&str> = Vec::with_capacity(self.group_order.len() + 1);
        for group in self.group_order.iter().chain(std::iter::once(&self.default_group)) {
            if !groups.contains(&group.as_str()) {
                groups.push(group);
            }
        }
        groups
    }

    pub fn render(&self, store: &ChannelStore, custom_channels: &[CustomChannel]) -> RenderedPlaylist {
        let mut lines: Vec<&str> = Vec::with_capacity(1 + custom_channels.len() * 2 + store.total_urls() * 2);
        let custom_lines: Vec<String> = custom_channels.iter().map(custom_channel_line).collect();

        lines.push(&self.header);
        for (meta, channel) in custom_lines.iter().zip(custom_channels) {
            lines.push(meta);
            lines.push(&channel.url);
        }

        let mut rendered = RenderedPlaylist {
            custom_count: custom_channels.len(),
            ..RenderedPlaylist::default()
        };

        let groups = self.output_groups();
        for group in &groups {
            let mut count = 0;
            for record in store.iter().filter(|r| r.group == *group) {
                lines.push(&record.metadata_line);
                let urls = if self.keep_multiple_urls {
                    &record.urls[..]
                } else {
                    &record.urls[..record.urls.len().min(1)]
                };
                lines.extend(urls.iter().map(String::as_str));
                rendered.url_count += urls.len();
                count += 1;
            }
            if count > 0 {
                debug!("Group '{}': {} channels", group, count);
            }
            rendered.group_counts.insert(group.to_string(), count);
            rendered.channel_count += count;
        }

        rendered.omitted = store.len() - rendered.channel_count;
        if rendered.omitted > 0 {
            warn!(
                "{} channels belong to groups outside the output order and were not written",
                rendered.omitted
            );
        }

        let mut content = lines.join("\n");
        content.push('\n');
        rendered.content = content;
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::UrlMatcher;

    fn store() -> ChannelStore {
        let mut store = ChannelStore::new(true, UrlMatcher::exact());
        store.ingest("湖南卫视", "#EXTINF:-1,湖南卫视", "http://h1", "卫视", true);
        store.ingest("CCTV1", "#EXTINF:-1,CCTV1", "http://c1", "央视", true);
        store.ingest("CCTV1", "#EXTINF:-1,CCTV1", "http://c2", "央视", true);
        store.ingest("Foo", "#EXTINF:-1,Foo", "http://f1", "未分类", true);
        store.ingest("CCTV2", "#EXTINF:-1,CCTV2", "http://c3", "央视", true);
        store
    }

    fn generator(keep_multiple_urls: bool) -> PlaylistGenerator {
        PlaylistGenerator::new(
            header_line(Some("http://epg.example/e.xml")),
            vec!["央视".to_string(), "卫视".to_string()],
            "未分类".to_string(),
            keep_multiple_urls,
        )
    }

    #[test]
    fn test_header_line() {
        assert_eq!(header_line(None), "#EXTM3U");
        assert_eq!(header_line(Some("  ")), "#EXTM3U");
        assert_eq!(
            header_line(Some("http://e/x.xml")),
            "#EXTM3U x-tvg-url=\"http://e/x.xml\""
        );
    }

    #[test]
    fn test_render_orders_groups_then_store() {
        let custom = vec![CustomChannel {
            name: "Pinned".to_string(),
            url: "http://pinned".to_string(),
            group: "置顶".to_string(),
            logo: "http://logo.png".to_string(),
        }];

        let rendered = generator(true).render(&store(), &custom);
        let expected = "\
#EXTM3U x-tvg-url=\"http://epg.example/e.xml\"
#EXTINF:-1 tvg-name=\"Pinned\" tvg-logo=\"http://logo.png\" group-title=\"置顶\",Pinned
http://pinned
#EXTINF:-1,CCTV1
http://c1
http://c2
#EXTINF:-1,CCTV2
http://c3
#EXTINF:-1,湖南卫视
http://h1
#EXTINF:-1,Foo
http://f1
";
        assert_eq!(rendered.content, expected);
        assert_eq!(rendered.channel_count, 4);
        assert_eq!(rendered.url_count, 5);
        assert_eq!(rendered.custom_count, 1);
        let counts: Vec<_> = rendered.group_counts.iter().map(|(g, c)| (g.as_str(), *c)).collect();
        assert_eq!(counts, vec![("央视", 2), ("卫视", 1), ("未分类", 1)]);
    }

    #[test]
    fn test_single_url_output() {
        let rendered = generator(false).render(&store(), &[]);
        assert!(rendered.content.contains("http://c1\n"));
        assert!(!rendered.content.contains("http://c2"));
        assert_eq!(rendered.url_count, 4);
    }

    #[test]
    fn test_default_group_not_repeated() {
        let generator = PlaylistGenerator::new(
            header_line(None),
            vec!["未分类".to_string(), "央视".to_string()],
            "未分类".to_string(),
            true,
        );
        assert_eq!(generator.output_groups(), vec!["未分类", "央视"]);
        let rendered = generator.render(&store(), &[]);
        assert_eq!(rendered.content.matches("http://f1").count(), 1);
        // 卫视 is not in the output order
        assert_eq!(rendered.omitted, 1);
        assert!(!rendered.content.contains("湖南卫视"));
    }

    #[test]
    fn test_repeated_group_labels_emit_once() {
        let generator = PlaylistGenerator::new(
            header_line(None),
            vec!["央视".to_string(), "卫视".to_string(), "央视".to_string()],
            "未分类".to_string(),
            true,
        );
        assert_eq!(generator.output_groups(), vec!["央视", "卫视", "未分类"]);

        let rendered = generator.render(&store(), &[]);
        assert_eq!(rendered.channel_count, 4);
        assert_eq!(rendered.omitted, 0);
        assert_eq!(rendered.content.matches("http://c3").count(), 1);
    }

    #[test]
    fn test_empty_store_renders_header_only() {
        let rendered = generator(true).render(&ChannelStore::default(), &[]);
        assert_eq!(rendered.content, "#EXTM3U x-tvg-url=\"http://epg.example/e.xml\"\n");
    }
}
