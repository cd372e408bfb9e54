//! `#EXTINF` metadata line helpers
//!
//! A metadata line looks like
//!
//! ```text
//! #EXTINF:-1 tvg-id="cctv1" tvg-name="CCTV-1" group-title="News",CCTV-1 综合
//! ```
//!
//! The title separator is the first comma outside a quoted attribute value.
//! Everything before it is the head (duration and attributes), everything
//! after it is the display title. Edits work on the original text so that
//! attributes this tool does not know about survive untouched.

use regex::{Captures, Regex};
use std::sync::OnceLock;

pub const EXTINF_PREFIX: &str = "#EXTINF";
pub const HEADER_PREFIX: &str = "#EXTM3U";

pub const TVG_ID: &str = "tvg-id";
pub const TVG_NAME: &str = "tvg-name";
pub const TVG_LOGO: &str = "tvg-logo";
pub const GROUP_TITLE: &str = "group-title";

/// Misspelled attribute keys seen in the wild and their correct form
pub const KEY_REPAIRS: &[(&str, &str)] = &[
    ("svg-name", TVG_NAME),
    ("svg-id", TVG_ID),
    ("svg-logo", TVG_LOGO),
    ("tvg_name", TVG_NAME),
    ("tvg_id", TVG_ID),
    ("tvg_logo", TVG_LOGO),
    ("group_title", GROUP_TITLE),
];

fn attribute_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"([A-Za-z0-9_-]+)="([^"]*)""#).ok())
        .as_ref()
}

fn repair_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        let keys = KEY_REPAIRS
            .iter()
            .map(|(wrong, _)| regex::escape(wrong))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!(r"(?i)(^|[\s:,])({keys})=")).ok()
    })
    .as_ref()
}

/// ASCII case-insensitive prefix test
fn starts_with_ignore_case(line: &str, prefix: &str) -> bool {
    line.len() >= prefix.len()
        && line.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

pub fn is_extinf(line: &str) -> bool {
    starts_with_ignore_case(line, EXTINF_PREFIX)
}

pub fn is_header(line: &str) -> bool {
    starts_with_ignore_case(line, HEADER_PREFIX)
}

/// Byte offset of the title separator comma
pub fn title_separator(line: &str) -> Option<usize> {
    let mut in_quotes = false;
    for (idx, ch) in line.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => return Some(idx),
            _ => {}
        }
    }
    None
}

/// Split into head and optional title
fn split(line: &str) -> (&str, Option<&str>) {
    match title_separator(line) {
        Some(idx) => (&line[..idx], Some(&line[idx + 1..])),
        None => (line, None),
    }
}

/// Display title after the separator, trimmed; `None` when absent or blank
pub fn title(line: &str) -> Option<&str> {
    split(line).1.map(str::trim).filter(|t| !t.is_empty())
}

/// Rewrite misspelled attribute keys in the head, only where they appear as `key=`
pub fn repair_keys(line: &str) -> String {
    let Some(re) = repair_regex() else {
        return line.to_string();
    };

    let (head, title) = split(line);
    let repaired = re.replace_all(head, |caps: &Captures| {
        let wrong = caps[2].to_ascii_lowercase();
        let fixed = KEY_REPAIRS
            .iter()
            .find(|(k, _)| *k == wrong)
            .map(|(_, v)| *v)
            .unwrap_or(&caps[2]);
        format!("{}{}=", &caps[1], fixed)
    });

    match title {
        Some(title) => format!("{repaired},{title}"),
        None => repaired.into_owned(),
    }
}

/// Quoted attributes from the head of the line, in order
pub fn attributes(line: &str) -> Vec<(String, String)> {
    let (head, _) = split(line);
    let Some(re) = attribute_regex() else {
        return Vec::new();
    };
    re.captures_iter(head)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .collect()
}

/// Value of an attribute, key compared case-insensitively
pub fn attribute(line: &str, key: &str) -> Option<String> {
    attributes(line)
        .into_iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v)
}

/// Non-blank attribute value, trimmed
pub fn non_empty_attribute(line: &str, key: &str) -> Option<String> {
    attribute(line, key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn has_attribute(line: &str, key: &str) -> bool {
    attribute(line, key).is_some()
}

/// Make a value safe to place inside double quotes
pub fn sanitize_value(value: &str) -> String {
    value.replace('"', "'")
}

/// Replace an attribute's value, or insert it before the title separator
pub fn set_attribute(line: &str, key: &str, value: &str) -> String {
    let value = sanitize_value(value);
    let (head, title) = split(line);

    let existing = attribute_regex().and_then(|re| {
        re.captures_iter(head)
            .find(|caps| caps[1].eq_ignore_ascii_case(key))
            .and_then(|caps| caps.get(2))
            .map(|m| m.range())
    });

    let new_head = match existing {
        Some(range) => format!("{}{}{}", &head[..range.start], value, &head[range.end..]),
        None => format!("{} {}=\"{}\"", head.trim_end(), key, value),
    };

    match title {
        Some(title) => format!("{new_head},{title}"),
        None => new_head,
    }
}

/// Replace the display title, adding a separator when there is none
pub fn set_title(line: &str, new_title: &str) -> String {
    let (head, _) = split(line);
    format!("{},{}", head, new_title.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const LINE: &str =
        r#"#EXTINF:-1 tvg-id="cctv1" tvg-name="CCTV-1" group-title="News, Live",CCTV-1 综合"#;

    #[rstest]
    #[case("#EXTINF:-1,Foo", true)]
    #[case("#extinf:0 tvg-id=\"x\",Foo", true)]
    #[case("#EXTM3U", false)]
    #[case("http://example.com", false)]
    #[case("#EXT", false)]
    fn test_is_extinf(#[case] line: &str, #[case] expected: bool) {
        assert_eq!(is_extinf(line), expected);
    }

    #[test]
    fn test_separator_skips_quoted_commas() {
        let idx = title_separator(LINE).unwrap();
        assert_eq!(&LINE[idx + 1..], "CCTV-1 综合");
        assert_eq!(title(LINE), Some("CCTV-1 综合"));
    }

    #[test]
    fn test_title_with_commas_is_kept_whole() {
        let line = r#"#EXTINF:-1 tvg-id="a",News, Weather, Sport"#;
        assert_eq!(title(line), Some("News, Weather, Sport"));
    }

    #[rstest]
    #[case("#EXTINF:-1 tvg-id=\"a\"", None)]
    #[case("#EXTINF:-1 tvg-id=\"a\",   ", None)]
    #[case("#EXTINF:-1,Foo ", Some("Foo"))]
    fn test_title_edge_cases(#[case] line: &str, #[case] expected: Option<&str>) {
        assert_eq!(title(line), expected);
    }

    #[test]
    fn test_attributes_only_come_from_head() {
        let line = r#"#EXTINF:-1 tvg-id="a",Title tvg-name="not-an-attr""#;
        assert_eq!(attribute(line, TVG_ID).as_deref(), Some("a"));
        assert_eq!(attribute(line, TVG_NAME), None);
    }

    #[test]
    fn test_attribute_lookup_is_case_insensitive() {
        let line = r#"#EXTINF:-1 TVG-NAME="Foo",Bar"#;
        assert_eq!(attribute(line, TVG_NAME).as_deref(), Some("Foo"));
        assert!(has_attribute(line, "tvg-name"));
    }

    #[test]
    fn test_non_empty_attribute_filters_blanks() {
        let line = r#"#EXTINF:-1 tvg-name="  " tvg-id="x",Bar"#;
        assert_eq!(non_empty_attribute(line, TVG_NAME), None);
        assert_eq!(non_empty_attribute(line, TVG_ID).as_deref(), Some("x"));
    }

    #[rstest]
    #[case(r#"#EXTINF:-1 svg-name="A",A"#, r#"#EXTINF:-1 tvg-name="A",A"#)]
    #[case(r#"#EXTINF:-1 svg-id="a" tvg_logo="l",A"#, r#"#EXTINF:-1 tvg-id="a" tvg-logo="l",A"#)]
    #[case(r#"#EXTINF:-1 group_title="G",A"#, r#"#EXTINF:-1 group-title="G",A"#)]
    #[case(r#"#EXTINF:-1 SVG-ID="a",A"#, r#"#EXTINF:-1 tvg-id="a",A"#)]
    fn test_repair_keys(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(repair_keys(input), expected);
    }

    #[rstest]
    #[case("#EXTINF:-1,Show tvg_id=5")]
    #[case(r#"#EXTINF:-1 tvg-id="a",News, svg-name=x"#)]
    fn test_repair_leaves_title_alone(#[case] line: &str) {
        assert_eq!(repair_keys(line), line);
    }

    #[test]
    fn test_repair_keeps_title_after_fixing_head() {
        assert_eq!(
            repair_keys(r#"#EXTINF:-1 tvg_id="a",Show tvg_id=5"#),
            r#"#EXTINF:-1 tvg-id="a",Show tvg_id=5"#
        );
    }

    #[test]
    fn test_repair_ignores_non_key_positions() {
        let line = r#"#EXTINF:-1 tvg-name="svg-id=5",my-svg-id=thing"#;
        assert_eq!(repair_keys(line), line);
    }

    #[test]
    fn test_set_attribute_replaces_existing() {
        let updated = set_attribute(LINE, GROUP_TITLE, "央视");
        assert_eq!(
            updated,
            r#"#EXTINF:-1 tvg-id="cctv1" tvg-name="CCTV-1" group-title="央视",CCTV-1 综合"#
        );
    }

    #[test]
    fn test_set_attribute_inserts_before_separator() {
        let updated = set_attribute("#EXTINF:-1,Foo", GROUP_TITLE, "Bar");
        assert_eq!(updated, r#"#EXTINF:-1 group-title="Bar",Foo"#);

        let no_title = set_attribute("#EXTINF:-1", TVG_ID, "x");
        assert_eq!(no_title, r#"#EXTINF:-1 tvg-id="x""#);
    }

    #[test]
    fn test_set_attribute_sanitizes_quotes() {
        let updated = set_attribute("#EXTINF:-1,Foo", TVG_NAME, r#"The "Best""#);
        assert_eq!(updated, r#"#EXTINF:-1 tvg-name="The 'Best'",Foo"#);
        assert_eq!(title(&updated), Some("Foo"));
    }

    #[test]
    fn test_set_title() {
        assert_eq!(set_title(LINE, "CCTV1").rsplit(',').next(), Some("CCTV1"));
        assert_eq!(set_title("#EXTINF:-1", "Foo"), "#EXTINF:-1,Foo");
    }
}
