//! Plain `name,url` lists to M3U lines
//!
//! Many public lists are published as text with one `name,url` pair per line
//! and `Genre,#genre#` section markers. Section markers carry no channel and
//! are dropped; grouping is decided later by the group rules.

use tracing::debug;

use super::extinf::{self, GROUP_TITLE, TVG_ID, TVG_NAME};

const GENRE_MARKER: &str = "#genre#";

/// Whether content is already an M3U playlist
///
/// Decided by the first non-blank line only.
pub fn is_m3u(content: &str) -> bool {
    content
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(|l| extinf::is_header(l) || extinf::is_extinf(l))
        .unwrap_or(false)
}

/// Convert text lines into metadata/URL line pairs
pub fn convert<S: AsRef<str>>(lines: &[S], default_group: &str) -> Vec<String> {
    let group = extinf::sanitize_value(default_group);
    let mut out = Vec::with_capacity(lines.len() * 2);
    let mut dropped = 0usize;

    for line in lines {
        let line = line.as_ref().trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((name, url)) = line.split_once(',') else {
            dropped += 1;
            continue;
        };
        let (name, url) = (name.trim(), url.trim());
        if name.is_empty() || url.is_empty() || url.eq_ignore_ascii_case(GENRE_MARKER) {
            dropped += 1;
            continue;
        }

        let attr_name = extinf::sanitize_value(name);
        out.push(format!(
            "#EXTINF:-1 {TVG_ID}=\"{attr_name}\" {TVG_NAME}=\"{attr_name}\" {GROUP_TITLE}=\"{group}\",{name}"
        ));
        out.push(url.to_string());
    }

    if dropped > 0 {
        debug!("Dropped {} text lines without a name,url pair", dropped);
    }

    out
}

/// Convert whole text content, returning playlist text
pub fn convert_content(content: &str, default_group: &str) -> String {
    let lines: Vec<&str> = content.lines().collect();
    convert(&lines, default_group).join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("#EXTM3U\n#EXTINF:-1,A\nhttp://a", true)]
    #[case("\n\n  #extm3u x-tvg-url=\"e\"", true)]
    #[case("#EXTINF:-1,A\nhttp://a", true)]
    #[case("CCTV1,http://a", false)]
    #[case("央视,#genre#\nCCTV1,http://a", false)]
    #[case("", false)]
    fn test_is_m3u(#[case] content: &str, #[case] expected: bool) {
        assert_eq!(is_m3u(content), expected);
    }

    #[test]
    fn test_convert_pairs() {
        let out = convert(&["CCTV1, http://a/1 ", "湖南卫视,http://b/2"], "未分类");
        assert_eq!(
            out,
            vec![
                r#"#EXTINF:-1 tvg-id="CCTV1" tvg-name="CCTV1" group-title="未分类",CCTV1"#,
                "http://a/1",
                r#"#EXTINF:-1 tvg-id="湖南卫视" tvg-name="湖南卫视" group-title="未分类",湖南卫视"#,
                "http://b/2",
            ]
        );
    }

    #[test]
    fn test_convert_drops_noise() {
        let out = convert(
            &[
                "",
                "# comment",
                "央视频道,#genre#",
                "no comma here",
                ",http://nameless",
                "urlless,",
                "Good,http://ok",
            ],
            "X",
        );
        assert_eq!(out.len(), 2);
        assert_eq!(out[1], "http://ok");
    }

    #[test]
    fn test_url_keeps_later_commas() {
        let out = convert(&["A,http://x/?a=1,2"], "X");
        assert_eq!(out[1], "http://x/?a=1,2");
    }

    #[test]
    fn test_quotes_in_names_stay_well_formed() {
        let out = convert(&["The \"Best\",http://x"], "X");
        assert!(out[0].starts_with(r#"#EXTINF:-1 tvg-id="The 'Best'""#));
        assert!(out[0].ends_with(r#",The "Best""#));
    }
}
