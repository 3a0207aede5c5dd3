use chrono::{DateTime, Utc};
use feed_rs::parser;

/// One entry of an RSS or Atom feed, before any cleanup.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedEntry {
    pub title: String,
    pub link: Option<String>,
    /// Published date, falling back to the updated date.
    pub published: Option<DateTime<Utc>>,
    /// Raw summary, possibly containing HTML.
    pub summary: Option<String>,
}

/// Parse feed XML, keeping at most `limit` entries in document order.
pub fn parse_feed(bytes: &[u8], limit: usize) -> Result<Vec<ParsedEntry>, parser::ParseFeedError> {
    let feed = parser::parse(bytes)?;

    let entries = feed
        .entries
        .into_iter()
        .take(limit)
        .map(|entry| {
            let link = entry
                .links
                .first()
                .map(|l| l.href.trim().to_string())
                .filter(|href| !href.is_empty());
            let published = entry.published.or(entry.updated);
            let summary = entry
                .summary
                .map(|s| s.content)
                .or_else(|| entry.content.and_then(|c| c.body));
            let title = entry
                .title
                .map(|t| t.content.trim().to_string())
                .unwrap_or_default();

            ParsedEntry {
                title,
                link,
                published,
                summary,
            }
        })
        .collect();

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const RSS: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
    <title>Example</title>
    <item>
        <title>  OpenAI launches a new model  </title>
        <link>https://example.com/openai-model</link>
        <description>&lt;p&gt;OpenAI released &lt;b&gt;GPT&lt;/b&gt; today.&lt;/p&gt;</description>
        <pubDate>Sat, 21 Feb 2026 14:30:00 GMT</pubDate>
    </item>
    <item>
        <title>Undated story</title>
        <link>https://example.com/undated</link>
    </item>
    <item>
        <link>https://example.com/untitled</link>
    </item>
</channel></rss>"#;

    const ATOM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
    <title>Atom Example</title>
    <id>urn:example</id>
    <updated>2026-02-21T10:00:00Z</updated>
    <entry>
        <title>Anthropic ships Claude update</title>
        <id>urn:example:1</id>
        <link href="https://example.com/claude"/>
        <updated>2026-02-21T10:00:00Z</updated>
        <content type="html">Full body text</content>
    </entry>
</feed>"#;

    #[test]
    fn test_parse_rss_entries() {
        let entries = parse_feed(RSS.as_bytes(), 20).unwrap();
        assert_eq!(entries.len(), 3);

        let first = &entries[0];
        assert_eq!(first.title, "OpenAI launches a new model");
        assert_eq!(first.link.as_deref(), Some("https://example.com/openai-model"));
        assert_eq!(
            first.published,
            Some(Utc.with_ymd_and_hms(2026, 2, 21, 14, 30, 0).unwrap())
        );
        assert!(first.summary.as_deref().unwrap().contains("GPT"));

        assert_eq!(entries[1].published, None);
        assert_eq!(entries[2].title, "");
    }

    #[test]
    fn test_limit_keeps_first_entries() {
        let entries = parse_feed(RSS.as_bytes(), 1).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "OpenAI launches a new model");
    }

    #[test]
    fn test_parse_atom_falls_back_to_updated_and_content() {
        let entries = parse_feed(ATOM.as_bytes(), 20).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].published,
            Some(Utc.with_ymd_and_hms(2026, 2, 21, 10, 0, 0).unwrap())
        );
        assert_eq!(entries[0].summary.as_deref(), Some("Full body text"));
    }

    #[test]
    fn test_invalid_xml_is_error() {
        assert!(parse_feed(b"<not valid xml", 20).is_err());
    }
}
