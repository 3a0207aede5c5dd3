/// A named RSS/Atom feed to pull stories from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSource {
    /// Shown as the `source` of every news item taken from this feed.
    pub name: String,
    pub url: String,
}

impl FeedSource {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Free public AI/tech feeds used when the config lists none.
pub fn default_sources() -> Vec<FeedSource> {
    vec![
        FeedSource::new(
            "TechCrunch AI",
            "https://techcrunch.com/category/artificial-intelligence/feed/",
        ),
        FeedSource::new(
            "The Verge AI",
            "https://www.theverge.com/ai-artificial-intelligence/rss/index.xml",
        ),
        FeedSource::new("VentureBeat AI", "https://venturebeat.com/category/ai/feed/"),
        FeedSource::new("Wired AI", "https://www.wired.com/feed/tag/ai/latest/rss"),
        FeedSource::new(
            "Ars Technica",
            "https://feeds.arstechnica.com/arstechnica/technology-lab",
        ),
    ]
}
