/// Social platforms a caption can be written for.
///
/// Captions are keyed by [`Platform::key`] (`linkedin`), while a posted item's
/// `platforms` list uses [`Platform::display_name`] (`LinkedIn`). [`Platform::parse`]
/// accepts either form, case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Platform {
    LinkedIn,
    Twitter,
    Instagram,
    Threads,
    Facebook,
    TikTok,
    YouTube,
    Bluesky,
    Mastodon,
}

impl Platform {
    pub const ALL: [Platform; 9] = [
        Platform::LinkedIn,
        Platform::Twitter,
        Platform::Instagram,
        Platform::Threads,
        Platform::Facebook,
        Platform::TikTok,
        Platform::YouTube,
        Platform::Bluesky,
        Platform::Mastodon,
    ];

    /// Caption map key.
    pub fn key(&self) -> &'static str {
        match self {
            Platform::LinkedIn => "linkedin",
            Platform::Twitter => "twitter",
            Platform::Instagram => "instagram",
            Platform::Threads => "threads",
            Platform::Facebook => "facebook",
            Platform::TikTok => "tiktok",
            Platform::YouTube => "youtube",
            Platform::Bluesky => "bluesky",
            Platform::Mastodon => "mastodon",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::LinkedIn => "LinkedIn",
            Platform::Twitter => "Twitter",
            Platform::Instagram => "Instagram",
            Platform::Threads => "Threads",
            Platform::Facebook => "Facebook",
            Platform::TikTok => "TikTok",
            Platform::YouTube => "YouTube",
            Platform::Bluesky => "Bluesky",
            Platform::Mastodon => "Mastodon",
        }
    }

    /// Parse a caption key or display name.
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "x" | "twitter/x" | "twitter / x" => return Some(Platform::Twitter),
            _ => {}
        }
        Self::ALL
            .into_iter()
            .find(|p| p.key() == lower || p.display_name().to_lowercase() == lower)
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
