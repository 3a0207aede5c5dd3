//! Turning raw feed entries into ranked news items.
//!
//! Scoring, pillar assignment and key angles are plain keyword matching over
//! the lower-cased title and summary. An entry that matches any skip keyword
//! is dropped outright.
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::collections::HashSet;

use super::fetcher::FetchResult;
use super::parser::ParsedEntry;
use crate::store::{NewsItem, NewsKind, NewsStatus};
use crate::util::{clean_summary, collapse_whitespace, decode_entities, validate_absolute_url};

const HIGH_SCORE: [&str; 16] = [
    "openai",
    "anthropic",
    "claude",
    "gpt",
    "gemini",
    "llm",
    "chatgpt",
    "ai model",
    "artificial intelligence",
    "machine learning",
    "deep learning",
    "nvidia",
    "sam altman",
    "dario amodei",
    "google ai",
    "meta ai",
];

const MEDIUM_SCORE: [&str; 15] = [
    "startup",
    "funding",
    "billion",
    "million",
    "raise",
    "launch",
    "developer",
    "engineer",
    "software",
    "automation",
    "agent",
    "robotics",
    "chip",
    "compute",
    "data center",
];

const SKIP_KEYWORDS: [&str; 9] = [
    "sports",
    "recipe",
    "fashion",
    "celebrity",
    "movie review",
    "weather",
    "horoscope",
    "politics",
    "election",
];

/// Points per high-value keyword present.
const HIGH_WEIGHT: i32 = 3;
/// Points per medium-value keyword present.
const MEDIUM_WEIGHT: i32 = 1;

/// Assumed age of an entry that carries no date.
const UNDATED_AGE_DAYS: i64 = 2;

/// Title prefix length used to spot the same story in several feeds.
const DEDUPE_PREFIX_CHARS: usize = 40;

/// Display format of news item dates: `Feb 22, 2026`.
pub const DATE_FORMAT: &str = "%b %d, %Y";

/// Default pillar when no other bucket matches.
pub const DEFAULT_PILLAR: &str = "AI & Tech";

/// Angle buckets, checked in order against the lower-cased title.
const ANGLES: [(&[&str], &str); 6] = [
    (
        &["replace", "job", "engineer", "developer", "worker"],
        "Here's what most people are missing: this isn't about AI being smarter — it's about who adapts first.",
    ),
    (
        &["billion", "million", "fund", "raise", "invest"],
        "Follow the money. When this much capital moves in one direction, the market has already decided.",
    ),
    (
        &["vs", "rival", "compete", "beat", "win", "lose"],
        "This isn't just a product war. It's a values war. And that's what makes it interesting.",
    ),
    (
        &["china", "chinese", "beijing"],
        "While everyone watches OpenAI vs Anthropic, the real disruption might be coming from a completely different direction.",
    ),
    (
        &["launch", "release", "announce", "new", "introduce"],
        "What this actually means for the 99% of people who don't read the technical spec.",
    ),
    (
        &["ban", "regulate", "law", "congress", "eu", "government"],
        "Regulation without understanding is just noise. Here's what this actually does (and doesn't do).",
    ),
];

/// Pillar buckets, checked in order against title + summary.
const PILLARS: [(&[&str], &str); 3] = [
    (
        &["startup", "funding", "founder", "vc", "entrepreneur", "business", "revenue"],
        "Entrepreneurship",
    ),
    (
        &["productivity", "workflow", "tool", "habit", "system", "efficiency"],
        "Productivity",
    ),
    (
        &["career", "job", "mindset", "learn", "growth", "skill"],
        "Personal Growth",
    ),
];

/// Tunables for one curation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurateOptions {
    pub top_stories: usize,
    pub max_age_hours: u64,
    pub summary_max_chars: usize,
}

impl Default for CurateOptions {
    fn default() -> Self {
        Self {
            top_stories: 5,
            max_age_hours: 48,
            summary_max_chars: 250,
        }
    }
}

/// A cleaned, scored entry competing for a slot in the news list.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub title: String,
    pub source: String,
    pub url: String,
    pub summary: String,
    pub score: i32,
    pub published: DateTime<Utc>,
    pub pillar: String,
    pub key_angle: String,
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

/// Relevance score; `-1` means the entry must be skipped.
pub fn score_article(title: &str, summary: &str) -> i32 {
    let text = format!("{} {}", title, summary).to_lowercase();
    if contains_any(&text, &SKIP_KEYWORDS) {
        return -1;
    }
    let high = HIGH_SCORE.iter().filter(|k| text.contains(*k)).count() as i32;
    let medium = MEDIUM_SCORE.iter().filter(|k| text.contains(*k)).count() as i32;
    high * HIGH_WEIGHT + medium * MEDIUM_WEIGHT
}

pub fn assign_pillar(title: &str, summary: &str) -> &'static str {
    let text = format!("{} {}", title, summary).to_lowercase();
    PILLARS
        .iter()
        .find(|(keywords, _)| contains_any(&text, keywords))
        .map(|(_, pillar)| *pillar)
        .unwrap_or(DEFAULT_PILLAR)
}

/// Suggested hook line for a post about the story.
pub fn generate_angle(title: &str, source: &str) -> String {
    let lower = title.to_lowercase();
    ANGLES
        .iter()
        .find(|(keywords, _)| contains_any(&lower, keywords))
        .map(|(_, angle)| angle.to_string())
        .unwrap_or_else(|| {
            format!(
                "Via {} — the angle most people will miss when they share this story.",
                source
            )
        })
}

/// Clean and score one entry. `None` if it is untitled, unlinkable, off-topic
/// or older than the cutoff.
pub fn to_candidate(
    entry: &ParsedEntry,
    source: &str,
    now: DateTime<Utc>,
    options: &CurateOptions,
) -> Option<Candidate> {
    let published = entry
        .published
        .unwrap_or_else(|| now - Duration::days(UNDATED_AGE_DAYS));
    // A window too wide for chrono to represent means no cutoff.
    let cutoff = i64::try_from(options.max_age_hours)
        .ok()
        .and_then(Duration::try_hours)
        .and_then(|age| now.checked_sub_signed(age));
    if cutoff.is_some_and(|cutoff| published < cutoff) {
        return None;
    }

    let title = collapse_whitespace(&decode_entities(&entry.title));
    if title.is_empty() {
        return None;
    }

    let url = match entry.link.as_deref().map(validate_absolute_url) {
        Some(Ok(url)) => url.to_string(),
        Some(Err(e)) => {
            tracing::debug!(source = %source, title = %title, error = %e, "Skipping entry with bad link");
            return None;
        }
        None => {
            tracing::debug!(source = %source, title = %title, "Skipping entry without link");
            return None;
        }
    };

    let summary = entry
        .summary
        .as_deref()
        .map(|s| clean_summary(s, options.summary_max_chars))
        .unwrap_or_default();

    let score = score_article(&title, &summary);
    if score < 0 {
        return None;
    }

    Some(Candidate {
        pillar: assign_pillar(&title, &summary).to_string(),
        key_angle: generate_angle(&title, source),
        title,
        source: source.to_string(),
        url,
        summary,
        score,
        published,
    })
}

/// All usable candidates from a set of fetch results. Failed sources
/// contribute nothing.
pub fn collect_candidates(
    results: &[FetchResult],
    now: DateTime<Utc>,
    options: &CurateOptions,
) -> Vec<Candidate> {
    results
        .iter()
        .filter_map(|r| r.result.as_ref().ok().map(|entries| (&r.source, entries)))
        .flat_map(|(source, entries)| {
            entries
                .iter()
                .filter_map(move |entry| to_candidate(entry, &source.name, now, options))
        })
        .collect()
}

fn dedupe_key(title: &str) -> String {
    title
        .chars()
        .take(DEDUPE_PREFIX_CHARS)
        .collect::<String>()
        .to_lowercase()
}

/// Best `n` candidates by score, then recency, one per story.
///
/// The sort is stable, so ties keep their feed order.
pub fn select_top(mut candidates: Vec<Candidate>, n: usize) -> Vec<Candidate> {
    candidates.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| b.published.cmp(&a.published))
    });

    let mut seen = HashSet::new();
    let mut top = Vec::with_capacity(n);
    for candidate in candidates {
        if top.len() >= n {
            break;
        }
        if seen.insert(dedupe_key(&candidate.title)) {
            top.push(candidate);
        }
    }
    top
}

/// News items for the selected stories, ranked from 1 in order.
///
/// Ids use the run date; the display date is each story's own publication
/// date.
pub fn build_news_items(stories: &[Candidate], run_date: NaiveDate) -> Vec<NewsItem> {
    let day = run_date.format("%Y%m%d").to_string();
    stories
        .iter()
        .enumerate()
        .map(|(i, story)| {
            let rank = i as u32 + 1;
            NewsItem {
                id: format!("news-{}-{:02}", day, rank),
                kind: NewsKind::News,
                status: NewsStatus::Inbox,
                date: story.published.format(DATE_FORMAT).to_string(),
                rank,
                title: story.title.clone(),
                source: story.source.clone(),
                url: story.url.clone(),
                summary: story.summary.clone(),
                key_angle: story.key_angle.clone(),
                pillar: story.pillar.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 22, 12, 0, 0).unwrap()
    }

    fn entry(title: &str, hours_ago: Option<i64>) -> ParsedEntry {
        ParsedEntry {
            title: title.to_string(),
            link: Some(format!(
                "https://example.com/{}",
                title.to_lowercase().replace(' ', "-")
            )),
            published: hours_ago.map(|h| now() - Duration::hours(h)),
            summary: None,
        }
    }

    fn candidate(title: &str, score: i32, hours_ago: i64) -> Candidate {
        Candidate {
            title: title.to_string(),
            source: "Test".to_string(),
            url: "https://example.com/x".to_string(),
            summary: String::new(),
            score,
            published: now() - Duration::hours(hours_ago),
            pillar: DEFAULT_PILLAR.to_string(),
            key_angle: String::new(),
        }
    }

    #[test]
    fn test_score_counts_keywords() {
        // openai, anthropic (high) + billion (medium)
        assert_eq!(score_article("OpenAI and Anthropic raise a billion", ""), 3 + 3 + 1 + 1);
        assert_eq!(score_article("Nothing relevant here", "at all"), 0);
    }

    #[test]
    fn test_score_is_case_insensitive_and_uses_summary() {
        assert_eq!(score_article("Big news", "NVIDIA ships a new CHIP"), 3 + 1);
    }

    #[test]
    fn test_skip_keyword_wins() {
        assert_eq!(score_article("OpenAI weighs in on the election", ""), -1);
        assert_eq!(score_article("Claude", "a celebrity recipe"), -1);
    }

    #[test]
    fn test_assign_pillar() {
        assert_eq!(assign_pillar("Startup lands funding", ""), "Entrepreneurship");
        assert_eq!(assign_pillar("A new workflow", ""), "Productivity");
        assert_eq!(assign_pillar("Career advice", ""), "Personal Growth");
        assert_eq!(assign_pillar("Gemini update", "faster answers"), DEFAULT_PILLAR);
        // Earlier bucket wins when several match
        assert_eq!(assign_pillar("Founder skill", ""), "Entrepreneurship");
    }

    #[test]
    fn test_generate_angle_first_match() {
        assert!(generate_angle("AI will replace engineers", "Wired AI").starts_with("Here's what"));
        assert!(generate_angle("Startup raises $50 million", "X").starts_with("Follow the money"));
        assert!(generate_angle("Beijing lab unveils model", "X").starts_with("While everyone"));
    }

    #[test]
    fn test_generate_angle_fallback_mentions_source() {
        assert_eq!(
            generate_angle("Quiet day", "Ars Technica"),
            "Via Ars Technica — the angle most people will miss when they share this story."
        );
    }

    #[test]
    fn test_candidate_cleans_fields() {
        let mut e = entry("OpenAI &amp; friends", Some(1));
        e.summary = Some("<p>Lots of <b>news</b></p>".to_string());
        let c = to_candidate(&e, "Wired AI", now(), &CurateOptions::default()).unwrap();
        assert_eq!(c.title, "OpenAI & friends");
        assert_eq!(c.summary, "Lots of news");
        assert_eq!(c.source, "Wired AI");
        assert_eq!(c.score, 3);
    }

    #[test]
    fn test_candidate_outside_window_dropped() {
        let options = CurateOptions::default();
        assert!(to_candidate(&entry("OpenAI", Some(47)), "S", now(), &options).is_some());
        assert!(to_candidate(&entry("OpenAI", Some(49)), "S", now(), &options).is_none());
    }

    #[test]
    fn test_undated_entry_counts_as_two_days_old() {
        let options = CurateOptions::default();
        let c = to_candidate(&entry("OpenAI", None), "S", now(), &options).unwrap();
        assert_eq!(c.published, now() - Duration::days(2));

        let narrow = CurateOptions {
            max_age_hours: 24,
            ..options
        };
        assert!(to_candidate(&entry("OpenAI", None), "S", now(), &narrow).is_none());
    }

    #[test]
    fn test_huge_age_window_keeps_old_entries() {
        let options = CurateOptions {
            max_age_hours: i64::MAX as u64,
            ..CurateOptions::default()
        };
        let c = to_candidate(&entry("OpenAI", Some(24 * 365 * 10)), "S", now(), &options);
        assert!(c.is_some());

        let unrepresentable = CurateOptions {
            max_age_hours: u64::MAX,
            ..options
        };
        assert!(to_candidate(&entry("OpenAI", Some(1)), "S", now(), &unrepresentable).is_some());
    }

    #[test]
    fn test_untitled_or_unlinked_dropped() {
        let options = CurateOptions::default();
        assert!(to_candidate(&entry("   ", Some(1)), "S", now(), &options).is_none());

        let mut no_link = entry("OpenAI", Some(1));
        no_link.link = None;
        assert!(to_candidate(&no_link, "S", now(), &options).is_none());

        let mut relative = entry("OpenAI", Some(1));
        relative.link = Some("/story".to_string());
        assert!(to_candidate(&relative, "S", now(), &options).is_none());
    }

    #[test]
    fn test_select_top_orders_by_score_then_recency() {
        let picked = select_top(
            vec![
                candidate("low", 1, 1),
                candidate("high old", 6, 10),
                candidate("high new", 6, 2),
                candidate("mid", 3, 1),
            ],
            3,
        );
        let titles: Vec<_> = picked.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["high new", "high old", "mid"]);
    }

    #[test]
    fn test_select_top_dedupes_by_title_prefix() {
        let shared = "Anthropic and OpenAI drop new models within minutes";
        let picked = select_top(
            vec![
                candidate(shared, 9, 1),
                candidate(&shared.to_uppercase(), 9, 2),
                candidate("Something else entirely", 3, 1),
            ],
            5,
        );
        assert_eq!(picked.len(), 2);
        assert_eq!(picked[0].title, shared);
    }

    #[test]
    fn test_build_news_items() {
        let stories = vec![candidate("First", 9, 1), candidate("Second", 3, 30)];
        let items = build_news_items(&stories, NaiveDate::from_ymd_opt(2026, 2, 22).unwrap());

        assert_eq!(items[0].id, "news-20260222-01");
        assert_eq!(items[0].rank, 1);
        assert_eq!(items[0].date, "Feb 22, 2026");
        assert_eq!(items[0].status, NewsStatus::Inbox);
        assert_eq!(items[1].id, "news-20260222-02");
        assert_eq!(items[1].rank, 2);
        assert_eq!(items[1].date, "Feb 21, 2026");
    }

    #[test]
    fn test_display_date_uses_utc_day() {
        let mut late = candidate("Late", 3, 1);
        late.published = DateTime::parse_from_rfc2822("Sun, 01 Mar 2026 23:30:00 -0500")
            .unwrap()
            .with_timezone(&Utc);
        let items = build_news_items(&[late], NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        assert_eq!(items[0].id, "news-20260301-01");
        assert_eq!(items[0].date, "Mar 02, 2026");
    }
}
