//! Load-time validation of news and posted collections.
//!
//! Every record is checked and all issues are collected, so a broken snapshot
//! reports everything wrong with it in one pass instead of the first problem.
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

use super::platform::Platform;
use super::types::{NewsItem, PostedItem};
use crate::util::validate_absolute_url;

/// How to treat a caption whose platform is missing from the item's
/// `platforms` list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptionPolicy {
    /// Report as a warning. Captions may be drafted ahead for platforms the
    /// item has not been posted to yet.
    #[default]
    Lenient,
    /// Report as an error.
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// What is wrong with a record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IssueKind {
    #[error("id is empty")]
    EmptyId,

    #[error("duplicate id")]
    DuplicateId,

    #[error("news id does not match news-YYYYMMDD-NN")]
    MalformedNewsId,

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("rank {rank} does not follow rank {previous} for date {date}")]
    RankOutOfOrder {
        date: String,
        previous: u32,
        rank: u32,
    },

    #[error("caption key '{0}' is not a recognized platform")]
    UnknownCaptionPlatform(String),

    #[error("caption for '{0}' has no matching entry in platforms")]
    CaptionWithoutPlatform(String),

    #[error("platform '{0}' is not recognized")]
    UnknownPlatform(String),
}

impl IssueKind {
    pub fn severity(&self, policy: CaptionPolicy) -> Severity {
        match self {
            IssueKind::CaptionWithoutPlatform(_) if policy == CaptionPolicy::Strict => {
                Severity::Error
            }
            IssueKind::CaptionWithoutPlatform(_) | IssueKind::UnknownPlatform(_) => {
                Severity::Warning
            }
            _ => Severity::Error,
        }
    }
}

/// A validation finding tied to the record it was found on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Which collection the record belongs to (`news` or `posted`)
    pub collection: &'static str,
    /// Position of the record within its collection
    pub index: usize,
    pub record_id: String,
    pub kind: IssueKind,
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.record_id.is_empty() {
            write!(f, "{}[{}]: {}", self.collection, self.index, self.kind)
        } else {
            write!(
                f,
                "{}[{}] '{}': {}",
                self.collection, self.index, self.record_id, self.kind
            )
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<Issue>,
    pub warnings: Vec<Issue>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    fn push(&mut self, policy: CaptionPolicy, issue: Issue) {
        match issue.kind.severity(policy) {
            Severity::Error => self.errors.push(issue),
            Severity::Warning => self.warnings.push(issue),
        }
    }
}

/// Check both collections against the store invariants.
pub fn validate(news: &[NewsItem], posted: &[PostedItem], policy: CaptionPolicy) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_news(news, policy, &mut report);
    validate_posted(posted, policy, &mut report);
    report
}

fn validate_news(news: &[NewsItem], policy: CaptionPolicy, report: &mut ValidationReport) {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut last_rank: HashMap<&str, u32> = HashMap::new();

    for (index, item) in news.iter().enumerate() {
        let issue = |kind| Issue {
            collection: "news",
            index,
            record_id: item.id.clone(),
            kind,
        };

        if item.id.trim().is_empty() {
            report.push(policy, issue(IssueKind::EmptyId));
        } else {
            if !seen.insert(item.id.as_str()) {
                report.push(policy, issue(IssueKind::DuplicateId));
            }
            if !is_news_id(&item.id) {
                report.push(policy, issue(IssueKind::MalformedNewsId));
            }
        }

        if let Err(e) = validate_absolute_url(&item.url) {
            report.push(policy, issue(IssueKind::InvalidUrl(e.to_string())));
        }

        if let Some(previous) = last_rank.insert(item.date.as_str(), item.rank) {
            if item.rank <= previous {
                report.push(
                    policy,
                    issue(IssueKind::RankOutOfOrder {
                        date: item.date.clone(),
                        previous,
                        rank: item.rank,
                    }),
                );
            }
        }
    }
}

fn validate_posted(posted: &[PostedItem], policy: CaptionPolicy, report: &mut ValidationReport) {
    let mut seen: HashSet<&str> = HashSet::new();

    for (index, item) in posted.iter().enumerate() {
        let issue = |kind| Issue {
            collection: "posted",
            index,
            record_id: item.id.clone(),
            kind,
        };

        if item.id.trim().is_empty() {
            report.push(policy, issue(IssueKind::EmptyId));
        } else if !seen.insert(item.id.as_str()) {
            report.push(policy, issue(IssueKind::DuplicateId));
        }

        for name in &item.platforms {
            if Platform::parse(name).is_none() {
                report.push(policy, issue(IssueKind::UnknownPlatform(name.clone())));
            }
        }

        let published = item.published_platforms();
        for key in item.captions.keys() {
            match Platform::parse(key) {
                None => report.push(policy, issue(IssueKind::UnknownCaptionPlatform(key.clone()))),
                Some(platform) if !published.contains(&platform) => {
                    report.push(policy, issue(IssueKind::CaptionWithoutPlatform(key.clone())))
                }
                Some(_) => {}
            }
        }
    }
}

/// `news-YYYYMMDD-NN`, where the date part is a real calendar date and the
/// sequence has at least two digits.
pub fn is_news_id(id: &str) -> bool {
    let Some(rest) = id.strip_prefix("news-") else {
        return false;
    };
    let Some((date, seq)) = rest.split_once('-') else {
        return false;
    };
    date.len() == 8
        && date.bytes().all(|b| b.is_ascii_digit())
        && NaiveDate::parse_from_str(date, "%Y%m%d").is_ok()
        && seq.len() >= 2
        && seq.bytes().all(|b| b.is_ascii_digit())
}
