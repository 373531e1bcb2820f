//! Hashtag and mention extraction with engagement-weighted scoring.

use indexmap::IndexMap;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use crate::social::models::PostEngagement;

// \w is Unicode-aware in the regex crate, so #café and @日本 tokenize the
// same way ASCII tags do.
static HASHTAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#\w+").unwrap());
static MENTION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@\w+").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicKind {
    Hashtag,
    Mention,
}

/// A scored topic. `count` is raw occurrences; `engagement_score` is the sum
/// of `total_engagements` of every post occurrence that mentioned it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub text: String,
    pub kind: TopicKind,
    pub count: u64,
    pub engagement_score: u64,
}

#[derive(Default)]
struct TopicStats {
    count: u64,
    engagement_score: u64,
}

/// Extract topics from post bodies and tag lists, score them, and return the
/// top `limit` by engagement score.
///
/// Keys are case-sensitive: `#Rust` and `#rust` are distinct topics. Tag-list
/// entries are folded in as `#tag` tokens and merge with inline occurrences
/// of the same spelling. Every occurrence counts, including repeats within a
/// single post.
pub fn trending_topics(posts: &[PostEngagement], limit: usize) -> Vec<Topic> {
    // Insertion order is the tie-break for equal scores, so first-seen
    // topics rank ahead under the stable sort.
    let mut stats: IndexMap<String, TopicStats> = IndexMap::new();

    for post in posts {
        let weight = post.total_engagements();

        for m in HASHTAG_RE.find_iter(&post.content) {
            bump(&mut stats, m.as_str(), weight);
        }
        for m in MENTION_RE.find_iter(&post.content) {
            bump(&mut stats, m.as_str(), weight);
        }
        for tag in &post.tags {
            bump(&mut stats, &format!("#{tag}"), weight);
        }
    }

    let mut topics: Vec<Topic> = stats
        .into_iter()
        .map(|(text, s)| {
            let kind = if text.starts_with('#') {
                TopicKind::Hashtag
            } else {
                TopicKind::Mention
            };
            Topic {
                text,
                kind,
                count: s.count,
                engagement_score: s.engagement_score,
            }
        })
        .collect();

    topics.sort_by(|a, b| b.engagement_score.cmp(&a.engagement_score));
    topics.truncate(limit);
    topics
}

fn bump(stats: &mut IndexMap<String, TopicStats>, token: &str, weight: u64) {
    let entry = stats.entry(token.to_string()).or_default();
    entry.count += 1;
    entry.engagement_score += weight;
}
