//! Topic vocabulary utilities.
//!
//! Extraction output arrives as loosely formatted JSON, several sources may
//! name the same topic with different casing or accents, and some source
//! material (summaries, mind maps) carries its topics as Markdown headings.
//! This module turns all of that into clean [`ExtractedTopic`] lists.

use std::collections::HashMap;

use serde_json::Value;
use topicwise_core::error::{Error, Result};
use topicwise_core::quota::QuotaEntry;
use topicwise_core::topic::{ExtractedTopic, Relevance, Topic};
use tracing::{debug, warn};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Comparison key for a topic label.
///
/// Lowercases, strips combining accents (NFD decomposition) and collapses
/// whitespace runs into single spaces. `"  Esôfago   de Barrett "` becomes
/// `"esofago de barrett"`.
pub fn normalize_topic_name(name: &str) -> String {
    let folded: String = name
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Drop topics whose normalized names collide.
///
/// The first occurrence fixes the position; a later duplicate with a higher
/// relevance replaces it in place.
pub fn deduplicate_topics(topics: Vec<ExtractedTopic>) -> Vec<ExtractedTopic> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<ExtractedTopic> = Vec::new();

    for topic in topics {
        let key = normalize_topic_name(&topic.name);
        match index.get(&key) {
            Some(&i) => {
                if topic.relevance.score() > out[i].relevance.score() {
                    out[i] = topic;
                }
            }
            None => {
                index.insert(key, out.len());
                out.push(topic);
            }
        }
    }
    out
}

/// Merge the topic lists of several sources into one deduplicated list.
pub fn aggregate_topics<I>(sources: I) -> Vec<ExtractedTopic>
where
    I: IntoIterator<Item = Vec<ExtractedTopic>>,
{
    deduplicate_topics(sources.into_iter().flatten().collect())
}

/// Spread `total` items by relevance alone, ignoring history.
///
/// Topics are ordered high, medium, low (stable within a level). With more
/// topics than items, the first `total` topics get one item each. Otherwise
/// items are split evenly and the remainder goes to the most relevant
/// topics.
pub fn relevance_distribution(topics: &[ExtractedTopic], total: usize) -> Vec<QuotaEntry> {
    if topics.is_empty() {
        return Vec::new();
    }

    let mut sorted: Vec<&ExtractedTopic> = topics.iter().collect();
    sorted.sort_by_key(|t| std::cmp::Reverse(t.relevance.score()));

    if topics.len() > total {
        debug!(
            topics = topics.len(),
            total, "More topics than items; keeping the most relevant"
        );
        return sorted
            .into_iter()
            .take(total)
            .map(|t| QuotaEntry::new(t.name.clone(), 1))
            .collect();
    }

    let base = total / topics.len();
    let remainder = total % topics.len();
    sorted
        .into_iter()
        .enumerate()
        .map(|(i, t)| QuotaEntry::new(t.name.clone(), base + usize::from(i < remainder)))
        .collect()
}

/// Parse the extractor's reply into topics.
///
/// Accepts `{"topics": [...]}` or a bare array, optionally wrapped in a
/// Markdown code fence or surrounded by prose. Entries without a string
/// `name` (or with a blank one) are dropped, names are trimmed, unknown
/// relevance becomes medium, and `mention_count` is kept only when
/// positive.
pub fn parse_extraction_response(reply: &str) -> Result<Vec<ExtractedTopic>> {
    let value = parse_lenient_json(reply)?;

    let items = match &value {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("topics") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(Error::Internal(
                    "extraction reply has no \"topics\" array".into(),
                ));
            }
        },
        _ => {
            return Err(Error::Internal(
                "extraction reply is neither an object nor an array".into(),
            ));
        }
    };

    let topics: Vec<ExtractedTopic> = items.iter().filter_map(topic_from_value).collect();
    if topics.len() < items.len() {
        warn!(
            dropped = items.len() - topics.len(),
            "Dropped extraction entries without a usable name"
        );
    }
    Ok(topics)
}

fn topic_from_value(value: &Value) -> Option<ExtractedTopic> {
    let name = value.get("name")?.as_str()?.trim();
    if name.is_empty() {
        return None;
    }
    let relevance = value
        .get("relevance")
        .and_then(Value::as_str)
        .map(|r| Relevance::from(r.to_string()))
        .unwrap_or_default();
    let mention_count = value
        .get("mention_count")
        .and_then(Value::as_u64)
        .filter(|&n| n > 0)
        .and_then(|n| u32::try_from(n).ok());

    Some(ExtractedTopic {
        name: name.to_string(),
        relevance,
        mention_count,
    })
}

/// Raw JSON first, then the body of a code fence, then the outermost
/// `{...}` or `[...]` span.
fn parse_lenient_json(reply: &str) -> Result<Value> {
    let trimmed = reply.trim();
    if let Ok(v) = serde_json::from_str(trimmed) {
        return Ok(v);
    }

    if let Some(body) = fenced_body(trimmed) {
        if let Ok(v) = serde_json::from_str(body) {
            return Ok(v);
        }
    }

    let start = trimmed.find(['{', '[']);
    let end = trimmed.rfind(['}', ']']);
    match (start, end) {
        (Some(s), Some(e)) if s < e => Ok(serde_json::from_str(&trimmed[s..=e])?),
        _ => Err(Error::Internal("no JSON found in extraction reply".into())),
    }
}

fn fenced_body(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after = &text[open + 3..];
    // Skip an info string such as `json`.
    let body_start = after.find('\n').map_or(0, |i| i + 1);
    let body = &after[body_start..];
    let close = body.rfind("```")?;
    Some(body[..close].trim())
}

/// Source topics carried as Markdown headings.
///
/// Collects ATX headings (`#` through `max_level` hashes, followed by
/// whitespace) in document order. Summaries use `##` only; mind maps use
/// levels one to three. Blank headings and `#hashtag` lines are skipped.
pub fn extract_heading_topics(markdown: &str, min_level: usize, max_level: usize) -> Vec<Topic> {
    markdown
        .lines()
        .filter_map(|line| {
            let line = line.trim_start();
            let level = line.chars().take_while(|&c| c == '#').count();
            if level < min_level.max(1) || level > max_level {
                return None;
            }
            let rest = &line[level..];
            if !rest.starts_with(char::is_whitespace) {
                return None;
            }
            let title = rest.trim().trim_end_matches('#').trim();
            (!title.is_empty()).then(|| title.to_string())
        })
        .collect()
}
