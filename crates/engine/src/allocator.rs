//! Deficit-weighted quota allocation.
//!
//! Splits a batch of `total` items across a topic vocabulary so that topics
//! which appeared less in recent sessions get more of the batch.
//!
//! # Algorithm
//!
//! - **Cold start** (no history): even split; the first `total % n` topics
//!   in list order get one extra item.
//! - **Warm start**:
//!   1. deficit = [`NEVER_SEEN_DEFICIT`] for unseen topics, `1 / (c + 1)`
//!      for topics seen `c` times;
//!   2. stable sort by descending deficit;
//!   3. quota = `max(1, round(deficit / Σdeficit · total))`;
//!   4. fix the rounding drift: shave surplus from the lowest-priority
//!      topics (never below 1 while any topic is above 1, then dropping
//!      lowest-priority topics to 0), or hand out the shortfall one by one
//!      from the highest-priority topic, cyclically;
//!   5. drop zero quotas.
//!
//! The result always sums exactly to `total`. The correction loop is greedy
//! and O(total), which is fine for batches of tens of items.

use topicwise_core::error::AllocationError;
use topicwise_core::quota::{QuotaEntry, TopicFrequencyMap};
use topicwise_core::topic::Topic;
use tracing::debug;

/// Deficit assigned to topics with no recent occurrences; dwarfs any
/// `1 / (c + 1)` so unseen topics always come first.
pub const NEVER_SEEN_DEFICIT: f64 = 999.0;

/// Distribute `total` items over `topics`, favouring topics under-represented
/// in `history`.
///
/// Returns entries with quota > 0 only: list order on cold start, priority
/// order on warm start.
///
/// # Errors
/// [`AllocationError::NoTopics`] when `topics` is empty, since there is no
/// sensible distribution target.
pub fn allocate<T: AsRef<str>>(
    topics: &[T],
    history: &TopicFrequencyMap,
    total: usize,
) -> Result<Vec<QuotaEntry>, AllocationError> {
    if topics.is_empty() {
        return Err(AllocationError::NoTopics { total });
    }
    if total == 0 {
        return Ok(Vec::new());
    }

    let entries = if history.is_empty() {
        uniform(topics, total)
    } else {
        deficit_weighted(topics, history, total)
    };

    Ok(entries.into_iter().filter(|e| e.quota > 0).collect())
}

/// Topics from `topics` that have no occurrences in `history`.
pub fn uncovered_by_history<T: AsRef<str>>(topics: &[T], history: &TopicFrequencyMap) -> Vec<Topic> {
    topics
        .iter()
        .map(|t| t.as_ref())
        .filter(|t| history.get(*t).copied().unwrap_or(0) == 0)
        .map(str::to_string)
        .collect()
}

fn uniform<T: AsRef<str>>(topics: &[T], total: usize) -> Vec<QuotaEntry> {
    let n = topics.len();
    let base = total / n;
    let remainder = total % n;

    topics
        .iter()
        .enumerate()
        .map(|(i, t)| QuotaEntry::new(t.as_ref(), base + usize::from(i < remainder)))
        .collect()
}

struct Scored<'a> {
    topic: &'a str,
    previous: usize,
    deficit: f64,
}

fn deficit_score(previous: usize) -> f64 {
    if previous == 0 {
        NEVER_SEEN_DEFICIT
    } else {
        1.0 / (previous as f64 + 1.0)
    }
}

fn deficit_weighted<T: AsRef<str>>(
    topics: &[T],
    history: &TopicFrequencyMap,
    total: usize,
) -> Vec<QuotaEntry> {
    let mut scored: Vec<Scored<'_>> = topics
        .iter()
        .map(|t| {
            let topic = t.as_ref();
            let previous = history.get(topic).copied().unwrap_or(0);
            Scored {
                topic,
                previous,
                deficit: deficit_score(previous),
            }
        })
        .collect();

    // sort_by is stable: equal deficits keep list order.
    scored.sort_by(|a, b| b.deficit.total_cmp(&a.deficit));

    debug!(
        top = %scored
            .iter()
            .take(5)
            .map(|s| format!("{}[{}]", s.topic, s.previous))
            .collect::<Vec<_>>()
            .join(", "),
        "Deficit priority"
    );

    let total_deficit: f64 = scored.iter().map(|s| s.deficit).sum();
    let mut quotas: Vec<usize> = scored
        .iter()
        .map(|s| {
            // f64::round rounds half away from zero.
            let proportional = (s.deficit / total_deficit * total as f64).round() as usize;
            proportional.max(1)
        })
        .collect();

    correct_to_total(&mut quotas, total);

    scored
        .iter()
        .zip(quotas)
        .map(|(s, quota)| QuotaEntry::new(s.topic, quota))
        .collect()
}

/// Adjust priority-ordered `quotas` until they sum to `total`.
fn correct_to_total(quotas: &mut [usize], total: usize) {
    let mut sum: usize = quotas.iter().sum();

    while sum > total {
        // Lowest priority first; keep every topic at 1 as long as possible,
        // then let the lowest-priority ones drop out entirely.
        let victim = quotas
            .iter()
            .rposition(|&q| q > 1)
            .or_else(|| quotas.iter().rposition(|&q| q > 0));
        match victim {
            Some(i) => {
                quotas[i] -= 1;
                sum -= 1;
            }
            None => break,
        }
    }

    if quotas.is_empty() {
        return;
    }
    let mut i = 0;
    while sum < total {
        quotas[i % quotas.len()] += 1;
        sum += 1;
        i += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use topicwise_core::quota::total_quota;

    fn history(pairs: &[(&str, usize)]) -> TopicFrequencyMap {
        pairs.iter().map(|(t, c)| (t.to_string(), *c)).collect()
    }

    fn quota_of(entries: &[QuotaEntry], topic: &str) -> usize {
        entries.iter().find(|e| e.topic == topic).map_or(0, |e| e.quota)
    }

    #[test]
    fn empty_topics_is_an_error() {
        let topics: Vec<String> = vec![];
        let err = allocate(&topics, &TopicFrequencyMap::new(), 10).unwrap_err();
        assert_eq!(err, AllocationError::NoTopics { total: 10 });
    }

    #[test]
    fn zero_total_is_empty() {
        let result = allocate(&["A", "B"], &history(&[("A", 2)]), 0).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn cold_start_gives_extra_to_first_topics() {
        let result = allocate(&["A", "B", "C"], &TopicFrequencyMap::new(), 10).unwrap();
        assert_eq!(
            result,
            vec![
                QuotaEntry::new("A", 4),
                QuotaEntry::new("B", 3),
                QuotaEntry::new("C", 3),
            ]
        );
    }

    #[test]
    fn cold_start_divisible_is_even() {
        let result = allocate(&["A", "B", "C", "D"], &TopicFrequencyMap::new(), 20).unwrap();
        assert!(result.iter().all(|e| e.quota == 5));
    }

    #[test]
    fn cold_start_small_total_drops_tail_topics() {
        let result = allocate(&["A", "B", "C", "D", "E"], &TopicFrequencyMap::new(), 3).unwrap();
        let topics: Vec<&str> = result.iter().map(|e| e.topic.as_str()).collect();
        assert_eq!(topics, vec!["A", "B", "C"]);
        assert_eq!(total_quota(&result), 3);
    }

    #[test]
    fn never_seen_topic_gets_more() {
        let result = allocate(&["A", "B"], &history(&[("A", 5), ("B", 0)]), 10).unwrap();
        assert_eq!(total_quota(&result), 10);
        assert!(quota_of(&result, "B") > quota_of(&result, "A"));
        assert_eq!(result[0].topic, "B");
    }

    #[test]
    fn every_topic_gets_at_least_one_when_total_allows() {
        let result = allocate(
            &["A", "B", "C", "D"],
            &history(&[("A", 1), ("B", 1), ("C", 1)]),
            10,
        )
        .unwrap();
        // D is unseen and takes the bulk; the rest keep one each.
        assert_eq!(quota_of(&result, "D"), 7);
        assert_eq!(quota_of(&result, "A"), 1);
        assert_eq!(quota_of(&result, "B"), 1);
        assert_eq!(quota_of(&result, "C"), 1);
    }

    #[test]
    fn seen_topics_weighted_by_inverse_count() {
        let result = allocate(&["A", "B"], &history(&[("A", 1), ("B", 3)]), 6).unwrap();
        // deficits 1/2 and 1/4 → 4 and 2
        assert_eq!(quota_of(&result, "A"), 4);
        assert_eq!(quota_of(&result, "B"), 2);
    }

    #[test]
    fn shortfall_goes_to_highest_priority_first() {
        // Three equal deficits, total 4: round(4/3) = 1 each, one short.
        let result = allocate(&["A", "B", "C"], &history(&[("X", 1)]), 4).unwrap();
        assert_eq!(quota_of(&result, "A"), 2);
        assert_eq!(quota_of(&result, "B"), 1);
        assert_eq!(quota_of(&result, "C"), 1);
    }

    #[test]
    fn warm_small_total_drops_lowest_priority() {
        let result = allocate(
            &["A", "B", "C", "D"],
            &history(&[("A", 4), ("B", 2)]),
            2,
        )
        .unwrap();
        // Priority: C, D (unseen), B, A.
        let topics: Vec<&str> = result.iter().map(|e| e.topic.as_str()).collect();
        assert_eq!(topics, vec!["C", "D"]);
        assert_eq!(total_quota(&result), 2);
    }

    #[test]
    fn equal_deficits_keep_list_order() {
        let result = allocate(&["Z", "Y", "X"], &history(&[("Q", 2)]), 3).unwrap();
        let topics: Vec<&str> = result.iter().map(|e| e.topic.as_str()).collect();
        assert_eq!(topics, vec!["Z", "Y", "X"]);
    }

    #[test]
    fn uncovered_lists_unseen_and_zero() {
        let uncovered = uncovered_by_history(&["A", "B", "C"], &history(&[("A", 2), ("B", 0)]));
        assert_eq!(uncovered, vec!["B".to_string(), "C".to_string()]);
    }

    #[test]
    fn correction_handles_overshoot() {
        let mut quotas = vec![5, 3, 1, 1];
        correct_to_total(&mut quotas, 7);
        assert_eq!(quotas, vec![4, 1, 1, 1]);
    }

    fn arb_case() -> impl Strategy<Value = (Vec<String>, TopicFrequencyMap, usize)> {
        (1usize..=50).prop_flat_map(|n| {
            (
                prop::collection::vec(0usize..6, n),
                any::<bool>(),
                0usize..=200,
            )
                .prop_map(move |(counts, cold, total)| {
                    let topics: Vec<String> = (0..n).map(|i| format!("topic-{i}")).collect();
                    let history: TopicFrequencyMap = if cold {
                        TopicFrequencyMap::new()
                    } else {
                        topics
                            .iter()
                            .zip(&counts)
                            .map(|(t, c)| (t.clone(), *c))
                            .chain(std::iter::once(("elsewhere".to_string(), 1)))
                            .collect()
                    };
                    (topics, history, total)
                })
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn prop_sum_is_exact((topics, history, total) in arb_case()) {
            let result = allocate(&topics, &history, total).unwrap();
            prop_assert_eq!(total_quota(&result), total);
            prop_assert!(result.iter().all(|e| e.quota > 0));
        }

        #[test]
        fn prop_unseen_never_below_seen((topics, history, total) in arb_case()) {
            let result = allocate(&topics, &history, total).unwrap();
            if !history.is_empty() {
                for unseen in topics.iter().filter(|t| history.get(*t).copied().unwrap_or(0) == 0) {
                    for seen in topics.iter().filter(|t| history.get(*t).copied().unwrap_or(0) > 0) {
                        prop_assert!(quota_of(&result, unseen) >= quota_of(&result, seen));
                    }
                }
            }
        }

        #[test]
        fn prop_cold_start_even_when_divisible(n in 1usize..=20, per in 0usize..=10) {
            let topics: Vec<String> = (0..n).map(|i| format!("t{i}")).collect();
            let result = allocate(&topics, &TopicFrequencyMap::new(), n * per).unwrap();
            prop_assert!(result.iter().all(|e| e.quota == per));
        }
    }
}
