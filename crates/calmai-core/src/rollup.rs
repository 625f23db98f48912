//! Client-side rollups over backend analytics snapshots.
//!
//! Every function here is order-independent: the same set of inputs gives
//! the same output whatever order a map or fan-out produced them in.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::fetched::Fetched;
use crate::models::{Conversation, JournalEntry, MonthlyCount, PatientAnalytics, SearchHit};

/// Dashboard summary card values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RollupSummary {
    pub patients: u32,
    pub patients_with_data: u32,
    pub total_entries: u64,
    /// Mean of per-patient average word counts, over patients with data.
    pub average_word_count: f64,
}

/// A label and how many items carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TopicBucket {
    pub label: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TopicShare {
    pub label: String,
    pub count: u64,
    /// `count / total * 100`, 0 when the total is 0.
    pub percentage: f64,
}

/// Sum entries and average word counts across patients.
///
/// `Missing` records add nothing to the sums and are left out of the
/// average's denominator.
pub fn summarize<'a, I>(records: I) -> RollupSummary
where
    I: IntoIterator<Item = &'a Fetched<PatientAnalytics>>,
{
    let mut patients = 0u32;
    let mut total_entries = 0u64;
    let mut word_counts = Vec::new();

    for record in records {
        patients += 1;
        if let Fetched::Ready(analytics) = record {
            total_entries += u64::from(analytics.total_entries);
            word_counts.push(analytics.avg_word_count);
        }
    }

    // Float addition is not associative; sum in a canonical order.
    word_counts.sort_by(f64::total_cmp);
    let patients_with_data = word_counts.len() as u32;
    let average_word_count = if word_counts.is_empty() {
        0.0
    } else {
        word_counts.iter().sum::<f64>() / word_counts.len() as f64
    };

    RollupSummary {
        patients,
        patients_with_data,
        total_entries,
        average_word_count,
    }
}

/// Turn bucket counts into percentage shares of their sum.
pub fn bucket_percentages(buckets: &[TopicBucket]) -> Vec<TopicShare> {
    let total_hits: u64 = buckets.iter().map(|b| b.count).sum();
    buckets
        .iter()
        .map(|b| TopicShare {
            label: b.label.clone(),
            count: b.count,
            percentage: if total_hits == 0 {
                0.0
            } else {
                b.count as f64 / total_hits as f64 * 100.0
            },
        })
        .collect()
}

/// Count labels into buckets, largest first, ties by label.
pub fn count_labels<'a, I>(labels: I) -> Vec<TopicBucket>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for label in labels {
        *counts.entry(label).or_default() += 1;
    }
    into_sorted_buckets(counts.into_iter().map(|(l, c)| (l.to_string(), c)))
}

fn into_sorted_buckets(counts: impl Iterator<Item = (String, u64)>) -> Vec<TopicBucket> {
    let mut buckets: Vec<TopicBucket> = counts
        .map(|(label, count)| TopicBucket { label, count })
        .collect();
    buckets.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    buckets
}

/// Merge every patient's topic counts into one corpus-wide distribution.
pub fn combine_topic_distribution<'a, I>(records: I) -> Vec<TopicShare>
where
    I: IntoIterator<Item = &'a Fetched<PatientAnalytics>>,
{
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for analytics in records.into_iter().filter_map(Fetched::as_ready) {
        for topic in &analytics.topic_distribution {
            *counts.entry(topic.topic.clone()).or_default() += u64::from(topic.count);
        }
    }
    bucket_percentages(&into_sorted_buckets(counts.into_iter()))
}

/// Merge monthly entry histograms, ordered by month.
pub fn combine_monthly_frequency<'a, I>(records: I) -> Vec<MonthlyCount>
where
    I: IntoIterator<Item = &'a Fetched<PatientAnalytics>>,
{
    let mut months: BTreeMap<String, u32> = BTreeMap::new();
    for analytics in records.into_iter().filter_map(Fetched::as_ready) {
        for m in &analytics.monthly_frequency {
            *months.entry(m.month.clone()).or_default() += m.count;
        }
    }
    months
        .into_iter()
        .map(|(month, count)| MonthlyCount { month, count })
        .collect()
}

pub fn conversation_topic_buckets(conversations: &[Conversation]) -> Vec<TopicBucket> {
    count_labels(conversations.iter().map(|c| c.topic.as_str()))
}

pub fn hit_topic_buckets(hits: &[SearchHit]) -> Vec<TopicBucket> {
    count_labels(hits.iter().map(|h| h.topic.as_str()))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MoodSummary {
    pub rated_entries: u32,
    /// `None` when no entry carries a mood.
    pub average: Option<f64>,
    /// Entry counts for moods 1 through 5.
    pub histogram: [u32; 5],
}

/// Average and histogram of mood scores. Out-of-range scores are ignored.
pub fn mood_summary(entries: &[JournalEntry]) -> MoodSummary {
    let mut histogram = [0u32; 5];
    let mut sum = 0u64;
    let mut rated_entries = 0u32;

    for mood in entries.iter().filter_map(|e| e.mood) {
        if (1..=5).contains(&mood) {
            histogram[usize::from(mood - 1)] += 1;
            sum += u64::from(mood);
            rated_entries += 1;
        }
    }

    MoodSummary {
        rated_entries,
        average: (rated_entries > 0).then(|| sum as f64 / f64::from(rated_entries)),
        histogram,
    }
}
