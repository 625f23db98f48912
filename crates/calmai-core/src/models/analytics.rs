use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Backend-computed analytics snapshot for one patient.
///
/// Recomputed by the topic pipeline after new entries are classified. The
/// client never mutates it; it only rolls several snapshots together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PatientAnalytics {
    pub patient_id: String,
    pub total_entries: u32,
    pub avg_word_count: f64,
    #[serde(default)]
    pub topic_distribution: Vec<TopicCount>,
    #[serde(default)]
    pub monthly_frequency: Vec<MonthlyCount>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub date_range: Option<DateSpan>,
    #[serde(default)]
    pub representative_entries: Vec<RepresentativeEntry>,
    #[serde(default)]
    pub topics_over_time: Vec<TopicTimePoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TopicCount {
    pub topic: String,
    /// Share of the patient's entries, 0–100. Not verified client-side.
    pub percentage: f64,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MonthlyCount {
    /// `YYYY-MM`.
    pub month: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DateSpan {
    pub first: jiff::Timestamp,
    pub last: jiff::Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RepresentativeEntry {
    pub topic: String,
    pub entry_id: String,
    pub excerpt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TopicTimePoint {
    pub month: String,
    pub topic: String,
    pub count: u32,
}
