use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use jiff::Timestamp;
use jiff::civil::{Date, DateTime};
use jiff::tz::TimeZone;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ts_rs::TS;

use crate::error::CoreError;

/// Topic label the backend assigns while classification is still running.
pub const PROCESSING_TOPIC: &str = "processing";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct JournalEntry {
    pub id: String,
    pub patient_id: String,
    pub content: String,
    #[ts(type = "string")]
    pub created_at: EntryTime,
    #[serde(default)]
    pub word_count: u32,
    /// Self-reported mood, 1 (low) to 5 (high).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub mood: Option<u8>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub days_since_last: Option<u32>,
}

impl JournalEntry {
    /// Calendar day of the entry: the `YYYY-MM-DD` the backend wrote.
    pub fn day(&self) -> Date {
        self.created_at.day()
    }

    pub fn has_topic(&self, topic: &str) -> bool {
        self.topics.iter().any(|t| t == topic)
    }

    /// False while the backend still reports the placeholder topic, or no
    /// topic at all.
    pub fn is_classified(&self) -> bool {
        !self.topics.is_empty() && !self.has_topic(PROCESSING_TOPIC)
    }
}

/// When an entry was written, as the backend serialized it.
///
/// Timestamps carry any UTC offset or none at all; a datetime without an
/// offset is read as UTC. The calendar day is the date prefix of the wire
/// value, so `2026-02-20T01:00:00+05:00` falls on the 20th even though the
/// instant is on the 19th in UTC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryTime {
    instant: Timestamp,
    day: Date,
    raw: String,
}

impl EntryTime {
    pub fn timestamp(&self) -> Timestamp {
        self.instant
    }

    pub fn day(&self) -> Date {
        self.day
    }
}

impl From<Timestamp> for EntryTime {
    fn from(instant: Timestamp) -> Self {
        Self {
            instant,
            day: instant.to_zoned(TimeZone::UTC).date(),
            raw: instant.to_string(),
        }
    }
}

impl FromStr for EntryTime {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let invalid = |e: &dyn fmt::Display| CoreError::InvalidDate(format!("{raw:?}: {e}"));

        let day: Date = raw
            .get(..10)
            .ok_or_else(|| invalid(&"shorter than YYYY-MM-DD"))?
            .parse()
            .map_err(|e| invalid(&e))?;

        let instant = match raw.parse::<Timestamp>() {
            Ok(instant) => instant,
            Err(_) => {
                let civil = if raw.len() == 10 {
                    Ok(day.to_datetime(jiff::civil::Time::midnight()))
                } else {
                    raw.parse::<DateTime>()
                };
                civil
                    .and_then(|dt| dt.to_zoned(TimeZone::UTC))
                    .map_err(|e| invalid(&e))?
                    .timestamp()
            }
        };

        Ok(Self {
            instant,
            day,
            raw: raw.to_string(),
        })
    }
}

impl fmt::Display for EntryTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Ord for EntryTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.instant
            .cmp(&other.instant)
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

impl PartialOrd for EntryTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for EntryTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for EntryTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Body of a create or update request for a journal entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct JournalDraft {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub mood: Option<u8>,
    pub word_count: u32,
}

impl JournalDraft {
    pub fn new(content: impl Into<String>, mood: Option<u8>) -> Result<Self, CoreError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(CoreError::EmptyContent);
        }
        if let Some(m) = mood {
            if !(1..=5).contains(&m) {
                return Err(CoreError::InvalidMood(m));
            }
        }
        let word_count = count_words(&content);
        Ok(Self {
            content,
            mood,
            word_count,
        })
    }
}

pub fn count_words(text: &str) -> u32 {
    text.split_whitespace().count() as u32
}
