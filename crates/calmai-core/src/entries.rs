//! Journal entry search, topic and date filtering, chronological sort and
//! pagination.
//!
//! The pipeline runs in a fixed order: free-text search, topic filter,
//! date range, sort, page slice. Every setter that narrows or widens the
//! filtered set moves the query back to the first page.

use std::borrow::Borrow;
use std::str::FromStr;

use jiff::civil::Date;

use crate::models::JournalEntry;
use crate::paging::{Page, paginate};

/// Page size of the patient's own journal list.
pub const JOURNAL_PAGE_SIZE: usize = 10;

/// Page size of the therapist's per-patient journal view.
pub const PATIENT_VIEW_PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TopicFilter {
    #[default]
    All,
    Only(String),
}

impl TopicFilter {
    pub fn matches(&self, topics: &[String]) -> bool {
        match self {
            TopicFilter::All => true,
            TopicFilter::Only(label) => topics.iter().any(|t| t == label),
        }
    }
}

impl FromStr for TopicFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            Ok(TopicFilter::All)
        } else {
            Ok(TopicFilter::Only(s.to_string()))
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// View state of a journal list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryQuery {
    search: String,
    topic: TopicFilter,
    date_from: Option<Date>,
    date_to: Option<Date>,
    sort: SortOrder,
    page: usize,
    page_size: usize,
}

impl Default for EntryQuery {
    fn default() -> Self {
        Self::new(JOURNAL_PAGE_SIZE)
    }
}

impl EntryQuery {
    pub fn new(page_size: usize) -> Self {
        Self {
            search: String::new(),
            topic: TopicFilter::All,
            date_from: None,
            date_to: None,
            sort: SortOrder::Desc,
            page: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn topic(&self) -> &TopicFilter {
        &self.topic
    }

    pub fn date_range(&self) -> (Option<Date>, Option<Date>) {
        (self.date_from, self.date_to)
    }

    pub fn sort(&self) -> SortOrder {
        self.sort
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page = 0;
    }

    pub fn set_topic(&mut self, topic: TopicFilter) {
        self.topic = topic;
        self.page = 0;
    }

    pub fn set_date_range(&mut self, from: Option<Date>, to: Option<Date>) {
        self.date_from = from;
        self.date_to = to;
        self.page = 0;
    }

    /// Re-sorting keeps the current page.
    pub fn set_sort(&mut self, sort: SortOrder) {
        self.sort = sort;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 0;
    }

    /// Clear search, topic and date range.
    pub fn clear_filters(&mut self) {
        self.search.clear();
        self.topic = TopicFilter::All;
        self.date_from = None;
        self.date_to = None;
        self.page = 0;
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.set_search(search);
        self
    }

    pub fn with_topic(mut self, topic: TopicFilter) -> Self {
        self.set_topic(topic);
        self
    }

    pub fn with_date_range(mut self, from: Option<Date>, to: Option<Date>) -> Self {
        self.set_date_range(from, to);
        self
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.set_sort(sort);
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.set_page(page);
        self
    }

    fn matches(&self, entry: &JournalEntry, needle: &str) -> bool {
        if !needle.is_empty() && !entry.content.to_lowercase().contains(needle) {
            return false;
        }
        if !self.topic.matches(&entry.topics) {
            return false;
        }
        if self.date_from.is_some() || self.date_to.is_some() {
            let day = entry.day();
            if self.date_from.is_some_and(|from| day < from) {
                return false;
            }
            if self.date_to.is_some_and(|to| day > to) {
                return false;
            }
        }
        true
    }
}

/// Apply search, topic and date range, preserving input order.
pub fn filter_entries<'a>(
    entries: &'a [JournalEntry],
    query: &EntryQuery,
) -> Vec<&'a JournalEntry> {
    let needle = query.search.trim().to_lowercase();
    entries
        .iter()
        .filter(|e| query.matches(e, &needle))
        .collect()
}

/// Stable sort by `created_at`. Entries with equal timestamps keep their
/// relative input order in both directions.
pub fn sort_entries<E: Borrow<JournalEntry>>(entries: &mut [E], order: SortOrder) {
    match order {
        SortOrder::Asc => entries.sort_by_key(|e| e.borrow().created_at.timestamp()),
        SortOrder::Desc => {
            entries.sort_by_key(|e| std::cmp::Reverse(e.borrow().created_at.timestamp()))
        }
    }
}

/// Run the full pipeline and return the requested page.
pub fn query_entries<'a>(
    entries: &'a [JournalEntry],
    query: &EntryQuery,
) -> Page<&'a JournalEntry> {
    let mut filtered = filter_entries(entries, query);
    sort_entries(&mut filtered, query.sort);
    paginate(filtered, query.page, query.page_size)
}

/// Distinct classified topics across `entries`, sorted, for filter pickers.
pub fn topic_options(entries: &[JournalEntry]) -> Vec<String> {
    let set: std::collections::BTreeSet<&str> = entries
        .iter()
        .flat_map(|e| e.topics.iter())
        .map(String::as_str)
        .filter(|t| *t != crate::models::PROCESSING_TOPIC)
        .collect();
    set.into_iter().map(str::to_string).collect()
}
