//! Filters for the therapist's patient list and the conversation corpus
//! browser. Both feed [`crate::paging::paginate`].

use crate::entries::TopicFilter;
use crate::models::{Conversation, Patient};

/// Case-insensitive match on name or email, sorted by name.
pub fn filter_patients<'a>(patients: &'a [Patient], search: &str) -> Vec<&'a Patient> {
    let needle = search.trim().to_lowercase();
    let mut matched: Vec<&Patient> = patients
        .iter()
        .filter(|p| {
            needle.is_empty()
                || p.name.to_lowercase().contains(&needle)
                || p.email.to_lowercase().contains(&needle)
        })
        .collect();
    matched.sort_by_cached_key(|p| p.name.to_lowercase());
    matched
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationFilter {
    pub search: String,
    pub topic: TopicFilter,
    pub severity: Option<String>,
}

impl ConversationFilter {
    fn matches(&self, conversation: &Conversation, needle: &str) -> bool {
        if let TopicFilter::Only(topic) = &self.topic {
            if conversation.topic != *topic {
                return false;
            }
        }
        if let Some(severity) = &self.severity {
            if !conversation.severity.eq_ignore_ascii_case(severity) {
                return false;
            }
        }
        needle.is_empty()
            || conversation.context.to_lowercase().contains(needle)
            || conversation.response.to_lowercase().contains(needle)
    }
}

/// Corpus records matching topic, severity and free text, in input order.
pub fn filter_conversations<'a>(
    conversations: &'a [Conversation],
    filter: &ConversationFilter,
) -> Vec<&'a Conversation> {
    let needle = filter.search.trim().to_lowercase();
    conversations
        .iter()
        .filter(|c| filter.matches(c, &needle))
        .collect()
}
