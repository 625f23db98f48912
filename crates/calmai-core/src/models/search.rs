use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// One retrieved passage from the conversation corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SearchHit {
    pub conversation_id: String,
    pub text: String,
    pub topic: String,
    pub score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SearchResponse {
    pub query: String,
    pub hits: Vec<SearchHit>,
    /// Generated answer grounded in the hits, when the backend produced one.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub answer: Option<String>,
}
