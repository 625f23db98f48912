use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A record from the counselling conversation corpus. Read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Conversation {
    pub id: String,
    pub context: String,
    pub response: String,
    pub topic: String,
    pub severity: String,
}
