use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A reflection prompt a therapist assigns to a patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TherapistPrompt {
    pub id: String,
    pub therapist_id: String,
    pub patient_id: String,
    pub question: String,
    pub status: PromptStatus,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub response: Option<String>,
    pub created_at: jiff::Timestamp,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub answered_at: Option<jiff::Timestamp>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PromptStatus {
    Pending,
    Answered,
}

impl TherapistPrompt {
    pub fn is_pending(&self) -> bool {
        self.status == PromptStatus::Pending
    }
}
