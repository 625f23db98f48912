use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Single-use code a therapist hands to a new patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InviteCode {
    pub code: String,
    pub therapist_id: String,
    pub created_at: jiff::Timestamp,
    pub expires_at: jiff::Timestamp,
    #[serde(default)]
    pub used: bool,
}

impl InviteCode {
    pub fn is_redeemable(&self, now: jiff::Timestamp) -> bool {
        !self.used && now < self.expires_at
    }
}
