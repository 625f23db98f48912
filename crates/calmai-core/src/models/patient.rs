use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Owning therapist.
    pub therapist_id: String,
    pub created_at: jiff::Timestamp,
}
