use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardStats {
    pub total_patients: u32,
    pub total_journals: u32,
    pub total_conversations: u32,
    pub active_patients: u32,
}
