pub mod account;
pub mod analytics;
pub mod conversation;
pub mod dashboard;
pub mod invite;
pub mod journal;
pub mod patient;
pub mod prompt;
pub mod search;
pub mod therapist;
pub mod user;

pub use analytics::{
    DateSpan, MonthlyCount, PatientAnalytics, RepresentativeEntry, TopicCount, TopicTimePoint,
};
pub use conversation::Conversation;
pub use dashboard::DashboardStats;
pub use invite::InviteCode;
pub use journal::{EntryTime, JournalDraft, JournalEntry, PROCESSING_TOPIC};
pub use patient::Patient;
pub use prompt::{PromptStatus, TherapistPrompt};
pub use search::{SearchHit, SearchResponse};
pub use therapist::Therapist;
pub use user::{Role, User};
