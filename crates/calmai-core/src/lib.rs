//! calmai-core
//!
//! Pure domain types and the client-side derivations built on them:
//! writing streaks, the journal entry filter/sort/paginate pipeline and
//! the analytics rollups shown on dashboard summary cards.
//! No HTTP dependency; this is the shared vocabulary of the CalmAI client.

pub mod browse;
pub mod entries;
pub mod error;
pub mod fetched;
pub mod fixtures;
pub mod models;
pub mod paging;
pub mod rollup;
pub mod streak;
