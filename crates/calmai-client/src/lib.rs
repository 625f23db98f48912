//! calmai-client
//!
//! Typed access to the CalmAI backend, an in-memory stand-in for offline
//! use, and the page loaders that turn several calls into one view.
//!
//! Writes follow one policy: after a mutation the affected list is fetched
//! again in full. Nothing here patches cached collections in place.

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod loaders;
pub mod mutations;
pub mod offline;
pub mod paths;

pub use api::CalmApi;
pub use config::ClientConfig;
pub use error::ClientError;
pub use http::HttpApi;
pub use offline::OfflineApi;
