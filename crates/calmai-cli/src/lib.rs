//! calmai-cli
//!
//! Terminal client for CalmAI. Every command maps to an app route and is
//! checked against the session's route guard before it runs, so therapists
//! and patients see the same boundaries they do in the web app.

pub mod backend;
pub mod cli;
pub mod commands;
pub mod config;
