//! Backend endpoint paths, relative to the API base URL.
//!
//! Pure string functions. These define the HTTP contract the client
//! consumes.

pub const LOGIN: &str = "/auth/login";
pub const SIGNUP: &str = "/auth/signup";
pub const ME: &str = "/auth/me";

pub const PATIENTS: &str = "/patients";
pub const JOURNALS: &str = "/journals";
pub const DASHBOARD_STATS: &str = "/dashboard/stats";
pub const CONVERSATIONS: &str = "/conversations";
pub const PROMPTS: &str = "/prompts";
pub const MY_PROMPTS: &str = "/prompts/mine";
pub const INVITES: &str = "/invites";
pub const SEARCH: &str = "/search";

pub const ACCOUNT: &str = "/account";
pub const PROFILE: &str = "/account/profile";
pub const PASSWORD: &str = "/account/password";
pub const NOTIFICATIONS: &str = "/account/notifications";

pub fn patient(id: &str) -> String {
    format!("/patients/{id}")
}

pub fn patient_journals(id: &str) -> String {
    format!("/patients/{id}/journals")
}

pub fn patient_analytics(id: &str) -> String {
    format!("/patients/{id}/analytics")
}

pub fn patient_prompts(id: &str) -> String {
    format!("/patients/{id}/prompts")
}

pub fn journal(id: &str) -> String {
    format!("/journals/{id}")
}

pub fn prompt_answer(id: &str) -> String {
    format!("/prompts/{id}/answer")
}
