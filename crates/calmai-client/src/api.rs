use std::future::Future;
use std::pin::Pin;

use calmai_core::models::account::{NotificationSettings, PasswordChange, ProfileUpdate};
use calmai_core::models::{
    Conversation, DashboardStats, InviteCode, JournalDraft, JournalEntry, Patient,
    PatientAnalytics, SearchResponse, TherapistPrompt, User,
};

use crate::error::ClientError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub type ApiResult<'a, T> = BoxFuture<'a, Result<T, ClientError>>;

/// The CalmAI backend as seen by one signed-in user.
///
/// Implemented over HTTP by [`crate::HttpApi`] and in memory by
/// [`crate::OfflineApi`]. Methods return boxed futures for dyn
/// compatibility.
pub trait CalmApi: Send + Sync {
    // --- Patients (therapist) ---
    fn patients(&self) -> ApiResult<'_, Vec<Patient>>;

    fn patient<'a>(&'a self, id: &'a str) -> ApiResult<'a, Patient>;

    fn remove_patient<'a>(&'a self, id: &'a str) -> ApiResult<'a, ()>;

    fn patient_journals<'a>(&'a self, patient_id: &'a str) -> ApiResult<'a, Vec<JournalEntry>>;

    fn patient_analytics<'a>(&'a self, patient_id: &'a str) -> ApiResult<'a, PatientAnalytics>;

    fn dashboard_stats(&self) -> ApiResult<'_, DashboardStats>;

    // --- Journal (patient) ---
    fn my_journals(&self) -> ApiResult<'_, Vec<JournalEntry>>;

    fn create_journal<'a>(&'a self, draft: &'a JournalDraft) -> ApiResult<'a, JournalEntry>;

    fn update_journal<'a>(
        &'a self,
        id: &'a str,
        draft: &'a JournalDraft,
    ) -> ApiResult<'a, JournalEntry>;

    fn delete_journal<'a>(&'a self, id: &'a str) -> ApiResult<'a, ()>;

    // --- Prompts ---
    fn patient_prompts<'a>(&'a self, patient_id: &'a str) -> ApiResult<'a, Vec<TherapistPrompt>>;

    fn my_prompts(&self) -> ApiResult<'_, Vec<TherapistPrompt>>;

    fn create_prompt<'a>(
        &'a self,
        patient_id: &'a str,
        question: &'a str,
    ) -> ApiResult<'a, TherapistPrompt>;

    fn answer_prompt<'a>(
        &'a self,
        prompt_id: &'a str,
        response: &'a str,
    ) -> ApiResult<'a, TherapistPrompt>;

    // --- Invites ---
    fn invite_codes(&self) -> ApiResult<'_, Vec<InviteCode>>;

    fn create_invite(&self) -> ApiResult<'_, InviteCode>;

    // --- Corpus ---
    fn conversations(&self) -> ApiResult<'_, Vec<Conversation>>;

    fn search<'a>(&'a self, query: &'a str, top_k: usize) -> ApiResult<'a, SearchResponse>;

    // --- Account ---
    fn update_profile<'a>(&'a self, update: &'a ProfileUpdate) -> ApiResult<'a, User>;

    fn change_password<'a>(&'a self, change: &'a PasswordChange) -> ApiResult<'a, ()>;

    fn delete_account(&self) -> ApiResult<'_, ()>;

    fn notification_settings(&self) -> ApiResult<'_, NotificationSettings>;

    fn update_notification_settings<'a>(
        &'a self,
        settings: &'a NotificationSettings,
    ) -> ApiResult<'a, NotificationSettings>;
}
