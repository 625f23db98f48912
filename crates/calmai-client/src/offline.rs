//! In-memory backend seeded from [`calmai_core::fixtures`].
//!
//! Used by the CLI's `--offline` mode and by tests. It enforces the same
//! ownership rules the real API does (therapists see their own patients,
//! patients see their own journal) so callers exercise realistic failures.

use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard};

use calmai_auth::error::AuthError;
use calmai_auth::provider::{AuthGrant, BoxFuture, Credentials, IdentityProvider, SignupRequest};
use calmai_core::fixtures;
use calmai_core::models::account::{NotificationSettings, PasswordChange, ProfileUpdate};
use calmai_core::models::{
    Conversation, DashboardStats, InviteCode, JournalDraft, JournalEntry, PROCESSING_TOPIC, Patient,
    PatientAnalytics, PromptStatus, Role, SearchHit, SearchResponse, Therapist, TherapistPrompt,
    User,
};
use jiff::{SignedDuration, Timestamp};
use tracing::debug;

use crate::api::{ApiResult, CalmApi};
use crate::error::ClientError;

const TOKEN_PREFIX: &str = "offline.";
const INVITE_LIFETIME: SignedDuration = SignedDuration::from_hours(24 * 30);

struct OfflineData {
    user: User,
    /// Practice details of the signed-in therapist; `None` for patients.
    therapist: Option<Therapist>,
    deleted: bool,
    patients: Vec<Patient>,
    entries: Vec<JournalEntry>,
    analytics: Vec<PatientAnalytics>,
    prompts: Vec<TherapistPrompt>,
    invites: Vec<InviteCode>,
    conversations: Vec<Conversation>,
    stats: DashboardStats,
    notifications: NotificationSettings,
    next_id: u64,
}

impl OfflineData {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}{}", self.next_id)
    }

    fn owns_patient(&self, patient_id: &str) -> bool {
        self.patients
            .iter()
            .any(|p| p.id == patient_id && p.therapist_id == self.user.id)
    }

    fn analytics_mut(&mut self, patient_id: &str) -> Option<&mut PatientAnalytics> {
        self.analytics.iter_mut().find(|a| a.patient_id == patient_id)
    }
}

pub struct OfflineApi {
    data: Mutex<OfflineData>,
    missing_analytics: BTreeSet<String>,
    unreachable: bool,
}

impl OfflineApi {
    /// Fixture data set, acting as `user`.
    pub fn new(user: User) -> Self {
        let therapist = match user.role {
            Role::Therapist if user.id == fixtures::THERAPIST_ID => Some(fixtures::therapist()),
            Role::Therapist => Some(Therapist {
                id: user.id.clone(),
                name: user.name.clone(),
                email: user.email.clone(),
                license_number: None,
                specialization: None,
                created_at: Timestamp::now(),
            }),
            Role::Patient => None,
        };
        let data = OfflineData {
            user,
            therapist,
            deleted: false,
            patients: fixtures::patients(),
            entries: fixtures::journal_entries(),
            analytics: fixtures::patient_analytics(),
            prompts: fixtures::prompts(),
            invites: fixtures::invite_codes(),
            conversations: fixtures::conversations(),
            stats: fixtures::dashboard_stats(),
            notifications: NotificationSettings::default(),
            next_id: 100,
        };
        Self {
            data: Mutex::new(data),
            missing_analytics: BTreeSet::new(),
            unreachable: false,
        }
    }

    pub fn therapist() -> Self {
        Self::new(fixtures::therapist_user())
    }

    pub fn patient() -> Self {
        Self::new(fixtures::patient_user())
    }

    /// Analytics requests for these patients fail as if the backend had
    /// not computed them yet.
    pub fn without_analytics_for<I, S>(mut self, patient_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.missing_analytics
            .extend(patient_ids.into_iter().map(Into::into));
        self
    }

    /// Every request fails with a connection error.
    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    pub fn user(&self) -> User {
        self.data().user.clone()
    }

    pub fn therapist_profile(&self) -> Option<Therapist> {
        self.data().therapist.clone()
    }

    fn data(&self) -> MutexGuard<'_, OfflineData> {
        self.data.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Lock the data after checking reachability and, when given, the role.
    fn access(&self, role: Option<Role>) -> Result<MutexGuard<'_, OfflineData>, ClientError> {
        if self.unreachable {
            return Err(ClientError::Connection("offline fixtures".to_string()));
        }
        let data = self.data();
        if data.deleted {
            return Err(ClientError::Unauthorized);
        }
        if let Some(role) = role {
            if data.user.role != role {
                return Err(ClientError::Status {
                    status: 403,
                    body: format!("requires the {role} role"),
                });
            }
        }
        Ok(data)
    }
}

fn respond<'a, T: Send + 'a>(result: Result<T, ClientError>) -> ApiResult<'a, T> {
    Box::pin(std::future::ready(result))
}

fn days_between(earlier: Timestamp, later: Timestamp) -> u32 {
    let seconds = later.as_second().saturating_sub(earlier.as_second()).max(0);
    u32::try_from(seconds / 86_400).unwrap_or(u32::MAX)
}

impl CalmApi for OfflineApi {
    fn patients(&self) -> ApiResult<'_, Vec<Patient>> {
        respond(self.access(Some(Role::Therapist)).map(|data| {
            data.patients
                .iter()
                .filter(|p| p.therapist_id == data.user.id)
                .cloned()
                .collect()
        }))
    }

    fn patient<'a>(&'a self, id: &'a str) -> ApiResult<'a, Patient> {
        respond(self.access(Some(Role::Therapist)).and_then(|data| {
            data.patients
                .iter()
                .find(|p| p.id == id && p.therapist_id == data.user.id)
                .cloned()
                .ok_or_else(|| ClientError::NotFound(format!("patient {id}")))
        }))
    }

    fn remove_patient<'a>(&'a self, id: &'a str) -> ApiResult<'a, ()> {
        respond(self.access(Some(Role::Therapist)).and_then(|mut data| {
            if !data.owns_patient(id) {
                return Err(ClientError::NotFound(format!("patient {id}")));
            }
            let removed_entries = data
                .analytics
                .iter()
                .find(|a| a.patient_id == id)
                .map_or(0, |a| a.total_entries);

            data.patients.retain(|p| p.id != id);
            data.entries.retain(|e| e.patient_id != id);
            data.analytics.retain(|a| a.patient_id != id);
            data.prompts.retain(|p| p.patient_id != id);
            data.stats.total_patients = data.stats.total_patients.saturating_sub(1);
            data.stats.total_journals = data.stats.total_journals.saturating_sub(removed_entries);
            debug!(patient_id = id, "patient removed");
            Ok(())
        }))
    }

    fn patient_journals<'a>(&'a self, patient_id: &'a str) -> ApiResult<'a, Vec<JournalEntry>> {
        respond(self.access(Some(Role::Therapist)).and_then(|data| {
            if !data.owns_patient(patient_id) {
                return Err(ClientError::NotFound(format!("patient {patient_id}")));
            }
            Ok(data
                .entries
                .iter()
                .filter(|e| e.patient_id == patient_id)
                .cloned()
                .collect())
        }))
    }

    fn patient_analytics<'a>(&'a self, patient_id: &'a str) -> ApiResult<'a, PatientAnalytics> {
        respond(self.access(Some(Role::Therapist)).and_then(|data| {
            if !data.owns_patient(patient_id) || self.missing_analytics.contains(patient_id) {
                return Err(ClientError::NotFound(format!("analytics for {patient_id}")));
            }
            data.analytics
                .iter()
                .find(|a| a.patient_id == patient_id)
                .cloned()
                .ok_or_else(|| ClientError::NotFound(format!("analytics for {patient_id}")))
        }))
    }

    fn dashboard_stats(&self) -> ApiResult<'_, DashboardStats> {
        respond(self.access(Some(Role::Therapist)).map(|data| data.stats.clone()))
    }

    fn my_journals(&self) -> ApiResult<'_, Vec<JournalEntry>> {
        respond(self.access(Some(Role::Patient)).map(|data| {
            data.entries
                .iter()
                .filter(|e| e.patient_id == data.user.id)
                .cloned()
                .collect()
        }))
    }

    fn create_journal<'a>(&'a self, draft: &'a JournalDraft) -> ApiResult<'a, JournalEntry> {
        respond(self.access(Some(Role::Patient)).map(|mut data| {
            let now = Timestamp::now();
            let patient_id = data.user.id.clone();
            let days_since_last = data
                .entries
                .iter()
                .filter(|e| e.patient_id == patient_id)
                .map(|e| e.created_at.timestamp())
                .max()
                .map(|last| days_between(last, now));

            let entry = JournalEntry {
                id: data.next_id("j"),
                patient_id: patient_id.clone(),
                content: draft.content.clone(),
                created_at: now.into(),
                word_count: draft.word_count,
                mood: draft.mood,
                topics: vec![PROCESSING_TOPIC.to_string()],
                days_since_last,
            };
            data.entries.insert(0, entry.clone());
            if let Some(analytics) = data.analytics_mut(&patient_id) {
                analytics.total_entries += 1;
            }
            data.stats.total_journals += 1;
            debug!(entry_id = %entry.id, "journal entry created");
            entry
        }))
    }

    fn update_journal<'a>(
        &'a self,
        id: &'a str,
        draft: &'a JournalDraft,
    ) -> ApiResult<'a, JournalEntry> {
        respond(self.access(Some(Role::Patient)).and_then(|mut data| {
            let owner = data.user.id.clone();
            let entry = data
                .entries
                .iter_mut()
                .find(|e| e.id == id && e.patient_id == owner)
                .ok_or_else(|| ClientError::NotFound(format!("journal entry {id}")))?;
            entry.content = draft.content.clone();
            entry.word_count = draft.word_count;
            entry.mood = draft.mood;
            // Edited text is classified again.
            entry.topics = vec![PROCESSING_TOPIC.to_string()];
            Ok(entry.clone())
        }))
    }

    fn delete_journal<'a>(&'a self, id: &'a str) -> ApiResult<'a, ()> {
        respond(self.access(Some(Role::Patient)).and_then(|mut data| {
            let owner = data.user.id.clone();
            let before = data.entries.len();
            data.entries.retain(|e| !(e.id == id && e.patient_id == owner));
            if data.entries.len() == before {
                return Err(ClientError::NotFound(format!("journal entry {id}")));
            }
            if let Some(analytics) = data.analytics_mut(&owner) {
                analytics.total_entries = analytics.total_entries.saturating_sub(1);
            }
            data.stats.total_journals = data.stats.total_journals.saturating_sub(1);
            Ok(())
        }))
    }

    fn patient_prompts<'a>(&'a self, patient_id: &'a str) -> ApiResult<'a, Vec<TherapistPrompt>> {
        respond(self.access(Some(Role::Therapist)).and_then(|data| {
            if !data.owns_patient(patient_id) {
                return Err(ClientError::NotFound(format!("patient {patient_id}")));
            }
            Ok(data
                .prompts
                .iter()
                .filter(|p| p.patient_id == patient_id)
                .cloned()
                .collect())
        }))
    }

    fn my_prompts(&self) -> ApiResult<'_, Vec<TherapistPrompt>> {
        respond(self.access(Some(Role::Patient)).map(|data| {
            data.prompts
                .iter()
                .filter(|p| p.patient_id == data.user.id)
                .cloned()
                .collect()
        }))
    }

    fn create_prompt<'a>(
        &'a self,
        patient_id: &'a str,
        question: &'a str,
    ) -> ApiResult<'a, TherapistPrompt> {
        respond(self.access(Some(Role::Therapist)).and_then(|mut data| {
            if question.trim().is_empty() {
                return Err(ClientError::Invalid("prompt question is empty".to_string()));
            }
            if !data.owns_patient(patient_id) {
                return Err(ClientError::NotFound(format!("patient {patient_id}")));
            }
            let prompt = TherapistPrompt {
                id: data.next_id("q"),
                therapist_id: data.user.id.clone(),
                patient_id: patient_id.to_string(),
                question: question.trim().to_string(),
                status: PromptStatus::Pending,
                response: None,
                created_at: Timestamp::now(),
                answered_at: None,
            };
            data.prompts.push(prompt.clone());
            Ok(prompt)
        }))
    }

    fn answer_prompt<'a>(
        &'a self,
        prompt_id: &'a str,
        response: &'a str,
    ) -> ApiResult<'a, TherapistPrompt> {
        respond(self.access(Some(Role::Patient)).and_then(|mut data| {
            if response.trim().is_empty() {
                return Err(ClientError::Invalid("response is empty".to_string()));
            }
            let owner = data.user.id.clone();
            let prompt = data
                .prompts
                .iter_mut()
                .find(|p| p.id == prompt_id && p.patient_id == owner)
                .ok_or_else(|| ClientError::NotFound(format!("prompt {prompt_id}")))?;
            if !prompt.is_pending() {
                return Err(ClientError::Invalid("prompt already answered".to_string()));
            }
            prompt.status = PromptStatus::Answered;
            prompt.response = Some(response.trim().to_string());
            prompt.answered_at = Some(Timestamp::now());
            Ok(prompt.clone())
        }))
    }

    fn invite_codes(&self) -> ApiResult<'_, Vec<InviteCode>> {
        respond(self.access(Some(Role::Therapist)).map(|data| {
            data.invites
                .iter()
                .filter(|i| i.therapist_id == data.user.id)
                .cloned()
                .collect()
        }))
    }

    fn create_invite(&self) -> ApiResult<'_, InviteCode> {
        respond(self.access(Some(Role::Therapist)).map(|mut data| {
            let now = Timestamp::now();
            data.next_id += 1;
            let invite = InviteCode {
                code: format!("CALM-{:04X}", data.next_id),
                therapist_id: data.user.id.clone(),
                created_at: now,
                expires_at: now + INVITE_LIFETIME,
                used: false,
            };
            data.invites.push(invite.clone());
            invite
        }))
    }

    fn conversations(&self) -> ApiResult<'_, Vec<Conversation>> {
        respond(self.access(None).map(|data| data.conversations.clone()))
    }

    /// Keyword overlap stands in for vector similarity.
    fn search<'a>(&'a self, query: &'a str, top_k: usize) -> ApiResult<'a, SearchResponse> {
        respond(self.access(None).map(|data| {
            let terms: Vec<String> = query
                .split_whitespace()
                .map(|t| t.to_lowercase())
                .collect();
            let mut hits: Vec<SearchHit> = data
                .conversations
                .iter()
                .filter_map(|c| {
                    let text = format!("{} {}", c.context, c.response).to_lowercase();
                    let matched = terms.iter().filter(|t| text.contains(t.as_str())).count();
                    (matched > 0).then(|| SearchHit {
                        conversation_id: c.id.clone(),
                        text: c.context.clone(),
                        topic: c.topic.clone(),
                        score: matched as f64 / terms.len() as f64,
                    })
                })
                .collect();
            hits.sort_by(|a, b| b.score.total_cmp(&a.score));
            hits.truncate(top_k);
            SearchResponse {
                query: query.to_string(),
                hits,
                answer: None,
            }
        }))
    }

    fn update_profile<'a>(&'a self, update: &'a ProfileUpdate) -> ApiResult<'a, User> {
        respond(self.access(None).and_then(|mut data| {
            let practice = update.license_number.is_some() || update.specialization.is_some();
            if practice && data.therapist.is_none() {
                return Err(ClientError::Invalid(
                    "license number and specialization apply to therapist accounts".to_string(),
                ));
            }
            if let Some(email) = &update.email {
                if !email.contains('@') {
                    return Err(ClientError::Invalid(format!("not an email address: {email}")));
                }
                data.user.email = email.clone();
            }
            if let Some(name) = &update.name {
                data.user.name = name.clone();
            }
            if let Some(therapist) = data.therapist.as_mut() {
                therapist.apply(update);
            }
            Ok(data.user.clone())
        }))
    }

    fn change_password<'a>(&'a self, change: &'a PasswordChange) -> ApiResult<'a, ()> {
        respond(self.access(None).and_then(|_| {
            if change.current_password.is_empty() {
                return Err(ClientError::Invalid("current password is required".to_string()));
            }
            if change.new_password.chars().count() < 8 {
                return Err(ClientError::Invalid(
                    "new password must be at least 8 characters".to_string(),
                ));
            }
            Ok(())
        }))
    }

    fn delete_account(&self) -> ApiResult<'_, ()> {
        respond(self.access(None).map(|mut data| {
            data.deleted = true;
        }))
    }

    fn notification_settings(&self) -> ApiResult<'_, NotificationSettings> {
        respond(self.access(None).map(|data| data.notifications.clone()))
    }

    fn update_notification_settings<'a>(
        &'a self,
        settings: &'a NotificationSettings,
    ) -> ApiResult<'a, NotificationSettings> {
        respond(self.access(None).map(|mut data| {
            data.notifications = settings.clone();
            data.notifications.clone()
        }))
    }
}

impl IdentityProvider for OfflineApi {
    fn current_user<'a>(&'a self, token: &'a str) -> BoxFuture<'a, Result<User, AuthError>> {
        let result = self.access(None).map_err(AuthError::from).and_then(|data| {
            let id = token.strip_prefix(TOKEN_PREFIX).ok_or(AuthError::Unauthorized)?;
            [fixtures::therapist_user(), fixtures::patient_user(), data.user.clone()]
                .into_iter()
                .find(|u| u.id == id)
                .ok_or(AuthError::Unauthorized)
        });
        Box::pin(std::future::ready(result))
    }

    /// Any fixture account with a non-empty password.
    fn login<'a>(
        &'a self,
        credentials: &'a Credentials,
    ) -> BoxFuture<'a, Result<AuthGrant, AuthError>> {
        let result = self.access(None).map_err(AuthError::from).and_then(|_| {
            if credentials.password.is_empty() {
                return Err(AuthError::InvalidCredentials);
            }
            let user = [fixtures::therapist_user(), fixtures::patient_user()]
                .into_iter()
                .find(|u| u.email.eq_ignore_ascii_case(&credentials.email))
                .ok_or(AuthError::InvalidCredentials)?;
            Ok(AuthGrant {
                access_token: format!("{TOKEN_PREFIX}{}", user.id),
                user,
            })
        });
        Box::pin(std::future::ready(result))
    }

    fn signup<'a>(
        &'a self,
        request: &'a SignupRequest,
    ) -> BoxFuture<'a, Result<AuthGrant, AuthError>> {
        let result = self.access(None).map_err(AuthError::from).and_then(|mut data| {
            if request.password.chars().count() < 8 {
                return Err(AuthError::SignupRejected(
                    "password must be at least 8 characters".to_string(),
                ));
            }
            let id = data.next_id("u");
            if request.role == Role::Patient {
                let now = Timestamp::now();
                let code = request.invite_code.as_deref().unwrap_or_default();
                let invite = data
                    .invites
                    .iter_mut()
                    .find(|i| i.code == code && i.is_redeemable(now))
                    .ok_or_else(|| {
                        AuthError::SignupRejected("invite code is invalid or expired".to_string())
                    })?;
                invite.used = true;
                let therapist_id = invite.therapist_id.clone();
                data.patients.push(Patient {
                    id: id.clone(),
                    name: request.name.clone(),
                    email: request.email.clone(),
                    therapist_id,
                    created_at: now,
                });
                data.stats.total_patients += 1;
            }
            let user = User {
                id,
                email: request.email.clone(),
                name: request.name.clone(),
                role: request.role,
            };
            data.user = user.clone();
            Ok(AuthGrant {
                access_token: format!("{TOKEN_PREFIX}{}", user.id),
                user,
            })
        });
        Box::pin(std::future::ready(result))
    }
}
