use std::time::Duration;

use calmai_auth::error::AuthError;
use calmai_auth::provider::{AuthGrant, BoxFuture, Credentials, IdentityProvider, SignupRequest};
use calmai_core::models::account::{NotificationSettings, PasswordChange, ProfileUpdate};
use calmai_core::models::{
    Conversation, DashboardStats, InviteCode, JournalDraft, JournalEntry, Patient,
    PatientAnalytics, SearchResponse, TherapistPrompt, User,
};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

use crate::api::{ApiResult, CalmApi};
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::paths;

/// reqwest-backed client for the CalmAI REST API.
#[derive(Debug, Clone)]
pub struct HttpApi {
    base_url: String,
    client: reqwest::Client,
    timeout_secs: u64,
    token: Option<String>,
}

impl HttpApi {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs: config.timeout_secs,
            token: None,
        })
    }

    /// A copy of this client that authenticates as the holder of `token`.
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..self.clone()
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request_id = Uuid::new_v4();
        debug!(%method, path, %request_id, "api request");

        let builder = self
            .client
            .request(method, format!("{}{path}", self.base_url))
            .header("x-request-id", request_id.to_string());
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn transport_error(&self, e: reqwest::Error) -> ClientError {
        if e.is_connect() {
            ClientError::Connection(self.base_url.clone())
        } else if e.is_timeout() {
            ClientError::Timeout(self.timeout_secs)
        } else {
            ClientError::Http(e.to_string())
        }
    }

    async fn execute(
        &self,
        path: &str,
        builder: RequestBuilder,
    ) -> Result<reqwest::Response, ClientError> {
        let response = builder.send().await.map_err(|e| self.transport_error(e))?;

        let status = response.status();
        debug!(path, status = status.as_u16(), "api response");

        match status {
            StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
            StatusCode::NOT_FOUND => Err(ClientError::NotFound(path.to_string())),
            s if !s.is_success() => {
                let body = response.text().await.unwrap_or_default();
                Err(ClientError::Status {
                    status: s.as_u16(),
                    body,
                })
            }
            _ => Ok(response),
        }
    }

    async fn json<T: DeserializeOwned>(
        &self,
        path: &str,
        builder: RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = self.execute(path, builder).await?;
        let body = response.bytes().await.map_err(|e| self.transport_error(e))?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.json(path, self.request(Method::GET, path)).await
    }

    async fn no_content(&self, path: &str, builder: RequestBuilder) -> Result<(), ClientError> {
        self.execute(path, builder).await?;
        Ok(())
    }
}

impl CalmApi for HttpApi {
    fn patients(&self) -> ApiResult<'_, Vec<Patient>> {
        Box::pin(self.get::<Vec<Patient>>(paths::PATIENTS))
    }

    fn patient<'a>(&'a self, id: &'a str) -> ApiResult<'a, Patient> {
        Box::pin(async move { self.get::<Patient>(&paths::patient(id)).await })
    }

    fn remove_patient<'a>(&'a self, id: &'a str) -> ApiResult<'a, ()> {
        Box::pin(async move {
            let path = paths::patient(id);
            self.no_content(&path, self.request(Method::DELETE, &path)).await
        })
    }

    fn patient_journals<'a>(&'a self, patient_id: &'a str) -> ApiResult<'a, Vec<JournalEntry>> {
        Box::pin(async move {
            self.get::<Vec<JournalEntry>>(&paths::patient_journals(patient_id))
                .await
        })
    }

    fn patient_analytics<'a>(&'a self, patient_id: &'a str) -> ApiResult<'a, PatientAnalytics> {
        Box::pin(async move {
            self.get::<PatientAnalytics>(&paths::patient_analytics(patient_id))
                .await
        })
    }

    fn dashboard_stats(&self) -> ApiResult<'_, DashboardStats> {
        Box::pin(self.get::<DashboardStats>(paths::DASHBOARD_STATS))
    }

    fn my_journals(&self) -> ApiResult<'_, Vec<JournalEntry>> {
        Box::pin(self.get::<Vec<JournalEntry>>(paths::JOURNALS))
    }

    fn create_journal<'a>(&'a self, draft: &'a JournalDraft) -> ApiResult<'a, JournalEntry> {
        Box::pin(async move {
            let builder = self.request(Method::POST, paths::JOURNALS).json(draft);
            self.json::<JournalEntry>(paths::JOURNALS, builder).await
        })
    }

    fn update_journal<'a>(
        &'a self,
        id: &'a str,
        draft: &'a JournalDraft,
    ) -> ApiResult<'a, JournalEntry> {
        Box::pin(async move {
            let path = paths::journal(id);
            self.json::<JournalEntry>(&path, self.request(Method::PUT, &path).json(draft))
                .await
        })
    }

    fn delete_journal<'a>(&'a self, id: &'a str) -> ApiResult<'a, ()> {
        Box::pin(async move {
            let path = paths::journal(id);
            self.no_content(&path, self.request(Method::DELETE, &path)).await
        })
    }

    fn patient_prompts<'a>(&'a self, patient_id: &'a str) -> ApiResult<'a, Vec<TherapistPrompt>> {
        Box::pin(async move {
            self.get::<Vec<TherapistPrompt>>(&paths::patient_prompts(patient_id))
                .await
        })
    }

    fn my_prompts(&self) -> ApiResult<'_, Vec<TherapistPrompt>> {
        Box::pin(self.get::<Vec<TherapistPrompt>>(paths::MY_PROMPTS))
    }

    fn create_prompt<'a>(
        &'a self,
        patient_id: &'a str,
        question: &'a str,
    ) -> ApiResult<'a, TherapistPrompt> {
        Box::pin(async move {
            let body = serde_json::json!({ "patient_id": patient_id, "question": question });
            let builder = self.request(Method::POST, paths::PROMPTS).json(&body);
            self.json::<TherapistPrompt>(paths::PROMPTS, builder).await
        })
    }

    fn answer_prompt<'a>(
        &'a self,
        prompt_id: &'a str,
        response: &'a str,
    ) -> ApiResult<'a, TherapistPrompt> {
        Box::pin(async move {
            let path = paths::prompt_answer(prompt_id);
            let body = serde_json::json!({ "response": response });
            self.json::<TherapistPrompt>(&path, self.request(Method::POST, &path).json(&body))
                .await
        })
    }

    fn invite_codes(&self) -> ApiResult<'_, Vec<InviteCode>> {
        Box::pin(self.get::<Vec<InviteCode>>(paths::INVITES))
    }

    fn create_invite(&self) -> ApiResult<'_, InviteCode> {
        Box::pin(async move {
            let builder = self.request(Method::POST, paths::INVITES);
            self.json::<InviteCode>(paths::INVITES, builder).await
        })
    }

    fn conversations(&self) -> ApiResult<'_, Vec<Conversation>> {
        Box::pin(self.get::<Vec<Conversation>>(paths::CONVERSATIONS))
    }

    fn search<'a>(&'a self, query: &'a str, top_k: usize) -> ApiResult<'a, SearchResponse> {
        Box::pin(async move {
            let body = serde_json::json!({ "query": query, "top_k": top_k });
            let builder = self.request(Method::POST, paths::SEARCH).json(&body);
            self.json::<SearchResponse>(paths::SEARCH, builder).await
        })
    }

    fn update_profile<'a>(&'a self, update: &'a ProfileUpdate) -> ApiResult<'a, User> {
        Box::pin(async move {
            let builder = self.request(Method::PATCH, paths::PROFILE).json(update);
            self.json::<User>(paths::PROFILE, builder).await
        })
    }

    fn change_password<'a>(&'a self, change: &'a PasswordChange) -> ApiResult<'a, ()> {
        Box::pin(async move {
            let builder = self.request(Method::POST, paths::PASSWORD).json(change);
            self.no_content(paths::PASSWORD, builder).await
        })
    }

    fn delete_account(&self) -> ApiResult<'_, ()> {
        Box::pin(async move {
            let builder = self.request(Method::DELETE, paths::ACCOUNT);
            self.no_content(paths::ACCOUNT, builder).await
        })
    }

    fn notification_settings(&self) -> ApiResult<'_, NotificationSettings> {
        Box::pin(self.get::<NotificationSettings>(paths::NOTIFICATIONS))
    }

    fn update_notification_settings<'a>(
        &'a self,
        settings: &'a NotificationSettings,
    ) -> ApiResult<'a, NotificationSettings> {
        Box::pin(async move {
            let builder = self.request(Method::PUT, paths::NOTIFICATIONS).json(settings);
            self.json::<NotificationSettings>(paths::NOTIFICATIONS, builder).await
        })
    }
}

impl IdentityProvider for HttpApi {
    fn current_user<'a>(&'a self, token: &'a str) -> BoxFuture<'a, Result<User, AuthError>> {
        Box::pin(async move {
            let authed = self.with_token(token);
            Ok(authed.get::<User>(paths::ME).await?)
        })
    }

    fn login<'a>(
        &'a self,
        credentials: &'a Credentials,
    ) -> BoxFuture<'a, Result<AuthGrant, AuthError>> {
        Box::pin(async move {
            let builder = self.request(Method::POST, paths::LOGIN).json(credentials);
            match self.json::<AuthGrant>(paths::LOGIN, builder).await {
                Ok(grant) => Ok(grant),
                Err(ClientError::Unauthorized) => Err(AuthError::InvalidCredentials),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn signup<'a>(
        &'a self,
        request: &'a SignupRequest,
    ) -> BoxFuture<'a, Result<AuthGrant, AuthError>> {
        Box::pin(async move {
            let builder = self.request(Method::POST, paths::SIGNUP).json(request);
            match self.json::<AuthGrant>(paths::SIGNUP, builder).await {
                Ok(grant) => Ok(grant),
                Err(ClientError::Status { status, body }) if (400..500).contains(&status) => {
                    Err(AuthError::SignupRejected(body))
                }
                Err(e) => Err(e.into()),
            }
        })
    }
}
