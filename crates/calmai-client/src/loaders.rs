//! Page loaders: fetch everything a screen needs and derive its numbers.
//!
//! Independent requests are joined and fail together. Per-patient
//! analytics are fetched concurrently and degrade one by one to
//! [`Fetched::Missing`]. Each loader has a companion that logs a failure
//! and hands back an empty view, for callers that render something
//! regardless.

use std::collections::BTreeMap;

use calmai_core::browse::{ConversationFilter, filter_conversations};
use calmai_core::entries::{SortOrder, sort_entries};
use calmai_core::fetched::Fetched;
use calmai_core::models::{
    Conversation, DashboardStats, JournalEntry, MonthlyCount, Patient, PatientAnalytics,
    SearchResponse, TherapistPrompt,
};
use calmai_core::paging::{Page, paginate};
use calmai_core::rollup::{
    MoodSummary, RollupSummary, TopicShare, bucket_percentages, combine_monthly_frequency,
    combine_topic_distribution, conversation_topic_buckets, hit_topic_buckets, mood_summary,
    summarize,
};
use calmai_core::streak::{Streak, compute_streak};
use futures::future::join_all;
use jiff::Zoned;
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::api::CalmApi;
use crate::error::ClientError;

/// Hits requested per search when the caller has no preference.
pub const DEFAULT_TOP_K: usize = 5;

#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardView {
    pub patients: Vec<Patient>,
    pub stats: DashboardStats,
    /// Keyed by patient id.
    pub analytics: BTreeMap<String, Fetched<PatientAnalytics>>,
    pub summary: RollupSummary,
    pub topics: Vec<TopicShare>,
    pub monthly: Vec<MonthlyCount>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PatientProfileView {
    pub patient: Patient,
    /// Newest first.
    pub journals: Vec<JournalEntry>,
    pub analytics: Fetched<PatientAnalytics>,
    pub prompts: Vec<TherapistPrompt>,
    pub streak: Streak,
    pub mood: MoodSummary,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PatientHomeView {
    /// Newest first.
    pub journals: Vec<JournalEntry>,
    pub prompts: Vec<TherapistPrompt>,
    pub pending_prompts: usize,
    pub streak: Streak,
    pub mood: MoodSummary,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct InsightsView {
    pub topics: Vec<TopicShare>,
    pub monthly: Vec<MonthlyCount>,
    pub summary: RollupSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct CorpusView {
    pub page: Page<Conversation>,
    /// Shares over the whole corpus, not just the filtered page.
    pub topics: Vec<TopicShare>,
}

impl CorpusView {
    pub fn empty(page_size: usize) -> Self {
        Self {
            page: Page::empty(page_size),
            topics: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchView {
    pub response: SearchResponse,
    pub topics: Vec<TopicShare>,
}

/// Fetch analytics for every patient concurrently.
async fn fetch_analytics<A>(
    api: &A,
    patients: &[Patient],
) -> BTreeMap<String, Fetched<PatientAnalytics>>
where
    A: CalmApi + ?Sized,
{
    let fetches = patients.iter().map(|patient| async move {
        let result = api.patient_analytics(&patient.id).await;
        if let Err(e) = &result {
            warn!(patient_id = %patient.id, error = %e, "analytics unavailable");
        }
        (patient.id.clone(), Fetched::from_result(result))
    });
    join_all(fetches).await.into_iter().collect()
}

fn newest_first(mut journals: Vec<JournalEntry>) -> Vec<JournalEntry> {
    sort_entries(&mut journals, SortOrder::Desc);
    journals
}

pub async fn load_dashboard<A>(api: &A) -> Result<DashboardView, ClientError>
where
    A: CalmApi + ?Sized,
{
    let (patients, stats) = futures::try_join!(api.patients(), api.dashboard_stats())?;
    let analytics = fetch_analytics(api, &patients).await;

    let summary = summarize(analytics.values());
    let topics = combine_topic_distribution(analytics.values());
    let monthly = combine_monthly_frequency(analytics.values());
    debug!(
        patients = summary.patients,
        with_data = summary.patients_with_data,
        total_entries = summary.total_entries,
        "dashboard loaded"
    );

    Ok(DashboardView {
        patients,
        stats,
        analytics,
        summary,
        topics,
        monthly,
    })
}

pub async fn load_dashboard_or_empty<A>(api: &A) -> DashboardView
where
    A: CalmApi + ?Sized,
{
    load_dashboard(api).await.unwrap_or_else(|e| {
        error!(error = %e, "failed to load dashboard");
        DashboardView::default()
    })
}

/// One patient as their therapist sees them. Streak days are taken in
/// `now`'s time zone.
pub async fn load_patient_profile<A>(
    api: &A,
    patient_id: &str,
    now: &Zoned,
) -> Result<PatientProfileView, ClientError>
where
    A: CalmApi + ?Sized,
{
    let (patient, journals, prompts, analytics) = futures::join!(
        api.patient(patient_id),
        api.patient_journals(patient_id),
        api.patient_prompts(patient_id),
        api.patient_analytics(patient_id),
    );
    let (patient, journals, prompts) = (patient?, journals?, prompts?);
    if let Err(e) = &analytics {
        warn!(patient_id, error = %e, "analytics unavailable");
    }

    let journals = newest_first(journals);
    Ok(PatientProfileView {
        streak: compute_streak(&journals, now),
        mood: mood_summary(&journals),
        analytics: Fetched::from_result(analytics),
        patient,
        journals,
        prompts,
    })
}

/// There is no empty profile; a failed load yields `None`.
pub async fn load_patient_profile_or_none<A>(
    api: &A,
    patient_id: &str,
    now: &Zoned,
) -> Option<PatientProfileView>
where
    A: CalmApi + ?Sized,
{
    match load_patient_profile(api, patient_id, now).await {
        Ok(view) => Some(view),
        Err(e) => {
            error!(patient_id, error = %e, "failed to load patient profile");
            None
        }
    }
}

/// The signed-in patient's own journal and prompts.
pub async fn load_patient_home<A>(api: &A, now: &Zoned) -> Result<PatientHomeView, ClientError>
where
    A: CalmApi + ?Sized,
{
    let (journals, prompts) = futures::try_join!(api.my_journals(), api.my_prompts())?;
    let journals = newest_first(journals);

    Ok(PatientHomeView {
        pending_prompts: prompts.iter().filter(|p| p.is_pending()).count(),
        streak: compute_streak(&journals, now),
        mood: mood_summary(&journals),
        journals,
        prompts,
    })
}

pub async fn load_patient_home_or_empty<A>(api: &A, now: &Zoned) -> PatientHomeView
where
    A: CalmApi + ?Sized,
{
    load_patient_home(api, now).await.unwrap_or_else(|e| {
        error!(error = %e, "failed to load journal home");
        PatientHomeView::default()
    })
}

/// Topic and activity trends across the therapist's whole caseload.
pub async fn load_insights<A>(api: &A) -> Result<InsightsView, ClientError>
where
    A: CalmApi + ?Sized,
{
    let patients = api.patients().await?;
    let analytics = fetch_analytics(api, &patients).await;

    Ok(InsightsView {
        topics: combine_topic_distribution(analytics.values()),
        monthly: combine_monthly_frequency(analytics.values()),
        summary: summarize(analytics.values()),
    })
}

pub async fn load_insights_or_empty<A>(api: &A) -> InsightsView
where
    A: CalmApi + ?Sized,
{
    load_insights(api).await.unwrap_or_else(|e| {
        error!(error = %e, "failed to load insights");
        InsightsView::default()
    })
}

/// A filtered page of the conversation corpus.
pub async fn load_conversations<A>(
    api: &A,
    filter: &ConversationFilter,
    page: usize,
    page_size: usize,
) -> Result<CorpusView, ClientError>
where
    A: CalmApi + ?Sized,
{
    let conversations = api.conversations().await?;
    let topics = bucket_percentages(&conversation_topic_buckets(&conversations));
    let matched: Vec<Conversation> = filter_conversations(&conversations, filter)
        .into_iter()
        .cloned()
        .collect();

    Ok(CorpusView {
        page: paginate(matched, page, page_size),
        topics,
    })
}

pub async fn load_conversations_or_empty<A>(
    api: &A,
    filter: &ConversationFilter,
    page: usize,
    page_size: usize,
) -> CorpusView
where
    A: CalmApi + ?Sized,
{
    load_conversations(api, filter, page, page_size)
        .await
        .unwrap_or_else(|e| {
            error!(error = %e, "failed to load conversations");
            CorpusView::empty(page_size)
        })
}

/// Retrieval search. A blank query returns an empty view without a request.
pub async fn search_corpus<A>(api: &A, query: &str, top_k: usize) -> Result<SearchView, ClientError>
where
    A: CalmApi + ?Sized,
{
    let query = query.trim();
    if query.is_empty() {
        return Ok(SearchView::default());
    }

    let response = api.search(query, top_k.max(1)).await?;
    debug!(query, hits = response.hits.len(), "search complete");
    Ok(SearchView {
        topics: bucket_percentages(&hit_topic_buckets(&response.hits)),
        response,
    })
}

pub async fn search_corpus_or_empty<A>(api: &A, query: &str, top_k: usize) -> SearchView
where
    A: CalmApi + ?Sized,
{
    search_corpus(api, query, top_k).await.unwrap_or_else(|e| {
        error!(query, error = %e, "search failed");
        SearchView {
            response: SearchResponse {
                query: query.trim().to_string(),
                ..SearchResponse::default()
            },
            topics: Vec::new(),
        }
    })
}
