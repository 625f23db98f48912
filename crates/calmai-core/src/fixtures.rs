//! Demo data set: one therapist, five patients and their analytics, a
//! short journal history, prompts, invites and a slice of the corpus.
//!
//! Backs the offline API used for demos and tests. The numbers are kept
//! consistent with each other: the patients' `total_entries` add up to
//! [`dashboard_stats`]'s `total_journals`.

use jiff::Timestamp;
use jiff::civil::date;
use jiff::tz::TimeZone;

use crate::models::{
    Conversation, DashboardStats, DateSpan, InviteCode, JournalEntry, MonthlyCount, Patient,
    PatientAnalytics, PromptStatus, RepresentativeEntry, Role, Therapist, TherapistPrompt,
    TopicCount, TopicTimePoint, User,
};

pub const THERAPIST_ID: &str = "t1";

fn at(year: i16, month: i8, day: i8, hour: i8) -> Timestamp {
    date(year, month, day)
        .at(hour, 0, 0, 0)
        .to_zoned(TimeZone::UTC)
        .expect("fixture datetime is within jiff's supported range")
        .timestamp()
}

pub fn therapist() -> Therapist {
    Therapist {
        id: THERAPIST_ID.to_string(),
        name: "Dr. Emily Carter".to_string(),
        email: "emily.carter@calmai.example".to_string(),
        license_number: Some("PSY-204518".to_string()),
        specialization: Some("Anxiety and mood disorders".to_string()),
        created_at: at(2025, 6, 1, 9),
    }
}

pub fn therapist_user() -> User {
    User {
        id: THERAPIST_ID.to_string(),
        email: "emily.carter@calmai.example".to_string(),
        name: "Dr. Emily Carter".to_string(),
        role: Role::Therapist,
    }
}

pub fn patient_user() -> User {
    User {
        id: "p1".to_string(),
        email: "alex.rivera@calmai.example".to_string(),
        name: "Alex Rivera".to_string(),
        role: Role::Patient,
    }
}

pub fn patients() -> Vec<Patient> {
    [
        ("p1", "Alex Rivera", "alex.rivera@calmai.example", at(2025, 9, 3, 10)),
        ("p2", "Jordan Lee", "jordan.lee@calmai.example", at(2025, 10, 12, 14)),
        ("p3", "Sam Patel", "sam.patel@calmai.example", at(2025, 8, 21, 11)),
        ("p4", "Taylor Brooks", "taylor.brooks@calmai.example", at(2025, 12, 2, 16)),
        ("p5", "Morgan Chen", "morgan.chen@calmai.example", at(2025, 11, 7, 9)),
    ]
    .into_iter()
    .map(|(id, name, email, created_at)| Patient {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        therapist_id: THERAPIST_ID.to_string(),
        created_at,
    })
    .collect()
}

fn entry(
    id: &str,
    patient_id: &str,
    created_at: Timestamp,
    content: &str,
    mood: Option<u8>,
    topics: &[&str],
    days_since_last: Option<u32>,
) -> JournalEntry {
    JournalEntry {
        id: id.to_string(),
        patient_id: patient_id.to_string(),
        content: content.to_string(),
        created_at: created_at.into(),
        word_count: crate::models::journal::count_words(content),
        mood,
        topics: topics.iter().map(|t| t.to_string()).collect(),
        days_since_last,
    }
}

/// Alex Rivera's recent entries, newest first.
pub fn journal_entries() -> Vec<JournalEntry> {
    vec![
        entry(
            "j1",
            "p1",
            at(2026, 2, 20, 21),
            "Work deadlines kept me up again. I tried the breathing exercise before bed and it helped a little.",
            Some(3),
            &["work stress", "sleep"],
            Some(2),
        ),
        entry(
            "j2",
            "p1",
            at(2026, 2, 18, 20),
            "Had a good talk with my sister. Felt lighter afterwards and slept well.",
            Some(4),
            &["relationships"],
            Some(3),
        ),
        entry(
            "j3",
            "p1",
            at(2026, 2, 15, 22),
            "Anxious about the presentation on Monday. My chest felt tight most of the afternoon.",
            Some(2),
            &["anxiety", "work stress"],
            Some(1),
        ),
        entry(
            "j4",
            "p1",
            at(2026, 2, 14, 19),
            "Quiet weekend. Went for a long walk and cooked dinner, which felt grounding.",
            Some(4),
            &["self-care"],
            Some(2),
        ),
        entry(
            "j5",
            "p1",
            at(2026, 2, 12, 23),
            "Could not fall asleep until 3am. Kept replaying a conversation with my manager.",
            Some(2),
            &["sleep", "anxiety"],
            None,
        ),
    ]
}

fn analytics(
    patient_id: &str,
    avg_word_count: f64,
    topics: &[(&str, u32)],
    months: &[(&str, u32)],
    first: Timestamp,
    last: Timestamp,
) -> PatientAnalytics {
    let total_entries: u32 = months.iter().map(|(_, c)| c).sum();
    let topic_total: u32 = topics.iter().map(|(_, c)| c).sum();
    PatientAnalytics {
        patient_id: patient_id.to_string(),
        total_entries,
        avg_word_count,
        topic_distribution: topics
            .iter()
            .map(|(topic, count)| TopicCount {
                topic: topic.to_string(),
                percentage: f64::from(*count) / f64::from(topic_total.max(1)) * 100.0,
                count: *count,
            })
            .collect(),
        monthly_frequency: months
            .iter()
            .map(|(month, count)| MonthlyCount {
                month: month.to_string(),
                count: *count,
            })
            .collect(),
        date_range: Some(DateSpan { first, last }),
        representative_entries: Vec::new(),
        topics_over_time: Vec::new(),
    }
}

/// Analytics for every fixture patient. Entry totals are 47, 32, 58, 18
/// and 41.
pub fn patient_analytics() -> Vec<PatientAnalytics> {
    let mut p1 = analytics(
        "p1",
        142.5,
        &[("anxiety", 19), ("work stress", 14), ("sleep", 14)],
        &[("2025-12", 15), ("2026-01", 18), ("2026-02", 14)],
        at(2025, 12, 1, 20),
        at(2026, 2, 20, 21),
    );
    p1.representative_entries = vec![RepresentativeEntry {
        topic: "anxiety".to_string(),
        entry_id: "j3".to_string(),
        excerpt: "Anxious about the presentation on Monday.".to_string(),
    }];
    p1.topics_over_time = vec![
        TopicTimePoint {
            month: "2026-01".to_string(),
            topic: "anxiety".to_string(),
            count: 8,
        },
        TopicTimePoint {
            month: "2026-02".to_string(),
            topic: "anxiety".to_string(),
            count: 5,
        },
    ];

    vec![
        p1,
        analytics(
            "p2",
            98.0,
            &[("relationships", 16), ("depression", 10), ("self-care", 6)],
            &[("2025-12", 9), ("2026-01", 12), ("2026-02", 11)],
            at(2025, 12, 3, 18),
            at(2026, 2, 19, 20),
        ),
        analytics(
            "p3",
            176.25,
            &[("grief", 24), ("depression", 20), ("sleep", 14)],
            &[("2025-12", 21), ("2026-01", 20), ("2026-02", 17)],
            at(2025, 12, 1, 8),
            at(2026, 2, 21, 9),
        ),
        analytics(
            "p4",
            64.0,
            &[("anxiety", 11), ("school", 7)],
            &[("2026-01", 8), ("2026-02", 10)],
            at(2026, 1, 4, 17),
            at(2026, 2, 17, 17),
        ),
        analytics(
            "p5",
            121.75,
            &[("work stress", 18), ("anxiety", 13), ("relationships", 10)],
            &[("2025-12", 12), ("2026-01", 15), ("2026-02", 14)],
            at(2025, 12, 5, 22),
            at(2026, 2, 20, 22),
        ),
    ]
}

pub fn dashboard_stats() -> DashboardStats {
    DashboardStats {
        total_patients: 5,
        total_journals: 196,
        total_conversations: 6,
        active_patients: 4,
    }
}

pub fn prompts() -> Vec<TherapistPrompt> {
    vec![
        TherapistPrompt {
            id: "q1".to_string(),
            therapist_id: THERAPIST_ID.to_string(),
            patient_id: "p1".to_string(),
            question: "What is one thing that helped you feel calmer this week?".to_string(),
            status: PromptStatus::Answered,
            response: Some("Walking after dinner, even for ten minutes.".to_string()),
            created_at: at(2026, 2, 10, 9),
            answered_at: Some(at(2026, 2, 11, 21)),
        },
        TherapistPrompt {
            id: "q2".to_string(),
            therapist_id: THERAPIST_ID.to_string(),
            patient_id: "p1".to_string(),
            question: "Describe a moment at work when you noticed your anxiety rising.".to_string(),
            status: PromptStatus::Pending,
            response: None,
            created_at: at(2026, 2, 17, 9),
            answered_at: None,
        },
    ]
}

pub fn invite_codes() -> Vec<InviteCode> {
    vec![
        InviteCode {
            code: "CALM-7Q2X".to_string(),
            therapist_id: THERAPIST_ID.to_string(),
            created_at: at(2026, 2, 1, 12),
            expires_at: at(2026, 3, 1, 12),
            used: false,
        },
        InviteCode {
            code: "CALM-K9LD".to_string(),
            therapist_id: THERAPIST_ID.to_string(),
            created_at: at(2025, 9, 1, 12),
            expires_at: at(2025, 10, 1, 12),
            used: true,
        },
    ]
}

pub fn conversations() -> Vec<Conversation> {
    [
        (
            "c1",
            "I can't stop worrying about things that might go wrong at work.",
            "It sounds exhausting to carry that worry. What usually happens right before it starts?",
            "anxiety",
            "medium",
        ),
        (
            "c2",
            "I have panic attacks before every exam.",
            "Panic before exams is common. Let's look at what your body does in those moments.",
            "anxiety",
            "high",
        ),
        (
            "c3",
            "I feel empty most days and nothing seems worth doing.",
            "Thank you for telling me. How long have you been feeling this way?",
            "depression",
            "high",
        ),
        (
            "c4",
            "My partner and I argue about chores constantly.",
            "Recurring arguments often point to an unmet need. What do you wish your partner understood?",
            "relationships",
            "low",
        ),
        (
            "c5",
            "I lie awake for hours even when I'm tired.",
            "Sleep trouble and stress feed each other. What does your evening look like?",
            "sleep",
            "medium",
        ),
        (
            "c6",
            "My mother passed away last month and I can't focus.",
            "I'm so sorry for your loss. Grief can make concentration very hard.",
            "grief",
            "medium",
        ),
    ]
    .into_iter()
    .map(|(id, context, response, topic, severity)| Conversation {
        id: id.to_string(),
        context: context.to_string(),
        response: response.to_string(),
        topic: topic.to_string(),
        severity: severity.to_string(),
    })
    .collect()
}
