use std::path::Path;
use std::sync::Arc;

use calmai_auth::guard::LOGIN_ROUTE;
use calmai_auth::provider::SignupRequest;
use calmai_auth::token::{FileTokenStore, TokenStore};
use calmai_auth::{RouteDecision, Session};
use calmai_client::loaders::{
    load_conversations, load_dashboard, load_insights, load_patient_home, load_patient_profile,
    search_corpus,
};
use calmai_client::{CalmApi, HttpApi, mutations};
use calmai_core::browse::{ConversationFilter, filter_patients};
use calmai_core::entries::{EntryQuery, SortOrder, query_entries, topic_options};
use calmai_core::models::account::ProfileUpdate;
use calmai_core::models::{JournalEntry, PROCESSING_TOPIC, TherapistPrompt};
use calmai_core::paging::paginate;
use calmai_core::rollup::{MoodSummary, TopicShare, bucket_percentages, count_labels};
use calmai_core::streak::Streak;
use jiff::Zoned;
use serde::Serialize;
use tracing::debug;

use crate::backend::Backend;
use crate::cli::{AccountAction, Cli, Command, ConfigAction, JournalArgs};
use crate::config::{self, CliConfig};

/// Human or JSON rendering of command results.
struct Output {
    json: bool,
}

impl Output {
    fn emit<T: Serialize>(&self, value: &T, human: impl FnOnce(&T)) -> eyre::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            human(value);
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct OwnInsights {
    streak: Streak,
    mood: MoodSummary,
    topics: Vec<TopicShare>,
}

pub async fn run(cli: Cli) -> eyre::Result<()> {
    let dir = config::config_dir()?;
    let file_config = config::load_config(&dir)?;
    let out = Output { json: cli.json };

    if let Command::Config { action } = &cli.command {
        return configure(&dir, file_config, action, &out);
    }

    let backend = if cli.offline || file_config.offline {
        debug!("using offline demo data");
        Backend::Offline
    } else {
        let client_config = file_config.client_config(|key| std::env::var(key).ok())?;
        Backend::Http(HttpApi::new(&client_config)?)
    };
    backend.supports(&cli.command)?;
    let store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(config::token_path(&dir)));
    let mut session = Session::new(backend.identity(), store);

    if !cli.command.requires_session() {
        return account_entry(&mut session, cli.command, &out).await;
    }

    session.restore().await;
    authorize(&session, &cli.command.route())?;
    let api = backend.api_for(&session)?;
    dispatch(&mut session, &*api, cli.command, &out).await
}

/// Turn the route guard's answer into a CLI error.
fn authorize(session: &Session, route: &str) -> eyre::Result<()> {
    match session.guard(route) {
        RouteDecision::Allow => Ok(()),
        RouteDecision::Wait => Err(eyre::eyre!("session is still being verified")),
        RouteDecision::Redirect(LOGIN_ROUTE) => Err(eyre::eyre!(
            "not signed in; run `calmai login <email> --password <password>`"
        )),
        RouteDecision::Redirect(landing) => {
            let role = session.user().map_or("this", |u| u.role.as_str());
            Err(eyre::eyre!(
                "{route} is not available to {role} accounts (your home is {landing})"
            ))
        }
    }
}

fn configure(
    dir: &Path,
    mut file_config: CliConfig,
    action: &ConfigAction,
    out: &Output,
) -> eyre::Result<()> {
    if let ConfigAction::Set {
        api_url,
        timeout_secs,
        default_offline,
    } = action
    {
        if let Some(url) = api_url {
            file_config.api_url = url.clone();
        }
        if let Some(secs) = timeout_secs {
            file_config.timeout_secs = *secs;
        }
        if let Some(offline) = default_offline {
            file_config.offline = *offline;
        }
        // Reject values the client would refuse before persisting them.
        file_config.client_config(|_| None)?;
        config::save_config(dir, &file_config)?;
    }
    out.emit(&file_config, |c| {
        println!("api_url       {}", c.api_url);
        println!("timeout_secs  {}", c.timeout_secs);
        println!("offline       {}", c.offline);
    })
}

async fn account_entry(session: &mut Session, command: Command, out: &Output) -> eyre::Result<()> {
    match command {
        Command::Login { email, password } => {
            let landing = session.login(&email, &password).await?;
            signed_in(session, landing, out)
        }
        Command::Signup {
            email,
            name,
            password,
            role,
            invite,
        } => {
            let request = SignupRequest {
                email,
                password,
                name,
                role: role.into(),
                invite_code: invite,
            };
            let landing = session.signup(&request).await?;
            signed_in(session, landing, out)
        }
        Command::Logout => {
            session.logout();
            println!("Signed out.");
            Ok(())
        }
        other => Err(eyre::eyre!("{} needs a session", other.route())),
    }
}

fn signed_in(session: &Session, landing: &str, out: &Output) -> eyre::Result<()> {
    let user = session
        .user()
        .ok_or_else(|| eyre::eyre!("sign-in did not produce a user"))?;
    out.emit(user, |u| {
        println!("Signed in as {} ({}). Home: {landing}", u.name, u.role);
    })
}

async fn dispatch(
    session: &mut Session,
    api: &dyn CalmApi,
    command: Command,
    out: &Output,
) -> eyre::Result<()> {
    let now = Zoned::now();
    match command {
        Command::Whoami => {
            let user = session
                .user()
                .ok_or_else(|| eyre::eyre!("not signed in"))?;
            out.emit(user, |u| println!("{} <{}> {}", u.name, u.email, u.role))
        }
        Command::Dashboard => {
            let view = load_dashboard(api).await?;
            out.emit(&view, |v| {
                println!(
                    "Patients {}  Journals {}  Conversations {}  Active {}",
                    v.stats.total_patients,
                    v.stats.total_journals,
                    v.stats.total_conversations,
                    v.stats.active_patients
                );
                println!(
                    "Entries across caseload: {} (analytics for {} of {} patients)",
                    v.summary.total_entries, v.summary.patients_with_data, v.summary.patients
                );
                println!("Average words per entry: {:.1}", v.summary.average_word_count);
                print_shares("Top topics", &v.topics, 5);
            })
        }
        Command::Patients {
            search,
            page,
            page_size,
        } => {
            let patients = api.patients().await?;
            let listed = paginate(filter_patients(&patients, &search), page, page_size);
            out.emit(&listed, |p| {
                for patient in &p.items {
                    println!("{:<6} {:<20} {}", patient.id, patient.name, patient.email);
                }
                println!(
                    "page {} of {} ({} patients)",
                    p.page + 1,
                    p.total_pages.max(1),
                    p.total_filtered
                );
            })
        }
        Command::Patient { id } => {
            let view = load_patient_profile(api, &id, &now).await?;
            out.emit(&view, |v| {
                println!("{} <{}>", v.patient.name, v.patient.email);
                print_streak(&v.streak);
                print_mood(&v.mood);
                match v.analytics.as_ready() {
                    Some(a) => println!(
                        "{} entries, {:.1} words on average",
                        a.total_entries, a.avg_word_count
                    ),
                    None => println!("Analytics not available yet."),
                }
                print_entries(&v.journals.iter().take(5).collect::<Vec<_>>());
                print_prompts(&v.prompts);
            })
        }
        Command::RemovePatient { id } => {
            let patients = mutations::remove_patient(api, &id).await?;
            out.emit(&patients, |p| println!("Removed {id}; {} patients remain.", p.len()))
        }
        Command::Journal(args) => journal(api, args, out).await,
        Command::Write { content, mood } => {
            let journals = mutations::submit_entry(api, &content, mood).await?;
            out.emit(&journals, |j| {
                println!("Saved. Topics are assigned shortly; {} entries in total.", j.len());
            })
        }
        Command::Edit { id, content, mood } => {
            let journals = mutations::edit_entry(api, &id, &content, mood).await?;
            out.emit(&journals, |_| println!("Updated {id}."))
        }
        Command::Delete { id } => {
            let journals = mutations::delete_entry(api, &id).await?;
            out.emit(&journals, |j| println!("Deleted {id}; {} entries remain.", j.len()))
        }
        Command::Streak => {
            let view = load_patient_home(api, &now).await?;
            out.emit(&view.streak, print_streak)
        }
        Command::Insights => {
            let view = load_patient_home(api, &now).await?;
            let labels = view
                .journals
                .iter()
                .flat_map(|e| e.topics.iter().map(String::as_str))
                .filter(|t| *t != PROCESSING_TOPIC);
            let insights = OwnInsights {
                streak: view.streak,
                topics: bucket_percentages(&count_labels(labels)),
                mood: view.mood,
            };
            out.emit(&insights, |i| {
                print_streak(&i.streak);
                print_mood(&i.mood);
                print_shares("Topics", &i.topics, usize::MAX);
            })
        }
        Command::Analytics => {
            let view = load_insights(api).await?;
            out.emit(&view, |v| {
                print_shares("Topics across caseload", &v.topics, usize::MAX);
                println!("Entries per month:");
                for m in &v.monthly {
                    println!("  {}  {}", m.month, m.count);
                }
            })
        }
        Command::Conversations {
            search,
            topic,
            severity,
            page,
            page_size,
        } => {
            let filter = ConversationFilter {
                search,
                topic,
                severity,
            };
            let view = load_conversations(api, &filter, page, page_size).await?;
            out.emit(&view, |v| {
                for c in &v.page.items {
                    println!("[{}] {} ({}, {})", c.id, c.context, c.topic, c.severity);
                }
                println!(
                    "page {} of {} ({} matching)",
                    v.page.page + 1,
                    v.page.total_pages.max(1),
                    v.page.total_filtered
                );
            })
        }
        Command::Search { query, top_k } => {
            let view = search_corpus(api, &query, top_k).await?;
            out.emit(&view, |v| {
                for hit in &v.response.hits {
                    println!("{:.2}  [{}] {}", hit.score, hit.topic, hit.text);
                }
                if let Some(answer) = &v.response.answer {
                    println!("\n{answer}");
                }
                print_shares("Topics in results", &v.topics, usize::MAX);
            })
        }
        Command::Prompts { patient } => {
            let prompts = match &patient {
                Some(id) => api.patient_prompts(id).await?,
                None => api.my_prompts().await?,
            };
            out.emit(&prompts, |p| print_prompts(p))
        }
        Command::Ask { patient, question } => {
            let prompts = mutations::assign_prompt(api, &patient, &question).await?;
            out.emit(&prompts, |p| println!("Sent. {patient} has {} prompts.", p.len()))
        }
        Command::Answer { prompt, response } => {
            let prompts = mutations::answer_prompt(api, &prompt, &response).await?;
            out.emit(&prompts, |p| print_prompts(p))
        }
        Command::Invites { new } => {
            let invites = if new {
                let (invite, invites) = mutations::issue_invite(api).await?;
                if !out.json {
                    println!("New code: {} (expires {})", invite.code, invite.expires_at);
                }
                invites
            } else {
                api.invite_codes().await?
            };
            let now_ts = now.timestamp();
            out.emit(&invites, |list| {
                for i in list {
                    let state = if i.used {
                        "used"
                    } else if i.is_redeemable(now_ts) {
                        "open"
                    } else {
                        "expired"
                    };
                    println!("{}  {:<8} expires {}", i.code, state, i.expires_at);
                }
            })
        }
        Command::Account { action } => account(session, api, action, out).await,
        Command::Login { .. }
        | Command::Signup { .. }
        | Command::Logout
        | Command::Config { .. } => Err(eyre::eyre!("command does not take a session")),
    }
}

async fn journal(api: &dyn CalmApi, args: JournalArgs, out: &Output) -> eyre::Result<()> {
    let entries = match &args.patient {
        Some(id) => api.patient_journals(id).await?,
        None => api.my_journals().await?,
    };
    let query = EntryQuery::new(args.page_size())
        .with_search(args.search.as_str())
        .with_topic(args.topic.clone())
        .with_date_range(args.from, args.to)
        .with_sort(if args.asc { SortOrder::Asc } else { SortOrder::Desc })
        .with_page(args.page);

    let page = query_entries(&entries, &query);
    out.emit(&page, |p| {
        print_entries(&p.items);
        println!(
            "page {} of {} ({} matching)  topics: {}",
            p.page + 1,
            p.total_pages.max(1),
            p.total_filtered,
            topic_options(&entries).join(", ")
        );
    })
}

async fn account(
    session: &mut Session,
    api: &dyn CalmApi,
    action: AccountAction,
    out: &Output,
) -> eyre::Result<()> {
    match action {
        AccountAction::Profile {
            name,
            email,
            license_number,
            specialization,
        } => {
            let update = ProfileUpdate {
                name,
                email,
                license_number,
                specialization,
            };
            let user = mutations::update_profile(api, &update).await?;
            out.emit(&user, |u| println!("Profile saved: {} <{}>", u.name, u.email))
        }
        AccountAction::Password { current, new } => {
            mutations::change_password(api, &current, &new).await?;
            println!("Password changed.");
            Ok(())
        }
        AccountAction::Notifications {
            email,
            reminders,
            weekly_summary,
        } => {
            let mut settings = api.notification_settings().await?;
            if email.is_none() && reminders.is_none() && weekly_summary.is_none() {
                return out.emit(&settings, print_notifications);
            }
            if let Some(v) = email {
                settings.email_notifications = v;
            }
            if let Some(v) = reminders {
                settings.journal_reminders = v;
            }
            if let Some(v) = weekly_summary {
                settings.weekly_summary = v;
            }
            let saved = mutations::save_notification_settings(api, &settings).await?;
            out.emit(&saved, print_notifications)
        }
        AccountAction::Delete { yes } => {
            if !yes {
                return Err(eyre::eyre!("account deletion is permanent; pass --yes to confirm"));
            }
            api.delete_account().await?;
            session.logout();
            println!("Account deleted.");
            Ok(())
        }
    }
}

fn print_streak(streak: &Streak) {
    println!(
        "Streak: {} day(s) current, {} longest",
        streak.current, streak.longest
    );
}

fn print_mood(mood: &MoodSummary) {
    match mood.average {
        Some(avg) => println!(
            "Mood: {avg:.1} average over {} rated entries {:?}",
            mood.rated_entries, mood.histogram
        ),
        None => println!("Mood: no ratings yet"),
    }
}

fn print_shares(title: &str, shares: &[TopicShare], limit: usize) {
    println!("{title}:");
    for share in shares.iter().take(limit) {
        println!("  {:<16} {:>5.1}%  ({})", share.label, share.percentage, share.count);
    }
}

fn print_entries(entries: &[&JournalEntry]) {
    for e in entries {
        let mood = e.mood.map_or("-".to_string(), |m| m.to_string());
        println!(
            "{}  {}  mood {mood}  [{}]  {}",
            e.id,
            e.day(),
            e.topics.join(", "),
            e.content
        );
    }
}

fn print_prompts(prompts: &[TherapistPrompt]) {
    for p in prompts {
        match &p.response {
            Some(response) => println!("{}  {}\n      -> {response}", p.id, p.question),
            None => println!("{}  {}  (pending)", p.id, p.question),
        }
    }
}

fn print_notifications(settings: &calmai_core::models::account::NotificationSettings) {
    println!("email notifications  {}", settings.email_notifications);
    println!("journal reminders    {}", settings.journal_reminders);
    println!("weekly summary       {}", settings.weekly_summary);
}
