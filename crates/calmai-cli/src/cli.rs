use calmai_core::entries::{JOURNAL_PAGE_SIZE, PATIENT_VIEW_PAGE_SIZE, TopicFilter};
use calmai_core::models::Role;
use clap::{Args, Parser, Subcommand, ValueEnum};
use jiff::civil::Date;

#[derive(Debug, Parser)]
#[command(name = "calmai", author, version, about = "CalmAI therapist and patient client")]
pub struct Cli {
    /// Use built-in demo data instead of the API.
    #[arg(long, global = true)]
    pub offline: bool,

    /// Print results as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    Therapist,
    Patient,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Therapist => Role::Therapist,
            RoleArg::Patient => Role::Patient,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and remember the session.
    Login {
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account. Patients need an invite code from their therapist.
    /// Not available with --offline.
    Signup {
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        password: String,
        #[arg(long, value_enum, default_value_t = RoleArg::Patient)]
        role: RoleArg,
        #[arg(long)]
        invite: Option<String>,
    },
    Logout,
    /// Show the signed-in account.
    Whoami,
    /// Show or change the stored client settings.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Caseload summary (therapist).
    Dashboard,
    /// List patients (therapist).
    Patients {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value_t = 0)]
        page: usize,
        #[arg(long, default_value_t = PATIENT_VIEW_PAGE_SIZE)]
        page_size: usize,
    },
    /// One patient's profile (therapist).
    Patient { id: String },
    /// Remove a patient from the caseload (therapist).
    RemovePatient { id: String },
    /// Browse journal entries: your own, or a patient's with --patient.
    Journal(JournalArgs),
    /// Write a journal entry (patient).
    Write {
        content: String,
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        mood: Option<u8>,
    },
    /// Replace the text and mood of an entry (patient).
    Edit {
        id: String,
        content: String,
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        mood: Option<u8>,
    },
    /// Delete a journal entry (patient).
    Delete { id: String },
    /// Current and longest writing streak (patient).
    Streak,
    /// Mood and topics across your entries (patient).
    Insights,
    /// Topic and activity trends across the caseload (therapist).
    Analytics,
    /// Browse the conversation corpus (therapist).
    Conversations {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "all")]
        topic: TopicFilter,
        #[arg(long)]
        severity: Option<String>,
        #[arg(long, default_value_t = 0)]
        page: usize,
        #[arg(long, default_value_t = PATIENT_VIEW_PAGE_SIZE)]
        page_size: usize,
    },
    /// Semantic search over the corpus (therapist).
    Search {
        query: String,
        #[arg(long, default_value_t = calmai_client::loaders::DEFAULT_TOP_K)]
        top_k: usize,
    },
    /// Reflection prompts: a patient's (therapist, --patient) or your own.
    Prompts {
        #[arg(long)]
        patient: Option<String>,
    },
    /// Send a reflection prompt to a patient (therapist).
    Ask { patient: String, question: String },
    /// Answer a pending prompt (patient).
    Answer { prompt: String, response: String },
    /// List invite codes, or create one with --new (therapist).
    Invites {
        #[arg(long)]
        new: bool,
    },
    /// Profile, password, notifications and account deletion.
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
}

#[derive(Debug, Args)]
pub struct JournalArgs {
    /// A patient's journal instead of your own (therapist).
    #[arg(long)]
    pub patient: Option<String>,
    #[arg(long, default_value = "")]
    pub search: String,
    #[arg(long, default_value = "all")]
    pub topic: TopicFilter,
    /// First day to include, YYYY-MM-DD.
    #[arg(long)]
    pub from: Option<Date>,
    /// Last day to include, YYYY-MM-DD.
    #[arg(long)]
    pub to: Option<Date>,
    /// Oldest first.
    #[arg(long)]
    pub asc: bool,
    #[arg(long, default_value_t = 0)]
    pub page: usize,
    /// Defaults to 10 for your own journal and 20 for a patient's.
    #[arg(long)]
    pub page_size: Option<usize>,
}

impl JournalArgs {
    pub fn page_size(&self) -> usize {
        self.page_size.unwrap_or(if self.patient.is_some() {
            PATIENT_VIEW_PAGE_SIZE
        } else {
            JOURNAL_PAGE_SIZE
        })
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    Show,
    Set {
        #[arg(long)]
        api_url: Option<String>,
        #[arg(long)]
        timeout_secs: Option<u64>,
        /// Make --offline the default.
        #[arg(long)]
        default_offline: Option<bool>,
    },
}

#[derive(Debug, Subcommand)]
pub enum AccountAction {
    Profile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        license_number: Option<String>,
        #[arg(long)]
        specialization: Option<String>,
    },
    Password {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
    },
    Notifications {
        #[arg(long)]
        email: Option<bool>,
        #[arg(long)]
        reminders: Option<bool>,
        #[arg(long)]
        weekly_summary: Option<bool>,
    },
    /// Permanently delete the account and sign out.
    Delete {
        #[arg(long)]
        yes: bool,
    },
}

impl Command {
    /// Whether the command runs against a restored session. Sign-in,
    /// sign-out and local settings do not.
    pub fn requires_session(&self) -> bool {
        !matches!(
            self,
            Command::Login { .. }
                | Command::Signup { .. }
                | Command::Logout
                | Command::Config { .. }
        )
    }

    /// The app route a command stands for, checked against the session's
    /// route guard before anything runs.
    pub fn route(&self) -> String {
        match self {
            Command::Login { .. } => "/login".to_string(),
            Command::Signup { .. } => "/signup".to_string(),
            Command::Logout | Command::Config { .. } => "/".to_string(),
            Command::Whoami | Command::Account { .. } => "/account".to_string(),
            Command::Dashboard => "/dashboard".to_string(),
            Command::Patients { .. } => "/patients".to_string(),
            Command::Patient { id } | Command::RemovePatient { id } => format!("/patients/{id}"),
            Command::Journal(args) => match &args.patient {
                Some(id) => format!("/patients/{id}"),
                None => "/journal".to_string(),
            },
            Command::Write { .. }
            | Command::Edit { .. }
            | Command::Delete { .. }
            | Command::Streak => "/journal".to_string(),
            Command::Insights => "/insights".to_string(),
            Command::Analytics => "/analytics".to_string(),
            Command::Conversations { .. } => "/conversations".to_string(),
            Command::Search { .. } => "/search".to_string(),
            Command::Prompts { patient: Some(_) } | Command::Ask { .. } => "/prompts".to_string(),
            Command::Prompts { patient: None } | Command::Answer { .. } => {
                "/my-prompts".to_string()
            }
            Command::Invites { .. } => "/invites".to_string(),
        }
    }
}
