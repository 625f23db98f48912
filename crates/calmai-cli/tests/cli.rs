use calmai_auth::guard::guard;
use calmai_auth::{AuthState, RouteDecision};
use calmai_cli::backend::Backend;
use calmai_cli::cli::{Cli, Command};
use calmai_core::entries::TopicFilter;
use calmai_core::fixtures;
use clap::Parser;
use jiff::civil::date;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("calmai").chain(args.iter().copied())).unwrap()
}

#[test]
fn journal_flags_parse() {
    let cli = parse(&[
        "journal", "--search", "sleep", "--topic", "anxiety", "--from", "2026-02-01", "--asc",
    ]);
    let Command::Journal(args) = cli.command else {
        panic!("expected journal command");
    };
    assert_eq!(args.search, "sleep");
    assert_eq!(args.topic, TopicFilter::Only("anxiety".to_string()));
    assert_eq!(args.from, Some(date(2026, 2, 1)));
    assert!(args.asc);
    assert_eq!(args.page_size(), 10);
}

#[test]
fn patient_journal_uses_wider_pages() {
    let cli = parse(&["journal", "--patient", "p1"]);
    let Command::Journal(args) = &cli.command else {
        panic!("expected journal command");
    };
    assert_eq!(args.topic, TopicFilter::All);
    assert_eq!(args.page_size(), 20);
    assert_eq!(cli.command.route(), "/patients/p1");
}

#[test]
fn global_flags_follow_subcommands() {
    let cli = parse(&["dashboard", "--offline", "--json"]);
    assert!(cli.offline);
    assert!(cli.json);
    assert!(!cli.log_json);
}

#[test]
fn mood_outside_scale_is_rejected() {
    let result = Cli::try_parse_from(["calmai", "write", "hello", "--mood", "6"]);
    assert!(result.is_err());
}

#[test]
fn sign_in_commands_skip_the_session() {
    assert!(!parse(&["login", "a@b.example", "--password", "pw"]).command.requires_session());
    assert!(!parse(&["logout"]).command.requires_session());
    assert!(!parse(&["config", "show"]).command.requires_session());
    assert!(parse(&["whoami"]).command.requires_session());
}

#[test]
fn offline_mode_refuses_signup() {
    let signup = parse(&[
        "--offline", "signup", "new@calmai.example", "--name", "New", "--password", "long enough",
        "--invite", "CALM-0065",
    ]);
    assert!(Backend::Offline.supports(&signup.command).is_err());

    let login = parse(&["--offline", "login", "alex.rivera@calmai.example", "--password", "x"]);
    assert!(Backend::Offline.supports(&login.command).is_ok());
    assert!(Backend::Offline.supports(&parse(&["journal"]).command).is_ok());
}

#[test]
fn routes_respect_role_areas() {
    let therapist = AuthState::Authenticated(fixtures::therapist_user());
    let patient = AuthState::Authenticated(fixtures::patient_user());

    let dashboard = parse(&["dashboard"]).command.route();
    assert_eq!(guard(&therapist, &dashboard), RouteDecision::Allow);
    assert_eq!(guard(&patient, &dashboard), RouteDecision::Redirect("/journal"));

    let write = parse(&["write", "today was ok"]).command.route();
    assert_eq!(guard(&patient, &write), RouteDecision::Allow);
    assert_eq!(guard(&therapist, &write), RouteDecision::Redirect("/dashboard"));

    let own_prompts = parse(&["prompts"]).command.route();
    let patient_prompts = parse(&["prompts", "--patient", "p1"]).command.route();
    assert_eq!(guard(&patient, &own_prompts), RouteDecision::Allow);
    assert_eq!(guard(&patient, &patient_prompts), RouteDecision::Redirect("/journal"));

    let whoami = parse(&["whoami"]).command.route();
    assert_eq!(guard(&therapist, &whoami), RouteDecision::Allow);
    assert_eq!(guard(&AuthState::Anonymous, &whoami), RouteDecision::Redirect("/login"));
}
