//! Tests for command execution in isolation.
//!
//! Commands run against a session snapshot and report back only through
//! their outcome channel; nothing here needs a running dispatcher.

use std::sync::Arc;

use peerchat_app::{Command, CommandContext, CommandOutcome, Host, LogNotice, Room, execute};
use peerchat_harness::{SimHost, SimRoom};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

struct Fixture {
    host: SimHost,
    lobby: Arc<SimRoom>,
    shutdown: CancellationToken,
}

impl Fixture {
    async fn new() -> Self {
        let host = SimHost::new();
        let joined = host.join("alice", "lobby").await.unwrap();
        Self { host, lobby: joined.room, shutdown: CancellationToken::new() }
    }

    /// Run one command to completion and collect everything it reported.
    async fn run(&self, verb: &str, argument: &str) -> Vec<CommandOutcome<SimRoom>> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let ctx = CommandContext::new(
            self.host.clone(),
            Arc::clone(&self.lobby),
            "alice",
            tx,
            self.shutdown.clone(),
        );

        execute(Command::new(verb, argument), ctx).await;

        let mut outcomes = Vec::new();
        while let Ok(outcome) = rx.try_recv() {
            outcomes.push(outcome);
        }
        outcomes
    }
}

fn notices(outcomes: &[CommandOutcome<SimRoom>]) -> Vec<LogNotice> {
    outcomes
        .iter()
        .filter_map(|outcome| match outcome {
            CommandOutcome::Notice(notice) => Some(notice.clone()),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn quit_cancels_shutdown() {
    let fixture = Fixture::new().await;

    let outcomes = fixture.run("/q", "").await;

    assert!(outcomes.is_empty());
    assert!(fixture.shutdown.is_cancelled());
}

#[tokio::test]
async fn quit_ignores_argument() {
    let fixture = Fixture::new().await;

    fixture.run("/q", "now please").await;

    assert!(fixture.shutdown.is_cancelled());
}

#[tokio::test]
async fn missing_arguments_are_bad_commands() {
    let fixture = Fixture::new().await;

    for (verb, text) in [
        ("/r", "missing room name for command"),
        ("/u", "missing user name for command"),
        ("/send", "missing file name for command"),
    ] {
        let outcomes = fixture.run(verb, "").await;
        assert_eq!(notices(&outcomes), vec![LogNotice::bad_command(text)], "{verb}");
    }
    assert_eq!(fixture.host.joins(), vec!["lobby".to_string()]);
}

#[tokio::test]
async fn unknown_verb_is_named() {
    let fixture = Fixture::new().await;

    let outcomes = fixture.run("/dance", "wildly").await;

    assert_eq!(notices(&outcomes), vec![LogNotice::bad_command("unsupported command - /dance")]);
    assert!(!fixture.shutdown.is_cancelled());
}

#[tokio::test]
async fn rename_is_reported_not_applied() {
    let fixture = Fixture::new().await;

    let outcomes = fixture.run("/u", "Bob").await;

    assert!(matches!(outcomes.as_slice(), [CommandOutcome::Renamed(name)] if name == "Bob"));
    assert!(fixture.lobby.renames().is_empty(), "the loop applies renames");
}

#[tokio::test]
async fn change_room_announces_then_joins() {
    let fixture = Fixture::new().await;

    let outcomes = fixture.run("/r", "general").await;

    let [CommandOutcome::Notice(announce), CommandOutcome::Joined { joined, username }] =
        outcomes.as_slice()
    else {
        panic!("unexpected outcomes {outcomes:?}");
    };
    assert_eq!(*announce, LogNotice::room_change("joining new room 'general'"));
    assert_eq!(joined.room.name(), "general");
    assert_eq!(username, "alice");
    assert_eq!(fixture.lobby.leave_calls(), 0, "the loop releases the old room");
}

#[tokio::test]
async fn failed_join_is_one_error() {
    let fixture = Fixture::new().await;
    fixture.host.fail_joins("ghost", "nobody home");

    let outcomes = fixture.run("/r", "ghost").await;

    let errors: Vec<_> =
        notices(&outcomes).into_iter().filter(|n| n.is(LogNotice::ERROR)).collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].text.starts_with("could not change chat room - "));
    assert!(!outcomes.iter().any(|o| matches!(o, CommandOutcome::Joined { .. })));
}

#[tokio::test]
async fn send_file_success() {
    let fixture = Fixture::new().await;
    let file = tempfile::NamedTempFile::new().unwrap();

    let outcomes = fixture.run("/send", &file.path().display().to_string()).await;

    assert_eq!(notices(&outcomes), vec![LogNotice::info("File sent successfully!")]);
    assert_eq!(fixture.lobby.files_sent(), vec![file.path().to_path_buf()]);
}

#[tokio::test]
async fn send_directory_fails() {
    let fixture = Fixture::new().await;
    let dir = tempfile::tempdir().unwrap();

    let outcomes = fixture.run("/send", &dir.path().display().to_string()).await;

    let notices = notices(&outcomes);
    assert_eq!(notices.len(), 1);
    assert!(notices[0].is(LogNotice::ERROR));
    assert!(notices[0].text.starts_with("Failed to send file: "), "{}", notices[0].text);
    assert!(fixture.lobby.files_sent().is_empty());
}

#[tokio::test]
async fn outcomes_after_session_end_are_dropped() {
    let fixture = Fixture::new().await;
    let (tx, rx) = mpsc::unbounded_channel();
    drop(rx);
    let ctx = CommandContext::new(
        fixture.host.clone(),
        Arc::clone(&fixture.lobby),
        "alice",
        tx,
        fixture.shutdown.clone(),
    );

    execute(Command::new("/u", "Bob"), ctx).await;

    assert!(fixture.lobby.renames().is_empty());
}
