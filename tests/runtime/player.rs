//! Tests for the player state machine and host calls.

use yack_foundation::ErrorKind;
use yack_runtime::{DialogPlayer, DialogState, MemoryLoader, PlayerConfig, PlayerState};

use crate::host::{Event, RecordingConditions, RecordingContext, new_player, play, says, settle};

fn slow_player(say_frames: usize) -> (DialogPlayer, crate::host::Events) {
    let events = crate::host::Events::default();
    let player = DialogPlayer::new(
        Box::new(RecordingContext::new(&events).with_say_frames(say_frames)),
        Box::new(RecordingConditions::new(&events)),
    );
    (player, events)
}

// =============================================================================
// Starting
// =============================================================================

#[test]
fn start_loads_dialog_by_name() {
    let (player, events) = new_player(PlayerConfig::default());
    let mut player = player.with_loader(Box::new(
        MemoryLoader::new().with_dialog("pirates", ":start\npirate: \"Arr\"\n"),
    ));
    player.start("guybrush", "pirates", "start").unwrap();

    assert_eq!(player.actor(), "guybrush");
    assert_eq!(player.dialog_name(), "pirates");
    assert_eq!(player.state(), DialogState::Active);
    assert_eq!(says(&events), vec!["pirate: Arr"]);
}

#[test]
fn start_of_missing_dialog_fails() {
    let (player, _) = new_player(PlayerConfig::default());
    let mut player = player.with_loader(Box::new(MemoryLoader::new()));
    let err = player.start("guybrush", "nowhere", "start").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DialogNotFound(ref name) if name == "nowhere"));
    assert_eq!(player.state(), DialogState::None);
}

#[test]
fn failed_start_discards_running_dialog() {
    let (mut player, _) = play(":start\n1 \"a\" -> start\n", PlayerConfig::default());
    assert_eq!(player.state(), DialogState::WaitingForChoice);

    let err = player
        .start_source("guybrush", "broken", "start", ":start\nfly away\n")
        .unwrap_err();
    assert!(err.is_parse_error());
    assert_eq!(err.context.and_then(|c| c.source).as_deref(), Some("broken.byack"));
    assert_eq!(player.state(), DialogState::None);
    assert!(player.compilation_unit().labels.is_empty());
}

#[test]
fn start_at_missing_node_ends_quietly() {
    let (player, events) = play(":start\nguybrush: \"Hi\"\n", PlayerConfig::default());
    let (mut other, _) = new_player(PlayerConfig::default());
    other
        .start_source("guybrush", "test", "middle", ":start\nguybrush: \"Hi\"\n")
        .unwrap();
    assert_eq!(other.state(), DialogState::None);
    assert_eq!(player.state(), DialogState::None);
    assert_eq!(says(&events).len(), 1);
}

#[test]
fn restart_discards_pending_wait() {
    let (mut player, events) = slow_player(5);
    player
        .start_source("guybrush", "a", "start", ":start\nguybrush: \"Long speech\"\n")
        .unwrap();
    player
        .start_source("guybrush", "b", "start", ":start\n!b.started = YES\n")
        .unwrap();

    assert_eq!(player.state(), DialogState::None);
    assert_eq!(
        events.borrow().last(),
        Some(&Event::Execute("b.started = YES".to_string()))
    );
}

// =============================================================================
// Flow
// =============================================================================

#[test]
fn falls_through_labels_in_order() {
    let (_, events) = play(
        ":start\nguybrush: \"one\"\n:middle\nguybrush: \"two\"\n:last\nguybrush: \"three\"\n",
        PlayerConfig::default(),
    );
    assert_eq!(
        says(&events),
        vec!["guybrush: one", "guybrush: two", "guybrush: three"]
    );
}

#[test]
fn last_declared_label_wins() {
    let (_, events) = play(
        ":start\nguybrush: \"first\"\n:start\nguybrush: \"second\"\n",
        PlayerConfig::default(),
    );
    assert_eq!(says(&events), vec!["guybrush: second"]);
}

#[test]
fn goto_notifies_host_and_jumps() {
    let (player, events) = play(
        ":start\n-> end\nguybrush: \"skipped\"\n:end\nshutup\n",
        PlayerConfig::default(),
    );
    assert_eq!(
        *events.borrow(),
        vec![Event::Goto("end".to_string()), Event::Shutup]
    );
    assert_eq!(player.state(), DialogState::None);
}

#[test]
fn goto_undefined_label_ends_dialog() {
    let (player, events) = play(
        ":start\n-> nowhere\nguybrush: \"unreachable\"\n",
        PlayerConfig::default(),
    );
    assert!(says(&events).is_empty());
    assert_eq!(player.state(), DialogState::None);
}

#[test]
fn public_goto_label_navigates() {
    let (mut player, events) = play(
        ":start\n1 \"a\" -> start\n:secret\nguybrush: \"Found it\"\n",
        PlayerConfig::default(),
    );
    player.goto_label("secret");
    assert_eq!(player.current_label(), Some("secret"));
    assert_eq!(says(&events), vec!["guybrush: Found it"]);

    player.goto_label("missing");
    assert_eq!(player.state(), DialogState::None);
}

#[test]
fn label_cycle_never_blocks_an_update() {
    let (mut player, events) = new_player(PlayerConfig::default());
    player
        .start_source("guybrush", "test", "a", ":a\n!tick\n-> b\n:b\n-> a\n")
        .unwrap();
    assert_eq!(player.player_state(), PlayerState::Running);

    let ticks = |events: &crate::host::Events| {
        events
            .borrow()
            .iter()
            .filter(|e| matches!(e, Event::Execute(_)))
            .count()
    };
    assert_eq!(ticks(&events), 128);

    player.update();
    assert_eq!(ticks(&events), 256);
    player.end_dialog();
    assert_eq!(player.state(), DialogState::None);
}

// =============================================================================
// Waits
// =============================================================================

#[test]
fn wait_instructions_call_host() {
    let (_, events) = play(
        ":start\nwaitfor elaine\nwaitwhile g.busy\npause 1.5\nwaitfor\n",
        PlayerConfig::default(),
    );
    assert_eq!(
        *events.borrow(),
        vec![
            Event::WaitFor("elaine".to_string()),
            Event::WaitWhile("g.busy".to_string()),
            Event::Pause(1.5),
            Event::WaitFor(String::new()),
        ]
    );
}

#[test]
fn pending_say_holds_the_cursor() {
    let (mut player, events) = slow_player(2);
    player
        .start_source("guybrush", "test", "start", ":start\nguybrush: \"Hi\"\n!after\n")
        .unwrap();

    player.update();
    player.update();
    assert_eq!(player.player_state(), PlayerState::WaitingEndAnimation);
    assert_eq!(events.borrow().len(), 1);

    player.update();
    assert_eq!(events.borrow().last(), Some(&Event::Execute("after".to_string())));
    assert_eq!(player.state(), DialogState::None);
}

#[test]
fn end_dialog_drops_pending_wait() {
    let (mut player, events) = slow_player(5);
    player
        .start_source("guybrush", "test", "start", ":start\nguybrush: \"Hi\"\n!after\n")
        .unwrap();
    player.end_dialog();
    player.update();
    player.update();
    assert_eq!(player.state(), DialogState::None);
    assert_eq!(events.borrow().len(), 1);
}

// =============================================================================
// Instructions
// =============================================================================

#[test]
fn instructions_reach_host() {
    let (player, events) = play(
        ":start\nallowobjects\ndialog elaine\noverride exit\nlimit 3\nshutup\n",
        PlayerConfig::default(),
    );
    assert_eq!(
        *events.borrow(),
        vec![
            Event::AllowObjects(true),
            Event::Dialog("elaine".to_string()),
            Event::Override("exit".to_string()),
            Event::Limit(3),
            Event::Shutup,
        ]
    );
    assert_eq!(player.override_node(), "exit");
    assert_eq!(player.limit(), 3);
}

#[test]
fn start_resets_session_settings() {
    let (mut player, _) = play(
        ":start\nparrot no\nlimit 1\noverride exit\n",
        PlayerConfig::default(),
    );
    assert!(!player.parrot());

    player.start_source("guybrush", "test", "start", ":start\n").unwrap();
    assert!(player.parrot());
    assert_eq!(player.limit(), 6);
    assert_eq!(player.override_node(), "");
}
