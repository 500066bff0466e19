//! Tests for choice slots, limits, and parrot mode.

use yack_language::Statement;
use yack_runtime::{DialogPlayer, DialogState, PlayerConfig, PlayerState};

use crate::host::{Event, RecordingConditions, RecordingContext, new_player, play, says, settle};

fn texts(player: &DialogPlayer) -> Vec<&str> {
    player.choice_texts()
}

// =============================================================================
// Slots
// =============================================================================

#[test]
fn choices_stop_before_next_statement() {
    let (player, events) = play(
        ":start\n1 \"a\" -> x\nguybrush: \"not yet\"\n:x\n",
        PlayerConfig::silent(),
    );
    assert_eq!(player.state(), DialogState::WaitingForChoice);
    assert!(says(&events).is_empty());
}

#[test]
fn choose_uses_ordinal_among_filled_slots() {
    let (mut player, events) = play(
        ":start\n1 \"one\" -> one\n3 \"three\" -> three\n:one\nguybrush: \"One\"\n-> end\n:three\nguybrush: \"Three\"\n",
        PlayerConfig::silent(),
    );
    let choices = player.choices();
    assert!(choices[0].is_some());
    assert!(choices[1].is_none());
    assert!(choices[2].is_some());

    player.choose(2);
    settle(&mut player);
    assert_eq!(says(&events), vec!["guybrush: Three"]);
}

#[test]
fn duplicate_and_out_of_range_numbers_are_dropped() {
    let (player, _) = play(
        ":start\n0 \"zero\" -> x\n1 \"first\" -> x\n1 \"second\" -> x\n10 \"ten\" -> x\n",
        PlayerConfig::silent(),
    );
    assert_eq!(texts(&player), vec!["first"]);
}

#[test]
fn choices_view_exposes_statements() {
    let (player, _) = play(":start\n2 $30021 -> bye\n", PlayerConfig::silent());
    let slot = player.choices()[1].map(Statement::as_choice);
    assert_eq!(slot, Some(Some((2, "$30021", "bye"))));
}

// =============================================================================
// Limit
// =============================================================================

#[test]
fn limit_keeps_first_passing_choices() {
    let events = Default::default();
    let mut player = DialogPlayer::new(
        Box::new(RecordingContext::new(&events)),
        Box::new(RecordingConditions::new(&events).with_result("g.no", false)),
    );
    player
        .start_source(
            "guybrush",
            "test",
            "start",
            ":start\nlimit 2\n1 \"a\" -> x\n2 \"b\" -> x [g.no]\n3 \"c\" -> x\n4 \"d\" -> x\n:x\n",
        )
        .unwrap();

    assert_eq!(player.limit(), 2);
    assert_eq!(player.choice_texts(), vec!["a", "c"]);
    assert!(events.borrow().contains(&Event::Limit(2)));
}

#[test]
fn default_limit_is_six() {
    let source = ":start\n1 \"1\" -> x\n2 \"2\" -> x\n3 \"3\" -> x\n4 \"4\" -> x\n5 \"5\" -> x\n6 \"6\" -> x\n7 \"7\" -> x\n";
    let (player, _) = play(source, PlayerConfig::default());
    assert_eq!(player.choice_texts().len(), 6);

    let (player, _) = play(source, PlayerConfig::all_choices());
    assert_eq!(player.choice_texts().len(), 7);
}

// =============================================================================
// Choice conditions
// =============================================================================

#[test]
fn chosen_once_choice_disappears() {
    let (mut player, _) = play(
        ":start\n1 \"Tell me a secret\" -> start [once]\n2 \"Bye\" -> end\n",
        PlayerConfig::silent(),
    );
    assert_eq!(texts(&player), vec!["Tell me a secret", "Bye"]);

    player.choose(1);
    settle(&mut player);
    assert_eq!(texts(&player), vec!["Bye"]);
}

#[test]
fn unchosen_once_choice_stays() {
    let (mut player, _) = play(
        ":start\n1 \"Secret\" -> start [once]\n2 \"Again\" -> start\n",
        PlayerConfig::silent(),
    );
    player.choose(2);
    settle(&mut player);
    assert_eq!(texts(&player), vec!["Secret", "Again"]);
}

#[test]
fn shown_show_once_choice_disappears() {
    let (mut player, _) = play(
        ":start\n1 \"Look\" -> start [showonce]\n2 \"Again\" -> start\n",
        PlayerConfig::silent(),
    );
    assert_eq!(texts(&player), vec!["Look", "Again"]);

    player.choose(2);
    settle(&mut player);
    assert_eq!(texts(&player), vec!["Again"]);
}

// =============================================================================
// Parrot
// =============================================================================

#[test]
fn parrot_says_choice_before_navigating() {
    let (mut player, events) = play(
        ":start\n1 \"Ask about grog\" -> grog\n:grog\nbartender: \"Grog!\"\n",
        PlayerConfig::default(),
    );
    player.choose(1);
    assert_eq!(player.player_state(), PlayerState::WaitingForSayingChoice);
    assert_eq!(player.current_label(), Some("start"));
    assert_eq!(says(&events), vec!["guybrush: Ask about grog"]);

    settle(&mut player);
    assert_eq!(
        says(&events),
        vec!["guybrush: Ask about grog", "bartender: Grog!"]
    );
}

#[test]
fn parrot_no_navigates_immediately() {
    let (mut player, events) = play(
        ":start\nparrot no\n1 \"Ask\" -> grog\n:grog\nbartender: \"Grog!\"\n",
        PlayerConfig::default(),
    );
    assert!(events.borrow().contains(&Event::Parrot(false)));

    player.choose(1);
    assert_eq!(player.current_label(), Some("grog"));
    assert_eq!(says(&events), vec!["bartender: Grog!"]);
}

#[test]
fn parrot_waits_for_say_to_finish() {
    let events = Default::default();
    let mut player = DialogPlayer::new(
        Box::new(RecordingContext::new(&events).with_say_frames(2)),
        Box::new(RecordingConditions::new(&events)),
    );
    player
        .start_source("guybrush", "test", "start", ":start\n1 \"Hi\" -> next\n:next\n!done\n")
        .unwrap();
    player.choose(1);

    player.update();
    player.update();
    assert_eq!(player.player_state(), PlayerState::WaitingForSayingChoice);
    player.update();
    assert_eq!(player.state(), DialogState::None);
    assert!(events.borrow().contains(&Event::Execute("done".to_string())));
}

#[test]
fn choose_is_ignored_while_parroting() {
    let (mut player, events) = new_player(PlayerConfig::default());
    player
        .start_source("guybrush", "test", "start", ":start\n1 \"a\" -> x\n2 \"b\" -> x\n:x\n")
        .unwrap();
    player.choose(1);
    player.choose(2);
    assert_eq!(says(&events), vec!["guybrush: a"]);
}
