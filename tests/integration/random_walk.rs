//! Random choice sequences against a branching dialog.

use proptest::prelude::*;
use yack::runtime::{DialogState, MAX_CHOICES};

use crate::end_to_end::{settle, transcript_player};

const MAZE: &str = r#":start
guybrush: "Where now?"
1 "North" -> north [once]
2 "South" -> south [showonce]
3 "Stay" -> start
4 "Quit" -> done
:north
!g.steps = g.steps + 1
-> start
:south
pause 0.5
1 "Back" -> start
2 "Onward" -> done [temponce]
:done
shutup
"#;

proptest! {
    #[test]
    fn player_survives_any_choice_sequence(picks in prop::collection::vec(0..12usize, 0..30)) {
        let (mut player, _) = transcript_player();
        player.start_source("guybrush", "maze", "start", MAZE).unwrap();
        settle(&mut player);

        for pick in picks {
            let shown = player.choice_texts().len();
            prop_assert!(shown <= MAX_CHOICES);
            if player.state() == DialogState::WaitingForChoice {
                prop_assert!(shown > 0);
            }
            player.choose(pick);
            settle(&mut player);
        }
        prop_assert_ne!(player.state(), DialogState::Active);
    }
}
