//! Terminal host for the dialog player.
//!
//! [`ConsoleContext`] prints says to a writer and honours pauses with
//! deadlines, [`ConsoleConditions`] answers code conditions with a fixed
//! value, and [`run_dialog`] drives a player until it ends or the user quits.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;
use std::task::Poll;
use std::time::{Duration, Instant};

use log::{debug, info};
use yack_foundation::{Error, Result};

use crate::context::{DialogConditions, DialogContext, Ready, WaitAction};
use crate::editor::{LineEditor, ReadResult};
use crate::player::{DialogPlayer, DialogState};

/// Time between updates while the player waits on the host.
const FRAME: Duration = Duration::from_millis(16);

/// Output shared between the console host and the driving loop.
pub type SharedOutput = Rc<RefCell<dyn Write>>;

/// Waits until a point in time.
#[derive(Clone, Copy, Debug)]
pub struct Deadline {
    until: Instant,
}

impl Deadline {
    /// Creates a wait ending after the given duration.
    #[must_use]
    pub fn after(duration: Duration) -> Self {
        Self {
            until: Instant::now() + duration,
        }
    }
}

impl WaitAction for Deadline {
    fn poll(&mut self) -> Poll<()> {
        if Instant::now() >= self.until {
            Poll::Ready(())
        } else {
            Poll::Pending
        }
    }
}

/// A [`DialogContext`] that prints to a terminal.
pub struct ConsoleContext {
    output: SharedOutput,
    time_scale: f32,
}

impl ConsoleContext {
    /// Creates a context writing to the given output.
    #[must_use]
    pub fn new(output: SharedOutput) -> Self {
        Self {
            output,
            time_scale: 1.0,
        }
    }

    /// Scales pause durations. `0.0` makes pauses finish at once.
    #[must_use]
    pub fn with_time_scale(mut self, scale: f32) -> Self {
        self.time_scale = scale.max(0.0);
        self
    }

    fn print(&self, line: &str) {
        let _ = writeln!(self.output.borrow_mut(), "{line}");
    }
}

impl DialogContext for ConsoleContext {
    fn allow_objects(&mut self, allow: bool) {
        debug!("allow objects: {allow}");
    }

    fn dialog(&mut self, actor: &str) {
        debug!("dialog handed to {actor}");
    }

    fn execute(&mut self, code: &str) {
        info!("execute: {code}");
    }

    fn shutup(&mut self) {
        debug!("shutup");
    }

    fn say(&mut self, actor: &str, text: &str) -> Box<dyn WaitAction> {
        self.print(&format!("{actor}: {text}"));
        Box::new(Ready)
    }

    fn pause(&mut self, seconds: f32) -> Box<dyn WaitAction> {
        let duration = Duration::try_from_secs_f32(seconds * self.time_scale).unwrap_or_default();
        Box::new(Deadline::after(duration))
    }

    fn wait_for(&mut self, actor: &str) -> Box<dyn WaitAction> {
        debug!("wait for {actor:?}");
        Box::new(Ready)
    }

    fn wait_while(&mut self, condition: &str) -> Box<dyn WaitAction> {
        debug!("wait while {condition}");
        Box::new(Ready)
    }

    fn goto_label(&mut self, label: &str) {
        debug!("goto {label}");
    }
}

/// [`DialogConditions`] answering every code condition with the same value.
#[derive(Clone, Copy, Debug)]
pub struct ConsoleConditions {
    allow_code: bool,
}

impl ConsoleConditions {
    /// Creates conditions where code evaluates to `allow_code`.
    #[must_use]
    pub const fn new(allow_code: bool) -> Self {
        Self { allow_code }
    }
}

impl DialogConditions for ConsoleConditions {
    fn execute_condition(&mut self, code: &str) -> bool {
        debug!("condition {code} -> {}", self.allow_code);
        self.allow_code
    }
}

/// How a console session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The dialog reached its end.
    Finished,
    /// The user quit while choosing.
    Quit,
}

/// Drives the player until the dialog ends or the user quits.
///
/// # Errors
///
/// Returns an error if reading input or writing output fails.
pub fn run_dialog(
    player: &mut DialogPlayer,
    editor: &mut dyn LineEditor,
    output: &SharedOutput,
) -> Result<Outcome> {
    loop {
        match player.state() {
            DialogState::None => return Ok(Outcome::Finished),
            DialogState::Active => {
                if advance(player) {
                    std::thread::sleep(FRAME);
                }
            }
            DialogState::WaitingForChoice => {
                let texts: Vec<String> = player
                    .choice_texts()
                    .into_iter()
                    .map(str::to_string)
                    .collect();
                print_choices(output, &texts)?;
                editor.set_choice_count(texts.len());

                match read_choice(editor, texts.len())? {
                    Some(choice) => player.choose(choice),
                    None => return Ok(Outcome::Quit),
                }
            }
        }
    }
}

/// Updates the player once. Returns true while it still needs more frames,
/// including a label cycle that spent its jump budget.
fn advance(player: &mut DialogPlayer) -> bool {
    player.update();
    player.state() == DialogState::Active
}

fn print_choices(output: &SharedOutput, texts: &[String]) -> Result<()> {
    let mut out = output.borrow_mut();
    for (i, text) in texts.iter().enumerate() {
        writeln!(out, "  {}. {text}", i + 1)
            .map_err(|e| Error::io(format!("failed to write choices: {e}")))?;
    }
    Ok(())
}

/// Reads until a valid choice is entered. `None` means quit.
fn read_choice(editor: &mut dyn LineEditor, count: usize) -> Result<Option<usize>> {
    loop {
        let line = match editor.read_line("> ")? {
            ReadResult::Line(line) => line,
            ReadResult::Interrupted | ReadResult::Eof => return Ok(None),
        };
        let input = line.trim();
        if input == "q" || input == "quit" {
            return Ok(None);
        }
        if let Ok(choice) = input.parse::<usize>() {
            if (1..=count).contains(&choice) {
                editor.add_history(input);
                return Ok(Some(choice));
            }
        }
    }
}
