//! Line editor abstraction for the terminal player.
//!
//! Choices are read through the [`LineEditor`] trait so the console loop can
//! be driven by rustyline in the binary and by a scripted editor in tests.

use std::borrow::Cow;

use rustyline::error::ReadlineError;
use rustyline::highlight::{CmdKind, Highlighter};
use rustyline::history::DefaultHistory;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Completer, Config, Editor, Helper, Hinter, Validator as RLValidator};
use yack_foundation::{Error, ErrorKind, Result};

/// Result of reading a line from the editor.
#[derive(Debug, PartialEq, Eq)]
pub enum ReadResult {
    /// A line was successfully read.
    Line(String),
    /// User pressed Ctrl+C.
    Interrupted,
    /// User pressed Ctrl+D (EOF).
    Eof,
}

/// Abstraction over line editing functionality.
pub trait LineEditor {
    /// Read a line with the given prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if reading from the terminal fails.
    fn read_line(&mut self, prompt: &str) -> Result<ReadResult>;

    /// Add a line to history.
    fn add_history(&mut self, line: &str);

    /// Tells the editor how many choices are on screen.
    fn set_choice_count(&mut self, count: usize);
}

/// Helper for rustyline that colors the prompt and validates choice numbers.
#[derive(Helper, Completer, Hinter, RLValidator)]
struct ChoiceHelper {
    #[rustyline(Validator)]
    validator: ChoiceValidator,
}

impl Highlighter for ChoiceHelper {
    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        default: bool,
    ) -> Cow<'b, str> {
        if default {
            Cow::Owned(format!("\x1b[1;32m{prompt}\x1b[0m"))
        } else {
            Cow::Borrowed(prompt)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _kind: CmdKind) -> bool {
        false
    }
}

/// Accepts a choice number in range, or an empty line, or `q` to quit.
#[derive(Default)]
struct ChoiceValidator {
    count: usize,
}

impl ChoiceValidator {
    fn check(&self, input: &str) -> Option<String> {
        let input = input.trim();
        if input.is_empty() || input == "q" || input == "quit" {
            return None;
        }
        match input.parse::<usize>() {
            Ok(n) if (1..=self.count).contains(&n) => None,
            _ => Some(format!("  pick a choice from 1 to {}", self.count)),
        }
    }
}

impl Validator for ChoiceValidator {
    fn validate(&self, ctx: &mut ValidationContext<'_>) -> rustyline::Result<ValidationResult> {
        Ok(match self.check(ctx.input()) {
            None => ValidationResult::Valid(None),
            Some(message) => ValidationResult::Invalid(Some(message)),
        })
    }
}

/// Line editor implementation using rustyline.
pub struct RustylineEditor {
    editor: Editor<ChoiceHelper, DefaultHistory>,
}

impl RustylineEditor {
    /// Creates a new rustyline-based editor.
    ///
    /// # Errors
    ///
    /// Returns an error if rustyline initialization fails.
    pub fn new() -> Result<Self> {
        let config = Config::builder()
            .auto_add_history(false)
            .max_history_size(100)
            .map_err(|e| Error::new(ErrorKind::Internal(e.to_string())))?
            .build();

        let mut editor = Editor::with_config(config)
            .map_err(|e| Error::new(ErrorKind::Internal(e.to_string())))?;
        editor.set_helper(Some(ChoiceHelper {
            validator: ChoiceValidator::default(),
        }));

        Ok(Self { editor })
    }
}

impl LineEditor for RustylineEditor {
    fn read_line(&mut self, prompt: &str) -> Result<ReadResult> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(ReadResult::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(ReadResult::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadResult::Eof),
            Err(e) => Err(Error::new(ErrorKind::Internal(e.to_string()))),
        }
    }

    fn add_history(&mut self, line: &str) {
        let _ = self.editor.add_history_entry(line);
    }

    fn set_choice_count(&mut self, count: usize) {
        if let Some(helper) = self.editor.helper_mut() {
            helper.validator.count = count;
        }
    }
}
