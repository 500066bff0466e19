//! Pretty-printer for compilation units.
//!
//! Converts a parsed [`CompilationUnit`] back into Yack source. Printing and
//! parsing again yields the same tree.
//!
//! # Example
//!
//! ```
//! use yack_language::{parse, pretty::pretty_print};
//!
//! let unit = parse(":start\nguybrush:   \"Hi\"   [once]\n").unwrap();
//! assert_eq!(pretty_print(&unit), ":start\nguybrush: \"Hi\" [once]\n");
//! ```

use std::fmt::Write;

use crate::ast::{CompilationUnit, Condition, Expression, Label, Statement};

/// Configuration for pretty-printing.
#[derive(Debug, Clone)]
pub struct PrettyConfig {
    /// Whether to put an empty line between labels.
    pub blank_line_between_labels: bool,
    /// Whether to write `1: "text"` instead of `1 "text"` for choices.
    pub choice_colon: bool,
}

impl Default for PrettyConfig {
    fn default() -> Self {
        Self {
            blank_line_between_labels: false,
            choice_colon: false,
        }
    }
}

/// Pretty-print a compilation unit to a string.
#[must_use]
pub fn pretty_print(unit: &CompilationUnit) -> String {
    pretty_print_with_config(unit, &PrettyConfig::default())
}

/// Pretty-print a compilation unit with custom configuration.
#[must_use]
pub fn pretty_print_with_config(unit: &CompilationUnit, config: &PrettyConfig) -> String {
    let mut printer = PrettyPrinter::new(config);
    for (i, label) in unit.labels.iter().enumerate() {
        if i > 0 && config.blank_line_between_labels {
            printer.output.push('\n');
        }
        printer.print_label(label);
    }
    printer.output
}

/// Pretty-print a single statement, without a trailing newline.
#[must_use]
pub fn pretty_print_statement(statement: &Statement) -> String {
    let config = PrettyConfig::default();
    let mut printer = PrettyPrinter::new(&config);
    printer.print_statement(statement);
    printer.output
}

/// Pretty-printer state.
struct PrettyPrinter<'a> {
    config: &'a PrettyConfig,
    output: String,
}

impl<'a> PrettyPrinter<'a> {
    fn new(config: &'a PrettyConfig) -> Self {
        Self {
            config,
            output: String::new(),
        }
    }

    fn print_label(&mut self, label: &Label) {
        let _ = writeln!(self.output, ":{}", label.name);
        for statement in &label.statements {
            self.print_statement(statement);
            self.output.push('\n');
        }
    }

    fn print_statement(&mut self, statement: &Statement) {
        self.print_expression(&statement.expression);
        for condition in &statement.conditions {
            self.output.push(' ');
            self.print_condition(condition);
        }
    }

    fn print_expression(&mut self, expression: &Expression) {
        let out = &mut self.output;
        let _ = match expression {
            Expression::Say { actor, text } => write!(out, "{actor}: \"{text}\""),
            Expression::Choice { number, text, goto } => {
                let colon = if self.config.choice_colon { ":" } else { "" };
                if is_text_id(text) {
                    write!(out, "{number}{colon} {text} -> {goto}")
                } else {
                    write!(out, "{number}{colon} \"{text}\" -> {goto}")
                }
            }
            Expression::Code { code } => write!(out, "!{code}"),
            Expression::Goto { name } => write!(out, "-> {name}"),
            Expression::Pause { seconds } => write!(out, "pause {seconds}"),
            Expression::Parrot { active } => {
                write!(out, "parrot {}", if *active { "yes" } else { "no" })
            }
            Expression::Dialog { actor } => write_instruction(out, "dialog", actor),
            Expression::Override { node } => write_instruction(out, "override", node),
            Expression::Shutup => write!(out, "shutup"),
            Expression::AllowObjects { allow } => {
                write!(out, "allowobjects {}", if *allow { "YES" } else { "NO" })
            }
            Expression::WaitWhile { condition } => write!(out, "waitwhile {condition}"),
            Expression::WaitFor { actor } => write_instruction(out, "waitfor", actor),
            Expression::Limit { max } => write!(out, "limit {max}"),
        };
    }

    fn print_condition(&mut self, condition: &Condition) {
        let text = match condition {
            Condition::Code { code, .. } => code.as_str(),
            Condition::Once { .. } => "once",
            Condition::ShowOnce { .. } => "showonce",
            Condition::OnceEver { .. } => "onceever",
            Condition::TempOnce { .. } => "temponce",
        };
        let _ = write!(self.output, "[{text}]");
    }
}

fn write_instruction(out: &mut String, keyword: &str, argument: &str) -> std::fmt::Result {
    if argument.is_empty() {
        out.write_str(keyword)
    } else {
        write!(out, "{keyword} {argument}")
    }
}

/// Returns true if the text reads back as a `$id` token.
fn is_text_id(text: &str) -> bool {
    text.strip_prefix('$').is_some_and(|id| {
        !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    })
}
