//! Abstract Syntax Tree for the Yack dialog language.
//!
//! A dialog file parses into one [`CompilationUnit`]: an ordered list of
//! [`Label`]s, each holding the [`Statement`]s that run when the label is
//! entered. The tree is immutable once parsed.

/// A parsed dialog file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CompilationUnit {
    /// Labels in declaration order. Names may repeat.
    pub labels: Vec<Label>,
}

impl CompilationUnit {
    /// Creates an empty compilation unit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the index of the label with the given name.
    ///
    /// When several labels share a name the last declaration wins.
    #[must_use]
    pub fn find_label(&self, name: &str) -> Option<usize> {
        self.labels.iter().rposition(|label| label.name == name)
    }

    /// Returns the label at the given index.
    #[must_use]
    pub fn label(&self, index: usize) -> Option<&Label> {
        self.labels.get(index)
    }
}

/// A named sequence of statements.
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    /// Name used by gotos and `start()`.
    pub name: String,
    /// Statements in source order.
    pub statements: Vec<Statement>,
}

impl Label {
    /// Creates a label with no statements.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            statements: Vec::new(),
        }
    }
}

/// One expression guarded by zero or more conditions.
#[derive(Clone, Debug, PartialEq)]
pub struct Statement {
    /// What the statement does.
    pub expression: Expression,
    /// Conditions that must all hold for the statement to run.
    pub conditions: Vec<Condition>,
}

impl Statement {
    /// Creates an unconditional statement.
    #[must_use]
    pub fn new(expression: Expression) -> Self {
        Self {
            expression,
            conditions: Vec::new(),
        }
    }

    /// Adds a condition.
    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Returns the choice payload if this statement is a choice.
    #[must_use]
    pub fn as_choice(&self) -> Option<(i32, &str, &str)> {
        match &self.expression {
            Expression::Choice { number, text, goto } => Some((*number, text, goto)),
            _ => None,
        }
    }
}

/// The closed set of things a statement can do.
#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    /// `actor: "text"`
    Say {
        /// Who speaks.
        actor: String,
        /// What is said, quotes stripped.
        text: String,
    },
    /// `1 "text" -> label`
    Choice {
        /// Slot number as written in source (1-based).
        number: i32,
        /// Choice text, or a `$id` text reference.
        text: String,
        /// Label to go to when chosen.
        goto: String,
    },
    /// `!code`
    Code {
        /// Host script, leading `!` stripped.
        code: String,
    },
    /// `-> label`
    Goto {
        /// Target label.
        name: String,
    },
    /// `pause 1.5`
    Pause {
        /// Duration in seconds.
        seconds: f32,
    },
    /// `parrot yes|no`
    Parrot {
        /// Whether chosen lines are echoed.
        active: bool,
    },
    /// `dialog actor`
    Dialog {
        /// Actor that takes over the dialog.
        actor: String,
    },
    /// `override node`
    Override {
        /// Node name to record.
        node: String,
    },
    /// `shutup`
    Shutup,
    /// `allowobjects YES`
    AllowObjects {
        /// Whether objects may be used during the dialog.
        allow: bool,
    },
    /// `waitwhile condition`
    WaitWhile {
        /// Host condition polled until false.
        condition: String,
    },
    /// `waitfor actor`
    WaitFor {
        /// Actor to wait for; empty means the host's default.
        actor: String,
    },
    /// `limit 3`
    Limit {
        /// Maximum number of choices shown at once.
        max: i32,
    },
}

impl Expression {
    /// Returns the instruction keyword or form name for this expression.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Say { .. } => "say",
            Self::Choice { .. } => "choice",
            Self::Code { .. } => "code",
            Self::Goto { .. } => "goto",
            Self::Pause { .. } => "pause",
            Self::Parrot { .. } => "parrot",
            Self::Dialog { .. } => "dialog",
            Self::Override { .. } => "override",
            Self::Shutup => "shutup",
            Self::AllowObjects { .. } => "allowobjects",
            Self::WaitWhile { .. } => "waitwhile",
            Self::WaitFor { .. } => "waitfor",
            Self::Limit { .. } => "limit",
        }
    }
}

/// A gate on a statement.
#[derive(Clone, Debug, PartialEq)]
pub enum Condition {
    /// Any bracket text that is not a built-in keyword, evaluated by the host.
    Code {
        /// Raw bracket content.
        code: String,
        /// Source line.
        line: u32,
    },
    /// `[once]`: until the statement has been run or chosen.
    Once {
        /// Source line.
        line: u32,
    },
    /// `[showonce]`: until the statement has been shown.
    ShowOnce {
        /// Source line.
        line: u32,
    },
    /// `[onceever]`: like once, for any actor.
    OnceEver {
        /// Source line.
        line: u32,
    },
    /// `[temponce]`: like showonce, reset on every start.
    TempOnce {
        /// Source line.
        line: u32,
    },
}

impl Condition {
    /// Builds a condition from bracket text found on the given line.
    #[must_use]
    pub fn from_text(text: &str, line: u32) -> Self {
        match text {
            "once" => Self::Once { line },
            "showonce" => Self::ShowOnce { line },
            "onceever" => Self::OnceEver { line },
            "temponce" => Self::TempOnce { line },
            code => Self::Code {
                code: code.to_string(),
                line,
            },
        }
    }

    /// Returns the source line of this condition.
    #[must_use]
    pub const fn line(&self) -> u32 {
        match self {
            Self::Code { line, .. }
            | Self::Once { line }
            | Self::ShowOnce { line }
            | Self::OnceEver { line }
            | Self::TempOnce { line } => *line,
        }
    }
}
