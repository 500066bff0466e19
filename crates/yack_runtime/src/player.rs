//! The dialog interpreter.
//!
//! A [`DialogPlayer`] owns one parsed [`CompilationUnit`] per `start()` and
//! walks it a little on every `update()`. It suspends whenever the host
//! hands back a [`WaitAction`] and whenever choices are on screen, so a
//! single frame never blocks.
//!
//! # Example
//!
//! ```
//! use yack_runtime::{
//!     DialogConditions, DialogContext, DialogPlayer, DialogState, Ready, WaitAction,
//! };
//!
//! struct Host;
//!
//! impl DialogContext for Host {
//!     fn allow_objects(&mut self, _allow: bool) {}
//!     fn dialog(&mut self, _actor: &str) {}
//!     fn execute(&mut self, _code: &str) {}
//!     fn shutup(&mut self) {}
//!     fn say(&mut self, actor: &str, text: &str) -> Box<dyn WaitAction> {
//!         println!("{actor}: {text}");
//!         Box::new(Ready)
//!     }
//!     fn pause(&mut self, _seconds: f32) -> Box<dyn WaitAction> {
//!         Box::new(Ready)
//!     }
//!     fn wait_for(&mut self, _actor: &str) -> Box<dyn WaitAction> {
//!         Box::new(Ready)
//!     }
//!     fn wait_while(&mut self, _condition: &str) -> Box<dyn WaitAction> {
//!         Box::new(Ready)
//!     }
//! }
//!
//! impl DialogConditions for Host {
//!     fn execute_condition(&mut self, _code: &str) -> bool {
//!         true
//!     }
//! }
//!
//! let mut player = DialogPlayer::new(Box::new(Host), Box::new(Host));
//! player
//!     .start_source("guybrush", "intro", "start", ":start\nguybrush: \"Hi\"\n1 \"Bye\" -> end\n:end\n")
//!     .unwrap();
//! player.update();
//! assert_eq!(player.state(), DialogState::WaitingForChoice);
//! player.choose(1);
//! player.update();
//! assert_eq!(player.state(), DialogState::None);
//! ```

use std::rc::Rc;

use log::{debug, trace, warn};
use yack_foundation::{ErrorContext, Result};
use yack_language::{CompilationUnit, Condition, Expression, Statement, parse};

use crate::config::PlayerConfig;
use crate::context::{DialogConditions, DialogContext, WaitAction};
use crate::loader::{DialogLoader, FileLoader, dialog_file_name};
use crate::state::{ConditionLog, ConditionMode, ConditionSite, DialogConditionState};

/// Number of choice slots.
pub const MAX_CHOICES: usize = 9;

/// Coarse dialog state reported to the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialogState {
    /// No dialog is running.
    None,
    /// A dialog is running or waiting on the host.
    Active,
    /// Choices are on screen and the player waits for `choose()`.
    WaitingForChoice,
}

/// Internal interpreter state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerState {
    /// No dialog is running.
    None,
    /// A label was just selected.
    Start,
    /// Statements are being executed.
    Running,
    /// Choices are on screen.
    WaitingForChoice,
    /// A statement's wait action has not finished yet.
    WaitingEndAnimation,
    /// The actor is saying the chosen line.
    WaitingForSayingChoice,
}

/// What the cursor does after a statement runs.
enum Flow {
    Next,
    Wait(Box<dyn WaitAction>),
    Jump(String),
}

/// Interpreter for Yack dialogs.
pub struct DialogPlayer {
    context: Box<dyn DialogContext>,
    conditions: Box<dyn DialogConditions>,
    loader: Box<dyn DialogLoader>,
    config: PlayerConfig,
    states: ConditionLog,
    unit: Rc<CompilationUnit>,
    actor: String,
    dialog_name: String,
    label: Option<usize>,
    cursor: usize,
    /// Statement index per slot, within the current label.
    choices: [Option<usize>; MAX_CHOICES],
    state: PlayerState,
    wait: Option<Box<dyn WaitAction>>,
    destination: String,
    parrot: bool,
    limit: usize,
    override_node: String,
}

impl DialogPlayer {
    /// Creates a player that loads dialogs from the current directory.
    #[must_use]
    pub fn new(context: Box<dyn DialogContext>, conditions: Box<dyn DialogConditions>) -> Self {
        let config = PlayerConfig::default();
        Self {
            context,
            conditions,
            loader: Box::new(FileLoader::new(".")),
            parrot: config.default_parrot,
            limit: config.default_limit,
            config,
            states: ConditionLog::new(),
            unit: Rc::new(CompilationUnit::new()),
            actor: String::new(),
            dialog_name: String::new(),
            label: None,
            cursor: 0,
            choices: [None; MAX_CHOICES],
            state: PlayerState::None,
            wait: None,
            destination: String::new(),
            override_node: String::new(),
        }
    }

    /// Replaces the dialog loader.
    #[must_use]
    pub fn with_loader(mut self, loader: Box<dyn DialogLoader>) -> Self {
        self.loader = loader;
        self
    }

    /// Replaces the configuration. Takes effect at the next `start()`.
    #[must_use]
    pub fn with_config(mut self, config: PlayerConfig) -> Self {
        self.parrot = config.default_parrot;
        self.limit = config.default_limit;
        self.config = config;
        self
    }

    /// Starts with a previously saved condition log.
    #[must_use]
    pub fn with_states(mut self, states: ConditionLog) -> Self {
        self.states = states;
        self
    }

    /// Loads `<dialog_name>.byack` and starts it at the given label.
    ///
    /// # Errors
    /// Returns an error if the dialog cannot be loaded or parsed. The player
    /// is left without a dialog.
    pub fn start(&mut self, actor: &str, dialog_name: &str, node: &str) -> Result<()> {
        let source = match self.loader.load(dialog_name) {
            Ok(source) => source,
            Err(e) => {
                self.reset();
                return Err(e);
            }
        };
        self.start_source(actor, dialog_name, node, &source)
    }

    /// Starts a dialog from in-memory source.
    ///
    /// # Errors
    /// Returns an error if the source does not parse. The player is left
    /// without a dialog.
    pub fn start_source(
        &mut self,
        actor: &str,
        dialog_name: &str,
        node: &str,
        source: &str,
    ) -> Result<()> {
        self.reset();

        let unit = parse(source).map_err(|e| {
            e.with_context(ErrorContext::new().with_source(dialog_file_name(dialog_name)))
        })?;

        debug!("starting dialog {dialog_name} at {node} for {actor}");
        self.unit = Rc::new(unit);
        self.actor = actor.to_string();
        self.dialog_name = dialog_name.to_string();
        self.select_label(node);
        Ok(())
    }

    /// Selects the choice with the given 1-based ordinal among those shown.
    ///
    /// Ignored unless the player is waiting for a choice.
    pub fn choose(&mut self, choice_id: usize) {
        if self.state != PlayerState::WaitingForChoice {
            debug!("ignoring choice {choice_id} in state {:?}", self.state);
            return;
        }

        let unit = Rc::clone(&self.unit);
        let Some(statement) = choice_id
            .checked_sub(1)
            .and_then(|ordinal| self.choices.iter().flatten().nth(ordinal))
            .and_then(|&index| self.statement(&unit, index))
        else {
            debug!("ignoring choice {choice_id}: no such choice");
            return;
        };
        let Some((_, text, goto)) = statement.as_choice() else {
            return;
        };

        self.record(statement, &[ConditionMode::Once, ConditionMode::OnceEver]);

        if self.parrot {
            self.state = PlayerState::WaitingForSayingChoice;
            self.destination = goto.to_string();
            self.wait = Some(self.context.say(&self.actor, text));
        } else {
            self.select_label(goto);
        }
    }

    /// Advances the dialog. Call once per frame.
    pub fn update(&mut self) {
        match self.state {
            PlayerState::None | PlayerState::WaitingForChoice => {}
            PlayerState::Start | PlayerState::Running => self.running(),
            PlayerState::WaitingEndAnimation => {
                if self.poll_wait() {
                    self.cursor += 1;
                    self.running();
                }
            }
            PlayerState::WaitingForSayingChoice => {
                if self.poll_wait() {
                    let destination = std::mem::take(&mut self.destination);
                    self.select_label(&destination);
                }
            }
        }
    }

    /// Jumps to the last label with the given name; ends the dialog if there is none.
    pub fn goto_label(&mut self, name: &str) {
        self.select_label(name);
    }

    /// Ends the dialog.
    pub fn end_dialog(&mut self) {
        if self.state != PlayerState::None {
            debug!("dialog {} ended", self.dialog_name);
        }
        self.state = PlayerState::None;
        self.label = None;
        self.cursor = 0;
        self.wait = None;
        self.destination.clear();
        self.clear_choices();
    }

    /// Returns the coarse dialog state.
    #[must_use]
    pub fn state(&self) -> DialogState {
        match self.state {
            PlayerState::None => DialogState::None,
            PlayerState::WaitingForChoice => DialogState::WaitingForChoice,
            _ => DialogState::Active,
        }
    }

    /// Returns the interpreter state.
    #[must_use]
    pub fn player_state(&self) -> PlayerState {
        self.state
    }

    /// Returns the choice statements in their slots.
    #[must_use]
    pub fn choices(&self) -> [Option<&Statement>; MAX_CHOICES] {
        std::array::from_fn(|slot| {
            self.choices[slot].and_then(|index| self.statement(&self.unit, index))
        })
    }

    /// Returns the texts of the choices on screen, in ordinal order.
    #[must_use]
    pub fn choice_texts(&self) -> Vec<&str> {
        self.choices()
            .into_iter()
            .flatten()
            .filter_map(|statement| statement.as_choice().map(|(_, text, _)| text))
            .collect()
    }

    /// Returns the actor the dialog was started with.
    #[must_use]
    pub fn actor(&self) -> &str {
        &self.actor
    }

    /// Returns the name of the running dialog.
    #[must_use]
    pub fn dialog_name(&self) -> &str {
        &self.dialog_name
    }

    /// Returns the name of the current label.
    #[must_use]
    pub fn current_label(&self) -> Option<&str> {
        self.label
            .and_then(|index| self.unit.label(index))
            .map(|label| label.name.as_str())
    }

    /// Returns the condition log.
    #[must_use]
    pub fn states(&self) -> &ConditionLog {
        &self.states
    }

    /// Replaces the condition log.
    pub fn set_states(&mut self, states: ConditionLog) {
        self.states = states;
    }

    /// Returns whether chosen lines are said.
    #[must_use]
    pub fn parrot(&self) -> bool {
        self.parrot
    }

    /// Returns the maximum number of choices shown at once.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Returns the node set by the last `override` instruction.
    #[must_use]
    pub fn override_node(&self) -> &str {
        &self.override_node
    }

    /// Returns the parsed dialog.
    #[must_use]
    pub fn compilation_unit(&self) -> &CompilationUnit {
        &self.unit
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Drops the running dialog and restores per-session defaults.
    fn reset(&mut self) {
        self.end_dialog();
        self.states.purge_temp_once();
        self.parrot = self.config.default_parrot;
        self.limit = self.config.default_limit;
        self.override_node.clear();
        self.unit = Rc::new(CompilationUnit::new());
    }

    fn select_label(&mut self, name: &str) {
        if self.enter_label(name) {
            self.running();
        }
    }

    /// Moves to the named label without running it.
    fn enter_label(&mut self, name: &str) -> bool {
        match self.unit.find_label(name) {
            Some(index) => {
                debug!("entering label {name}");
                self.enter_index(index);
                true
            }
            None => {
                debug!("label {name} not found in {}", self.dialog_name);
                self.end_dialog();
                false
            }
        }
    }

    fn enter_index(&mut self, index: usize) {
        self.label = Some(index);
        self.cursor = 0;
        self.clear_choices();
        self.state = PlayerState::Start;
    }

    fn running(&mut self) {
        self.state = PlayerState::Running;
        let unit = Rc::clone(&self.unit);
        let mut jumps = 0;

        'labels: loop {
            let Some((index, label)) = self
                .label
                .and_then(|index| unit.label(index).map(|label| (index, label)))
            else {
                self.end_dialog();
                return;
            };

            while let Some(statement) = label.statements.get(self.cursor) {
                if !self.accept_conditions(statement) {
                    self.cursor += 1;
                    continue;
                }
                if let Some((number, _, _)) = statement.as_choice() {
                    self.add_choice(number, self.cursor);
                    self.cursor += 1;
                    continue;
                }
                if self.has_choices() {
                    self.state = PlayerState::WaitingForChoice;
                    return;
                }

                match self.run(statement) {
                    Flow::Next => self.cursor += 1,
                    Flow::Wait(wait) => {
                        self.wait = Some(wait);
                        self.state = PlayerState::WaitingEndAnimation;
                        return;
                    }
                    Flow::Jump(name) => {
                        if !self.enter_label(&name) {
                            return;
                        }
                        self.state = PlayerState::Running;
                        jumps += 1;
                        if jumps >= self.config.max_jumps_per_update {
                            debug!("jump budget spent, resuming {name} next update");
                            return;
                        }
                        continue 'labels;
                    }
                }
            }

            if self.has_choices() {
                self.state = PlayerState::WaitingForChoice;
                return;
            }

            if unit.label(index + 1).is_none() {
                self.end_dialog();
                return;
            }
            self.enter_index(index + 1);
            self.state = PlayerState::Running;
        }
    }

    /// Evaluates a statement's conditions, then logs its `showonce` and `temponce` sites.
    fn accept_conditions(&mut self, statement: &Statement) -> bool {
        let mut accepted = true;
        for condition in &statement.conditions {
            let site = ConditionSite::new(&self.actor, &self.dialog_name, condition.line());
            let holds = match condition {
                Condition::Code { code, .. } => self.conditions.execute_condition(code),
                Condition::Once { .. } => self.conditions.is_once(&self.states, site),
                Condition::ShowOnce { .. } => self.conditions.is_show_once(&self.states, site),
                Condition::OnceEver { .. } => self.conditions.is_once_ever(&self.states, site),
                Condition::TempOnce { .. } => self.conditions.is_temp_once(&self.states, site),
            };
            if !holds {
                accepted = false;
                break;
            }
        }

        self.record(statement, &[ConditionMode::ShowOnce, ConditionMode::TempOnce]);
        accepted
    }

    fn run(&mut self, statement: &Statement) -> Flow {
        trace!(
            "{}: running {} in {:?}",
            self.dialog_name,
            statement.expression.name(),
            self.current_label()
        );

        let flow = match &statement.expression {
            Expression::Say { actor, text } => Flow::Wait(self.context.say(actor, text)),
            Expression::Choice { .. } => Flow::Next,
            Expression::Code { code } => {
                self.context.execute(code);
                Flow::Next
            }
            Expression::Goto { name } => {
                self.context.goto_label(name);
                Flow::Jump(name.clone())
            }
            Expression::Pause { seconds } => Flow::Wait(self.context.pause(*seconds)),
            Expression::Parrot { active } => {
                self.parrot = *active;
                self.context.parrot(*active);
                Flow::Next
            }
            Expression::Dialog { actor } => {
                self.context.dialog(actor);
                Flow::Next
            }
            Expression::Override { node } => {
                self.override_node.clone_from(node);
                self.context.override_node(node);
                Flow::Next
            }
            Expression::Shutup => {
                self.context.shutup();
                Flow::Next
            }
            Expression::AllowObjects { allow } => {
                self.context.allow_objects(*allow);
                Flow::Next
            }
            Expression::WaitWhile { condition } => {
                Flow::Wait(self.context.wait_while(condition))
            }
            Expression::WaitFor { actor } => Flow::Wait(self.context.wait_for(actor)),
            Expression::Limit { max } => {
                self.limit = usize::try_from(*max).unwrap_or(0);
                self.context.limit(self.limit);
                Flow::Next
            }
        };

        self.record(statement, &[ConditionMode::Once, ConditionMode::OnceEver]);
        flow
    }

    fn add_choice(&mut self, number: i32, index: usize) {
        let Some(slot) = usize::try_from(number)
            .ok()
            .and_then(|n| n.checked_sub(1))
            .filter(|&slot| slot < MAX_CHOICES)
        else {
            warn!(
                "{}: dropping choice {number}, slots run from 1 to {MAX_CHOICES}",
                self.dialog_name
            );
            return;
        };

        if self.choices[slot].is_some() {
            debug!("choice slot {number} already filled");
            return;
        }
        if self.choice_count() >= self.limit {
            debug!("choice {number} over the limit of {}", self.limit);
            return;
        }
        self.choices[slot] = Some(index);
    }

    /// Logs the statement's conditions of the given modes as fired.
    fn record(&mut self, statement: &Statement, modes: &[ConditionMode]) {
        for condition in &statement.conditions {
            let Some(mode) = condition_mode(condition) else {
                continue;
            };
            if modes.contains(&mode) {
                let site = ConditionSite::new(&self.actor, &self.dialog_name, condition.line());
                self.states.record(DialogConditionState::new(mode, site));
            }
        }
    }

    fn poll_wait(&mut self) -> bool {
        let ready = self
            .wait
            .as_mut()
            .is_none_or(|wait| wait.poll().is_ready());
        if ready {
            self.wait = None;
        }
        ready
    }

    fn statement<'a>(&self, unit: &'a CompilationUnit, index: usize) -> Option<&'a Statement> {
        self.label
            .and_then(|label| unit.label(label))
            .and_then(|label| label.statements.get(index))
    }

    fn has_choices(&self) -> bool {
        self.choices.iter().any(Option::is_some)
    }

    fn choice_count(&self) -> usize {
        self.choices.iter().flatten().count()
    }

    fn clear_choices(&mut self) {
        self.choices = [None; MAX_CHOICES];
    }
}

/// Returns the log scope of a built-in condition.
fn condition_mode(condition: &Condition) -> Option<ConditionMode> {
    match condition {
        Condition::Code { .. } => None,
        Condition::Once { .. } => Some(ConditionMode::Once),
        Condition::ShowOnce { .. } => Some(ConditionMode::ShowOnce),
        Condition::OnceEver { .. } => Some(ConditionMode::OnceEver),
        Condition::TempOnce { .. } => Some(ConditionMode::TempOnce),
    }
}
