//! Host interfaces for the dialog player.
//!
//! The player never talks, animates or evaluates script on its own. It calls
//! into a [`DialogContext`] for effects and a [`DialogConditions`] for gates,
//! and polls the [`WaitAction`]s they hand back.

use std::task::Poll;

use crate::state::{ConditionLog, ConditionMode, ConditionSite};

/// A pending host operation the player waits on.
///
/// The player polls it once per `update()` and never blocks on it.
pub trait WaitAction {
    /// Returns `Poll::Ready(())` once the operation has finished.
    fn poll(&mut self) -> Poll<()>;
}

impl<F: FnMut() -> bool> WaitAction for F {
    fn poll(&mut self) -> Poll<()> {
        if self() { Poll::Ready(()) } else { Poll::Pending }
    }
}

/// A wait action that is finished immediately.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ready;

impl WaitAction for Ready {
    fn poll(&mut self) -> Poll<()> {
        Poll::Ready(())
    }
}

/// Effects the host performs for the player.
pub trait DialogContext {
    /// Allows or forbids using objects while the dialog runs.
    fn allow_objects(&mut self, allow: bool);

    /// Hands the dialog over to another actor.
    fn dialog(&mut self, actor: &str);

    /// Runs host script code.
    fn execute(&mut self, code: &str);

    /// Stops every actor talking.
    fn shutup(&mut self);

    /// Makes an actor say a line.
    fn say(&mut self, actor: &str, text: &str) -> Box<dyn WaitAction>;

    /// Waits for the given number of seconds.
    fn pause(&mut self, seconds: f32) -> Box<dyn WaitAction>;

    /// Waits until an actor stops talking. An empty name means the host's default.
    fn wait_for(&mut self, actor: &str) -> Box<dyn WaitAction>;

    /// Waits while a host condition holds.
    fn wait_while(&mut self, condition: &str) -> Box<dyn WaitAction>;

    /// Notified when the player jumps to a label.
    fn goto_label(&mut self, _label: &str) {}

    /// Notified when the choice limit changes.
    fn limit(&mut self, _max: usize) {}

    /// Notified when an override node is set.
    fn override_node(&mut self, _node: &str) {}

    /// Notified when parrot mode changes.
    fn parrot(&mut self, _enabled: bool) {}
}

/// Gates the host evaluates for the player.
///
/// Only `execute_condition` is required. The `once` family defaults to
/// looking the site up in the player's log; a host may override them to
/// keep its own bookkeeping.
pub trait DialogConditions {
    /// Evaluates a host code condition.
    fn execute_condition(&mut self, code: &str) -> bool;

    /// True while a `[once]` statement has not been run or chosen.
    fn is_once(&mut self, log: &ConditionLog, site: ConditionSite<'_>) -> bool {
        !log.contains(ConditionMode::Once, site)
    }

    /// True while a `[showonce]` statement has not been shown.
    fn is_show_once(&mut self, log: &ConditionLog, site: ConditionSite<'_>) -> bool {
        !log.contains(ConditionMode::ShowOnce, site)
    }

    /// True while an `[onceever]` statement has not been run by any actor.
    fn is_once_ever(&mut self, log: &ConditionLog, site: ConditionSite<'_>) -> bool {
        !log.contains(ConditionMode::OnceEver, site)
    }

    /// True while a `[temponce]` statement has not been shown since `start()`.
    fn is_temp_once(&mut self, log: &ConditionLog, site: ConditionSite<'_>) -> bool {
        !log.contains(ConditionMode::TempOnce, site)
    }
}
