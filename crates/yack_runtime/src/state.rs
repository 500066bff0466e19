//! Condition-state log.
//!
//! The player records a [`DialogConditionState`] whenever a `once`-family
//! condition fires. The log is a set of facts: entries are only ever added,
//! except for the `temponce` purge at every `start()`.

use im::Vector;
use serde::{Deserialize, Serialize};

/// Which persistence scope an entry belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionMode {
    /// Run or chosen once, per actor.
    Once,
    /// Shown once, per actor.
    ShowOnce,
    /// Run or chosen once, for any actor.
    OnceEver,
    /// Shown once, until the next `start()`.
    TempOnce,
}

/// Where a condition sits: who is talking, in which dialog, on which line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConditionSite<'a> {
    /// Actor the dialog was started with.
    pub actor: &'a str,
    /// Dialog name.
    pub dialog: &'a str,
    /// 1-based source line of the condition.
    pub line: u32,
}

impl<'a> ConditionSite<'a> {
    /// Creates a new site.
    #[must_use]
    pub const fn new(actor: &'a str, dialog: &'a str, line: u32) -> Self {
        Self {
            actor,
            dialog,
            line,
        }
    }
}

/// One fact in the log.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DialogConditionState {
    /// Scope of the condition.
    pub mode: ConditionMode,
    /// Actor the dialog was started with.
    pub actor_key: String,
    /// Dialog name.
    pub dialog: String,
    /// Source line of the condition.
    pub line: u32,
}

impl DialogConditionState {
    /// Creates an entry for a condition site.
    #[must_use]
    pub fn new(mode: ConditionMode, site: ConditionSite<'_>) -> Self {
        Self {
            mode,
            actor_key: site.actor.to_string(),
            dialog: site.dialog.to_string(),
            line: site.line,
        }
    }

    /// Returns true if this entry records the given mode at the given site.
    ///
    /// `OnceEver` entries match regardless of actor.
    #[must_use]
    pub fn matches(&self, mode: ConditionMode, site: ConditionSite<'_>) -> bool {
        self.mode == mode
            && self.dialog == site.dialog
            && self.line == site.line
            && (mode == ConditionMode::OnceEver || self.actor_key == site.actor)
    }
}

/// Ordered log of fired conditions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionLog {
    entries: Vector<DialogConditionState>,
}

impl ConditionLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the log holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if an entry for the mode and site exists.
    #[must_use]
    pub fn contains(&self, mode: ConditionMode, site: ConditionSite<'_>) -> bool {
        self.entries.iter().any(|entry| entry.matches(mode, site))
    }

    /// Records an entry. Returns false if an identical entry was already present.
    pub fn record(&mut self, state: DialogConditionState) -> bool {
        if self.entries.contains(&state) {
            return false;
        }
        self.entries.push_back(state);
        true
    }

    /// Removes every `TempOnce` entry.
    pub fn purge_temp_once(&mut self) {
        self.entries.retain(|entry| entry.mode != ConditionMode::TempOnce);
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterates over the entries in recording order.
    pub fn iter(&self) -> impl Iterator<Item = &DialogConditionState> {
        self.entries.iter()
    }
}

impl FromIterator<DialogConditionState> for ConditionLog {
    fn from_iter<I: IntoIterator<Item = DialogConditionState>>(iter: I) -> Self {
        let mut log = Self::new();
        for state in iter {
            log.record(state);
        }
        log
    }
}

impl Extend<DialogConditionState> for ConditionLog {
    fn extend<I: IntoIterator<Item = DialogConditionState>>(&mut self, iter: I) {
        for state in iter {
            self.record(state);
        }
    }
}
