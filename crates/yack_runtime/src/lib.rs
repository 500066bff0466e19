//! Dialog player, host interfaces, and terminal front end for Yack.
//!
//! This crate provides:
//! - [`DialogPlayer`] - Frame-driven interpreter for parsed dialogs
//! - [`DialogContext`] / [`DialogConditions`] - What the host implements
//! - [`ConditionLog`] - The `once`-family fact log, with `MessagePack` snapshots
//! - [`DialogLoader`] - Resolving dialog names to source
//! - A console host and line editor used by the `yack` binary

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod console;
pub mod context;
pub mod editor;
pub mod loader;
pub mod player;
pub mod serialize;
pub mod state;

pub use config::PlayerConfig;
pub use console::{
    ConsoleConditions, ConsoleContext, Deadline, Outcome, SharedOutput, run_dialog,
};
pub use context::{DialogConditions, DialogContext, Ready, WaitAction};
pub use editor::{LineEditor, ReadResult, RustylineEditor};
pub use loader::{DialogLoader, FileLoader, MemoryLoader, dialog_file_name};
pub use player::{DialogPlayer, DialogState, MAX_CHOICES, PlayerState};
pub use state::{ConditionLog, ConditionMode, ConditionSite, DialogConditionState};
