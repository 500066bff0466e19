//! Yack - dialog scripting for adventure games
//!
//! This crate re-exports all layers of the Yack system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: yack_runtime    - DialogPlayer, host traits, condition log, CLI
//! Layer 1: yack_language   - Token reader, parser, AST, pretty printer
//! Layer 0: yack_foundation - Error types
//! ```

pub use yack_foundation as foundation;
pub use yack_language as language;
pub use yack_runtime as runtime;
