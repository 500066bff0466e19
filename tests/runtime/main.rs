//! Integration tests for Layer 2: Runtime
//!
//! Tests for the dialog player, condition scopes, and choices.

mod choices;
mod player;
