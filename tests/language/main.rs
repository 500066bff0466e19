//! Integration tests for Layer 1: Language
//!
//! Tests for the token reader, parser, and pretty printer.

mod lexer;
