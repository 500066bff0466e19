//! Lexer, parser, and AST for the Yack dialog language.
//!
//! This crate provides:
//! - [`TokenReader`] - Tokenization of dialog source, with line tracking
//! - [`Parser`] - Recursive-descent parsing into a [`CompilationUnit`]
//! - [`pretty`] - Printing a compilation unit back to source

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod pretty;
pub mod span;
pub mod token;


pub use ast::{CompilationUnit, Condition, Expression, Label, Statement};
pub use lexer::TokenReader;
pub use parser::{Parser, parse};
pub use span::Span;
pub use token::{Token, TokenKind};
