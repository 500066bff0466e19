//! Core error types for the Yack dialog system.
//!
//! This crate provides:
//! - [`Error`] - Rich error type with context
//! - [`ErrorKind`] - Categorized error kinds for pattern matching
//! - [`Result`] - Result alias used across the workspace

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;

pub use error::{Error, ErrorContext, ErrorKind};

/// Result type alias using the Yack [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
