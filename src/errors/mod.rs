// src/errors/mod.rs
//! Structured error reporting for the semantic pipeline.
//!
//! User-facing diagnostics are miette-enabled `SemanticError` values
//! wrapped in a `Diag` carrying the offending file name. Internal
//! invariant violations never travel this path; they panic.

pub mod sema;

pub use sema::SemanticError;

use thiserror::Error;

/// A single user diagnostic, prefixed with the file it was found in.
/// The pipeline stops at the first one.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{file}: {error}")]
pub struct Diag {
    pub file: String,
    pub error: SemanticError,
}

impl Diag {
    pub fn new(file: impl Into<String>, error: SemanticError) -> Self {
        Self {
            file: file.into(),
            error,
        }
    }
}
