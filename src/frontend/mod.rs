// src/frontend/mod.rs
//! AST substrate: interner, arena-backed node families, and the
//! programmatic construction API the (external) parser targets.

pub mod ast;
pub mod build;
mod intern;

pub use ast::*;
pub use build::ProgramBuilder;
pub use intern::{Interner, Symbol};
