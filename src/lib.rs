// src/lib.rs
//! Semantic-analysis front end for an Ada-like source language: scope
//! construction, import validation, overload and inheritance resolution,
//! expression linking, and type checking over a shared arena-backed AST.
//!
//! The entry point is [`sema::analyze`], which runs the standard pass
//! pipeline over a [`module::Program`].

pub mod errors;
pub mod frontend;
pub mod module;
pub mod sema;
