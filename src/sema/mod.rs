// src/sema/mod.rs
//! The semantic pipeline: scope resolution, pass framework, and the
//! ordered analysis passes that rewrite the shared AST in place.

pub mod compat;
pub mod global_space;
pub mod passes;
pub mod pipeline;
pub mod scope;
pub mod stdlib;

pub use global_space::GlobalSpace;
pub use pipeline::{analyze, Pass, Pipeline};
pub use scope::{reachable, CandidateGroup};
