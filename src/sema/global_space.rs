// src/sema/global_space.rs

use crate::frontend::DeclId;

/// Per-module scope record: wraps the module's unit and lists everything
/// its imports made reachable. Created once per module by the
/// GlobalSpaceCreation pass and kept for the whole run.
#[derive(Debug)]
pub struct GlobalSpace {
    /// Index of the module this space belongs to.
    pub module: usize,
    /// The module's own unit declaration.
    pub unit: DeclId,
    /// Module indices imported via `with`; the edges of the import graph.
    pub imports: Vec<usize>,
    /// Declarations directly nameable at module scope besides the unit:
    /// imported units and use-expanded package members.
    pub visible: Vec<DeclId>,
}
