// src/sema/passes/mod.rs
//! The analysis passes, grouped by concern. Execution order lives in
//! `pipeline::Pipeline::standard`.

mod classes;
mod conflicts;
mod finalize;
mod imports;
mod link_exprs;
mod structure;
mod type_check;
mod types;

pub use classes::{CreateClassDeclaration, OneClassInSubprogramCheck};
pub use conflicts::{
    NameConflictCheck, OverloadCheck, PackBodyNDeclLinking, SubprogBodyNDeclLinking,
};
pub use finalize::QualifiedNameSet;
pub use imports::{CircularImportCheck, GlobalSpaceCreation};
pub use link_exprs::LinkExprs;
pub use structure::{
    EntryPointCheck, ExistingModuleImportCheck, ModuleNameCheck, OneLevelWithCheck,
    SelfImportCheck,
};
pub use type_check::TypeCheck;
pub use types::{InheritsVarNameConflictCheck, TypeNameToRealType};

use crate::frontend::DeclId;
use crate::module::Program;

/// Every declaration reachable from the module units, pre-order, tagged
/// with its module index. With/use markers are not part of unit trees and
/// are reached through the module lists instead.
pub(crate) fn unit_decls(program: &Program) -> Vec<(usize, DeclId)> {
    let mut out = Vec::new();
    for (idx, module) in program.modules.iter().enumerate() {
        let mut stack = vec![module.unit];
        while let Some(decl) = stack.pop() {
            out.push((idx, decl));
            let mut children = program.ast.area(decl);
            children.reverse();
            stack.extend(children);
        }
    }
    out
}
