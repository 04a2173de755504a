// src/module.rs
//! Modules and the whole-program analysis context.

use crate::errors::{Diag, SemanticError};
use crate::frontend::{Ast, DeclId, Interner, Symbol};
use crate::sema::GlobalSpace;

/// One source file's compiled unit: the unit declaration, its import
/// (`with`) and reduced-import (`use`) marker declarations, the declared
/// name, and the file it came from.
#[derive(Debug)]
pub struct Module {
    pub unit: DeclId,
    pub withs: Vec<DeclId>,
    pub uses: Vec<DeclId>,
    pub name: Symbol,
    pub file_name: String,
    pub file_ext: String,
}

impl Module {
    /// File name without its extension.
    pub fn file_stem(&self) -> &str {
        match self.file_name.rfind('.') {
            Some(dot) => &self.file_name[..dot],
            None => &self.file_name,
        }
    }
}

/// The shared, mutable analysis state every pass operates on. The module
/// at index 0 is the designated program entry.
#[derive(Debug)]
pub struct Program {
    pub interner: Interner,
    pub ast: Ast,
    pub modules: Vec<Module>,
    /// One per module, parallel to `modules`; filled by GlobalSpaceCreation.
    pub spaces: Vec<GlobalSpace>,
}

impl Program {
    pub fn entry(&self) -> &Module {
        &self.modules[0]
    }

    /// Module whose unit declaration is the given root decl.
    pub fn module_of_unit(&self, unit: DeclId) -> Option<usize> {
        self.modules.iter().position(|m| m.unit == unit)
    }

    /// Module containing a declaration, found through its unit root.
    pub fn module_of_decl(&self, decl: DeclId) -> Option<usize> {
        self.module_of_unit(self.ast.root_of(decl))
    }

    /// Modules with the given declared name. More than one is possible
    /// when a package declaration and its body live in separate files.
    pub fn modules_named(&self, name: Symbol) -> impl Iterator<Item = usize> + '_ {
        self.modules
            .iter()
            .enumerate()
            .filter(move |(_, m)| m.name == name)
            .map(|(idx, _)| idx)
    }

    /// The import target for a module name: prefers the module whose unit
    /// is a package declaration when a declaration/body file pair exists.
    pub fn import_target(&self, name: Symbol) -> Option<usize> {
        let mut fallback = None;
        for idx in self.modules_named(name) {
            let unit = self.ast.decl(self.modules[idx].unit);
            match &unit.kind {
                crate::frontend::DeclKind::Package(pack) if !pack.is_body => return Some(idx),
                _ => fallback = fallback.or(Some(idx)),
            }
        }
        fallback
    }

    pub fn diag(&self, module: usize, error: SemanticError) -> Diag {
        Diag::new(&self.modules[module].file_name, error)
    }
}
