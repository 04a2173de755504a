// src/sema/passes/finalize.rs

use crate::errors::Diag;
use crate::module::Program;
use crate::sema::passes::unit_decls;
use crate::sema::pipeline::Pass;

/// Stamps every declaration with its dotted path from the unit root.
/// Runs last; later consumers use the qualified names for symbol output.
pub struct QualifiedNameSet;

impl Pass for QualifiedNameSet {
    fn name(&self) -> &'static str {
        "QualifiedNameSet"
    }

    fn run(&mut self, program: &mut Program) -> Result<(), Diag> {
        let paths: Vec<_> = unit_decls(program)
            .into_iter()
            .map(|(_, decl)| (decl, program.ast.decl_path(decl, &program.interner)))
            .collect();
        for (decl, path) in paths {
            program.ast.decl_mut(decl).qualified_name = Some(path);
        }
        Ok(())
    }
}
