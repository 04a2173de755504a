// src/sema/pipeline.rs
//
// Pass framework: an ordered list of stages behind one trait, driven by a
// plain loop. Each stage sees the whole module list; the first diagnostic
// aborts the run. Stages assume every earlier stage completed, so an
// impossible shape observed mid-pass is a bug, not a user error, and
// panics instead of returning a `Diag`.

use crate::errors::Diag;
use crate::module::Program;
use crate::sema::passes;
use crate::sema::stdlib;

pub trait Pass {
    fn name(&self) -> &'static str;
    fn run(&mut self, program: &mut Program) -> Result<(), Diag>;
}

pub struct Pipeline {
    passes: Vec<Box<dyn Pass>>,
}

impl Pipeline {
    /// The full stage list in dependency order. Later passes read the AST
    /// rewrites of earlier ones; do not reorder.
    pub fn standard() -> Self {
        Self {
            passes: vec![
                Box::new(passes::EntryPointCheck),
                Box::new(passes::ModuleNameCheck),
                Box::new(passes::OneLevelWithCheck),
                Box::new(passes::SelfImportCheck),
                Box::new(passes::ExistingModuleImportCheck),
                Box::new(passes::GlobalSpaceCreation),
                Box::new(passes::CircularImportCheck),
                Box::new(passes::NameConflictCheck),
                Box::new(passes::PackBodyNDeclLinking),
                Box::new(passes::TypeNameToRealType),
                Box::new(passes::InheritsVarNameConflictCheck),
                Box::new(passes::OverloadCheck),
                Box::new(passes::SubprogBodyNDeclLinking),
                Box::new(passes::CreateClassDeclaration),
                Box::new(passes::OneClassInSubprogramCheck),
                Box::new(passes::LinkExprs),
                Box::new(passes::TypeCheck),
                Box::new(passes::QualifiedNameSet),
            ],
        }
    }

    pub fn run(&mut self, program: &mut Program) -> Result<(), Diag> {
        for pass in &mut self.passes {
            tracing::debug!(pass = pass.name(), "running");
            pass.run(program)?;
        }
        Ok(())
    }
}

/// Runs the standard pipeline over a program, installing the synthesized
/// standard-library module first if it is not already present.
pub fn analyze(program: &mut Program) -> Result<(), Diag> {
    stdlib::install(program);
    Pipeline::standard().run(program)
}
