// src/sema/passes/structure.rs
//
// Structural validation: entry-point shape, file/unit name agreement,
// and the three import-shape checks that run before any scope exists.

use crate::errors::{Diag, SemanticError};
use crate::frontend::DeclKind;
use crate::module::Program;
use crate::sema::pipeline::Pass;
use crate::sema::stdlib;

/// The designated entry module's unit must be a procedure.
pub struct EntryPointCheck;

impl Pass for EntryPointCheck {
    fn name(&self) -> &'static str {
        "EntryPointCheck"
    }

    fn run(&mut self, program: &mut Program) -> Result<(), Diag> {
        let unit = program.ast.decl(program.entry().unit);
        match &unit.kind {
            DeclKind::Subprogram(sp) if !sp.is_function => Ok(()),
            _ => Err(program.diag(0, SemanticError::EntryPointNotProcedure)),
        }
    }
}

/// Unit name, declared module name and file stem must agree, and the
/// declaration file extension is reserved for package declarations —
/// exclusively.
pub struct ModuleNameCheck;

/// File extension for declaration files.
const DECL_EXT: &str = "ads";

impl Pass for ModuleNameCheck {
    fn name(&self) -> &'static str {
        "ModuleNameCheck"
    }

    fn run(&mut self, program: &mut Program) -> Result<(), Diag> {
        for (idx, module) in program.modules.iter().enumerate() {
            let unit = program.ast.decl(module.unit);
            let unit_name = program.interner.resolve(unit.name);
            let module_name = program.interner.resolve(module.name);
            if unit.name != module.name {
                return Err(program.diag(
                    idx,
                    SemanticError::ModuleNameMismatch {
                        unit: unit_name.to_string(),
                        module: module_name.to_string(),
                    },
                ));
            }
            // File names are conventionally lower case.
            if !module.file_stem().eq_ignore_ascii_case(module_name) {
                return Err(program.diag(
                    idx,
                    SemanticError::ModuleNameMismatch {
                        unit: unit_name.to_string(),
                        module: module.file_stem().to_string(),
                    },
                ));
            }

            let is_package_decl = matches!(&unit.kind, DeclKind::Package(p) if !p.is_body);
            if is_package_decl && module.file_ext != DECL_EXT {
                return Err(program.diag(
                    idx,
                    SemanticError::PackageDeclWrongExtension {
                        unit: unit_name.to_string(),
                    },
                ));
            }
            if module.file_ext == DECL_EXT && !is_package_decl {
                return Err(program.diag(
                    idx,
                    SemanticError::DeclFileNotPackage {
                        unit: unit_name.to_string(),
                    },
                ));
            }
        }
        Ok(())
    }
}

/// A `with` name must be a single component unless rooted at the reserved
/// standard-library namespace.
pub struct OneLevelWithCheck;

impl Pass for OneLevelWithCheck {
    fn name(&self) -> &'static str {
        "OneLevelWithCheck"
    }

    fn run(&mut self, program: &mut Program) -> Result<(), Diag> {
        let std_root = program.interner.lookup(stdlib::STD_ROOT);
        for (idx, module) in program.modules.iter().enumerate() {
            for &with in &module.withs {
                let DeclKind::With(with_decl) = &program.ast.decl(with).kind else {
                    panic!("module with-list holds a non-with declaration");
                };
                if with_decl.path.len() > 1 && Some(with_decl.path[0]) != std_root {
                    return Err(program.diag(
                        idx,
                        SemanticError::ImportTooDeep {
                            name: program.interner.display_dotted(&with_decl.path),
                        },
                    ));
                }
            }
        }
        Ok(())
    }
}

/// A module may not `with` itself.
pub struct SelfImportCheck;

impl Pass for SelfImportCheck {
    fn name(&self) -> &'static str {
        "SelfImportCheck"
    }

    fn run(&mut self, program: &mut Program) -> Result<(), Diag> {
        for (idx, module) in program.modules.iter().enumerate() {
            for &with in &module.withs {
                let DeclKind::With(with_decl) = &program.ast.decl(with).kind else {
                    panic!("module with-list holds a non-with declaration");
                };
                if with_decl.path.len() == 1 && with_decl.path[0] == module.name {
                    return Err(program.diag(
                        idx,
                        SemanticError::SelfImport {
                            name: program.interner.resolve(module.name).to_string(),
                        },
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Every `with` target must name a module present in the program.
pub struct ExistingModuleImportCheck;

impl Pass for ExistingModuleImportCheck {
    fn name(&self) -> &'static str {
        "ExistingModuleImportCheck"
    }

    fn run(&mut self, program: &mut Program) -> Result<(), Diag> {
        for (idx, module) in program.modules.iter().enumerate() {
            for &with in &module.withs {
                let DeclKind::With(with_decl) = &program.ast.decl(with).kind else {
                    panic!("module with-list holds a non-with declaration");
                };
                // Dotted imports are rooted at the standard library by
                // now; the module to find is always the root component.
                if program.import_target(with_decl.path[0]).is_none() {
                    return Err(program.diag(
                        idx,
                        SemanticError::UnknownImport {
                            name: program.interner.display_dotted(&with_decl.path),
                        },
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::ProgramBuilder;

    fn entry_program(function: bool) -> Program {
        let mut b = ProgramBuilder::new();
        let unit = if function {
            let int = b.integer();
            b.function("Main", vec![], int, vec![], vec![])
        } else {
            b.procedure("Main", vec![], vec![], vec![])
        };
        b.module("Main", "main.adb", unit, &[], &[]);
        b.finish()
    }

    #[test]
    fn entry_point_must_be_procedure() {
        let mut program = entry_program(true);
        let err = EntryPointCheck.run(&mut program).unwrap_err();
        assert_eq!(err.error, SemanticError::EntryPointNotProcedure);

        let mut program = entry_program(false);
        assert!(EntryPointCheck.run(&mut program).is_ok());
    }

    #[test]
    fn package_declaration_requires_decl_extension() {
        let mut b = ProgramBuilder::new();
        let pack = b.package("Util", vec![]);
        b.module("Util", "util.adb", pack, &[], &[]);
        let mut program = b.finish();
        let err = ModuleNameCheck.run(&mut program).unwrap_err();
        assert!(matches!(
            err.error,
            SemanticError::PackageDeclWrongExtension { .. }
        ));
    }

    #[test]
    fn decl_extension_requires_package_declaration() {
        let mut b = ProgramBuilder::new();
        let proc = b.procedure("Run", vec![], vec![], vec![]);
        b.module("Run", "run.ads", proc, &[], &[]);
        let mut program = b.finish();
        let err = ModuleNameCheck.run(&mut program).unwrap_err();
        assert!(matches!(err.error, SemanticError::DeclFileNotPackage { .. }));
    }

    #[test]
    fn self_import_is_rejected() {
        let mut b = ProgramBuilder::new();
        let unit = b.procedure("Main", vec![], vec![], vec![]);
        b.module("Main", "main.adb", unit, &["Main"], &[]);
        let mut program = b.finish();
        let err = SelfImportCheck.run(&mut program).unwrap_err();
        assert!(matches!(err.error, SemanticError::SelfImport { .. }));
    }

    #[test]
    fn deep_import_needs_std_root() {
        let mut b = ProgramBuilder::new();
        let unit = b.procedure("Main", vec![], vec![], vec![]);
        b.module("Main", "main.adb", unit, &["Util.Deep"], &[]);
        let mut program = b.finish();
        let err = OneLevelWithCheck.run(&mut program).unwrap_err();
        assert!(matches!(err.error, SemanticError::ImportTooDeep { .. }));
    }

    #[test]
    fn unknown_import_is_reported() {
        let mut b = ProgramBuilder::new();
        let unit = b.procedure("Main", vec![], vec![], vec![]);
        b.module("Main", "main.adb", unit, &["Missing"], &[]);
        let mut program = b.finish();
        let err = ExistingModuleImportCheck.run(&mut program).unwrap_err();
        assert!(matches!(err.error, SemanticError::UnknownImport { .. }));
    }
}
