// src/sema/passes/imports.rs
//
// Global-space construction and the cycle check over it. After these two
// passes every module has a `GlobalSpace` whose `visible` list is the
// module-scope search area used by the resolver.

use crate::errors::{Diag, SemanticError};
use crate::frontend::{DeclId, DeclKind};
use crate::module::Program;
use crate::sema::pipeline::Pass;
use crate::sema::GlobalSpace;

/// Builds one `GlobalSpace` per module: `with` targets become imported
/// module units, `use` clauses flatten a visible package's members into
/// the space.
pub struct GlobalSpaceCreation;

impl Pass for GlobalSpaceCreation {
    fn name(&self) -> &'static str {
        "GlobalSpaceCreation"
    }

    fn run(&mut self, program: &mut Program) -> Result<(), Diag> {
        let mut spaces = Vec::with_capacity(program.modules.len());
        let mut with_targets = Vec::new();
        for (idx, module) in program.modules.iter().enumerate() {
            let mut space = GlobalSpace {
                module: idx,
                unit: module.unit,
                imports: Vec::new(),
                visible: Vec::new(),
            };
            for &with in &module.withs {
                let DeclKind::With(with_decl) = &program.ast.decl(with).kind else {
                    panic!("module with-list holds a non-with declaration");
                };
                let target = program
                    .import_target(with_decl.path[0])
                    .unwrap_or_else(|| panic!("import target vanished after the existence check"));
                with_targets.push((with, target));
                if !space.imports.contains(&target) {
                    space.imports.push(target);
                }
                let unit = program.modules[target].unit;
                if !space.visible.contains(&unit) {
                    space.visible.push(unit);
                }
            }
            spaces.push(space);
        }
        for (with, target) in with_targets {
            let DeclKind::With(with_decl) = &mut program.ast.decl_mut(with).kind else {
                unreachable!()
            };
            with_decl.target = Some(target);
        }

        // Use expansion. Targets resolve against the unit and the
        // with-imported units only, never against another use clause, so
        // all targets are found before any members are flattened in.
        let mut additions: Vec<(usize, Vec<DeclId>)> = Vec::new();
        for (idx, module) in program.modules.iter().enumerate() {
            for &use_id in &module.uses {
                let DeclKind::Use(use_decl) = &program.ast.decl(use_id).kind else {
                    panic!("module use-list holds a non-use declaration");
                };
                let target = resolve_used_package(program, &spaces[idx], &use_decl.path)
                    .ok_or_else(|| {
                        program.diag(
                            idx,
                            SemanticError::UnresolvedName {
                                name: program.interner.display_dotted(&use_decl.path),
                            },
                        )
                    })?;
                additions.push((idx, program.ast.area(target)));
            }
        }
        for (idx, members) in additions {
            for member in members {
                if !spaces[idx].visible.contains(&member) {
                    spaces[idx].visible.push(member);
                }
            }
        }

        program.spaces = spaces;
        Ok(())
    }
}

/// Finds the package a `use` path names, descending nested packages. This
/// is how `use Ada.Text_IO` reaches the text-IO members through the
/// standard-library root.
fn resolve_used_package(
    program: &Program,
    space: &GlobalSpace,
    path: &[crate::frontend::Symbol],
) -> Option<DeclId> {
    let ast = &program.ast;
    let mut roots = vec![space.unit];
    roots.extend(&space.visible);
    let mut current = roots
        .into_iter()
        .find(|&d| ast.decl(d).name == path[0] && ast.decl(d).is_package())?;
    for &comp in &path[1..] {
        current = ast
            .area(current)
            .into_iter()
            .find(|&d| ast.decl(d).name == comp && ast.decl(d).is_package())?;
    }
    Some(current)
}

/// Rejects `with` cycles across the import graph. The reported chain
/// starts and ends at the module where the cycle closes.
pub struct CircularImportCheck;

impl Pass for CircularImportCheck {
    fn name(&self) -> &'static str {
        "CircularImportCheck"
    }

    fn run(&mut self, program: &mut Program) -> Result<(), Diag> {
        let mut done = vec![false; program.modules.len()];
        let mut stack = Vec::new();
        for idx in 0..program.modules.len() {
            visit(program, idx, &mut stack, &mut done)?;
        }
        Ok(())
    }
}

fn visit(
    program: &Program,
    idx: usize,
    stack: &mut Vec<usize>,
    done: &mut [bool],
) -> Result<(), Diag> {
    if let Some(pos) = stack.iter().position(|&m| m == idx) {
        let mut names: Vec<&str> = stack[pos..]
            .iter()
            .map(|&m| program.interner.resolve(program.modules[m].name))
            .collect();
        names.push(program.interner.resolve(program.modules[idx].name));
        return Err(program.diag(
            idx,
            SemanticError::CircularImport {
                cycle: names.join(" -> "),
            },
        ));
    }
    if done[idx] {
        return Ok(());
    }
    stack.push(idx);
    for &target in &program.spaces[idx].imports {
        visit(program, target, stack, done)?;
    }
    stack.pop();
    done[idx] = true;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::ProgramBuilder;
    use crate::sema::stdlib;

    #[test]
    fn with_makes_the_target_unit_visible() {
        let mut b = ProgramBuilder::new();
        let int = b.integer();
        let x = b.var("X", int);
        let util = b.package("Util", vec![x]);
        let main = b.procedure("Main", vec![], vec![], vec![]);
        b.module("Main", "main.adb", main, &["Util"], &[]);
        b.module("Util", "util.ads", util, &[], &[]);
        let mut program = b.finish();

        GlobalSpaceCreation.run(&mut program).unwrap();
        assert_eq!(program.spaces[0].imports, vec![1]);
        assert_eq!(program.spaces[0].visible, vec![util]);
        assert!(program.spaces[1].imports.is_empty());
    }

    #[test]
    fn use_flattens_text_io_members() {
        let mut b = ProgramBuilder::new();
        let main = b.procedure("Main", vec![], vec![], vec![]);
        b.module("Main", "main.adb", main, &["Ada.Text_IO"], &["Ada.Text_IO"]);
        let mut program = b.finish();
        stdlib::install(&mut program);

        GlobalSpaceCreation.run(&mut program).unwrap();
        let put_line = program.interner.lookup("Put_Line").unwrap();
        assert!(program.spaces[0]
            .visible
            .iter()
            .any(|&d| program.ast.decl(d).name == put_line));
    }

    #[test]
    fn import_cycle_is_reported() {
        let mut b = ProgramBuilder::new();
        let main = b.procedure("Main", vec![], vec![], vec![]);
        let a = b.package("A", vec![]);
        let c = b.package("B", vec![]);
        b.module("Main", "main.adb", main, &["A"], &[]);
        b.module("A", "a.ads", a, &["B"], &[]);
        b.module("B", "b.ads", c, &["A"], &[]);
        let mut program = b.finish();

        GlobalSpaceCreation.run(&mut program).unwrap();
        let err = CircularImportCheck.run(&mut program).unwrap_err();
        match err.error {
            SemanticError::CircularImport { cycle } => {
                assert_eq!(cycle, "A -> B -> A");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn import_chain_is_not_a_cycle() {
        let mut b = ProgramBuilder::new();
        let main = b.procedure("Main", vec![], vec![], vec![]);
        let a = b.package("A", vec![]);
        let c = b.package("B", vec![]);
        b.module("Main", "main.adb", main, &["A", "B"], &[]);
        b.module("A", "a.ads", a, &["B"], &[]);
        b.module("B", "b.ads", c, &[], &[]);
        let mut program = b.finish();

        GlobalSpaceCreation.run(&mut program).unwrap();
        assert!(CircularImportCheck.run(&mut program).is_ok());
    }
}
