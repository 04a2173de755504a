// src/sema/passes/conflicts.rs
//
// Per-area name conflicts, package body/declaration linking, overload
// legality, and subprogram body/declaration linking. Linking is
// program-wide: a package body pairs with its declaration by qualified
// path wherever the declaration lives.

use rustc_hash::FxHashMap;

use crate::errors::{Diag, SemanticError};
use crate::frontend::{DeclId, DeclKind, Symbol};
use crate::module::Program;
use crate::sema::compat;
use crate::sema::passes::unit_decls;
use crate::sema::pipeline::Pass;

/// Two declarations in one area may share a name only when all of them
/// are subprograms (overloading, vetted later) or when they are a package
/// declaration with its body.
pub struct NameConflictCheck;

impl Pass for NameConflictCheck {
    fn name(&self) -> &'static str {
        "NameConflictCheck"
    }

    fn run(&mut self, program: &mut Program) -> Result<(), Diag> {
        for (midx, owner) in unit_decls(program) {
            let area = program.ast.area(owner);
            if area.len() < 2 {
                continue;
            }
            let mut groups: FxHashMap<Symbol, Vec<DeclId>> = FxHashMap::default();
            let mut order: Vec<Symbol> = Vec::new();
            for &decl in &area {
                let name = program.ast.decl(decl).name;
                let group = groups.entry(name).or_default();
                if group.is_empty() {
                    order.push(name);
                }
                group.push(decl);
            }
            for name in order {
                let group = &groups[&name];
                if group.len() > 1 && !group_legal(program, group) {
                    return Err(program.diag(
                        midx,
                        SemanticError::DuplicateDeclaration {
                            name: program.interner.resolve(name).to_string(),
                        },
                    ));
                }
            }
        }
        Ok(())
    }
}

fn group_legal(program: &Program, group: &[DeclId]) -> bool {
    let ast = &program.ast;
    if group.iter().all(|&d| ast.decl(d).is_subprogram()) {
        return true;
    }
    // A package declaration and its body may coexist in one area.
    if group.len() == 2 {
        if let (DeclKind::Package(a), DeclKind::Package(b)) =
            (&ast.decl(group[0]).kind, &ast.decl(group[1]).kind)
        {
            return a.is_body != b.is_body;
        }
    }
    false
}

/// Pairs every package body with its declaration by qualified path,
/// program-wide, and records the link on both sides.
pub struct PackBodyNDeclLinking;

impl Pass for PackBodyNDeclLinking {
    fn name(&self) -> &'static str {
        "PackBodyNDeclLinking"
    }

    fn run(&mut self, program: &mut Program) -> Result<(), Diag> {
        let mut decl_by_path: FxHashMap<String, DeclId> = FxHashMap::default();
        let mut bodies: Vec<(usize, DeclId, String)> = Vec::new();
        for (midx, decl) in unit_decls(program) {
            if let DeclKind::Package(pack) = &program.ast.decl(decl).kind {
                let path = program.ast.decl_path(decl, &program.interner);
                if pack.is_body {
                    bodies.push((midx, decl, path));
                } else {
                    decl_by_path.insert(path, decl);
                }
            }
        }
        for (midx, body, path) in bodies {
            let Some(&decl) = decl_by_path.get(&path) else {
                return Err(program.diag(midx, SemanticError::UnlinkedPackageBody { name: path }));
            };
            set_package_link(program, decl, body);
            set_package_link(program, body, decl);
        }
        Ok(())
    }
}

fn set_package_link(program: &mut Program, from: DeclId, to: DeclId) {
    let DeclKind::Package(pack) = &mut program.ast.decl_mut(from).kind else {
        unreachable!()
    };
    pack.linked = Some(to);
}

/// Same-named subprograms of the same kind in one area must differ in
/// parameter types; a procedure and a function may share a parameter
/// list. Runs after type resolution so the comparison sees real types.
pub struct OverloadCheck;

impl Pass for OverloadCheck {
    fn name(&self) -> &'static str {
        "OverloadCheck"
    }

    fn run(&mut self, program: &mut Program) -> Result<(), Diag> {
        for (midx, owner) in unit_decls(program) {
            let area = program.ast.area(owner);
            for (i, &a) in area.iter().enumerate() {
                if !program.ast.decl(a).is_subprogram() {
                    continue;
                }
                for &b in &area[i + 1..] {
                    if program.ast.decl(b).name != program.ast.decl(a).name
                        || !program.ast.decl(b).is_subprogram()
                    {
                        continue;
                    }
                    let sa = program.ast.decl(a).subprogram();
                    let sb = program.ast.decl(b).subprogram();
                    if sa.is_function == sb.is_function
                        && compat::same_param_types(&program.ast, sa, sb)
                    {
                        return Err(program.diag(
                            midx,
                            SemanticError::DuplicateSignature {
                                name: program.ast.decl_path(b, &program.interner),
                            },
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Pairs each bodyless subprogram declared in a package declaration with
/// the matching body in the linked package body.
pub struct SubprogBodyNDeclLinking;

impl Pass for SubprogBodyNDeclLinking {
    fn name(&self) -> &'static str {
        "SubprogBodyNDeclLinking"
    }

    fn run(&mut self, program: &mut Program) -> Result<(), Diag> {
        let mut links: Vec<(DeclId, DeclId)> = Vec::new();
        for (midx, decl) in unit_decls(program) {
            let DeclKind::Package(pack) = &program.ast.decl(decl).kind else {
                continue;
            };
            if pack.is_body {
                continue;
            }
            let body_area: Vec<DeclId> = pack
                .linked
                .map(|body| program.ast.area(body))
                .unwrap_or_default();
            for &spec in &pack.decls {
                if !program.ast.decl(spec).is_subprogram() {
                    continue;
                }
                let spec_sp = program.ast.decl(spec).subprogram();
                if spec_sp.body.is_some() {
                    continue;
                }
                let matches: Vec<DeclId> = body_area
                    .iter()
                    .copied()
                    .filter(|&cand| body_matches_spec(program, spec, cand))
                    .collect();
                match matches.as_slice() {
                    [body] => {
                        links.push((spec, *body));
                        links.push((*body, spec));
                    }
                    [] => {
                        return Err(program.diag(
                            midx,
                            SemanticError::UnlinkedSubprogramDecl {
                                name: program.ast.decl_path(spec, &program.interner),
                            },
                        ));
                    }
                    _ => panic!("duplicate subprogram signature survived OverloadCheck"),
                }
            }
        }
        for (from, to) in links {
            program.ast.decl_mut(from).subprogram_mut().linked = Some(to);
        }
        Ok(())
    }
}

fn body_matches_spec(program: &Program, spec: DeclId, cand: DeclId) -> bool {
    let ast = &program.ast;
    if ast.decl(cand).name != ast.decl(spec).name || !ast.decl(cand).is_subprogram() {
        return false;
    }
    let spec_sp = ast.decl(spec).subprogram();
    let cand_sp = ast.decl(cand).subprogram();
    if cand_sp.body.is_none()
        || cand_sp.is_function != spec_sp.is_function
        || !compat::same_param_types(ast, spec_sp, cand_sp)
        || !compat::same_param_modes(ast, spec_sp, cand_sp)
    {
        return false;
    }
    match (spec_sp.return_type, cand_sp.return_type) {
        (None, None) => true,
        (Some(a), Some(b)) => compat::types_equal(ast, a, b),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::{ParamMode, ProgramBuilder, Stmt};

    #[test]
    fn duplicate_variables_conflict() {
        let mut b = ProgramBuilder::new();
        let int = b.integer();
        let x1 = b.var("X", int);
        let x2 = b.var("X", int);
        let pack = b.package("P", vec![x1, x2]);
        b.module("P", "p.ads", pack, &[], &[]);
        let mut program = b.finish();

        let err = NameConflictCheck.run(&mut program).unwrap_err();
        assert!(matches!(
            err.error,
            SemanticError::DuplicateDeclaration { .. }
        ));
    }

    #[test]
    fn overloaded_subprograms_do_not_conflict() {
        let mut b = ProgramBuilder::new();
        let int = b.integer();
        let flt = b.float();
        let p1 = b.param("X", ParamMode::In, int);
        let p2 = b.param("X", ParamMode::In, flt);
        let f1 = b.procedure("Show", vec![p1], vec![], vec![]);
        let f2 = b.procedure("Show", vec![p2], vec![], vec![]);
        let pack = b.package("P", vec![f1, f2]);
        b.module("P", "p.ads", pack, &[], &[]);
        let mut program = b.finish();

        assert!(NameConflictCheck.run(&mut program).is_ok());
        assert!(OverloadCheck.run(&mut program).is_ok());
    }

    #[test]
    fn procedure_and_function_may_share_parameters() {
        let mut b = ProgramBuilder::new();
        let int = b.integer();
        let p1 = b.param("X", ParamMode::In, int);
        let p2 = b.param("X", ParamMode::In, int);
        let proc = b.procedure("Show", vec![p1], vec![], vec![]);
        let zero = b.int(0);
        let func = b.function("Show", vec![p2], int, vec![], vec![Stmt::Return(Some(zero))]);
        let pack = b.package("P", vec![proc, func]);
        b.module("P", "p.ads", pack, &[], &[]);
        let mut program = b.finish();

        assert!(OverloadCheck.run(&mut program).is_ok());
    }

    #[test]
    fn identical_signatures_are_rejected() {
        let mut b = ProgramBuilder::new();
        let int = b.integer();
        let p1 = b.param("X", ParamMode::In, int);
        let p2 = b.param("Y", ParamMode::In, int);
        let f1 = b.procedure("Show", vec![p1], vec![], vec![]);
        let f2 = b.procedure("Show", vec![p2], vec![], vec![]);
        let pack = b.package("P", vec![f1, f2]);
        b.module("P", "p.ads", pack, &[], &[]);
        let mut program = b.finish();

        let err = OverloadCheck.run(&mut program).unwrap_err();
        assert!(matches!(err.error, SemanticError::DuplicateSignature { .. }));
    }

    #[test]
    fn package_body_links_to_its_declaration() {
        let mut b = ProgramBuilder::new();
        let spec = b.proc_decl("Run", vec![]);
        let pack = b.package("P", vec![spec]);
        let body_run = b.procedure("Run", vec![], vec![], vec![]);
        let body = b.package_body("P", vec![body_run]);
        b.module("P", "p.ads", pack, &[], &[]);
        b.module("P", "p.adb", body, &[], &[]);
        let mut program = b.finish();

        PackBodyNDeclLinking.run(&mut program).unwrap();
        assert_eq!(program.ast.decl(pack).package().linked, Some(body));
        assert_eq!(program.ast.decl(body).package().linked, Some(pack));

        SubprogBodyNDeclLinking.run(&mut program).unwrap();
        assert_eq!(
            program.ast.decl(spec).subprogram().linked,
            Some(body_run)
        );
        assert_eq!(program.ast.decl(body_run).subprogram().linked, Some(spec));
    }

    #[test]
    fn body_without_declaration_is_reported() {
        let mut b = ProgramBuilder::new();
        let body = b.package_body("P", vec![]);
        b.module("P", "p.adb", body, &[], &[]);
        let mut program = b.finish();

        let err = PackBodyNDeclLinking.run(&mut program).unwrap_err();
        assert!(matches!(
            err.error,
            SemanticError::UnlinkedPackageBody { .. }
        ));
    }

    #[test]
    fn declared_subprogram_without_body_is_reported() {
        let mut b = ProgramBuilder::new();
        let spec = b.proc_decl("Run", vec![]);
        let pack = b.package("P", vec![spec]);
        let body = b.package_body("P", vec![]);
        b.module("P", "p.ads", pack, &[], &[]);
        b.module("P", "p.adb", body, &[], &[]);
        let mut program = b.finish();

        PackBodyNDeclLinking.run(&mut program).unwrap();
        let err = SubprogBodyNDeclLinking.run(&mut program).unwrap_err();
        assert!(matches!(
            err.error,
            SemanticError::UnlinkedSubprogramDecl { .. }
        ));
    }
}
