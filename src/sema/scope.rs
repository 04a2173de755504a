// src/sema/scope.rs
//
// The scope resolver: given a dotted name and the declaration asking for
// it, returns candidate groups ordered innermost scope to outermost. Each
// group holds the same-named declarations visible at one scope level,
// which is what overload resolution consumes.

use crate::frontend::{Ast, DeclId, DeclKind, Symbol};
use crate::module::Program;
use smallvec::SmallVec;

/// Same-named declarations visible at one scope level.
pub type CandidateGroup = SmallVec<[DeclId; 2]>;

/// Walks outward from `requester` through enclosing declaration areas,
/// collecting the declarations each level makes visible under `name`.
///
/// Textual-order visibility holds along the requester's own parent chain:
/// a sibling declared after the requester (or after the ancestor that
/// encloses the requester) is not visible. A package body's level also
/// includes the linked declaration's members, in full. Areas reached by
/// dotted descent are searched in full, since the requester does not sit
/// inside them.
pub fn reachable(program: &Program, name: &[Symbol], requester: DeclId) -> Vec<CandidateGroup> {
    assert!(!name.is_empty(), "reachable called with an empty name");
    let ast = &program.ast;
    let mut groups = Vec::new();

    // Innermost level: the requester's own interior when it owns a scope
    // (a subprogram's parameters and locals, a package's members).
    let mut group = CandidateGroup::new();
    collect_level(program, requester, None, name, &mut group);
    push_group(&mut groups, group);

    // Enclosing areas, innermost first, bounded by the position of the
    // child we came from.
    let mut child = requester;
    while let Some(parent) = ast.decl(child).parent {
        let limit = ast.area(parent).iter().position(|&d| d == child);
        let mut group = CandidateGroup::new();
        collect_level(program, parent, limit, name, &mut group);
        push_group(&mut groups, group);
        child = parent;
    }

    // Module scope: the unit itself plus everything with/use made visible.
    // Before GlobalSpaceCreation runs there is no space yet and module
    // scope contributes nothing.
    if let Some(module) = program.module_of_unit(child) {
        if let Some(space) = program.spaces.get(module) {
            let mut area = vec![space.unit];
            area.extend(&space.visible);
            let mut group = CandidateGroup::new();
            collect(program, &area, None, name, &mut group);
            push_group(&mut groups, group);
        }
    }

    groups
}

/// The members a package exposes to lookup: its own area, plus the
/// linked declaration's members when it is a body.
pub(crate) fn package_members(ast: &Ast, package: DeclId) -> Vec<DeclId> {
    let mut members = ast.area(package);
    if let DeclKind::Package(pack) = &ast.decl(package).kind {
        if pack.is_body {
            if let Some(spec) = pack.linked {
                members.extend(ast.area(spec));
            }
        }
    }
    members
}

/// One scope level: the owner's area bounded by `limit`, and for a
/// package body the linked declaration's members without bound.
fn collect_level(
    program: &Program,
    owner: DeclId,
    limit: Option<usize>,
    name: &[Symbol],
    found: &mut CandidateGroup,
) {
    collect(program, &program.ast.area(owner), limit, name, found);
    if let DeclKind::Package(pack) = &program.ast.decl(owner).kind {
        if pack.is_body {
            if let Some(spec) = pack.linked {
                collect(program, &program.ast.area(spec), None, name, found);
            }
        }
    }
}

fn push_group(groups: &mut Vec<CandidateGroup>, group: CandidateGroup) {
    if !group.is_empty() {
        groups.push(group);
    }
}

fn collect(
    program: &Program,
    area: &[DeclId],
    limit: Option<usize>,
    name: &[Symbol],
    found: &mut CandidateGroup,
) {
    let ast = &program.ast;
    for (pos, &decl) in area.iter().enumerate() {
        if let Some(limit) = limit {
            if pos > limit {
                break;
            }
        }
        if ast.decl(decl).name != name[0] {
            continue;
        }
        if name.len() == 1 {
            found.push(decl);
        } else {
            descend(program, decl, &name[1..], found);
        }
    }
}

/// Dotted descent: packages and records can be dotted into, subprograms
/// cannot (the search stops early at a procedure boundary).
fn descend(program: &Program, decl: DeclId, rest: &[Symbol], out: &mut CandidateGroup) {
    let ast = &program.ast;
    let area = match ast.decl(decl).kind {
        DeclKind::Package(_) => package_members(ast, decl),
        DeclKind::Record(_) => ast.area(decl),
        _ => return,
    };
    for child in area {
        if ast.decl(child).name != rest[0] {
            continue;
        }
        if rest.len() == 1 {
            out.push(child);
        } else {
            descend(program, child, &rest[1..], out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::ProgramBuilder;
    use crate::sema::passes::PackBodyNDeclLinking;
    use crate::sema::pipeline::Pass;

    #[test]
    fn later_sibling_is_not_visible() {
        let mut b = ProgramBuilder::new();
        let int = b.integer();
        let a = b.var("A", int);
        let z = b.var("B", int);
        let pack = b.package("P", vec![a, z]);
        b.module("P", "p.ads", pack, &[], &[]);
        let program = b.finish();

        let name_a = program.interner.lookup("A").unwrap();
        let name_b = program.interner.lookup("B").unwrap();

        // B sees A (declared earlier).
        let groups = reachable(&program, &[name_a], z);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].as_slice(), &[a]);

        // A does not see B (declared later).
        let groups = reachable(&program, &[name_b], a);
        assert!(groups.is_empty());
    }

    #[test]
    fn dotted_descent_through_packages() {
        let mut b = ProgramBuilder::new();
        let int = b.integer();
        let x = b.var("X", int);
        let inner = b.package("Inner", vec![x]);
        let user = b.var("Y", int);
        let outer = b.package("Outer", vec![inner, user]);
        b.module("Outer", "outer.ads", outer, &[], &[]);
        let program = b.finish();

        let name = [
            program.interner.lookup("Inner").unwrap(),
            program.interner.lookup("X").unwrap(),
        ];
        let groups = reachable(&program, &name, user);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].as_slice(), &[x]);
    }

    #[test]
    fn subprograms_are_not_dotted_into() {
        let mut b = ProgramBuilder::new();
        let int = b.integer();
        let local = b.var("X", int);
        let proc = b.procedure("Run", vec![], vec![local], vec![]);
        let user = b.var("Y", int);
        let pack = b.package("P", vec![proc, user]);
        b.module("P", "p.ads", pack, &[], &[]);
        let program = b.finish();

        let name = [
            program.interner.lookup("Run").unwrap(),
            program.interner.lookup("X").unwrap(),
        ];
        assert!(reachable(&program, &name, user).is_empty());
    }

    #[test]
    fn parameters_found_at_innermost_level() {
        let mut b = ProgramBuilder::new();
        let int = b.integer();
        let param = b.param("N", crate::frontend::ParamMode::In, int);
        let shadow = b.var("N", int);
        let proc = b.procedure("Run", vec![param], vec![], vec![]);
        let pack = b.package("P", vec![shadow, proc]);
        b.module("P", "p.ads", pack, &[], &[]);
        let program = b.finish();

        let name = [program.interner.lookup("N").unwrap()];
        let groups = reachable(&program, &name, proc);
        // Innermost group is the parameter, the package member comes after.
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].as_slice(), &[param]);
        assert_eq!(groups[1].as_slice(), &[shadow]);
    }

    #[test]
    fn package_body_sees_declaration_members() {
        let mut b = ProgramBuilder::new();
        let int = b.integer();
        let v = b.var("Counter", int);
        let pack = b.package("P", vec![v]);
        let run = b.procedure("Run", vec![], vec![], vec![]);
        let body = b.package_body("P", vec![run]);
        b.module("P", "p.ads", pack, &[], &[]);
        b.module("P", "p.adb", body, &[], &[]);
        let mut program = b.finish();
        PackBodyNDeclLinking.run(&mut program).unwrap();

        let name = [program.interner.lookup("Counter").unwrap()];
        let groups = reachable(&program, &name, run);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].as_slice(), &[v]);
    }
}
