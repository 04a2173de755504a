// src/sema/passes/types.rs
//
// Type-name resolution and the inheritance checks that depend on it.
// After TypeNameToRealType no `Unresolved` kind remains in the arena and
// every record base points at its tagged-record declaration.

use rustc_hash::FxHashSet;

use crate::errors::{Diag, SemanticError};
use crate::frontend::{DeclId, DeclKind, Symbol, TypeId, TypeKind};
use crate::module::Program;
use crate::sema::passes::unit_decls;
use crate::sema::pipeline::Pass;
use crate::sema::{compat, reachable};

/// Rewrites every `Unresolved` type reference to point at the visible
/// record or alias declaration it names, then resolves record bases and
/// rejects inheritance cycles.
pub struct TypeNameToRealType;

impl Pass for TypeNameToRealType {
    fn name(&self) -> &'static str {
        "TypeNameToRealType"
    }

    fn run(&mut self, program: &mut Program) -> Result<(), Diag> {
        // Type references, resolved in the scope of the declaration that
        // carries them.
        let mut work: Vec<(usize, TypeId, DeclId, bool)> = Vec::new();
        for (midx, decl) in unit_decls(program) {
            match &program.ast.decl(decl).kind {
                DeclKind::Var(var) => work.push((midx, var.ty, decl, var.mode.is_some())),
                DeclKind::Alias(alias) => work.push((midx, alias.target, decl, false)),
                DeclKind::Subprogram(sp) => {
                    if let Some(ret) = sp.return_type {
                        work.push((midx, ret, decl, false));
                    }
                }
                _ => {}
            }
        }
        for (midx, ty, requester, in_param) in work {
            resolve_type(program, midx, ty, requester, in_param)?;
        }

        // Record bases, after aliases are resolvable.
        let mut bases: Vec<(DeclId, DeclId)> = Vec::new();
        for (midx, decl) in unit_decls(program) {
            let DeclKind::Record(rec) = &program.ast.decl(decl).kind else {
                continue;
            };
            let Some(base_name) = rec.base_name.clone() else {
                continue;
            };
            let base = resolve_base(program, &base_name, decl).ok_or_else(|| {
                program.diag(
                    midx,
                    SemanticError::UnresolvedBaseRecord {
                        name: program.interner.display_dotted(&base_name),
                    },
                )
            })?;
            if !program.ast.decl(base).record().tagged {
                return Err(program.diag(
                    midx,
                    SemanticError::NotATaggedRecord {
                        name: program.interner.display_dotted(&base_name),
                    },
                ));
            }
            bases.push((decl, base));
        }
        for (decl, base) in bases {
            let DeclKind::Record(rec) = &mut program.ast.decl_mut(decl).kind else {
                unreachable!()
            };
            rec.base = Some(base);
        }

        // Cycle check over the resolved base links. The diagnostic names
        // the record where the walk repeats, not whichever record the
        // walk started from.
        for (midx, decl) in unit_decls(program) {
            let DeclKind::Record(_) = &program.ast.decl(decl).kind else {
                continue;
            };
            let mut seen = FxHashSet::default();
            let mut cur = decl;
            while let Some(base) = program.ast.decl(cur).record().base {
                if base == decl || !seen.insert(base) {
                    return Err(program.diag(
                        midx,
                        SemanticError::CircularInheritance {
                            name: program.ast.decl_path(base, &program.interner),
                        },
                    ));
                }
                cur = base;
            }
        }
        Ok(())
    }
}

fn resolve_type(
    program: &mut Program,
    midx: usize,
    ty: TypeId,
    requester: DeclId,
    in_param: bool,
) -> Result<(), Diag> {
    let kind = program.ast.type_kind(ty).clone();
    match kind {
        TypeKind::Unresolved(name) => {
            let resolved = lookup_type(program, &name, requester).map_err(|e| {
                program.diag(midx, e)
            })?;
            *program.ast.type_kind_mut(ty) = TypeKind::Named(resolved);
            Ok(())
        }
        TypeKind::Array { elem, .. } => resolve_type(program, midx, elem, requester, false),
        TypeKind::ClassWide { name, .. } => {
            // Resolved to a class by OneClassInSubprogramCheck; only
            // legal in parameter position.
            if in_param {
                Ok(())
            } else {
                Err(program.diag(
                    midx,
                    SemanticError::ClassWideOutsideParameter {
                        name: program.interner.display_dotted(&name),
                    },
                ))
            }
        }
        _ => Ok(()),
    }
}

/// Finds the type declaration a name resolves to, honoring shadowing: an
/// inner non-type declaration hides an outer type of the same name.
pub(super) fn lookup_type(
    program: &Program,
    name: &[Symbol],
    requester: DeclId,
) -> Result<DeclId, SemanticError> {
    let dotted = || program.interner.display_dotted(name);
    for group in reachable(program, name, requester) {
        let types: Vec<DeclId> = group
            .iter()
            .copied()
            .filter(|&d| {
                matches!(
                    program.ast.decl(d).kind,
                    DeclKind::Record(_) | DeclKind::Alias(_)
                )
            })
            .collect();
        return match types.as_slice() {
            [] => Err(SemanticError::NotAType { name: dotted() }),
            [decl] => Ok(*decl),
            _ => Err(SemanticError::AmbiguousName { name: dotted() }),
        };
    }
    Err(SemanticError::UnknownTypeName { name: dotted() })
}

/// The record declaration a base name designates, chasing an alias if
/// the name resolves to one.
fn resolve_base(program: &Program, name: &[Symbol], requester: DeclId) -> Option<DeclId> {
    let decl = lookup_type(program, name, requester).ok()?;
    match &program.ast.decl(decl).kind {
        DeclKind::Record(_) => Some(decl),
        DeclKind::Alias(alias) => compat::record_of(&program.ast, alias.target),
        _ => None,
    }
}

/// A derived record may not redeclare a field any ancestor already
/// carries.
pub struct InheritsVarNameConflictCheck;

impl Pass for InheritsVarNameConflictCheck {
    fn name(&self) -> &'static str {
        "InheritsVarNameConflictCheck"
    }

    fn run(&mut self, program: &mut Program) -> Result<(), Diag> {
        for (midx, decl) in unit_decls(program) {
            let DeclKind::Record(rec) = &program.ast.decl(decl).kind else {
                continue;
            };
            if rec.base.is_none() {
                continue;
            }
            let mut inherited: FxHashSet<Symbol> = FxHashSet::default();
            let mut cur = rec.base;
            while let Some(base) = cur {
                let base_rec = program.ast.decl(base).record();
                for &field in &base_rec.fields {
                    inherited.insert(program.ast.decl(field).name);
                }
                cur = base_rec.base;
            }
            for &field in &rec.fields {
                let field_name = program.ast.decl(field).name;
                if inherited.contains(&field_name) {
                    return Err(program.diag(
                        midx,
                        SemanticError::InheritedFieldConflict {
                            field: program.interner.resolve(field_name).to_string(),
                            record: program.ast.decl_path(decl, &program.interner),
                        },
                    ));
                }
            }
        }
        Ok(())
    }
}
