// src/sema/passes/classes.rs
//
// Class synthesis for tagged records and the subprogram shape rules for
// dispatching parameters. A class mirrors its record's inheritance chain
// and collects the subprograms whose first parameter receives the record.

use crate::errors::{Diag, SemanticError};
use crate::frontend::{Ast, Class, ClassId, DeclId, DeclKind, Symbol, TypeKind};
use crate::module::Program;
use crate::sema::compat;
use crate::sema::passes::{types::lookup_type, unit_decls};
use crate::sema::pipeline::Pass;

/// Synthesizes one class per tagged record, base class first, then
/// attaches methods: every subprogram whose first parameter is of a
/// concrete tagged-record type or a `T'Class` reference, attached
/// through its declaration when a separate body exists.
pub struct CreateClassDeclaration;

impl Pass for CreateClassDeclaration {
    fn name(&self) -> &'static str {
        "CreateClassDeclaration"
    }

    fn run(&mut self, program: &mut Program) -> Result<(), Diag> {
        let decls = unit_decls(program);
        for &(_, decl) in &decls {
            if matches!(&program.ast.decl(decl).kind, DeclKind::Record(rec) if rec.tagged) {
                ensure_class(program, decl);
            }
        }

        for &(_, decl) in &decls {
            let DeclKind::Subprogram(sp) = &program.ast.decl(decl).kind else {
                continue;
            };
            // A body linked to a separate declaration is represented by
            // that declaration.
            if sp.body.is_some() && sp.linked.is_some() {
                continue;
            }
            let Some(&first) = sp.params.first() else {
                continue;
            };
            let Some(rec) = receiver_record(program, first) else {
                continue;
            };
            let class = program
                .ast
                .decl(rec)
                .record()
                .class
                .unwrap_or_else(|| panic!("tagged record without a synthesized class"));
            let already = program
                .ast
                .class(class)
                .methods
                .iter()
                .any(|&m| same_signature(&program.ast, m, decl));
            if !already {
                tracing::trace!(method = %program.ast.decl_path(decl, &program.interner), "attaching method");
                program.ast.class_mut(class).methods.push(decl);
            }
        }
        Ok(())
    }
}

/// The tagged record a subprogram's first parameter receives: a concrete
/// tagged-record type, or the record behind a `T'Class` reference. An
/// unresolvable class-wide name is skipped here; OneClassInSubprogramCheck
/// diagnoses it.
fn receiver_record(program: &Program, param: DeclId) -> Option<DeclId> {
    let ty = program.ast.decl(param).var().ty;
    if let Some(rec) = compat::tagged_record_of(&program.ast, ty) {
        return Some(rec);
    }
    match program.ast.type_kind(compat::canonical(&program.ast, ty)) {
        TypeKind::ClassWide {
            class: Some(class), ..
        } => Some(program.ast.class(*class).record),
        TypeKind::ClassWide { name, class: None } => {
            let decl = lookup_type(program, name, param).ok()?;
            record_behind(&program.ast, decl)
        }
        _ => None,
    }
}

fn ensure_class(program: &mut Program, rec: DeclId) -> ClassId {
    if let Some(class) = program.ast.decl(rec).record().class {
        return class;
    }
    let base_class = program
        .ast
        .decl(rec)
        .record()
        .base
        .map(|base| ensure_class(program, base));
    let class = program.ast.alloc_class(Class {
        record: rec,
        base: base_class,
        methods: Vec::new(),
    });
    program.ast.decl_mut(rec).record_mut().class = Some(class);
    class
}

fn same_signature(ast: &Ast, a: DeclId, b: DeclId) -> bool {
    let da = ast.decl(a);
    let db = ast.decl(b);
    if da.name != db.name {
        return false;
    }
    let sa = da.subprogram();
    let sb = db.subprogram();
    if sa.is_function != sb.is_function || !compat::same_param_types(ast, sa, sb) {
        return false;
    }
    match (sa.return_type, sb.return_type) {
        (None, None) => true,
        (Some(ra), Some(rb)) => compat::types_equal(ast, ra, rb),
        _ => false,
    }
}

/// Resolves `T'Class` parameter types to their classes and enforces the
/// dispatch shape: at most one class-typed parameter, and it comes first.
pub struct OneClassInSubprogramCheck;

impl Pass for OneClassInSubprogramCheck {
    fn name(&self) -> &'static str {
        "OneClassInSubprogramCheck"
    }

    fn run(&mut self, program: &mut Program) -> Result<(), Diag> {
        for (midx, decl) in unit_decls(program) {
            let DeclKind::Subprogram(sp) = &program.ast.decl(decl).kind else {
                continue;
            };
            let params = sp.params.clone();
            for &param in &params {
                resolve_class_wide(program, midx, param)?;
            }
            let class_positions: Vec<usize> = params
                .iter()
                .enumerate()
                .filter(|&(_, &p)| {
                    compat::is_class_typed(&program.ast, program.ast.decl(p).var().ty)
                })
                .map(|(pos, _)| pos)
                .collect();
            if class_positions.len() > 1 {
                return Err(program.diag(
                    midx,
                    SemanticError::MultipleClassParameters {
                        name: program.ast.decl_path(decl, &program.interner),
                    },
                ));
            }
            if let [pos] = class_positions.as_slice() {
                if *pos != 0 {
                    return Err(program.diag(
                        midx,
                        SemanticError::ClassParameterNotFirst {
                            name: program.ast.decl_path(decl, &program.interner),
                        },
                    ));
                }
            }
        }
        Ok(())
    }
}

fn resolve_class_wide(program: &mut Program, midx: usize, param: DeclId) -> Result<(), Diag> {
    let ty = program.ast.decl(param).var().ty;
    let TypeKind::ClassWide { name, class: None } = program.ast.type_kind(ty).clone() else {
        return Ok(());
    };
    let decl = lookup_type(program, &name, param).map_err(|e| program.diag(midx, e))?;
    let rec = record_behind(&program.ast, decl).ok_or_else(|| {
        program.diag(
            midx,
            SemanticError::NotATaggedRecord {
                name: program.interner.display_dotted(&name),
            },
        )
    })?;
    let class = program
        .ast
        .decl(rec)
        .record()
        .class
        .unwrap_or_else(|| panic!("tagged record without a synthesized class"));
    *program.ast.type_kind_mut(ty) = TypeKind::ClassWide {
        name,
        class: Some(class),
    };
    Ok(())
}

fn record_behind(ast: &Ast, decl: DeclId) -> Option<DeclId> {
    let rec = match &ast.decl(decl).kind {
        DeclKind::Record(_) => decl,
        DeclKind::Alias(alias) => compat::record_of(ast, alias.target)?,
        _ => return None,
    };
    ast.decl(rec).record().tagged.then_some(rec)
}

/// The field a record exposes under `name`, its own or inherited.
pub(crate) fn find_field(ast: &Ast, rec: DeclId, name: Symbol) -> Option<DeclId> {
    let mut cur = Some(rec);
    while let Some(r) = cur {
        let record = ast.decl(r).record();
        if let Some(&field) = record
            .fields
            .iter()
            .find(|&&f| ast.decl(f).name == name)
        {
            return Some(field);
        }
        cur = record.base;
    }
    None
}

/// The methods a class exposes under `name`, nearest override first. A
/// base method is shadowed when a more derived collected method carries
/// the same signature past the receiver.
pub(crate) fn find_methods(ast: &Ast, class: ClassId, name: Symbol) -> Vec<DeclId> {
    let mut out: Vec<DeclId> = Vec::new();
    let mut cur = Some(class);
    while let Some(c) = cur {
        for &method in &ast.class(c).methods {
            if ast.decl(method).name != name {
                continue;
            }
            if out.iter().any(|&seen| overrides(ast, seen, method)) {
                continue;
            }
            out.push(method);
        }
        cur = ast.class(c).base;
    }
    out
}

fn overrides(ast: &Ast, derived: DeclId, base: DeclId) -> bool {
    let sd = ast.decl(derived).subprogram();
    let sb = ast.decl(base).subprogram();
    if sd.is_function != sb.is_function || sd.params.len() != sb.params.len() {
        return false;
    }
    sd.params[1..]
        .iter()
        .zip(&sb.params[1..])
        .all(|(&pa, &pb)| {
            compat::types_equal(ast, ast.decl(pa).var().ty, ast.decl(pb).var().ty)
        })
}
