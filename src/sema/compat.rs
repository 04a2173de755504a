// src/sema/compat.rs
//
// Pure type predicates over the arena: alias chasing, structural
// equality, assignment/parameter compatibility, and display. These run
// only after TypeNameToRealType, so an `Unresolved` kind seen here is a
// pipeline bug.

use crate::frontend::{
    Ast, ClassId, DeclId, DeclKind, Interner, Primitive, SubprogramDecl, TypeId, TypeKind,
};

/// Chases alias chains to the underlying type.
pub fn canonical(ast: &Ast, mut ty: TypeId) -> TypeId {
    let mut steps = 0usize;
    loop {
        match ast.type_kind(ty) {
            TypeKind::Named(decl) => match &ast.decl(*decl).kind {
                DeclKind::Alias(alias) => ty = alias.target,
                _ => return ty,
            },
            _ => return ty,
        }
        steps += 1;
        assert!(steps <= ast.decl_count(), "type alias cycle in the arena");
    }
}

/// Structural equality after alias chasing. Array bounds are ignored
/// (dimension count and element type decide); bounded strings are all
/// one type.
pub fn types_equal(ast: &Ast, a: TypeId, b: TypeId) -> bool {
    let a = canonical(ast, a);
    let b = canonical(ast, b);
    if a == b {
        return true;
    }
    match (ast.type_kind(a), ast.type_kind(b)) {
        (TypeKind::Primitive(x), TypeKind::Primitive(y)) => x == y,
        (TypeKind::BoundedString { .. }, TypeKind::BoundedString { .. }) => true,
        (
            TypeKind::Array {
                ranges: ra,
                elem: ea,
            },
            TypeKind::Array {
                ranges: rb,
                elem: eb,
            },
        ) => ra.len() == rb.len() && types_equal(ast, *ea, *eb),
        (TypeKind::Named(da), TypeKind::Named(db)) => da == db,
        (
            TypeKind::ClassWide { class: Some(ca), .. },
            TypeKind::ClassWide { class: Some(cb), .. },
        ) => ca == cb,
        // Before class synthesis, compare class-wide references by name.
        (
            TypeKind::ClassWide { name: na, class: None },
            TypeKind::ClassWide { name: nb, class: None },
        ) => na == nb,
        _ => false,
    }
}

/// The primitive behind a type, chasing aliases.
pub fn prim_of(ast: &Ast, ty: TypeId) -> Option<Primitive> {
    match ast.type_kind(canonical(ast, ty)) {
        TypeKind::Primitive(prim) => Some(*prim),
        _ => None,
    }
}

/// Whether a type is (an alias of) a bounded string.
pub fn is_string(ast: &Ast, ty: TypeId) -> bool {
    matches!(
        ast.type_kind(canonical(ast, ty)),
        TypeKind::BoundedString { .. }
    )
}

/// The record declaration behind a type, if it is (an alias of) a record.
pub fn record_of(ast: &Ast, ty: TypeId) -> Option<DeclId> {
    match ast.type_kind(canonical(ast, ty)) {
        TypeKind::Named(decl) if matches!(ast.decl(*decl).kind, DeclKind::Record(_)) => Some(*decl),
        _ => None,
    }
}

/// The tagged record behind a type, if any.
pub fn tagged_record_of(ast: &Ast, ty: TypeId) -> Option<DeclId> {
    record_of(ast, ty).filter(|&decl| ast.decl(decl).record().tagged)
}

/// The synthesized class a type dispatches through: set for tagged-record
/// values and resolved `T'Class` references.
pub fn class_of(ast: &Ast, ty: TypeId) -> Option<ClassId> {
    match ast.type_kind(canonical(ast, ty)) {
        TypeKind::ClassWide { class, .. } => *class,
        TypeKind::Named(decl) => match &ast.decl(*decl).kind {
            DeclKind::Record(rec) if rec.tagged => rec.class,
            _ => None,
        },
        _ => None,
    }
}

/// Whether a parameter of this type makes a subprogram a candidate method
/// (tagged record or class-wide reference).
pub fn is_class_typed(ast: &Ast, ty: TypeId) -> bool {
    match ast.type_kind(canonical(ast, ty)) {
        TypeKind::ClassWide { .. } => true,
        TypeKind::Named(_) => tagged_record_of(ast, ty).is_some(),
        _ => false,
    }
}

/// Whether `class` is `ancestor` or derives from it.
pub fn class_descends(ast: &Ast, class: ClassId, ancestor: ClassId) -> bool {
    let mut cur = Some(class);
    while let Some(c) = cur {
        if c == ancestor {
            return true;
        }
        cur = ast.class(c).base;
    }
    false
}

/// Whether an argument of type `from` can bind to a parameter of type
/// `to`: structural equality, or class-wide covariance (`T'Class`
/// accepts `T` and everything derived from it).
pub fn param_accepts(ast: &Ast, to: TypeId, from: TypeId) -> bool {
    if types_equal(ast, to, from) {
        return true;
    }
    if let TypeKind::ClassWide {
        class: Some(ancestor),
        ..
    } = ast.type_kind(canonical(ast, to))
    {
        if let Some(from_class) = class_of(ast, from) {
            return class_descends(ast, from_class, *ancestor);
        }
    }
    false
}

/// Whether a method receiver of type `from` can bind a first parameter
/// of type `to`: ordinary parameter compatibility, or tagged-record
/// inheritance (a base-typed receiver parameter accepts every derived
/// record).
pub fn receiver_accepts(ast: &Ast, to: TypeId, from: TypeId) -> bool {
    if param_accepts(ast, to, from) {
        return true;
    }
    match (class_of(ast, to), class_of(ast, from)) {
        (Some(ancestor), Some(class)) => class_descends(ast, class, ancestor),
        _ => false,
    }
}

/// Assignment compatibility: same rule as parameter binding.
pub fn assignable(ast: &Ast, to: TypeId, from: TypeId) -> bool {
    param_accepts(ast, to, from)
}

/// Whether two subprograms carry the identical parameter-type sequence.
pub fn same_param_types(ast: &Ast, a: &SubprogramDecl, b: &SubprogramDecl) -> bool {
    a.params.len() == b.params.len()
        && a.params.iter().zip(&b.params).all(|(&pa, &pb)| {
            types_equal(ast, ast.decl(pa).var().ty, ast.decl(pb).var().ty)
        })
}

/// Whether two subprograms carry identical parameter modes position by
/// position.
pub fn same_param_modes(ast: &Ast, a: &SubprogramDecl, b: &SubprogramDecl) -> bool {
    a.params.len() == b.params.len()
        && a.params
            .iter()
            .zip(&b.params)
            .all(|(&pa, &pb)| ast.decl(pa).var().mode == ast.decl(pb).var().mode)
}

/// Human-readable type name for diagnostics.
pub fn display(ast: &Ast, interner: &Interner, ty: TypeId) -> String {
    match ast.type_kind(ty) {
        TypeKind::Primitive(prim) => prim.display().to_string(),
        TypeKind::BoundedString { .. } => "String".to_string(),
        TypeKind::Array { ranges, elem } => {
            format!(
                "array({} dim) of {}",
                ranges.len(),
                display(ast, interner, *elem)
            )
        }
        TypeKind::Unresolved(name) => interner.display_dotted(name),
        TypeKind::Named(decl) => interner.resolve(ast.decl(*decl).name).to_string(),
        TypeKind::ClassWide { name, .. } => {
            format!("{}'Class", interner.display_dotted(name))
        }
    }
}
