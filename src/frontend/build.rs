// src/frontend/build.rs
//
// Programmatic construction of unresolved programs. This is the surface
// the (out-of-scope) parser targets; the standard-library module and the
// test suite build their ASTs through it. Container constructors wire the
// parent back-references of their children.

use crate::frontend::ast::*;
use crate::frontend::{Interner, Symbol};
use crate::module::{Module, Program};

#[derive(Default)]
pub struct ProgramBuilder {
    pub interner: Interner,
    pub ast: Ast,
    modules: Vec<Module>,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sym(&mut self, s: &str) -> Symbol {
        self.interner.intern(s)
    }

    pub fn raw_name(&mut self, dotted: &str) -> RawName {
        self.interner.intern_dotted(dotted)
    }

    // Types.

    pub fn integer(&mut self) -> TypeId {
        self.ast.primitive(Primitive::Integer)
    }

    pub fn boolean(&mut self) -> TypeId {
        self.ast.primitive(Primitive::Boolean)
    }

    pub fn character(&mut self) -> TypeId {
        self.ast.primitive(Primitive::Character)
    }

    pub fn float(&mut self) -> TypeId {
        self.ast.primitive(Primitive::Float)
    }

    pub fn string_ty(&mut self, range: (i64, i64)) -> TypeId {
        self.ast.alloc_type(TypeKind::BoundedString { range })
    }

    pub fn array_ty(&mut self, ranges: Vec<(i64, i64)>, elem: TypeId) -> TypeId {
        self.ast.alloc_type(TypeKind::Array { ranges, elem })
    }

    /// An unresolved type-name reference, e.g. `Shapes.Point`.
    pub fn named_ty(&mut self, dotted: &str) -> TypeId {
        let name = self.raw_name(dotted);
        self.ast.alloc_type(TypeKind::Unresolved(name))
    }

    /// A `T'Class` reference, resolved to a synthesized class later.
    pub fn class_wide_ty(&mut self, dotted: &str) -> TypeId {
        let name = self.raw_name(dotted);
        self.ast.alloc_type(TypeKind::ClassWide { name, class: None })
    }

    // Declarations.

    fn decl(&mut self, name: Symbol, kind: DeclKind) -> DeclId {
        self.ast.alloc_decl(Decl {
            name,
            parent: None,
            qualified_name: None,
            kind,
        })
    }

    fn adopt(&mut self, parent: DeclId, children: &[DeclId]) {
        for &child in children {
            self.ast.decl_mut(child).parent = Some(parent);
        }
    }

    pub fn var(&mut self, name: &str, ty: TypeId) -> DeclId {
        let name = self.sym(name);
        self.decl(
            name,
            DeclKind::Var(VarDecl {
                ty,
                init: None,
                mode: None,
            }),
        )
    }

    pub fn var_init(&mut self, name: &str, ty: TypeId, init: ExprId) -> DeclId {
        let name = self.sym(name);
        self.decl(
            name,
            DeclKind::Var(VarDecl {
                ty,
                init: Some(init),
                mode: None,
            }),
        )
    }

    pub fn param(&mut self, name: &str, mode: ParamMode, ty: TypeId) -> DeclId {
        let name = self.sym(name);
        self.decl(
            name,
            DeclKind::Var(VarDecl {
                ty,
                init: None,
                mode: Some(mode),
            }),
        )
    }

    /// An Integer loop variable; include it in the enclosing subprogram's
    /// locals and reference it from `Stmt::For`.
    pub fn loop_var(&mut self, name: &str) -> DeclId {
        let ty = self.integer();
        self.var(name, ty)
    }

    pub fn record(
        &mut self,
        name: &str,
        tagged: bool,
        base: Option<&str>,
        fields: Vec<DeclId>,
    ) -> DeclId {
        let name = self.sym(name);
        let base_name = base.map(|b| self.interner.intern_dotted(b));
        let id = self.decl(
            name,
            DeclKind::Record(RecordDecl {
                fields: fields.clone(),
                tagged,
                base_name,
                base: None,
                class: None,
            }),
        );
        self.adopt(id, &fields);
        id
    }

    pub fn alias(&mut self, name: &str, target: TypeId) -> DeclId {
        let name = self.sym(name);
        self.decl(name, DeclKind::Alias(AliasDecl { target }))
    }

    pub fn package(&mut self, name: &str, decls: Vec<DeclId>) -> DeclId {
        self.package_inner(name, decls, false)
    }

    pub fn package_body(&mut self, name: &str, decls: Vec<DeclId>) -> DeclId {
        self.package_inner(name, decls, true)
    }

    fn package_inner(&mut self, name: &str, decls: Vec<DeclId>, is_body: bool) -> DeclId {
        let name = self.sym(name);
        let id = self.decl(
            name,
            DeclKind::Package(PackageDecl {
                decls: decls.clone(),
                is_body,
                linked: None,
            }),
        );
        self.adopt(id, &decls);
        id
    }

    /// A bodyless subprogram declaration (inside a package declaration).
    pub fn proc_decl(&mut self, name: &str, params: Vec<DeclId>) -> DeclId {
        self.subprogram(name, false, params, None, Vec::new(), None)
    }

    pub fn func_decl(&mut self, name: &str, params: Vec<DeclId>, ret: TypeId) -> DeclId {
        self.subprogram(name, true, params, Some(ret), Vec::new(), None)
    }

    pub fn procedure(
        &mut self,
        name: &str,
        params: Vec<DeclId>,
        locals: Vec<DeclId>,
        body: Vec<Stmt>,
    ) -> DeclId {
        self.subprogram(name, false, params, None, locals, Some(body))
    }

    pub fn function(
        &mut self,
        name: &str,
        params: Vec<DeclId>,
        ret: TypeId,
        locals: Vec<DeclId>,
        body: Vec<Stmt>,
    ) -> DeclId {
        self.subprogram(name, true, params, Some(ret), locals, Some(body))
    }

    fn subprogram(
        &mut self,
        name: &str,
        is_function: bool,
        params: Vec<DeclId>,
        return_type: Option<TypeId>,
        locals: Vec<DeclId>,
        body: Option<Vec<Stmt>>,
    ) -> DeclId {
        let name = self.sym(name);
        let id = self.decl(
            name,
            DeclKind::Subprogram(SubprogramDecl {
                is_function,
                params: params.clone(),
                return_type,
                locals: locals.clone(),
                body,
                linked: None,
            }),
        );
        self.adopt(id, &params);
        self.adopt(id, &locals);
        id
    }

    // Expressions.

    pub fn name_expr(&mut self, dotted: &str) -> ExprId {
        let name = self.raw_name(dotted);
        self.ast.alloc_expr(ExprKind::Name(name))
    }

    pub fn call(&mut self, dotted: &str, args: Vec<ExprId>) -> ExprId {
        let name = self.raw_name(dotted);
        self.ast.alloc_expr(ExprKind::CallOrIndex { name, args })
    }

    pub fn attr_expr(&mut self, prefix: &str, attr: &str, args: Vec<ExprId>) -> ExprId {
        let prefix = self.raw_name(prefix);
        let attr = self.sym(attr);
        self.ast.alloc_expr(ExprKind::Attribute { prefix, attr, args })
    }

    pub fn member(&mut self, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.ast.alloc_expr(ExprKind::MemberAccess { lhs, rhs })
    }

    pub fn binary(&mut self, op: BinOp, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.ast.alloc_expr(ExprKind::Binary { op, lhs, rhs })
    }

    pub fn neg(&mut self, operand: ExprId) -> ExprId {
        self.ast.alloc_expr(ExprKind::Unary {
            op: UnOp::Neg,
            operand,
        })
    }

    pub fn int(&mut self, value: i64) -> ExprId {
        self.ast.alloc_expr(ExprKind::IntLit(value))
    }

    pub fn float_lit(&mut self, value: f64) -> ExprId {
        self.ast.alloc_expr(ExprKind::FloatLit(value))
    }

    pub fn bool_lit(&mut self, value: bool) -> ExprId {
        self.ast.alloc_expr(ExprKind::BoolLit(value))
    }

    pub fn char_lit(&mut self, value: char) -> ExprId {
        self.ast.alloc_expr(ExprKind::CharLit(value))
    }

    pub fn str_lit(&mut self, value: &str) -> ExprId {
        self.ast.alloc_expr(ExprKind::StrLit(value.to_string()))
    }

    // Modules.

    /// Registers a compiled unit. The first registered module is the
    /// program entry.
    pub fn module(
        &mut self,
        name: &str,
        file: &str,
        unit: DeclId,
        withs: &[&str],
        uses: &[&str],
    ) -> usize {
        let name = self.sym(name);
        let with_decls = withs
            .iter()
            .map(|w| {
                let path = self.interner.intern_dotted(w);
                let last = *path.last().expect("empty with name");
                self.decl(last, DeclKind::With(WithDecl { path, target: None }))
            })
            .collect();
        let use_decls = uses
            .iter()
            .map(|u| {
                let path = self.interner.intern_dotted(u);
                let last = *path.last().expect("empty use name");
                self.decl(last, DeclKind::Use(UseDecl { path }))
            })
            .collect();
        let file_ext = match file.rfind('.') {
            Some(dot) => file[dot + 1..].to_string(),
            None => String::new(),
        };
        self.modules.push(Module {
            unit,
            withs: with_decls,
            uses: use_decls,
            name,
            file_name: file.to_string(),
            file_ext,
        });
        self.modules.len() - 1
    }

    pub fn finish(self) -> Program {
        Program {
            interner: self.interner,
            ast: self.ast,
            modules: self.modules,
            spaces: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_children_get_parents() {
        let mut b = ProgramBuilder::new();
        let ty = b.integer();
        let field = b.var("X", ty);
        let rec = b.record("Point", false, None, vec![field]);
        assert_eq!(b.ast.decl(field).parent, Some(rec));
    }

    #[test]
    fn module_splits_file_extension() {
        let mut b = ProgramBuilder::new();
        let unit = b.procedure("Main", vec![], vec![], vec![]);
        b.module("Main", "main.adb", unit, &[], &[]);
        let program = b.finish();
        assert_eq!(program.entry().file_stem(), "main");
        assert_eq!(program.entry().file_ext, "adb");
    }
}
