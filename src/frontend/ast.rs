// src/frontend/ast.rs
//
// Arena-backed AST substrate. Every node family (declarations, statements,
// expressions, types, synthesized classes) is a closed enum stored in an
// id-addressed arena on `Ast`; parent links are plain ids, never owning
// edges. The semantic passes rewrite expression and type nodes in place.

use crate::frontend::{Interner, Symbol};

/// Index of a declaration in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeclId(pub u32);

/// Index of an expression in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExprId(pub u32);

/// Index of a type in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(pub u32);

/// Index of a synthesized class in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassId(pub u32);

/// A raw dotted name as produced by parsing, one symbol per component.
pub type RawName = Vec<Symbol>;

/// Parameter passing direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamMode {
    In,
    Out,
    InOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Integer,
    Boolean,
    Character,
    Float,
}

impl Primitive {
    pub fn display(self) -> &'static str {
        match self {
            Primitive::Integer => "Integer",
            Primitive::Boolean => "Boolean",
            Primitive::Character => "Character",
            Primitive::Float => "Float",
        }
    }
}

/// Type nodes. `Unresolved` is what the parser leaves behind; the
/// TypeNameToRealType pass rewrites it to `Named` in place. `ClassWide`
/// is `T'Class`; its `class` link is filled once classes are synthesized.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    Primitive(Primitive),
    Array {
        ranges: Vec<(i64, i64)>,
        elem: TypeId,
    },
    BoundedString {
        range: (i64, i64),
    },
    Unresolved(RawName),
    Named(DeclId),
    ClassWide {
        name: RawName,
        class: Option<ClassId>,
    },
}

/// A declaration: name, non-owning parent link, and the kind payload.
/// `qualified_name` is assigned by the final QualifiedNameSet pass.
#[derive(Debug)]
pub struct Decl {
    pub name: Symbol,
    pub parent: Option<DeclId>,
    pub qualified_name: Option<String>,
    pub kind: DeclKind,
}

#[derive(Debug)]
pub enum DeclKind {
    Var(VarDecl),
    Subprogram(SubprogramDecl),
    Package(PackageDecl),
    Record(RecordDecl),
    Alias(AliasDecl),
    With(WithDecl),
    Use(UseDecl),
}

/// A variable, record field, or subprogram parameter (`mode` is set for
/// parameters only).
#[derive(Debug)]
pub struct VarDecl {
    pub ty: TypeId,
    pub init: Option<ExprId>,
    pub mode: Option<ParamMode>,
}

/// A procedure or function. `body` is `None` for a declaration inside a
/// package declaration; the SubprogBodyNDeclLinking pass connects the two
/// through `linked`.
#[derive(Debug)]
pub struct SubprogramDecl {
    pub is_function: bool,
    pub params: Vec<DeclId>,
    pub return_type: Option<TypeId>,
    pub locals: Vec<DeclId>,
    pub body: Option<Vec<Stmt>>,
    pub linked: Option<DeclId>,
}

/// A package declaration or body; the two are connected through `linked`
/// by the PackBodyNDeclLinking pass.
#[derive(Debug)]
pub struct PackageDecl {
    pub decls: Vec<DeclId>,
    pub is_body: bool,
    pub linked: Option<DeclId>,
}

/// A record type. `base_name` is the raw inheritance base as parsed;
/// `base` is the resolved record and `class` the synthesized class.
#[derive(Debug)]
pub struct RecordDecl {
    pub fields: Vec<DeclId>,
    pub tagged: bool,
    pub base_name: Option<RawName>,
    pub base: Option<DeclId>,
    pub class: Option<ClassId>,
}

#[derive(Debug)]
pub struct AliasDecl {
    pub target: TypeId,
}

/// A `with` import marker; `target` is the imported module's index, set
/// during GlobalSpaceCreation.
#[derive(Debug)]
pub struct WithDecl {
    pub path: RawName,
    pub target: Option<usize>,
}

/// A `use` visibility-flattening marker.
#[derive(Debug)]
pub struct UseDecl {
    pub path: RawName,
}

/// A synthesized class: exists only for tagged records, created exactly
/// once per record. Methods are subprogram decl ids in declaration order;
/// `base` and `record` are resolution links, never ownership edges.
#[derive(Debug)]
pub struct Class {
    pub record: DeclId,
    pub base: Option<ClassId>,
    pub methods: Vec<DeclId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Eq,
    Neq,
    Lt,
    Gt,
    Le,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Concat,
}

impl BinOp {
    pub fn display(self) -> &'static str {
        match self {
            BinOp::Eq => "=",
            BinOp::Neq => "/=",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Le => "<=",
            BinOp::Ge => ">=",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "mod",
            BinOp::Concat => "&",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,
}

/// Attributes resolved directly by name and argument type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrKind {
    Image,
}

/// An expression node. `ty` is `None` until LinkExprs resolves the node;
/// afterwards every value-producing node carries a type (procedure calls
/// in statement position stay untyped).
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub ty: Option<TypeId>,
}

/// Raw kinds come from the parser; resolved kinds ("dot-op chain" nodes)
/// are produced only by LinkExprs. A `tail` is one more level of member
/// access and may only hang off a container node (a package reference or
/// a variable/element access of tagged-record type).
#[derive(Debug, Clone)]
pub enum ExprKind {
    // Raw.
    Name(RawName),
    CallOrIndex {
        name: RawName,
        args: Vec<ExprId>,
    },
    Attribute {
        prefix: RawName,
        attr: Symbol,
        args: Vec<ExprId>,
    },
    Binary {
        op: BinOp,
        lhs: ExprId,
        rhs: ExprId,
    },
    Unary {
        op: UnOp,
        operand: ExprId,
    },
    MemberAccess {
        lhs: ExprId,
        rhs: ExprId,
    },
    IntLit(i64),
    FloatLit(f64),
    BoolLit(bool),
    CharLit(char),
    StrLit(String),

    // Resolved.
    VarAccess {
        decl: DeclId,
        tail: Option<ExprId>,
    },
    ArrayElem {
        decl: DeclId,
        indices: Vec<ExprId>,
        tail: Option<ExprId>,
    },
    CallSubprog {
        decl: DeclId,
        args: Vec<ExprId>,
    },
    /// A method call hanging off the chain node it is appended to; the
    /// receiver is the chain head, `args` are the explicit arguments.
    MethodCall {
        method: DeclId,
        args: Vec<ExprId>,
    },
    PackageRef {
        decl: DeclId,
        tail: Option<ExprId>,
    },
    AttrCall {
        attr: AttrKind,
        args: Vec<ExprId>,
    },
}

/// Statements. Bodies own their statement trees directly; expressions are
/// arena references.
#[derive(Debug, Clone)]
pub enum Stmt {
    Assign {
        target: ExprId,
        value: ExprId,
    },
    /// A bare call in statement position.
    Call(ExprId),
    If {
        /// `arms[0]` is the `if`, the rest are `elsif`s.
        arms: Vec<(ExprId, Vec<Stmt>)>,
        els: Vec<Stmt>,
    },
    While {
        cond: ExprId,
        body: Vec<Stmt>,
    },
    For {
        /// The loop variable, materialized as a local of the enclosing
        /// subprogram by the builder.
        var: DeclId,
        from: ExprId,
        to: ExprId,
        body: Vec<Stmt>,
    },
    Return(Option<ExprId>),
}

/// All node arenas for one program.
#[derive(Debug, Default)]
pub struct Ast {
    decls: Vec<Decl>,
    exprs: Vec<Expr>,
    types: Vec<TypeKind>,
    classes: Vec<Class>,
    primitive_cache: [Option<TypeId>; 4],
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc_decl(&mut self, decl: Decl) -> DeclId {
        let id = DeclId(self.decls.len() as u32);
        self.decls.push(decl);
        id
    }

    pub fn alloc_expr(&mut self, kind: ExprKind) -> ExprId {
        let id = ExprId(self.exprs.len() as u32);
        self.exprs.push(Expr { kind, ty: None });
        id
    }

    pub fn alloc_type(&mut self, kind: TypeKind) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(kind);
        id
    }

    pub fn alloc_class(&mut self, class: Class) -> ClassId {
        let id = ClassId(self.classes.len() as u32);
        self.classes.push(class);
        id
    }

    pub fn decl(&self, id: DeclId) -> &Decl {
        &self.decls[id.0 as usize]
    }

    pub fn decl_mut(&mut self, id: DeclId) -> &mut Decl {
        &mut self.decls[id.0 as usize]
    }

    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.0 as usize]
    }

    pub fn expr_mut(&mut self, id: ExprId) -> &mut Expr {
        &mut self.exprs[id.0 as usize]
    }

    pub fn type_kind(&self, id: TypeId) -> &TypeKind {
        &self.types[id.0 as usize]
    }

    pub fn type_kind_mut(&mut self, id: TypeId) -> &mut TypeKind {
        &mut self.types[id.0 as usize]
    }

    pub fn class(&self, id: ClassId) -> &Class {
        &self.classes[id.0 as usize]
    }

    pub fn class_mut(&mut self, id: ClassId) -> &mut Class {
        &mut self.classes[id.0 as usize]
    }

    pub fn decl_count(&self) -> usize {
        self.decls.len()
    }

    /// Canonical arena type for a primitive, allocated once.
    pub fn primitive(&mut self, prim: Primitive) -> TypeId {
        let slot = prim as usize;
        if let Some(id) = self.primitive_cache[slot] {
            return id;
        }
        let id = self.alloc_type(TypeKind::Primitive(prim));
        self.primitive_cache[slot] = id.into();
        id
    }

    /// The declaration area of a scope-owning declaration: package members,
    /// record fields, or subprogram parameters followed by locals. Empty for
    /// anything else.
    pub fn area(&self, id: DeclId) -> Vec<DeclId> {
        match &self.decl(id).kind {
            DeclKind::Package(pack) => pack.decls.clone(),
            DeclKind::Record(rec) => rec.fields.clone(),
            DeclKind::Subprogram(sp) => {
                let mut area = sp.params.clone();
                area.extend(&sp.locals);
                area
            }
            _ => Vec::new(),
        }
    }

    /// The root of a declaration's parent chain (its compilation unit).
    pub fn root_of(&self, mut id: DeclId) -> DeclId {
        while let Some(parent) = self.decl(id).parent {
            id = parent;
        }
        id
    }

    /// The dotted path of a declaration from its unit root.
    pub fn decl_path(&self, id: DeclId, interner: &Interner) -> String {
        let mut parts = vec![self.decl(id).name];
        let mut cur = id;
        while let Some(parent) = self.decl(cur).parent {
            parts.push(self.decl(parent).name);
            cur = parent;
        }
        parts.reverse();
        interner.display_dotted(&parts)
    }
}

impl Decl {
    pub fn var(&self) -> &VarDecl {
        match &self.kind {
            DeclKind::Var(var) => var,
            other => panic!("expected variable declaration, got {other:?}"),
        }
    }

    pub fn subprogram(&self) -> &SubprogramDecl {
        match &self.kind {
            DeclKind::Subprogram(sp) => sp,
            other => panic!("expected subprogram declaration, got {other:?}"),
        }
    }

    pub fn subprogram_mut(&mut self) -> &mut SubprogramDecl {
        match &mut self.kind {
            DeclKind::Subprogram(sp) => sp,
            other => panic!("expected subprogram declaration, got {other:?}"),
        }
    }

    pub fn package(&self) -> &PackageDecl {
        match &self.kind {
            DeclKind::Package(pack) => pack,
            other => panic!("expected package declaration, got {other:?}"),
        }
    }

    pub fn record(&self) -> &RecordDecl {
        match &self.kind {
            DeclKind::Record(rec) => rec,
            other => panic!("expected record declaration, got {other:?}"),
        }
    }

    pub fn record_mut(&mut self) -> &mut RecordDecl {
        match &mut self.kind {
            DeclKind::Record(rec) => rec,
            other => panic!("expected record declaration, got {other:?}"),
        }
    }

    pub fn is_subprogram(&self) -> bool {
        matches!(self.kind, DeclKind::Subprogram(_))
    }

    pub fn is_package(&self) -> bool {
        matches!(self.kind, DeclKind::Package(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_types_are_cached() {
        let mut ast = Ast::new();
        let a = ast.primitive(Primitive::Integer);
        let b = ast.primitive(Primitive::Integer);
        let c = ast.primitive(Primitive::Boolean);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn decl_path_walks_parents() {
        let mut interner = Interner::new();
        let mut ast = Ast::new();
        let pack_name = interner.intern("Shapes");
        let field_name = interner.intern("Area");

        let pack = ast.alloc_decl(Decl {
            name: pack_name,
            parent: None,
            qualified_name: None,
            kind: DeclKind::Package(PackageDecl {
                decls: Vec::new(),
                is_body: false,
                linked: None,
            }),
        });
        let ty = ast.primitive(Primitive::Float);
        let var = ast.alloc_decl(Decl {
            name: field_name,
            parent: Some(pack),
            qualified_name: None,
            kind: DeclKind::Var(VarDecl {
                ty,
                init: None,
                mode: None,
            }),
        });

        assert_eq!(ast.decl_path(var, &interner), "Shapes.Area");
        assert_eq!(ast.root_of(var), pack);
    }
}
