// src/sema/passes/link_exprs.rs
//
// Expression linking: rewrites raw parsed expressions into resolved
// dot-op chains. A chain starts at a head node (variable access, array
// element, package reference or call) and extends through `tail` links,
// one per dotted member step. The head node's `ty` always carries the
// value type of the whole chain.
//
// Usage contracts are enforced here as well: assignment targets must be
// variables, `in` parameters are read-only, `out` parameters are
// write-only, and bare statements must be procedure calls.

use crate::errors::{Diag, SemanticError};
use crate::frontend::{
    AttrKind, BinOp, DeclId, DeclKind, ExprId, ExprKind, ParamMode, Primitive, Stmt, Symbol,
    TypeId, TypeKind, UnOp,
};
use crate::module::Program;
use crate::sema::passes::classes::{find_field, find_methods};
use crate::sema::passes::unit_decls;
use crate::sema::pipeline::Pass;
use crate::sema::{compat, reachable};

pub struct LinkExprs;

impl Pass for LinkExprs {
    fn name(&self) -> &'static str {
        "LinkExprs"
    }

    fn run(&mut self, program: &mut Program) -> Result<(), Diag> {
        enum Work {
            Init(ExprId),
            Body(Vec<Stmt>),
        }
        let mut work: Vec<(usize, DeclId, Work)> = Vec::new();
        for (midx, decl) in unit_decls(program) {
            match &program.ast.decl(decl).kind {
                DeclKind::Var(var) if var.mode.is_none() => {
                    if let Some(init) = var.init {
                        work.push((midx, decl, Work::Init(init)));
                    }
                }
                DeclKind::Subprogram(sp) => {
                    if let Some(body) = &sp.body {
                        if !body.is_empty() {
                            work.push((midx, decl, Work::Body(body.clone())));
                        }
                    }
                }
                _ => {}
            }
        }
        for (midx, requester, item) in work {
            let mut linker = Linker {
                program,
                module: midx,
                requester,
            };
            match item {
                Work::Init(init) => {
                    linker.resolve_expr(init)?;
                    linker.check_value_use(init)?;
                }
                Work::Body(body) => linker.resolve_stmts(&body)?,
            }
        }
        Ok(())
    }
}

struct Linker<'a> {
    program: &'a mut Program,
    module: usize,
    requester: DeclId,
}

impl Linker<'_> {
    fn fail(&self, error: SemanticError) -> Diag {
        self.program.diag(self.module, error)
    }

    fn resolve_stmts(&mut self, stmts: &[Stmt]) -> Result<(), Diag> {
        for stmt in stmts {
            match stmt {
                Stmt::Assign { target, value } => {
                    self.resolve_expr(*target)?;
                    self.check_assign_target(*target)?;
                    self.resolve_expr(*value)?;
                    self.check_value_use(*value)?;
                }
                Stmt::Call(call) => {
                    self.resolve_expr(*call)?;
                    self.check_statement_use(*call)?;
                }
                Stmt::If { arms, els } => {
                    for (cond, body) in arms {
                        self.resolve_expr(*cond)?;
                        self.check_value_use(*cond)?;
                        self.resolve_stmts(body)?;
                    }
                    self.resolve_stmts(els)?;
                }
                Stmt::While { cond, body } => {
                    self.resolve_expr(*cond)?;
                    self.check_value_use(*cond)?;
                    self.resolve_stmts(body)?;
                }
                Stmt::For { from, to, body, .. } => {
                    self.resolve_expr(*from)?;
                    self.check_value_use(*from)?;
                    self.resolve_expr(*to)?;
                    self.check_value_use(*to)?;
                    self.resolve_stmts(body)?;
                }
                Stmt::Return(Some(value)) => {
                    self.resolve_expr(*value)?;
                    self.check_value_use(*value)?;
                }
                Stmt::Return(None) => {}
            }
        }
        Ok(())
    }

    fn resolve_expr(&mut self, id: ExprId) -> Result<(), Diag> {
        let kind = self.program.ast.expr(id).kind.clone();
        match kind {
            ExprKind::IntLit(_) => self.set_prim(id, Primitive::Integer),
            ExprKind::FloatLit(_) => self.set_prim(id, Primitive::Float),
            ExprKind::BoolLit(_) => self.set_prim(id, Primitive::Boolean),
            ExprKind::CharLit(_) => self.set_prim(id, Primitive::Character),
            ExprKind::StrLit(text) => {
                let ty = self.program.ast.alloc_type(TypeKind::BoundedString {
                    range: (1, text.len() as i64),
                });
                self.program.ast.expr_mut(id).ty = Some(ty);
                Ok(())
            }
            ExprKind::Unary {
                op: UnOp::Neg,
                operand,
            } => {
                self.resolve_expr(operand)?;
                self.check_value_use(operand)?;
                let ty = self.value_type(operand)?;
                match compat::prim_of(&self.program.ast, ty) {
                    Some(Primitive::Integer) | Some(Primitive::Float) => {
                        self.program.ast.expr_mut(id).ty = Some(ty);
                        Ok(())
                    }
                    _ => Err(self.fail(SemanticError::TypeMismatch {
                        expected: "Integer or Float".to_string(),
                        found: self.type_name(ty),
                    })),
                }
            }
            ExprKind::Binary { op, lhs, rhs } => self.resolve_binary(id, op, lhs, rhs),
            ExprKind::Name(name) => self.resolve_path(id, &name, None),
            ExprKind::CallOrIndex { name, args } => {
                for &arg in &args {
                    self.resolve_expr(arg)?;
                }
                self.resolve_path(id, &name, Some(args))
            }
            ExprKind::Attribute { attr, args, .. } => self.resolve_attribute(id, attr, args),
            ExprKind::MemberAccess { lhs, rhs } => self.resolve_member(id, lhs, rhs),
            _ => panic!("expression linked twice"),
        }
    }

    fn set_prim(&mut self, id: ExprId, prim: Primitive) -> Result<(), Diag> {
        let ty = self.program.ast.primitive(prim);
        self.program.ast.expr_mut(id).ty = Some(ty);
        Ok(())
    }

    fn type_name(&self, ty: TypeId) -> String {
        compat::display(&self.program.ast, &self.program.interner, ty)
    }

    /// The chain value type; `None` means the node yields no value.
    fn value_type(&self, id: ExprId) -> Result<TypeId, Diag> {
        self.program.ast.expr(id).ty.ok_or_else(|| {
            self.fail(SemanticError::NotAValue {
                name: self.node_name(self.chain_final(id)),
            })
        })
    }

    fn resolve_binary(&mut self, id: ExprId, op: BinOp, lhs: ExprId, rhs: ExprId) -> Result<(), Diag> {
        self.resolve_expr(lhs)?;
        self.check_value_use(lhs)?;
        self.resolve_expr(rhs)?;
        self.check_value_use(rhs)?;
        let lt = self.value_type(lhs)?;
        let rt = self.value_type(rhs)?;

        let equal = compat::types_equal(&self.program.ast, lt, rt);
        let prim = compat::prim_of(&self.program.ast, lt);
        let numeric = matches!(prim, Some(Primitive::Integer) | Some(Primitive::Float));
        let ordered = numeric || prim == Some(Primitive::Character);
        let strings =
            compat::is_string(&self.program.ast, lt) && compat::is_string(&self.program.ast, rt);
        let boolean = self.program.ast.primitive(Primitive::Boolean);
        let result = match op {
            BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div if equal && numeric => Some(lt),
            BinOp::Mod if equal && prim == Some(Primitive::Integer) => Some(lt),
            BinOp::Concat if strings => Some(lt),
            BinOp::Eq | BinOp::Neq if equal => Some(boolean),
            BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge if equal && ordered => Some(boolean),
            _ => None,
        };
        let Some(ty) = result else {
            return Err(self.fail(SemanticError::OperandTypeMismatch {
                op: op.display().to_string(),
                lhs: self.type_name(lt),
                rhs: self.type_name(rt),
            }));
        };
        self.program.ast.expr_mut(id).ty = Some(ty);
        Ok(())
    }

    /// `'Image` is the one attribute: one scalar argument, string result.
    fn resolve_attribute(&mut self, id: ExprId, attr: Symbol, args: Vec<ExprId>) -> Result<(), Diag> {
        let name = self.program.interner.resolve(attr).to_string();
        if name != "Image" {
            return Err(self.fail(SemanticError::UnknownAttribute { name }));
        }
        for &arg in &args {
            self.resolve_expr(arg)?;
            self.check_value_use(arg)?;
        }
        let scalar = match args.as_slice() {
            [arg] => {
                let ty = self.value_type(*arg)?;
                compat::prim_of(&self.program.ast, ty).is_some()
            }
            _ => false,
        };
        if !scalar {
            return Err(self.fail(SemanticError::NoMatchingSubprogram {
                name: "'Image".to_string(),
            }));
        }
        let ty = self
            .program
            .ast
            .alloc_type(TypeKind::BoundedString { range: (1, 0) });
        let expr = self.program.ast.expr_mut(id);
        expr.kind = ExprKind::AttrCall {
            attr: AttrKind::Image,
            args,
        };
        expr.ty = Some(ty);
        Ok(())
    }

    /// Resolves a dotted raw name: the first component by scope search,
    /// the rest as member steps extending the chain.
    fn resolve_path(
        &mut self,
        id: ExprId,
        name: &[Symbol],
        args: Option<Vec<ExprId>>,
    ) -> Result<(), Diag> {
        if let [single] = name {
            return self.resolve_head(id, *single, args);
        }
        self.resolve_head(id, name[0], None)?;
        for &comp in &name[1..name.len() - 1] {
            self.member_step(id, comp, None, None)?;
        }
        self.member_step(id, *name.last().unwrap(), args, None)
    }

    /// Resolves the first chain component against the visible scopes.
    /// The innermost group decides the kind; shadowing is absolute.
    fn resolve_head(&mut self, id: ExprId, sym: Symbol, args: Option<Vec<ExprId>>) -> Result<(), Diag> {
        let display = self.program.interner.resolve(sym).to_string();
        let groups = reachable(self.program, &[sym], self.requester);
        let Some(first) = groups.first() else {
            return Err(self.fail(SemanticError::UnresolvedName { name: display }));
        };

        if self.program.ast.decl(first[0]).is_subprogram() {
            // The overload set spans every visible scope level.
            let mut cands: Vec<DeclId> = Vec::new();
            for decl in groups.iter().flatten() {
                if self.program.ast.decl(*decl).is_subprogram() && !cands.contains(decl) {
                    cands.push(*decl);
                }
            }
            let args = args.unwrap_or_default();
            let decl = self.select_overload(&display, &cands, &args, None)?;
            tracing::trace!(callee = %self.program.ast.decl_path(decl, &self.program.interner), "resolved call");
            self.check_call_modes(&display, &self.call_params(decl), &args)?;
            let ty = self.program.ast.decl(decl).subprogram().return_type;
            let expr = self.program.ast.expr_mut(id);
            expr.kind = ExprKind::CallSubprog { decl, args };
            expr.ty = ty;
            return Ok(());
        }

        let decl = if first.len() == 1 {
            first[0]
        } else {
            // A package declaration paired with its body is the one
            // multi-candidate group left; the declaration carries the
            // visible members. Anything else is a genuine ambiguity.
            *first
                .iter()
                .find(|&&d| matches!(&self.program.ast.decl(d).kind, DeclKind::Package(p) if !p.is_body))
                .ok_or_else(|| self.fail(SemanticError::AmbiguousName { name: display.clone() }))?
        };
        let (kind, ty) = self.access_decl(&display, decl, args)?;
        let expr = self.program.ast.expr_mut(id);
        expr.kind = kind;
        expr.ty = ty;
        Ok(())
    }

    /// A non-subprogram head or package member: variable access, array
    /// indexing or a package reference.
    fn access_decl(
        &mut self,
        display: &str,
        decl: DeclId,
        args: Option<Vec<ExprId>>,
    ) -> Result<(ExprKind, Option<TypeId>), Diag> {
        match &self.program.ast.decl(decl).kind {
            DeclKind::Var(var) => {
                let var_ty = var.ty;
                match args {
                    None => Ok((ExprKind::VarAccess { decl, tail: None }, Some(var_ty))),
                    Some(indices) => {
                        let (kind, elem) = self.index_access(display, decl, var_ty, indices)?;
                        Ok((kind, Some(elem)))
                    }
                }
            }
            DeclKind::Package(_) => match args {
                None => Ok((ExprKind::PackageRef { decl, tail: None }, None)),
                Some(_) => Err(self.fail(SemanticError::InvalidIndexing {
                    name: display.to_string(),
                })),
            },
            DeclKind::Record(_) | DeclKind::Alias(_) => {
                Err(self.fail(SemanticError::NotAValue {
                    name: display.to_string(),
                }))
            }
            other => panic!("unexpected declaration in scope: {other:?}"),
        }
    }

    fn index_access(
        &mut self,
        display: &str,
        decl: DeclId,
        var_ty: TypeId,
        indices: Vec<ExprId>,
    ) -> Result<(ExprKind, TypeId), Diag> {
        let canon = compat::canonical(&self.program.ast, var_ty);
        let TypeKind::Array { ranges, elem } = self.program.ast.type_kind(canon).clone() else {
            return Err(self.fail(SemanticError::InvalidIndexing {
                name: display.to_string(),
            }));
        };
        if indices.len() != ranges.len() {
            return Err(self.fail(SemanticError::InvalidIndexing {
                name: display.to_string(),
            }));
        }
        for &index in &indices {
            self.check_value_use(index)?;
            let ty = self.value_type(index)?;
            if compat::prim_of(&self.program.ast, ty) != Some(Primitive::Integer) {
                return Err(self.fail(SemanticError::InvalidIndexing {
                    name: display.to_string(),
                }));
            }
        }
        Ok((
            ExprKind::ArrayElem {
                decl,
                indices,
                tail: None,
            },
            elem,
        ))
    }

    /// One dotted step: looks `part` up inside the chain's final node
    /// (a package or a record value), appends the resolved node as its
    /// tail and updates the head's value type. `reuse` recycles an
    /// existing raw node instead of allocating.
    fn member_step(
        &mut self,
        chain: ExprId,
        part: Symbol,
        args: Option<Vec<ExprId>>,
        reuse: Option<ExprId>,
    ) -> Result<(), Diag> {
        let part_name = self.program.interner.resolve(part).to_string();
        let final_id = self.chain_final(chain);
        let (kind, ty) = match self.program.ast.expr(final_id).kind.clone() {
            ExprKind::PackageRef { decl, .. } => {
                self.package_member(&part_name, decl, part, args)?
            }
            ExprKind::VarAccess { .. } | ExprKind::ArrayElem { .. } => {
                let value_ty = self
                    .program
                    .ast
                    .expr(final_id)
                    .ty
                    .unwrap_or_else(|| panic!("chain node without a value type"));
                // Only tagged-record values are containers; plain
                // records cannot be dotted into.
                let Some(rec) = compat::tagged_record_of(&self.program.ast, value_ty) else {
                    return Err(self.fail(SemanticError::InvalidQualifier));
                };
                self.record_member(&part_name, chain, rec, value_ty, part, args)?
            }
            _ => return Err(self.fail(SemanticError::InvalidQualifier)),
        };

        let node = match reuse {
            Some(node) => {
                let expr = self.program.ast.expr_mut(node);
                expr.kind = kind;
                expr.ty = ty;
                node
            }
            None => {
                let node = self.program.ast.alloc_expr(kind);
                self.program.ast.expr_mut(node).ty = ty;
                node
            }
        };
        match &mut self.program.ast.expr_mut(final_id).kind {
            ExprKind::VarAccess { tail, .. }
            | ExprKind::ArrayElem { tail, .. }
            | ExprKind::PackageRef { tail, .. } => *tail = Some(node),
            _ => unreachable!(),
        }
        // The head always reports the chain's value type.
        self.program.ast.expr_mut(chain).ty = ty;
        Ok(())
    }

    fn package_member(
        &mut self,
        part_name: &str,
        package: DeclId,
        part: Symbol,
        args: Option<Vec<ExprId>>,
    ) -> Result<(ExprKind, Option<TypeId>), Diag> {
        let named: Vec<DeclId> = crate::sema::scope::package_members(&self.program.ast, package)
            .into_iter()
            .filter(|&d| self.program.ast.decl(d).name == part)
            .collect();
        if named.is_empty() {
            return Err(self.fail(SemanticError::UnknownMember {
                name: part_name.to_string(),
                container: self.program.ast.decl_path(package, &self.program.interner),
            }));
        }
        if named.iter().all(|&d| self.program.ast.decl(d).is_subprogram()) {
            let args = args.unwrap_or_default();
            let decl = self.select_overload(part_name, &named, &args, None)?;
            self.check_call_modes(part_name, &self.call_params(decl), &args)?;
            let ty = self.program.ast.decl(decl).subprogram().return_type;
            return Ok((ExprKind::CallSubprog { decl, args }, ty));
        }
        self.access_decl(part_name, named[0], args)
    }

    fn record_member(
        &mut self,
        part_name: &str,
        chain: ExprId,
        rec: DeclId,
        receiver_ty: TypeId,
        part: Symbol,
        args: Option<Vec<ExprId>>,
    ) -> Result<(ExprKind, Option<TypeId>), Diag> {
        let field = find_field(&self.program.ast, rec, part);
        let methods = match self.program.ast.decl(rec).record().class {
            Some(class) => find_methods(&self.program.ast, class, part),
            None => Vec::new(),
        };
        if field.is_some() && !methods.is_empty() {
            return Err(self.fail(SemanticError::AmbiguousMember {
                name: part_name.to_string(),
            }));
        }
        if let Some(field) = field {
            return self.access_decl(part_name, field, args);
        }
        if methods.is_empty() {
            return Err(self.fail(SemanticError::UnknownMember {
                name: part_name.to_string(),
                container: self.program.ast.decl_path(rec, &self.program.interner),
            }));
        }

        let args = args.unwrap_or_default();
        let method = self.select_overload(part_name, &methods, &args, Some(receiver_ty))?;
        let params = self.call_params(method);
        // The receiver binds the first parameter; honor its mode.
        match self.program.ast.decl(params[0]).var().mode.unwrap_or(ParamMode::In) {
            ParamMode::In => self.check_out_reads(chain)?,
            ParamMode::Out | ParamMode::InOut => self.check_writable_head(chain)?,
        }
        self.check_call_modes(part_name, &params[1..], &args)?;
        let ty = self.program.ast.decl(method).subprogram().return_type;
        Ok((ExprKind::MethodCall { method, args }, ty))
    }

    /// Picks one candidate by argument types: exact matches outrank
    /// class-compatible ones; a tie within the winning rank is an
    /// ambiguity. `receiver` prepends an implicit first argument.
    fn select_overload(
        &self,
        name: &str,
        cands: &[DeclId],
        args: &[ExprId],
        receiver: Option<TypeId>,
    ) -> Result<DeclId, Diag> {
        let mut arg_tys: Vec<TypeId> = Vec::with_capacity(args.len() + 1);
        if let Some(receiver_ty) = receiver {
            arg_tys.push(receiver_ty);
        }
        for &arg in args {
            arg_tys.push(self.value_type(arg)?);
        }

        let ast = &self.program.ast;
        // A body with a separate declaration is represented by that
        // declaration; drop it so a visible spec/body pair is one
        // candidate.
        let cands: Vec<DeclId> = cands
            .iter()
            .copied()
            .filter(|&decl| {
                let sp = ast.decl(decl).subprogram();
                sp.body.is_none() || sp.linked.is_none()
            })
            .collect();
        let has_receiver = receiver.is_some();
        let rank = |decl: DeclId, exact: bool| -> bool {
            let sp = ast.decl(decl).subprogram();
            sp.params.len() == arg_tys.len()
                && sp
                    .params
                    .iter()
                    .zip(&arg_tys)
                    .enumerate()
                    .all(|(pos, (&param, &arg))| {
                        let pt = ast.decl(param).var().ty;
                        if exact {
                            compat::types_equal(ast, pt, arg)
                        } else if pos == 0 && has_receiver {
                            compat::receiver_accepts(ast, pt, arg)
                        } else {
                            compat::param_accepts(ast, pt, arg)
                        }
                    })
        };
        for exact in [true, false] {
            let fits: Vec<DeclId> = cands.iter().copied().filter(|&d| rank(d, exact)).collect();
            match fits.as_slice() {
                [] => continue,
                [decl] => return Ok(*decl),
                _ => {
                    return Err(self.fail(SemanticError::AmbiguousCall {
                        name: name.to_string(),
                    }))
                }
            }
        }
        Err(self.fail(SemanticError::NoMatchingSubprogram {
            name: name.to_string(),
        }))
    }

    fn call_params(&self, decl: DeclId) -> Vec<DeclId> {
        self.program.ast.decl(decl).subprogram().params.clone()
    }

    /// Argument/parameter mode contract: `in` arguments are reads, `out`
    /// and `in out` arguments must be writable variables.
    fn check_call_modes(
        &self,
        callee: &str,
        params: &[DeclId],
        args: &[ExprId],
    ) -> Result<(), Diag> {
        for (&param, &arg) in params.iter().zip(args) {
            match self.program.ast.decl(param).var().mode.unwrap_or(ParamMode::In) {
                ParamMode::In => self.check_out_reads(arg)?,
                ParamMode::Out | ParamMode::InOut => {
                    let final_id = self.chain_final(arg);
                    if !matches!(
                        self.program.ast.expr(final_id).kind,
                        ExprKind::VarAccess { .. } | ExprKind::ArrayElem { .. }
                    ) {
                        return Err(self.fail(SemanticError::ArgumentNotVariable {
                            name: callee.to_string(),
                        }));
                    }
                    self.check_writable_head(arg)?;
                }
            }
        }
        Ok(())
    }

    /// A value use: the chain must yield a value and may not read an
    /// `out` parameter.
    fn check_value_use(&self, id: ExprId) -> Result<(), Diag> {
        if self.program.ast.expr(id).ty.is_none() {
            return Err(self.fail(SemanticError::NotAValue {
                name: self.node_name(self.chain_final(id)),
            }));
        }
        self.check_out_reads(id)
    }

    fn check_out_reads(&self, id: ExprId) -> Result<(), Diag> {
        let mut cur = Some(id);
        while let Some(node) = cur {
            cur = match &self.program.ast.expr(node).kind {
                ExprKind::VarAccess { decl, tail } | ExprKind::ArrayElem { decl, tail, .. } => {
                    if self.program.ast.decl(*decl).var().mode == Some(ParamMode::Out) {
                        return Err(self.fail(SemanticError::ReadOfOutParameter {
                            name: self
                                .program
                                .interner
                                .resolve(self.program.ast.decl(*decl).name)
                                .to_string(),
                        }));
                    }
                    *tail
                }
                ExprKind::PackageRef { tail, .. } => *tail,
                _ => None,
            };
        }
        Ok(())
    }

    /// An assignment target must end in a variable or array element, and
    /// the chain head may not be an `in` parameter.
    fn check_assign_target(&self, id: ExprId) -> Result<(), Diag> {
        let final_id = self.chain_final(id);
        if !matches!(
            self.program.ast.expr(final_id).kind,
            ExprKind::VarAccess { .. } | ExprKind::ArrayElem { .. }
        ) {
            return Err(self.fail(SemanticError::InvalidAssignmentTarget));
        }
        self.check_writable_head(id)
    }

    fn check_writable_head(&self, id: ExprId) -> Result<(), Diag> {
        if let ExprKind::VarAccess { decl, .. } | ExprKind::ArrayElem { decl, .. } =
            &self.program.ast.expr(id).kind
        {
            if self.program.ast.decl(*decl).var().mode == Some(ParamMode::In) {
                return Err(self.fail(SemanticError::AssignToInParameter {
                    name: self
                        .program
                        .interner
                        .resolve(self.program.ast.decl(*decl).name)
                        .to_string(),
                }));
            }
        }
        Ok(())
    }

    /// A bare statement must be a procedure call.
    fn check_statement_use(&self, id: ExprId) -> Result<(), Diag> {
        let final_id = self.chain_final(id);
        match &self.program.ast.expr(final_id).kind {
            ExprKind::CallSubprog { decl, .. } => {
                if self.program.ast.decl(*decl).subprogram().is_function {
                    Err(self.fail(SemanticError::FunctionCallAsStatement {
                        name: self.node_name(final_id),
                    }))
                } else {
                    Ok(())
                }
            }
            ExprKind::MethodCall { method, .. } => {
                if self.program.ast.decl(*method).subprogram().is_function {
                    Err(self.fail(SemanticError::FunctionCallAsStatement {
                        name: self.node_name(final_id),
                    }))
                } else {
                    Ok(())
                }
            }
            _ => Err(self.fail(SemanticError::ValueAsStatement {
                name: self.node_name(final_id),
            })),
        }
    }

    /// A member access desugars into member steps on the resolved
    /// prefix; the raw rhs node is recycled as the appended chain node.
    fn resolve_member(&mut self, id: ExprId, lhs: ExprId, rhs: ExprId) -> Result<(), Diag> {
        self.resolve_expr(lhs)?;
        let (parts, args) = match self.program.ast.expr(rhs).kind.clone() {
            ExprKind::Name(name) => (name, None),
            ExprKind::CallOrIndex { name, args } => {
                for &arg in &args {
                    self.resolve_expr(arg)?;
                }
                (name, Some(args))
            }
            _ => return Err(self.fail(SemanticError::InvalidQualifier)),
        };
        for &comp in &parts[..parts.len() - 1] {
            self.member_step(lhs, comp, None, None)?;
        }
        self.member_step(lhs, *parts.last().unwrap(), args, Some(rhs))?;
        // The access node itself becomes the chain head.
        let head = self.program.ast.expr(lhs).clone();
        *self.program.ast.expr_mut(id) = head;
        Ok(())
    }

    fn chain_final(&self, id: ExprId) -> ExprId {
        let mut cur = id;
        loop {
            let next = match &self.program.ast.expr(cur).kind {
                ExprKind::VarAccess { tail, .. }
                | ExprKind::ArrayElem { tail, .. }
                | ExprKind::PackageRef { tail, .. } => *tail,
                _ => None,
            };
            match next {
                Some(node) => cur = node,
                None => return cur,
            }
        }
    }

    fn node_name(&self, id: ExprId) -> String {
        let decl = match &self.program.ast.expr(id).kind {
            ExprKind::VarAccess { decl, .. }
            | ExprKind::ArrayElem { decl, .. }
            | ExprKind::CallSubprog { decl, .. }
            | ExprKind::PackageRef { decl, .. } => *decl,
            ExprKind::MethodCall { method, .. } => *method,
            ExprKind::AttrCall { .. } => return "'Image".to_string(),
            _ => return "expression".to_string(),
        };
        self.program
            .interner
            .resolve(self.program.ast.decl(decl).name)
            .to_string()
    }
}
