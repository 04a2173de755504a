// src/sema/passes/type_check.rs
//
// Statement-level type checking over fully linked bodies. Every
// expression carries its value type by now, so this pass only compares.

use crate::errors::{Diag, SemanticError};
use crate::frontend::{DeclKind, ExprId, Primitive, Stmt, TypeId};
use crate::module::Program;
use crate::sema::compat;
use crate::sema::passes::unit_decls;
use crate::sema::pipeline::Pass;

pub struct TypeCheck;

impl Pass for TypeCheck {
    fn name(&self) -> &'static str {
        "TypeCheck"
    }

    fn run(&mut self, program: &mut Program) -> Result<(), Diag> {
        for (midx, decl) in unit_decls(program) {
            match &program.ast.decl(decl).kind {
                DeclKind::Var(var) if var.mode.is_none() => {
                    if let Some(init) = var.init {
                        let found = value_of(program, init);
                        if !compat::assignable(&program.ast, var.ty, found) {
                            return Err(program.diag(
                                midx,
                                SemanticError::TypeMismatch {
                                    expected: ty_name(program, var.ty),
                                    found: ty_name(program, found),
                                },
                            ));
                        }
                    }
                }
                DeclKind::Subprogram(sp) => {
                    if let Some(body) = &sp.body {
                        check_stmts(program, midx, body, sp.is_function, sp.return_type)?;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}

fn check_stmts(
    program: &Program,
    midx: usize,
    stmts: &[Stmt],
    is_function: bool,
    ret: Option<TypeId>,
) -> Result<(), Diag> {
    for stmt in stmts {
        match stmt {
            Stmt::Assign { target, value } => {
                let to = value_of(program, *target);
                let from = value_of(program, *value);
                if !compat::assignable(&program.ast, to, from) {
                    return Err(program.diag(
                        midx,
                        SemanticError::TypeMismatch {
                            expected: ty_name(program, to),
                            found: ty_name(program, from),
                        },
                    ));
                }
            }
            Stmt::Call(_) => {}
            Stmt::If { arms, els } => {
                for (cond, body) in arms {
                    check_bool(program, midx, *cond)?;
                    check_stmts(program, midx, body, is_function, ret)?;
                }
                check_stmts(program, midx, els, is_function, ret)?;
            }
            Stmt::While { cond, body } => {
                check_bool(program, midx, *cond)?;
                check_stmts(program, midx, body, is_function, ret)?;
            }
            Stmt::For { from, to, body, .. } => {
                for &bound in [from, to] {
                    let ty = value_of(program, bound);
                    if compat::prim_of(&program.ast, ty) != Some(Primitive::Integer) {
                        return Err(program.diag(
                            midx,
                            SemanticError::LoopBoundNotInteger {
                                found: ty_name(program, ty),
                            },
                        ));
                    }
                }
                check_stmts(program, midx, body, is_function, ret)?;
            }
            Stmt::Return(Some(value)) => {
                if !is_function {
                    return Err(program.diag(midx, SemanticError::ReturnValueInProcedure));
                }
                let expected =
                    ret.unwrap_or_else(|| panic!("function declared without a return type"));
                let found = value_of(program, *value);
                if !compat::assignable(&program.ast, expected, found) {
                    return Err(program.diag(
                        midx,
                        SemanticError::ReturnTypeMismatch {
                            expected: ty_name(program, expected),
                            found: ty_name(program, found),
                        },
                    ));
                }
            }
            Stmt::Return(None) => {
                if is_function {
                    return Err(program.diag(midx, SemanticError::MissingReturnValue));
                }
            }
        }
    }
    Ok(())
}

fn check_bool(program: &Program, midx: usize, cond: ExprId) -> Result<(), Diag> {
    let ty = value_of(program, cond);
    if compat::prim_of(&program.ast, ty) != Some(Primitive::Boolean) {
        return Err(program.diag(
            midx,
            SemanticError::ConditionNotBoolean {
                found: ty_name(program, ty),
            },
        ));
    }
    Ok(())
}

fn value_of(program: &Program, expr: ExprId) -> TypeId {
    program
        .ast
        .expr(expr)
        .ty
        .unwrap_or_else(|| panic!("expression reached TypeCheck without a value type"))
}

fn ty_name(program: &Program, ty: TypeId) -> String {
    compat::display(&program.ast, &program.interner, ty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::{BinOp, ProgramBuilder};
    use crate::sema::analyze;

    #[test]
    fn initializer_must_match_the_variable_type() {
        let mut b = ProgramBuilder::new();
        let int = b.integer();
        let half = b.float_lit(0.5);
        let x = b.var_init("X", int, half);
        let main = b.procedure("Main", vec![], vec![x], vec![]);
        b.module("Main", "main.adb", main, &[], &[]);
        let mut program = b.finish();

        let err = analyze(&mut program).unwrap_err();
        assert!(matches!(err.error, SemanticError::TypeMismatch { .. }));
    }

    #[test]
    fn condition_must_be_boolean() {
        let mut b = ProgramBuilder::new();
        let one = b.int(1);
        let ret = Stmt::Return(None);
        let main = b.procedure(
            "Main",
            vec![],
            vec![],
            vec![Stmt::If {
                arms: vec![(one, vec![ret])],
                els: vec![],
            }],
        );
        b.module("Main", "main.adb", main, &[], &[]);
        let mut program = b.finish();

        let err = analyze(&mut program).unwrap_err();
        assert!(matches!(err.error, SemanticError::ConditionNotBoolean { .. }));
    }

    #[test]
    fn comparison_yields_boolean() {
        let mut b = ProgramBuilder::new();
        let a = b.int(1);
        let c = b.int(2);
        let cond = b.binary(BinOp::Lt, a, c);
        let main = b.procedure(
            "Main",
            vec![],
            vec![],
            vec![Stmt::While {
                cond,
                body: vec![],
            }],
        );
        b.module("Main", "main.adb", main, &[], &[]);
        let mut program = b.finish();

        analyze(&mut program).unwrap();
    }

    #[test]
    fn for_loop_over_integer_bounds_links() {
        let mut b = ProgramBuilder::new();
        let int = b.integer();
        let x = b.var("X", int);
        let i = b.loop_var("I");
        let target = b.name_expr("X");
        let i_ref = b.name_expr("I");
        let from = b.int(1);
        let to = b.int(10);
        let main = b.procedure(
            "Main",
            vec![],
            vec![x, i],
            vec![Stmt::For {
                var: i,
                from,
                to,
                body: vec![Stmt::Assign {
                    target,
                    value: i_ref,
                }],
            }],
        );
        b.module("Main", "main.adb", main, &[], &[]);
        let mut program = b.finish();

        analyze(&mut program).unwrap();
    }

    #[test]
    fn loop_bounds_must_be_integer() {
        let mut b = ProgramBuilder::new();
        let i = b.loop_var("I");
        let from = b.float_lit(0.5);
        let to = b.int(10);
        let main = b.procedure(
            "Main",
            vec![],
            vec![i],
            vec![Stmt::For {
                var: i,
                from,
                to,
                body: vec![],
            }],
        );
        b.module("Main", "main.adb", main, &[], &[]);
        let mut program = b.finish();

        let err = analyze(&mut program).unwrap_err();
        assert!(matches!(err.error, SemanticError::LoopBoundNotInteger { .. }));
    }

    #[test]
    fn procedure_cannot_return_a_value() {
        let mut b = ProgramBuilder::new();
        let one = b.int(1);
        let main = b.procedure("Main", vec![], vec![], vec![Stmt::Return(Some(one))]);
        b.module("Main", "main.adb", main, &[], &[]);
        let mut program = b.finish();

        let err = analyze(&mut program).unwrap_err();
        assert_eq!(err.error, SemanticError::ReturnValueInProcedure);
    }

    #[test]
    fn function_return_must_match() {
        let mut b = ProgramBuilder::new();
        let int = b.integer();
        let text = b.str_lit("nope");
        let f = b.function("Answer", vec![], int, vec![], vec![Stmt::Return(Some(text))]);
        let main = b.procedure("Main", vec![], vec![f], vec![]);
        b.module("Main", "main.adb", main, &[], &[]);
        let mut program = b.finish();

        let err = analyze(&mut program).unwrap_err();
        assert!(matches!(err.error, SemanticError::ReturnTypeMismatch { .. }));
    }
}
