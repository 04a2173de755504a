// tests/pipeline.rs
//! Full-pipeline runs over multi-module programs: declaration and body
//! files, imports, inheritance, dispatch and the standard-library IO
//! package together.

use adamite::errors::SemanticError;
use adamite::frontend::{
    BinOp, DeclId, ExprId, ExprKind, ParamMode, ProgramBuilder, Stmt,
};
use adamite::module::Program;
use adamite::sema::analyze;

struct Geometry {
    program: Program,
    move_spec: DeclId,
    move_body: DeclId,
    area_spec: DeclId,
    move_stmt: ExprId,
    area_arg: ExprId,
}

/// Three files: `geo.ads` declares tagged records `Shape` and `Circle`
/// with subprogram specs, `geo.adb` supplies the bodies, `main.adb`
/// dispatches on a `Circle` and prints through `Ada.Text_IO`.
fn build_geometry() -> Geometry {
    let mut b = ProgramBuilder::new();
    let int = b.integer();

    // geo.ads
    let x = b.var("X", int);
    let y = b.var("Y", int);
    let shape = b.record("Shape", true, None, vec![x, y]);
    let r = b.var("R", int);
    let circle = b.record("Circle", true, Some("Shape"), vec![r]);

    let shape_ty = b.named_ty("Shape");
    let s = b.param("S", ParamMode::InOut, shape_ty);
    let dx = b.param("DX", ParamMode::In, int);
    let move_spec = b.proc_decl("Move", vec![s, dx]);

    let circle_ty = b.named_ty("Circle");
    let c = b.param("C", ParamMode::In, circle_ty);
    let area_spec = b.func_decl("Area", vec![c], int);

    let geo = b.package("Geo", vec![shape, circle, move_spec, area_spec]);

    // geo.adb: Move sets S.X := S.X + DX, Area returns C.R * C.R.
    let shape_ty2 = b.named_ty("Shape");
    let s2 = b.param("S", ParamMode::InOut, shape_ty2);
    let dx2 = b.param("DX", ParamMode::In, int);
    let s_ref = b.name_expr("S");
    let x_ref = b.name_expr("X");
    let target = b.member(s_ref, x_ref);
    let s_ref2 = b.name_expr("S");
    let x_ref2 = b.name_expr("X");
    let s_x = b.member(s_ref2, x_ref2);
    let dx_ref = b.name_expr("DX");
    let sum = b.binary(BinOp::Add, s_x, dx_ref);
    let move_body = b.procedure(
        "Move",
        vec![s2, dx2],
        vec![],
        vec![Stmt::Assign { target, value: sum }],
    );

    let circle_ty2 = b.named_ty("Circle");
    let c2 = b.param("C", ParamMode::In, circle_ty2);
    let c_ref = b.name_expr("C");
    let r_ref = b.name_expr("R");
    let c_r = b.member(c_ref, r_ref);
    let c_ref2 = b.name_expr("C");
    let r_ref2 = b.name_expr("R");
    let c_r2 = b.member(c_ref2, r_ref2);
    let product = b.binary(BinOp::Mul, c_r, c_r2);
    let area_body = b.function(
        "Area",
        vec![c2],
        int,
        vec![],
        vec![Stmt::Return(Some(product))],
    );

    let geo_body = b.package_body("Geo", vec![move_body, area_body]);

    // main.adb: C.Move (3); Put (C.Area);
    let c_ty = b.named_ty("Geo.Circle");
    let c_var = b.var("C", c_ty);
    let three = b.int(3);
    let move_call = b.call("Move", vec![three]);
    let recv = b.name_expr("C");
    let move_stmt = b.member(recv, move_call);
    let area_call = b.call("Area", vec![]);
    let recv2 = b.name_expr("C");
    let area_arg = b.member(recv2, area_call);
    let put = b.call("Put", vec![area_arg]);
    let main = b.procedure(
        "Main",
        vec![],
        vec![c_var],
        vec![Stmt::Call(move_stmt), Stmt::Call(put)],
    );

    b.module("Main", "main.adb", main, &["Geo", "Ada.Text_IO"], &["Ada.Text_IO"]);
    b.module("Geo", "geo.ads", geo, &[], &[]);
    b.module("Geo", "geo.adb", geo_body, &[], &[]);

    Geometry {
        program: b.finish(),
        move_spec,
        move_body,
        area_spec,
        move_stmt,
        area_arg,
    }
}

#[test]
fn geometry_round_trip() {
    let mut g = build_geometry();
    analyze(&mut g.program).unwrap();
    let ast = &g.program.ast;

    // The spec got its body linked, both ways.
    assert_eq!(ast.decl(g.move_spec).subprogram().linked, Some(g.move_body));
    assert_eq!(ast.decl(g.move_body).subprogram().linked, Some(g.move_spec));

    // C.Move (3) dispatches through the inherited Shape method.
    let ExprKind::VarAccess { tail: Some(tail), .. } = ast.expr(g.move_stmt).kind else {
        panic!("receiver did not resolve to a variable access");
    };
    assert!(matches!(
        ast.expr(tail).kind,
        ExprKind::MethodCall { method, .. } if method == g.move_spec
    ));

    // C.Area resolves to the declared function and carries its type.
    let ExprKind::VarAccess { tail: Some(tail), .. } = ast.expr(g.area_arg).kind else {
        panic!("receiver did not resolve to a variable access");
    };
    assert!(matches!(
        ast.expr(tail).kind,
        ExprKind::MethodCall { method, .. } if method == g.area_spec
    ));
    assert!(ast.expr(g.area_arg).ty.is_some());

    // Qualified names are stamped on every declaration.
    assert_eq!(
        ast.decl(g.move_spec).qualified_name.as_deref(),
        Some("Geo.Move")
    );
}

#[test]
fn full_pipeline_is_deterministic() {
    let mut first = build_geometry();
    let mut second = build_geometry();
    analyze(&mut first.program).unwrap();
    analyze(&mut second.program).unwrap();

    for decl in [first.move_spec, first.area_spec, first.move_body] {
        assert_eq!(
            first.program.ast.decl(decl).qualified_name,
            second.program.ast.decl(decl).qualified_name
        );
    }
    assert_eq!(
        format!("{:?}", first.program.ast.expr(first.move_stmt).kind),
        format!("{:?}", second.program.ast.expr(second.move_stmt).kind)
    );
}

#[test]
fn class_wide_parameter_accepts_derived_records() {
    let mut b = ProgramBuilder::new();
    let shape = b.record("Shape", true, None, vec![]);
    let circle = b.record("Circle", true, Some("Shape"), vec![]);
    let cw = b.class_wide_ty("Shape");
    let p = b.param("S", ParamMode::In, cw);
    let render = b.procedure("Render", vec![p], vec![], vec![]);
    let circle_ty = b.named_ty("Circle");
    let c = b.var("C", circle_ty);
    let arg = b.name_expr("C");
    let call = b.call("Render", vec![arg]);
    let main = b.procedure(
        "Main",
        vec![],
        vec![shape, circle, render, c],
        vec![Stmt::Call(call)],
    );
    b.module("Main", "main.adb", main, &[], &[]);
    let mut program = b.finish();

    analyze(&mut program).unwrap();
    assert!(matches!(
        program.ast.expr(call).kind,
        ExprKind::CallSubprog { decl, .. } if decl == render
    ));
}

#[test]
fn overlapping_class_wide_overloads_are_ambiguous() {
    let mut b = ProgramBuilder::new();
    let shape = b.record("Shape", true, None, vec![]);
    let circle = b.record("Circle", true, Some("Shape"), vec![]);
    let cw_shape = b.class_wide_ty("Shape");
    let p1 = b.param("S", ParamMode::In, cw_shape);
    let show1 = b.procedure("Show", vec![p1], vec![], vec![]);
    let cw_circle = b.class_wide_ty("Circle");
    let p2 = b.param("S", ParamMode::In, cw_circle);
    let show2 = b.procedure("Show", vec![p2], vec![], vec![]);
    let circle_ty = b.named_ty("Circle");
    let c = b.var("C", circle_ty);
    let arg = b.name_expr("C");
    let call = b.call("Show", vec![arg]);
    let main = b.procedure(
        "Main",
        vec![],
        vec![shape, circle, show1, show2, c],
        vec![Stmt::Call(call)],
    );
    b.module("Main", "main.adb", main, &[], &[]);
    let mut program = b.finish();

    let err = analyze(&mut program).unwrap_err();
    assert!(matches!(err.error, SemanticError::AmbiguousCall { .. }));
}

#[test]
fn declaration_order_gates_visibility() {
    let mut b = ProgramBuilder::new();
    let int = b.integer();
    let b_ref = b.name_expr("B");
    let a = b.var_init("A", int, b_ref);
    let z = b.var("B", int);
    let main = b.procedure("Main", vec![], vec![a, z], vec![]);
    b.module("Main", "main.adb", main, &[], &[]);
    let mut program = b.finish();

    let err = analyze(&mut program).unwrap_err();
    assert!(matches!(err.error, SemanticError::UnresolvedName { .. }));
}

#[test]
fn import_cycle_is_detected_end_to_end() {
    let mut b = ProgramBuilder::new();
    let main = b.procedure("Main", vec![], vec![], vec![]);
    let a = b.package("A", vec![]);
    let c = b.package("B", vec![]);
    b.module("Main", "main.adb", main, &["A"], &[]);
    b.module("A", "a.ads", a, &["B"], &[]);
    b.module("B", "b.ads", c, &["A"], &[]);
    let mut program = b.finish();

    let err = analyze(&mut program).unwrap_err();
    assert!(matches!(err.error, SemanticError::CircularImport { .. }));
}

#[test]
fn self_import_is_detected_end_to_end() {
    let mut b = ProgramBuilder::new();
    let main = b.procedure("Main", vec![], vec![], vec![]);
    b.module("Main", "main.adb", main, &["Main"], &[]);
    let mut program = b.finish();

    let err = analyze(&mut program).unwrap_err();
    assert!(matches!(err.error, SemanticError::SelfImport { .. }));
}

#[test]
fn entry_module_must_hold_a_procedure() {
    let mut b = ProgramBuilder::new();
    let pack = b.package("Util", vec![]);
    b.module("Util", "util.ads", pack, &[], &[]);
    let mut program = b.finish();

    let err = analyze(&mut program).unwrap_err();
    assert_eq!(err.error, SemanticError::EntryPointNotProcedure);
}

#[test]
fn hello_world_round_trip() {
    let mut b = ProgramBuilder::new();
    let int = b.integer();
    let forty_two = b.int(42);
    let n = b.var_init("N", int, forty_two);
    let n_ref = b.name_expr("N");
    let image = b.attr_expr("Integer", "Image", vec![n_ref]);
    let put_line = b.call("Put_Line", vec![image]);
    let new_line = b.call("New_Line", vec![]);
    let main = b.procedure(
        "Main",
        vec![],
        vec![n],
        vec![Stmt::Call(put_line), Stmt::Call(new_line)],
    );
    b.module("Main", "main.adb", main, &["Ada.Text_IO"], &["Ada.Text_IO"]);
    let mut program = b.finish();

    analyze(&mut program).unwrap();
    assert!(matches!(
        program.ast.expr(put_line).kind,
        ExprKind::CallSubprog { .. }
    ));
    assert!(matches!(
        program.ast.expr(new_line).kind,
        ExprKind::CallSubprog { .. }
    ));
    assert_eq!(
        program.ast.decl(main).qualified_name.as_deref(),
        Some("Main")
    );
}
