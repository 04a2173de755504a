// src/sema/stdlib.rs
//
// The synthesized standard-library module: `package Ada` holding
// `package Text_IO`. Its subprograms carry empty bodies; the back end
// lowers them to runtime intrinsics. The `Ada` root name is the one
// import exempt from the one-level `with` rule, and `use Ada.Text_IO`
// is the reason use-expansion descends nested packages.

use crate::frontend::{
    Decl, DeclId, DeclKind, PackageDecl, ParamMode, SubprogramDecl, TypeKind, VarDecl,
};
use crate::module::{Module, Program};

/// The reserved standard-library namespace root.
pub const STD_ROOT: &str = "Ada";
/// The text-IO sub-package receiving special `use` expansion.
pub const TEXT_IO: &str = "Text_IO";

/// Appends the `Ada` module to the program unless one is already present.
/// Idempotent; the entry module keeps its position at index 0.
pub fn install(program: &mut Program) {
    let ada_sym = program.interner.intern(STD_ROOT);
    if program.modules.iter().any(|m| m.name == ada_sym) {
        return;
    }

    let string_ty = program
        .ast
        .alloc_type(TypeKind::BoundedString { range: (1, 0) });
    let integer_ty = program.ast.primitive(crate::frontend::Primitive::Integer);

    let item_sym = program.interner.intern("Item");
    let intrinsic = |program: &mut Program, name: &str, param_ty: Option<crate::frontend::TypeId>| {
        let params: Vec<DeclId> = param_ty
            .map(|ty| {
                program.ast.alloc_decl(Decl {
                    name: item_sym,
                    parent: None,
                    qualified_name: None,
                    kind: DeclKind::Var(VarDecl {
                        ty,
                        init: None,
                        mode: Some(ParamMode::In),
                    }),
                })
            })
            .into_iter()
            .collect();
        let name = program.interner.intern(name);
        let sp = program.ast.alloc_decl(Decl {
            name,
            parent: None,
            qualified_name: None,
            kind: DeclKind::Subprogram(SubprogramDecl {
                is_function: false,
                params: params.clone(),
                return_type: None,
                locals: Vec::new(),
                body: Some(Vec::new()),
                linked: None,
            }),
        });
        for param in params {
            program.ast.decl_mut(param).parent = Some(sp);
        }
        sp
    };

    let put_line = intrinsic(program, "Put_Line", Some(string_ty));
    let put_str = intrinsic(program, "Put", Some(string_ty));
    let put_int = intrinsic(program, "Put", Some(integer_ty));
    let new_line = intrinsic(program, "New_Line", None);

    let text_io_sym = program.interner.intern(TEXT_IO);
    let members = vec![put_line, put_str, put_int, new_line];
    let text_io = program.ast.alloc_decl(Decl {
        name: text_io_sym,
        parent: None,
        qualified_name: None,
        kind: DeclKind::Package(PackageDecl {
            decls: members.clone(),
            is_body: false,
            linked: None,
        }),
    });
    for member in members {
        program.ast.decl_mut(member).parent = Some(text_io);
    }

    let ada = program.ast.alloc_decl(Decl {
        name: ada_sym,
        parent: None,
        qualified_name: None,
        kind: DeclKind::Package(PackageDecl {
            decls: vec![text_io],
            is_body: false,
            linked: None,
        }),
    });
    program.ast.decl_mut(text_io).parent = Some(ada);

    program.modules.push(Module {
        unit: ada,
        withs: Vec::new(),
        uses: Vec::new(),
        name: ada_sym,
        file_name: "ada.ads".to_string(),
        file_ext: "ads".to_string(),
    });
}
