// src/errors/sema.rs
//! Semantic analysis errors (E2xxx), one variant per taxonomy entry:
//! structural, import graph, name resolution, linking, overload, class
//! shape, usage contract, and type errors.

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum SemanticError {
    // Structural.
    #[error("the program entry point must be a procedure")]
    #[diagnostic(code(E2001))]
    EntryPointNotProcedure,

    #[error("unit '{unit}' does not match module name '{module}'")]
    #[diagnostic(code(E2002))]
    ModuleNameMismatch { unit: String, module: String },

    #[error("a declaration file must contain a package declaration, found '{unit}'")]
    #[diagnostic(code(E2003))]
    DeclFileNotPackage { unit: String },

    #[error("package declaration '{unit}' must use the declaration file extension")]
    #[diagnostic(code(E2004))]
    PackageDeclWrongExtension { unit: String },

    #[error("with clause '{name}' must name a single-level module")]
    #[diagnostic(code(E2005))]
    ImportTooDeep { name: String },

    #[error("module '{name}' cannot import itself")]
    #[diagnostic(code(E2006))]
    SelfImport { name: String },

    #[error("with clause names unknown module '{name}'")]
    #[diagnostic(code(E2007))]
    UnknownImport { name: String },

    // Import graph.
    #[error("circular import: {cycle}")]
    #[diagnostic(code(E2010))]
    CircularImport { cycle: String },

    // Name resolution.
    #[error("name '{name}' is not visible here")]
    #[diagnostic(code(E2020))]
    UnresolvedName { name: String },

    #[error("name '{name}' is ambiguous here")]
    #[diagnostic(code(E2021))]
    AmbiguousName { name: String },

    #[error("duplicate declaration of '{name}'")]
    #[diagnostic(code(E2022))]
    DuplicateDeclaration { name: String },

    #[error("type name '{name}' is not visible here")]
    #[diagnostic(code(E2023))]
    UnknownTypeName { name: String },

    #[error("'{name}' does not name a type")]
    #[diagnostic(code(E2024))]
    NotAType { name: String },

    #[error("class-wide type '{name}' may only be used as a parameter type")]
    #[diagnostic(code(E2025))]
    ClassWideOutsideParameter { name: String },

    #[error("no visible subprogram '{name}' matches these arguments")]
    #[diagnostic(code(E2026))]
    NoMatchingSubprogram { name: String },

    #[error("call to '{name}' is ambiguous")]
    #[diagnostic(code(E2027))]
    AmbiguousCall { name: String },

    // Linking.
    #[error("package body '{name}' has no matching declaration")]
    #[diagnostic(code(E2030))]
    UnlinkedPackageBody { name: String },

    #[error("subprogram '{name}' is declared but has no matching body")]
    #[diagnostic(code(E2031))]
    UnlinkedSubprogramDecl { name: String },

    #[error("inheritance base '{name}' is not visible here")]
    #[diagnostic(code(E2032))]
    UnresolvedBaseRecord { name: String },

    #[error("'{name}' is not a tagged record")]
    #[diagnostic(code(E2033))]
    NotATaggedRecord { name: String },

    #[error("record '{name}' is part of an inheritance cycle")]
    #[diagnostic(code(E2034))]
    CircularInheritance { name: String },

    #[error("field '{field}' of record '{record}' is already declared in an ancestor")]
    #[diagnostic(code(E2035))]
    InheritedFieldConflict { field: String, record: String },

    // Overload.
    #[error("subprogram '{name}' duplicates an existing signature")]
    #[diagnostic(code(E2040))]
    DuplicateSignature { name: String },

    // Class shape.
    #[error("subprogram '{name}' takes more than one class-typed parameter")]
    #[diagnostic(code(E2041))]
    MultipleClassParameters { name: String },

    #[error("the class-typed parameter of '{name}' must come first")]
    #[diagnostic(code(E2042))]
    ClassParameterNotFirst { name: String },

    // Usage contract.
    #[error("cannot assign to 'in' parameter '{name}'")]
    #[diagnostic(code(E2050))]
    AssignToInParameter { name: String },

    #[error("cannot read 'out' parameter '{name}'")]
    #[diagnostic(code(E2051))]
    ReadOfOutParameter { name: String },

    #[error("left side of an assignment must be a variable or array element")]
    #[diagnostic(code(E2052))]
    InvalidAssignmentTarget,

    #[error("function '{name}' cannot be called as a statement")]
    #[diagnostic(code(E2053))]
    FunctionCallAsStatement { name: String },

    #[error("'{name}' is not a procedure call and cannot stand alone as a statement")]
    #[diagnostic(code(E2054))]
    ValueAsStatement { name: String },

    #[error("'{name}' does not yield a value")]
    #[diagnostic(code(E2055))]
    NotAValue { name: String },

    #[error("'{name}' matches both a field and a method")]
    #[diagnostic(code(E2056))]
    AmbiguousMember { name: String },

    #[error("the prefix of a dotted name must be a package or a tagged-record value")]
    #[diagnostic(code(E2057))]
    InvalidQualifier,

    #[error("'{container}' has no member '{name}'")]
    #[diagnostic(code(E2058))]
    UnknownMember { name: String, container: String },

    #[error("unknown attribute '{name}'")]
    #[diagnostic(code(E2059))]
    UnknownAttribute { name: String },

    // Types.
    #[error("expected {expected}, found {found}")]
    #[diagnostic(code(E2060))]
    TypeMismatch { expected: String, found: String },

    #[error("condition must be Boolean, found {found}")]
    #[diagnostic(code(E2061))]
    ConditionNotBoolean { found: String },

    #[error("loop bound must be Integer, found {found}")]
    #[diagnostic(code(E2062))]
    LoopBoundNotInteger { found: String },

    #[error("return value must be {expected}, found {found}")]
    #[diagnostic(code(E2063))]
    ReturnTypeMismatch { expected: String, found: String },

    #[error("procedures cannot return a value")]
    #[diagnostic(code(E2064))]
    ReturnValueInProcedure,

    #[error("function return requires a value")]
    #[diagnostic(code(E2065))]
    MissingReturnValue,

    #[error("operator '{op}' cannot combine {lhs} and {rhs}")]
    #[diagnostic(code(E2066))]
    OperandTypeMismatch {
        op: String,
        lhs: String,
        rhs: String,
    },

    #[error("'{name}' cannot be indexed with these arguments")]
    #[diagnostic(code(E2067))]
    InvalidIndexing { name: String },

    #[error("argument for an 'out' parameter of '{name}' must be a variable")]
    #[diagnostic(code(E2068))]
    ArgumentNotVariable { name: String },
}
