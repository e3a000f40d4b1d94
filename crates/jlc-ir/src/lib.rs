//! Typed intermediate representation for the jlc toolchain.
//!
//! This crate models the already-resolved program the lambda pass works on:
//! - Java types and method signatures (`JType`, `PrimitiveKind`, `MethodSignature`)
//! - Method body trees (`IrNode`) with builder helpers and source-order walks
//! - Lambda sites (`LambdaExpression`) as produced by the front end
//! - Class, member and program declarations (`ClassDecl`, `MethodDecl`, `Program`)
//! - Interface hierarchy lookup (`TypeHierarchy`, `ClassPath`)
//! - A Java-like printer for debugging and tests (`IrPrinter`)

pub mod types;
pub use types::{JType, MethodSignature, PrimitiveKind};

pub mod node;
pub use node::{CallKind, IrNode, SwitchCase};

pub mod lambda;
pub use lambda::{CapturedVariable, LambdaExpression, MethodRef};

pub mod program;
pub use program::{
    ClassDecl, FieldDecl, InterfaceDecl, MethodDecl, MethodKind, Modifiers, Param, Program,
};

pub mod hierarchy;
pub use hierarchy::{ClassPath, TypeHierarchy};

pub mod visit;

pub mod printer;
pub use printer::IrPrinter;
