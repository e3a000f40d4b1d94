//! Expression and statement tree for method bodies.
//!
//! Front ends hand method bodies to the lambda pass as `IrNode` trees; the
//! pass produces `IrNode` trees for every synthesized member. One enum covers
//! both expressions and statements, and the printer decides how to render each
//! variant.
//!
//! # Traversal order
//!
//! [`IrNode::children`] and [`IrNode::children_mut`] yield children in the same
//! (source) order. Passes that number nodes during one walk and look them up
//! again during another rely on that.

use crate::lambda::LambdaExpression;
use crate::types::{JType, MethodSignature};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// How a call instruction dispatches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CallKind {
    Static,
    Virtual,
    Interface,
    /// Private or constructor-chained call (`invokespecial`).
    Special,
}

/// Intermediate Representation node for method bodies.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IrNode {
    // =========================================================================
    // Literals
    // =========================================================================
    /// Integral literal, rendered with an optional narrowing cast by the printer.
    IntLiteral(i64),

    StringLiteral(String),

    BooleanLiteral(bool),

    NullLiteral,

    // =========================================================================
    // References
    // =========================================================================
    /// Local variable or parameter.
    Local(String),

    /// `this`
    This,

    /// Instance field read: `object.name`
    Field {
        object: Box<Self>,
        owner: String,
        name: String,
        ty: JType,
    },

    /// Static field read: `Owner.name`
    StaticField {
        owner: String,
        name: String,
        ty: JType,
    },

    // =========================================================================
    // Expressions
    // =========================================================================
    /// Assignment: `target = value`
    Assign { target: Box<Self>, value: Box<Self> },

    /// Binary expression: `left op right`
    Binary {
        left: Box<Self>,
        operator: String,
        right: Box<Self>,
    },

    /// Method invocation. `receiver` is absent for static calls.
    Call {
        receiver: Option<Box<Self>>,
        owner: String,
        method: MethodSignature,
        arguments: Vec<Self>,
        kind: CallKind,
    },

    /// `super(args)` inside a constructor.
    SuperConstructorCall {
        owner: String,
        params: Vec<JType>,
        arguments: Vec<Self>,
    },

    /// Instance creation: `new Class(args)`
    New {
        class: String,
        params: Vec<JType>,
        arguments: Vec<Self>,
    },

    /// Checked cast: `(Type) expr`
    Cast { ty: JType, expression: Box<Self> },

    /// Lambda expression site. Replaced by the lambda pass.
    Lambda(Arc<LambdaExpression>),

    // =========================================================================
    // Statements
    // =========================================================================
    /// Expression statement: `expr;`
    ExpressionStatement(Box<Self>),

    /// Local declaration: `Type name = init;`
    LocalDecl {
        name: String,
        ty: JType,
        initializer: Option<Box<Self>>,
    },

    /// Return statement: `return expr;`
    Return(Option<Box<Self>>),

    /// Throw statement: `throw expr;`
    Throw(Box<Self>),

    /// If statement: `if (cond) { then } else { else }`
    If {
        condition: Box<Self>,
        then_branch: Box<Self>,
        else_branch: Option<Box<Self>>,
    },

    /// Block statement: `{ statements }`
    Block(Vec<Self>),

    /// Switch statement over an integral value.
    Switch {
        expression: Box<Self>,
        cases: Vec<SwitchCase>,
    },
}

/// Switch case; `label: None` is the default case.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SwitchCase {
    pub label: Option<i64>,
    pub statements: Vec<IrNode>,
}

impl SwitchCase {
    pub const fn case(label: i64, statements: Vec<IrNode>) -> Self {
        Self {
            label: Some(label),
            statements,
        }
    }

    pub const fn default(statements: Vec<IrNode>) -> Self {
        Self {
            label: None,
            statements,
        }
    }

    pub const fn is_default(&self) -> bool {
        self.label.is_none()
    }
}

// =========================================================================
// Builder helpers for IR construction
// =========================================================================

impl IrNode {
    pub fn local(name: impl Into<String>) -> Self {
        Self::Local(name.into())
    }

    pub fn string(s: impl Into<String>) -> Self {
        Self::StringLiteral(s.into())
    }

    pub const fn int(value: i64) -> Self {
        Self::IntLiteral(value)
    }

    /// Read `this.name`.
    pub fn this_field(owner: impl Into<String>, name: impl Into<String>, ty: JType) -> Self {
        Self::Field {
            object: Box::new(Self::This),
            owner: owner.into(),
            name: name.into(),
            ty,
        }
    }

    pub fn static_field(owner: impl Into<String>, name: impl Into<String>, ty: JType) -> Self {
        Self::StaticField {
            owner: owner.into(),
            name: name.into(),
            ty,
        }
    }

    pub fn assign(target: Self, value: Self) -> Self {
        Self::Assign {
            target: Box::new(target),
            value: Box::new(value),
        }
    }

    pub fn binary(left: Self, op: impl Into<String>, right: Self) -> Self {
        Self::Binary {
            left: Box::new(left),
            operator: op.into(),
            right: Box::new(right),
        }
    }

    pub fn call_static(owner: impl Into<String>, method: MethodSignature, args: Vec<Self>) -> Self {
        Self::Call {
            receiver: None,
            owner: owner.into(),
            method,
            arguments: args,
            kind: CallKind::Static,
        }
    }

    pub fn call(
        receiver: Self,
        owner: impl Into<String>,
        method: MethodSignature,
        args: Vec<Self>,
        kind: CallKind,
    ) -> Self {
        Self::Call {
            receiver: Some(Box::new(receiver)),
            owner: owner.into(),
            method,
            arguments: args,
            kind,
        }
    }

    pub fn new_object(class: impl Into<String>, params: Vec<JType>, args: Vec<Self>) -> Self {
        Self::New {
            class: class.into(),
            params,
            arguments: args,
        }
    }

    pub fn cast(ty: JType, expression: Self) -> Self {
        Self::Cast {
            ty,
            expression: Box::new(expression),
        }
    }

    pub fn expr_stmt(expr: Self) -> Self {
        Self::ExpressionStatement(Box::new(expr))
    }

    pub fn ret(expr: Option<Self>) -> Self {
        Self::Return(expr.map(Box::new))
    }

    pub fn throw(expr: Self) -> Self {
        Self::Throw(Box::new(expr))
    }

    pub fn local_decl(name: impl Into<String>, ty: JType, init: Option<Self>) -> Self {
        Self::LocalDecl {
            name: name.into(),
            ty,
            initializer: init.map(Box::new),
        }
    }

    pub fn switch(expression: Self, cases: Vec<SwitchCase>) -> Self {
        Self::Switch {
            expression: Box::new(expression),
            cases,
        }
    }

    pub fn lambda(lambda: LambdaExpression) -> Self {
        Self::Lambda(Arc::new(lambda))
    }

    // =========================================================================
    // Traversal
    // =========================================================================

    /// Direct children in source order.
    pub fn children(&self) -> Vec<&Self> {
        match self {
            Self::IntLiteral(_)
            | Self::StringLiteral(_)
            | Self::BooleanLiteral(_)
            | Self::NullLiteral
            | Self::Local(_)
            | Self::This
            | Self::StaticField { .. }
            | Self::Lambda(_) => Vec::new(),
            Self::Field { object, .. } => vec![object.as_ref()],
            Self::Assign { target, value } => vec![target.as_ref(), value.as_ref()],
            Self::Binary { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            Self::Call {
                receiver,
                arguments,
                ..
            } => receiver
                .iter()
                .map(|r| r.as_ref())
                .chain(arguments.iter())
                .collect(),
            Self::SuperConstructorCall { arguments, .. } | Self::New { arguments, .. } => {
                arguments.iter().collect()
            }
            Self::Cast { expression, .. } => vec![expression.as_ref()],
            Self::ExpressionStatement(expr) | Self::Throw(expr) => vec![expr.as_ref()],
            Self::LocalDecl { initializer, .. } => initializer.iter().map(|i| i.as_ref()).collect(),
            Self::Return(expr) => expr.iter().map(|e| e.as_ref()).collect(),
            Self::If {
                condition,
                then_branch,
                else_branch,
            } => [condition.as_ref(), then_branch.as_ref()]
                .into_iter()
                .chain(else_branch.iter().map(|e| e.as_ref()))
                .collect(),
            Self::Block(statements) => statements.iter().collect(),
            Self::Switch { expression, cases } => std::iter::once(expression.as_ref())
                .chain(cases.iter().flat_map(|c| c.statements.iter()))
                .collect(),
        }
    }

    /// Direct children in source order, mutably. Same order as [`Self::children`].
    pub fn children_mut(&mut self) -> Vec<&mut Self> {
        match self {
            Self::IntLiteral(_)
            | Self::StringLiteral(_)
            | Self::BooleanLiteral(_)
            | Self::NullLiteral
            | Self::Local(_)
            | Self::This
            | Self::StaticField { .. }
            | Self::Lambda(_) => Vec::new(),
            Self::Field { object, .. } => vec![object.as_mut()],
            Self::Assign { target, value } => vec![target.as_mut(), value.as_mut()],
            Self::Binary { left, right, .. } => vec![left.as_mut(), right.as_mut()],
            Self::Call {
                receiver,
                arguments,
                ..
            } => receiver
                .iter_mut()
                .map(|r| r.as_mut())
                .chain(arguments.iter_mut())
                .collect(),
            Self::SuperConstructorCall { arguments, .. } | Self::New { arguments, .. } => {
                arguments.iter_mut().collect()
            }
            Self::Cast { expression, .. } => vec![expression.as_mut()],
            Self::ExpressionStatement(expr) | Self::Throw(expr) => vec![expr.as_mut()],
            Self::LocalDecl { initializer, .. } => {
                initializer.iter_mut().map(|i| i.as_mut()).collect()
            }
            Self::Return(expr) => expr.iter_mut().map(|e| e.as_mut()).collect(),
            Self::If {
                condition,
                then_branch,
                else_branch,
            } => [condition.as_mut(), then_branch.as_mut()]
                .into_iter()
                .chain(else_branch.iter_mut().map(|e| e.as_mut()))
                .collect(),
            Self::Block(statements) => statements.iter_mut().collect(),
            Self::Switch { expression, cases } => std::iter::once(expression.as_mut())
                .chain(cases.iter_mut().flat_map(|c| c.statements.iter_mut()))
                .collect(),
        }
    }
}
