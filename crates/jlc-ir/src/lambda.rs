//! Lambda expression sites as delivered by the front end.
//!
//! By the time the lambda pass runs, the front end has already moved every
//! lambda body into a synthetic method on the enclosing type (`body`). A
//! lambda site therefore only describes *what* it captures, *which*
//! interfaces it implements, and *where* its body lives.

use crate::node::IrNode;
use crate::types::{JType, MethodSignature};
use jlc_common::Span;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// One captured variable of a lambda.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CapturedVariable {
    pub name: String,
    pub ty: JType,
    /// Expression evaluated at the lambda site to obtain the captured value.
    pub origin: IrNode,
}

impl CapturedVariable {
    /// Capture of a local variable of the same name.
    pub fn local(name: impl Into<String>, ty: JType) -> Self {
        let name = name.into();
        Self {
            origin: IrNode::Local(name.clone()),
            name,
            ty,
        }
    }
}

/// The synthetic method holding a lambda's body.
///
/// Its parameters are the explicit captures (in capture order) followed by the
/// functional method's parameters. When the lambda captures the enclosing
/// instance the body is an instance method invoked on that instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodRef {
    pub owner: String,
    pub signature: MethodSignature,
    #[serde(default)]
    pub is_static: bool,
}

/// A lambda expression site.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LambdaExpression {
    /// Explicitly captured variables in source order.
    #[serde(default)]
    pub captures: Vec<CapturedVariable>,
    /// Type of the enclosing instance, when the body closes over `this`.
    #[serde(default)]
    pub this_capture: Option<JType>,
    /// Functional interface the lambda converts to.
    pub interface: String,
    /// Additional interface bounds of an intersection cast (`(A & B) () -> ...`).
    #[serde(default)]
    pub bounds: Vec<String>,
    /// Erased functional method the lambda implements.
    pub method: MethodSignature,
    /// Covariant-return bridges the lambda must also expose.
    #[serde(default)]
    pub bridges: Vec<MethodSignature>,
    pub body: MethodRef,
    #[serde(default)]
    pub span: Span,
}

impl LambdaExpression {
    /// Types of all captures in original capture order.
    ///
    /// The implicit enclosing-instance capture, when present, is position 0.
    pub fn capture_types(&self) -> SmallVec<[&JType; 8]> {
        self.this_capture
            .iter()
            .chain(self.captures.iter().map(|c| &c.ty))
            .collect()
    }

    /// Values of all captures at the lambda site, same order as [`Self::capture_types`].
    pub fn capture_values(&self) -> Vec<IrNode> {
        self.this_capture
            .iter()
            .map(|_| IrNode::This)
            .chain(self.captures.iter().map(|c| c.origin.clone()))
            .collect()
    }

    pub fn capture_count(&self) -> usize {
        self.captures.len() + usize::from(self.this_capture.is_some())
    }

    /// The functional interface followed by the extra bounds.
    pub fn declared_interfaces(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.interface.as_str()).chain(self.bounds.iter().map(String::as_str))
    }
}
