//! Depth-limited walks over method bodies.
//!
//! Both walks visit nodes in pre-order using [`IrNode::children`] order, so a
//! lambda's ordinal within a method is the same whether it is counted by
//! [`for_each_lambda`] or by [`rewrite_lambdas`].
//!
//! A body nested deeper than [`MAX_IR_VISIT_DEPTH`] is not walked past the
//! limit. [`for_each_lambda`] reports that as [`DepthLimitExceeded`] so the
//! caller can refuse the method instead of missing its lambdas.

use crate::lambda::LambdaExpression;
use crate::node::IrNode;
use jlc_common::limits::MAX_IR_VISIT_DEPTH;
use std::sync::Arc;

/// A method body nests nodes deeper than [`MAX_IR_VISIT_DEPTH`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DepthLimitExceeded;

/// Call `f` for every lambda site in `body`, in source order.
///
/// Sites found before the walk hit the depth limit have already been passed
/// to `f` when this returns `Err`.
pub fn for_each_lambda(
    body: &[IrNode],
    f: &mut impl FnMut(&Arc<LambdaExpression>),
) -> Result<(), DepthLimitExceeded> {
    for node in body {
        visit(node, 0, f)?;
    }
    Ok(())
}

fn visit(
    node: &IrNode,
    depth: u32,
    f: &mut impl FnMut(&Arc<LambdaExpression>),
) -> Result<(), DepthLimitExceeded> {
    if depth >= MAX_IR_VISIT_DEPTH {
        return Err(DepthLimitExceeded);
    }
    if let IrNode::Lambda(lambda) = node {
        f(lambda);
        return Ok(());
    }
    for child in node.children() {
        visit(child, depth + 1, f)?;
    }
    Ok(())
}

/// Replace lambda sites in `body`, in source order.
///
/// `f` receives each site and returns its replacement; returning `None`
/// leaves the site untouched. Returns the number of sites replaced.
pub fn rewrite_lambdas(
    body: &mut [IrNode],
    f: &mut impl FnMut(&Arc<LambdaExpression>) -> Option<IrNode>,
) -> usize {
    let mut replaced = 0;
    for node in body {
        rewrite(node, 0, f, &mut replaced);
    }
    replaced
}

fn rewrite(
    node: &mut IrNode,
    depth: u32,
    f: &mut impl FnMut(&Arc<LambdaExpression>) -> Option<IrNode>,
    replaced: &mut usize,
) {
    if depth >= MAX_IR_VISIT_DEPTH {
        return;
    }
    if let IrNode::Lambda(lambda) = node {
        if let Some(replacement) = f(lambda) {
            *node = replacement;
            *replaced += 1;
        }
        return;
    }
    for child in node.children_mut() {
        rewrite(child, depth + 1, f, replaced);
    }
}

/// Number of lambda sites in `body` within the depth limit.
pub fn count_lambdas(body: &[IrNode]) -> usize {
    let mut count = 0;
    let _ = for_each_lambda(body, &mut |_| count += 1);
    count
}

#[cfg(test)]
#[path = "../tests/visit_tests.rs"]
mod tests;
