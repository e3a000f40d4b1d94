//! Replaces lambda sites with group class instantiations.

use crate::collection::StableId;
use crate::synthesis::{LambdaSynthesis, SynthesisTable};
use jlc_ir::visit::rewrite_lambdas;
use jlc_ir::{ClassDecl, IrNode, JType, LambdaExpression, MethodDecl};

/// Rewrites one method at a time against a finished [`SynthesisTable`].
///
/// Lambdas are numbered in the same source order the collector used, so each
/// site recomputes its own stable id.
pub struct SiteRewriter<'a> {
    table: &'a SynthesisTable,
}

impl<'a> SiteRewriter<'a> {
    pub const fn new(table: &'a SynthesisTable) -> Self {
        Self { table }
    }

    /// Rewrite every lambda of `method`; returns how many sites were replaced.
    ///
    /// # Panics
    /// If a lambda of `method` has no synthesis.
    pub fn rewrite_method(&self, class: &str, method: &mut MethodDecl) -> usize {
        let method_key = method.signature().key();
        let mut ordinal = 0u32;
        rewrite_lambdas(&mut method.body, &mut |lambda| {
            let id = StableId::new(class, method_key.as_str(), ordinal);
            ordinal += 1;
            let Some(synthesis) = self.table.get(&id) else {
                panic!("BUG: no group class was synthesized for lambda {id}");
            };
            Some(replacement(lambda, synthesis))
        })
    }

    pub fn rewrite_class(&self, class: &mut ClassDecl) -> usize {
        let name = class.name.clone();
        class
            .methods
            .iter_mut()
            .map(|method| self.rewrite_method(&name, method))
            .sum()
    }
}

/// Expression standing in for `lambda`.
pub fn replacement(lambda: &LambdaExpression, synthesis: &LambdaSynthesis) -> IrNode {
    if let Some(field) = &synthesis.singleton_field {
        return IrNode::static_field(
            synthesis.group_class.as_str(),
            field.as_str(),
            JType::class(synthesis.group_class.as_str()),
        );
    }

    let mut captures = vec![IrNode::NullLiteral; synthesis.mapping.len()];
    for (value, &slot) in lambda.capture_values().into_iter().zip(&synthesis.mapping) {
        captures[slot] = value;
    }

    let mut arguments = Vec::with_capacity(captures.len() + 1);
    if let Some((member_id, id_type)) = synthesis.member_id {
        arguments.push(IrNode::cast(JType::Primitive(id_type), IrNode::int(member_id)));
    }
    arguments.extend(captures);

    IrNode::new_object(
        synthesis.group_class.as_str(),
        synthesis.constructor_params.to_vec(),
        arguments,
    )
}

#[cfg(test)]
#[path = "../tests/site_rewriter_tests.rs"]
mod tests;
