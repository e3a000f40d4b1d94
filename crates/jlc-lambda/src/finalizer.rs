//! Group class synthesis.
//!
//! Turns one [`LambdaGroup`] into a concrete class:
//!
//! ```text
//! final class -$Lambda$0 implements I {
//!     private final byte $id;            // only with more than one member
//!     private final int f$0;             // one field per capture slot
//!     private final java.lang.Object f$1;
//!     public static final -$Lambda$0 $INST$0;  // stateless members only
//!
//!     -$Lambda$0(byte $id, int f$0, java.lang.Object f$1) { ... }
//!     static { $INST$0 = new -$Lambda$0((byte) 0); }
//!
//!     public R m(A a) {                  // one per distinct signature
//!         switch (this.$id) { case 0: return this.$m$0(a); ... }
//!     }
//!     private R $m$0(A a) { return Outer.lambda$0(this.f$0, a); }
//! }
//! ```
//!
//! Groups never share mutable state, so finalizers for different groups run
//! in parallel. Everything produced here is also recorded per member as a
//! [`LambdaSynthesis`] for site rewriting.

use crate::capture_signature::CaptureMapping;
use crate::collection::{GroupMember, LambdaGroup, StableId};
use crate::interface_signature::normalize_interfaces;
use crate::options::LambdaOptions;
use crate::synthesis::LambdaSynthesis;
use indexmap::IndexMap;
use jlc_ir::{
    CallKind, ClassDecl, FieldDecl, IrNode, JType, MethodDecl, MethodSignature, Modifiers, Param,
    SwitchCase, TypeHierarchy,
};
use rustc_hash::FxHashSet;
use std::sync::Arc;
use tracing::debug;

/// Member id field of multi-member groups.
pub const ID_FIELD: &str = "$id";

const ASSERTION_ERROR: &str = "java.lang.AssertionError";

/// Name of the capture field for layout slot `slot`.
pub fn capture_field_name(slot: usize) -> String {
    format!("f${slot}")
}

/// Name of the shared-instance field of member `member`.
pub fn singleton_field_name(member: usize) -> String {
    format!("$INST${member}")
}

/// Name of the `n`-th private forwarding method of a group class.
pub fn forwarding_method_name(n: usize) -> String {
    format!("$m${n}")
}

/// A synthesized group class plus what its members need for rewriting.
#[derive(Clone, Debug)]
pub struct FinalizedGroup {
    pub class: ClassDecl,
    pub syntheses: Vec<(StableId, LambdaSynthesis)>,
    pub singleton_fields: usize,
    pub forwarding_methods: usize,
    pub dispatch_methods: usize,
}

/// One public method of the group class and the members answering it.
struct DispatchEntry {
    signature: MethodSignature,
    /// Set while every member reaching this entry does so through a bridge.
    bridge_only: bool,
    /// `(member id, forwarding method)`, in member order.
    targets: Vec<(usize, String)>,
}

pub struct GroupClassFinalizer<'a> {
    options: &'a LambdaOptions,
    hierarchy: &'a dyn TypeHierarchy,
}

impl<'a> GroupClassFinalizer<'a> {
    pub fn new(options: &'a LambdaOptions, hierarchy: &'a dyn TypeHierarchy) -> Self {
        Self { options, hierarchy }
    }

    pub fn finalize(&self, group: &LambdaGroup) -> FinalizedGroup {
        assert!(!group.is_empty(), "BUG: finalizing an empty lambda group");

        let class_name = group.class_name.as_str();
        let class_type = JType::class(class_name);
        let mut class = ClassDecl::new(class_name, Modifiers::FINAL | Modifiers::SYNTHETIC);
        class.interfaces = self.implemented_interfaces(group);

        // Fields and constructor.
        let id_type = group
            .needs_id_field()
            .then(|| JType::Primitive(group.id_type()));
        let slot_types = group.capture.field_types();

        let mut constructor_params = Vec::with_capacity(slot_types.len() + 1);
        if let Some(id_type) = &id_type {
            class.fields.push(FieldDecl::new(
                ID_FIELD,
                id_type.clone(),
                Modifiers::PRIVATE | Modifiers::FINAL,
            ));
            constructor_params.push(Param::new(ID_FIELD, id_type.clone()));
        }
        for (slot, ty) in slot_types.iter().enumerate() {
            let name = capture_field_name(slot);
            class.fields.push(FieldDecl::new(
                name.as_str(),
                ty.clone(),
                Modifiers::PRIVATE | Modifiers::FINAL,
            ));
            constructor_params.push(Param::new(name, ty.clone()));
        }
        let constructor_types: Arc<[JType]> =
            constructor_params.iter().map(|p| p.ty.clone()).collect();
        class
            .methods
            .push(constructor(class_name, &constructor_params));

        // Shared instances of stateless members.
        let stateless = group.capture.is_empty() && self.options.simplify_stateless;
        let mut singletons = Vec::new();
        if stateless {
            let mut initializer = Vec::with_capacity(group.len());
            for index in 0..group.len() {
                let field = singleton_field_name(index);
                class.fields.push(FieldDecl::new(
                    field.as_str(),
                    class_type.clone(),
                    Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::FINAL,
                ));
                let arguments = member_id_argument(group, index).into_iter().collect();
                initializer.push(IrNode::expr_stmt(IrNode::assign(
                    IrNode::static_field(class_name, field.as_str(), class_type.clone()),
                    IrNode::new_object(class_name, constructor_types.to_vec(), arguments),
                )));
                singletons.push(field);
            }
            class.methods.push(MethodDecl::static_initializer(initializer));
        }

        // Forwarding methods, collecting dispatch entries on the way.
        let mut dispatch: IndexMap<String, DispatchEntry> = IndexMap::new();
        let mut forwarding = Vec::new();
        let mut syntheses = Vec::with_capacity(group.len());

        for (index, member) in group.members.iter().enumerate() {
            let lambda = member.lambda();
            let mapping = group.capture.create_mapping(lambda);

            let mut seen = FxHashSet::default();
            let signatures = std::iter::once((&lambda.method, false))
                .chain(lambda.bridges.iter().map(|bridge| (bridge, true)));
            for (signature, is_bridge) in signatures {
                if !seen.insert(signature.key()) {
                    continue;
                }
                let name = forwarding_method_name(forwarding.len());
                forwarding.push(forwarding_method(
                    class_name,
                    &slot_types,
                    member,
                    &mapping,
                    signature,
                    &name,
                ));
                let entry = dispatch
                    .entry(signature.key())
                    .or_insert_with(|| DispatchEntry {
                        signature: signature.clone(),
                        bridge_only: true,
                        targets: Vec::new(),
                    });
                entry.bridge_only &= is_bridge;
                entry.targets.push((index, name));
            }

            syntheses.push((
                member.id.clone(),
                LambdaSynthesis {
                    group_class: group.class_name.clone(),
                    mapping,
                    member_id: group
                        .needs_id_field()
                        .then(|| (index as i64, group.id_type())),
                    singleton_field: stateless.then(|| singleton_field_name(index)),
                    constructor_params: Arc::clone(&constructor_types),
                },
            ));
        }

        let dispatch_methods = dispatch.len();
        for entry in dispatch.into_values() {
            class
                .methods
                .push(dispatch_method(class_name, id_type.as_ref(), entry));
        }
        let forwarding_methods = forwarding.len();
        class.methods.extend(forwarding);

        debug!(
            group = %class_name,
            members = group.len(),
            capture_slots = slot_types.len(),
            dispatch_methods,
            forwarding_methods,
            "finalized lambda group"
        );

        FinalizedGroup {
            class,
            syntheses,
            singleton_fields: singletons.len(),
            forwarding_methods,
            dispatch_methods,
        }
    }

    /// `implements` clause: shared by all members, or the reduced union when
    /// interfaces were not part of the group key.
    fn implemented_interfaces(&self, group: &LambdaGroup) -> Vec<String> {
        if self.options.merge_interfaces {
            normalize_interfaces(group.members.iter().map(GroupMember::lambda), self.hierarchy)
                .unwrap_or_else(|unresolved| {
                    panic!("BUG: interfaces of collected lambdas no longer resolve: {unresolved}")
                })
        } else {
            group.members[0].collected.interfaces.interfaces().to_vec()
        }
    }
}

fn member_id_argument(group: &LambdaGroup, index: usize) -> Option<IrNode> {
    group.needs_id_field().then(|| {
        IrNode::cast(
            JType::Primitive(group.id_type()),
            IrNode::int(index as i64),
        )
    })
}

fn constructor(class_name: &str, params: &[Param]) -> MethodDecl {
    let mut body = Vec::with_capacity(params.len() + 1);
    body.push(IrNode::SuperConstructorCall {
        owner: JType::OBJECT_CLASS.to_string(),
        params: Vec::new(),
        arguments: Vec::new(),
    });
    for param in params {
        body.push(IrNode::expr_stmt(IrNode::assign(
            IrNode::this_field(class_name, param.name.as_str(), param.ty.clone()),
            IrNode::local(param.name.as_str()),
        )));
    }
    MethodDecl::constructor(params.to_vec(), Modifiers::SYNTHETIC, body)
}

fn functional_params(signature: &MethodSignature) -> Vec<Param> {
    signature
        .params
        .iter()
        .enumerate()
        .map(|(i, ty)| Param::new(format!("arg{i}"), ty.clone()))
        .collect()
}

/// `value`, cast to `target` when it is statically typed as `source` and
/// `target` is a narrower reference type.
fn narrow(value: IrNode, source: &JType, target: &JType) -> IrNode {
    if source != target && target.is_reference() && !target.is_object() {
        IrNode::cast(target.clone(), value)
    } else {
        value
    }
}

/// Private method that unpacks a member's captures and calls its body.
fn forwarding_method(
    class_name: &str,
    slot_types: &[JType],
    member: &GroupMember,
    mapping: &CaptureMapping,
    signature: &MethodSignature,
    name: &str,
) -> MethodDecl {
    let lambda = member.lambda();
    let body = &lambda.body;
    let params = functional_params(signature);

    let mut arguments: Vec<IrNode> = lambda
        .capture_types()
        .iter()
        .zip(mapping)
        .map(|(ty, &slot)| {
            let slot_type = &slot_types[slot];
            let field = IrNode::this_field(class_name, capture_field_name(slot), slot_type.clone());
            narrow(field, slot_type, ty)
        })
        .collect();

    let receiver = if body.is_static {
        assert!(
            lambda.this_capture.is_none(),
            "BUG: lambda capturing 'this' has a static body method"
        );
        None
    } else {
        assert!(
            lambda.this_capture.is_some(),
            "BUG: lambda body {}.{} is an instance method but 'this' is not captured",
            body.owner,
            body.signature.name
        );
        Some(arguments.remove(0))
    };

    let explicit_captures = arguments.len();
    assert_eq!(
        explicit_captures + params.len(),
        body.signature.params.len(),
        "BUG: lambda body {}.{} does not take its captures followed by the functional parameters",
        body.owner,
        body.signature.name
    );
    for (param, body_param) in params
        .iter()
        .zip(&body.signature.params[explicit_captures..])
    {
        arguments.push(narrow(IrNode::local(param.name.as_str()), &param.ty, body_param));
    }

    let call = match receiver {
        Some(receiver) => IrNode::call(
            receiver,
            body.owner.as_str(),
            body.signature.clone(),
            arguments,
            CallKind::Virtual,
        ),
        None => IrNode::call_static(body.owner.as_str(), body.signature.clone(), arguments),
    };

    let statements = if signature.return_type.is_void() {
        vec![IrNode::expr_stmt(call)]
    } else {
        vec![IrNode::ret(Some(narrow(
            call,
            &body.signature.return_type,
            &signature.return_type,
        )))]
    };

    MethodDecl::method(
        name,
        params,
        signature.return_type.clone(),
        Modifiers::PRIVATE | Modifiers::SYNTHETIC,
        statements,
    )
}

/// Public interface method selecting the forwarding method by member id.
fn dispatch_method(class_name: &str, id_type: Option<&JType>, entry: DispatchEntry) -> MethodDecl {
    let signature = entry.signature;
    let params = functional_params(&signature);
    let is_void = signature.return_type.is_void();

    let invoke = |forwarding: &str| {
        IrNode::call(
            IrNode::This,
            class_name,
            MethodSignature::new(
                forwarding,
                signature.params.clone(),
                signature.return_type.clone(),
            ),
            params.iter().map(|p| IrNode::local(p.name.as_str())).collect(),
            CallKind::Special,
        )
    };

    let body = if let [(_, forwarding)] = entry.targets.as_slice() {
        let call = invoke(forwarding);
        if is_void {
            vec![IrNode::expr_stmt(call)]
        } else {
            vec![IrNode::ret(Some(call))]
        }
    } else {
        let Some(id_type) = id_type else {
            unreachable!("BUG: several dispatch targets without a member id field");
        };
        let mut cases: Vec<SwitchCase> = entry
            .targets
            .iter()
            .map(|(member, forwarding)| {
                let call = invoke(forwarding);
                let statements = if is_void {
                    vec![IrNode::expr_stmt(call), IrNode::ret(None)]
                } else {
                    vec![IrNode::ret(Some(call))]
                };
                SwitchCase::case(*member as i64, statements)
            })
            .collect();
        cases.push(SwitchCase::default(vec![IrNode::throw(
            IrNode::new_object(ASSERTION_ERROR, Vec::new(), Vec::new()),
        )]));
        vec![IrNode::switch(
            IrNode::this_field(class_name, ID_FIELD, id_type.clone()),
            cases,
        )]
    };

    let modifiers = if entry.bridge_only {
        Modifiers::PUBLIC | Modifiers::BRIDGE | Modifiers::SYNTHETIC
    } else {
        Modifiers::PUBLIC
    };
    MethodDecl::method(
        signature.name.as_str(),
        params,
        signature.return_type.clone(),
        modifiers,
        body,
    )
}

#[cfg(test)]
#[path = "../tests/finalizer_tests.rs"]
mod tests;
