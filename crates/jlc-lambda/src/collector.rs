//! Per-method lambda collection.
//!
//! One collector task visits one method body, assigns each lambda its stable
//! id, computes the lambda's signatures and files it under its group key.
//! Lambdas whose interfaces cannot be resolved, lambdas capturing a `void`
//! value and method bodies nested past the walk's depth limit are reported
//! instead, and the session is aborted once the task's diagnostics reach the
//! reporter.

use crate::capture_signature::CaptureSignature;
use crate::collection::{CollectedLambda, GroupKey, LambdaCollection, StableId};
use crate::interface_signature::{InterfaceSignature, UnresolvedInterfaces};
use crate::options::{GroupingScope, LambdaOptions};
use crate::reporter::SessionReporter;
use jlc_common::diagnostics::diagnostic_codes;
use jlc_common::limits::MAX_IR_VISIT_DEPTH;
use jlc_common::Diagnostic;
use jlc_ir::types::{package_of, top_level_of};
use jlc_ir::visit::for_each_lambda;
use jlc_ir::{ClassDecl, JType, LambdaExpression, MethodDecl, TypeHierarchy};
use rustc_hash::FxHashSet;
use std::sync::Arc;
use tracing::{trace, warn};

pub struct LambdaCollector<'a> {
    hierarchy: &'a dyn TypeHierarchy,
    options: &'a LambdaOptions,
    collection: &'a LambdaCollection,
    reporter: &'a SessionReporter,
}

impl<'a> LambdaCollector<'a> {
    pub fn new(
        hierarchy: &'a dyn TypeHierarchy,
        options: &'a LambdaOptions,
        collection: &'a LambdaCollection,
        reporter: &'a SessionReporter,
    ) -> Self {
        Self {
            hierarchy,
            options,
            collection,
            reporter,
        }
    }

    /// Collect every lambda of `method`; returns how many were collected.
    pub fn collect_method(&self, class: &ClassDecl, method: &MethodDecl) -> usize {
        let method_key = method.signature().key();
        let mut ordinal = 0u32;
        let mut collected = 0usize;
        let mut diagnostics = Vec::new();

        let walked = for_each_lambda(&method.body, &mut |lambda| {
            let id = StableId::new(class.name.as_str(), method_key.as_str(), ordinal);
            ordinal += 1;

            if let Some(name) = void_capture(lambda) {
                diagnostics.push(Diagnostic::from_code(
                    source_file(class),
                    lambda.span.start,
                    lambda.span.len(),
                    diagnostic_codes::VOID_LAMBDA_CAPTURE,
                    &[location(class, method).as_str(), name],
                ));
                return;
            }

            match InterfaceSignature::of(lambda, self.hierarchy) {
                Ok(interfaces) => {
                    let capture = CaptureSignature::of(lambda);
                    let key = self.group_key(&id, &capture, &interfaces);
                    trace!(lambda = %id, key = %key, "collected lambda");
                    self.collection.insert(
                        key,
                        id,
                        CollectedLambda {
                            lambda: Arc::clone(lambda),
                            capture,
                            interfaces,
                        },
                    );
                    collected += 1;
                }
                Err(unresolved) => {
                    diagnostics.push(unresolved_diagnostic(class, method, lambda, &unresolved));
                }
            }
        });

        if walked.is_err() {
            warn!(class = %class.name, method = %method_key, "method body exceeds the IR depth limit");
            diagnostics.push(Diagnostic::from_code(
                source_file(class),
                0,
                0,
                diagnostic_codes::METHOD_BODY_TOO_DEEP,
                &[
                    location(class, method).as_str(),
                    MAX_IR_VISIT_DEPTH.to_string().as_str(),
                ],
            ));
        }

        self.reporter.report_all(diagnostics);
        collected
    }

    fn group_key(
        &self,
        id: &StableId,
        capture: &CaptureSignature,
        interfaces: &InterfaceSignature,
    ) -> GroupKey {
        let interfaces = if self.options.merge_interfaces {
            String::new()
        } else {
            interfaces.unique_id().to_string()
        };
        let scope = match self.options.grouping_scope {
            GroupingScope::None => id.to_string(),
            GroupingScope::Type => top_level_of(&id.enclosing_type).to_string(),
            GroupingScope::Package => package_of(top_level_of(&id.enclosing_type)).to_string(),
        };
        GroupKey {
            capture: capture.unique_id(),
            interfaces,
            scope,
        }
    }
}

/// Types or methods declared twice would share stable ids, so one of the
/// copies would silently lose its lambdas. Returns one diagnostic per repeat.
pub fn duplicate_declarations(types: &[ClassDecl]) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut type_names = FxHashSet::default();
    for class in types {
        if !type_names.insert(class.name.as_str()) {
            diagnostics.push(Diagnostic::from_code(
                source_file(class),
                0,
                0,
                diagnostic_codes::DUPLICATE_TYPE_DECLARATION,
                &[&class.name],
            ));
            continue;
        }
        let mut method_keys = FxHashSet::default();
        for method in &class.methods {
            let key = method.signature().key();
            if !method_keys.insert(key.clone()) {
                diagnostics.push(Diagnostic::from_code(
                    source_file(class),
                    0,
                    0,
                    diagnostic_codes::DUPLICATE_METHOD_DECLARATION,
                    &[&key, &class.name],
                ));
            }
        }
    }
    diagnostics
}

/// Name of the first capture typed `void`; the enclosing instance counts as `this`.
fn void_capture(lambda: &LambdaExpression) -> Option<&str> {
    if lambda.this_capture == Some(JType::Void) {
        return Some("this");
    }
    lambda
        .captures
        .iter()
        .find(|capture| capture.ty == JType::Void)
        .map(|capture| capture.name.as_str())
}

fn source_file(class: &ClassDecl) -> String {
    class.source_file.clone().unwrap_or_else(|| class.name.clone())
}

fn location(class: &ClassDecl, method: &MethodDecl) -> String {
    format!("{}.{}", class.name, method.name)
}

fn quoted_list<'s>(names: impl IntoIterator<Item = &'s str>) -> String {
    names
        .into_iter()
        .map(|name| format!("'{name}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn unresolved_diagnostic(
    class: &ClassDecl,
    method: &MethodDecl,
    lambda: &LambdaExpression,
    unresolved: &UnresolvedInterfaces,
) -> Diagnostic {
    let file = source_file(class);
    let location = location(class, method);
    let start = lambda.span.start;
    let length = lambda.span.len();

    if unresolved.declared.is_empty() {
        let mut owners: Vec<&str> = unresolved
            .inherited
            .iter()
            .map(|(owner, _)| owner.as_str())
            .collect();
        owners.dedup();
        let owners = owners.join("', '");
        let missing = quoted_list(unresolved.missing_names());
        Diagnostic::from_code(
            file,
            start,
            length,
            diagnostic_codes::UNRESOLVED_LAMBDA_SUPER_INTERFACE,
            &[&location, &owners, &missing],
        )
    } else {
        let missing = quoted_list(unresolved.missing_names());
        Diagnostic::from_code(
            file,
            start,
            length,
            diagnostic_codes::UNRESOLVED_LAMBDA_INTERFACE,
            &[&location, &missing],
        )
    }
}

#[cfg(test)]
#[path = "../tests/collector_tests.rs"]
mod tests;
