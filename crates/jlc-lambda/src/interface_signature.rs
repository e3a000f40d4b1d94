//! Interface signatures: the minimal interface set a lambda must implement.
//!
//! A lambda converts to its functional interface plus any intersection-cast
//! bounds. Some of those may already be implied by others (`Closeable`
//! extends `AutoCloseable`), so the set is reduced to the interfaces no other
//! member extends, sorted by name. Lambdas with equal reduced sets implement
//! the same thing and may share a group class.

use jlc_common::limits::MAX_INTERFACE_HIERARCHY_DEPTH;
use jlc_ir::{JType, LambdaExpression, TypeHierarchy};
use rustc_hash::FxHashSet;
use std::collections::BTreeSet;
use std::fmt;

/// Interfaces that could not be found while reducing an interface set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UnresolvedInterfaces {
    /// Interfaces named directly by the lambda that are missing.
    pub declared: Vec<String>,
    /// `(interface, missing super-interface)` pairs found while walking the
    /// hierarchy of resolved interfaces.
    pub inherited: Vec<(String, String)>,
}

impl UnresolvedInterfaces {
    pub fn is_empty(&self) -> bool {
        self.declared.is_empty() && self.inherited.is_empty()
    }

    /// Every missing name, sorted and deduplicated.
    pub fn missing_names(&self) -> Vec<&str> {
        let names: BTreeSet<&str> = self
            .declared
            .iter()
            .map(String::as_str)
            .chain(self.inherited.iter().map(|(_, missing)| missing.as_str()))
            .collect();
        names.into_iter().collect()
    }
}

impl fmt::Display for UnresolvedInterfaces {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unresolved interfaces: {}", self.missing_names().join(", "))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InterfaceSignature {
    interfaces: Vec<String>,
    unique_id: String,
}

impl InterfaceSignature {
    pub fn of(
        lambda: &LambdaExpression,
        hierarchy: &dyn TypeHierarchy,
    ) -> Result<Self, UnresolvedInterfaces> {
        Self::from_names(lambda.declared_interfaces(), hierarchy)
    }

    pub fn from_names<'a>(
        names: impl IntoIterator<Item = &'a str>,
        hierarchy: &dyn TypeHierarchy,
    ) -> Result<Self, UnresolvedInterfaces> {
        let interfaces = reduce(names.into_iter().collect(), hierarchy)?;
        let unique_id = interfaces
            .iter()
            .map(|name| JType::class(name.as_str()).descriptor())
            .collect();
        Ok(Self {
            interfaces,
            unique_id,
        })
    }

    /// The reduced interfaces, sorted by binary name.
    pub fn interfaces(&self) -> &[String] {
        &self.interfaces
    }

    /// Concatenated descriptors of the reduced interfaces.
    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }
}

/// Reduced union of the interfaces implemented by all of `lambdas`.
///
/// This is the `implements` clause of a group class whose members were
/// grouped without regard to their interfaces.
pub fn normalize_interfaces<'a>(
    lambdas: impl IntoIterator<Item = &'a LambdaExpression>,
    hierarchy: &dyn TypeHierarchy,
) -> Result<Vec<String>, UnresolvedInterfaces> {
    let candidates = lambdas
        .into_iter()
        .flat_map(LambdaExpression::declared_interfaces)
        .collect();
    reduce(candidates, hierarchy)
}

/// Drop every candidate that another candidate extends, directly or not.
fn reduce(
    candidates: BTreeSet<&str>,
    hierarchy: &dyn TypeHierarchy,
) -> Result<Vec<String>, UnresolvedInterfaces> {
    let mut hidden: FxHashSet<&str> = FxHashSet::default();
    let mut unresolved = UnresolvedInterfaces::default();

    for &candidate in &candidates {
        match hierarchy.super_interfaces(candidate) {
            Some(supers) => {
                let mut reachable = FxHashSet::default();
                collect_supers(candidate, supers, hierarchy, 0, &mut reachable, &mut unresolved);
                reachable.remove(candidate);
                hidden.extend(reachable);
            }
            None => unresolved.declared.push(candidate.to_string()),
        }
    }

    if !unresolved.is_empty() {
        unresolved.inherited.sort();
        unresolved.inherited.dedup();
        return Err(unresolved);
    }

    Ok(candidates
        .into_iter()
        .filter(|name| !hidden.contains(name))
        .map(str::to_string)
        .collect())
}

fn collect_supers<'h>(
    owner: &str,
    supers: &'h [String],
    hierarchy: &'h dyn TypeHierarchy,
    depth: u32,
    reachable: &mut FxHashSet<&'h str>,
    unresolved: &mut UnresolvedInterfaces,
) {
    if depth >= MAX_INTERFACE_HIERARCHY_DEPTH {
        return;
    }
    for name in supers {
        let name = name.as_str();
        if !reachable.insert(name) {
            continue;
        }
        match hierarchy.super_interfaces(name) {
            Some(next) => collect_supers(name, next, hierarchy, depth + 1, reachable, unresolved),
            None => unresolved
                .inherited
                .push((owner.to_string(), name.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "../tests/interface_signature_tests.rs"]
mod tests;
