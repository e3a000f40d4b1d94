//! The shared, concurrently-filled index of lambdas by group key.
//!
//! Collection runs one task per method; every task inserts into the same
//! [`LambdaCollection`]. Once all tasks have finished the collection is
//! consumed by [`LambdaCollection::into_groups`], which sorts keys and
//! members so that class names and member ids never depend on which task
//! happened to run first.

use crate::capture_signature::CaptureSignature;
use crate::interface_signature::InterfaceSignature;
use crate::options::LambdaOptions;
use dashmap::DashMap;
use jlc_ir::types::{package_of, qualify, top_level_of};
use jlc_ir::{LambdaExpression, PrimitiveKind};
use jlc_common::limits::{MAX_BYTE_GROUP_ID, MAX_SHORT_GROUP_ID};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

// =============================================================================
// Keys
// =============================================================================

/// Stable identity of a lambda site: enclosing type, enclosing method and the
/// lambda's position among that method's lambdas in source order.
///
/// Identical input always yields identical ids, whatever the scheduling.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StableId {
    pub enclosing_type: String,
    /// Method name plus descriptor.
    pub method: String,
    pub ordinal: u32,
}

impl StableId {
    pub fn new(enclosing_type: impl Into<String>, method: impl Into<String>, ordinal: u32) -> Self {
        Self {
            enclosing_type: enclosing_type.into(),
            method: method.into(),
            ordinal,
        }
    }
}

impl fmt::Display for StableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};;{};;{}", self.enclosing_type, self.method, self.ordinal)
    }
}

/// Key under which compatible lambdas are grouped.
///
/// Ordered field by field, which is the order group class ids follow.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey {
    /// [`CaptureSignature::unique_id`].
    pub capture: String,
    /// [`InterfaceSignature::unique_id`], or empty when interfaces are merged.
    pub interfaces: String,
    /// Grouping-scope id: stable id, top-level type or package.
    pub scope: String,
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.capture, self.interfaces, self.scope)
    }
}

// =============================================================================
// Collection
// =============================================================================

/// A lambda together with the signatures computed when it was collected.
#[derive(Clone, Debug)]
pub struct CollectedLambda {
    pub lambda: Arc<LambdaExpression>,
    pub capture: CaptureSignature,
    pub interfaces: InterfaceSignature,
}

/// Group key -> stable id -> lambda.
///
/// Safe for concurrent insertion from many tasks; inserting the same stable id
/// twice keeps the first entry.
#[derive(Debug, Default)]
pub struct LambdaCollection {
    groups: DashMap<GroupKey, DashMap<StableId, CollectedLambda>>,
}

impl LambdaCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: GroupKey, id: StableId, lambda: CollectedLambda) {
        let members = match self.groups.get(&key) {
            Some(members) => members,
            None => self.groups.entry(key).or_default().downgrade(),
        };
        members.entry(id).or_insert(lambda);
    }

    /// Number of distinct group keys.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Number of collected lambdas over all groups.
    pub fn lambda_count(&self) -> usize {
        self.groups.iter().map(|members| members.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn contains(&self, id: &StableId) -> bool {
        self.groups.iter().any(|members| members.contains_key(id))
    }

    /// Turn the collection into ordered groups with their class names.
    ///
    /// Must only run after every collection task has finished.
    pub fn into_groups(self, options: &LambdaOptions) -> Vec<LambdaGroup> {
        let mut keyed: Vec<(GroupKey, Vec<GroupMember>)> = self
            .groups
            .into_iter()
            .map(|(key, members)| {
                let mut members: Vec<GroupMember> = members
                    .into_iter()
                    .map(|(id, collected)| GroupMember { id, collected })
                    .collect();
                members.sort_by(|a, b| a.id.cmp(&b.id));
                (key, members)
            })
            .filter(|(_, members)| !members.is_empty())
            .collect();
        keyed.sort_by(|a, b| a.0.cmp(&b.0));

        let packages: Vec<&str> = keyed
            .iter()
            .map(|(_, members)| group_package(&members[0].id))
            .collect();
        let names = group_class_names(&packages, &options.group_class_prefix);

        keyed
            .into_iter()
            .zip(names)
            .enumerate()
            .map(|(index, ((key, members), class_name))| {
                let capture = members[0].collected.capture;
                debug!(
                    group = %class_name,
                    key = %key,
                    members = members.len(),
                    "created lambda group"
                );
                LambdaGroup {
                    id: GroupId(index as u32),
                    key,
                    class_name,
                    capture,
                    members,
                }
            })
            .collect()
    }
}

/// Package a group class is placed in: that of its members' top-level type.
///
/// All members of a group share it under every grouping scope.
fn group_package(id: &StableId) -> &str {
    package_of(top_level_of(&id.enclosing_type))
}

/// Binary names of group classes, given each group's package in sorted key
/// order.
///
/// The id of the `n`-th group is `n`, so names are a pure function of the
/// sorted keys.
pub fn group_class_names(packages: &[&str], prefix: &str) -> Vec<String> {
    packages
        .iter()
        .enumerate()
        .map(|(id, package)| qualify(package, &format!("{prefix}{id}")))
        .collect()
}

// =============================================================================
// Groups
// =============================================================================

/// Index of a group in the list returned by [`LambdaCollection::into_groups`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub u32);

#[derive(Clone, Debug)]
pub struct GroupMember {
    pub id: StableId,
    pub collected: CollectedLambda,
}

impl GroupMember {
    pub fn lambda(&self) -> &LambdaExpression {
        &self.collected.lambda
    }
}

/// Lambdas that will share one synthesized class.
#[derive(Clone, Debug)]
pub struct LambdaGroup {
    pub id: GroupId,
    pub key: GroupKey,
    pub class_name: String,
    /// Shared by every member.
    pub capture: CaptureSignature,
    /// Sorted by stable id; a member's index is its member id.
    pub members: Vec<GroupMember>,
}

impl LambdaGroup {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether instances must carry a member id to select their behavior.
    pub fn needs_id_field(&self) -> bool {
        self.members.len() > 1
    }

    /// Narrowest integral type holding every member id.
    pub fn id_type(&self) -> PrimitiveKind {
        let max_id = self.members.len().saturating_sub(1);
        if max_id <= MAX_BYTE_GROUP_ID {
            PrimitiveKind::Byte
        } else if max_id <= MAX_SHORT_GROUP_ID {
            PrimitiveKind::Short
        } else {
            PrimitiveKind::Int
        }
    }

    pub fn member_index(&self, id: &StableId) -> Option<usize> {
        self.members.binary_search_by(|m| m.id.cmp(id)).ok()
    }
}

#[cfg(test)]
#[path = "../tests/collection_tests.rs"]
mod tests;
