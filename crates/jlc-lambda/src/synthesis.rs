//! Per-lambda results of group class synthesis, consumed by site rewriting.

use crate::capture_signature::CaptureMapping;
use crate::collection::StableId;
use jlc_ir::{JType, PrimitiveKind};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// How one lambda site is replaced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LambdaSynthesis {
    /// Binary name of the group class.
    pub group_class: String,
    /// Original capture position -> constructor argument slot (after the id).
    pub mapping: CaptureMapping,
    /// Member id and the id field's type; absent for single-member groups.
    pub member_id: Option<(i64, PrimitiveKind)>,
    /// Static field holding the shared instance, for stateless lambdas.
    pub singleton_field: Option<String>,
    /// Constructor parameter types, id first when present.
    pub constructor_params: Arc<[JType]>,
}

/// Stable id -> synthesis, built once after every group is finalized and read
/// concurrently by site rewriting.
#[derive(Debug, Default)]
pub struct SynthesisTable {
    entries: FxHashMap<StableId, LambdaSynthesis>,
}

impl SynthesisTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Panics
    /// If `id` already has an entry.
    pub fn insert(&mut self, id: StableId, synthesis: LambdaSynthesis) {
        let previous = self.entries.insert(id, synthesis);
        assert!(
            previous.is_none(),
            "BUG: lambda synthesized into more than one group class"
        );
    }

    pub fn get(&self, id: &StableId) -> Option<&LambdaSynthesis> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
