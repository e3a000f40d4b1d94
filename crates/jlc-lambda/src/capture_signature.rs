//! Capture signatures: what a lambda closes over, reduced to kind counts.
//!
//! Two lambdas can share a group class only if their captured state fits the
//! same field layout. A group class stores captures in one field per slot,
//! slots ordered by [`CaptureKind`] (all booleans first, then bytes, ... then
//! references). A [`CaptureSignature`] counts captures per kind; equal
//! signatures mean equal layouts.

use jlc_ir::{JType, LambdaExpression, PrimitiveKind};
use smallvec::SmallVec;
use std::fmt::Write as _;

/// Storage class of one captured value.
///
/// Declaration order is the slot order of a group class's capture fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CaptureKind {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    /// Any class, interface or array type; stored as `java.lang.Object`.
    Reference,
}

impl CaptureKind {
    pub const COUNT: usize = 9;

    pub const ALL: [Self; Self::COUNT] = [
        Self::Boolean,
        Self::Byte,
        Self::Char,
        Self::Short,
        Self::Int,
        Self::Long,
        Self::Float,
        Self::Double,
        Self::Reference,
    ];

    /// Kind of a captured value's type.
    ///
    /// # Panics
    /// `void` is never a capture type.
    pub fn of(ty: &JType) -> Self {
        match ty {
            JType::Primitive(kind) => Self::from_primitive(*kind),
            JType::Class(_) | JType::Array(_) => Self::Reference,
            JType::Void => panic!("BUG: a lambda cannot capture a value of type void"),
        }
    }

    pub const fn from_primitive(kind: PrimitiveKind) -> Self {
        match kind {
            PrimitiveKind::Boolean => Self::Boolean,
            PrimitiveKind::Byte => Self::Byte,
            PrimitiveKind::Char => Self::Char,
            PrimitiveKind::Short => Self::Short,
            PrimitiveKind::Int => Self::Int,
            PrimitiveKind::Long => Self::Long,
            PrimitiveKind::Float => Self::Float,
            PrimitiveKind::Double => Self::Double,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Declared type of a capture field of this kind.
    pub fn field_type(self) -> JType {
        match self {
            Self::Boolean => JType::Primitive(PrimitiveKind::Boolean),
            Self::Byte => JType::Primitive(PrimitiveKind::Byte),
            Self::Char => JType::Primitive(PrimitiveKind::Char),
            Self::Short => JType::Primitive(PrimitiveKind::Short),
            Self::Int => JType::Primitive(PrimitiveKind::Int),
            Self::Long => JType::Primitive(PrimitiveKind::Long),
            Self::Float => JType::Primitive(PrimitiveKind::Float),
            Self::Double => JType::Primitive(PrimitiveKind::Double),
            Self::Reference => JType::object(),
        }
    }
}

/// Per-kind capture counts of a lambda, the implicit `this` included.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CaptureSignature {
    counts: [u32; CaptureKind::COUNT],
}

/// Maps each original capture position to its slot in the group class layout.
pub type CaptureMapping = SmallVec<[usize; 8]>;

impl CaptureSignature {
    pub fn of(lambda: &LambdaExpression) -> Self {
        Self::from_types(lambda.capture_types())
    }

    pub fn from_types<'a>(types: impl IntoIterator<Item = &'a JType>) -> Self {
        let mut counts = [0u32; CaptureKind::COUNT];
        for ty in types {
            counts[CaptureKind::of(ty).index()] += 1;
        }
        Self { counts }
    }

    pub const fn count(&self, kind: CaptureKind) -> u32 {
        self.counts[kind.index()]
    }

    /// Total number of capture slots.
    pub fn total_count(&self) -> usize {
        self.counts.iter().map(|&c| c as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Canonical string form; equal signatures and only equal signatures
    /// produce equal ids.
    ///
    /// Every kind contributes a fixed-width field, so the id also sorts in a
    /// stable, locale-independent way.
    pub fn unique_id(&self) -> String {
        let mut id = String::with_capacity(CaptureKind::COUNT * 4);
        for count in self.counts {
            let _ = write!(id, "{count:04x}");
        }
        id
    }

    /// Kind of every slot in layout order.
    pub fn slot_kinds(&self) -> impl Iterator<Item = CaptureKind> + '_ {
        CaptureKind::ALL
            .into_iter()
            .flat_map(|kind| std::iter::repeat_n(kind, self.count(kind) as usize))
    }

    /// Field types of all slots in layout order.
    pub fn field_types(&self) -> Vec<JType> {
        self.slot_kinds().map(CaptureKind::field_type).collect()
    }

    /// First slot index of each kind.
    fn slot_offsets(&self) -> [usize; CaptureKind::COUNT] {
        let mut offsets = [0usize; CaptureKind::COUNT];
        let mut next = 0;
        for (offset, count) in offsets.iter_mut().zip(self.counts) {
            *offset = next;
            next += count as usize;
        }
        offsets
    }

    /// Slot assignment for `lambda`'s captures.
    ///
    /// Captures of the same kind keep their relative order, so the mapping is
    /// a bijection from original positions onto `0..total_count()`.
    ///
    /// # Panics
    /// If `lambda` does not have this signature.
    pub fn create_mapping(&self, lambda: &LambdaExpression) -> CaptureMapping {
        let types = lambda.capture_types();
        assert_eq!(
            Self::from_types(types.iter().copied()),
            *self,
            "BUG: capture mapping requested for a lambda of a different capture signature"
        );

        let mut next_slot = self.slot_offsets();
        types
            .iter()
            .map(|ty| {
                let kind = CaptureKind::of(ty).index();
                let slot = next_slot[kind];
                next_slot[kind] += 1;
                slot
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../tests/capture_signature_tests.rs"]
mod tests;
