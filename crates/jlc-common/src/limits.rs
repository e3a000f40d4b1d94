//! Centralized limits and thresholds for the jlc toolchain.
//!
//! Recursion guards and synthetic-member thresholds shared between the IR and
//! the lambda pass live here so the two never disagree.

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Maximum nesting depth when walking an IR expression tree.
///
/// The collector and the site rewriter both stop descending past this depth.
/// Front ends never produce trees this deep for real sources.
pub const MAX_IR_VISIT_DEPTH: u32 = 500;

/// Maximum depth of a super-interface chain.
///
/// Interface hierarchies are acyclic on a well-formed classpath; the limit only
/// guards against a broken classpath that declares a cycle.
pub const MAX_INTERFACE_HIERARCHY_DEPTH: u32 = 64;

// =============================================================================
// Group Class Id Field Thresholds
// =============================================================================

/// Largest member id that still fits a `byte` id field.
pub const MAX_BYTE_GROUP_ID: usize = i8::MAX as usize;

/// Largest member id that still fits a `short` id field.
pub const MAX_SHORT_GROUP_ID: usize = i16::MAX as usize;
