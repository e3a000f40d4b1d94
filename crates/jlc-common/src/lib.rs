//! Common types and utilities for the jlc compiler toolchain.
//!
//! This crate provides foundational types used across all jlc crates:
//! - Diagnostics (`Diagnostic`, `DiagnosticCategory`, codes and message templates)
//! - Source spans (`Span`)
//! - Compiler limits and thresholds

// Diagnostics - user-facing error reporting
pub mod diagnostics;
pub use diagnostics::{
    Diagnostic, DiagnosticCategory, DiagnosticRelatedInformation, diagnostic_codes,
    format_message, get_message_template,
};

// Span - Source location tracking
pub mod span;
pub use span::Span;

// Centralized limits and thresholds
pub mod limits;
