//! Session-wide diagnostic sink shared by parallel collection tasks.

use jlc_common::Diagnostic;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// Collects diagnostics from every task and remembers whether any of them
/// was fatal.
///
/// Tasks accumulate their own diagnostics and hand them over once, when the
/// task is done.
#[derive(Debug, Default)]
pub struct SessionReporter {
    diagnostics: Mutex<Vec<Diagnostic>>,
    aborted: AtomicBool,
}

impl SessionReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report_all(&self, diagnostics: Vec<Diagnostic>) {
        if diagnostics.is_empty() {
            return;
        }
        if diagnostics.iter().any(Diagnostic::is_fatal) {
            self.aborted.store(true, Ordering::Release);
        }
        let mut sink = self
            .diagnostics
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        sink.extend(diagnostics);
    }

    /// Whether a fatal diagnostic has been reported.
    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::Acquire)
    }

    pub fn diagnostic_count(&self) -> usize {
        self.diagnostics
            .lock()
            .map_or(0, |diagnostics| diagnostics.len())
    }

    /// All reported diagnostics, ordered by file and position.
    ///
    /// Arrival order depends on scheduling, so it is not kept.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        let mut diagnostics = self
            .diagnostics
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        diagnostics.sort_by(|a, b| {
            (a.file.as_str(), a.start, a.code, a.message_text.as_str()).cmp(&(
                b.file.as_str(),
                b.start,
                b.code,
                b.message_text.as_str(),
            ))
        });
        diagnostics
    }
}
