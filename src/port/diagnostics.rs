//! DiagnosticSink trait for reporting lines an extraction pass had to drop.
//!
//! Injected into the extractor so tests can capture reports instead of
//! reading log output.

use std::path::PathBuf;

/// Aggregate of the lines dropped during one extraction pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionDiagnostic {
    /// Log file that was read.
    pub source: PathBuf,
    /// Non-blank lines that did not match the pattern.
    pub malformed: usize,
    /// Matching lines dropped under a time filter because their time field
    /// was missing or unreadable.
    pub untimed: usize,
}

impl ExtractionDiagnostic {
    pub fn total(&self) -> usize {
        self.malformed + self.untimed
    }
}

/// Receives at most one diagnostic per extraction pass.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: &ExtractionDiagnostic);
}
