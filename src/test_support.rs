//! Shared test support utilities
//!
//! Provides a `MockDiagnostics` sink that records every report, for use in
//! unit and integration tests.

use crate::port::{DiagnosticSink, ExtractionDiagnostic};
use std::sync::{Arc, Mutex};

/// Diagnostic sink that captures reports for testing.
pub struct MockDiagnostics {
    reports: Arc<Mutex<Vec<ExtractionDiagnostic>>>,
}

impl MockDiagnostics {
    pub fn new() -> Self {
        Self {
            reports: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn reports(&self) -> Vec<ExtractionDiagnostic> {
        self.reports.lock().unwrap().clone()
    }
}

impl Default for MockDiagnostics {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticSink for MockDiagnostics {
    fn report(&self, diagnostic: &ExtractionDiagnostic) {
        self.reports.lock().unwrap().push(diagnostic.clone());
    }
}
