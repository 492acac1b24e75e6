use crate::port::{DiagnosticSink, ExtractionDiagnostic};
use tracing::warn;

/// Emits each diagnostic as a single `warn` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl DiagnosticSink for TracingDiagnostics {
    fn report(&self, diagnostic: &ExtractionDiagnostic) {
        warn!(
            source = %diagnostic.source.display(),
            malformed = diagnostic.malformed,
            untimed = diagnostic.untimed,
            "Dropped {} unparsable log lines",
            diagnostic.total()
        );
    }
}
