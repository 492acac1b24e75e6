pub mod diagnostics;

pub use diagnostics::{DiagnosticSink, ExtractionDiagnostic};
