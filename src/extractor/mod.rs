//! Reads the configured log file and turns it into a [`RecordSet`].
//!
//! Every request does its own pass over the file. The file is treated as
//! append-only by an external writer, so no locking is done; a partially
//! written final line simply fails to match and is counted as malformed.

use crate::config::Settings;
use crate::domain::{LinePattern, PatternConfig, PatternError, RecordSet, TIME_FIELD};
use crate::parser::{parse_line, record_time};
use crate::port::{DiagnosticSink, ExtractionDiagnostic};
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Invalid line pattern: {0}")]
    Pattern(#[from] PatternError),

    #[error("Failed to read log file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Outcome of running the parser over a sequence of lines.
#[derive(Debug, Default)]
pub struct Extraction {
    pub records: RecordSet,
    pub malformed: usize,
    pub untimed: usize,
}

/// Parse `lines` in order, keeping matches strictly after `since`.
///
/// Blank lines are skipped without being counted.
pub fn extract_lines<'a, I>(lines: I, config: &PatternConfig, since: Option<NaiveDateTime>) -> Extraction
where
    I: IntoIterator<Item = &'a str>,
{
    let mut extraction = Extraction::default();

    for line in lines {
        if line.trim().is_empty() {
            continue;
        }

        let record = match parse_line(Some(line), Some(config)) {
            Ok(record) if record.is_match() => record,
            _ => {
                extraction.malformed += 1;
                continue;
            }
        };

        let Some(since) = since else {
            extraction.records.push(record);
            continue;
        };

        match record_time(&record) {
            Ok(time) if time > since => extraction.records.push(record),
            Ok(_) => {}
            Err(_) => extraction.untimed += 1,
        }
    }

    extraction
}

pub struct LogExtractor {
    log_file: PathBuf,
    pattern: LinePattern,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl LogExtractor {
    pub fn new(
        log_file: impl Into<PathBuf>,
        pattern: LinePattern,
        diagnostics: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            log_file: log_file.into(),
            pattern,
            diagnostics,
        }
    }

    pub fn from_settings(settings: &Settings, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        Self::new(
            settings.log_file_path.clone(),
            settings.line_pattern.clone(),
            diagnostics,
        )
    }

    pub fn log_file(&self) -> &Path {
        &self.log_file
    }

    pub async fn extract_all(&self) -> Result<RecordSet, ExtractionError> {
        self.extract_since(None).await
    }

    /// Records whose time field is strictly after `since`, or every matching
    /// record when `since` is `None`.
    ///
    /// Filtering with a pattern that has no time field is an error.
    pub async fn extract_since(
        &self,
        since: Option<NaiveDateTime>,
    ) -> Result<RecordSet, ExtractionError> {
        // compiled per call; the request rate is low
        let config = self.pattern.compile()?;
        if since.is_some() && !config.has_field(TIME_FIELD) {
            return Err(PatternError::MissingField(TIME_FIELD).into());
        }

        let contents = tokio::fs::read_to_string(&self.log_file)
            .await
            .map_err(|source| ExtractionError::Io {
                path: self.log_file.clone(),
                source,
            })?;

        let extraction = extract_lines(contents.lines(), &config, since);

        if extraction.malformed > 0 || extraction.untimed > 0 {
            self.diagnostics.report(&ExtractionDiagnostic {
                source: self.log_file.clone(),
                malformed: extraction.malformed,
                untimed: extraction.untimed,
            });
        }

        debug!(
            records = extraction.records.len(),
            since = ?since,
            "Extracted records from {}",
            self.log_file.display()
        );

        Ok(extraction.records)
    }
}
