use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Field carrying the request time, e.g. `2016-06-23T17:50:27.468 +0100`.
pub const TIME_FIELD: &str = "localDateTime";

/// One parsed log line.
///
/// An empty field map means the line did not match the configured pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: HashMap<String, String>,
}

impl Record {
    pub fn new(fields: HashMap<String, String>) -> Self {
        Self { fields }
    }

    /// The "did not match" record.
    pub fn unmatched() -> Self {
        Self::default()
    }

    pub fn is_match(&self) -> bool {
        !self.fields.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn fields(&self) -> &HashMap<String, String> {
        &self.fields
    }

    pub fn local_date_time(&self) -> Option<&str> {
        self.get(TIME_FIELD)
    }
}

/// Records in file order.
pub type RecordSet = Vec<Record>;

/// Wire shape of a single record: field name to value.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct TransportRecord(pub HashMap<String, String>);

impl From<&Record> for TransportRecord {
    fn from(record: &Record) -> Self {
        Self(record.fields.clone())
    }
}

/// Response body of `GET /log`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct LogData {
    pub lines: Vec<TransportRecord>,
}

impl LogData {
    pub fn from_records(records: &[Record]) -> Self {
        Self {
            lines: records.iter().map(TransportRecord::from).collect(),
        }
    }
}
