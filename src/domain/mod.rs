pub mod pattern;
pub mod record;

pub use pattern::{LinePattern, PatternConfig, PatternError};
pub use record::{LogData, Record, RecordSet, TIME_FIELD, TransportRecord};
