use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Separator between field names in the configured pattern.
pub const NAME_SEPARATOR: char = ';';

#[derive(Error, Debug, Clone)]
pub enum PatternError {
    #[error("Line pattern has no field names")]
    EmptyNames,

    #[error("Line pattern has no regular expression")]
    EmptyRegexp,

    #[error("Line pattern regexp '{pattern}' failed to compile: {source}")]
    CompilationFailed {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Line pattern declares {names} field names but the regexp has {groups} capture groups")]
    GroupCountMismatch { names: usize, groups: usize },

    #[error("Line pattern has no '{0}' field, required to filter by time")]
    MissingField(&'static str),
}

/// Raw line pattern as it appears in configuration: `;`-separated names plus
/// one regular expression.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinePattern {
    #[serde(default)]
    pub names: String,
    #[serde(default)]
    pub regexp: String,
}

impl LinePattern {
    pub fn new(names: impl Into<String>, regexp: impl Into<String>) -> Self {
        Self {
            names: names.into(),
            regexp: regexp.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.names.trim().is_empty() && !self.regexp.trim().is_empty()
    }

    /// Compile into a [`PatternConfig`].
    pub fn compile(&self) -> Result<PatternConfig, PatternError> {
        let names: Vec<String> = self
            .names
            .split(NAME_SEPARATOR)
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();
        PatternConfig::new(names, self.regexp.trim())
    }
}

/// Compiled pattern with ordered field names.
///
/// Capture group `i` of a successful match is stored under `field_names[i - 1]`.
/// The regexp is anchored at both ends on construction, so only whole-line
/// matches succeed.
#[derive(Debug, Clone)]
pub struct PatternConfig {
    field_names: Vec<String>,
    regex: Regex,
}

impl PatternConfig {
    pub fn new(field_names: Vec<String>, pattern: &str) -> Result<Self, PatternError> {
        if field_names.is_empty() {
            return Err(PatternError::EmptyNames);
        }
        if pattern.is_empty() {
            return Err(PatternError::EmptyRegexp);
        }

        let anchored = format!("^(?:{pattern})$");
        let regex = Regex::new(&anchored).map_err(|source| PatternError::CompilationFailed {
            pattern: pattern.to_string(),
            source,
        })?;

        // captures_len() counts the implicit whole-match group
        let groups = regex.captures_len() - 1;
        if groups != field_names.len() {
            return Err(PatternError::GroupCountMismatch {
                names: field_names.len(),
                groups,
            });
        }

        Ok(Self { field_names, regex })
    }

    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field_names.iter().any(|n| n == name)
    }
}
