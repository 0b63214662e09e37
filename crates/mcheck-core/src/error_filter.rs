//! Diagnostic catalog records and the occurred-error filter.

use crate::error::{HarnessError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum widths of catalog fields, in characters.
pub const MAJOR_CODE_WIDTH: usize = 3;
pub const MINOR_CODE_WIDTH: usize = 6;
pub const DESCRIPTION_WIDTH: usize = 80;
pub const CLASSIFICATION_WIDTH: usize = 1;

/// Classification of a diagnostic.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    #[serde(rename = "A")]
    Anomaly,
    #[serde(rename = "D")]
    Discordance,
    #[serde(rename = "I")]
    Information,
}

impl ErrorKind {
    /// Catalog code for this kind.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Anomaly => "A",
            ErrorKind::Discordance => "D",
            ErrorKind::Information => "I",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "A" => Some(ErrorKind::Anomaly),
            "D" => Some(ErrorKind::Discordance),
            "I" => Some(ErrorKind::Information),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One entry of an engine's static diagnostic catalog.
///
/// `occurred` is written by the engine during evaluation and only read here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorRecord {
    pub kind: ErrorKind,
    pub major_code: String,
    pub minor_code: String,
    pub description: String,
    pub classification: String,
    #[serde(default)]
    pub occurred: bool,
}

impl ErrorRecord {
    pub fn new(
        kind: ErrorKind,
        major_code: impl Into<String>,
        minor_code: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            major_code: major_code.into(),
            minor_code: minor_code.into(),
            description: description.into(),
            classification: String::new(),
            occurred: false,
        }
    }

    pub fn with_classification(mut self, classification: impl Into<String>) -> Self {
        self.classification = classification.into();
        self
    }

    pub fn occurred(mut self, occurred: bool) -> Self {
        self.occurred = occurred;
        self
    }

    /// Full code, e.g. `A000001`.
    pub fn code(&self) -> String {
        format!("{}{}{}", self.kind.code(), self.major_code, self.minor_code)
    }

    /// Check field widths against the catalog layout.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("major_code", &self.major_code, MAJOR_CODE_WIDTH),
            ("minor_code", &self.minor_code, MINOR_CODE_WIDTH),
            ("description", &self.description, DESCRIPTION_WIDTH),
            ("classification", &self.classification, CLASSIFICATION_WIDTH),
        ];
        for (field, value, width) in fields {
            let len = value.chars().count();
            if len > width {
                return Err(HarnessError::Engine(format!(
                    "error record {}: {} is {} characters, limit is {}",
                    self.code(),
                    field,
                    len,
                    width
                )));
            }
        }
        Ok(())
    }
}

/// Records of a catalog that occurred during the last evaluation, in
/// catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccurredErrors<'a> {
    records: Vec<&'a ErrorRecord>,
}

impl<'a> OccurredErrors<'a> {
    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[&'a ErrorRecord] {
        &self.records
    }

    pub fn to_owned_records(&self) -> Vec<ErrorRecord> {
        self.records.iter().map(|r| (*r).clone()).collect()
    }
}

/// Number of records in `catalog` whose `occurred` flag is set.
pub fn count_occurred(catalog: &[ErrorRecord]) -> usize {
    catalog.iter().filter(|r| r.occurred).count()
}

/// Order-preserving subsequence of `catalog` whose `occurred` flag is set.
pub fn occurred_errors(catalog: &[ErrorRecord]) -> OccurredErrors<'_> {
    OccurredErrors {
        records: catalog.iter().filter(|r| r.occurred).collect(),
    }
}
