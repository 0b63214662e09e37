//! Run reports: a versioned JSON record of one fixture run.

use crate::comparator::Mismatch;
use crate::error::{HarnessError, Result};
use crate::error_filter::ErrorRecord;
use crate::fixture::Section;
use crate::harness::RunOutcome;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const RUN_REPORT_SCHEMA: &str = "mcheck.run_report.v1";

/// JSON artifact describing one fixture run. Carries no timing data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunReport {
    pub schema_version: String,
    pub run_id: String,
    pub fixture: PathBuf,
    pub fixture_digest: String,
    pub repeat_count: usize,
    pub evaluated: bool,
    pub inputs_applied: usize,
    pub assertions_checked: usize,
    pub final_section: Section,
    pub passed: bool,
    pub mismatch: Option<Mismatch>,
    pub occurred_errors: Vec<ErrorRecord>,
}

impl RunReport {
    pub fn from_outcome(outcome: &RunOutcome) -> Self {
        Self {
            schema_version: RUN_REPORT_SCHEMA.to_string(),
            run_id: outcome.run_id.to_string(),
            fixture: outcome.fixture.clone(),
            fixture_digest: outcome.fixture_digest.clone(),
            repeat_count: outcome.repeat_count,
            evaluated: outcome.evaluated,
            inputs_applied: outcome.inputs_applied,
            assertions_checked: outcome.assertions_checked,
            final_section: outcome.final_section,
            passed: outcome.passed(),
            mismatch: outcome.mismatch.clone(),
            occurred_errors: outcome.occurred_errors.clone(),
        }
    }
}

/// Write the run report as pretty JSON, creating parent directories.
pub fn write_run_report(path: &Path, report: &RunReport) -> Result<()> {
    let content = serde_json::to_string_pretty(report)?;
    let io_err = |source| HarnessError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, content).map_err(io_err)?;
    Ok(())
}
