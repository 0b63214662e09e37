//! One fixture, one parse pass, one evaluation burst, one comparison pass.

use crate::comparator::{Comparator, Mismatch};
use crate::config::HarnessConfig;
use crate::driver::EvaluationDriver;
use crate::engine::Engine;
use crate::error::{HarnessError, Result};
use crate::error_filter::{occurred_errors, ErrorRecord};
use crate::fixture::{FixtureEvent, FixtureReader, Section};
use crate::obs::{
    emit_assertion_failed, emit_fixture_finished, emit_fixture_started, emit_not_evaluated,
    FixtureSpan,
};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

/// What happened while running one fixture.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub run_id: Uuid,
    pub fixture: PathBuf,

    /// SHA-256 of the fixture bytes, hex encoded.
    pub fixture_digest: String,

    pub repeat_count: usize,

    /// Whether `#CONTROLES-PRIMITIF` was reached and the engine ran.
    pub evaluated: bool,

    pub inputs_applied: usize,

    /// Assertions compared, including a failing one.
    pub assertions_checked: usize,

    pub final_section: Section,

    /// First failed assertion. Nothing after it was read.
    pub mismatch: Option<Mismatch>,

    /// Records flagged by the last evaluation, in catalog order.
    pub occurred_errors: Vec<ErrorRecord>,
}

impl RunOutcome {
    pub fn passed(&self) -> bool {
        self.mismatch.is_none()
    }

    /// Turn a recorded mismatch into [`HarnessError::Mismatch`].
    pub fn into_result(self) -> Result<Self> {
        match self.mismatch {
            Some(mismatch) => Err(HarnessError::Mismatch(mismatch)),
            None => Ok(self),
        }
    }
}

/// Read fixture bytes.
///
/// Any failure to open the file is [`HarnessError::FixtureNotFound`],
/// whatever the OS reason. Failures after a successful open are
/// [`HarnessError::Io`].
pub fn read_fixture(path: &Path) -> Result<Vec<u8>> {
    let mut file = File::open(path).map_err(|e| {
        debug!(path = %path.display(), error = %e, "fixture open failed");
        HarnessError::FixtureNotFound(path.to_path_buf())
    })?;

    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|source| HarnessError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(bytes)
}

/// Hex SHA-256 of fixture contents.
pub fn fixture_digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Run the fixture at `path` against `engine`.
///
/// A failed assertion is not an `Err`: it is recorded in the outcome, which
/// callers turn into an error with [`RunOutcome::into_result`] once they are
/// done reporting.
pub fn run_fixture<E: Engine>(
    engine: &E,
    path: &Path,
    config: &HarnessConfig,
) -> Result<RunOutcome> {
    config.validate()?;
    let bytes = read_fixture(path)?;
    run_fixture_bytes(engine, path, &bytes, config)
}

/// Run fixture contents already in memory. `path` is only used for
/// reporting.
pub fn run_fixture_bytes<E: Engine>(
    engine: &E,
    path: &Path,
    bytes: &[u8],
    config: &HarnessConfig,
) -> Result<RunOutcome> {
    let run_id = Uuid::new_v4();
    let digest = fixture_digest(bytes);
    let text = String::from_utf8_lossy(bytes);

    let _span = FixtureSpan::enter(&run_id.to_string(), path);
    emit_fixture_started(&digest, config.repeat_count);

    let mut driver = EvaluationDriver::new(engine, config.repeat_count);
    let mut reader = FixtureReader::new(&text, engine);
    let mut assertions_checked = 0;
    let mut mismatch = None;

    for event in reader.by_ref() {
        match event? {
            FixtureEvent::Assign(assignment) => driver.assign(&assignment)?,
            FixtureEvent::Evaluate => {
                driver.evaluate()?;
            }
            FixtureEvent::Assert(assertion) => {
                assertions_checked += 1;
                let comparator = Comparator::new(path, driver.outputs());
                if let Some(failed) = comparator.check(&assertion)? {
                    emit_assertion_failed(
                        assertion.line,
                        &assertion.name,
                        failed.expected,
                        failed.computed,
                    );
                    mismatch = Some(failed);
                    break;
                }
            }
        }
    }

    let evaluated = driver.has_evaluated();
    if !evaluated {
        emit_not_evaluated(driver.assignments_applied());
    }

    let outcome = RunOutcome {
        run_id,
        fixture: path.to_path_buf(),
        fixture_digest: digest,
        repeat_count: driver.repeat_count(),
        evaluated,
        inputs_applied: driver.assignments_applied(),
        assertions_checked,
        final_section: reader.section(),
        occurred_errors: occurred_errors(driver.error_catalog()).to_owned_records(),
        mismatch,
    };
    emit_fixture_finished(outcome.evaluated, outcome.assertions_checked, outcome.passed());
    Ok(outcome)
}
