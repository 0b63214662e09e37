//! Expected-output checks with the undefined-as-zero policy.

use crate::error::Result;
use crate::fixture::OutputAssertion;
use crate::value::SlotVector;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// First disagreement between an expected and a computed output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Mismatch {
    pub fixture: PathBuf,
    pub name: String,
    pub expected: f64,
    pub computed: f64,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Testing file: {}", self.fixture.display())?;
        write!(
            f,
            "Expected value for {} : {:.4}, computed {:.4}!",
            self.name, self.expected, self.computed
        )
    }
}

/// Checks assertions against the output vector of one evaluation.
pub struct Comparator<'a> {
    fixture: &'a Path,
    outputs: &'a SlotVector,
}

impl<'a> Comparator<'a> {
    pub fn new(fixture: &'a Path, outputs: &'a SlotVector) -> Self {
        Self { fixture, outputs }
    }

    /// `Ok(None)` when the computed value equals the expected one exactly.
    ///
    /// Undefined outputs compare as `0.0`. There is no tolerance.
    pub fn check(&self, assertion: &OutputAssertion) -> Result<Option<Mismatch>> {
        let computed = self.outputs.read(assertion.slot)?.normalized();
        if computed == assertion.expected {
            return Ok(None);
        }
        Ok(Some(Mismatch {
            fixture: self.fixture.to_path_buf(),
            name: assertion.name.clone(),
            expected: assertion.expected,
            computed,
        }))
    }
}
