//! Structured observability hooks for fixture runs.
//!
//! This module provides:
//! - A run-scoped tracing span via the `FixtureSpan` RAII guard
//! - Emission functions for the run lifecycle: start, evaluation burst,
//!   failed assertion, finish
//!
//! Lifecycle events are emitted at `info!`, failures at `warn!`. Nothing here
//! measures time.

use std::path::Path;
use tracing::{info, warn};

/// RAII guard that enters a span tagged with the run id and fixture path for
/// the duration of a run.
///
/// ```ignore
/// let _span = FixtureSpan::enter("5f0c…", Path::new("case.m"));
/// // every event below carries run_id and fixture
/// ```
pub struct FixtureSpan {
    _span: tracing::span::EnteredSpan,
}

impl FixtureSpan {
    pub fn enter(run_id: &str, fixture: &Path) -> Self {
        let span = tracing::info_span!(
            "mcheck.run",
            run_id = %run_id,
            fixture = %fixture.display()
        );
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: fixture read and about to be processed.
pub fn emit_fixture_started(fixture_digest: &str, repeat_count: usize) {
    info!(
        event = "fixture.started",
        fixture_digest = %fixture_digest,
        repeat_count = repeat_count,
    );
}

/// Emit event: evaluation burst finished.
pub fn emit_evaluation_finished(
    repeat_count: usize,
    defined_inputs: usize,
    defined_outputs: usize,
    occurred_errors: usize,
) {
    info!(
        event = "fixture.evaluated",
        repeat_count = repeat_count,
        defined_inputs = defined_inputs,
        defined_outputs = defined_outputs,
        occurred_errors = occurred_errors,
    );
}

/// Emit event: an assertion failed (warning level).
pub fn emit_assertion_failed(line: usize, name: &str, expected: f64, computed: f64) {
    warn!(
        event = "fixture.assertion_failed",
        line = line,
        name = %name,
        expected = expected,
        computed = computed,
    );
}

/// Emit event: fixture never reached its controls section (warning level).
pub fn emit_not_evaluated(inputs_applied: usize) {
    warn!(
        event = "fixture.not_evaluated",
        inputs_applied = inputs_applied,
        "fixture has no #CONTROLES-PRIMITIF section"
    );
}

/// Emit event: run finished.
pub fn emit_fixture_finished(evaluated: bool, assertions_checked: usize, passed: bool) {
    info!(
        event = "fixture.finished",
        evaluated = evaluated,
        assertions_checked = assertions_checked,
        passed = passed,
    );
}
