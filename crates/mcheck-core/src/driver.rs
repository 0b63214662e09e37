//! Evaluation driver: dense vectors in, repeated evaluation, dense vectors out.

use crate::engine::Engine;
use crate::error::Result;
use crate::error_filter::{count_occurred, ErrorRecord};
use crate::fixture::InputAssignment;
use crate::obs::emit_evaluation_finished;
use crate::value::SlotVector;
use std::hint::black_box;
use tracing::debug;

/// Owns the input/output vectors of one evaluation against `engine`.
///
/// Vectors are sized from the engine's input and output counts separately
/// and start fully undefined.
pub struct EvaluationDriver<'e, E: Engine> {
    engine: &'e E,
    repeat_count: usize,
    inputs: SlotVector,
    outputs: SlotVector,
    last_output: Option<E::Output>,
    assignments_applied: usize,
}

impl<'e, E: Engine> EvaluationDriver<'e, E> {
    pub fn new(engine: &'e E, repeat_count: usize) -> Self {
        Self {
            engine,
            repeat_count: repeat_count.max(1),
            inputs: SlotVector::undefined(engine.input_count()),
            outputs: SlotVector::undefined(engine.output_count()),
            last_output: None,
            assignments_applied: 0,
        }
    }

    /// Write the engine literal for `assignment` into its input slot.
    pub fn assign(&mut self, assignment: &InputAssignment) -> Result<()> {
        let value = self.engine.literal(assignment.value);
        self.inputs.write(assignment.slot, value)?;
        self.assignments_applied += 1;
        debug!(
            name = %assignment.name,
            slot = %assignment.slot,
            value = assignment.value,
            "input assigned"
        );
        Ok(())
    }

    /// Run the evaluation burst and refresh the output vector.
    ///
    /// The engine is called `repeat_count` times in a row on the same native
    /// input; only the final output is converted back.
    pub fn evaluate(&mut self) -> Result<&SlotVector> {
        let native = self.engine.build_input(&self.inputs)?;

        let mut output = self.engine.evaluate(black_box(&native));
        for _ in 1..self.repeat_count {
            output = self.engine.evaluate(black_box(&native));
        }

        let mut outputs = SlotVector::undefined(self.engine.output_count());
        self.engine.read_output(&output, &mut outputs)?;
        self.outputs = outputs;

        emit_evaluation_finished(
            self.repeat_count,
            self.inputs.defined_count(),
            self.outputs.defined_count(),
            count_occurred(self.engine.error_catalog(&output)),
        );
        self.last_output = Some(output);
        Ok(&self.outputs)
    }

    pub fn inputs(&self) -> &SlotVector {
        &self.inputs
    }

    pub fn outputs(&self) -> &SlotVector {
        &self.outputs
    }

    pub fn repeat_count(&self) -> usize {
        self.repeat_count
    }

    pub fn assignments_applied(&self) -> usize {
        self.assignments_applied
    }

    pub fn has_evaluated(&self) -> bool {
        self.last_output.is_some()
    }

    /// Diagnostic catalog of the last evaluation; empty before any.
    pub fn error_catalog(&self) -> &[ErrorRecord] {
        match &self.last_output {
            Some(output) => self.engine.error_catalog(output),
            None => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HarnessError;
    use crate::error_filter::ErrorKind;
    use crate::fakes::FixedEngine;
    use crate::value::{ComputationValue, Slot};

    fn assignment(name: &str, slot: usize, value: i64) -> InputAssignment {
        InputAssignment {
            name: name.to_string(),
            slot: Slot(slot),
            value,
            line: 1,
        }
    }

    #[test]
    fn test_vectors_use_distinct_counts() {
        let engine = FixedEngine::new(&["A", "B"], &["X", "Y", "Z", "W", "V"]);
        let driver = EvaluationDriver::new(&engine, 10);
        assert_eq!(driver.inputs().len(), 2);
        assert_eq!(driver.outputs().len(), 5);
        assert_eq!(driver.inputs().defined_count(), 0);
        assert_eq!(driver.outputs().defined_count(), 0);
        assert!(!driver.has_evaluated());
    }

    #[test]
    fn test_assign_writes_literal() {
        let engine = FixedEngine::new(&["SAL", "NBPART"], &["IMP"]);
        let mut driver = EvaluationDriver::new(&engine, 1);
        driver.assign(&assignment("NBPART", 1, 3)).unwrap();

        assert_eq!(
            driver.inputs().read(Slot(1)).unwrap(),
            ComputationValue::defined(3.0)
        );
        assert!(driver.inputs().read(Slot(0)).unwrap().is_undefined());
        assert_eq!(driver.assignments_applied(), 1);
    }

    #[test]
    fn test_assign_out_of_range_slot() {
        let engine = FixedEngine::new(&["SAL"], &["IMP"]);
        let mut driver = EvaluationDriver::new(&engine, 1);
        let err = driver.assign(&assignment("SAL", 4, 3)).unwrap_err();
        assert!(matches!(err, HarnessError::SlotOutOfRange { slot: 4, len: 1 }));
    }

    #[test]
    fn test_evaluate_repeats_and_keeps_last_output() {
        let engine = FixedEngine::new(&["SAL"], &["IMP", "NET"])
            .with_output("IMP", ComputationValue::defined(12.0));
        let mut driver = EvaluationDriver::new(&engine, 1000);
        driver.assign(&assignment("SAL", 0, 30000)).unwrap();

        let outputs = driver.evaluate().unwrap().clone();
        assert_eq!(engine.evaluations(), 1000);
        assert_eq!(outputs.read(Slot(0)).unwrap(), ComputationValue::defined(12.0));
        assert!(outputs.read(Slot(1)).unwrap().is_undefined());
        assert!(driver.has_evaluated());

        let seen = engine.last_input().unwrap();
        assert_eq!(seen[0], ComputationValue::defined(30000.0));
    }

    #[test]
    fn test_zero_repeat_still_evaluates_once() {
        let engine = FixedEngine::new(&["SAL"], &["IMP"]);
        let mut driver = EvaluationDriver::new(&engine, 0);
        driver.evaluate().unwrap();
        assert_eq!(driver.repeat_count(), 1);
        assert_eq!(engine.evaluations(), 1);
    }

    #[test]
    fn test_error_catalog_follows_last_output() {
        let engine = FixedEngine::new(&["SAL"], &["IMP"]).with_errors(vec![
            ErrorRecord::new(ErrorKind::Anomaly, "000", "001", "a").occurred(true),
            ErrorRecord::new(ErrorKind::Information, "000", "002", "b"),
        ]);
        let mut driver = EvaluationDriver::new(&engine, 2);
        assert!(driver.error_catalog().is_empty());

        driver.evaluate().unwrap();
        assert_eq!(driver.error_catalog().len(), 2);
        assert_eq!(count_occurred(driver.error_catalog()), 1);
    }
}
