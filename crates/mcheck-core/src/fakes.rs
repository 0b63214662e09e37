//! In-memory engine double (testing only)
//!
//! `FixedEngine` returns the same output vector whatever it is given, and
//! records how it was called so tests can check the driver's behavior
//! without a real computation backend.

use std::cell::{Cell, RefCell};

use crate::engine::{Engine, NameIndex};
use crate::error::Result;
use crate::error_filter::ErrorRecord;
use crate::value::{ComputationValue, Slot, SlotVector};

/// Engine with declared names and a fixed output vector.
#[derive(Debug, Default)]
pub struct FixedEngine {
    inputs: Vec<String>,
    outputs: Vec<String>,
    values: Vec<ComputationValue>,
    errors: Vec<ErrorRecord>,
    evaluations: Cell<usize>,
    last_input: RefCell<Option<Vec<ComputationValue>>>,
}

impl FixedEngine {
    /// Every output starts undefined.
    pub fn new(inputs: &[&str], outputs: &[&str]) -> Self {
        Self {
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            outputs: outputs.iter().map(|s| s.to_string()).collect(),
            values: vec![ComputationValue::UNDEFINED; outputs.len()],
            ..Self::default()
        }
    }

    /// Fix the value returned for `name`.
    ///
    /// Panics if `name` is not a declared output.
    pub fn with_output(mut self, name: &str, value: ComputationValue) -> Self {
        let slot = self
            .output_slot(name)
            .unwrap_or_else(|| panic!("unknown output {}", name));
        self.values[slot.index()] = value;
        self
    }

    /// Error catalog attached to every evaluation.
    pub fn with_errors(mut self, errors: Vec<ErrorRecord>) -> Self {
        self.errors = errors;
        self
    }

    /// Number of `evaluate` calls so far.
    pub fn evaluations(&self) -> usize {
        self.evaluations.get()
    }

    /// Native input seen by the most recent `evaluate` call.
    pub fn last_input(&self) -> Option<Vec<ComputationValue>> {
        self.last_input.borrow().clone()
    }
}

impl NameIndex for FixedEngine {
    fn input_slot(&self, name: &str) -> Option<Slot> {
        self.inputs.iter().position(|n| n == name).map(Slot)
    }

    fn output_slot(&self, name: &str) -> Option<Slot> {
        self.outputs.iter().position(|n| n == name).map(Slot)
    }
}

impl Engine for FixedEngine {
    type Input = Vec<ComputationValue>;
    type Output = Vec<ComputationValue>;

    fn input_count(&self) -> usize {
        self.inputs.len()
    }

    fn output_count(&self) -> usize {
        self.outputs.len()
    }

    fn build_input(&self, inputs: &SlotVector) -> Result<Self::Input> {
        Ok(inputs.as_slice().to_vec())
    }

    fn evaluate(&self, input: &Self::Input) -> Self::Output {
        self.evaluations.set(self.evaluations.get() + 1);
        *self.last_input.borrow_mut() = Some(input.clone());
        self.values.clone()
    }

    fn read_output(&self, output: &Self::Output, into: &mut SlotVector) -> Result<()> {
        for (i, value) in output.iter().enumerate() {
            into.write(Slot(i), *value)?;
        }
        Ok(())
    }

    fn error_catalog<'a>(&'a self, _output: &'a Self::Output) -> &'a [ErrorRecord] {
        &self.errors
    }
}
