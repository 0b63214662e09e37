//! Collaborator interface for the computation engine under test.
//!
//! The harness never looks inside an engine. It only needs to:
//! - resolve input/output names to [`Slot`]s ([`NameIndex`])
//! - move dense [`SlotVector`]s in and out of the engine's native
//!   representation
//! - call the evaluation entry point
//! - read the diagnostic catalog attached to an evaluation result

use crate::error::Result;
use crate::error_filter::ErrorRecord;
use crate::value::{ComputationValue, Slot, SlotVector};

/// Name-to-slot resolution for an engine's inputs and outputs.
pub trait NameIndex {
    /// Slot of the named input, or `None` when the engine does not know it.
    fn input_slot(&self, name: &str) -> Option<Slot>;

    /// Slot of the named output, or `None` when the engine does not know it.
    fn output_slot(&self, name: &str) -> Option<Slot>;
}

/// A computation engine evaluating named inputs into named outputs.
///
/// `evaluate` must be a pure function of its native input: the driver calls
/// it many times in a row and keeps only the last result.
pub trait Engine: NameIndex {
    /// Engine-native input representation.
    type Input;

    /// Engine-native output representation.
    type Output;

    /// Number of input slots.
    fn input_count(&self) -> usize;

    /// Number of output slots. Independent of [`Engine::input_count`].
    fn output_count(&self) -> usize;

    /// Value written for an integer literal read from a fixture.
    ///
    /// The fixture reader only hands over values within
    /// [`MAX_EXACT_INPUT`](crate::fixture::MAX_EXACT_INPUT) in magnitude,
    /// so the default conversion is exact.
    fn literal(&self, value: i64) -> ComputationValue {
        ComputationValue::defined(value as f64)
    }

    /// Build the native input from a dense input vector.
    fn build_input(&self, inputs: &SlotVector) -> Result<Self::Input>;

    /// Run one evaluation.
    fn evaluate(&self, input: &Self::Input) -> Self::Output;

    /// Copy the native output into a dense output vector.
    fn read_output(&self, output: &Self::Output, into: &mut SlotVector) -> Result<()>;

    /// Diagnostic catalog of an evaluation result, with `occurred` flags set.
    fn error_catalog<'a>(&'a self, output: &'a Self::Output) -> &'a [ErrorRecord];
}
