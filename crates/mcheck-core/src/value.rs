//! Engine values, slots and dense slot vectors.

use crate::error::{HarnessError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A decimal paired with an "undefined" flag.
///
/// When `undefined` is set the payload carries no meaning and must go
/// through [`ComputationValue::normalized`] before it is compared.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ComputationValue {
    pub value: f64,
    pub undefined: bool,
}

impl ComputationValue {
    /// The "no value supplied/produced" marker.
    pub const UNDEFINED: ComputationValue = ComputationValue {
        value: 0.0,
        undefined: true,
    };

    /// A concrete value.
    pub fn defined(value: f64) -> Self {
        Self {
            value,
            undefined: false,
        }
    }

    pub fn is_undefined(&self) -> bool {
        self.undefined
    }

    /// Numeric view used for comparisons: undefined reads as exactly `0.0`.
    pub fn normalized(&self) -> f64 {
        if self.undefined {
            0.0
        } else {
            self.value
        }
    }
}

impl Default for ComputationValue {
    fn default() -> Self {
        Self::UNDEFINED
    }
}

impl fmt::Display for ComputationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.undefined {
            write!(f, "undefined")
        } else {
            write!(f, "{:.4}", self.value)
        }
    }
}

/// Index of one named input or output inside an engine's dense vectors.
///
/// Obtained through [`crate::engine::NameIndex`]; the harness never
/// fabricates slots on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Slot(pub usize);

impl Slot {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Dense vector of values addressed by [`Slot`].
#[derive(Debug, Clone, PartialEq)]
pub struct SlotVector {
    values: Vec<ComputationValue>,
}

impl SlotVector {
    /// Vector of `len` slots, every one undefined.
    pub fn undefined(len: usize) -> Self {
        Self {
            values: vec![ComputationValue::UNDEFINED; len],
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn read(&self, slot: Slot) -> Result<ComputationValue> {
        self.values
            .get(slot.index())
            .copied()
            .ok_or(HarnessError::SlotOutOfRange {
                slot: slot.index(),
                len: self.values.len(),
            })
    }

    pub fn write(&mut self, slot: Slot, value: ComputationValue) -> Result<()> {
        let len = self.values.len();
        let cell = self
            .values
            .get_mut(slot.index())
            .ok_or(HarnessError::SlotOutOfRange {
                slot: slot.index(),
                len,
            })?;
        *cell = value;
        Ok(())
    }

    pub fn as_slice(&self) -> &[ComputationValue] {
        &self.values
    }

    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|v| !v.undefined).count()
    }
}
