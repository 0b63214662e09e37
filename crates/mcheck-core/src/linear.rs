//! Reference engine declared by a JSON manifest.
//!
//! Each output is an affine combination of inputs:
//! `constant + Σ coefficient × input`, where undefined inputs read as zero.
//! An output stays undefined when every input it references is undefined,
//! which mirrors how M engines propagate "no value".
//!
//! Diagnostic records occur when their trigger input is defined and above a
//! threshold.

use crate::engine::{Engine, NameIndex};
use crate::error::{HarnessError, Result};
use crate::error_filter::ErrorRecord;
use crate::value::{ComputationValue, Slot, SlotVector};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Manifest as written on disk.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineManifest {
    pub inputs: Vec<String>,
    pub outputs: Vec<OutputRule>,
    #[serde(default)]
    pub errors: Vec<ErrorRule>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputRule {
    pub name: String,
    #[serde(default)]
    pub constant: f64,
    #[serde(default)]
    pub terms: Vec<Term>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Term {
    pub input: String,
    pub coefficient: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorRule {
    #[serde(flatten)]
    pub record: ErrorRecord,
    pub raised_when: Trigger,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Trigger {
    pub input: String,
    pub above: f64,
}

#[derive(Debug, Clone)]
struct CompiledOutput {
    constant: f64,
    terms: Vec<(Slot, f64)>,
}

impl CompiledOutput {
    fn apply(&self, input: &[ComputationValue]) -> ComputationValue {
        let mut defined = false;
        let mut acc = self.constant;
        for (slot, coefficient) in &self.terms {
            let value = input
                .get(slot.index())
                .copied()
                .unwrap_or(ComputationValue::UNDEFINED);
            if !value.is_undefined() {
                defined = true;
                acc += coefficient * value.value;
            }
        }
        if defined {
            ComputationValue::defined(acc)
        } else {
            ComputationValue::UNDEFINED
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct CompiledTrigger {
    slot: Slot,
    above: f64,
}

impl CompiledTrigger {
    fn fires(&self, input: &[ComputationValue]) -> bool {
        input
            .get(self.slot.index())
            .map(|v| !v.is_undefined() && v.value > self.above)
            .unwrap_or(false)
    }
}

/// Output of one [`LinearEngine`] evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearOutput {
    pub values: Vec<ComputationValue>,
    pub errors: Vec<ErrorRecord>,
}

/// Engine compiled from an [`EngineManifest`].
#[derive(Debug, Clone)]
pub struct LinearEngine {
    input_index: HashMap<String, Slot>,
    output_index: HashMap<String, Slot>,
    outputs: Vec<CompiledOutput>,
    triggers: Vec<CompiledTrigger>,
    catalog: Vec<ErrorRecord>,
}

impl LinearEngine {
    /// Read and compile a manifest file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            HarnessError::Engine(format!("cannot read engine manifest {}: {}", path.display(), e))
        })?;
        let engine = Self::from_json(&text)?;
        debug!(
            manifest = %path.display(),
            inputs = engine.input_count(),
            outputs = engine.output_count(),
            errors = engine.catalog.len(),
            "engine manifest loaded"
        );
        Ok(engine)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let manifest: EngineManifest = serde_json::from_str(text)
            .map_err(|e| HarnessError::Engine(format!("invalid engine manifest: {}", e)))?;
        Self::from_manifest(manifest)
    }

    pub fn from_manifest(manifest: EngineManifest) -> Result<Self> {
        let input_index = index_names("input", manifest.inputs.iter())?;
        let output_index = index_names("output", manifest.outputs.iter().map(|o| &o.name))?;

        let resolve = |name: &str, context: &str| {
            input_index.get(name).copied().ok_or_else(|| {
                HarnessError::Engine(format!("{} references unknown input {}", context, name))
            })
        };

        let mut outputs = Vec::with_capacity(manifest.outputs.len());
        for rule in &manifest.outputs {
            let context = format!("output {}", rule.name);
            let terms = rule
                .terms
                .iter()
                .map(|t| resolve(&t.input, &context).map(|slot| (slot, t.coefficient)))
                .collect::<Result<Vec<_>>>()?;
            outputs.push(CompiledOutput {
                constant: rule.constant,
                terms,
            });
        }

        let mut triggers = Vec::with_capacity(manifest.errors.len());
        let mut catalog = Vec::with_capacity(manifest.errors.len());
        for rule in manifest.errors {
            rule.record.validate()?;
            let slot = resolve(
                &rule.raised_when.input,
                &format!("error {}", rule.record.code()),
            )?;
            triggers.push(CompiledTrigger {
                slot,
                above: rule.raised_when.above,
            });
            catalog.push(rule.record.occurred(false));
        }

        Ok(Self {
            input_index,
            output_index,
            outputs,
            triggers,
            catalog,
        })
    }
}

fn index_names<'a>(
    kind: &str,
    names: impl Iterator<Item = &'a String>,
) -> Result<HashMap<String, Slot>> {
    let mut index = HashMap::new();
    for (i, name) in names.enumerate() {
        if name.is_empty() || name.contains('/') {
            return Err(HarnessError::Engine(format!("invalid {} name '{}'", kind, name)));
        }
        if index.insert(name.clone(), Slot(i)).is_some() {
            return Err(HarnessError::Engine(format!("duplicate {} name {}", kind, name)));
        }
    }
    Ok(index)
}

impl NameIndex for LinearEngine {
    fn input_slot(&self, name: &str) -> Option<Slot> {
        self.input_index.get(name).copied()
    }

    fn output_slot(&self, name: &str) -> Option<Slot> {
        self.output_index.get(name).copied()
    }
}

impl Engine for LinearEngine {
    type Input = Vec<ComputationValue>;
    type Output = LinearOutput;

    fn input_count(&self) -> usize {
        self.input_index.len()
    }

    fn output_count(&self) -> usize {
        self.outputs.len()
    }

    fn build_input(&self, inputs: &SlotVector) -> Result<Self::Input> {
        if inputs.len() != self.input_count() {
            return Err(HarnessError::Engine(format!(
                "input vector has {} slots, engine declares {}",
                inputs.len(),
                self.input_count()
            )));
        }
        Ok(inputs.as_slice().to_vec())
    }

    fn evaluate(&self, input: &Self::Input) -> Self::Output {
        let values = self.outputs.iter().map(|o| o.apply(input)).collect();
        let errors = self
            .catalog
            .iter()
            .zip(&self.triggers)
            .map(|(record, trigger)| record.clone().occurred(trigger.fires(input)))
            .collect();
        LinearOutput { values, errors }
    }

    fn read_output(&self, output: &Self::Output, into: &mut SlotVector) -> Result<()> {
        for (i, value) in output.values.iter().enumerate() {
            into.write(Slot(i), *value)?;
        }
        Ok(())
    }

    fn error_catalog<'a>(&'a self, output: &'a Self::Output) -> &'a [ErrorRecord] {
        &output.errors
    }
}
