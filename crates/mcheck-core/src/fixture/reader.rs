//! Line reader turning fixture text into assignment/evaluate/assert events.

use super::section::{Section, Sentinel};
use crate::engine::NameIndex;
use crate::error::{HarnessError, Result};
use crate::value::Slot;
use std::iter::Enumerate;
use std::str::Lines;
use tracing::debug;

/// Largest input magnitude an `f64` holds exactly.
pub const MAX_EXACT_INPUT: u64 = 1 << 53;

/// `name/integer` line from the inputs section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputAssignment {
    pub name: String,
    pub slot: Slot,
    pub value: i64,
    pub line: usize,
}

/// `name/decimal` line from the expected-outputs section.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputAssertion {
    pub name: String,
    pub slot: Slot,
    pub expected: f64,
    pub line: usize,
}

/// What the reader found on a meaningful line, in file order.
#[derive(Debug, Clone, PartialEq)]
pub enum FixtureEvent {
    Assign(InputAssignment),

    /// The inputs section just closed. Every assignment has already been
    /// emitted and no assertion has been emitted yet.
    Evaluate,

    Assert(OutputAssertion),
}

/// Streaming fixture parser.
///
/// Yields events lazily so a caller can stop reading at the first failed
/// assertion. After a format error the iterator is fused.
pub struct FixtureReader<'a, I: ?Sized> {
    lines: Enumerate<Lines<'a>>,
    index: &'a I,
    section: Section,
    failed: bool,
}

impl<'a, I: NameIndex + ?Sized> FixtureReader<'a, I> {
    pub fn new(text: &'a str, index: &'a I) -> Self {
        Self {
            lines: text.lines().enumerate(),
            index,
            section: Section::PreInputs,
            failed: false,
        }
    }

    /// Section reached so far.
    pub fn section(&self) -> Section {
        self.section
    }

    fn parse_input(&self, line: usize, text: &str) -> Result<InputAssignment> {
        let (name, raw) = split_record(line, text)?;
        let slot = self
            .index
            .input_slot(name)
            .ok_or_else(|| HarnessError::UnknownInput {
                line,
                name: name.to_string(),
            })?;
        let value = raw.parse::<i64>().map_err(|_| HarnessError::MalformedLine {
            line,
            reason: format!("invalid integer value '{}' for {}", raw, name),
        })?;
        if value.unsigned_abs() > MAX_EXACT_INPUT {
            return Err(HarnessError::MalformedLine {
                line,
                reason: format!("integer value {} for {} exceeds 2^53", value, name),
            });
        }

        Ok(InputAssignment {
            name: name.to_string(),
            slot,
            value,
            line,
        })
    }

    fn parse_output(&self, line: usize, text: &str) -> Result<OutputAssertion> {
        let (name, raw) = split_record(line, text)?;
        let slot = self
            .index
            .output_slot(name)
            .ok_or_else(|| HarnessError::UnknownOutput {
                line,
                name: name.to_string(),
            })?;
        let expected = raw
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| HarnessError::MalformedLine {
                line,
                reason: format!("invalid decimal value '{}' for {}", raw, name),
            })?;

        Ok(OutputAssertion {
            name: name.to_string(),
            slot,
            expected,
            line,
        })
    }
}

impl<'a, I: NameIndex + ?Sized> Iterator for FixtureReader<'a, I> {
    type Item = Result<FixtureEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        while let Some((offset, raw)) = self.lines.next() {
            let line = offset + 1;
            let text = raw.trim();
            if text.is_empty() {
                continue;
            }

            let transition = Sentinel::parse(text).and_then(|s| self.section.on_sentinel(s));
            if let Some(transition) = transition {
                let from = self.section;
                self.section = transition.target(from);
                debug!(line, from = ?from, to = ?self.section, "fixture section transition");
                if transition.evaluates() {
                    return Some(Ok(FixtureEvent::Evaluate));
                }
                continue;
            }

            let event = match self.section {
                Section::Inputs => self.parse_input(line, text).map(FixtureEvent::Assign),
                Section::Controls => self.parse_output(line, text).map(FixtureEvent::Assert),
                Section::PreInputs | Section::CorrectiveInputs => continue,
            };
            if event.is_err() {
                self.failed = true;
            }
            return Some(event);
        }

        None
    }
}

/// Split `name/value` on the first `/`.
fn split_record(line: usize, text: &str) -> Result<(&str, &str)> {
    let (name, value) = text
        .split_once('/')
        .ok_or_else(|| HarnessError::MalformedLine {
            line,
            reason: format!("missing '/' separator in '{}'", text),
        })?;
    let name = name.trim();
    if name.is_empty() {
        return Err(HarnessError::MalformedLine {
            line,
            reason: format!("empty name in '{}'", text),
        });
    }
    Ok((name, value.trim()))
}

/// A fully read fixture: inputs, then assertions.
#[derive(Debug, Clone, PartialEq)]
pub struct Fixture {
    pub inputs: Vec<InputAssignment>,
    pub assertions: Vec<OutputAssertion>,

    /// Whether `#CONTROLES-PRIMITIF` was reached.
    pub triggers_evaluation: bool,

    pub final_section: Section,
}

impl Fixture {
    /// Read a whole fixture, resolving every name against `index`.
    pub fn parse<I: NameIndex + ?Sized>(text: &str, index: &I) -> Result<Self> {
        let mut reader = FixtureReader::new(text, index);
        let mut inputs = Vec::new();
        let mut assertions = Vec::new();
        let mut triggers_evaluation = false;

        for event in reader.by_ref() {
            match event? {
                FixtureEvent::Assign(a) => inputs.push(a),
                FixtureEvent::Evaluate => triggers_evaluation = true,
                FixtureEvent::Assert(a) => assertions.push(a),
            }
        }

        Ok(Self {
            inputs,
            assertions,
            triggers_evaluation,
            final_section: reader.section(),
        })
    }
}
