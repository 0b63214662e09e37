//! Fixture sections and the sentinel-driven transition table.

use serde::{Deserialize, Serialize};

/// Section of a fixture file the reader is currently in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    /// Before `#ENTREES-PRIMITIF`; every line is skipped.
    PreInputs,

    /// `name/integer` input assignments.
    Inputs,

    /// `name/decimal` expected outputs.
    Controls,

    /// After `#ENTREES-CORRECTIF`; lines are read and ignored.
    CorrectiveInputs,
}

/// Fixed literal lines marking section boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sentinel {
    StartOfInputs,
    StartOfPrimitiveControls,
    PrimitiveResults,
    StartOfCorrectiveInputs,
}

impl Sentinel {
    pub const ALL: [Sentinel; 4] = [
        Sentinel::StartOfInputs,
        Sentinel::StartOfPrimitiveControls,
        Sentinel::PrimitiveResults,
        Sentinel::StartOfCorrectiveInputs,
    ];

    pub fn literal(&self) -> &'static str {
        match self {
            Sentinel::StartOfInputs => "#ENTREES-PRIMITIF",
            Sentinel::StartOfPrimitiveControls => "#CONTROLES-PRIMITIF",
            Sentinel::PrimitiveResults => "#RESULTATS-PRIMITIF",
            Sentinel::StartOfCorrectiveInputs => "#ENTREES-CORRECTIF",
        }
    }

    /// Match a whole, already trimmed line.
    pub fn parse(line: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.literal() == line)
    }
}

/// Effect of a sentinel line on the current section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Move to another section.
    Enter(Section),

    /// Move to another section and run the evaluation burst first.
    EnterAndEvaluate(Section),

    /// Recognised header that does not change the section.
    Ignore,
}

impl Transition {
    pub fn target(&self, from: Section) -> Section {
        match self {
            Transition::Enter(s) | Transition::EnterAndEvaluate(s) => *s,
            Transition::Ignore => from,
        }
    }

    pub fn evaluates(&self) -> bool {
        matches!(self, Transition::EnterAndEvaluate(_))
    }
}

impl Section {
    /// Transition table. `None` means the sentinel has no meaning in this
    /// section and the line is handled like any other line.
    pub fn on_sentinel(self, sentinel: Sentinel) -> Option<Transition> {
        use Section::*;
        use Sentinel::*;

        match (self, sentinel) {
            (PreInputs, StartOfInputs) => Some(Transition::Enter(Inputs)),
            (Inputs, StartOfPrimitiveControls) => Some(Transition::EnterAndEvaluate(Controls)),
            (Controls, PrimitiveResults) => Some(Transition::Ignore),
            (Controls, StartOfCorrectiveInputs) => Some(Transition::Enter(CorrectiveInputs)),
            _ => None,
        }
    }

    /// Whether ordinary lines in this section carry `name/value` records.
    pub fn reads_records(self) -> bool {
        matches!(self, Section::Inputs | Section::Controls)
    }
}
