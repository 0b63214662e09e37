//! mcheck Core Library
//!
//! Fixture-driven correctness and load harness for M computation engines:
//! - parse sectioned fixture files into input assignments and expected outputs
//! - drive an [`Engine`] through a repeated evaluation burst
//! - compare outputs exactly, reading undefined as zero, stopping at the
//!   first mismatch
//! - filter an engine's diagnostic catalog down to records that occurred

pub mod comparator;
pub mod config;
pub mod driver;
pub mod engine;
pub mod error;
pub mod error_filter;
pub mod fakes;
pub mod fixture;
pub mod harness;
pub mod linear;
pub mod obs;
pub mod reporting;
pub mod telemetry;
pub mod value;

pub use comparator::{Comparator, Mismatch};
pub use config::{HarnessConfig, DEFAULT_REPEAT_COUNT};
pub use driver::EvaluationDriver;
pub use engine::{Engine, NameIndex};
pub use error::{HarnessError, Result};
pub use error_filter::{count_occurred, occurred_errors, ErrorKind, ErrorRecord, OccurredErrors};
pub use fixture::{
    Fixture, FixtureEvent, FixtureReader, InputAssignment, OutputAssertion, Section, Sentinel,
};
pub use harness::{fixture_digest, read_fixture, run_fixture, run_fixture_bytes, RunOutcome};
pub use linear::{EngineManifest, LinearEngine, LinearOutput};
pub use obs::FixtureSpan;
pub use reporting::{write_run_report, RunReport};
pub use telemetry::init_tracing;
pub use value::{ComputationValue, Slot, SlotVector};

/// mcheck version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
