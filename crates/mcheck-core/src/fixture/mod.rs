//! Sectioned fixture format.
//!
//! ```text
//! #ENTREES-PRIMITIF
//! <name>/<integer>
//! #CONTROLES-PRIMITIF
//! #RESULTATS-PRIMITIF
//! <name>/<decimal>
//! #ENTREES-CORRECTIF
//! <ignored>
//! ```

pub mod reader;
pub mod section;

pub use reader::{
    Fixture, FixtureEvent, FixtureReader, InputAssignment, OutputAssertion, MAX_EXACT_INPUT,
};
pub use section::{Section, Sentinel, Transition};
