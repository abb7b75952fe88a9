//! Model and candidate traits
//!
//! The modeling algorithm is an external collaborator: the core only needs
//! a cheap way to obtain an independent model instance per job (`Candidate`)
//! and the train/predict capability itself (`Model`). Training internals
//! are opaque to the evaluation core.

use crate::data::{Dataset, Record, Schema};
use crate::error::Result;

/// A predicted value for a single record
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Prediction {
    /// Predicted label index for a nominal target
    Nominal(usize),
    /// Predicted value for a numeric target
    Numeric(f64),
}

/// A model specification owned by the caller, read-only to the core
///
/// `spawn` hands out an independent, mutable model instance so concurrent
/// jobs never share trainable state.
pub trait Candidate: Send + Sync {
    /// Display name used in error reporting
    fn name(&self) -> &str;

    /// Create a fresh model instance from this specification
    fn spawn(&self) -> Box<dyn Model>;
}

/// A trainable, scorable model instance
pub trait Model: Send {
    /// Train on the given dataset
    fn fit(&mut self, train: &Dataset) -> Result<()>;

    /// Predict the target value of a single record
    fn predict(&self, record: &Record, schema: &Schema) -> Result<Prediction>;
}
