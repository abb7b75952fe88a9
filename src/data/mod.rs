//! Dataset and schema types
//!
//! Provides the immutable, schema-checked record storage the evaluation
//! core reads from:
//! - `attribute`: attribute kinds, schema, target lookup
//! - `dataset`: value/record storage, builder, subset and view construction

mod attribute;
mod dataset;


pub use attribute::{Attribute, AttributeKind, Schema};
pub use dataset::{Dataset, DatasetBuilder, Record, Value};
