//! Immutable dataset storage with copy or view subsets

use super::attribute::{AttributeKind, Schema};
use crate::error::{EvalError, Result};
use std::sync::Arc;

/// A single attribute value
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    /// Numeric value
    Numeric(f64),
    /// Index into the attribute's label set
    Nominal(usize),
    /// Missing value
    Missing,
}

impl Value {
    /// Whether the value is missing
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }
}

/// One row of a dataset, fixed-width per the schema
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    values: Vec<Value>,
}

impl Record {
    /// Value at the given attribute index
    pub fn value(&self, index: usize) -> Value {
        self.values.get(index).copied().unwrap_or(Value::Missing)
    }

    /// All values in attribute order
    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

/// An ordered, immutable-once-built sequence of records
///
/// Subsets are either owned copies or views. A view references the parent's
/// rows by index without copying; the parent is behind `Arc` and is never
/// mutated through a view.
#[derive(Clone, Debug)]
pub struct Dataset {
    schema: Arc<Schema>,
    rows: Arc<Vec<Record>>,
    indices: Option<Vec<usize>>,
}

impl Dataset {
    /// The schema shared by every record
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Shared handle on the schema
    pub fn schema_arc(&self) -> Arc<Schema> {
        Arc::clone(&self.schema)
    }

    /// Number of records
    pub fn len(&self) -> usize {
        match &self.indices {
            Some(view) => view.len(),
            None => self.rows.len(),
        }
    }

    /// Whether the dataset has no records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether this dataset is a view into another dataset's rows
    pub fn is_view(&self) -> bool {
        self.indices.is_some()
    }

    /// Record at the given position
    pub fn record(&self, index: usize) -> Option<&Record> {
        let row = match &self.indices {
            Some(view) => *view.get(index)?,
            None => index,
        };
        self.rows.get(row)
    }

    /// Iterate over records in order
    pub fn records(&self) -> impl Iterator<Item = &Record> + '_ {
        (0..self.len()).filter_map(move |i| self.record(i))
    }

    /// Target value of the record at the given position
    pub fn target_value(&self, index: usize) -> Option<Value> {
        let target = self.schema.target_index()?;
        self.record(index).map(|r| r.value(target))
    }

    /// Nominal class index of the record at the given position
    ///
    /// `None` when there is no target, the target is numeric, or the value
    /// is missing.
    pub fn class_index(&self, index: usize) -> Option<usize> {
        match self.target_value(index)? {
            Value::Nominal(c) => Some(c),
            _ => None,
        }
    }

    /// Mean of the numeric target over non-missing records
    ///
    /// Used to seed the prior baseline for relative error statistics.
    pub fn target_mean(&self) -> Option<f64> {
        let target = self.schema.target_index()?;
        if self.schema.target_attribute()?.kind().is_nominal() {
            return None;
        }
        let mut sum = 0.0;
        let mut count = 0usize;
        for record in self.records() {
            if let Value::Numeric(v) = record.value(target) {
                sum += v;
                count += 1;
            }
        }
        if count == 0 {
            None
        } else {
            Some(sum / count as f64)
        }
    }

    /// Build a subset from row positions
    ///
    /// With `use_views` the subset references this dataset's rows by index;
    /// otherwise the selected records are copied. Positions are resolved
    /// through an existing view, so a view of a view still points at the
    /// original rows.
    pub fn subset(&self, positions: &[usize], use_views: bool) -> Result<Dataset> {
        let mut resolved = Vec::with_capacity(positions.len());
        for &pos in positions {
            let row = match &self.indices {
                Some(view) => view.get(pos).copied(),
                None if pos < self.rows.len() => Some(pos),
                None => None,
            };
            match row {
                Some(row) => resolved.push(row),
                None => {
                    return Err(EvalError::Data(format!(
                        "Subset position {} out of range (dataset has {} records)",
                        pos,
                        self.len()
                    )))
                }
            }
        }

        if use_views {
            Ok(Dataset {
                schema: Arc::clone(&self.schema),
                rows: Arc::clone(&self.rows),
                indices: Some(resolved),
            })
        } else {
            let rows = resolved
                .iter()
                .map(|&row| self.rows[row].clone())
                .collect();
            Ok(Dataset {
                schema: Arc::clone(&self.schema),
                rows: Arc::new(rows),
                indices: None,
            })
        }
    }
}

/// Builder validating each record against the schema
pub struct DatasetBuilder {
    schema: Arc<Schema>,
    rows: Vec<Record>,
}

impl DatasetBuilder {
    /// Create a builder for the given schema
    pub fn new(schema: Schema) -> Self {
        Self {
            schema: Arc::new(schema),
            rows: Vec::new(),
        }
    }

    /// Append a record, checking width and value kinds
    pub fn push_row(&mut self, values: Vec<Value>) -> Result<()> {
        if values.len() != self.schema.num_attributes() {
            return Err(EvalError::Data(format!(
                "Record width {} does not match schema width {}",
                values.len(),
                self.schema.num_attributes()
            )));
        }
        for (i, value) in values.iter().enumerate() {
            let kind = self
                .schema
                .attribute(i)
                .map(|a| a.kind().clone())
                .unwrap_or(AttributeKind::Numeric);
            match (value, &kind) {
                (Value::Missing, _) => {}
                (Value::Numeric(_), AttributeKind::Numeric) => {}
                (Value::Nominal(idx), AttributeKind::Nominal(labels)) => {
                    if *idx >= labels.len() {
                        return Err(EvalError::Data(format!(
                            "Label index {} out of range for attribute {} ({} labels)",
                            idx,
                            i,
                            labels.len()
                        )));
                    }
                }
                _ => {
                    return Err(EvalError::Data(format!(
                        "Value kind does not match attribute {} kind",
                        i
                    )))
                }
            }
        }
        self.rows.push(Record { values });
        Ok(())
    }

    /// Finish building; the dataset is immutable from here on
    pub fn build(self) -> Dataset {
        Dataset {
            schema: self.schema,
            rows: Arc::new(self.rows),
            indices: None,
        }
    }
}
