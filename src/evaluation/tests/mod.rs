//! Tests for the top-level evaluation API

mod core_tests;

use crate::data::{Attribute, Dataset, DatasetBuilder, Record, Schema, Value};
use crate::error::Result;
use crate::model::{Candidate, Model, Prediction};
use std::collections::HashMap;

/// Dataset with a nominal two-class target, alternating classes
pub(super) fn labeled_data(n: usize) -> Dataset {
    let schema = Schema::new(vec![
        Attribute::numeric("x"),
        Attribute::nominal("class", vec!["yes".to_string(), "no".to_string()]),
    ])
    .with_target(1);
    let mut builder = DatasetBuilder::new(schema);
    for i in 0..n {
        builder
            .push_row(vec![Value::Numeric(i as f64), Value::Nominal(i % 2)])
            .unwrap();
    }
    builder.build()
}

/// Dataset with a numeric target `y = 2x`
pub(super) fn numeric_data(n: usize) -> Dataset {
    let schema =
        Schema::new(vec![Attribute::numeric("x"), Attribute::numeric("y")]).with_target(1);
    let mut builder = DatasetBuilder::new(schema);
    for i in 0..n {
        builder
            .push_row(vec![
                Value::Numeric(i as f64),
                Value::Numeric(i as f64 * 2.0),
            ])
            .unwrap();
    }
    builder.build()
}

/// Predicts the majority class of its train set
pub(super) struct MajorityCandidate;

pub(super) struct MajorityModel {
    majority: usize,
}

impl Candidate for MajorityCandidate {
    fn name(&self) -> &str {
        "majority"
    }

    fn spawn(&self) -> Box<dyn Model> {
        Box::new(MajorityModel { majority: 0 })
    }
}

impl Model for MajorityModel {
    fn fit(&mut self, train: &Dataset) -> Result<()> {
        let mut counts = HashMap::new();
        for i in 0..train.len() {
            if let Some(c) = train.class_index(i) {
                *counts.entry(c).or_insert(0usize) += 1;
            }
        }
        self.majority = counts
            .into_iter()
            .max_by_key(|&(class, count)| (count, std::cmp::Reverse(class)))
            .map(|(class, _)| class)
            .unwrap_or(0);
        Ok(())
    }

    fn predict(&self, _record: &Record, _schema: &Schema) -> Result<Prediction> {
        Ok(Prediction::Nominal(self.majority))
    }
}

/// Predicts the train-set target mean plus a fixed bias
///
/// A larger absolute bias produces a larger RMSE, giving ranking tests a
/// controllable quality ordering.
pub(super) struct BiasedMeanCandidate {
    pub name: String,
    pub bias: f64,
}

impl BiasedMeanCandidate {
    pub(super) fn new(name: &str, bias: f64) -> Self {
        Self {
            name: name.to_string(),
            bias,
        }
    }
}

pub(super) struct BiasedMeanModel {
    mean: f64,
    bias: f64,
}

impl Candidate for BiasedMeanCandidate {
    fn name(&self) -> &str {
        &self.name
    }

    fn spawn(&self) -> Box<dyn Model> {
        Box::new(BiasedMeanModel {
            mean: 0.0,
            bias: self.bias,
        })
    }
}

impl Model for BiasedMeanModel {
    fn fit(&mut self, train: &Dataset) -> Result<()> {
        self.mean = train.target_mean().unwrap_or(0.0);
        Ok(())
    }

    fn predict(&self, _record: &Record, _schema: &Schema) -> Result<Prediction> {
        Ok(Prediction::Numeric(self.mean + self.bias))
    }
}

/// Always fails to train
pub(super) struct BrokenCandidate;

pub(super) struct BrokenModel;

impl Candidate for BrokenCandidate {
    fn name(&self) -> &str {
        "broken"
    }

    fn spawn(&self) -> Box<dyn Model> {
        Box::new(BrokenModel)
    }
}

impl Model for BrokenModel {
    fn fit(&mut self, _train: &Dataset) -> Result<()> {
        Err(crate::error::EvalError::Data(
            "deliberate training failure".to_string(),
        ))
    }

    fn predict(&self, _record: &Record, _schema: &Schema) -> Result<Prediction> {
        Ok(Prediction::Numeric(0.0))
    }
}
