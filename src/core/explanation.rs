// src/core/explanation.rs
use ndarray::Array1;
use serde::Serialize;

use super::data::Cell;
use super::errors::{GamutError, Result};
use crate::utils::stats;

/// How the model treats a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TermType {
    Continuous,
    Categorical,
    Interaction,
}

/// Per-bin lookup table of one term: score, representative value and upper
/// confidence bound, index-aligned.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShapeFunction {
    pub scores: Vec<f64>,
    pub names: Vec<Cell>,
    pub upper_bounds: Vec<f64>,
}

impl ShapeFunction {
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTerm {
    pub name: String,
    pub term_type: TermType,
    /// The model's own overall importance score for this term.
    pub influence: f64,
    pub shape: ShapeFunction,
}

impl FeatureTerm {
    /// Checks that the shape vectors are index-aligned.
    pub fn validate(&self) -> Result<()> {
        let n = self.shape.scores.len();
        if self.shape.names.len() != n || self.shape.upper_bounds.len() != n {
            return Err(GamutError::IncompatibleDimensions(format!(
                "Feature {} has {} scores, {} bin names and {} upper bounds.",
                self.name,
                n,
                self.shape.names.len(),
                self.shape.upper_bounds.len()
            )));
        }
        Ok(())
    }
}

/// Global view of a fitted additive model. Term order is the model's own and
/// is preserved by every exporter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GlobalExplanation {
    pub terms: Vec<FeatureTerm>,
    pub intercept: f64,
}

impl GlobalExplanation {
    pub fn feature_names(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(|t| t.name.as_str())
    }

    pub fn uses(&self, name: &str) -> bool {
        self.terms.iter().any(|t| t.name == name)
    }
}

/// Contributions for one row.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceExplanation {
    pub names: Vec<String>,
    pub values: Vec<Cell>,
    pub scores: Vec<f64>,
    pub actual: f64,
    pub predicted: f64,
}

impl InstanceExplanation {
    pub fn validate(&self, index: usize) -> Result<()> {
        let n = self.names.len();
        if self.values.len() != n || self.scores.len() != n {
            return Err(GamutError::IncompatibleDimensions(format!(
                "Instance {} has {} names, {} values and {} scores.",
                index,
                n,
                self.values.len(),
                self.scores.len()
            )));
        }
        Ok(())
    }
}

/// Local view of a fitted model over the rows it was evaluated on.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalExplanation {
    pub instances: Vec<InstanceExplanation>,
    /// Observed minus predicted, one per instance.
    pub residuals: Array1<f64>,
}

impl LocalExplanation {
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Root-mean-square of the residuals; `None` when there are none.
    pub fn rms(&self) -> Option<f64> {
        stats::root_mean_square(self.residuals.view())
    }

    pub fn validate(&self) -> Result<()> {
        if self.residuals.len() != self.instances.len() {
            return Err(GamutError::IncompatibleDimensions(format!(
                "Local explanation has {} instances but {} residuals.",
                self.instances.len(),
                self.residuals.len()
            )));
        }
        self.instances
            .iter()
            .enumerate()
            .try_for_each(|(i, inst)| inst.validate(i))
    }
}
