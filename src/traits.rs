// src/traits.rs
use ndarray::ArrayView1;

use crate::core::{CleanedTable, GlobalExplanation, LocalExplanation, Result};

/// An additive regression model: a fitted intercept plus one shape function
/// per term. Training is entirely the implementor's business; this crate only
/// asks for the fit and for the two explanation views afterwards.
pub trait AdditiveModel {
    /// Fits the model. `x` holds exactly the selected feature columns, in
    /// selection order, with no missing values.
    fn fit(&mut self, x: &CleanedTable, y: ArrayView1<'_, f64>) -> Result<()>;

    /// Shape functions, influences and intercept of the fitted model.
    fn explain_global(&self) -> Result<GlobalExplanation>;

    /// Per-row contributions for `x`. Instances must be returned in row order,
    /// with `residuals[i] = y[i] - predicted[i]`.
    fn explain_local(&self, x: &CleanedTable, y: ArrayView1<'_, f64>) -> Result<LocalExplanation>;
}
