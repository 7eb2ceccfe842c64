// src/adapter.rs
use tracing::{debug, info};

use crate::core::{CleanedTable, GamutError, GlobalExplanation, LocalExplanation, Result};
use crate::selection::FeatureSet;
use crate::traits::AdditiveModel;

/// Everything the exporters need from one training run. Explanations are
/// always computed together with the fit, so a model without them never
/// exists.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedModel {
    features: FeatureSet,
    global: GlobalExplanation,
    local: LocalExplanation,
    generation: u64,
}

impl TrainedModel {
    pub(crate) fn new(
        features: FeatureSet,
        global: GlobalExplanation,
        local: LocalExplanation,
        generation: u64,
    ) -> Result<Self> {
        for term in &global.terms {
            term.validate()?;
        }
        local.validate()?;
        Ok(TrainedModel {
            features,
            global,
            local,
            generation,
        })
    }

    /// The selection the model was trained with.
    pub fn features(&self) -> &FeatureSet {
        &self.features
    }

    pub fn global(&self) -> &GlobalExplanation {
        &self.global
    }

    pub fn local(&self) -> &LocalExplanation {
        &self.local
    }

    pub fn intercept(&self) -> f64 {
        self.global.intercept
    }

    /// Cleaning pass the model was trained on.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Drives an [`AdditiveModel`] through fit and explanation.
#[derive(Debug, Clone, Default)]
pub struct ModelAdapter<M: AdditiveModel> {
    model: M,
}

impl<M: AdditiveModel> ModelAdapter<M> {
    pub fn new(model: M) -> Self {
        ModelAdapter { model }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Fits on the selected columns of `table` and explains the fit on the
    /// same rows.
    pub fn train(&mut self, table: &CleanedTable, features: &FeatureSet) -> Result<TrainedModel> {
        self.train_generation(table, features, 0)
    }

    pub(crate) fn train_generation(
        &mut self,
        table: &CleanedTable,
        features: &FeatureSet,
        generation: u64,
    ) -> Result<TrainedModel> {
        features.validate(table)?;
        let ycol = features
            .ycol()
            .ok_or_else(|| GamutError::InvalidInput("no target column chosen".to_string()))?;

        let x = table.select(features.xcols())?;
        let y = table.target(ycol)?;
        debug!(
            rows = x.n_rows(),
            features = x.n_cols(),
            target = ycol,
            "Fitting additive model"
        );

        self.model.fit(&x, y.view())?;
        let global = self.model.explain_global()?;
        let local = self.model.explain_local(&x, y.view())?;

        if local.len() != x.n_rows() {
            return Err(GamutError::IncompatibleDimensions(format!(
                "Local explanation covers {} instances, but {} rows were explained.",
                local.len(),
                x.n_rows()
            )));
        }

        info!(
            terms = global.terms.len(),
            instances = local.len(),
            intercept = global.intercept,
            "Trained additive model"
        );
        TrainedModel::new(features.clone(), global, local, generation)
    }
}

impl<M: AdditiveModel + Default> ModelAdapter<M> {
    /// Discards the fitted state by swapping in a fresh model.
    pub fn reinit(&mut self) {
        self.model = M::default();
    }
}
