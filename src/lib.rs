// src/lib.rs

//! `gamut_rs` prepares tabular data for an additive regression model and
//! exports the fitted model's explanations in the format read by the GAMut
//! viewer.
//!
//! The pipeline is: [`RawTable`] → [`DataCleaner`] → [`CleanedTable`] →
//! [`FeatureSet`] → [`ModelAdapter`] (any [`AdditiveModel`]) →
//! [`TrainedModel`] → [`Artifacts`] → [`ArtifactWriter`].
//! [`GamutRegressor`] holds one session of that pipeline.
//!
//! ```no_run
//! # use gamut_rs::{AdditiveModel, GamutRegressor, RawTable, Result};
//! # fn run<M: AdditiveModel>(raw: RawTable, model: M) -> Result<()> {
//! let mut gr = GamutRegressor::new(raw, model);
//! gr.clean()?;
//! gr.choose_x_cols(["Lot Area", "Neighborhood", "Overall Qual"])?;
//! gr.choose_y_col("SalePrice")?;
//! gr.train()?;
//! gr.output_model("newames", "data/", false)?;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod cleaning;
pub mod config;
pub mod core;
pub mod export;
pub mod selection;
pub mod session;
pub mod traits;
pub mod utils;

#[cfg(test)]
mod testing;

// Re-export key components for easier use by library consumers
pub use crate::adapter::{ModelAdapter, TrainedModel};
pub use crate::cleaning::{normalize_column_name, DataCleaner};
pub use crate::config::{CleanerConfig, ExportConfig, GamutConfig};
pub use crate::core::{
    Cell, CleanedTable, Column, ColumnKind, FeatureTerm, GamutError, GlobalExplanation,
    InstanceExplanation, LocalExplanation, RawColumn, RawTable, RawValues, Result, ShapeFunction,
    TermType, Values,
};
pub use crate::export::{ArtifactWriter, Artifacts, GlobalDocument, LocalDocument, Manifest};
pub use crate::selection::FeatureSet;
pub use crate::session::GamutRegressor;
pub use crate::traits::AdditiveModel;
