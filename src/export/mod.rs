//! Explanation export
//!
//! Converts a [`TrainedModel`] into the two documents read by the GAMut
//! viewer and writes them out:
//! - [`GlobalDocument`]: one record per model term, optional placeholders for
//!   unused columns, and the intercept, plus the residual RMS
//! - [`LocalDocument`]: one record per explained instance
//!
//! [`Manifest`] indexes a directory of such artifacts for the viewer.

mod global;
mod local;
mod manifest;
mod writer;

pub use global::{
    export_global, Dtype, FeatureRecord, GlobalDocument, Influence, ShapePoint, GAAM_SUFFIX,
    INTERCEPT_NAME,
};
pub use local::{export_local, ContributionRecord, InstanceRecord, LocalDocument};
pub use manifest::{DatasetEntry, Manifest, MANIFEST_FILE};
pub use writer::{ArtifactPaths, ArtifactWriter};

use crate::adapter::TrainedModel;
use crate::core::{CleanedTable, Column, GlobalExplanation, Result};

/// Both documents of one export, with the RMS already attached.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifacts {
    pub global: GlobalDocument,
    pub local: LocalDocument,
}

impl Artifacts {
    /// Runs the local export, then the global export, then attaches the RMS
    /// of the local residuals to the global document.
    pub fn build(
        trained: &TrainedModel,
        table: &CleanedTable,
        name: &str,
        include_all_columns: bool,
    ) -> Result<Self> {
        let local = export_local(trained, table, include_all_columns)?;
        let mut global = export_global(trained, table, name, include_all_columns)?;
        global.rms = trained.local().rms();
        Ok(Artifacts { global, local })
    }
}

/// Cleaned columns the model has no term for, in table order.
pub(crate) fn unused_columns<'a>(
    global: &GlobalExplanation,
    table: &'a CleanedTable,
) -> Vec<&'a Column> {
    table
        .columns()
        .iter()
        .filter(|c| !global.uses(c.name()))
        .collect()
}
