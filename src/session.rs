// src/session.rs
use std::path::Path;
use tracing::info;

use crate::adapter::{ModelAdapter, TrainedModel};
use crate::cleaning::DataCleaner;
use crate::config::{CleanerConfig, ExportConfig};
use crate::core::{CleanedTable, GamutError, RawTable, Result};
use crate::export::{
    export_global, export_local, ArtifactPaths, ArtifactWriter, Artifacts, GlobalDocument,
    LocalDocument,
};
use crate::selection::FeatureSet;
use crate::traits::AdditiveModel;

/// One modelling session over one dataset.
///
/// Holds the raw table, the current cleaning pass, the current column
/// selection and the current trained model. Each stage can be re-run on its
/// own: re-selecting columns keeps the cleaned table, re-training keeps the
/// selection, and every `train` replaces the previous model.
#[derive(Debug)]
pub struct GamutRegressor<M: AdditiveModel> {
    raw: RawTable,
    cleaner: DataCleaner,
    cleaned: Option<CleanedTable>,
    generation: u64,
    features: FeatureSet,
    adapter: ModelAdapter<M>,
    trained: Option<TrainedModel>,
}

impl<M: AdditiveModel> GamutRegressor<M> {
    pub fn new(raw: RawTable, model: M) -> Self {
        Self::with_config(raw, model, CleanerConfig::default())
    }

    pub fn with_config(raw: RawTable, model: M, config: CleanerConfig) -> Self {
        GamutRegressor {
            raw,
            cleaner: DataCleaner::new(config),
            cleaned: None,
            generation: 0,
            features: FeatureSet::new(),
            adapter: ModelAdapter::new(model),
            trained: None,
        }
    }

    pub fn raw(&self) -> &RawTable {
        &self.raw
    }

    pub fn cleaned(&self) -> Option<&CleanedTable> {
        self.cleaned.as_ref()
    }

    pub fn features(&self) -> &FeatureSet {
        &self.features
    }

    pub fn trained(&self) -> Option<&TrainedModel> {
        self.trained.as_ref()
    }

    pub fn model(&self) -> &M {
        self.adapter.model()
    }

    /// Runs (or re-runs) cleaning on the raw table.
    pub fn clean(&mut self) -> Result<&CleanedTable> {
        let cleaned = self.cleaner.clean(&self.raw)?;
        self.generation += 1;
        Ok(self.cleaned.insert(cleaned))
    }

    /// Chooses the model inputs. The new names are checked against the
    /// cleaned table right away if there is one; the whole selection is
    /// checked again at training time.
    pub fn choose_x_cols<I, S>(&mut self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut features = self.features.clone();
        features.choose_x_cols(names);
        if let Some(table) = &self.cleaned {
            features.check_xcols(table)?;
        }
        self.features = features;
        Ok(())
    }

    pub fn choose_y_col(&mut self, name: &str) -> Result<()> {
        let mut features = self.features.clone();
        features.choose_y_col(name);
        if let Some(table) = &self.cleaned {
            features.check_ycol(table)?;
        }
        self.features = features;
        Ok(())
    }

    /// Fits the model on the current cleaned table and selection.
    pub fn train(&mut self) -> Result<&TrainedModel> {
        let table = self
            .cleaned
            .as_ref()
            .ok_or_else(|| {
                GamutError::InvalidInput("clean() must run before train()".to_string())
            })?;
        let trained = self
            .adapter
            .train_generation(table, &self.features, self.generation)?;
        Ok(self.trained.insert(trained))
    }

    /// The trained model together with the table it was trained on.
    fn current(&self) -> Result<(&TrainedModel, &CleanedTable)> {
        let trained = self
            .trained
            .as_ref()
            .ok_or_else(|| {
                GamutError::InvalidInput("no trained model; call train() first".to_string())
            })?;
        let table = self
            .cleaned
            .as_ref()
            .ok_or_else(|| GamutError::InvalidInput("no cleaned table".to_string()))?;
        if trained.generation() != self.generation {
            return Err(GamutError::InvalidInput(
                "the table was re-cleaned after training; call train() again".to_string(),
            ));
        }
        Ok((trained, table))
    }

    pub fn export_global(&self, name: &str, include_all_columns: bool) -> Result<GlobalDocument> {
        let (trained, table) = self.current()?;
        export_global(trained, table, name, include_all_columns)
    }

    pub fn export_local(&self, include_all_columns: bool) -> Result<LocalDocument> {
        let (trained, table) = self.current()?;
        export_local(trained, table, include_all_columns)
    }

    /// Both documents, with the residual RMS attached to the global one.
    pub fn artifacts(&self, name: &str, include_all_columns: bool) -> Result<Artifacts> {
        let (trained, table) = self.current()?;
        Artifacts::build(trained, table, name, include_all_columns)
    }

    /// Exports and writes `<name>-gaam.json` and
    /// `<name>-gaam-instance-data.json` into `directory`.
    pub fn output_model(
        &self,
        name: &str,
        directory: impl AsRef<Path>,
        include_all_columns: bool,
    ) -> Result<ArtifactPaths> {
        let config = ExportConfig::default()
            .with_name(name)
            .with_directory(directory.as_ref())
            .with_all_columns(include_all_columns);
        self.output_model_with(&config)
    }

    pub fn output_model_with(&self, config: &ExportConfig) -> Result<ArtifactPaths> {
        let artifacts = self.artifacts(&config.name, config.include_all_columns)?;
        let paths = ArtifactWriter::from_config(config).write(&config.name, &artifacts)?;
        info!(name = %config.name, instances = artifacts.local.len(), "Exported model for GAMut");
        Ok(paths)
    }
}

impl<M: AdditiveModel + Default> GamutRegressor<M> {
    /// Replaces the model with a fresh one and forgets the trained state.
    pub fn reinit(&mut self) {
        self.adapter.reinit();
        self.trained = None;
    }
}
