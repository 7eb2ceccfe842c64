// src/selection.rs
use tracing::warn;

use crate::cleaning::normalize_column_name;
use crate::core::{CleanedTable, GamutError, Result};

/// Which cleaned columns feed the model, and which one it predicts.
///
/// Requested names go through the same normalization as the cleaner, so
/// callers may use the names as they appear in the raw data. Names are only
/// checked against a table in [`FeatureSet::validate`], which lets a
/// selection be made before the table is cleaned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureSet {
    xcols: Vec<String>,
    ycol: Option<String>,
}

impl FeatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the input columns.
    pub fn choose_x_cols<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.xcols = names
            .into_iter()
            .map(|n| normalize_column_name(n.as_ref()))
            .collect();
        self
    }

    /// Replaces the target column.
    pub fn choose_y_col(&mut self, name: &str) -> &mut Self {
        self.ycol = Some(normalize_column_name(name));
        self
    }

    pub fn xcols(&self) -> &[String] {
        &self.xcols
    }

    pub fn ycol(&self) -> Option<&str> {
        self.ycol.as_deref()
    }

    /// Checks the selection against `table`: at least one input column,
    /// a target, and every name present.
    pub fn validate(&self, table: &CleanedTable) -> Result<()> {
        if self.xcols.is_empty() {
            return Err(GamutError::EmptyModelInput);
        }
        let ycol = self
            .ycol
            .as_deref()
            .ok_or_else(|| GamutError::InvalidInput("no target column chosen".to_string()))?;

        self.check_names(table)?;
        if self.xcols.iter().any(|x| x == ycol) {
            warn!(target = ycol, "Target column is also selected as a model input");
        }
        Ok(())
    }

    /// Checks only that every chosen name exists in `table`.
    pub fn check_names(&self, table: &CleanedTable) -> Result<()> {
        self.check_xcols(table)?;
        self.check_ycol(table)
    }

    /// Checks that every input column exists in `table`.
    pub fn check_xcols(&self, table: &CleanedTable) -> Result<()> {
        first_missing(self.xcols.iter().map(String::as_str), table)
    }

    /// Checks that the target, if one is chosen, exists in `table`.
    pub fn check_ycol(&self, table: &CleanedTable) -> Result<()> {
        first_missing(self.ycol.as_deref().into_iter(), table)
    }
}

fn first_missing<'a>(
    mut names: impl Iterator<Item = &'a str>,
    table: &CleanedTable,
) -> Result<()> {
    match names.find(|name| !table.contains(name)) {
        Some(missing) => Err(GamutError::UnknownColumn(missing.to_string())),
        None => Ok(()),
    }
}
