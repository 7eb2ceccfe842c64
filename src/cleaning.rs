//! Column cleaning and imputation
//!
//! Turns a [`RawTable`] into a [`CleanedTable`]:
//! - columns with more missing entries than the threshold are dropped
//! - numeric columns are imputed with the mean of their observed values
//! - boolean and text columns are imputed with their most frequent value
//! - spaces in column names become underscores

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use ndarray::Array1;
use tracing::{debug, info, warn};

use crate::config::CleanerConfig;
use crate::core::{CleanedTable, Column, GamutError, RawColumn, RawTable, RawValues, Result, Values};
use crate::utils::stats::nan_mean;

/// Serialization-safe form of a column name. Idempotent.
pub fn normalize_column_name(name: &str) -> String {
    name.replace(' ', "_")
}

#[derive(Debug, Clone, Default)]
pub struct DataCleaner {
    config: CleanerConfig,
}

impl DataCleaner {
    pub fn new(config: CleanerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CleanerConfig {
        &self.config
    }

    /// Cleans `raw`. An empty input, or a threshold that removes every
    /// column, yields a zero-column table rather than an error.
    pub fn clean(&self, raw: &RawTable) -> Result<CleanedTable> {
        let mut columns = Vec::with_capacity(raw.n_cols());
        let mut seen = HashSet::new();

        for raw_column in raw.columns() {
            let nulls = raw_column.null_count();
            if nulls > self.config.null_threshold {
                debug!(
                    column = %raw_column.name,
                    nulls,
                    threshold = self.config.null_threshold,
                    "Dropping column over null threshold"
                );
                continue;
            }

            let Some(values) = impute(raw_column) else {
                warn!(column = %raw_column.name, "Column has no observed values, dropping it");
                continue;
            };

            let name = normalize_column_name(&raw_column.name);
            if !seen.insert(name.clone()) {
                return Err(GamutError::DuplicateColumn(name));
            }
            columns.push(Column::new(name, values));
        }

        info!(
            rows = raw.n_rows(),
            kept = columns.len(),
            dropped = raw.n_cols() - columns.len(),
            "Cleaned table"
        );
        Ok(CleanedTable::new(columns, raw.n_rows()))
    }
}

/// Fills the missing entries of one column. `None` if nothing was observed.
fn impute(column: &RawColumn) -> Option<Values> {
    match &column.values {
        RawValues::Int(v) if v.iter().all(Option::is_some) => {
            Some(Values::Int(v.iter().flatten().copied().collect()))
        }
        RawValues::Int(v) => {
            let as_float: Array1<f64> = v
                .iter()
                .map(|x| x.map(|x| x as f64).unwrap_or(f64::NAN))
                .collect();
            let mean = nan_mean(as_float.view())?;
            Some(Values::Float(fill_nan(&as_float, mean)))
        }
        RawValues::Float(v) => {
            let mean = nan_mean(v.view())?;
            Some(Values::Float(fill_nan(v, mean)))
        }
        RawValues::Bool(v) => {
            let fill = *mode(v)?;
            Some(Values::Bool(v.iter().map(|x| x.unwrap_or(fill)).collect()))
        }
        RawValues::Text(v) => {
            let fill = mode(v)?.clone();
            Some(Values::Text(
                v.iter()
                    .map(|x| x.clone().unwrap_or_else(|| fill.clone()))
                    .collect(),
            ))
        }
    }
}

fn fill_nan(values: &Array1<f64>, fill: f64) -> Array1<f64> {
    values.mapv(|x| if x.is_nan() { fill } else { x })
}

/// Most frequent observed value; ties go to the value seen first.
fn mode<T: Eq + Hash>(values: &[Option<T>]) -> Option<&T> {
    let mut index: HashMap<&T, usize> = HashMap::new();
    let mut counts: Vec<(&T, usize)> = Vec::new();
    for value in values.iter().flatten() {
        match index.get(value) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(value, counts.len());
                counts.push((value, 1));
            }
        }
    }

    let mut best: Option<(&T, usize)> = None;
    for &(value, count) in &counts {
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}
