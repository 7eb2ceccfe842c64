//! Fixtures shared by the unit tests.

use std::collections::HashMap;

use ndarray::ArrayView1;

use crate::adapter::{ModelAdapter, TrainedModel};
use crate::cleaning::DataCleaner;
use crate::core::{
    Cell, CleanedTable, FeatureTerm, GamutError, GlobalExplanation, InstanceExplanation,
    LocalExplanation, RawColumn, RawTable, Result, ShapeFunction, TermType,
};
use crate::selection::FeatureSet;
use crate::traits::AdditiveModel;

/// Six cleaned rows in the shape of the Ames housing data.
pub(crate) fn ames_table() -> CleanedTable {
    DataCleaner::default().clean(&ames_raw()).unwrap()
}

pub(crate) fn ames_raw() -> RawTable {
    RawTable::new(vec![
        RawColumn::float(
            "Lot Area",
            vec![Some(8450.0), Some(9600.0), None, Some(9550.0), Some(14260.0), Some(9600.0)],
        ),
        RawColumn::text(
            "MS Zoning",
            vec![Some("RL"), Some("RL"), Some("RM"), None, Some("RL"), Some("RM")],
        ),
        RawColumn::bool(
            "Central Air",
            vec![Some(true), Some(false), Some(true), Some(true), None, Some(false)],
        ),
        RawColumn::int(
            "Year Built",
            vec![Some(2003), Some(1976), Some(2001), Some(1915), Some(2000), Some(1993)],
        ),
        RawColumn::float(
            "SalePrice",
            vec![
                Some(208500.0),
                Some(181500.0),
                Some(223500.0),
                Some(140000.0),
                Some(250000.0),
                Some(143000.0),
            ],
        ),
    ])
    .unwrap()
}

/// `ames_table` trained on lot area and zoning, leaving three columns unused.
pub(crate) fn trained_on_ames() -> (CleanedTable, TrainedModel) {
    let table = ames_table();
    let mut fs = FeatureSet::new();
    fs.choose_x_cols(["Lot Area", "MS Zoning"]).choose_y_col("SalePrice");
    let trained = ModelAdapter::new(BinMeanModel::default())
        .train(&table, &fs)
        .unwrap();
    (table, trained)
}

#[derive(Debug, Clone, Default)]
struct Fitted {
    columns: Vec<String>,
    intercept: f64,
    terms: Vec<FeatureTerm>,
    lookup: Vec<HashMap<String, f64>>,
}

/// Deterministic additive model: one bin per distinct value, scored by the
/// mean target of its rows minus the overall mean. Upper bounds sit
/// `upper_offset` above each score.
#[derive(Debug, Clone, Default)]
pub(crate) struct BinMeanModel {
    upper_offset: f64,
    fitted: Option<Fitted>,
}

impl BinMeanModel {
    pub(crate) fn with_upper_offset(upper_offset: f64) -> Self {
        BinMeanModel {
            upper_offset,
            fitted: None,
        }
    }

    pub(crate) fn fitted_columns(&self) -> &[String] {
        self.fitted.as_ref().map(|f| f.columns.as_slice()).unwrap_or(&[])
    }

    fn fitted(&self) -> Result<&Fitted> {
        self.fitted
            .as_ref()
            .ok_or_else(|| GamutError::Model("model is not fitted".to_string()))
    }
}

impl AdditiveModel for BinMeanModel {
    fn fit(&mut self, x: &CleanedTable, y: ArrayView1<'_, f64>) -> Result<()> {
        let intercept = y.mean().unwrap_or(0.0);
        let mut terms = Vec::new();
        let mut lookup = Vec::new();

        for column in x.columns() {
            let mut levels: Vec<(String, Cell, f64, usize)> = Vec::new();
            for row in 0..x.n_rows() {
                let cell = column.cell(row).unwrap();
                let key = cell.to_string();
                match levels.iter_mut().find(|(k, ..)| *k == key) {
                    Some(level) => {
                        level.2 += y[row];
                        level.3 += 1;
                    }
                    None => levels.push((key, cell, y[row], 1)),
                }
            }
            if column.kind().is_numeric() {
                levels.sort_by(|a, b| {
                    a.1.as_f64()
                        .partial_cmp(&b.1.as_f64())
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
            }

            let scores: Vec<f64> = levels
                .iter()
                .map(|(_, _, sum, n)| sum / *n as f64 - intercept)
                .collect();
            let table: HashMap<String, f64> = levels
                .iter()
                .zip(&scores)
                .map(|((key, ..), s)| (key.clone(), *s))
                .collect();
            let influence = levels
                .iter()
                .zip(&scores)
                .map(|((.., n), s)| s.abs() * *n as f64)
                .sum::<f64>()
                / x.n_rows().max(1) as f64;

            terms.push(FeatureTerm {
                name: column.name().to_string(),
                term_type: if column.kind().is_numeric() {
                    TermType::Continuous
                } else {
                    TermType::Categorical
                },
                influence,
                shape: ShapeFunction {
                    upper_bounds: scores.iter().map(|s| s + self.upper_offset).collect(),
                    names: levels.into_iter().map(|(_, cell, ..)| cell).collect(),
                    scores,
                },
            });
            lookup.push(table);
        }

        self.fitted = Some(Fitted {
            columns: x.names().map(str::to_string).collect(),
            intercept,
            terms,
            lookup,
        });
        Ok(())
    }

    fn explain_global(&self) -> Result<GlobalExplanation> {
        let fitted = self.fitted()?;
        Ok(GlobalExplanation {
            terms: fitted.terms.clone(),
            intercept: fitted.intercept,
        })
    }

    fn explain_local(&self, x: &CleanedTable, y: ArrayView1<'_, f64>) -> Result<LocalExplanation> {
        let fitted = self.fitted()?;
        let mut instances = Vec::with_capacity(x.n_rows());
        for row in 0..x.n_rows() {
            let values: Vec<Cell> = x.columns().iter().map(|c| c.cell(row).unwrap()).collect();
            let scores: Vec<f64> = values
                .iter()
                .zip(&fitted.lookup)
                .map(|(v, table)| table.get(&v.to_string()).copied().unwrap_or(0.0))
                .collect();
            let predicted = fitted.intercept + scores.iter().sum::<f64>();
            instances.push(InstanceExplanation {
                names: fitted.columns.clone(),
                values,
                scores,
                actual: y[row],
                predicted,
            });
        }
        let residuals = instances.iter().map(|i| i.actual - i.predicted).collect();
        Ok(LocalExplanation {
            instances,
            residuals,
        })
    }
}
