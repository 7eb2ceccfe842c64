// src/export/global.rs
use serde::Serialize;
use tracing::debug;

use super::unused_columns;
use crate::adapter::TrainedModel;
use crate::core::{Cell, CleanedTable, FeatureTerm, Result, TermType};

/// Name of the synthetic record carrying the model intercept.
pub const INTERCEPT_NAME: &str = "intercept";

/// Suffix appended to the dataset name in the global document.
pub const GAAM_SUFFIX: &str = "-gaam";

/// `dtype` of a global record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dtype {
    Continuous,
    Categorical,
    Interaction,
    Unused,
}

impl From<TermType> for Dtype {
    fn from(t: TermType) -> Self {
        match t {
            TermType::Continuous => Dtype::Continuous,
            TermType::Categorical => Dtype::Categorical,
            TermType::Interaction => Dtype::Interaction,
        }
    }
}

/// Model terms carry `{"diff": score}`; placeholder and intercept records
/// carry a bare `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Influence {
    Diff { diff: f64 },
    Flat(f64),
}

/// One bin of a shape function.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapePoint {
    pub pdep: f64,
    pub x: Cell,
    /// `upper_bound - pdep`. Negative when the model reports a bound below
    /// its score; kept as is.
    pub sd: f64,
}

impl ShapePoint {
    /// The single-entry shape used for unused columns and the intercept.
    pub fn degenerate() -> Self {
        ShapePoint {
            pdep: 0.0,
            x: Cell::Int(0),
            sd: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRecord {
    pub name: String,
    pub dtype: Dtype,
    pub influence: Influence,
    /// Only set on the intercept record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    pub shape: Vec<ShapePoint>,
}

impl FeatureRecord {
    fn from_term(term: &FeatureTerm) -> Self {
        let shape = term
            .shape
            .scores
            .iter()
            .zip(&term.shape.names)
            .zip(&term.shape.upper_bounds)
            .map(|((&pdep, x), &upper)| ShapePoint {
                pdep,
                x: x.clone(),
                sd: upper - pdep,
            })
            .collect();
        FeatureRecord {
            name: term.name.clone(),
            dtype: term.term_type.into(),
            influence: Influence::Diff {
                diff: term.influence,
            },
            value: None,
            shape,
        }
    }

    fn unused(name: &str) -> Self {
        FeatureRecord {
            name: name.to_string(),
            dtype: Dtype::Unused,
            influence: Influence::Flat(0.0),
            value: None,
            shape: vec![ShapePoint::degenerate()],
        }
    }

    fn intercept(value: f64) -> Self {
        FeatureRecord {
            name: INTERCEPT_NAME.to_string(),
            dtype: Dtype::Continuous,
            influence: Influence::Flat(0.0),
            value: Some(value),
            shape: vec![ShapePoint::degenerate()],
        }
    }
}

/// The `<name>-gaam.json` document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalDocument {
    pub name: String,
    pub features: Vec<FeatureRecord>,
    /// Root-mean-square residual, attached once the local export is done.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rms: Option<f64>,
}

/// Builds the global document: model terms in model order, then (optionally)
/// one placeholder per unused cleaned column, then the intercept.
pub fn export_global(
    trained: &TrainedModel,
    table: &CleanedTable,
    name: &str,
    include_all_columns: bool,
) -> Result<GlobalDocument> {
    let global = trained.global();
    let mut features = Vec::with_capacity(global.terms.len() + 1);

    for term in &global.terms {
        term.validate()?;
        features.push(FeatureRecord::from_term(term));
    }

    if include_all_columns {
        features.extend(
            unused_columns(global, table)
                .into_iter()
                .map(|c| FeatureRecord::unused(c.name())),
        );
    }

    features.push(FeatureRecord::intercept(global.intercept));
    debug!(records = features.len(), "Exported global explanation");

    Ok(GlobalDocument {
        name: format!("{}{}", name, GAAM_SUFFIX),
        features,
        rms: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::ModelAdapter;
    use crate::core::{GlobalExplanation, LocalExplanation, ShapeFunction};
    use crate::selection::FeatureSet;
    use crate::testing::{ames_table, trained_on_ames, BinMeanModel};
    use approx::assert_abs_diff_eq;
    use ndarray::Array1;
    use serde_json::json;

    #[test]
    fn length_is_terms_plus_intercept() {
        let (table, trained) = trained_on_ames();
        let doc = export_global(&trained, &table, "ames", false).unwrap();
        assert_eq!(doc.features.len(), trained.global().terms.len() + 1);
        assert_eq!(doc.name, "ames-gaam");

        let last = doc.features.last().unwrap();
        assert_eq!(last.name, INTERCEPT_NAME);
        assert_eq!(last.dtype, Dtype::Continuous);
        assert_eq!(last.value, Some(trained.intercept()));
        assert_eq!(last.shape, vec![ShapePoint::degenerate()]);
    }

    #[test]
    fn all_columns_adds_unused_placeholders_in_table_order() {
        let (table, trained) = trained_on_ames();
        let doc = export_global(&trained, &table, "ames", true).unwrap();

        // Lot_Area, MS_Zoning used; Central_Air, Year_Built, SalePrice unused
        assert_eq!(doc.features.len(), 2 + 3 + 1);
        let names: Vec<_> = doc.features.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Lot_Area", "MS_Zoning", "Central_Air", "Year_Built", "SalePrice", "intercept"]
        );
        for record in &doc.features[2..5] {
            assert_eq!(record.dtype, Dtype::Unused);
            assert_eq!(record.influence, Influence::Flat(0.0));
            assert_eq!(record.shape, vec![ShapePoint::degenerate()]);
        }
    }

    #[test]
    fn terms_keep_model_order_and_influence() {
        let (table, trained) = trained_on_ames();
        let doc = export_global(&trained, &table, "ames", false).unwrap();
        for (record, term) in doc.features.iter().zip(&trained.global().terms) {
            assert_eq!(record.name, term.name);
            assert_eq!(record.influence, Influence::Diff { diff: term.influence });
            assert_eq!(record.shape.len(), term.shape.len());
        }
        assert_eq!(doc.features[0].dtype, Dtype::Continuous);
        assert_eq!(doc.features[1].dtype, Dtype::Categorical);
    }

    #[test]
    fn upper_bound_below_score_gives_negative_sd() {
        let table = ames_table();
        let mut fs = FeatureSet::new();
        fs.choose_x_cols(["MS Zoning"]).choose_y_col("SalePrice");
        let trained = ModelAdapter::new(BinMeanModel::with_upper_offset(-1250.0))
            .train(&table, &fs)
            .unwrap();

        let doc = export_global(&trained, &table, "ames", false).unwrap();
        for point in &doc.features[0].shape {
            assert!(point.sd < 0.0);
            assert_abs_diff_eq!(point.sd, -1250.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn sd_is_upper_bound_minus_score() {
        let table = ames_table();
        let global = GlobalExplanation {
            terms: vec![FeatureTerm {
                name: "Overall_Qual".into(),
                term_type: TermType::Interaction,
                influence: 0.75,
                shape: ShapeFunction {
                    scores: vec![-2.0, 0.5],
                    names: vec![Cell::Int(1), Cell::Int(2)],
                    upper_bounds: vec![-1.5, 0.25],
                },
            }],
            intercept: 180000.0,
        };
        let local = LocalExplanation {
            instances: vec![],
            residuals: Array1::zeros(0),
        };
        let trained = TrainedModel::new(FeatureSet::new(), global, local, 0).unwrap();

        let doc = export_global(&trained, &table, "q", false).unwrap();
        let shape = &doc.features[0].shape;
        assert_abs_diff_eq!(shape[0].sd, 0.5);
        assert_abs_diff_eq!(shape[1].sd, -0.25);
        assert_eq!(doc.features[0].dtype, Dtype::Interaction);
    }

    #[test]
    fn serialized_form_matches_viewer_layout() {
        let (table, trained) = trained_on_ames();
        let doc = export_global(&trained, &table, "ames", true).unwrap();
        let value = serde_json::to_value(&doc).unwrap();

        assert_eq!(value["name"], json!("ames-gaam"));
        assert!(value.get("rms").is_none());
        assert!(value["features"][0]["influence"]["diff"].is_f64());
        assert!(value["features"][0].get("value").is_none());
        assert_eq!(
            value["features"][2],
            json!({
                "name": "Central_Air",
                "dtype": "unused",
                "influence": 0.0,
                "shape": [{ "pdep": 0.0, "x": 0, "sd": 0.0 }]
            })
        );
        let intercept = &value["features"][5];
        assert_eq!(intercept["name"], json!("intercept"));
        assert_eq!(intercept["dtype"], json!("continuous"));
        assert!(intercept["value"].is_f64());
    }
}
