// src/export/local.rs
use serde::Serialize;
use tracing::debug;

use super::unused_columns;
use crate::adapter::TrainedModel;
use crate::core::{Cell, CleanedTable, GamutError, Result};

/// One feature's contribution to one instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContributionRecord {
    pub name: String,
    #[serde(rename = "X")]
    pub x: Cell,
    pub pdep: f64,
    /// The model gives no per-instance bounds; always `0.0`.
    #[serde(rename = "confi_u_X")]
    pub confi_u_x: f64,
    #[serde(rename = "confi_l_X")]
    pub confi_l_x: f64,
}

impl ContributionRecord {
    fn new(name: &str, x: Cell, pdep: f64) -> Self {
        ContributionRecord {
            name: name.to_string(),
            x,
            pdep,
            confi_u_x: 0.0,
            confi_l_x: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstanceRecord {
    pub id: usize,
    pub data: Vec<ContributionRecord>,
    /// Observed target, as recorded by the local explanation.
    pub y: f64,
}

/// The `<name>-gaam-instance-data.json` document: a bare list of instances.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LocalDocument {
    pub instances: Vec<InstanceRecord>,
}

impl LocalDocument {
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

/// Builds the local document. Instance ids are positions in the local
/// explanation. With `include_all_columns`, every cleaned column the model
/// does not use is appended from the table row with zero contribution.
pub fn export_local(
    trained: &TrainedModel,
    table: &CleanedTable,
    include_all_columns: bool,
) -> Result<LocalDocument> {
    let local = trained.local();
    let unused = if include_all_columns {
        unused_columns(trained.global(), table)
    } else {
        Vec::new()
    };

    let mut instances = Vec::with_capacity(local.len());
    for (id, inst) in local.instances.iter().enumerate() {
        inst.validate(id)?;

        let mut data: Vec<ContributionRecord> = inst
            .names
            .iter()
            .zip(&inst.values)
            .zip(&inst.scores)
            .map(|((name, x), &pdep)| ContributionRecord::new(name, x.clone(), pdep))
            .collect();

        for column in &unused {
            let x = column.cell(id).ok_or_else(|| {
                GamutError::IncompatibleDimensions(format!(
                    "Instance {} has no row in column {} ({} rows).",
                    id,
                    column.name(),
                    column.len()
                ))
            })?;
            data.push(ContributionRecord::new(column.name(), x, 0.0));
        }

        instances.push(InstanceRecord {
            id,
            data,
            y: inst.actual,
        });
    }

    debug!(instances = instances.len(), "Exported local explanation");
    Ok(LocalDocument { instances })
}
