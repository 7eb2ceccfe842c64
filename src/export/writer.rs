// src/export/writer.rs
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::global::{FeatureRecord, GlobalDocument, Influence, ShapePoint, GAAM_SUFFIX};
use super::local::{ContributionRecord, InstanceRecord, LocalDocument};
use super::Artifacts;
use crate::config::ExportConfig;
use crate::core::{Cell, GamutError, Result};

/// Where one export landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub global: PathBuf,
    pub instances: PathBuf,
}

/// Writes `<name>-gaam.json` and `<name>-gaam-instance-data.json`.
///
/// Both documents are checked for values plain JSON cannot hold before
/// either file is touched, and each file is replaced atomically, so a failed
/// write never leaves a file that looks complete.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    directory: PathBuf,
    pretty: bool,
}

impl ArtifactWriter {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        ArtifactWriter {
            directory: directory.into(),
            pretty: false,
        }
    }

    pub fn from_config(config: &ExportConfig) -> Self {
        Self::new(&config.directory).with_pretty(config.pretty)
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn global_path(&self, name: &str) -> PathBuf {
        self.directory.join(format!("{}{}.json", name, GAAM_SUFFIX))
    }

    pub fn instances_path(&self, name: &str) -> PathBuf {
        self.directory
            .join(format!("{}{}-instance-data.json", name, GAAM_SUFFIX))
    }

    pub fn write(&self, name: &str, artifacts: &Artifacts) -> Result<ArtifactPaths> {
        artifacts.global.check_json_safe("")?;
        artifacts.local.check_json_safe("")?;

        let global_bytes = self.encode(&artifacts.global)?;
        let local_bytes = self.encode(&artifacts.local)?;

        let paths = ArtifactPaths {
            global: self.global_path(name),
            instances: self.instances_path(name),
        };
        write_atomic(&paths.global, &global_bytes)?;
        if let Err(err) = write_atomic(&paths.instances, &local_bytes) {
            // A global document without its instances is not a usable artifact.
            if let Err(cleanup) = fs::remove_file(&paths.global) {
                warn!(
                    path = %paths.global.display(),
                    error = %cleanup,
                    "Could not remove orphaned global artifact"
                );
            }
            return Err(err);
        }

        info!(
            global = %paths.global.display(),
            instances = %paths.instances.display(),
            "Wrote model artifacts"
        );
        Ok(paths)
    }

    fn encode<T: Serialize>(&self, doc: &T) -> Result<Vec<u8>> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(doc)?
        } else {
            serde_json::to_vec(doc)?
        };
        Ok(bytes)
    }
}

/// Writes `bytes` to a sibling temp file and renames it over `path`.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            GamutError::InvalidInput(format!("path has no file name: {}", path.display()))
        })?;
    let tmp_path = path.with_file_name(format!(".{}.tmp-{}", file_name, std::process::id()));

    if let Err(err) = fs::write(&tmp_path, bytes).and_then(|_| fs::rename(&tmp_path, path)) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err.into());
    }
    Ok(())
}

/// Rejects values that have no plain JSON form. `path` locates the value
/// within its document, e.g. `features[2].shape[0].sd`.
pub(crate) trait JsonSafe {
    fn check_json_safe(&self, path: &str) -> Result<()>;
}

fn check_number(value: f64, path: &str) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(GamutError::Serialization {
            field: path.to_string(),
            reason: format!("{} has no JSON representation", value),
        })
    }
}

fn join(path: &str, field: &str) -> String {
    if path.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", path, field)
    }
}

impl JsonSafe for Cell {
    fn check_json_safe(&self, path: &str) -> Result<()> {
        match self {
            Cell::Float(v) => check_number(*v, path),
            Cell::Bool(_) | Cell::Int(_) | Cell::Text(_) => Ok(()),
        }
    }
}

impl JsonSafe for ShapePoint {
    fn check_json_safe(&self, path: &str) -> Result<()> {
        check_number(self.pdep, &join(path, "pdep"))?;
        self.x.check_json_safe(&join(path, "x"))?;
        check_number(self.sd, &join(path, "sd"))
    }
}

impl JsonSafe for FeatureRecord {
    fn check_json_safe(&self, path: &str) -> Result<()> {
        match self.influence {
            Influence::Diff { diff } => check_number(diff, &join(path, "influence.diff"))?,
            Influence::Flat(v) => check_number(v, &join(path, "influence"))?,
        }
        if let Some(v) = self.value {
            check_number(v, &join(path, "value"))?;
        }
        for (i, point) in self.shape.iter().enumerate() {
            point.check_json_safe(&join(path, &format!("shape[{}]", i)))?;
        }
        Ok(())
    }
}

impl JsonSafe for GlobalDocument {
    fn check_json_safe(&self, path: &str) -> Result<()> {
        for (i, record) in self.features.iter().enumerate() {
            record.check_json_safe(&join(path, &format!("features[{}]", i)))?;
        }
        if let Some(rms) = self.rms {
            check_number(rms, &join(path, "rms"))?;
        }
        Ok(())
    }
}

impl JsonSafe for ContributionRecord {
    fn check_json_safe(&self, path: &str) -> Result<()> {
        self.x.check_json_safe(&join(path, "X"))?;
        check_number(self.pdep, &join(path, "pdep"))?;
        check_number(self.confi_u_x, &join(path, "confi_u_X"))?;
        check_number(self.confi_l_x, &join(path, "confi_l_X"))
    }
}

impl JsonSafe for InstanceRecord {
    fn check_json_safe(&self, path: &str) -> Result<()> {
        for (j, entry) in self.data.iter().enumerate() {
            entry.check_json_safe(&format!("{}.data[{}]", path, j))?;
        }
        check_number(self.y, &join(path, "y"))
    }
}

impl JsonSafe for LocalDocument {
    fn check_json_safe(&self, path: &str) -> Result<()> {
        for (i, inst) in self.instances.iter().enumerate() {
            inst.check_json_safe(&format!("{}[{}]", path, i))?;
        }
        Ok(())
    }
}
