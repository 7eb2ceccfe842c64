// src/export/manifest.rs
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use super::writer::write_atomic;
use crate::core::Result;

/// File name of the index the viewer loads first.
pub const MANIFEST_FILE: &str = "_manifest.json";

/// Artifact suffixes, in the order they are tried against a file name.
const SUFFIXES: [&str; 3] = ["-gam", "-features", "-gaam"];

/// One dataset the viewer can open. Missing artifacts are empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DatasetEntry {
    #[serde(rename = "ga²m")]
    Gaam {
        name: String,
        model: String,
        instances: String,
    },
    #[serde(rename = "pygam")]
    Pygam {
        name: String,
        descriptions: String,
        model: String,
        instances: String,
    },
}

impl DatasetEntry {
    pub fn name(&self) -> &str {
        match self {
            DatasetEntry::Gaam { name, .. } | DatasetEntry::Pygam { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub default: String,
    pub datasets: Vec<DatasetEntry>,
}

impl Manifest {
    /// Groups artifact file names by dataset prefix. Names that are not
    /// `.json` or carry no known suffix are ignored. Datasets appear in order
    /// of their first file in sorted name order.
    pub fn from_file_names<I, S>(names: I, default: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut files: Vec<String> = names
            .into_iter()
            .map(|n| n.as_ref().to_string())
            .filter(|n| n.ends_with(".json"))
            .collect();
        files.sort();

        let mut order: Vec<String> = Vec::new();
        let mut groups: HashMap<String, Vec<String>> = HashMap::new();
        for file in files {
            let Some(prefix) = dataset_prefix(&file) else {
                continue;
            };
            let prefix = prefix.to_string();
            if !groups.contains_key(&prefix) {
                order.push(prefix.clone());
            }
            groups.entry(prefix).or_default().push(file);
        }

        let datasets = order
            .into_iter()
            .map(|name| {
                let files = groups.remove(&name).unwrap_or_default();
                entry_for(name, &files)
            })
            .collect();

        Manifest {
            default: default.to_string(),
            datasets,
        }
    }

    /// Builds the manifest from the files in `dir`.
    pub fn scan(dir: impl AsRef<Path>, default: &str) -> Result<Self> {
        let mut names = Vec::new();
        for entry in fs::read_dir(dir.as_ref())? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(Self::from_file_names(names, default))
    }

    /// Writes `_manifest.json` into `dir`.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = dir.as_ref().join(MANIFEST_FILE);
        let bytes = serde_json::to_vec_pretty(self)?;
        write_atomic(&path, &bytes)?;
        info!(path = %path.display(), datasets = self.datasets.len(), "Wrote manifest");
        Ok(path)
    }
}

/// Part of `file` before the first known suffix it contains.
fn dataset_prefix(file: &str) -> Option<&str> {
    SUFFIXES
        .iter()
        .find_map(|suffix| file.find(suffix))
        .map(|at| &file[..at])
}

fn entry_for(name: String, files: &[String]) -> DatasetEntry {
    let url = |suffix: &str| {
        let whole = format!("{}-{}.json", name, suffix);
        if files.contains(&whole) {
            whole
        } else {
            String::new()
        }
    };
    if files.iter().any(|f| f.contains("-gaam")) {
        DatasetEntry::Gaam {
            model: url("gaam"),
            instances: url("gaam-instance-data"),
            name,
        }
    } else {
        DatasetEntry::Pygam {
            descriptions: url("features"),
            model: url("gam"),
            instances: url("gam-instance-data"),
            name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn groups_gaam_and_pygam_artifacts() {
        let manifest = Manifest::from_file_names(
            [
                "income-gam.json",
                "ames-gaam.json",
                "income-features.json",
                "ames-gaam-instance-data.json",
                "income-gam-instance-data.json",
                "notes.txt",
                "_manifest.json",
            ],
            "income",
        );

        assert_eq!(manifest.default, "income");
        assert_eq!(
            manifest.datasets,
            vec![
                DatasetEntry::Gaam {
                    name: "ames".into(),
                    model: "ames-gaam.json".into(),
                    instances: "ames-gaam-instance-data.json".into(),
                },
                DatasetEntry::Pygam {
                    name: "income".into(),
                    descriptions: "income-features.json".into(),
                    model: "income-gam.json".into(),
                    instances: "income-gam-instance-data.json".into(),
                },
            ]
        );
    }

    #[test]
    fn missing_artifact_is_empty_string() {
        let manifest = Manifest::from_file_names(["ames-gaam.json"], "ames");
        assert_eq!(
            manifest.datasets[0],
            DatasetEntry::Gaam {
                name: "ames".into(),
                model: "ames-gaam.json".into(),
                instances: String::new(),
            }
        );
    }

    #[test]
    fn serializes_with_type_tag() {
        let manifest = Manifest::from_file_names(["ames-gaam.json"], "ames");
        let value = serde_json::to_value(&manifest).unwrap();
        assert_eq!(value["datasets"][0]["type"], json!("ga²m"));
        assert_eq!(value["datasets"][0]["name"], json!("ames"));
    }

    #[test]
    fn scan_and_write_round_through_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        for file in ["ames-gaam.json", "ames-gaam-instance-data.json"] {
            fs::write(dir.path().join(file), "{}").unwrap();
        }
        let manifest = Manifest::scan(dir.path(), "ames").unwrap();
        let path = manifest.write_to(dir.path()).unwrap();
        assert_eq!(path, dir.path().join(MANIFEST_FILE));

        let written: Manifest = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(written, manifest);
        assert_eq!(written.datasets.len(), 1);
        assert_eq!(written.datasets[0].name(), "ames");
    }
}
