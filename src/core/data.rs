// src/core/data.rs
use ndarray::Array1;
use serde::Serialize;
use std::fmt;

use super::errors::{GamutError, Result};

/// A single table or document value, restricted to what plain JSON can carry.
///
/// Serialization is untagged: `Bool` becomes `true`/`false`, `Int` a JSON
/// integer, `Float` a JSON number and `Text` a string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    /// Numeric view of the cell, if it has one. Booleans are not numbers here.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(v) => Some(*v as f64),
            Cell::Float(v) => Some(*v),
            Cell::Bool(_) | Cell::Text(_) => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Bool(v) => write!(f, "{}", v),
            Cell::Int(v) => write!(f, "{}", v),
            Cell::Float(v) => write!(f, "{}", v),
            Cell::Text(v) => f.write_str(v),
        }
    }
}

impl From<bool> for Cell {
    fn from(v: bool) -> Self {
        Cell::Bool(v)
    }
}

impl From<i64> for Cell {
    fn from(v: i64) -> Self {
        Cell::Int(v)
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Float(v)
    }
}

impl From<&str> for Cell {
    fn from(v: &str) -> Self {
        Cell::Text(v.to_string())
    }
}

impl From<String> for Cell {
    fn from(v: String) -> Self {
        Cell::Text(v)
    }
}

/// Storage type of a column. Captured once during cleaning and consulted by
/// the exporters instead of inspecting individual cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Int,
    Float,
    Bool,
    Text,
}

impl ColumnKind {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnKind::Int | ColumnKind::Float)
    }
}

/// Raw column storage. `None` marks a missing entry; float columns use NaN.
#[derive(Debug, Clone)]
pub enum RawValues {
    Int(Vec<Option<i64>>),
    Float(Array1<f64>),
    Bool(Vec<Option<bool>>),
    Text(Vec<Option<String>>),
}

#[derive(Debug, Clone)]
pub struct RawColumn {
    pub name: String,
    pub values: RawValues,
}

impl RawColumn {
    pub fn new(name: impl Into<String>, values: RawValues) -> Self {
        RawColumn {
            name: name.into(),
            values,
        }
    }

    pub fn int(name: impl Into<String>, values: Vec<Option<i64>>) -> Self {
        Self::new(name, RawValues::Int(values))
    }

    pub fn float(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        let values = values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect();
        Self::new(name, RawValues::Float(values))
    }

    pub fn bool(name: impl Into<String>, values: Vec<Option<bool>>) -> Self {
        Self::new(name, RawValues::Bool(values))
    }

    pub fn text<S: Into<String>>(name: impl Into<String>, values: Vec<Option<S>>) -> Self {
        let values = values.into_iter().map(|v| v.map(Into::into)).collect();
        Self::new(name, RawValues::Text(values))
    }

    pub fn len(&self) -> usize {
        match &self.values {
            RawValues::Int(v) => v.len(),
            RawValues::Float(v) => v.len(),
            RawValues::Bool(v) => v.len(),
            RawValues::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> ColumnKind {
        match &self.values {
            RawValues::Int(_) => ColumnKind::Int,
            RawValues::Float(_) => ColumnKind::Float,
            RawValues::Bool(_) => ColumnKind::Bool,
            RawValues::Text(_) => ColumnKind::Text,
        }
    }

    /// Number of missing entries.
    pub fn null_count(&self) -> usize {
        match &self.values {
            RawValues::Int(v) => v.iter().filter(|x| x.is_none()).count(),
            RawValues::Float(v) => v.iter().filter(|x| x.is_nan()).count(),
            RawValues::Bool(v) => v.iter().filter(|x| x.is_none()).count(),
            RawValues::Text(v) => v.iter().filter(|x| x.is_none()).count(),
        }
    }
}

/// The dataset as loaded, before any cleaning. Never mutated.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    columns: Vec<RawColumn>,
    n_rows: usize,
}

impl RawTable {
    pub fn new(columns: Vec<RawColumn>) -> Result<Self> {
        let n_rows = columns.first().map(RawColumn::len).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.len() != n_rows) {
            return Err(GamutError::IncompatibleDimensions(format!(
                "Column {} has {} rows, but the table has {}.",
                bad.name,
                bad.len(),
                n_rows
            )));
        }
        Ok(RawTable { columns, n_rows })
    }

    pub fn columns(&self) -> &[RawColumn] {
        &self.columns
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }
}

/// Cleaned column storage. There is no missing marker at all.
#[derive(Debug, Clone, PartialEq)]
pub enum Values {
    Int(Array1<i64>),
    Float(Array1<f64>),
    Bool(Vec<bool>),
    Text(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    values: Values,
}

impl Column {
    pub(crate) fn new(name: String, values: Values) -> Self {
        Column { name, values }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &Values {
        &self.values
    }

    pub fn kind(&self) -> ColumnKind {
        match &self.values {
            Values::Int(_) => ColumnKind::Int,
            Values::Float(_) => ColumnKind::Float,
            Values::Bool(_) => ColumnKind::Bool,
            Values::Text(_) => ColumnKind::Text,
        }
    }

    pub fn len(&self) -> usize {
        match &self.values {
            Values::Int(v) => v.len(),
            Values::Float(v) => v.len(),
            Values::Bool(v) => v.len(),
            Values::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value at `row`, typed by the column schema.
    pub fn cell(&self, row: usize) -> Option<Cell> {
        match &self.values {
            Values::Int(v) => v.get(row).map(|x| Cell::Int(*x)),
            Values::Float(v) => v.get(row).map(|x| Cell::Float(*x)),
            Values::Bool(v) => v.get(row).map(|x| Cell::Bool(*x)),
            Values::Text(v) => v.get(row).map(|x| Cell::Text(x.clone())),
        }
    }

    /// The column as floats, for numeric columns only.
    pub fn to_f64(&self) -> Option<Array1<f64>> {
        match &self.values {
            Values::Int(v) => Some(v.mapv(|x| x as f64)),
            Values::Float(v) => Some(v.clone()),
            Values::Bool(_) | Values::Text(_) => None,
        }
    }
}

/// A model-ready table: no missing values, whitespace-free column names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanedTable {
    columns: Vec<Column>,
    n_rows: usize,
}

impl CleanedTable {
    pub(crate) fn new(columns: Vec<Column>, n_rows: usize) -> Self {
        CleanedTable { columns, n_rows }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(Column::name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Projection onto `names`, in the requested order.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<CleanedTable> {
        let columns = names
            .iter()
            .map(|name| {
                self.column(name.as_ref())
                    .cloned()
                    .ok_or_else(|| GamutError::UnknownColumn(name.as_ref().to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(CleanedTable::new(columns, self.n_rows))
    }

    /// A numeric column as a regression target.
    pub fn target(&self, name: &str) -> Result<Array1<f64>> {
        let column = self
            .column(name)
            .ok_or_else(|| GamutError::UnknownColumn(name.to_string()))?;
        column
            .to_f64()
            .ok_or_else(|| GamutError::NonNumericTarget(name.to_string()))
    }
}
