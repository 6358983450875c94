//! Column-oriented numeric tables.
//!
//! Isobar/isopleth outputs, degassing paths, calibration subsets and sample collections all share
//! this container. Columns keep insertion order and always have the same length.

use crate::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::io::Read;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "IndexMap<String, Vec<f64>>",
    into = "IndexMap<String, Vec<f64>>"
)]
pub struct Table {
    columns: IndexMap<String, Vec<f64>>,
    rows: usize,
}

/// Group-key equality used when partitioning rows. NaN keys form one group.
pub(crate) fn same_key(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<f64>)>,
        S: Into<String>,
    {
        let mut out = Self::new();
        for (name, values) in columns {
            out.insert_column(name, values)?;
        }
        Ok(out)
    }

    pub fn with_column(mut self, name: impl Into<String>, values: Vec<f64>) -> Result<Self> {
        self.insert_column(name, values)?;
        Ok(self)
    }

    /// Inserts or replaces a column. The first column fixes the row count.
    pub fn insert_column(&mut self, name: impl Into<String>, values: Vec<f64>) -> Result<()> {
        let name = name.into();
        let sets_row_count =
            self.columns.is_empty() || (self.columns.len() == 1 && self.columns.contains_key(&name));
        if !sets_row_count && values.len() != self.rows {
            return Err(Error::RaggedColumn {
                column: name,
                expected: self.rows,
                found: values.len(),
            });
        }
        self.rows = values.len();
        self.columns.insert(name, values);
        Ok(())
    }

    /// Appends one row, values given in column order.
    pub fn push_row(&mut self, values: &[f64]) -> Result<()> {
        if values.len() != self.columns.len() {
            return Err(Error::RowWidth {
                expected: self.columns.len(),
                found: values.len(),
            });
        }
        for (column, v) in self.columns.values_mut().zip(values) {
            column.push(*v);
        }
        self.rows += 1;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    pub fn require(&self, name: &str) -> Result<&[f64]> {
        self.column(name).ok_or_else(|| Error::MissingColumn {
            column: name.to_string(),
        })
    }

    /// Distinct values of a column in order of first appearance.
    pub fn unique(&self, name: &str) -> Result<Vec<f64>> {
        let column = self.require(name)?;
        let mut out: Vec<f64> = Vec::new();
        for &v in column {
            if !out.iter().any(|&seen| same_key(seen, v)) {
                out.push(v);
            }
        }
        Ok(out)
    }

    /// Column maximum, skipping NaN. `None` for an empty or all-NaN column.
    pub fn max(&self, name: &str) -> Result<Option<f64>> {
        let column = self.require(name)?;
        Ok(column
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v)))))
    }

    /// Element-wise sum of two columns.
    pub fn sum_columns(&self, a: &str, b: &str) -> Result<Vec<f64>> {
        let a = self.require(a)?;
        let b = self.require(b)?;
        Ok(a.iter().zip(b).map(|(x, y)| x + y).collect())
    }

    /// Stacks tables vertically. Columns are the union in first-seen order; cells a table does
    /// not have are NaN.
    pub fn concat<'a>(tables: impl IntoIterator<Item = &'a Table>) -> Table {
        let tables: Vec<&Table> = tables.into_iter().collect();
        let mut names: Vec<&str> = Vec::new();
        for t in &tables {
            for name in t.column_names() {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        let rows: usize = tables.iter().map(|t| t.len()).sum();
        let mut columns: IndexMap<String, Vec<f64>> = IndexMap::with_capacity(names.len());
        for name in names {
            let mut values = Vec::with_capacity(rows);
            for t in &tables {
                match t.column(name) {
                    Some(c) => values.extend_from_slice(c),
                    None => values.extend(std::iter::repeat_n(f64::NAN, t.len())),
                }
            }
            columns.insert(name.to_string(), values);
        }
        Table { columns, rows }
    }

    /// Reads a headed CSV. Empty cells become NaN; columns holding any non-numeric cell (sample
    /// names, notes) are dropped.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
        let mut cells: Vec<Vec<Option<f64>>> = vec![Vec::new(); headers.len()];
        let mut numeric = vec![true; headers.len()];

        for record in rdr.records() {
            let record = record?;
            for (idx, raw) in record.iter().enumerate().take(headers.len()) {
                if raw.is_empty() {
                    cells[idx].push(None);
                    continue;
                }
                match raw.parse::<f64>() {
                    Ok(v) => cells[idx].push(Some(v)),
                    Err(_) => {
                        numeric[idx] = false;
                        cells[idx].push(None);
                    }
                }
            }
            for column in cells.iter_mut().skip(record.len()) {
                column.push(None);
            }
        }

        let mut out = Table::new();
        for ((name, values), keep) in headers.into_iter().zip(cells).zip(numeric) {
            if !keep {
                tracing::debug!(column = %name, "dropping non-numeric CSV column");
                continue;
            }
            let values = values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect();
            out.insert_column(name, values)?;
        }
        Ok(out)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl TryFrom<IndexMap<String, Vec<f64>>> for Table {
    type Error = Error;

    fn try_from(columns: IndexMap<String, Vec<f64>>) -> Result<Self> {
        Table::from_columns(columns)
    }
}

impl From<Table> for IndexMap<String, Vec<f64>> {
    fn from(table: Table) -> Self {
        table.columns
    }
}
