use crate::columns::{K2O, NA2O};
use crate::{Error, Result, Table};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One melt composition keyed by oxide (wt%).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sample {
    oxides: IndexMap<String, f64>,
}

impl Sample {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, oxide: impl Into<String>, value: f64) -> Self {
        self.oxides.insert(oxide.into(), value);
        self
    }

    pub fn get(&self, oxide: &str) -> Option<f64> {
        self.oxides.get(oxide).copied()
    }

    pub fn require(&self, oxide: &str) -> Result<f64> {
        self.get(oxide).ok_or_else(|| Error::MissingColumn {
            column: oxide.to_string(),
        })
    }

    /// Na2O + K2O.
    pub fn total_alkalis(&self) -> Result<f64> {
        Ok(self.require(NA2O)? + self.require(K2O)?)
    }

    pub fn oxides(&self) -> impl Iterator<Item = (&str, f64)> {
        self.oxides.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for Sample {
    fn from_iter<T: IntoIterator<Item = (S, f64)>>(iter: T) -> Self {
        Self {
            oxides: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// User sample input: a single composition or a table of compositions.
///
/// Composers dispatch on this once at entry; nothing downstream re-checks the shape.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleSet {
    Single(Sample),
    Collection(Table),
}

impl SampleSet {
    pub fn is_single(&self) -> bool {
        matches!(self, Self::Single(_))
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Collection(t) => t.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Values of one oxide across all samples.
    pub fn values(&self, oxide: &str) -> Result<Vec<f64>> {
        match self {
            Self::Single(s) => Ok(vec![s.require(oxide)?]),
            Self::Collection(t) => Ok(t.require(oxide)?.to_vec()),
        }
    }

    /// Na2O + K2O across all samples.
    pub fn total_alkalis(&self) -> Result<Vec<f64>> {
        match self {
            Self::Single(s) => Ok(vec![s.total_alkalis()?]),
            Self::Collection(t) => t.sum_columns(NA2O, K2O),
        }
    }
}

impl From<Sample> for SampleSet {
    fn from(sample: Sample) -> Self {
        Self::Single(sample)
    }
}

impl From<Table> for SampleSet {
    fn from(table: Table) -> Self {
        Self::Collection(table)
    }
}
