//! Calibration catalog contract.
//!
//! Each solubility model ships a reference dataset of the melts it was calibrated on, split by
//! the fluid system the experiments used. Composers read it through [`CalibrationCatalog`]; the
//! catalog itself is owned elsewhere.

use crate::{Result, Table};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// Every model with a calibration dataset.
pub const ALL_MODELS: &[&str] = &[
    "MagmaSat",
    "Shishkina",
    "Dixon",
    "IaconoMarziano",
    "Liu",
    "AllisonCarbon",
    "MooreWater",
];

/// Models applicable to mixed H2O-CO2 fluids.
pub const MIXED_MODELS: &[&str] = &["MagmaSat", "Shishkina", "Dixon", "IaconoMarziano", "Liu"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChemicalSystem {
    #[serde(rename = "H2O")]
    PureH2O,
    #[serde(rename = "CO2")]
    PureCO2,
    Mixed,
}

/// Which fluid systems a model's calibration covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicability {
    #[serde(rename = "H2O", default)]
    pub h2o: bool,
    #[serde(rename = "CO2", default)]
    pub co2: bool,
    #[serde(rename = "Mixed", default)]
    pub mixed: bool,
}

impl Applicability {
    pub fn applies_to(&self, system: ChemicalSystem) -> bool {
        match system {
            ChemicalSystem::PureH2O => self.h2o,
            ChemicalSystem::PureCO2 => self.co2,
            ChemicalSystem::Mixed => self.mixed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationEntry {
    #[serde(rename = "H2O", default, skip_serializing_if = "Option::is_none")]
    pub h2o: Option<Table>,
    #[serde(rename = "CO2", default, skip_serializing_if = "Option::is_none")]
    pub co2: Option<Table>,
    #[serde(rename = "Mixed", default, skip_serializing_if = "Option::is_none")]
    pub mixed: Option<Table>,
    /// Marker face color used for this model.
    #[serde(rename = "facecolor")]
    pub face_color: String,
}

impl CalibrationEntry {
    pub fn new(face_color: impl Into<String>) -> Self {
        Self {
            h2o: None,
            co2: None,
            mixed: None,
            face_color: face_color.into(),
        }
    }

    pub fn with_subset(mut self, system: ChemicalSystem, table: Table) -> Self {
        match system {
            ChemicalSystem::PureH2O => self.h2o = Some(table),
            ChemicalSystem::PureCO2 => self.co2 = Some(table),
            ChemicalSystem::Mixed => self.mixed = Some(table),
        }
        self
    }

    pub fn subset(&self, system: ChemicalSystem) -> Option<&Table> {
        match system {
            ChemicalSystem::PureH2O => self.h2o.as_ref(),
            ChemicalSystem::PureCO2 => self.co2.as_ref(),
            ChemicalSystem::Mixed => self.mixed.as_ref(),
        }
    }
}

/// The catalog could not provide a dataset; `message` is meant for the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ModelUnavailable {
    pub model: String,
    pub message: String,
}

pub trait CalibrationCatalog {
    fn dataset(&self, model: &str) -> std::result::Result<&CalibrationEntry, ModelUnavailable>;

    /// `None` when the catalog does not know the model at all.
    fn applicability(&self, model: &str) -> Option<Applicability>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CatalogData {
    Available(CalibrationEntry),
    /// A model the catalog knows but cannot serve, with the reason.
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogModel {
    #[serde(rename = "type")]
    pub applicability: Applicability,
    pub data: CatalogData,
}

/// Catalog held in memory, loadable from JSON:
///
/// ```json
/// { "Dixon": { "type": { "H2O": true, "CO2": true, "Mixed": true },
///              "data": { "facecolor": "#92C5DE", "H2O": { "SiO2": [49.0], "Na2O": [2.5], "K2O": [0.3] } } } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InMemoryCatalog {
    models: IndexMap<String, CatalogModel>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        model: impl Into<String>,
        applicability: Applicability,
        entry: CalibrationEntry,
    ) {
        self.models.insert(
            model.into(),
            CatalogModel {
                applicability,
                data: CatalogData::Available(entry),
            },
        );
    }

    pub fn insert_unavailable(
        &mut self,
        model: impl Into<String>,
        applicability: Applicability,
        message: impl Into<String>,
    ) {
        self.models.insert(
            model.into(),
            CatalogModel {
                applicability,
                data: CatalogData::Unavailable(message.into()),
            },
        );
    }

    pub fn model_names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }
}

impl CalibrationCatalog for InMemoryCatalog {
    fn dataset(&self, model: &str) -> std::result::Result<&CalibrationEntry, ModelUnavailable> {
        match self.models.get(model).map(|m| &m.data) {
            Some(CatalogData::Available(entry)) => Ok(entry),
            Some(CatalogData::Unavailable(message)) => Err(ModelUnavailable {
                model: model.to_string(),
                message: message.clone(),
            }),
            None => Err(ModelUnavailable {
                model: model.to_string(),
                message: format!("No calibration dataset is available for model {model}."),
            }),
        }
    }

    fn applicability(&self, model: &str) -> Option<Applicability> {
        self.models.get(model).map(|m| m.applicability)
    }
}
