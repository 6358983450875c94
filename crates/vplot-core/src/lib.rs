#![forbid(unsafe_code)]

//! Sample tables, polynomial curve shaping, and the calibration catalog contract behind `vplot`.
//!
//! Design goals:
//! - curve shaping is a pure function of its inputs (no hidden state between calls)
//! - fit failures are values, never panics or errors; callers fall back to raw points
//! - the calibration catalog is a read-only collaborator behind a trait

pub mod calibration;
pub mod config;
pub mod error;
pub mod fit;
pub mod format;
pub mod geom;
pub mod numeric;
pub mod sample;
pub mod shape;
pub mod table;

#[cfg(test)]
mod tests;

pub use calibration::{
    ALL_MODELS, Applicability, CalibrationCatalog, CalibrationEntry, CatalogData, CatalogModel,
    ChemicalSystem, InMemoryCatalog, MIXED_MODELS, ModelUnavailable,
};
pub use config::PlotConfig;
pub use error::{Error, Result};
pub use fit::{Degenerate, PolyFit, Polynomial, linspace, polyfit};
pub use numeric::{QuietFitWarnings, fit_warnings_enabled};
pub use sample::{Sample, SampleSet};
pub use shape::{
    CurveFit, CurveGroup, ShapeOptions, SmoothedCurves, curves_to_table, extend_to_axes, shape,
    smooth_isobars_and_isopleths,
};
pub use table::Table;

/// Column names shared by isobar, isopleth and degassing-path tables.
pub mod columns {
    pub const PRESSURE: &str = "Pressure";
    pub const XH2O_FL: &str = "XH2O_fl";
    pub const H2O_LIQ: &str = "H2O_liq";
    pub const CO2_LIQ: &str = "CO2_liq";

    pub const SIO2: &str = "SiO2";
    pub const NA2O: &str = "Na2O";
    pub const K2O: &str = "K2O";
    /// Pre-summed alkalis, as some calibration datasets ship them.
    pub const NA2O_K2O: &str = "Na2O+K2O";
}
