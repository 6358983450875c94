//! Total-alkali-silica (TAS) and oxide-pair diagrams of model calibration datasets.
//!
//! Calibration points are grouped under two bold legend headings, pure-H2O models first, then
//! CO2 and mixed-fluid models. A model the catalog cannot serve is skipped with a warning so one
//! bad entry never blanks the whole chart.

use crate::{PlotError, Result};
use std::path::PathBuf;
use std::str::FromStr;
use vplot_core::columns::{K2O, NA2O, NA2O_K2O, SIO2};
use vplot_core::geom::{Point, point, zip_points};
use vplot_core::{
    ALL_MODELS, Applicability, CalibrationCatalog, CalibrationEntry, ChemicalSystem, MIXED_MODELS,
    QuietFitWarnings, SampleSet, Table,
};
use vplot_render::{
    Annotation, AxisLimits, Figure, HAlign, LegendLabel, LegendPlacement, LineStyle, Marker,
    Series, Theme, VAlign,
};

pub const DEFAULT_FIG_SIZE: (f64, f64) = (17.0, 8.0);
pub const TAS_X_LIMITS: (f64, f64) = (35.0, 100.0);
pub const TAS_Y_LIMITS: (f64, f64) = (0.0, 25.0);

const AXIS_LABEL_FONT_SIZE: f64 = 20.0;
const AXIS_LABEL_PADDING: f64 = 15.0;
const FIELD_FONT_SIZE: f64 = 12.0;
const FIELD_LINE_WIDTH: f64 = 1.0;
const FIELD_Z_ORDER: i32 = 0;
const LEGEND_ANCHOR_X: f64 = 1.04;
const AROUND_SAMPLE_SILICA: f64 = 5.0;
const AROUND_SAMPLE_ALKALIS: f64 = 2.0;
/// Marker area in square points.
const USER_MARKER_AREA: f64 = 150.0;

/// Le Maitre classification boundaries as `(x1, y1, x2, y2)` in SiO2/alkali space.
pub const TAS_FIELD_LINES: [(f64, f64, f64, f64); 18] = [
    (41.0, 0.0, 41.0, 7.0),
    (41.0, 7.0, 52.5, 14.0),
    (45.0, 0.0, 45.0, 5.0),
    (41.0, 3.0, 45.0, 3.0),
    (45.0, 5.0, 61.0, 13.5),
    (45.0, 5.0, 52.0, 5.0),
    (52.0, 5.0, 69.0, 8.0),
    (49.4, 7.3, 52.0, 5.0),
    (52.0, 5.0, 52.0, 0.0),
    (48.4, 11.5, 53.0, 9.3),
    (53.0, 9.3, 57.0, 5.9),
    (57.0, 5.9, 57.0, 0.0),
    (52.5, 14.0, 57.6, 11.7),
    (57.6, 11.7, 63.0, 7.0),
    (63.0, 7.0, 63.0, 0.0),
    (69.0, 12.0, 69.0, 8.0),
    (45.0, 9.4, 49.4, 7.3),
    (69.0, 8.0, 77.0, 0.0),
];

/// Field names as `(text, x, y, rotation)`; rotation in degrees, counter-clockwise.
pub const TAS_FIELD_NAMES: [(&str, f64, f64, f64); 16] = [
    ("Picro\nbasalt", 43.0, 2.0, 0.0),
    ("Basalt", 48.5, 2.0, 0.0),
    ("Basaltic\nandesite", 54.5, 2.0, 0.0),
    ("Andesite", 60.0, 2.0, 0.0),
    ("Dacite", 68.5, 2.0, 0.0),
    ("Rhyolite", 76.0, 9.0, 0.0),
    (
        "Trachyte\n(Q < 20%)\n\nTrachydacite\n(Q > 20%)",
        64.5,
        11.5,
        0.0,
    ),
    ("Basaltic\ntrachyandesite", 53.0, 8.0, -20.0),
    ("Trachy-\nbasalt", 49.0, 6.2, 0.0),
    ("Trachyandesite", 57.2, 9.0, 0.0),
    ("Phonotephrite", 49.0, 9.6, 0.0),
    ("Tephriphonolite", 53.0, 11.8, 0.0),
    ("Phonolite", 57.5, 13.5, 0.0),
    ("Tephrite\n(Ol < 10%)", 45.0, 8.0, 0.0),
    ("Foidite", 44.0, 11.5, 0.0),
    ("Basanite\n(Ol > 10%)", 43.5, 6.5, 0.0),
];

/// Draws the TAS field boundaries and names beneath everything else.
pub fn add_le_maitre_fields(fig: &mut Figure, font_size: f64, color: &str) {
    for (x1, y1, x2, y2) in TAS_FIELD_LINES {
        fig.add_series(
            Series::line(vec![point(x1, y1), point(x2, y2)], LineStyle::Solid)
                .with_color(color)
                .with_line_width(FIELD_LINE_WIDTH)
                .with_z_order(FIELD_Z_ORDER),
        );
    }
    for (text, x, y, rotation) in TAS_FIELD_NAMES {
        fig.annotate(
            Annotation::new(text, point(x, y))
                .with_font_size(font_size)
                .with_color(color)
                .with_rotation(rotation)
                .with_align(HAlign::Center, VAlign::Top)
                .with_z_order(FIELD_Z_ORDER),
        );
    }
}

/// What goes on the axes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PlotKind {
    /// Total alkalis against silica.
    #[default]
    Tas,
    /// Any two oxide columns.
    Xy { x: String, y: String },
}

impl PlotKind {
    /// Parses the `("TAS" | "xy", x, y)` argument triple. `xy` requires both oxide names.
    pub fn parse(kind: &str, x: Option<&str>, y: Option<&str>) -> Result<Self> {
        match kind {
            "TAS" => Ok(Self::Tas),
            "xy" => match (x, y) {
                (Some(x), Some(y)) => Ok(Self::Xy {
                    x: x.to_string(),
                    y: y.to_string(),
                }),
                _ => Err(PlotError::input(
                    "If plot_type is 'xy', then x and y values must be passed as strings. \
                     For example, x='SiO2', y='Al2O3'.",
                )),
            },
            _ => Err(PlotError::input("plot_type must be 'TAS' or 'xy'")),
        }
    }
}

/// Which calibration datasets to plot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModelSelection {
    #[default]
    All,
    /// Models applicable to mixed H2O-CO2 fluids.
    Mixed,
    Named(Vec<String>),
}

impl ModelSelection {
    pub fn names(&self) -> Vec<String> {
        match self {
            Self::All => ALL_MODELS.iter().map(|m| m.to_string()).collect(),
            Self::Mixed => MIXED_MODELS.iter().map(|m| m.to_string()).collect(),
            Self::Named(names) => names.clone(),
        }
    }
}

impl FromStr for ModelSelection {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "" => Err(PlotError::input("model must name at least one model")),
            "all" => Ok(Self::All),
            "mixed" => Ok(Self::Mixed),
            name => Ok(Self::Named(vec![name.to_string()])),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Zoom {
    /// 35-100 wt% SiO2 by 0-25 wt% alkalis for TAS; autoscaled for xy.
    #[default]
    Default,
    /// ±5 wt% SiO2 and ±2 wt% alkalis around a single user sample.
    AroundSample,
    Limits { x: (f64, f64), y: (f64, f64) },
}

#[derive(Debug, Clone)]
pub struct TasPlot<'a> {
    pub user_data: Option<&'a SampleSet>,
    pub models: ModelSelection,
    pub kind: PlotKind,
    pub zoom: Zoom,
    pub legend: bool,
    /// Inches.
    pub fig_size: (f64, f64),
    pub save_fig: Option<PathBuf>,
}

impl Default for TasPlot<'_> {
    fn default() -> Self {
        Self {
            user_data: None,
            models: ModelSelection::default(),
            kind: PlotKind::default(),
            zoom: Zoom::default(),
            legend: true,
            fig_size: DEFAULT_FIG_SIZE,
            save_fig: None,
        }
    }
}

fn around_sample(sample: &SampleSet) -> Result<Option<(AxisLimits, AxisLimits)>> {
    let SampleSet::Single(sample) = sample else {
        tracing::warn!(
            "Zoom option 'user_data' can only be used if one sample is passed. \
             Using default zoom values."
        );
        return Ok(None);
    };
    let silica = sample
        .require(SIO2)
        .map_err(|_| PlotError::input("SiO2 data must be in user_data"))?;
    let alkalis = sample
        .total_alkalis()
        .map_err(|_| PlotError::input("Na2O and K2O data must be in user_data"))?;
    Ok(Some((
        AxisLimits::fixed(silica - AROUND_SAMPLE_SILICA, silica + AROUND_SAMPLE_SILICA),
        AxisLimits::fixed(
            (alkalis - AROUND_SAMPLE_ALKALIS).max(0.0),
            alkalis + AROUND_SAMPLE_ALKALIS,
        ),
    )))
}

/// Returns `None` when the axes should autoscale.
fn resolve_limits(plot: &TasPlot<'_>) -> Result<Option<(AxisLimits, AxisLimits)>> {
    let defaults = match plot.kind {
        PlotKind::Tas => Some((
            AxisLimits::fixed(TAS_X_LIMITS.0, TAS_X_LIMITS.1),
            AxisLimits::fixed(TAS_Y_LIMITS.0, TAS_Y_LIMITS.1),
        )),
        PlotKind::Xy { .. } => None,
    };
    match plot.zoom {
        Zoom::Default => Ok(defaults),
        Zoom::Limits { x, y } => Ok(Some((
            AxisLimits::fixed(x.0, x.1),
            AxisLimits::fixed(y.0, y.1),
        ))),
        Zoom::AroundSample => {
            let Some(user_data) = plot.user_data else {
                return Err(PlotError::input(
                    "Zoom option 'user_data' requires user_data to be passed.",
                ));
            };
            Ok(around_sample(user_data)?.or(defaults))
        }
    }
}

/// Alkalis for a calibration subset: the pre-summed column when present, else Na2O + K2O.
fn calibration_alkalis(table: &Table) -> Option<Vec<f64>> {
    if let Some(combined) = table.column(NA2O_K2O) {
        return Some(combined.to_vec());
    }
    table.sum_columns(NA2O, K2O).ok()
}

fn calibration_points(table: &Table, kind: &PlotKind) -> Option<Vec<Point>> {
    match kind {
        PlotKind::Tas => {
            let silica = table.column(SIO2)?;
            Some(zip_points(silica, &calibration_alkalis(table)?))
        }
        PlotKind::Xy { x, y } => Some(zip_points(table.column(x)?, table.column(y)?)),
    }
}

/// One model's share of the legend, resolved before any series is added.
struct ModelRows<'c> {
    name: String,
    applicability: Applicability,
    entry: Option<&'c CalibrationEntry>,
}

fn resolve_models<'c>(
    names: &[String],
    catalog: &'c dyn CalibrationCatalog,
) -> Vec<ModelRows<'c>> {
    names
        .iter()
        .filter_map(|name| {
            let Some(applicability) = catalog.applicability(name) else {
                tracing::warn!(model = %name, "Unknown model {name}; skipping.");
                return None;
            };
            let entry = match catalog.dataset(name) {
                Ok(entry) => Some(entry),
                Err(unavailable) => {
                    tracing::warn!(model = %name, "{unavailable}");
                    None
                }
            };
            Some(ModelRows {
                name: name.clone(),
                applicability,
                entry,
            })
        })
        .collect()
}

fn add_calibration_series(
    fig: &mut Figure,
    model: &ModelRows<'_>,
    table: &Table,
    kind: &PlotKind,
    marker: Marker,
) {
    let Some(entry) = model.entry else { return };
    let Some(points) = calibration_points(table, kind) else {
        tracing::warn!(
            model = %model.name,
            "The requested oxides were not found in the calibration dataset for {}.",
            model.name
        );
        return;
    };
    fig.add_series(
        Series::markers(points, marker)
            .with_color(entry.face_color.clone())
            .with_edge_color("black")
            .with_label(LegendLabel::entry(model.name.clone())),
    );
}

fn warn_missing_subset(model: &str, system: ChemicalSystem) {
    tracing::warn!(model = %model, ?system, "Calibration dataset for {model} has no {system:?} subset.");
}

fn add_h2o_section(fig: &mut Figure, models: &[ModelRows<'_>], kind: &PlotKind) {
    fig.add_series(Series::heading("Pure H₂O:"));
    for model in models.iter().filter(|m| m.applicability.h2o) {
        let Some(entry) = model.entry else { continue };
        match entry.subset(ChemicalSystem::PureH2O) {
            Some(table) => add_calibration_series(fig, model, table, kind, Marker::Square),
            None => warn_missing_subset(&model.name, ChemicalSystem::PureH2O),
        }
    }
}

fn add_co2_section(fig: &mut Figure, models: &[ModelRows<'_>], kind: &PlotKind) {
    fig.add_series(Series::heading("CO₂ and H₂O-CO₂:"));
    for model in models
        .iter()
        .filter(|m| m.applicability.co2 || m.applicability.mixed)
    {
        let Some(entry) = model.entry else { continue };
        let Applicability { co2, mixed, .. } = model.applicability;
        let combined;
        let table = if co2 && mixed {
            match (entry.co2.as_ref(), entry.mixed.as_ref()) {
                (Some(a), Some(b)) => {
                    combined = Table::concat([a, b]);
                    Some(&combined)
                }
                (Some(only), None) | (None, Some(only)) => Some(only),
                (None, None) => None,
            }
        } else if mixed {
            entry.subset(ChemicalSystem::Mixed)
        } else {
            entry.subset(ChemicalSystem::PureCO2)
        };
        match table {
            Some(table) => add_calibration_series(fig, model, table, kind, Marker::ThinDiamond),
            None => warn_missing_subset(
                &model.name,
                if mixed {
                    ChemicalSystem::Mixed
                } else {
                    ChemicalSystem::PureCO2
                },
            ),
        }
    }
}

fn user_points(user_data: &SampleSet, kind: &PlotKind) -> Result<Vec<Point>> {
    match kind {
        PlotKind::Tas => {
            let silica = user_data
                .values(SIO2)
                .map_err(|_| PlotError::input("SiO2 data must be in user_data"))?;
            let alkalis = user_data
                .total_alkalis()
                .map_err(|_| PlotError::input("Na2O and K2O data must be in user_data"))?;
            Ok(zip_points(&silica, &alkalis))
        }
        PlotKind::Xy { x, y } => {
            let missing = |oxide: &str| PlotError::input(format!("{oxide} data must be in user_data"));
            let xs = user_data.values(x).map_err(|_| missing(x))?;
            let ys = user_data.values(y).map_err(|_| missing(y))?;
            Ok(zip_points(&xs, &ys))
        }
    }
}

/// Builds a TAS (or oxide-pair) diagram of the selected models' calibration datasets.
///
/// Usage errors (bad zoom input, missing user oxides, empty model list) are returned before
/// anything is drawn. Catalog problems for individual models are logged and that model is
/// skipped.
pub fn compose_tas(
    plot: &TasPlot<'_>,
    catalog: &dyn CalibrationCatalog,
    theme: &Theme,
) -> Result<Figure> {
    let _quiet = QuietFitWarnings::enter();

    let names = plot.models.names();
    if names.is_empty() {
        return Err(PlotError::input("model must name at least one model"));
    }
    let limits = resolve_limits(plot)?;
    let user = plot
        .user_data
        .map(|data| user_points(data, &plot.kind))
        .transpose()?;

    let (width, height) = plot.fig_size;
    let mut fig = Figure::new(width, height);
    fig.tight_layout = true;
    fig.axis_label_font_size = Some(AXIS_LABEL_FONT_SIZE);
    fig.axis_label_padding = AXIS_LABEL_PADDING;
    match &plot.kind {
        PlotKind::Tas => fig.set_labels("SiO₂, wt%", "Na₂O+K₂O, wt%"),
        PlotKind::Xy { x, y } => fig.set_labels(format!("{x}, wt%"), format!("{y}, wt%")),
    }
    if let Some((x, y)) = limits {
        fig.x_limits = x;
        fig.y_limits = y;
    }
    if plot.kind == PlotKind::Tas && plot.zoom == Zoom::Default {
        add_le_maitre_fields(&mut fig, FIELD_FONT_SIZE, &theme.field_color);
    }

    let models = resolve_models(&names, catalog);
    let has_h2o = models.iter().any(|m| m.applicability.h2o);
    let has_co2 = models
        .iter()
        .any(|m| m.applicability.co2 || m.applicability.mixed);
    if has_h2o {
        add_h2o_section(&mut fig, &models, &plot.kind);
        if has_co2 {
            fig.add_series(Series::heading(""));
        }
    }
    if has_co2 {
        add_co2_section(&mut fig, &models, &plot.kind);
    }

    if let Some(points) = user {
        fig.add_series(
            Series::markers(points, Marker::FilledPlus)
                .with_color("red")
                .with_edge_color("white")
                .with_marker_size(USER_MARKER_AREA.sqrt())
                .with_label(LegendLabel::entry("User Data")),
        );
    }

    if plot.legend {
        fig.legend = Some(LegendPlacement::outside_right(LEGEND_ANCHOR_X));
    }

    tracing::debug!(
        models = models.len(),
        series = fig.series().len(),
        "composed TAS diagram"
    );
    Ok(fig)
}
