//! Isobar, isopleth, degassing-path and custom-overlay diagrams on H2O/CO2 axes.
//!
//! Every curve is added to the [`Figure`] together with its legend label, so the legend can never
//! fall out of step with what was drawn. Labels follow these rules:
//!
//! - one isobar table: one entry per pressure (`"1000 bars"`); several tables: one entry per
//!   table listing its pressures, the rest of that table's curves hidden;
//! - isopleths: one entry per table listing its fluid fractions;
//! - degassing paths: `Path<n>`, plus a hidden marker at the path's maximum;
//! - custom groups: `Custom<n>`.

use crate::{PlotError, Result};
use std::path::PathBuf;
use vplot_core::columns::{CO2_LIQ, H2O_LIQ, PRESSURE, XH2O_FL};
use vplot_core::format;
use vplot_core::geom::{point, zip_points};
use vplot_core::{QuietFitWarnings, ShapeOptions, Table, shape};
use vplot_render::{
    Figure, LegendLabel, LegendPlacement, LineStyle, Marker, Series, Symbol, Theme,
};

pub const DEFAULT_FIG_SIZE: (f64, f64) = (12.0, 8.0);
pub const DEFAULT_MARKER_SIZE: f64 = 10.0;
const LEGEND_ANCHOR_X: f64 = 1.01;

/// Inputs and styling for one solubility diagram.
///
/// Custom overlays come in two flavors: `custom_h2o`/`custom_co2` share the default H2O/CO2 axes,
/// while `custom_x`/`custom_y` switch the figure to custom axes (labels from `x_label`/`y_label`,
/// no clamping at zero). Each inner vector is one group of points.
#[derive(Debug, Clone)]
pub struct SolubilityPlot<'a> {
    pub isobars: &'a [Table],
    pub isopleths: &'a [Table],
    pub degassing_paths: &'a [Table],
    pub custom_h2o: Option<&'a [Vec<f64>]>,
    pub custom_co2: Option<&'a [Vec<f64>]>,
    pub custom_x: Option<&'a [Vec<f64>]>,
    pub custom_y: Option<&'a [Vec<f64>]>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    /// One per isobar table; only used when several tables are given.
    pub isobar_labels: Option<Vec<String>>,
    /// One per isopleth table; only used when several tables are given.
    pub isopleth_labels: Option<Vec<String>>,
    pub degassing_path_labels: Option<Vec<String>>,
    pub custom_labels: Option<Vec<String>>,
    /// Replaces the palette for custom groups.
    pub custom_colors: Option<Vec<String>>,
    /// Symbol per custom group, e.g. `"o"`, `"s-"`, `"--"`. Defaults to a filled circle.
    pub custom_symbols: Option<Vec<String>>,
    /// Marker diameter for custom groups, in points.
    pub marker_size: f64,
    /// Inches.
    pub fig_size: (f64, f64),
    pub save_fig: Option<PathBuf>,
    pub extend_isobars_to_zero: bool,
    pub smooth_isobars: bool,
    pub smooth_isopleths: bool,
}

impl Default for SolubilityPlot<'_> {
    fn default() -> Self {
        Self {
            isobars: &[],
            isopleths: &[],
            degassing_paths: &[],
            custom_h2o: None,
            custom_co2: None,
            custom_x: None,
            custom_y: None,
            x_label: None,
            y_label: None,
            isobar_labels: None,
            isopleth_labels: None,
            degassing_path_labels: None,
            custom_labels: None,
            custom_colors: None,
            custom_symbols: None,
            marker_size: DEFAULT_MARKER_SIZE,
            fig_size: DEFAULT_FIG_SIZE,
            save_fig: None,
            extend_isobars_to_zero: true,
            smooth_isobars: false,
            smooth_isopleths: false,
        }
    }
}

/// Custom point groups after validation: parallel x/y vectors per group.
struct CustomGroups<'a> {
    xs: &'a [Vec<f64>],
    ys: &'a [Vec<f64>],
}

impl CustomGroups<'_> {
    fn len(&self) -> usize {
        self.xs.len()
    }
}

/// Everything the drawing pass needs that could fail, resolved up front.
struct Validated<'a> {
    on_volatile_axes: Option<CustomGroups<'a>>,
    on_custom_axes: Option<CustomGroups<'a>>,
    symbols: Vec<Symbol>,
}

fn pair<'a>(
    x: Option<&'a [Vec<f64>]>,
    y: Option<&'a [Vec<f64>]>,
) -> Result<Option<CustomGroups<'a>>> {
    match (x, y) {
        (None, None) => Ok(None),
        (Some(_), None) => Err(PlotError::input(
            "If x data is passed, y data must also be passed.",
        )),
        (None, Some(_)) => Err(PlotError::input(
            "If y data is passed, x data must also be passed.",
        )),
        (Some(xs), Some(ys)) => {
            if xs.len() != ys.len() {
                return Err(PlotError::input("x and y data must be same length"));
            }
            for (i, (x, y)) in xs.iter().zip(ys).enumerate() {
                if x.len() != y.len() {
                    return Err(PlotError::input(format!(
                        "x and y data must be same length (group {} has {} x and {} y values)",
                        i + 1,
                        x.len(),
                        y.len()
                    )));
                }
            }
            Ok(Some(CustomGroups { xs, ys }))
        }
    }
}

fn check_list_len(name: &str, list: Option<&Vec<String>>, needed: usize) -> Result<()> {
    match list {
        Some(list) if list.len() < needed => Err(PlotError::input(format!(
            "Argument {name} must be a list with one entry per group ({needed} needed, {} given).",
            list.len()
        ))),
        _ => Ok(()),
    }
}

fn validate<'a>(plot: &SolubilityPlot<'a>) -> Result<Validated<'a>> {
    let on_volatile_axes = pair(plot.custom_h2o, plot.custom_co2)?;
    let on_custom_axes = pair(plot.custom_x, plot.custom_y)?;

    let custom_groups = on_volatile_axes
        .as_ref()
        .map_or(0, CustomGroups::len)
        .max(on_custom_axes.as_ref().map_or(0, CustomGroups::len));
    check_list_len("custom_colors", plot.custom_colors.as_ref(), custom_groups)?;
    check_list_len("custom_symbols", plot.custom_symbols.as_ref(), custom_groups)?;
    check_list_len("custom_labels", plot.custom_labels.as_ref(), custom_groups)?;
    if plot.isobars.len() > 1 {
        check_list_len("isobar_labels", plot.isobar_labels.as_ref(), plot.isobars.len())?;
    }
    if plot.isopleths.len() > 1 {
        check_list_len(
            "isopleth_labels",
            plot.isopleth_labels.as_ref(),
            plot.isopleths.len(),
        )?;
    }
    check_list_len(
        "degassing_path_labels",
        plot.degassing_path_labels.as_ref(),
        plot.degassing_paths.len(),
    )?;

    let symbols = match &plot.custom_symbols {
        Some(list) => list
            .iter()
            .map(|s| s.parse::<Symbol>())
            .collect::<std::result::Result<Vec<_>, _>>()?,
        None => vec![Symbol::default(); custom_groups],
    };

    for path in plot.degassing_paths {
        path.require(H2O_LIQ)?;
        path.require(CO2_LIQ)?;
    }

    Ok(Validated {
        on_volatile_axes,
        on_custom_axes,
        symbols,
    })
}

fn add_isobars(fig: &mut Figure, plot: &SolubilityPlot<'_>, theme: &Theme) -> Result<()> {
    let tables = plot.isobars;
    let options = ShapeOptions::isobars()
        .with_smooth(plot.smooth_isobars)
        .with_extend_to_zero(plot.extend_isobars_to_zero);

    for (i, table) in tables.iter().enumerate() {
        let groups = shape(table, PRESSURE, H2O_LIQ, CO2_LIQ, options)?;
        let table_label = (tables.len() > 1).then(|| {
            let name = plot
                .isobar_labels
                .as_ref()
                .and_then(|l| l.get(i).cloned())
                .unwrap_or_else(|| format!("Isobars {}", i + 1));
            let pressures = format::joined(groups.iter().map(|g| format::truncated(g.key)));
            format!("{name} ({pressures} bars)")
        });

        for (j, group) in groups.into_iter().enumerate() {
            let label = match &table_label {
                Some(text) if j == 0 => LegendLabel::entry(text.clone()),
                Some(_) => LegendLabel::Hidden,
                None => LegendLabel::entry(format!("{} bars", format::number(group.key))),
            };
            let mut series = Series::line(group.points, LineStyle::Solid).with_label(label);
            if tables.len() > 1 {
                series = series.with_color(theme.color(i));
            }
            fig.add_series(series);
        }
    }
    Ok(())
}

fn add_isopleths(fig: &mut Figure, plot: &SolubilityPlot<'_>, theme: &Theme) -> Result<()> {
    let tables = plot.isopleths;
    let options = ShapeOptions::isopleths().with_smooth(plot.smooth_isopleths);

    for (i, table) in tables.iter().enumerate() {
        let groups = shape(table, XH2O_FL, H2O_LIQ, CO2_LIQ, options)?;
        let fractions = format::joined(groups.iter().map(|g| format::decimal(g.key)));
        let name = if tables.len() > 1 {
            plot.isopleth_labels
                .as_ref()
                .and_then(|l| l.get(i).cloned())
                .unwrap_or_else(|| format!("Isopleths {}", i + 1))
        } else {
            "Isopleths".to_string()
        };
        let color = if tables.len() > 1 {
            theme.color(i)
        } else {
            theme.text_color.clone()
        };

        for (j, group) in groups.into_iter().enumerate() {
            let label = if j == 0 {
                LegendLabel::entry(format!("{name} ({fractions} XH2Ofluid)"))
            } else {
                LegendLabel::Hidden
            };
            fig.add_series(
                Series::line(group.points, LineStyle::Dashed)
                    .with_color(color.clone())
                    .with_label(label),
            );
        }
    }
    Ok(())
}

fn add_degassing_paths(fig: &mut Figure, plot: &SolubilityPlot<'_>, theme: &Theme) -> Result<()> {
    let paths = plot.degassing_paths;
    for (i, path) in paths.iter().enumerate() {
        let label = plot
            .degassing_path_labels
            .as_ref()
            .and_then(|l| l.get(i).cloned())
            .unwrap_or_else(|| format!("Path{}", i + 1));
        let points = zip_points(path.require(H2O_LIQ)?, path.require(CO2_LIQ)?);
        fig.add_series(
            Series::line(points, LineStyle::Dotted)
                .with_color(theme.color(i))
                .with_label(LegendLabel::entry(label)),
        );
    }

    // Saturation markers go after every path, matching the legend order of the paths above.
    for (i, path) in paths.iter().enumerate() {
        let (Some(h2o), Some(co2)) = (path.max(H2O_LIQ)?, path.max(CO2_LIQ)?) else {
            continue;
        };
        fig.add_series(
            Series::markers(vec![point(h2o, co2)], Marker::Circle).with_color(theme.color(i)),
        );
    }
    Ok(())
}

fn add_custom_groups(
    fig: &mut Figure,
    groups: &CustomGroups<'_>,
    plot: &SolubilityPlot<'_>,
    symbols: &[Symbol],
    theme: &Theme,
) {
    for (i, (xs, ys)) in groups.xs.iter().zip(groups.ys).enumerate() {
        let label = plot
            .custom_labels
            .as_ref()
            .and_then(|l| l.get(i).cloned())
            .unwrap_or_else(|| format!("Custom{}", i + 1));
        // Palette or explicit color wins over a color code in the symbol.
        let color = plot
            .custom_colors
            .as_ref()
            .and_then(|c| c.get(i).cloned())
            .unwrap_or_else(|| theme.color(i));
        let symbol = symbols.get(i).cloned().unwrap_or_default();
        fig.add_series(
            Series::from_symbol(zip_points(xs, ys), &symbol)
                .with_color(color)
                .with_marker_size(plot.marker_size)
                .with_label(LegendLabel::entry(label)),
        );
    }
}

/// Builds the solubility diagram described by `plot`.
///
/// All argument checks run before anything is drawn; an error means no figure. Fit diagnostics
/// are suppressed for the duration of the call. Curve fits that fail fall back to raw points.
pub fn compose(plot: &SolubilityPlot<'_>, theme: &Theme) -> Result<Figure> {
    let _quiet = QuietFitWarnings::enter();
    let validated = validate(plot)?;

    let (width, height) = plot.fig_size;
    let mut fig = Figure::new(width, height);
    fig.legend = Some(LegendPlacement::outside_right(LEGEND_ANCHOR_X));
    if validated.on_custom_axes.is_some() {
        fig.set_labels(
            plot.x_label.clone().unwrap_or_default(),
            plot.y_label.clone().unwrap_or_default(),
        );
    } else {
        fig.set_labels("H₂O wt%", "CO₂ wt%");
    }

    add_isobars(&mut fig, plot, theme)?;
    add_isopleths(&mut fig, plot, theme)?;
    add_degassing_paths(&mut fig, plot, theme)?;
    if let Some(groups) = &validated.on_volatile_axes {
        add_custom_groups(&mut fig, groups, plot, &validated.symbols, theme);
    }
    if let Some(groups) = &validated.on_custom_axes {
        add_custom_groups(&mut fig, groups, plot, &validated.symbols, theme);
    } else {
        fig.x_limits.min = Some(0.0);
        fig.y_limits.min = Some(0.0);
    }

    tracing::debug!(
        series = fig.series().len(),
        legend_entries = fig.legend_entries().count(),
        "composed solubility diagram"
    );
    Ok(fig)
}

/// Custom x/y scatter on labeled axes, delegating to [`compose`] in custom-axes mode.
///
/// `custom_x` and `custom_y` must hold the same number of groups. Any custom overlay already in
/// `options` is replaced.
pub fn scatterplot<'a>(
    custom_x: &'a [Vec<f64>],
    custom_y: &'a [Vec<f64>],
    x_label: Option<&str>,
    y_label: Option<&str>,
    options: SolubilityPlot<'a>,
    theme: &Theme,
) -> Result<Figure> {
    if custom_x.len() != custom_y.len() {
        return Err(PlotError::input("X and y lists must be same length"));
    }
    let plot = SolubilityPlot {
        custom_x: Some(custom_x),
        custom_y: Some(custom_y),
        x_label: x_label.map(str::to_string),
        y_label: y_label.map(str::to_string),
        ..options
    };
    compose(&plot, theme)
}
