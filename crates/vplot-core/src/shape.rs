//! Curve shaping for isobars and isopleths.
//!
//! Raw saturation samples are grouped by their controlling parameter (pressure or fluid
//! fraction), fitted with a low-degree polynomial per group, and resampled onto a uniform grid.
//! Isobars can additionally be anchored on the axes.

use crate::columns::{CO2_LIQ, H2O_LIQ, PRESSURE, XH2O_FL};
use crate::fit::{Degenerate, PolyFit, linspace, polyfit};
use crate::geom::{Point, point, zip_points};
use crate::numeric::QuietFitWarnings;
use crate::table::same_key;
use crate::{Result, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeOptions {
    pub degree: usize,
    pub target_points: usize,
    /// When false, groups keep their raw points and no fit is attempted.
    pub smooth: bool,
    pub extend_to_zero: bool,
    /// Appends a synthetic all-zero row before partitioning, so a group keyed `0.0` picks up the
    /// origin.
    pub include_origin: bool,
}

impl ShapeOptions {
    pub const ISOBAR_DEGREE: usize = 3;
    pub const ISOPLETH_DEGREE: usize = 2;
    pub const TARGET_POINTS: usize = 50;

    pub fn isobars() -> Self {
        Self {
            degree: Self::ISOBAR_DEGREE,
            target_points: Self::TARGET_POINTS,
            smooth: true,
            extend_to_zero: true,
            include_origin: true,
        }
    }

    pub fn isopleths() -> Self {
        Self {
            degree: Self::ISOPLETH_DEGREE,
            target_points: Self::TARGET_POINTS,
            smooth: true,
            extend_to_zero: false,
            include_origin: false,
        }
    }

    pub fn with_smooth(mut self, smooth: bool) -> Self {
        self.smooth = smooth;
        self
    }

    pub fn with_extend_to_zero(mut self, extend_to_zero: bool) -> Self {
        self.extend_to_zero = extend_to_zero;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CurveFit {
    /// Fitted and resampled onto `target_points` evenly spaced x values.
    Smoothed,
    /// Raw group points. `reason` is set when a fit was attempted and fell back.
    Raw { reason: Option<Degenerate> },
}

/// One shaped curve for one parameter value.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveGroup {
    pub key: f64,
    pub points: Vec<Point>,
    pub fit: CurveFit,
    /// A point was inserted before the first sample to reach an axis.
    pub leading_anchor: bool,
    /// A point was appended after the last sample to reach an axis.
    pub trailing_anchor: bool,
}

impl CurveGroup {
    pub fn xs(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.x).collect()
    }

    pub fn ys(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.y).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_smoothed(&self) -> bool {
        matches!(self.fit, CurveFit::Smoothed)
    }

    /// Point count excluding axis anchors.
    pub fn resampled_len(&self) -> usize {
        self.points.len() - usize::from(self.leading_anchor) - usize::from(self.trailing_anchor)
    }
}

/// Groups `table` rows by `key_column` and shapes each group's `(x_column, y_column)` curve.
///
/// Groups come out in first-appearance order of their key. A group whose fit is degenerate
/// (too few points, singular system, non-finite input) keeps its raw points; that is a local
/// recovery, not an error. Only missing columns are reported as errors.
///
/// With `extend_to_zero`, each end of the curve whose point has a non-zero coordinate product
/// gets an extra anchor point on an axis. This is a display heuristic, not a physical
/// extrapolation:
/// - leading end `(x, y)`: insert `(0, y)` if `x > y`, else `(x, 0)`;
/// - trailing end `(x, y)`: append `(0, y)` if `x < y`, else `(x, 0)`.
///
/// Interior points are never moved.
pub fn shape(
    table: &Table,
    key_column: &str,
    x_column: &str,
    y_column: &str,
    options: ShapeOptions,
) -> Result<Vec<CurveGroup>> {
    let _quiet = QuietFitWarnings::enter();

    let keys = table.unique(key_column)?;
    let key_values = table.require(key_column)?;
    let x_values = table.require(x_column)?;
    let y_values = table.require(y_column)?;

    let mut out = Vec::with_capacity(keys.len());
    for key in keys {
        let mut xs: Vec<f64> = Vec::new();
        let mut ys: Vec<f64> = Vec::new();
        for ((&k, &x), &y) in key_values.iter().zip(x_values).zip(y_values) {
            if same_key(k, key) {
                xs.push(x);
                ys.push(y);
            }
        }
        if options.include_origin && same_key(key, 0.0) {
            xs.push(0.0);
            ys.push(0.0);
        }

        let (mut points, fit) = if options.smooth {
            smooth_group(key, &xs, &ys, options)
        } else {
            (zip_points(&xs, &ys), CurveFit::Raw { reason: None })
        };

        let (leading_anchor, trailing_anchor) = if options.extend_to_zero {
            extend_to_axes(&mut points)
        } else {
            (false, false)
        };

        out.push(CurveGroup {
            key,
            points,
            fit,
            leading_anchor,
            trailing_anchor,
        });
    }
    Ok(out)
}

fn smooth_group(key: f64, xs: &[f64], ys: &[f64], options: ShapeOptions) -> (Vec<Point>, CurveFit) {
    match polyfit(xs, ys, options.degree) {
        PolyFit::Fitted(poly) => {
            // Range follows emission order: first and last sample x, not sorted extremes.
            let (Some(&x0), Some(&x1)) = (xs.first(), xs.last()) else {
                return (Vec::new(), CurveFit::Raw { reason: None });
            };
            let points = linspace(x0, x1, options.target_points)
                .into_iter()
                .map(|x| point(x, poly.eval(x)))
                .collect();
            (points, CurveFit::Smoothed)
        }
        PolyFit::Degenerate(reason) => {
            tracing::debug!(key, %reason, "curve fit degenerate; using raw points");
            (
                zip_points(xs, ys),
                CurveFit::Raw {
                    reason: Some(reason),
                },
            )
        }
    }
}

/// Anchors both ends of `points` on an axis where they are not already on one.
///
/// Returns `(leading_inserted, trailing_inserted)`. See [`shape`] for the rule.
pub fn extend_to_axes(points: &mut Vec<Point>) -> (bool, bool) {
    let Some(&first) = points.first() else {
        return (false, false);
    };
    let leading = first.x * first.y != 0.0;
    if leading {
        let anchor = if first.x > first.y {
            point(0.0, first.y)
        } else {
            point(first.x, 0.0)
        };
        points.insert(0, anchor);
    }

    let Some(&last) = points.last() else {
        return (leading, false);
    };
    let trailing = last.x * last.y != 0.0;
    if trailing {
        let anchor = if last.x < last.y {
            point(0.0, last.y)
        } else {
            point(last.x, 0.0)
        };
        points.push(anchor);
    }
    (leading, trailing)
}

/// Flattens shaped curves back into a table: one row per point, key repeated.
pub fn curves_to_table(groups: &[CurveGroup], key_column: &str) -> Result<Table> {
    let mut keys = Vec::new();
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for g in groups {
        keys.extend(std::iter::repeat_n(g.key, g.len()));
        xs.extend(g.points.iter().map(|p| p.x));
        ys.extend(g.points.iter().map(|p| p.y));
    }
    Table::from_columns([
        (key_column, keys),
        (H2O_LIQ, xs),
        (CO2_LIQ, ys),
    ])
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SmoothedCurves {
    pub isobars: Option<Table>,
    pub isopleths: Option<Table>,
}

/// Smooths isobar and isopleth tables for callers that plot on their own.
///
/// Isobars use a cubic fit with the synthetic origin row; isopleths a quadratic. Neither is
/// extended to the axes. Output columns are `Pressure`/`XH2O_fl`, `H2O_liq`, `CO2_liq`.
pub fn smooth_isobars_and_isopleths(
    isobars: Option<&Table>,
    isopleths: Option<&Table>,
) -> Result<SmoothedCurves> {
    let _quiet = QuietFitWarnings::enter();

    let isobars = match isobars {
        Some(t) => {
            let options = ShapeOptions::isobars().with_extend_to_zero(false);
            let groups = shape(t, PRESSURE, H2O_LIQ, CO2_LIQ, options)?;
            Some(curves_to_table(&groups, PRESSURE)?)
        }
        None => None,
    };
    let isopleths = match isopleths {
        Some(t) => {
            let groups = shape(t, XH2O_FL, H2O_LIQ, CO2_LIQ, ShapeOptions::isopleths())?;
            Some(curves_to_table(&groups, XH2O_FL)?)
        }
        None => None,
    };
    Ok(SmoothedCurves {
        isobars,
        isopleths,
    })
}
