//! Recording figure model.
//!
//! Composers describe a chart by adding series and annotations to a [`Figure`]; nothing is laid
//! out or drawn until [`crate::layout_figure`] runs. Every series carries its own legend label, so
//! the label list can never drift out of step with the drawn series.

use crate::{Error, Result};
use std::str::FromStr;
use vplot_core::geom::{Extent, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
    Dotted,
    DashDot,
}

impl LineStyle {
    /// On/off dash lengths in multiples of the line width. `None` for a solid stroke.
    pub fn dash_pattern(self) -> Option<&'static [f64]> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some(&[3.7, 1.6]),
            Self::Dotted => Some(&[1.0, 1.65]),
            Self::DashDot => Some(&[6.4, 1.6, 1.0, 1.6]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Point,
    Square,
    Diamond,
    ThinDiamond,
    TriangleUp,
    TriangleDown,
    Star,
    /// Thin `+`, stroke only.
    Plus,
    /// Thick filled plus.
    FilledPlus,
    /// Thin `x`, stroke only.
    Cross,
}

impl Marker {
    pub fn from_char(c: char) -> Option<Self> {
        Some(match c {
            'o' => Self::Circle,
            '.' => Self::Point,
            's' => Self::Square,
            'D' => Self::Diamond,
            'd' => Self::ThinDiamond,
            '^' => Self::TriangleUp,
            'v' => Self::TriangleDown,
            '*' => Self::Star,
            '+' => Self::Plus,
            'P' => Self::FilledPlus,
            'x' => Self::Cross,
            _ => return None,
        })
    }

    /// Stroke-only markers take their color from the edge, not the face.
    pub fn is_filled(self) -> bool {
        !matches!(self, Self::Plus | Self::Cross)
    }
}

/// A compact line/marker/color format such as `"o"`, `"--"`, `"s-"` or `"r^"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub marker: Option<Marker>,
    pub line: Option<LineStyle>,
    pub color: Option<String>,
}

impl Default for Symbol {
    fn default() -> Self {
        Self {
            marker: Some(Marker::Circle),
            line: None,
            color: None,
        }
    }
}

fn color_from_char(c: char) -> Option<&'static str> {
    Some(match c {
        'b' => "#0000ff",
        'g' => "#008000",
        'r' => "#ff0000",
        'c' => "#00bfbf",
        'm' => "#bf00bf",
        'y' => "#bfbf00",
        'k' => "#000000",
        'w' => "#ffffff",
        _ => return None,
    })
}

impl FromStr for Symbol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidSymbol {
            symbol: s.to_string(),
        };
        let mut out = Symbol {
            marker: None,
            line: None,
            color: None,
        };
        let mut rest = s.trim();
        while !rest.is_empty() {
            let line = [
                ("--", LineStyle::Dashed),
                ("-.", LineStyle::DashDot),
                ("-", LineStyle::Solid),
                (":", LineStyle::Dotted),
            ]
            .into_iter()
            .find(|(prefix, _)| rest.starts_with(prefix));
            if let Some((prefix, style)) = line {
                if out.line.replace(style).is_some() {
                    return Err(invalid());
                }
                rest = &rest[prefix.len()..];
                continue;
            }

            let mut chars = rest.chars();
            let Some(c) = chars.next() else { break };
            if let Some(marker) = Marker::from_char(c) {
                if out.marker.replace(marker).is_some() {
                    return Err(invalid());
                }
            } else if let Some(color) = color_from_char(c) {
                if out.color.replace(color.to_string()).is_some() {
                    return Err(invalid());
                }
            } else {
                return Err(invalid());
            }
            rest = chars.as_str();
        }

        if out.marker.is_none() && out.line.is_none() {
            out.line = Some(LineStyle::Solid);
        }
        Ok(out)
    }
}

/// Legend slot for one series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegendLabel {
    Entry(String),
    /// Drawn, but takes no legend slot.
    Hidden,
    /// Bold section title with no handle. An empty heading is a spacer row.
    Heading(String),
}

impl LegendLabel {
    pub fn entry(text: impl Into<String>) -> Self {
        Self::Entry(text.into())
    }

    pub fn is_hidden(&self) -> bool {
        matches!(self, Self::Hidden)
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Entry(t) | Self::Heading(t) => Some(t),
            Self::Hidden => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub points: Vec<Point>,
    pub line: Option<LineStyle>,
    pub marker: Option<Marker>,
    /// `None` takes the next palette color at layout time.
    pub color: Option<String>,
    /// Marker outline; defaults to the series color.
    pub edge_color: Option<String>,
    /// Points; `None` uses the theme line width.
    pub line_width: Option<f64>,
    /// Marker diameter in points; `None` uses the theme marker size.
    pub marker_size: Option<f64>,
    pub label: LegendLabel,
    pub z_order: i32,
}

impl Series {
    fn bare(points: Vec<Point>) -> Self {
        Self {
            points,
            line: None,
            marker: None,
            color: None,
            edge_color: None,
            line_width: None,
            marker_size: None,
            label: LegendLabel::Hidden,
            z_order: 2,
        }
    }

    pub fn line(points: Vec<Point>, style: LineStyle) -> Self {
        Self {
            line: Some(style),
            ..Self::bare(points)
        }
    }

    pub fn markers(points: Vec<Point>, marker: Marker) -> Self {
        Self {
            marker: Some(marker),
            ..Self::bare(points)
        }
    }

    pub fn from_symbol(points: Vec<Point>, symbol: &Symbol) -> Self {
        Self {
            line: symbol.line,
            marker: symbol.marker,
            color: symbol.color.clone(),
            ..Self::bare(points)
        }
    }

    /// Legend-only row: no points, no line, no marker.
    pub fn heading(text: impl Into<String>) -> Self {
        Self {
            label: LegendLabel::Heading(text.into()),
            ..Self::bare(Vec::new())
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_edge_color(mut self, color: impl Into<String>) -> Self {
        self.edge_color = Some(color.into());
        self
    }

    pub fn with_label(mut self, label: LegendLabel) -> Self {
        self.label = label;
        self
    }

    pub fn with_line_width(mut self, width: f64) -> Self {
        self.line_width = Some(width);
        self
    }

    pub fn with_marker_size(mut self, size: f64) -> Self {
        self.marker_size = Some(size);
        self
    }

    pub fn with_z_order(mut self, z_order: i32) -> Self {
        self.z_order = z_order;
        self
    }

    pub fn is_heading(&self) -> bool {
        matches!(self.label, LegendLabel::Heading(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// Text placed at a data-space position. `\n` separates lines.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub text: String,
    pub position: Point,
    /// Points; `None` uses the theme annotation size.
    pub font_size: Option<f64>,
    pub color: Option<String>,
    /// Degrees, counter-clockwise.
    pub rotation: f64,
    pub h_align: HAlign,
    pub v_align: VAlign,
    pub z_order: i32,
}

impl Annotation {
    pub fn new(text: impl Into<String>, position: Point) -> Self {
        Self {
            text: text.into(),
            position,
            font_size: None,
            color: None,
            rotation: 0.0,
            h_align: HAlign::Center,
            v_align: VAlign::Top,
            z_order: 3,
        }
    }

    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn with_align(mut self, h_align: HAlign, v_align: VAlign) -> Self {
        self.h_align = h_align;
        self.v_align = v_align;
        self
    }

    pub fn with_z_order(mut self, z_order: i32) -> Self {
        self.z_order = z_order;
        self
    }
}

/// Per-side axis limits; an unset side is autoscaled.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisLimits {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl AxisLimits {
    pub fn fixed(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn is_auto(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// Legend box outside the axes: its upper-left corner sits at (`anchor_x`, `anchor_y`) in axes
/// fractions, so `anchor_x > 1` puts it right of the plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegendPlacement {
    pub anchor_x: f64,
    pub anchor_y: f64,
}

impl LegendPlacement {
    pub fn outside_right(anchor_x: f64) -> Self {
        Self {
            anchor_x,
            anchor_y: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    /// Inches.
    pub width: f64,
    /// Inches.
    pub height: f64,
    pub title: Option<String>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    /// Points; `None` uses the theme axis label size.
    pub axis_label_font_size: Option<f64>,
    /// Gap between tick labels and the axis label, in points.
    pub axis_label_padding: f64,
    pub x_limits: AxisLimits,
    pub y_limits: AxisLimits,
    pub legend: Option<LegendPlacement>,
    /// Shrink outer margins to what the decorations need.
    pub tight_layout: bool,
    series: Vec<Series>,
    annotations: Vec<Annotation>,
}

impl Figure {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            title: None,
            x_label: None,
            y_label: None,
            axis_label_font_size: None,
            axis_label_padding: 4.0,
            x_limits: AxisLimits::default(),
            y_limits: AxisLimits::default(),
            legend: None,
            tight_layout: false,
            series: Vec::new(),
            annotations: Vec::new(),
        }
    }

    pub fn set_labels(&mut self, x_label: impl Into<String>, y_label: impl Into<String>) {
        self.x_label = Some(x_label.into());
        self.y_label = Some(y_label.into());
    }

    pub fn set_x_limits(&mut self, min: f64, max: f64) {
        self.x_limits = AxisLimits::fixed(min, max);
    }

    pub fn set_y_limits(&mut self, min: f64, max: f64) {
        self.y_limits = AxisLimits::fixed(min, max);
    }

    /// Returns the new series' index.
    pub fn add_series(&mut self, series: Series) -> usize {
        self.series.push(series);
        self.series.len() - 1
    }

    pub fn annotate(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// One label per series, in plot order.
    pub fn legend_labels(&self) -> Vec<&LegendLabel> {
        self.series.iter().map(|s| &s.label).collect()
    }

    /// Series that take a legend slot, in plot order.
    pub fn legend_entries(&self) -> impl Iterator<Item = &Series> {
        self.series.iter().filter(|s| !s.label.is_hidden())
    }

    /// Extent of all finite series points.
    pub fn data_extent(&self) -> Option<Extent> {
        self.series
            .iter()
            .filter_map(|s| Extent::of(&s.points))
            .reduce(Extent::union)
    }
}
