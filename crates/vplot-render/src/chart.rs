//! Figure layout: linear axes, legend placement and pixel-space drawables.

use crate::figure::{
    Annotation, AxisLimits, Figure, HAlign, LegendLabel, LegendPlacement, LineStyle, Marker,
    Series, VAlign,
};
use crate::model::{
    Bounds, ChartDrawableElem, ChartLayout, ChartPathData, ChartRectData, ChartTextData,
};
use crate::svg::util::fmt_path;
use crate::text::{TextMeasurer, TextStyle};
use crate::theme::Theme;
use crate::{Error, Result};
use std::fmt::Write as _;
use vplot_core::format;
use vplot_core::geom::Point;

/// Autoscale margin on each side, as a fraction of the data span.
const AUTOSCALE_MARGIN: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AxisPosition {
    Left,
    Bottom,
}

#[derive(Debug, Clone, Copy)]
struct Dimension {
    width: f64,
    height: f64,
}

#[derive(Debug, Clone)]
struct AxisConfig {
    label_font_size: f64,
    label_padding: f64,
    title_font_size: f64,
    title_padding: f64,
    tick_length: f64,
    tick_width: f64,
}

fn max_text_dimension(
    texts: &[String],
    style: &TextStyle,
    measurer: &dyn TextMeasurer,
) -> Dimension {
    let mut max_w: f64 = 0.0;
    let mut max_h: f64 = 0.0;
    for t in texts {
        let m = measurer.measure(t, style);
        max_w = max_w.max(m.width);
        max_h = max_h.max(m.height);
    }
    Dimension {
        width: max_w,
        height: max_h,
    }
}

pub(crate) fn d3_ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    fn tick_spec(start: f64, stop: f64, count: f64) -> Option<(i64, i64, f64)> {
        if !(count > 0.0) {
            return None;
        }

        let step = (stop - start) / count;
        if !step.is_finite() || step == 0.0 {
            return None;
        }
        let power = step.log10().floor();
        let error = step / 10f64.powf(power);
        let factor = if error >= 50f64.sqrt() {
            10.0
        } else if error >= 10f64.sqrt() {
            5.0
        } else if error >= 2f64.sqrt() {
            2.0
        } else {
            1.0
        };

        let (i1, i2, inc) = if power < 0.0 {
            let inc = 10f64.powf(-power) / factor;
            let mut i1 = (start * inc).round() as i64;
            let mut i2 = (stop * inc).round() as i64;
            if (i1 as f64) / inc < start {
                i1 += 1;
            }
            if (i2 as f64) / inc > stop {
                i2 -= 1;
            }
            (i1, i2, -inc)
        } else {
            let inc = 10f64.powf(power) * factor;
            let mut i1 = (start / inc).round() as i64;
            let mut i2 = (stop / inc).round() as i64;
            if (i1 as f64) * inc < start {
                i1 += 1;
            }
            if (i2 as f64) * inc > stop {
                i2 -= 1;
            }
            (i1, i2, inc)
        };

        if i2 < i1 && (0.5..2.0).contains(&count) {
            return tick_spec(start, stop, count * 2.0);
        }
        if !inc.is_finite() || inc == 0.0 {
            return None;
        }
        Some((i1, i2, inc))
    }

    if !start.is_finite() || !stop.is_finite() || count == 0 {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }

    let reverse = stop < start;
    let (a, b) = if reverse { (stop, start) } else { (start, stop) };
    let Some((i1, i2, inc)) = tick_spec(a, b, count as f64) else {
        return Vec::new();
    };
    if i2 < i1 {
        return Vec::new();
    }

    let n = (i2 - i1 + 1) as usize;
    let value = |i: i64| {
        if inc < 0.0 {
            i as f64 / -inc
        } else {
            i as f64 * inc
        }
    };
    if reverse {
        (0..n).map(|i| value(i2 - i as i64)).collect()
    } else {
        (0..n).map(|i| value(i1 + i as i64)).collect()
    }
}

/// Resolves one axis' data limits: explicit sides verbatim, the rest from the data with a margin.
fn resolve_limits(axis: &str, limits: AxisLimits, data: Option<(f64, f64)>) -> Result<(f64, f64)> {
    for side in [limits.min, limits.max].into_iter().flatten() {
        if !side.is_finite() {
            return Err(Error::InvalidFigure {
                message: format!("{axis} limit {side} is not finite"),
            });
        }
    }

    let (auto_lo, auto_hi) = match data {
        Some((lo, hi)) if lo < hi => {
            let margin = (hi - lo) * AUTOSCALE_MARGIN;
            (lo - margin, hi + margin)
        }
        Some((v, _)) => {
            let pad = if v == 0.0 { 0.5 } else { v.abs() * AUTOSCALE_MARGIN };
            (v - pad, v + pad)
        }
        None => (0.0, 1.0),
    };

    match (limits.min, limits.max) {
        (Some(lo), Some(hi)) if lo == hi => Err(Error::InvalidFigure {
            message: format!("{axis} limits are both {lo}"),
        }),
        (Some(lo), Some(hi)) => Ok((lo, hi)),
        (Some(lo), None) => {
            let hi = if auto_hi > lo { auto_hi } else { lo + (auto_hi - auto_lo) };
            Ok((lo, hi))
        }
        (None, Some(hi)) => {
            let lo = if auto_lo < hi { auto_lo } else { hi - (auto_hi - auto_lo) };
            Ok((lo, hi))
        }
        (None, None) => Ok((auto_lo, auto_hi)),
    }
}

#[derive(Debug, Clone)]
struct Axis {
    position: AxisPosition,
    domain: (f64, f64),
    config: AxisConfig,
    line_color: String,
    text_color: String,
    bounding_rect: Bounds,
    range: (f64, f64),
    tick_count: usize,
    show_label: bool,
    show_title: bool,
    title: String,
    title_text_height: f64,
}

impl Axis {
    fn new(
        position: AxisPosition,
        domain: (f64, f64),
        config: AxisConfig,
        theme: &Theme,
        title: String,
    ) -> Self {
        Self {
            position,
            domain,
            config,
            line_color: theme.axis_color.clone(),
            text_color: theme.text_color.clone(),
            bounding_rect: Bounds {
                x: 0.0,
                y: 0.0,
                width: 0.0,
                height: 0.0,
            },
            range: (0.0, 10.0),
            tick_count: 8,
            show_label: false,
            show_title: false,
            title,
            title_text_height: 0.0,
        }
    }

    fn set_range(&mut self, range: (f64, f64)) {
        self.range = range;
        let span = (range.1 - range.0).abs();
        self.tick_count = ((span / 80.0).floor() as usize).clamp(3, 10);
        if matches!(self.position, AxisPosition::Left) {
            self.bounding_rect.height = span;
        } else {
            self.bounding_rect.width = span;
        }
    }

    fn set_bounding_box_xy(&mut self, x: f64, y: f64) {
        self.bounding_rect.x = x;
        self.bounding_rect.y = y;
    }

    fn tick_values(&self) -> Vec<f64> {
        let (lo, hi) = self.domain;
        d3_ticks(lo, hi, self.tick_count)
    }

    fn tick_labels(&self) -> Vec<String> {
        self.tick_values().into_iter().map(format::number).collect()
    }

    fn scale(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d0 == d1 {
            return r0 + (r1 - r0) * 0.5;
        }
        let t = (v - d0) / (d1 - d0);
        match self.position {
            AxisPosition::Left => r1 - t * (r1 - r0),
            AxisPosition::Bottom => r0 + t * (r1 - r0),
        }
    }

    fn calculate_space(&mut self, available: Dimension, measurer: &dyn TextMeasurer) -> Dimension {
        self.show_label = false;
        self.show_title = false;
        self.title_text_height = 0.0;

        let label_style = TextStyle::sized(self.config.label_font_size);
        let title_style = TextStyle::sized(self.config.title_font_size);

        if matches!(self.position, AxisPosition::Left) {
            let mut available_width = available.width;
            available_width -= self.config.tick_length.min(available_width);

            let dim = max_text_dimension(&self.tick_labels(), &label_style, measurer);
            let width_required = dim.width + self.config.label_padding;
            if width_required <= available_width {
                available_width -= width_required;
                self.show_label = true;
            }

            if !self.title.is_empty() {
                let dim = max_text_dimension(&[self.title.clone()], &title_style, measurer);
                let width_required = dim.height + self.config.title_padding;
                self.title_text_height = dim.height;
                if width_required <= available_width {
                    available_width -= width_required;
                    self.show_title = true;
                }
            }

            self.bounding_rect.width = available.width - available_width;
            self.bounding_rect.height = available.height;
        } else {
            let mut available_height = available.height;
            available_height -= self.config.tick_length.min(available_height);

            let dim = max_text_dimension(&self.tick_labels(), &label_style, measurer);
            let height_required = dim.height + self.config.label_padding;
            if height_required <= available_height {
                available_height -= height_required;
                self.show_label = true;
            }

            if !self.title.is_empty() {
                let dim = max_text_dimension(&[self.title.clone()], &title_style, measurer);
                let height_required = dim.height + self.config.title_padding;
                self.title_text_height = dim.height;
                if height_required <= available_height {
                    available_height -= height_required;
                    self.show_title = true;
                }
            }

            self.bounding_rect.width = available.width;
            self.bounding_rect.height = available.height - available_height;
        }
        Dimension {
            width: self.bounding_rect.width,
            height: self.bounding_rect.height,
        }
    }

    fn drawable_elements(&self) -> Vec<ChartDrawableElem> {
        match self.position {
            AxisPosition::Left => self.drawable_elements_for_left_axis(),
            AxisPosition::Bottom => self.drawable_elements_for_bottom_axis(),
        }
    }

    fn drawable_elements_for_left_axis(&self) -> Vec<ChartDrawableElem> {
        let mut out = Vec::new();
        let ticks = self.tick_values();
        let x = self.bounding_rect.right();

        out.push(ChartDrawableElem::Path {
            group_texts: vec!["left-axis".to_string(), "ticks".to_string()],
            clipped: false,
            data: ticks
                .iter()
                .map(|&t| {
                    let y = fmt_path(self.scale(t));
                    ChartPathData {
                        path: format!(
                            "M{},{y}L{},{y}",
                            fmt_path(x),
                            fmt_path(x - self.config.tick_length)
                        ),
                        fill: None,
                        stroke_fill: self.line_color.clone(),
                        stroke_width: self.config.tick_width,
                        dash_array: None,
                    }
                })
                .collect(),
        });

        if self.show_label {
            let label_x = x - self.config.tick_length - self.config.label_padding;
            out.push(ChartDrawableElem::Text {
                group_texts: vec!["left-axis".to_string(), "label".to_string()],
                clipped: false,
                data: ticks
                    .iter()
                    .map(|&t| ChartTextData {
                        text: format::number(t),
                        x: label_x,
                        y: self.scale(t),
                        fill: self.text_color.clone(),
                        font_size: self.config.label_font_size,
                        font_weight: None,
                        rotation: 0.0,
                        vertical_pos: "middle".to_string(),
                        horizontal_pos: "right".to_string(),
                    })
                    .collect(),
            });
        }

        if self.show_title {
            out.push(ChartDrawableElem::Text {
                group_texts: vec!["left-axis".to_string(), "title".to_string()],
                clipped: false,
                data: vec![ChartTextData {
                    text: self.title.clone(),
                    x: self.bounding_rect.x,
                    y: self.bounding_rect.y + self.bounding_rect.height / 2.0,
                    fill: self.text_color.clone(),
                    font_size: self.config.title_font_size,
                    font_weight: None,
                    rotation: 270.0,
                    vertical_pos: "top".to_string(),
                    horizontal_pos: "center".to_string(),
                }],
            });
        }
        out
    }

    fn drawable_elements_for_bottom_axis(&self) -> Vec<ChartDrawableElem> {
        let mut out = Vec::new();
        let ticks = self.tick_values();
        let y = self.bounding_rect.y;

        out.push(ChartDrawableElem::Path {
            group_texts: vec!["bottom-axis".to_string(), "ticks".to_string()],
            clipped: false,
            data: ticks
                .iter()
                .map(|&t| {
                    let x = fmt_path(self.scale(t));
                    ChartPathData {
                        path: format!(
                            "M{x},{}L{x},{}",
                            fmt_path(y),
                            fmt_path(y + self.config.tick_length)
                        ),
                        fill: None,
                        stroke_fill: self.line_color.clone(),
                        stroke_width: self.config.tick_width,
                        dash_array: None,
                    }
                })
                .collect(),
        });

        if self.show_label {
            out.push(ChartDrawableElem::Text {
                group_texts: vec!["bottom-axis".to_string(), "label".to_string()],
                clipped: false,
                data: ticks
                    .iter()
                    .map(|&t| ChartTextData {
                        text: format::number(t),
                        x: self.scale(t),
                        y: y + self.config.tick_length + self.config.label_padding,
                        fill: self.text_color.clone(),
                        font_size: self.config.label_font_size,
                        font_weight: None,
                        rotation: 0.0,
                        vertical_pos: "top".to_string(),
                        horizontal_pos: "center".to_string(),
                    })
                    .collect(),
            });
        }

        if self.show_title {
            out.push(ChartDrawableElem::Text {
                group_texts: vec!["bottom-axis".to_string(), "title".to_string()],
                clipped: false,
                data: vec![ChartTextData {
                    text: self.title.clone(),
                    x: self.range.0 + (self.range.1 - self.range.0) / 2.0,
                    y: self.bounding_rect.bottom() - self.title_text_height,
                    fill: self.text_color.clone(),
                    font_size: self.config.title_font_size,
                    font_weight: None,
                    rotation: 0.0,
                    vertical_pos: "top".to_string(),
                    horizontal_pos: "center".to_string(),
                }],
            });
        }
        out
    }
}

fn polygon(out: &mut String, cx: f64, cy: f64, pts: &[(f64, f64)]) {
    for (i, (dx, dy)) in pts.iter().enumerate() {
        let cmd = if i == 0 { 'M' } else { 'L' };
        let _ = write!(out, "{cmd}{},{}", fmt_path(cx + dx), fmt_path(cy + dy));
    }
    out.push('Z');
}

/// Outline of `marker` centered on `(cx, cy)`, `size` pixels across.
fn marker_path(out: &mut String, marker: Marker, cx: f64, cy: f64, size: f64) {
    let r = size / 2.0;
    match marker {
        Marker::Circle | Marker::Point => {
            let r = if marker == Marker::Point { r * 0.5 } else { r };
            let (x0, d) = (fmt_path(cx - r), fmt_path(2.0 * r));
            let (rr, y) = (fmt_path(r), fmt_path(cy));
            let _ = write!(
                out,
                "M{x0},{y}a{rr},{rr} 0 1,0 {d},0a{rr},{rr} 0 1,0 -{d},0Z"
            );
        }
        Marker::Square => {
            let s = r * 0.85;
            polygon(out, cx, cy, &[(-s, -s), (s, -s), (s, s), (-s, s)]);
        }
        Marker::Diamond => polygon(out, cx, cy, &[(0.0, -r), (r, 0.0), (0.0, r), (-r, 0.0)]),
        Marker::ThinDiamond => {
            let w = r * 0.6;
            polygon(out, cx, cy, &[(0.0, -r), (w, 0.0), (0.0, r), (-w, 0.0)]);
        }
        Marker::TriangleUp => polygon(out, cx, cy, &[(0.0, -r), (r, r), (-r, r)]),
        Marker::TriangleDown => polygon(out, cx, cy, &[(0.0, r), (-r, -r), (r, -r)]),
        Marker::Star => {
            let pts: Vec<(f64, f64)> = (0..10)
                .map(|i| {
                    let a = std::f64::consts::PI * (i as f64) / 5.0 - std::f64::consts::FRAC_PI_2;
                    let rad = if i % 2 == 0 { r } else { r * 0.38 };
                    (rad * a.cos(), rad * a.sin())
                })
                .collect();
            polygon(out, cx, cy, &pts);
        }
        Marker::FilledPlus => {
            let w = r / 3.0;
            polygon(out, cx, cy, &[
                (-w, -r),
                (w, -r),
                (w, -w),
                (r, -w),
                (r, w),
                (w, w),
                (w, r),
                (-w, r),
                (-w, w),
                (-r, w),
                (-r, -w),
                (-w, -w),
            ]);
        }
        Marker::Plus => {
            let _ = write!(
                out,
                "M{},{}L{},{}M{},{}L{},{}",
                fmt_path(cx - r),
                fmt_path(cy),
                fmt_path(cx + r),
                fmt_path(cy),
                fmt_path(cx),
                fmt_path(cy - r),
                fmt_path(cx),
                fmt_path(cy + r)
            );
        }
        Marker::Cross => {
            let d = r * std::f64::consts::FRAC_1_SQRT_2;
            let _ = write!(
                out,
                "M{},{}L{},{}M{},{}L{},{}",
                fmt_path(cx - d),
                fmt_path(cy - d),
                fmt_path(cx + d),
                fmt_path(cy + d),
                fmt_path(cx - d),
                fmt_path(cy + d),
                fmt_path(cx + d),
                fmt_path(cy - d)
            );
        }
    }
}

/// Polyline through `points`; a non-finite point breaks the line.
fn line_path(points: &[(f64, f64)]) -> Option<String> {
    let mut out = String::new();
    let mut pen_down = false;
    for &(x, y) in points {
        if !x.is_finite() || !y.is_finite() {
            pen_down = false;
            continue;
        }
        let cmd = if pen_down { 'L' } else { 'M' };
        let _ = write!(out, "{cmd}{},{}", fmt_path(x), fmt_path(y));
        pen_down = true;
    }
    if out.is_empty() { None } else { Some(out) }
}

/// Resolved drawing style for one series.
struct SeriesStyle {
    color: String,
    edge_color: String,
    line_width: f64,
    marker_size: f64,
}

fn series_drawables(
    index: usize,
    series: &Series,
    style: &SeriesStyle,
    to_px: impl Fn(Point) -> (f64, f64),
) -> Vec<ChartDrawableElem> {
    let mut out = Vec::new();
    let px: Vec<(f64, f64)> = series.points.iter().map(|&p| to_px(p)).collect();

    if let Some((line, path)) = series.line.zip(line_path(&px)) {
        out.push(ChartDrawableElem::Path {
            group_texts: vec!["plot".to_string(), format!("line-plot-{index}")],
            clipped: true,
            data: vec![ChartPathData {
                path,
                fill: None,
                stroke_fill: style.color.clone(),
                stroke_width: style.line_width,
                dash_array: dash_array(line, style.line_width),
            }],
        });
    }

    if let Some(marker) = series.marker {
        let mut path = String::new();
        for &(x, y) in &px {
            if x.is_finite() && y.is_finite() {
                marker_path(&mut path, marker, x, y, style.marker_size);
            }
        }
        if !path.is_empty() {
            out.push(ChartDrawableElem::Path {
                group_texts: vec!["plot".to_string(), format!("marker-plot-{index}")],
                clipped: true,
                data: vec![marker_data(path, marker, style)],
            });
        }
    }
    out
}

fn dash_array(line: LineStyle, line_width: f64) -> Option<Vec<f64>> {
    line.dash_pattern()
        .map(|p| p.iter().map(|d| d * line_width).collect())
}

fn marker_data(path: String, marker: Marker, style: &SeriesStyle) -> ChartPathData {
    if marker.is_filled() {
        ChartPathData {
            path,
            fill: Some(style.color.clone()),
            stroke_fill: style.edge_color.clone(),
            stroke_width: style.line_width / 1.5,
            dash_array: None,
        }
    } else {
        ChartPathData {
            path,
            fill: None,
            stroke_fill: style.edge_color.clone(),
            stroke_width: style.line_width,
            dash_array: None,
        }
    }
}

fn annotation_text(annotation: &Annotation, theme: &Theme, x: f64, y: f64) -> ChartTextData {
    ChartTextData {
        text: annotation.text.clone(),
        x,
        y,
        fill: annotation
            .color
            .clone()
            .unwrap_or_else(|| theme.text_color.clone()),
        font_size: theme.px(
            annotation
                .font_size
                .unwrap_or(theme.annotation_font_size),
        ),
        font_weight: None,
        rotation: -annotation.rotation,
        vertical_pos: match annotation.v_align {
            VAlign::Top => "top",
            VAlign::Middle => "middle",
            VAlign::Bottom => "bottom",
        }
        .to_string(),
        horizontal_pos: match annotation.h_align {
            HAlign::Left => "left",
            HAlign::Center => "center",
            HAlign::Right => "right",
        }
        .to_string(),
    }
}

struct LegendMetrics {
    font_size: f64,
    border_pad: f64,
    handle_length: f64,
    handle_text_pad: f64,
    row_height: f64,
    width: f64,
    height: f64,
}

fn measure_legend(
    figure: &Figure,
    theme: &Theme,
    measurer: &dyn TextMeasurer,
) -> Option<LegendMetrics> {
    figure.legend?;
    let font_size = theme.px(theme.legend_font_size);
    let entries: Vec<&Series> = figure.legend_entries().collect();
    if entries.is_empty() {
        return None;
    }

    let mut text_width: f64 = 0.0;
    let mut tallest_marker: f64 = 0.0;
    for s in &entries {
        let style = if s.is_heading() {
            TextStyle::sized(font_size).bold()
        } else {
            TextStyle::sized(font_size)
        };
        let text = s.label.text().unwrap_or_default();
        text_width = text_width.max(measurer.measure(text, &style).width);
        if s.marker.is_some() {
            tallest_marker = tallest_marker.max(theme.px(s.marker_size.unwrap_or(theme.marker_size)));
        }
    }

    let border_pad = 0.4 * font_size;
    let handle_length = 2.0 * font_size;
    let handle_text_pad = 0.8 * font_size;
    let row_height = (1.2 * font_size).max(tallest_marker) + 0.5 * font_size;
    Some(LegendMetrics {
        font_size,
        border_pad,
        handle_length,
        handle_text_pad,
        row_height,
        width: 2.0 * border_pad + handle_length + handle_text_pad + text_width,
        height: 2.0 * border_pad + row_height * entries.len() as f64,
    })
}

fn legend_drawables(
    figure: &Figure,
    styles: &[SeriesStyle],
    metrics: &LegendMetrics,
    area: Bounds,
    theme: &Theme,
) -> Vec<ChartDrawableElem> {
    let mut handles = Vec::new();
    let mut labels = Vec::new();
    let handle_x0 = area.x + metrics.border_pad;
    let handle_x1 = handle_x0 + metrics.handle_length;
    let text_x = handle_x1 + metrics.handle_text_pad;

    let visible = figure
        .series()
        .iter()
        .zip(styles)
        .filter(|(s, _)| !s.label.is_hidden());
    for (row, (series, style)) in visible.enumerate() {
        let cy = area.y + metrics.border_pad + metrics.row_height * (row as f64 + 0.5);
        if let Some(line) = series.line {
            handles.push(ChartPathData {
                path: format!(
                    "M{},{y}L{},{y}",
                    fmt_path(handle_x0),
                    fmt_path(handle_x1),
                    y = fmt_path(cy)
                ),
                fill: None,
                stroke_fill: style.color.clone(),
                stroke_width: style.line_width,
                dash_array: dash_array(line, style.line_width),
            });
        }
        if let Some(marker) = series.marker {
            let mut path = String::new();
            marker_path(
                &mut path,
                marker,
                (handle_x0 + handle_x1) / 2.0,
                cy,
                style.marker_size,
            );
            handles.push(marker_data(path, marker, style));
        }

        let (text, weight) = match &series.label {
            LegendLabel::Entry(t) => (t.clone(), None),
            LegendLabel::Heading(t) => (t.clone(), Some("bold".to_string())),
            LegendLabel::Hidden => continue,
        };
        labels.push(ChartTextData {
            text,
            x: text_x,
            y: cy,
            fill: theme.text_color.clone(),
            font_size: metrics.font_size,
            font_weight: weight,
            rotation: 0.0,
            vertical_pos: "middle".to_string(),
            horizontal_pos: "left".to_string(),
        });
    }

    vec![
        ChartDrawableElem::Rect {
            group_texts: vec!["legend".to_string(), "frame".to_string()],
            data: vec![ChartRectData {
                x: area.x,
                y: area.y,
                width: area.width,
                height: area.height,
                fill: theme.background_color.clone(),
                stroke_fill: theme.legend_border_color.clone(),
                stroke_width: theme.px(theme.axis_line_width),
            }],
        },
        ChartDrawableElem::Path {
            group_texts: vec!["legend".to_string(), "handles".to_string()],
            clipped: false,
            data: handles,
        },
        ChartDrawableElem::Text {
            group_texts: vec!["legend".to_string(), "labels".to_string()],
            clipped: false,
            data: labels,
        },
    ]
}

/// Lays out `figure` in pixel space.
///
/// Unset axis limits are autoscaled to the series data with a 5% margin. The legend, when the
/// figure has one and at least one series takes a slot, is placed at its anchor and the plot
/// area shrinks so it stays on the canvas.
pub fn layout_figure(
    figure: &Figure,
    theme: &Theme,
    measurer: &dyn TextMeasurer,
) -> Result<ChartLayout> {
    if !(figure.width > 0.0 && figure.height > 0.0) {
        return Err(Error::InvalidFigure {
            message: format!(
                "figure size {}x{} in is not positive",
                figure.width, figure.height
            ),
        });
    }
    let width = figure.width * theme.dpi;
    let height = figure.height * theme.dpi;

    let extent = figure.data_extent();
    let x_domain = resolve_limits("x", figure.x_limits, extent.map(|e| (e.min_x, e.max_x)))?;
    let y_domain = resolve_limits("y", figure.y_limits, extent.map(|e| (e.min_y, e.max_y)))?;

    let axis_config = AxisConfig {
        label_font_size: theme.px(theme.tick_label_font_size),
        label_padding: theme.px(3.5),
        title_font_size: theme.px(figure.axis_label_font_size.unwrap_or(theme.axis_label_font_size)),
        title_padding: theme.px(figure.axis_label_padding),
        tick_length: theme.px(3.5),
        tick_width: theme.px(theme.axis_line_width),
    };
    let mut x_axis = Axis::new(
        AxisPosition::Bottom,
        x_domain,
        axis_config.clone(),
        theme,
        figure.x_label.clone().unwrap_or_default(),
    );
    let mut y_axis = Axis::new(
        AxisPosition::Left,
        y_domain,
        axis_config,
        theme,
        figure.y_label.clone().unwrap_or_default(),
    );

    let pad = theme.px(8.0);
    let title = figure.title.clone().unwrap_or_default();
    let title_style = TextStyle::sized(theme.px(theme.title_font_size));
    let title_height = if title.is_empty() {
        0.0
    } else {
        measurer.measure(&title, &title_style).height + pad
    };

    let mut top = pad + title_height;
    let available = Dimension {
        width: width - 2.0 * pad,
        height: height - top - pad,
    };
    y_axis.set_range((top, top + available.height * 0.8));
    let space_x = x_axis.calculate_space(available, measurer);
    let space_y = y_axis.calculate_space(
        Dimension {
            width: available.width,
            height: available.height - space_x.height,
        },
        measurer,
    );

    let mut left = pad + space_y.width;
    let mut bottom = pad + space_x.height;
    let mut right = pad;
    if !figure.tight_layout {
        left = left.max(0.125 * width);
        bottom = bottom.max(0.11 * height);
        top = top.max(0.12 * height);
        right = right.max(0.1 * width);
    }

    let legend_metrics = measure_legend(figure, theme, measurer);
    let legend_anchor = figure.legend.unwrap_or(LegendPlacement::outside_right(1.0));
    let mut plot_width = width - left - right;
    if let Some(m) = &legend_metrics {
        let reach = legend_anchor.anchor_x.max(0.0);
        if reach > 0.0 {
            let fit = (width - pad - m.width - left) / reach;
            plot_width = plot_width.min(fit);
        }
    }
    let plot = Bounds {
        x: left,
        y: top,
        width: plot_width.max(1.0),
        height: (height - top - bottom).max(1.0),
    };

    x_axis.set_range((plot.x, plot.right()));
    x_axis.set_bounding_box_xy(plot.x, plot.bottom());
    y_axis.set_range((plot.y, plot.bottom()));
    y_axis.set_bounding_box_xy(plot.x - space_y.width, plot.y);

    let mut auto_color = 0usize;
    let styles: Vec<SeriesStyle> = figure
        .series()
        .iter()
        .map(|s| {
            let color = match &s.color {
                Some(c) => c.clone(),
                None if s.is_heading() => theme.text_color.clone(),
                None => {
                    auto_color += 1;
                    theme.color(auto_color - 1)
                }
            };
            SeriesStyle {
                edge_color: s.edge_color.clone().unwrap_or_else(|| color.clone()),
                color,
                line_width: theme.px(s.line_width.unwrap_or(theme.line_width)),
                marker_size: theme.px(s.marker_size.unwrap_or(theme.marker_size)),
            }
        })
        .collect();

    let to_px = |p: Point| (x_axis.scale(p.x), y_axis.scale(p.y));

    // Series before annotations at equal z, each in insertion order.
    enum Item<'a> {
        Series(usize, &'a Series),
        Annotation(&'a Annotation),
    }
    let mut items: Vec<(i32, Item<'_>)> = figure
        .series()
        .iter()
        .enumerate()
        .map(|(i, s)| (s.z_order, Item::Series(i, s)))
        .chain(
            figure
                .annotations()
                .iter()
                .map(|a| (a.z_order, Item::Annotation(a))),
        )
        .collect();
    items.sort_by_key(|(z, _)| *z);

    let mut drawables = Vec::new();
    for (z, item) in &items {
        match item {
            Item::Series(i, s) => {
                drawables.extend(series_drawables(*i, s, &styles[*i], to_px));
            }
            Item::Annotation(a) => {
                let (x, y) = to_px(a.position);
                drawables.push(ChartDrawableElem::Text {
                    group_texts: vec!["plot".to_string(), format!("text-z{z}")],
                    clipped: true,
                    data: vec![annotation_text(a, theme, x, y)],
                });
            }
        }
    }

    drawables.push(ChartDrawableElem::Rect {
        group_texts: vec!["frame".to_string()],
        data: vec![ChartRectData {
            x: plot.x,
            y: plot.y,
            width: plot.width,
            height: plot.height,
            fill: "none".to_string(),
            stroke_fill: theme.axis_color.clone(),
            stroke_width: theme.px(theme.axis_line_width),
        }],
    });
    drawables.extend(x_axis.drawable_elements());
    drawables.extend(y_axis.drawable_elements());

    let legend_area = legend_metrics.as_ref().map(|m| {
        let area = Bounds {
            x: plot.x + legend_anchor.anchor_x * plot.width,
            y: plot.y + (1.0 - legend_anchor.anchor_y) * plot.height,
            width: m.width,
            height: m.height,
        };
        drawables.extend(legend_drawables(figure, &styles, m, area, theme));
        area
    });

    if !title.is_empty() {
        drawables.push(ChartDrawableElem::Text {
            group_texts: vec!["chart-title".to_string()],
            clipped: false,
            data: vec![ChartTextData {
                text: title,
                x: plot.x + plot.width / 2.0,
                y: pad,
                fill: theme.text_color.clone(),
                font_size: title_style.font_size,
                font_weight: None,
                rotation: 0.0,
                vertical_pos: "top".to_string(),
                horizontal_pos: "center".to_string(),
            }],
        });
    }

    Ok(ChartLayout {
        width,
        height,
        background_color: theme.background_color.clone(),
        font_family: theme.font_family.clone(),
        plot_area: plot,
        data_limits: (x_domain.0, x_domain.1, y_domain.0, y_domain.1),
        legend_area,
        drawables,
    })
}
