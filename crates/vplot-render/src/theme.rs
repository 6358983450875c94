//! Rendering defaults.
//!
//! A [`Theme`] is built once, either from defaults or from a [`PlotConfig`] override, and handed
//! to layout by reference. Nothing here is global.

use vplot_core::PlotConfig;

/// Colorblind-safe cycle used for curves, paths and custom overlays.
pub const COLORBLIND_PALETTE: &[&str] = &[
    "#0072B2", "#009E73", "#D55E00", "#CC79A7", "#F0E442", "#56B4E9",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub palette: Vec<String>,
    /// Pixels per inch; figure sizes are given in inches and font sizes in points.
    pub dpi: f64,
    pub font_family: String,
    pub background_color: String,
    pub text_color: String,
    pub axis_color: String,
    pub title_font_size: f64,
    pub axis_label_font_size: f64,
    pub tick_label_font_size: f64,
    pub legend_font_size: f64,
    pub annotation_font_size: f64,
    pub line_width: f64,
    pub axis_line_width: f64,
    /// Marker diameter in points.
    pub marker_size: f64,
    pub field_color: String,
    pub legend_border_color: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            palette: COLORBLIND_PALETTE.iter().map(|c| c.to_string()).collect(),
            dpi: 100.0,
            font_family: "sans-serif".to_string(),
            background_color: "white".to_string(),
            text_color: "black".to_string(),
            axis_color: "black".to_string(),
            title_font_size: 20.0,
            axis_label_font_size: 18.0,
            tick_label_font_size: 14.0,
            legend_font_size: 14.0,
            annotation_font_size: 12.0,
            line_width: 1.5,
            axis_line_width: 1.0,
            marker_size: 10.0,
            field_color: "#999999".to_string(),
            legend_border_color: "#cccccc".to_string(),
        }
    }
}

impl Theme {
    /// Defaults overridden by whatever `config` sets. Unknown keys are ignored.
    ///
    /// Recognized keys: `palette` (array or comma-separated string), `dpi`, `fontFamily`,
    /// `background`, `textColor`, `axisColor`, `fontSize.{title,axisLabel,tickLabel,legend,annotation}`,
    /// `lineWidth`, `axisLineWidth`, `markerSize`, `fieldColor`, `legendBorderColor`.
    pub fn from_config(config: &PlotConfig) -> Self {
        let base = Self::default();
        let palette = config
            .get_str_list("palette")
            .filter(|p| !p.is_empty())
            .unwrap_or(base.palette);
        let string = |key: &str, fallback: String| {
            config.get_str(key).map(str::to_string).unwrap_or(fallback)
        };
        let positive = |key: &str, fallback: f64| {
            config
                .get_f64(key)
                .filter(|v| v.is_finite() && *v > 0.0)
                .unwrap_or(fallback)
        };

        Self {
            palette,
            dpi: positive("dpi", base.dpi),
            font_family: string("fontFamily", base.font_family),
            background_color: string("background", base.background_color),
            text_color: string("textColor", base.text_color),
            axis_color: string("axisColor", base.axis_color),
            title_font_size: positive("fontSize.title", base.title_font_size),
            axis_label_font_size: positive("fontSize.axisLabel", base.axis_label_font_size),
            tick_label_font_size: positive("fontSize.tickLabel", base.tick_label_font_size),
            legend_font_size: positive("fontSize.legend", base.legend_font_size),
            annotation_font_size: positive("fontSize.annotation", base.annotation_font_size),
            line_width: positive("lineWidth", base.line_width),
            axis_line_width: positive("axisLineWidth", base.axis_line_width),
            marker_size: positive("markerSize", base.marker_size),
            field_color: string("fieldColor", base.field_color),
            legend_border_color: string("legendBorderColor", base.legend_border_color),
        }
    }

    /// Palette color for the `index`th curve, cycling.
    pub fn color(&self, index: usize) -> String {
        if self.palette.is_empty() {
            return self.text_color.clone();
        }
        self.palette[index % self.palette.len()].clone()
    }

    /// Converts points to pixels at this theme's dpi.
    pub fn px(&self, points: f64) -> f64 {
        points * self.dpi / 72.0
    }
}
