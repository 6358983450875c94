#![forbid(unsafe_code)]

//! Headless figure model, layout and SVG output.
//!
//! Composers record a [`Figure`]; [`layout_figure`] maps it to pixel space with a [`Theme`], and
//! [`render_svg`] serializes the resulting [`ChartLayout`].

pub mod chart;
pub mod figure;
pub mod model;
pub mod svg;
pub mod text;
pub mod theme;

use crate::model::ChartLayout;
use crate::text::{DeterministicTextMeasurer, TextMeasurer};
use std::sync::Arc;

pub use figure::{
    Annotation, AxisLimits, Figure, HAlign, LegendLabel, LegendPlacement, LineStyle, Marker,
    Series, Symbol, VAlign,
};
pub use svg::{SvgRenderOptions, render_svg};
pub use theme::{COLORBLIND_PALETTE, Theme};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid plot symbol: {symbol:?}")]
    InvalidSymbol { symbol: String },
    #[error("invalid figure: {message}")]
    InvalidFigure { message: String },
    #[error("layout JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone)]
pub struct LayoutOptions {
    pub text_measurer: Arc<dyn TextMeasurer + Send + Sync>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            text_measurer: Arc::new(DeterministicTextMeasurer::default()),
        }
    }
}

pub fn layout_figure(
    figure: &Figure,
    theme: &Theme,
    options: &LayoutOptions,
) -> Result<ChartLayout> {
    let layout = chart::layout_figure(figure, theme, options.text_measurer.as_ref())?;
    tracing::debug!(
        series = figure.series().len(),
        annotations = figure.annotations().len(),
        drawables = layout.drawables.len(),
        "laid out figure"
    );
    Ok(layout)
}

/// Pretty JSON dump of a layout, for debugging and snapshot tests.
pub fn layout_to_json(layout: &ChartLayout) -> Result<String> {
    Ok(serde_json::to_string_pretty(layout)?)
}
