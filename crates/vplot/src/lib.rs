#![forbid(unsafe_code)]

//! `vplot` draws volatile-solubility diagrams and TAS classification charts headlessly.
//!
//! Composers ([`solubility::compose`], [`solubility::scatterplot`], [`tas::compose_tas`]) turn
//! tables of model output into a [`render::Figure`]. A [`render::Plotter`] holds the theme and
//! output options, and turns figures into SVG (or PNG/JPG/PDF) strings and files.
//!
//! # Features
//!
//! - `raster`: enable PNG/JPG/PDF output via pure-Rust SVG rasterization/conversion

pub use vplot_core::*;

pub mod solubility;
pub mod tas;

pub use solubility::SolubilityPlot;
pub use tas::{ModelSelection, PlotKind, TasPlot, Zoom};

#[derive(Debug, thiserror::Error)]
pub enum PlotError {
    /// Caller passed inconsistent arguments; nothing was drawn.
    #[error("{0}")]
    Input(String),
    #[error(transparent)]
    Data(#[from] vplot_core::Error),
    #[error(transparent)]
    Render(#[from] vplot_render::Error),
    #[error("unsupported output format {extension:?} (enable the `raster` feature for png/jpg/pdf)")]
    UnsupportedFormat { extension: String },
    #[cfg(feature = "raster")]
    #[error(transparent)]
    Raster(#[from] render::raster::RasterError),
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
}

impl PlotError {
    pub(crate) fn input(message: impl Into<String>) -> Self {
        Self::Input(message.into())
    }
}

pub type Result<T> = std::result::Result<T, PlotError>;

pub mod render {
    use crate::{PlotError, Result, SolubilityPlot, TasPlot};
    use std::path::Path;
    use vplot_core::{CalibrationCatalog, PlotConfig};

    pub use vplot_render::model::ChartLayout;
    pub use vplot_render::text::{DeterministicTextMeasurer, TextMeasurer};
    pub use vplot_render::{
        Annotation, AxisLimits, COLORBLIND_PALETTE, Figure, HAlign, LayoutOptions, LegendLabel,
        LegendPlacement, LineStyle, Marker, Series, SvgRenderOptions, Symbol, Theme, VAlign,
    };

    #[cfg(feature = "raster")]
    pub mod raster;

    /// File formats a figure can be saved as, chosen by extension.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum OutputFormat {
        Svg,
        Png,
        Jpeg,
        Pdf,
    }

    impl OutputFormat {
        /// Case-insensitive extension lookup. Raster formats need the `raster` feature.
        pub fn from_path(path: &Path) -> Result<Self> {
            let extension = path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or_default()
                .to_ascii_lowercase();
            let format = match extension.as_str() {
                "svg" => Self::Svg,
                "png" => Self::Png,
                "jpg" | "jpeg" => Self::Jpeg,
                "pdf" => Self::Pdf,
                _ => return Err(PlotError::UnsupportedFormat { extension }),
            };
            if format != Self::Svg && !cfg!(feature = "raster") {
                return Err(PlotError::UnsupportedFormat { extension });
            }
            Ok(format)
        }
    }

    /// Converts an arbitrary string into a conservative SVG `id` token, so several figures can be
    /// inlined in one document without their clip path ids colliding.
    pub fn sanitize_svg_id(raw: &str) -> String {
        let raw = raw.trim();
        let mut out = String::with_capacity(raw.len() + 4);
        for ch in raw.chars() {
            let ok = ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || ch == '.';
            out.push(if ok { ch } else { '-' });
        }
        while out.contains("--") {
            out = out.replace("--", "-");
        }
        let out = out.trim_matches('-');
        if out.is_empty() {
            return "vplot".to_string();
        }
        if out.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
            out.to_string()
        } else {
            format!("v-{out}")
        }
    }

    /// Bundles the theme and output options used for every figure.
    ///
    /// Build it once at startup and share it; nothing here mutates global state.
    #[derive(Clone)]
    pub struct Plotter {
        pub theme: Theme,
        pub layout: LayoutOptions,
        pub svg: SvgRenderOptions,
        #[cfg(feature = "raster")]
        pub raster: raster::RasterOptions,
    }

    impl Default for Plotter {
        fn default() -> Self {
            Self {
                theme: Theme::default(),
                layout: LayoutOptions::default(),
                svg: SvgRenderOptions::default(),
                #[cfg(feature = "raster")]
                raster: raster::RasterOptions::default(),
            }
        }
    }

    impl Plotter {
        pub fn new() -> Self {
            Self::default()
        }

        /// Theme defaults overridden by `config` (see [`Theme::from_config`]).
        pub fn from_config(config: &PlotConfig) -> Self {
            Self::default().with_theme(Theme::from_config(config))
        }

        pub fn with_theme(mut self, theme: Theme) -> Self {
            self.theme = theme;
            self
        }

        pub fn with_diagram_id(mut self, diagram_id: &str) -> Self {
            self.svg.diagram_id = Some(sanitize_svg_id(diagram_id));
            self
        }

        pub fn layout(&self, figure: &Figure) -> Result<ChartLayout> {
            Ok(vplot_render::layout_figure(figure, &self.theme, &self.layout)?)
        }

        pub fn render_svg(&self, figure: &Figure) -> Result<String> {
            let layout = self.layout(figure)?;
            Ok(vplot_render::render_svg(&layout, &self.svg)?)
        }

        #[cfg(feature = "raster")]
        pub fn render_png(&self, figure: &Figure) -> Result<Vec<u8>> {
            Ok(raster::svg_to_png(&self.render_svg(figure)?, &self.raster)?)
        }

        #[cfg(feature = "raster")]
        pub fn render_jpeg(&self, figure: &Figure) -> Result<Vec<u8>> {
            Ok(raster::svg_to_jpeg(&self.render_svg(figure)?, &self.raster)?)
        }

        #[cfg(feature = "raster")]
        pub fn render_pdf(&self, figure: &Figure) -> Result<Vec<u8>> {
            Ok(raster::svg_to_pdf(&self.render_svg(figure)?)?)
        }

        /// Renders `figure` in the format named by `path`'s extension and writes it there.
        pub fn save(&self, figure: &Figure, path: impl AsRef<Path>) -> Result<()> {
            let path = path.as_ref();
            let bytes = match OutputFormat::from_path(path)? {
                OutputFormat::Svg => self.render_svg(figure)?.into_bytes(),
                #[cfg(feature = "raster")]
                OutputFormat::Png => self.render_png(figure)?,
                #[cfg(feature = "raster")]
                OutputFormat::Jpeg => self.render_jpeg(figure)?,
                #[cfg(feature = "raster")]
                OutputFormat::Pdf => self.render_pdf(figure)?,
                #[cfg(not(feature = "raster"))]
                OutputFormat::Png | OutputFormat::Jpeg | OutputFormat::Pdf => {
                    return Err(PlotError::UnsupportedFormat {
                        extension: path
                            .extension()
                            .map(|e| e.to_string_lossy().into_owned())
                            .unwrap_or_default(),
                    });
                }
            };
            std::fs::write(path, bytes).map_err(|source| PlotError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            tracing::debug!(path = %path.display(), "saved figure");
            Ok(())
        }

        /// Composes a solubility diagram, saving it when `plot.save_fig` is set.
        pub fn solubility(&self, plot: &SolubilityPlot<'_>) -> Result<Figure> {
            let figure = crate::solubility::compose(plot, &self.theme)?;
            if let Some(path) = &plot.save_fig {
                self.save(&figure, path)?;
            }
            Ok(figure)
        }

        /// Composes a TAS (or oxide-pair) diagram, saving it when `plot.save_fig` is set.
        pub fn tas(&self, plot: &TasPlot<'_>, catalog: &dyn CalibrationCatalog) -> Result<Figure> {
            let figure = crate::tas::compose_tas(plot, catalog, &self.theme)?;
            if let Some(path) = &plot.save_fig {
                self.save(&figure, path)?;
            }
            Ok(figure)
        }
    }
}
