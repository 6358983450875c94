use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartRectData {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: String,
    #[serde(rename = "strokeFill")]
    pub stroke_fill: String,
    #[serde(rename = "strokeWidth")]
    pub stroke_width: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartTextData {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub fill: String,
    #[serde(rename = "fontSize")]
    pub font_size: f64,
    #[serde(rename = "fontWeight", default)]
    pub font_weight: Option<String>,
    /// Degrees, clockwise (SVG convention).
    #[serde(default)]
    pub rotation: f64,
    #[serde(rename = "verticalPos")]
    pub vertical_pos: String,
    #[serde(rename = "horizontalPos")]
    pub horizontal_pos: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartPathData {
    pub path: String,
    #[serde(default)]
    pub fill: Option<String>,
    #[serde(rename = "strokeFill")]
    pub stroke_fill: String,
    #[serde(rename = "strokeWidth")]
    pub stroke_width: f64,
    #[serde(rename = "dashArray", default)]
    pub dash_array: Option<Vec<f64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ChartDrawableElem {
    #[serde(rename = "rect")]
    Rect {
        #[serde(rename = "groupTexts")]
        group_texts: Vec<String>,
        data: Vec<ChartRectData>,
    },
    #[serde(rename = "text")]
    Text {
        #[serde(rename = "groupTexts")]
        group_texts: Vec<String>,
        /// Clip to the plot area.
        #[serde(default)]
        clipped: bool,
        data: Vec<ChartTextData>,
    },
    #[serde(rename = "path")]
    Path {
        #[serde(rename = "groupTexts")]
        group_texts: Vec<String>,
        #[serde(default)]
        clipped: bool,
        data: Vec<ChartPathData>,
    },
}

impl ChartDrawableElem {
    pub fn group_texts(&self) -> &[String] {
        match self {
            Self::Rect { group_texts, .. }
            | Self::Text { group_texts, .. }
            | Self::Path { group_texts, .. } => group_texts,
        }
    }
}

/// A laid-out figure in pixel space, ready for serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartLayout {
    pub width: f64,
    pub height: f64,
    #[serde(rename = "backgroundColor")]
    pub background_color: String,
    #[serde(rename = "fontFamily")]
    pub font_family: String,
    #[serde(rename = "plotArea")]
    pub plot_area: Bounds,
    /// Data-space limits the plot area maps: `(x_min, x_max, y_min, y_max)`.
    #[serde(rename = "dataLimits")]
    pub data_limits: (f64, f64, f64, f64),
    #[serde(rename = "legendArea", default)]
    pub legend_area: Option<Bounds>,
    #[serde(default)]
    pub drawables: Vec<ChartDrawableElem>,
}
