#![forbid(unsafe_code)]

//! PNG, JPG and PDF output from rendered SVG figures.

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error("failed to parse SVG")]
    SvgParse,
    #[error("failed to allocate a {width}x{height} pixmap")]
    PixmapAlloc { width: u32, height: u32 },
    #[error("failed to encode PNG")]
    PngEncode,
    #[error("invalid background color {0:?}")]
    InvalidBackground(String),
    #[error("JPG output needs an opaque background color")]
    TransparentJpegBackground,
    #[error("failed to encode JPG")]
    JpegEncode,
    #[error("failed to convert SVG to PDF")]
    PdfConvert,
}

pub type Result<T> = std::result::Result<T, RasterError>;

#[derive(Debug, Clone)]
pub struct RasterOptions {
    /// Pixels per SVG user unit.
    pub scale: f32,
    /// Fill behind the figure; `None` keeps the figure's own background.
    pub background: Option<String>,
    pub jpeg_quality: u8,
    /// Font used when the SVG's family is not installed.
    pub font_family: String,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            background: None,
            jpeg_quality: 90,
            font_family: "DejaVu Sans".to_string(),
        }
    }
}

fn usvg_options(font_family: &str) -> usvg::Options<'static> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    opt.font_family = font_family.to_string();
    opt
}

pub fn svg_to_png(svg: &str, options: &RasterOptions) -> Result<Vec<u8>> {
    let pixmap = svg_to_pixmap(svg, options, options.background.as_deref())?;
    pixmap.encode_png().map_err(|_| RasterError::PngEncode)
}

pub fn svg_to_jpeg(svg: &str, options: &RasterOptions) -> Result<Vec<u8>> {
    let background = options.background.as_deref().unwrap_or("white");
    let color = parse_color(background)
        .ok_or_else(|| RasterError::InvalidBackground(background.to_string()))?;
    if color.alpha() < 1.0 {
        return Err(RasterError::TransparentJpegBackground);
    }

    let pixmap = svg_to_pixmap(svg, options, Some(background))?;
    let (width, height) = (pixmap.width(), pixmap.height());
    // Opaque fill means alpha is always 255; drop it.
    let rgb: Vec<u8> = pixmap
        .data()
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();

    let mut out = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, options.jpeg_quality)
        .encode(&rgb, width, height, image::ExtendedColorType::Rgb8)
        .map_err(|_| RasterError::JpegEncode)?;
    Ok(out)
}

pub fn svg_to_pdf(svg: &str) -> Result<Vec<u8>> {
    let mut opt = svg2pdf::usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    opt.font_family = RasterOptions::default().font_family;
    let tree = svg2pdf::usvg::Tree::from_str(svg, &opt).map_err(|_| RasterError::SvgParse)?;
    svg2pdf::to_pdf(
        &tree,
        svg2pdf::ConversionOptions::default(),
        svg2pdf::PageOptions::default(),
    )
    .map_err(|_| RasterError::PdfConvert)
}

fn svg_to_pixmap(
    svg: &str,
    options: &RasterOptions,
    background: Option<&str>,
) -> Result<tiny_skia::Pixmap> {
    let tree = usvg::Tree::from_str(svg, &usvg_options(&options.font_family))
        .map_err(|_| RasterError::SvgParse)?;

    // Figures always carry a root size and a viewBox anchored at the origin.
    let size = tree.size();
    let scale = options.scale;
    let width = (size.width() * scale).ceil().max(1.0) as u32;
    let height = (size.height() * scale).ceil().max(1.0) as u32;
    let mut pixmap =
        tiny_skia::Pixmap::new(width, height).ok_or(RasterError::PixmapAlloc { width, height })?;

    if let Some(background) = background {
        let color = parse_color(background)
            .ok_or_else(|| RasterError::InvalidBackground(background.to_string()))?;
        pixmap.fill(color);
    }

    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    Ok(pixmap)
}

/// Parses `transparent`, `white`, `black`, and `#rgb`/`#rgba`/`#rrggbb`/`#rrggbbaa`.
fn parse_color(text: &str) -> Option<tiny_skia::Color> {
    let text = text.trim().to_ascii_lowercase();
    match text.as_str() {
        "transparent" => return Some(tiny_skia::Color::TRANSPARENT),
        "white" => return Some(tiny_skia::Color::WHITE),
        "black" => return Some(tiny_skia::Color::BLACK),
        _ => {}
    }

    let hex = text.strip_prefix('#')?;
    let digits: Vec<u8> = hex
        .chars()
        .map(|c| c.to_digit(16).map(|d| d as u8))
        .collect::<Option<_>>()?;
    let channels: Vec<u8> = match digits.len() {
        3 | 4 => digits.iter().map(|d| (d << 4) | d).collect(),
        6 | 8 => digits.chunks_exact(2).map(|p| (p[0] << 4) | p[1]).collect(),
        _ => return None,
    };
    let alpha = channels.get(3).copied().unwrap_or(255);
    Some(tiny_skia::Color::from_rgba8(
        channels[0],
        channels[1],
        channels[2],
        alpha,
    ))
}
