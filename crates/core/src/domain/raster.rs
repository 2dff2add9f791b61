// Raster Pipeline - decode, resample, quantize, render
//
// The transform is deterministic: identical input bytes and width always
// produce the identical glyph grid.

use image::{imageops::FilterType, DynamicImage, GenericImageView, ImageBuffer, ImageFormat, Pixel};
use thiserror::Error;

use crate::domain::ramp::CharRamp;

#[derive(Error, Debug)]
pub enum RasterError {
    #[error("Image decode failed: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Invalid render dimension: {0}")]
    InvalidDimension(String),
}

pub type Result<T> = std::result::Result<T, RasterError>;

/// A decoded source image together with its detected wire format.
#[derive(Debug)]
pub struct SourceImage {
    image: DynamicImage,
    format: Option<ImageFormat>,
}

impl SourceImage {
    /// Decode encoded image bytes. The container format is sniffed from the
    /// bytes themselves, never from a filename.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let format = image::guess_format(bytes).ok();
        let image = image::load_from_memory(bytes)?;
        Ok(Self { image, format })
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// Original dimensions (width, height).
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Lowercase format name, e.g. "png" or "jpeg".
    pub fn format_name(&self) -> String {
        match self.format {
            Some(format) => format!("{:?}", format).to_ascii_lowercase(),
            None => "unknown".to_string(),
        }
    }
}

/// Media type of encoded image bytes, for serving the original artifact.
pub fn sniff_media_type(bytes: &[u8]) -> Option<&'static str> {
    image::guess_format(bytes).ok().map(|f| f.to_mime_type())
}

/// Row-major grid of ramp indices, one cell per output glyph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntensityGrid {
    width: u32,
    height: u32,
    cells: Vec<usize>,
}

impl IntensityGrid {
    /// Build a grid from precomputed cells. `cells.len()` must equal
    /// `width * height`.
    pub fn from_cells(width: u32, height: u32, cells: Vec<usize>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if cells.len() != expected {
            return Err(RasterError::InvalidDimension(format!(
                "grid of {}x{} needs {} cells, got {}",
                width,
                height,
                expected,
                cells.len()
            )));
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn cells(&self) -> &[usize] {
        &self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[usize]> {
        // max(1) keeps chunks() legal for the empty grid
        self.cells.chunks(self.width.max(1) as usize)
    }
}

/// Map an image onto a `target_width`-wide grid of ramp indices.
///
/// The output height preserves the source aspect ratio, rounded to the
/// nearest row. A source so wide that the height rounds to zero yields an
/// empty grid, which renders as the empty string.
///
/// Intensity of a cell is the plain sum of the resampled pixel's channel
/// values, over whatever channels the decoded image actually has (alpha
/// included). Sums are then normalized per image: the minimum shifts to
/// zero, the maximum spans the ramp. Higher brightness yields a lower
/// index, and index 0 is the densest glyph, so the brightest cells draw
/// the most ink.
pub fn intensity_map(
    image: &DynamicImage,
    target_width: u32,
    ramp_len: usize,
) -> Result<IntensityGrid> {
    if target_width == 0 {
        return Err(RasterError::InvalidDimension(
            "target width must be positive".to_string(),
        ));
    }
    if ramp_len == 0 {
        return Err(RasterError::InvalidDimension(
            "character ramp is empty".to_string(),
        ));
    }

    let (src_w, src_h) = image.dimensions();
    if src_w == 0 || src_h == 0 {
        return Err(RasterError::InvalidDimension(format!(
            "source image has degenerate dimensions {}x{}",
            src_w, src_h
        )));
    }

    let target_height = (target_width as f64 * src_h as f64 / src_w as f64).round() as u32;
    if target_height == 0 {
        return IntensityGrid::from_cells(target_width, 0, Vec::new());
    }

    let resized = image.resize_exact(target_width, target_height, FilterType::Triangle);
    let sums = channel_sums_dyn(&resized);
    Ok(quantize(sums, target_width, target_height, ramp_len))
}

/// Render a grid as text. Rows are joined with a single `\n`; there is no
/// separator within a row and no trailing newline.
pub fn render(grid: &IntensityGrid, ramp: &CharRamp) -> String {
    let mut out = String::with_capacity((grid.width as usize + 1) * grid.height as usize);
    for (i, row) in grid.rows().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        for &cell in row {
            out.push(ramp.glyph(cell));
        }
    }
    out
}

fn channel_sums<P>(buf: &ImageBuffer<P, Vec<P::Subpixel>>) -> Vec<f32>
where
    P: Pixel,
    P::Subpixel: Into<f32>,
{
    buf.pixels()
        .map(|px| px.channels().iter().fold(0.0f32, |acc, &c| acc + c.into()))
        .collect()
}

// Sum over the channels the decoded representation actually carries, so a
// grayscale image contributes one channel and an RGBA image four.
fn channel_sums_dyn(image: &DynamicImage) -> Vec<f32> {
    match image {
        DynamicImage::ImageLuma8(buf) => channel_sums(buf),
        DynamicImage::ImageLumaA8(buf) => channel_sums(buf),
        DynamicImage::ImageRgb8(buf) => channel_sums(buf),
        DynamicImage::ImageRgba8(buf) => channel_sums(buf),
        DynamicImage::ImageLuma16(buf) => channel_sums(buf),
        DynamicImage::ImageLumaA16(buf) => channel_sums(buf),
        DynamicImage::ImageRgb16(buf) => channel_sums(buf),
        DynamicImage::ImageRgba16(buf) => channel_sums(buf),
        DynamicImage::ImageRgb32F(buf) => channel_sums(buf),
        DynamicImage::ImageRgba32F(buf) => channel_sums(buf),
        other => channel_sums(&other.to_rgba32f()),
    }
}

fn quantize(mut sums: Vec<f32>, width: u32, height: u32, ramp_len: usize) -> IntensityGrid {
    let min = sums.iter().copied().fold(f32::INFINITY, f32::min);
    for v in &mut sums {
        *v -= min;
    }
    let max = sums.iter().copied().fold(0.0f32, f32::max);

    let scale = (ramp_len - 1) as f32;
    let cells = if max > 0.0 {
        sums.iter().map(|&v| ((1.0 - v / max) * scale) as usize).collect()
    } else {
        // constant image: every cell maps to the densest glyph
        vec![0; sums.len()]
    };

    IntensityGrid {
        width,
        height,
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, RgbImage, Rgba, RgbaImage};
    use std::io::Cursor;

    fn gray(width: u32, height: u32, pixels: Vec<u8>) -> DynamicImage {
        DynamicImage::ImageLuma8(GrayImage::from_raw(width, height, pixels).unwrap())
    }

    fn png_bytes(image: &DynamicImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_grid_shape_preserves_aspect_ratio() {
        // 4x2 source at width 2 -> height round(2 * 2 / 4) = 1
        let img = gray(4, 2, vec![10; 8]);
        let grid = intensity_map(&img, 2, 69).unwrap();
        assert_eq!(grid.width(), 2);
        assert_eq!(grid.height(), 1);
        assert_eq!(grid.cells().len(), 2);
    }

    #[test]
    fn test_grid_height_rounds_to_nearest() {
        // 3x5 source at width 2 -> height round(2 * 5 / 3) = round(3.33) = 3
        let img = gray(3, 5, (0..15).collect());
        let grid = intensity_map(&img, 2, 69).unwrap();
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.cells().len(), 6);
        assert!(grid.cells().iter().all(|&c| c < 69));
    }

    #[test]
    fn test_extreme_aspect_yields_empty_grid() {
        // 100x1 source at width 10 -> height round(0.1) = 0
        let img = gray(100, 1, vec![128; 100]);
        let grid = intensity_map(&img, 10, 69).unwrap();
        assert_eq!(grid.height(), 0);
        assert!(grid.cells().is_empty());
        assert_eq!(render(&grid, &CharRamp::standard()), "");
    }

    #[test]
    fn test_brighter_pixels_get_lower_indices() {
        // identity resize keeps the two samples exact
        let img = gray(2, 1, vec![0, 255]);
        let grid = intensity_map(&img, 2, 69).unwrap();
        assert_eq!(grid.cells(), &[68, 0]);

        let text = render(&grid, &CharRamp::standard());
        assert_eq!(text, " $");
    }

    #[test]
    fn test_midtone_quantizes_by_truncation() {
        let img = gray(3, 1, vec![0, 128, 255]);
        let grid = intensity_map(&img, 3, 69).unwrap();
        // 128/255 normalized, inverted, scaled: trunc(33.87) = 33
        assert_eq!(grid.cells(), &[68, 33, 0]);
    }

    #[test]
    fn test_constant_black_image_renders_densest_glyph() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(2, 2));
        let grid = intensity_map(&img, 2, 69).unwrap();
        assert_eq!(grid.cells(), &[0, 0, 0, 0]);
        assert_eq!(render(&grid, &CharRamp::standard()), "$$\n$$");
    }

    #[test]
    fn test_constant_white_image_also_renders_densest_glyph() {
        // any constant image normalizes to an all-zero span
        let img = gray(2, 2, vec![255; 4]);
        let grid = intensity_map(&img, 2, 69).unwrap();
        assert_eq!(grid.cells(), &[0, 0, 0, 0]);
    }

    #[test]
    fn test_alpha_channel_contributes_to_intensity() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([100, 100, 100, 0]));
        img.put_pixel(1, 0, Rgba([100, 100, 100, 255]));
        let grid = intensity_map(&DynamicImage::ImageRgba8(img), 2, 69).unwrap();
        // same color, different alpha: the opaque pixel is "brighter"
        assert_eq!(grid.cells(), &[68, 0]);
    }

    #[test]
    fn test_zero_width_rejected() {
        let img = gray(2, 2, vec![0; 4]);
        let err = intensity_map(&img, 0, 69).unwrap_err();
        assert!(err.to_string().contains("width"));
    }

    #[test]
    fn test_decode_failure_reports_raster_error() {
        let err = SourceImage::decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, RasterError::Decode(_)));
    }

    #[test]
    fn test_decode_detects_png_format() {
        let bytes = png_bytes(&gray(2, 2, vec![0, 64, 128, 255]));
        let source = SourceImage::decode(&bytes).unwrap();
        assert_eq!(source.format_name(), "png");
        assert_eq!(source.dimensions(), (2, 2));
    }

    #[test]
    fn test_sniff_media_type() {
        let bytes = png_bytes(&gray(1, 1, vec![0]));
        assert_eq!(sniff_media_type(&bytes), Some("image/png"));
        assert_eq!(sniff_media_type(b"garbage"), None);
    }

    #[test]
    fn test_render_joins_rows_without_trailing_newline() {
        let ramp = CharRamp::from_glyphs("ab").unwrap();
        let grid = IntensityGrid::from_cells(2, 2, vec![0, 1, 1, 0]).unwrap();
        assert_eq!(render(&grid, &ramp), "ab\nba");
    }

    #[test]
    fn test_from_cells_validates_shape() {
        let err = IntensityGrid::from_cells(2, 2, vec![0; 3]).unwrap_err();
        assert!(err.to_string().contains("needs 4 cells"));
    }

    #[test]
    fn test_same_input_same_grid() {
        let img = gray(7, 5, (0..35).map(|v| (v * 7) as u8).collect());
        let a = intensity_map(&img, 4, 69).unwrap();
        let b = intensity_map(&img, 4, 69).unwrap();
        assert_eq!(a, b);
    }
}
