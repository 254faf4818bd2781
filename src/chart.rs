//! Line chart rendering for the first report page.
//!
//! The chart is drawn with `plotters` into an in-memory RGB buffer and encoded as PNG with the
//! [`image`] crate, so the file written to disk is the same image later embedded in the PDF.

use std::fs;
use std::io::Cursor;
use std::ops::Range;
use std::path::Path;
use std::sync::OnceLock;

use image::{DynamicImage, ImageOutputFormat, RgbImage};
use log::{debug, info};
use plotters::prelude::*;
use plotters::style::{register_font, FontStyle};

use crate::error::ReportError;
use crate::fonts;

const FONT_FAMILY: &str = "sans-serif";
const TITLE_FONT_SIZE: u32 = 24;
const LABEL_FONT_SIZE: u32 = 16;
const MARKER_RADIUS: u32 = 5;
const LEGEND_SAMPLE_WIDTH: i32 = 24;

/// An ordered list of `(x, y)` points together with the legend label.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    label: String,
    points: Vec<(f64, f64)>,
}

impl Series {
    /// Creates a new series.
    pub fn new(label: impl Into<String>, points: impl Into<Vec<(f64, f64)>>) -> Self {
        Self {
            label: label.into(),
            points: points.into(),
        }
    }

    /// Returns the legend label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the data points.
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    fn x_range(&self) -> Range<f64> {
        padded_range(self.points.iter().map(|(x, _)| *x))
    }

    fn y_range(&self) -> Range<f64> {
        padded_range(self.points.iter().map(|(_, y)| *y))
    }
}

impl Default for Series {
    fn default() -> Self {
        Self::new(
            "line 1",
            vec![(1.0, 10.0), (2.0, 20.0), (3.0, 30.0), (4.0, 40.0)],
        )
    }
}

/// Everything needed to draw the sales chart.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartSpec {
    /// Title printed above the plot.
    pub title: String,
    /// Description of the horizontal axis.
    pub x_label: String,
    /// Description of the vertical axis.
    pub y_label: String,
    /// Figure size in inches.
    pub figure_size: (f64, f64),
    /// Pixels per inch of the raster output.
    pub dpi: f64,
    /// Stroke width of the connecting line in pixels.
    pub line_width: u32,
    /// The plotted series.
    pub series: Series,
}

impl Default for ChartSpec {
    fn default() -> Self {
        Self {
            title: "Sample Sales Report".to_owned(),
            x_label: "Quarter".to_owned(),
            y_label: "Sales".to_owned(),
            figure_size: (6.0, 4.0),
            dpi: 100.0,
            line_width: 2,
            series: Series::default(),
        }
    }
}

impl ChartSpec {
    /// Returns the raster size in pixels derived from the figure size and resolution.
    pub fn pixel_size(&self) -> (u32, u32) {
        let (width, height) = self.figure_size;
        (
            (width * self.dpi).round().max(1.0) as u32,
            (height * self.dpi).round().max(1.0) as u32,
        )
    }
}

/// Pads the span of `values` by five percent on each side.
fn padded_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), value| {
        (min.min(value), max.max(value))
    });

    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }

    let span = max - min;
    let padding = if span > f64::EPSILON {
        span * 0.05
    } else {
        1.0
    };
    (min - padding)..(max + padding)
}

/// Colour of the plotted line and its markers.
pub const LINE_COLOR: RGBColor = RGBColor(0, 128, 0);

fn ensure_chart_font() -> Result<(), ReportError> {
    static REGISTERED: OnceLock<()> = OnceLock::new();

    if REGISTERED.get().is_some() {
        return Ok(());
    }
    register_font(FONT_FAMILY, FontStyle::Normal, fonts::face_bytes()?)
        .map_err(|_| ReportError::chart("the chart font could not be parsed"))?;
    REGISTERED.get_or_init(|| ());
    Ok(())
}

/// Renders `spec` and returns the PNG-encoded image.
pub fn render_line_chart_png(spec: &ChartSpec) -> Result<Vec<u8>, ReportError> {
    ensure_chart_font()?;

    let (width, height) = spec.pixel_size();
    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    draw_chart(spec, &mut buffer, (width, height))?;

    let raster = RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| ReportError::chart("chart buffer does not match the image size"))?;

    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(raster).write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)?;
    debug!("Encoded {}x{} chart ({} bytes)", width, height, bytes.len());
    Ok(bytes)
}

/// Renders `spec` as a PNG file at `path`, replacing any existing file.
pub fn render_line_chart(spec: &ChartSpec, path: impl AsRef<Path>) -> Result<(), ReportError> {
    let path = path.as_ref();
    let bytes = render_line_chart_png(spec)?;
    fs::write(path, &bytes).map_err(|err| ReportError::io(path, err))?;
    info!("Wrote chart {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

fn draw_chart(spec: &ChartSpec, buffer: &mut [u8], size: (u32, u32)) -> Result<(), ReportError> {
    let root = BitMapBackend::with_buffer(buffer, size).into_drawing_area();
    root.fill(&WHITE).map_err(ReportError::chart)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&spec.title, (FONT_FAMILY, TITLE_FONT_SIZE))
        .margin(16)
        .x_label_area_size(44)
        .y_label_area_size(56)
        .build_cartesian_2d(spec.series.x_range(), spec.series.y_range())
        .map_err(ReportError::chart)?;

    chart
        .configure_mesh()
        .x_desc(spec.x_label.as_str())
        .y_desc(spec.y_label.as_str())
        .label_style((FONT_FAMILY, LABEL_FONT_SIZE))
        .axis_desc_style((FONT_FAMILY, LABEL_FONT_SIZE))
        .disable_mesh()
        .draw()
        .map_err(ReportError::chart)?;

    // Markers take the fill flag, the connecting path takes the stroke width.
    let series_style = LINE_COLOR.filled().stroke_width(spec.line_width);
    chart
        .draw_series(
            LineSeries::new(spec.series.points().iter().copied(), series_style)
                .point_size(MARKER_RADIUS),
        )
        .map_err(ReportError::chart)?
        .label(spec.series.label())
        .legend(move |(x, y)| {
            EmptyElement::at((x, y))
                + PathElement::new(vec![(0, 0), (LEGEND_SAMPLE_WIDTH, 0)], series_style)
                + Circle::new((LEGEND_SAMPLE_WIDTH / 2, 0), MARKER_RADIUS, series_style)
        });

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .label_font((FONT_FAMILY, LABEL_FONT_SIZE))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(ReportError::chart)?;

    root.present().map_err(ReportError::chart)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_spec_is_six_by_four_inches() {
        let spec = ChartSpec::default();
        assert_eq!(spec.pixel_size(), (600, 400));
        assert_eq!(spec.series.points().len(), 4);
        assert_eq!(spec.series.label(), "line 1");
    }

    #[test]
    fn ranges_pad_the_data() {
        let series = Series::default();
        let x = series.x_range();
        let y = series.y_range();
        assert!(x.start < 1.0 && x.end > 4.0);
        assert!(y.start < 10.0 && y.end > 40.0);
    }

    #[test]
    fn flat_series_still_has_a_range() {
        let range = padded_range([5.0, 5.0].into_iter());
        assert_eq!(range, 4.0..6.0);
        assert_eq!(padded_range(std::iter::empty()), 0.0..1.0);
    }

    fn contains_solid_block(image: &RgbImage, color: [u8; 3], side: u32) -> bool {
        (0..image.height().saturating_sub(side)).any(|y| {
            (0..image.width().saturating_sub(side)).any(|x| {
                (0..side).all(|dy| (0..side).all(|dx| image.get_pixel(x + dx, y + dy).0 == color))
            })
        })
    }

    #[test]
    fn line_and_markers_are_dark_green() {
        let png = render_line_chart_png(&ChartSpec::default()).expect("render chart");
        let raster = image::load_from_memory(&png).expect("decode chart").to_rgb8();
        let dark_green = [LINE_COLOR.0, LINE_COLOR.1, LINE_COLOR.2];

        assert_eq!(dark_green, [0, 128, 0]);
        assert!(raster.pixels().any(|pixel| pixel.0 == dark_green));
        assert!(raster.pixels().all(|pixel| pixel.0 != [0, 255, 0]));
        // A 2 px line cannot hold a 4x4 block, a filled 5 px marker can.
        assert!(contains_solid_block(&raster, dark_green, 4));
    }
}
