//! Custom `genpdf` elements used by the report pages.
//!
//! `genpdf` lays tables out relative to the available width and has no notion of cell fills,
//! coloured frames or absolutely placed images. The elements below add them: an image fitted into
//! a fixed box, table cells with a fixed height and optional background, a decorator framing every
//! cell in one colour, and a table wrapper that pins the table to a fixed width.
//!
//! `genpdf` only strokes lines at the PDF default width of one point, so a background is painted
//! as a stack of such lines.

use std::path::Path;

use image::GenericImageView;

use genpdf::elements::{CellDecorator, Image, Paragraph, TableLayout};
use genpdf::error::{Context as _, Error};
use genpdf::style::{Color, Style, StyledString};
use genpdf::{render, Alignment, Element, Mm, Position, RenderResult, Scale, Size};
use log::debug;

use crate::model::{points_to_mm, TableSpec, MM_PER_INCH};

const DEFAULT_IMAGE_DPI: f64 = 300.0;

/// Distance between the strokes that paint a cell background, in points. Less than the one point
/// stroke width so neighbouring strokes overlap.
const FILL_STROKE_STEP_PT: f64 = 0.75;

pub(crate) fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

pub(crate) fn mm_to_f64(value: Mm) -> f64 {
    let mm: printpdf::Mm = value.into();
    mm.0
}

fn mm_from_points(points: f64) -> Mm {
    mm_from_f64(points_to_mm(points))
}

/// Loads an image from the given path using the [`image`] crate with descriptive errors.
pub fn decode_image_from_path(path: impl AsRef<Path>) -> Result<image::DynamicImage, Error> {
    let path = path.as_ref();
    let reader = image::io::Reader::open(path)
        .with_context(|| format!("Failed to open image file {}", path.display()))?;
    reader
        .with_guessed_format()
        .context("Unable to determine image format")?
        .decode()
        .with_context(|| format!("Failed to decode image file {}", path.display()))
}

/// Computes the scale factor and placed size of an image of `natural` size (width, height) that
/// has to fit into `bounds` while keeping its aspect ratio.
pub fn fit_into_box(natural: (f64, f64), bounds: (f64, f64)) -> (f64, (f64, f64)) {
    let (width, height) = natural;
    if width <= f64::EPSILON || height <= f64::EPSILON {
        return (1.0, (0.0, 0.0));
    }
    let scale = (bounds.0 / width).min(bounds.1 / height);
    (scale, (width * scale, height * scale))
}

/// An image scaled to fit a fixed box and centered inside it.
///
/// The box is positioned relative to the upper left corner of the area the element is rendered
/// into, so together with the page margins it pins the image to a fixed spot on the page.
pub struct FittedImage {
    image: Image,
    natural_size: (f64, f64),
    origin: (f64, f64),
    bounds: (f64, f64),
}

impl FittedImage {
    /// Creates the element from a decoded image, a box origin and a box size (all in millimetres).
    pub fn from_dynamic_image(
        image: image::DynamicImage,
        origin: (f64, f64),
        bounds: (f64, f64),
    ) -> Result<Self, Error> {
        let (px_width, px_height) = image.dimensions();
        let natural_size = (
            MM_PER_INCH * f64::from(px_width) / DEFAULT_IMAGE_DPI,
            MM_PER_INCH * f64::from(px_height) / DEFAULT_IMAGE_DPI,
        );
        let mut image = Image::from_dynamic_image(image)?;
        image.set_dpi(DEFAULT_IMAGE_DPI);
        image.set_alignment(Alignment::Left);
        Ok(Self {
            image,
            natural_size,
            origin,
            bounds,
        })
    }

    /// Creates the element from the image file at `path`.
    pub fn from_path(
        path: impl AsRef<Path>,
        origin: (f64, f64),
        bounds: (f64, f64),
    ) -> Result<Self, Error> {
        Self::from_dynamic_image(decode_image_from_path(path)?, origin, bounds)
    }
}

impl Element for FittedImage {
    fn render(
        &mut self,
        context: &genpdf::Context,
        mut area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let (scale, placed) = fit_into_box(self.natural_size, self.bounds);
        let x = self.origin.0 + (self.bounds.0 - placed.0) / 2.0;
        let y = self.origin.1 + (self.bounds.1 - placed.1) / 2.0;
        debug!(
            "Placing image at ({:.1} mm, {:.1} mm) with size {:.1} x {:.1} mm",
            x, y, placed.0, placed.1
        );

        self.image.set_scale(Scale::new(scale, scale));
        area.add_offset(Position::new(mm_from_f64(x), mm_from_f64(y)));
        let image_result = self.image.render(context, area, style)?;

        let mut result = RenderResult::default();
        result.size = Size::new(
            mm_from_f64(self.origin.0 + self.bounds.0),
            mm_from_f64(self.origin.1 + self.bounds.1),
        );
        result.has_more = image_result.has_more;
        Ok(result)
    }
}

/// A single line of text in a cell of fixed height, optionally drawn on a solid background.
pub struct TableCell {
    text: StyledString,
    alignment: Alignment,
    height: Mm,
    background: Option<Color>,
}

impl TableCell {
    /// Creates a cell with the given text and height.
    pub fn new(text: impl Into<StyledString>, height: Mm) -> Self {
        Self {
            text: text.into(),
            alignment: Alignment::Center,
            height,
            background: None,
        }
    }

    /// Sets the alignment and returns the updated cell.
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Sets the background colour and returns the updated cell.
    pub fn with_background(mut self, color: impl Into<Option<Color>>) -> Self {
        self.background = color.into();
        self
    }
}

impl Element for TableCell {
    fn render(
        &mut self,
        context: &genpdf::Context,
        mut area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let mut result = RenderResult::default();
        if self.height > area.size().height {
            result.has_more = true;
            return Ok(result);
        }

        let width = area.size().width;
        if let Some(color) = self.background {
            let stroke = Style::new().with_color(color);
            for offset in fill_offsets(mm_to_f64(self.height)) {
                let y = mm_from_f64(offset);
                area.draw_line(vec![Position::new(0, y), Position::new(width, y)], stroke);
            }
        }

        let text_style = style.and(self.text.style);
        let line_height = text_style.line_height(&context.font_cache);
        if line_height < self.height {
            area.add_offset(Position::new(0, (self.height - line_height) / 2.0));
        }

        let mut paragraph = Paragraph::new(self.text.clone());
        paragraph.set_alignment(self.alignment);
        let text_result = paragraph.render(context, area, style)?;

        result.size = Size::new(width, self.height);
        result.has_more = text_result.has_more;
        Ok(result)
    }
}

/// Vertical offsets (mm) of the strokes covering a band of `height` mm.
fn fill_offsets(height: f64) -> Vec<f64> {
    let step = points_to_mm(FILL_STROKE_STEP_PT);
    let half_stroke = points_to_mm(0.5);
    if height <= half_stroke * 2.0 {
        return vec![height / 2.0];
    }
    let strokes = ((height - half_stroke * 2.0) / step).ceil() as usize + 1;
    let step = (height - half_stroke * 2.0) / (strokes - 1) as f64;
    (0..strokes)
        .map(|index| half_stroke + step * index as f64)
        .collect()
}

/// Frames every cell of a table with lines of one colour.
#[derive(Clone, Debug)]
pub struct GridDecorator {
    style: Style,
}

impl GridDecorator {
    /// Creates a decorator drawing the grid in `color`.
    pub fn new(color: Color) -> Self {
        Self {
            style: Style::new().with_color(color),
        }
    }
}

impl CellDecorator for GridDecorator {
    fn decorate_cell(
        &mut self,
        _column: usize,
        _row: usize,
        _has_more: bool,
        area: render::Area<'_>,
        _style: Style,
    ) {
        let Size { width, height } = area.size();
        let corners = vec![
            Position::new(0, 0),
            Position::new(width, 0),
            Position::new(width, height),
            Position::new(0, height),
            Position::new(0, 0),
        ];
        area.draw_line(corners, self.style);
    }
}

/// A bordered table rendered at a fixed total width.
pub struct FixedWidthTable {
    table: TableLayout,
    width: Mm,
}

impl FixedWidthTable {
    /// Builds the table described by `spec` with the given body rows.
    pub fn new<R, C>(spec: &TableSpec, rows: R) -> Result<Self, Error>
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let mut table = TableLayout::new(spec.column_weights());
        table.set_cell_decorator(GridDecorator::new(spec.grid_color().into()));

        let row_height = mm_from_points(spec.row_height_pt());
        let alignment: Alignment = spec.alignment().into();
        let body_style = Style::new().with_font_size(spec.font_size());

        if let Some(header) = spec.header() {
            let header_style = body_style.with_color(header.text.into());
            let cells = header
                .captions
                .iter()
                .map(|caption| {
                    Box::new(
                        TableCell::new(StyledString::new(caption.clone(), header_style), row_height)
                            .with_alignment(alignment)
                            .with_background(Color::from(header.background)),
                    ) as Box<dyn Element>
                })
                .collect();
            table.push_row(cells)?;
        }

        for row in rows {
            let cells = row
                .into_iter()
                .map(|value| {
                    Box::new(
                        TableCell::new(StyledString::new(value.into(), body_style), row_height)
                            .with_alignment(alignment),
                    ) as Box<dyn Element>
                })
                .collect();
            table.push_row(cells)?;
        }

        Ok(Self {
            table,
            width: mm_from_points(spec.width_pt()),
        })
    }
}

impl Element for FixedWidthTable {
    fn render(
        &mut self,
        context: &genpdf::Context,
        mut area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        area.set_width(self.width);
        self.table.render(context, area, style)
    }
}
