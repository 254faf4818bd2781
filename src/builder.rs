//! Document construction for the three-page sales report.

use std::cell::Cell;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use genpdf::elements::PageBreak;
use genpdf::error::Error;
use genpdf::style;
use genpdf::{self, Margins, PageDecorator, PaperSize, Size};
use log::{debug, info};

use crate::data::{LedgerRow, PlaceholderGrid};
use crate::elements::{mm_from_f64, mm_to_f64, FittedImage, FixedWidthTable};
use crate::error::ReportError;
use crate::fonts;
use crate::model::{points_to_mm, TableSpec, CELL_FONT_SIZE};

/// Distance between the page edges and the content, in points (one inch).
pub const PAGE_MARGIN_PT: f64 = 72.0;

/// Width and height of the box the chart is fitted into, in points.
pub const CHART_BOX_PT: (f64, f64) = (400.0, 300.0);

/// Distance between the bottom page edge and the bottom of the chart box, in points.
pub const CHART_BOX_BOTTOM_PT: f64 = 300.0;

/// Title stored in the document metadata.
pub const DOCUMENT_TITLE: &str = "Sample Sales Report";

/// Number of pages the report consists of.
pub const REPORT_PAGES: usize = 3;

/// Builder for `genpdf::Document` instances that count the pages they emit.
#[derive(Default)]
pub struct DocumentBuilder {
    paper_size: Option<Size>,
    margins: Option<Margins>,
    title: Option<String>,
    font_size: Option<u8>,
}

impl DocumentBuilder {
    /// Creates a new builder instance with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the paper size used for newly created documents.
    pub fn with_paper_size(mut self, paper_size: impl Into<Size>) -> Self {
        self.paper_size = Some(paper_size.into());
        self
    }

    /// Sets the margins applied through the page decorator.
    pub fn with_margins(mut self, margins: impl Into<Margins>) -> Self {
        self.margins = Some(margins.into());
        self
    }

    /// Sets the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the default font size.
    pub fn with_font_size(mut self, font_size: u8) -> Self {
        self.font_size = Some(font_size);
        self
    }

    /// Builds the document together with a counter that tracks how many pages were started.
    pub fn build(self) -> Result<(genpdf::Document, PageCounter), Error> {
        let font_family = fonts::font_family()?;
        let mut document = genpdf::Document::new(font_family);

        if let Some(paper_size) = self.paper_size {
            document.set_paper_size(paper_size);
        }
        if let Some(title) = self.title {
            document.set_title(title);
        }
        if let Some(font_size) = self.font_size {
            document.set_font_size(font_size);
        }

        let counter = PageCounter::default();
        document.set_page_decorator(CountingPageDecorator {
            margins: self.margins,
            pages: counter.clone(),
        });

        Ok((document, counter))
    }
}

/// Shared count of the pages a document has started so far.
#[derive(Clone, Debug, Default)]
pub struct PageCounter(Rc<Cell<usize>>);

impl PageCounter {
    /// Returns the number of pages started so far.
    pub fn get(&self) -> usize {
        self.0.get()
    }
}

struct CountingPageDecorator {
    margins: Option<Margins>,
    pages: PageCounter,
}

impl PageDecorator for CountingPageDecorator {
    fn decorate_page<'a>(
        &mut self,
        _context: &genpdf::Context,
        mut area: genpdf::render::Area<'a>,
        _style: style::Style,
    ) -> Result<genpdf::render::Area<'a>, Error> {
        let page = self.pages.0.get() + 1;
        self.pages.0.set(page);
        debug!("Starting page {}", page);

        if let Some(margins) = self.margins {
            area.add_margins(margins);
        }

        Ok(area)
    }
}

/// A finalized report held in memory.
#[derive(Clone, Debug)]
pub struct RenderedReport {
    /// The PDF file contents.
    pub bytes: Vec<u8>,
    /// Number of pages in the document.
    pub page_count: usize,
}

/// Lays the chart and both tables out on three A4 pages.
#[derive(Clone, Debug)]
pub struct ReportAssembler {
    margin_pt: f64,
    chart_box_pt: (f64, f64),
    chart_box_bottom_pt: f64,
    ledger: TableSpec,
    placeholder: Option<TableSpec>,
}

impl Default for ReportAssembler {
    fn default() -> Self {
        Self {
            margin_pt: PAGE_MARGIN_PT,
            chart_box_pt: CHART_BOX_PT,
            chart_box_bottom_pt: CHART_BOX_BOTTOM_PT,
            ledger: TableSpec::ledger(),
            placeholder: None,
        }
    }
}

impl ReportAssembler {
    /// Creates an assembler with the default page layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the ledger table layout.
    pub fn with_ledger_spec(mut self, spec: TableSpec) -> Self {
        self.ledger = spec;
        self
    }

    /// Overrides the placeholder table layout. By default one 50 pt column per grid column is used.
    pub fn with_placeholder_spec(mut self, spec: TableSpec) -> Self {
        self.placeholder = Some(spec);
        self
    }

    /// Origin (from the upper left corner of the margin box) and size of the chart box, in mm.
    fn chart_box(&self, paper: Size) -> ((f64, f64), (f64, f64)) {
        let page_height = mm_to_f64(paper.height);
        let margin = points_to_mm(self.margin_pt);
        let (width, height) = (
            points_to_mm(self.chart_box_pt.0),
            points_to_mm(self.chart_box_pt.1),
        );
        let top = page_height - points_to_mm(self.chart_box_bottom_pt) - height - margin;
        ((0.0, top.max(0.0)), (width, height))
    }

    /// Builds the document: chart on page 1, ledger on page 2, placeholder grid on page 3.
    pub fn assemble(
        &self,
        chart_path: impl AsRef<Path>,
        ledger: &[LedgerRow],
        grid: &PlaceholderGrid,
    ) -> Result<RenderedReport, ReportError> {
        let paper: Size = PaperSize::A4.into();
        let margin = mm_from_f64(points_to_mm(self.margin_pt));
        let (mut document, pages) = DocumentBuilder::new()
            .with_paper_size(paper)
            .with_margins(Margins::trbl(margin, margin, margin, margin))
            .with_title(DOCUMENT_TITLE)
            .with_font_size(CELL_FONT_SIZE)
            .build()?;

        let (origin, bounds) = self.chart_box(paper);
        document.push(FittedImage::from_path(chart_path.as_ref(), origin, bounds)?);
        document.push(PageBreak::new());

        document.push(FixedWidthTable::new(
            &self.ledger,
            ledger.iter().map(LedgerRow::cells),
        )?);
        document.push(PageBreak::new());

        let placeholder = self
            .placeholder
            .clone()
            .unwrap_or_else(|| TableSpec::placeholder(grid.column_count()));
        document.push(FixedWidthTable::new(&placeholder, grid.rows())?);

        let mut bytes = Vec::new();
        document.render(&mut bytes)?;
        let page_count = pages.get();
        info!(
            "Assembled report with {} pages ({} bytes)",
            page_count,
            bytes.len()
        );

        Ok(RenderedReport { bytes, page_count })
    }

    /// Writes a finalized report to `path`, replacing any existing file.
    pub fn write(report: &RenderedReport, path: impl AsRef<Path>) -> Result<(), ReportError> {
        let path = path.as_ref();
        fs::write(path, &report.bytes).map_err(|err| ReportError::io(path, err))?;
        info!("Wrote report {} ({} bytes)", path.display(), report.bytes.len());
        Ok(())
    }
}
