//! The end-to-end pipeline: chart, mock data, three-page document.

use std::fs;
use std::path::PathBuf;

use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::builder::ReportAssembler;
use crate::chart::{self, ChartSpec};
use crate::data::{self, LedgerRow};
use crate::error::ReportError;

/// Default output folder, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "out";

/// Default file name of the chart image.
pub const CHART_FILE_NAME: &str = "sales_graph.png";

/// Default file name of the report document.
pub const REPORT_FILE_NAME: &str = "sales_report.pdf";

/// Settings for a report run. `Default` reproduces the stock layout and file names.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportConfig {
    /// Folder receiving both output files. Created when missing.
    pub output_dir: PathBuf,
    /// File name of the chart image inside `output_dir`.
    pub chart_file_name: String,
    /// File name of the PDF inside `output_dir`.
    pub report_file_name: String,
    /// Seed for the ledger amounts; `None` draws fresh values on every run.
    pub seed: Option<u64>,
    /// Whether to add one outline entry per page. Requires the `bookmarks` feature.
    pub bookmarks: bool,
    /// Chart content and size.
    pub chart: ChartSpec,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            chart_file_name: CHART_FILE_NAME.to_owned(),
            report_file_name: REPORT_FILE_NAME.to_owned(),
            seed: None,
            bookmarks: false,
            chart: ChartSpec::default(),
        }
    }
}

impl ReportConfig {
    /// Returns a config writing to `output_dir` with every other setting at its default.
    pub fn with_output_dir(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    /// Full path of the chart image.
    pub fn chart_path(&self) -> PathBuf {
        self.output_dir.join(&self.chart_file_name)
    }

    /// Full path of the report document.
    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(&self.report_file_name)
    }
}

/// Paths and page count of a finished run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportOutput {
    /// Location of the chart image.
    pub chart_path: PathBuf,
    /// Location of the PDF.
    pub report_path: PathBuf,
    /// Number of pages in the PDF.
    pub page_count: usize,
}

fn generate_ledger(seed: Option<u64>) -> Vec<LedgerRow> {
    match seed {
        Some(seed) => data::generate_ledger_with(
            &mut StdRng::seed_from_u64(seed),
            data::ledger_start_date(),
            data::LEDGER_ROWS,
        ),
        None => data::generate_ledger(),
    }
}

/// Renders the chart, generates the datasets and writes the three-page report.
pub fn run(config: &ReportConfig) -> Result<ReportOutput, ReportError> {
    fs::create_dir_all(&config.output_dir)
        .map_err(|err| ReportError::io(&config.output_dir, err))?;

    let chart_path = config.chart_path();
    info!("Rendering chart '{}'", config.chart.title);
    chart::render_line_chart(&config.chart, &chart_path)?;

    let ledger = generate_ledger(config.seed);
    let grid = data::generate_placeholder_grid();
    info!(
        "Generated {} ledger rows and a {}x{} placeholder grid",
        ledger.len(),
        grid.rows().len(),
        grid.column_count()
    );

    let mut report = ReportAssembler::new().assemble(&chart_path, &ledger, &grid)?;
    if config.bookmarks {
        report.bytes = add_bookmarks(report.bytes)?;
    }

    let report_path = config.report_path();
    ReportAssembler::write(&report, &report_path)?;

    Ok(ReportOutput {
        chart_path,
        report_path,
        page_count: report.page_count,
    })
}

#[cfg(feature = "bookmarks")]
fn add_bookmarks(bytes: Vec<u8>) -> Result<Vec<u8>, ReportError> {
    use crate::bookmarks;

    let bookmarked = bookmarks::add_page_outline(&bytes, &bookmarks::PAGE_TITLES)?;
    info!("Added {} outline entries", bookmarks::PAGE_TITLES.len());
    Ok(bookmarked)
}

#[cfg(not(feature = "bookmarks"))]
fn add_bookmarks(bytes: Vec<u8>) -> Result<Vec<u8>, ReportError> {
    log::warn!("Page bookmarks requested but the `bookmarks` feature is disabled; skipping");
    Ok(bytes)
}
