use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use log::info;
use sales_report::report::{self, ReportConfig, DEFAULT_OUTPUT_DIR};

/// Renders the sample sales report (chart, ledger and placeholder grid) to a PDF.
///
/// The bundled Roboto face is used unless `SALES_REPORT_FONT` names another TrueType file.
#[derive(Parser)]
#[command(author, version, about = "Generate the sample sales report PDF")]
struct Cli {
    /// Folder receiving `sales_graph.png` and `sales_report.pdf`.
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Seed for the ledger amounts. Without it every run draws new values.
    #[arg(long)]
    seed: Option<u64>,

    /// Add one outline entry per page (needs the `bookmarks` feature).
    #[arg(long)]
    bookmarks: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = ReportConfig {
        output_dir: cli.output_dir,
        seed: cli.seed,
        bookmarks: cli.bookmarks,
        ..ReportConfig::default()
    };

    match report::run(&config) {
        Ok(output) => info!(
            "Generated {} and {} ({} pages)",
            output.chart_path.display(),
            output.report_path.display(),
            output.page_count
        ),
        Err(err) => {
            eprintln!("Error: {}", err);
            print_error_sources(&err);
            std::process::exit(1);
        }
    }
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
