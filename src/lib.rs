//! Renders a sample sales report: a line chart, a mock ledger and a placeholder grid, each on its
//! own page of a single PDF document.

pub mod builder;
pub mod chart;
pub mod data;
pub mod elements;
pub mod error;
pub mod fonts;
pub mod model;
pub mod report;

#[cfg(feature = "bookmarks")]
pub mod bookmarks;

pub use error::ReportError;
pub use report::{run, ReportConfig, ReportOutput};
