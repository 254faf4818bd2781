//! Error type shared by the report pipeline.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors that can occur while rendering the chart, assembling the document or writing outputs.
#[derive(Debug)]
pub enum ReportError {
    /// Reading or writing a file failed.
    Io {
        /// Path of the file or directory that could not be accessed.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },
    /// `genpdf` failed to load fonts, lay out elements or render the document.
    Pdf(genpdf::error::Error),
    /// The chart could not be drawn.
    Chart(String),
    /// The chart image could not be encoded or decoded.
    Image(image::ImageError),
    /// The rendered document could not be parsed or rewritten to add the page outline.
    #[cfg(feature = "bookmarks")]
    Outline(lopdf::Error),
    /// The outline titles do not match the pages of the rendered document.
    #[cfg(feature = "bookmarks")]
    OutlinePages {
        /// Number of titles supplied.
        titles: usize,
        /// Number of pages in the document.
        pages: usize,
    },
}

impl ReportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn chart(err: impl fmt::Display) -> Self {
        Self::Chart(err.to_string())
    }
}

impl From<genpdf::error::Error> for ReportError {
    fn from(err: genpdf::error::Error) -> Self {
        Self::Pdf(err)
    }
}

impl From<image::ImageError> for ReportError {
    fn from(err: image::ImageError) -> Self {
        Self::Image(err)
    }
}

#[cfg(feature = "bookmarks")]
impl From<lopdf::Error> for ReportError {
    fn from(err: lopdf::Error) -> Self {
        Self::Outline(err)
    }
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, .. } => write!(f, "Failed to access {}", path.display()),
            Self::Pdf(err) => write!(f, "Failed to render PDF document: {err}"),
            Self::Chart(message) => write!(f, "Failed to draw chart: {message}"),
            Self::Image(err) => write!(f, "Failed to process chart image: {err}"),
            #[cfg(feature = "bookmarks")]
            Self::Outline(err) => write!(f, "Failed to add the page outline: {err}"),
            #[cfg(feature = "bookmarks")]
            Self::OutlinePages { titles, pages } => write!(
                f,
                "Got {titles} outline titles for a document with {pages} pages"
            ),
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Pdf(err) => Some(err),
            Self::Image(err) => Some(err),
            Self::Chart(_) => None,
            #[cfg(feature = "bookmarks")]
            Self::Outline(err) => Some(err),
            #[cfg(feature = "bookmarks")]
            Self::OutlinePages { .. } => None,
        }
    }
}
