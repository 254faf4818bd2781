//! The font face shared by the report document and the chart labels.
//!
//! Roboto Medium is compiled into the crate. Setting [`FONT_OVERRIDE_ENV`] to the path of a
//! TrueType file replaces it; the override is read once per process.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use genpdf::error::{Context as _, Error, ErrorKind};
use genpdf::fonts::{FontData, FontFamily};
use log::debug;
use printpdf::BuiltinFont;

/// Name of the bundled face.
pub const FONT_FAMILY_NAME: &str = "Roboto";

/// Environment variable naming a TrueType file to use instead of the bundled face.
pub const FONT_OVERRIDE_ENV: &str = "SALES_REPORT_FONT";

static BUNDLED_FACE: &[u8] = include_bytes!("../assets/fonts/Roboto-Medium.ttf");

fn override_path() -> Option<PathBuf> {
    env::var_os(FONT_OVERRIDE_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Reads and validates the TrueType file at `path`.
pub fn read_face(path: impl AsRef<Path>) -> Result<Vec<u8>, Error> {
    let path = path.as_ref();
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read font file {}", path.display()))?;
    FontData::new(bytes.clone(), None).map_err(|err| {
        Error::new(
            format!("{} is not a usable TrueType font: {}", path.display(), err),
            ErrorKind::InvalidFont,
        )
    })?;
    Ok(bytes)
}

/// Returns the raw bytes of the face in use.
///
/// The slice lives for the whole process, which is what the chart rasterizer requires.
pub fn face_bytes() -> Result<&'static [u8], Error> {
    static OVERRIDE: OnceLock<Vec<u8>> = OnceLock::new();

    let Some(path) = override_path() else {
        return Ok(BUNDLED_FACE);
    };
    if let Some(bytes) = OVERRIDE.get() {
        return Ok(bytes.as_slice());
    }
    let bytes = read_face(&path)?;
    debug!("Using font override {}", path.display());
    Ok(OVERRIDE.get_or_init(|| bytes).as_slice())
}

/// Builds the document font family from the face in use.
///
/// Only the regular style is printed, so the other styles point at built-in PDF fonts and the
/// file embeds a single face.
pub fn font_family() -> Result<FontFamily<FontData>, Error> {
    let bytes = face_bytes()?;
    let builtin = |font| FontData::new(bytes.to_vec(), Some(font));
    Ok(FontFamily {
        regular: FontData::new(bytes.to_vec(), None)?,
        bold: builtin(BuiltinFont::HelveticaBold)?,
        italic: builtin(BuiltinFont::HelveticaOblique)?,
        bold_italic: builtin(BuiltinFont::HelveticaBoldOblique)?,
    })
}
