//! Layout description of the report tables.
//!
//! The types in this module describe how a table should look (column widths, row height, header
//! styling and grid colour) without referencing `genpdf` directly. Measurements are stored in
//! PostScript points, the unit the layout constants are defined in, and converted to millimetres
//! only when the table is turned into elements in [`crate::elements`]. Grid lines are stroked at
//! the PDF default width of one point.

use crate::data::LEDGER_HEADER;

/// Points per inch.
pub const POINTS_PER_INCH: f64 = 72.0;

/// Millimetres per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// Height of every table row, in points.
pub const ROW_HEIGHT_PT: f64 = 20.0;

/// Width of a ledger column, in points.
pub const LEDGER_COLUMN_WIDTH_PT: f64 = 100.0;

/// Width of a placeholder grid column, in points.
pub const PLACEHOLDER_COLUMN_WIDTH_PT: f64 = 50.0;

/// Font size of table cells.
pub const CELL_FONT_SIZE: u8 = 10;

/// Converts PostScript points to millimetres.
pub fn points_to_mm(points: f64) -> f64 {
    points * MM_PER_INCH / POINTS_PER_INCH
}

/// Plain RGB colour used by the table model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RgbColor(pub u8, pub u8, pub u8);

impl RgbColor {
    /// Black.
    pub const BLACK: Self = Self(0, 0, 0);
    /// Pure blue.
    pub const BLUE: Self = Self(0, 0, 255);
    /// Medium grey used for header backgrounds.
    pub const GREY: Self = Self(128, 128, 128);
    /// Off-white used for header text.
    pub const WHITE_SMOKE: Self = Self(245, 245, 245);
}

impl From<RgbColor> for genpdf::style::Color {
    fn from(color: RgbColor) -> Self {
        genpdf::style::Color::Rgb(color.0, color.1, color.2)
    }
}

/// Horizontal placement of cell text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HorizontalAlignment {
    /// Left aligned content.
    Left,
    /// Center aligned content.
    #[default]
    Center,
    /// Right aligned content.
    Right,
}

impl From<HorizontalAlignment> for genpdf::Alignment {
    fn from(alignment: HorizontalAlignment) -> Self {
        match alignment {
            HorizontalAlignment::Left => genpdf::Alignment::Left,
            HorizontalAlignment::Center => genpdf::Alignment::Center,
            HorizontalAlignment::Right => genpdf::Alignment::Right,
        }
    }
}

/// Styling of the first table row.
#[derive(Clone, Debug, PartialEq)]
pub struct HeaderStyle {
    /// Header captions, one per column.
    pub captions: Vec<String>,
    /// Fill colour behind the captions.
    pub background: RgbColor,
    /// Caption text colour.
    pub text: RgbColor,
}

/// Geometry and styling of a bordered table.
#[derive(Clone, Debug, PartialEq)]
pub struct TableSpec {
    column_widths_pt: Vec<f64>,
    row_height_pt: f64,
    header: Option<HeaderStyle>,
    grid_color: RgbColor,
    alignment: HorizontalAlignment,
    font_size: u8,
}

impl TableSpec {
    /// Creates a table with the given column widths (in points) and the default row height.
    pub fn new(column_widths_pt: impl Into<Vec<f64>>) -> Self {
        Self {
            column_widths_pt: column_widths_pt.into(),
            row_height_pt: ROW_HEIGHT_PT,
            header: None,
            grid_color: RgbColor::BLACK,
            alignment: HorizontalAlignment::Center,
            font_size: CELL_FONT_SIZE,
        }
    }

    /// Layout of the ledger page: three 100 pt columns, grey header with light text, black grid.
    pub fn ledger() -> Self {
        Self::new(vec![LEDGER_COLUMN_WIDTH_PT; LEDGER_HEADER.len()]).with_header(HeaderStyle {
            captions: LEDGER_HEADER.iter().map(|caption| caption.to_string()).collect(),
            background: RgbColor::GREY,
            text: RgbColor::WHITE_SMOKE,
        })
    }

    /// Layout of the placeholder page: `columns` 50 pt columns with a blue grid.
    pub fn placeholder(columns: usize) -> Self {
        Self::new(vec![PLACEHOLDER_COLUMN_WIDTH_PT; columns]).with_grid_color(RgbColor::BLUE)
    }

    /// Sets the header row and returns the updated spec.
    pub fn with_header(mut self, header: HeaderStyle) -> Self {
        self.header = Some(header);
        self
    }

    /// Sets the grid colour and returns the updated spec.
    pub fn with_grid_color(mut self, color: RgbColor) -> Self {
        self.grid_color = color;
        self
    }

    /// Sets the cell alignment and returns the updated spec.
    pub fn with_alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Column widths in points.
    pub fn column_widths_pt(&self) -> &[f64] {
        &self.column_widths_pt
    }

    /// Row height in points.
    pub fn row_height_pt(&self) -> f64 {
        self.row_height_pt
    }

    /// Header styling, if the table has a header row.
    pub fn header(&self) -> Option<&HeaderStyle> {
        self.header.as_ref()
    }

    /// Grid line colour.
    pub fn grid_color(&self) -> RgbColor {
        self.grid_color
    }

    /// Cell alignment.
    pub fn alignment(&self) -> HorizontalAlignment {
        self.alignment
    }

    /// Cell font size.
    pub fn font_size(&self) -> u8 {
        self.font_size
    }

    /// Total table width in points.
    pub fn width_pt(&self) -> f64 {
        self.column_widths_pt.iter().sum()
    }

    /// Total table height in points for `body_rows` data rows plus the header, if any.
    pub fn height_pt(&self, body_rows: usize) -> f64 {
        let header_rows = usize::from(self.header.is_some());
        self.row_height_pt * (body_rows + header_rows) as f64
    }

    /// Relative column weights as expected by `genpdf::elements::TableLayout`.
    ///
    /// Widths are kept to a tenth of a point.
    pub fn column_weights(&self) -> Vec<usize> {
        self.column_widths_pt
            .iter()
            .map(|width| (width * 10.0).round().max(1.0) as usize)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_layout_matches_page_constants() {
        let spec = TableSpec::ledger();
        assert_eq!(spec.width_pt(), 300.0);
        assert_eq!(spec.height_pt(30), 620.0);
        assert_eq!(spec.column_weights(), vec![1000, 1000, 1000]);
        let header = spec.header().expect("ledger has a header");
        assert_eq!(header.captions, ["Date", "Debit", "Credit"]);
        assert_eq!(header.background, RgbColor::GREY);
        assert_eq!(spec.grid_color(), RgbColor::BLACK);
    }

    #[test]
    fn placeholder_layout_has_blue_grid_and_no_header() {
        let spec = TableSpec::placeholder(10);
        assert_eq!(spec.width_pt(), 500.0);
        assert_eq!(spec.height_pt(20), 400.0);
        assert!(spec.header().is_none());
        assert_eq!(spec.grid_color(), RgbColor::BLUE);
        assert_eq!(spec.alignment(), HorizontalAlignment::Center);
    }

    #[test]
    fn one_inch_is_72_points() {
        assert!((points_to_mm(72.0) - 25.4).abs() < 1e-9);
    }
}
