//! Tables (and individual rows) as a title row plus body rows of
//! strings with highlighting, independent of the output format.

use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// No unit, e.g. for key columns
    None,
    /// Ratios
    DimensionLess,
    /// E.g. "ops/s" or "μs"
    Named(&'static str),
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Highlight {
    /// No special formatting
    Neutral,
    /// "Bad"
    Red,
    /// "Good"
    Green,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnFormatting {
    /// Values are numbers: right-adjusted, and auto-width
    Number,
    /// Values are (potentially long) strings, left-adjusted
    String {
        /// In Excel widths. None == automatic.
        width_chars: Option<f64>,
    },
}

pub type ColumnHeader = (Cow<'static, str>, Unit, ColumnFormatting);

/// Placeholder for values that are not available.
pub const MISSING: &str = "-";

pub trait TableViewRow<Context> {
    /// Column names, units and formatting. Not a method since it must
    /// be available in the absence of rows; `ctx` carries anything
    /// decided at runtime (could be `()`).
    fn table_view_header(ctx: Context) -> Box<dyn AsRef<[ColumnHeader]>>;

    /// Append the cells of this row to `out`, matching the columns of
    /// `table_view_header`. Do *not* clear `out`.
    fn table_view_row(&self, out: &mut Vec<(Cow<'_, str>, Highlight)>);
}

/// A full table. dyn compatible.
pub trait TableView {
    fn table_name(&self) -> Cow<'_, str>;

    fn table_view_header(&self) -> Box<dyn AsRef<[ColumnHeader]>>;

    fn table_view_body<'s>(
        &'s self,
    ) -> Box<dyn Iterator<Item = Cow<'s, [(Cow<'s, str>, Highlight)]>> + 's>;
}

/// Single-line column title: "p99 (μs)".
pub fn column_title((label, unit, _): &ColumnHeader) -> String {
    match unit {
        Unit::None | Unit::DimensionLess => label.to_string(),
        Unit::Named(unit) => format!("{label} ({unit})"),
    }
}

/// All column titles of `table`, see `column_title`.
pub fn column_titles(table: &dyn TableView) -> Vec<String> {
    let header = table.table_view_header();
    (*header).as_ref().iter().map(column_title).collect()
}

/// A cell showing `value` via `format`, or `MISSING`.
pub fn optional_cell(value: Option<f64>, format: impl FnOnce(f64) -> String) -> Cow<'static, str> {
    match value {
        Some(v) => format(v).into(),
        None => MISSING.into(),
    }
}
