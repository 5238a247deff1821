//! Row predicates for queries.

use serde::{Deserialize, Serialize};

use crate::observation::{
    column::Column,
    table::{Cell, ObservationTable, parse_number},
};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    /// Every row matches
    #[default]
    All,
    /// The cell equals the value. Engine and operation compare
    /// case-insensitively, numeric columns by numeric value.
    Eq { column: Column, value: String },
    /// The cell equals one of the values
    In { column: Column, values: Vec<String> },
    /// The text cell contains the given substring
    Contains { column: Column, needle: String },
    Not(Box<Filter>),
    And(Vec<Filter>),
}

impl Filter {
    pub fn eq(column: Column, value: impl Into<String>) -> Self {
        Filter::Eq {
            column,
            value: value.into(),
        }
    }

    pub fn is_in<S: Into<String>>(column: Column, values: impl IntoIterator<Item = S>) -> Self {
        Filter::In {
            column,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(column: Column, needle: impl Into<String>) -> Self {
        Filter::Contains {
            column,
            needle: needle.into(),
        }
    }

    // Not `std::ops::Not`, to keep construction chains readable.
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Filter::Not(Box::new(self))
    }

    /// Conjunction, flattening `All` away.
    pub fn and(self, other: Filter) -> Self {
        match (self, other) {
            (Filter::All, f) | (f, Filter::All) => f,
            (Filter::And(mut fs), Filter::And(gs)) => {
                fs.extend(gs);
                Filter::And(fs)
            }
            (Filter::And(mut fs), g) => {
                fs.push(g);
                Filter::And(fs)
            }
            (f, g) => Filter::And(vec![f, g]),
        }
    }

    /// Rows whose cell for a referenced column is missing do not
    /// match `Eq`, `In` or `Contains`.
    pub fn matches(&self, table: &ObservationTable, row: usize) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq { column, value } => cell_equals(table, *column, row, value),
            Filter::In { column, values } => values
                .iter()
                .any(|value| cell_equals(table, *column, row, value)),
            Filter::Contains { column, needle } => table
                .text(*column, row)
                .is_some_and(|s| s.contains(needle.as_str())),
            Filter::Not(filter) => !filter.matches(table, row),
            Filter::And(filters) => filters.iter().all(|f| f.matches(table, row)),
        }
    }
}

/// Whether a normalized text cell value of `column` equals `value`
/// as given by a user.
pub fn text_equals(column: Column, cell: &str, value: &str) -> bool {
    let value = value.trim();
    match column {
        Column::Engine | Column::Operation => cell.eq_ignore_ascii_case(value),
        _ => cell == value,
    }
}

fn cell_equals(table: &ObservationTable, column: Column, row: usize, value: &str) -> bool {
    match table.cell(column, row) {
        None => false,
        Some(Cell::Text(s)) => text_equals(column, s, value),
        Some(Cell::Number(x)) => parse_number(column, value) == Some(x),
    }
}
