use std::{borrow::Cow, marker::PhantomData};

use super::table_view::{ColumnFormatting, ColumnHeader, Highlight, TableViewRow, Unit, optional_cell};
use crate::{chart::format::format_ratio, extract::guarded_ratio};

/// Ratios at or above this are highlighted as a change.
pub const UPPER_THRESHOLD: f64 = 1.1;
/// Ratios at or below this are highlighted as a change.
pub const LOWER_THRESHOLD: f64 = 0.9;

pub trait IsBetter {
    const FORMATTING_FOR_LARGER: Highlight;
    const FORMATTING_FOR_SMALLER: Highlight;
}

/// Throughput
#[derive(Debug)]
pub struct LargerIsBetter;
impl IsBetter for LargerIsBetter {
    const FORMATTING_FOR_LARGER: Highlight = Highlight::Green;
    const FORMATTING_FOR_SMALLER: Highlight = Highlight::Red;
}

/// The ratio of a subject's value to a baseline's value.
#[derive(Debug)]
pub struct Speedup<Better: IsBetter> {
    better: PhantomData<Better>,
    pub subject: Option<f64>,
    pub baseline: Option<f64>,
}

impl<Better: IsBetter> Speedup<Better> {
    pub fn new(subject: Option<f64>, baseline: Option<f64>) -> Self {
        Self {
            better: PhantomData,
            subject,
            baseline,
        }
    }

    /// None if either side is missing or the baseline is 0.
    pub fn ratio(&self) -> Option<f64> {
        guarded_ratio(self.subject?, self.baseline?)
    }

    pub fn highlight(&self) -> Highlight {
        match self.ratio() {
            Some(r) if r >= UPPER_THRESHOLD => Better::FORMATTING_FOR_LARGER,
            Some(r) if r <= LOWER_THRESHOLD => Better::FORMATTING_FOR_SMALLER,
            _ => Highlight::Neutral,
        }
    }
}

impl<Better: IsBetter> TableViewRow<&'static str> for Speedup<Better> {
    fn table_view_header(label: &'static str) -> Box<dyn AsRef<[ColumnHeader]>> {
        Box::new([(
            Cow::Borrowed(label),
            Unit::DimensionLess,
            ColumnFormatting::Number,
        )])
    }

    fn table_view_row(&self, out: &mut Vec<(Cow<'_, str>, Highlight)>) {
        out.push((optional_cell(self.ratio(), format_ratio), self.highlight()));
    }
}
