use serde::{Deserialize, Serialize};

use super::filter::Filter;
use crate::observation::column::Column;

/// How the x values of a query are ordered.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Order {
    /// Numbers ascending, operations canonically, text lexically
    #[default]
    Natural,
    /// In the order of the first row carrying each value
    FirstSeen,
    /// By the mean of the metric over all matching rows, largest
    /// first
    MeanDescending,
    /// By the mean of the metric, smallest first
    MeanAscending,
    /// Only the given values, in the given order
    Explicit(Vec<String>),
}

/// What to do with a (series, x) cell without any contributing rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fill {
    /// No point
    #[default]
    Omit,
    /// A zero point flagged as gap, to keep bar groups aligned
    Zero,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// Numeric column to average
    pub metric: Column,
    /// One series per distinct value
    pub primary: Column,
    /// One point per distinct value; with None, each series has a
    /// single point at an empty label
    pub secondary: Option<Column>,
    pub filter: Filter,
    pub order: Order,
    /// Keep only the first x values after ordering
    pub limit: Option<usize>,
    /// Keep only x values for which every series has data
    pub complete_only: bool,
    /// Keep only x values for which at least this many series have
    /// data
    pub min_coverage: Option<usize>,
    pub fill: Fill,
}

impl Query {
    pub fn new(metric: Column) -> Self {
        Query {
            metric,
            primary: Column::Engine,
            secondary: None,
            filter: Filter::All,
            order: Order::Natural,
            limit: None,
            complete_only: false,
            min_coverage: None,
            fill: Fill::Omit,
        }
    }

    pub fn by(mut self, secondary: Column) -> Self {
        self.secondary = Some(secondary);
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = self.filter.and(filter);
        self
    }

    pub fn order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn complete_only(mut self) -> Self {
        self.complete_only = true;
        self
    }

    pub fn min_coverage(mut self, series: usize) -> Self {
        self.min_coverage = Some(series);
        self
    }

    pub fn zero_fill(mut self) -> Self {
        self.fill = Fill::Zero;
        self
    }

    /// The columns that must exist for this query to produce data.
    pub fn required_columns(&self) -> Vec<Column> {
        let mut columns = vec![self.metric, self.primary];
        columns.extend(self.secondary);
        columns
    }
}
