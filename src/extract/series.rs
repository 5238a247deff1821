//! The result of a query: named series of points over a common,
//! ordered x domain.

use std::{cmp::Ordering, fmt::Display};

use kstring::KString;

use super::filter::text_equals;
use crate::{
    observation::column::{Column, operation_rank},
    stats::PointStats,
};

/// A value of the secondary grouping dimension.
#[derive(Debug, Clone)]
pub enum XValue {
    Number(f64),
    Label(KString),
}

impl XValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            XValue::Number(x) => Some(*x),
            XValue::Label(_) => None,
        }
    }

    /// Display text, with numbers formatted for `column`.
    pub fn label(&self, column: Option<Column>) -> String {
        match (self, column) {
            (XValue::Number(x), Some(column)) => column.format_number(*x),
            (XValue::Number(x), None) => x.to_string(),
            (XValue::Label(s), _) => s.to_string(),
        }
    }

    /// Whether `value`, as given by a user, denotes this x value.
    pub fn matches_str(&self, column: Option<Column>, value: &str) -> bool {
        match self {
            XValue::Number(x) => value.trim().parse::<f64>().ok() == Some(*x),
            XValue::Label(s) => match column {
                Some(column) => text_equals(column, s.as_str(), value),
                None => s.as_str() == value,
            },
        }
    }

    /// The natural order for an axis showing `column`: numbers
    /// ascending, operations in canonical order, other text
    /// lexically.
    pub fn natural_cmp(&self, other: &Self, column: Option<Column>) -> Ordering {
        match (self, other, column) {
            (XValue::Label(a), XValue::Label(b), Some(Column::Operation)) => operation_rank(a.as_str())
                .cmp(&operation_rank(b.as_str()))
                .then_with(|| a.cmp(b)),
            _ => self.cmp(other),
        }
    }
}

impl Display for XValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label(None))
    }
}

// Total order: numbers (by `total_cmp`) before labels.
impl Ord for XValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (XValue::Number(a), XValue::Number(b)) => a.total_cmp(b),
            (XValue::Number(_), XValue::Label(_)) => Ordering::Less,
            (XValue::Label(_), XValue::Number(_)) => Ordering::Greater,
            (XValue::Label(a), XValue::Label(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for XValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for XValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for XValue {}

#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub x: XValue,
    /// The mean for measured points, 0 for gaps
    pub y: f64,
    /// Present for points aggregated from rows
    pub stats: Option<PointStats>,
    /// Zero-filled placeholder for a cell without any data
    pub gap: bool,
}

impl Point {
    pub fn measured(x: XValue, stats: PointStats) -> Self {
        Point {
            x,
            y: stats.mean,
            stats: Some(stats),
            gap: false,
        }
    }

    /// A value computed from other points, e.g. a ratio.
    pub fn derived(x: XValue, y: f64) -> Self {
        Point {
            x,
            y,
            stats: None,
            gap: false,
        }
    }

    pub fn gap(x: XValue) -> Self {
        Point {
            x,
            y: 0.,
            stats: None,
            gap: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: KString,
    /// In the order of the x domain of the containing set
    pub points: Vec<Point>,
}

impl Series {
    /// Points that carry data, i.e. not zero-filled gaps.
    pub fn data_points(&self) -> impl Iterator<Item = &Point> {
        self.points.iter().filter(|p| !p.gap)
    }

    pub fn point_at(&self, x: &XValue) -> Option<&Point> {
        self.points.iter().find(|p| p.x == *x)
    }

    /// The y values of the data points.
    pub fn ys(&self) -> Vec<f64> {
        self.data_points().map(|p| p.y).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSet {
    pub metric: Column,
    pub primary: Column,
    pub secondary: Option<Column>,
    /// The ordered union of x values of all series
    pub x_domain: Vec<XValue>,
    /// One per distinct primary value with data, sorted by label
    pub series: Vec<Series>,
}

impl SeriesSet {
    pub fn new_empty(metric: Column, primary: Column, secondary: Option<Column>) -> Self {
        SeriesSet {
            metric,
            primary,
            secondary,
            x_domain: Vec::new(),
            series: Vec::new(),
        }
    }

    /// True if no series carries a single data point.
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.data_points().next().is_none())
    }

    pub fn get(&self, label: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.label.as_str() == label)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.label.as_str()).collect()
    }

    pub fn x_labels(&self) -> Vec<String> {
        self.x_domain
            .iter()
            .map(|x| x.label(self.secondary))
            .collect()
    }

    pub fn domain_index(&self, x: &XValue) -> Option<usize> {
        self.x_domain.iter().position(|d| d == x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_order() {
        let mut xs = vec![
            XValue::Label(KString::from_static("b")),
            XValue::Number(1000.),
            XValue::Label(KString::from_static("a")),
            XValue::Number(1.),
            XValue::Number(100.),
        ];
        xs.sort();
        assert_eq!(
            xs.iter().map(|x| x.to_string()).collect::<Vec<_>>(),
            ["1", "100", "1000", "a", "b"]
        );
    }

    #[test]
    fn t_operation_order() {
        let mut xs: Vec<XValue> = ["SEEK", "GET", "ITER", "PUT", "CUSTOM"]
            .into_iter()
            .map(|s| XValue::Label(KString::from_static(s)))
            .collect();
        xs.sort_by(|a, b| a.natural_cmp(b, Some(Column::Operation)));
        assert_eq!(
            xs.iter().map(|x| x.to_string()).collect::<Vec<_>>(),
            ["PUT", "GET", "SEEK", "ITER", "CUSTOM"]
        );
    }

    #[test]
    fn t_matches_str() {
        let put = XValue::Label(KString::from_static("PUT"));
        assert!(put.matches_str(Some(Column::Operation), "put"));
        assert!(!put.matches_str(Some(Column::TestName), "put"));
        assert!(XValue::Number(100.).matches_str(Some(Column::BatchSize), "100"));
    }
}
