//! Declarative description of the figures to produce. A figure is
//! one output file holding one or more panels; a panel is one chart
//! area showing the result of one query.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::{
    extract::{
        filter::Filter,
        query::{Fill, Order, Query},
    },
    observation::column::Column,
    stats::StatsField,
};

fn default_columns() -> usize {
    2
}

fn default_group_by() -> Column {
    Column::Engine
}

fn one() -> usize {
    1
}

fn is_false(b: &bool) -> bool {
    !*b
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FigureSpec {
    /// File name stem, must be unique within a plan
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Panels per row
    #[serde(default = "default_columns")]
    pub columns: usize,
    pub panels: Vec<PanelSpec>,
}

impl FigureSpec {
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        FigureSpec {
            name: name.into(),
            title: Some(title.into()),
            columns: default_columns(),
            panels: Vec::new(),
        }
    }

    pub fn panel(mut self, panel: PanelSpec) -> Self {
        self.panels.push(panel);
        self
    }

    pub fn panels(mut self, panels: impl IntoIterator<Item = PanelSpec>) -> Self {
        self.panels.extend(panels);
        self
    }

    /// Fails if the name is not a plain file name stem, if there are
    /// no panels, or if a panel plots a column that is not a
    /// measurement.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty()
            || !self
                .name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            bail!(
                "figure name {:?} must consist of ASCII letters, digits, '_' or '-'",
                self.name
            )
        }
        if self.panels.is_empty() {
            bail!("figure {:?} has no panels", self.name)
        }
        for panel in &self.panels {
            let mut metrics = match &panel.metric {
                MetricSelection::Single(column) => vec![*column],
                MetricSelection::Profile(columns) => columns.clone(),
                MetricSelection::Ratio {
                    numerator,
                    denominator,
                } => {
                    if !matches!(panel.kind, PanelKind::Bars | PanelKind::Lines) {
                        bail!(
                            "panel {:?} of figure {:?}: metric ratios are drawn as bars or lines",
                            panel.title,
                            self.name
                        )
                    }
                    vec![*numerator, *denominator]
                }
            };
            if let PanelKind::Scatter { x_metric } = &panel.kind {
                metrics.push(*x_metric);
            }
            if metrics.is_empty() {
                bail!(
                    "panel {:?} of figure {:?} has no metric",
                    panel.title,
                    self.name
                )
            }
            if let Some(column) = metrics.iter().find(|c| !c.is_metric()) {
                bail!(
                    "panel {:?} of figure {:?}: column {column} is not a measurement",
                    panel.title,
                    self.name
                )
            }
        }
        Ok(())
    }

    pub fn columns(mut self, columns: usize) -> Self {
        self.columns = columns;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelKind {
    /// Grouped bars, one group per x value and one bar per series
    Bars,
    /// One line per series over a numeric x axis
    Lines,
    /// Per series, the means of `x_metric` against those of the
    /// panel metric, paired per x value
    Scatter { x_metric: Column },
    /// Bars of the subject engine's mean over the baseline engine's
    /// mean, per x value
    Speedup,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricSelection {
    Single(Column),
    /// One x category per metric, e.g. a percentile profile
    Profile(Vec<Column>),
    /// Per cell, the mean of one metric over the mean of another
    Ratio {
        numerator: Column,
        denominator: Column,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Vertical,
    /// Categories on the y axis
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scale {
    #[default]
    Linear,
    Log,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PanelSpec {
    pub title: String,
    pub kind: PanelKind,
    pub metric: MetricSelection,
    /// The primary dimension, one series per value
    #[serde(default = "default_group_by")]
    pub group_by: Column,
    /// The secondary dimension, one point per value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<Column>,
    #[serde(default)]
    pub filter: Filter,
    #[serde(default)]
    pub order: Order,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub complete_only: bool,
    /// Keep only x values at which at least this many series have data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_coverage: Option<usize>,
    #[serde(default)]
    pub fill: Fill,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub x_scale: Scale,
    #[serde(default)]
    pub y_scale: Scale,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_label: Option<String>,
    /// Horizontal line at this value, e.g. 1 for ratios
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_line: Option<f64>,
    /// Draw mean ± this statistic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_bars: Option<StatsField>,
    /// Write values onto bars
    #[serde(default, skip_serializing_if = "is_false")]
    pub annotate: bool,
    /// Skip the panel if fewer distinct x values have data
    #[serde(default = "one")]
    pub min_x_values: usize,
    /// Skip the panel if fewer series have data
    #[serde(default = "one")]
    pub min_series: usize,
}

impl PanelSpec {
    pub fn new(title: impl Into<String>, kind: PanelKind, metric: MetricSelection) -> Self {
        PanelSpec {
            title: title.into(),
            kind,
            metric,
            group_by: default_group_by(),
            x: None,
            filter: Filter::All,
            order: Order::Natural,
            limit: None,
            complete_only: false,
            min_coverage: None,
            fill: Fill::Omit,
            orientation: Orientation::Vertical,
            x_scale: Scale::Linear,
            y_scale: Scale::Linear,
            x_label: None,
            y_label: None,
            reference_line: None,
            error_bars: None,
            annotate: false,
            min_x_values: 1,
            min_series: 1,
        }
    }

    pub fn bars(title: impl Into<String>, metric: Column) -> Self {
        Self::new(title, PanelKind::Bars, MetricSelection::Single(metric)).zero_fill()
    }

    pub fn lines(title: impl Into<String>, metric: Column, x: Column) -> Self {
        Self::new(title, PanelKind::Lines, MetricSelection::Single(metric)).x(x)
    }

    pub fn x(mut self, x: Column) -> Self {
        self.x = Some(x);
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

    pub fn horizontal(mut self) -> Self {
        self.orientation = Orientation::Horizontal;
        self
    }

    pub fn log_x(mut self) -> Self {
        self.x_scale = Scale::Log;
        self
    }

    pub fn log_y(mut self) -> Self {
        self.y_scale = Scale::Log;
        self
    }

    pub fn x_label(mut self, label: impl Into<String>) -> Self {
        self.x_label = Some(label.into());
        self
    }

    pub fn y_label(mut self, label: impl Into<String>) -> Self {
        self.y_label = Some(label.into());
        self
    }

    pub fn reference_line(mut self, at: f64) -> Self {
        self.reference_line = Some(at);
        self
    }

    pub fn error_bars(mut self, field: StatsField) -> Self {
        self.error_bars = Some(field);
        self
    }

    pub fn annotate(mut self) -> Self {
        self.annotate = true;
        self
    }

    pub fn min_x_values(mut self, n: usize) -> Self {
        self.min_x_values = n;
        self
    }

    pub fn min_series(mut self, n: usize) -> Self {
        self.min_series = n;
        self
    }

    /// The primary metric: the single one, the first of a profile,
    /// or the numerator of a ratio.
    pub fn main_metric(&self) -> Option<Column> {
        match &self.metric {
            MetricSelection::Single(column) => Some(*column),
            MetricSelection::Profile(columns) => columns.first().copied(),
            MetricSelection::Ratio { numerator, .. } => Some(*numerator),
        }
    }

    /// The extractor query for this panel's main metric.
    pub fn query(&self) -> Option<Query> {
        Some(Query {
            metric: self.main_metric()?,
            primary: self.group_by,
            secondary: self.x,
            filter: self.filter.clone(),
            order: self.order.clone(),
            limit: self.limit,
            complete_only: self.complete_only,
            min_coverage: self.min_coverage,
            fill: self.fill,
        })
    }

    /// Axis title for the values.
    pub fn value_label(&self) -> String {
        if let Some(label) = &self.y_label {
            return label.clone();
        }
        match (&self.kind, &self.metric) {
            (PanelKind::Speedup, _) => "Speedup".into(),
            (
                _,
                MetricSelection::Ratio {
                    numerator,
                    denominator,
                },
            ) => format!("{} / {}", numerator.short_label(), denominator.short_label()),
            _ => self
                .main_metric()
                .map(|metric| metric.description().into())
                .unwrap_or_default(),
        }
    }

    /// Axis title for the categories or x values.
    pub fn category_label(&self) -> String {
        if let Some(label) = &self.x_label {
            return label.clone();
        }
        match (&self.kind, &self.metric, self.x) {
            (PanelKind::Scatter { x_metric }, _, _) => x_metric.description().into(),
            (_, MetricSelection::Profile(_), _) => String::new(),
            (_, _, Some(x)) => x.description().into(),
            (_, _, None) => String::new(),
        }
    }
}
