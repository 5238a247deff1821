//! Running the queries of figure specifications against a table,
//! deciding which panels and figures have enough data to be drawn.

use std::fmt::Display;

use super::spec::{FigureSpec, MetricSelection, PanelKind, PanelSpec};
use crate::{
    comparison::Comparison,
    extract::{
        ScatterSeries, extract, extract_profile, extract_ratio, extract_speedup,
        scatter_series,
        query::Query,
        series::SeriesSet,
    },
    observation::{column::Column, table::ObservationTable},
};

#[derive(Debug, Clone, PartialEq)]
pub enum PanelData {
    /// Bars, lines and speedups; a speedup has its single ratio
    /// series here
    Series(SeriesSet),
    Scatter(Vec<ScatterSeries>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    MissingColumns(Vec<Column>),
    NoData,
    TooFewXValues { have: usize, need: usize },
    TooFewSeries { have: usize, need: usize },
    NoComparison,
    /// A metric ratio in a speedup or scatter panel
    Unsupported,
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::MissingColumns(columns) => {
                let names: Vec<&str> = columns.iter().map(|c| c.name()).collect();
                write!(f, "missing column(s) {}", names.join(", "))
            }
            SkipReason::NoData => write!(f, "no data"),
            SkipReason::TooFewXValues { have, need } => {
                write!(f, "{have} distinct x value(s), need {need}")
            }
            SkipReason::TooFewSeries { have, need } => {
                write!(f, "{have} series, need {need}")
            }
            SkipReason::NoComparison => write!(f, "fewer than two engines to compare"),
            SkipReason::Unsupported => write!(f, "metric ratios can only be drawn as bars or lines"),
        }
    }
}

#[derive(Debug)]
pub struct ResolvedPanel<'s> {
    pub spec: &'s PanelSpec,
    pub data: PanelData,
}

#[derive(Debug)]
pub struct ResolvedFigure<'s> {
    pub spec: &'s FigureSpec,
    pub panels: Vec<ResolvedPanel<'s>>,
}

#[derive(Debug)]
pub enum Resolution<'s> {
    Ready(ResolvedFigure<'s>),
    Skipped {
        spec: &'s FigureSpec,
        /// Per panel title
        reasons: Vec<(&'s str, SkipReason)>,
    },
}

impl Resolution<'_> {
    pub fn name(&self) -> &str {
        match self {
            Resolution::Ready(figure) => &figure.spec.name,
            Resolution::Skipped { spec, .. } => &spec.name,
        }
    }
}

fn check_columns(table: &ObservationTable, columns: &[Column]) -> Result<(), SkipReason> {
    let missing: Vec<Column> = columns
        .iter()
        .copied()
        .filter(|c| !table.has(*c))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(SkipReason::MissingColumns(missing))
    }
}

fn check_counts(spec: &PanelSpec, x_values: usize, series: usize) -> Result<(), SkipReason> {
    if x_values == 0 || series == 0 {
        return Err(SkipReason::NoData);
    }
    if x_values < spec.min_x_values {
        return Err(SkipReason::TooFewXValues {
            have: x_values,
            need: spec.min_x_values,
        });
    }
    if series < spec.min_series {
        return Err(SkipReason::TooFewSeries {
            have: series,
            need: spec.min_series,
        });
    }
    Ok(())
}

fn check_set(spec: &PanelSpec, set: &SeriesSet) -> Result<(), SkipReason> {
    if set.is_empty() {
        return Err(SkipReason::NoData);
    }
    check_counts(spec, set.x_domain.len(), set.series.len())
}

pub fn resolve_panel(
    table: &ObservationTable,
    spec: &PanelSpec,
    comparison: Option<&Comparison>,
) -> Result<PanelData, SkipReason> {
    let query = spec.query().ok_or(SkipReason::NoData)?;
    let structural = {
        let mut columns = vec![query.primary];
        columns.extend(query.secondary);
        columns
    };
    check_columns(table, &structural)?;

    match (&spec.kind, &spec.metric) {
        (_, MetricSelection::Profile(metrics)) => {
            if !metrics.iter().any(|m| table.has(*m)) {
                return Err(SkipReason::MissingColumns(metrics.clone()));
            }
            let set = extract_profile(table, metrics, &query);
            check_set(spec, &set)?;
            Ok(PanelData::Series(set))
        }
        (PanelKind::Bars | PanelKind::Lines, MetricSelection::Single(metric)) => {
            check_columns(table, &[*metric])?;
            let set = extract(table, &query);
            check_set(spec, &set)?;
            Ok(PanelData::Series(set))
        }
        (
            PanelKind::Bars | PanelKind::Lines,
            MetricSelection::Ratio {
                numerator,
                denominator,
            },
        ) => {
            check_columns(table, &[*numerator, *denominator])?;
            let set = extract_ratio(table, *numerator, *denominator, &query);
            check_set(spec, &set)?;
            Ok(PanelData::Series(set))
        }
        (PanelKind::Speedup, MetricSelection::Single(metric)) => {
            check_columns(table, &[*metric])?;
            let comparison = comparison.ok_or(SkipReason::NoComparison)?;
            let ratio_set = extract_speedup(
                table,
                &query,
                comparison.subject.as_str(),
                comparison.baseline.as_str(),
            )
            .ok_or(SkipReason::NoComparison)?;
            check_set(spec, &ratio_set)?;
            Ok(PanelData::Series(ratio_set))
        }
        (PanelKind::Speedup | PanelKind::Scatter { .. }, MetricSelection::Ratio { .. }) => {
            Err(SkipReason::Unsupported)
        }
        (PanelKind::Scatter { x_metric }, MetricSelection::Single(metric)) => {
            check_columns(table, &[*x_metric, *metric])?;
            let xs = extract(
                table,
                &Query {
                    metric: *x_metric,
                    ..query.clone()
                },
            );
            let ys = extract(table, &query);
            let scatter = scatter_series(&xs, &ys);
            let max_points = scatter.iter().map(|s| s.points.len()).max().unwrap_or(0);
            check_counts(spec, max_points, scatter.len())?;
            Ok(PanelData::Scatter(scatter))
        }
    }
}

/// A figure is ready if at least one of its panels is.
pub fn resolve_figure<'s>(
    table: &ObservationTable,
    spec: &'s FigureSpec,
    comparison: Option<&Comparison>,
) -> Resolution<'s> {
    let mut panels = Vec::new();
    let mut reasons = Vec::new();
    for panel in &spec.panels {
        match resolve_panel(table, panel, comparison) {
            Ok(data) => panels.push(ResolvedPanel { spec: panel, data }),
            Err(reason) => reasons.push((panel.title.as_str(), reason)),
        }
    }
    if panels.is_empty() {
        Resolution::Skipped { spec, reasons }
    } else {
        Resolution::Ready(ResolvedFigure { spec, panels })
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use kstring::KString;

    use super::*;
    use crate::chart::spec::PanelSpec;

    const CSV: &str = "engine,operation,test_name,threads,ops_per_sec,avg_latency_us
a,PUT,t1,1,100,10
a,PUT,t2,2,200,5
b,PUT,t1,1,50,20
b,PUT,t1,1,150,20
";

    fn comparison() -> Comparison {
        Comparison {
            subject: KString::from_static("a"),
            baseline: KString::from_static("b"),
        }
    }

    #[test]
    fn t_skip_reasons() -> Result<()> {
        let table = ObservationTable::from_reader(CSV.as_bytes())?;
        let p99 = PanelSpec::bars("p99", Column::P99Us);
        assert_eq!(
            resolve_panel(&table, &p99, None),
            Err(SkipReason::MissingColumns(vec![Column::P99Us]))
        );
        let by_pattern = PanelSpec::bars("x", Column::OpsPerSec).x(Column::Pattern);
        assert_eq!(
            resolve_panel(&table, &by_pattern, None),
            Err(SkipReason::MissingColumns(vec![Column::Pattern]))
        );
        let sweep = PanelSpec::lines("s", Column::OpsPerSec, Column::Threads).min_x_values(3);
        assert_eq!(
            resolve_panel(&table, &sweep, None),
            Err(SkipReason::TooFewXValues { have: 2, need: 3 })
        );
        let speedup = PanelSpec::new(
            "s",
            PanelKind::Speedup,
            MetricSelection::Single(Column::OpsPerSec),
        )
        .x(Column::TestName);
        assert_eq!(
            resolve_panel(&table, &speedup, None),
            Err(SkipReason::NoComparison)
        );
        Ok(())
    }

    #[test]
    fn t_speedup_panel() -> Result<()> {
        let table = ObservationTable::from_reader(CSV.as_bytes())?;
        let speedup = PanelSpec::new(
            "s",
            PanelKind::Speedup,
            MetricSelection::Single(Column::OpsPerSec),
        )
        .x(Column::TestName);
        let Ok(PanelData::Series(set)) = resolve_panel(&table, &speedup, Some(&comparison()))
        else {
            panic!("expected series")
        };
        assert_eq!(set.x_labels(), ["t1"]);
        assert_eq!(set.series[0].ys(), [1.]);
        Ok(())
    }

    #[test]
    fn t_ratio_panel() -> Result<()> {
        let table = ObservationTable::from_reader(
            "engine,operation,ops_per_sec,peak_rss_mb,cpu_percent
a,PUT,1000,10,0
a,GET,500,0,50
b,PUT,600,20,100
"
            .as_bytes(),
        )?;
        let per_memory = PanelSpec::new(
            "m",
            PanelKind::Bars,
            MetricSelection::Ratio {
                numerator: Column::OpsPerSec,
                denominator: Column::PeakRssMb,
            },
        )
        .x(Column::Operation)
        .zero_fill();
        let Ok(PanelData::Series(set)) = resolve_panel(&table, &per_memory, None) else {
            panic!("expected series")
        };
        assert_eq!(set.x_labels(), ["PUT"]);
        assert_eq!(set.get("a").map(|s| s.ys()), Some(vec![100.]));
        assert_eq!(set.get("b").map(|s| s.ys()), Some(vec![30.]));

        let per_cpu = PanelSpec {
            metric: MetricSelection::Ratio {
                numerator: Column::OpsPerSec,
                denominator: Column::CpuPercent,
            },
            ..per_memory.clone()
        };
        let Ok(PanelData::Series(set)) = resolve_panel(&table, &per_cpu, None) else {
            panic!("expected series")
        };
        assert_eq!(set.x_labels(), ["PUT", "GET"]);
        assert_eq!(set.get("a").map(|s| s.ys()), Some(vec![10.]));

        let per_disk = PanelSpec {
            metric: MetricSelection::Ratio {
                numerator: Column::OpsPerSec,
                denominator: Column::DbSizeMb,
            },
            ..per_memory
        };
        assert_eq!(
            resolve_panel(&table, &per_disk, None),
            Err(SkipReason::MissingColumns(vec![Column::DbSizeMb]))
        );
        Ok(())
    }

    #[test]
    fn t_figure() -> Result<()> {
        let table = ObservationTable::from_reader(CSV.as_bytes())?;
        let figure = FigureSpec::new("f", "F")
            .panel(PanelSpec::bars("p99", Column::P99Us))
            .panel(
                PanelSpec::new(
                    "scatter",
                    PanelKind::Scatter {
                        x_metric: Column::OpsPerSec,
                    },
                    MetricSelection::Single(Column::AvgLatencyUs),
                )
                .x(Column::TestName),
            );
        match resolve_figure(&table, &figure, None) {
            Resolution::Ready(resolved) => {
                assert_eq!(resolved.panels.len(), 1);
                assert_eq!(resolved.panels[0].spec.title, "scatter");
                let PanelData::Scatter(scatter) = &resolved.panels[0].data else {
                    panic!("expected scatter")
                };
                assert_eq!(scatter[1].points, [(100., 20.)]);
            }
            Resolution::Skipped { .. } => panic!("expected ready"),
        }

        let only_p99 = FigureSpec::new("g", "G").panel(PanelSpec::bars("p99", Column::P99Us));
        let resolution = resolve_figure(&table, &only_p99, None);
        assert_eq!(resolution.name(), "g");
        assert!(matches!(resolution, Resolution::Skipped { .. }));
        Ok(())
    }
}
