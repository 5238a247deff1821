//! The default set of figures for a benchmark result table.

use std::collections::BTreeSet;

use kstring::KString;

use super::spec::{FigureSpec, MetricSelection, PanelKind, PanelSpec};
use crate::{
    extract::{filter::Filter, query::Order},
    observation::{
        column::{Column, operation_rank},
        table::ObservationTable,
    },
    stats::StatsField,
};

/// Operations compared across engines, in display order.
pub const MAIN_OPERATIONS: &[&str] = &["PUT", "GET", "DELETE", "SEEK", "RANGE"];

pub const ITER_OPERATION: &str = "ITER";

const LATENCY_PROFILE: &[Column] = &[
    Column::MinUs,
    Column::P50Us,
    Column::P95Us,
    Column::P99Us,
    Column::MaxUs,
];

const RESOURCE_METRICS: &[Column] = &[
    Column::PeakRssMb,
    Column::PeakVmsMb,
    Column::DiskReadMb,
    Column::DiskWriteMb,
    Column::CpuUserSec,
    Column::CpuSysSec,
    Column::CpuPercent,
    Column::DbSizeMb,
    Column::DurationSec,
];

const AMPLIFICATION_METRICS: &[Column] = &[Column::WriteAmp, Column::ReadAmp, Column::SpaceAmp];

const SWEEP_PARAMETERS: &[Column] = &[
    Column::Threads,
    Column::BatchSize,
    Column::ValueSize,
    Column::KeySize,
];

/// Workloads that only fill the database for a following test.
pub const POPULATE_MARKER: &str = "_populate";

/// `text` as part of a file name: ASCII letters and digits in lower
/// case, everything else as '_'.
pub fn file_stem(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Appends "_2", "_3", ... to names already used by an earlier
/// figure.
fn make_names_unique(figures: &mut [FigureSpec]) {
    let mut used = BTreeSet::new();
    for figure in figures {
        let mut name = figure.name.clone();
        let mut i = 1;
        while used.contains(&name) {
            i += 1;
            name = format!("{}_{i}", figure.name);
        }
        used.insert(name.clone());
        figure.name = name;
    }
}

fn op_filter(op: &str) -> Filter {
    Filter::eq(Column::Operation, op)
}

fn not_iter() -> Filter {
    op_filter(ITER_OPERATION).not()
}

/// The operations present in the table in canonical order.
pub fn operations(table: &ObservationTable) -> Vec<KString> {
    let mut ops = table.distinct_text(Column::Operation);
    ops.sort_by(|a, b| {
        operation_rank(a.as_str())
            .cmp(&operation_rank(b.as_str()))
            .then_with(|| a.cmp(b))
    });
    ops
}

/// One panel per operation except ITER.
fn per_operation_panels(ops: &[KString], panel: impl Fn(&str) -> PanelSpec) -> Vec<PanelSpec> {
    ops.iter()
        .filter(|op| op.as_str() != ITER_OPERATION)
        .map(|op| panel(op.as_str()))
        .collect()
}

/// Those of `among` that are present, in the order of `among`.
fn main_ops<'t>(ops: &'t [KString], among: &'t [&'t str]) -> impl Iterator<Item = &'t str> + 't {
    among
        .iter()
        .copied()
        .filter(|op| ops.iter().any(|o| o.as_str() == *op))
}

pub fn default_plan(table: &ObservationTable) -> Vec<FigureSpec> {
    let ops = operations(table);
    let mut figures = Vec::new();

    figures.push(
        FigureSpec::new("throughput_overview", "Throughput by Workload").panels(
            per_operation_panels(&ops, |op| {
                PanelSpec::bars(format!("{op} Throughput"), Column::OpsPerSec)
                    .x(Column::TestName)
                    .filter(op_filter(op))
                    .order(Order::MeanDescending)
                    .limit(12)
                    .error_bars(StatsField::Ci95)
            }),
        ),
    );

    figures.push(
        FigureSpec::new("latency_overview", "Average Latency").panels(per_operation_panels(
            &ops,
            |op| {
                PanelSpec::bars(format!("{op} Avg Latency"), Column::AvgLatencyUs)
                    .filter(op_filter(op))
                    .log_y()
                    .error_bars(StatsField::SD)
                    .annotate()
            },
        )),
    );

    figures.push(
        FigureSpec::new("latency_percentiles", "Latency Percentiles").panels(
            per_operation_panels(&ops, |op| {
                PanelSpec::new(
                    format!("{op} Latency Percentiles"),
                    PanelKind::Bars,
                    MetricSelection::Profile(LATENCY_PROFILE.to_vec()),
                )
                .zero_fill()
                .filter(op_filter(op))
                .log_y()
                .y_label("Latency (μs)")
            }),
        ),
    );

    figures.push(
        FigureSpec::new("variability_cv", "Latency Variability").panels(per_operation_panels(
            &ops,
            |op| {
                PanelSpec::bars(format!("{op} CV"), Column::CvPercent)
                    .filter(op_filter(op))
                    .annotate()
            },
        )),
    );

    figures.push(
        FigureSpec::new("latency_stddev", "Latency Standard Deviation").panels(
            per_operation_panels(&ops, |op| {
                PanelSpec::bars(format!("{op} Latency Std Dev"), Column::StddevUs)
                    .filter(op_filter(op))
                    .log_y()
            }),
        ),
    );

    figures.push(
        FigureSpec::new("tail_latency", "Tail Latency (p99)").panel(
            PanelSpec::bars("p99 Latency by Operation", Column::P99Us)
                .x(Column::Operation)
                .filter(not_iter())
                .annotate(),
        ),
    );

    figures.push(
        FigureSpec::new("tail_latency_ratio", "Tail Latency (p99/p50)").panel(
            PanelSpec::new(
                "p99/p50 Ratio by Operation, Lower Is More Predictable",
                PanelKind::Bars,
                MetricSelection::Ratio {
                    numerator: Column::P99Us,
                    denominator: Column::P50Us,
                },
            )
            .zero_fill()
            .x(Column::Operation)
            .filter(not_iter())
            .x_label("Operation Type")
            .y_label("p99/p50 Ratio")
            .reference_line(2.)
            .annotate(),
        ),
    );

    figures.push(
        FigureSpec::new("efficiency", "Ops per Resource Unit").panels(
            [
                (Column::PeakRssMb, "Memory Efficiency", "Ops/sec per MB"),
                (Column::CpuPercent, "CPU Efficiency", "Ops/sec per CPU%"),
            ]
            .into_iter()
            .map(|(resource, title, unit)| {
                PanelSpec::new(
                    title,
                    PanelKind::Bars,
                    MetricSelection::Ratio {
                        numerator: Column::OpsPerSec,
                        denominator: resource,
                    },
                )
                .zero_fill()
                .x(Column::Operation)
                .y_label(unit)
            }),
        ),
    );

    figures.push(
        FigureSpec::new("resource_overview", "Resource Usage")
            .columns(3)
            .panels(RESOURCE_METRICS.iter().map(|metric| {
                PanelSpec::bars(metric.description(), *metric).error_bars(StatsField::SD)
            })),
    );

    figures.push(
        FigureSpec::new("amplification", "Amplification Factors")
            .columns(3)
            .panels(AMPLIFICATION_METRICS.iter().map(|metric| {
                PanelSpec::bars(metric.description(), *metric)
                    .reference_line(1.)
                    .annotate()
            })),
    );

    figures.push(
        FigureSpec::new("operation_mix", "Operation Mix Throughput")
            .columns(1)
            .panel(
                PanelSpec::bars("Throughput by Operation", Column::OpsPerSec)
                    .x(Column::Operation)
                    .filter(not_iter()),
            ),
    );

    figures.push(
        FigureSpec::new("engine_comparison", "Engine Comparison")
            .columns(1)
            .panel(
                PanelSpec::bars("Throughput Across Operations", Column::OpsPerSec)
                    .x(Column::Operation)
                    .order(Order::Explicit(
                        MAIN_OPERATIONS.iter().map(|s| s.to_string()).collect(),
                    ))
                    .error_bars(StatsField::Ci95)
                    .min_series(2),
            ),
    );

    figures.push(
        FigureSpec::new("speedup_ratios", "Speedup by Operation")
            .columns(1)
            .panel(
                PanelSpec::new(
                    "Throughput Speedup",
                    PanelKind::Speedup,
                    MetricSelection::Single(Column::OpsPerSec),
                )
                .x(Column::Operation)
                .order(Order::Explicit(
                    MAIN_OPERATIONS.iter().map(|s| s.to_string()).collect(),
                ))
                .reference_line(1.)
                .annotate(),
            ),
    );

    figures.push(
        FigureSpec::new("performance_summary", "Performance Summary")
            .columns(1)
            .panel(
                PanelSpec::new(
                    "Throughput Speedup, Ranked",
                    PanelKind::Speedup,
                    MetricSelection::Single(Column::OpsPerSec),
                )
                .x(Column::Operation)
                .order(Order::MeanDescending)
                .horizontal()
                .reference_line(1.)
                .annotate(),
            ),
    );

    figures.push(
        FigureSpec::new("speedup_by_workload", "Speedup by Workload")
            .columns(1)
            .panel(
                PanelSpec::new(
                    "Throughput Speedup per Workload",
                    PanelKind::Speedup,
                    MetricSelection::Single(Column::OpsPerSec),
                )
                .x(Column::TestName)
                .filter(Filter::contains(Column::TestName, POPULATE_MARKER).not())
                .filter(not_iter())
                .order(Order::FirstSeen)
                .horizontal()
                .reference_line(1.)
                .annotate(),
            ),
    );

    figures.push(
        FigureSpec::new("latency_vs_throughput", "Latency vs Throughput").panels(
            main_ops(&ops, MAIN_OPERATIONS).map(|op| {
                PanelSpec::new(
                    format!("{op} Latency vs Throughput"),
                    PanelKind::Scatter {
                        x_metric: Column::OpsPerSec,
                    },
                    MetricSelection::Single(Column::AvgLatencyUs),
                )
                .x(Column::TestName)
                .filter(op_filter(op))
                .log_x()
                .log_y()
            }),
        ),
    );

    for op in main_ops(&ops, &MAIN_OPERATIONS[..4]) {
        figures.push(
            FigureSpec::new(
                format!("pattern_{}", file_stem(op)),
                format!("{op} Throughput by Key Pattern"),
            )
            .columns(1)
            .panel(
                PanelSpec::bars(format!("{op} by Key Pattern"), Column::OpsPerSec)
                    .x(Column::Pattern)
                    .filter(op_filter(op))
                    .min_x_values(2),
            ),
        );
    }

    figures.push(
        FigureSpec::new("workload_comparison", "Performance by Workload Type")
            .columns(1)
            .panel(
                PanelSpec::bars("Throughput by Workload Type", Column::OpsPerSec)
                    .x(Column::Workload)
                    .min_x_values(2),
            ),
    );

    for op in main_ops(&ops, &MAIN_OPERATIONS[..3]) {
        figures.push(
            FigureSpec::new(
                format!("sync_{}", file_stem(op)),
                format!("{op} Sync Impact"),
            )
            .columns(1)
            .panel(
                PanelSpec::bars(format!("{op} Sync Off vs On"), Column::OpsPerSec)
                    .x(Column::SyncEnabled)
                    .filter(op_filter(op))
                    .min_x_values(2)
                    .annotate(),
            ),
        );
    }

    for op in main_ops(&ops, &MAIN_OPERATIONS[..2]) {
        figures.push(
            FigureSpec::new(
                format!("value_size_{}", file_stem(op)),
                format!("{op} Value Size Impact"),
            )
            .columns(1)
            .panel(
                PanelSpec::lines(
                    format!("{op} Throughput vs Value Size"),
                    Column::OpsPerSec,
                    Column::ValueSize,
                )
                .filter(op_filter(op))
                .log_x()
                .min_x_values(2),
            ),
        );
    }

    for op in main_ops(&ops, MAIN_OPERATIONS) {
        figures.push(
            FigureSpec::new(
                format!("per_test_{}", file_stem(op)),
                format!("{op} Per-Test Comparison"),
            )
            .columns(1)
            .panel(
                PanelSpec::bars(format!("{op} Throughput per Test"), Column::OpsPerSec)
                    .x(Column::TestName)
                    .filter(op_filter(op))
                    .min_coverage(2)
                    .limit(10)
                    .horizontal()
                    .min_series(2),
            ),
        );
    }

    figures.push(
        FigureSpec::new("iterator_throughput", "Iterator Throughput")
            .columns(1)
            .panel(
                PanelSpec::bars("Full Iteration Throughput", Column::OpsPerSec)
                    .x(Column::TestName)
                    .filter(op_filter(ITER_OPERATION))
                    .order(Order::FirstSeen)
                    .limit(15)
                    .horizontal(),
            ),
    );

    for op in ops.iter().filter(|op| op.as_str() != ITER_OPERATION) {
        let mut parameters = SWEEP_PARAMETERS.to_vec();
        if op.as_str() == "RANGE" {
            parameters.push(Column::RangeSize);
        }
        for parameter in parameters {
            figures.push(
                FigureSpec::new(
                    format!("sweep_{}_{}", file_stem(op), parameter.name()),
                    format!("{op} Throughput vs {}", parameter.description()),
                )
                .columns(1)
                .panel(
                    PanelSpec::lines(
                        format!("{op} Throughput vs {}", parameter.description()),
                        Column::OpsPerSec,
                        parameter,
                    )
                    .filter(op_filter(op))
                    .error_bars(StatsField::Ci95)
                    .min_x_values(2),
                ),
            );
        }
    }

    // Per-operation figures of a table without operations
    figures.retain(|figure| !figure.panels.is_empty());
    make_names_unique(&mut figures);
    figures
}
