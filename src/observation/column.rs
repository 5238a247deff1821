//! The columns of a benchmark result file that this crate knows
//! about, with their storage type and a human-readable description.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Identifiers and categorical values, stored as strings
    Text,
    /// Workload parameters and measurements, stored as `f64`
    Number,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Display,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Column {
    // Identity and categorical
    Engine,
    Operation,
    TestName,
    Workload,
    Pattern,

    // Workload parameters
    NumOperations,
    Threads,
    BatchSize,
    KeySize,
    ValueSize,
    RangeSize,
    SyncEnabled,

    // Measurements
    OpsPerSec,
    DurationSec,
    AvgLatencyUs,
    StddevUs,
    CvPercent,
    P50Us,
    P95Us,
    P99Us,
    MinUs,
    MaxUs,
    PeakRssMb,
    PeakVmsMb,
    DiskReadMb,
    DiskWriteMb,
    CpuUserSec,
    CpuSysSec,
    CpuPercent,
    DbSizeMb,
    WriteAmp,
    ReadAmp,
    SpaceAmp,
}

/// The columns whose raw text is joined to derive `test_name` when
/// the input does not carry one, in this order.
pub const TEST_NAME_PARTS: &[Column] = &[
    Column::Workload,
    Column::Pattern,
    Column::Operation,
    Column::NumOperations,
    Column::Threads,
    Column::BatchSize,
    Column::KeySize,
    Column::ValueSize,
    Column::RangeSize,
    Column::SyncEnabled,
];

impl Column {
    pub fn name(self) -> &'static str {
        self.into()
    }

    pub fn kind(self) -> ColumnKind {
        use Column::*;
        match self {
            Engine | Operation | TestName | Workload | Pattern => ColumnKind::Text,
            _ => ColumnKind::Number,
        }
    }

    /// Workload parameters that are varied in parameter sweeps. As
    /// x axis, these order by numeric value.
    pub fn is_parameter(self) -> bool {
        use Column::*;
        matches!(
            self,
            NumOperations | Threads | BatchSize | KeySize | ValueSize | RangeSize | SyncEnabled
        )
    }

    pub fn is_metric(self) -> bool {
        self.kind() == ColumnKind::Number && !self.is_parameter()
    }

    /// Axis or column title.
    pub fn description(self) -> &'static str {
        use Column::*;
        match self {
            Engine => "Engine",
            Operation => "Operation",
            TestName => "Workload",
            Workload => "Workload Type",
            Pattern => "Key Pattern",
            NumOperations => "Operations",
            Threads => "Threads",
            BatchSize => "Batch Size",
            KeySize => "Key Size (bytes)",
            ValueSize => "Value Size (bytes)",
            RangeSize => "Range Size",
            SyncEnabled => "Sync",
            OpsPerSec => "Throughput (ops/sec)",
            DurationSec => "Duration (sec)",
            AvgLatencyUs => "Avg Latency (μs)",
            StddevUs => "Latency Std Dev (μs)",
            CvPercent => "Coefficient of Variation (%)",
            P50Us => "p50 Latency (μs)",
            P95Us => "p95 Latency (μs)",
            P99Us => "p99 Latency (μs)",
            MinUs => "Min Latency (μs)",
            MaxUs => "Max Latency (μs)",
            PeakRssMb => "Peak RSS (MB)",
            PeakVmsMb => "Peak VMS (MB)",
            DiskReadMb => "Disk Read (MB)",
            DiskWriteMb => "Disk Write (MB)",
            CpuUserSec => "CPU User (sec)",
            CpuSysSec => "CPU System (sec)",
            CpuPercent => "CPU Utilization (%)",
            DbSizeMb => "Database Size (MB)",
            WriteAmp => "Write Amplification",
            ReadAmp => "Read Amplification",
            SpaceAmp => "Space Amplification",
        }
    }

    /// Short label, e.g. for the categories of a percentile profile.
    pub fn short_label(self) -> &'static str {
        use Column::*;
        match self {
            P50Us => "p50",
            P95Us => "p95",
            P99Us => "p99",
            MinUs => "min",
            MaxUs => "max",
            AvgLatencyUs => "avg",
            WriteAmp => "write",
            ReadAmp => "read",
            SpaceAmp => "space",
            _ => self.name(),
        }
    }

    /// Text for a numeric value of this column when used as category
    /// label.
    pub fn format_number(self, value: f64) -> String {
        match self {
            Column::SyncEnabled => {
                if value != 0.0 {
                    "Sync On".into()
                } else {
                    "Sync Off".into()
                }
            }
            _ => {
                if value.fract() == 0.0 && value.abs() < 1e15 {
                    format!("{}", value as i64)
                } else {
                    format!("{value}")
                }
            }
        }
    }
}

/// Canonical rank of known operations, unknown ones sort after these.
pub fn operation_rank(operation: &str) -> usize {
    const ORDER: &[&str] = &["PUT", "GET", "DELETE", "SEEK", "RANGE", "ITER"];
    ORDER
        .iter()
        .position(|op| *op == operation)
        .unwrap_or(ORDER.len())
}
