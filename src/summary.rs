//! Per-operation comparison of two engines, as a table view.

use std::borrow::Cow;

use genawaiter::rc::Gen;
use kstring::KString;

use crate::{
    chart::format::format_thousands,
    comparison::Comparison,
    extract::{extract, filter::Filter, query::Query, series::SeriesSet},
    join::{KeyVal, keyval_outer_join_2},
    observation::{column::Column, table::ObservationTable},
    tables::{
        speedup::{LargerIsBetter, Speedup},
        table_view::{
            ColumnFormatting, ColumnHeader, Highlight, TableView, TableViewRow, Unit,
            optional_cell,
        },
    },
};

/// Latency metrics shown when their column is present.
pub const SUMMARY_LATENCIES: &[Column] = &[Column::AvgLatencyUs, Column::P99Us];

/// Which columns a summary has, decided from the data.
#[derive(Debug, Clone)]
pub struct SummaryColumns {
    pub comparison: Comparison,
    pub latencies: Vec<Column>,
}

#[derive(Debug)]
pub struct SummaryRow {
    pub throughput: Speedup<LargerIsBetter>,
    /// (subject, baseline) per latency in `SummaryColumns`
    pub latencies: Vec<(Option<f64>, Option<f64>)>,
}

fn format_latency(v: f64) -> String {
    format!("{v:.2}")
}

impl<'c> TableViewRow<&'c SummaryColumns> for SummaryRow {
    fn table_view_header(columns: &'c SummaryColumns) -> Box<dyn AsRef<[ColumnHeader]>> {
        let Comparison { subject, baseline } = &columns.comparison;
        let mut header: Vec<ColumnHeader> = vec![
            (
                format!("{subject} throughput").into(),
                Unit::Named("ops/s"),
                ColumnFormatting::Number,
            ),
            (
                format!("{baseline} throughput").into(),
                Unit::Named("ops/s"),
                ColumnFormatting::Number,
            ),
        ];
        header.extend(
            (*Speedup::<LargerIsBetter>::table_view_header("speedup"))
                .as_ref()
                .iter()
                .cloned(),
        );
        for column in &columns.latencies {
            for engine in [subject, baseline] {
                header.push((
                    format!("{engine} {}", column.short_label()).into(),
                    Unit::Named("μs"),
                    ColumnFormatting::Number,
                ));
            }
        }
        Box::new(header)
    }

    fn table_view_row(&self, out: &mut Vec<(Cow<'_, str>, Highlight)>) {
        for value in [self.throughput.subject, self.throughput.baseline] {
            out.push((optional_cell(value, format_thousands), Highlight::Neutral));
        }
        self.throughput.table_view_row(out);
        for (subject, baseline) in &self.latencies {
            for value in [subject, baseline] {
                out.push((optional_cell(*value, format_latency), Highlight::Neutral));
            }
        }
    }
}

#[derive(Debug)]
pub struct SpeedupSummary {
    pub columns: SummaryColumns,
    pub rows: Vec<KeyVal<KString, SummaryRow>>,
}

/// Mean `metric` of `engine` for operation `x` of `set`, if measured.
fn mean_at(set: &SeriesSet, engine: &str, operation: &KString) -> Option<f64> {
    let x = set.x_domain.iter().find(|x| x.matches_str(set.secondary, operation))?;
    let point = set.get(engine)?.point_at(x)?;
    (!point.gap).then_some(point.y)
}

/// Per-engine keyed means, keyed by position in `set.x_domain`.
fn keyed_means(set: &SeriesSet, engine: &str) -> Vec<KeyVal<usize, f64>> {
    let Some(series) = set.get(engine) else {
        return Vec::new();
    };
    let mut vals: Vec<KeyVal<usize, f64>> = series
        .data_points()
        .filter_map(|p| {
            Some(KeyVal {
                key: set.domain_index(&p.x)?,
                val: p.y,
            })
        })
        .collect();
    vals.sort_by_key(|kv| kv.key);
    vals
}

impl SpeedupSummary {
    /// None if the table has no operation or throughput data for the
    /// two engines.
    pub fn build(table: &ObservationTable, comparison: &Comparison) -> Option<Self> {
        let Comparison { subject, baseline } = comparison;
        let query = |metric: Column| {
            Query::new(metric).by(Column::Operation).filter(Filter::is_in(
                Column::Engine,
                [subject.as_str(), baseline.as_str()],
            ))
        };

        let throughput = extract(table, &query(Column::OpsPerSec));
        if throughput.is_empty() {
            return None;
        }
        let latencies: Vec<(Column, SeriesSet)> = SUMMARY_LATENCIES
            .iter()
            .filter(|c| table.has(**c))
            .map(|c| (*c, extract(table, &query(*c))))
            .collect();

        let rows = keyval_outer_join_2(
            keyed_means(&throughput, subject),
            keyed_means(&throughput, baseline),
        )
        .map(|KeyVal { key, val: (s, b) }| {
            let operation = KString::from_string(
                throughput.x_domain[key].label(throughput.secondary),
            );
            let latencies = latencies
                .iter()
                .map(|(_, set)| {
                    (
                        mean_at(set, subject, &operation),
                        mean_at(set, baseline, &operation),
                    )
                })
                .collect();
            KeyVal {
                key: operation,
                val: SummaryRow {
                    throughput: Speedup::new(s, b),
                    latencies,
                },
            }
        })
        .collect();

        Some(SpeedupSummary {
            columns: SummaryColumns {
                comparison: comparison.clone(),
                latencies: latencies.into_iter().map(|(c, _)| c).collect(),
            },
            rows,
        })
    }
}

impl TableView for SpeedupSummary {
    fn table_name(&self) -> Cow<'_, str> {
        "summary".into()
    }

    fn table_view_header(&self) -> Box<dyn AsRef<[ColumnHeader]>> {
        let mut header = vec![(
            Cow::Borrowed("operation"),
            Unit::None,
            ColumnFormatting::String {
                width_chars: Some(12.),
            },
        )];
        header.extend(
            (*SummaryRow::table_view_header(&self.columns))
                .as_ref()
                .iter()
                .cloned(),
        );
        Box::new(header)
    }

    fn table_view_body<'s>(
        &'s self,
    ) -> Box<dyn Iterator<Item = Cow<'s, [(Cow<'s, str>, Highlight)]>> + 's> {
        Box::new(
            Gen::new(|co| async move {
                for KeyVal { key, val } in &self.rows {
                    // A fresh Vec per row since it is moved out by
                    // yield.
                    let mut vals = vec![(Cow::Borrowed(key.as_str()), Highlight::Neutral)];
                    val.table_view_row(&mut vals);
                    co.yield_(vals.into()).await;
                }
            })
            .into_iter(),
        )
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;

    use super::*;

    const CSV: &str = "\
engine,operation,test_name,ops_per_sec,avg_latency_us
tidesdb,PUT,t1,200,5
tidesdb,PUT,t2,200,5
rocksdb,PUT,t1,100,10
tidesdb,GET,t1,50,2
rocksdb,GET,t1,0,3
rocksdb,DELETE,t1,80,4
";

    fn summary() -> Result<SpeedupSummary> {
        let table = ObservationTable::from_reader(CSV.as_bytes())?;
        let comparison = Comparison {
            subject: "tidesdb".into(),
            baseline: "rocksdb".into(),
        };
        SpeedupSummary::build(&table, &comparison).ok_or_else(|| anyhow::anyhow!("no summary"))
    }

    fn body(s: &SpeedupSummary) -> Vec<Vec<String>> {
        s.table_view_body()
            .map(|row| row.iter().map(|(v, _)| v.to_string()).collect())
            .collect()
    }

    #[test]
    fn t_rows() -> Result<()> {
        let s = summary()?;
        assert_eq!(s.columns.latencies, vec![Column::AvgLatencyUs]);
        assert_eq!(
            body(&s),
            vec![
                vec!["PUT", "200", "100", "2.00x", "5.00", "10.00"],
                vec!["GET", "50", "0", "-", "2.00", "3.00"],
                vec!["DELETE", "-", "80", "-", "-", "4.00"],
            ]
        );
        let header = s.table_view_header();
        let titles: Vec<&str> = (*header).as_ref().iter().map(|h| h.0.as_ref()).collect();
        assert_eq!(
            titles,
            [
                "operation",
                "tidesdb throughput",
                "rocksdb throughput",
                "speedup",
                "tidesdb avg",
                "rocksdb avg"
            ]
        );
        Ok(())
    }

    #[test]
    fn t_highlight() -> Result<()> {
        let s = summary()?;
        let first = s.table_view_body().next().ok_or_else(|| anyhow::anyhow!("no rows"))?;
        assert_eq!(first[3].1, Highlight::Green);
        Ok(())
    }
}
