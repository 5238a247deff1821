//! Aggregation of observation rows into chart-ready series.
//!
//! [`extract`] groups the rows matching a [`Query`] by the primary
//! dimension (one [`Series`] each) and the secondary dimension (one
//! [`Point`] each), averaging the metric per cell. Rows missing a
//! value for any column the query uses are left out of that query
//! only. Missing columns give an empty [`SeriesSet`], never an error.
//!
//! [`extract_ratio`] divides the means of two metrics per cell.
//! [`ratio_series`], [`extract_speedup`] and [`scatter_series`] derive
//! values from extracted sets.

pub mod filter;
pub mod query;
pub mod series;

use std::collections::{BTreeMap, BTreeSet};

use kstring::KString;

use crate::{
    debug,
    join::{KeyVal, keyval_inner_join_2},
    observation::{
        column::Column,
        table::{Cell, ObservationTable},
    },
    stats::PointStats,
};
use query::{Fill, Order, Query};
use series::{Point, Series, SeriesSet, XValue};

fn primary_label(table: &ObservationTable, column: Column, row: usize) -> Option<KString> {
    Some(match table.cell(column, row)? {
        Cell::Text(s) => KString::from_ref(s),
        Cell::Number(x) => KString::from_string(column.format_number(x)),
    })
}

fn x_value(table: &ObservationTable, column: Column, row: usize) -> Option<XValue> {
    Some(match table.cell(column, row)? {
        Cell::Text(s) => XValue::Label(KString::from_ref(s)),
        Cell::Number(x) => XValue::Number(x),
    })
}

/// The matching rows of one (series, x) cell.
struct Gathered {
    first_row: usize,
    values: Vec<f64>,
}

type Key = (KString, XValue);

/// Values of one x across all series, and the first row it was seen
/// in.
struct XCollect {
    first_row: usize,
    values: Vec<f64>,
}

impl XCollect {
    fn mean(&self) -> f64 {
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }
}

fn has_columns(table: &ObservationTable, columns: &[Column], what: Column) -> bool {
    match columns.iter().find(|column| !table.has(**column)) {
        Some(missing) => {
            debug!("query for {what}: column {missing} is absent");
            false
        }
        None => true,
    }
}

/// Values of `metric` of the rows matching `query`, per cell.
fn gather(table: &ObservationTable, query: &Query, metric: Column) -> BTreeMap<Key, Gathered> {
    let empty_label = XValue::Label(KString::from_static(""));
    let mut cells: BTreeMap<Key, Gathered> = BTreeMap::new();

    for row in 0..table.num_rows() {
        if !query.filter.matches(table, row) {
            continue;
        }
        let Some(y) = table.number(metric, row) else {
            continue;
        };
        let Some(primary) = primary_label(table, query.primary, row) else {
            continue;
        };
        let x = match query.secondary {
            Some(column) => match x_value(table, column, row) {
                Some(x) => x,
                None => continue,
            },
            None => empty_label.clone(),
        };
        cells
            .entry((primary, x))
            .or_insert_with(|| Gathered {
                first_row: row,
                values: Vec::new(),
            })
            .values
            .push(y);
    }
    cells
}

fn collect_x<'a>(xs: &'a mut BTreeMap<XValue, XCollect>, x: &XValue, first_row: usize) -> &'a mut XCollect {
    let collect = xs.entry(x.clone()).or_insert_with(|| XCollect {
        first_row,
        values: Vec::new(),
    });
    collect.first_row = collect.first_row.min(first_row);
    collect
}

fn ordered_domain(xs: &BTreeMap<XValue, XCollect>, query: &Query) -> Vec<XValue> {
    match &query.order {
        Order::Natural => {
            let mut domain: Vec<XValue> = xs.keys().cloned().collect();
            domain.sort_by(|a, b| a.natural_cmp(b, query.secondary));
            domain
        }
        Order::FirstSeen => {
            let mut domain: Vec<(usize, &XValue)> =
                xs.iter().map(|(x, c)| (c.first_row, x)).collect();
            domain.sort_by_key(|(row, _)| *row);
            domain.into_iter().map(|(_, x)| x.clone()).collect()
        }
        Order::MeanDescending | Order::MeanAscending => {
            let mut domain: Vec<(f64, &XValue)> = xs.iter().map(|(x, c)| (c.mean(), x)).collect();
            let descending = query.order == Order::MeanDescending;
            domain.sort_by(|(a_mean, a), (b_mean, b)| {
                let by_mean = if descending {
                    b_mean.total_cmp(a_mean)
                } else {
                    a_mean.total_cmp(b_mean)
                };
                by_mean.then_with(|| a.natural_cmp(b, query.secondary))
            });
            domain.into_iter().map(|(_, x)| x.clone()).collect()
        }
        Order::Explicit(values) => values
            .iter()
            .filter_map(|value| {
                xs.keys()
                    .find(|x| x.matches_str(query.secondary, value))
                    .cloned()
            })
            .collect(),
    }
}

/// Orders the x values, applies coverage, limit and fill, and puts
/// the points of `cells` into `set`.
fn assemble(
    mut set: SeriesSet,
    query: &Query,
    cells: BTreeMap<Key, Point>,
    xs: &BTreeMap<XValue, XCollect>,
) -> SeriesSet {
    let mut domain = ordered_domain(xs, query);
    let primaries: BTreeSet<&KString> = cells.keys().map(|(primary, _)| primary).collect();
    let coverage = |x: &XValue| {
        primaries
            .iter()
            .filter(|p| cells.contains_key(&((**p).clone(), x.clone())))
            .count()
    };

    if query.complete_only {
        domain.retain(|x| coverage(x) == primaries.len());
    }
    if let Some(min) = query.min_coverage {
        domain.retain(|x| coverage(x) >= min);
    }
    if let Some(limit) = query.limit {
        domain.truncate(limit);
    }

    for primary in &primaries {
        let points: Vec<Point> = domain
            .iter()
            .filter_map(|x| match cells.get(&((*primary).clone(), x.clone())) {
                Some(point) => Some(point.clone()),
                None => match query.fill {
                    Fill::Zero => Some(Point::gap(x.clone())),
                    Fill::Omit => None,
                },
            })
            .collect();
        if points.iter().any(|p| !p.gap) {
            set.series.push(Series {
                label: (*primary).clone(),
                points,
            });
        }
    }

    // Drop x values that only carry gaps, e.g. after `complete_only`
    // removed the series with data there.
    domain.retain(|x| {
        set.series
            .iter()
            .any(|s| s.point_at(x).is_some_and(|p| !p.gap))
    });
    for series in &mut set.series {
        series.points.retain(|p| domain.contains(&p.x));
    }
    set.x_domain = domain;
    set
}

pub fn extract(table: &ObservationTable, query: &Query) -> SeriesSet {
    let set = SeriesSet::new_empty(query.metric, query.primary, query.secondary);
    if !has_columns(table, &query.required_columns(), query.metric) {
        return set;
    }

    let mut xs: BTreeMap<XValue, XCollect> = BTreeMap::new();
    let mut cells: BTreeMap<Key, Point> = BTreeMap::new();
    for ((primary, x), gathered) in gather(table, query, query.metric) {
        collect_x(&mut xs, &x, gathered.first_row)
            .values
            .extend(&gathered.values);
        if let Ok(stats) = PointStats::from_values(&gathered.values) {
            cells.insert((primary, x.clone()), Point::measured(x, stats));
        }
    }
    assemble(set, query, cells, &xs)
}

/// Per cell, the mean of `numerator` over the mean of `denominator`,
/// e.g. p99 over p50 latency or throughput per MB of memory. Cells
/// lacking either metric, or whose ratio is undefined (see
/// `guarded_ratio`), get no point. Mean orders rank x values by the
/// mean of their ratios.
pub fn extract_ratio(
    table: &ObservationTable,
    numerator: Column,
    denominator: Column,
    query: &Query,
) -> SeriesSet {
    let set = SeriesSet::new_empty(numerator, query.primary, query.secondary);
    let mut columns = query.required_columns();
    columns.push(numerator);
    columns.push(denominator);
    if !has_columns(table, &columns, numerator) {
        return set;
    }

    let mean = |gathered: &Gathered| PointStats::from_values(&gathered.values).ok().map(|s| s.mean);
    let denominators = gather(table, query, denominator);
    let mut xs: BTreeMap<XValue, XCollect> = BTreeMap::new();
    let mut cells: BTreeMap<Key, Point> = BTreeMap::new();
    for (key, num) in gather(table, query, numerator) {
        let Some(den) = denominators.get(&key) else {
            continue;
        };
        let Some(ratio) = mean(&num)
            .zip(mean(den))
            .and_then(|(n, d)| guarded_ratio(n, d))
        else {
            continue;
        };
        let (primary, x) = key;
        collect_x(&mut xs, &x, num.first_row.min(den.first_row))
            .values
            .push(ratio);
        cells.insert((primary, x.clone()), Point::derived(x, ratio));
    }
    assemble(set, query, cells, &xs)
}

/// One point per metric column (labelled with the metric's short
/// label) for each series, e.g. a latency percentile profile. The
/// query's metric and secondary dimension are replaced per metric;
/// metrics absent from the table are left out.
pub fn extract_profile(table: &ObservationTable, metrics: &[Column], base: &Query) -> SeriesSet {
    let first_metric = metrics.first().copied().unwrap_or(base.metric);
    let mut set = SeriesSet::new_empty(first_metric, base.primary, None);

    let mut per_metric: Vec<(XValue, SeriesSet)> = Vec::new();
    for metric in metrics {
        let query = Query {
            metric: *metric,
            secondary: None,
            order: Order::Natural,
            limit: None,
            complete_only: false,
            min_coverage: None,
            fill: Fill::Omit,
            ..base.clone()
        };
        let sub = extract(table, &query);
        if !sub.is_empty() {
            per_metric.push((XValue::Label(KString::from_static(metric.short_label())), sub));
        }
    }

    let labels: BTreeSet<KString> = per_metric
        .iter()
        .flat_map(|(_, sub)| sub.series.iter().map(|s| s.label.clone()))
        .collect();

    for label in labels {
        let points: Vec<Point> = per_metric
            .iter()
            .filter_map(|(x, sub)| {
                match sub
                    .get(label.as_str())
                    .and_then(|s| s.data_points().next())
                {
                    Some(point) => Some(Point {
                        x: x.clone(),
                        ..point.clone()
                    }),
                    None => match base.fill {
                        Fill::Zero => Some(Point::gap(x.clone())),
                        Fill::Omit => None,
                    },
                }
            })
            .collect();
        set.series.push(Series { label, points });
    }
    set.x_domain = per_metric.into_iter().map(|(x, _)| x).collect();
    set
}

/// `numerator / denominator`, or None if the denominator is not a
/// finite positive number or the result is not finite.
pub fn guarded_ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if !(denominator.is_finite() && denominator > 0.) {
        return None;
    }
    let ratio = numerator / denominator;
    ratio.is_finite().then_some(ratio)
}

/// Per x value, the ratio of the means of two series of `set`, e.g.
/// the speedup of one engine over another. x values where either
/// side lacks data or the ratio is undefined get no point. None if
/// either series is missing from the set.
pub fn ratio_series(set: &SeriesSet, numerator: &str, denominator: &str) -> Option<Series> {
    let num = set.get(numerator)?;
    let den = set.get(denominator)?;

    let keyed = |series: &Series| -> Vec<KeyVal<usize, f64>> {
        series
            .data_points()
            .filter_map(|p| {
                Some(KeyVal {
                    key: set.domain_index(&p.x)?,
                    val: p.y,
                })
            })
            .collect()
    };

    let points = keyval_inner_join_2(keyed(num), keyed(den))
        .filter_map(|KeyVal { key, val: (n, d) }| {
            Some(Point::derived(
                set.x_domain[key].clone(),
                guarded_ratio(n, d)?,
            ))
        })
        .collect();

    Some(Series {
        label: KString::from_string(format!("{numerator}/{denominator}")),
        points,
    })
}

/// The ratio of two series of what `query` extracts, e.g. the speedup
/// of one engine over another, as a set of that single series. Mean
/// orders rank the x values by the ratio, and the limit applies after
/// ranking. None if either series is missing.
pub fn extract_speedup(
    table: &ObservationTable,
    query: &Query,
    numerator: &str,
    denominator: &str,
) -> Option<SeriesSet> {
    let by_ratio = matches!(query.order, Order::MeanDescending | Order::MeanAscending);
    let base = Query {
        order: if by_ratio {
            Order::Natural
        } else {
            query.order.clone()
        },
        limit: None,
        ..query.clone()
    };
    let set = extract(table, &base);
    let mut ratio = ratio_series(&set, numerator, denominator)?;
    if by_ratio {
        let descending = query.order == Order::MeanDescending;
        ratio.points.sort_by(|a, b| {
            let ord = a.y.total_cmp(&b.y);
            if descending { ord.reverse() } else { ord }
        });
    }
    if let Some(limit) = query.limit {
        ratio.points.truncate(limit);
    }
    Some(SeriesSet {
        x_domain: ratio.points.iter().map(|p| p.x.clone()).collect(),
        series: vec![ratio],
        ..set
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    pub label: KString,
    /// (mean of the x metric, mean of the y metric), ordered by the
    /// secondary value they were paired on
    pub points: Vec<(f64, f64)>,
}

/// Pair the means of two metrics extracted with the same dimensions,
/// per series and secondary value.
pub fn scatter_series(xs: &SeriesSet, ys: &SeriesSet) -> Vec<ScatterSeries> {
    fn sorted(series: &Series) -> Vec<KeyVal<&XValue, f64>> {
        let mut vals: Vec<_> = series
            .data_points()
            .map(|p| KeyVal { key: &p.x, val: p.y })
            .collect();
        vals.sort_by(|a, b| a.key.cmp(b.key));
        vals
    }

    ys.series
        .iter()
        .filter_map(|y_series| {
            let x_series = xs.get(y_series.label.as_str())?;
            let points: Vec<(f64, f64)> =
                keyval_inner_join_2(sorted(x_series), sorted(y_series))
                    .map(|KeyVal { key: _, val }| val)
                    .collect();
            (!points.is_empty()).then(|| ScatterSeries {
                label: y_series.label.clone(),
                points,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use anyhow::Result;

    use super::*;
    use crate::extract::filter::Filter;

    fn table(csv: &str) -> Result<ObservationTable> {
        Ok(ObservationTable::from_reader(csv.as_bytes())?)
    }

    fn ys(set: &SeriesSet, label: &str) -> Vec<f64> {
        set.get(label).map(|s| s.ys()).unwrap_or_default()
    }

    #[test]
    fn t_mean_of_repeats() -> Result<()> {
        let t = table(
            "engine,operation,test_name,ops_per_sec
A,PUT,t1,100
A,PUT,t1,300
B,PUT,t1,200
",
        )?;
        let set = extract(&t, &Query::new(Column::OpsPerSec).by(Column::TestName));
        assert_eq!(set.labels(), ["a", "b"]);
        assert_eq!(ys(&set, "a"), [200.]);
        assert_eq!(ys(&set, "b"), [200.]);
        let stats = set.series[0].points[0].stats.expect("measured");
        assert_eq!(stats.n, 2);
        assert!(stats.ci95().is_some());
        assert_eq!(set.series[1].points[0].stats.expect("measured").sd, None);
        Ok(())
    }

    #[test]
    fn t_missing_values_excluded() -> Result<()> {
        let t = table(
            "engine,test_name,ops_per_sec
a,t1,100
a,t1,
a,t1,n/a
,t1,5000
a,,7000
",
        )?;
        let set = extract(&t, &Query::new(Column::OpsPerSec).by(Column::TestName));
        assert_eq!(set.labels(), ["a"]);
        assert_eq!(ys(&set, "a"), [100.]);
        Ok(())
    }

    #[test]
    fn t_sweep_order() -> Result<()> {
        let t = table(
            "engine,batch_size,ops_per_sec
a,1000,3
a,1,1
a,100,2
",
        )?;
        let set = extract(&t, &Query::new(Column::OpsPerSec).by(Column::BatchSize));
        assert_eq!(set.x_labels(), ["1", "100", "1000"]);
        assert_eq!(ys(&set, "a"), [1., 2., 3.]);
        Ok(())
    }

    #[test]
    fn t_absent_columns() -> Result<()> {
        let t = table("engine,operation,ops_per_sec\na,PUT,1\n")?;
        assert!(extract(&t, &Query::new(Column::P99Us)).is_empty());
        assert!(extract(&t, &Query::new(Column::OpsPerSec).by(Column::Threads)).is_empty());
        assert!(
            extract(
                &t,
                &Query::new(Column::OpsPerSec).filter(Filter::eq(Column::Operation, "GET"))
            )
            .is_empty()
        );
        assert!(!extract(&t, &Query::new(Column::OpsPerSec)).is_empty());
        Ok(())
    }

    #[test]
    fn t_zero_fill() -> Result<()> {
        let t = table(
            "engine,test_name,ops_per_sec
a,t1,1
a,t2,2
b,t2,4
",
        )?;
        let omit = extract(&t, &Query::new(Column::OpsPerSec).by(Column::TestName));
        assert_eq!(omit.get("b").expect("present").points.len(), 1);

        let filled = extract(
            &t,
            &Query::new(Column::OpsPerSec)
                .by(Column::TestName)
                .zero_fill(),
        );
        let b = filled.get("b").expect("present");
        assert_eq!(b.points.len(), 2);
        assert!(b.points[0].gap);
        assert_eq!(b.points[0].y, 0.);
        assert_eq!(b.ys(), [4.]);

        let complete = extract(
            &t,
            &Query::new(Column::OpsPerSec)
                .by(Column::TestName)
                .complete_only(),
        );
        assert_eq!(complete.x_labels(), ["t2"]);
        Ok(())
    }

    #[test]
    fn t_orders() -> Result<()> {
        let t = table(
            "engine,test_name,ops_per_sec
a,zeta,1
a,alpha,3
b,mid,2
a,mid,2
",
        )?;
        let q = Query::new(Column::OpsPerSec).by(Column::TestName);
        assert_eq!(extract(&t, &q).x_labels(), ["alpha", "mid", "zeta"]);
        assert_eq!(
            extract(&t, &q.clone().order(Order::FirstSeen)).x_labels(),
            ["zeta", "alpha", "mid"]
        );
        assert_eq!(
            extract(&t, &q.clone().order(Order::MeanDescending).limit(2)).x_labels(),
            ["alpha", "mid"]
        );
        assert_eq!(
            extract(
                &t,
                &q.clone()
                    .order(Order::Explicit(vec!["mid".into(), "nope".into(), "zeta".into()]))
            )
            .x_labels(),
            ["mid", "zeta"]
        );
        Ok(())
    }

    #[test]
    fn t_operation_order() -> Result<()> {
        let t = table(
            "engine,operation,ops_per_sec
a,range,1
a,get,1
a,put,1
a,delete,1
",
        )?;
        let set = extract(&t, &Query::new(Column::OpsPerSec).by(Column::Operation));
        assert_eq!(set.x_labels(), ["PUT", "GET", "DELETE", "RANGE"]);
        Ok(())
    }

    #[test]
    fn t_idempotent() -> Result<()> {
        let t = table(
            "engine,test_name,ops_per_sec
a,t1,0.1
a,t1,0.2
a,t1,0.30000000000000004
b,t1,1e-9
",
        )?;
        let q = Query::new(Column::OpsPerSec).by(Column::TestName);
        let s1 = extract(&t, &q);
        let s2 = extract(&t, &q);
        assert_eq!(s1, s2);
        for (a, b) in s1.series.iter().zip(&s2.series) {
            for (p, q) in a.points.iter().zip(&b.points) {
                assert_eq!(p.y.to_bits(), q.y.to_bits());
            }
        }
        Ok(())
    }

    #[test]
    fn t_ratio() -> Result<()> {
        let t = table(
            "engine,operation,ops_per_sec
a,PUT,200
b,PUT,100
a,GET,50
b,GET,0
a,DELETE,10
",
        )?;
        let set = extract(&t, &Query::new(Column::OpsPerSec).by(Column::Operation));
        let ratio = ratio_series(&set, "a", "b").expect("both present");
        assert_eq!(ratio.label.as_str(), "a/b");
        assert_eq!(ratio.points.len(), 1);
        assert_eq!(ratio.points[0].x.to_string(), "PUT");
        assert_eq!(ratio.points[0].y, 2.0);
        assert!(ratio_series(&set, "a", "c").is_none());
        Ok(())
    }

    #[test]
    fn t_guarded_ratio() {
        assert_eq!(guarded_ratio(200., 100.), Some(2.));
        assert_eq!(guarded_ratio(0., 100.), Some(0.));
        assert_eq!(guarded_ratio(1., 0.), None);
        assert_eq!(guarded_ratio(1., -2.), None);
        assert_eq!(guarded_ratio(1., f64::NAN), None);
        assert_eq!(guarded_ratio(f64::INFINITY, 1.), None);
        assert_eq!(guarded_ratio(f64::MAX, f64::MIN_POSITIVE), None);
    }

    #[test]
    fn t_profile() -> Result<()> {
        let t = table(
            "engine,operation,p50_us,p99_us,min_us
a,PUT,10,100,1
a,PUT,20,300,
b,PUT,5,,
",
        )?;
        let set = extract_profile(
            &t,
            &[Column::MinUs, Column::P50Us, Column::P95Us, Column::P99Us],
            &Query::new(Column::P50Us).zero_fill(),
        );
        assert_eq!(set.x_labels(), ["min", "p50", "p99"]);
        assert_eq!(ys(&set, "a"), [1., 15., 200.]);
        let b = set.get("b").expect("present");
        assert_eq!(b.ys(), [5.]);
        assert_eq!(b.points.len(), 3);
        Ok(())
    }

    #[test]
    fn t_scatter() -> Result<()> {
        let t = table(
            "engine,test_name,ops_per_sec,avg_latency_us
a,t1,100,10
a,t2,200,
b,t1,50,20
",
        )?;
        let q = Query::new(Column::OpsPerSec).by(Column::TestName);
        let xs = extract(&t, &q);
        let ys = extract(
            &t,
            &Query {
                metric: Column::AvgLatencyUs,
                ..q
            },
        );
        let scatter = scatter_series(&xs, &ys);
        assert_eq!(scatter.len(), 2);
        assert_eq!(scatter[0].points, [(100., 10.)]);
        assert_eq!(scatter[1].points, [(50., 20.)]);
        Ok(())
    }

    #[test]
    fn t_metric_ratio() -> Result<()> {
        let t = table(
            "engine,operation,p50_us,p99_us
a,PUT,10,100
a,PUT,30,300
a,GET,0,50
a,DELETE,5,
b,PUT,20,40
b,GET,2,10
",
        )?;
        let q = Query::new(Column::P99Us).by(Column::Operation);
        let set = extract_ratio(&t, Column::P99Us, Column::P50Us, &q);
        assert_eq!(set.labels(), ["a", "b"]);
        assert_eq!(set.x_labels(), ["PUT", "GET"]);
        // zero p50 for a/GET, no p99 for a/DELETE
        assert_eq!(ys(&set, "a"), [10.]);
        assert_eq!(ys(&set, "b"), [2., 5.]);
        assert!(set.series.iter().flat_map(|s| s.ys()).all(|y| y.is_finite()));

        let filled = extract_ratio(&t, Column::P99Us, Column::P50Us, &q.clone().zero_fill());
        let a = filled.get("a").expect("present");
        assert_eq!(a.points.len(), 2);
        assert!(a.points[1].gap);

        let ranked = extract_ratio(
            &t,
            Column::P99Us,
            Column::P50Us,
            &q.clone().order(Order::MeanAscending),
        );
        assert_eq!(ranked.x_labels(), ["GET", "PUT"]);

        assert!(extract_ratio(&t, Column::OpsPerSec, Column::P50Us, &q).is_empty());
        Ok(())
    }

    #[test]
    fn t_min_coverage() -> Result<()> {
        let t = table(
            "engine,test_name,ops_per_sec
c,t3,1
a,t3,1
a,t1,1
b,t1,1
c,t2,1
a,t2,1
b,t2,1
c,t0,1
",
        )?;
        let q = Query::new(Column::OpsPerSec).by(Column::TestName);
        assert_eq!(
            extract(&t, &q.clone().min_coverage(2)).x_labels(),
            ["t1", "t2", "t3"]
        );
        assert_eq!(
            extract(&t, &q.clone().min_coverage(2).limit(2)).x_labels(),
            ["t1", "t2"]
        );
        assert_eq!(extract(&t, &q.clone().complete_only()).x_labels(), ["t2"]);
        Ok(())
    }

    #[test]
    fn t_speedup_ranked() -> Result<()> {
        let t = table(
            "engine,operation,ops_per_sec
a,PUT,300
b,PUT,100
a,GET,50
b,GET,100
a,DELETE,100
b,DELETE,100
a,SEEK,7
b,SEEK,0
",
        )?;
        let q = Query::new(Column::OpsPerSec).by(Column::Operation);
        let natural = extract_speedup(&t, &q, "a", "b").expect("both present");
        assert_eq!(natural.x_labels(), ["PUT", "GET", "DELETE"]);
        assert_eq!(natural.series[0].ys(), [3., 0.5, 1.]);

        let ranked = extract_speedup(&t, &q.clone().order(Order::MeanAscending), "a", "b")
            .expect("both present");
        assert_eq!(ranked.x_labels(), ["GET", "DELETE", "PUT"]);
        assert_eq!(ranked.series[0].ys(), [0.5, 1., 3.]);

        let top = extract_speedup(&t, &q.clone().order(Order::MeanDescending).limit(1), "a", "b")
            .expect("both present");
        assert_eq!(top.x_labels(), ["PUT"]);
        assert!(extract_speedup(&t, &q, "a", "c").is_none());
        Ok(())
    }
}
