use std::{fs, path::Path};

use anyhow::Result;
use approx::assert_relative_eq;
use benchgraph::{
    chart::{
        plan::default_plan,
        resolve::{Resolution, SkipReason, resolve_figure, resolve_panel},
        spec::PanelSpec,
    },
    comparison::Comparison,
    extract::{extract, query::Query, ratio_series},
    observation::{column::Column, table::ObservationTable},
    run::{RunOpts, run},
    summary::SpeedupSummary,
    tables::{
        csv_table_view::csv_file_write, excel_table_view::excel_file_write,
        latex_table_view::latex_file_write, table_view::TableView,
    },
};

const RESULTS: &str = "\
engine , operation, test_name, ops_per_sec, avg_latency_us, batch_size
TidesDB,put,t1,100,10,1000
TidesDB,put,t1,300,12,1
rocksdb,PUT,t1,200,15,100
tidesdb,GET,t2,400,2,1
rocksdb,GET,t2,100,4,1
";

fn table() -> Result<ObservationTable> {
    Ok(ObservationTable::from_reader(RESULTS.as_bytes())?)
}

fn comparison() -> Comparison {
    Comparison {
        subject: "tidesdb".into(),
        baseline: "rocksdb".into(),
    }
}

#[test]
fn t_mean_per_engine_and_test() -> Result<()> {
    let table = table()?;
    let set = extract(
        &table,
        &Query::new(Column::OpsPerSec)
            .by(Column::TestName)
            .filter(benchgraph::extract::filter::Filter::eq(Column::Operation, "PUT")),
    );
    assert_eq!(set.labels(), ["rocksdb", "tidesdb"]);
    assert_eq!(set.x_labels(), ["t1"]);
    let ys = |engine: &str| set.get(engine).map(|s| s.ys()).unwrap_or_default();
    assert_eq!(ys("tidesdb"), [200.]);
    assert_eq!(ys("rocksdb"), [200.]);
    Ok(())
}

#[test]
fn t_speedup() -> Result<()> {
    let table = table()?;
    let set = extract(&table, &Query::new(Column::OpsPerSec).by(Column::Operation));
    let ratio = ratio_series(&set, "tidesdb", "rocksdb").ok_or_else(|| anyhow::anyhow!("none"))?;
    assert_eq!(ratio.label.as_str(), "tidesdb/rocksdb");
    let ys = ratio.ys();
    assert_eq!(ys.len(), 2);
    assert_relative_eq!(ys[0], 1.0);
    assert_relative_eq!(ys[1], 4.0);
    Ok(())
}

#[test]
fn t_zero_baseline_excluded() -> Result<()> {
    let table = ObservationTable::from_reader(
        "engine,operation,ops_per_sec\na,PUT,200\nb,PUT,0\na,GET,50\nb,GET,25\n".as_bytes(),
    )?;
    let set = extract(&table, &Query::new(Column::OpsPerSec).by(Column::Operation));
    let ratio = ratio_series(&set, "a", "b").ok_or_else(|| anyhow::anyhow!("none"))?;
    assert_eq!(ratio.ys(), [2.0]);
    assert!(ratio.ys().iter().all(|y| y.is_finite()));
    Ok(())
}

#[test]
fn t_sweep_order_and_idempotence() -> Result<()> {
    let table = table()?;
    let query = Query::new(Column::OpsPerSec).by(Column::BatchSize);
    let set = extract(&table, &query);
    let xs: Vec<f64> = set.x_domain.iter().filter_map(|x| x.as_number()).collect();
    assert_eq!(xs, [1., 100., 1000.]);

    let again = extract(&table, &query);
    assert_eq!(set, again);
    let bits = |s: &benchgraph::extract::series::SeriesSet| -> Vec<u64> {
        s.series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.y.to_bits()))
            .collect()
    };
    assert_eq!(bits(&set), bits(&again));
    Ok(())
}

#[test]
fn t_missing_p99_only_skips_dependent_charts() -> Result<()> {
    let table = table()?;
    assert_eq!(
        resolve_panel(&table, &PanelSpec::bars("p99", Column::P99Us), None),
        Err(SkipReason::MissingColumns(vec![Column::P99Us]))
    );
    let plan = default_plan(&table);
    let comparison = comparison();
    let resolutions: Vec<Resolution> = plan
        .iter()
        .map(|f| resolve_figure(&table, f, Some(&comparison)))
        .collect();
    let state = |name: &str| {
        resolutions
            .iter()
            .find(|r| r.name() == name)
            .map(|r| matches!(r, Resolution::Ready(_)))
    };
    assert_eq!(state("tail_latency"), Some(false));
    assert_eq!(state("throughput_overview"), Some(true));
    assert_eq!(state("speedup_ratios"), Some(true));
    Ok(())
}

#[test]
fn t_summary_files() -> Result<()> {
    let table = table()?;
    let summary =
        SpeedupSummary::build(&table, &comparison()).ok_or_else(|| anyhow::anyhow!("none"))?;
    let dir = tempfile::tempdir()?;
    let path = |ext: &str| dir.path().join(format!("summary_table.{ext}"));

    csv_file_write(&summary, &path("csv"))?;
    assert_eq!(
        fs::read_to_string(path("csv"))?,
        "operation,tidesdb throughput (ops/s),rocksdb throughput (ops/s),speedup,\
         tidesdb avg (μs),rocksdb avg (μs)\n\
         PUT,200,200,1.00x,11.00,15.00\n\
         GET,400,100,4.00x,2.00,4.00\n"
    );

    latex_file_write(&summary, &path("tex"))?;
    let tex = fs::read_to_string(path("tex"))?;
    assert!(tex.starts_with("\\begin{tabular}{lrrrrr}\n\\toprule\n"));
    assert!(tex.contains("GET & 400 & 100 & \\textbf{4.00x} & 2.00 & 4.00 \\\\\n"));
    assert!(tex.ends_with("\\bottomrule\n\\end{tabular}\n"));

    excel_file_write([&summary as &dyn TableView], &path("xlsx"))?;
    assert!(fs::metadata(path("xlsx"))?.len() > 0);
    assert!(!path("xlsx.tmp").exists());
    Ok(())
}

#[test]
fn t_missing_input_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let opts = RunOpts::new(dir.path().join("nonexistent.csv"));
    let err = run(&opts).expect_err("must fail");
    assert!(format!("{err:#}").contains("does not exist"));
}

#[test]
fn t_missing_engine_column() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let csv = dir.path().join("results.csv");
    fs::write(&csv, "operation,ops_per_sec\nPUT,1\n")?;
    let opts = RunOpts::new(&csv);
    assert!(run(&opts).is_err());
    assert!(!dir.path().join("graphs").exists());
    Ok(())
}

fn write_results(dir: &Path) -> Result<std::path::PathBuf> {
    let csv = dir.join("results.csv");
    fs::write(&csv, RESULTS)?;
    Ok(csv)
}

/// Holds with or without fonts: a chart that cannot be drawn is
/// reported and leaves no file behind.
#[test]
fn t_run_accounts_for_every_figure() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let csv = write_results(dir.path())?;
    let mut opts = RunOpts::new(&csv);
    opts.sequential = true;
    let report = run(&opts)?;
    assert_eq!(report.out_dir, dir.path().join("graphs"));

    for ext in ["csv", "tex", "xlsx"] {
        let path = report.out_dir.join(format!("summary_table.{ext}"));
        assert!(path.exists(), "{path:?}");
        assert!(report.written.contains(&path));
    }
    assert!(report.summary.is_some());

    let skipped: Vec<&str> = report.skipped.iter().map(|(n, _)| n.as_str()).collect();
    for name in ["tail_latency", "tail_latency_ratio", "efficiency"] {
        assert!(skipped.contains(&name), "{name}");
    }

    let plan = default_plan(&ObservationTable::from_path(&csv)?);
    for figure in &plan {
        let name = figure.name.as_str();
        let written = report
            .written
            .iter()
            .any(|p| p.ends_with(format!("{name}.png")));
        let failed = report.failed.iter().any(|(n, _)| n == name);
        let outcomes = [written, failed, skipped.contains(&name)];
        assert_eq!(outcomes.iter().filter(|b| **b).count(), 1, "{name}");
        if failed {
            assert!(!report.out_dir.join(format!("{name}.png")).exists());
        }
    }
    for entry in fs::read_dir(&report.out_dir)? {
        let name = entry?.file_name();
        assert!(!name.to_string_lossy().contains(".tmp"), "{name:?}");
    }
    Ok(())
}

#[test]
#[ignore = "draws charts, needs system fonts"]
fn t_run() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let csv = write_results(dir.path())?;
    let mut opts = RunOpts::new(&csv);
    opts.svg = true;
    let report = run(&opts)?;
    assert_eq!(report.out_dir, dir.path().join("graphs"));
    assert!(report.failed.is_empty(), "{:?}", report.failed);
    for name in [
        "throughput_overview.png",
        "throughput_overview.svg",
        "speedup_ratios.png",
        "summary_table.csv",
        "summary_table.png",
    ] {
        assert!(report.out_dir.join(name).exists(), "{name}");
    }
    assert!(report.skipped.iter().any(|(name, _)| name == "tail_latency"));
    Ok(())
}
