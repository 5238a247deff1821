//! One run of the tool: load the table, decide and resolve the
//! figures, draw them, and write the summary table.

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use anyhow::{Result, bail};
use rayon::prelude::*;

use crate::{
    chart::{
        plan::default_plan,
        render::{ImageFormat, render_figure},
        resolve::{Resolution, ResolvedFigure, resolve_figure},
        spec::FigureSpec,
        table_image::table_image_write,
        theme::Theme,
    },
    comparison::Comparison,
    config_file::BenchgraphConfig,
    info,
    io_utils::div::xcreate_dir_all,
    observation::{column::Column, table::ObservationTable},
    summary::SpeedupSummary,
    tables::{
        csv_table_view::csv_file_write, excel_table_view::excel_file_write,
        latex_table_view::latex_file_write, table_view::TableView,
    },
    warn,
};

/// File name stem of the summary table outputs.
pub const SUMMARY_FILE_STEM: &str = "summary_table";

#[derive(Debug, Clone)]
pub struct RunOpts {
    pub csv: PathBuf,
    /// Default: see `default_out_dir`
    pub out_dir: Option<PathBuf>,
    pub config: BenchgraphConfig,
    /// Override the config file's choice
    pub subject: Option<String>,
    /// Override the config file's choice
    pub baseline: Option<String>,
    pub svg: bool,
    pub sequential: bool,
}

impl RunOpts {
    pub fn new(csv: impl Into<PathBuf>) -> Self {
        RunOpts {
            csv: csv.into(),
            out_dir: None,
            config: BenchgraphConfig::default(),
            subject: None,
            baseline: None,
            svg: false,
            sequential: false,
        }
    }

    pub fn formats(&self) -> Vec<ImageFormat> {
        if self.svg {
            vec![ImageFormat::Png, ImageFormat::Svg]
        } else {
            vec![ImageFormat::Png]
        }
    }

    pub fn out_dir(&self) -> PathBuf {
        self.out_dir
            .clone()
            .unwrap_or_else(|| default_out_dir(&self.csv))
    }
}

/// "graphs" next to the CSV file.
pub fn default_out_dir(csv: &Path) -> PathBuf {
    match csv.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join("graphs"),
        _ => PathBuf::from("graphs"),
    }
}

#[derive(Debug)]
pub struct RunReport {
    pub out_dir: PathBuf,
    pub written: Vec<PathBuf>,
    /// Figure names with the reason they were not drawn
    pub skipped: Vec<(String, String)>,
    /// Figure names with the rendering error
    pub failed: Vec<(String, String)>,
    pub summary: Option<SpeedupSummary>,
}

/// The figures from the config, or the default ones.
pub fn figure_plan(table: &ObservationTable, config: &BenchgraphConfig) -> Result<Vec<FigureSpec>> {
    let plan = match &config.figures {
        Some(figures) => figures.clone(),
        None => default_plan(table),
    };
    let mut names = BTreeSet::new();
    for figure in &plan {
        if !names.insert(figure.name.as_str()) {
            bail!("figure name {:?} is used more than once", figure.name)
        }
        figure.validate()?;
    }
    Ok(plan)
}

pub fn choose_comparison(table: &ObservationTable, opts: &RunOpts) -> Result<Option<Comparison>> {
    let engines = table.distinct_text(Column::Engine);
    let comparison = Comparison::choose(
        &engines,
        opts.subject.as_deref().or(opts.config.subject.as_deref()),
        opts.baseline.as_deref().or(opts.config.baseline.as_deref()),
    )?;
    match &comparison {
        Some(Comparison { subject, baseline }) => {
            info!("comparing {subject} against baseline {baseline}")
        }
        None => warn!(
            "fewer than two engines ({engines:?}), no speedup charts or summary table"
        ),
    }
    Ok(comparison)
}

fn describe_skip(resolution: &Resolution) -> Option<String> {
    match resolution {
        Resolution::Ready(_) => None,
        Resolution::Skipped { reasons, .. } => Some(
            reasons
                .iter()
                .map(|(panel, reason)| format!("{panel}: {reason}"))
                .collect::<Vec<_>>()
                .join("; "),
        ),
    }
}

fn draw_all(
    figures: &[&ResolvedFigure],
    theme: &Theme,
    formats: &[ImageFormat],
    out_dir: &Path,
    sequential: bool,
) -> Vec<(String, Result<Vec<PathBuf>>)> {
    let draw = |figure: &&ResolvedFigure| {
        (
            figure.spec.name.clone(),
            render_figure(figure, theme, formats, out_dir),
        )
    };
    if sequential {
        figures.iter().map(draw).collect()
    } else {
        figures.par_iter().map(draw).collect()
    }
}

/// Writes the CSV, LaTeX and Excel files, and the image of the
/// table. Failing to draw the image is only a warning.
pub fn write_summary(
    summary: &SpeedupSummary,
    theme: &Theme,
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let path = |ext: &str| out_dir.join(format!("{SUMMARY_FILE_STEM}.{ext}"));
    let mut written = Vec::new();

    let csv = path("csv");
    csv_file_write(summary, &csv)?;
    written.push(csv);

    let tex = path("tex");
    latex_file_write(summary, &tex)?;
    written.push(tex);

    let xlsx = path("xlsx");
    excel_file_write([summary as &dyn TableView], &xlsx)?;
    written.push(xlsx);

    let png = path("png");
    match table_image_write(summary, theme, &png) {
        Ok(()) => written.push(png),
        Err(e) => warn!("could not draw the summary table: {e:#}"),
    }

    for path in &written {
        info!("wrote {path:?}");
    }
    Ok(written)
}

pub fn run(opts: &RunOpts) -> Result<RunReport> {
    let table = ObservationTable::from_path(&opts.csv)?;
    for ignored in table.ignored_columns() {
        info!("ignoring unknown column {ignored:?}");
    }
    let out_dir = opts.out_dir();
    xcreate_dir_all(&out_dir)?;

    let comparison = choose_comparison(&table, opts)?;
    let plan = figure_plan(&table, &opts.config)?;
    let resolutions: Vec<Resolution> = plan
        .iter()
        .map(|figure| resolve_figure(&table, figure, comparison.as_ref()))
        .collect();

    let mut skipped = Vec::new();
    let mut ready = Vec::new();
    for resolution in &resolutions {
        match resolution {
            Resolution::Ready(figure) => ready.push(figure),
            Resolution::Skipped { .. } => {
                let reason = describe_skip(resolution).unwrap_or_default();
                warn!("skipping chart {:?}: {reason}", resolution.name());
                skipped.push((resolution.name().to_string(), reason));
            }
        }
    }

    let theme = &opts.config.theme;
    let mut written = Vec::new();
    let mut failed = Vec::new();
    for (name, result) in draw_all(&ready, theme, &opts.formats(), &out_dir, opts.sequential) {
        match result {
            Ok(paths) => written.extend(paths),
            Err(e) => {
                warn!("could not draw chart {name:?}: {e:#}");
                failed.push((name, format!("{e:#}")));
            }
        }
    }

    let summary = comparison
        .as_ref()
        .and_then(|comparison| SpeedupSummary::build(&table, comparison));
    match &summary {
        Some(summary) => written.extend(write_summary(summary, theme, &out_dir)?),
        None => {
            if comparison.is_some() {
                warn!("no summary table: missing operation or throughput data")
            }
        }
    }

    info!(
        "{} files written to {out_dir:?}, {} charts skipped, {} failed",
        written.len(),
        skipped.len(),
        failed.len()
    );
    Ok(RunReport {
        out_dir,
        written,
        skipped,
        failed,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::spec::PanelSpec;

    #[test]
    fn t_default_out_dir() {
        assert_eq!(
            default_out_dir(Path::new("/data/results.csv")),
            PathBuf::from("/data/graphs")
        );
        assert_eq!(default_out_dir(Path::new("results.csv")), PathBuf::from("graphs"));
    }

    #[test]
    fn t_duplicate_figure_names() -> Result<()> {
        let table = ObservationTable::from_reader("engine,ops_per_sec\na,1\n".as_bytes())?;
        let config = BenchgraphConfig {
            figures: Some(vec![
                FigureSpec::new("x", "X").panel(PanelSpec::bars("a", Column::OpsPerSec)),
                FigureSpec::new("x", "Y").panel(PanelSpec::bars("b", Column::OpsPerSec)),
            ]),
            ..BenchgraphConfig::default()
        };
        let err = figure_plan(&table, &config).expect_err("duplicate names");
        assert!(err.to_string().contains("more than once"));

        assert!(figure_plan(&table, &BenchgraphConfig::default())?.len() > 5);
        Ok(())
    }
}
