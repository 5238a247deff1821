use std::{
    io::{IsTerminal, Write, stdout},
    path::PathBuf,
};

use anyhow::{Context, Result, anyhow};
use benchgraph::{
    chart::plan::default_plan,
    clap_styles::clap_styles,
    config_file::BenchgraphConfig,
    get_terminal_width::get_terminal_width,
    info,
    observation::table::ObservationTable,
    run::{RunOpts, run},
    tables::terminal_table::TerminalTable,
    utillib::logging::{LogLevel, LogLevelOpts, set_log_level},
};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum ColorChoice {
    /// Colour if stdout is a terminal
    Auto,
    Always,
    Never,
}

#[derive(clap::Parser, Debug)]
#[command(
    next_line_help = true,
    styles = clap_styles(),
    term_width = get_terminal_width(4),
    version,
)]
/// Draw charts and a summary table from storage engine benchmark
/// results in CSV format.
struct Opts {
    #[clap(flatten)]
    log_level: LogLevelOpts,

    /// Path to a config file (.json5, .json, .yml, .yaml or .hcl)
    /// that can set the theme, subject and baseline engines, and
    /// replace the list of figures
    #[clap(long)]
    config: Option<PathBuf>,

    /// Also write each chart as SVG
    #[clap(long)]
    svg: bool,

    /// The engine whose speedup over the baseline is shown (default:
    /// the first engine other than the baseline)
    #[clap(long)]
    subject: Option<String>,

    /// The engine that speedups are relative to (default: rocksdb
    /// if present, else the first engine)
    #[clap(long)]
    baseline: Option<String>,

    /// Print the summary table to stdout
    #[clap(long)]
    print_summary: bool,

    /// With `--print-summary`: print tab-separated values instead of
    /// padded columns
    #[clap(long)]
    tsv: bool,

    /// Whether to colour the printed summary table
    #[clap(long, value_enum, default_value = "auto")]
    color: ColorChoice,

    /// Draw the charts one after the other instead of in parallel
    #[clap(long)]
    sequential: bool,

    /// Print the figure list that would be drawn for the given CSV
    /// file (as JSON, usable as the `figures` entry of a config
    /// file) and exit
    #[clap(long)]
    dump_plan: bool,

    /// The benchmark results file
    csv: PathBuf,

    /// Where to write the charts (default: `graphs/` next to the CSV
    /// file)
    out_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let Opts {
        log_level,
        config,
        svg,
        subject,
        baseline,
        print_summary,
        tsv,
        color,
        sequential,
        dump_plan,
        csv,
        out_dir,
    } = clap::Parser::parse();

    set_log_level(LogLevel::try_from(log_level)?);

    let config = match &config {
        Some(path) => BenchgraphConfig::load(path)?,
        None => BenchgraphConfig::default(),
    };

    if dump_plan {
        let plan = match &config.figures {
            Some(figures) => figures.clone(),
            None => default_plan(&ObservationTable::from_path(&csv)?),
        };
        let mut out = stdout().lock();
        serde_json::to_writer_pretty(&mut out, &plan)
            .with_context(|| anyhow!("serializing the figure list"))?;
        writeln!(out)?;
        return Ok(());
    }

    let opts = RunOpts {
        csv,
        out_dir,
        config,
        subject,
        baseline,
        svg,
        sequential,
    };
    let report = run(&opts)?;

    if print_summary {
        match &report.summary {
            Some(summary) => {
                match color {
                    ColorChoice::Always => yansi::enable(),
                    ColorChoice::Never => yansi::disable(),
                    ColorChoice::Auto => {
                        if stdout().is_terminal() {
                            yansi::enable()
                        } else {
                            yansi::disable()
                        }
                    }
                }
                let mut out = stdout().lock();
                TerminalTable::for_table_view(summary, tsv).write_table_view(summary, &mut out)?;
                out.flush()?;
            }
            None => info!("no summary table to print"),
        }
    }

    Ok(())
}
