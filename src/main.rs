use anyhow::{Context, Result};
use apparelviz::cache::{DatasetCache, FileSource};
use apparelviz::config::{self, Config};
use apparelviz::graph::{self, GraphConfig};
use apparelviz::ir::{ChartOutcome, ChartSpec, DetailRow};
use apparelviz::report;
use apparelviz::runtime::{Dashboard, DashboardView};
use clap::Parser;
use log::LevelFilter;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "apparelviz")]
#[command(
    about = "Profitability bubble chart and detail table for apparel companies",
    long_about = None,
    after_help = "Examples:
  apparelviz --data roa.xlsx                         Preferred or latest period, all companies
  apparelviz --data roa.csv --list                   Show periods and companies
  apparelviz --data roa.csv -p 20231231 -e A,B       Filter period and companies
  apparelviz --data roa.csv --output chart.png       Also render the chart
  apparelviz --data roa.csv --json                   Chart spec as JSON"
)]
struct Args {
    #[arg(short = 'd', long = "data", value_name = "PATH", help = "Dataset .xlsx or .csv (overrides the config file)")]
    data: Option<PathBuf>,

    #[arg(short = 'c', long = "config", value_name = "PATH", help = "TOML config file")]
    config: Option<PathBuf>,

    #[arg(short = 'p', long = "period", help = "Reporting period (defaults to the preferred or latest period)")]
    period: Option<String>,

    #[arg(
        short = 'e',
        long = "entity",
        value_delimiter = ',',
        value_name = "NAME",
        help = "Companies to include, repeatable or comma-separated (defaults to all)"
    )]
    entities: Option<Vec<String>>,

    #[arg(short = 'o', long = "output", value_name = "PATH", help = "Write the chart as PNG ('-' for stdout)")]
    output: Option<PathBuf>,

    #[arg(long = "json", help = "Print the chart spec and detail rows as JSON")]
    json: bool,

    #[arg(long = "list", help = "List available periods and companies")]
    list: bool,

    #[arg(long = "width", default_value = "1200", help = "Output width in pixels")]
    width: u32,

    #[arg(long = "height", help = "Output height in pixels (defaults to the chart layout height)")]
    height: Option<u32>,

    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, help = "More log output (repeatable)")]
    verbose: u8,

    #[arg(short = 'q', long = "quiet", help = "Only log errors")]
    quiet: bool,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    period: &'a str,
    chart: Option<&'a ChartSpec>,
    details: &'a [DetailRow],
}

fn configure_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Warn,
        (false, 1) => LevelFilter::Info,
        (false, 2) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    };
    let mut builder = env_logger::Builder::from_default_env();
    if std::env::var_os("RUST_LOG").is_none() {
        builder.filter_level(level);
    }
    builder.init();
}

fn print_warning(msg: &str) {
    eprintln!("warning: {}", msg);
}

fn main() -> Result<()> {
    let args = Args::parse();
    configure_logging(args.verbose, args.quiet);

    let mut config = match &args.config {
        Some(path) => config::load_config_from_file(path).context("Failed to load config")?,
        None => Config::default(),
    };
    if let Some(data) = &args.data {
        config.data_path = data.clone();
    }

    let cache = DatasetCache::new(FileSource::new(
        config.data_path.clone(),
        config.columns.clone(),
    ));
    let table = cache.get().context("Failed to load dataset")?;
    let dashboard = Dashboard::new(table, config);

    if args.list {
        print_choices(&dashboard);
        return Ok(());
    }

    let period = match &args.period {
        Some(p) => p.clone(),
        None => dashboard
            .default_period()
            .context("Dataset has no reporting periods")?
            .to_string(),
    };

    let selection: HashSet<String> = match &args.entities {
        Some(names) => names
            .iter()
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
            .map(|n| n.to_string())
            .collect(),
        None => dashboard.default_entities(),
    };

    let view = dashboard.view(&period, &selection)?;

    let png_to_stdout = args.output.as_deref().is_some_and(|p| p.as_os_str() == "-");
    if args.json {
        print_json(&view)?;
    } else if !png_to_stdout {
        print_view(&view, &dashboard);
    }

    if let Some(output) = &args.output {
        write_chart(&view, output, &args)?;
    }

    Ok(())
}

fn print_choices(dashboard: &Dashboard) {
    println!("Periods:");
    for period in dashboard.periods() {
        println!("  {}", period);
    }
    println!("Companies:");
    for name in dashboard.entities() {
        println!("  {}", name);
    }
}

fn print_view(view: &DashboardView, dashboard: &Dashboard) {
    match &view.chart {
        ChartOutcome::Chart(spec) => println!("{} ({} companies charted)", spec.title, spec.points.len()),
        ChartOutcome::NoData => print_warning("No data to chart for this selection"),
    }
    println!();

    if view.details.is_empty() {
        print_warning("No rows match the selection");
    } else {
        print!("{}", report::render_text_table(&view.details, &dashboard.config().columns));
    }
}

fn print_json(view: &DashboardView) -> Result<()> {
    let output = JsonOutput {
        period: &view.period,
        chart: view.chart.chart(),
        details: &view.details,
    };
    let json = serde_json::to_string_pretty(&output).context("Failed to serialize chart")?;
    println!("{}", json);
    Ok(())
}

fn write_chart(view: &DashboardView, output: &Path, args: &Args) -> Result<()> {
    let Some(spec) = view.chart.chart() else {
        print_warning("No chart written: nothing to plot");
        return Ok(());
    };

    let config = GraphConfig {
        width: args.width,
        height: args.height,
    };
    let png_bytes = graph::render_bubble_chart(spec, &config).context("Failed to generate graph")?;

    if output.as_os_str() == "-" {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(&png_bytes)
            .context("Failed to write PNG to stdout")?;
        handle.flush().context("Failed to flush stdout")?;
    } else {
        fs::write(output, &png_bytes)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        log::info!("Chart saved to {}", output.display());
    }

    Ok(())
}
