#![deny(missing_docs)]

//! Command-line entry point for the nightly status page.

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use time::Date;

use nightly_status::config::{self, StatusConfig};
use nightly_status::logging;
use nightly_status::render;
use nightly_status::report::{self, LogSource, Reporter, StatusError};

const DEFAULT_WATCH_INTERVAL_SECS: u64 = 300;

#[derive(Parser, Debug)]
#[command(name = "nightly-status")]
#[command(about = "Render the status of nightly benchmark runs", long_about = None)]
struct Cli {
    /// Config file to read instead of the one in the app directory
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Scan this directory instead of fetching the archive
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Number of days to include, counting back from the start date
    #[arg(long, global = true)]
    days: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the status table once
    Render(RenderArgs),
    /// Re-render the HTML page on an interval
    Watch(WatchArgs),
    /// Fetch (or reuse) the archive and print its extracted root
    Fetch,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Last day of the window (YYYY-MM-DD); defaults to today
    #[arg(long, value_parser = parse_date)]
    date: Option<Date>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Html)]
    format: OutputFormat,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct WatchArgs {
    /// HTML file to rewrite on every cycle
    #[arg(short, long)]
    output: PathBuf,

    /// Seconds between renders
    #[arg(long, default_value_t = DEFAULT_WATCH_INTERVAL_SECS)]
    interval: u64,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Html,
    Text,
    Json,
}

fn main() {
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }
    if let Err(err) = run(Cli::parse()) {
        tracing::error!("{err}");
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), StatusError> {
    let config = load_config(&cli)?;
    let source = LogSource::from_config(&config);
    let mut reporter = Reporter::new(config, source);
    match cli.command {
        Command::Render(args) => render_once(&mut reporter, &args),
        Command::Watch(args) => watch(&mut reporter, &args),
        Command::Fetch => {
            let root = reporter.resolve_root()?;
            println!("{}", root.display());
            Ok(())
        }
    }
}

fn load_config(cli: &Cli) -> Result<StatusConfig, StatusError> {
    let mut config = match &cli.config {
        Some(path) => config::load_from(path)?,
        None => config::load_or_default()?,
    };
    if let Some(root) = &cli.root {
        config.scan.root = Some(root.clone());
    }
    if let Some(days) = cli.days {
        config.set_days(days);
    }
    Ok(config)
}

fn render_once(reporter: &mut Reporter, args: &RenderArgs) -> Result<(), StatusError> {
    let now = logging::now_local_or_utc();
    let start = args.date.unwrap_or_else(|| now.date());
    let status = reporter.build(start)?;
    let contents = match args.format {
        OutputFormat::Html => {
            render::render_html(&status.table, &reporter.page_meta(&status, now))
        }
        OutputFormat::Text => render::render_text(&status.table),
        OutputFormat::Json => render::render_json(&status.table, &status.records)?,
    };
    match &args.output {
        Some(path) => {
            report::write_output(path, &contents)?;
            tracing::info!(path = %path.display(), "Wrote status page");
        }
        None => print!("{contents}"),
    }
    Ok(())
}

fn watch(reporter: &mut Reporter, args: &WatchArgs) -> Result<(), StatusError> {
    let interval = Duration::from_secs(args.interval.max(1));
    loop {
        let now = logging::now_local_or_utc();
        match reporter.build(now.date()) {
            Ok(status) => {
                let mut meta = reporter.page_meta(&status, now);
                meta.refresh_secs = meta.refresh_secs.or(Some(interval.as_secs()));
                let html = render::render_html(&status.table, &meta);
                report::write_output(&args.output, &html)?;
                tracing::info!(path = %args.output.display(), "Refreshed status page");
            }
            // A failed cycle keeps the previous page; the next cycle retries.
            Err(err) => tracing::warn!("Render cycle failed: {err}"),
        }
        thread::sleep(interval);
    }
}

fn parse_date(value: &str) -> Result<Date, String> {
    let format = time::macros::format_description!("[year]-[month]-[day]");
    Date::parse(value, format).map_err(|err| format!("invalid date '{value}': {err}"))
}
