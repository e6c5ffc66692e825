use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

use originals::{run_capture, Settings};

#[derive(Debug, Parser)]
#[command(name = "originals")]
#[command(about = "Appends recent, not yet captured rows of an export to the originals file")]
struct Cli {
    /// YAML file with any of source_path, destination_path, days_back,
    /// encoding and reference_date
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Source export
    #[arg(short, long, value_name = "PATH")]
    source: Option<PathBuf>,

    /// Originals file rows are appended to
    #[arg(short, long, value_name = "PATH")]
    destination: Option<PathBuf>,

    /// Size of the recency window
    #[arg(long, value_name = "DAYS")]
    days_back: Option<u32>,

    /// Date the window ends at, defaults to today
    #[arg(long, value_name = "YYYY-MM-DD")]
    reference_date: Option<NaiveDate>,

    /// Text encoding of both files, e.g. windows-1252
    #[arg(long, value_name = "LABEL")]
    encoding: Option<String>,
}

impl Cli {
    fn overrides(&self) -> Settings {
        Settings {
            source_path: self.source.clone(),
            destination_path: self.destination.clone(),
            days_back: self.days_back,
            encoding: self.encoding.clone(),
            reference_date: self.reference_date,
        }
    }
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let cli = Cli::parse();

    let settings = match cli.config {
        Some(ref path) => Settings::from_path(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => Settings::default(),
    };

    let config = settings
        .merge(cli.overrides())
        .resolve(Local::now().date_naive())?;

    let report = run_capture(&config)
        .with_context(|| format!("capturing {}", config.source_path.display()))?;

    println!(
        "capture complete: source={} recent={} duplicates={} new={} written={}",
        report.source_rows,
        report.recency.kept,
        report.novelty.duplicates,
        report.novelty.novel,
        report.written
    );

    Ok(())
}
