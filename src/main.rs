use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use log::{info, warn};

mod dashboard;
mod error;
mod export;
mod models;
mod report;
mod sample;

use models::{DateRange, ReportKind, ReportRequest, Snapshot};

#[derive(Parser)]
#[command(name = "thermal-reports")]
#[command(about = "Report generator for the thermal crop monitoring dashboard", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct DataSource {
    /// Load the snapshot from a JSON file instead of the built-in sample
    #[arg(long)]
    snapshot: Option<PathBuf>,
    /// Replace the daily records with rows from a CSV file
    #[arg(long)]
    daily_csv: Option<PathBuf>,
}

#[derive(Args)]
struct Period {
    /// First day of a custom report
    #[arg(long, requires = "end")]
    start: Option<NaiveDate>,
    /// Last day of a custom report
    #[arg(long, requires = "start")]
    end: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble a report and save it as a text file
    Generate {
        #[arg(long, value_parser = ReportKind::from_str)]
        kind: ReportKind,
        #[command(flatten)]
        period: Period,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
        #[command(flatten)]
        source: DataSource,
    },
    /// Save one report of every kind
    GenerateAll {
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
        #[command(flatten)]
        source: DataSource,
    },
    /// Assemble a report and write it to stdout
    Print {
        #[arg(long, value_parser = ReportKind::from_str)]
        kind: ReportKind,
        #[command(flatten)]
        period: Period,
        #[command(flatten)]
        source: DataSource,
    },
    /// Dump the sample snapshot as JSON
    Snapshot {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List performance metrics with their status
    Metrics {
        #[command(flatten)]
        source: DataSource,
    },
    /// List anomaly insights
    Insights {
        #[command(flatten)]
        source: DataSource,
    },
    /// Show layer status and active alerts with a live clock
    Dashboard {
        #[arg(long, default_value_t = 5)]
        ticks: u32,
    },
}

fn load_snapshot(source: &DataSource) -> anyhow::Result<Snapshot> {
    let mut snapshot = match &source.snapshot {
        Some(path) => sample::load_snapshot(path)?,
        None => sample::snapshot()?,
    };
    if let Some(csv) = &source.daily_csv {
        let records = sample::import_daily_csv(csv)?;
        info!("Using {} daily records from {}", records.len(), csv.display());
        snapshot.daily_data = Some(records);
    }
    Ok(snapshot)
}

fn build_request(kind: ReportKind, period: &Period) -> anyhow::Result<ReportRequest> {
    let range = match (period.start, period.end) {
        (Some(start), Some(end)) => Some(DateRange::new(start, end)?),
        _ => None,
    };
    if range.is_some() && kind != ReportKind::Custom {
        warn!("--start/--end only apply to custom reports; ignoring for {kind}");
    }
    Ok(ReportRequest::new(kind, Local::now().fixed_offset(), range))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            kind,
            period,
            out_dir,
            source,
        } => {
            let snapshot = load_snapshot(&source)?;
            let request = build_request(kind, &period)?;
            let document = report::assemble(&request, &snapshot)?;
            export::export_as_file(&document, &request, &out_dir, &export::ConsoleNotifier)?;
        }
        Commands::GenerateAll { out_dir, source } => {
            let snapshot = load_snapshot(&source)?;
            let generated_at = Local::now().fixed_offset();
            for kind in ReportKind::ALL {
                let request = ReportRequest::new(kind, generated_at, None);
                let document = report::assemble(&request, &snapshot)?;
                export::export_as_file(&document, &request, &out_dir, &export::ConsoleNotifier)?;
            }
        }
        Commands::Print {
            kind,
            period,
            source,
        } => {
            let snapshot = load_snapshot(&source)?;
            let request = build_request(kind, &period)?;
            print!("{}", report::assemble(&request, &snapshot)?);
        }
        Commands::Snapshot { out } => {
            let json = serde_json::to_string_pretty(&sample::snapshot()?)?;
            match out {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("Snapshot written to {}.", path.display());
                }
                None => println!("{json}"),
            }
        }
        Commands::Metrics { source } => {
            let snapshot = load_snapshot(&source)?;
            let metrics = snapshot
                .performance_metrics
                .ok_or(error::ReportError::MissingSnapshotField("performanceMetrics"))?;
            print!("{}", dashboard::render_performance(&metrics));
        }
        Commands::Insights { source } => {
            let snapshot = load_snapshot(&source)?;
            let insights = snapshot
                .anomaly_insights
                .ok_or(error::ReportError::MissingSnapshotField("anomalyInsights"))?;
            if insights.is_empty() {
                println!("No anomalies detected.");
            } else {
                print!("{}", dashboard::render_insights(&insights));
            }
        }
        Commands::Dashboard { ticks } => {
            print!("{}", dashboard::render_layers(&dashboard::layer_readings()));
            println!();
            print!("{}", dashboard::render_alerts(&dashboard::active_alerts()));
            let period = Duration::from_secs(1);
            let clock = dashboard::Clock::start(period, |now| {
                println!("Current time: {}", now.format("%H:%M:%S"));
            });
            tokio::time::sleep(period * ticks).await;
            drop(clock);
        }
    }

    Ok(())
}
