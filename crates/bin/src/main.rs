//! form13f CLI binary.
//!
//! Looks up funds and prints consolidated 13F holdings for one quarter or
//! across a range of years.

use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use form13f_core::{
    Quarter, QuarterReport, QuarterlyCollection, find_ciks_by_name, latest_period_of_report,
};
use form13f_data::{ClientConfig, FilingSource, Forms13fClient, InMemorySource};
use form13f_output::{
    ExportFormat, Exporter, HoldingRecord, HoldingsPivot, PivotMetric, to_ascii_table,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "form13f")]
#[command(about = "Consolidated Form 13F holdings reports", long_about = None)]
#[command(version)]
struct Cli {
    /// Serve filings from a JSON snapshot instead of the filings service
    #[arg(long, global = true)]
    fixture: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find fund CIKs by name
    Funds {
        /// Fund name or part of it
        name: String,
    },

    /// Show the most recent period a fund has filed for
    Latest {
        /// Fund CIK
        cik: String,
    },

    /// Consolidated holdings for one quarter
    Report {
        /// Fund CIK
        cik: String,

        /// Quarter as YYYY-Q<1-4>
        quarter: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Holdings across quarters, one column per quarter
    History {
        /// Fund CIK
        cik: String,

        /// First year
        #[arg(long)]
        from: i32,

        /// Last year (inclusive)
        #[arg(long)]
        to: i32,

        /// Cell metric: value, shares or fraction
        #[arg(long, default_value = "value")]
        by: PivotMetric,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Csv,
    Json,
}

impl OutputFormat {
    const fn export_format(self) -> Option<ExportFormat> {
        match self {
            Self::Table => None,
            Self::Csv => Some(ExportFormat::Csv),
            Self::Json => Some(ExportFormat::PrettyJson),
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let source = open_source(cli.fixture.as_deref())?;

    match cli.command {
        Commands::Funds { name } => {
            let ciks = find_ciks_by_name(source.as_ref(), &name).await?;
            if ciks.is_empty() {
                println!("No funds matching '{}'", name);
            }
            for cik in ciks {
                println!("{}", cik);
            }
        }
        Commands::Latest { cik } => match latest_period_of_report(source.as_ref(), &cik).await? {
            Some(period) => println!("{} ({})", period, Quarter::containing(period)),
            None => println!("No filings found for CIK {}", cik),
        },
        Commands::Report {
            cik,
            quarter,
            format,
            output,
        } => {
            let report = QuarterReport::fetch(source.as_ref(), &cik, &quarter).await?;
            if report.is_empty() {
                println!("No filings for CIK {} in {}", cik, report.quarter);
                return Ok(());
            }
            let records = HoldingRecord::from_report(&report);
            match format.export_format() {
                Some(export) => emit(&records, export, output.as_deref())?,
                None => write_text(&to_ascii_table(&records), output.as_deref())?,
            }
        }
        Commands::History {
            cik,
            from,
            to,
            by,
            format,
            output,
        } => {
            let collection = build_history(source.as_ref(), &cik, from, to).await?;
            let Some(pivot) = HoldingsPivot::from_collection(&collection, by) else {
                println!("No reports available.");
                return Ok(());
            };
            match format.export_format() {
                Some(export) => emit(&pivot, export, output.as_deref())?,
                None => write_text(&pivot.to_ascii_table(), output.as_deref())?,
            }
        }
    }

    Ok(())
}

fn open_source(fixture: Option<&Path>) -> Result<Box<dyn FilingSource>, Box<dyn std::error::Error>> {
    match fixture {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading filings snapshot");
            let reader = BufReader::new(File::open(path)?);
            Ok(Box::new(InMemorySource::from_reader(reader)?))
        }
        None => Ok(Box::new(Forms13fClient::new(ClientConfig::from_env()?)?)),
    }
}

async fn build_history(
    source: &dyn FilingSource,
    cik: &str,
    from: i32,
    to: i32,
) -> Result<QuarterlyCollection, Box<dyn std::error::Error>> {
    let today = Utc::now().date_naive();
    let quarters = Quarter::range(from, to, today)?;

    let pb = ProgressBar::new(quarters.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("█▓░"),
    );

    let collection = QuarterlyCollection::build_with_progress(source, cik, from, to, today, |quarter, report| {
        pb.set_message(format!("{} ({} holdings)", quarter, report.holdings.len()));
        pb.inc(1);
    })
    .await;
    pb.finish_and_clear();

    Ok(collection?)
}

fn emit(
    data: &impl Exporter,
    format: ExportFormat,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        Some(path) => {
            data.export_to_file(path, format)?;
            println!("Wrote {}", path.display());
        }
        None => println!("{}", data.export_to_string(format)?),
    }
    Ok(())
}

fn write_text(text: &str, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        Some(path) => {
            std::fs::write(path, text)?;
            println!("Wrote {}", path.display());
        }
        None => println!("{}", text),
    }
    Ok(())
}
