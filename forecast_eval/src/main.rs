//! Walk-forward forecast evaluation CLI
//!
//! Reads a daily price CSV, runs the expanding-window evaluation, and writes
//! the evaluated rows to stdout as JSON or CSV. Diagnostics go to stderr.

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use forecast_eval::{metrics, report, run_pipeline, EvaluatorConfig, TransformKind};
use price_series::PriceField;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "forecast_eval",
    about = "Walk-forward one-step forecast evaluation for daily price series"
)]
struct Cli {
    /// Input CSV file with a date column and daily price columns
    input: PathBuf,

    /// Numeric column to forecast
    #[arg(long, default_value = "closing")]
    field: String,

    /// Minimum training size before the first forecast
    #[arg(long, default_value_t = 5)]
    warmup: usize,

    /// Forecast the raw series or its first differences
    #[arg(long, value_enum, default_value = "level")]
    transform: TransformArg,

    /// Output format for the evaluated rows
    #[arg(long, value_enum, default_value = "json")]
    format: FormatArg,

    /// Print accuracy metrics to stderr after the run
    #[arg(long)]
    summary: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TransformArg {
    Level,
    Differenced,
}

impl From<TransformArg> for TransformKind {
    fn from(arg: TransformArg) -> Self {
        match arg {
            TransformArg::Level => TransformKind::Level,
            TransformArg::Differenced => TransformKind::Differenced,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Json,
    Csv,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.print().ok();
            std::process::exit(0);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    init_tracing();

    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = EvaluatorConfig {
        target_field: cli.field.parse::<PriceField>()?,
        warmup_length: cli.warmup,
        transform: cli.transform.into(),
    };

    let rows = run_pipeline(&cli.input, &config)?;

    let stdout = io::stdout();
    match cli.format {
        FormatArg::Json => report::write_json(&rows, stdout.lock())?,
        FormatArg::Csv => report::write_csv(&rows, stdout.lock())?,
    }

    if cli.summary {
        match metrics::accuracy(&rows) {
            Ok(summary) => eprint!("{summary}"),
            Err(err) => tracing::warn!(error = %err, "no accuracy summary available"),
        }
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("forecast_eval=info")),
        )
        .with_writer(io::stderr)
        .init();
}
