//! Readflow CLI

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use readflow::{
    BatchItemResult, ColumnDetection, LayoutConfig, LayoutStrategy, batch_linearize_files, linearize_file_async,
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// CLI enum for layout strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CliStrategy {
    /// Word-level columns and lines
    Words,
    /// OCR blocks read row by row
    BlockRows,
    /// OCR blocks read column by column
    BlockColumns,
}

impl From<CliStrategy> for LayoutStrategy {
    fn from(strategy: CliStrategy) -> Self {
        match strategy {
            CliStrategy::Words => LayoutStrategy::Words,
            CliStrategy::BlockRows => LayoutStrategy::BlockRows,
            CliStrategy::BlockColumns => LayoutStrategy::BlockColumns,
        }
    }
}

/// CLI enum for column detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CliColumns {
    /// Split once at the widest gap (at most two columns)
    LargestGap,
    /// Split at every wide gap
    AllGaps,
}

impl From<CliColumns> for ColumnDetection {
    fn from(columns: CliColumns) -> Self {
        match columns {
            CliColumns::LargestGap => ColumnDetection::LargestGap,
            CliColumns::AllGaps => ColumnDetection::AllGaps,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "readflow")]
#[command(version, about = "Rebuild reading order from OCR word boxes", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Linearize OCR exports (.json or .tsv) into reading-order text
    Linearize {
        /// Input files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        layout: LayoutArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the effective layout configuration as TOML
    Config {
        #[command(flatten)]
        layout: LayoutArgs,
    },
}

#[derive(clap::Args, Debug, Default)]
struct LayoutArgs {
    /// Config file (.toml, .yaml, .yml or .json); defaults to a discovered readflow.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Layout strategy
    #[arg(short, long, value_enum)]
    strategy: Option<CliStrategy>,

    /// Column detection mode
    #[arg(long, value_enum)]
    columns: Option<CliColumns>,

    /// Minimum word confidence in [0, 1]
    #[arg(long)]
    min_confidence: Option<f64>,

    /// Prefix columns with "=== COLUMN n ===" headers
    #[arg(long)]
    label_columns: bool,

    /// Lay out pages one at a time instead of on the thread pool
    #[arg(long)]
    sequential: bool,

    /// Maximum files processed at once
    #[arg(long)]
    max_concurrent: Option<usize>,
}

impl LayoutArgs {
    /// Explicit file, else discovered `readflow.toml`, else defaults; then flag overrides.
    fn resolve(&self) -> Result<LayoutConfig> {
        let mut config = match &self.config {
            Some(path) => LayoutConfig::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => LayoutConfig::discover()?.unwrap_or_default(),
        };

        if let Some(strategy) = self.strategy {
            config.strategy = strategy.into();
        }
        if let Some(columns) = self.columns {
            config.column_detection = columns.into();
        }
        if let Some(min_confidence) = self.min_confidence {
            config.min_confidence = min_confidence;
        }
        if self.label_columns {
            config.label_columns = true;
        }
        if self.sequential {
            config.parallel = false;
        }
        if self.max_concurrent.is_some() {
            config.max_concurrent_documents = self.max_concurrent;
        }

        config.validate()?;
        Ok(config)
    }
}

fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "readflow=warn",
        1 => "readflow=info",
        _ => "readflow=debug",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Linearize { files, layout, format } => {
            let config = layout.resolve()?;
            linearize(files, &config, format).await
        }

        Commands::Config { layout } => {
            let config = layout.resolve()?;
            print!("{}", toml::to_string(&config).context("Failed to serialize config")?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn linearize(files: Vec<PathBuf>, config: &LayoutConfig, format: OutputFormat) -> Result<ExitCode> {
    if let [path] = files.as_slice() {
        let text = linearize_file_async(path, config)
            .await
            .with_context(|| format!("Failed to linearize {}", path.display()))?;
        match format {
            OutputFormat::Text => println!("{}", text.content),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&text)?),
        }
        return Ok(ExitCode::SUCCESS);
    }

    let results = batch_linearize_files(files, config).await?;
    let failures = results.iter().filter(|item| !item.success).count();

    match format {
        OutputFormat::Text => print_text_results(&results),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
    }

    if failures > 0 {
        tracing::warn!("{} of {} files failed", failures, results.len());
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn print_text_results(results: &[BatchItemResult]) {
    for (i, item) in results.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("==> {} <==", item.file_path);
        match (&item.result, &item.error) {
            (Some(text), _) => println!("{}", text.content),
            (None, Some(error)) => eprintln!("error: {}", error),
            (None, None) => eprintln!("error: no result"),
        }
    }
}
