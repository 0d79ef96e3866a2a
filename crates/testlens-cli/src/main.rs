//! testlens CLI: item analysis and student reports from the command line.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(
    name = "testlens",
    version,
    about = "Psychometric item analysis and student performance reports"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Difficulty and discrimination statistics for every question
    Items {
        /// Path to a .toml dataset or directory of datasets
        #[arg(long)]
        dataset: PathBuf,

        /// Test instance to analyze (optional when only one is loaded)
        #[arg(long)]
        instance: Option<String>,

        /// Output format: text, json, markdown, html
        #[arg(long, default_value = "text")]
        format: String,

        /// Write the report to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Performance report for one student
    Student {
        /// Path to a .toml dataset or directory of datasets
        #[arg(long)]
        dataset: PathBuf,

        /// Student identifier
        #[arg(long)]
        student: String,

        /// Test instance (optional when only one is loaded)
        #[arg(long)]
        instance: Option<String>,

        /// Output format: text, json, html
        #[arg(long, default_value = "text")]
        format: String,

        /// Write the report to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate dataset TOML files
    Validate {
        /// Path to dataset file or directory
        #[arg(long)]
        dataset: PathBuf,
    },

    /// Create starter config and example dataset
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("testlens=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Items {
            dataset,
            instance,
            format,
            output,
            config,
        } => commands::items::execute(dataset, instance, format, output, config),
        Commands::Student {
            dataset,
            student,
            instance,
            format,
            output,
            config,
        } => commands::student::execute(dataset, student, instance, format, output, config),
        Commands::Validate { dataset } => commands::validate::execute(dataset),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
