//! trivial-irc CLI: extract trivia question records from IRC logs.

mod debug_report;

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use trivial_irc::{Batcher, Config, Options, extract_verbose_with, extract_with, pattern_catalog, validate_sample};

#[derive(Parser)]
#[command(name = "trivial-irc")]
#[command(author, version)]
#[command(about = "Turn IRC trivia-game logs into paginated question records")]
#[command(propagate_version = true)]
#[command(after_help = "Examples:
  trivial-irc extract channel.log                 First page as JSON
  trivial-irc extract channel.log --page 2 -n 20  Second page of 20 records
  cat channel.log | trivial-irc extract --format text
  trivial-irc validate sample.txt                 Check answers are detected
  trivial-irc patterns                            Dump every regex in use

Exit codes:
  0  Success.
  1  Runtime error (unreadable input, bad config, page out of range).
  2  Invalid arguments.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML configuration file
    #[arg(long, global = true, env = "TRIVIAL_IRC_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract question records and print one page
    Extract {
        /// Log file to read; stdin when omitted
        file: Option<PathBuf>,

        /// 1-based page to print
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
        page: u64,

        /// Records per page (overrides the config file)
        #[arg(short = 'n', long, value_parser = clap::value_parser!(u64).range(1..))]
        page_size: Option<u64>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Force ANSI color in the text report
        #[arg(long, conflicts_with = "no_color")]
        color: bool,

        /// Disable ANSI color in the text report
        #[arg(long)]
        no_color: bool,
    },

    /// Check that a sample cleans and yields answers
    Validate {
        /// Sample file to read; stdin when omitted
        file: Option<PathBuf>,
    },

    /// Print every pattern the extractor uses
    Patterns,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

fn setup_logging(verbose: bool) {
    let filter = if verbose { "debug" } else { "warn" };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let mut options = config.options();

    match cli.command {
        Commands::Extract { file, page, page_size, format, color, no_color } => {
            if let Some(size) = page_size {
                options.page_size = usize::try_from(size).context("page size too large")?;
            }
            let page = usize::try_from(page).context("page number too large")?;
            let text = read_input(file.as_deref())?;
            let color = if color {
                true
            } else if no_color {
                false
            } else {
                io::stdout().is_terminal()
            };
            run_extract(&text, &options, page, format, color)
        }
        Commands::Validate { file } => {
            let text = read_input(file.as_deref())?;
            print_json(&validate_sample(&text))
        }
        Commands::Patterns => print_json(&pattern_catalog(&options)?),
    }
}

fn run_extract(text: &str, options: &Options, page: usize, format: OutputFormat, color: bool) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let extraction = extract_with(text, options)?;
            let batcher = extraction.into_batcher(options.page_size)?;
            print_json(&batcher.page(page)?)
        }
        OutputFormat::Text => {
            let verbose = extract_verbose_with(text, options)?;
            let batcher = Batcher::with_records(options.page_size, verbose.records.clone())?;
            let page = batcher.page(page)?;
            debug_report::print_report(&page, &verbose, color);
            Ok(())
        }
    }
}

/// Read `path` (or stdin) as bytes; invalid UTF-8 is replaced, never fatal.
fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    let bytes = match path {
        Some(path) => fs::read(path).with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buffer = Vec::new();
            io::stdin().read_to_end(&mut buffer).context("failed to read stdin")?;
            buffer
        }
    };
    debug!(bytes = bytes.len(), "input read");
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
