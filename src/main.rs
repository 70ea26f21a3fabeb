//! Poem-Harvest main entry point
//!
//! This is the command-line interface for the Poem-Harvest poem collector.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use poem_harvest::config::{load_config_or_default, validate, Config};
use poem_harvest::crawler::{harvest_author, harvest_top_authors};
use poem_harvest::output::{print_collection_summary, print_crawl_summary};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Poem-Harvest: download poems by author
///
/// Either give a poet and a destination directory, or use the `poet` and
/// `top` subcommands. Each poem is saved as a text file named after its
/// title, inside a directory named after its author.
#[derive(Parser, Debug)]
#[command(name = "poem-harvest")]
#[command(version)]
#[command(about = "Scrape poems from poemhunter.com", long_about = None)]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// The poet whose poems to download
    #[arg(value_name = "POET", required = true)]
    poet: Option<String>,

    /// The directory in which to save the poems
    #[arg(value_name = "DEST", required = true)]
    dest: Option<PathBuf>,

    #[command(flatten)]
    options: HarvestOptions,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Download the poems of the N top-ranked poets
    Top {
        /// How many poets to download
        #[arg(value_name = "N")]
        count: usize,

        /// The directory in which to save the poems
        #[arg(value_name = "DEST")]
        dest: PathBuf,

        #[command(flatten)]
        options: HarvestOptions,
    },

    /// Download the poems of one poet
    Poet {
        /// The poet whose poems to download
        #[arg(value_name = "POET")]
        poet: String,

        /// The directory in which to save the poems
        #[arg(value_name = "DEST")]
        dest: PathBuf,

        #[command(flatten)]
        options: HarvestOptions,
    },
}

#[derive(Args, Debug, Clone, Default)]
struct HarvestOptions {
    /// The number of poems to download in parallel
    #[arg(short, long, value_name = "N")]
    concurrency: Option<usize>,

    /// Print a line for every poem saved or failed
    #[arg(short, long)]
    verbose: bool,

    /// Path to an optional TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

/// What to harvest, after the command line is resolved
enum Mode {
    Author { poet: String, dest: PathBuf },
    Top { count: usize, dest: PathBuf },
}

impl Mode {
    fn destination(&self) -> &Path {
        match self {
            Self::Author { dest, .. } | Self::Top { dest, .. } => dest,
        }
    }
}

impl Cli {
    fn into_mode(self) -> anyhow::Result<(Mode, HarvestOptions)> {
        match self.command {
            Some(Command::Top {
                count,
                dest,
                options,
            }) => Ok((Mode::Top { count, dest }, options)),
            Some(Command::Poet {
                poet,
                dest,
                options,
            }) => Ok((Mode::Author { poet, dest }, options)),
            None => {
                let poet = self.poet.context("missing POET")?;
                let dest = self.dest.context("missing DEST")?;
                Ok((Mode::Author { poet, dest }, self.options))
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let (mode, options) = Cli::parse().into_mode()?;

    setup_logging(options.verbose);

    let dest = mode.destination();
    if !dest.exists() {
        println!("\"{}\" is not a valid path.", dest.display());
        return Ok(ExitCode::from(255));
    }

    let config = build_config(&options)?;

    match &mode {
        Mode::Author { poet, dest } => {
            let report = harvest_author(&config, poet, dest, options.verbose)
                .await
                .with_context(|| format!("harvesting poems of {}", poet))?;
            print_crawl_summary(&report);
        }
        Mode::Top { count, dest } => {
            let report = harvest_top_authors(&config, *count, dest, options.verbose)
                .await
                .with_context(|| format!("harvesting the top {} poets", count))?;
            print_collection_summary(&report);
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Loads the configuration file, if any, and applies command-line overrides
fn build_config(options: &HarvestOptions) -> anyhow::Result<Config> {
    let mut config = load_config_or_default(options.config.as_deref())
        .context("loading configuration")?;

    if let Some(concurrency) = options.concurrency {
        config.harvester.concurrency = concurrency;
        validate(&config).context("applying --concurrency")?;
    }

    tracing::debug!(
        "Using {} workers per poet against {}",
        config.harvester.concurrency,
        config.site.host
    );
    Ok(config)
}

/// Sets up the logging/tracing subscriber
///
/// Logs go to stderr; stdout carries the progress lines and summaries.
fn setup_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("poem_harvest=debug,info")
        } else {
            EnvFilter::new("poem_harvest=info,warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
