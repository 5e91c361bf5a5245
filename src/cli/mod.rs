use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod budget;
mod config;
mod options;
mod versions;

/// orc-tool - Inspect ORC writer settings and memory budgets
#[derive(Parser)]
#[command(name = "orc-tool")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the registered format versions
    Versions,

    /// Resolve writer options and print the final configuration as JSON
    Options {
        /// Load settings from a TOML file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Override a setting (repeatable), e.g. --set orc.compress=SNAPPY
        #[arg(short = 's', long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,

        /// Columns as name:type pairs, e.g. id:bigint,name:string
        #[arg(short = 'c', long, value_name = "COLUMNS")]
        columns: String,

        /// Format version to write instead of the resolved one
        #[arg(long, value_name = "NAME")]
        format_version: Option<String>,
    },

    /// Show how a memory budget is split between writers
    Budget {
        /// Total budget in bytes
        #[arg(short = 'p', long, value_name = "BYTES")]
        pool: u64,

        /// Requested stripe size of each writer, in bytes
        #[arg(value_name = "SIZE", required = true)]
        sizes: Vec<u64>,

        /// Close the writers at these positions (0-based) after registering all
        #[arg(long, value_name = "INDEX")]
        release: Vec<usize>,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Versions => versions::run(),
        Commands::Options {
            config,
            set,
            columns,
            format_version,
        } => options::run(config, set, columns, format_version),
        Commands::Budget {
            pool,
            sizes,
            release,
        } => budget::run(pool, sizes, release),
    }
}
