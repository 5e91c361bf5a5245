//! # orc-tool
//!
//! A command-line tool for inspecting how writer settings resolve.
//!
//! ## Usage
//!
//! ```bash
//! # List format versions
//! orc-tool versions
//!
//! # Show the configuration a writer would get
//! orc-tool options --config orc.toml --set orc.compress=SNAPPY -c id:bigint,name:string
//!
//! # Split a 1000 byte budget between two writers asking for 800 each
//! orc-tool budget --pool 1000 800 800
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
