// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Two subcommands:
// - crawl: fetch maintainers and dependents of the seed package, save them
// - inspect: print what the last crawl saved, without touching the network
// =============================================================================

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "npm-scout",
    version,
    about = "Maps an npm package's maintainers and the packages that depend on it",
    long_about = "npm-scout starts from one seed package, collects its maintainers from the \
                  registry API, walks every page of its dependents listing on the npm website, \
                  and saves both to data_contributors.json and data_dependents.json."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl the seed package and save contributors and dependents
    ///
    /// Example: npm-scout crawl --package express --max-pages 5
    Crawl {
        /// Path to the TOML settings file
        #[arg(long, default_value = "config.toml")]
        config: PathBuf,

        /// Seed package (overrides settings.seed_package)
        #[arg(long)]
        package: Option<String>,

        /// Directory holding data_*.json (overrides settings.data_dir)
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Stop after this many dependents listing pages
        #[arg(long)]
        max_pages: Option<usize>,

        /// Skip the per-author download statistics lookups
        #[arg(long)]
        no_enrich: bool,

        /// Print the results as JSON instead of a listing
        #[arg(long)]
        json: bool,
    },

    /// Show the contributors and dependents saved by the last crawl
    Inspect {
        /// Path to the TOML settings file (only data_dir is read)
        #[arg(long, default_value = "config.toml")]
        config: PathBuf,

        /// Directory holding data_*.json (overrides settings.data_dir)
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Print the saved data as JSON instead of a listing
        #[arg(long)]
        json: bool,
    },
}
