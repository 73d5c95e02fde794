// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (tracing, to stderr)
// 2. Parse command-line arguments using clap
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code (0 = success, 1 = seed page unavailable, 2 = error)
//
// The crawl itself, in order:
//   settings -> load previous data -> fetch the seed package page
//   -> maintainers (+ enrichment) -> weekly downloads
//   -> dependents (tab, listing, pagination) -> reconcile -> save -> report
// =============================================================================

mod cli;
mod config;
mod crawl;
mod error;
mod extract;
mod model;
mod reconcile;
mod registry;
mod report;
mod store;

use anyhow::{Context, Result};
use clap::Parser;
use scraper::Html;
use std::path::Path;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use config::{Overrides, Settings};
use crawl::Crawler;
use model::{Author, Package};
use registry::{Fetch, HttpFetcher, RegistryClient};
use report::{CrawlReport, SavedData};
use store::DataStore;

#[tokio::main]
async fn main() {
    init_tracing();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// RUST_LOG overrides the default "info" level, e.g. RUST_LOG=npm_scout=debug
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Crawl {
            config,
            package,
            data_dir,
            max_pages,
            no_enrich,
            json,
        } => {
            let overrides = Overrides {
                seed_package: package,
                data_dir,
                max_pages,
                no_enrich,
            };
            let settings = Settings::load(&config, &overrides)?;
            handle_crawl(&settings, json).await
        }
        Commands::Inspect { config, data_dir, json } => {
            let data_dir = Settings::data_dir(&config, data_dir)?;
            handle_inspect(&data_dir, json)
        }
    }
}

// Handles the 'crawl' subcommand
async fn handle_crawl(settings: &Settings, json: bool) -> Result<i32> {
    debug!(
        queue_url = %settings.queue_url,
        cluster = settings.cluster,
        active_tab = %settings.active_tab,
        "resolved settings"
    );

    let data = DataStore::new(&settings.data_dir);
    let known_contributors: Vec<Author> = data.load(store::CONTRIBUTORS)?;
    let known_dependents: Vec<Package> = data.load(store::DEPENDENTS)?;
    info!(
        contributors = known_contributors.len(),
        dependents = known_dependents.len(),
        "loaded previous crawl"
    );

    if !json {
        println!("🔍 Scouting npm package: {}", settings.seed_package);
        println!("🌐 {}", settings.npm_url);
    }

    let fetcher = HttpFetcher::new(settings.request_timeout_secs).context("failed to create HTTP client")?;

    let html = match fetcher.fetch_text(&settings.npm_url).await {
        Ok(html) => html,
        Err(e) => {
            error!(error = %e, "failed to retrieve the package page");
            return Ok(1);
        }
    };

    let registry = RegistryClient::new(&fetcher, &settings.registry_api_url, &settings.downloads_api_url);
    let mut contributors = registry.fetch_maintainers(&settings.seed_package).await;
    if settings.enrich_authors {
        registry.enrich_authors(&mut contributors).await;
    }
    let weekly_downloads = registry.fetch_weekly_downloads(&settings.seed_package).await;

    let document = Html::parse_document(&html);
    let crawler = Crawler::new(&fetcher, settings.registry_base_url.clone()).with_max_pages(settings.max_pages);
    let dependents = crawler.extract_dependents(&document).await;
    let dependents = reconcile::reconcile(dependents, &known_dependents);

    data.save(store::CONTRIBUTORS, &contributors)?;
    data.save(store::DEPENDENTS, &dependents)?;

    let report = CrawlReport {
        seed_package: &settings.seed_package,
        npm_url: &settings.npm_url,
        weekly_downloads,
        contributors: &contributors,
        dependents: &dependents,
    };
    report::print_crawl_report(&report, json)?;

    Ok(0)
}

// Handles the 'inspect' subcommand
fn handle_inspect(data_dir: &Path, json: bool) -> Result<i32> {
    let data = DataStore::new(data_dir);
    let contributors: Vec<Author> = data.load(store::CONTRIBUTORS)?;
    let dependents: Vec<Package> = data.load(store::DEPENDENTS)?;

    report::print_saved_data(
        &SavedData {
            contributors: &contributors,
            dependents: &dependents,
        },
        json,
    )?;
    Ok(0)
}
