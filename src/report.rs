// src/report.rs
// =============================================================================
// Console output for crawl results.
//
// Human-readable listings go to stdout; with --json the same data is printed
// as one JSON document instead. Log lines go to stderr, so JSON output stays
// machine-readable.
// =============================================================================

use anyhow::Result;
use serde::Serialize;

use crate::model::{Author, Package};

/// Everything one crawl produced
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlReport<'a> {
    pub seed_package: &'a str,
    pub npm_url: &'a str,
    pub weekly_downloads: i64,
    pub contributors: &'a [Author],
    pub dependents: &'a [Package],
}

/// What `inspect` shows: the saved datasets only
#[derive(Debug, Serialize)]
pub struct SavedData<'a> {
    pub contributors: &'a [Author],
    pub dependents: &'a [Package],
}

pub fn print_crawl_report(report: &CrawlReport<'_>, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!();
    print_authors(report.contributors);
    if report.weekly_downloads > 0 {
        println!("📈 Weekly downloads: {}", report.weekly_downloads);
        println!();
    }
    print_dependents(report.dependents);
    Ok(())
}

pub fn print_saved_data(data: &SavedData<'_>, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(data)?);
    } else {
        print_authors(data.contributors);
        print_dependents(data.dependents);
    }
    Ok(())
}

fn print_authors(authors: &[Author]) {
    if authors.is_empty() {
        println!("⚠️  No authors found");
        println!();
        return;
    }

    println!("👤 Authors ({}):", authors.len());
    for author in authors {
        let username = author.username.as_deref().unwrap_or("?");
        let role = if author.is_maintainer { "maintainer" } else { "author" };
        match author.name.as_deref() {
            Some(name) => println!("   {} ({}) [{}]", username, name, role),
            None => println!("   {} [{}]", username, role),
        }
        if author.monthly_downloads > 0 || author.weekly_downloads > 0 {
            println!(
                "      downloads: {} / month, {} / week, {} dependents",
                author.monthly_downloads, author.weekly_downloads, author.dependents_count
            );
        }
        if let Some(checked) = author.last_checked_on.as_deref() {
            println!("      last checked: {}", checked);
        }
    }
    println!();
}

fn print_dependents(dependents: &[Package]) {
    println!("{:<40} {:<50}", "DEPENDENT", "URL");
    println!("{}", "=".repeat(90));
    for dependent in dependents {
        println!("{:<40} {:<50}", dependent.name, dependent.url);
    }
    println!();
    println!("📦 Total dependents: {}", dependents.len());
}
