use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use recibo_core::{CategoryStore, ItemRecord, spend_by_category, spend_by_date};
use recibo_ingest::{classify_csv, scan_batch, write_records_csv};
use serde::Serialize;
use std::fs::File;
use std::path::PathBuf;

mod config;
mod home;

use config::{Config, load_config};

#[derive(Parser, Debug)]
#[command(name = "recibo", version, about = "Receipt scanner and spending classifier")]
struct Cli {
    /// Category store file (overrides config and ~/.recibo/categories.json)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan receipt files and print parsed items with spending summaries
    Scan {
        /// Receipt files: .txt extracted text or .pdf (extracted via pdftotext)
        files: Vec<PathBuf>,

        /// CSV export to classify and merge into the same table
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Emit one JSON document instead of the text report
        #[arg(long)]
        json: bool,

        /// Write the combined records as CSV
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Classify a CSV by its Descripción column and write the result
    ClassifyCsv {
        file: PathBuf,

        /// Output file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Manage classification categories and their keywords
    Categories {
        #[command(subcommand)]
        command: CategoryCommand,
    },

    /// Write a default ~/.recibo/config.toml if none exists
    InitConfig,
}

#[derive(Subcommand, Debug)]
enum CategoryCommand {
    /// List categories and their keywords
    List,

    /// Create a category, optionally seeded with keywords
    Add {
        name: String,

        #[arg(short = 'k', long = "keyword")]
        keywords: Vec<String>,
    },

    /// Delete a category
    Remove { name: String },

    /// Add one keyword to a category
    AddKeyword { name: String, keyword: String },

    /// Remove one keyword from a category
    RemoveKeyword { name: String, keyword: String },
}

/// JSON shape of `scan --json`: records plus both chart series.
#[derive(Serialize)]
struct ScanReport {
    records: Vec<ItemRecord>,
    spend_by_date: Vec<recibo_core::DateSpend>,
    spend_by_category: Vec<recibo_core::CategorySpend>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = load_config()?;
    let store = open_store(cli.store, &cfg)?;

    match cli.command {
        Command::Scan {
            files,
            csv,
            json,
            out,
        } => scan(&store, &cfg, &files, csv, json, out),

        Command::ClassifyCsv { file, out } => {
            let categories = store.categories()?;
            let input = File::open(&file).with_context(|| format!("open {}", file.display()))?;
            let classified = classify_csv(input, &categories)?;
            match out {
                Some(path) => {
                    let output =
                        File::create(&path).with_context(|| format!("create {}", path.display()))?;
                    classified.write_to(output)?;
                    println!("Wrote {} rows to {}", classified.rows.len(), path.display());
                }
                None => classified.write_to(std::io::stdout().lock())?,
            }
            Ok(())
        }

        Command::Categories { command } => categories(&store, command),

        Command::InitConfig => config::init_config(),
    }
}

fn open_store(flag: Option<PathBuf>, cfg: &Config) -> Result<CategoryStore> {
    let path = match flag.or_else(|| cfg.store.path.clone()) {
        Some(path) => path,
        None => home::default_store_path()?,
    };
    Ok(CategoryStore::open(path))
}

fn scan(
    store: &CategoryStore,
    cfg: &Config,
    files: &[PathBuf],
    csv: Option<PathBuf>,
    json: bool,
    out: Option<PathBuf>,
) -> Result<()> {
    if files.is_empty() && csv.is_none() {
        bail!("nothing to scan: pass receipt files and/or --csv <file>");
    }

    let document_count = files.len() + csv.is_some() as usize;
    let categories = store.categories()?;
    let mut records = scan_batch(
        files,
        &categories,
        &cfg.scan.section_marker,
        &cfg.scan.terminator,
    )?;

    if let Some(csv_path) = csv {
        let input =
            File::open(&csv_path).with_context(|| format!("open {}", csv_path.display()))?;
        let classified = classify_csv(input, &categories)
            .with_context(|| format!("classifying {}", csv_path.display()))?;
        records.extend(classified.to_records());
    }

    let report = ScanReport {
        spend_by_date: spend_by_date(&records),
        spend_by_category: spend_by_category(&records),
        records,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, document_count);
    }

    if let Some(path) = out {
        let output = File::create(&path).with_context(|| format!("create {}", path.display()))?;
        write_records_csv(&report.records, output)?;
        println!("\nWrote {} records to {}", report.records.len(), path.display());
    }

    Ok(())
}

fn print_report(report: &ScanReport, file_count: usize) {
    println!(
        "Parsed {} items from {} document(s)\n",
        report.records.len(),
        file_count
    );

    for r in &report.records {
        let unit = r
            .unit_price
            .map(|p| format!("{p:.2}"))
            .unwrap_or_else(|| "-".to_string());
        let date = r
            .date
            .map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| "-".to_string());
        let time = r
            .time
            .map(|t| t.format("%H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>3} x {:<40} unit={:>7} total={:>7.2} [{}] {} {}",
            r.quantity, r.description, unit, r.total_price, r.category, date, time
        );
    }

    if !report.spend_by_date.is_empty() {
        println!("\nSpend by date:");
        for s in &report.spend_by_date {
            let date = s
                .date
                .map(|d| d.format("%d/%m/%Y").to_string())
                .unwrap_or_default();
            println!("  {date}  {:>8.2}", s.total);
        }
    }

    if !report.spend_by_category.is_empty() {
        println!("\nSpend by category:");
        for s in &report.spend_by_category {
            println!("  {:<20} {:>8.2}", s.category, s.total);
        }
    }
}

fn categories(store: &CategoryStore, command: CategoryCommand) -> Result<()> {
    match command {
        CategoryCommand::List => {
            let cats = store.categories()?;
            if cats.is_empty() {
                println!("No categories defined ({})", store.path().display());
                return Ok(());
            }
            for (name, keywords) in &cats {
                println!("{name}: {}", keywords.join(", "));
            }
        }

        CategoryCommand::Add { name, keywords } => {
            store.create_category(&name, &keywords)?;
            println!("Added category '{}'", name.to_lowercase());
        }

        CategoryCommand::Remove { name } => {
            store.delete_category(&name)?;
            println!("Removed category '{}'", name.to_lowercase());
        }

        CategoryCommand::AddKeyword { name, keyword } => {
            store.add_keyword(&name, &keyword)?;
            println!(
                "Added keyword '{}' to '{}'",
                keyword.to_lowercase(),
                name.to_lowercase()
            );
        }

        CategoryCommand::RemoveKeyword { name, keyword } => {
            store.remove_keyword(&name, &keyword)?;
            println!(
                "Removed keyword '{}' from '{}'",
                keyword.to_lowercase(),
                name.to_lowercase()
            );
        }
    }
    Ok(())
}
