use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use sheet_tickers::config::AppConfig;
use sheet_tickers::loader::file_sources;
use sheet_tickers::pipeline::Pipeline;
use sheet_tickers::source::{FileSheetSource, GoogleSheetSource};
use sheet_tickers::storage::Repository;
use sheet_tickers::symbols::{generate_variants, VariantIndex};
use sheet_tickers::utils;

#[derive(Parser)]
#[command(name = "sheet-tickers", about = "Spreadsheet ticker ingestion", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch the published Google Sheet and upsert its tickers
    Sync {
        /// CSV export URL (overrides source.csv_url / source.sheet_id)
        #[arg(long, env = "SHEET_CSV_URL")]
        url: Option<String>,
    },

    /// Import a local CSV export, or every CSV in a directory
    LoadCsv {
        #[arg(default_value = "data")]
        path: PathBuf,
    },

    /// Parse a CSV export and print the result without storing it
    Parse {
        file: PathBuf,

        #[arg(long)]
        json: bool,
    },

    /// Print every equivalent spelling of the given symbols
    Variants {
        #[arg(required = true)]
        symbols: Vec<String>,
    },

    /// Find stored tickers by any spelling of their symbol
    Lookup {
        #[arg(required = true)]
        symbols: Vec<String>,
    },

    /// Show database statistics
    Stats,

    /// List all stored ticker symbols
    Symbols,

    /// Apply schema migrations without loading data
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "sheet_tickers=info,warn",
        1 => "sheet_tickers=debug,info",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::new(filter))
        .init();

    let mut config = AppConfig::load()?;

    match cli.command {
        Command::Sync { url } => {
            let _t = utils::Timer::start("Sheet sync");
            if url.is_some() {
                config.source.csv_url = url;
            }
            let source = GoogleSheetSource::new(&config.source)?;
            let report = Pipeline::new(config).run(&source).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Command::LoadCsv { path } => {
            let _t = utils::Timer::start("CSV load");
            let sources = file_sources(&path)?;
            info!("Found {} CSV files at {:?}", sources.len(), path);

            let pipeline = Pipeline::new(config);
            let mut imported = 0usize;
            let mut errors = 0usize;

            for source in &sources {
                match pipeline.run(source).await {
                    Ok(report) => imported += report.imported,
                    Err(e) => {
                        warn!("{:#}", e);
                        errors += 1;
                    }
                }
            }

            info!("Done: {} tickers imported, {} errors", imported, errors);
        }

        Command::Parse { file, json } => {
            let parsed = Pipeline::new(config)
                .preview(&FileSheetSource::new(file))
                .await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&parsed.tickers)?);
            } else {
                for t in &parsed.tickers {
                    println!(
                        "  {:<12} {:<32} {}",
                        t.symbol,
                        t.name,
                        utils::fmt_price(t.price, t.currency.as_deref())
                    );
                }
                println!(
                    "{} tickers, {} rows skipped",
                    parsed.tickers.len(),
                    parsed.skipped_rows
                );
            }
            let dups = parsed.duplicates();
            if !dups.is_empty() {
                warn!("Duplicate symbols: {}", dups.join(", "));
            }
        }

        Command::Variants { symbols } => {
            let variants = generate_variants(symbols.iter().map(|s| Some(s.as_str())));
            for v in variants.iter() {
                println!("{}", v);
            }
        }

        Command::Lookup { symbols } => {
            let repo = Repository::open(&config.storage.db_path)?;
            let index = VariantIndex::build(repo.list_tickers()?);
            for raw in &symbols {
                match index.resolve([Some(raw.as_str())]) {
                    Some(t) => println!(
                        "  {:<16} → {:<12} {:<32} {}",
                        raw,
                        t.symbol,
                        t.name,
                        utils::fmt_price(t.price, t.currency.as_deref())
                    ),
                    None => println!("  {:<16} → (ingen träff)", raw),
                }
            }
        }

        Command::Stats => {
            let repo = Repository::open(&config.storage.db_path)?;
            let tickers = repo.ticker_count()?;
            let priced = repo.priced_count()?;
            let last = repo.last_import()?;
            println!("─────────────────────────────────");
            println!("  Sheet tickers — Database Stats");
            println!("─────────────────────────────────");
            println!("  Tickers     : {}", utils::fmt_number(tickers));
            println!("  With price  : {}", utils::fmt_number(priced));
            println!("  Last import : {}", last.map(|d| d.to_string()).unwrap_or("—".into()));
            println!("─────────────────────────────────");
        }

        Command::Symbols => {
            let repo = Repository::open(&config.storage.db_path)?;
            let syms = repo.list_symbols()?;
            if syms.is_empty() {
                println!("No symbols — run `sheet-tickers sync` first.");
            } else {
                println!("{} symbols:", syms.len());
                for s in &syms {
                    println!("  {}", s);
                }
            }
        }

        Command::Migrate => {
            Repository::open(&config.storage.db_path)?.run_migrations()?;
            println!("Migrations applied.");
        }
    }

    Ok(())
}
