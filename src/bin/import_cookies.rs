//! Import the cookie taxonomy from a JSON document.
//!
//! Without `--file` the bundled default dataset is imported.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use dotenvy::dotenv;

use sulu_cookie_consent::db::{establish_connection_pool, run_migrations};
use sulu_cookie_consent::forms::import_export::ImportPayload;
use sulu_cookie_consent::models::config::ServerConfig;
use sulu_cookie_consent::repository::DieselRepository;
use sulu_cookie_consent::services::import_export::{EntryKind, import_taxonomy};

const DEFAULT_DATASET: &str = include_str!("../../resources/default-cookies.json");

#[derive(Parser)]
#[command(name = "import-cookies")]
#[command(about = "Import cookie categories and cookies from a JSON file")]
struct Cli {
    /// Overwrite existing categories and cookies
    #[arg(short, long)]
    force: bool,

    /// JSON file to import instead of the bundled defaults
    #[arg(long)]
    file: Option<PathBuf>,

    /// Database connection URL (defaults to the configured one)
    #[arg(long)]
    database_url: Option<String>,
}

fn main() -> ExitCode {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let json = match &cli.file {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                eprintln!("Cannot read {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => DEFAULT_DATASET.to_string(),
    };

    let payload = match ImportPayload::from_json(&json) {
        Ok(payload) => payload,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let database_url = match cli.database_url {
        Some(url) => url,
        None => match ServerConfig::load() {
            Ok(config) => config.database_url,
            Err(e) => {
                eprintln!("Failed to load configuration: {e}");
                return ExitCode::FAILURE;
            }
        },
    };

    let pool = match establish_connection_pool(&database_url) {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("Failed to establish database connection: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = run_migrations(&pool) {
        eprintln!("Failed to run database migrations: {e}");
        return ExitCode::FAILURE;
    }

    let repo = DieselRepository::new(pool);
    let report = match import_taxonomy(&payload, cli.force, &repo) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Import failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    for entry in &report.entries {
        let kind = match entry.kind {
            EntryKind::Category => "category",
            EntryKind::Cookie => "cookie",
        };
        match &entry.note {
            Some(note) => println!(
                "  {} {kind} {} ({note})",
                entry.action.tag(),
                entry.technical_name
            ),
            None => println!("  {} {kind} {}", entry.action.tag(), entry.technical_name),
        }
    }

    let stats = report.stats;
    println!();
    println!(
        "Categories: {} created, {} updated, {} skipped",
        stats.categories_created, stats.categories_updated, stats.categories_skipped
    );
    println!(
        "Cookies: {} created, {} updated, {} skipped",
        stats.cookies_created, stats.cookies_updated, stats.cookies_skipped
    );
    println!(
        "Cookie items: {} created, {} updated",
        stats.cookie_items_created, stats.cookie_items_updated
    );
    if !cli.force && (stats.categories_skipped > 0 || stats.cookies_skipped > 0) {
        println!("Existing entries were skipped; use --force to overwrite them.");
    }

    ExitCode::SUCCESS
}
