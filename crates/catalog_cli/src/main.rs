//! CLI smoke entry point.
//!
//! # Responsibility
//! - Own the database lifecycle: open, run one listing, close.
//! - Keep output deterministic for quick local sanity checks.

use catalog_core::db::open_db;
use catalog_core::{
    default_log_level, init_logging, PageRequest, ProductService, SqliteProductRepository,
};
use std::process::ExitCode;

const DEFAULT_DB_PATH: &str = "catalog.db";
const DEFAULT_LOG_DIR: &str = "logs";

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("catalog_cli error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let db_path = env_or("CATALOG_DB", DEFAULT_DB_PATH);
    let log_dir = env_or("CATALOG_LOG_DIR", DEFAULT_LOG_DIR);
    let log_level = env_or("CATALOG_LOG_LEVEL", default_log_level());

    init_logging(&log_level, &log_dir)?;

    let conn = open_db(&db_path).map_err(|err| format!("cannot open `{db_path}`: {err}"))?;

    {
        let repo = SqliteProductRepository::try_new(&conn).map_err(|err| err.to_string())?;
        let service = ProductService::new(repo);
        let page = service
            .find_all(PageRequest::default())
            .map_err(|err| err.to_string())?;

        println!("catalog_core version={}", catalog_core::core_version());
        println!(
            "products page={} limit={} total={} last_page={}",
            page.meta.page, page.meta.limit, page.meta.total_products, page.meta.last_page
        );
        for product in &page.data {
            println!(
                "  #{} {} price={} available={}",
                product.id, product.name, product.price, product.available
            );
        }
    }

    // All connection borrows end above; close reports flush failures instead
    // of dropping them on the floor.
    conn.close()
        .map_err(|(_conn, err)| format!("cannot close database: {err}"))?;

    Ok(())
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
