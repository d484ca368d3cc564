use color_eyre::eyre::{Result, WrapErr, eyre};
use dotenv::dotenv;
use studio_db::{
    backend::copy_documents, create_pool, json_file::JsonFileBackend, schema::initialize_database,
    sqlite::SqliteBackend,
};

const USAGE: &str = "usage: db-migrate [--import <json-data-dir>]";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Optional directory of legacy JSON documents to copy in
    let mut args = std::env::args().skip(1);
    let import_dir = match args.next().as_deref() {
        None => None,
        Some("--import") => Some(args.next().ok_or_else(|| eyre!(USAGE))?),
        Some(other) => return Err(eyre!("unexpected argument '{}'\n{}", other, USAGE)),
    };

    // Get database connection string from environment variable
    let database_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://studio.db".to_string());

    println!("Connecting to database...");
    let db_pool = create_pool(&database_url).await?;

    // Initialize database schema
    println!("Initializing database schema...");
    initialize_database(&db_pool).await?;
    println!("Database schema initialized successfully.");

    if let Some(dir) = import_dir {
        println!("Importing JSON documents from {}...", dir);
        let source = JsonFileBackend::new(&dir);
        let target = SqliteBackend::new(db_pool);
        let (dates, bookings) = copy_documents(&source, &target)
            .await
            .wrap_err_with(|| format!("Failed to import {}", dir))?;
        println!("Imported {} declared dates and {} bookings.", dates, bookings);
    }

    Ok(())
}
