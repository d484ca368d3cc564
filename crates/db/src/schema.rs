use eyre::Result;
use sqlx::{Pool, Sqlite};
use tracing::info;

const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS available_slots (
        date TEXT NOT NULL,
        time_range TEXT NOT NULL,
        PRIMARY KEY (date, time_range)
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS bookings (
        id TEXT PRIMARY KEY,
        date TEXT NOT NULL,
        time_range TEXT NOT NULL,
        name TEXT NOT NULL,
        phone TEXT NOT NULL,
        comment TEXT NOT NULL DEFAULT '',
        external_ref TEXT NULL UNIQUE,
        created_at TEXT NOT NULL
    );
    "#,
    "CREATE INDEX IF NOT EXISTS idx_bookings_date ON bookings(date);",
];

pub async fn initialize_database(pool: &Pool<Sqlite>) -> Result<()> {
    info!("Initializing database schema...");

    for statement in STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
