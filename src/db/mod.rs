//! SQLite access. Every resource query takes the owner id and filters on it.

use std::{str::FromStr, time::Duration};

use log::info;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode},
    SqlitePool,
};

use crate::errors::AppError;

pub mod attendance;
pub mod calendar;
pub mod contacts;
pub mod expenses;
pub mod medicines;
pub mod seeds;
pub mod users;

pub async fn connect(database_url: &str) -> Result<SqlitePool, AppError> {
    let opts = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .read_only(false)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    let db_pool = SqlitePool::connect_with(opts).await?;
    migrate(&db_pool).await?;
    Ok(db_pool)
}

/// Creates any missing tables.
pub async fn migrate(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::migrate!().run(pool).await?;
    info!("Database migrated successfully");
    Ok(())
}
