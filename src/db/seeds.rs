use sqlx::SqlitePool;

use crate::{errors::AppError, structs::Seed};

pub struct NewSeed<'a> {
    pub name: &'a str,
    pub price: f64,
    pub quality: &'a str,
    pub vendor: &'a str,
    pub vendor_url: Option<&'a str>,
}

pub async fn list(pool: &SqlitePool, owner: i64) -> Result<Vec<Seed>, AppError> {
    let rows = sqlx::query_as::<_, Seed>(
        "SELECT id, name, price, quality, vendor, vendor_url FROM seeds WHERE user_id = ? ORDER BY id",
    )
    .bind(owner)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn insert(pool: &SqlitePool, owner: i64, seed: NewSeed<'_>) -> Result<i64, AppError> {
    let id = sqlx::query_scalar(
        "INSERT INTO seeds (name, price, quality, vendor, vendor_url, user_id) \
         VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(seed.name)
    .bind(seed.price)
    .bind(seed.quality)
    .bind(seed.vendor)
    .bind(seed.vendor_url)
    .bind(owner)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

pub async fn delete(pool: &SqlitePool, owner: i64, id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM seeds WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(owner)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
