use sqlx::SqlitePool;

use crate::{errors::AppError, structs::Medicine};

pub struct NewMedicine<'a> {
    pub name: &'a str,
    pub quantity: i64,
    pub vendor: &'a str,
    pub vendor_url: Option<&'a str>,
}

pub async fn list(pool: &SqlitePool, owner: i64) -> Result<Vec<Medicine>, AppError> {
    let rows = sqlx::query_as::<_, Medicine>(
        "SELECT id, name, quantity, vendor, vendor_url FROM medicines WHERE user_id = ? ORDER BY id",
    )
    .bind(owner)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn insert(
    pool: &SqlitePool,
    owner: i64,
    medicine: NewMedicine<'_>,
) -> Result<i64, AppError> {
    let id = sqlx::query_scalar(
        "INSERT INTO medicines (name, quantity, vendor, vendor_url, user_id) \
         VALUES (?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(medicine.name)
    .bind(medicine.quantity)
    .bind(medicine.vendor)
    .bind(medicine.vendor_url)
    .bind(owner)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

pub async fn delete(pool: &SqlitePool, owner: i64, id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM medicines WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(owner)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
