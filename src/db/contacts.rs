use sqlx::SqlitePool;

use crate::{errors::AppError, structs::Contact};

pub async fn list(pool: &SqlitePool, owner: i64) -> Result<Vec<Contact>, AppError> {
    let rows = sqlx::query_as::<_, Contact>(
        "SELECT id, name, phone_number, email FROM contacts WHERE user_id = ? ORDER BY name, id",
    )
    .bind(owner)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn insert(
    pool: &SqlitePool,
    owner: i64,
    name: &str,
    phone_number: &str,
    email: Option<&str>,
) -> Result<i64, AppError> {
    let id = sqlx::query_scalar(
        "INSERT INTO contacts (name, phone_number, email, user_id) VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(name)
    .bind(phone_number)
    .bind(email)
    .bind(owner)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

pub async fn delete(pool: &SqlitePool, owner: i64, id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM contacts WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(owner)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
