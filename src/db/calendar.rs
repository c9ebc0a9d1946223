use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::{errors::AppError, structs::CalendarEvent};

pub async fn list(pool: &SqlitePool, owner: i64) -> Result<Vec<CalendarEvent>, AppError> {
    let rows = sqlx::query_as::<_, CalendarEvent>(
        "SELECT id, date, description FROM calendar_events WHERE user_id = ? ORDER BY date, id",
    )
    .bind(owner)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn insert(
    pool: &SqlitePool,
    owner: i64,
    date: NaiveDate,
    description: &str,
) -> Result<i64, AppError> {
    let id = sqlx::query_scalar(
        "INSERT INTO calendar_events (date, description, user_id) VALUES (?, ?, ?) RETURNING id",
    )
    .bind(date)
    .bind(description)
    .bind(owner)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

pub async fn update(
    pool: &SqlitePool,
    owner: i64,
    id: i64,
    date: NaiveDate,
    description: &str,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        "UPDATE calendar_events SET date = ?, description = ? WHERE id = ? AND user_id = ?",
    )
    .bind(date)
    .bind(description)
    .bind(id)
    .bind(owner)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete(pool: &SqlitePool, owner: i64, id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM calendar_events WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(owner)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
