use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::{errors::AppError, structs::Attendance};

pub async fn list(pool: &SqlitePool, owner: i64) -> Result<Vec<Attendance>, AppError> {
    let rows = sqlx::query_as::<_, Attendance>(
        "SELECT id, worker_name, attendance_date, notes FROM attendance WHERE user_id = ? ORDER BY id",
    )
    .bind(owner)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn insert(
    pool: &SqlitePool,
    owner: i64,
    worker_name: &str,
    attendance_date: NaiveDate,
    notes: Option<&str>,
) -> Result<i64, AppError> {
    let id = sqlx::query_scalar(
        "INSERT INTO attendance (worker_name, attendance_date, notes, user_id) VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(worker_name)
    .bind(attendance_date)
    .bind(notes)
    .bind(owner)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

/// Returns false when no row with this id belongs to `owner`.
pub async fn delete(pool: &SqlitePool, owner: i64, id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM attendance WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(owner)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
