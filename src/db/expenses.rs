use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::{errors::AppError, structs::Expense};

pub struct NewExpense<'a> {
    pub name: &'a str,
    pub amount: f64,
    pub date: NaiveDate,
    pub category: Option<&'a str>,
}

pub async fn list(pool: &SqlitePool, owner: i64) -> Result<Vec<Expense>, AppError> {
    let rows = sqlx::query_as::<_, Expense>(
        "SELECT id, name, amount, date, category, settled FROM expenses WHERE user_id = ? ORDER BY id",
    )
    .bind(owner)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn insert(pool: &SqlitePool, owner: i64, expense: NewExpense<'_>) -> Result<i64, AppError> {
    let id = sqlx::query_scalar(
        "INSERT INTO expenses (name, amount, date, category, settled, user_id) \
         VALUES (?, ?, ?, ?, 0, ?) RETURNING id",
    )
    .bind(expense.name)
    .bind(expense.amount)
    .bind(expense.date)
    .bind(expense.category)
    .bind(owner)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

/// Marks the expense settled. Settling twice is not an error; SQLite counts
/// the matched row either way.
pub async fn settle(pool: &SqlitePool, owner: i64, id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("UPDATE expenses SET settled = 1 WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(owner)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete(pool: &SqlitePool, owner: i64, id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM expenses WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(owner)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
