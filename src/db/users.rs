use sqlx::SqlitePool;

use crate::{errors::AppError, structs::User};

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_by_mobile(pool: &SqlitePool, mobile_number: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE mobile_number = ?")
        .bind(mobile_number)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn exists(pool: &SqlitePool, username: &str, mobile_number: &str) -> Result<bool, AppError> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ? OR mobile_number = ?")
            .bind(username)
            .bind(mobile_number)
            .fetch_one(pool)
            .await?;
    Ok(count > 0)
}

/// Inserts a user. A concurrent registration that wins the unique index
/// surfaces as a conflict, same as the up-front check.
pub async fn create_user(
    pool: &SqlitePool,
    username: &str,
    mobile_number: &str,
    pwd_hash: &str,
) -> Result<User, AppError> {
    let created_at = chrono::Utc::now().to_rfc3339();
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (username, mobile_number, pwd_hash, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?) RETURNING *",
    )
    .bind(username)
    .bind(mobile_number)
    .bind(pwd_hash)
    .bind(&created_at)
    .bind(&created_at)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict("User already exists".to_owned())
        }
        other => AppError::SqlxError(other),
    })?;
    log::info!("User created: id={} username={}", user.id, user.username);
    Ok(user)
}

pub async fn set_reset_otp(pool: &SqlitePool, id: i64, otp: &str) -> Result<(), AppError> {
    sqlx::query("UPDATE users SET reset_otp = ?, updated_at = ? WHERE id = ?")
        .bind(otp)
        .bind(chrono::Utc::now().to_rfc3339())
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Replaces the password hash and clears any pending reset code.
pub async fn reset_password(pool: &SqlitePool, id: i64, pwd_hash: &str) -> Result<(), AppError> {
    sqlx::query("UPDATE users SET pwd_hash = ?, reset_otp = NULL, updated_at = ? WHERE id = ?")
        .bind(pwd_hash)
        .bind(chrono::Utc::now().to_rfc3339())
        .bind(id)
        .execute(pool)
        .await?;
    log::info!("Password reset for user ID: {}", id);
    Ok(())
}
