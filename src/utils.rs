use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::NaiveDate;
use rand::Rng;

use crate::errors::AppError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn hash_password(password: &str) -> Result<String, AppError> {
    Argon2::default()
        .hash_password(password.as_bytes(), &SaltString::generate(&mut OsRng))
        .map(|hash| hash.to_string())
        .map_err(|e| {
            log::error!("Failed to hash password: {}", e);
            AppError::PasswordError(e.to_string())
        })
}

/// A stored hash that cannot be parsed never verifies.
pub fn verify_password(provided: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(provided.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            log::warn!("Stored password hash is malformed: {}", e);
            false
        }
    }
}

/// Six digit numeric reset code.
pub fn generate_otp() -> String {
    rand::rng().random_range(100_000..=999_999u32).to_string()
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| AppError::Validation("Invalid date format. Use YYYY-MM-DD.".to_owned()))
}

/// Trimmed text, with blank input treated as absent.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

pub fn require(value: Option<String>, message: &str) -> Result<String, AppError> {
    non_blank(value).ok_or_else(|| AppError::Validation(message.to_owned()))
}

pub fn require_positive(value: Option<f64>, message: &str) -> Result<f64, AppError> {
    value
        .filter(|v| v.is_finite() && *v > 0.0)
        .ok_or_else(|| AppError::Validation(message.to_owned()))
}
