use std::{env, fmt::Display, str::FromStr, time::Duration};

use crate::errors::AppError;

pub const DEFAULT_SMS_API_URL: &str = "https://www.fast2sms.com/dev/bulkV2";

/// One year.
pub const MAX_TOKEN_TTL_SECS: i64 = 31_536_000;

#[derive(Clone)]
pub struct SmsConfig {
    pub api_url: String,
    pub api_key: String,
    pub sender_id: String,
    pub timeout: Duration,
}

/// Runtime settings, read once at startup from the environment (and `.env`).
pub struct Config {
    pub database_url: String,
    pub bind_address: String,
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
    pub otp_rate_limit_per_minute: u32,
    /// Origins allowed by CORS; empty means any origin.
    pub cors_allowed_origins: Vec<String>,
    pub sms: SmsConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://farmstead.db".to_owned()),
            bind_address: lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0".to_owned()),
            port: parsed(&lookup, "PORT", 5000)?,
            jwt_secret: required(&lookup, "JWT_SECRET")?,
            token_ttl_secs: token_ttl(&lookup)?,
            otp_rate_limit_per_minute: parsed(&lookup, "OTP_RATE_LIMIT_PER_MINUTE", 5)?,
            cors_allowed_origins: origins(&lookup),
            sms: SmsConfig {
                api_url: lookup("SMS_API_URL").unwrap_or_else(|| DEFAULT_SMS_API_URL.to_owned()),
                api_key: required(&lookup, "SMS_API_KEY")?,
                sender_id: lookup("SMS_SENDER_ID").unwrap_or_else(|| "FSTSMS".to_owned()),
                timeout: Duration::from_secs(parsed(&lookup, "SMS_TIMEOUT_SECS", 10)?),
            },
        })
    }
}

fn token_ttl<F>(lookup: &F) -> Result<i64, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let ttl = parsed(lookup, "TOKEN_TTL_SECS", 3600)?;
    if !(1..=MAX_TOKEN_TTL_SECS).contains(&ttl) {
        log::error!("FATAL: TOKEN_TTL_SECS must be between 1 and {MAX_TOKEN_TTL_SECS}");
        return Err(AppError::ConfigError(format!(
            "TOKEN_TTL_SECS {ttl} is outside 1..={MAX_TOKEN_TTL_SECS}"
        )));
    }
    Ok(ttl)
}

/// Comma separated; `*` or an unset variable allows every origin.
fn origins<F>(lookup: &F) -> Vec<String>
where
    F: Fn(&str) -> Option<String>,
{
    let origins: Vec<String> = lookup("CORS_ALLOWED_ORIGINS")
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_owned)
        .collect();
    if origins.iter().any(|origin| origin == "*") {
        return Vec::new();
    }
    origins
}

fn required<F>(lookup: &F, key: &str) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| {
            log::error!("FATAL: {key} environment variable not set");
            AppError::ConfigError(format!("{key} must be set"))
        })
}

fn parsed<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        None => {
            log::info!("{key} not set, using default: {default}");
            Ok(default)
        }
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::ConfigError(format!("invalid {key} value {raw:?}: {e}"))),
    }
}
