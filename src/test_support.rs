//! Shared fixtures for handler tests: an in-memory database, a fake SMS
//! gateway and a shortcut for getting a logged-in user.

use std::{str::FromStr, sync::Arc};

use async_trait::async_trait;
use parking_lot::Mutex;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

use crate::{
    config::Config, db, errors::AppError, sms::SmsGateway, utils::hash_password, AppState,
};

/// Records every message instead of sending it; optionally fails.
#[derive(Default)]
pub struct RecordingSms {
    pub sent: Mutex<Vec<(String, String)>>,
    pub fail: bool,
}

impl RecordingSms {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// The six digit code from the most recent message to `number`.
    pub fn last_code_for(&self, number: &str) -> Option<String> {
        self.sent
            .lock()
            .iter()
            .rev()
            .find(|(to, _)| to == number)
            .and_then(|(_, text)| text.rsplit(' ').next().map(str::to_owned))
    }
}

#[async_trait]
impl SmsGateway for RecordingSms {
    async fn send(&self, number: &str, message: &str) -> Result<(), AppError> {
        if self.fail {
            return Err(AppError::Dependency("Failed to send OTP".to_owned()));
        }
        self.sent
            .lock()
            .push((number.to_owned(), message.to_owned()));
        Ok(())
    }
}

pub fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "JWT_SECRET" => Some("test-secret".to_owned()),
        "SMS_API_KEY" => Some("test-key".to_owned()),
        _ => None,
    })
    .expect("test config")
}

pub async fn memory_pool() -> SqlitePool {
    let opts = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("memory url")
        .foreign_keys(true);
    // a single connection that never recycles keeps the in-memory database alive
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(opts)
        .await
        .expect("memory pool");
    db::migrate(&pool).await.expect("migrations");
    pool
}

pub async fn test_state(sms: Arc<RecordingSms>) -> AppState {
    AppState::new(&test_config(), memory_pool().await, sms).expect("state")
}

/// Creates a user directly in the database and returns (id, bearer header value).
pub async fn logged_in_user(state: &AppState, username: &str, mobile: &str) -> (i64, String) {
    let hash = hash_password("password123").expect("hash");
    let user = db::users::create_user(&state.db_pool, username, mobile, &hash)
        .await
        .expect("user");
    let token = state.tokens.issue(user.id).expect("token");
    (user.id, format!("Bearer {token}"))
}

/// Sends a `TestRequest` to an initialised service and returns
/// `(status, json body)`.
macro_rules! send {
    ($app:expr, $req:expr) => {{
        let resp = actix_web::test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let body: serde_json::Value = actix_web::test::read_body_json(resp).await;
        (status, body)
    }};
}

pub(crate) use send;
