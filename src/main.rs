use std::sync::Arc;

use actix_web::{middleware, web, App, HttpServer};
use log::info;
use sqlx::SqlitePool;

mod config;
mod db;
mod errors;
mod rate_limit;
mod routes;
mod session;
mod sms;
mod structs;
mod utils;

#[cfg(test)]
mod test_support;

use config::Config;
use errors::AppError;
use rate_limit::AddressRateLimiter;
use session::{RevocationRegistry, TokenService};
use sms::{Fast2Sms, SmsGateway};

/// Everything a handler needs, injected through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    db_pool: SqlitePool,
    tokens: Arc<TokenService>,
    revoked: Arc<RevocationRegistry>,
    otp_limiter: Arc<AddressRateLimiter>,
    verify_limiter: Arc<AddressRateLimiter>,
    sms: Arc<dyn SmsGateway>,
}

impl AppState {
    pub fn new(
        config: &Config,
        db_pool: SqlitePool,
        sms: Arc<dyn SmsGateway>,
    ) -> Result<Self, AppError> {
        Ok(Self {
            db_pool,
            tokens: Arc::new(TokenService::new(&config.jwt_secret, config.token_ttl_secs)?),
            revoked: Arc::new(RevocationRegistry::default()),
            otp_limiter: Arc::new(AddressRateLimiter::per_minute(
                config.otp_rate_limit_per_minute,
            )),
            verify_limiter: Arc::new(AddressRateLimiter::per_minute(
                config.otp_rate_limit_per_minute,
            )),
            sms,
        })
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env()?;
    let db_pool = db::connect(&config.database_url).await?;
    let sms = Fast2Sms::new(config.sms.clone())?;
    let state = AppState::new(&config, db_pool, Arc::new(sms))?;
    let cors_origins = config.cors_allowed_origins.clone();

    info!(
        "Starting HTTP server on http://{}:{}/",
        config.bind_address, config.port
    );

    HttpServer::new(move || {
        App::new()
            // enable automatic response compression - usually register this first
            .wrap(middleware::Compress::default())
            .wrap(routes::cors(&cors_origins))
            // enable logger - always register Actix Web Logger middleware last
            .wrap(middleware::Logger::default())
            .configure(routes::app(state.clone()))
            .default_service(web::to(routes::default_handler))
    })
    .bind((config.bind_address.as_str(), config.port))?
    .run()
    .await
}
