//! Bearer session tokens: issuing, validating and revoking them, plus the
//! `AuthUser` extractor every protected handler takes.

use std::collections::HashMap;

use actix_utils::future::{ready, Ready};
use actix_web::{dev::Payload, http::header, web::Data, FromRequest, HttpRequest};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{errors::AppError, AppState};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    /// Unique per token, used for revocation.
    pub jti: String,
}

pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl_secs: i64) -> Result<Self, AppError> {
        let ttl = Duration::try_seconds(ttl_secs).ok_or_else(|| {
            AppError::ConfigError(format!("token lifetime of {ttl_secs}s is out of range"))
        })?;
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        })
    }

    pub fn issue(&self, user_id: i64) -> Result<String, AppError> {
        let now = Utc::now();
        let expires = now.checked_add_signed(self.ttl).ok_or_else(|| {
            log::error!("Token expiry overflows for a lifetime of {}", self.ttl);
            AppError::InternalServerError
        })?;
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: expires.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?)
    }

    pub fn validate(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                log::debug!("Rejected session token: {}", e);
                AppError::Unauthorized("Invalid or expired token".to_owned())
            })
    }
}

/// Token ids that were logged out before they expired. Entries are dropped
/// once the token would have expired anyway.
#[derive(Default)]
pub struct RevocationRegistry {
    revoked: Mutex<HashMap<String, i64>>,
}

impl RevocationRegistry {
    pub fn revoke(&self, jti: &str, expires_at: i64) {
        let mut revoked = self.revoked.lock();
        prune(&mut revoked, Utc::now().timestamp());
        revoked.insert(jti.to_owned(), expires_at);
    }

    pub fn is_revoked(&self, jti: &str) -> bool {
        let mut revoked = self.revoked.lock();
        prune(&mut revoked, Utc::now().timestamp());
        revoked.contains_key(jti)
    }

    pub fn len(&self) -> usize {
        self.revoked.lock().len()
    }
}

fn prune(revoked: &mut HashMap<String, i64>, now: i64) {
    revoked.retain(|_, expires_at| *expires_at > now);
}

/// The authenticated caller, resolved from the `Authorization: Bearer` header.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub claims: Claims,
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthUser, AppError> {
    let state = req.app_data::<Data<AppState>>().ok_or_else(|| {
        log::error!("AppState is not registered on the app");
        AppError::InternalServerError
    })?;

    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_owned()))?;

    let claims = state.tokens.validate(token)?;
    if state.revoked.is_revoked(&claims.jti) {
        return Err(AppError::Unauthorized("Token has been revoked".to_owned()));
    }
    let user_id = claims
        .sub
        .parse::<i64>()
        .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_owned()))?;

    Ok(AuthUser { user_id, claims })
}
