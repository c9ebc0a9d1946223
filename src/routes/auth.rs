use std::net::{IpAddr, Ipv4Addr};

use actix_web::{
    post,
    web::{self, Data},
    HttpRequest, HttpResponse, Responder,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    db::users,
    errors::AppError,
    routes::message,
    session::AuthUser,
    utils::{generate_otp, hash_password, non_blank, verify_password},
    AppState,
};

#[derive(Deserialize)]
pub struct Register {
    username: Option<String>,
    mobile_number: Option<String>,
    password: Option<String>,
}

#[post("/register")]
pub async fn register_handler(
    web::Json(form): web::Json<Register>,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    let (Some(username), Some(mobile_number), Some(password)) = (
        non_blank(form.username),
        non_blank(form.mobile_number),
        form.password.filter(|p| !p.is_empty()),
    ) else {
        log::warn!("Registration rejected: missing required fields");
        return Err(AppError::Validation("All fields are required".to_owned()));
    };

    log::info!(
        "Received registration: username={}, mobile_number={}",
        username,
        mobile_number
    );

    if users::exists(&state.db_pool, &username, &mobile_number).await? {
        log::warn!("Registration rejected: user {} already exists", username);
        return Err(AppError::Conflict("User already exists".to_owned()));
    }

    let pwd_hash = hash_password(&password)?;
    users::create_user(&state.db_pool, &username, &mobile_number, &pwd_hash).await?;

    Ok(HttpResponse::Created().json(message("Registration successful")))
}

#[derive(Deserialize)]
pub struct Login {
    username: Option<String>,
    password: Option<String>,
}

#[post("/login")]
pub async fn login_handler(
    web::Json(form): web::Json<Login>,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    let username = non_blank(form.username).unwrap_or_default();
    let password = form.password.unwrap_or_default();

    match users::find_by_username(&state.db_pool, &username).await? {
        Some(user) if verify_password(&password, &user.pwd_hash) => {
            let token = state.tokens.issue(user.id)?;
            log::info!("User ID {} logged in", user.id);
            Ok(HttpResponse::Ok().json(json!({
                "message": "Login successful",
                "token": token,
            })))
        }
        _ => {
            log::warn!("Failed login attempt for username {:?}", username);
            Err(AppError::Unauthorized("Invalid credentials".to_owned()))
        }
    }
}

fn source_address(request: &HttpRequest) -> IpAddr {
    request
        .peer_addr()
        .map(|addr| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

#[derive(Deserialize)]
pub struct ForgotPassword {
    mobile_number: Option<String>,
}

#[post("/forgot-password")]
pub async fn forgot_password_handler(
    request: HttpRequest,
    web::Json(form): web::Json<ForgotPassword>,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.otp_limiter.check(source_address(&request))?;

    let mobile_number = non_blank(form.mobile_number)
        .ok_or_else(|| AppError::Validation("mobile_number is required".to_owned()))?;
    log::info!("Forgot password request for mobile number: {}", mobile_number);

    let user = users::find_by_mobile(&state.db_pool, &mobile_number)
        .await?
        .ok_or_else(|| {
            log::warn!("Mobile number {} not found", mobile_number);
            AppError::NotFound("Mobile number not found".to_owned())
        })?;

    let otp = generate_otp();
    state
        .sms
        .send(
            &mobile_number,
            &format!("Your OTP for password reset is: {otp}"),
        )
        .await?;

    // only a code the user actually received becomes valid
    users::set_reset_otp(&state.db_pool, user.id, &otp).await?;
    log::info!("Reset code stored for user ID {}", user.id);

    Ok(HttpResponse::Ok().json(message("OTP sent to your mobile number")))
}

/// Clients send the code either as a string or as a bare number.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum OtpCode {
    Text(String),
    Number(u64),
}

impl OtpCode {
    fn into_code(self) -> Option<String> {
        match self {
            OtpCode::Text(text) => non_blank(Some(text)),
            OtpCode::Number(number) => Some(number.to_string()),
        }
    }
}

#[derive(Deserialize)]
pub struct VerifyOtp {
    mobile_number: Option<String>,
    otp: Option<OtpCode>,
    new_password: Option<String>,
}

#[post("/verify-otp")]
pub async fn verify_otp_handler(
    request: HttpRequest,
    web::Json(form): web::Json<VerifyOtp>,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    // codes never expire, so guessing is bounded per address instead
    state.verify_limiter.check(source_address(&request))?;

    let (Some(mobile_number), Some(otp), Some(new_password)) = (
        non_blank(form.mobile_number),
        form.otp.and_then(OtpCode::into_code),
        form.new_password.filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::Validation(
            "mobile_number, otp and new_password are required".to_owned(),
        ));
    };

    let user = users::find_by_mobile(&state.db_pool, &mobile_number)
        .await?
        .ok_or_else(|| AppError::NotFound("Mobile number not found".to_owned()))?;

    if user.reset_otp.as_deref() != Some(otp.as_str()) {
        log::warn!("Invalid reset code submitted for user ID {}", user.id);
        return Err(AppError::Validation("Invalid OTP".to_owned()));
    }

    let pwd_hash = hash_password(&new_password)?;
    users::reset_password(&state.db_pool, user.id, &pwd_hash).await?;

    Ok(HttpResponse::Ok().json(message("Password reset successful")))
}

#[post("/logout")]
pub async fn logout_handler(user: AuthUser, state: Data<AppState>) -> impl Responder {
    state.revoked.revoke(&user.claims.jti, user.claims.exp);
    log::info!(
        "User ID {} logged out, {} token(s) currently revoked",
        user.user_id,
        state.revoked.len()
    );
    HttpResponse::Ok().json(message("Logout successful"))
}
