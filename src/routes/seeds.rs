use actix_web::{
    delete, get, post,
    web::{self, Data},
    HttpResponse, Responder,
};
use serde::Deserialize;

use crate::{
    db::seeds::{self, NewSeed},
    errors::AppError,
    routes::{created, message},
    session::AuthUser,
    utils::{non_blank, require, require_positive},
    AppState,
};

#[derive(Deserialize)]
pub struct SeedForm {
    name: Option<String>,
    price: Option<f64>,
    quality: Option<String>,
    vendor: Option<String>,
    vendor_url: Option<String>,
}

#[get("/seeds")]
pub async fn list_handler(user: AuthUser, state: Data<AppState>) -> Result<impl Responder, AppError> {
    let rows = seeds::list(&state.db_pool, user.user_id).await?;
    Ok(HttpResponse::Ok().json(rows))
}

#[post("/seeds")]
pub async fn create_handler(
    user: AuthUser,
    web::Json(form): web::Json<SeedForm>,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    const REQUIRED: &str = "name, price, quality and vendor are required";
    let name = require(form.name, REQUIRED)?;
    let price = require_positive(form.price, REQUIRED)?;
    let quality = require(form.quality, REQUIRED)?;
    let vendor = require(form.vendor, REQUIRED)?;
    let vendor_url = non_blank(form.vendor_url);

    let id = seeds::insert(
        &state.db_pool,
        user.user_id,
        NewSeed {
            name: &name,
            price,
            quality: &quality,
            vendor: &vendor,
            vendor_url: vendor_url.as_deref(),
        },
    )
    .await?;
    Ok(created("Seed added successfully", id))
}

#[delete("/seeds/{id}")]
pub async fn delete_handler(
    user: AuthUser,
    path: web::Path<i64>,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    if !seeds::delete(&state.db_pool, user.user_id, path.into_inner()).await? {
        return Err(AppError::NotFound("Seed not found".to_owned()));
    }
    Ok(HttpResponse::Ok().json(message("Seed deleted successfully")))
}
