use actix_web::{
    delete, get, post,
    web::{self, Data},
    HttpResponse, Responder,
};
use serde::Deserialize;

use crate::{
    db::contacts,
    errors::AppError,
    routes::{created, message},
    session::AuthUser,
    utils::{non_blank, require},
    AppState,
};

#[derive(Deserialize)]
pub struct ContactForm {
    name: Option<String>,
    phone_number: Option<String>,
    email: Option<String>,
}

#[get("/contacts")]
pub async fn list_handler(user: AuthUser, state: Data<AppState>) -> Result<impl Responder, AppError> {
    let rows = contacts::list(&state.db_pool, user.user_id).await?;
    Ok(HttpResponse::Ok().json(rows))
}

#[post("/contacts")]
pub async fn create_handler(
    user: AuthUser,
    web::Json(form): web::Json<ContactForm>,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    const REQUIRED: &str = "Name and phone number are required";
    let name = require(form.name, REQUIRED)?;
    let phone_number = require(form.phone_number, REQUIRED)?;
    let email = non_blank(form.email);

    let id = contacts::insert(
        &state.db_pool,
        user.user_id,
        &name,
        &phone_number,
        email.as_deref(),
    )
    .await?;
    Ok(created("Contact added successfully", id))
}

#[delete("/contacts/{id}")]
pub async fn delete_handler(
    user: AuthUser,
    path: web::Path<i64>,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    if !contacts::delete(&state.db_pool, user.user_id, path.into_inner()).await? {
        return Err(AppError::NotFound("Contact not found".to_owned()));
    }
    Ok(HttpResponse::Ok().json(message("Contact deleted successfully")))
}
