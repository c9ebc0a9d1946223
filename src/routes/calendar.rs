//! Calendar reminders. Unlike the other resources, update and delete take the
//! event id in the JSON body on the collection path.

use actix_web::{
    delete, get, post, put,
    web::{self, Data},
    HttpResponse, Responder,
};
use serde::Deserialize;

use crate::{
    db::calendar,
    errors::AppError,
    routes::{created, message},
    session::AuthUser,
    utils::{parse_date, require},
    AppState,
};

#[derive(Deserialize)]
pub struct EventForm {
    id: Option<i64>,
    date: Option<String>,
    description: Option<String>,
}

#[derive(Deserialize)]
pub struct EventId {
    id: Option<i64>,
}

fn not_found() -> AppError {
    AppError::NotFound("Calendar event not found".to_owned())
}

#[get("/calendar")]
pub async fn list_handler(user: AuthUser, state: Data<AppState>) -> Result<impl Responder, AppError> {
    let events = calendar::list(&state.db_pool, user.user_id).await?;
    Ok(HttpResponse::Ok().json(events))
}

#[post("/calendar")]
pub async fn create_handler(
    user: AuthUser,
    web::Json(form): web::Json<EventForm>,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    const REQUIRED: &str = "Date and description are required";
    let date = parse_date(&require(form.date, REQUIRED)?)?;
    let description = require(form.description, REQUIRED)?;

    let id = calendar::insert(&state.db_pool, user.user_id, date, &description).await?;
    Ok(created("Calendar event added successfully", id))
}

#[put("/calendar")]
pub async fn update_handler(
    user: AuthUser,
    web::Json(form): web::Json<EventForm>,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    const REQUIRED: &str = "ID, date, and description are required";
    let id = form
        .id
        .ok_or_else(|| AppError::Validation(REQUIRED.to_owned()))?;
    let date = parse_date(&require(form.date, REQUIRED)?)?;
    let description = require(form.description, REQUIRED)?;

    if !calendar::update(&state.db_pool, user.user_id, id, date, &description).await? {
        return Err(not_found());
    }
    Ok(HttpResponse::Ok().json(message("Calendar event updated successfully")))
}

#[delete("/calendar")]
pub async fn delete_handler(
    user: AuthUser,
    web::Json(form): web::Json<EventId>,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    let id = form
        .id
        .ok_or_else(|| AppError::Validation("ID is required".to_owned()))?;
    if !calendar::delete(&state.db_pool, user.user_id, id).await? {
        return Err(not_found());
    }
    Ok(HttpResponse::Ok().json(message("Calendar event deleted successfully")))
}
