use actix_web::{
    delete, get, post,
    web::{self, Data},
    HttpResponse, Responder,
};
use chrono::Utc;
use serde::Deserialize;

use crate::{
    db::attendance,
    errors::AppError,
    routes::{created, message},
    session::AuthUser,
    utils::{non_blank, parse_date, require},
    AppState,
};

#[derive(Deserialize)]
pub struct NewAttendance {
    worker_name: Option<String>,
    /// Defaults to today (UTC) when omitted.
    attendance_date: Option<String>,
    notes: Option<String>,
}

#[get("/attendance")]
pub async fn list_handler(user: AuthUser, state: Data<AppState>) -> Result<impl Responder, AppError> {
    let rows = attendance::list(&state.db_pool, user.user_id).await?;
    Ok(HttpResponse::Ok().json(rows))
}

#[post("/attendance")]
pub async fn create_handler(
    user: AuthUser,
    web::Json(form): web::Json<NewAttendance>,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    let worker_name = require(form.worker_name, "worker_name is required")?;
    let attendance_date = match non_blank(form.attendance_date) {
        Some(raw) => parse_date(&raw)?,
        None => Utc::now().date_naive(),
    };
    let notes = non_blank(form.notes);

    let id = attendance::insert(
        &state.db_pool,
        user.user_id,
        &worker_name,
        attendance_date,
        notes.as_deref(),
    )
    .await?;
    Ok(created("Attendance added successfully", id))
}

#[delete("/attendance/{id}")]
pub async fn delete_handler(
    user: AuthUser,
    path: web::Path<i64>,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    let id = path.into_inner();
    if !attendance::delete(&state.db_pool, user.user_id, id).await? {
        return Err(AppError::NotFound("Attendance record not found".to_owned()));
    }
    log::info!("Attendance record {} deleted by user ID {}", id, user.user_id);
    Ok(HttpResponse::Ok().json(message("Attendance record deleted successfully")))
}
