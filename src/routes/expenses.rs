use actix_web::{
    delete, get, post, put,
    web::{self, Data},
    HttpResponse, Responder,
};
use serde::Deserialize;

use crate::{
    db::expenses::{self, NewExpense},
    errors::AppError,
    routes::{created, message},
    session::AuthUser,
    utils::{non_blank, parse_date, require, require_positive},
    AppState,
};

#[derive(Deserialize)]
pub struct ExpenseForm {
    name: Option<String>,
    amount: Option<f64>,
    date: Option<String>,
    category: Option<String>,
}

#[derive(Deserialize)]
pub struct SettleForm {
    id: Option<i64>,
}

#[get("/expenses")]
pub async fn list_handler(user: AuthUser, state: Data<AppState>) -> Result<impl Responder, AppError> {
    let rows = expenses::list(&state.db_pool, user.user_id).await?;
    Ok(HttpResponse::Ok().json(rows))
}

#[post("/expenses")]
pub async fn create_handler(
    user: AuthUser,
    web::Json(form): web::Json<ExpenseForm>,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    const REQUIRED: &str = "Name, amount, and date are required";
    let name = require(form.name, REQUIRED)?;
    let amount = require_positive(form.amount, REQUIRED)?;
    let date = parse_date(&require(form.date, REQUIRED)?)?;
    let category = non_blank(form.category);

    let id = expenses::insert(
        &state.db_pool,
        user.user_id,
        NewExpense {
            name: &name,
            amount,
            date,
            category: category.as_deref(),
        },
    )
    .await?;
    Ok(created("Expense added successfully", id))
}

#[put("/expenses/settle")]
pub async fn settle_handler(
    user: AuthUser,
    web::Json(form): web::Json<SettleForm>,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    let id = form
        .id
        .ok_or_else(|| AppError::Validation("Expense ID is required".to_owned()))?;
    if !expenses::settle(&state.db_pool, user.user_id, id).await? {
        return Err(AppError::NotFound("Expense not found".to_owned()));
    }
    Ok(HttpResponse::Ok().json(message("Expense settled successfully")))
}

#[delete("/expenses/{id}")]
pub async fn delete_handler(
    user: AuthUser,
    path: web::Path<i64>,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    if !expenses::delete(&state.db_pool, user.user_id, path.into_inner()).await? {
        return Err(AppError::NotFound("Expense not found".to_owned()));
    }
    Ok(HttpResponse::Ok().json(message("Expense deleted successfully")))
}
