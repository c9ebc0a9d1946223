use actix_web::{
    delete, get, post,
    web::{self, Data},
    HttpResponse, Responder,
};
use serde::Deserialize;

use crate::{
    db::medicines::{self, NewMedicine},
    errors::AppError,
    routes::{created, message},
    session::AuthUser,
    utils::{non_blank, require},
    AppState,
};

#[derive(Deserialize)]
pub struct MedicineForm {
    name: Option<String>,
    quantity: Option<i64>,
    vendor: Option<String>,
    vendor_url: Option<String>,
}

#[get("/medicines")]
pub async fn list_handler(user: AuthUser, state: Data<AppState>) -> Result<impl Responder, AppError> {
    let rows = medicines::list(&state.db_pool, user.user_id).await?;
    Ok(HttpResponse::Ok().json(rows))
}

#[post("/medicines")]
pub async fn create_handler(
    user: AuthUser,
    web::Json(form): web::Json<MedicineForm>,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    const REQUIRED: &str = "name, quantity and vendor are required";
    let name = require(form.name, REQUIRED)?;
    let quantity = form
        .quantity
        .filter(|q| *q > 0)
        .ok_or_else(|| AppError::Validation(REQUIRED.to_owned()))?;
    let vendor = require(form.vendor, REQUIRED)?;
    let vendor_url = non_blank(form.vendor_url);

    let id = medicines::insert(
        &state.db_pool,
        user.user_id,
        NewMedicine {
            name: &name,
            quantity,
            vendor: &vendor,
            vendor_url: vendor_url.as_deref(),
        },
    )
    .await?;
    Ok(created("Medicine added successfully", id))
}

#[delete("/medicines/{id}")]
pub async fn delete_handler(
    user: AuthUser,
    path: web::Path<i64>,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    if !medicines::delete(&state.db_pool, user.user_id, path.into_inner()).await? {
        return Err(AppError::NotFound("Medicine not found".to_owned()));
    }
    Ok(HttpResponse::Ok().json(message("Medicine deleted successfully")))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{http::StatusCode, test, App};
    use serde_json::json;

    use crate::{
        routes,
        test_support::{logged_in_user, send, test_state, RecordingSms},
    };

    #[actix_web::test]
    async fn create_list_delete() {
        let state = test_state(Arc::new(RecordingSms::default())).await;
        let (_, auth) = logged_in_user(&state, "ravi", "+919000000001").await;
        let app = test::init_service(App::new().configure(routes::app(state))).await;

        let req = test::TestRequest::post()
            .uri("/medicines")
            .insert_header(("Authorization", auth.clone()))
            .set_json(json!({
                "name": "Neem oil",
                "quantity": 4,
                "vendor": "GreenLeaf",
                "vendor_url": "https://greenleaf.example/neem"
            }));
        let (status, body) = send!(app, req);
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Medicine added successfully");
        let id = body["id"].as_i64().unwrap();

        let req = test::TestRequest::get()
            .uri("/medicines")
            .insert_header(("Authorization", auth.clone()));
        let (_, body) = send!(app, req);
        assert_eq!(
            body,
            json!([{
                "id": id,
                "name": "Neem oil",
                "quantity": 4,
                "vendor": "GreenLeaf",
                "vendor_url": "https://greenleaf.example/neem"
            }])
        );

        let req = test::TestRequest::delete()
            .uri(&format!("/medicines/{id}"))
            .insert_header(("Authorization", auth.clone()));
        let (status, _) = send!(app, req);
        assert_eq!(status, StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/medicines")
            .insert_header(("Authorization", auth));
        let (_, body) = send!(app, req);
        assert_eq!(body, json!([]));
    }

    #[actix_web::test]
    async fn quantity_must_be_a_positive_integer() {
        let state = test_state(Arc::new(RecordingSms::default())).await;
        let (_, auth) = logged_in_user(&state, "ravi", "+919000000001").await;
        let app = test::init_service(App::new().configure(routes::app(state))).await;

        for quantity in [json!(0), json!(-3), json!(2.5), json!(null)] {
            let req = test::TestRequest::post()
                .uri("/medicines")
                .insert_header(("Authorization", auth.clone()))
                .set_json(json!({ "name": "Neem oil", "quantity": quantity, "vendor": "GreenLeaf" }));
            let (status, _) = send!(app, req);
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
    }

    #[actix_web::test]
    async fn deleting_someone_elses_medicine_is_not_found() {
        let state = test_state(Arc::new(RecordingSms::default())).await;
        let (_, alice) = logged_in_user(&state, "alice", "+919000000001").await;
        let (_, bob) = logged_in_user(&state, "bob", "+919000000002").await;
        let app = test::init_service(App::new().configure(routes::app(state))).await;

        let req = test::TestRequest::post()
            .uri("/medicines")
            .insert_header(("Authorization", alice))
            .set_json(json!({ "name": "Sulphur", "quantity": 1, "vendor": "AgroCo" }));
        let (_, body) = send!(app, req);

        let req = test::TestRequest::delete()
            .uri(&format!("/medicines/{}", body["id"]))
            .insert_header(("Authorization", bob));
        let (status, body) = send!(app, req);
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Medicine not found");
    }
}
