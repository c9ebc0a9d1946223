use std::sync::LazyLock;

use actix_cors::Cors;
use actix_web::{
    dev::ResourceDef,
    get,
    web::{self, Data},
    HttpRequest, HttpResponse, Responder, ResponseError,
};
use serde_json::{json, Value};

use crate::{errors::AppError, session::AuthUser, AppState};

pub mod attendance;
pub mod auth;
pub mod calendar;
pub mod contacts;
pub mod expenses;
pub mod medicines;
pub mod seeds;

/// Registers shared state, extractor config and every route.
pub fn app(state: AppState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(Data::new(state))
            .app_data(json_config())
            .app_data(path_config());
        configure(cfg);
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::register_handler)
        .service(auth::login_handler)
        .service(auth::forgot_password_handler)
        .service(auth::verify_otp_handler)
        .service(auth::logout_handler)
        .service(protected_handler)
        .service(attendance::list_handler)
        .service(attendance::create_handler)
        .service(attendance::delete_handler)
        .service(seeds::list_handler)
        .service(seeds::create_handler)
        .service(seeds::delete_handler)
        .service(expenses::list_handler)
        .service(expenses::create_handler)
        .service(expenses::settle_handler)
        .service(expenses::delete_handler)
        .service(medicines::list_handler)
        .service(medicines::create_handler)
        .service(medicines::delete_handler)
        .service(calendar::list_handler)
        .service(calendar::create_handler)
        .service(calendar::update_handler)
        .service(calendar::delete_handler)
        .service(contacts::list_handler)
        .service(contacts::create_handler)
        .service(contacts::delete_handler);
}

/// Every path `configure` serves, for telling unknown paths from wrong methods.
static KNOWN_PATHS: LazyLock<Vec<ResourceDef>> = LazyLock::new(|| {
    [
        "/register",
        "/login",
        "/forgot-password",
        "/verify-otp",
        "/logout",
        "/protected",
        "/attendance",
        "/attendance/{id}",
        "/seeds",
        "/seeds/{id}",
        "/expenses",
        "/expenses/settle",
        "/expenses/{id}",
        "/medicines",
        "/medicines/{id}",
        "/calendar",
        "/contacts",
        "/contacts/{id}",
    ]
    .into_iter()
    .map(ResourceDef::new)
    .collect()
});

/// Cross-origin access for browser clients. An empty list allows any origin.
pub fn cors(allowed_origins: &[String]) -> Cors {
    let cors = if allowed_origins.is_empty() {
        Cors::default().allow_any_origin()
    } else {
        allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };
    cors.allow_any_method().allow_any_header().max_age(3600)
}

/// Malformed JSON bodies are validation errors like any other bad input.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::Validation(format!("Invalid request body: {err}")).into())
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|_err, _req| AppError::NotFound("Resource not found".to_owned()).into())
}

pub(crate) fn message(text: &str) -> Value {
    json!({ "message": text })
}

pub(crate) fn created(text: &str, id: i64) -> HttpResponse {
    HttpResponse::Created().json(json!({ "message": text, "id": id }))
}

#[get("/protected")]
pub async fn protected_handler(user: AuthUser) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "message": format!("Hello, user {}", user.user_id),
        "user_id": user.user_id,
    }))
}

/// Fallback for requests no route matched: 405 when the path is served
/// under another method, 404 otherwise.
pub async fn default_handler(req: HttpRequest) -> HttpResponse {
    if KNOWN_PATHS.iter().any(|def| def.is_match(req.path())) {
        HttpResponse::MethodNotAllowed().json(message("Method not allowed"))
    } else {
        AppError::NotFound("Not found".to_owned()).error_response()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{
        http::{header, Method, StatusCode},
        test, App,
    };
    use serde_json::json;

    use super::*;
    use crate::test_support::{send, test_state, RecordingSms};

    #[actix_web::test]
    async fn unknown_paths_are_not_found_for_every_method() {
        let state = test_state(Arc::new(RecordingSms::default())).await;
        let app = test::init_service(
            App::new()
                .configure(app(state))
                .default_service(web::to(default_handler)),
        )
        .await;

        for req in [
            test::TestRequest::get().uri("/nonexistent"),
            test::TestRequest::post().uri("/nonexistent").set_json(json!({})),
            test::TestRequest::put().uri("/nonexistent"),
            test::TestRequest::delete().uri("/weather/1"),
        ] {
            let (status, body) = send!(app, req);
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(body["message"], "Not found");
        }
    }

    #[actix_web::test]
    async fn wrong_method_on_a_known_path_is_not_allowed() {
        let state = test_state(Arc::new(RecordingSms::default())).await;
        let app = test::init_service(
            App::new()
                .configure(app(state))
                .default_service(web::to(default_handler)),
        )
        .await;

        for req in [
            test::TestRequest::get().uri("/login"),
            test::TestRequest::delete().uri("/seeds"),
            test::TestRequest::put().uri("/contacts/3"),
        ] {
            let (status, body) = send!(app, req);
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
            assert_eq!(body["message"], "Method not allowed");
        }
    }

    #[actix_web::test]
    async fn preflight_requests_get_cors_headers() {
        let state = test_state(Arc::new(RecordingSms::default())).await;
        let app = test::init_service(
            App::new()
                .wrap(cors(&[]))
                .configure(app(state))
                .default_service(web::to(default_handler)),
        )
        .await;

        let req = test::TestRequest::default()
            .method(Method::OPTIONS)
            .uri("/login")
            .insert_header((header::ORIGIN, "http://localhost:3000"))
            .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "POST"))
            .insert_header((header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_success());
        let headers = resp.headers();
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:3000"
        );
        assert!(headers.contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
    }

    #[actix_web::test]
    async fn only_configured_origins_are_allowed() {
        let state = test_state(Arc::new(RecordingSms::default())).await;
        let app = test::init_service(
            App::new()
                .wrap(cors(&["https://farm.example".to_owned()]))
                .configure(app(state))
                .default_service(web::to(default_handler)),
        )
        .await;

        let preflight = |origin: &'static str| {
            test::TestRequest::default()
                .method(Method::OPTIONS)
                .uri("/seeds")
                .insert_header((header::ORIGIN, origin))
                .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "GET"))
                .to_request()
        };

        let resp = test::call_service(&app, preflight("https://farm.example")).await;
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://farm.example"
        );

        let resp = test::call_service(&app, preflight("https://elsewhere.example")).await;
        assert!(!resp
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }
}
