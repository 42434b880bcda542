use axum::{
    body::Body,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Request, StatusCode,
    },
    Router,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt; // for `oneshot`

use crate::{
    db::{create_pool, run_migrations, seed_demo_data},
    routes::create_router,
    state::{AppState, Config, JwtSettings},
    todo::TodoPriority,
};

pub(crate) fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        jwt: JwtSettings {
            secret: "SuperSecretKeyForTesting123456789!".to_string(),
            issuer: "TodoApp.API".to_string(),
            audience: "TodoApp.Client".to_string(),
            expiration_hours: 8,
        },
        bcrypt_cost: 4,
        cors_origin: "http://localhost:4200".to_string(),
        seed_demo_data: true,
        notification_sweep_cron: "0 */15 * * * *".to_string(),
    }
}

pub(crate) async fn test_state() -> AppState {
    let config = test_config();
    let pool = create_pool(&config.database_url)
        .await
        .expect("Failed to create in-memory database");
    run_migrations(&pool).await.expect("Failed to run migrations");

    let state = AppState::new(pool, config);
    seed_demo_data(&state.user_repository, &state.todo_repository, 4)
        .await
        .expect("Failed to seed demo data");
    state
}

/// Serves a freshly seeded app on an ephemeral port; returns its base URL.
pub(crate) async fn spawn_server() -> String {
    let app = create_router(test_state().await);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

async fn setup_app() -> (Router, AppState) {
    let state = test_state().await;
    (create_router(state.clone()), state)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, json)
}

async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);

    body["data"]["token"].as_str().unwrap().to_string()
}

async fn admin_token(app: &Router) -> String {
    login(app, "admin@todoapp.com", "Admin123!").await
}

async fn user_token(app: &Router) -> String {
    login(app, "user@todoapp.com", "User123!").await
}

async fn create_todo(app: &Router, token: &str, body: Value) -> Value {
    let (status, body) = send(app, "POST", "/api/todos", Some(token), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
    body["data"].clone()
}

#[tokio::test]
async fn test_login_returns_token_and_user() {
    let (app, _) = setup_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "admin@todoapp.com", "password": "Admin123!" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Login successful");
    assert!(!body["data"]["token"].as_str().unwrap().is_empty());
    assert_eq!(body["data"]["user"]["email"], "admin@todoapp.com");
    assert_eq!(body["data"]["user"]["name"], "Administrator");
    assert!(body["data"]["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_login_failures_share_one_message() {
    let (app, _) = setup_app().await;

    let (wrong_status, wrong) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "admin@todoapp.com", "password": "nope" })),
    )
    .await;
    let (unknown_status, unknown) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "ghost@todoapp.com", "password": "Admin123!" })),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong, unknown);
    assert_eq!(wrong["success"], false);
    assert_eq!(wrong["data"], Value::Null);
}

#[tokio::test]
async fn test_login_with_malformed_input_is_validation_error() {
    let (app, _) = setup_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "not-an-email" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid input data");
    let errors: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert!(errors.iter().any(|e| e.starts_with("email:")));
    assert!(errors.iter().any(|e| e.starts_with("password:")));
}

#[tokio::test]
async fn test_login_email_is_trimmed() {
    let (app, _) = setup_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "  admin@todoapp.com ", "password": "Admin123!" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["user"]["email"], "admin@todoapp.com");
}

fn assert_bad_request(status: StatusCode, body: &Value, needle: &str) {
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid input data");
    assert_eq!(body["data"], Value::Null);
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert!(
        errors[0].as_str().unwrap().contains(needle),
        "expected `{}` in {}",
        needle,
        body
    );
}

#[tokio::test]
async fn test_wrongly_typed_body_fields_are_validation_errors() {
    let (app, _) = setup_app().await;
    let token = admin_token(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/todos",
        Some(&token),
        Some(json!({ "title": "x", "priority": "urgent" })),
    )
    .await;
    assert_bad_request(status, &body, "unknown variant `urgent`");

    let (status, body) = send(
        &app,
        "POST",
        "/api/todos",
        Some(&token),
        Some(json!({ "title": "x", "due_date": "tomorrow" })),
    )
    .await;
    assert_bad_request(status, &body, "due_date");

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": 5, "password": "Admin123!" })),
    )
    .await;
    assert_bad_request(status, &body, "email");
}

#[tokio::test]
async fn test_bad_path_and_query_are_validation_errors() {
    let (app, _) = setup_app().await;
    let token = admin_token(&app).await;

    let (status, body) = send(&app, "GET", "/api/todos/not-a-uuid", Some(&token), None).await;
    assert_bad_request(status, &body, "Invalid URL");

    let (status, body) = send(&app, "GET", "/api/todos?status=bogus", Some(&token), None).await;
    assert_bad_request(status, &body, "unknown variant `bogus`");
}

#[tokio::test]
async fn test_missing_content_type_is_validation_error() {
    let (app, _) = setup_app().await;
    let token = admin_token(&app).await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/todos")
        .header(AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(json!({ "title": "x" }).to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_bearer_scheme_is_case_insensitive() {
    let (app, _) = setup_app().await;
    let token = admin_token(&app).await;

    for scheme in ["bearer", "BEARER"] {
        let request = Request::builder()
            .uri("/api/auth/me")
            .header(AUTHORIZATION, format!("{} {}", scheme, token))
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "scheme {}", scheme);
    }

    let request = Request::builder()
        .uri("/api/auth/me")
        .header(AUTHORIZATION, format!("Basic {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_routes_require_valid_token() {
    let (app, _) = setup_app().await;

    let (status, body) = send(&app, "GET", "/api/todos", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let (status, _) = send(&app, "GET", "/api/auth/me", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_from_other_issuer_is_rejected() {
    let (app, state) = setup_app().await;
    let admin = state
        .user_repository
        .find_by_email("admin@todoapp.com")
        .await
        .unwrap()
        .unwrap();

    let mut foreign = state.config.jwt.clone();
    foreign.issuer = "SomeoneElse".to_string();
    let (token, _) =
        crate::auth::create_access_token(admin.id, &admin.email, &admin.name, &foreign).unwrap();

    let (status, _) = send(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_and_profile_update() {
    let (app, _) = setup_app().await;
    let token = user_token(&app).await;

    let (status, body) = send(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Test User");

    let (status, body) = send(
        &app,
        "PUT",
        "/api/auth/update-profile",
        Some(&token),
        Some(json!({ "name": "Renamed User" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Renamed User");
    assert_eq!(body["data"]["email"], "user@todoapp.com");

    let (status, body) = send(
        &app,
        "PUT",
        "/api/auth/update-profile",
        Some(&token),
        Some(json!({ "email": "admin@todoapp.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email is already in use");
}

#[tokio::test]
async fn test_change_password_flow() {
    let (app, _) = setup_app().await;
    let token = user_token(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/change-password",
        Some(&token),
        Some(json!({ "current_password": "wrong", "new_password": "Another1!" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Current password is incorrect");

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/change-password",
        Some(&token),
        Some(json!({ "current_password": "User123!", "new_password": "Another1!" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], true);

    login(&app, "user@todoapp.com", "Another1!").await;
}

#[tokio::test]
async fn test_todo_crud_round_trip() {
    let (app, _) = setup_app().await;
    let token = user_token(&app).await;

    let (_, body) = send(&app, "GET", "/api/todos", Some(&token), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    let todo = create_todo(
        &app,
        &token,
        json!({ "title": "Buy milk", "description": "2 litres", "priority": "low" }),
    )
    .await;
    assert_eq!(todo["title"], "Buy milk");
    assert_eq!(todo["priority"], "low");
    assert_eq!(todo["is_completed"], false);
    assert_eq!(todo["completed_at"], Value::Null);
    let id = todo["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, "GET", &format!("/api/todos/{}", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["description"], "2 litres");

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/todos/{}", id),
        Some(&token),
        Some(json!({ "title": "Buy oat milk" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Buy oat milk");
    assert_eq!(body["data"]["description"], "2 litres");
    assert_eq!(body["data"]["priority"], "low");

    let (status, body) = send(&app, "DELETE", &format!("/api/todos/{}", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (_, body) = send(&app, "GET", "/api/todos", Some(&token), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    let (status, body) = send(&app, "DELETE", &format!("/api/todos/{}", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Todo not found");
}

#[tokio::test]
async fn test_completion_toggles_completed_at() {
    let (app, _) = setup_app().await;
    let token = user_token(&app).await;
    let todo = create_todo(&app, &token, json!({ "title": "Finish" })).await;
    let uri = format!("/api/todos/{}", todo["id"].as_str().unwrap());

    let (_, body) = send(&app, "PUT", &uri, Some(&token), Some(json!({ "is_completed": true }))).await;
    assert_eq!(body["data"]["is_completed"], true);
    assert!(body["data"]["completed_at"].is_string());

    let (_, body) = send(&app, "PUT", &uri, Some(&token), Some(json!({ "is_completed": false }))).await;
    assert_eq!(body["data"]["is_completed"], false);
    assert_eq!(body["data"]["completed_at"], Value::Null);
}

#[tokio::test]
async fn test_create_todo_validation() {
    let (app, _) = setup_app().await;
    let token = user_token(&app).await;

    let (status, body) = send(&app, "POST", "/api/todos", Some(&token), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["errors"][0].as_str().unwrap().starts_with("title:"));

    let (status, _) = send(
        &app,
        "POST",
        "/api/todos",
        Some(&token),
        Some(json!({ "title": "x".repeat(201) })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cross_user_access_is_not_found() {
    let (app, _) = setup_app().await;
    let admin = admin_token(&app).await;
    let user = user_token(&app).await;

    let todo = create_todo(&app, &admin, json!({ "title": "Admin only" })).await;
    let uri = format!("/api/todos/{}", todo["id"].as_str().unwrap());

    let (status, _) = send(&app, "GET", &uri, Some(&user), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "PUT", &uri, Some(&user), Some(json!({ "title": "Mine" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "DELETE", &uri, Some(&user), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "GET", &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Admin only");
}

#[tokio::test]
async fn test_listing_filters_and_stats() {
    let (app, _) = setup_app().await;
    let token = user_token(&app).await;

    create_todo(&app, &token, json!({ "title": "Pay rent", "priority": "high" })).await;
    let groceries = create_todo(
        &app,
        &token,
        json!({ "title": "Groceries", "description": "milk and eggs", "priority": "low" }),
    )
    .await;
    send(
        &app,
        "PUT",
        &format!("/api/todos/{}", groceries["id"].as_str().unwrap()),
        Some(&token),
        Some(json!({ "is_completed": true })),
    )
    .await;

    let (_, body) = send(&app, "GET", "/api/todos", Some(&token), None).await;
    let titles: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Groceries", "Pay rent"]);

    let (_, body) = send(&app, "GET", "/api/todos?status=pending", Some(&token), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["title"], "Pay rent");

    let (_, body) = send(&app, "GET", "/api/todos?search=MILK", Some(&token), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (_, body) = send(&app, "GET", "/api/todos?priority=high", Some(&token), None).await;
    assert_eq!(body["data"][0]["title"], "Pay rent");

    let (status, body) = send(&app, "GET", "/api/todos/stats", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 2);
    assert_eq!(body["data"]["completed"], 1);
    assert_eq!(body["data"]["pending"], 1);
    assert_eq!(body["data"]["high_priority"], 1);
    assert_eq!(body["data"]["low_priority"], 1);
    assert_eq!(body["data"]["completion_rate"], 50.0);
}

#[tokio::test]
async fn test_notifications_flow() {
    let (app, _) = setup_app().await;
    let admin = admin_token(&app).await;
    let user = user_token(&app).await;

    for message in ["one", "two"] {
        let (status, body) = send(
            &app,
            "POST",
            "/api/notifications",
            Some(&admin),
            Some(json!({ "message": message, "type": "success" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["type"], "success");
    }
    send(
        &app,
        "POST",
        "/api/notifications",
        Some(&user),
        Some(json!({ "message": "user's" })),
    )
    .await;

    let (_, body) = send(&app, "GET", "/api/notifications", Some(&admin), None).await;
    let listed = body["data"].as_array().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0]["message"], "two");
    let first_id = listed[0]["id"].as_str().unwrap().to_string();

    let (_, body) = send(&app, "GET", "/api/notifications/unread-count", Some(&admin), None).await;
    assert_eq!(body["data"], 2);

    let mark_uri = format!("/api/notifications/{}/mark-read", first_id);
    let (status, _) = send(&app, "POST", &mark_uri, Some(&user), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, body) = send(&app, "POST", &mark_uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], true);

    let (_, body) = send(&app, "POST", "/api/notifications/mark-all-read", Some(&admin), None).await;
    assert_eq!(body["data"], 1);

    let (_, body) = send(&app, "GET", "/api/notifications/unread-count", Some(&admin), None).await;
    assert_eq!(body["data"], 0);
    let (_, body) = send(&app, "GET", "/api/notifications/unread-count", Some(&user), None).await;
    assert_eq!(body["data"], 1);
}

#[tokio::test]
async fn test_due_soon_sweep_notifies_once() {
    let (app, state) = setup_app().await;
    let token = user_token(&app).await;
    let user = state
        .user_repository
        .find_by_email("user@todoapp.com")
        .await
        .unwrap()
        .unwrap();

    let now = Utc::now();
    state
        .todo_repository
        .create(user.id, "Submit taxes", "", TodoPriority::High, Some(now + Duration::hours(5)))
        .await
        .unwrap();

    let first = state.notification_service.sweep_due_soon(now).await.unwrap();
    let second = state
        .notification_service
        .sweep_due_soon(now + Duration::minutes(15))
        .await
        .unwrap();
    assert_eq!(first, 1);
    assert_eq!(second, 0);

    let (_, body) = send(&app, "GET", "/api/notifications", Some(&token), None).await;
    let listed = body["data"].as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["type"], "warning");
    assert_eq!(listed[0]["message"], "Task 'Submit taxes' is due soon");
}

#[tokio::test]
async fn test_unknown_route_returns_envelope() {
    let (app, _) = setup_app().await;

    let (status, body) = send(&app, "GET", "/api/does-not-exist", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Resource not found");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let (app, _) = setup_app().await;

    let (status, body) = send(&app, "GET", "/api-docs/openapi.json", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"].get("/api/todos/{id}").is_some());
    assert!(body["paths"].get("/api/notifications/mark-all-read").is_some());
}
