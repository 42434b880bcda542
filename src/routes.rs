use crate::{
    auth::{
        auth_dto::{ChangePasswordRequest, LoginRequest, LoginResponse, UpdateProfileRequest},
        auth_handlers,
    },
    middleware::{auth_middleware, handle_panic},
    notification::{
        notification_dto::CreateNotificationRequest, notification_handlers, Notification,
        NotificationType,
    },
    response::ApiResponse,
    state::AppState,
    todo::{
        todo_dto::{CreateTodoRequest, UpdateTodoRequest},
        todo_handlers, StatusFilter, Todo, TodoPriority, TodoStats,
    },
    user::UserDto,
};
use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method, StatusCode,
    },
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        auth_handlers::login,
        auth_handlers::me,
        auth_handlers::update_profile,
        auth_handlers::change_password,
        todo_handlers::get_todos,
        todo_handlers::get_todo,
        todo_handlers::create_todo,
        todo_handlers::update_todo,
        todo_handlers::delete_todo,
        todo_handlers::get_stats,
        notification_handlers::get_notifications,
        notification_handlers::create_notification,
        notification_handlers::get_unread_count,
        notification_handlers::mark_notification_read,
        notification_handlers::mark_all_notifications_read,
    ),
    components(
        schemas(
            LoginRequest,
            LoginResponse,
            UpdateProfileRequest,
            ChangePasswordRequest,
            UserDto,
            CreateTodoRequest,
            UpdateTodoRequest,
            Todo,
            TodoPriority,
            TodoStats,
            StatusFilter,
            CreateNotificationRequest,
            Notification,
            NotificationType,
        )
    ),
    tags(
        (name = "auth", description = "Authentication and profile endpoints"),
        (name = "todos", description = "Todo management endpoints"),
        (name = "notifications", description = "Notification endpoints")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::Http::new(
                        utoipa::openapi::security::HttpAuthScheme::Bearer,
                    ),
                ),
            )
        }
    }
}

fn cors_layer(origin: &str) -> CorsLayer {
    let allow_origin = match origin.parse::<HeaderValue>() {
        Ok(value) => AllowOrigin::exact(value),
        Err(_) => {
            tracing::warn!("Ignoring unparsable CORS_ORIGIN: {}", origin);
            AllowOrigin::list(Vec::<HeaderValue>::new())
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT])
        .allow_credentials(true)
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::failure("Resource not found", Vec::new())),
    )
}

pub fn create_router(state: AppState) -> Router {
    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api_routes(&state));

    with_layers(router, state)
}

fn api_routes(state: &AppState) -> Router<AppState> {
    // Public routes (no auth required)
    let public_routes = Router::new().route("/auth/login", post(auth_handlers::login));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/auth/me", get(auth_handlers::me))
        .route("/auth/update-profile", put(auth_handlers::update_profile))
        .route("/auth/change-password", post(auth_handlers::change_password))
        .route(
            "/todos",
            get(todo_handlers::get_todos).post(todo_handlers::create_todo),
        )
        .route("/todos/stats", get(todo_handlers::get_stats))
        .route(
            "/todos/:id",
            get(todo_handlers::get_todo)
                .put(todo_handlers::update_todo)
                .delete(todo_handlers::delete_todo),
        )
        .route(
            "/notifications",
            get(notification_handlers::get_notifications)
                .post(notification_handlers::create_notification),
        )
        .route(
            "/notifications/unread-count",
            get(notification_handlers::get_unread_count),
        )
        .route(
            "/notifications/mark-all-read",
            post(notification_handlers::mark_all_notifications_read),
        )
        .route(
            "/notifications/:id/mark-read",
            post(notification_handlers::mark_notification_read),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new().merge(public_routes).merge(protected_routes)
}

/// Fallback and the outer middleware stack shared by every route.
fn with_layers(router: Router<AppState>, state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origin);

    router
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
