use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use super::{
    todo_dto::{CreateTodoRequest, TodoFilters, UpdateTodoRequest},
    todo_models::{Todo, TodoStats},
};
use crate::{
    error::Result,
    extract::{AppJson, AppPath, AppQuery},
    middleware::AuthUser,
    response::{ok, ApiResponse},
    state::AppState,
};

/// Get all todos for the authenticated user
#[utoipa::path(
    get,
    path = "/api/todos",
    params(
        ("status" = Option<String>, Query, description = "all, completed or pending"),
        ("priority" = Option<String>, Query, description = "low, medium or high"),
        ("search" = Option<String>, Query, description = "Search by title or description")
    ),
    responses(
        (status = 200, description = "List of todos, newest first", body = [Todo]),
        (status = 401, description = "Unauthorized")
    ),
    tag = "todos",
    security(("bearer_auth" = []))
)]
pub async fn get_todos(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppQuery(filters): AppQuery<TodoFilters>,
) -> Result<Json<ApiResponse<Vec<Todo>>>> {
    let todos = state.todo_service.list(user_id, &filters).await?;
    Ok(ok(todos, "Todos retrieved successfully"))
}

/// Get a todo by ID
#[utoipa::path(
    get,
    path = "/api/todos/{id}",
    params(("id" = Uuid, Path, description = "Todo ID")),
    responses(
        (status = 200, description = "Todo found", body = Todo),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Todo not found")
    ),
    tag = "todos",
    security(("bearer_auth" = []))
)]
pub async fn get_todo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(todo_id): AppPath<Uuid>,
) -> Result<Json<ApiResponse<Todo>>> {
    let todo = state.todo_service.get(user_id, todo_id).await?;
    Ok(ok(todo, "Todo retrieved successfully"))
}

/// Create a new todo
#[utoipa::path(
    post,
    path = "/api/todos",
    request_body = CreateTodoRequest,
    responses(
        (status = 201, description = "Todo created", body = Todo),
        (status = 400, description = "Invalid input data"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "todos",
    security(("bearer_auth" = []))
)]
pub async fn create_todo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<CreateTodoRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Todo>>)> {
    payload.validate()?;

    let todo = state.todo_service.create(user_id, payload).await?;
    Ok((StatusCode::CREATED, ok(todo, "Todo created successfully")))
}

/// Update a todo; only supplied fields change
#[utoipa::path(
    put,
    path = "/api/todos/{id}",
    params(("id" = Uuid, Path, description = "Todo ID")),
    request_body = UpdateTodoRequest,
    responses(
        (status = 200, description = "Todo updated", body = Todo),
        (status = 400, description = "Invalid input data"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Todo not found")
    ),
    tag = "todos",
    security(("bearer_auth" = []))
)]
pub async fn update_todo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(todo_id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateTodoRequest>,
) -> Result<Json<ApiResponse<Todo>>> {
    payload.validate()?;

    let todo = state.todo_service.update(user_id, todo_id, payload).await?;
    Ok(ok(todo, "Todo updated successfully"))
}

/// Delete a todo
#[utoipa::path(
    delete,
    path = "/api/todos/{id}",
    params(("id" = Uuid, Path, description = "Todo ID")),
    responses(
        (status = 200, description = "Todo deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Todo not found")
    ),
    tag = "todos",
    security(("bearer_auth" = []))
)]
pub async fn delete_todo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(todo_id): AppPath<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    state.todo_service.delete(user_id, todo_id).await?;
    Ok(ok((), "Todo deleted successfully"))
}

/// Dashboard counts for the authenticated user
#[utoipa::path(
    get,
    path = "/api/todos/stats",
    responses(
        (status = 200, description = "Todo statistics", body = TodoStats),
        (status = 401, description = "Unauthorized")
    ),
    tag = "todos",
    security(("bearer_auth" = []))
)]
pub async fn get_stats(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ApiResponse<TodoStats>>> {
    let stats = state.todo_service.stats(user_id).await?;
    Ok(ok(stats, "Statistics retrieved successfully"))
}
