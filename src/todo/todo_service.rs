use chrono::Utc;
use uuid::Uuid;

use super::{
    todo_dto::{CreateTodoRequest, TodoFilters, UpdateTodoRequest},
    todo_models::{Todo, TodoStats},
    todo_repository::TodoRepository,
};
use crate::error::{AppError, Result};

/// Todo business rules. Every lookup is scoped to the calling user, so a
/// todo owned by someone else is indistinguishable from a missing one.
#[derive(Clone)]
pub struct TodoService {
    repo: TodoRepository,
}

impl TodoService {
    pub fn new(repo: TodoRepository) -> Self {
        Self { repo }
    }

    pub async fn list(&self, user_id: Uuid, filters: &TodoFilters) -> Result<Vec<Todo>> {
        self.repo.find_all(user_id, filters).await
    }

    pub async fn get(&self, user_id: Uuid, todo_id: Uuid) -> Result<Todo> {
        self.repo
            .find_by_id(todo_id, user_id)
            .await?
            .ok_or_else(not_found)
    }

    pub async fn create(&self, user_id: Uuid, payload: CreateTodoRequest) -> Result<Todo> {
        let title = required_title(&payload.title)?;
        let priority = payload.priority.unwrap_or_default();

        let todo = self
            .repo
            .create(
                user_id,
                title,
                payload.description.trim(),
                priority,
                payload.due_date,
            )
            .await?;

        tracing::info!("Todo {} created for user {}", todo.id, user_id);
        Ok(todo)
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        todo_id: Uuid,
        mut patch: UpdateTodoRequest,
    ) -> Result<Todo> {
        if let Some(title) = patch.title.take() {
            patch.title = Some(required_title(&title)?.to_string());
        }
        if let Some(description) = patch.description.take() {
            patch.description = Some(description.trim().to_string());
        }

        let mut todo = self.get(user_id, todo_id).await?;
        todo.apply_update(patch, Utc::now());

        let todo = self.repo.update(&todo).await?.ok_or_else(not_found)?;

        tracing::debug!("Todo {} updated for user {}", todo.id, user_id);
        Ok(todo)
    }

    pub async fn delete(&self, user_id: Uuid, todo_id: Uuid) -> Result<()> {
        if self.repo.delete(todo_id, user_id).await? == 0 {
            return Err(not_found());
        }

        tracing::info!("Todo {} deleted for user {}", todo_id, user_id);
        Ok(())
    }

    pub async fn stats(&self, user_id: Uuid) -> Result<TodoStats> {
        self.repo.stats(user_id).await
    }
}

fn required_title(title: &str) -> Result<&str> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::Validation(vec![
            "title: Title is required".to_string(),
        ]));
    }
    Ok(title)
}

fn not_found() -> AppError {
    AppError::NotFound("Todo not found".to_string())
}
