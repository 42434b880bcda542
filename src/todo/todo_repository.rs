use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{
    todo_dto::TodoFilters,
    todo_models::{StatusFilter, Todo, TodoPriority, TodoStats},
};
use crate::{db::DbPool, error::Result};

#[derive(Clone)]
pub struct TodoRepository {
    pool: DbPool,
}

impl TodoRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Newest first. Search matches title or description, case-insensitively.
    pub async fn find_all(&self, user_id: Uuid, filters: &TodoFilters) -> Result<Vec<Todo>> {
        let mut query = "SELECT * FROM todos WHERE user_id = ?".to_string();

        match filters.status {
            Some(StatusFilter::Completed) => query.push_str(" AND is_completed = 1"),
            Some(StatusFilter::Pending) => query.push_str(" AND is_completed = 0"),
            Some(StatusFilter::All) | None => {}
        }

        if filters.priority.is_some() {
            query.push_str(" AND priority = ?");
        }

        let search = filters
            .search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(like_pattern);
        if search.is_some() {
            query.push_str(
                " AND (title LIKE ? ESCAPE '\\' OR description LIKE ? ESCAPE '\\')",
            );
        }

        query.push_str(" ORDER BY created_at DESC, rowid DESC");

        let mut db_query = sqlx::query_as::<_, Todo>(&query).bind(user_id);

        if let Some(priority) = filters.priority {
            db_query = db_query.bind(priority);
        }

        if let Some(pattern) = search {
            db_query = db_query.bind(pattern.clone()).bind(pattern);
        }

        let todos = db_query.fetch_all(&self.pool).await?;
        Ok(todos)
    }

    pub async fn find_by_id(&self, id: Uuid, user_id: Uuid) -> Result<Option<Todo>> {
        let todo = sqlx::query_as::<_, Todo>("SELECT * FROM todos WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(todo)
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        title: &str,
        description: &str,
        priority: TodoPriority,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<Todo> {
        let now = Utc::now();
        let todo = sqlx::query_as::<_, Todo>(
            "INSERT INTO todos
                (id, user_id, title, description, is_completed, priority, due_date, created_at, updated_at, completed_at)
             VALUES (?, ?, ?, ?, 0, ?, ?, ?, ?, NULL)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(title)
        .bind(description)
        .bind(priority)
        .bind(due_date)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(todo)
    }

    /// Writes every mutable field of `todo` back, scoped to its owner.
    pub async fn update(&self, todo: &Todo) -> Result<Option<Todo>> {
        let updated = sqlx::query_as::<_, Todo>(
            "UPDATE todos SET
                title = ?,
                description = ?,
                is_completed = ?,
                priority = ?,
                due_date = ?,
                completed_at = ?,
                updated_at = ?
             WHERE id = ? AND user_id = ?
             RETURNING *",
        )
        .bind(&todo.title)
        .bind(&todo.description)
        .bind(todo.is_completed)
        .bind(todo.priority)
        .bind(todo.due_date)
        .bind(todo.completed_at)
        .bind(todo.updated_at)
        .bind(todo.id)
        .bind(todo.user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn stats(&self, user_id: Uuid) -> Result<TodoStats> {
        let (total, completed, high, medium, low): (i64, i64, i64, i64, i64) = sqlx::query_as(
            "SELECT
                COUNT(*),
                COALESCE(SUM(CASE WHEN is_completed = 1 THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN priority = 'high' THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN priority = 'medium' THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN priority = 'low' THEN 1 ELSE 0 END), 0)
             FROM todos WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(TodoStats::new(total, completed, high, medium, low))
    }

    /// Incomplete todos, across all users, due within `[from, to]`.
    pub async fn find_due_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Todo>> {
        let todos = sqlx::query_as::<_, Todo>(
            "SELECT * FROM todos
             WHERE is_completed = 0
               AND due_date IS NOT NULL
               AND due_date >= ?
               AND due_date <= ?
             ORDER BY due_date ASC",
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(todos)
    }
}

fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}
