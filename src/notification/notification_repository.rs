use chrono::Utc;
use uuid::Uuid;

use super::notification_models::{Notification, NotificationType};
use crate::{db::DbPool, error::Result};

/// Upper bound on how many notifications a listing returns.
pub const LIST_LIMIT: i64 = 50;

#[derive(Clone)]
pub struct NotificationRepository {
    pool: DbPool,
}

impl NotificationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_recent_by_user(&self, user_id: Uuid) -> Result<Vec<Notification>> {
        let notifications = sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications
             WHERE user_id = ?
             ORDER BY created_at DESC, rowid DESC
             LIMIT ?",
        )
        .bind(user_id)
        .bind(LIST_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }

    pub async fn unread_count(&self, user_id: Uuid) -> Result<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM notifications WHERE user_id = ? AND is_read = 0")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        todo_id: Option<Uuid>,
        message: &str,
        kind: NotificationType,
    ) -> Result<Notification> {
        let notification = sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (id, user_id, todo_id, message, kind, is_read, dedup_key, created_at)
             VALUES (?, ?, ?, ?, ?, 0, NULL, ?)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(todo_id)
        .bind(message)
        .bind(kind)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(notification)
    }

    /// Inserts unless a notification with `dedup_key` already exists.
    /// Returns whether a row was written.
    pub async fn create_if_absent(
        &self,
        user_id: Uuid,
        todo_id: Option<Uuid>,
        message: &str,
        kind: NotificationType,
        dedup_key: &str,
    ) -> Result<bool> {
        let result = sqlx::query(
            "INSERT INTO notifications (id, user_id, todo_id, message, kind, is_read, dedup_key, created_at)
             VALUES (?, ?, ?, ?, ?, 0, ?, ?)
             ON CONFLICT (dedup_key) DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(todo_id)
        .bind(message)
        .bind(kind)
        .bind(dedup_key)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn mark_as_read(&self, id: Uuid, user_id: Uuid) -> Result<bool> {
        let result =
            sqlx::query("UPDATE notifications SET is_read = 1 WHERE id = ? AND user_id = ?")
                .bind(id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn mark_all_as_read(&self, user_id: Uuid) -> Result<u64> {
        let result =
            sqlx::query("UPDATE notifications SET is_read = 1 WHERE user_id = ? AND is_read = 0")
                .bind(user_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected())
    }
}
