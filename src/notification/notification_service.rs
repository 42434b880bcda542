use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::{
    notification_dto::CreateNotificationRequest,
    notification_models::{Notification, NotificationType},
    notification_repository::NotificationRepository,
};
use crate::{
    error::{AppError, Result},
    todo::{Todo, TodoRepository},
};

/// How far ahead of its due date a todo triggers a reminder.
pub const DUE_SOON_WINDOW_HOURS: i64 = 24;

#[derive(Clone)]
pub struct NotificationService {
    repo: NotificationRepository,
    todo_repo: TodoRepository,
}

impl NotificationService {
    pub fn new(repo: NotificationRepository, todo_repo: TodoRepository) -> Self {
        Self { repo, todo_repo }
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Notification>> {
        self.repo.find_recent_by_user(user_id).await
    }

    pub async fn unread_count(&self, user_id: Uuid) -> Result<i64> {
        self.repo.unread_count(user_id).await
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        payload: CreateNotificationRequest,
    ) -> Result<Notification> {
        let message = payload.message.trim();
        if message.is_empty() {
            return Err(AppError::Validation(vec![
                "message: Message is required".to_string(),
            ]));
        }

        self.repo
            .create(user_id, None, message, payload.kind.unwrap_or_default())
            .await
    }

    pub async fn mark_read(&self, user_id: Uuid, notification_id: Uuid) -> Result<()> {
        if !self.repo.mark_as_read(notification_id, user_id).await? {
            return Err(AppError::NotFound("Notification not found".to_string()));
        }
        Ok(())
    }

    pub async fn mark_all_read(&self, user_id: Uuid) -> Result<u64> {
        let changed = self.repo.mark_all_as_read(user_id).await?;
        tracing::debug!("Marked {} notifications read for user {}", changed, user_id);
        Ok(changed)
    }

    /// Creates one warning per incomplete todo due within the next
    /// [`DUE_SOON_WINDOW_HOURS`], at most once per todo and due day.
    /// Returns how many notifications were written.
    pub async fn sweep_due_soon(&self, now: DateTime<Utc>) -> Result<usize> {
        let todos = self
            .todo_repo
            .find_due_between(now, now + Duration::hours(DUE_SOON_WINDOW_HOURS))
            .await?;

        let mut created = 0;
        for todo in todos {
            let Some(key) = due_soon_key(&todo) else {
                continue;
            };

            let inserted = self
                .repo
                .create_if_absent(
                    todo.user_id,
                    Some(todo.id),
                    &due_soon_message(&todo.title),
                    NotificationType::Warning,
                    &key,
                )
                .await?;

            if inserted {
                tracing::info!("Due-soon notification created for todo {}", todo.id);
                created += 1;
            }
        }

        Ok(created)
    }
}

fn due_soon_key(todo: &Todo) -> Option<String> {
    todo.due_date
        .map(|due| format!("due-soon:{}:{}", todo.id, due.format("%Y-%m-%d")))
}

fn due_soon_message(title: &str) -> String {
    format!("Task '{}' is due soon", title)
}
