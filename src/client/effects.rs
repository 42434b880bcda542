use super::{
    api::{ApiClient, ClientResult},
    store::Action,
};
use crate::todo::todo_dto::{TodoFilters, UpdateTodoRequest};

/// Performs the I/O an action asks for and returns the actions it produces.
///
/// Every successful todo mutation is followed by `LoadStats` so the
/// dashboard never shows stale counts. A 401 while a token is held ends the
/// session: `Logout` is queued ahead of the failure.
pub async fn run(api: &mut ApiClient, action: &Action) -> Vec<Action> {
    let session = api.token().is_some();

    match action {
        Action::Login { email, password } => settle(
            session,
            api.login(email, password).await,
            Action::LoginSuccess,
            Action::LoginFailure,
        ),
        Action::LoginSuccess(response) => {
            api.set_token(Some(response.token.clone()));
            Vec::new()
        }
        Action::Logout => {
            api.set_token(None);
            Vec::new()
        }

        Action::LoadTodos => settle(
            session,
            api.list_todos(&TodoFilters::default()).await,
            Action::LoadTodosSuccess,
            Action::LoadTodosFailure,
        ),
        Action::LoadTodo(id) => settle(
            session,
            api.get_todo(*id).await,
            Action::LoadTodoSuccess,
            Action::LoadTodoFailure,
        ),
        Action::CreateTodo(todo) => settle(
            session,
            api.create_todo(todo).await,
            Action::CreateTodoSuccess,
            Action::CreateTodoFailure,
        ),
        Action::UpdateTodo { id, changes } => settle(
            session,
            api.update_todo(*id, changes).await,
            Action::UpdateTodoSuccess,
            Action::UpdateTodoFailure,
        ),
        Action::ToggleComplete { id, is_completed } => {
            let changes = UpdateTodoRequest {
                is_completed: Some(*is_completed),
                ..Default::default()
            };
            settle(
                session,
                api.update_todo(*id, &changes).await,
                Action::ToggleCompleteSuccess,
                Action::ToggleCompleteFailure,
            )
        }
        Action::DeleteTodo(id) => {
            let id = *id;
            settle(
                session,
                api.delete_todo(id).await,
                |_| Action::DeleteTodoSuccess(id),
                Action::DeleteTodoFailure,
            )
        }
        Action::LoadStats => settle(
            session,
            api.stats().await,
            Action::LoadStatsSuccess,
            Action::LoadStatsFailure,
        ),
        Action::CreateTodoSuccess(_)
        | Action::UpdateTodoSuccess(_)
        | Action::ToggleCompleteSuccess(_)
        | Action::DeleteTodoSuccess(_) => vec![Action::LoadStats],

        Action::LoadNotifications => settle(
            session,
            api.notifications().await,
            Action::LoadNotificationsSuccess,
            Action::LoadNotificationsFailure,
        ),
        Action::LoadUnreadCount => settle(
            session,
            api.unread_count().await,
            Action::LoadUnreadCountSuccess,
            Action::LoadUnreadCountFailure,
        ),
        Action::MarkNotificationRead(id) => {
            let id = *id;
            settle(
                session,
                api.mark_notification_read(id).await,
                |_| Action::MarkNotificationReadSuccess(id),
                Action::MarkNotificationReadFailure,
            )
        }
        Action::MarkAllNotificationsRead => settle(
            session,
            api.mark_all_notifications_read().await,
            Action::MarkAllNotificationsReadSuccess,
            Action::MarkAllNotificationsReadFailure,
        ),

        _ => Vec::new(),
    }
}

fn settle<T>(
    session: bool,
    result: ClientResult<T>,
    success: impl FnOnce(T) -> Action,
    failure: impl FnOnce(String) -> Action,
) -> Vec<Action> {
    match result {
        Ok(value) => vec![success(value)],
        Err(e) if session && e.status() == Some(401) => {
            tracing::warn!("Session rejected by the server: {}", e);
            vec![Action::Logout, failure(e.to_string())]
        }
        Err(e) => {
            tracing::warn!("Request failed: {}", e);
            vec![failure(e.to_string())]
        }
    }
}
