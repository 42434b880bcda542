//! Derived views over [`ClientState`].

use chrono::Utc;
use uuid::Uuid;

use super::store::ClientState;
use crate::{
    notification::Notification,
    todo::{Todo, TodoStats},
    user::UserDto,
};

pub fn all_todos(state: &ClientState) -> &[Todo] {
    &state.todos.todos
}

pub fn filtered_todos(state: &ClientState) -> Vec<&Todo> {
    let filter = state.todos.filter;
    state
        .todos
        .todos
        .iter()
        .filter(|todo| filter.matches(todo))
        .collect()
}

/// The filtered list narrowed by the search query, matched
/// case-insensitively against title and description.
pub fn searched_todos(state: &ClientState) -> Vec<&Todo> {
    let query = state.todos.search_query.trim().to_lowercase();
    if query.is_empty() {
        return filtered_todos(state);
    }

    filtered_todos(state)
        .into_iter()
        .filter(|todo| {
            todo.title.to_lowercase().contains(&query)
                || todo.description.to_lowercase().contains(&query)
        })
        .collect()
}

pub fn selected_todo(state: &ClientState) -> Option<&Todo> {
    state.todos.selected.as_ref()
}

pub fn todo_by_id(state: &ClientState, id: Uuid) -> Option<&Todo> {
    state.todos.todos.iter().find(|todo| todo.id == id)
}

pub fn stats(state: &ClientState) -> Option<&TodoStats> {
    state.todos.stats.as_ref()
}

pub fn is_loading(state: &ClientState) -> bool {
    state.auth.loading || state.todos.loading || state.notifications.loading
}

/// The first recorded error, checking auth, then todos, then notifications.
pub fn error(state: &ClientState) -> Option<&str> {
    state
        .auth
        .error
        .as_deref()
        .or(state.todos.error.as_deref())
        .or(state.notifications.error.as_deref())
}

pub fn unread_notifications(state: &ClientState) -> Vec<&Notification> {
    state
        .notifications
        .notifications
        .iter()
        .filter(|n| !n.is_read)
        .collect()
}

/// A token is held and its expiry, when known, is still in the future.
pub fn is_authenticated(state: &ClientState) -> bool {
    state.auth.token.is_some()
        && state
            .auth
            .expires_at
            .map_or(true, |expires_at| expires_at > Utc::now())
}

pub fn current_user(state: &ClientState) -> Option<&UserDto> {
    state.auth.user.as_ref()
}
