use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{api::ApiClient, effects};
use crate::{
    auth::auth_dto::LoginResponse,
    notification::Notification,
    todo::{
        todo_dto::{CreateTodoRequest, UpdateTodoRequest},
        StatusFilter, Todo, TodoStats,
    },
    user::UserDto,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub user: Option<UserDto>,
    pub token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodosState {
    pub todos: Vec<Todo>,
    pub selected: Option<Todo>,
    pub stats: Option<TodoStats>,
    pub filter: StatusFilter,
    pub search_query: String,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationsState {
    pub notifications: Vec<Notification>,
    pub unread_count: i64,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientState {
    pub auth: AuthState,
    pub todos: TodosState,
    pub notifications: NotificationsState,
}

/// Everything that can happen to the client state. Request actions carry
/// their inputs; their `*Success`/`*Failure` counterparts carry the outcome.
#[derive(Clone, PartialEq)]
pub enum Action {
    Login { email: String, password: String },
    LoginSuccess(LoginResponse),
    LoginFailure(String),
    Logout,

    LoadTodos,
    LoadTodosSuccess(Vec<Todo>),
    LoadTodosFailure(String),
    LoadTodo(Uuid),
    LoadTodoSuccess(Todo),
    LoadTodoFailure(String),
    CreateTodo(CreateTodoRequest),
    CreateTodoSuccess(Todo),
    CreateTodoFailure(String),
    UpdateTodo { id: Uuid, changes: UpdateTodoRequest },
    UpdateTodoSuccess(Todo),
    UpdateTodoFailure(String),
    ToggleComplete { id: Uuid, is_completed: bool },
    ToggleCompleteSuccess(Todo),
    ToggleCompleteFailure(String),
    DeleteTodo(Uuid),
    DeleteTodoSuccess(Uuid),
    DeleteTodoFailure(String),
    LoadStats,
    LoadStatsSuccess(TodoStats),
    LoadStatsFailure(String),
    SetFilter(StatusFilter),
    SetSearchQuery(String),
    ClearSearch,

    LoadNotifications,
    LoadNotificationsSuccess(Vec<Notification>),
    LoadNotificationsFailure(String),
    LoadUnreadCount,
    LoadUnreadCountSuccess(i64),
    LoadUnreadCountFailure(String),
    MarkNotificationRead(Uuid),
    MarkNotificationReadSuccess(Uuid),
    MarkNotificationReadFailure(String),
    MarkAllNotificationsRead,
    MarkAllNotificationsReadSuccess(u64),
    MarkAllNotificationsReadFailure(String),
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Login { .. } => "Login",
            Action::LoginSuccess(_) => "LoginSuccess",
            Action::LoginFailure(_) => "LoginFailure",
            Action::Logout => "Logout",
            Action::LoadTodos => "LoadTodos",
            Action::LoadTodosSuccess(_) => "LoadTodosSuccess",
            Action::LoadTodosFailure(_) => "LoadTodosFailure",
            Action::LoadTodo(_) => "LoadTodo",
            Action::LoadTodoSuccess(_) => "LoadTodoSuccess",
            Action::LoadTodoFailure(_) => "LoadTodoFailure",
            Action::CreateTodo(_) => "CreateTodo",
            Action::CreateTodoSuccess(_) => "CreateTodoSuccess",
            Action::CreateTodoFailure(_) => "CreateTodoFailure",
            Action::UpdateTodo { .. } => "UpdateTodo",
            Action::UpdateTodoSuccess(_) => "UpdateTodoSuccess",
            Action::UpdateTodoFailure(_) => "UpdateTodoFailure",
            Action::ToggleComplete { .. } => "ToggleComplete",
            Action::ToggleCompleteSuccess(_) => "ToggleCompleteSuccess",
            Action::ToggleCompleteFailure(_) => "ToggleCompleteFailure",
            Action::DeleteTodo(_) => "DeleteTodo",
            Action::DeleteTodoSuccess(_) => "DeleteTodoSuccess",
            Action::DeleteTodoFailure(_) => "DeleteTodoFailure",
            Action::LoadStats => "LoadStats",
            Action::LoadStatsSuccess(_) => "LoadStatsSuccess",
            Action::LoadStatsFailure(_) => "LoadStatsFailure",
            Action::SetFilter(_) => "SetFilter",
            Action::SetSearchQuery(_) => "SetSearchQuery",
            Action::ClearSearch => "ClearSearch",
            Action::LoadNotifications => "LoadNotifications",
            Action::LoadNotificationsSuccess(_) => "LoadNotificationsSuccess",
            Action::LoadNotificationsFailure(_) => "LoadNotificationsFailure",
            Action::LoadUnreadCount => "LoadUnreadCount",
            Action::LoadUnreadCountSuccess(_) => "LoadUnreadCountSuccess",
            Action::LoadUnreadCountFailure(_) => "LoadUnreadCountFailure",
            Action::MarkNotificationRead(_) => "MarkNotificationRead",
            Action::MarkNotificationReadSuccess(_) => "MarkNotificationReadSuccess",
            Action::MarkNotificationReadFailure(_) => "MarkNotificationReadFailure",
            Action::MarkAllNotificationsRead => "MarkAllNotificationsRead",
            Action::MarkAllNotificationsReadSuccess(_) => "MarkAllNotificationsReadSuccess",
            Action::MarkAllNotificationsReadFailure(_) => "MarkAllNotificationsReadFailure",
        }
    }
}

// Credentials and tokens never reach logs.
impl std::fmt::Debug for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

fn start<S>(loading: &mut bool, error: &mut Option<S>) {
    *loading = true;
    *error = None;
}

fn finish<S>(loading: &mut bool, error: &mut Option<S>) {
    *loading = false;
    *error = None;
}

fn fail(loading: &mut bool, error: &mut Option<String>, message: &str) {
    *loading = false;
    *error = Some(message.to_string());
}

fn replace_todo(todos: &mut [Todo], todo: &Todo) {
    if let Some(existing) = todos.iter_mut().find(|t| t.id == todo.id) {
        *existing = todo.clone();
    }
}

/// Pure state transition. Failures keep previously loaded data.
pub fn reduce(mut state: ClientState, action: &Action) -> ClientState {
    let auth = &mut state.auth;
    let todos = &mut state.todos;
    let notes = &mut state.notifications;

    match action {
        Action::Login { .. } => start(&mut auth.loading, &mut auth.error),
        Action::LoginSuccess(response) => {
            auth.user = Some(response.user.clone());
            auth.token = Some(response.token.clone());
            auth.expires_at = Some(response.expires_at);
            finish(&mut auth.loading, &mut auth.error);
        }
        Action::LoginFailure(e) => fail(&mut auth.loading, &mut auth.error, e),
        Action::Logout => return ClientState::default(),

        Action::LoadTodos
        | Action::LoadTodo(_)
        | Action::CreateTodo(_)
        | Action::UpdateTodo { .. }
        | Action::ToggleComplete { .. }
        | Action::DeleteTodo(_)
        | Action::LoadStats => start(&mut todos.loading, &mut todos.error),

        Action::LoadTodosSuccess(list) => {
            todos.todos = list.clone();
            finish(&mut todos.loading, &mut todos.error);
        }
        Action::LoadTodoSuccess(todo) => {
            todos.selected = Some(todo.clone());
            finish(&mut todos.loading, &mut todos.error);
        }
        Action::CreateTodoSuccess(todo) => {
            todos.todos.insert(0, todo.clone());
            finish(&mut todos.loading, &mut todos.error);
        }
        Action::UpdateTodoSuccess(todo) | Action::ToggleCompleteSuccess(todo) => {
            replace_todo(&mut todos.todos, todo);
            if todos.selected.as_ref().map(|t| t.id) == Some(todo.id) {
                todos.selected = Some(todo.clone());
            }
            finish(&mut todos.loading, &mut todos.error);
        }
        Action::DeleteTodoSuccess(id) => {
            todos.todos.retain(|t| t.id != *id);
            if todos.selected.as_ref().map(|t| t.id) == Some(*id) {
                todos.selected = None;
            }
            finish(&mut todos.loading, &mut todos.error);
        }
        Action::LoadStatsSuccess(stats) => {
            todos.stats = Some(stats.clone());
            finish(&mut todos.loading, &mut todos.error);
        }
        Action::LoadTodosFailure(e)
        | Action::LoadTodoFailure(e)
        | Action::CreateTodoFailure(e)
        | Action::UpdateTodoFailure(e)
        | Action::ToggleCompleteFailure(e)
        | Action::DeleteTodoFailure(e)
        | Action::LoadStatsFailure(e) => fail(&mut todos.loading, &mut todos.error, e),

        Action::SetFilter(filter) => todos.filter = *filter,
        Action::SetSearchQuery(query) => todos.search_query = query.clone(),
        Action::ClearSearch => todos.search_query.clear(),

        Action::LoadNotifications
        | Action::LoadUnreadCount
        | Action::MarkNotificationRead(_)
        | Action::MarkAllNotificationsRead => start(&mut notes.loading, &mut notes.error),

        Action::LoadNotificationsSuccess(list) => {
            notes.notifications = list.clone();
            finish(&mut notes.loading, &mut notes.error);
        }
        Action::LoadUnreadCountSuccess(count) => {
            notes.unread_count = *count;
            finish(&mut notes.loading, &mut notes.error);
        }
        Action::MarkNotificationReadSuccess(id) => {
            if let Some(n) = notes
                .notifications
                .iter_mut()
                .find(|n| n.id == *id && !n.is_read)
            {
                n.is_read = true;
                notes.unread_count = (notes.unread_count - 1).max(0);
            }
            finish(&mut notes.loading, &mut notes.error);
        }
        Action::MarkAllNotificationsReadSuccess(_) => {
            notes.notifications.iter_mut().for_each(|n| n.is_read = true);
            notes.unread_count = 0;
            finish(&mut notes.loading, &mut notes.error);
        }
        Action::LoadNotificationsFailure(e)
        | Action::LoadUnreadCountFailure(e)
        | Action::MarkNotificationReadFailure(e)
        | Action::MarkAllNotificationsReadFailure(e) => {
            fail(&mut notes.loading, &mut notes.error, e)
        }
    }

    state
}

/// Owns the state and the API client. `dispatch` reduces an action, runs its
/// effect, then drains any follow-up actions in order.
pub struct Store {
    state: ClientState,
    api: ApiClient,
}

impl Store {
    pub fn new(api: ApiClient) -> Self {
        Self {
            state: ClientState::default(),
            api,
        }
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub async fn dispatch(&mut self, action: Action) {
        let mut queue = VecDeque::from([action]);

        while let Some(action) = queue.pop_front() {
            tracing::debug!("dispatch {}", action.name());
            self.state = reduce(std::mem::take(&mut self.state), &action);
            queue.extend(effects::run(&mut self.api, &action).await);
        }
    }
}
