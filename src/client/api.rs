use reqwest::{Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    auth::auth_dto::{ChangePasswordRequest, LoginRequest, LoginResponse, UpdateProfileRequest},
    notification::{notification_dto::CreateNotificationRequest, Notification},
    response::ApiResponse,
    todo::{
        todo_dto::{CreateTodoRequest, TodoFilters, UpdateTodoRequest},
        Todo, TodoStats,
    },
    user::UserDto,
};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message}")]
    Api {
        status: u16,
        message: String,
        errors: Vec<String>,
    },

    #[error("Malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Response carried no data")]
    MissingData,
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Thin wrapper over the REST API. Every call unwraps the response envelope;
/// a failed envelope becomes [`ClientError::Api`].
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .http
            .request(method, format!("{}/api{}", self.base_url, path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> ClientResult<ApiResponse<T>> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        let parsed = serde_json::from_str::<ApiResponse<T>>(&body);
        match parsed {
            Ok(envelope) if status.is_success() && envelope.success => Ok(envelope),
            Ok(envelope) => Err(ClientError::Api {
                status: status.as_u16(),
                message: envelope.message,
                errors: envelope.errors,
            }),
            Err(_) if !status.is_success() => Err(ClientError::Api {
                status: status.as_u16(),
                message: fallback_message(status, body),
                errors: Vec::new(),
            }),
            Err(e) => Err(ClientError::Decode(e)),
        }
    }

    async fn data<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        self.execute::<T>(request)
            .await?
            .data
            .ok_or(ClientError::MissingData)
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.data(self.request(method, path).json(body)).await
    }

    // Auth

    pub async fn login(&self, email: &str, password: &str) -> ClientResult<LoginResponse> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.send_json(Method::POST, "/auth/login", &body).await
    }

    pub async fn me(&self) -> ClientResult<UserDto> {
        self.data(self.request(Method::GET, "/auth/me")).await
    }

    pub async fn update_profile(&self, changes: &UpdateProfileRequest) -> ClientResult<UserDto> {
        self.send_json(Method::PUT, "/auth/update-profile", changes)
            .await
    }

    pub async fn change_password(&self, current: &str, new: &str) -> ClientResult<bool> {
        let body = ChangePasswordRequest {
            current_password: current.to_string(),
            new_password: new.to_string(),
        };
        self.send_json(Method::POST, "/auth/change-password", &body)
            .await
    }

    // Todos

    pub async fn list_todos(&self, filters: &TodoFilters) -> ClientResult<Vec<Todo>> {
        self.data(self.request(Method::GET, "/todos").query(filters))
            .await
    }

    pub async fn get_todo(&self, id: Uuid) -> ClientResult<Todo> {
        self.data(self.request(Method::GET, &format!("/todos/{}", id)))
            .await
    }

    pub async fn create_todo(&self, todo: &CreateTodoRequest) -> ClientResult<Todo> {
        self.send_json(Method::POST, "/todos", todo).await
    }

    pub async fn update_todo(&self, id: Uuid, changes: &UpdateTodoRequest) -> ClientResult<Todo> {
        self.send_json(Method::PUT, &format!("/todos/{}", id), changes)
            .await
    }

    pub async fn delete_todo(&self, id: Uuid) -> ClientResult<()> {
        self.execute::<()>(self.request(Method::DELETE, &format!("/todos/{}", id)))
            .await?;
        Ok(())
    }

    pub async fn stats(&self) -> ClientResult<TodoStats> {
        self.data(self.request(Method::GET, "/todos/stats")).await
    }

    // Notifications

    pub async fn notifications(&self) -> ClientResult<Vec<Notification>> {
        self.data(self.request(Method::GET, "/notifications")).await
    }

    pub async fn create_notification(
        &self,
        notification: &CreateNotificationRequest,
    ) -> ClientResult<Notification> {
        self.send_json(Method::POST, "/notifications", notification)
            .await
    }

    pub async fn unread_count(&self) -> ClientResult<i64> {
        self.data(self.request(Method::GET, "/notifications/unread-count"))
            .await
    }

    pub async fn mark_notification_read(&self, id: Uuid) -> ClientResult<bool> {
        self.data(self.request(Method::POST, &format!("/notifications/{}/mark-read", id)))
            .await
    }

    pub async fn mark_all_notifications_read(&self) -> ClientResult<u64> {
        self.data(self.request(Method::POST, "/notifications/mark-all-read"))
            .await
    }
}

fn fallback_message(status: StatusCode, body: String) -> String {
    if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string()
    } else {
        body
    }
}
