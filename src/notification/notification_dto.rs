use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::notification_models::NotificationType;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct CreateNotificationRequest {
    #[validate(length(min = 1, max = 500, message = "Message must be between 1 and 500 characters"))]
    pub message: String,
    #[serde(rename = "type")]
    pub kind: Option<NotificationType>,
}
