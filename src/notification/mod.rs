pub mod notification_dto;
pub mod notification_handlers;
pub mod notification_models;
pub mod notification_repository;
pub mod notification_service;
pub mod scheduler;

pub use notification_models::{Notification, NotificationType};
pub use notification_repository::NotificationRepository;
pub use notification_service::NotificationService;
pub use scheduler::start_notification_scheduler;
