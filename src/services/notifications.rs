//! Notification access for the dashboards

use crate::error::{AppError, Result};
use crate::store::models::{Notification, NotificationKind};
use crate::store::repos::NotificationRepository;

#[derive(Debug, Clone)]
pub struct NotificationService {
    notifications: NotificationRepository,
}

impl NotificationService {
    pub fn new(notifications: NotificationRepository) -> Self {
        Self { notifications }
    }

    pub async fn notify(
        &self,
        user_id: &str,
        kind: NotificationKind,
        title: &str,
        message: &str,
    ) -> Result<Notification> {
        self.notifications.create(user_id, kind, title, message).await
    }

    pub async fn list_for(&self, user_id: &str) -> Result<Vec<Notification>> {
        self.notifications.find_by_user(user_id).await
    }

    pub async fn unread_count(&self, user_id: &str) -> Result<usize> {
        self.notifications.unread_count(user_id).await
    }

    pub async fn mark_read(&self, id: &str) -> Result<Notification> {
        self.notifications
            .mark_read(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Notification {} not found", id)))
    }

    pub async fn mark_all_read(&self, user_id: &str) -> Result<usize> {
        self.notifications.mark_all_read(user_id).await
    }
}
