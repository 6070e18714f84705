//! Notification repository

use chrono::Utc;

use crate::error::Result;
use crate::store::models::{Notification, NotificationKind};
use crate::store::{collections, generate_id, CollectionStore};

#[derive(Debug, Clone)]
pub struct NotificationRepository {
    store: CollectionStore,
}

impl NotificationRepository {
    pub fn new(store: CollectionStore) -> Self {
        Self { store }
    }

    async fn load(&self) -> Result<Vec<Notification>> {
        self.store.read_collection(collections::NOTIFICATIONS).await
    }

    async fn save(&self, notifications: &[Notification]) -> Result<()> {
        self.store
            .write_collection(collections::NOTIFICATIONS, notifications)
            .await
    }

    pub async fn create(
        &self,
        user_id: &str,
        kind: NotificationKind,
        title: &str,
        message: &str,
    ) -> Result<Notification> {
        let mut notifications = self.load().await?;

        let notification = Notification {
            id: generate_id(),
            user_id: user_id.to_string(),
            kind,
            title: title.to_string(),
            message: message.to_string(),
            read: false,
            created_at: Utc::now(),
        };
        notifications.push(notification.clone());
        self.save(&notifications).await?;

        tracing::debug!("Notified user {}: {}", user_id, title);
        Ok(notification)
    }

    /// All of a user's notifications, newest first.
    pub async fn find_by_user(&self, user_id: &str) -> Result<Vec<Notification>> {
        let mut mine: Vec<Notification> = self
            .load()
            .await?
            .into_iter()
            .filter(|n| n.user_id == user_id)
            .collect();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(mine)
    }

    pub async fn find_unread(&self, user_id: &str) -> Result<Vec<Notification>> {
        let notifications = self.load().await?;
        Ok(notifications
            .into_iter()
            .filter(|n| n.user_id == user_id && !n.read)
            .collect())
    }

    pub async fn unread_count(&self, user_id: &str) -> Result<usize> {
        Ok(self.find_unread(user_id).await?.len())
    }

    pub async fn mark_read(&self, id: &str) -> Result<Option<Notification>> {
        let mut notifications = self.load().await?;

        let Some(notification) = notifications.iter_mut().find(|n| n.id == id) else {
            return Ok(None);
        };

        notification.read = true;
        let updated = notification.clone();
        self.save(&notifications).await?;

        Ok(Some(updated))
    }

    /// Marks every unread notification of the user read, returning how
    /// many changed.
    pub async fn mark_all_read(&self, user_id: &str) -> Result<usize> {
        let mut notifications = self.load().await?;

        let mut changed = 0;
        for notification in notifications
            .iter_mut()
            .filter(|n| n.user_id == user_id && !n.read)
        {
            notification.read = true;
            changed += 1;
        }

        if changed > 0 {
            self.save(&notifications).await?;
        }
        Ok(changed)
    }
}
