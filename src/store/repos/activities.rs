//! Activity feed repository, append-only.

use chrono::Utc;

use crate::error::Result;
use crate::store::models::{Activity, ActivityKind};
use crate::store::{collections, generate_id, CollectionStore};

#[derive(Debug, Clone)]
pub struct ActivityRepository {
    store: CollectionStore,
}

impl ActivityRepository {
    pub fn new(store: CollectionStore) -> Self {
        Self { store }
    }

    async fn load(&self) -> Result<Vec<Activity>> {
        self.store.read_collection(collections::ACTIVITIES).await
    }

    pub async fn record(&self, kind: ActivityKind, description: &str) -> Result<Activity> {
        let mut activities = self.load().await?;

        let activity = Activity {
            id: generate_id(),
            kind,
            description: description.to_string(),
            timestamp: Utc::now(),
        };
        activities.push(activity.clone());
        self.store
            .write_collection(collections::ACTIVITIES, &activities)
            .await?;

        Ok(activity)
    }

    pub async fn get_all(&self) -> Result<Vec<Activity>> {
        self.load().await
    }

    /// The most recent entries, newest first.
    pub async fn recent(&self, limit: usize) -> Result<Vec<Activity>> {
        let mut activities = self.load().await?;
        activities.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        activities.truncate(limit);
        Ok(activities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn create_test_repo() -> (ActivityRepository, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let store = CollectionStore::new(dir.path());
        store.initialize().await.unwrap();
        (ActivityRepository::new(store), dir)
    }

    #[tokio::test]
    async fn recent_returns_newest_first_up_to_limit() {
        let (repo, _dir) = create_test_repo().await;

        for i in 0..5 {
            repo.record(ActivityKind::Login, &format!("login {}", i))
                .await
                .unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(3)).await;
        }

        let recent = repo.recent(3).await.unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].description, "login 4");
        assert_eq!(recent[2].description, "login 2");
    }

    #[tokio::test]
    async fn record_appends() {
        let (repo, _dir) = create_test_repo().await;

        repo.record(ActivityKind::CourseCreated, "Course created").await.unwrap();
        repo.record(ActivityKind::EmailSent, "Email sent").await.unwrap();

        assert_eq!(repo.get_all().await.unwrap().len(), 2);
    }
}
