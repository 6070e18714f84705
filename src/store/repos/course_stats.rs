//! Course progress repository
//!
//! One row per (user, course) pair. Rows are upserted, never deleted.

use crate::error::Result;
use crate::store::models::CourseStat;
use crate::store::{collections, CollectionStore};

#[derive(Debug, Clone)]
pub struct CourseStatRepository {
    store: CollectionStore,
}

impl CourseStatRepository {
    pub fn new(store: CollectionStore) -> Self {
        Self { store }
    }

    async fn load(&self) -> Result<Vec<CourseStat>> {
        self.store.read_collection(collections::COURSE_STATS).await
    }

    pub async fn get_all(&self) -> Result<Vec<CourseStat>> {
        self.load().await
    }

    pub async fn find(&self, user_id: &str, course_id: &str) -> Result<Option<CourseStat>> {
        let stats = self.load().await?;
        Ok(stats
            .into_iter()
            .find(|s| s.user_id == user_id && s.course_id == course_id))
    }

    pub async fn find_by_user(&self, user_id: &str) -> Result<Vec<CourseStat>> {
        let stats = self.load().await?;
        Ok(stats.into_iter().filter(|s| s.user_id == user_id).collect())
    }

    pub async fn find_by_course(&self, course_id: &str) -> Result<Vec<CourseStat>> {
        let stats = self.load().await?;
        Ok(stats
            .into_iter()
            .filter(|s| s.course_id == course_id)
            .collect())
    }

    /// Replaces the row for the stat's (user, course) pair, inserting
    /// it when absent.
    pub async fn upsert(&self, stat: CourseStat) -> Result<CourseStat> {
        let mut stats = self.load().await?;

        match stats
            .iter_mut()
            .find(|s| s.user_id == stat.user_id && s.course_id == stat.course_id)
        {
            Some(existing) => *existing = stat.clone(),
            None => stats.push(stat.clone()),
        }

        self.store
            .write_collection(collections::COURSE_STATS, &stats)
            .await?;

        tracing::debug!(
            "Upserted course stat for user {} on course {}",
            stat.user_id,
            stat.course_id
        );
        Ok(stat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn create_test_repo() -> (CourseStatRepository, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let store = CollectionStore::new(dir.path());
        store.initialize().await.unwrap();
        (CourseStatRepository::new(store), dir)
    }

    #[tokio::test]
    async fn upsert_inserts_then_replaces() {
        let (repo, _dir) = create_test_repo().await;

        let mut stat = CourseStat::fresh("u1", "c1", 3);
        repo.upsert(stat.clone()).await.unwrap();

        stat.started = true;
        stat.lessons_completed = 2;
        repo.upsert(stat.clone()).await.unwrap();

        let all = repo.get_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].lessons_completed, 2);
    }

    #[tokio::test]
    async fn rows_are_keyed_by_user_and_course() {
        let (repo, _dir) = create_test_repo().await;

        repo.upsert(CourseStat::fresh("u1", "c1", 3)).await.unwrap();
        repo.upsert(CourseStat::fresh("u1", "c2", 5)).await.unwrap();
        repo.upsert(CourseStat::fresh("u2", "c1", 3)).await.unwrap();

        assert_eq!(repo.get_all().await.unwrap().len(), 3);
        assert_eq!(repo.find_by_user("u1").await.unwrap().len(), 2);
        assert_eq!(repo.find_by_course("c1").await.unwrap().len(), 2);

        let hit = repo.find("u2", "c1").await.unwrap().unwrap();
        assert_eq!(hit.total_lessons, 3);
        assert!(repo.find("u2", "c2").await.unwrap().is_none());
    }
}
