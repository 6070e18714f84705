//! Meeting repository

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::store::models::{Meeting, MeetingPatch, NewMeeting};
use crate::store::{collections, generate_id, CollectionStore};

#[derive(Debug, Clone)]
pub struct MeetingRepository {
    store: CollectionStore,
}

impl MeetingRepository {
    pub fn new(store: CollectionStore) -> Self {
        Self { store }
    }

    async fn load(&self) -> Result<Vec<Meeting>> {
        self.store.read_collection(collections::MEETINGS).await
    }

    async fn save(&self, meetings: &[Meeting]) -> Result<()> {
        self.store
            .write_collection(collections::MEETINGS, meetings)
            .await
    }

    pub async fn create(&self, input: NewMeeting) -> Result<Meeting> {
        let mut meetings = self.load().await?;

        let meeting = Meeting {
            id: generate_id(),
            title: input.title,
            description: input.description,
            scheduled_at: input.scheduled_at,
            participants: input.participants,
            created_by: input.created_by,
            meeting_link: input.meeting_link,
            created_at: Utc::now(),
        };
        meetings.push(meeting.clone());
        self.save(&meetings).await?;

        tracing::debug!("Created meeting: {}", meeting.id);
        Ok(meeting)
    }

    pub async fn get_all(&self) -> Result<Vec<Meeting>> {
        self.load().await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Meeting>> {
        let meetings = self.load().await?;
        Ok(meetings.into_iter().find(|m| m.id == id))
    }

    pub async fn find_by_participant(&self, user_id: &str) -> Result<Vec<Meeting>> {
        let meetings = self.load().await?;
        Ok(meetings
            .into_iter()
            .filter(|m| m.participants.iter().any(|p| p == user_id))
            .collect())
    }

    pub async fn find_by_creator(&self, user_id: &str) -> Result<Vec<Meeting>> {
        let meetings = self.load().await?;
        Ok(meetings
            .into_iter()
            .filter(|m| m.created_by == user_id)
            .collect())
    }

    /// Meetings at or after `now`, soonest first.
    pub async fn find_upcoming(&self, now: DateTime<Utc>) -> Result<Vec<Meeting>> {
        let mut upcoming: Vec<Meeting> = self
            .load()
            .await?
            .into_iter()
            .filter(|m| m.scheduled_at >= now)
            .collect();
        upcoming.sort_by_key(|m| m.scheduled_at);
        Ok(upcoming)
    }

    pub async fn update(&self, id: &str, patch: MeetingPatch) -> Result<Option<Meeting>> {
        let mut meetings = self.load().await?;

        let Some(meeting) = meetings.iter_mut().find(|m| m.id == id) else {
            return Ok(None);
        };

        if let Some(title) = patch.title {
            meeting.title = title;
        }
        if let Some(description) = patch.description {
            meeting.description = description;
        }
        if let Some(scheduled_at) = patch.scheduled_at {
            meeting.scheduled_at = scheduled_at;
        }
        if let Some(participants) = patch.participants {
            meeting.participants = participants;
        }

        let updated = meeting.clone();
        self.save(&meetings).await?;

        tracing::debug!("Updated meeting: {}", id);
        Ok(Some(updated))
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let mut meetings = self.load().await?;
        let before = meetings.len();
        meetings.retain(|m| m.id != id);

        if meetings.len() != before {
            self.save(&meetings).await?;
            tracing::debug!("Deleted meeting: {}", id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::tempdir;

    async fn create_test_repo() -> (MeetingRepository, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let store = CollectionStore::new(dir.path());
        store.initialize().await.unwrap();
        (MeetingRepository::new(store), dir)
    }

    fn new_meeting(title: &str, scheduled_at: DateTime<Utc>) -> NewMeeting {
        NewMeeting {
            title: title.to_string(),
            description: "Sync".to_string(),
            scheduled_at,
            participants: vec!["u1".to_string(), "u2".to_string()],
            created_by: "hr1".to_string(),
            meeting_link: "https://meet.qedge.app/room".to_string(),
        }
    }

    #[tokio::test]
    async fn create_and_fetch_by_participant() {
        let (repo, _dir) = create_test_repo().await;
        let now = Utc::now();

        repo.create(new_meeting("Standup", now)).await.unwrap();
        let mut other = new_meeting("1:1", now);
        other.participants = vec!["u3".to_string()];
        repo.create(other).await.unwrap();

        let mine = repo.find_by_participant("u1").await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].title, "Standup");
    }

    #[tokio::test]
    async fn upcoming_excludes_past_and_sorts_ascending() {
        let (repo, _dir) = create_test_repo().await;
        let now = Utc::now();

        repo.create(new_meeting("Past", now - Duration::hours(2))).await.unwrap();
        repo.create(new_meeting("Later", now + Duration::hours(5))).await.unwrap();
        repo.create(new_meeting("Soon", now + Duration::hours(1))).await.unwrap();

        let upcoming = repo.find_upcoming(now).await.unwrap();
        assert_eq!(upcoming.len(), 2);
        assert_eq!(upcoming[0].title, "Soon");
        assert_eq!(upcoming[1].title, "Later");
    }

    #[tokio::test]
    async fn update_reschedules() {
        let (repo, _dir) = create_test_repo().await;
        let meeting = repo.create(new_meeting("Standup", Utc::now())).await.unwrap();

        let new_time = Utc::now() + Duration::days(1);
        let patch = MeetingPatch {
            scheduled_at: Some(new_time),
            ..Default::default()
        };
        let updated = repo.update(&meeting.id, patch).await.unwrap().unwrap();

        assert_eq!(updated.scheduled_at, new_time);
        assert_eq!(updated.title, "Standup");
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let (repo, _dir) = create_test_repo().await;
        let meeting = repo.create(new_meeting("Standup", Utc::now())).await.unwrap();

        repo.delete(&meeting.id).await.unwrap();
        repo.delete(&meeting.id).await.unwrap();

        assert!(repo.get_all().await.unwrap().is_empty());
    }
}
