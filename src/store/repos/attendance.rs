//! Meeting attendance repository
//!
//! A row is created when a participant joins and mutated once when
//! they leave. Absences get their own rows so reports can distinguish
//! no-shows from open sessions.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::store::models::{Attendance, AttendanceStatus};
use crate::store::{collections, generate_id, CollectionStore};

#[derive(Debug, Clone)]
pub struct AttendanceRepository {
    store: CollectionStore,
}

impl AttendanceRepository {
    pub fn new(store: CollectionStore) -> Self {
        Self { store }
    }

    async fn load(&self) -> Result<Vec<Attendance>> {
        self.store.read_collection(collections::ATTENDANCE).await
    }

    async fn save(&self, records: &[Attendance]) -> Result<()> {
        self.store
            .write_collection(collections::ATTENDANCE, records)
            .await
    }

    pub async fn record_join(
        &self,
        meeting_id: &str,
        user_id: &str,
        joined_at: DateTime<Utc>,
    ) -> Result<Attendance> {
        let mut records = self.load().await?;

        let attendance = Attendance {
            id: generate_id(),
            meeting_id: meeting_id.to_string(),
            user_id: user_id.to_string(),
            joined_at,
            left_at: None,
            duration: 0,
            status: AttendanceStatus::Present,
        };
        records.push(attendance.clone());
        self.save(&records).await?;

        tracing::debug!("User {} joined meeting {}", user_id, meeting_id);
        Ok(attendance)
    }

    /// Closes an attendance row, computing the duration in seconds.
    pub async fn record_leave(
        &self,
        id: &str,
        left_at: DateTime<Utc>,
    ) -> Result<Option<Attendance>> {
        let mut records = self.load().await?;

        let Some(record) = records.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };

        record.left_at = Some(left_at);
        record.duration = (left_at - record.joined_at).num_seconds().max(0);

        let updated = record.clone();
        self.save(&records).await?;

        tracing::debug!(
            "User {} left meeting {} after {}s",
            updated.user_id,
            updated.meeting_id,
            updated.duration
        );
        Ok(Some(updated))
    }

    pub async fn record_absent(&self, meeting_id: &str, user_id: &str) -> Result<Attendance> {
        let mut records = self.load().await?;

        let attendance = Attendance {
            id: generate_id(),
            meeting_id: meeting_id.to_string(),
            user_id: user_id.to_string(),
            joined_at: Utc::now(),
            left_at: None,
            duration: 0,
            status: AttendanceStatus::Absent,
        };
        records.push(attendance.clone());
        self.save(&records).await?;

        tracing::debug!("User {} marked absent for meeting {}", user_id, meeting_id);
        Ok(attendance)
    }

    /// The user's attendance row for a meeting that has no leave time
    /// yet.
    pub async fn find_open(&self, meeting_id: &str, user_id: &str) -> Result<Option<Attendance>> {
        let records = self.load().await?;
        Ok(records.into_iter().find(|a| {
            a.meeting_id == meeting_id
                && a.user_id == user_id
                && a.left_at.is_none()
                && a.status == AttendanceStatus::Present
        }))
    }

    pub async fn find_by_meeting(&self, meeting_id: &str) -> Result<Vec<Attendance>> {
        let records = self.load().await?;
        Ok(records
            .into_iter()
            .filter(|a| a.meeting_id == meeting_id)
            .collect())
    }

    pub async fn find_by_user(&self, user_id: &str) -> Result<Vec<Attendance>> {
        let records = self.load().await?;
        Ok(records
            .into_iter()
            .filter(|a| a.user_id == user_id)
            .collect())
    }
}
