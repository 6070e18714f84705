//! Meeting scheduling and attendance
//!
//! Scheduling generates the room link and notifies every participant;
//! cancelling notifies them again before the record goes away.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config;
use crate::error::{AppError, Result};
use crate::store::models::{
    ActivityKind, Attendance, Meeting, MeetingPatch, NewMeeting, NotificationKind,
};
use crate::store::repos::{
    ActivityRepository, AttendanceRepository, MeetingRepository, NotificationRepository,
};

/// Input for scheduling; the room link is generated here, not supplied.
#[derive(Debug, Clone)]
pub struct ScheduleMeeting {
    pub title: String,
    pub description: String,
    pub scheduled_at: DateTime<Utc>,
    pub participants: Vec<String>,
    pub created_by: String,
}

#[derive(Debug, Clone)]
pub struct MeetingService {
    meetings: MeetingRepository,
    attendance: AttendanceRepository,
    notifications: NotificationRepository,
    activity: ActivityRepository,
}

impl MeetingService {
    pub fn new(
        meetings: MeetingRepository,
        attendance: AttendanceRepository,
        notifications: NotificationRepository,
        activity: ActivityRepository,
    ) -> Self {
        Self {
            meetings,
            attendance,
            notifications,
            activity,
        }
    }

    fn room_link() -> String {
        format!("{}/{}", config::MEETING_LINK_BASE, Uuid::new_v4())
    }

    pub async fn schedule(&self, input: ScheduleMeeting) -> Result<Meeting> {
        if input.title.trim().is_empty() {
            return Err(AppError::Validation("Meeting title is required".to_string()));
        }
        if input.title.len() > config::MAX_TITLE_LENGTH {
            return Err(AppError::Validation(format!(
                "Meeting title exceeds {} characters",
                config::MAX_TITLE_LENGTH
            )));
        }

        let meeting = self
            .meetings
            .create(NewMeeting {
                title: input.title,
                description: input.description,
                scheduled_at: input.scheduled_at,
                participants: input.participants,
                created_by: input.created_by,
                meeting_link: Self::room_link(),
            })
            .await?;

        for participant in &meeting.participants {
            self.notifications
                .create(
                    participant,
                    NotificationKind::MeetingScheduled,
                    "Meeting scheduled",
                    &format!("'{}' is scheduled for {}", meeting.title, meeting.scheduled_at),
                )
                .await?;
        }
        self.activity
            .record(
                ActivityKind::MeetingScheduled,
                &format!("Meeting '{}' scheduled", meeting.title),
            )
            .await?;

        Ok(meeting)
    }

    pub async fn update(&self, id: &str, patch: MeetingPatch) -> Result<Meeting> {
        self.meetings
            .update(id, patch)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Meeting {} not found", id)))
    }

    /// Deletes the meeting after notifying its participants.
    pub async fn cancel(&self, id: &str) -> Result<()> {
        let meeting = self
            .meetings
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Meeting {} not found", id)))?;

        for participant in &meeting.participants {
            self.notifications
                .create(
                    participant,
                    NotificationKind::MeetingCancelled,
                    "Meeting cancelled",
                    &format!("'{}' has been cancelled", meeting.title),
                )
                .await?;
        }

        self.meetings.delete(id).await?;
        self.activity
            .record(
                ActivityKind::MeetingDeleted,
                &format!("Meeting '{}' cancelled", meeting.title),
            )
            .await?;
        Ok(())
    }

    /// Opens an attendance row. Joining while already in the meeting
    /// returns the open row instead of a second one.
    pub async fn join(&self, meeting_id: &str, user_id: &str) -> Result<Attendance> {
        if self.meetings.get_by_id(meeting_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Meeting {} not found", meeting_id)));
        }

        if let Some(open) = self.attendance.find_open(meeting_id, user_id).await? {
            return Ok(open);
        }
        self.attendance
            .record_join(meeting_id, user_id, Utc::now())
            .await
    }

    /// Closes the user's open attendance row.
    pub async fn leave(&self, meeting_id: &str, user_id: &str) -> Result<Attendance> {
        let open = self
            .attendance
            .find_open(meeting_id, user_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "No active attendance for user {} in meeting {}",
                    user_id, meeting_id
                ))
            })?;

        self.attendance
            .record_leave(&open.id, Utc::now())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Attendance {} not found", open.id)))
    }

    pub async fn mark_absent(&self, meeting_id: &str, user_id: &str) -> Result<Attendance> {
        self.attendance.record_absent(meeting_id, user_id).await
    }

    pub async fn attendance_for(&self, meeting_id: &str) -> Result<Vec<Attendance>> {
        self.attendance.find_by_meeting(meeting_id).await
    }

    pub async fn meetings_for(&self, user_id: &str) -> Result<Vec<Meeting>> {
        self.meetings.find_by_participant(user_id).await
    }

    pub async fn upcoming_for(&self, user_id: &str, now: DateTime<Utc>) -> Result<Vec<Meeting>> {
        let upcoming = self.meetings.find_upcoming(now).await?;
        Ok(upcoming
            .into_iter()
            .filter(|m| m.participants.iter().any(|p| p == user_id))
            .collect())
    }

    pub async fn all_meetings(&self) -> Result<Vec<Meeting>> {
        self.meetings.get_all().await
    }
}
