//! Persisted record types
//!
//! Every struct serializes with camelCase keys, matching the JSON
//! layout of the collection files on disk.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Users
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Hr,
    Admin,
    Employee,
    Candidate,
}

impl Role {
    /// HR and admin share the back-office capabilities.
    pub fn is_privileged(&self) -> bool {
        matches!(self, Role::Hr | Role::Admin)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    /// Stored in the clear; the demo deliberately has no credential
    /// infrastructure.
    pub password: String,
    pub role: Role,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub role: Role,
    pub name: String,
    #[serde(default)]
    pub department: Option<String>,
}

/// Partial update; only the fields present are overwritten.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
    pub name: Option<String>,
    pub department: Option<String>,
    pub is_active: Option<bool>,
    pub progress: Option<f64>,
}

// ============================================================================
// Courses
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseStatus {
    Draft,
    Published,
    Archived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonKind {
    Video,
    Document,
    Text,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: LessonKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Ordered; lesson position drives completion gating
    pub lessons: Vec<Lesson>,
    /// User ids the course is assigned to
    pub assigned_to: Vec<String>,
    /// Points awarded on full completion
    pub points: i64,
    pub created_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CourseStatus>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLesson {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: LessonKind,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCourse {
    pub title: String,
    pub description: String,
    pub lessons: Vec<NewLesson>,
    pub points: i64,
    pub created_by: String,
    #[serde(default)]
    pub status: Option<CourseStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoursePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub points: Option<i64>,
    pub status: Option<CourseStatus>,
    pub lessons: Option<Vec<Lesson>>,
}

/// Per-user, per-course progress. Keyed by the (user, course) pair
/// rather than an id of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseStat {
    pub user_id: String,
    pub course_id: String,
    pub started: bool,
    pub lessons_completed: u32,
    pub total_lessons: u32,
    pub points_earned: i64,
}

impl CourseStat {
    /// Fresh row for a user who has not touched the course yet.
    pub fn fresh(user_id: &str, course_id: &str, total_lessons: u32) -> Self {
        Self {
            user_id: user_id.to_string(),
            course_id: course_id.to_string(),
            started: false,
            lessons_completed: 0,
            total_lessons,
            points_earned: 0,
        }
    }
}

// ============================================================================
// Meetings
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub id: String,
    pub title: String,
    pub description: String,
    pub scheduled_at: DateTime<Utc>,
    /// Participant user ids
    pub participants: Vec<String>,
    pub created_by: String,
    pub meeting_link: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMeeting {
    pub title: String,
    pub description: String,
    pub scheduled_at: DateTime<Utc>,
    pub participants: Vec<String>,
    pub created_by: String,
    pub meeting_link: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub participants: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub id: String,
    pub meeting_id: String,
    pub user_id: String,
    pub joined_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_at: Option<DateTime<Utc>>,
    /// Seconds between join and leave, 0 while still in the meeting
    pub duration: i64,
    pub status: AttendanceStatus,
}

// ============================================================================
// Notifications
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    MeetingScheduled,
    MeetingCancelled,
    CourseAssigned,
    CourseCompleted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Emails
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailLink {
    pub url: String,
    pub clicked: bool,
}

/// Log row for one sent campaign email.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Email {
    pub id: String,
    pub sender_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<String>,
    pub recipient_email: String,
    pub subject: String,
    pub sent_at: DateTime<Utc>,
    pub opened: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opened_at: Option<DateTime<Utc>>,
    pub links: Vec<EmailLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEmail {
    pub sender_id: String,
    #[serde(default)]
    pub recipient_id: Option<String>,
    pub recipient_email: String,
    pub subject: String,
    /// URLs embedded in the message body, tracked per link
    #[serde(default)]
    pub links: Vec<String>,
    #[serde(default)]
    pub tracking_id: Option<String>,
}

// ============================================================================
// Activity Feed
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    UserCreated,
    UserDeleted,
    CourseCreated,
    CourseCompleted,
    MeetingScheduled,
    MeetingDeleted,
    EmailSent,
    Login,
    Logout,
}

/// Append-only audit feed entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}
