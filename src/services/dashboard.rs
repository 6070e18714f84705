//! Dashboard aggregates
//!
//! Read-only rollups for the two landing pages, recomputed from the
//! collections on every call.

use chrono::Utc;
use serde::Serialize;

use crate::error::Result;
use crate::services::metrics;
use crate::store::models::{Activity, Meeting};
use crate::store::repos::{
    ActivityRepository, CourseRepository, CourseStatRepository, EmailRepository,
    MeetingRepository, NotificationRepository, UserRepository,
};

const RECENT_ACTIVITY_LIMIT: usize = 10;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HrOverview {
    pub total_users: usize,
    pub active_users: usize,
    pub total_courses: usize,
    pub total_meetings: usize,
    pub emails_sent: usize,
    /// Mean course completion across all progress rows, percent
    pub average_completion: f64,
    pub total_points_awarded: i64,
    pub recent_activity: Vec<Activity>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseProgress {
    pub course_id: String,
    pub title: String,
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeOverview {
    pub courses: Vec<CourseProgress>,
    pub total_points: i64,
    pub upcoming_meetings: Vec<Meeting>,
    pub unread_notifications: usize,
}

#[derive(Debug, Clone)]
pub struct DashboardService {
    users: UserRepository,
    courses: CourseRepository,
    stats: CourseStatRepository,
    meetings: MeetingRepository,
    emails: EmailRepository,
    notifications: NotificationRepository,
    activity: ActivityRepository,
}

impl DashboardService {
    pub fn new(
        users: UserRepository,
        courses: CourseRepository,
        stats: CourseStatRepository,
        meetings: MeetingRepository,
        emails: EmailRepository,
        notifications: NotificationRepository,
        activity: ActivityRepository,
    ) -> Self {
        Self {
            users,
            courses,
            stats,
            meetings,
            emails,
            notifications,
            activity,
        }
    }

    pub async fn hr_overview(&self) -> Result<HrOverview> {
        let users = self.users.get_all().await?;
        let stats = self.stats.get_all().await?;

        Ok(HrOverview {
            total_users: users.len(),
            active_users: users.iter().filter(|u| u.is_active != Some(false)).count(),
            total_courses: self.courses.get_all().await?.len(),
            total_meetings: self.meetings.get_all().await?.len(),
            emails_sent: self.emails.get_all().await?.len(),
            average_completion: metrics::average_progress(&stats),
            total_points_awarded: metrics::total_points(&stats),
            recent_activity: self.activity.recent(RECENT_ACTIVITY_LIMIT).await?,
        })
    }

    pub async fn employee_overview(&self, user_id: &str) -> Result<EmployeeOverview> {
        let assigned = self.courses.find_assigned_to(user_id).await?;
        let stats = self.stats.find_by_user(user_id).await?;

        let courses = assigned
            .into_iter()
            .map(|course| {
                let percent = stats
                    .iter()
                    .find(|s| s.course_id == course.id)
                    .map(metrics::completion_percent)
                    .unwrap_or(0.0);
                CourseProgress {
                    course_id: course.id,
                    title: course.title,
                    percent,
                }
            })
            .collect();

        let upcoming_meetings = self
            .meetings
            .find_upcoming(Utc::now())
            .await?
            .into_iter()
            .filter(|m| m.participants.iter().any(|p| p == user_id))
            .collect();

        Ok(EmployeeOverview {
            courses,
            total_points: metrics::total_points(&stats),
            upcoming_meetings,
            unread_notifications: self.notifications.unread_count(user_id).await?,
        })
    }
}
