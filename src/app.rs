//! Application state and startup wiring

use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::Result;
use crate::mailer::Mailer;
use crate::services::{
    AuthService, CourseService, DashboardService, EmailCampaignService, MeetingService,
    NotificationService,
};
use crate::store::repos::{
    ActivityRepository, AttendanceRepository, CourseRepository, CourseStatRepository,
    EmailRepository, MeetingRepository, NotificationRepository, UserRepository,
};
use crate::store::{initialize_store, CollectionStore, SessionStore};

/// Shared handles for the whole application. Cloning is cheap; the
/// HTTP router carries one copy per connection.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: CollectionStore,
    pub auth: AuthService,
    pub courses: CourseService,
    pub meetings: MeetingService,
    pub emails: EmailCampaignService,
    pub notifications: NotificationService,
    pub dashboard: DashboardService,
    pub mailer: Option<Mailer>,
}

impl AppState {
    /// Prepares the data directory, seeds the demo accounts and wires
    /// up every service.
    pub async fn initialize(config: AppConfig) -> Result<Self> {
        let store = CollectionStore::new(&config.data_dir);
        initialize_store(&store).await?;

        let mailer = match &config.mailer {
            Some(mailer_config) => Some(Mailer::smtp(mailer_config, config.base_url.as_str())?),
            None => {
                tracing::warn!("No SMTP relay configured, email endpoints will reject sends");
                None
            }
        };

        let users = UserRepository::new(store.clone());
        let courses = CourseRepository::new(store.clone());
        let course_stats = CourseStatRepository::new(store.clone());
        let meetings = MeetingRepository::new(store.clone());
        let attendance = AttendanceRepository::new(store.clone());
        let notifications = NotificationRepository::new(store.clone());
        let emails = EmailRepository::new(store.clone());
        let activity = ActivityRepository::new(store.clone());
        let session = SessionStore::new(store.clone());

        Ok(Self {
            config: Arc::new(config),
            auth: AuthService::new(users.clone(), session, activity.clone()),
            courses: CourseService::new(
                courses.clone(),
                course_stats.clone(),
                notifications.clone(),
                activity.clone(),
            ),
            meetings: MeetingService::new(
                meetings.clone(),
                attendance,
                notifications.clone(),
                activity.clone(),
            ),
            emails: EmailCampaignService::new(emails.clone(), activity.clone(), mailer.clone()),
            notifications: NotificationService::new(notifications.clone()),
            dashboard: DashboardService::new(
                users, courses, course_stats, meetings, emails, notifications, activity,
            ),
            mailer,
            store,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn initialize_seeds_and_runs_without_smtp() {
        let dir = tempdir().unwrap();
        let config = AppConfig {
            data_dir: dir.path().to_path_buf(),
            bind_addr: "127.0.0.1:0".to_string(),
            base_url: "http://localhost:8080".to_string(),
            mailer: None,
        };

        let state = AppState::initialize(config).await.unwrap();
        assert!(state.mailer.is_none());

        let user = state
            .auth
            .login(crate::config::DEMO_HR_EMAIL, crate::config::DEMO_HR_PASSWORD)
            .await
            .unwrap();
        assert_eq!(user.email, crate::config::DEMO_HR_EMAIL);
    }
}
