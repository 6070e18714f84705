//! Authentication and access control
//!
//! Login matches credentials against the stored users and places the
//! match in the session slot. Access control is a single capability
//! check over role, not string comparisons scattered at call sites.

use crate::error::{AppError, Result};
use crate::store::models::{ActivityKind, Role, User};
use crate::store::repos::{ActivityRepository, UserRepository};
use crate::store::SessionStore;

/// A capability-gated area of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    HrDashboard,
    EmployeeDashboard,
    CourseAuthoring,
    MeetingScheduling,
    EmailCampaigns,
    UserManagement,
    Reports,
}

/// Whether the user may enter the given area. Deactivated accounts are
/// denied everything.
pub fn can_access(user: &User, resource: Resource) -> bool {
    if user.is_active == Some(false) {
        return false;
    }

    match resource {
        Resource::EmployeeDashboard => matches!(user.role, Role::Employee | Role::Candidate),
        Resource::HrDashboard
        | Resource::CourseAuthoring
        | Resource::MeetingScheduling
        | Resource::EmailCampaigns
        | Resource::UserManagement
        | Resource::Reports => user.role.is_privileged(),
    }
}

#[derive(Debug, Clone)]
pub struct AuthService {
    users: UserRepository,
    session: SessionStore,
    activity: ActivityRepository,
}

impl AuthService {
    pub fn new(users: UserRepository, session: SessionStore, activity: ActivityRepository) -> Self {
        Self {
            users,
            session,
            activity,
        }
    }

    /// Logs the user in on an exact credential match. The session slot
    /// is left untouched when the credentials do not match.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let Some(user) = self.users.find_by_credentials(email, password).await? else {
            tracing::info!("Rejected login for {}", email);
            return Err(AppError::InvalidCredentials);
        };

        self.session.set_current_user(&user).await?;
        self.activity
            .record(ActivityKind::Login, &format!("{} logged in", user.name))
            .await?;

        tracing::info!("User {} logged in", user.id);
        Ok(user)
    }

    /// Clears the session. Logging out with no session is a no-op.
    pub async fn logout(&self) -> Result<()> {
        if let Some(user) = self.session.current_user().await? {
            self.activity
                .record(ActivityKind::Logout, &format!("{} logged out", user.name))
                .await?;
            tracing::info!("User {} logged out", user.id);
        }
        self.session.clear().await
    }

    pub async fn current_user(&self) -> Result<Option<User>> {
        self.session.current_user().await
    }
}
