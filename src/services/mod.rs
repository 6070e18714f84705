//! Business logic services
//!
//! Services own the repositories they operate over and keep the side
//! effects together: progress updates raise notifications, schedule
//! changes fan out to participants, sends get logged to the activity
//! feed.

pub mod auth;
pub mod calendar;
pub mod courses;
pub mod dashboard;
pub mod emails;
pub mod meetings;
pub mod metrics;
pub mod notifications;

pub use auth::{can_access, AuthService, Resource};
pub use calendar::{month_grid, CalendarCell};
pub use courses::CourseService;
pub use dashboard::{DashboardService, EmployeeOverview, HrOverview};
pub use emails::{CampaignInput, EmailCampaignService};
pub use meetings::{MeetingService, ScheduleMeeting};
pub use metrics::{email_stats, EmailStats};
pub use notifications::NotificationService;
