//! Entity repositories
//!
//! One repository per collection, all sharing the same access pattern:
//! read the whole collection, apply the change in memory, write the
//! whole collection back.

mod activities;
mod attendance;
mod course_stats;
mod courses;
mod emails;
mod meetings;
mod notifications;
mod users;

pub use activities::ActivityRepository;
pub use attendance::AttendanceRepository;
pub use course_stats::CourseStatRepository;
pub use courses::CourseRepository;
pub use emails::EmailRepository;
pub use meetings::MeetingRepository;
pub use notifications::NotificationRepository;
pub use users::UserRepository;
