//! Course lifecycle and progress
//!
//! Lessons complete strictly in order: only the next incomplete lesson
//! is accepted, re-completing an earlier one is a no-op, skipping ahead
//! is rejected. Points land exactly once, when the last lesson closes.

use crate::config;
use crate::error::{AppError, Result};
use crate::services::metrics;
use crate::store::models::{
    ActivityKind, Course, CoursePatch, CourseStat, NewCourse, NotificationKind,
};
use crate::store::repos::{
    ActivityRepository, CourseRepository, CourseStatRepository, NotificationRepository,
};

#[derive(Debug, Clone)]
pub struct CourseService {
    courses: CourseRepository,
    stats: CourseStatRepository,
    notifications: NotificationRepository,
    activity: ActivityRepository,
}

impl CourseService {
    pub fn new(
        courses: CourseRepository,
        stats: CourseStatRepository,
        notifications: NotificationRepository,
        activity: ActivityRepository,
    ) -> Self {
        Self {
            courses,
            stats,
            notifications,
            activity,
        }
    }

    pub async fn create_course(&self, input: NewCourse) -> Result<Course> {
        if input.title.trim().is_empty() {
            return Err(AppError::Validation("Course title is required".to_string()));
        }
        if input.title.len() > config::MAX_TITLE_LENGTH {
            return Err(AppError::Validation(format!(
                "Course title exceeds {} characters",
                config::MAX_TITLE_LENGTH
            )));
        }

        let course = self.courses.create(input).await?;
        self.activity
            .record(
                ActivityKind::CourseCreated,
                &format!("Course '{}' created", course.title),
            )
            .await?;
        Ok(course)
    }

    pub async fn update_course(&self, id: &str, patch: CoursePatch) -> Result<Course> {
        self.courses
            .update(id, patch)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Course {} not found", id)))
    }

    pub async fn get_course(&self, id: &str) -> Result<Course> {
        self.courses
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Course {} not found", id)))
    }

    pub async fn all_courses(&self) -> Result<Vec<Course>> {
        self.courses.get_all().await
    }

    pub async fn assigned_courses(&self, user_id: &str) -> Result<Vec<Course>> {
        self.courses.find_assigned_to(user_id).await
    }

    /// Assigns the course and creates the user's progress row; the
    /// assignee is notified. Re-assigning keeps existing progress.
    pub async fn assign(&self, course_id: &str, user_id: &str) -> Result<Course> {
        let course = self
            .courses
            .assign_to(course_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Course {} not found", course_id)))?;

        if self.stats.find(user_id, course_id).await?.is_none() {
            self.stats
                .upsert(CourseStat::fresh(
                    user_id,
                    course_id,
                    course.lessons.len() as u32,
                ))
                .await?;
        }

        self.notifications
            .create(
                user_id,
                NotificationKind::CourseAssigned,
                "New course assigned",
                &format!("You have been assigned '{}'", course.title),
            )
            .await?;

        Ok(course)
    }

    /// Marks the course started without completing anything.
    pub async fn start_course(&self, user_id: &str, course_id: &str) -> Result<CourseStat> {
        let course = self.get_course(course_id).await?;

        let mut stat = self
            .stats
            .find(user_id, course_id)
            .await?
            .unwrap_or_else(|| {
                CourseStat::fresh(user_id, course_id, course.lessons.len() as u32)
            });
        stat.started = true;
        self.stats.upsert(stat).await
    }

    /// Completes one lesson for the user, enforcing lesson order.
    pub async fn complete_lesson(
        &self,
        user_id: &str,
        course_id: &str,
        lesson_id: &str,
    ) -> Result<CourseStat> {
        let course = self.get_course(course_id).await?;

        let position = course
            .lessons
            .iter()
            .position(|l| l.id == lesson_id)
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Lesson {} not found in course {}",
                    lesson_id, course_id
                ))
            })? as u32;

        let mut stat = self
            .stats
            .find(user_id, course_id)
            .await?
            .unwrap_or_else(|| {
                CourseStat::fresh(user_id, course_id, course.lessons.len() as u32)
            });
        stat.total_lessons = course.lessons.len() as u32;

        // already done, nothing to write
        if position < stat.lessons_completed {
            return Ok(stat);
        }
        if position > stat.lessons_completed {
            return Err(AppError::Validation(format!(
                "Lesson {} comes after the next incomplete lesson",
                lesson_id
            )));
        }

        stat.started = true;
        stat.lessons_completed += 1;

        let newly_finished =
            stat.lessons_completed == stat.total_lessons && stat.points_earned == 0;
        if newly_finished {
            stat.points_earned = course.points;
        }

        let stat = self.stats.upsert(stat).await?;

        if newly_finished {
            self.notifications
                .create(
                    user_id,
                    NotificationKind::CourseCompleted,
                    "Course completed",
                    &format!(
                        "You finished '{}' and earned {} points",
                        course.title, course.points
                    ),
                )
                .await?;
            self.activity
                .record(
                    ActivityKind::CourseCompleted,
                    &format!("Course '{}' completed", course.title),
                )
                .await?;
        }

        Ok(stat)
    }

    /// Completion percentage for the user on the course, 0 when the
    /// user has no progress row.
    pub async fn progress_for(&self, user_id: &str, course_id: &str) -> Result<f64> {
        let stat = self.stats.find(user_id, course_id).await?;
        Ok(stat
            .as_ref()
            .map(metrics::completion_percent)
            .unwrap_or(0.0))
    }

    pub async fn user_points(&self, user_id: &str) -> Result<i64> {
        let stats = self.stats.find_by_user(user_id).await?;
        Ok(metrics::total_points(&stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::{LessonKind, NewLesson};
    use crate::store::CollectionStore;
    use tempfile::tempdir;

    async fn create_test_service() -> (CourseService, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let store = CollectionStore::new(dir.path());
        store.initialize().await.unwrap();

        let service = CourseService::new(
            CourseRepository::new(store.clone()),
            CourseStatRepository::new(store.clone()),
            NotificationRepository::new(store.clone()),
            ActivityRepository::new(store),
        );
        (service, dir)
    }

    fn three_lesson_course(points: i64) -> NewCourse {
        let lesson = |title: &str| NewLesson {
            title: title.to_string(),
            kind: LessonKind::Text,
            file_url: None,
            file_name: None,
        };
        NewCourse {
            title: "Onboarding".to_string(),
            description: "Start here".to_string(),
            lessons: vec![lesson("One"), lesson("Two"), lesson("Three")],
            points,
            created_by: "hr1".to_string(),
            status: None,
        }
    }

    #[tokio::test]
    async fn lessons_complete_in_order() {
        let (service, _dir) = create_test_service().await;
        let course = service.create_course(three_lesson_course(30)).await.unwrap();

        let stat = service
            .complete_lesson("u1", &course.id, &course.lessons[0].id)
            .await
            .unwrap();
        assert_eq!(stat.lessons_completed, 1);
        assert!(stat.started);

        let stat = service
            .complete_lesson("u1", &course.id, &course.lessons[1].id)
            .await
            .unwrap();
        assert_eq!(stat.lessons_completed, 2);
    }

    #[tokio::test]
    async fn skipping_ahead_is_rejected() {
        let (service, _dir) = create_test_service().await;
        let course = service.create_course(three_lesson_course(30)).await.unwrap();

        let result = service
            .complete_lesson("u1", &course.id, &course.lessons[2].id)
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let progress = service.progress_for("u1", &course.id).await.unwrap();
        assert_eq!(progress, 0.0);
    }

    #[tokio::test]
    async fn recompleting_a_done_lesson_changes_nothing() {
        let (service, _dir) = create_test_service().await;
        let course = service.create_course(three_lesson_course(30)).await.unwrap();

        service
            .complete_lesson("u1", &course.id, &course.lessons[0].id)
            .await
            .unwrap();
        let stat = service
            .complete_lesson("u1", &course.id, &course.lessons[0].id)
            .await
            .unwrap();

        assert_eq!(stat.lessons_completed, 1);
        assert_eq!(service.user_points("u1").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn points_are_awarded_exactly_once_on_completion() {
        let (service, _dir) = create_test_service().await;
        let course = service.create_course(three_lesson_course(30)).await.unwrap();

        for lesson in &course.lessons {
            service
                .complete_lesson("u1", &course.id, &lesson.id)
                .await
                .unwrap();
        }
        assert_eq!(service.user_points("u1").await.unwrap(), 30);
        assert_eq!(service.progress_for("u1", &course.id).await.unwrap(), 100.0);

        // completing the last lesson again is a no-op
        let stat = service
            .complete_lesson("u1", &course.id, &course.lessons[2].id)
            .await
            .unwrap();
        assert_eq!(stat.points_earned, 30);
        assert_eq!(service.user_points("u1").await.unwrap(), 30);
    }

    #[tokio::test]
    async fn assign_notifies_and_creates_progress_row() {
        let (service, _dir) = create_test_service().await;
        let course = service.create_course(three_lesson_course(30)).await.unwrap();

        service.assign(&course.id, "u1").await.unwrap();
        let progress = service.progress_for("u1", &course.id).await.unwrap();
        assert_eq!(progress, 0.0);

        let assigned = service.assigned_courses("u1").await.unwrap();
        assert_eq!(assigned.len(), 1);
    }

    #[tokio::test]
    async fn reassigning_keeps_progress() {
        let (service, _dir) = create_test_service().await;
        let course = service.create_course(three_lesson_course(30)).await.unwrap();

        service.assign(&course.id, "u1").await.unwrap();
        service
            .complete_lesson("u1", &course.id, &course.lessons[0].id)
            .await
            .unwrap();
        service.assign(&course.id, "u1").await.unwrap();

        let stat = service
            .complete_lesson("u1", &course.id, &course.lessons[0].id)
            .await
            .unwrap();
        assert_eq!(stat.lessons_completed, 1);
    }

    #[tokio::test]
    async fn empty_title_is_rejected() {
        let (service, _dir) = create_test_service().await;

        let mut input = three_lesson_course(30);
        input.title = "  ".to_string();
        let result = service.create_course(input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn overlong_title_is_rejected() {
        let (service, _dir) = create_test_service().await;

        let mut input = three_lesson_course(30);
        input.title = "x".repeat(config::MAX_TITLE_LENGTH + 1);
        let result = service.create_course(input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
