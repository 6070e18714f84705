//! Course repository

use chrono::Utc;

use crate::error::Result;
use crate::store::models::{Course, CoursePatch, Lesson, NewCourse};
use crate::store::{collections, generate_id, CollectionStore};

#[derive(Debug, Clone)]
pub struct CourseRepository {
    store: CollectionStore,
}

impl CourseRepository {
    pub fn new(store: CollectionStore) -> Self {
        Self { store }
    }

    async fn load(&self) -> Result<Vec<Course>> {
        self.store.read_collection(collections::COURSES).await
    }

    async fn save(&self, courses: &[Course]) -> Result<()> {
        self.store
            .write_collection(collections::COURSES, courses)
            .await
    }

    pub async fn create(&self, input: NewCourse) -> Result<Course> {
        let mut courses = self.load().await?;

        let lessons = input
            .lessons
            .into_iter()
            .map(|l| Lesson {
                id: generate_id(),
                title: l.title,
                kind: l.kind,
                file_url: l.file_url,
                file_name: l.file_name,
            })
            .collect();

        let course = Course {
            id: generate_id(),
            title: input.title,
            description: input.description,
            lessons,
            assigned_to: Vec::new(),
            points: input.points,
            created_by: input.created_by,
            status: input.status,
            created_at: Utc::now(),
        };
        courses.push(course.clone());
        self.save(&courses).await?;

        tracing::debug!("Created course: {}", course.id);
        Ok(course)
    }

    pub async fn get_all(&self) -> Result<Vec<Course>> {
        self.load().await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Course>> {
        let courses = self.load().await?;
        Ok(courses.into_iter().find(|c| c.id == id))
    }

    pub async fn find_assigned_to(&self, user_id: &str) -> Result<Vec<Course>> {
        let courses = self.load().await?;
        Ok(courses
            .into_iter()
            .filter(|c| c.assigned_to.iter().any(|u| u == user_id))
            .collect())
    }

    pub async fn find_by_creator(&self, user_id: &str) -> Result<Vec<Course>> {
        let courses = self.load().await?;
        Ok(courses
            .into_iter()
            .filter(|c| c.created_by == user_id)
            .collect())
    }

    /// Adds the user to the assignment list. Assigning twice leaves a
    /// single entry.
    pub async fn assign_to(&self, course_id: &str, user_id: &str) -> Result<Option<Course>> {
        let mut courses = self.load().await?;

        let Some(course) = courses.iter_mut().find(|c| c.id == course_id) else {
            return Ok(None);
        };

        if !course.assigned_to.iter().any(|u| u == user_id) {
            course.assigned_to.push(user_id.to_string());
        }

        let updated = course.clone();
        self.save(&courses).await?;

        tracing::debug!("Assigned course {} to user {}", course_id, user_id);
        Ok(Some(updated))
    }

    pub async fn update(&self, id: &str, patch: CoursePatch) -> Result<Option<Course>> {
        let mut courses = self.load().await?;

        let Some(course) = courses.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };

        if let Some(title) = patch.title {
            course.title = title;
        }
        if let Some(description) = patch.description {
            course.description = description;
        }
        if let Some(points) = patch.points {
            course.points = points;
        }
        if let Some(status) = patch.status {
            course.status = Some(status);
        }
        if let Some(lessons) = patch.lessons {
            course.lessons = lessons;
        }

        let updated = course.clone();
        self.save(&courses).await?;

        tracing::debug!("Updated course: {}", id);
        Ok(Some(updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::{LessonKind, NewLesson};
    use tempfile::tempdir;

    async fn create_test_repo() -> (CourseRepository, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let store = CollectionStore::new(dir.path());
        store.initialize().await.unwrap();
        (CourseRepository::new(store), dir)
    }

    fn new_course(title: &str) -> NewCourse {
        NewCourse {
            title: title.to_string(),
            description: "About things".to_string(),
            lessons: vec![
                NewLesson {
                    title: "One".to_string(),
                    kind: LessonKind::Video,
                    file_url: None,
                    file_name: None,
                },
                NewLesson {
                    title: "Two".to_string(),
                    kind: LessonKind::Text,
                    file_url: None,
                    file_name: None,
                },
            ],
            points: 50,
            created_by: "hr1".to_string(),
            status: None,
        }
    }

    #[tokio::test]
    async fn create_assigns_lesson_ids() {
        let (repo, _dir) = create_test_repo().await;

        let course = repo.create(new_course("Onboarding")).await.unwrap();
        assert_eq!(course.lessons.len(), 2);
        assert_ne!(course.lessons[0].id, course.lessons[1].id);
        assert!(course.assigned_to.is_empty());
    }

    #[tokio::test]
    async fn assign_is_idempotent() {
        let (repo, _dir) = create_test_repo().await;
        let course = repo.create(new_course("Onboarding")).await.unwrap();

        repo.assign_to(&course.id, "u1").await.unwrap();
        let updated = repo.assign_to(&course.id, "u1").await.unwrap().unwrap();

        assert_eq!(updated.assigned_to, vec!["u1".to_string()]);
    }

    #[tokio::test]
    async fn assign_to_missing_course_returns_none() {
        let (repo, _dir) = create_test_repo().await;

        let result = repo.assign_to("nope", "u1").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn find_assigned_filters_by_user() {
        let (repo, _dir) = create_test_repo().await;
        let a = repo.create(new_course("A")).await.unwrap();
        let b = repo.create(new_course("B")).await.unwrap();
        repo.create(new_course("C")).await.unwrap();

        repo.assign_to(&a.id, "u1").await.unwrap();
        repo.assign_to(&b.id, "u1").await.unwrap();
        repo.assign_to(&b.id, "u2").await.unwrap();

        let mine = repo.find_assigned_to("u1").await.unwrap();
        assert_eq!(mine.len(), 2);
    }

    #[tokio::test]
    async fn update_merges_patch() {
        let (repo, _dir) = create_test_repo().await;
        let course = repo.create(new_course("Draft title")).await.unwrap();

        let patch = CoursePatch {
            title: Some("Final title".to_string()),
            points: Some(75),
            ..Default::default()
        };
        let updated = repo.update(&course.id, patch).await.unwrap().unwrap();

        assert_eq!(updated.title, "Final title");
        assert_eq!(updated.points, 75);
        assert_eq!(updated.description, "About things");
        assert_eq!(updated.lessons.len(), 2);
    }
}
