#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use secrecy::SecretString;
use tokio::sync::RwLock;

use learnhub_server::{
    app_state::{AppState, Repositories},
    auth::Claims,
    config::Config,
    errors::{AppError, AppResult},
    models::domain::{
        Attempt, Course, Enrollment, Lesson, LessonProgress, LessonType, Module, Notification,
        Question, QuestionOption, QuestionType, Test, User, UserRole,
    },
    repositories::{
        AttemptRepository, CourseRepository, EnrollmentRepository, LessonProgressRepository,
        NotificationRepository, TestRepository, UserRepository,
    },
};

fn paginate<T: Clone>(items: Vec<T>, offset: i64, limit: i64) -> (Vec<T>, i64) {
    let total = items.len() as i64;
    let start = offset.max(0) as usize;
    let end = (start + limit.max(0) as usize).min(items.len());

    let page = if start >= items.len() {
        vec![]
    } else {
        items[start..end].to_vec()
    };

    (page, total)
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<String, User>>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn upsert(&self, mut user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        if let Some(existing) = users.get(&user.id) {
            user.created_at = existing.created_at;
        }
        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_ids(&self, ids: Vec<String>) -> AppResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }
}

#[derive(Default)]
pub struct InMemoryCourseRepository {
    courses: Arc<RwLock<HashMap<String, Course>>>,
}

#[async_trait]
impl CourseRepository for InMemoryCourseRepository {
    async fn create(&self, course: Course) -> AppResult<Course> {
        let mut courses = self.courses.write().await;
        if courses.contains_key(&course.id) {
            return Err(AppError::AlreadyExists(format!("Course '{}'", course.id)));
        }
        courses.insert(course.id.clone(), course.clone());
        Ok(course)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Course>> {
        Ok(self.courses.read().await.get(id).cloned())
    }

    async fn find_by_ids(&self, ids: Vec<String>) -> AppResult<Vec<Course>> {
        let courses = self.courses.read().await;
        Ok(ids.iter().filter_map(|id| courses.get(id).cloned()).collect())
    }

    async fn find_by_lesson_id(&self, lesson_id: &str) -> AppResult<Option<Course>> {
        let courses = self.courses.read().await;
        Ok(courses
            .values()
            .find(|c| c.find_lesson(lesson_id).is_some())
            .cloned())
    }

    async fn list_published(&self, offset: i64, limit: i64) -> AppResult<(Vec<Course>, i64)> {
        let courses = self.courses.read().await;
        let mut items: Vec<_> = courses.values().filter(|c| c.published).cloned().collect();
        items.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(paginate(items, offset, limit))
    }

    async fn update(&self, course: Course) -> AppResult<Course> {
        let mut courses = self.courses.write().await;
        if !courses.contains_key(&course.id) {
            return Err(AppError::NotFound(format!("Course '{}'", course.id)));
        }
        courses.insert(course.id.clone(), course.clone());
        Ok(course)
    }
}

#[derive(Default)]
pub struct InMemoryTestRepository {
    tests: Arc<RwLock<HashMap<String, Test>>>,
}

#[async_trait]
impl TestRepository for InMemoryTestRepository {
    async fn create(&self, test: Test) -> AppResult<Test> {
        self.tests.write().await.insert(test.id.clone(), test.clone());
        Ok(test)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Test>> {
        Ok(self.tests.read().await.get(id).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryAttemptRepository {
    attempts: Arc<RwLock<Vec<Attempt>>>,
}

impl InMemoryAttemptRepository {
    pub async fn count(&self) -> usize {
        self.attempts.read().await.len()
    }
}

#[async_trait]
impl AttemptRepository for InMemoryAttemptRepository {
    async fn create(&self, attempt: Attempt) -> AppResult<Attempt> {
        self.attempts.write().await.push(attempt.clone());
        Ok(attempt)
    }

    async fn has_user_attempted_test(&self, user_id: &str, test_id: &str) -> AppResult<bool> {
        Ok(self
            .attempts
            .read()
            .await
            .iter()
            .any(|a| a.user_id == user_id && a.test_id == test_id))
    }

    async fn get_user_attempts(
        &self,
        user_id: &str,
        test_id: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Attempt>, i64)> {
        let attempts = self.attempts.read().await;
        let mut items: Vec<_> = attempts
            .iter()
            .filter(|a| a.user_id == user_id && a.test_id == test_id)
            .cloned()
            .collect();
        items.reverse();
        items.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        Ok(paginate(items, offset, limit))
    }
}

#[derive(Default)]
pub struct InMemoryEnrollmentRepository {
    enrollments: Arc<RwLock<Vec<Enrollment>>>,
}

#[async_trait]
impl EnrollmentRepository for InMemoryEnrollmentRepository {
    async fn upsert(&self, enrollment: Enrollment) -> AppResult<(Enrollment, bool)> {
        let mut enrollments = self.enrollments.write().await;
        if let Some(existing) = enrollments
            .iter_mut()
            .find(|e| e.user_id == enrollment.user_id && e.course_id == enrollment.course_id)
        {
            existing.notifications = enrollment.notifications;
            return Ok((existing.clone(), false));
        }
        enrollments.push(enrollment.clone());
        Ok((enrollment, true))
    }

    async fn find(&self, user_id: &str, course_id: &str) -> AppResult<Option<Enrollment>> {
        Ok(self
            .enrollments
            .read()
            .await
            .iter()
            .find(|e| e.user_id == user_id && e.course_id == course_id)
            .cloned())
    }

    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<Enrollment>> {
        Ok(self
            .enrollments
            .read()
            .await
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_by_course(&self, course_id: &str) -> AppResult<Vec<Enrollment>> {
        Ok(self
            .enrollments
            .read()
            .await
            .iter()
            .filter(|e| e.course_id == course_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryLessonProgressRepository {
    rows: Arc<RwLock<Vec<LessonProgress>>>,
}

#[async_trait]
impl LessonProgressRepository for InMemoryLessonProgressRepository {
    async fn find(&self, user_id: &str, lesson_id: &str) -> AppResult<Option<LessonProgress>> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .find(|r| r.user_id == user_id && r.lesson_id == lesson_id)
            .cloned())
    }

    async fn create(&self, progress: LessonProgress) -> AppResult<LessonProgress> {
        let mut rows = self.rows.write().await;
        if rows
            .iter()
            .any(|r| r.user_id == progress.user_id && r.lesson_id == progress.lesson_id)
        {
            return Err(AppError::AlreadyExists(format!(
                "Progress for lesson '{}'",
                progress.lesson_id
            )));
        }
        rows.push(progress.clone());
        Ok(progress)
    }

    async fn update(&self, progress: LessonProgress) -> AppResult<LessonProgress> {
        let mut rows = self.rows.write().await;
        let row = rows
            .iter_mut()
            .find(|r| r.id == progress.id)
            .ok_or_else(|| AppError::NotFound(format!("Progress '{}'", progress.id)))?;
        *row = progress.clone();
        Ok(progress)
    }

    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<LessonProgress>> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_by_user_and_course(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> AppResult<Vec<LessonProgress>> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .filter(|r| r.user_id == user_id && r.course_id == course_id)
            .cloned()
            .collect())
    }

    async fn list_by_course(&self, course_id: &str) -> AppResult<Vec<LessonProgress>> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .filter(|r| r.course_id == course_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryNotificationRepository {
    notifications: Arc<RwLock<Vec<Notification>>>,
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn create(&self, notification: Notification) -> AppResult<Notification> {
        self.notifications.write().await.push(notification.clone());
        Ok(notification)
    }

    async fn list_by_user(
        &self,
        user_id: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Notification>, i64)> {
        let notifications = self.notifications.read().await;
        let mut items: Vec<_> = notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        items.reverse();
        Ok(paginate(items, offset, limit))
    }

    async fn mark_read(&self, id: &str, user_id: &str) -> AppResult<Notification> {
        let mut notifications = self.notifications.write().await;
        let notification = notifications
            .iter_mut()
            .find(|n| n.id == id && n.user_id == user_id)
            .ok_or_else(|| AppError::NotFound(format!("Notification '{}' not found", id)))?;
        notification.is_read = true;
        Ok(notification.clone())
    }
}

/// In-memory stores behind an `AppState`, with typed handles kept for
/// seeding and inspection.
pub struct TestContext {
    pub state: AppState,
    pub courses: Arc<InMemoryCourseRepository>,
    pub tests: Arc<InMemoryTestRepository>,
    pub attempts: Arc<InMemoryAttemptRepository>,
    pub enrollments: Arc<InMemoryEnrollmentRepository>,
    pub lesson_progress: Arc<InMemoryLessonProgressRepository>,
    pub notifications: Arc<InMemoryNotificationRepository>,
}

pub fn test_config() -> Config {
    Config {
        mongo_conn_string: "mongodb://localhost:27017".to_string(),
        mongo_db_name: "learnhub-test".to_string(),
        web_server_host: "localhost".to_string(),
        web_server_port: 8080,
        jwt_secret: SecretString::from("integration_test_jwt_secret_key_0123456789".to_string()),
        jwt_expiration_hours: 1,
        cors_allowed_origin: "http://localhost:3000".to_string(),
        app_env: "test".to_string(),
    }
}

impl TestContext {
    pub fn new() -> Self {
        let users = Arc::new(InMemoryUserRepository::default());
        let courses = Arc::new(InMemoryCourseRepository::default());
        let tests = Arc::new(InMemoryTestRepository::default());
        let attempts = Arc::new(InMemoryAttemptRepository::default());
        let enrollments = Arc::new(InMemoryEnrollmentRepository::default());
        let lesson_progress = Arc::new(InMemoryLessonProgressRepository::default());
        let notifications = Arc::new(InMemoryNotificationRepository::default());

        let repositories = Repositories {
            users,
            courses: courses.clone(),
            tests: tests.clone(),
            attempts: attempts.clone(),
            enrollments: enrollments.clone(),
            lesson_progress: lesson_progress.clone(),
            notifications: notifications.clone(),
        };

        Self {
            state: AppState::from_repositories(test_config(), repositories, None),
            courses,
            tests,
            attempts,
            enrollments,
            lesson_progress,
            notifications,
        }
    }

    pub fn token_for(&self, claims: &Claims) -> String {
        self.state
            .jwt_service
            .create_token(&claims.to_user())
            .expect("token")
    }
}

pub fn claims(sub: &str, role: UserRole) -> Claims {
    Claims::new(&User::new(sub, None, &format!("{}@example.com", sub), role), 1)
}

/// Published course with two modules and three video lessons
/// (`l1`, `l2` in the first module, `l3` in the second), ten minutes each.
pub fn sample_course() -> Course {
    let mut course = Course::new_draft("Rust in Practice", None, 100.0, Some(60.0), "inst-1");
    course.id = "course-1".to_string();
    course.published = true;

    let lesson = |id: &str, order: i32| {
        let mut lesson = Lesson::new(&format!("Lesson {}", id), order, LessonType::Video, Some(10), "");
        lesson.id = id.to_string();
        lesson
    };

    let mut first = Module::new("Basics", 1);
    first.lessons = vec![lesson("l1", 1), lesson("l2", 2)];
    let mut second = Module::new("Traits", 2);
    second.lessons = vec![lesson("l3", 1)];

    course.modules = vec![first, second];
    course
}

/// Two one-point MCQ questions on `course-1`, full marks needed to pass.
pub fn sample_test() -> Test {
    let question = |id: &str| Question {
        id: id.to_string(),
        text: format!("Question {}", id),
        question_type: QuestionType::Mcq,
        points: 1,
        explanation: Some(format!("Because {}", id)),
        options: vec![
            QuestionOption {
                id: format!("{}-right", id),
                text: "right".to_string(),
                is_correct: true,
            },
            QuestionOption {
                id: format!("{}-wrong", id),
                text: "wrong".to_string(),
                is_correct: false,
            },
        ],
    };

    let mut test = Test::new(
        "Checkpoint",
        Some("course-1".to_string()),
        "inst-1",
        100,
        vec![question("q1"), question("q2")],
    );
    test.id = "test-1".to_string();
    test
}
