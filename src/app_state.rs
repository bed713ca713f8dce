use std::sync::Arc;

use crate::{
    auth::JwtService,
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        AttemptRepository, CourseRepository, EnrollmentRepository, LessonProgressRepository,
        MongoAttemptRepository, MongoCourseRepository, MongoEnrollmentRepository,
        MongoLessonProgressRepository, MongoNotificationRepository, MongoTestRepository,
        MongoUserRepository, NotificationRepository, TestRepository, UserRepository,
    },
    services::{
        AccessGate, CourseService, EnrollmentService, NotificationService, ProgressService,
        TestService,
    },
};

/// One handle per aggregate store.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub courses: Arc<dyn CourseRepository>,
    pub tests: Arc<dyn TestRepository>,
    pub attempts: Arc<dyn AttemptRepository>,
    pub enrollments: Arc<dyn EnrollmentRepository>,
    pub lesson_progress: Arc<dyn LessonProgressRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
}

#[derive(Clone)]
pub struct AppState {
    pub test_service: Arc<TestService>,
    pub course_service: Arc<CourseService>,
    pub enrollment_service: Arc<EnrollmentService>,
    pub progress_service: Arc<ProgressService>,
    pub notification_service: Arc<NotificationService>,
    pub jwt_service: Arc<JwtService>,
    pub config: Arc<Config>,
    /// `None` when the state runs on non-Mongo repositories.
    pub db: Option<Database>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let users = Arc::new(MongoUserRepository::new(&db));
        users.ensure_indexes().await?;
        let courses = Arc::new(MongoCourseRepository::new(&db));
        courses.ensure_indexes().await?;
        let tests = Arc::new(MongoTestRepository::new(&db));
        tests.ensure_indexes().await?;
        let attempts = Arc::new(MongoAttemptRepository::new(&db));
        attempts.ensure_indexes().await?;
        let enrollments = Arc::new(MongoEnrollmentRepository::new(&db));
        enrollments.ensure_indexes().await?;
        let lesson_progress = Arc::new(MongoLessonProgressRepository::new(&db));
        lesson_progress.ensure_indexes().await?;
        let notifications = Arc::new(MongoNotificationRepository::new(&db));
        notifications.ensure_indexes().await?;

        let repositories = Repositories {
            users,
            courses,
            tests,
            attempts,
            enrollments,
            lesson_progress,
            notifications,
        };

        Ok(Self::from_repositories(config, repositories, Some(db)))
    }

    pub fn from_repositories(config: Config, repos: Repositories, db: Option<Database>) -> Self {
        let access_gate = Arc::new(AccessGate::new(
            repos.enrollments.clone(),
            repos.attempts.clone(),
        ));

        let test_service = Arc::new(TestService::new(
            repos.tests.clone(),
            repos.attempts.clone(),
            repos.courses.clone(),
            repos.notifications.clone(),
            access_gate.clone(),
        ));
        let course_service = Arc::new(CourseService::new(repos.courses.clone()));
        let enrollment_service = Arc::new(EnrollmentService::new(
            repos.enrollments.clone(),
            repos.courses.clone(),
            repos.users.clone(),
            repos.notifications.clone(),
        ));
        let progress_service = Arc::new(ProgressService::new(
            repos.lesson_progress.clone(),
            repos.courses.clone(),
            repos.enrollments.clone(),
            repos.users.clone(),
            access_gate,
        ));
        let notification_service = Arc::new(NotificationService::new(repos.notifications));

        let jwt_service = Arc::new(JwtService::new(
            &config.jwt_secret,
            config.jwt_expiration_hours,
        ));

        Self {
            test_service,
            course_service,
            enrollment_service,
            progress_service,
            notification_service,
            jwt_service,
            config: Arc::new(config),
            db,
        }
    }
}
