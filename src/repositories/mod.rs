pub mod attempt_repository;
pub mod course_repository;
pub mod enrollment_repository;
pub mod lesson_progress_repository;
pub mod notification_repository;
pub mod test_repository;
pub mod user_repository;

use mongodb::{bson::Document, options::IndexOptions, IndexModel};

pub use attempt_repository::{AttemptRepository, MongoAttemptRepository};
pub use course_repository::{CourseRepository, MongoCourseRepository};
pub use enrollment_repository::{EnrollmentRepository, MongoEnrollmentRepository};
pub use lesson_progress_repository::{LessonProgressRepository, MongoLessonProgressRepository};
pub use notification_repository::{MongoNotificationRepository, NotificationRepository};
pub use test_repository::{MongoTestRepository, TestRepository};
pub use user_repository::{MongoUserRepository, UserRepository};

#[cfg(test)]
pub use attempt_repository::MockAttemptRepository;
#[cfg(test)]
pub use course_repository::MockCourseRepository;
#[cfg(test)]
pub use enrollment_repository::MockEnrollmentRepository;
#[cfg(test)]
pub use lesson_progress_repository::MockLessonProgressRepository;
#[cfg(test)]
pub use notification_repository::MockNotificationRepository;
#[cfg(test)]
pub use test_repository::MockTestRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;

pub(crate) fn index(keys: Document, name: &str, unique: bool) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(
            IndexOptions::builder()
                .unique(unique)
                .name(name.to_string())
                .build(),
        )
        .build()
}
