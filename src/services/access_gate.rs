use std::sync::Arc;

use crate::{
    auth::{is_admin, is_owner_or_admin, Claims},
    errors::{AppError, AppResult},
    models::domain::{Course, Enrollment, Test},
    repositories::{AttemptRepository, EnrollmentRepository},
};

/// Authorization checks shared by the test, course and progress services.
pub struct AccessGate {
    enrollment_repository: Arc<dyn EnrollmentRepository>,
    attempt_repository: Arc<dyn AttemptRepository>,
}

impl AccessGate {
    pub fn new(
        enrollment_repository: Arc<dyn EnrollmentRepository>,
        attempt_repository: Arc<dyn AttemptRepository>,
    ) -> Self {
        Self {
            enrollment_repository,
            attempt_repository,
        }
    }

    pub async fn ensure_enrolled(&self, user_id: &str, course_id: &str) -> AppResult<Enrollment> {
        self.enrollment_repository
            .find(user_id, course_id)
            .await?
            .ok_or_else(|| {
                log::warn!(
                    "Denied access to course {} for non-enrolled user {}",
                    course_id,
                    user_id
                );
                AppError::Forbidden("You are not enrolled in this course".to_string())
            })
    }

    pub fn ensure_course_owner(&self, claims: &Claims, course: &Course) -> AppResult<()> {
        if is_owner_or_admin(claims, &course.instructor_id) {
            return Ok(());
        }

        log::warn!(
            "Denied instructor access to course {} for user {}",
            course.id,
            claims.sub
        );
        Err(AppError::Forbidden(
            "Only the course instructor can view this resource".to_string(),
        ))
    }

    /// Owners and admins always pass; everyone else must be enrolled.
    pub async fn ensure_course_access(&self, claims: &Claims, course: &Course) -> AppResult<()> {
        if is_owner_or_admin(claims, &course.instructor_id) {
            return Ok(());
        }
        self.ensure_enrolled(&claims.sub, &course.id).await?;
        Ok(())
    }

    /// Tests bound to a course need an enrollment; standalone tests are open
    /// to any authenticated user.
    pub async fn ensure_test_access(&self, claims: &Claims, test: &Test) -> AppResult<()> {
        if is_owner_or_admin(claims, &test.instructor_id) {
            return Ok(());
        }
        match test.course_id.as_deref() {
            Some(course_id) => {
                self.ensure_enrolled(&claims.sub, course_id).await?;
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// Correct-answer flags are shown to the owner, admins, and anyone who
    /// has already submitted an attempt.
    pub async fn can_view_answers(&self, claims: &Claims, test: &Test) -> AppResult<bool> {
        if is_admin(claims) || claims.sub == test.instructor_id {
            return Ok(true);
        }
        self.attempt_repository
            .has_user_attempted_test(&claims.sub, &test.id)
            .await
    }
}
