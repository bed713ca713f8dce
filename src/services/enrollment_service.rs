use std::sync::Arc;

use crate::{
    auth::Claims,
    errors::{AppError, AppResult},
    models::{
        domain::{Enrollment, Notification, NotificationPreferences},
        dto::request::EnrollRequest,
    },
    repositories::{CourseRepository, EnrollmentRepository, NotificationRepository, UserRepository},
};

pub struct EnrollmentService {
    enrollment_repository: Arc<dyn EnrollmentRepository>,
    course_repository: Arc<dyn CourseRepository>,
    user_repository: Arc<dyn UserRepository>,
    notification_repository: Arc<dyn NotificationRepository>,
}

impl EnrollmentService {
    pub fn new(
        enrollment_repository: Arc<dyn EnrollmentRepository>,
        course_repository: Arc<dyn CourseRepository>,
        user_repository: Arc<dyn UserRepository>,
        notification_repository: Arc<dyn NotificationRepository>,
    ) -> Self {
        Self {
            enrollment_repository,
            course_repository,
            user_repository,
            notification_repository,
        }
    }

    /// Enrolls the caller, or refreshes the notification preferences of an
    /// existing enrollment. Returns the enrollment and whether it is new.
    pub async fn enroll(
        &self,
        claims: &Claims,
        course_id: &str,
        request: EnrollRequest,
    ) -> AppResult<(Enrollment, bool)> {
        let course = self
            .course_repository
            .find_by_id(course_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Course with id '{}' not found", course_id)))?;

        if !course.published {
            return Err(AppError::ValidationError(
                "Course is not open for enrollment".to_string(),
            ));
        }

        self.user_repository.upsert(claims.to_user()).await?;

        let preferences = NotificationPreferences::from(request);
        let (enrollment, created) = self
            .enrollment_repository
            .upsert(Enrollment::new(&claims.sub, &course.id, preferences))
            .await?;

        if created {
            log::info!("User {} enrolled in course {}", claims.sub, course.id);

            let notification = Notification::new(
                &claims.sub,
                "Enrollment confirmed",
                &format!("You are now enrolled in \"{}\"", course.title),
            );
            if let Err(e) = self.notification_repository.create(notification).await {
                log::warn!("Failed to record enrollment notification for {}: {}", claims.sub, e);
            }
        }

        Ok((enrollment, created))
    }
}
