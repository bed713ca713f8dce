use std::{collections::HashMap, sync::Arc};

use crate::{
    auth::Claims,
    errors::{AppError, AppResult},
    models::{
        domain::{Course, LessonProgress},
        dto::{
            analytics::{CourseAnalytics, CourseProgress},
            response::{CourseStudentDto, EnrolledCourseDto},
        },
    },
    repositories::{
        CourseRepository, EnrollmentRepository, LessonProgressRepository, UserRepository,
    },
    services::{AccessGate, ProgressAggregator},
};

pub struct ProgressService {
    progress_repository: Arc<dyn LessonProgressRepository>,
    course_repository: Arc<dyn CourseRepository>,
    enrollment_repository: Arc<dyn EnrollmentRepository>,
    user_repository: Arc<dyn UserRepository>,
    access_gate: Arc<AccessGate>,
}

impl ProgressService {
    pub fn new(
        progress_repository: Arc<dyn LessonProgressRepository>,
        course_repository: Arc<dyn CourseRepository>,
        enrollment_repository: Arc<dyn EnrollmentRepository>,
        user_repository: Arc<dyn UserRepository>,
        access_gate: Arc<AccessGate>,
    ) -> Self {
        Self {
            progress_repository,
            course_repository,
            enrollment_repository,
            user_repository,
            access_gate,
        }
    }

    /// Marks a lesson completed for the caller. Completing twice keeps the
    /// first completion time.
    pub async fn complete_lesson(&self, claims: &Claims, lesson_id: &str) -> AppResult<LessonProgress> {
        let course = self.course_for_lesson(lesson_id).await?;
        self.access_gate.ensure_enrolled(&claims.sub, &course.id).await?;

        if let Some(existing) = self.progress_repository.find(&claims.sub, lesson_id).await? {
            return self.complete_existing(existing).await;
        }

        let row = LessonProgress::completed(&claims.sub, lesson_id, &course.id);
        match self.progress_repository.create(row).await {
            Ok(row) => {
                log::info!("User {} completed lesson {}", claims.sub, lesson_id);
                Ok(row)
            }
            // lost a race with a concurrent visit or completion
            Err(AppError::AlreadyExists(_)) => {
                let existing = self.existing_row(&claims.sub, lesson_id).await?;
                self.complete_existing(existing).await
            }
            Err(e) => Err(e),
        }
    }

    /// Records that the caller opened a lesson. Existing rows are returned
    /// untouched.
    pub async fn visit_lesson(&self, claims: &Claims, lesson_id: &str) -> AppResult<LessonProgress> {
        let course = self.course_for_lesson(lesson_id).await?;
        self.access_gate.ensure_enrolled(&claims.sub, &course.id).await?;

        if let Some(existing) = self.progress_repository.find(&claims.sub, lesson_id).await? {
            return Ok(existing);
        }

        let row = LessonProgress::visited(&claims.sub, lesson_id, &course.id);
        match self.progress_repository.create(row).await {
            Ok(row) => Ok(row),
            Err(AppError::AlreadyExists(_)) => self.existing_row(&claims.sub, lesson_id).await,
            Err(e) => Err(e),
        }
    }

    pub async fn course_progress(&self, claims: &Claims, course_id: &str) -> AppResult<CourseProgress> {
        let course = self.find_course(course_id).await?;
        self.access_gate.ensure_enrolled(&claims.sub, &course.id).await?;

        let rows = self
            .progress_repository
            .list_by_user_and_course(&claims.sub, &course.id)
            .await?;
        Ok(ProgressAggregator::compute_course_progress(&course, &claims.sub, &rows))
    }

    /// Every course the caller is enrolled in, with progress. Enrollments
    /// whose course no longer exists are skipped.
    pub async fn enrolled_courses(&self, claims: &Claims) -> AppResult<Vec<EnrolledCourseDto>> {
        let enrollments = self.enrollment_repository.list_by_user(&claims.sub).await?;
        if enrollments.is_empty() {
            return Ok(Vec::new());
        }

        let course_ids = enrollments.iter().map(|e| e.course_id.clone()).collect();
        let courses: HashMap<String, Course> = self
            .course_repository
            .find_by_ids(course_ids)
            .await?
            .into_iter()
            .map(|c| (c.id.clone(), c))
            .collect();
        let rows = self.progress_repository.list_by_user(&claims.sub).await?;

        Ok(enrollments
            .iter()
            .filter_map(|enrollment| {
                courses.get(&enrollment.course_id).map(|course| {
                    let progress = ProgressAggregator::compute_course_progress(course, &claims.sub, &rows);
                    EnrolledCourseDto::new(course, enrollment, progress)
                })
            })
            .collect())
    }

    pub async fn course_students(&self, claims: &Claims, course_id: &str) -> AppResult<Vec<CourseStudentDto>> {
        let analytics = self.course_analytics(claims, course_id).await?;

        let user_ids = analytics.students.iter().map(|s| s.user_id.clone()).collect();
        let users: HashMap<String, _> = self
            .user_repository
            .find_by_ids(user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id.clone(), u))
            .collect();

        Ok(analytics
            .students
            .into_iter()
            .map(|student| {
                let user = users.get(&student.user_id);
                CourseStudentDto::new(student, user)
            })
            .collect())
    }

    pub async fn course_analytics(&self, claims: &Claims, course_id: &str) -> AppResult<CourseAnalytics> {
        let course = self.find_course(course_id).await?;
        self.access_gate.ensure_course_owner(claims, &course)?;

        let enrollments = self.enrollment_repository.list_by_course(&course.id).await?;
        let rows = self.progress_repository.list_by_course(&course.id).await?;

        Ok(ProgressAggregator::compute_instructor_analytics(&course, &enrollments, &rows))
    }

    async fn complete_existing(&self, mut row: LessonProgress) -> AppResult<LessonProgress> {
        if !row.mark_completed() {
            return Ok(row);
        }
        log::info!("User {} completed lesson {}", row.user_id, row.lesson_id);
        self.progress_repository.update(row).await
    }

    async fn existing_row(&self, user_id: &str, lesson_id: &str) -> AppResult<LessonProgress> {
        self.progress_repository
            .find(user_id, lesson_id)
            .await?
            .ok_or_else(|| {
                AppError::InternalError(format!(
                    "Progress row for user {} and lesson {} vanished",
                    user_id, lesson_id
                ))
            })
    }

    async fn find_course(&self, course_id: &str) -> AppResult<Course> {
        self.course_repository
            .find_by_id(course_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Course with id '{}' not found", course_id)))
    }

    async fn course_for_lesson(&self, lesson_id: &str) -> AppResult<Course> {
        self.course_repository
            .find_by_lesson_id(lesson_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Lesson with id '{}' not found", lesson_id)))
    }
}
