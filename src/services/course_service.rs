use std::sync::Arc;

use validator::Validate;

use crate::{
    auth::{is_owner_or_admin, require_instructor, require_owner_or_admin, Claims},
    errors::{AppError, AppResult},
    models::{
        domain::{Course, Lesson, Module},
        dto::request::{CreateCourseRequest, CreateLessonRequest, CreateModuleRequest},
    },
    repositories::CourseRepository,
};

pub struct CourseService {
    repository: Arc<dyn CourseRepository>,
}

impl CourseService {
    pub fn new(repository: Arc<dyn CourseRepository>) -> Self {
        Self { repository }
    }

    pub async fn create_course(
        &self,
        claims: &Claims,
        request: CreateCourseRequest,
    ) -> AppResult<Course> {
        require_instructor(claims)?;
        request.validate()?;

        if let Some(discounted) = request.discounted_price {
            if discounted > request.price {
                return Err(AppError::ValidationError(
                    "Discounted price cannot exceed the price".to_string(),
                ));
            }
        }

        let course = Course::new_draft(
            &request.title,
            request.description,
            request.price,
            request.discounted_price,
            &claims.sub,
        );
        let course = self.repository.create(course).await?;

        log::info!("Instructor {} created course {}", claims.sub, course.id);
        Ok(course)
    }

    /// Any course by id, regardless of publication state.
    pub async fn find_course(&self, id: &str) -> AppResult<Course> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Course with id '{}' not found", id)))
    }

    /// Drafts are hidden from everyone but their owner and admins.
    pub async fn get_course(&self, claims: &Claims, id: &str) -> AppResult<Course> {
        let course = self.find_course(id).await?;
        if !course.published && !is_owner_or_admin(claims, &course.instructor_id) {
            return Err(AppError::NotFound(format!("Course with id '{}' not found", id)));
        }
        Ok(course)
    }

    pub async fn list_published(&self, offset: i64, limit: i64) -> AppResult<(Vec<Course>, i64)> {
        self.repository.list_published(offset, limit).await
    }

    pub async fn add_module(
        &self,
        claims: &Claims,
        course_id: &str,
        request: CreateModuleRequest,
    ) -> AppResult<Course> {
        request.validate()?;
        let mut course = self.owned_course(claims, course_id).await?;

        if course.modules.iter().any(|m| m.order == request.order) {
            return Err(AppError::AlreadyExists(format!(
                "Module with order {} already exists in course '{}'",
                request.order, course_id
            )));
        }

        course.modules.push(Module::new(&request.title, request.order));
        course.touch();
        self.repository.update(course).await
    }

    pub async fn add_lesson(
        &self,
        claims: &Claims,
        course_id: &str,
        module_id: &str,
        request: CreateLessonRequest,
    ) -> AppResult<Course> {
        request.validate()?;
        let mut course = self.owned_course(claims, course_id).await?;

        let module = course.find_module_mut(module_id).ok_or_else(|| {
            AppError::NotFound(format!(
                "Module with id '{}' not found in course '{}'",
                module_id, course_id
            ))
        })?;

        if module.lessons.iter().any(|l| l.order == request.order) {
            return Err(AppError::AlreadyExists(format!(
                "Lesson with order {} already exists in module '{}'",
                request.order, module_id
            )));
        }

        module.lessons.push(Lesson::new(
            &request.title,
            request.order,
            request.lesson_type,
            request.duration,
            &request.content,
        ));
        course.touch();
        self.repository.update(course).await
    }

    pub async fn publish(&self, claims: &Claims, course_id: &str) -> AppResult<Course> {
        let mut course = self.owned_course(claims, course_id).await?;
        if course.published {
            return Ok(course);
        }

        course.published = true;
        course.touch();
        let course = self.repository.update(course).await?;

        log::info!("Course {} published by {}", course.id, claims.sub);
        Ok(course)
    }

    async fn owned_course(&self, claims: &Claims, course_id: &str) -> AppResult<Course> {
        let course = self.find_course(course_id).await?;
        require_owner_or_admin(claims, &course.instructor_id)?;
        Ok(course)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::domain::{LessonType, UserRole},
        repositories::MockCourseRepository,
        test_utils::fixtures::claims,
    };

    fn draft() -> Course {
        let mut course = Course::new_draft("Rust", None, 50.0, None, "inst-1");
        course.id = "course-1".to_string();
        let mut module = Module::new("Intro", 1);
        module.id = "module-1".to_string();
        course.modules.push(module);
        course
    }

    fn repo_with(course: Course) -> MockCourseRepository {
        let mut repo = MockCourseRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(course.clone())));
        repo
    }

    #[tokio::test]
    async fn draft_is_hidden_from_students() {
        let service = CourseService::new(Arc::new(repo_with(draft())));

        let result = service
            .get_course(&claims("student-1", UserRole::Student), "course-1")
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));

        let course = service
            .get_course(&claims("inst-1", UserRole::Instructor), "course-1")
            .await
            .unwrap();
        assert!(!course.published);
    }

    #[tokio::test]
    async fn discounted_price_above_price_is_rejected() {
        let mut repo = MockCourseRepository::new();
        repo.expect_create().never();
        let service = CourseService::new(Arc::new(repo));

        let request = CreateCourseRequest {
            title: "Rust".to_string(),
            description: None,
            price: 10.0,
            discounted_price: Some(20.0),
        };
        let result = service
            .create_course(&claims("inst-1", UserRole::Instructor), request)
            .await;

        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn duplicate_module_order_is_rejected() {
        let mut repo = repo_with(draft());
        repo.expect_update().never();
        let service = CourseService::new(Arc::new(repo));

        let request = CreateModuleRequest {
            title: "Again".to_string(),
            order: 1,
        };
        let result = service
            .add_module(&claims("inst-1", UserRole::Instructor), "course-1", request)
            .await;

        assert!(matches!(result, Err(AppError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn owner_adds_lesson_to_module() {
        let mut repo = repo_with(draft());
        repo.expect_update().times(1).returning(|course| Ok(course));
        let service = CourseService::new(Arc::new(repo));

        let request = CreateLessonRequest {
            title: "Ownership".to_string(),
            order: 1,
            lesson_type: LessonType::Video,
            duration: Some(12),
            content: "https://videos.example.com/ownership".to_string(),
        };
        let course = service
            .add_lesson(
                &claims("inst-1", UserRole::Instructor),
                "course-1",
                "module-1",
                request,
            )
            .await
            .unwrap();

        assert_eq!(course.total_lessons(), 1);
        assert_eq!(course.modules[0].lessons[0].duration, Some(12));
    }

    #[tokio::test]
    async fn other_instructor_cannot_publish() {
        let mut repo = repo_with(draft());
        repo.expect_update().never();
        let service = CourseService::new(Arc::new(repo));

        let result = service
            .publish(&claims("inst-2", UserRole::Instructor), "course-1")
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn publish_marks_course_published() {
        let mut repo = repo_with(draft());
        repo.expect_update().times(1).returning(|course| Ok(course));
        let service = CourseService::new(Arc::new(repo));

        let course = service
            .publish(&claims("inst-1", UserRole::Instructor), "course-1")
            .await
            .unwrap();

        assert!(course.published);
    }
}
