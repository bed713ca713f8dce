use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::{require_instructor, require_owner_or_admin, Claims},
    errors::{AppError, AppResult},
    models::{
        domain::{Attempt, Notification, Question, QuestionOption, QuestionType, Test},
        dto::{
            request::{AnswerInput, CreateQuestionRequest, CreateTestRequest},
            response::TestView,
        },
    },
    repositories::{AttemptRepository, CourseRepository, NotificationRepository, TestRepository},
    services::{AccessGate, ScoringEngine},
};

pub struct TestService {
    test_repository: Arc<dyn TestRepository>,
    attempt_repository: Arc<dyn AttemptRepository>,
    course_repository: Arc<dyn CourseRepository>,
    notification_repository: Arc<dyn NotificationRepository>,
    access_gate: Arc<AccessGate>,
}

impl TestService {
    pub fn new(
        test_repository: Arc<dyn TestRepository>,
        attempt_repository: Arc<dyn AttemptRepository>,
        course_repository: Arc<dyn CourseRepository>,
        notification_repository: Arc<dyn NotificationRepository>,
        access_gate: Arc<AccessGate>,
    ) -> Self {
        Self {
            test_repository,
            attempt_repository,
            course_repository,
            notification_repository,
            access_gate,
        }
    }

    pub async fn create_test(&self, claims: &Claims, request: CreateTestRequest) -> AppResult<Test> {
        require_instructor(claims)?;
        request.validate()?;

        if let Some(course_id) = request.course_id.as_deref() {
            let course = self
                .course_repository
                .find_by_id(course_id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Course with id '{}' not found", course_id)))?;
            require_owner_or_admin(claims, &course.instructor_id)?;
        }

        let questions = request
            .questions
            .into_iter()
            .map(build_question)
            .collect::<AppResult<Vec<_>>>()?;

        let test = Test::new(
            &request.title,
            request.course_id,
            &claims.sub,
            request.passing_percentage,
            questions,
        );

        let test = self.test_repository.create(test).await?;
        log::info!("Instructor {} created test {}", claims.sub, test.id);
        Ok(test)
    }

    pub async fn get_test(&self, id: &str) -> AppResult<Test> {
        self.test_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Test with id '{}' not found", id)))
    }

    /// The test as the caller may see it. `is_correct` flags and explanations
    /// are only included once the caller is allowed to see answers.
    pub async fn get_test_for_taking(&self, claims: &Claims, id: &str) -> AppResult<TestView> {
        let test = self.get_test(id).await?;
        self.access_gate.ensure_test_access(claims, &test).await?;

        let reveal = self.access_gate.can_view_answers(claims, &test).await?;
        Ok(TestView::from_test(test, reveal))
    }

    /// Scores the answers and stores one new attempt. Nothing is written when
    /// the submission is rejected.
    pub async fn submit(
        &self,
        claims: &Claims,
        test_id: &str,
        answers: &[AnswerInput],
    ) -> AppResult<Attempt> {
        let test = self.get_test(test_id).await?;
        self.access_gate.ensure_test_access(claims, &test).await?;

        let result = ScoringEngine::score_submission(&test, answers)?;

        let attempt = Attempt::new(
            &test.id,
            &claims.sub,
            result.score,
            result.total_points,
            test.passing_percentage,
            result.passed,
            result.reflections,
        );
        let attempt = self.attempt_repository.create(attempt).await?;

        log::info!(
            "User {} submitted test {}: {}/{} (passed: {})",
            claims.sub,
            test.id,
            attempt.score,
            attempt.total_points,
            attempt.passed
        );

        let notification = Notification::new(
            &claims.sub,
            "Test submitted",
            &format!(
                "You scored {} out of {} on \"{}\"",
                attempt.score, attempt.total_points, test.title
            ),
        );
        if let Err(e) = self.notification_repository.create(notification).await {
            log::warn!("Failed to record submission notification for {}: {}", claims.sub, e);
        }

        Ok(attempt)
    }

    pub async fn list_attempts(
        &self,
        claims: &Claims,
        test_id: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Attempt>, i64)> {
        let test = self.get_test(test_id).await?;
        self.attempt_repository
            .get_user_attempts(&claims.sub, &test.id, offset, limit)
            .await
    }
}

fn build_question(request: CreateQuestionRequest) -> AppResult<Question> {
    let correct: Vec<&str> = request
        .options
        .iter()
        .filter(|o| o.is_correct)
        .map(|o| o.text.as_str())
        .collect();

    if correct.len() != 1 {
        return Err(AppError::ValidationError(format!(
            "Question '{}' must have exactly one correct option",
            request.text
        )));
    }

    if request.question_type == QuestionType::Numerical && correct[0].trim().parse::<f64>().is_err() {
        return Err(AppError::ValidationError(format!(
            "Numerical question '{}' needs a numeric correct answer",
            request.text
        )));
    }

    Ok(Question {
        id: Uuid::new_v4().to_string(),
        text: request.text,
        question_type: request.question_type,
        points: request.points,
        explanation: request.explanation,
        options: request
            .options
            .into_iter()
            .map(|o| QuestionOption {
                id: Uuid::new_v4().to_string(),
                text: o.text,
                is_correct: o.is_correct,
            })
            .collect(),
    })
}
