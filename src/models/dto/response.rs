use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{
    domain::{
        Attempt, Course, Enrollment, Lesson, LessonProgress, LessonType, Module, Notification,
        NotificationPreferences, Question, QuestionOption, QuestionType, Reflection, Test, User,
    },
    dto::analytics::{CourseProgress, FunnelStage, StudentProgress},
};

/// A test as shown to a caller. Answer-key fields are present only when
/// `answers_revealed` is true.
#[derive(Debug, Clone, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct TestView {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
    pub passing_percentage: i32,
    pub total_points: i32,
    pub answers_revealed: bool,
    pub questions: Vec<QuestionView>,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub id: String,
    pub text: String,
    pub question_type: QuestionType,
    pub points: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    pub options: Vec<OptionView>,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct OptionView {
    pub id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
}

impl TestView {
    pub fn from_test(test: Test, reveal_answers: bool) -> Self {
        let total_points = test.total_points();
        TestView {
            id: test.id,
            title: test.title,
            course_id: test.course_id,
            passing_percentage: test.passing_percentage,
            total_points,
            answers_revealed: reveal_answers,
            questions: test
                .questions
                .into_iter()
                .map(|q| QuestionView::from_question(q, reveal_answers))
                .collect(),
        }
    }
}

impl QuestionView {
    fn from_question(question: Question, reveal_answers: bool) -> Self {
        QuestionView {
            id: question.id,
            text: question.text,
            question_type: question.question_type,
            points: question.points,
            explanation: question.explanation.filter(|_| reveal_answers),
            options: question
                .options
                .into_iter()
                .map(|o| OptionView::from_option(o, reveal_answers))
                .collect(),
        }
    }
}

impl OptionView {
    fn from_option(option: QuestionOption, reveal_answers: bool) -> Self {
        OptionView {
            id: option.id,
            text: option.text,
            is_correct: reveal_answers.then_some(option.is_correct),
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct ReflectionDto {
    pub question_id: String,
    pub is_correct: bool,
    pub points_awarded: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_option_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_option_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl From<Reflection> for ReflectionDto {
    fn from(reflection: Reflection) -> Self {
        ReflectionDto {
            question_id: reflection.question_id,
            is_correct: reflection.is_correct,
            points_awarded: reflection.points_awarded,
            selected_option_id: reflection.selected_option_id,
            correct_option_id: reflection.correct_option_id,
            explanation: reflection.explanation,
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub attempt_id: String,
    pub score: i32,
    pub total_points: i32,
    pub passed: bool,
    pub reflections: Vec<ReflectionDto>,
}

impl From<Attempt> for SubmissionResponse {
    fn from(attempt: Attempt) -> Self {
        SubmissionResponse {
            attempt_id: attempt.id,
            score: attempt.score,
            total_points: attempt.total_points,
            passed: attempt.passed,
            reflections: attempt
                .reflections
                .into_iter()
                .map(ReflectionDto::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct AttemptDto {
    pub id: String,
    pub test_id: String,
    pub score: i32,
    pub total_points: i32,
    pub passed: bool,
    pub completed_at: DateTime<Utc>,
}

impl From<Attempt> for AttemptDto {
    fn from(attempt: Attempt) -> Self {
        AttemptDto {
            id: attempt.id,
            test_id: attempt.test_id,
            score: attempt.score,
            total_points: attempt.total_points,
            passed: attempt.passed,
            completed_at: attempt.completed_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonDto {
    pub id: String,
    pub order: i32,
    pub title: String,
    pub lesson_type: LessonType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i32>,
    pub content: String,
}

impl From<Lesson> for LessonDto {
    fn from(lesson: Lesson) -> Self {
        LessonDto {
            id: lesson.id,
            order: lesson.order,
            title: lesson.title,
            lesson_type: lesson.lesson_type,
            duration: lesson.duration,
            content: lesson.content,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDto {
    pub id: String,
    pub order: i32,
    pub title: String,
    pub lessons: Vec<LessonDto>,
}

impl From<Module> for ModuleDto {
    fn from(module: Module) -> Self {
        let mut lessons = module.lessons;
        lessons.sort_by_key(|l| l.order);

        ModuleDto {
            id: module.id,
            order: module.order,
            title: module.title,
            lessons: lessons.into_iter().map(LessonDto::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDto {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discounted_price: Option<f64>,
    pub published: bool,
    pub instructor_id: String,
    pub total_lessons: u32,
    pub modules: Vec<ModuleDto>,
}

impl From<Course> for CourseDto {
    fn from(course: Course) -> Self {
        let total_lessons = course.total_lessons() as u32;
        let mut modules = course.modules;
        modules.sort_by_key(|m| m.order);

        CourseDto {
            id: course.id,
            title: course.title,
            description: course.description,
            price: course.price,
            discounted_price: course.discounted_price,
            published: course.published,
            instructor_id: course.instructor_id,
            total_lessons,
            modules: modules.into_iter().map(ModuleDto::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct EnrolledCourseDto {
    pub course_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub instructor_id: String,
    pub enrolled_at: DateTime<Utc>,
    pub progress: u32,
    pub completed_lessons: u32,
    pub total_lessons: u32,
}

impl EnrolledCourseDto {
    pub fn new(course: &Course, enrollment: &Enrollment, progress: CourseProgress) -> Self {
        EnrolledCourseDto {
            course_id: course.id.clone(),
            title: course.title.clone(),
            description: course.description.clone(),
            instructor_id: course.instructor_id.clone(),
            enrolled_at: enrollment.enrolled_at,
            progress: progress.progress_percentage,
            completed_lessons: progress.completed_lessons,
            total_lessons: progress.total_lessons,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseStudentDto {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub enrolled_at: DateTime<Utc>,
    pub progress: u32,
    pub completed_lessons: u32,
    pub total_lessons: u32,
    pub total_watch_time: u32,
    pub stage: FunnelStage,
}

impl CourseStudentDto {
    pub fn new(student: StudentProgress, user: Option<&User>) -> Self {
        CourseStudentDto {
            user_id: student.user_id,
            name: user.and_then(|u| u.name.clone()),
            email: user.map(|u| u.email.clone()),
            enrolled_at: student.enrolled_at,
            progress: student.progress_percentage,
            completed_lessons: student.completed_lessons,
            total_lessons: student.total_lessons,
            total_watch_time: student.total_watch_time,
            stage: student.stage,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentDto {
    pub id: String,
    pub course_id: String,
    pub enrolled_at: DateTime<Utc>,
    pub notify_15m: bool,
    pub notify_30m: bool,
    pub notify_1h: bool,
    #[serde(rename = "notifySMS")]
    pub notify_sms: bool,
    pub notify_email: bool,
}

impl From<Enrollment> for EnrollmentDto {
    fn from(enrollment: Enrollment) -> Self {
        let NotificationPreferences {
            notify_15m,
            notify_30m,
            notify_1h,
            notify_sms,
            notify_email,
        } = enrollment.notifications;

        EnrollmentDto {
            id: enrollment.id,
            course_id: enrollment.course_id,
            enrolled_at: enrollment.enrolled_at,
            notify_15m,
            notify_30m,
            notify_1h,
            notify_sms,
            notify_email,
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct LessonProgressDto {
    pub id: String,
    pub lesson_id: String,
    pub course_id: String,
    pub visited_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<LessonProgress> for LessonProgressDto {
    fn from(progress: LessonProgress) -> Self {
        LessonProgressDto {
            id: progress.id,
            lesson_id: progress.lesson_id,
            course_id: progress.course_id,
            visited_at: progress.visited_at,
            completed_at: progress.completed_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDto {
    pub id: String,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationDto {
    fn from(notification: Notification) -> Self {
        NotificationDto {
            id: notification.id,
            title: notification.title,
            message: notification.message,
            is_read: notification.is_read,
            created_at: notification.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaginationMetadata {
    pub offset: i64,
    pub limit: i64,
    pub total: i64,
}

#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    pub data: Vec<T>,
    pub pagination: PaginationMetadata,
}
