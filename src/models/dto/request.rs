use async_graphql::InputObject;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{LessonType, NotificationPreferences, QuestionType};

pub const MAX_QUESTION_POINTS: i32 = 1_000;
pub const MAX_QUESTIONS_PER_TEST: u64 = 500;
const MAX_OPTIONS_PER_QUESTION: u64 = 20;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 5000))]
    pub description: Option<String>,

    #[validate(range(min = 0.0))]
    pub price: f64,

    #[validate(range(min = 0.0))]
    pub discounted_price: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateModuleRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(range(min = 0))]
    pub order: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLessonRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(range(min = 0))]
    pub order: i32,

    pub lesson_type: LessonType,

    #[validate(range(min = 0))]
    pub duration: Option<i32>,

    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOptionRequest {
    #[validate(length(min = 1, max = 1000))]
    pub text: String,

    #[serde(default)]
    pub is_correct: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 2000))]
    pub text: String,

    pub question_type: QuestionType,

    #[validate(range(min = 1, max = MAX_QUESTION_POINTS))]
    pub points: i32,

    pub explanation: Option<String>,

    #[validate(length(min = 1, max = MAX_OPTIONS_PER_QUESTION), nested)]
    pub options: Vec<CreateOptionRequest>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTestRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    pub course_id: Option<String>,

    #[validate(range(min = 0, max = 100))]
    pub passing_percentage: i32,

    #[validate(length(min = 1, max = MAX_QUESTIONS_PER_TEST), nested)]
    pub questions: Vec<CreateQuestionRequest>,
}

/// One answer of a submission. MCQ answers carry `option_id`; numerical
/// and text answers may carry a free-form `value` instead.
#[derive(Debug, Clone, Deserialize, InputObject)]
#[serde(rename_all = "camelCase")]
pub struct AnswerInput {
    pub question_id: String,
    #[serde(default)]
    pub option_id: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Deserialize, InputObject)]
#[serde(rename_all = "camelCase")]
pub struct SubmitTestRequest {
    #[serde(default)]
    pub answers: Vec<AnswerInput>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LessonRequest {
    #[validate(length(min = 1))]
    pub lesson_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollRequest {
    #[serde(default)]
    pub notify_15m: bool,
    #[serde(default)]
    pub notify_30m: bool,
    #[serde(default)]
    pub notify_1h: bool,
    #[serde(default, rename = "notifySMS", alias = "notifySms")]
    pub notify_sms: bool,
    #[serde(default)]
    pub notify_email: bool,
}

impl From<EnrollRequest> for NotificationPreferences {
    fn from(request: EnrollRequest) -> Self {
        NotificationPreferences {
            notify_15m: request.notify_15m,
            notify_30m: request.notify_30m,
            notify_1h: request.notify_1h,
            notify_sms: request.notify_sms,
            notify_email: request.notify_email,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PaginationParams {
    #[validate(range(min = 0))]
    pub offset: Option<i64>,

    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            offset: Some(0),
            limit: Some(20),
        }
    }
}

impl PaginationParams {
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(20).clamp(1, 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn option(text: &str, is_correct: bool) -> CreateOptionRequest {
        CreateOptionRequest {
            text: text.to_string(),
            is_correct,
        }
    }

    fn question(points: i32) -> CreateQuestionRequest {
        CreateQuestionRequest {
            text: "2 + 2?".to_string(),
            question_type: QuestionType::Mcq,
            points,
            explanation: None,
            options: vec![option("4", true), option("5", false)],
        }
    }

    #[test]
    fn valid_create_test_request() {
        let request = CreateTestRequest {
            title: "Arithmetic".to_string(),
            course_id: None,
            passing_percentage: 50,
            questions: vec![question(1)],
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn passing_percentage_above_100_is_rejected() {
        let request = CreateTestRequest {
            title: "Arithmetic".to_string(),
            course_id: None,
            passing_percentage: 120,
            questions: vec![question(1)],
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn non_positive_points_are_rejected_through_nesting() {
        let request = CreateTestRequest {
            title: "Arithmetic".to_string(),
            course_id: None,
            passing_percentage: 50,
            questions: vec![question(0)],
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn points_above_limit_are_rejected() {
        let request = CreateTestRequest {
            title: "Arithmetic".to_string(),
            course_id: None,
            passing_percentage: 50,
            questions: vec![question(MAX_QUESTION_POINTS + 1)],
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn question_count_is_capped() {
        let at_limit = CreateTestRequest {
            title: "Marathon".to_string(),
            course_id: None,
            passing_percentage: 50,
            questions: vec![question(MAX_QUESTION_POINTS); MAX_QUESTIONS_PER_TEST as usize],
        };
        assert!(at_limit.validate().is_ok());

        let mut over_limit = at_limit;
        over_limit.questions.push(question(1));
        assert!(over_limit.validate().is_err());
    }

    #[test]
    fn submit_request_parses_camel_case_answers() {
        let json = r#"{"answers":[{"questionId":"q1","optionId":"o1"},{"questionId":"q2","value":"3.5"}]}"#;
        let request: SubmitTestRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.answers.len(), 2);
        assert_eq!(request.answers[0].option_id.as_deref(), Some("o1"));
        assert_eq!(request.answers[1].value.as_deref(), Some("3.5"));
    }

    #[test]
    fn enroll_request_maps_to_preferences() {
        let json = r#"{"notify15m":true,"notifySMS":true}"#;
        let request: EnrollRequest = serde_json::from_str(json).unwrap();
        let prefs: NotificationPreferences = request.into();
        assert!(prefs.notify_15m);
        assert!(prefs.notify_sms);
        assert!(!prefs.notify_email);
    }

    #[test]
    fn pagination_defaults_and_clamps() {
        let params = PaginationParams {
            offset: None,
            limit: Some(500),
        };
        assert_eq!(params.offset(), 0);
        assert_eq!(params.limit(), 100);
    }
}
