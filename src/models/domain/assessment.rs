use async_graphql::Enum;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A test definition with its answer key. Loaded from the store before
/// scoring; never built from client input.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Test {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
    pub instructor_id: String,
    /// Share of `total_points` (0-100) a score must reach to pass.
    pub passing_percentage: i32,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub question_type: QuestionType,
    pub points: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default)]
    pub options: Vec<QuestionOption>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuestionOption {
    pub id: String,
    pub text: String,
    pub is_correct: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, Enum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    Mcq,       // pick one option
    Numerical, // free-form number checked against the correct option's text
    Text,      // free-form text checked against the correct option's text
}

impl Test {
    pub fn new(
        title: &str,
        course_id: Option<String>,
        instructor_id: &str,
        passing_percentage: i32,
        questions: Vec<Question>,
    ) -> Self {
        Test {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            course_id,
            instructor_id: instructor_id.to_string(),
            passing_percentage,
            questions,
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        }
    }

    /// Sum of all question points, or `None` when it does not fit an `i32`.
    pub fn checked_total_points(&self) -> Option<i32> {
        self.questions
            .iter()
            .try_fold(0i32, |total, q| total.checked_add(q.points))
    }

    /// Saturating sum, for display.
    pub fn total_points(&self) -> i32 {
        self.questions
            .iter()
            .fold(0i32, |total, q| total.saturating_add(q.points))
    }

    pub fn find_question(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }
}

impl Question {
    /// The designated correct option. Questions carry exactly one.
    pub fn correct_option(&self) -> Option<&QuestionOption> {
        self.options.iter().find(|o| o.is_correct)
    }

    pub fn find_option(&self, option_id: &str) -> Option<&QuestionOption> {
        self.options.iter().find(|o| o.id == option_id)
    }
}
