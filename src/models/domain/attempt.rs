use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One scored submission. Stored as a single document so the attempt and
/// its reflections are written together or not at all.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Attempt {
    pub id: String,
    pub test_id: String,
    pub user_id: String,
    pub score: i32,
    pub total_points: i32,
    pub passing_percentage: i32,
    pub passed: bool,
    pub reflections: Vec<Reflection>,
    pub completed_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Reflection {
    pub question_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_option_id: Option<String>,
    pub is_correct: bool,
    pub points_awarded: i32,
    /// Only set when the answer was wrong.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_option_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Attempt {
    pub fn new(
        test_id: &str,
        user_id: &str,
        score: i32,
        total_points: i32,
        passing_percentage: i32,
        passed: bool,
        reflections: Vec<Reflection>,
    ) -> Self {
        Attempt {
            id: Uuid::new_v4().to_string(),
            test_id: test_id.to_string(),
            user_id: user_id.to_string(),
            score,
            total_points,
            passing_percentage,
            passed,
            reflections,
            completed_at: Utc::now(),
        }
    }
}
