use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-user marker for one lesson. Created on first visit or completion,
/// never deleted. `completed_at == None` means visited only.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct LessonProgress {
    pub id: String,
    pub user_id: String,
    pub lesson_id: String,
    pub course_id: String,
    pub visited_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl LessonProgress {
    pub fn visited(user_id: &str, lesson_id: &str, course_id: &str) -> Self {
        LessonProgress {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            lesson_id: lesson_id.to_string(),
            course_id: course_id.to_string(),
            visited_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn completed(user_id: &str, lesson_id: &str, course_id: &str) -> Self {
        let mut progress = Self::visited(user_id, lesson_id, course_id);
        progress.completed_at = Some(progress.visited_at);
        progress
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Returns false when the row was already complete; the original
    /// completion time is kept.
    pub fn mark_completed(&mut self) -> bool {
        if self.is_completed() {
            return false;
        }
        self.completed_at = Some(Utc::now());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visited_row_is_not_completed() {
        let progress = LessonProgress::visited("u1", "l1", "c1");
        assert!(!progress.is_completed());
    }

    #[test]
    fn mark_completed_keeps_first_completion_time() {
        let mut progress = LessonProgress::completed("u1", "l1", "c1");
        let first = progress.completed_at;

        assert!(!progress.mark_completed());
        assert_eq!(progress.completed_at, first);
    }

    #[test]
    fn mark_completed_sets_timestamp_once() {
        let mut progress = LessonProgress::visited("u1", "l1", "c1");
        assert!(progress.mark_completed());
        assert!(progress.is_completed());
    }
}
