use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Enrollment {
    pub id: String,
    pub user_id: String,
    pub course_id: String,
    pub enrolled_at: DateTime<Utc>,
    #[serde(default)]
    pub notifications: NotificationPreferences,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct NotificationPreferences {
    pub notify_15m: bool,
    pub notify_30m: bool,
    pub notify_1h: bool,
    pub notify_sms: bool,
    pub notify_email: bool,
}

impl Enrollment {
    pub fn new(user_id: &str, course_id: &str, notifications: NotificationPreferences) -> Self {
        Enrollment {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            course_id: course_id.to_string(),
            enrolled_at: Utc::now(),
            notifications,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_enrollment_binds_user_and_course() {
        let enrollment = Enrollment::new("u1", "c1", NotificationPreferences::default());
        assert_eq!(enrollment.user_id, "u1");
        assert_eq!(enrollment.course_id, "c1");
        assert!(!enrollment.notifications.notify_email);
    }

    #[test]
    fn missing_preferences_default_to_off() {
        let json = r#"{
            "id": "e1",
            "user_id": "u1",
            "course_id": "c1",
            "enrolled_at": "2024-01-01T00:00:00Z"
        }"#;
        let enrollment: Enrollment = serde_json::from_str(json).unwrap();
        assert_eq!(enrollment.notifications, NotificationPreferences::default());
    }
}
