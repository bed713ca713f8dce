use async_graphql::{Enum, SimpleObject};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct CourseProgress {
    pub completed_lessons: u32,
    pub total_lessons: u32,
    pub progress_percentage: u32,
}

/// Funnel bucket a single enrolled student falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Enum)]
#[serde(rename_all = "camelCase")]
pub enum FunnelStage {
    NotStarted,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsOverview {
    pub total_enrollments: u32,
    /// Flat estimate: enrollments times the current effective price, not
    /// a sum of recorded payments.
    pub total_revenue: f64,
    pub completion_rate: u32,
    pub average_progress: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct CompletionFunnel {
    pub not_started: u32,
    pub in_progress: u32,
    pub completed: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct WatchTimeSummary {
    pub total_minutes: u32,
    pub average_minutes_per_student: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct StudentProgress {
    pub user_id: String,
    pub enrolled_at: DateTime<Utc>,
    pub completed_lessons: u32,
    pub total_lessons: u32,
    pub total_watch_time: u32,
    pub progress_percentage: u32,
    pub stage: FunnelStage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct TopLesson {
    pub lesson_id: String,
    pub title: String,
    pub completions: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct CourseAnalytics {
    pub course_id: String,
    pub overview: AnalyticsOverview,
    pub completion_funnel: CompletionFunnel,
    pub watch_time: WatchTimeSummary,
    pub students: Vec<StudentProgress>,
    pub top_lessons: Vec<TopLesson>,
}
