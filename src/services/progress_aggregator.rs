use std::collections::{HashMap, HashSet};

use crate::models::domain::{Course, Enrollment, Lesson, LessonProgress};
use crate::models::dto::analytics::{
    AnalyticsOverview, CompletionFunnel, CourseAnalytics, CourseProgress, FunnelStage,
    StudentProgress, TopLesson, WatchTimeSummary,
};

const TOP_LESSONS_LIMIT: usize = 5;

/// Derives progress and analytics from a course tree and its progress rows.
/// Rows for lessons outside the course are ignored; nothing is mutated.
pub struct ProgressAggregator;

impl ProgressAggregator {
    pub fn compute_course_progress(
        course: &Course,
        user_id: &str,
        rows: &[LessonProgress],
    ) -> CourseProgress {
        let lessons = Self::lessons_by_id(course);
        let completed = Self::completed_lessons_for(&lessons, user_id, rows).len() as u32;
        let total = lessons.len() as u32;

        CourseProgress {
            completed_lessons: completed,
            total_lessons: total,
            progress_percentage: Self::progress_percentage(completed, total),
        }
    }

    /// `round(completed / total * 100)` clamped to [0, 100]; 0 when the
    /// course has no lessons.
    pub fn progress_percentage(completed: u32, total: u32) -> u32 {
        if total == 0 {
            return 0;
        }
        let pct = (f64::from(completed) / f64::from(total) * 100.0).round();
        pct.clamp(0.0, 100.0) as u32
    }

    pub fn compute_instructor_analytics(
        course: &Course,
        enrollments: &[Enrollment],
        rows: &[LessonProgress],
    ) -> CourseAnalytics {
        let lessons = Self::lessons_by_id(course);
        let total_lessons = lessons.len() as u32;

        let mut seen = HashSet::new();
        let enrollments: Vec<&Enrollment> = enrollments
            .iter()
            .filter(|e| e.course_id == course.id && seen.insert(e.user_id.as_str()))
            .collect();
        let enrolled: HashSet<&str> = enrollments.iter().map(|e| e.user_id.as_str()).collect();

        let course_rows: Vec<&LessonProgress> = rows
            .iter()
            .filter(|r| enrolled.contains(r.user_id.as_str()) && lessons.contains_key(r.lesson_id.as_str()))
            .collect();

        let users_with_progress: HashSet<&str> =
            course_rows.iter().map(|r| r.user_id.as_str()).collect();

        let students: Vec<StudentProgress> = enrollments
            .iter()
            .map(|enrollment| {
                let completed = Self::completed_lessons_for(&lessons, &enrollment.user_id, rows);
                let completed_lessons = completed.len() as u32;
                let total_watch_time = completed
                    .iter()
                    .filter_map(|lesson| lesson.duration)
                    .map(|d| d.max(0) as u32)
                    .sum();

                let progress_percentage =
                    Self::progress_percentage(completed_lessons, total_lessons);

                // Completion follows the rounded percentage shown on the row.
                let stage = if total_lessons > 0 && progress_percentage == 100 {
                    FunnelStage::Completed
                } else if users_with_progress.contains(enrollment.user_id.as_str()) {
                    FunnelStage::InProgress
                } else {
                    FunnelStage::NotStarted
                };

                StudentProgress {
                    user_id: enrollment.user_id.clone(),
                    enrolled_at: enrollment.enrolled_at,
                    completed_lessons,
                    total_lessons,
                    total_watch_time,
                    progress_percentage,
                    stage,
                }
            })
            .collect();

        let total_enrollments = students.len() as u32;
        let completed = count_stage(&students, FunnelStage::Completed);
        let in_progress = count_stage(&students, FunnelStage::InProgress);
        let not_started = total_enrollments - users_with_progress.len() as u32;

        let total_minutes: u32 = students.iter().map(|s| s.total_watch_time).sum();
        let progress_sum: u32 = students.iter().map(|s| s.progress_percentage).sum();

        CourseAnalytics {
            course_id: course.id.clone(),
            overview: AnalyticsOverview {
                total_enrollments,
                total_revenue: f64::from(total_enrollments) * course.effective_price(),
                completion_rate: rounded_ratio(completed, total_enrollments, 100),
                average_progress: rounded_ratio(progress_sum, total_enrollments, 1),
            },
            completion_funnel: CompletionFunnel {
                not_started,
                in_progress,
                completed,
            },
            watch_time: WatchTimeSummary {
                total_minutes,
                average_minutes_per_student: rounded_ratio(total_minutes, total_enrollments, 1),
            },
            students,
            top_lessons: Self::top_lessons(&lessons, &course_rows),
        }
    }

    fn lessons_by_id(course: &Course) -> HashMap<&str, &Lesson> {
        course.lessons().map(|l| (l.id.as_str(), l)).collect()
    }

    fn completed_lessons_for<'a>(
        lessons: &HashMap<&str, &'a Lesson>,
        user_id: &str,
        rows: &[LessonProgress],
    ) -> Vec<&'a Lesson> {
        let mut seen = HashSet::new();
        rows.iter()
            .filter(|r| r.user_id == user_id && r.is_completed())
            .filter_map(|r| lessons.get(r.lesson_id.as_str()).copied())
            .filter(|lesson| seen.insert(lesson.id.as_str()))
            .collect()
    }

    fn top_lessons(lessons: &HashMap<&str, &Lesson>, rows: &[&LessonProgress]) -> Vec<TopLesson> {
        let mut order: Vec<&str> = Vec::new();
        let mut completers: HashMap<&str, HashSet<&str>> = HashMap::new();

        for row in rows.iter().filter(|r| r.is_completed()) {
            let users = completers.entry(row.lesson_id.as_str()).or_insert_with(|| {
                order.push(row.lesson_id.as_str());
                HashSet::new()
            });
            users.insert(row.user_id.as_str());
        }

        let mut ranked: Vec<(&str, u32)> = order
            .into_iter()
            .map(|id| (id, completers.get(id).map_or(0, |u| u.len() as u32)))
            .collect();
        // stable: ties keep first-seen order
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        ranked
            .into_iter()
            .take(TOP_LESSONS_LIMIT)
            .filter_map(|(id, completions)| {
                lessons.get(id).map(|lesson| TopLesson {
                    lesson_id: lesson.id.clone(),
                    title: lesson.title.clone(),
                    completions,
                })
            })
            .collect()
    }
}

fn count_stage(students: &[StudentProgress], stage: FunnelStage) -> u32 {
    students.iter().filter(|s| s.stage == stage).count() as u32
}

fn rounded_ratio(numerator: u32, denominator: u32, scale: u32) -> u32 {
    if denominator == 0 {
        return 0;
    }
    (f64::from(numerator) * f64::from(scale) / f64::from(denominator)).round() as u32
}
