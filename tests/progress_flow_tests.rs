mod common;

use common::{claims, sample_course, TestContext};
use learnhub_server::{
    errors::AppError,
    models::{
        domain::UserRole,
        dto::{analytics::FunnelStage, request::EnrollRequest},
    },
    repositories::CourseRepository,
};

async fn seeded() -> TestContext {
    let ctx = TestContext::new();
    ctx.courses.create(sample_course()).await.unwrap();
    ctx
}

async fn enroll(ctx: &TestContext, sub: &str) {
    ctx.state
        .enrollment_service
        .enroll(&claims(sub, UserRole::Student), "course-1", EnrollRequest::default())
        .await
        .unwrap();
}

async fn complete(ctx: &TestContext, sub: &str, lesson_id: &str) {
    ctx.state
        .progress_service
        .complete_lesson(&claims(sub, UserRole::Student), lesson_id)
        .await
        .unwrap();
}

#[tokio::test]
async fn one_of_three_lessons_reports_33_percent() {
    let ctx = seeded().await;
    enroll(&ctx, "student-1").await;
    complete(&ctx, "student-1", "l3").await;

    let progress = ctx
        .state
        .progress_service
        .course_progress(&claims("student-1", UserRole::Student), "course-1")
        .await
        .unwrap();

    assert_eq!(progress.completed_lessons, 1);
    assert_eq!(progress.total_lessons, 3);
    assert_eq!(progress.progress_percentage, 33);
}

#[tokio::test]
async fn completing_twice_keeps_first_timestamp() {
    let ctx = seeded().await;
    enroll(&ctx, "student-1").await;
    let student = claims("student-1", UserRole::Student);

    let first = ctx
        .state
        .progress_service
        .complete_lesson(&student, "l1")
        .await
        .unwrap();
    let second = ctx
        .state
        .progress_service
        .complete_lesson(&student, "l1")
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.completed_at, second.completed_at);
}

#[tokio::test]
async fn visit_then_complete_reuses_the_row() {
    let ctx = seeded().await;
    enroll(&ctx, "student-1").await;
    let student = claims("student-1", UserRole::Student);

    let visited = ctx
        .state
        .progress_service
        .visit_lesson(&student, "l2")
        .await
        .unwrap();
    assert!(!visited.is_completed());

    let completed = ctx
        .state
        .progress_service
        .complete_lesson(&student, "l2")
        .await
        .unwrap();
    assert_eq!(visited.id, completed.id);
    assert!(completed.is_completed());
}

#[tokio::test]
async fn progress_requires_enrollment() {
    let ctx = seeded().await;

    let result = ctx
        .state
        .progress_service
        .complete_lesson(&claims("outsider", UserRole::Student), "l1")
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn unknown_lesson_is_not_found() {
    let ctx = seeded().await;
    enroll(&ctx, "student-1").await;

    let result = ctx
        .state
        .progress_service
        .complete_lesson(&claims("student-1", UserRole::Student), "nope")
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn enrolled_courses_report_progress() {
    let ctx = seeded().await;
    enroll(&ctx, "student-1").await;
    complete(&ctx, "student-1", "l1").await;
    complete(&ctx, "student-1", "l2").await;

    let courses = ctx
        .state
        .progress_service
        .enrolled_courses(&claims("student-1", UserRole::Student))
        .await
        .unwrap();

    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].course_id, "course-1");
    assert_eq!(courses[0].completed_lessons, 2);
    assert_eq!(courses[0].total_lessons, 3);
    assert_eq!(courses[0].progress, 67);
}

#[tokio::test]
async fn analytics_funnel_for_ten_students() {
    let ctx = seeded().await;
    for i in 0..10 {
        enroll(&ctx, &format!("s{}", i)).await;
    }
    for sub in ["s0", "s1"] {
        for lesson in ["l1", "l2", "l3"] {
            complete(&ctx, sub, lesson).await;
        }
    }
    complete(&ctx, "s2", "l1").await;
    ctx.state
        .progress_service
        .visit_lesson(&claims("s3", UserRole::Student), "l3")
        .await
        .unwrap();

    let analytics = ctx
        .state
        .progress_service
        .course_analytics(&claims("inst-1", UserRole::Instructor), "course-1")
        .await
        .unwrap();

    let funnel = analytics.completion_funnel;
    assert_eq!((funnel.completed, funnel.in_progress, funnel.not_started), (2, 2, 6));
    assert_eq!(
        funnel.completed + funnel.in_progress + funnel.not_started,
        analytics.overview.total_enrollments
    );
    assert_eq!(analytics.overview.total_enrollments, 10);
    assert_eq!(analytics.overview.total_revenue, 600.0);
    assert_eq!(analytics.overview.completion_rate, 20);
    assert_eq!(analytics.watch_time.total_minutes, 70);
    assert_eq!(analytics.watch_time.average_minutes_per_student, 7);
    assert_eq!(analytics.top_lessons[0].lesson_id, "l1");
    assert_eq!(analytics.top_lessons[0].completions, 3);
    assert_eq!(analytics.students[3].stage, FunnelStage::InProgress);
    assert_eq!(analytics.students[3].progress_percentage, 0);
}

#[tokio::test]
async fn analytics_are_for_the_course_instructor_only() {
    let ctx = seeded().await;

    let result = ctx
        .state
        .progress_service
        .course_analytics(&claims("inst-2", UserRole::Instructor), "course-1")
        .await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));

    let admin = ctx
        .state
        .progress_service
        .course_analytics(&claims("root", UserRole::Admin), "course-1")
        .await
        .unwrap();
    assert_eq!(admin.overview.total_enrollments, 0);
    assert_eq!(admin.completion_funnel.not_started, 0);
}

#[tokio::test]
async fn course_students_include_mirrored_identity() {
    let ctx = seeded().await;
    enroll(&ctx, "student-1").await;
    complete(&ctx, "student-1", "l1").await;

    let students = ctx
        .state
        .progress_service
        .course_students(&claims("inst-1", UserRole::Instructor), "course-1")
        .await
        .unwrap();

    assert_eq!(students.len(), 1);
    assert_eq!(students[0].email.as_deref(), Some("student-1@example.com"));
    assert_eq!(students[0].completed_lessons, 1);
    assert_eq!(students[0].total_watch_time, 10);
}
