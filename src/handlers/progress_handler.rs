use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::{request::LessonRequest, response::LessonProgressDto},
};

#[post("/progress/complete")]
pub async fn complete_lesson(
    state: web::Data<AppState>,
    request: web::Json<LessonRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    request.validate()?;
    let row = state
        .progress_service
        .complete_lesson(&auth.0, &request.lesson_id)
        .await?;
    Ok(HttpResponse::Ok().json(LessonProgressDto::from(row)))
}

#[post("/progress/visit")]
pub async fn visit_lesson(
    state: web::Data<AppState>,
    request: web::Json<LessonRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    request.validate()?;
    let row = state
        .progress_service
        .visit_lesson(&auth.0, &request.lesson_id)
        .await?;
    Ok(HttpResponse::Ok().json(LessonProgressDto::from(row)))
}

#[get("/courses/{id}/progress")]
pub async fn course_progress(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let progress = state.progress_service.course_progress(&auth.0, &id).await?;
    Ok(HttpResponse::Ok().json(progress))
}

#[get("/student/enrolled-courses")]
pub async fn enrolled_courses(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let courses = state.progress_service.enrolled_courses(&auth.0).await?;
    Ok(HttpResponse::Ok().json(courses))
}

#[get("/courses/{id}/students")]
pub async fn course_students(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let students = state.progress_service.course_students(&auth.0, &id).await?;
    Ok(HttpResponse::Ok().json(students))
}

#[get("/courses/{id}/analytics")]
pub async fn course_analytics(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let analytics = state.progress_service.course_analytics(&auth.0, &id).await?;
    Ok(HttpResponse::Ok().json(analytics))
}
