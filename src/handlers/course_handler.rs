use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::{
        request::{
            CreateCourseRequest, CreateLessonRequest, CreateModuleRequest, EnrollRequest,
            PaginationParams,
        },
        response::{CourseDto, EnrollmentDto, PaginatedResponse, PaginationMetadata},
    },
};

#[post("/courses")]
pub async fn create_course(
    state: web::Data<AppState>,
    request: web::Json<CreateCourseRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let course = state
        .course_service
        .create_course(&auth.0, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(CourseDto::from(course)))
}

#[get("/courses")]
pub async fn list_courses(
    state: web::Data<AppState>,
    query: web::Query<PaginationParams>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let (offset, limit) = (query.offset(), query.limit());
    let (courses, total) = state.course_service.list_published(offset, limit).await?;

    Ok(HttpResponse::Ok().json(PaginatedResponse {
        data: courses.into_iter().map(CourseDto::from).collect(),
        pagination: PaginationMetadata {
            offset,
            limit,
            total,
        },
    }))
}

#[get("/courses/{id}")]
pub async fn get_course(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let course = state.course_service.get_course(&auth.0, &id).await?;
    Ok(HttpResponse::Ok().json(CourseDto::from(course)))
}

#[post("/courses/{id}/modules")]
pub async fn add_module(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<CreateModuleRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let course = state
        .course_service
        .add_module(&auth.0, &id, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(CourseDto::from(course)))
}

#[post("/courses/{id}/modules/{module_id}/lessons")]
pub async fn add_lesson(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    request: web::Json<CreateLessonRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let (course_id, module_id) = path.into_inner();
    let course = state
        .course_service
        .add_lesson(&auth.0, &course_id, &module_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(CourseDto::from(course)))
}

#[post("/courses/{id}/publish")]
pub async fn publish_course(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let course = state.course_service.publish(&auth.0, &id).await?;
    Ok(HttpResponse::Ok().json(CourseDto::from(course)))
}

#[post("/courses/{id}/enroll")]
pub async fn enroll(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: Option<web::Json<EnrollRequest>>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let request = request.map(web::Json::into_inner).unwrap_or_default();
    let (enrollment, created) = state
        .enrollment_service
        .enroll(&auth.0, &id, request)
        .await?;

    let body = EnrollmentDto::from(enrollment);
    if created {
        Ok(HttpResponse::Created().json(body))
    } else {
        Ok(HttpResponse::Ok().json(body))
    }
}
