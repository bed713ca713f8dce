use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::{
        request::{CreateTestRequest, PaginationParams, SubmitTestRequest},
        response::{
            AttemptDto, PaginatedResponse, PaginationMetadata, SubmissionResponse, TestView,
        },
    },
};

#[post("/tests")]
pub async fn create_test(
    state: web::Data<AppState>,
    request: web::Json<CreateTestRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let test = state
        .test_service
        .create_test(&auth.0, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(TestView::from_test(test, true)))
}

#[get("/tests/{id}")]
pub async fn get_test(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let view = state.test_service.get_test_for_taking(&auth.0, &id).await?;
    Ok(HttpResponse::Ok().json(view))
}

#[post("/tests/{id}/submit")]
pub async fn submit_test(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<SubmitTestRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let attempt = state
        .test_service
        .submit(&auth.0, &id, &request.answers)
        .await?;
    Ok(HttpResponse::Ok().json(SubmissionResponse::from(attempt)))
}

#[get("/tests/{id}/attempts")]
pub async fn list_attempts(
    state: web::Data<AppState>,
    id: web::Path<String>,
    query: web::Query<PaginationParams>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let (offset, limit) = (query.offset(), query.limit());
    let (attempts, total) = state
        .test_service
        .list_attempts(&auth.0, &id, offset, limit)
        .await?;

    Ok(HttpResponse::Ok().json(PaginatedResponse {
        data: attempts.into_iter().map(AttemptDto::from).collect(),
        pagination: PaginationMetadata {
            offset,
            limit,
            total,
        },
    }))
}
