use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::{
        request::PaginationParams,
        response::{NotificationDto, PaginatedResponse, PaginationMetadata},
    },
};

#[get("/notifications")]
pub async fn list_notifications(
    state: web::Data<AppState>,
    query: web::Query<PaginationParams>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let (offset, limit) = (query.offset(), query.limit());
    let (notifications, total) = state
        .notification_service
        .list(&auth.0, offset, limit)
        .await?;

    Ok(HttpResponse::Ok().json(PaginatedResponse {
        data: notifications.into_iter().map(NotificationDto::from).collect(),
        pagination: PaginationMetadata {
            offset,
            limit,
            total,
        },
    }))
}

#[post("/notifications/{id}/read")]
pub async fn mark_notification_read(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let notification = state.notification_service.mark_read(&auth.0, &id).await?;
    Ok(HttpResponse::Ok().json(NotificationDto::from(notification)))
}
