pub mod course_handler;
pub mod graphql_handler;
pub mod health_handler;
pub mod notification_handler;
pub mod progress_handler;
pub mod test_handler;

use actix_web::web;

use crate::auth::AuthMiddleware;

pub use health_handler::{health_check, health_check_live, health_check_ready};

/// Registers every route. Expects `AppState`, `JwtService` and the GraphQL
/// `Schema` as app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(health_check_live)
        .service(health_check_ready)
        .service(
            web::resource("/graphql")
                .wrap(AuthMiddleware)
                .route(web::post().to(graphql_handler::graphql)),
        )
        .service(
            web::scope("/api")
                .wrap(AuthMiddleware)
                .service(test_handler::create_test)
                .service(test_handler::get_test)
                .service(test_handler::submit_test)
                .service(test_handler::list_attempts)
                .service(course_handler::create_course)
                .service(course_handler::list_courses)
                .service(course_handler::get_course)
                .service(course_handler::add_module)
                .service(course_handler::add_lesson)
                .service(course_handler::publish_course)
                .service(course_handler::enroll)
                .service(progress_handler::complete_lesson)
                .service(progress_handler::visit_lesson)
                .service(progress_handler::course_progress)
                .service(progress_handler::enrolled_courses)
                .service(progress_handler::course_students)
                .service(progress_handler::course_analytics)
                .service(notification_handler::list_notifications)
                .service(notification_handler::mark_notification_read),
        );
}
