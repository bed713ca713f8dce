use async_graphql::Context;

use crate::{
    auth::Claims,
    errors::{AppError, AppResult},
    models::domain::user::UserRole,
};

pub fn is_admin(claims: &Claims) -> bool {
    claims.role == UserRole::Admin
}

pub fn is_owner_or_admin(claims: &Claims, resource_owner: &str) -> bool {
    is_admin(claims) || claims.sub == resource_owner
}

pub fn require_instructor(claims: &Claims) -> AppResult<()> {
    if !matches!(claims.role, UserRole::Instructor | UserRole::Admin) {
        return Err(AppError::Forbidden(
            "Only instructors can perform this action".to_string(),
        ));
    }
    Ok(())
}

pub fn require_owner_or_admin(claims: &Claims, resource_owner: &str) -> AppResult<()> {
    if !is_owner_or_admin(claims, resource_owner) {
        return Err(AppError::Forbidden(
            "You can only manage your own resources".to_string(),
        ));
    }
    Ok(())
}

pub fn extract_claims_from_context(ctx: &Context<'_>) -> AppResult<Claims> {
    ctx.data::<Claims>()
        .cloned()
        .map_err(|_| AppError::Unauthorized("Authentication required".to_string()))
}
