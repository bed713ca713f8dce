use async_graphql::{Context, Object, ID};

use crate::{
    app_state::AppState,
    auth::extract_claims_from_context,
    graphql::helpers::{extend, page},
    models::dto::{
        analytics::{CourseAnalytics, CourseProgress},
        response::{AttemptDto, EnrolledCourseDto, TestView},
    },
};

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn enrolled_courses(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<EnrolledCourseDto>> {
        let state = ctx.data::<AppState>()?;
        let claims = extend(extract_claims_from_context(ctx))?;

        extend(state.progress_service.enrolled_courses(&claims).await)
    }

    async fn course_progress(
        &self,
        ctx: &Context<'_>,
        course_id: ID,
    ) -> async_graphql::Result<CourseProgress> {
        let state = ctx.data::<AppState>()?;
        let claims = extend(extract_claims_from_context(ctx))?;

        extend(state.progress_service.course_progress(&claims, &course_id).await)
    }

    async fn course_analytics(
        &self,
        ctx: &Context<'_>,
        course_id: ID,
    ) -> async_graphql::Result<CourseAnalytics> {
        let state = ctx.data::<AppState>()?;
        let claims = extend(extract_claims_from_context(ctx))?;

        extend(state.progress_service.course_analytics(&claims, &course_id).await)
    }

    async fn test_for_taking(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<TestView> {
        let state = ctx.data::<AppState>()?;
        let claims = extend(extract_claims_from_context(ctx))?;

        extend(state.test_service.get_test_for_taking(&claims, &id).await)
    }

    /// The caller's own attempts at a test, newest first.
    async fn attempts(
        &self,
        ctx: &Context<'_>,
        test_id: ID,
        offset: Option<i64>,
        limit: Option<i64>,
    ) -> async_graphql::Result<Vec<AttemptDto>> {
        let state = ctx.data::<AppState>()?;
        let claims = extend(extract_claims_from_context(ctx))?;
        let (offset, limit) = page(offset, limit);

        let (attempts, _total) = extend(
            state
                .test_service
                .list_attempts(&claims, &test_id, offset, limit)
                .await,
        )?;
        Ok(attempts.into_iter().map(AttemptDto::from).collect())
    }
}
