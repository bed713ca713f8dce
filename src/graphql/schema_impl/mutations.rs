use async_graphql::{Context, Object, ID};

use crate::{
    app_state::AppState,
    auth::extract_claims_from_context,
    graphql::helpers::extend,
    models::dto::{
        request::AnswerInput,
        response::{LessonProgressDto, SubmissionResponse},
    },
};

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn submit_test(
        &self,
        ctx: &Context<'_>,
        test_id: ID,
        answers: Vec<AnswerInput>,
    ) -> async_graphql::Result<SubmissionResponse> {
        let state = ctx.data::<AppState>()?;
        let claims = extend(extract_claims_from_context(ctx))?;

        let attempt = extend(state.test_service.submit(&claims, &test_id, &answers).await)?;
        Ok(SubmissionResponse::from(attempt))
    }

    async fn complete_lesson(
        &self,
        ctx: &Context<'_>,
        lesson_id: ID,
    ) -> async_graphql::Result<LessonProgressDto> {
        let state = ctx.data::<AppState>()?;
        let claims = extend(extract_claims_from_context(ctx))?;

        let row = extend(state.progress_service.complete_lesson(&claims, &lesson_id).await)?;
        Ok(LessonProgressDto::from(row))
    }
}
