use actix_web::web;
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse};

use crate::{auth::AuthenticatedUser, graphql::Schema};

/// Executes a GraphQL request with the caller's claims in the context.
pub async fn graphql(
    schema: web::Data<Schema>,
    request: GraphQLRequest,
    auth: AuthenticatedUser,
) -> GraphQLResponse {
    schema.execute(request.into_inner().data(auth.0)).await.into()
}
