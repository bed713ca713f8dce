pub mod mutations;
pub mod queries;

use async_graphql::{EmptySubscription, Schema as GraphQLSchema};

use crate::app_state::AppState;

pub use mutations::MutationRoot;
pub use queries::QueryRoot;

pub type Schema = GraphQLSchema<QueryRoot, MutationRoot, EmptySubscription>;

const MAX_QUERY_DEPTH: usize = 8;
const MAX_QUERY_COMPLEXITY: usize = 256;

/// Builds the schema over the same services the REST handlers use. Claims
/// are attached per request by the GraphQL handler.
pub fn create_schema(app_state: AppState) -> Schema {
    GraphQLSchema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(app_state)
        .limit_depth(MAX_QUERY_DEPTH)
        .limit_complexity(MAX_QUERY_COMPLEXITY)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sdl_exposes_learning_operations() {
        let sdl = GraphQLSchema::build(QueryRoot, MutationRoot, EmptySubscription)
            .finish()
            .sdl();

        for field in [
            "enrolledCourses",
            "courseProgress",
            "courseAnalytics",
            "testForTaking",
            "submitTest",
            "completeLesson",
        ] {
            assert!(sdl.contains(field), "missing {}", field);
        }
    }
}
