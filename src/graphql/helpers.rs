use async_graphql::ErrorExtensions;

use crate::errors::AppResult;

/// Converts a service result into a GraphQL result carrying the error code
/// as the `code` extension.
pub fn extend<T>(result: AppResult<T>) -> async_graphql::Result<T> {
    result.map_err(|e| e.extend())
}

/// Offset and limit with the same defaults and bounds as the REST query
/// parameters.
pub fn page(offset: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    (offset.unwrap_or(0).max(0), limit.unwrap_or(20).clamp(1, 100))
}
