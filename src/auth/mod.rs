pub mod claims;
pub mod jwt;
pub mod middleware;
pub mod utils;

pub use claims::Claims;
pub use jwt::JwtService;
pub use middleware::{AuthMiddleware, AuthenticatedUser};
pub use utils::{
    extract_claims_from_context, is_admin, is_owner_or_admin, require_instructor,
    require_owner_or_admin,
};
