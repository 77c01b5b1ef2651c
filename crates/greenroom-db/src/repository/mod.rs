//! SurrealDB repository implementations.

mod audit;
mod role_grant;
mod user_grant;

pub use audit::SurrealAccessAuditRepository;
pub use role_grant::SurrealRoleGrantRepository;
pub use user_grant::SurrealUserGrantRepository;
