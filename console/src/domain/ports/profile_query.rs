//! Driven port for profile and role lookups.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{Profile, RoleSet, UserId};

define_port_error! {
    /// Errors surfaced while reading profile data.
    pub enum ProfileQueryError {
        /// Backend connection could not be established.
        Connection { message } as ServiceUnavailable => "profile store unavailable: {message}",
        /// Query failed during execution.
        Query { message } as InternalError => "profile query failed: {message}",
    }
}

/// Port for reading the signed-in user's profile row and roles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileQuery: Send + Sync {
    /// Profile row for `user_id`; a missing row is `Ok(None)`.
    async fn find_profile(&self, user_id: &UserId) -> Result<Option<Profile>, ProfileQueryError>;

    /// Roles granted to `user_id`, primary role first.
    async fn roles(&self, user_id: &UserId) -> Result<RoleSet, ProfileQueryError>;
}
