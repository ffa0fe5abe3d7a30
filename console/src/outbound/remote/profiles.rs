//! Profile and role lookups backed by the REST interface.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use super::client::RemoteClient;
use super::dto::{ProfileRow, RoleRow};
use super::error::RemoteError;
use super::query::TableQuery;
use crate::domain::ports::{ProfileQuery, ProfileQueryError};
use crate::domain::{Profile, RoleSet, UserId};

/// [`ProfileQuery`] adapter over [`RemoteClient`].
pub struct RemoteProfiles {
    client: Arc<RemoteClient>,
}

impl RemoteProfiles {
    pub fn new(client: Arc<RemoteClient>) -> Self {
        Self { client }
    }
}

fn map_remote_error(error: RemoteError) -> ProfileQueryError {
    error.into_port_error(ProfileQueryError::connection, ProfileQueryError::query)
}

/// Collect known roles; unknown labels are logged and skipped.
fn role_set(user_id: &UserId, rows: &[RoleRow]) -> RoleSet {
    rows.iter()
        .filter_map(|row| {
            let parsed = row.parse();
            if parsed.is_none() {
                warn!(%user_id, role = %row.role, "ignoring unknown role");
            }
            parsed
        })
        .collect()
}

#[async_trait]
impl ProfileQuery for RemoteProfiles {
    async fn find_profile(&self, user_id: &UserId) -> Result<Option<Profile>, ProfileQueryError> {
        let query = TableQuery::new("profiles").eq("id", user_id);
        let row: Option<ProfileRow> = self
            .client
            .select_single(&query)
            .await
            .map_err(map_remote_error)?;
        row.map(Profile::try_from)
            .transpose()
            .map_err(ProfileQueryError::query)
    }

    async fn roles(&self, user_id: &UserId) -> Result<RoleSet, ProfileQueryError> {
        let query = TableQuery::new("user_roles")
            .select("role")
            .eq("user_id", user_id);
        let rows: Vec<RoleRow> = self
            .client
            .select(&query)
            .await
            .map_err(map_remote_error)?;
        Ok(role_set(user_id, &rows))
    }
}
