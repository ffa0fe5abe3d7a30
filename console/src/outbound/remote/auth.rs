//! Password authentication backed by the hosted auth service.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;

use super::client::{RemoteClient, is_bad_credentials};
use super::error::RemoteError;
use crate::domain::ports::{AuthGateway, AuthGatewayError};
use crate::domain::{AuthSession, LoginCredentials, SessionChange};

/// [`AuthGateway`] adapter over [`RemoteClient`].
pub struct RemoteAuth {
    client: Arc<RemoteClient>,
}

impl RemoteAuth {
    pub fn new(client: Arc<RemoteClient>) -> Self {
        Self { client }
    }
}

fn map_remote_error(error: RemoteError) -> AuthGatewayError {
    if is_bad_credentials(&error) {
        AuthGatewayError::invalid_credentials()
    } else {
        error.into_port_error(AuthGatewayError::connection, AuthGatewayError::rejected)
    }
}

#[async_trait]
impl AuthGateway for RemoteAuth {
    async fn current_session(&self) -> Result<Option<AuthSession>, AuthGatewayError> {
        Ok(self.client.current_session().await)
    }

    async fn sign_in(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthSession, AuthGatewayError> {
        self.client
            .sign_in_with_password(credentials.email().as_ref(), credentials.password())
            .await
            .map_err(map_remote_error)
    }

    async fn sign_out(&self) -> Result<(), AuthGatewayError> {
        self.client.sign_out().await.map_err(map_remote_error)
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionChange> {
        self.client.subscribe()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for auth error mapping.
    use super::*;

    #[test]
    fn bad_credentials_map_to_invalid_credentials() {
        let error = map_remote_error(RemoteError::Status {
            status: 400,
            code: Some("invalid_grant".to_owned()),
            message: "Invalid login credentials".to_owned(),
        });
        assert_eq!(error, AuthGatewayError::InvalidCredentials);
    }

    #[test]
    fn other_refusals_are_rejected() {
        let error = map_remote_error(RemoteError::Status {
            status: 429,
            code: Some("over_request_rate_limit".to_owned()),
            message: "Too many requests".to_owned(),
        });
        assert!(matches!(error, AuthGatewayError::Rejected { .. }));
    }
}
