//! Driven port for the hosted authentication service.
//!
//! The session context drives sign-in and sign-out through this port and
//! listens to its session-change notifications; it never sees tokens.

use async_trait::async_trait;
use tokio::sync::broadcast;

use super::define_port_error;
use crate::domain::{AuthSession, LoginCredentials, SessionChange};

define_port_error! {
    /// Errors surfaced by the authentication service.
    pub enum AuthGatewayError {
        /// Email/password pair was rejected.
        InvalidCredentials as Unauthorized => "invalid email or password",
        /// The auth service could not be reached.
        Connection { message } as ServiceUnavailable => "auth service unavailable: {message}",
        /// The auth service refused the request for another reason.
        Rejected { message } as InvalidRequest => "auth service rejected the request: {message}",
    }
}

/// Port for password authentication and session notifications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Session restored from the adapter, if one is active.
    async fn current_session(&self) -> Result<Option<AuthSession>, AuthGatewayError>;

    /// Exchange credentials for a session.
    ///
    /// Successful calls also publish [`SessionChange::SignedIn`].
    async fn sign_in(&self, credentials: &LoginCredentials)
    -> Result<AuthSession, AuthGatewayError>;

    /// End the current session remotely.
    ///
    /// Adapters publish [`SessionChange::SignedOut`] even when the remote call
    /// fails, since the local token is discarded either way.
    async fn sign_out(&self) -> Result<(), AuthGatewayError>;

    /// Subscribe to session-change notifications.
    fn subscribe(&self) -> broadcast::Receiver<SessionChange>;
}
