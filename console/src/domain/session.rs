//! Signed-in user state shared across the console.
//!
//! [`SessionContext`] is created once by the application context. It listens
//! to the auth port's session changes and re-derives who is signed in, their
//! profile row and their roles on every change. Readers observe the result
//! through a watch channel; only the listener task and [`SessionContext::sign_out`]
//! write to it. Dropping the context (or calling
//! [`SessionContext::shutdown`]) stops the listener.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::ports::{AuthGateway, ProfileQuery};
use crate::domain::{
    AuthSession, Email, Error, LoginCredentials, Profile, Role, RoleSet, SessionChange, UserId,
};

/// Everything the console knows about the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub user_id: UserId,
    pub email: Option<Email>,
    /// Absent when the user has no profile row yet.
    pub profile: Option<Profile>,
    pub roles: RoleSet,
}

impl SessionSnapshot {
    /// The user's first role.
    pub fn primary_role(&self) -> Option<Role> {
        self.roles.primary()
    }

    /// Greeting name: profile name, then email, then user id.
    pub fn display_name(&self) -> &str {
        match (&self.profile, &self.email) {
            (Some(profile), _) => profile.display_name(),
            (None, Some(email)) => email.as_ref(),
            (None, None) => self.user_id.as_ref(),
        }
    }
}

/// Observable session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    /// The initial session has not been restored yet.
    Loading,
    SignedOut,
    SignedIn(SessionSnapshot),
}

impl SessionStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// The signed-in snapshot, if any.
    pub fn snapshot(&self) -> Option<&SessionSnapshot> {
        match self {
            Self::SignedIn(snapshot) => Some(snapshot),
            Self::Loading | Self::SignedOut => None,
        }
    }
}


/// State shared between the context handle and its listener task.
struct SessionState {
    profiles: Arc<dyn ProfileQuery>,
    status: watch::Sender<SessionStatus>,
}

impl SessionState {
    async fn derive(&self, session: &AuthSession) -> SessionSnapshot {
        let user_id = &session.user_id;
        let lookup = tokio::try_join!(
            self.profiles.find_profile(user_id),
            self.profiles.roles(user_id)
        );
        let (profile, roles) = lookup.unwrap_or_else(|error| {
            warn!(%user_id, %error, "profile lookup failed; continuing without roles");
            (None, RoleSet::empty())
        });
        if profile.is_none() {
            debug!(%user_id, "no profile row for user");
        }
        SessionSnapshot {
            user_id: user_id.clone(),
            email: session.email.clone(),
            profile,
            roles,
        }
    }

    async fn apply(&self, session: Option<&AuthSession>) {
        let status = match session {
            Some(session) => SessionStatus::SignedIn(self.derive(session).await),
            None => SessionStatus::SignedOut,
        };
        self.status.send_replace(status);
    }

    async fn restore(&self, auth: &dyn AuthGateway) {
        match auth.current_session().await {
            Ok(session) => self.apply(session.as_ref()).await,
            Err(error) => {
                warn!(%error, "could not restore session; treating as signed out");
                self.status.send_replace(SessionStatus::SignedOut);
            }
        }
    }
}

async fn listen(
    state: Arc<SessionState>,
    auth: Arc<dyn AuthGateway>,
    mut changes: broadcast::Receiver<SessionChange>,
) {
    state.restore(auth.as_ref()).await;
    loop {
        match changes.recv().await {
            Ok(change) => {
                debug!(?change, "session change received");
                state.apply(change.session()).await;
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "session notifications lagged; re-deriving");
                state.restore(auth.as_ref()).await;
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
    debug!("session listener stopped");
}

/// Owner of the console's session state.
///
/// # Examples
/// ```no_run
/// # use std::sync::Arc;
/// # use edtech_console::domain::ports::{AuthGateway, ProfileQuery};
/// # use edtech_console::domain::{LoginCredentials, SessionContext};
/// # async fn demo(auth: Arc<dyn AuthGateway>, profiles: Arc<dyn ProfileQuery>) {
/// let session = SessionContext::start(auth, profiles);
/// session.settled().await;
/// let creds = LoginCredentials::try_from_parts("admin@edtech.test", "secret").unwrap();
/// if let Ok(snapshot) = session.sign_in(&creds).await {
///     println!("welcome {}", snapshot.display_name());
/// }
/// session.shutdown();
/// # }
/// ```
pub struct SessionContext {
    auth: Arc<dyn AuthGateway>,
    state: Arc<SessionState>,
    listener: JoinHandle<()>,
}

impl SessionContext {
    /// Subscribe to session changes and spawn the listener task.
    ///
    /// Must be called from within a Tokio runtime. The status is
    /// [`SessionStatus::Loading`] until the current session is restored.
    pub fn start(auth: Arc<dyn AuthGateway>, profiles: Arc<dyn ProfileQuery>) -> Self {
        let (status, _) = watch::channel(SessionStatus::Loading);
        let state = Arc::new(SessionState { profiles, status });
        let changes = auth.subscribe();
        let listener = tokio::spawn(listen(Arc::clone(&state), Arc::clone(&auth), changes));
        Self {
            auth,
            state,
            listener,
        }
    }

    /// Current status.
    pub fn status(&self) -> SessionStatus {
        self.state.status.borrow().clone()
    }

    /// Receiver notified on every status change.
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.state.status.subscribe()
    }

    /// Wait until the initial restore has finished and return the status.
    pub async fn settled(&self) -> SessionStatus {
        let mut receiver = self.subscribe();
        match receiver.wait_for(|status| !status.is_loading()).await {
            Ok(status) => status.clone(),
            // The sender lives in `self`, so the channel cannot close here.
            Err(_) => self.status(),
        }
    }

    /// Sign in with email and password.
    ///
    /// On failure the status is left untouched.
    pub async fn sign_in(&self, credentials: &LoginCredentials) -> Result<SessionSnapshot, Error> {
        let session = self
            .auth
            .sign_in(credentials)
            .await
            .map_err(Error::from)?;
        let snapshot = self.state.derive(&session).await;
        info!(user_id = %snapshot.user_id, roles = %snapshot.roles, "signed in");
        self.state
            .status
            .send_replace(SessionStatus::SignedIn(snapshot.clone()));
        Ok(snapshot)
    }

    /// Sign out; local state is cleared even if the remote call fails.
    pub async fn sign_out(&self) {
        if let Err(error) = self.auth.sign_out().await {
            warn!(%error, "remote sign-out failed; clearing local session anyway");
        }
        self.state.status.send_replace(SessionStatus::SignedOut);
        info!("signed out");
    }

    /// Stop listening for session changes.
    pub fn shutdown(&self) {
        self.listener.abort();
    }

    /// Whether the listener task is still running.
    pub fn is_listening(&self) -> bool {
        !self.listener.is_finished()
    }
}

impl Drop for SessionContext {
    fn drop(&mut self) {
        self.listener.abort();
    }
}
