//! In-memory auth service and profile store.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::broadcast;

use super::lock;
use crate::domain::ports::{AuthGateway, AuthGatewayError, ProfileQuery, ProfileQueryError};
use crate::domain::{
    AuthSession, LoginCredentials, Profile, Role, RoleSet, SessionChange, UserId,
};

struct Account {
    password: String,
    session: AuthSession,
}

/// Auth double holding email/password accounts.
pub struct InMemoryAuth {
    accounts: Mutex<HashMap<String, Account>>,
    active: Mutex<Option<AuthSession>>,
    changes: broadcast::Sender<SessionChange>,
    offline: AtomicBool,
}

impl Default for InMemoryAuth {
    fn default() -> Self {
        let (changes, _) = broadcast::channel(16);
        Self {
            accounts: Mutex::new(HashMap::new()),
            active: Mutex::new(None),
            changes,
            offline: AtomicBool::new(false),
        }
    }
}

impl InMemoryAuth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account and return its user id.
    pub fn with_account(&self, email: &str, password: &str) -> UserId {
        let user_id = UserId::random();
        let session = AuthSession {
            user_id: user_id.clone(),
            email: crate::domain::Email::new(email).ok(),
            expires_at: None,
        };
        lock(&self.accounts).insert(
            email.trim().to_lowercase(),
            Account {
                password: password.to_owned(),
                session,
            },
        );
        user_id
    }

    /// Make every remote call fail with a connection error.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> Result<(), AuthGatewayError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(AuthGatewayError::connection("auth double is offline"))
        } else {
            Ok(())
        }
    }

    fn publish(&self, change: SessionChange) {
        let _ = self.changes.send(change);
    }
}

#[async_trait]
impl AuthGateway for InMemoryAuth {
    async fn current_session(&self) -> Result<Option<AuthSession>, AuthGatewayError> {
        Ok(lock(&self.active).clone())
    }

    async fn sign_in(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthSession, AuthGatewayError> {
        self.ensure_online()?;
        let session = lock(&self.accounts)
            .get(credentials.email().as_ref())
            .filter(|account| account.password == credentials.password())
            .map(|account| account.session.clone())
            .ok_or_else(AuthGatewayError::invalid_credentials)?;
        *lock(&self.active) = Some(session.clone());
        self.publish(SessionChange::SignedIn(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), AuthGatewayError> {
        lock(&self.active).take();
        let result = self.ensure_online();
        self.publish(SessionChange::SignedOut);
        result
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionChange> {
        self.changes.subscribe()
    }
}

/// Profile and role store keyed by user id.
#[derive(Default)]
pub struct InMemoryProfiles {
    profiles: Mutex<HashMap<UserId, Profile>>,
    roles: Mutex<HashMap<UserId, Vec<Role>>>,
}

impl InMemoryProfiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a profile named `full_name` for `user_id`.
    pub fn insert_profile(&self, user_id: &UserId, full_name: &str) {
        lock(&self.profiles).insert(
            user_id.clone(),
            Profile {
                user_id: user_id.clone(),
                full_name: full_name.to_owned(),
                phone: None,
                address: None,
                avatar_url: None,
            },
        );
    }

    /// Grant `role` to `user_id`.
    pub fn grant(&self, user_id: &UserId, role: Role) {
        lock(&self.roles)
            .entry(user_id.clone())
            .or_default()
            .push(role);
    }
}

#[async_trait]
impl ProfileQuery for InMemoryProfiles {
    async fn find_profile(&self, user_id: &UserId) -> Result<Option<Profile>, ProfileQueryError> {
        Ok(lock(&self.profiles).get(user_id).cloned())
    }

    async fn roles(&self, user_id: &UserId) -> Result<RoleSet, ProfileQueryError> {
        Ok(lock(&self.roles)
            .get(user_id)
            .map(|roles| roles.iter().copied().collect())
            .unwrap_or_default())
    }
}
