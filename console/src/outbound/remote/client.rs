//! Reqwest-backed client for the hosted backend.
//!
//! One [`RemoteClient`] owns the HTTP connection pool, the anon API key and
//! the bearer token of the signed-in user. Port adapters borrow it through an
//! `Arc` and only translate its [`RemoteError`]s into their own error enums.

use std::time::Duration;

use pagination::ContentRange;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_RANGE, CONTENT_TYPE, HeaderMap};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, info, warn};
use url::Url;
use zeroize::Zeroizing;

use super::dto::{PasswordGrant, TokenResponse};
use super::error::{RemoteError, map_status_error, map_transport_error};
use super::query::TableQuery;
use crate::domain::{AuthSession, SessionChange};

const API_KEY_HEADER: &str = "apikey";
const PREFER_HEADER: &str = "Prefer";
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";
const SESSION_CHANNEL_CAPACITY: usize = 16;

/// Connection settings for [`RemoteClient`].
pub struct RemoteClientConfig {
    /// Project URL, e.g. `https://project.backend.example/`.
    pub base_url: Url,
    /// Anon or service-role key sent with every request.
    pub api_key: Zeroizing<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

struct ActiveSession {
    access_token: Zeroizing<String>,
    session: AuthSession,
}

/// Shared client for the backend's REST, auth and storage services.
pub struct RemoteClient {
    http: Client,
    base_url: Url,
    api_key: Zeroizing<String>,
    active: RwLock<Option<ActiveSession>>,
    changes: broadcast::Sender<SessionChange>,
}

impl RemoteClient {
    /// Build a client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::InvalidRequest`] when the base URL cannot carry
    /// paths, or a transport error when the HTTP client cannot be built.
    pub fn new(config: RemoteClientConfig) -> Result<Self, RemoteError> {
        let RemoteClientConfig {
            mut base_url,
            api_key,
            timeout,
        } = config;
        if base_url.cannot_be_a_base() {
            return Err(RemoteError::invalid_request(format!(
                "backend URL '{base_url}' cannot carry paths"
            )));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(map_transport_error)?;
        let (changes, _) = broadcast::channel(SESSION_CHANNEL_CAPACITY);
        Ok(Self {
            http,
            base_url,
            api_key,
            active: RwLock::new(None),
            changes,
        })
    }

    /// Project URL every service path is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint<'a>(
        &self,
        segments: impl IntoIterator<Item = &'a str>,
    ) -> Result<Url, RemoteError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| RemoteError::invalid_request("backend URL cannot carry paths"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn table_url(&self, table: &str) -> Result<Url, RemoteError> {
        self.endpoint(["rest", "v1", table])
    }

    fn object_url(&self, prefix: &[&str], bucket: &str, path: &str) -> Result<Url, RemoteError> {
        let segments = prefix
            .iter()
            .copied()
            .chain(std::iter::once(bucket))
            .chain(path.split('/').filter(|segment| !segment.is_empty()));
        self.endpoint(segments)
    }

    async fn bearer(&self) -> Zeroizing<String> {
        match self.active.read().await.as_ref() {
            Some(active) => active.access_token.clone(),
            None => self.api_key.clone(),
        }
    }

    async fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let bearer = self.bearer().await;
        self.http
            .request(method, url)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .header(AUTHORIZATION, format!("Bearer {}", bearer.as_str()))
    }

    async fn read_request(
        &self,
        method: Method,
        query: &TableQuery,
    ) -> Result<RequestBuilder, RemoteError> {
        let url = self.table_url(query.table())?;
        Ok(self.request(method, url).await.query(&query.to_pairs()))
    }

    async fn send(builder: RequestBuilder) -> Result<(HeaderMap, Vec<u8>), RemoteError> {
        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        Ok((headers, body.to_vec()))
    }

    fn decode<T: DeserializeOwned>(body: &[u8], what: &str) -> Result<T, RemoteError> {
        serde_json::from_slice(body)
            .map_err(|error| RemoteError::decode(format!("invalid {what} payload: {error}")))
    }

    /// Rows matching `query`.
    pub async fn select<T: DeserializeOwned>(
        &self,
        query: &TableQuery,
    ) -> Result<Vec<T>, RemoteError> {
        let builder = self.read_request(Method::GET, query).await?;
        let (_, body) = Self::send(builder).await?;
        let rows: Vec<T> = Self::decode(&body, query.table())?;
        debug!(table = query.table(), rows = rows.len(), "table read");
        Ok(rows)
    }

    /// Exactly one row matching `query`, or `None` when nothing matches.
    pub async fn select_single<T: DeserializeOwned>(
        &self,
        query: &TableQuery,
    ) -> Result<Option<T>, RemoteError> {
        let builder = self
            .read_request(Method::GET, query)
            .await?
            .header(ACCEPT, SINGLE_OBJECT);
        match Self::send(builder).await {
            Ok((_, body)) => Self::decode(&body, query.table()).map(Some),
            Err(error) if error.is_no_rows() => Ok(None),
            Err(error) => Err(error),
        }
    }

    /// Exact number of rows matching `query`.
    pub async fn count(&self, query: &TableQuery) -> Result<u64, RemoteError> {
        let builder = self
            .read_request(Method::HEAD, query)
            .await?
            .header(PREFER_HEADER, "count=exact");
        let (headers, _) = Self::send(builder).await?;
        total_from_headers(&headers)
    }

    /// `POST` for one row that asks for no representation back, so the
    /// caller's read policies never apply to the insert.
    async fn insert_request<B>(&self, table: &str, row: &B) -> Result<RequestBuilder, RemoteError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.table_url(table)?;
        Ok(self
            .request(Method::POST, url)
            .await
            .header(PREFER_HEADER, "return=minimal")
            .json(row))
    }

    /// Insert one row without reading it back.
    pub async fn insert<B>(&self, table: &str, row: &B) -> Result<(), RemoteError>
    where
        B: Serialize + ?Sized,
    {
        let builder = self.insert_request(table, row).await?;
        Self::send(builder).await?;
        debug!(table, "row inserted");
        Ok(())
    }

    /// Exchange an email and password for a session.
    ///
    /// The access token is kept inside the client and used for every later
    /// request; subscribers receive [`SessionChange::SignedIn`].
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, RemoteError> {
        let mut url = self.endpoint(["auth", "v1", "token"])?;
        url.query_pairs_mut().append_pair("grant_type", "password");
        let builder = self
            .http
            .post(url)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(&PasswordGrant { email, password });
        let (_, body) = Self::send(builder).await?;
        let token: TokenResponse = Self::decode(&body, "token")?;
        let session = token.session().map_err(RemoteError::decode)?;

        *self.active.write().await = Some(ActiveSession {
            access_token: Zeroizing::new(token.access_token),
            session: session.clone(),
        });
        info!(user_id = %session.user_id, "signed in");
        self.publish(SessionChange::SignedIn(session.clone()));
        Ok(session)
    }

    /// End the current session.
    ///
    /// The local token is discarded and [`SessionChange::SignedOut`] is
    /// published whether or not the remote logout succeeds.
    pub async fn sign_out(&self) -> Result<(), RemoteError> {
        let previous = self.active.write().await.take();
        let result = match previous {
            Some(active) => self.revoke(&active.access_token).await,
            None => Ok(()),
        };
        if let Err(error) = &result {
            warn!(%error, "remote sign-out failed; local session cleared");
        }
        self.publish(SessionChange::SignedOut);
        result
    }

    async fn revoke(&self, access_token: &str) -> Result<(), RemoteError> {
        let url = self.endpoint(["auth", "v1", "logout"])?;
        let builder = self
            .http
            .post(url)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .header(AUTHORIZATION, format!("Bearer {access_token}"));
        Self::send(builder).await.map(|_| ())
    }

    /// Session held by this client, if signed in.
    pub async fn current_session(&self) -> Option<AuthSession> {
        self.active
            .read()
            .await
            .as_ref()
            .map(|active| active.session.clone())
    }

    /// Receiver for session-change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionChange> {
        self.changes.subscribe()
    }

    fn publish(&self, change: SessionChange) {
        // No receivers is normal before the session context starts.
        let _ = self.changes.send(change);
    }

    /// Upload `bytes` to `bucket/path`, refusing to overwrite.
    pub async fn upload(
        &self,
        bucket: &str,
        path: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), RemoteError> {
        let url = self.object_url(&["storage", "v1", "object"], bucket, path)?;
        let size = bytes.len();
        let builder = self
            .request(Method::POST, url)
            .await
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(bytes);
        Self::send(builder).await?;
        debug!(bucket, path, size, "object uploaded");
        Ok(())
    }

    /// Public URL serving `bucket/path`.
    pub fn public_url(&self, bucket: &str, path: &str) -> Result<Url, RemoteError> {
        self.object_url(&["storage", "v1", "object", "public"], bucket, path)
    }

    /// Create a storage bucket.
    ///
    /// Returns `false` when the bucket already existed.
    pub async fn create_bucket(&self, id: &str, public: bool) -> Result<bool, RemoteError> {
        #[derive(Serialize)]
        struct NewBucket<'a> {
            id: &'a str,
            name: &'a str,
            public: bool,
        }

        let url = self.endpoint(["storage", "v1", "bucket"])?;
        let builder = self.request(Method::POST, url).await.json(&NewBucket {
            id,
            name: id,
            public,
        });
        match Self::send(builder).await {
            Ok(_) => {
                info!(bucket = id, public, "bucket created");
                Ok(true)
            }
            Err(error) if error.is_conflict() => {
                debug!(bucket = id, "bucket already exists");
                Ok(false)
            }
            Err(error) => Err(error),
        }
    }
}

fn total_from_headers(headers: &HeaderMap) -> Result<u64, RemoteError> {
    let raw = headers
        .get(CONTENT_RANGE)
        .ok_or_else(|| RemoteError::decode("count response lacks a Content-Range header"))?
        .to_str()
        .map_err(|error| RemoteError::decode(format!("unreadable Content-Range: {error}")))?;
    let range: ContentRange = raw
        .parse()
        .map_err(|error| RemoteError::decode(format!("{error}")))?;
    range
        .total
        .ok_or_else(|| RemoteError::decode(format!("Content-Range '{raw}' carries no total")))
}

/// Whether the auth service rejected an email/password pair.
pub(super) fn is_bad_credentials(error: &RemoteError) -> bool {
    match error {
        RemoteError::Status { status, code, .. } => {
            let code = code.as_deref().unwrap_or_default();
            *status == StatusCode::BAD_REQUEST.as_u16()
                && matches!(code, "invalid_grant" | "invalid_credentials" | "400")
        }
        _ => false,
    }
}
