//! Session lifecycle: handshake, caching, expiry and refresh.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Method;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::error::Error;
use crate::http::{HttpTransport, RequestBuilder, read_json};

use super::signer::Signer;
use super::tokens::{Session, SessionToken};

/// How long a session token is trusted after issuance.
///
/// The server does not report a lifetime; this is a conservative policy
/// value and can be overridden per client.
pub const DEFAULT_SESSION_LIFETIME: Duration = Duration::from_secs(3 * 60);

/// Rooted so it resolves against the server host, not the base path.
const SESSION_PATH: &str = "/session";

#[derive(Debug, Deserialize)]
struct SessionResponse {
    auth_session_token: String,
}

#[derive(Default)]
struct SessionState {
    session: Option<Session>,
    last_failure: Option<Arc<Error>>,
}

/// Owns the current session token and refreshes it on demand.
///
/// The check-and-refresh sequence runs under a single async mutex, so at
/// most one handshake is in flight per client. Callers that queued behind a
/// handshake observe its outcome instead of starting another one.
pub(crate) struct SessionManager {
    signer: Signer,
    requests: RequestBuilder,
    transport: Arc<dyn HttpTransport>,
    lifetime: Duration,
    state: Mutex<SessionState>,
    // Completed handshake attempts; read before locking to detect that a
    // handshake finished while the caller was queued.
    attempts: AtomicU64,
}

impl SessionManager {
    pub(crate) fn new(
        signer: Signer,
        requests: RequestBuilder,
        transport: Arc<dyn HttpTransport>,
        lifetime: Duration,
    ) -> Self {
        Self {
            signer,
            requests,
            transport,
            lifetime,
            state: Mutex::new(SessionState::default()),
            attempts: AtomicU64::new(0),
        }
    }

    /// Returns a valid session token, performing a handshake if needed.
    ///
    /// # Errors
    ///
    /// Returns `Session` wrapping the handshake failure. The session stays
    /// unauthenticated, so the next call attempts a fresh handshake.
    pub(crate) async fn ensure_session(&self) -> Result<SessionToken, Error> {
        let observed = self.attempts.load(Ordering::Acquire);
        let mut state = self.state.lock().await;

        if let Some(session) = &state.session {
            if !session.is_expired_at(Utc::now()) {
                return Ok(session.token.clone());
            }
            debug!(expired_at = %session.expires_at, "session expired");
        }

        if self.attempts.load(Ordering::Acquire) != observed
            && let Some(cause) = &state.last_failure
        {
            return Err(Error::Session(Arc::clone(cause)));
        }

        state.session = None;
        let result = self.handshake().await;
        self.attempts.fetch_add(1, Ordering::AcqRel);

        match result {
            Ok(session) => {
                let token = session.token.clone();
                state.session = Some(session);
                state.last_failure = None;
                Ok(token)
            }
            Err(err) => {
                let cause = Arc::new(err);
                state.last_failure = Some(Arc::clone(&cause));
                Err(Error::Session(cause))
            }
        }
    }

    /// Returns when the current session expires, if one is held.
    pub(crate) async fn expires_at(&self) -> Option<DateTime<Utc>> {
        let state = self.state.lock().await;
        state.session.as_ref().map(|s| s.expires_at)
    }

    /// Drop the current session so the next call performs a handshake.
    pub(crate) async fn invalidate(&self) {
        let mut state = self.state.lock().await;
        if state.session.take().is_some() {
            debug!("session invalidated");
        }
    }

    #[instrument(skip(self), fields(server = %self.requests.server()))]
    async fn handshake(&self) -> Result<Session, Error> {
        info!("Creating new session");

        let mut request = self.requests.build(Method::GET, SESSION_PATH, None::<&()>)?;
        let authorization = self
            .signer
            .authorization(request.method(), request.url().as_str())?;
        request.headers_mut().insert(AUTHORIZATION, authorization);

        let response = self.transport.execute(request).await?;
        let body: SessionResponse = read_json(response).await?;

        if body.auth_session_token.is_empty() {
            return Err(Error::Decoding(serde::de::Error::custom(
                "empty auth_session_token",
            )));
        }
        let token = SessionToken::new(&body.auth_session_token).map_err(|_| {
            Error::Decoding(serde::de::Error::custom(
                "auth_session_token is not a valid header value",
            ))
        })?;

        let issued = Utc::now();
        let expires_at = chrono::Duration::from_std(self.lifetime)
            .ok()
            .and_then(|lifetime| issued.checked_add_signed(lifetime))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        debug!(%expires_at, "Session created successfully");
        Ok(Session {
            token,
            expires_at,
        })
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("server", self.requests.server())
            .field("lifetime", &self.lifetime)
            .field("session", &"[REDACTED]")
            .finish()
    }
}
