use std::{collections::HashMap, sync::RwLock};

use chrono::{Duration, Utc};
use ledger_app::{
    domain::{Session, SessionId},
    ports::identity::{IdentityError, IdentityPort},
};
use tokio::sync::watch;

mod jwt;

use jwt::Keys;

/// Hands out anonymous sessions as signed JWTs and keeps track of the ones
/// it issued. The most recent session is published to watchers.
pub struct AnonymousIdentityProvider {
    keys: Keys,
    session_ttl: Duration,
    sessions: RwLock<HashMap<SessionId, Session>>,
    current: watch::Sender<Option<Session>>,
}

impl AnonymousIdentityProvider {
    pub fn new(secret: &str, session_ttl: Duration) -> Self {
        Self {
            keys: Keys::new(secret.as_bytes()),
            session_ttl,
            sessions: RwLock::new(HashMap::new()),
            current: watch::channel(None).0,
        }
    }
}

#[async_trait::async_trait]
impl IdentityPort for AnonymousIdentityProvider {
    async fn sign_in_anonymously(&self) -> Result<Session, IdentityError> {
        let removed = self.clean_up_expired();
        if removed > 0 {
            log::debug!("Removed {} expired sessions", removed);
        }

        let session_id = SessionId::new();
        let expires_at = Utc::now() + self.session_ttl;
        let token = self
            .keys
            .sign(&session_id.to_string(), expires_at)
            .map_err(|e| IdentityError::TokenIssue(e.to_string()))?;
        let session = Session {
            session_id,
            token,
            expires_at,
        };

        self.sessions
            .write()
            .map_err(|e| IdentityError::TokenIssue(e.to_string()))?
            .insert(session_id, session.clone());
        self.current.send_replace(Some(session.clone()));
        log::info!("Issued anonymous session {}", session_id);
        Ok(session)
    }

    async fn verify(&self, token: &str) -> Option<Session> {
        let claims = self.keys.claims(token)?;
        let session_id = SessionId(claims.sub.parse().ok()?);
        let session = self.sessions.read().ok()?.get(&session_id)?.clone();
        if session.expires_at <= Utc::now() {
            // the token is still inside the decoder's leeway
            self.clean_up_expired();
            return None;
        }
        (session.token == token).then_some(session)
    }

    fn watch_session(&self) -> watch::Receiver<Option<Session>> {
        self.current.subscribe()
    }

    fn clean_up_expired(&self) -> usize {
        let now = Utc::now();
        let Ok(mut sessions) = self.sessions.write() else {
            return 0;
        };
        let before = sessions.len();
        sessions.retain(|_, session| session.expires_at > now);
        before - sessions.len()
    }
}
