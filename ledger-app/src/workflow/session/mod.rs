use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    domain::{Session, SessionId},
    ports::identity::IdentityPort,
};

pub mod cleanup;

#[derive(Clone, Debug)]
pub struct SessionView {
    pub session_id: SessionId,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl From<Session> for SessionView {
    fn from(session: Session) -> Self {
        Self {
            session_id: session.session_id,
            token: session.token,
            expires_at: session.expires_at,
        }
    }
}

#[async_trait::async_trait]
pub trait SessionUseCase {
    async fn sign_in(&self) -> Result<SessionView, SignInError>;
    async fn authenticate(&self, token: &str) -> Option<SessionView>;
}

#[derive(Debug)]
pub enum SignInError {
    Internal,
}

pub struct SessionUseCaseImpl<I: IdentityPort> {
    identity: Arc<I>,
}

impl<I: IdentityPort> SessionUseCaseImpl<I> {
    pub fn new(identity: Arc<I>) -> Self {
        Self { identity }
    }
}

#[async_trait::async_trait]
impl<I: IdentityPort + Send + Sync + 'static> SessionUseCase for SessionUseCaseImpl<I> {
    async fn sign_in(&self) -> Result<SessionView, SignInError> {
        match self.identity.sign_in_anonymously().await {
            Ok(session) => {
                log::info!("Anonymous session {} signed in", session.session_id);
                Ok(SessionView::from(session))
            }
            Err(e) => {
                log::error!("Anonymous sign-in failed: {}", e);
                Err(SignInError::Internal)
            }
        }
    }

    async fn authenticate(&self, token: &str) -> Option<SessionView> {
        self.identity.verify(token).await.map(SessionView::from)
    }
}
