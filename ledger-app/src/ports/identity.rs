use thiserror::Error;
use tokio::sync::watch;

use crate::domain::Session;

/// The anonymous identity provider. The ledger only needs to know whether a
/// session exists before it starts reading data.
#[async_trait::async_trait]
pub trait IdentityPort {
    async fn sign_in_anonymously(&self) -> Result<Session, IdentityError>;
    async fn verify(&self, token: &str) -> Option<Session>;
    fn watch_session(&self) -> watch::Receiver<Option<Session>>;
    /// Forgets expired sessions and returns how many were dropped.
    fn clean_up_expired(&self) -> usize;
}

#[derive(Debug, Clone, Error)]
pub enum IdentityError {
    #[error("failed to issue session token: {0}")]
    TokenIssue(String),
}

#[cfg(test)]
pub use mock::MockIdentity;
