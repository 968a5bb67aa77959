use std::{sync::Arc, time::Duration};

use tokio_util::sync::CancellationToken;

use crate::ports::identity::IdentityPort;

/// Periodically drops expired sessions from the identity provider.
pub struct SessionCleanupJob<I: IdentityPort> {
    identity: Arc<I>,
    every: Duration,
}

impl<I: IdentityPort + Send + Sync + 'static> SessionCleanupJob<I> {
    pub fn new(identity: Arc<I>, every: Duration) -> Self {
        Self { identity, every }
    }

    pub async fn run(&self, cancellation_token: CancellationToken) {
        let mut interval = tokio::time::interval(self.every);
        loop {
            tokio::select! {
                _ = cancellation_token.cancelled() => break,
                _ = interval.tick() => {
                    let removed = self.identity.clean_up_expired();
                    if removed > 0 {
                        log::info!("Removed {} expired sessions", removed);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::sync::watch;

    use super::*;
    use crate::{
        domain::Session,
        ports::identity::IdentityError,
    };

    struct CountingIdentity {
        cleanups: AtomicUsize,
        current: watch::Sender<Option<Session>>,
    }

    #[async_trait::async_trait]
    impl IdentityPort for CountingIdentity {
        async fn sign_in_anonymously(&self) -> Result<Session, IdentityError> {
            Err(IdentityError::TokenIssue("not supported".to_string()))
        }

        async fn verify(&self, _token: &str) -> Option<Session> {
            None
        }

        fn watch_session(&self) -> watch::Receiver<Option<Session>> {
            self.current.subscribe()
        }

        fn clean_up_expired(&self) -> usize {
            self.cleanups.fetch_add(1, Ordering::SeqCst);
            1
        }
    }

    #[tokio::test]
    async fn test_cleans_up_until_cancelled() {
        let identity = Arc::new(CountingIdentity {
            cleanups: AtomicUsize::new(0),
            current: watch::channel(None).0,
        });
        let job = SessionCleanupJob::new(identity.clone(), Duration::from_millis(10));
        let cancellation_token = CancellationToken::new();
        let task = tokio::spawn({
            let token = cancellation_token.clone();
            async move { job.run(token).await }
        });

        tokio::time::timeout(Duration::from_secs(5), async {
            while identity.cleanups.load(Ordering::SeqCst) < 3 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("cleanup never ran repeatedly");

        cancellation_token.cancel();
        tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .expect("job did not stop")
            .unwrap();
    }
}
