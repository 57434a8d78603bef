//! Signed-in user context shared by everything that talks to the backend.
//!
//! A [`SessionContext`] starts out unhydrated. Until the host calls
//! [`SessionContext::hydrate`] it is unknown whether a user is signed in, so
//! identity-dependent calls wait on [`SessionContext::ready`].

use std::sync::Arc;

use domain_types::auth::BearerToken;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub email: Option<String>,
    pub token: Option<BearerToken>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hydration {
    Pending,
    Ready(Option<Session>),
}

/// Clone-able handle; all clones observe the same session.
#[derive(Debug, Clone)]
pub struct SessionContext {
    state: Arc<watch::Sender<Hydration>>,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionContext {
    pub fn new() -> Self {
        let (state, _) = watch::channel(Hydration::Pending);
        Self {
            state: Arc::new(state),
        }
    }

    /// Context that is already known, signed in or not.
    pub fn hydrated(session: Option<Session>) -> Self {
        let context = Self::new();
        context.hydrate(session);
        context
    }

    pub fn hydrate(&self, session: Option<Session>) {
        tracing::debug!(signed_in = session.is_some(), "session hydrated");
        self.state.send_replace(Hydration::Ready(session));
    }

    /// Signs the user out. The context stays hydrated.
    pub fn clear(&self) {
        self.hydrate(None);
    }

    pub fn is_hydrated(&self) -> bool {
        matches!(*self.state.borrow(), Hydration::Ready(_))
    }

    /// Current session without waiting; `None` while unhydrated.
    pub fn current(&self) -> Option<Session> {
        match &*self.state.borrow() {
            Hydration::Ready(session) => session.clone(),
            Hydration::Pending => None,
        }
    }

    /// Waits until the context is hydrated and returns the session, if any.
    pub async fn ready(&self) -> Option<Session> {
        let mut receiver = self.state.subscribe();
        let session = match receiver
            .wait_for(|hydration| matches!(hydration, Hydration::Ready(_)))
            .await
        {
            Ok(hydration) => match &*hydration {
                Hydration::Ready(session) => session.clone(),
                Hydration::Pending => None,
            },
            // the sender lives as long as `self`
            Err(_) => None,
        };
        session
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::time::Duration;

    use domain_types::auth::BearerToken;

    use super::{Session, SessionContext};

    fn session() -> Session {
        Session {
            user_id: "u-1".to_string(),
            email: Some("guest@fest.example.org".to_string()),
            token: Some(BearerToken::new("secret-token")),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn ready_waits_for_hydration() {
        let context = SessionContext::new();
        assert!(!context.is_hydrated());

        let waiter = tokio::spawn({
            let context = context.clone();
            async move { context.ready().await }
        });

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(!waiter.is_finished());

        context.hydrate(Some(session()));
        assert_eq!(waiter.await.unwrap(), Some(session()));
    }

    #[tokio::test]
    async fn cleared_context_is_hydrated_without_session() {
        let context = SessionContext::hydrated(Some(session()));
        context.clear();

        assert!(context.is_hydrated());
        assert_eq!(context.ready().await, None);
        assert_eq!(context.current(), None);
    }

    #[test]
    fn debug_output_masks_the_token() {
        let rendered = format!("{:?}", SessionContext::hydrated(Some(session())));
        assert!(!rendered.contains("secret-token"));
    }
}
