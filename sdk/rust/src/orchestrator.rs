//! Verification screen host.
//!
//! A [`VerificationScreen`] is mounted on `/transactions/verify/{txn_id}`. It
//! runs at most one verification per transaction id: the attempt is a single
//! spawned task that performs the call, publishes the resulting
//! [`ScreenSnapshot`] and then waits out the navigation delay. Changing the
//! id, unmounting or dropping the screen aborts that task, so neither a late
//! state update nor a scheduled navigation survives the screen.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use domain_types::{TxnId, UiStatusState, VerificationStatus};
use tokio::{sync::watch, task::JoinHandle};

use crate::{
    navigation::{NavigationDelays, Navigator},
    notification::Notifier,
    verifier::{failure_message, Verifier},
};

/// Everything a status view needs to render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenSnapshot {
    pub txn_id: Option<TxnId>,
    pub state: UiStatusState,
    /// Last normalized status, once the backend answered
    pub status: Option<VerificationStatus>,
    /// Set on the error path only
    pub message: Option<String>,
}

impl ScreenSnapshot {
    fn verifying(txn_id: TxnId) -> Self {
        Self {
            txn_id: Some(txn_id),
            ..Self::default()
        }
    }
}

pub struct VerificationScreen {
    verifier: Verifier,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    delays: NavigationDelays,
    snapshot: Arc<watch::Sender<ScreenSnapshot>>,
    generation: Arc<AtomicU64>,
    attempt: Option<Attempt>,
}

struct Attempt {
    txn_id: TxnId,
    task: JoinHandle<()>,
}

impl VerificationScreen {
    pub fn new(
        verifier: Verifier,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (snapshot, _) = watch::channel(ScreenSnapshot::default());
        Self {
            verifier,
            navigator,
            notifier,
            delays: NavigationDelays::default(),
            snapshot: Arc::new(snapshot),
            generation: Arc::new(AtomicU64::new(0)),
            attempt: None,
        }
    }

    pub fn with_delays(mut self, delays: NavigationDelays) -> Self {
        self.delays = delays;
        self
    }

    /// Applies the route parameter. Starts a verification when the id is new;
    /// the same id again is a no-op and a missing or blank id is ignored.
    ///
    /// # Panics
    ///
    /// Must be called from within a tokio runtime.
    pub fn on_params(&mut self, txn_id: Option<&str>) {
        let Some(txn_id) = TxnId::from_optional(txn_id) else {
            tracing::debug!("verification screen without a transaction id");
            return;
        };
        if self
            .attempt
            .as_ref()
            .is_some_and(|attempt| attempt.txn_id == txn_id)
        {
            return;
        }

        self.cancel();
        let generation = self.generation.load(Ordering::SeqCst);
        self.snapshot
            .send_replace(ScreenSnapshot::verifying(txn_id.clone()));

        let context = AttemptContext {
            generation,
            current: self.generation.clone(),
            snapshot: self.snapshot.clone(),
            verifier: self.verifier.clone(),
            navigator: self.navigator.clone(),
            notifier: self.notifier.clone(),
            delays: self.delays,
        };
        tracing::info!(txn_id = %txn_id, "starting transaction verification");
        let task = tokio::spawn(context.run(txn_id.clone()));
        self.attempt = Some(Attempt { txn_id, task });
    }

    /// Tears the screen down: the running verification and any scheduled
    /// navigation are cancelled.
    pub fn unmount(&mut self) {
        self.cancel();
    }

    pub fn snapshot(&self) -> ScreenSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ScreenSnapshot> {
        self.snapshot.subscribe()
    }

    pub fn txn_id(&self) -> Option<&TxnId> {
        self.attempt.as_ref().map(|attempt| &attempt.txn_id)
    }

    fn cancel(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(attempt) = self.attempt.take() {
            attempt.task.abort();
            tracing::debug!(txn_id = %attempt.txn_id, "verification attempt cancelled");
        }
    }
}

impl Drop for VerificationScreen {
    fn drop(&mut self) {
        self.cancel();
    }
}

struct AttemptContext {
    generation: u64,
    current: Arc<AtomicU64>,
    snapshot: Arc<watch::Sender<ScreenSnapshot>>,
    verifier: Verifier,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    delays: NavigationDelays,
}

impl AttemptContext {
    async fn run(self, txn_id: TxnId) {
        let next = match self.verifier.verify(txn_id.as_str()).await {
            Ok(result) => {
                tracing::info!(
                    txn_id = %txn_id,
                    status = %result.status,
                    "transaction verified"
                );
                ScreenSnapshot {
                    txn_id: Some(txn_id),
                    state: UiStatusState::from(result.status),
                    status: Some(result.status),
                    message: None,
                }
            }
            Err(report) => {
                tracing::warn!(txn_id = %txn_id, error = ?report, "transaction verification failed");
                ScreenSnapshot {
                    txn_id: Some(txn_id),
                    state: UiStatusState::Error,
                    status: None,
                    message: Some(failure_message(&report)),
                }
            }
        };

        let state = next.state;
        let message = next.message.clone();
        if !self.publish(next) {
            return;
        }
        if let Some(message) = message {
            self.notifier.error(&message);
        }

        let Some((delay, route)) = self.delays.after(state) else {
            return;
        };
        tokio::time::sleep(delay).await;
        if self.is_current() {
            tracing::debug!(route = %route.path(), "navigating after verification");
            self.navigator.navigate(route);
        }
    }

    fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.generation
    }

    /// Publishes `next` unless the attempt was superseded or its state is
    /// already terminal.
    fn publish(&self, next: ScreenSnapshot) -> bool {
        self.snapshot.send_if_modified(|current| {
            if !self.is_current() || current.state.is_terminal() {
                return false;
            }
            *current = next;
            true
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use common_utils::CustomResult;
    use domain_types::{
        auth::BearerToken, errors::ApiClientError, Route, TxnId, UiStatusState,
        VerificationRequest, VerificationResult, VerificationStatus,
    };
    use error_stack::Report;
    use interfaces::verification::VerificationAuthority;
    use tokio::sync::{mpsc, watch};

    use super::{AttemptContext, ScreenSnapshot};
    use crate::{
        navigation::NavigationDelays,
        notification::{LogNotifier, Notification},
        session::SessionContext,
        verifier::Verifier,
    };

    struct Unreachable;

    #[async_trait::async_trait]
    impl VerificationAuthority for Unreachable {
        async fn verify(
            &self,
            _request: &VerificationRequest,
            _auth: Option<&BearerToken>,
        ) -> CustomResult<VerificationResult, ApiClientError> {
            Err(Report::new(ApiClientError::ConnectionFailed))
        }
    }

    fn context(
        generation: u64,
        current: u64,
    ) -> (AttemptContext, watch::Receiver<ScreenSnapshot>) {
        let (snapshot, receiver) = watch::channel(ScreenSnapshot::default());
        let (navigator, _) = mpsc::unbounded_channel::<Route>();
        let context = AttemptContext {
            generation,
            current: Arc::new(current.into()),
            snapshot: Arc::new(snapshot),
            verifier: Verifier::new(Arc::new(Unreachable), SessionContext::hydrated(None)),
            navigator: Arc::new(navigator),
            notifier: Arc::new(LogNotifier),
            delays: NavigationDelays::default(),
        };
        (context, receiver)
    }

    fn snapshot(state: UiStatusState) -> ScreenSnapshot {
        ScreenSnapshot {
            txn_id: Some(TxnId::new("T").unwrap()),
            state,
            status: Some(VerificationStatus::Success),
            message: None,
        }
    }

    #[test]
    fn terminal_state_is_sticky() {
        let (context, receiver) = context(1, 1);

        assert!(context.publish(snapshot(UiStatusState::Success)));
        assert!(!context.publish(snapshot(UiStatusState::Error)));
        assert_eq!(receiver.borrow().state, UiStatusState::Success);
    }

    #[test]
    fn superseded_attempt_cannot_publish() {
        let (context, receiver) = context(1, 2);

        assert!(!context.publish(snapshot(UiStatusState::Failed)));
        assert_eq!(receiver.borrow().state, UiStatusState::Verifying);
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_attempt_neither_notifies_nor_navigates() {
        let (mut context, _receiver) = context(1, 2);
        let (navigator, mut routes) = mpsc::unbounded_channel::<Route>();
        let (notifier, mut notifications) = mpsc::unbounded_channel::<Notification>();
        context.navigator = Arc::new(navigator);
        context.notifier = Arc::new(notifier);

        context.run(TxnId::new("T").unwrap()).await;
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert!(notifications.try_recv().is_err());
        assert!(routes.try_recv().is_err());
    }
}
