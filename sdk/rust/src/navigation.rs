use std::time::Duration;

use common_utils::consts;
use domain_types::{Route, UiStatusState};
use tokio::sync::mpsc;

/// Moves the host application to another client route.
pub trait Navigator: Send + Sync + 'static {
    fn navigate(&self, route: Route);
}

impl Navigator for mpsc::UnboundedSender<Route> {
    fn navigate(&self, route: Route) {
        if self.send(route).is_err() {
            tracing::debug!("navigation receiver dropped");
        }
    }
}

/// How long a terminal state stays on screen before navigating away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationDelays {
    /// After a `success` or `failed` verdict
    pub terminal: Duration,
    /// After the verification call itself failed
    pub error: Duration,
}

impl Default for NavigationDelays {
    fn default() -> Self {
        Self {
            terminal: Duration::from_millis(consts::TERMINAL_NAVIGATION_DELAY_MS),
            error: Duration::from_millis(consts::ERROR_NAVIGATION_DELAY_MS),
        }
    }
}

impl NavigationDelays {
    /// Delayed navigation that follows `state`, if any.
    pub fn after(&self, state: UiStatusState) -> Option<(Duration, Route)> {
        match state {
            UiStatusState::Success => Some((self.terminal, Route::Success)),
            UiStatusState::Failed => Some((self.terminal, Route::Failure)),
            UiStatusState::Error => Some((self.error, Route::Pending)),
            UiStatusState::Verifying => None,
        }
    }
}
