//! Status pages rendered from a [`ScreenSnapshot`] or a terminal route.
//!
//! Pages are pure values. Rendering never triggers verification and keeps
//! nothing between mounts.

use domain_types::{Route, TxnId, UiStatusState, VerificationStatus};

use crate::orchestrator::ScreenSnapshot;

pub const TRANSACTIONS_PATH: &str = "/transactions";
pub const HOME_PATH: &str = "/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Tone {
    InProgress,
    Positive,
    Negative,
    Attention,
}

/// Links offered on a page so that no outcome is a dead end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageAction {
    ViewTransactions,
    VerifyAgain(TxnId),
    ReturnHome,
}

impl PageAction {
    pub fn label(&self) -> &'static str {
        match self {
            Self::ViewTransactions => "View transactions",
            Self::VerifyAgain(_) => "Verify again",
            Self::ReturnHome => "Return home",
        }
    }

    pub fn href(&self) -> String {
        match self {
            Self::ViewTransactions => TRANSACTIONS_PATH.to_string(),
            Self::VerifyAgain(txn_id) => Route::Verify(txn_id.clone()).path(),
            Self::ReturnHome => HOME_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusPage {
    pub heading: &'static str,
    pub message: String,
    pub tone: Tone,
    pub actions: Vec<PageAction>,
}

impl StatusPage {
    /// Page for the verification screen in its current state.
    pub fn from_snapshot(snapshot: &ScreenSnapshot) -> Self {
        match snapshot.state {
            UiStatusState::Verifying => {
                let message = if snapshot.status == Some(VerificationStatus::Pending) {
                    "Your payment is still being processed. It can take a few minutes \
                     for the bank to confirm it."
                } else {
                    "Verifying your payment. Please do not close or refresh this page."
                };
                Self {
                    heading: "Verifying payment",
                    message: message.to_string(),
                    tone: Tone::InProgress,
                    actions: match snapshot.status {
                        Some(_) => vec![PageAction::ViewTransactions],
                        None => Vec::new(),
                    },
                }
            }
            UiStatusState::Success => Self {
                heading: "Payment successful",
                message: "Your payment has been confirmed. Redirecting...".to_string(),
                tone: Tone::Positive,
                actions: Vec::new(),
            },
            UiStatusState::Failed => Self {
                heading: "Payment failed",
                message: "Your payment could not be completed. Redirecting...".to_string(),
                tone: Tone::Negative,
                actions: Vec::new(),
            },
            UiStatusState::Error => Self {
                heading: "Could not verify payment",
                message: snapshot
                    .message
                    .clone()
                    .unwrap_or_else(|| "The verification service is unavailable.".to_string()),
                tone: Tone::Attention,
                actions: snapshot
                    .txn_id
                    .clone()
                    .map(PageAction::VerifyAgain)
                    .into_iter()
                    .chain([PageAction::ViewTransactions])
                    .collect(),
            },
        }
    }

    /// Static page for a terminal route; `None` for the verification route,
    /// which is rendered from the live snapshot instead.
    pub fn for_route(route: &Route) -> Option<Self> {
        let page = match route {
            Route::Verify(_) => return None,
            Route::Success => Self {
                heading: "Payment successful",
                message: "Your registration is confirmed. A receipt has been sent to your email."
                    .to_string(),
                tone: Tone::Positive,
                actions: vec![PageAction::ViewTransactions, PageAction::ReturnHome],
            },
            Route::Failure => Self {
                heading: "Payment failed",
                message: "The payment did not go through. No amount was captured; \
                          you can try again from your transactions."
                    .to_string(),
                tone: Tone::Negative,
                actions: vec![PageAction::ViewTransactions, PageAction::ReturnHome],
            },
            Route::Pending => Self {
                heading: "Payment pending",
                message: "We could not confirm your payment yet. Check Transactions after \
                          about ten minutes and verify it again from there."
                    .to_string(),
                tone: Tone::Attention,
                actions: vec![PageAction::ViewTransactions, PageAction::ReturnHome],
            },
        };
        Some(page)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use domain_types::{Route, TxnId, UiStatusState, VerificationStatus};

    use super::{PageAction, StatusPage, Tone};
    use crate::orchestrator::ScreenSnapshot;

    fn snapshot(state: UiStatusState) -> ScreenSnapshot {
        ScreenSnapshot {
            txn_id: Some(TxnId::new("TXN 1").unwrap()),
            state,
            status: None,
            message: None,
        }
    }

    #[test]
    fn error_page_shows_the_failure_message_and_offers_a_retry() {
        let page = StatusPage::from_snapshot(&ScreenSnapshot {
            message: Some("Verification backend down".to_string()),
            ..snapshot(UiStatusState::Error)
        });

        assert_eq!(page.tone, Tone::Attention);
        assert_eq!(page.message, "Verification backend down");
        assert_eq!(
            page.actions.first().map(PageAction::href).as_deref(),
            Some("/transactions/verify/TXN%201")
        );
    }

    #[test]
    fn pending_answer_keeps_verifying_with_a_way_out() {
        let page = StatusPage::from_snapshot(&ScreenSnapshot {
            status: Some(VerificationStatus::Pending),
            ..snapshot(UiStatusState::Verifying)
        });

        assert_eq!(page.tone, Tone::InProgress);
        assert_eq!(page.actions, vec![PageAction::ViewTransactions]);
        assert!(StatusPage::from_snapshot(&snapshot(UiStatusState::Verifying))
            .actions
            .is_empty());
    }

    #[test]
    fn terminal_routes_are_never_dead_ends() {
        for route in [Route::Success, Route::Failure, Route::Pending] {
            let page = StatusPage::for_route(&route).unwrap();
            assert!(page.actions.contains(&PageAction::ViewTransactions));
        }
        let pending = StatusPage::for_route(&Route::Pending).unwrap();
        assert!(pending.message.contains("ten minutes"));

        let verify = Route::Verify(TxnId::new("T").unwrap());
        assert_eq!(StatusPage::for_route(&verify), None);
    }
}
