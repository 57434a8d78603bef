use std::{sync::Arc, time::Duration};

use common_utils::{consts, CustomResult};
use domain_types::{
    errors::{ApiClientError, VerificationError},
    TxnId, VerificationRequest, VerificationResult,
};
use error_stack::{report, Report, ResultExt};
use external_services::{HttpOptions, HttpVerificationAuthority};
use interfaces::verification::VerificationAuthority;

use crate::session::SessionContext;

/// Single-shot verification calls on behalf of the current session.
#[derive(Clone)]
pub struct Verifier {
    authority: Arc<dyn VerificationAuthority>,
    session: SessionContext,
    hydration_timeout: Duration,
}

impl std::fmt::Debug for Verifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Verifier")
            .field("session", &self.session)
            .field("hydration_timeout", &self.hydration_timeout)
            .finish_non_exhaustive()
    }
}

impl Verifier {
    pub fn new(authority: Arc<dyn VerificationAuthority>, session: SessionContext) -> Self {
        Self {
            authority,
            session,
            hydration_timeout: Duration::from_millis(consts::VERIFICATION_TIMEOUT_MS),
        }
    }

    /// Upper bound on waiting for the session before a call is given up.
    pub fn with_hydration_timeout(mut self, hydration_timeout: Duration) -> Self {
        self.hydration_timeout = hydration_timeout;
        self
    }

    /// Verifier backed by the HTTP verification endpoint.
    pub fn over_http(
        endpoint: &str,
        options: HttpOptions,
        session: SessionContext,
    ) -> CustomResult<Self, ApiClientError> {
        let authority = HttpVerificationAuthority::new(endpoint, options)?;
        Ok(Self::new(Arc::new(authority), session))
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Asks the verification authority for the status of one transaction.
    /// Blank ids are rejected before any request is made.
    pub async fn verify(&self, txn_id: &str) -> CustomResult<VerificationResult, VerificationError> {
        let txn_id = TxnId::new(txn_id).change_context(VerificationError::MissingTransactionId)?;
        self.send(VerificationRequest::single(txn_id)).await
    }

    /// Re-verifies several pending transactions with a single batch request.
    pub async fn verify_pending<I, S>(
        &self,
        txn_ids: I,
    ) -> CustomResult<VerificationResult, VerificationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let txn_ids = txn_ids
            .into_iter()
            .map(TxnId::new)
            .collect::<Result<Vec<_>, _>>()
            .change_context(VerificationError::InvalidRequest(
                "transaction ids must not be blank".to_string(),
            ))?;
        let request = VerificationRequest::batch(txn_ids).change_context(
            VerificationError::InvalidRequest("no transactions to verify".to_string()),
        )?;
        self.send(request).await
    }

    async fn send(
        &self,
        request: VerificationRequest,
    ) -> CustomResult<VerificationResult, VerificationError> {
        let session = tokio::time::timeout(self.hydration_timeout, self.session.ready())
            .await
            .map_err(|_| {
                tracing::warn!(
                    timeout_ms = self.hydration_timeout.as_millis(),
                    "session not hydrated, verification not sent"
                );
                report!(VerificationError::TransportFailure)
                    .attach_printable("session was not hydrated in time")
            })?;
        let token = session.as_ref().and_then(|session| session.token.as_ref());

        self.authority
            .verify(&request, token)
            .await
            .change_context(VerificationError::TransportFailure)
    }
}

/// Notification text for a failed verification: the backend's own message
/// when its error answer carried one, otherwise the failure description.
pub fn failure_message(report: &Report<VerificationError>) -> String {
    report
        .downcast_ref::<ApiClientError>()
        .map(ApiClientError::user_message)
        .unwrap_or_else(|| report.current_context().to_string())
}
