use common_utils::CustomResult;
use domain_types::{
    auth::BearerToken,
    errors::ApiClientError,
    transaction::{VerificationRequest, VerificationResult},
};

/// The backend that holds the ground-truth status of a transaction.
///
/// Implementations return an already normalized [`VerificationResult`]; a
/// status outside the closed set must come back as `Pending`, never as an
/// error. Errors are reserved for the call itself failing.
#[async_trait::async_trait]
pub trait VerificationAuthority: Send + Sync {
    async fn verify(
        &self,
        request: &VerificationRequest,
        auth: Option<&BearerToken>,
    ) -> CustomResult<VerificationResult, ApiClientError>;
}

#[async_trait::async_trait]
impl<T> VerificationAuthority for std::sync::Arc<T>
where
    T: VerificationAuthority + ?Sized,
{
    async fn verify(
        &self,
        request: &VerificationRequest,
        auth: Option<&BearerToken>,
    ) -> CustomResult<VerificationResult, ApiClientError> {
        (**self).verify(request, auth).await
    }
}
