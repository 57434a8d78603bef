use std::time::{Duration, Instant};

use common_utils::{consts, CustomResult};
use domain_types::{
    auth::BearerToken,
    errors::ApiClientError,
    transaction::{VerificationRequest, VerificationResponse, VerificationResult},
};
use error_stack::{report, ResultExt};
use interfaces::verification::VerificationAuthority;
use serde_json::Value;
use url::Url;

use crate::shared_metrics as metrics;

const VERIFY_ENDPOINT_LABEL: &str = "transactions_verify";
const POST_METHOD_LABEL: &str = "POST";

#[derive(Debug, Clone)]
pub struct HttpOptions {
    pub total_timeout_ms: u64,
    pub connect_timeout_ms: u64,
    pub keep_alive_timeout_ms: u64,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            total_timeout_ms: consts::VERIFICATION_TIMEOUT_MS,
            connect_timeout_ms: 5_000,
            keep_alive_timeout_ms: 60_000,
        }
    }
}

/// Talks to the verification authority over HTTP.
///
/// The response status is normalized here and nowhere else.
#[derive(Debug, Clone)]
pub struct HttpVerificationAuthority {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpVerificationAuthority {
    pub fn new(endpoint: &str, options: HttpOptions) -> CustomResult<Self, ApiClientError> {
        let endpoint = Url::parse(endpoint)
            .change_context(ApiClientError::InvalidUrl(endpoint.to_string()))?;

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(options.connect_timeout_ms))
            .timeout(Duration::from_millis(options.total_timeout_ms))
            .pool_idle_timeout(Duration::from_millis(options.keep_alive_timeout_ms))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .change_context(ApiClientError::ClientConstructionFailed)?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn send(
        &self,
        request: &VerificationRequest,
        auth: Option<&BearerToken>,
    ) -> CustomResult<(reqwest::StatusCode, Vec<u8>), ApiClientError> {
        let mut builder = self.client.post(self.endpoint.clone()).json(request);
        if let Some(token) = auth {
            builder = builder.header(reqwest::header::AUTHORIZATION, token.header_value());
        }

        let response = builder.send().await.map_err(|error| {
            report!(classify_transport_error(&error)).attach_printable(error.to_string())
        })?;

        let status_code = response.status();
        let body = response.bytes().await.map_err(|error| {
            let context = if error.is_timeout() {
                ApiClientError::RequestTimeoutReceived
            } else {
                ApiClientError::ResponseReadFailed
            };
            report!(context).attach_printable(error.to_string())
        })?;

        Ok((status_code, body.to_vec()))
    }
}

#[async_trait::async_trait]
impl VerificationAuthority for HttpVerificationAuthority {
    #[tracing::instrument(skip_all, fields(txn_ids = request.txn_ids().len()))]
    async fn verify(
        &self,
        request: &VerificationRequest,
        auth: Option<&BearerToken>,
    ) -> CustomResult<VerificationResult, ApiClientError> {
        let start_time = Instant::now();
        metrics::EXTERNAL_SERVICE_TOTAL_API_CALLS
            .with_label_values(&[VERIFY_ENDPOINT_LABEL, POST_METHOD_LABEL])
            .inc();

        let outcome = self.send(request, auth).await;

        metrics::EXTERNAL_SERVICE_API_CALLS_LATENCY
            .with_label_values(&[VERIFY_ENDPOINT_LABEL, POST_METHOD_LABEL])
            .observe(start_time.elapsed().as_secs_f64());

        let (status_code, body) = outcome.inspect_err(|report| {
            record_error(report.current_context());
            tracing::error!(error = ?report, "verification call failed");
        })?;

        if !status_code.is_success() {
            let context = ApiClientError::UnexpectedStatus {
                status_code: status_code.as_u16(),
                message: error_message_from_body(&body),
            };
            record_error(&context);
            tracing::error!(status_code = status_code.as_u16(), "verification service rejected the request");
            return Err(report!(context));
        }

        let result = match serde_json::from_slice::<VerificationResponse>(&body) {
            Ok(response) => VerificationResult::from(response),
            Err(error) => {
                tracing::warn!(?error, "unreadable verification body, treating as pending");
                VerificationResult::pending()
            }
        };

        tracing::info!(status = %result.status, "transaction verification answered");
        Ok(result)
    }
}

fn classify_transport_error(error: &reqwest::Error) -> ApiClientError {
    if error.is_timeout() {
        ApiClientError::RequestTimeoutReceived
    } else if error.is_builder() || error.is_body() {
        ApiClientError::RequestEncodingFailed
    } else {
        ApiClientError::ConnectionFailed
    }
}

fn error_message_from_body(body: &[u8]) -> Option<String> {
    let response = serde_json::from_slice::<VerificationResponse>(body).ok()?;
    response
        .message
        .as_ref()
        .and_then(Value::as_str)
        .map(str::to_owned)
}

fn record_error(error: &ApiClientError) {
    let label = match error {
        ApiClientError::ClientConstructionFailed => "client_construction",
        ApiClientError::RequestEncodingFailed => "request_encoding",
        ApiClientError::InvalidUrl(_) => "invalid_url",
        ApiClientError::RequestTimeoutReceived => "timeout",
        ApiClientError::ConnectionFailed => "connection",
        ApiClientError::UnexpectedStatus { .. } => "unexpected_status",
        ApiClientError::ResponseReadFailed => "response_read",
    };
    metrics::EXTERNAL_SERVICE_API_CALLS_ERRORS
        .with_label_values(&[VERIFY_ENDPOINT_LABEL, POST_METHOD_LABEL, label])
        .inc();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_is_read_from_json_bodies_only() {
        assert_eq!(
            error_message_from_body(br#"{"message":"Transaction not found"}"#).as_deref(),
            Some("Transaction not found")
        );
        assert_eq!(error_message_from_body(b"<html>502</html>"), None);
        assert_eq!(error_message_from_body(br#"{"message":42}"#), None);
    }

    #[test]
    fn invalid_endpoint_is_rejected() {
        let result = HttpVerificationAuthority::new("not a url", HttpOptions::default());
        assert!(matches!(
            result.as_ref().map_err(|report| report.current_context()),
            Err(ApiClientError::InvalidUrl(_))
        ));
    }
}
