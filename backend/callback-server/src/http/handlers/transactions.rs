//! PayU callback receiver.
//!
//! The receiver only extracts `txnid` and answers with a 303. The channel a
//! callback arrived on is never taken as the outcome: with an id the browser
//! always goes to the verification screen, which asks the verification
//! authority for the real status. Every path ends in a redirect, including
//! unreadable payloads, so the gateway never sees an error status.

use std::borrow::Cow;

use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, RawQuery, Request, State},
    http::{header, HeaderMap},
    response::Redirect,
};
use domain_types::{CallbackChannel, TransactionCallback};

use crate::{
    http::{error::CallbackPayloadError, state::AppState},
    metrics::{self, RedirectOutcome},
};

pub async fn success_callback(State(state): State<AppState>, request: Request) -> Redirect {
    let payload = read_posted_callback(CallbackChannel::Success, request).await;
    respond(&state, CallbackChannel::Success, payload)
}

pub async fn success_redirect(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Redirect {
    let payload = Ok(read_query_callback(CallbackChannel::Success, query));
    respond(&state, CallbackChannel::Success, payload)
}

pub async fn failure_callback(State(state): State<AppState>, request: Request) -> Redirect {
    let payload = read_posted_callback(CallbackChannel::Failure, request).await;
    respond(&state, CallbackChannel::Failure, payload)
}

pub async fn failure_redirect(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Redirect {
    let payload = Ok(read_query_callback(CallbackChannel::Failure, query));
    respond(&state, CallbackChannel::Failure, payload)
}

fn respond(
    state: &AppState,
    channel: CallbackChannel,
    payload: Result<TransactionCallback, CallbackPayloadError>,
) -> Redirect {
    let (route, outcome) = match payload {
        Ok(callback) => {
            tracing::info!(
                %channel,
                txn_id = callback.txn_id.as_ref().map(|txn_id| txn_id.as_str()),
                gateway_status = callback.gateway_status.as_deref(),
                gateway_payment_id = callback.gateway_payment_id.as_deref(),
                "gateway callback received"
            );
            let outcome = if callback.txn_id.is_some() {
                RedirectOutcome::Verify
            } else {
                RedirectOutcome::MissingTxnId
            };
            (callback.redirect_route(), outcome)
        }
        Err(error) => {
            tracing::warn!(%channel, %error, "unreadable gateway callback");
            (channel.unreadable_payload_route(), RedirectOutcome::UnreadablePayload)
        }
    };

    metrics::record_redirect(channel, outcome);
    let location = state.redirects.location(&route);
    tracing::debug!(%channel, %outcome, %location, "redirecting gateway callback");
    Redirect::to(&location)
}

fn read_query_callback(channel: CallbackChannel, query: Option<String>) -> TransactionCallback {
    let query = query.unwrap_or_default();
    TransactionCallback::from_fields(channel, url::form_urlencoded::parse(query.as_bytes()))
}

async fn read_posted_callback(
    channel: CallbackChannel,
    request: Request,
) -> Result<TransactionCallback, CallbackPayloadError> {
    if is_multipart(request.headers()) {
        let mut multipart = Multipart::from_request(request, &())
            .await
            .map_err(|rejection| CallbackPayloadError::Multipart(rejection.body_text()))?;

        let mut fields = Vec::new();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|error| CallbackPayloadError::Multipart(error.body_text()))?
        {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };
            if field.file_name().is_some() {
                continue;
            }
            let value = field
                .text()
                .await
                .map_err(|error| CallbackPayloadError::Multipart(error.body_text()))?;
            fields.push((Cow::Owned(name), Cow::Owned(value)));
        }

        Ok(TransactionCallback::from_fields(channel, fields))
    } else {
        // PayU posts url-encoded forms; a missing content type is read the same way
        let body = Bytes::from_request(request, &())
            .await
            .map_err(|rejection| CallbackPayloadError::Body(rejection.body_text()))?;
        Ok(TransactionCallback::from_fields(
            channel,
            url::form_urlencoded::parse(&body),
        ))
    }
}

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|content_type| {
            content_type
                .trim_start()
                .to_ascii_lowercase()
                .starts_with("multipart/form-data")
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use axum::http::{header, HeaderMap, HeaderValue};

    use super::is_multipart;

    #[test]
    fn multipart_detection_ignores_case_and_parameters() {
        let mut headers = HeaderMap::new();
        assert!(!is_multipart(&headers));

        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("Multipart/Form-Data; boundary=xyz"),
        );
        assert!(is_multipart(&headers));

        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        assert!(!is_multipart(&headers));
    }
}
