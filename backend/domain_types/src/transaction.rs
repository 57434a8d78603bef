use std::{borrow::Cow, fmt};

use common_utils::{consts, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::routes::Route;

/// Gateway-assigned transaction identifier. Never blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TxnId(String);

impl TxnId {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ValidationError::MissingRequiredField {
                field_name: "txn_id",
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// `None` for absent or blank input.
    pub fn from_optional(raw: Option<&str>) -> Option<Self> {
        raw.and_then(|value| Self::new(value).ok())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TxnId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Endpoint family a gateway callback arrived on. Advisory only: the real
/// outcome is always re-verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum CallbackChannel {
    Success,
    Failure,
}

impl CallbackChannel {
    /// Page to land on when the callback carried no transaction id.
    pub fn fallback_route(self) -> Route {
        match self {
            Self::Success => Route::Success,
            Self::Failure => Route::Failure,
        }
    }

    /// Page to land on when the callback payload could not be read at all.
    pub fn unreadable_payload_route(self) -> Route {
        match self {
            Self::Success => Route::Pending,
            Self::Failure => Route::Failure,
        }
    }
}

/// A single gateway notification, as far as the redirect step cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionCallback {
    pub channel: CallbackChannel,
    pub txn_id: Option<TxnId>,
    /// Status the gateway claims. Logged, never trusted.
    pub gateway_status: Option<String>,
    /// PayU's own payment id (`mihpayid`).
    pub gateway_payment_id: Option<String>,
}

impl TransactionCallback {
    /// Builds a callback from decoded form or query pairs. The first
    /// occurrence of a field wins; unknown fields are ignored.
    pub fn from_fields<'a, I>(channel: CallbackChannel, fields: I) -> Self
    where
        I: IntoIterator<Item = (Cow<'a, str>, Cow<'a, str>)>,
    {
        let mut callback = Self {
            channel,
            txn_id: None,
            gateway_status: None,
            gateway_payment_id: None,
        };
        let mut seen_txn_id = false;

        for (key, value) in fields {
            match key.as_ref() {
                consts::PAYU_TXN_ID_FIELD if !seen_txn_id => {
                    seen_txn_id = true;
                    callback.txn_id = TxnId::from_optional(Some(value.as_ref()));
                }
                "status" if callback.gateway_status.is_none() => {
                    callback.gateway_status = Some(value.into_owned());
                }
                "mihpayid" if callback.gateway_payment_id.is_none() => {
                    callback.gateway_payment_id = Some(value.into_owned());
                }
                _ => {}
            }
        }

        callback
    }

    /// Where the browser goes next. The channel never decides the outcome
    /// when an id is present.
    pub fn redirect_route(&self) -> Route {
        match &self.txn_id {
            Some(txn_id) => Route::Verify(txn_id.clone()),
            None => self.channel.fallback_route(),
        }
    }
}

/// Ids sent to the verification authority, a single id or a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TxnIdSelector {
    Single(TxnId),
    Batch(Vec<TxnId>),
}

/// Body of `POST <verify endpoint>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationRequest {
    txn_id: TxnIdSelector,
}

impl VerificationRequest {
    pub fn single(txn_id: TxnId) -> Self {
        Self {
            txn_id: TxnIdSelector::Single(txn_id),
        }
    }

    pub fn batch(txn_ids: Vec<TxnId>) -> Result<Self, ValidationError> {
        if txn_ids.is_empty() {
            return Err(ValidationError::InvalidValue {
                message: "at least one transaction id is required".to_string(),
            });
        }
        Ok(Self {
            txn_id: TxnIdSelector::Batch(txn_ids),
        })
    }

    pub fn selector(&self) -> &TxnIdSelector {
        &self.txn_id
    }

    pub fn txn_ids(&self) -> Vec<&TxnId> {
        match &self.txn_id {
            TxnIdSelector::Single(txn_id) => vec![txn_id],
            TxnIdSelector::Batch(txn_ids) => txn_ids.iter().collect(),
        }
    }
}

/// Closed set of verification verdicts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display, strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum VerificationStatus {
    Success,
    Failed,
    Pending,
}

impl VerificationStatus {
    /// Case-insensitive, whitespace tolerant. Everything unrecognised is
    /// `Pending`; unknown states are never success or failure.
    pub fn normalize(raw: Option<&str>) -> Self {
        match raw.map(|value| value.trim().to_lowercase()).as_deref() {
            Some("success") => Self::Success,
            Some("failed") => Self::Failed,
            _ => Self::Pending,
        }
    }
}

/// Raw answer of the verification authority. Every field is optional and
/// loosely typed on purpose; [`VerificationResult`] is the normalized form.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VerificationResponse {
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default, rename = "transactionId")]
    pub transaction_id: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    pub status: VerificationStatus,
    pub message: Option<String>,
    pub transaction_id: Option<String>,
}

impl VerificationResult {
    pub fn pending() -> Self {
        Self {
            status: VerificationStatus::Pending,
            message: None,
            transaction_id: None,
        }
    }
}

impl From<VerificationResponse> for VerificationResult {
    fn from(response: VerificationResponse) -> Self {
        Self {
            status: VerificationStatus::normalize(response.status.as_ref().and_then(Value::as_str)),
            message: response
                .message
                .as_ref()
                .and_then(Value::as_str)
                .map(str::to_owned),
            transaction_id: response
                .transaction_id
                .as_ref()
                .and_then(Value::as_str)
                .map(str::to_owned),
        }
    }
}

/// What the verification screen shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum UiStatusState {
    #[default]
    Verifying,
    Success,
    Failed,
    Error,
}

impl UiStatusState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Verifying)
    }
}

impl From<VerificationStatus> for UiStatusState {
    fn from(status: VerificationStatus) -> Self {
        match status {
            VerificationStatus::Success => Self::Success,
            VerificationStatus::Failed => Self::Failed,
            VerificationStatus::Pending => Self::Verifying,
        }
    }
}
