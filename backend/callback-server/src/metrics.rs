#![allow(clippy::expect_used)]

use domain_types::CallbackChannel;
use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, IntCounterVec};

lazy_static! {
    /// Gateway callbacks answered, by channel and by which redirect rule applied
    pub static ref CALLBACK_REDIRECTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "CALLBACK_REDIRECTS_TOTAL",
        "Total number of gateway callbacks redirected",
        &["channel", "outcome"]
    )
    .expect("Failed to register CALLBACK_REDIRECTS_TOTAL");
}

/// Which redirect rule a callback ended up on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum RedirectOutcome {
    Verify,
    MissingTxnId,
    UnreadablePayload,
}

pub fn record_redirect(channel: CallbackChannel, outcome: RedirectOutcome) {
    CALLBACK_REDIRECTS_TOTAL
        .with_label_values(&[channel.as_ref(), outcome.as_ref()])
        .inc();
}
