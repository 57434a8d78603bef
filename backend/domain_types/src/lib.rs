pub mod auth;
pub mod errors;
pub mod routes;
pub mod transaction;

pub use routes::Route;
pub use transaction::{
    CallbackChannel, TransactionCallback, TxnId, UiStatusState, VerificationRequest,
    VerificationResponse, VerificationResult, VerificationStatus,
};
