//! Client side of the payment callback flow.
//!
//! After the callback service redirects the browser to
//! `/transactions/verify/{txn_id}`, a [`VerificationScreen`] asks the
//! verification authority for the real status, publishes a
//! [`ScreenSnapshot`] and navigates away once a terminal state was shown
//! long enough.

pub mod navigation;
pub mod notification;
pub mod orchestrator;
pub mod presentation;
pub mod session;
pub mod verifier;

pub use navigation::{NavigationDelays, Navigator};
pub use notification::{LogNotifier, Notification, Notifier};
pub use orchestrator::{ScreenSnapshot, VerificationScreen};
pub use presentation::{PageAction, StatusPage};
pub use session::{Session, SessionContext};
pub use verifier::Verifier;

// Types hosts need alongside the screen.
pub use domain_types::{Route, UiStatusState, VerificationResult, VerificationStatus};
pub use external_services::HttpOptions;
