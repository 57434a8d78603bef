//! Common utilities for the festpay workspace

pub mod consts;
pub mod errors;

pub use errors::{CustomResult, ValidationError};
