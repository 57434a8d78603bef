pub mod app;
pub mod configs;
pub mod error;
pub mod http;
pub mod logger;
pub mod metrics;
pub mod utils;

#[macro_export]
macro_rules! service_name {
    () => {
        env!("CARGO_PKG_NAME")
    };
}
