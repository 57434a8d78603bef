//!
//! Setup logging subsystem.
//!

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::{self, LevelFilter},
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use super::config;

/// Keeps the non-blocking writers flushing until dropped.
#[derive(Debug)]
pub struct TelemetryGuard {
    _log_guards: Vec<WorkerGuard>,
}

/// Setup logging sub-system specifying.
/// Expects config and list of names of crates to watch.
///
/// `RUST_LOG`, when set, takes precedence over `filtering_directive`.
pub fn setup<'a>(
    conf: &config::Log,
    service_name: &str,
    crates_to_watch: impl IntoIterator<Item = &'a str>,
) -> TelemetryGuard {
    let mut guards = Vec::new();

    let console_layer = if conf.console.enabled {
        let (console_writer, guard) = tracing_appender::non_blocking(std::io::stdout());
        guards.push(guard);

        let level = conf.console.level.into_level();
        let mut console_filter = filter::Targets::new().with_default(tracing::Level::WARN);
        for acrate in crates_to_watch {
            console_filter = console_filter.with_target(acrate, level);
        }

        let layer: Box<dyn Layer<Registry> + Send + Sync> = match conf.console.log_format {
            config::LogFormat::Default => fmt::layer()
                .with_span_events(fmt::format::FmtSpan::CLOSE)
                .pretty()
                .with_writer(console_writer)
                .with_filter(console_filter)
                .boxed(),
            config::LogFormat::Json => fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(false)
                .with_writer(console_writer)
                .with_filter(console_filter)
                .boxed(),
        };
        Some(layer)
    } else {
        None
    };

    let env_filter = match conf.console.filtering_directive.as_deref() {
        Some(directive) if std::env::var(EnvFilter::DEFAULT_ENV).is_err() => EnvFilter::builder()
            .with_default_directive(LevelFilter::TRACE.into())
            .parse_lossy(directive),
        _ => EnvFilter::builder()
            .with_default_directive(LevelFilter::TRACE.into())
            .from_env_lossy(),
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(env_filter)
        .init();

    tracing::debug!(service = service_name, "logging subsystem initialised");

    TelemetryGuard {
        _log_guards: guards,
    }
}
