use std::sync::Arc;

use domain_types::Route;
use url::Url;

/// Immutable per-process state shared by every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub redirects: Arc<RedirectTargets>,
}

impl AppState {
    pub fn new(redirects: RedirectTargets) -> Self {
        Self {
            redirects: Arc::new(redirects),
        }
    }
}

/// Builds absolute redirect locations under the public origin of the
/// single-page application.
#[derive(Debug)]
pub struct RedirectTargets {
    public_base: Url,
}

impl RedirectTargets {
    pub fn new(public_base: Url) -> Self {
        Self { public_base }
    }

    pub fn location(&self, route: &Route) -> String {
        route.resolve(&self.public_base).to_string()
    }
}
