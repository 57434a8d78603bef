//! Client-side routes the callback flow lands on.

use std::borrow::Cow;

use url::Url;

use crate::transaction::TxnId;

pub const VERIFY_PATH_PREFIX: &str = "/transactions/verify";
pub const SUCCESS_PATH: &str = "/transactions/success";
pub const FAILURE_PATH: &str = "/transactions/failure";
pub const PENDING_PATH: &str = "/transactions/pending";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/transactions/verify/{txn_id}`, mounts the verification screen
    Verify(TxnId),
    Success,
    Failure,
    Pending,
}

impl Route {
    /// Path with the transaction id encoded as a single segment.
    pub fn path(&self) -> String {
        match self {
            Self::Verify(txn_id) => {
                format!("{VERIFY_PATH_PREFIX}/{}", encode_segment(txn_id.as_str()))
            }
            Self::Success => SUCCESS_PATH.to_string(),
            Self::Failure => FAILURE_PATH.to_string(),
            Self::Pending => PENDING_PATH.to_string(),
        }
    }

    /// Absolute location of this route under `base`. Any path already on
    /// `base` is kept as a prefix; query and fragment are dropped.
    pub fn resolve(&self, base: &Url) -> Url {
        let mut location = base.clone();
        let prefix = base.path().trim_end_matches('/');
        location.set_path(&format!("{prefix}{}", self.path()));
        location.set_query(None);
        location.set_fragment(None);
        location
    }

    /// Parses a path (or an absolute URL) back into a route.
    pub fn parse(location: &str) -> Option<Self> {
        let path = match Url::parse(location) {
            Ok(url) => url.path().to_string(),
            Err(_) => location
                .split(['?', '#'])
                .next()
                .unwrap_or_default()
                .to_string(),
        };
        let path = path.trim_end_matches('/');

        if let Some(rest) = path
            .rfind(VERIFY_PATH_PREFIX)
            .map(|index| &path[index + VERIFY_PATH_PREFIX.len()..])
        {
            let segment = rest.strip_prefix('/')?;
            if segment.contains('/') {
                return None;
            }
            return TxnId::new(decode_segment(segment)?).ok().map(Self::Verify);
        }

        [
            (SUCCESS_PATH, Self::Success),
            (FAILURE_PATH, Self::Failure),
            (PENDING_PATH, Self::Pending),
        ]
        .into_iter()
        .find_map(|(suffix, route)| path.ends_with(suffix).then_some(route))
    }
}

/// Percent-encodes everything except unreserved characters.
fn encode_segment(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}

/// `None` when the decoded bytes are not UTF-8.
fn decode_segment(segment: &str) -> Option<String> {
    urlencoding::decode(segment).ok().map(Cow::into_owned)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn verify(raw: &str) -> Route {
        Route::Verify(TxnId::new(raw).unwrap())
    }

    #[test]
    fn static_paths() {
        assert_eq!(Route::Success.path(), "/transactions/success");
        assert_eq!(Route::Failure.path(), "/transactions/failure");
        assert_eq!(Route::Pending.path(), "/transactions/pending");
        assert_eq!(verify("TXN123").path(), "/transactions/verify/TXN123");
    }

    #[test]
    fn verify_path_encodes_reserved_characters() {
        assert_eq!(
            verify("a/b c+d").path(),
            "/transactions/verify/a%2Fb%20c%2Bd"
        );
    }

    #[test]
    fn resolve_keeps_base_prefix() {
        let base = Url::parse("https://fest.example.org/app/?ref=x").unwrap();
        assert_eq!(
            verify("TXN1").resolve(&base).as_str(),
            "https://fest.example.org/app/transactions/verify/TXN1"
        );
        let root = Url::parse("http://localhost:3000").unwrap();
        assert_eq!(
            Route::Pending.resolve(&root).as_str(),
            "http://localhost:3000/transactions/pending"
        );
    }

    #[test]
    fn parse_round_trips_encoded_ids() {
        let route = verify("a/b c+d");
        assert_eq!(Route::parse(&route.path()), Some(route.clone()));
        let base = Url::parse("https://fest.example.org").unwrap();
        assert_eq!(Route::parse(route.resolve(&base).as_str()), Some(route));
    }

    #[test]
    fn parse_recognises_static_pages_and_rejects_others() {
        assert_eq!(Route::parse("/transactions/success"), Some(Route::Success));
        assert_eq!(Route::parse("/transactions/pending?x=1"), Some(Route::Pending));
        assert_eq!(Route::parse("/transactions/verify/"), None);
        assert_eq!(Route::parse("/transactions/verify/a/b"), None);
        assert_eq!(Route::parse("/profile"), None);
    }

    #[test]
    fn parse_decodes_multibyte_ids_and_rejects_invalid_utf8() {
        assert_eq!(
            Route::parse("/transactions/verify/F%C3%89TE%2042"),
            Some(verify("FÉTE 42"))
        );
        assert_eq!(verify("FÉTE 42").path(), "/transactions/verify/F%C3%89TE%2042");
        assert_eq!(Route::parse("/transactions/verify/%FF%FE"), None);
    }
}
