use hyperswitch_masking::{PeekInterface, Secret};

/// Bearer token of a signed-in user. Debug output is masked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BearerToken(Secret<String>);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Secret::new(token.into()))
    }

    /// Value for an `Authorization` header.
    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.0.peek())
    }
}

#[cfg(test)]
mod tests {
    use super::BearerToken;

    #[test]
    fn debug_output_masks_the_token() {
        let token = BearerToken::new("s3cr3t");
        let debug = format!("{token:?}");
        assert!(debug.starts_with("BearerToken("));
        assert!(!debug.contains("s3cr3t"));
        assert_eq!(token.header_value(), "Bearer s3cr3t");
    }

    #[test]
    fn tokens_compare_by_value() {
        assert_eq!(BearerToken::new("a"), BearerToken::new(String::from("a")));
        assert_ne!(BearerToken::new("a"), BearerToken::new("b"));
    }
}
