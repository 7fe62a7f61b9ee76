//! Mock implementations for testing

use super::traits::TokenSource;

/// Token source that returns the same token every turn
pub struct FixedTokens {
    token: String,
}

impl FixedTokens {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl TokenSource for FixedTokens {
    fn token(&self) -> String {
        self.token.clone()
    }
}
