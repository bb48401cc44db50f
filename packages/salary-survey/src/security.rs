//! The SuperJob app id, held in a `secrecy` box so it stays out of logs.

use secrecy::{ExposeSecret, SecretBox};
use std::fmt;

/// A provider API key, sent as a request header and nowhere else.
pub struct ApiKey(SecretBox<str>);

impl ApiKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretBox::new(value.into().into_boxed_str()))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Blank keys are treated the same as missing ones.
    pub fn is_blank(&self) -> bool {
        self.expose().trim().is_empty()
    }
}

impl Clone for ApiKey {
    fn clone(&self) -> Self {
        Self::new(self.expose())
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}
