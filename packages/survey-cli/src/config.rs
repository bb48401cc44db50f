use salary_survey::{Credentials, SUPERJOB_KEY_VAR};
use std::env;

/// Secrets loaded from environment variables (and `.env`, loaded by `main`).
#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Nothing here is mandatory; providers that need a missing credential
    /// fail when they are built.
    pub fn from_env() -> Self {
        let mut credentials = Credentials::new();
        if let Ok(key) = env::var(SUPERJOB_KEY_VAR) {
            credentials = credentials.with_superjob_key(key);
        }

        Self { credentials }
    }
}
