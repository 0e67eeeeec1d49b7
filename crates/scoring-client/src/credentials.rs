//! Where the scoring service API key comes from.
//!
//! The key is always handed to the client explicitly; these stores are the
//! collaborators a binary injects to look it up.

/// Supplies the scoring service API key.
pub trait CredentialStore: Send + Sync {
    /// The key, or `None` when the service is used unauthenticated.
    fn api_key(&self) -> Option<String>;
}

/// Reads the key from an environment variable at lookup time.
#[derive(Debug, Clone)]
pub struct EnvCredentials {
    var: String,
}

impl EnvCredentials {
    pub const DEFAULT_VAR: &'static str = "SCORING_API_KEY";

    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvCredentials {
    fn default() -> Self {
        Self::new(Self::DEFAULT_VAR)
    }
}

impl CredentialStore for EnvCredentials {
    fn api_key(&self) -> Option<String> {
        std::env::var(&self.var)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

/// A fixed key, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials(Option<String>);

impl StaticCredentials {
    pub fn new(key: impl Into<String>) -> Self {
        Self(Some(key.into()))
    }

    pub fn none() -> Self {
        Self(None)
    }
}

impl CredentialStore for StaticCredentials {
    fn api_key(&self) -> Option<String> {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_credentials() {
        assert_eq!(StaticCredentials::new("k").api_key(), Some("k".to_string()));
        assert_eq!(StaticCredentials::none().api_key(), None);
    }

    #[test]
    fn test_env_credentials_missing_var() {
        let credentials = EnvCredentials::new("SCREENER_TEST_KEY_THAT_IS_NEVER_SET");
        assert_eq!(credentials.api_key(), None);
    }
}
