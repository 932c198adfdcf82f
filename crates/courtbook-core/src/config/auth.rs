//! Token verification configuration.

use serde::{Deserialize, Serialize};

/// Settings for verifying bearer tokens issued by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Shared HMAC-SHA256 secret.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Expected `iss` claim, if the provider sets one.
    #[serde(default)]
    pub issuer: Option<String>,
    /// Clock skew tolerance in seconds.
    #[serde(default = "default_leeway")]
    pub leeway_seconds: u64,
    /// Lifetime of tokens minted by the CLI for operators and tests.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_minutes: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            issuer: None,
            leeway_seconds: default_leeway(),
            token_ttl_minutes: default_token_ttl(),
        }
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_leeway() -> u64 {
    5
}

fn default_token_ttl() -> u64 {
    60
}
