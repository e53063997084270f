use std::env;

const DEFAULT_LINKUP_URL: &str = "https://api.linkup.so/v1/search";
const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4-0125-preview";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
}

#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Process-lifetime settings for the two upstream providers.
///
/// Read from the environment (and `.env`, if present):
/// - `LINKUP_API_KEY`, `OPENAI_API_KEY`: required
/// - `OPENAI_MODEL`, `LINKUP_API_URL`, `OPENAI_API_URL`: optional overrides
#[derive(Debug, Clone)]
pub struct Config {
    pub linkup_api_key: ApiKey,
    pub linkup_url: String,
    pub openai_api_key: ApiKey,
    pub openai_url: String,
    pub openai_model: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let optional = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Ok(Self {
            linkup_api_key: required_key(&lookup, "LINKUP_API_KEY")?,
            linkup_url: optional("LINKUP_API_URL", DEFAULT_LINKUP_URL),
            openai_api_key: required_key(&lookup, "OPENAI_API_KEY")?,
            openai_url: optional("OPENAI_API_URL", DEFAULT_OPENAI_URL),
            openai_model: optional("OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
        })
    }
}

fn required_key(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<ApiKey, ConfigError> {
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(ApiKey::new)
        .ok_or(ConfigError::Missing(key))
}
