use crate::client::consts::{BASE_URL, VAPI_WEB_TOKEN};
use secrecy::SecretString;

pub struct Config {
    base_url: String,
    api_key: SecretString,
}

pub struct ConfigBuilder {
    config: Config,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.config.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.config.api_key = SecretString::from(api_key.to_string());
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    // Sets the default values. The token falls back to the environment and
    // stays empty rather than panicking when it is missing.
    pub fn new() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            api_key: std::env::var(VAPI_WEB_TOKEN)
                .unwrap_or_else(|_| "".to_string())
                .into(),
        }
    }

    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &SecretString {
        &self.api_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_builder_overrides_defaults() {
        let config = Config::builder()
            .with_base_url("ws://localhost:8787/")
            .with_api_key("token-123")
            .build();
        assert_eq!(config.base_url(), "ws://localhost:8787");
        assert_eq!(config.api_key().expose_secret(), "token-123");
    }
}
