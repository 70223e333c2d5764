use anyhow::{Context, Result};
use std::env;

const ALCHEMY_MAINNET_URL: &str = "https://eth-mainnet.g.alchemy.com/v2";

#[derive(Debug, Clone)]
pub struct Config {
    pub provider_url: String,
    pub request_timeout_ms: u64,
    pub log_file: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        let _ = dotenv::dotenv();

        // An explicit provider URL wins; otherwise the Alchemy key is required
        let provider_url = match env::var("HTTP_PROVIDER_URL") {
            Ok(url) => url,
            Err(_) => {
                let api_key = env::var("ALCHEMY_API_KEY")
                    .context("ALCHEMY_API_KEY must be set (or set HTTP_PROVIDER_URL directly)")?;
                format!("{}/{}", ALCHEMY_MAINNET_URL, api_key)
            }
        };

        let request_timeout_ms = env::var("REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "10000".to_string())
            .parse()
            .context("REQUEST_TIMEOUT_MS must be a valid number")?;

        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| "blockpeek.log".to_string());

        Ok(Config {
            provider_url,
            request_timeout_ms,
            log_file,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test so the env mutations can't race each other
    #[test]
    fn missing_api_key_fails_fast() {
        env::remove_var("HTTP_PROVIDER_URL");
        env::remove_var("ALCHEMY_API_KEY");

        let err = Config::load().expect_err("load should fail without a key");
        assert!(err.to_string().contains("ALCHEMY_API_KEY"));

        env::set_var("ALCHEMY_API_KEY", "test-key");
        let config = Config::load().expect("load should succeed with a key");
        assert_eq!(
            config.provider_url,
            format!("{}/test-key", ALCHEMY_MAINNET_URL)
        );
        assert_eq!(config.request_timeout_ms, 10_000);
        env::remove_var("ALCHEMY_API_KEY");
    }
}
