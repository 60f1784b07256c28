//! Configuration for the data layer.
//!
//! Plain config struct with environment overrides, validated once when the
//! application context is constructed.

use crate::error::{DataError, Result};

/// Token denomination used for balance formatting.
#[derive(Debug, Clone)]
pub struct TokenRegistry {
    /// Token symbol (e.g. "AGR")
    pub symbol: String,
    /// Decimal precision of the raw on-chain integer balance
    pub decimals: u32,
}

impl Default for TokenRegistry {
    fn default() -> Self {
        Self {
            symbol: "AGR".to_string(),
            decimals: 10,
        }
    }
}

/// Data layer configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Pagination window size for incremental id-list loading (default: 20)
    pub window_size: usize,
    /// Space ids surfaced on the discovery/suggestion feed
    pub recommended_space_ids: Vec<String>,
    /// Base URL for resolving content-addressed images on comments
    pub content_gateway_url: String,
    /// Token registry for balance formatting
    pub token: TokenRegistry,
    /// Attempts per external fetch before surfacing a failure (default: 2)
    pub fetch_retries: u32,
    /// Base delay for exponential backoff between attempts (default: 100ms)
    pub retry_base_delay_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_size: 20,
            recommended_space_ids: (1001..=1017)
                .chain(std::iter::once(1019))
                .map(|id: u32| id.to_string())
                .collect(),
            content_gateway_url: "https://ipfs.io/ipfs/".to_string(),
            token: TokenRegistry::default(),
            fetch_retries: 2,
            retry_base_delay_ms: 100,
        }
    }
}

impl AppConfig {
    /// Create config from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("AGORA_WINDOW_SIZE") {
            if let Ok(size) = val.parse::<usize>() {
                config.window_size = size;
            }
        }

        if let Ok(val) = std::env::var("AGORA_RECOMMENDED_SPACE_IDS") {
            let ids: Vec<String> = val
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if !ids.is_empty() {
                config.recommended_space_ids = ids;
            }
        }

        if let Ok(val) = std::env::var("AGORA_CONTENT_GATEWAY_URL") {
            config.content_gateway_url = val;
        }

        if let Ok(val) = std::env::var("AGORA_TOKEN_SYMBOL") {
            config.token.symbol = val;
        }

        if let Ok(val) = std::env::var("AGORA_TOKEN_DECIMALS") {
            if let Ok(decimals) = val.parse::<u32>() {
                config.token.decimals = decimals;
            }
        }

        if let Ok(val) = std::env::var("AGORA_FETCH_RETRIES") {
            if let Ok(retries) = val.parse::<u32>() {
                config.fetch_retries = retries;
            }
        }

        config
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(DataError::InvalidConfig(
                "window_size must be greater than zero".to_string(),
            ));
        }

        // 10^39 overflows u128 during balance formatting
        if self.token.decimals > 38 {
            return Err(DataError::InvalidConfig(
                "token decimals must be 38 or less".to_string(),
            ));
        }

        if self.content_gateway_url.is_empty() {
            return Err(DataError::InvalidConfig(
                "content_gateway_url must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.window_size, 20);
        assert_eq!(config.recommended_space_ids.len(), 18);
        assert_eq!(config.recommended_space_ids[0], "1001");
        assert_eq!(config.recommended_space_ids.last().unwrap(), "1019");
    }

    #[test]
    fn test_zero_window_rejected() {
        let config = AppConfig {
            window_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(DataError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_oversized_decimals_rejected() {
        let mut config = AppConfig::default();
        config.token.decimals = 39;
        assert!(config.validate().is_err());
    }
}
