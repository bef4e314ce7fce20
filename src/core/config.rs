use crate::core::{constants::*, error::SwapResult, SwapError};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub network: String,
    pub api_url: String,
    pub token_list_url: String,
    pub fee_bps: u32,
    pub default_slippage_bps: u16,
    pub max_slippage_bps: u16,
    pub reserves_ttl_secs: u64,
    pub reserves_poll_secs: u64,
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> SwapResult<Self> {
        dotenv::dotenv().ok();

        let network = env::var("SOROSWAP_NETWORK")
            .map(|n| n.to_lowercase())
            .unwrap_or_else(|_| TESTNET.to_string());

        Ok(Self {
            network,
            api_url: env::var("SOROSWAP_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            token_list_url: env::var("TOKEN_LIST_URL")
                .unwrap_or_else(|_| MAINNET_TOKEN_LIST_URL.to_string()),
            fee_bps: env::var("FEE_BPS")
                .unwrap_or_default()
                .parse()
                .unwrap_or(DEFAULT_FEE_BPS),
            default_slippage_bps: env::var("DEFAULT_SLIPPAGE_BPS")
                .unwrap_or_default()
                .parse()
                .unwrap_or(DEFAULT_SLIPPAGE_BPS),
            max_slippage_bps: env::var("MAX_SLIPPAGE_BPS")
                .unwrap_or_default()
                .parse()
                .unwrap_or(MAX_SLIPPAGE_BPS),
            reserves_ttl_secs: env::var("RESERVES_TTL_SECS")
                .unwrap_or_default()
                .parse()
                .unwrap_or(RESERVES_CACHE_TTL),
            reserves_poll_secs: env::var("RESERVES_POLL_SECS")
                .unwrap_or_default()
                .parse()
                .unwrap_or(RESERVES_POLL_INTERVAL),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_default()
                .parse()
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT),
        })
    }

    pub fn validate(&self) -> SwapResult<()> {
        if self.fee_bps >= BPS_DENOMINATOR {
            return Err(SwapError::ConfigError(
                "Pool fee must be below 100%".to_string(),
            ));
        }

        if u32::from(self.max_slippage_bps) > BPS_DENOMINATOR {
            return Err(SwapError::ConfigError(
                "Max slippage cannot exceed 100%".to_string(),
            ));
        }

        if self.default_slippage_bps > self.max_slippage_bps {
            return Err(SwapError::ConfigError(
                "Default slippage cannot exceed max slippage".to_string(),
            ));
        }

        if self.reserves_ttl_secs == 0 || self.reserves_poll_secs == 0 {
            return Err(SwapError::ConfigError(
                "Reserve TTL and poll interval must be greater than 0".to_string(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(SwapError::ConfigError(
                "Timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn is_mainnet(&self) -> bool {
        self.network == MAINNET
    }

    pub fn network_passphrase(&self) -> Option<&'static str> {
        network_passphrase(&self.network)
    }
}

/// Passphrase of a named network, `None` for networks we do not know.
pub fn network_passphrase(network: &str) -> Option<&'static str> {
    match network.to_lowercase().as_str() {
        MAINNET => Some(MAINNET_PASSPHRASE),
        TESTNET => Some(TESTNET_PASSPHRASE),
        _ => None,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: TESTNET.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            token_list_url: MAINNET_TOKEN_LIST_URL.to_string(),
            fee_bps: DEFAULT_FEE_BPS,
            default_slippage_bps: DEFAULT_SLIPPAGE_BPS,
            max_slippage_bps: MAX_SLIPPAGE_BPS,
            reserves_ttl_secs: RESERVES_CACHE_TTL,
            reserves_poll_secs: RESERVES_POLL_INTERVAL,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}
