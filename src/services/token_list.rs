use crate::core::{
    Asset, AssetId, Config, SwapError, SwapResult, DEFAULT_DECIMALS, MAINNET, TOKENS_API_PATH,
};
use crate::services::TokenListService;
use log::{debug, info, warn};
use serde::Deserialize;
use std::time::Duration;

/// One entry of a token list. Public lists use `contract`/`code`, the API
/// uses `address`/`symbol`.
#[derive(Debug, Clone, Deserialize)]
struct TokenEntry {
    #[serde(alias = "contract")]
    address: Option<String>,
    #[serde(alias = "code")]
    symbol: String,
    name: Option<String>,
    issuer: Option<String>,
    decimals: Option<u8>,
}

#[derive(Debug, Clone, Deserialize)]
struct NetworkTokens {
    network: String,
    tokens: Vec<TokenEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum TokenListPayload {
    List(Vec<TokenEntry>),
    Wrapped {
        #[serde(alias = "tokens")]
        assets: Vec<TokenEntry>,
    },
    PerNetwork(Vec<NetworkTokens>),
}

impl TokenEntry {
    fn into_asset(self) -> Asset {
        let id = match (self.address, self.issuer) {
            (Some(address), _) => AssetId::Contract(address),
            (None, Some(issuer)) => AssetId::Classic {
                code: self.symbol.clone(),
                issuer,
            },
            (None, None) => AssetId::Native,
        };
        let name = self.name.unwrap_or_else(|| self.symbol.clone());

        Asset::new(id, self.symbol, name, self.decimals.unwrap_or(DEFAULT_DECIMALS))
    }
}

impl TokenListPayload {
    fn into_assets(self, network: &str) -> Vec<Asset> {
        let entries = match self {
            TokenListPayload::List(entries) => entries,
            TokenListPayload::Wrapped { assets } => assets,
            TokenListPayload::PerNetwork(networks) => networks
                .into_iter()
                .find(|n| n.network.eq_ignore_ascii_case(network))
                .map(|n| n.tokens)
                .unwrap_or_default(),
        };
        entries.into_iter().map(TokenEntry::into_asset).collect()
    }
}

/// Token list over HTTP: the public list on mainnet, the Soroswap API elsewhere.
pub struct HttpTokenListService {
    client: reqwest::Client,
    token_list_url: String,
    api_url: String,
}

impl HttpTokenListService {
    pub fn new(config: &Config) -> SwapResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| SwapError::ConfigError(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            token_list_url: config.token_list_url.clone(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    fn url_for(&self, network: &str) -> String {
        if network == MAINNET {
            self.token_list_url.clone()
        } else {
            format!("{}{}", self.api_url, TOKENS_API_PATH)
        }
    }

    async fn try_fetch(&self, network: &str) -> SwapResult<Vec<Asset>> {
        let url = self.url_for(network);
        debug!("Fetching token list for {} from {}", network, url);

        let payload: TokenListPayload = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(payload.into_assets(network))
    }
}

#[async_trait::async_trait]
impl TokenListService for HttpTokenListService {
    async fn fetch_tokens(&self, network: &str) -> Vec<Asset> {
        match self.try_fetch(network).await {
            Ok(tokens) => {
                info!("Loaded {} tokens for {}", tokens.len(), network);
                tokens
            }
            Err(e) => {
                warn!("Token list unavailable for {}: {}", network, e);
                vec![]
            }
        }
    }
}
