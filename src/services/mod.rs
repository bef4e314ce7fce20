//! Boundary contracts for the collaborators the swap core drives but does not own.
//!
//! Everything here is injected into the core explicitly; nothing is looked up
//! from ambient state, so the core runs headless in tests with in-memory fakes.

pub mod token_list;

use crate::core::{Asset, Pair, PairAddress, SubmitMode, SwapResult, Trade, TransactionResult};

pub use token_list::HttpTokenListService;

/// Snapshot of the connected wallet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WalletContext {
    pub connected_address: Option<String>,
    pub network_passphrase: String,
}

impl WalletContext {
    pub fn connected(address: impl Into<String>, network_passphrase: impl Into<String>) -> Self {
        Self {
            connected_address: Some(address.into()),
            network_passphrase: network_passphrase.into(),
        }
    }

    pub fn disconnected(network_passphrase: impl Into<String>) -> Self {
        Self {
            connected_address: None,
            network_passphrase: network_passphrase.into(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected_address.is_some()
    }
}

/// Source of selectable tokens. Failures surface as an empty list.
#[async_trait::async_trait]
pub trait TokenListService: Send + Sync {
    async fn fetch_tokens(&self, network: &str) -> Vec<Asset>;
}

/// Source of every known pair among a set of assets.
#[async_trait::async_trait]
pub trait PairListService: Send + Sync {
    async fn fetch_all_pairs(&self, assets: &[Asset]) -> SwapResult<Vec<Pair>>;
}

/// Raw on-chain read of a pair's `(reserve_0, reserve_1)`.
#[async_trait::async_trait]
pub trait ReserveSource: Send + Sync {
    async fn fetch_reserves(&self, pair: &PairAddress) -> SwapResult<(u128, u128)>;
}

/// Builds, signs and sends swap transactions.
#[async_trait::async_trait]
pub trait SubmissionService: Send + Sync {
    async fn submit(
        &self,
        trade: &Trade,
        recipient: Option<&str>,
        mode: SubmitMode,
    ) -> SwapResult<TransactionResult>;
}

/// Manages the receiving account's permission to hold an asset.
#[async_trait::async_trait]
pub trait TrustlineService: Send + Sync {
    async fn requires_trustline(&self, asset: &Asset) -> SwapResult<bool>;

    async fn establish(&self, asset: &Asset) -> SwapResult<()>;
}
