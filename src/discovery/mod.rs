pub mod pair_resolver;
pub mod reserve_repository;

use crate::core::{Asset, Pair, SwapResult};
use crate::services::PairListService;
use log::info;
use std::sync::Arc;
use tokio::sync::RwLock;

pub use pair_resolver::{find_pair, find_pair_address};
pub use reserve_repository::{ReserveLookup, ReserveRepository};

/// Known-pair directory backed by a [`PairListService`].
pub struct PairDiscovery {
    service: Arc<dyn PairListService>,
    known_pairs: RwLock<Vec<Pair>>,
}

impl PairDiscovery {
    pub fn new(service: Arc<dyn PairListService>) -> Self {
        Self {
            service,
            known_pairs: RwLock::new(Vec::new()),
        }
    }

    /// Replace the known pairs with every pair among `assets`.
    pub async fn load_pairs(&self, assets: &[Asset]) -> SwapResult<usize> {
        let pairs = self.service.fetch_all_pairs(assets).await?;
        let count = pairs.len();
        *self.known_pairs.write().await = pairs;

        info!("Loaded {} pairs across {} assets", count, assets.len());
        Ok(count)
    }

    /// Direct pair between two selected assets, if one is known.
    pub async fn find_pair(&self, a: Option<&Asset>, b: Option<&Asset>) -> Option<Pair> {
        let known = self.known_pairs.read().await;
        pair_resolver::find_pair(a, b, &known).cloned()
    }

    pub async fn known_pairs(&self) -> Vec<Pair> {
        self.known_pairs.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AssetId, PairAddress, SwapError};

    fn asset(code: &str) -> Asset {
        Asset::new(AssetId::Contract(format!("C{}", code)), code, code, 7)
    }

    struct StaticPairs(SwapResult<Vec<Pair>>);

    #[async_trait::async_trait]
    impl PairListService for StaticPairs {
        async fn fetch_all_pairs(&self, _assets: &[Asset]) -> SwapResult<Vec<Pair>> {
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn test_load_and_find_pairs() {
        let pair = Pair::new(asset("AAA"), asset("BBB"), PairAddress::new("CPAIR")).unwrap();
        let discovery = PairDiscovery::new(Arc::new(StaticPairs(Ok(vec![pair.clone()]))));

        assert!(discovery
            .find_pair(Some(&asset("AAA")), Some(&asset("BBB")))
            .await
            .is_none());

        let count = discovery
            .load_pairs(&[asset("AAA"), asset("BBB")])
            .await
            .unwrap();
        assert_eq!(count, 1);

        let found = discovery
            .find_pair(Some(&asset("BBB")), Some(&asset("AAA")))
            .await;
        assert_eq!(found, Some(pair));
        assert_eq!(discovery.known_pairs().await.len(), 1);
    }

    #[tokio::test]
    async fn test_load_failure_propagates() {
        let discovery = PairDiscovery::new(Arc::new(StaticPairs(Err(SwapError::NetworkError(
            "down".to_string(),
        )))));

        assert!(discovery.load_pairs(&[asset("AAA")]).await.is_err());
        assert!(discovery.known_pairs().await.is_empty());
    }
}
