pub mod button;
pub mod derivation;
pub mod state;

use crate::core::{Config, PairAddress, SwapError, SwapResult};
use crate::discovery::{PairDiscovery, ReserveLookup, ReserveRepository};
use crate::quotes::QuoteEngine;
use crate::services::WalletContext;
use log::{debug, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

pub use button::{main_button_status, ButtonStatus};
pub use derivation::{
    derive_swap_info, validate_inputs, DerivationKey, DerivedSwapInfo, QuoteTicket, SwapSession,
};
pub use state::{SwapAction, SwapState};

/// Drives derivations for a [`SwapSession`]: pair lookup, reserves, pricing.
pub struct QuoteService {
    discovery: Arc<PairDiscovery>,
    reserves: Arc<ReserveRepository>,
    engine: QuoteEngine,
    max_age: Duration,
    poll_interval: Duration,
}

impl QuoteService {
    pub fn new(
        discovery: Arc<PairDiscovery>,
        reserves: Arc<ReserveRepository>,
        config: &Config,
    ) -> SwapResult<Self> {
        Ok(Self {
            discovery,
            reserves,
            engine: QuoteEngine::new(config.fee_bps)?,
            max_age: Duration::from_secs(config.reserves_ttl_secs),
            poll_interval: Duration::from_secs(config.reserves_poll_secs),
        })
    }

    pub fn reserves(&self) -> &Arc<ReserveRepository> {
        &self.reserves
    }

    /// Compute the result for `ticket`. Nothing is fetched without a wallet.
    pub async fn derive(
        &self,
        ticket: &QuoteTicket,
        wallet: &WalletContext,
        slippage_bps: u16,
    ) -> DerivedSwapInfo {
        if !wallet.is_connected() {
            return DerivedSwapInfo::invalid(SwapError::WalletNotConnected, slippage_bps);
        }

        let state = &ticket.state;
        if let Err(e) = validate_inputs(state) {
            return DerivedSwapInfo::invalid(e, slippage_bps);
        }

        let pair = self
            .discovery
            .find_pair(state.input_currency.as_ref(), state.output_currency.as_ref())
            .await;
        let lookup = match &pair {
            Some(pair) => self.reserves.get_reserves(Some(pair.address()), self.max_age).await,
            None => ReserveLookup::NoPair,
        };

        derive_swap_info(state, pair.as_ref(), &lookup, &self.engine, slippage_bps)
    }

    /// One full derivation cycle against the live session.
    ///
    /// The lock is released while reserves load, so newer actions may land
    /// in between; a result they make stale is dropped. Returns whether the
    /// result was applied.
    pub async fn requote(&self, session: &Mutex<SwapSession>, wallet: &WalletContext) -> bool {
        let (ticket, slippage_bps) = {
            let mut session = session.lock().await;
            if let Some(pair) = session.displayed_pair().cloned() {
                if let Some(reserves) = self.reserves.cached(&pair) {
                    session.observe_reserves(&pair, reserves.version);
                }
            }
            (session.begin_derivation(), session.slippage_bps())
        };

        let derived = self.derive(&ticket, wallet, slippage_bps).await;

        let applied = session.lock().await.complete_derivation(ticket, derived);
        if !applied {
            debug!("Quote superseded before completion");
        }
        applied
    }

    /// Poll reserves of the session's current pair, or stop when there is none.
    pub async fn track_pair(&self, state: &SwapState) -> Option<PairAddress> {
        let pair = self
            .discovery
            .find_pair(state.input_currency.as_ref(), state.output_currency.as_ref())
            .await;

        match pair {
            Some(pair) => {
                let address = pair.address().clone();
                if self.reserves.polled_pair().as_ref() != Some(&address) {
                    info!("Tracking pair {}", address);
                    self.reserves.start(address.clone(), self.poll_interval);
                }
                Some(address)
            }
            None => {
                self.reserves.stop();
                None
            }
        }
    }
}
