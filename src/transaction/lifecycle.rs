use crate::core::{SubmitMode, SwapError, SwapResult, Trade, TransactionResult};
use crate::services::{SubmissionService, TrustlineService, WalletContext};
use crate::session::SwapSession;
use log::{debug, error, info, warn};
use std::sync::{Arc, RwLock};
use tokio::sync::watch;

/// Where a trade is between review and its outcome. Every phase past `Idle`
/// carries the frozen trade snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum TradePhase {
    Idle,
    ReviewPending { trade: Trade },
    Confirming { trade: Trade },
    Submitting { trade: Trade },
    Success { trade: Trade, result: TransactionResult },
    Failed { trade: Trade, error: SwapError },
}

impl TradePhase {
    pub fn name(&self) -> &'static str {
        match self {
            TradePhase::Idle => "Idle",
            TradePhase::ReviewPending { .. } => "ReviewPending",
            TradePhase::Confirming { .. } => "Confirming",
            TradePhase::Submitting { .. } => "Submitting",
            TradePhase::Success { .. } => "Success",
            TradePhase::Failed { .. } => "Failed",
        }
    }

    pub fn trade(&self) -> Option<&Trade> {
        match self {
            TradePhase::Idle => None,
            TradePhase::ReviewPending { trade }
            | TradePhase::Confirming { trade }
            | TradePhase::Submitting { trade }
            | TradePhase::Success { trade, .. }
            | TradePhase::Failed { trade, .. } => Some(trade),
        }
    }

    pub fn error(&self) -> Option<&SwapError> {
        match self {
            TradePhase::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, TradePhase::Success { .. } | TradePhase::Failed { .. })
    }
}

/// Moves one trade from review through submission.
///
/// Once `Submitting` is entered the trade runs to `Success` or `Failed`; there
/// is no cancellation.
pub struct TradeLifecycleController {
    submission: Arc<dyn SubmissionService>,
    trustlines: Arc<dyn TrustlineService>,
    wallet: RwLock<WalletContext>,
    phase_tx: watch::Sender<TradePhase>,
}

impl TradeLifecycleController {
    pub fn new(
        submission: Arc<dyn SubmissionService>,
        trustlines: Arc<dyn TrustlineService>,
        wallet: WalletContext,
    ) -> Self {
        let (phase_tx, _) = watch::channel(TradePhase::Idle);
        Self {
            submission,
            trustlines,
            wallet: RwLock::new(wallet),
            phase_tx,
        }
    }

    pub fn phase(&self) -> TradePhase {
        self.phase_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TradePhase> {
        self.phase_tx.subscribe()
    }

    pub fn set_wallet(&self, wallet: WalletContext) {
        if let Ok(mut current) = self.wallet.write() {
            *current = wallet;
        }
    }

    fn wallet(&self) -> WalletContext {
        self.wallet
            .read()
            .map(|w| w.clone())
            .unwrap_or_default()
    }

    fn transition<F>(&self, action: &'static str, next: F) -> SwapResult<TradePhase>
    where
        F: FnOnce(&TradePhase) -> Option<TradePhase>,
    {
        let mut outcome = Err(SwapError::Other(format!("{} not applied", action)));

        self.phase_tx.send_if_modified(|phase| match next(phase) {
            Some(new_phase) => {
                debug!("Trade phase {} -> {} ({})", phase.name(), new_phase.name(), action);
                *phase = new_phase;
                outcome = Ok(phase.clone());
                true
            }
            None => {
                outcome = Err(SwapError::InvalidTransition {
                    from: phase.name(),
                    action,
                });
                false
            }
        });

        outcome
    }

    /// Snapshot the session's valid trade for review.
    pub fn request_review(&self, session: &SwapSession) -> SwapResult<Trade> {
        let trade = session
            .trade_to_confirm()
            .ok_or_else(|| SwapError::InputInvalid("no valid trade to review".to_string()))?;

        self.transition("request_review", |phase| match phase {
            TradePhase::Idle => Some(TradePhase::ReviewPending {
                trade: trade.clone(),
            }),
            _ => None,
        })?;

        Ok(trade)
    }

    pub fn open_confirmation(&self) -> SwapResult<()> {
        self.transition("open_confirmation", |phase| match phase {
            TradePhase::ReviewPending { trade } => Some(TradePhase::Confirming {
                trade: trade.clone(),
            }),
            _ => None,
        })
        .map(|_| ())
    }

    /// Back out before submission.
    pub fn cancel(&self) -> SwapResult<()> {
        self.transition("cancel", |phase| match phase {
            TradePhase::ReviewPending { .. } | TradePhase::Confirming { .. } => {
                Some(TradePhase::Idle)
            }
            _ => None,
        })
        .map(|_| ())
    }

    /// Submit the confirmed trade. `recipient` defaults to the connected account.
    pub async fn accept(&self, recipient: Option<&str>) -> SwapResult<TransactionResult> {
        let wallet = self.wallet();
        let Some(address) = wallet.connected_address.clone() else {
            return Err(SwapError::WalletNotConnected);
        };

        let phase = self.transition("accept", |phase| match phase {
            TradePhase::Confirming { trade } => Some(TradePhase::Submitting {
                trade: trade.clone(),
            }),
            _ => None,
        })?;
        let Some(trade) = phase.trade().cloned() else {
            return Err(SwapError::Other("submitting without a trade".to_string()));
        };
        let recipient = recipient.unwrap_or(address.as_str());

        info!(
            "Submitting swap {} {} -> {} {} for {}",
            trade.input.amount,
            trade.input.asset.symbol,
            trade.output.amount,
            trade.output.asset.symbol,
            recipient
        );

        if let Err(e) = self.prepare(&trade, recipient).await {
            let error = SwapError::PreconditionFailed(e.to_string());
            error!("Swap preparation failed: {}", e);
            self.finish(trade, Err(error.clone()));
            return Err(error);
        }

        let submitted = self
            .submission
            .submit(&trade, Some(recipient), SubmitMode::Broadcast)
            .await;

        match submitted {
            Ok(result) => {
                info!("Swap confirmed: {}", result.hash);
                self.finish(trade, Ok(result.clone()));
                Ok(result)
            }
            Err(e) => {
                let error = match e {
                    SwapError::SubmissionFailed(_) => e,
                    other => SwapError::SubmissionFailed(other.to_string()),
                };
                error!("Swap submission failed: {}", error);
                self.finish(trade, Err(error.clone()));
                Err(error)
            }
        }
    }

    // Make sure the recipient can hold the output asset before broadcasting
    async fn prepare(&self, trade: &Trade, recipient: &str) -> SwapResult<()> {
        let asset = &trade.output.asset;

        let needs_trustline = if self.trustlines.requires_trustline(asset).await? {
            true
        } else {
            match self
                .submission
                .submit(trade, Some(recipient), SubmitMode::Simulate)
                .await
            {
                Ok(_) => false,
                Err(e) => {
                    warn!("Simulated swap failed ({}), setting trustline for {}", e, asset.symbol);
                    true
                }
            }
        };

        if needs_trustline {
            self.trustlines.establish(asset).await?;
            info!("Trustline established for {}", asset.symbol);
        }

        Ok(())
    }

    fn finish(&self, trade: Trade, outcome: SwapResult<TransactionResult>) {
        let next = match outcome {
            Ok(result) => TradePhase::Success { trade, result },
            Err(error) => TradePhase::Failed { trade, error },
        };
        self.phase_tx.send_replace(next);
    }

    /// Return a failed trade to confirmation for another attempt.
    pub fn retry(&self) -> SwapResult<()> {
        self.transition("retry", |phase| match phase {
            TradePhase::Failed { trade, .. } => Some(TradePhase::Confirming {
                trade: trade.clone(),
            }),
            _ => None,
        })
        .map(|_| ())
    }

    /// Close a finished trade. The typed amount is cleared only after success.
    pub fn dismiss(&self, session: &mut SwapSession) -> SwapResult<()> {
        let previous = self.phase();
        self.transition("dismiss", |phase| match phase {
            TradePhase::Success { .. } | TradePhase::Failed { .. } => Some(TradePhase::Idle),
            _ => None,
        })?;

        if matches!(previous, TradePhase::Success { .. }) {
            session.clear_input();
        }
        Ok(())
    }
}
