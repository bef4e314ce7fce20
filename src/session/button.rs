use crate::core::{AssetId, SwapError, TradeState};
use crate::services::WalletContext;
use crate::session::derivation::DerivedSwapInfo;
use crate::session::state::SwapState;
use std::collections::HashMap;
use std::fmt;

/// State of the single call-to-action under the swap form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonStatus {
    ConnectWallet,
    SelectToken,
    EnterAmount,
    NoLiquidity,
    InsufficientLiquidity,
    InsufficientBalance(String),
    Loading,
    Swap,
}

impl ButtonStatus {
    pub fn label(&self) -> String {
        match self {
            ButtonStatus::ConnectWallet => "Connect Wallet".to_string(),
            ButtonStatus::SelectToken => "Select a token".to_string(),
            ButtonStatus::EnterAmount => "Enter an amount".to_string(),
            ButtonStatus::NoLiquidity => "No liquidity for this pair".to_string(),
            ButtonStatus::InsufficientLiquidity => "Insufficient liquidity".to_string(),
            ButtonStatus::InsufficientBalance(symbol) => format!("Insufficient {} balance", symbol),
            ButtonStatus::Loading => "Loading...".to_string(),
            ButtonStatus::Swap => "Swap".to_string(),
        }
    }

    /// Connecting a wallet and swapping are the only clickable states.
    pub fn is_disabled(&self) -> bool {
        !matches!(self, ButtonStatus::ConnectWallet | ButtonStatus::Swap)
    }
}

impl fmt::Display for ButtonStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Pick the button for the current form. `balances` is checked only when known.
pub fn main_button_status(
    wallet: &WalletContext,
    state: &SwapState,
    derived: &DerivedSwapInfo,
    balances: Option<&HashMap<AssetId, u128>>,
) -> ButtonStatus {
    if !wallet.is_connected() {
        return ButtonStatus::ConnectWallet;
    }

    let (Some(input), Some(_)) = (&state.input_currency, &state.output_currency) else {
        return ButtonStatus::SelectToken;
    };

    if derived.parsed_amount.unwrap_or(0) == 0 {
        return ButtonStatus::EnterAmount;
    }

    let pool_empty = derived.reserves.as_ref().map(|r| !r.is_usable()).unwrap_or(false);
    if derived.trade_state == TradeState::NoRouteFound || pool_empty {
        return ButtonStatus::NoLiquidity;
    }

    if matches!(
        derived.input_error,
        Some(SwapError::InsufficientLiquidity { .. })
    ) {
        return ButtonStatus::InsufficientLiquidity;
    }

    if let (Some(trade), Some(balances)) = (&derived.trade, balances) {
        let required = trade.maximum_sent(derived.allowed_slippage_bps);
        let balance = balances.get(&input.id).copied().unwrap_or(0);
        if balance < required {
            return ButtonStatus::InsufficientBalance(input.symbol.clone());
        }
    }

    match derived.trade_state {
        TradeState::Valid => ButtonStatus::Swap,
        TradeState::Loading | TradeState::Syncing => ButtonStatus::Loading,
        _ => ButtonStatus::EnterAmount,
    }
}
