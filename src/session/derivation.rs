use crate::core::{
    Asset, AssetId, Field, Pair, PairAddress, Reserves, SwapError, Trade, TradeState, TradeType,
};
use crate::discovery::ReserveLookup;
use crate::quotes::{parse_units, QuoteEngine, TradeRequest};
use crate::session::state::{SwapAction, SwapState};
use log::debug;
use std::collections::HashMap;

/// Identity of one derivation: the inputs the result was computed from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DerivationKey {
    pub input: Option<AssetId>,
    pub output: Option<AssetId>,
    pub independent_field: Field,
    pub typed_value: String,
    /// Version of the reserves the result was priced against, if any.
    pub reserves_version: Option<u64>,
}

impl DerivationKey {
    pub fn for_state(state: &SwapState, reserves_version: Option<u64>) -> Self {
        Self {
            input: state.input_currency.as_ref().map(|a| a.id.clone()),
            output: state.output_currency.as_ref().map(|a| a.id.clone()),
            independent_field: state.independent_field,
            typed_value: state.typed_value.clone(),
            reserves_version,
        }
    }

    /// Same user intent, ignoring which reserves were used.
    pub fn same_intent(&self, other: &DerivationKey) -> bool {
        self.input == other.input
            && self.output == other.output
            && self.independent_field == other.independent_field
            && self.typed_value == other.typed_value
    }

    fn same_currencies(&self, other: &DerivationKey) -> bool {
        self.input == other.input && self.output == other.output
    }
}

/// Everything the form shows for one state: the trade, its status and why.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedSwapInfo {
    pub trade_state: TradeState,
    pub trade: Option<Trade>,
    /// Independent amount in base units.
    pub parsed_amount: Option<u128>,
    pub input_error: Option<SwapError>,
    /// Pair the reserves below belong to.
    pub pair: Option<PairAddress>,
    pub reserves: Option<Reserves>,
    pub allowed_slippage_bps: u16,
}

impl DerivedSwapInfo {
    fn without_trade(trade_state: TradeState, slippage_bps: u16) -> Self {
        Self {
            trade_state,
            trade: None,
            parsed_amount: None,
            input_error: None,
            pair: None,
            reserves: None,
            allowed_slippage_bps: slippage_bps,
        }
    }

    pub fn loading(slippage_bps: u16) -> Self {
        Self::without_trade(TradeState::Loading, slippage_bps)
    }

    pub fn invalid(error: SwapError, slippage_bps: u16) -> Self {
        Self {
            input_error: Some(error),
            ..Self::without_trade(TradeState::Invalid, slippage_bps)
        }
    }

    pub fn reserves_version(&self) -> Option<u64> {
        self.reserves.as_ref().map(|r| r.version)
    }

    pub fn is_valid(&self) -> bool {
        self.trade_state == TradeState::Valid && self.trade.is_some()
    }

    /// Amount rendered in `field`: the typed one or the derived one.
    pub fn amount_for(&self, state: &SwapState, field: Field) -> Option<u128> {
        if field == state.independent_field {
            return self.parsed_amount;
        }
        self.trade.as_ref().map(|t| t.expected_amount().amount)
    }
}

/// Checks that need no reserves: both currencies chosen and a positive amount.
pub fn validate_inputs(state: &SwapState) -> Result<(Asset, Asset, u128), SwapError> {
    let (Some(input), Some(output)) = (&state.input_currency, &state.output_currency) else {
        return Err(SwapError::InputInvalid("select a token".to_string()));
    };

    let decimals = match state.independent_field {
        Field::Input => input.decimals,
        Field::Output => output.decimals,
    };

    match parse_units(&state.typed_value, decimals)? {
        Some(amount) if amount > 0 => Ok((input.clone(), output.clone(), amount)),
        _ => Err(SwapError::InputInvalid("enter an amount".to_string())),
    }
}

/// Derive the dependent side of `state`.
pub fn derive_swap_info(
    state: &SwapState,
    pair: Option<&Pair>,
    lookup: &ReserveLookup,
    engine: &QuoteEngine,
    slippage_bps: u16,
) -> DerivedSwapInfo {
    let (input, output, amount) = match validate_inputs(state) {
        Ok(inputs) => inputs,
        Err(e) => return DerivedSwapInfo::invalid(e, slippage_bps),
    };

    let mut info = DerivedSwapInfo {
        parsed_amount: Some(amount),
        ..DerivedSwapInfo::without_trade(TradeState::NoRouteFound, slippage_bps)
    };

    let Some(pair) = pair else {
        return info;
    };
    info.pair = Some(pair.address().clone());
    let reserves = match lookup {
        ReserveLookup::Available(reserves) => reserves,
        ReserveLookup::NoPair => return info,
        ReserveLookup::Unavailable => {
            info.trade_state = TradeState::Loading;
            return info;
        }
    };
    info.reserves = Some(reserves.clone());

    let request = TradeRequest {
        input,
        output,
        trade_type: TradeType::from(state.independent_field),
        amount,
    };

    match engine.build_trade(&request, pair, reserves) {
        Ok(trade) => {
            info.trade_state = TradeState::Valid;
            info.trade = Some(trade);
        }
        Err(e @ (SwapError::NoRoute { .. } | SwapError::InvalidPair(_))) => {
            info.trade_state = TradeState::NoRouteFound;
            info.input_error = Some(e);
        }
        Err(e) => {
            info.trade_state = TradeState::Invalid;
            info.input_error = Some(e);
        }
    }

    info
}

/// Issued when a derivation starts; hand it back with the result.
#[derive(Debug, Clone)]
pub struct QuoteTicket {
    pub key: DerivationKey,
    pub state: SwapState,
}

/// Swap form state plus the last accepted derivation.
///
/// Results are applied only while their key still matches the live state
/// and their reserves are not older than the newest seen for the same pair.
#[derive(Debug)]
pub struct SwapSession {
    state: SwapState,
    displayed: Option<(DerivationKey, DerivedSwapInfo)>,
    latest_versions: HashMap<PairAddress, u64>,
    slippage_bps: u16,
}

impl SwapSession {
    pub fn new(state: SwapState, slippage_bps: u16) -> Self {
        let mut session = Self {
            state,
            displayed: None,
            latest_versions: HashMap::new(),
            slippage_bps,
        };
        session.resolve_locally();
        session
    }

    pub fn state(&self) -> &SwapState {
        &self.state
    }

    pub fn slippage_bps(&self) -> u16 {
        self.slippage_bps
    }

    pub fn set_slippage_bps(&mut self, slippage_bps: u16) {
        self.slippage_bps = slippage_bps;
        if let Some((_, info)) = self.displayed.as_mut() {
            info.allowed_slippage_bps = slippage_bps;
        }
    }

    pub fn dispatch(&mut self, action: SwapAction) {
        debug!("Swap action: {:?}", action);
        self.state = self.state.reduce(action);
        self.resolve_locally();
    }

    /// Clears the typed amount, keeping the selected currencies.
    pub fn clear_input(&mut self) {
        let field = self.state.independent_field;
        self.dispatch(SwapAction::TypeInput {
            field,
            typed_value: String::new(),
        });
    }

    // Outcomes that need no reserves are final as soon as the state changes
    fn resolve_locally(&mut self) {
        if let Err(e) = validate_inputs(&self.state) {
            let key = DerivationKey::for_state(&self.state, None);
            self.displayed = Some((key, DerivedSwapInfo::invalid(e, self.slippage_bps)));
        }
    }

    pub fn begin_derivation(&self) -> QuoteTicket {
        QuoteTicket {
            key: DerivationKey::for_state(&self.state, None),
            state: self.state.clone(),
        }
    }

    /// Apply `derived` unless it is stale. Returns whether it was applied.
    pub fn complete_derivation(&mut self, ticket: QuoteTicket, derived: DerivedSwapInfo) -> bool {
        let live = DerivationKey::for_state(&self.state, None);
        if !ticket.key.same_intent(&live) {
            debug!(
                "Discarding quote for {:?}, input is now {:?}",
                ticket.key.typed_value, live.typed_value
            );
            return false;
        }

        if let (Some(pair), Some(version)) = (&derived.pair, derived.reserves_version()) {
            let latest = self.latest_reserves_version(pair);
            if version < latest {
                debug!(
                    "Discarding quote for {} priced at reserves v{} (latest v{})",
                    pair, version, latest
                );
                return false;
            }
            self.latest_versions.insert(pair.clone(), version);
        }

        let key = DerivationKey::for_state(&self.state, derived.reserves_version());
        self.displayed = Some((key, derived));
        true
    }

    /// Record that newer reserves exist for `pair`; a quote shown for it becomes `Syncing`.
    pub fn observe_reserves(&mut self, pair: &PairAddress, version: u64) {
        let latest = self.latest_versions.entry(pair.clone()).or_insert(0);
        if version > *latest {
            *latest = version;
        }
    }

    /// Newest reserves version seen for `pair`, 0 when none.
    pub fn latest_reserves_version(&self, pair: &PairAddress) -> u64 {
        self.latest_versions.get(pair).copied().unwrap_or(0)
    }

    /// Pair behind the quote currently shown, if any.
    pub fn displayed_pair(&self) -> Option<&PairAddress> {
        self.displayed.as_ref().and_then(|(_, info)| info.pair.as_ref())
    }

    /// What the form shows right now.
    pub fn derived(&self) -> DerivedSwapInfo {
        let live = DerivationKey::for_state(&self.state, None);

        match &self.displayed {
            Some((key, info)) if key.same_intent(&live) => {
                let outdated = match (key.reserves_version, &info.pair) {
                    (Some(version), Some(pair)) => version < self.latest_reserves_version(pair),
                    _ => false,
                };
                if outdated && info.trade.is_some() {
                    let mut info = info.clone();
                    info.trade_state = TradeState::Syncing;
                    info
                } else {
                    info.clone()
                }
            }
            // Same pair, new amount: keep showing the previous trade while requoting
            Some((key, info)) if key.same_currencies(&live) && info.trade.is_some() => {
                let mut info = info.clone();
                info.trade_state = TradeState::Syncing;
                info
            }
            _ => DerivedSwapInfo::loading(self.slippage_bps),
        }
    }

    /// Frozen copy of the current trade, only when it is valid and current.
    pub fn trade_to_confirm(&self) -> Option<Trade> {
        let derived = self.derived();
        if derived.trade_state == TradeState::Valid {
            derived.trade
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PairAddress, DEFAULT_SLIPPAGE_BPS};
    use pretty_assertions::assert_eq;

    fn asset(code: &str) -> Asset {
        Asset::new(AssetId::Contract(format!("C{}", code)), code, code, 0)
    }

    fn pair() -> Pair {
        Pair::new(asset("AAA"), asset("BBB"), PairAddress::new("CPAIR")).unwrap()
    }

    fn state(typed: &str) -> SwapState {
        SwapState {
            input_currency: Some(asset("AAA")),
            output_currency: Some(asset("BBB")),
            typed_value: typed.to_string(),
            ..SwapState::default()
        }
    }

    fn available(r0: u128, r1: u128, version: u64) -> ReserveLookup {
        ReserveLookup::Available(Reserves::new(r0, r1, version))
    }

    fn derive(state: &SwapState, lookup: &ReserveLookup) -> DerivedSwapInfo {
        derive_swap_info(
            state,
            Some(&pair()),
            lookup,
            &QuoteEngine::default(),
            DEFAULT_SLIPPAGE_BPS,
        )
    }

    #[test]
    fn test_valid_exact_input() {
        let info = derive(&state("1000"), &available(1_000_000, 2_000_000, 1));
        assert_eq!(info.trade_state, TradeState::Valid);
        assert_eq!(info.parsed_amount, Some(1_000));
        assert_eq!(info.trade.as_ref().unwrap().output.amount, 1992);
        assert_eq!(info.amount_for(&state("1000"), Field::Output), Some(1992));
        assert_eq!(info.reserves_version(), Some(1));
    }

    #[test]
    fn test_valid_exact_output() {
        let mut s = state("1992");
        s.independent_field = Field::Output;
        let info = derive(&s, &available(1_000_000, 2_000_000, 1));
        assert_eq!(info.trade_state, TradeState::Valid);
        assert_eq!(info.amount_for(&s, Field::Input), Some(1_000));
    }

    #[test]
    fn test_missing_inputs_are_invalid() {
        let lookup = available(1_000_000, 2_000_000, 1);

        let mut s = state("10");
        s.output_currency = None;
        assert_eq!(derive(&s, &lookup).trade_state, TradeState::Invalid);

        for typed in ["", "0", "abc", "-5"] {
            let info = derive(&state(typed), &lookup);
            assert_eq!(info.trade_state, TradeState::Invalid, "typed {:?}", typed);
            assert!(matches!(info.input_error, Some(SwapError::InputInvalid(_))));
        }
    }

    #[test]
    fn test_empty_pool_is_no_route() {
        let info = derive(&state("10"), &available(0, 0, 1));
        assert_eq!(info.trade_state, TradeState::NoRouteFound);
        assert!(info.trade.is_none());
    }

    #[test]
    fn test_missing_pair_is_no_route() {
        let info = derive_swap_info(
            &state("10"),
            None,
            &ReserveLookup::NoPair,
            &QuoteEngine::default(),
            DEFAULT_SLIPPAGE_BPS,
        );
        assert_eq!(info.trade_state, TradeState::NoRouteFound);
    }

    #[test]
    fn test_unavailable_reserves_are_loading() {
        let info = derive(&state("10"), &ReserveLookup::Unavailable);
        assert_eq!(info.trade_state, TradeState::Loading);
        assert_eq!(info.parsed_amount, Some(10));
    }

    #[test]
    fn test_insufficient_liquidity_is_invalid() {
        let mut s = state("2000000");
        s.independent_field = Field::Output;
        let info = derive(&s, &available(1_000_000, 2_000_000, 1));
        assert_eq!(info.trade_state, TradeState::Invalid);
        assert!(matches!(
            info.input_error,
            Some(SwapError::InsufficientLiquidity { .. })
        ));
    }

    #[test]
    fn test_later_ticket_wins_race() {
        let lookup = available(1_000_000, 2_000_000, 1);
        let mut session = SwapSession::new(state("100"), DEFAULT_SLIPPAGE_BPS);

        let first = session.begin_derivation();
        session.dispatch(SwapAction::TypeInput {
            field: Field::Input,
            typed_value: "1000".to_string(),
        });
        let second = session.begin_derivation();

        let second_info = derive(&second.state, &lookup);
        let first_info = derive(&first.state, &lookup);

        assert!(session.complete_derivation(second, second_info));
        assert!(!session.complete_derivation(first, first_info));

        let shown = session.derived();
        assert_eq!(shown.trade_state, TradeState::Valid);
        assert_eq!(shown.parsed_amount, Some(1_000));
        assert_eq!(shown.trade.unwrap().output.amount, 1992);
    }

    #[test]
    fn test_older_reserves_discarded() {
        let mut session = SwapSession::new(state("1000"), DEFAULT_SLIPPAGE_BPS);

        let old = session.begin_derivation();
        let new = session.begin_derivation();
        let new_info = derive(&new.state, &available(1_000_000, 2_000_000, 5));
        let old_info = derive(&old.state, &available(1_000_000, 1_000_000, 4));

        assert!(session.complete_derivation(new, new_info));
        assert!(!session.complete_derivation(old, old_info));
        assert_eq!(session.latest_reserves_version(&PairAddress::new("CPAIR")), 5);
        assert_eq!(session.derived().trade.unwrap().output.amount, 1992);
    }

    #[test]
    fn test_pending_and_syncing_views() {
        let mut session = SwapSession::new(state("1000"), DEFAULT_SLIPPAGE_BPS);
        assert_eq!(session.derived().trade_state, TradeState::Loading);

        let ticket = session.begin_derivation();
        let info = derive(&ticket.state, &available(1_000_000, 2_000_000, 1));
        session.complete_derivation(ticket, info);
        assert_eq!(session.derived().trade_state, TradeState::Valid);
        assert!(session.trade_to_confirm().is_some());

        session.observe_reserves(&PairAddress::new("OTHER"), 9);
        assert_eq!(session.derived().trade_state, TradeState::Valid);

        session.observe_reserves(&PairAddress::new("CPAIR"), 2);
        assert_eq!(session.derived().trade_state, TradeState::Syncing);
        assert!(session.trade_to_confirm().is_none());

        session.dispatch(SwapAction::TypeInput {
            field: Field::Input,
            typed_value: "2000".to_string(),
        });
        let shown = session.derived();
        assert_eq!(shown.trade_state, TradeState::Syncing);
        assert_eq!(shown.trade.unwrap().input.amount, 1_000);

        session.dispatch(SwapAction::SelectCurrency {
            field: Field::Output,
            asset: asset("CCC"),
        });
        let shown = session.derived();
        assert_eq!(shown.trade_state, TradeState::Loading);
        assert!(shown.trade.is_none());
    }

    #[test]
    fn test_versions_compared_per_pair() {
        let engine = QuoteEngine::default();
        let other = Pair::new(asset("AAA"), asset("CCC"), PairAddress::new("CPAIR_AC")).unwrap();
        let mut session = SwapSession::new(state("1000"), DEFAULT_SLIPPAGE_BPS);

        let ticket = session.begin_derivation();
        let info = derive(&ticket.state, &available(1_000_000, 2_000_000, 1));
        assert!(session.complete_derivation(ticket, info));

        session.dispatch(SwapAction::SelectCurrency {
            field: Field::Output,
            asset: asset("CCC"),
        });
        let ticket = session.begin_derivation();
        let info = derive_swap_info(
            &ticket.state,
            Some(&other),
            &available(1_000_000, 1_000_000, 2),
            &engine,
            DEFAULT_SLIPPAGE_BPS,
        );
        assert!(session.complete_derivation(ticket, info));
        assert_eq!(session.displayed_pair(), Some(&PairAddress::new("CPAIR_AC")));

        // Back to the first pair, whose cached reserves are still v1
        session.dispatch(SwapAction::SelectCurrency {
            field: Field::Output,
            asset: asset("BBB"),
        });
        let ticket = session.begin_derivation();
        let info = derive(&ticket.state, &available(1_000_000, 2_000_000, 1));
        assert!(session.complete_derivation(ticket, info));

        let shown = session.derived();
        assert_eq!(shown.trade_state, TradeState::Valid);
        assert_eq!(shown.trade.unwrap().output.amount, 1992);
        assert_eq!(session.latest_reserves_version(&PairAddress::new("CPAIR")), 1);
        assert_eq!(session.latest_reserves_version(&PairAddress::new("CPAIR_AC")), 2);
    }

    #[test]
    fn test_local_outcomes_resolve_on_dispatch() {
        let mut session = SwapSession::new(state("1000"), DEFAULT_SLIPPAGE_BPS);
        session.clear_input();

        let shown = session.derived();
        assert_eq!(shown.trade_state, TradeState::Invalid);
        assert_eq!(session.state().typed_value, "");
        assert_eq!(session.state().input_currency, Some(asset("AAA")));
    }
}
