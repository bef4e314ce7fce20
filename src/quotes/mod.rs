pub mod amounts;
pub mod constant_product;

use crate::core::{
    Asset, BPS_DENOMINATOR, CurrencyAmount, Pair, Reserves, SwapError, SwapResult, Trade,
    TradeType,
};
use log::debug;
use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};

pub use amounts::{format_units, parse_units};
pub use constant_product::{execution_price, price_impact, ConstantProductCalculator};

/// What the user asked for: sell exactly `amount` of `input`, or buy exactly
/// `amount` of `output`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeRequest {
    pub input: Asset,
    pub output: Asset,
    pub trade_type: TradeType,
    pub amount: u128,
}

/// Single-pair quote engine producing complete `Trade` values.
pub struct QuoteEngine {
    calculator: ConstantProductCalculator,
}

impl QuoteEngine {
    pub fn new(fee_bps: u32) -> SwapResult<Self> {
        Ok(Self {
            calculator: ConstantProductCalculator::new(fee_bps)?,
        })
    }

    pub fn fee_bps(&self) -> u32 {
        self.calculator.fee_bps()
    }

    /// Price `request` against `pair` at `reserves`.
    pub fn build_trade(
        &self,
        request: &TradeRequest,
        pair: &Pair,
        reserves: &Reserves,
    ) -> SwapResult<Trade> {
        if !pair.matches(&request.input.id, &request.output.id) {
            return Err(SwapError::NoRoute {
                input: request.input.symbol.clone(),
                output: request.output.symbol.clone(),
            });
        }

        let (reserve_in, reserve_out) = reserves
            .oriented(pair, &request.input.id)
            .ok_or_else(|| SwapError::InvalidPair(format!("{} not in pair", request.input.id)))?;

        let (amount_in, amount_out) = match request.trade_type {
            TradeType::ExactInput => {
                let out = self
                    .calculator
                    .get_amount_out(request.amount, reserve_in, reserve_out)?;
                (request.amount, out)
            }
            TradeType::ExactOutput => {
                let required = self
                    .calculator
                    .get_amount_in(request.amount, reserve_in, reserve_out)?;
                (required, request.amount)
            }
        };

        let trade = Trade {
            input: CurrencyAmount::new(request.input.clone(), amount_in),
            output: CurrencyAmount::new(request.output.clone(), amount_out),
            trade_type: request.trade_type,
            execution_price: execution_price(
                amount_in,
                amount_out,
                request.input.decimals,
                request.output.decimals,
            )?,
            price_impact: price_impact(amount_in, amount_out, reserve_in, reserve_out)?,
            fee_bps: self.fee_bps(),
            route: vec![pair.address().clone()],
        };

        debug!(
            "Trade {} {} -> {} {} via {} (impact {})",
            trade.input.amount,
            trade.input.asset.symbol,
            trade.output.amount,
            trade.output.asset.symbol,
            pair.address(),
            trade.price_impact
        );

        Ok(trade)
    }
}

impl Default for QuoteEngine {
    fn default() -> Self {
        Self {
            calculator: ConstantProductCalculator::default(),
        }
    }
}

/// `floor(value * numerator / denominator)` without intermediate overflow.
pub fn mul_div_floor(value: u128, numerator: u128, denominator: u128) -> SwapResult<u128> {
    if denominator == 0 {
        return Err(SwapError::MathOverflow);
    }
    let product = BigUint::from(value) * BigUint::from(numerator);
    (product / BigUint::from(denominator))
        .to_u128()
        .ok_or(SwapError::MathOverflow)
}

/// `ceil(value * numerator / denominator)` without intermediate overflow.
fn mul_div_ceil(value: u128, numerator: u128, denominator: u128) -> SwapResult<u128> {
    if denominator == 0 {
        return Err(SwapError::MathOverflow);
    }
    let product = BigUint::from(value) * BigUint::from(numerator);
    let denominator = BigUint::from(denominator);
    let quotient = &product / &denominator;
    let rounded = if (product % &denominator).is_zero() {
        quotient
    } else {
        quotient + 1u32
    };
    rounded.to_u128().ok_or(SwapError::MathOverflow)
}

/// `amount_out * (1 - slippage)`, rounded down.
pub fn minimum_received(amount_out: u128, slippage_bps: u16) -> u128 {
    let slippage = u128::from(slippage_bps).min(u128::from(BPS_DENOMINATOR));
    let denominator = u128::from(BPS_DENOMINATOR);
    mul_div_floor(amount_out, denominator - slippage, denominator).unwrap_or(0)
}

/// `amount_in * (1 + slippage)`, rounded up and saturating at `u128::MAX`.
pub fn maximum_sent(amount_in: u128, slippage_bps: u16) -> u128 {
    let denominator = u128::from(BPS_DENOMINATOR);
    mul_div_ceil(amount_in, denominator + u128::from(slippage_bps), denominator)
        .unwrap_or(u128::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AssetId, PairAddress};
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    fn asset(code: &str) -> Asset {
        Asset::new(AssetId::Contract(format!("C{}", code)), code, code, 7)
    }

    fn pair() -> Pair {
        Pair::new(asset("AAA"), asset("BBB"), PairAddress::new("CPAIR")).unwrap()
    }

    #[test]
    fn test_build_exact_input_trade() {
        let engine = QuoteEngine::default();
        let request = TradeRequest {
            input: asset("AAA"),
            output: asset("BBB"),
            trade_type: TradeType::ExactInput,
            amount: 1_000,
        };

        let trade = engine
            .build_trade(&request, &pair(), &Reserves::new(1_000_000, 2_000_000, 1))
            .unwrap();

        assert_eq!(trade.input.amount, 1_000);
        assert_eq!(trade.output.amount, 1992);
        assert_eq!(trade.expected_amount().amount, 1992);
        assert_eq!(trade.route, vec![PairAddress::new("CPAIR")]);
        assert_eq!(trade.execution_price, Decimal::new(1992, 3));
        assert_eq!(trade.fee_amount(), 3);
        // minimum received at the default 0.5%: floor(1992 * 0.995)
        assert_eq!(trade.minimum_received(50), 1982);
        assert_eq!(trade.maximum_sent(50), 1_000);
        assert!(trade.price_impact > Decimal::ZERO);
    }

    #[test]
    fn test_build_trade_in_reverse_pair_orientation() {
        let engine = QuoteEngine::default();
        let request = TradeRequest {
            input: asset("BBB"),
            output: asset("AAA"),
            trade_type: TradeType::ExactInput,
            amount: 2_000,
        };

        let trade = engine
            .build_trade(&request, &pair(), &Reserves::new(1_000_000, 2_000_000, 1))
            .unwrap();

        // reserve_in is token_1's balance here
        assert_eq!(trade.output.amount, 996);
    }

    #[test]
    fn test_build_exact_output_trade() {
        let engine = QuoteEngine::default();
        let request = TradeRequest {
            input: asset("AAA"),
            output: asset("BBB"),
            trade_type: TradeType::ExactOutput,
            amount: 1992,
        };

        let trade = engine
            .build_trade(&request, &pair(), &Reserves::new(1_000_000, 2_000_000, 1))
            .unwrap();

        assert_eq!(trade.input.amount, 1_000);
        assert_eq!(trade.expected_amount().amount, 1_000);
        assert_eq!(trade.maximum_sent(50), 1_005);
        assert_eq!(trade.minimum_received(50), 1992);
    }

    #[test]
    fn test_build_trade_errors() {
        let engine = QuoteEngine::default();
        let request = TradeRequest {
            input: asset("AAA"),
            output: asset("CCC"),
            trade_type: TradeType::ExactInput,
            amount: 1_000,
        };
        assert!(matches!(
            engine.build_trade(&request, &pair(), &Reserves::new(1, 1, 1)),
            Err(SwapError::NoRoute { .. })
        ));

        let request = TradeRequest {
            output: asset("BBB"),
            ..request
        };
        assert!(matches!(
            engine.build_trade(&request, &pair(), &Reserves::new(0, 0, 1)),
            Err(SwapError::NoRoute { .. })
        ));

        let request = TradeRequest {
            trade_type: TradeType::ExactOutput,
            amount: 3_000_000,
            ..request
        };
        assert!(matches!(
            engine.build_trade(&request, &pair(), &Reserves::new(1_000_000, 2_000_000, 1)),
            Err(SwapError::InsufficientLiquidity { .. })
        ));
    }

    #[test]
    fn test_slippage_bounds() {
        assert_eq!(minimum_received(10_000, 50), 9_950);
        assert_eq!(minimum_received(10_000, 0), 10_000);
        assert_eq!(minimum_received(10_000, 20_000), 0);
        assert_eq!(maximum_sent(10_000, 50), 10_050);
        assert_eq!(maximum_sent(1, 50), 2);
        assert_eq!(maximum_sent(u128::MAX, 50), u128::MAX);
    }
}
