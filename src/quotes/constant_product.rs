//! Constant product (`x * y = k`) pricing with a proportional input fee.
//!
//! All pricing runs on integers: intermediate products are `BigUint` so
//! that `reserve * amount * 10_000` never overflows, and the results are
//! narrowed back to `u128` at the end.

use crate::core::{SwapError, SwapResult, BPS_DENOMINATOR, DEFAULT_FEE_BPS};
use crate::quotes::amounts::ratio_to_decimal;
use log::debug;
use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use rust_decimal::Decimal;

pub struct ConstantProductCalculator {
    fee_bps: u32,
}

impl ConstantProductCalculator {
    pub fn new(fee_bps: u32) -> SwapResult<Self> {
        if fee_bps >= BPS_DENOMINATOR {
            return Err(SwapError::ConfigError(format!(
                "fee of {} bps leaves nothing to trade",
                fee_bps
            )));
        }
        Ok(Self { fee_bps })
    }

    pub fn fee_bps(&self) -> u32 {
        self.fee_bps
    }

    fn fee_complement(&self) -> BigUint {
        BigUint::from(BPS_DENOMINATOR - self.fee_bps)
    }

    fn check_reserves(reserve_in: u128, reserve_out: u128) -> SwapResult<()> {
        if reserve_in == 0 && reserve_out == 0 {
            return Err(SwapError::NoRoute {
                input: "empty pool".to_string(),
                output: "empty pool".to_string(),
            });
        }
        if reserve_in == 0 || reserve_out == 0 {
            return Err(SwapError::InvalidPair(format!(
                "one-sided reserves ({}, {})",
                reserve_in, reserve_out
            )));
        }
        Ok(())
    }

    /// Exact input: `out = reserve_out * in_after_fee / (reserve_in + in_after_fee)`,
    /// evaluated as `reserve_out * in * (D - f) / (reserve_in * D + in * (D - f))`
    /// with `D = 10_000`, rounded down.
    pub fn get_amount_out(
        &self,
        amount_in: u128,
        reserve_in: u128,
        reserve_out: u128,
    ) -> SwapResult<u128> {
        Self::check_reserves(reserve_in, reserve_out)?;

        if amount_in == 0 {
            return Err(SwapError::InputInvalid(
                "input amount must be greater than zero".to_string(),
            ));
        }

        let amount_in_with_fee = BigUint::from(amount_in) * self.fee_complement();
        let numerator = BigUint::from(reserve_out) * &amount_in_with_fee;
        let denominator =
            BigUint::from(reserve_in) * BigUint::from(BPS_DENOMINATOR) + amount_in_with_fee;

        let amount_out = (numerator / denominator)
            .to_u128()
            .ok_or(SwapError::MathOverflow)?;

        debug!(
            "Forward quote: amount_in={}, reserve_in={}, reserve_out={}, fee_bps={} -> {}",
            amount_in, reserve_in, reserve_out, self.fee_bps, amount_out
        );

        if amount_out == 0 {
            return Err(SwapError::InputInvalid(
                "input amount too small to receive any output".to_string(),
            ));
        }

        Ok(amount_out)
    }

    /// Exact output: `in = reserve_in * out * D / ((reserve_out - out) * (D - f)) + 1`.
    /// Rounded up so the pool never receives less than it needs.
    pub fn get_amount_in(
        &self,
        amount_out: u128,
        reserve_in: u128,
        reserve_out: u128,
    ) -> SwapResult<u128> {
        Self::check_reserves(reserve_in, reserve_out)?;

        if amount_out == 0 {
            return Err(SwapError::InputInvalid(
                "output amount must be greater than zero".to_string(),
            ));
        }

        if amount_out >= reserve_out {
            return Err(SwapError::InsufficientLiquidity {
                available: reserve_out,
                requested: amount_out,
            });
        }

        let numerator = BigUint::from(reserve_in)
            * BigUint::from(amount_out)
            * BigUint::from(BPS_DENOMINATOR);
        let denominator = BigUint::from(reserve_out - amount_out) * self.fee_complement();

        let amount_in = (numerator / denominator + 1u32)
            .to_u128()
            .ok_or(SwapError::MathOverflow)?;

        debug!(
            "Reverse quote: amount_out={}, reserve_in={}, reserve_out={}, fee_bps={} -> {}",
            amount_out, reserve_in, reserve_out, self.fee_bps, amount_in
        );

        Ok(amount_in)
    }
}

impl Default for ConstantProductCalculator {
    fn default() -> Self {
        Self {
            fee_bps: DEFAULT_FEE_BPS,
        }
    }
}

/// `1 - execution_price / spot_price`, i.e.
/// `(amount_in * reserve_out - amount_out * reserve_in) / (amount_in * reserve_out)`.
pub fn price_impact(
    amount_in: u128,
    amount_out: u128,
    reserve_in: u128,
    reserve_out: u128,
) -> SwapResult<Decimal> {
    if amount_in == 0 || reserve_in == 0 || reserve_out == 0 {
        return Ok(Decimal::ZERO);
    }

    let spot = BigUint::from(amount_in) * BigUint::from(reserve_out);
    let executed = BigUint::from(amount_out) * BigUint::from(reserve_in);

    if executed >= spot {
        return Ok(Decimal::ZERO);
    }

    ratio_to_decimal(&(&spot - executed), &spot)
}

/// Output units per input unit in human terms (decimals applied).
pub fn execution_price(
    amount_in: u128,
    amount_out: u128,
    decimals_in: u8,
    decimals_out: u8,
) -> SwapResult<Decimal> {
    let ten = BigUint::from(10u32);
    let numerator = BigUint::from(amount_out) * ten.pow(u32::from(decimals_in));
    let denominator = BigUint::from(amount_in) * ten.pow(u32::from(decimals_out));

    if denominator.is_zero() {
        return Ok(Decimal::ZERO);
    }

    ratio_to_decimal(&numerator, &denominator)
}
