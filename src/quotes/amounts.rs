use crate::core::{SwapError, SwapResult};
use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use rust_decimal::Decimal;

/// Largest scale tried when turning an integer ratio into a `Decimal`.
const MAX_RATIO_SCALE: u32 = 18;

/// Convert a typed decimal string into a raw integer amount scaled by `decimals`.
///
/// An empty (or whitespace-only) string means "no amount yet" and yields `Ok(None)`.
/// Fractional digits beyond `decimals` are truncated. Any value that fits in
/// `u128` base units is accepted.
pub fn parse_units(raw: &str, decimals: u8) -> SwapResult<Option<u128>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let invalid = || SwapError::InputInvalid(format!("'{}' is not a number", trimmed));
    let too_large = || SwapError::InputInvalid(format!("amount too large: {}", trimmed));

    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction) {
        return Err(invalid());
    }

    let decimals = usize::from(decimals);
    let kept = &fraction[..fraction.len().min(decimals)];

    let mut amount: u128 = 0;
    let digits = whole
        .bytes()
        .chain(kept.bytes())
        .chain(std::iter::repeat(b'0').take(decimals - kept.len()));
    for digit in digits {
        amount = amount
            .checked_mul(10)
            .and_then(|a| a.checked_add(u128::from(digit - b'0')))
            .ok_or_else(too_large)?;
    }

    if negative && amount > 0 {
        return Err(SwapError::InputInvalid(format!(
            "amount cannot be negative: {}",
            trimmed
        )));
    }

    Ok(Some(amount))
}

/// Render a raw amount as a decimal string, trimming trailing zeros.
pub fn format_units(amount: u128, decimals: u8) -> String {
    let digits = amount.to_string();
    let decimals = usize::from(decimals);

    if decimals == 0 {
        return digits;
    }

    let padded = if digits.len() <= decimals {
        format!("{}{}", "0".repeat(decimals - digits.len() + 1), digits)
    } else {
        digits
    };

    let (whole, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');

    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, fraction)
    }
}

/// Exact `numerator / denominator` as a `Decimal`, using the largest scale
/// (up to 18 places) whose mantissa still fits.
pub fn ratio_to_decimal(numerator: &BigUint, denominator: &BigUint) -> SwapResult<Decimal> {
    if denominator.is_zero() {
        return Err(SwapError::MathOverflow);
    }

    for scale in (0..=MAX_RATIO_SCALE).rev() {
        let scaled = numerator * BigUint::from(10u32).pow(scale) / denominator;
        if scaled.bits() <= 96 {
            let mantissa = scaled.to_i128().ok_or(SwapError::MathOverflow)?;
            return Ok(Decimal::from_i128_with_scale(mantissa, scale).normalize());
        }
    }

    Err(SwapError::MathOverflow)
}
