//! Conversions between human readable decimal amounts and integer minor units.
//!
//! Every amount inside a [`crate::RoundSnapshot`] is an integer number of minor
//! units (`amount * 10^decimals`). Decimal strings only exist at the edges,
//! when reading upstream records and when presenting results.

use num_bigint::BigUint;
use num_traits::Zero;
use thiserror::Error;

/// Fractional digits of the stablecoin rounds are denominated in (USDC).
pub const DEFAULT_DECIMALS: u32 = 6;

/// Largest number of fractional digits a token may declare (ERC-20 stores
/// `decimals` in a `u8`).
pub const MAX_DECIMALS: u32 = u8::MAX as u32;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UnitsError {
    #[error("amount is empty")]
    Empty,
    #[error("amount {0:?} is negative")]
    Negative(String),
    #[error("amount {0:?} is not a decimal number")]
    Malformed(String),
    #[error("amount {amount:?} has more than {decimals} fractional digits")]
    TooPrecise { amount: String, decimals: u32 },
    #[error("{0} decimals is more than the supported {max}", max = MAX_DECIMALS)]
    UnsupportedDecimals(u32),
}

/// Parses a plain decimal string (`"12"`, `"12.5"`, `".5"`) into minor units.
///
/// Parsing is exact: amounts carrying more significant fractional digits than
/// `decimals` are rejected instead of rounded.
pub fn parse_units(amount: &str, decimals: u32) -> Result<BigUint, UnitsError> {
    if decimals > MAX_DECIMALS {
        return Err(UnitsError::UnsupportedDecimals(decimals));
    }
    if amount.is_empty() {
        return Err(UnitsError::Empty);
    }
    if amount.starts_with('-') {
        return Err(UnitsError::Negative(amount.to_string()));
    }

    let (integer, fraction) = amount.split_once('.').unwrap_or((amount, ""));
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (integer.is_empty() && fraction.is_empty()) || !all_digits(integer) || !all_digits(fraction)
    {
        return Err(UnitsError::Malformed(amount.to_string()));
    }

    let fraction = fraction.trim_end_matches('0');
    if fraction.len() > decimals as usize {
        return Err(UnitsError::TooPrecise {
            amount: amount.to_string(),
            decimals,
        });
    }

    let digits = format!(
        "{}{:0<width$}",
        integer,
        fraction,
        width = decimals as usize
    );
    if digits.is_empty() {
        return Ok(BigUint::zero());
    }
    BigUint::parse_bytes(digits.as_bytes(), 10).ok_or_else(|| UnitsError::Malformed(amount.to_string()))
}

/// Formats minor units as a decimal string, dropping trailing fractional zeros
/// (`1_500_000` with 6 decimals is `"1.5"`, `0` is `"0"`).
pub fn format_units(amount: &BigUint, decimals: u32) -> String {
    let digits = amount.to_str_radix(10);
    let decimals = decimals as usize;
    if decimals == 0 {
        return digits;
    }

    let padded = format!("{:0>width$}", digits, width = decimals + 1);
    let (integer, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        integer.to_string()
    } else {
        format!("{}.{}", integer, fraction)
    }
}

/// Rounds `amount` down so that it carries at most `precision` fractional
/// digits. A precision at or above `decimals` leaves the amount untouched.
pub fn truncate_to_precision(amount: &BigUint, decimals: u32, precision: u32) -> BigUint {
    if precision >= decimals {
        return amount.clone();
    }
    let factor = BigUint::from(10u32).pow(decimals - precision);
    (amount / &factor) * factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_whole_and_fractional_amounts() {
        assert_eq!(parse_units("12", 6).unwrap(), BigUint::from(12_000_000u64));
        assert_eq!(parse_units("12.5", 6).unwrap(), BigUint::from(12_500_000u64));
        assert_eq!(parse_units(".5", 6).unwrap(), BigUint::from(500_000u64));
        assert_eq!(parse_units("1.", 6).unwrap(), BigUint::from(1_000_000u64));
        assert_eq!(parse_units("0.000001", 6).unwrap(), BigUint::from(1u64));
        assert_eq!(parse_units("7", 0).unwrap(), BigUint::from(7u64));
        assert_eq!(parse_units("0", 6).unwrap(), BigUint::zero());
    }

    #[test]
    fn parse_ignores_trailing_fractional_zeros() {
        assert_eq!(
            parse_units("1.50000000000", 6).unwrap(),
            BigUint::from(1_500_000u64)
        );
        assert_eq!(parse_units("3.000", 0).unwrap(), BigUint::from(3u64));
    }

    #[test]
    fn parse_beyond_native_range() {
        let amount = parse_units("123456789012345678901234567890.123456", 6).unwrap();
        assert_eq!(
            amount.to_str_radix(10),
            "123456789012345678901234567890123456"
        );
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert_eq!(parse_units("", 6), Err(UnitsError::Empty));
        assert_eq!(
            parse_units("-1", 6),
            Err(UnitsError::Negative("-1".to_string()))
        );
        for malformed in [".", "abc", "1.2.3", "NaN", "inf", "1e6", "+1", " 1", "1,5"] {
            assert_eq!(
                parse_units(malformed, 6),
                Err(UnitsError::Malformed(malformed.to_string())),
                "{}",
                malformed
            );
        }
        assert_eq!(
            parse_units("1.1234567", 6),
            Err(UnitsError::TooPrecise {
                amount: "1.1234567".to_string(),
                decimals: 6
            })
        );
    }

    #[test]
    fn parse_rejects_unsupported_decimals() {
        assert_eq!(
            parse_units("1", u32::MAX),
            Err(UnitsError::UnsupportedDecimals(u32::MAX))
        );
        assert_eq!(
            parse_units("1", MAX_DECIMALS + 1),
            Err(UnitsError::UnsupportedDecimals(MAX_DECIMALS + 1))
        );
        assert_eq!(
            parse_units("1", MAX_DECIMALS).unwrap(),
            BigUint::from(10u32).pow(MAX_DECIMALS)
        );
    }

    #[test]
    fn format_trims_fraction() {
        assert_eq!(format_units(&BigUint::zero(), 6), "0");
        assert_eq!(format_units(&BigUint::from(1u64), 6), "0.000001");
        assert_eq!(format_units(&BigUint::from(1_500_000u64), 6), "1.5");
        assert_eq!(format_units(&BigUint::from(1_000_000u64), 6), "1");
        assert_eq!(format_units(&BigUint::from(1_000_123_456u64), 6), "1000.123456");
        assert_eq!(format_units(&BigUint::from(42u64), 0), "42");
    }

    #[test]
    fn truncate_rounds_down() {
        let amount = BigUint::from(3_333_333u64);
        assert_eq!(
            truncate_to_precision(&amount, 6, 2),
            BigUint::from(3_330_000u64)
        );
        assert_eq!(
            truncate_to_precision(&amount, 6, 0),
            BigUint::from(3_000_000u64)
        );
        assert_eq!(truncate_to_precision(&amount, 6, 6), amount);
        assert_eq!(truncate_to_precision(&amount, 6, 9), amount);
    }
}
