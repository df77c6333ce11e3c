use std::fmt;

use fractic_server_error::ServerError;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::UnsupportedCurrency;

/// The closed currency set from §6: VES, USD, EUR. Handlers reject any other
/// tag at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    Ves,
    Usd,
    Eur,
}

impl Currency {
    pub fn code(self) -> &'static str {
        match self {
            Currency::Ves => "VES",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
        }
    }

    pub fn parse(code: &str) -> Result<Self, ServerError> {
        match code {
            "VES" => Ok(Currency::Ves),
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            other => Err(UnsupportedCurrency::new(other)),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Tolerance used everywhere two decimal amounts are compared, per §7/§8.
pub const TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 3);

/// `round(x, 2)`, banker's-rounding-free (half away from zero), matching the
/// source's `round(amount, 2)` arithmetic boundary contract.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `a <= b` within `TOLERANCE`.
pub fn le_tolerant(a: Decimal, b: Decimal) -> bool {
    a <= b + TOLERANCE
}

/// `a >= b` within `TOLERANCE`.
pub fn ge_tolerant(a: Decimal, b: Decimal) -> bool {
    a + TOLERANCE >= b
}

/// `a == b` within `TOLERANCE`.
pub fn eq_tolerant(a: Decimal, b: Decimal) -> bool {
    (a - b).abs() <= TOLERANCE
}

/// Clamp a decimal at zero from below, rounded to 2dp — the `max(0, round(A,
/// 2))` step that closes out scholarship application (§4.2) and global
/// charge application (§4.5).
pub fn clamp_non_negative(value: Decimal) -> Decimal {
    round2(value).max(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn round2_rounds_half_away_from_zero() {
        assert_eq!(round2(dec!(3.005)), dec!(3.01));
        assert_eq!(round2(dec!(-3.005)), dec!(-3.01));
    }

    #[test]
    fn tolerant_comparisons_absorb_the_0_001_drift() {
        assert!(eq_tolerant(dec!(100.0001), dec!(100.0)));
        assert!(!eq_tolerant(dec!(100.01), dec!(100.0)));
    }

    #[test]
    fn clamp_non_negative_floors_at_zero() {
        assert_eq!(clamp_non_negative(dec!(-5.00)), Decimal::ZERO);
        assert_eq!(clamp_non_negative(dec!(12.345)), dec!(12.35));
    }

    #[test]
    fn currency_parse_rejects_unknown_codes() {
        assert!(Currency::parse("VES").is_ok());
        assert!(Currency::parse("BTC").is_err());
    }
}
