//! Decimal money amounts held as integer minor units.
//!
//! The backend stores fees, salaries and payments as `numeric` columns and
//! returns them as JSON numbers or strings. Amounts are parsed digit by digit
//! into hundredths so sums never pass through floating point.

use std::fmt;
use std::iter::Sum;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const MINOR_DIGITS: usize = 2;
const MINOR_PER_MAJOR: i64 = 100;

/// Error returned when a decimal amount cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAmountError {
    raw: String,
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid money amount '{}'", self.raw)
    }
}

impl std::error::Error for ParseAmountError {}

/// A money amount with two fractional digits.
///
/// # Examples
/// ```
/// use edtech_console::domain::Amount;
///
/// let fee: Amount = "1500.5".parse().expect("valid amount");
/// assert_eq!(fee.minor_units(), 150_050);
/// assert_eq!(fee.to_string(), "1500.50");
///
/// let total: Amount = [fee, Amount::from_minor(50)].into_iter().sum();
/// assert_eq!(total.to_string(), "1501.00");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i64);

impl Amount {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Build an amount from hundredths.
    pub const fn from_minor(minor_units: i64) -> Self {
        Self(minor_units)
    }

    /// Amount in hundredths.
    pub const fn minor_units(self) -> i64 {
        self.0
    }

    /// Add, saturating at the numeric bounds.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl FromStr for Amount {
    type Err = ParseAmountError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let error = || ParseAmountError {
            raw: raw.to_owned(),
        };
        let trimmed = raw.trim();
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        let digits_only = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty())
            || !digits_only(whole)
            || !digits_only(fraction)
        {
            return Err(error());
        }

        // Digits beyond hundredths round half away from zero.
        let (kept, dropped) = fraction.split_at(fraction.len().min(MINOR_DIGITS));
        let round_up = dropped.chars().next().is_some_and(|c| c >= '5');

        let major = if whole.is_empty() {
            0
        } else {
            whole.parse::<i64>().map_err(|_| error())?
        };
        let mut minor = 0_i64;
        for position in 0..MINOR_DIGITS {
            let digit = kept
                .chars()
                .nth(position)
                .and_then(|c| c.to_digit(10))
                .map_or(0, i64::from);
            minor = minor * 10 + digit;
        }
        if round_up {
            minor += 1;
        }

        let value = major
            .checked_mul(MINOR_PER_MAJOR)
            .and_then(|cents| cents.checked_add(minor))
            .ok_or_else(error)?;
        Ok(Self(if negative { -value } else { value }))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        let per_major = MINOR_PER_MAJOR.unsigned_abs();
        write!(
            f,
            "{sign}{}.{:02}",
            magnitude / per_major,
            magnitude % per_major
        )
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}

struct AmountVisitor;

impl Visitor<'_> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal amount as a number or string")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        value
            .checked_mul(MINOR_PER_MAJOR)
            .map(Amount)
            .ok_or_else(|| E::custom(format!("amount {value} overflows")))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        let signed = i64::try_from(value).map_err(|_| E::custom("amount overflows"))?;
        self.visit_i64(signed)
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        // serde_json prints the shortest decimal that round-trips, which is the
        // literal the backend sent.
        self.visit_str(&value.to_string())
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        value.parse().map_err(E::custom)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0", 0)]
    #[case("12", 1_200)]
    #[case("12.3", 1_230)]
    #[case("12.34", 1_234)]
    #[case("12.340", 1_234)]
    #[case(".5", 50)]
    #[case("7.", 700)]
    #[case("-4.05", -405)]
    #[case("+3", 300)]
    #[case("12.344", 1_234)]
    #[case("12.345", 1_235)]
    #[case("0.999", 100)]
    #[case("-0.005", -1)]
    fn parses_decimal_strings(#[case] raw: &str, #[case] minor: i64) {
        assert_eq!(raw.parse::<Amount>(), Ok(Amount::from_minor(minor)));
    }

    #[rstest]
    #[case("")]
    #[case(".")]
    #[case("1,50")]
    #[case("abc")]
    #[case("1.2.3")]
    fn rejects_malformed_strings(#[case] raw: &str) {
        assert!(raw.parse::<Amount>().is_err(), "{raw} should be rejected");
    }

    #[rstest]
    #[case("1500", 150_000)]
    #[case("1500.75", 150_075)]
    #[case("\"2500.10\"", 250_010)]
    #[case("0.1", 10)]
    #[case("33.333", 3_333)]
    fn deserialises_numbers_and_strings(#[case] json: &str, #[case] minor: i64) {
        let amount: Amount = serde_json::from_str(json).expect("decode amount");
        assert_eq!(amount.minor_units(), minor);
    }

    #[test]
    fn displays_two_fraction_digits() {
        assert_eq!(Amount::from_minor(5).to_string(), "0.05");
        assert_eq!(Amount::from_minor(-1_999).to_string(), "-19.99");
    }

    #[test]
    fn sum_saturates_instead_of_overflowing() {
        let total: Amount = [Amount::from_minor(i64::MAX), Amount::from_minor(1)]
            .into_iter()
            .sum();
        assert_eq!(total, Amount::from_minor(i64::MAX));
    }
}
