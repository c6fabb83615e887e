use crate::types::errors::AmountError;
use rust_decimal::Decimal;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use tracing::debug;

/// A transaction amount as entered on the form.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd)]
pub struct Amount(Decimal);

impl Amount {
    pub fn zero() -> Self {
        Amount(Decimal::ZERO)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Parses the leading numeric portion of a form value and ignores whatever trails it,
    /// so `"1200.50 USD"` reads as `1200.50` and `"6e3"` reads as `6000`.
    ///
    /// Returns `None` when the value does not start with a number. Values too large for a
    /// `Decimal` saturate instead of failing.
    pub fn parse_lenient(value: &str) -> Option<Amount> {
        let prefix = numeric_prefix(value.trim())?;

        let mantissa = match Amount::from_str(&prefix.mantissa) {
            Ok(amount) => amount.0,
            Err(AmountError::Overflow) => return Some(saturated(prefix.mantissa.starts_with('-'))),
            Err(error) => {
                debug!("Amount prefix [{}] could not be parsed: {error}", prefix.mantissa);
                return None
            }
        };

        match scale_by_power_of_ten(mantissa, prefix.exponent) {
            Some(scaled) => Some(Amount(scaled)),
            None => Some(saturated(mantissa.is_sign_negative()))
        }
    }
}

/// Upper bound on the powers of ten applied; any nonzero value has overflowed or rounded
/// to zero well before this.
const MAX_EXPONENT_STEPS: u64 = 64;

struct NumericPrefix {
    mantissa: String,
    exponent: i64
}

fn saturated(is_negative: bool) -> Amount {
    if is_negative { Amount(Decimal::MIN) } else { Amount(Decimal::MAX) }
}

fn scale_by_power_of_ten(value: Decimal, exponent: i64) -> Option<Decimal> {
    let mut scaled = value;

    for _ in 0..exponent.unsigned_abs().min(MAX_EXPONENT_STEPS) {
        scaled = if exponent > 0 {
            scaled.checked_mul(Decimal::TEN)?
        } else {
            scaled.checked_div(Decimal::TEN)?
        };
    }

    Some(scaled)
}

fn numeric_prefix(value: &str) -> Option<NumericPrefix> {
    let (sign, rest) = match value.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", value.strip_prefix('+').unwrap_or(value))
    };

    let integer: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    let mut tail = &rest[integer.len()..];
    let fraction: String = match tail.strip_prefix('.') {
        Some(after_point) => {
            let digits: String = after_point.chars().take_while(|c| c.is_ascii_digit()).collect();
            tail = &after_point[digits.len()..];
            digits
        },
        None => String::new()
    };

    let mantissa = match (integer.is_empty(), fraction.is_empty()) {
        (true, true) => return None,
        (true, false) => format!("{sign}0.{fraction}"),
        (false, true) => format!("{sign}{integer}"),
        (false, false) => format!("{sign}{integer}.{fraction}")
    };

    Some(NumericPrefix { mantissa, exponent: exponent_suffix(tail) })
}

/// Reads an `e`/`E` exponent directly after the mantissa. A marker without digits is not
/// an exponent and reads as `0`.
fn exponent_suffix(tail: &str) -> i64 {
    let Some(after_marker) = tail.strip_prefix(|c: char| c == 'e' || c == 'E') else {
        return 0
    };

    let (is_negative, unsigned) = match after_marker.strip_prefix('-') {
        Some(unsigned) => (true, unsigned),
        None => (false, after_marker.strip_prefix('+').unwrap_or(after_marker))
    };

    let digits: String = unsigned.chars().take_while(|c| c.is_ascii_digit()).collect();

    if digits.is_empty() {
        return 0
    }

    let magnitude: i64 = digits.parse().unwrap_or(i64::MAX);

    if is_negative { -magnitude } else { magnitude }
}

impl Display for Amount {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();

        if value.is_empty() {
            return Err(AmountError::InvalidFormat("Value is an empty string".to_string()));
        }

        let is_negative = value.starts_with('-');
        let unsigned = value.strip_prefix(|c: char| c == '-' || c == '+').unwrap_or(value);
        let parts: Vec<&str> = unsigned.split('.').collect();

        if parts.len() > 2 {
            return Err(AmountError::InvalidFormat("Value has more than one decimal point".to_string()));
        }

        if parts.iter().any(|part| part.is_empty() || !part.chars().all(|c| c.is_ascii_digit())) {
            return Err(AmountError::InvalidFormat(format!("Value [{value}] is not a plain decimal number")));
        }

        //NOTE: The format is already validated above, the only remaining failure is a value outside of the Decimal range
        let parsed = Decimal::from_str(unsigned).map_err(|_| AmountError::Overflow)?;

        Ok(Amount(if is_negative { -parsed } else { parsed }))
    }
}
