use super::{Amount, AmountError};
use anyhow::{anyhow, Result};
use rust_decimal::Decimal;
use std::str::FromStr;

#[test]
fn test_amount_successfully_parses_valid_strings() -> Result<()> {
    let test_cases = vec![
        ("1.0", "1.0"),
        ("1.1234", "1.1234"),
        ("-1.5", "-1.5"),
        ("  6000  ", "6000"),
        ("+10000.01", "10000.01"),
        ("0.0001", "0.0001"),
    ];

    for (input_string, expected_output) in test_cases {
        assert_eq!(Amount::from_str(input_string)?.to_string(), expected_output);
    }

    Ok(())
}

#[test]
fn test_amount_fails_to_parse_invalid_strings() {
    assert!(matches!(Amount::from_str(""), Err(AmountError::InvalidFormat(_))));
    assert!(matches!(Amount::from_str("abc"), Err(AmountError::InvalidFormat(_))));
    assert!(matches!(Amount::from_str("1.2.3"), Err(AmountError::InvalidFormat(_))));
    assert!(matches!(Amount::from_str(".5"), Err(AmountError::InvalidFormat(_))));
    assert!(matches!(Amount::from_str("5."), Err(AmountError::InvalidFormat(_))));
    assert!(matches!(Amount::from_str("12 USD"), Err(AmountError::InvalidFormat(_))));
}

#[test]
fn test_lenient_parse_reads_the_leading_number() -> Result<()> {
    let test_cases = vec![
        ("1200.50 USD", "1200.50"),
        ("  42abc", "42"),
        (".5", "0.5"),
        ("-.25", "-0.25"),
        ("7.", "7"),
        ("15000", "15000"),
        ("3.14.15", "3.14"),
        ("6e3", "6000"),
        ("-2E3", "-2000"),
        ("3e+2 EUR", "300"),
        ("5.e3", "5000"),
        ("7e", "7"),
        ("7e-", "7"),
    ];

    for (input_string, expected_output) in test_cases {
        let amount = Amount::parse_lenient(input_string)
            .ok_or_else(|| anyhow!("[{input_string}] should have parsed"))?;

        assert_eq!(amount.to_string(), expected_output);
    }

    Ok(())
}

#[test]
fn test_lenient_parse_applies_exponent_notation() -> Result<()> {
    let test_cases = vec![
        ("1.5E2", "150"),
        ("25e-1", "2.5"),
        ("1e4", "10000"),
        (".5e1", "5"),
    ];

    for (input_string, expected_value) in test_cases {
        let amount = Amount::parse_lenient(input_string)
            .ok_or_else(|| anyhow!("[{input_string}] should have parsed"))?;

        assert_eq!(amount.value(), Decimal::from_str(expected_value)?);
    }

    assert_eq!(Amount::parse_lenient("1e400").map(|amount| amount.value()), Some(Decimal::MAX));
    assert_eq!(Amount::parse_lenient("-1e400").map(|amount| amount.value()), Some(Decimal::MIN));
    assert_eq!(Amount::parse_lenient("1e-400").map(|amount| amount.value()), Some(Decimal::ZERO));
    assert!(Amount::parse_lenient("e3").is_none());

    Ok(())
}

#[test]
fn test_lenient_parse_rejects_values_without_a_leading_number() {
    assert!(Amount::parse_lenient("").is_none());
    assert!(Amount::parse_lenient("   ").is_none());
    assert!(Amount::parse_lenient("abc").is_none());
    assert!(Amount::parse_lenient("USD 100").is_none());
    assert!(Amount::parse_lenient("-").is_none());
    assert!(Amount::parse_lenient(".").is_none());
}

#[test]
fn test_lenient_parse_saturates_values_outside_of_decimal_range() -> Result<()> {
    let huge = "9".repeat(40);

    assert_eq!(Amount::parse_lenient(&huge).map(|amount| amount.value()), Some(Decimal::MAX));
    assert_eq!(Amount::parse_lenient(&format!("-{huge}")).map(|amount| amount.value()), Some(Decimal::MIN));
    assert!(matches!(Amount::from_str(&huge), Err(AmountError::Overflow)));

    Ok(())
}

#[test]
fn test_amount_ordering_follows_numeric_value() -> Result<()> {
    assert!(Amount::from_str("5000.01")? > Amount::from_str("5000")?);
    assert!(Amount::from_str("-1")? < Amount::zero());
    assert_eq!(Amount::from_str("10.50")?.value(), Decimal::from_str("10.5")?);

    Ok(())
}
