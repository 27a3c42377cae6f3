use num_format::{Locale, ToFormattedString};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

pub const EURO: char = '€';

/// Parse a price such as `€1,299.50` or `10 EUR`.
///
/// A leading euro sign is dropped, thousands separators are ignored and
/// parsing stops at the first character that cannot be part of the number.
pub fn parse_price(raw: &str) -> Option<Decimal> {
    let raw = raw.trim().trim_start_matches(EURO).trim_start();
    let number: String = raw
        .chars()
        .take_while(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        .filter(|c| *c != ',')
        .collect();
    Decimal::from_str(&number).ok()
}

/// Parse the leading integer of a quantity field (`2`, `2 pairs`)
pub fn parse_quantity(raw: &str) -> Option<u32> {
    let digits: String = raw
        .trim()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

/// Format an amount as euros the way an en-US locale would: `€1,234.50`
pub fn format_eur(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    let amount = rounded.abs();

    let whole = amount.trunc().to_u128().unwrap_or_default();
    let cents = (amount.fract() * Decimal::ONE_HUNDRED).to_u8().unwrap_or_default();
    let grouped = whole.to_formatted_string(&Locale::en);

    format!("{sign}{EURO}{grouped}.{cents:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_prices() {
        assert_eq!(parse_price("€10.00"), Some(Decimal::new(1000, 2)));
        assert_eq!(parse_price(" € 5.5"), Some(Decimal::new(55, 1)));
        assert_eq!(parse_price("€1,299.50"), Some(Decimal::new(129950, 2)));
        assert_eq!(parse_price("12 EUR"), Some(Decimal::new(12, 0)));
        assert_eq!(parse_price("free"), None);
        assert_eq!(parse_price(""), None);
    }

    #[test]
    fn parses_quantities() {
        assert_eq!(parse_quantity("2"), Some(2));
        assert_eq!(parse_quantity(" 3 pairs"), Some(3));
        assert_eq!(parse_quantity("two"), None);
    }

    #[test]
    fn formats_euros() {
        assert_eq!(format_eur(Decimal::new(2550, 2)), "€25.50");
        assert_eq!(format_eur(Decimal::new(0, 0)), "€0.00");
        assert_eq!(format_eur(Decimal::new(123456789, 2)), "€1,234,567.89");
        assert_eq!(format_eur(Decimal::new(100000, 2)), "€1,000.00");
        assert_eq!(format_eur(Decimal::new(-500, 2)), "-€5.00");
        assert_eq!(format_eur(Decimal::new(19995, 3)), "€20.00");
        assert_eq!(format_eur(Decimal::new(-123456, 1)), "-€12,345.60");
    }

    #[test]
    fn formats_largest_amount() {
        assert_eq!(
            format_eur(Decimal::MAX),
            "€79,228,162,514,264,337,593,543,950,335.00"
        );
    }
}
