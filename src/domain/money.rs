//! Currency text as printed in the report.

use crate::domain::error::ReportError;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

static NUMERIC_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\d.,]+").expect("valid numeric run regex"));

/// Parse the first run of digits, dots and commas as an unsigned amount.
///
/// Signs and currency symbols are ignored: `"($1,250.50)"` parses to
/// `1250.50`. Callers derive the sign from other columns.
pub fn parse_currency(column: &str, text: &str) -> Result<Decimal, ReportError> {
    let failure = || ReportError::NumericParseFailure {
        column: column.to_string(),
        value: text.to_string(),
    };

    let run = NUMERIC_RUN_RE.find(text).ok_or_else(failure)?;
    let digits = run.as_str().replace(',', "");
    Decimal::from_str(&digits).map_err(|_| failure())
}

/// `a + b`, or `AmountOverflow` naming `what` was being summed.
pub fn checked_sum(what: &str, a: Decimal, b: Decimal) -> Result<Decimal, ReportError> {
    a.checked_add(b).ok_or_else(|| ReportError::AmountOverflow {
        what: what.to_string(),
    })
}

/// Render an amount the way the report family does: `0`, `100$`, `12.50$`.
pub fn format_currency(value: Decimal) -> String {
    if value.is_zero() {
        "0".to_string()
    } else if value.fract().is_zero() {
        format!("{}$", value.trunc().normalize())
    } else {
        format!("{:.2}$", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parses_dollar_amount() {
        assert_eq!(parse_currency("p", "$100").unwrap(), dec!(100));
        assert_eq!(parse_currency("p", "$1,250.50").unwrap(), dec!(1250.50));
    }

    #[test]
    fn ignores_accounting_parentheses() {
        assert_eq!(parse_currency("p", "($50.00)").unwrap(), dec!(50.00));
    }

    #[test]
    fn takes_first_numeric_run_only() {
        assert_eq!(parse_currency("p", "$12 (3 trades)").unwrap(), dec!(12));
    }

    #[test]
    fn no_digits_is_numeric_failure() {
        let err = parse_currency("Net Profit", "n/a").unwrap_err();
        assert!(matches!(
            err,
            ReportError::NumericParseFailure { ref column, ref value }
                if column == "Net Profit" && value == "n/a"
        ));
        assert!(parse_currency("p", "").is_err());
    }

    #[test]
    fn lone_separators_are_numeric_failure() {
        assert!(parse_currency("p", "...").is_err());
    }

    #[test]
    fn checked_sum_reports_overflow() {
        assert_eq!(checked_sum("p", dec!(1.5), dec!(-0.5)).unwrap(), dec!(1.0));
        let err = checked_sum("daily profit", Decimal::MAX, Decimal::MAX).unwrap_err();
        assert!(matches!(err, ReportError::AmountOverflow { ref what } if what == "daily profit"));
    }

    #[test]
    fn formats_like_report() {
        assert_eq!(format_currency(Decimal::ZERO), "0");
        assert_eq!(format_currency(dec!(100.00)), "100$");
        assert_eq!(format_currency(dec!(-50)), "-50$");
        assert_eq!(format_currency(dec!(12.5)), "12.50$");
    }
}
