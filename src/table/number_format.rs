//! Fixed-locale (en-US) number formatting for report values.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NumberStyle {
    /// Grouped, at most two fraction digits, trailing zeros dropped.
    Decimal,
    /// Grouped, always two fraction digits, prefixed with the currency symbol.
    Currency(String),
    /// Ratio rendered as a percentage with at most two fraction digits.
    Percent,
}

pub fn num_fmt(value: f64, style: &NumberStyle) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    match style {
        NumberStyle::Decimal => format_grouped(value, 2, true),
        NumberStyle::Percent => format!("{}%", format_grouped(value * 100.0, 2, true)),
        NumberStyle::Currency(code) => {
            let formatted = format_grouped(value.abs(), 2, false);
            let symbol = currency_symbol(code);
            if value < 0.0 && formatted.chars().any(|c| matches!(c, '1'..='9')) {
                format!("-{}{}", symbol, formatted)
            } else {
                format!("{}{}", symbol, formatted)
            }
        }
    }
}

/// `Number.prototype.toFixed` 的對應：不分組，固定小數位數
pub fn to_fixed(value: f64, digits: usize) -> String {
    let formatted = format!("{:.*}", digits, value);
    if formatted.starts_with('-') && formatted[1..].chars().all(|c| c == '0' || c == '.') {
        formatted[1..].to_string()
    } else {
        formatted
    }
}

fn currency_symbol(code: &str) -> String {
    match code.to_ascii_uppercase().as_str() {
        "USD" => "$".to_string(),
        "EUR" => "€".to_string(),
        "GBP" => "£".to_string(),
        "JPY" => "¥".to_string(),
        "INR" => "₹".to_string(),
        other => format!("{} ", other),
    }
}

fn format_grouped(value: f64, max_fraction_digits: usize, trim_zeros: bool) -> String {
    let fixed = to_fixed(value, max_fraction_digits);
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };

    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, fraction),
        None => (unsigned, ""),
    };

    let fraction = if trim_zeros {
        fraction.trim_end_matches('0')
    } else {
        fraction
    };

    let mut out = String::from(sign);
    out.push_str(&group_thousands(integer));
    if !fraction.is_empty() {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_grouping_and_trimming() {
        assert_eq!(num_fmt(1234567.0, &NumberStyle::Decimal), "1,234,567");
        assert_eq!(num_fmt(1234.5, &NumberStyle::Decimal), "1,234.5");
        assert_eq!(num_fmt(0.129, &NumberStyle::Decimal), "0.13");
        assert_eq!(num_fmt(-9876.0, &NumberStyle::Decimal), "-9,876");
        assert_eq!(num_fmt(12.0, &NumberStyle::Decimal), "12");
    }

    #[test]
    fn test_currency_keeps_two_fraction_digits() {
        let usd = NumberStyle::Currency("USD".to_string());
        assert_eq!(num_fmt(5.1, &usd), "$5.10");
        assert_eq!(num_fmt(1234.567, &usd), "$1,234.57");
        assert_eq!(num_fmt(-2.0, &usd), "-$2.00");
        assert_eq!(num_fmt(-0.001, &usd), "$0.00");
        assert_eq!(num_fmt(3.0, &NumberStyle::Currency("CHF".to_string())), "CHF 3.00");
    }

    #[test]
    fn test_percent() {
        assert_eq!(num_fmt(0.4567, &NumberStyle::Percent), "45.67%");
        assert_eq!(num_fmt(0.5, &NumberStyle::Percent), "50%");
    }

    #[test]
    fn test_to_fixed() {
        assert_eq!(to_fixed(5.1, 2), "5.10");
        assert_eq!(to_fixed(2.0, 2), "2.00");
        assert_eq!(to_fixed(-0.001, 2), "0.00");
    }

    #[test]
    fn test_non_finite_values() {
        assert_eq!(num_fmt(f64::NAN, &NumberStyle::Decimal), "NaN");
    }
}
