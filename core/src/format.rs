//! Number formatting for narrative text.

/// A rounded rate as it reads in prose: integral values keep one decimal
/// ("20.0"), others print in shortest form ("27.45").
pub fn rate(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// Integer with comma thousands separators.
pub fn thousands(n: usize) -> String {
    group_digits(&n.to_string())
}

/// Dollar amount with thousands separators and fixed decimals,
/// e.g. `currency(1234.5, 2) == "$1,234.50"`.
pub fn currency(amount: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, amount.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let sign = if amount < 0.0 && formatted.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(f) => format!("{sign}${}.{f}", group_digits(int_part)),
        None => format!("{sign}${}", group_digits(int_part)),
    }
}

fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_keeps_one_decimal_for_integral_values() {
        assert_eq!(rate(20.0), "20.0");
        assert_eq!(rate(27.45), "27.45");
        assert_eq!(rate(0.0), "0.0");
        assert_eq!(rate(16.3), "16.3");
    }

    #[test]
    fn thousands_groups_digits() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1000), "1,000");
        assert_eq!(thousands(2037), "2,037");
        assert_eq!(thousands(1234567), "1,234,567");
    }

    #[test]
    fn currency_formats_with_separators() {
        assert_eq!(currency(1234.5, 2), "$1,234.50");
        assert_eq!(currency(10_185_000.0, 0), "$10,185,000");
        assert_eq!(currency(0.0, 2), "$0.00");
        assert_eq!(currency(-5000.0, 0), "-$5,000");
    }
}
