use rust_decimal::{Decimal, RoundingStrategy};

/// Format an amount as whole naira, e.g. `₦1,850,000`.
///
/// Kobo are rounded half away from zero.
#[must_use]
pub fn format_naira(amount: Decimal) -> String {
    let rounded = amount
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .trunc();
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}\u{20a6}{}", group_digits(&rounded.abs().to_string()))
}

/// Format a count with thousands separators, e.g. `1,247`.
#[must_use]
pub fn format_count(count: u64) -> String {
    group_digits(&count.to_string())
}

fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_whole_naira_with_separators() {
        assert_eq!(format_naira(Decimal::from(1_850_000)), "₦1,850,000");
        assert_eq!(format_naira(Decimal::from(45_000)), "₦45,000");
        assert_eq!(format_naira(Decimal::from(500)), "₦500");
        assert_eq!(format_naira(Decimal::ZERO), "₦0");
    }

    #[test]
    fn rounds_kobo_half_away_from_zero() {
        assert_eq!(format_naira(Decimal::new(337_550, 2)), "₦3,376");
        assert_eq!(format_naira(Decimal::new(337_549, 2)), "₦3,375");
    }

    #[test]
    fn negative_amounts_get_leading_minus() {
        assert_eq!(format_naira(Decimal::from(-20_000)), "-₦20,000");
        assert_eq!(format_naira(Decimal::new(-4, 1)), "₦0");
    }

    #[test]
    fn counts_group_thousands() {
        assert_eq!(format_count(1_247), "1,247");
        assert_eq!(format_count(156), "156");
        assert_eq!(format_count(1_000_000), "1,000,000");
    }
}
