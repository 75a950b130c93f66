//! Money helpers shared by the calculators

use bigdecimal::{BigDecimal, RoundingMode};

/// Round a Ringgit amount to sen (two decimal places), half away from zero
pub fn round_money(value: &BigDecimal) -> BigDecimal {
    value.with_scale_round(2, RoundingMode::HalfUp)
}

/// Apply a percentage rate to an amount
pub fn percent_of(amount: &BigDecimal, percent: &BigDecimal) -> BigDecimal {
    (amount * percent) / BigDecimal::from(100)
}

/// Clamp negative amounts to zero
pub fn non_negative(value: BigDecimal) -> BigDecimal {
    if value < BigDecimal::from(0) {
        BigDecimal::from(0)
    } else {
        value
    }
}

/// Percent change from `previous` to `current`; zero when there is no base
pub fn percent_change(current: &BigDecimal, previous: &BigDecimal) -> BigDecimal {
    if *previous <= BigDecimal::from(0) {
        return BigDecimal::from(0);
    }
    ((current - previous) / previous) * BigDecimal::from(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: &str) -> BigDecimal {
        value.parse().unwrap()
    }

    #[test]
    fn test_round_money() {
        assert_eq!(round_money(&dec("123.454")), dec("123.45"));
        assert_eq!(round_money(&dec("123.455")), dec("123.46"));
        assert_eq!(round_money(&dec("-123.455")), dec("-123.46"));
        assert_eq!(round_money(&BigDecimal::from(4500)), dec("4500.00"));
    }

    #[test]
    fn test_percent_of() {
        assert_eq!(
            percent_of(&BigDecimal::from(3000), &BigDecimal::from(60)),
            BigDecimal::from(1800)
        );
        assert_eq!(
            percent_of(&BigDecimal::from(3000), &BigDecimal::from(6)),
            BigDecimal::from(180)
        );
    }

    #[test]
    fn test_non_negative() {
        assert_eq!(non_negative(BigDecimal::from(-5)), BigDecimal::from(0));
        assert_eq!(non_negative(BigDecimal::from(5)), BigDecimal::from(5));
    }

    #[test]
    fn test_percent_change() {
        assert_eq!(
            percent_change(&BigDecimal::from(120), &BigDecimal::from(100)),
            BigDecimal::from(20)
        );
        assert_eq!(
            percent_change(&BigDecimal::from(50), &BigDecimal::from(100)),
            BigDecimal::from(-50)
        );
        assert_eq!(
            percent_change(&BigDecimal::from(50), &BigDecimal::from(0)),
            BigDecimal::from(0)
        );
    }
}
