use rust_decimal_macros::dec;

use crate::types::Rate;

/// Convert a nominal annual rate in percent (12.0 = 12%) to the monthly
/// periodic rate used by the schedule: `annual / 100 / 12`.
///
/// Zero in, zero out: installment-mode requests flow through the same
/// schedule machinery without a division anywhere on the rate itself.
pub fn monthly_rate(annual_percent: Rate) -> Rate {
    annual_percent / dec!(100) / dec!(12)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn twelve_percent_is_one_percent_monthly() {
        assert_eq!(monthly_rate(dec!(12)), dec!(0.01));
    }

    #[test]
    fn fractional_annual_rate() {
        // 10.5% / 12 = 0.875% per month
        assert_eq!(monthly_rate(dec!(10.5)), dec!(0.00875));
    }

    #[test]
    fn zero_rate_stays_exactly_zero() {
        assert_eq!(monthly_rate(Decimal::ZERO), Decimal::ZERO);
    }
}
