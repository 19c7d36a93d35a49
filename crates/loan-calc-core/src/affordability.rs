use rust_decimal_macros::dec;

use crate::types::{Money, Rate};

/// Maximum share of monthly income the recurring payment may consume.
/// Qualifying-income policy constant.
pub const MAX_PAYMENT_TO_INCOME: Rate = dec!(0.40);

/// Minimum monthly income that qualifies for the given recurring payment.
///
/// For differentiated schedules the caller passes the larger end of the
/// payment range, so qualification holds for every period.
pub fn required_income(payment_basis: Money) -> Money {
    (payment_basis / MAX_PAYMENT_TO_INCOME).round_dp(2)
}
