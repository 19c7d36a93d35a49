use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};

use crate::error::LoanCalcError;
use crate::types::{Money, Rate};
use crate::LoanCalcResult;

/// Fixed monthly payment that fully amortises `principal` over
/// `term_months` at the given monthly rate.
///
/// Standard annuity formula `P · r · (1+r)^n / ((1+r)^n − 1)`; a zero rate
/// degenerates to an even principal split (installment mode).
pub fn annuity_payment(
    principal: Money,
    monthly_rate: Rate,
    term_months: u32,
) -> LoanCalcResult<Money> {
    if term_months == 0 {
        return Err(LoanCalcError::InvalidInput {
            field: "term_months".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }

    if monthly_rate.is_zero() {
        return Ok(principal / Decimal::from(term_months));
    }

    let factor = (Decimal::ONE + monthly_rate).powd(Decimal::from(term_months));
    let annuity_factor = factor - Decimal::ONE;

    if annuity_factor.is_zero() {
        return Err(LoanCalcError::DivisionByZero {
            context: "annuity factor".into(),
        });
    }

    Ok(principal * monthly_rate * factor / annuity_factor)
}

/// Smallest whole number of periods that amortises `balance` to zero under
/// an unchanged `payment` at `monthly_rate`: the closed-form inverse of the
/// annuity formula, `ceil(ln(PMT / (PMT − B·r)) / ln(1+r))`.
///
/// A zero rate reduces to ceiling division of the balance by the payment.
pub fn periods_for_payment(
    balance: Money,
    monthly_rate: Rate,
    payment: Money,
) -> LoanCalcResult<u32> {
    if payment <= Decimal::ZERO {
        return Err(LoanCalcError::FinancialImpossibility(
            "payment must be positive to amortise a balance".into(),
        ));
    }

    if balance <= Decimal::ZERO {
        return Ok(0);
    }

    let periods = if monthly_rate.is_zero() {
        (balance / payment).ceil()
    } else {
        let excess = payment - balance * monthly_rate;
        if excess <= Decimal::ZERO {
            return Err(LoanCalcError::FinancialImpossibility(format!(
                "payment {payment} does not cover the interest accruing on balance {balance}"
            )));
        }
        ((payment / excess).ln() / (Decimal::ONE + monthly_rate).ln()).ceil()
    };

    periods.to_u32().ok_or_else(|| {
        LoanCalcError::FinancialImpossibility(format!(
            "amortisation period {periods} is out of range"
        ))
    })
}
