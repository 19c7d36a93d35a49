use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::annuity;
use crate::error::LoanCalcError;
use crate::schedule::{PeriodState, BALANCE_EPSILON};
use crate::types::{Money, PaymentType, Rate};
use crate::LoanCalcResult;

/// What a one-off extra payment adjusts once the principal is reduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepaymentStrategy {
    /// Keep the recurring payment, finish earlier.
    ReduceTerm,
    /// Keep the term, lower the recurring payment.
    ReducePayment,
}

/// A one-off extra payment, applied right after the scheduled payment of
/// its month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EarlyRepayment {
    /// 1-indexed payment number the extra payment lands on.
    pub month: u32,
    #[serde(deserialize_with = "crate::request::flexible_decimal")]
    pub amount: Money,
    pub repayment_type: RepaymentStrategy,
}

/// Deduct the extra payment from the balance and rework the rest of the
/// schedule according to the declared strategy.
///
/// An amount above the remaining balance is rejected; an amount equal to it
/// closes the loan on the spot.
pub fn apply(
    mut state: PeriodState,
    event: &EarlyRepayment,
    monthly_rate: Rate,
    scheme: PaymentType,
) -> LoanCalcResult<PeriodState> {
    if event.amount > state.balance {
        return Err(LoanCalcError::FinancialImpossibility(format!(
            "early repayment of {} at month {} exceeds the remaining balance {}",
            event.amount, event.month, state.balance
        )));
    }

    state.balance -= event.amount;

    if state.balance <= BALANCE_EPSILON {
        state.balance = Decimal::ZERO;
        state.remaining_term = 0;
        return Ok(state);
    }

    match (event.repayment_type, scheme) {
        (RepaymentStrategy::ReduceTerm, PaymentType::Annuity) => {
            state.remaining_term =
                annuity::periods_for_payment(state.balance, monthly_rate, state.payment)?;
        }
        (RepaymentStrategy::ReduceTerm, PaymentType::Differentiated) => {
            // The principal slice stays put, so the term is plain ceiling
            // division of what is left.
            state.remaining_term =
                annuity::periods_for_payment(state.balance, Decimal::ZERO, state.principal_slice)?;
        }
        (RepaymentStrategy::ReducePayment, _) if state.remaining_term == 0 => {
            return Err(LoanCalcError::FinancialImpossibility(format!(
                "no periods remain at month {} to spread the reduced payment over",
                event.month
            )));
        }
        (RepaymentStrategy::ReducePayment, PaymentType::Annuity) => {
            state.payment =
                annuity::annuity_payment(state.balance, monthly_rate, state.remaining_term)?;
        }
        (RepaymentStrategy::ReducePayment, PaymentType::Differentiated) => {
            state.principal_slice = state.balance / Decimal::from(state.remaining_term);
        }
    }

    Ok(state)
}
