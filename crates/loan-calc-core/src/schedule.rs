//! Month-by-month schedule builder.
//!
//! The whole engine is a state machine over [`PeriodState`]: accrue
//! interest, split the payment, advance the balance, emit a row, then let
//! any early repayment scheduled for that month rework the state. All math
//! in `rust_decimal::Decimal`.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::time::Instant;

use crate::annuity;
use crate::early_repayment;
use crate::error::LoanCalcError;
use crate::rates;
use crate::request::{LoanRequest, LoanTerms};
use crate::types::{
    with_metadata, ComputationOutput, LoanResult, Money, MonthlyPayment, PaymentType, Rate,
    ScheduleRow,
};
use crate::{affordability, LoanCalcResult};

/// Minimum balance threshold below which the loan is considered fully paid.
pub(crate) const BALANCE_EPSILON: Decimal = dec!(0.01);

/// Machine state carried between periods, moved by value through every
/// transition and through the early-repayment processor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodState {
    /// Outstanding principal.
    pub balance: Money,
    /// Recurring annuity payment. Unused by the differentiated scheme.
    pub payment: Money,
    /// Constant principal portion of the differentiated scheme.
    pub principal_slice: Money,
    /// Periods left before the loan is due.
    pub remaining_term: u32,
}

/// Compute the full loan result for a validated request.
///
/// `start_date` anchors the payment calendar: row k is dated k months after
/// it. The caller resolves "today" so the engine itself never reads a clock.
pub fn calculate_loan(
    request: &LoanRequest,
    start_date: NaiveDate,
) -> LoanCalcResult<ComputationOutput<LoanResult>> {
    let started = Instant::now();

    let terms = request.validate()?;
    let monthly_rate = rates::monthly_rate(terms.annual_rate);
    let (rows, warnings) = build_schedule(&terms, monthly_rate, start_date)?;

    let mut total_overpayment = Decimal::ZERO;
    for row in &rows {
        total_overpayment += row.interest_payment;
    }
    let total_payment = terms.principal + total_overpayment;

    let first_payment = rows
        .first()
        .map(|row| row.monthly_payment)
        .ok_or_else(|| {
            LoanCalcError::FinancialImpossibility("schedule produced no periods".into())
        })?;
    let last_payment = rows
        .last()
        .map(|row| row.monthly_payment)
        .unwrap_or(first_payment);

    let (monthly_payment, income_basis) = match terms.scheme {
        PaymentType::Annuity => (MonthlyPayment::Fixed(first_payment), first_payment),
        PaymentType::Differentiated => (
            MonthlyPayment::Range {
                first: first_payment,
                last: last_payment,
            },
            first_payment.max(last_payment),
        ),
    };

    let result = LoanResult {
        monthly_payment,
        total_overpayment,
        total_payment,
        required_income: affordability::required_income(income_basis),
        payment_schedule: rows,
    };

    let elapsed = started.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Loan Amortisation Schedule",
        &serde_json::json!({
            "loan_amount": terms.principal.to_string(),
            "term_months": terms.term_months,
            "annual_rate_percent": terms.annual_rate.to_string(),
            "payment_type": terms.scheme,
        }),
        warnings,
        elapsed,
        result,
    ))
}

/// Iterate the state machine over the nominal term.
///
/// Returns the emitted rows plus non-fatal warnings (early repayments whose
/// month was never reached because the loan closed first).
pub fn build_schedule(
    terms: &LoanTerms,
    monthly_rate: Rate,
    start_date: NaiveDate,
) -> LoanCalcResult<(Vec<ScheduleRow>, Vec<String>)> {
    let nominal_term = terms.term_months;

    let mut state = PeriodState {
        balance: terms.principal,
        payment: match terms.scheme {
            PaymentType::Annuity => {
                annuity::annuity_payment(terms.principal, monthly_rate, nominal_term)?
            }
            PaymentType::Differentiated => Decimal::ZERO,
        },
        principal_slice: terms.principal / Decimal::from(nominal_term),
        remaining_term: nominal_term,
    };

    let mut rows: Vec<ScheduleRow> = Vec::with_capacity(nominal_term as usize);
    let mut warnings = Vec::new();
    let mut events = terms.events.iter().peekable();

    for month in 1..=nominal_term {
        let interest = state.balance * monthly_rate;
        let principal_part = match terms.scheme {
            PaymentType::Annuity => (state.payment - interest).min(state.balance),
            PaymentType::Differentiated => state.principal_slice.min(state.balance),
        };
        let row_payment = principal_part + interest;

        state.balance -= principal_part;
        if state.balance <= BALANCE_EPSILON {
            state.balance = Decimal::ZERO;
        }
        state.remaining_term = state.remaining_term.saturating_sub(1);

        rows.push(ScheduleRow {
            payment_number: month,
            payment_date: payment_date(start_date, month)?,
            monthly_payment: row_payment.round_dp(2),
            principal_payment: principal_part.round_dp(2),
            interest_payment: interest.round_dp(2),
            remaining_balance: state.balance.round_dp(2),
        });

        // Extra payments land right after the scheduled payment of their
        // month, in submission order.
        while let Some(event) = events.peek() {
            if event.month != month {
                break;
            }
            state = early_repayment::apply(state, event, monthly_rate, terms.scheme)?;
            events.next();
        }

        // The row closes the month, so it reflects the post-event balance.
        if let Some(last) = rows.last_mut() {
            last.remaining_balance = state.balance.round_dp(2);
        }

        if state.balance.is_zero() {
            break;
        }
    }

    for event in events {
        warnings.push(format!(
            "early repayment at month {} ignored: the loan was already repaid",
            event.month
        ));
    }

    if state.balance > Decimal::ZERO {
        return Err(LoanCalcError::ConvergenceFailure {
            function: "build_schedule".into(),
            iterations: nominal_term,
            last_delta: state.balance,
        });
    }

    Ok((rows, warnings))
}

fn payment_date(start: NaiveDate, months_after: u32) -> LoanCalcResult<NaiveDate> {
    start
        .checked_add_months(Months::new(months_after))
        .ok_or_else(|| {
            LoanCalcError::DateError(format!("cannot advance {start} by {months_after} months"))
        })
}
