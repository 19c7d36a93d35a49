use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use loan_calc_core::early_repayment::{EarlyRepayment, RepaymentStrategy};
use loan_calc_core::request::LoanRequest;
use loan_calc_core::schedule::calculate_loan;
use loan_calc_core::{LoanCalcError, LoanResult, MonthlyPayment, PaymentType};

fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
}

fn base_request() -> LoanRequest {
    LoanRequest {
        loan_amount: dec!(1_000_000),
        term_years: 1,
        interest_rate: Some(dec!(12)),
        payment_type: PaymentType::Annuity,
        installment: false,
        early_repayments: Vec::new(),
        start_date: None,
    }
}

fn early(month: u32, amount: Decimal, repayment_type: RepaymentStrategy) -> EarlyRepayment {
    EarlyRepayment {
        month,
        amount,
        repayment_type,
    }
}

fn run(request: &LoanRequest) -> LoanResult {
    calculate_loan(request, start_date()).unwrap().result
}

// ===========================================================================
// Annuity scheme
// ===========================================================================

#[test]
fn annuity_reference_loan() {
    // 1,000,000 over 1 year at 12% => ~88,849/month, 12 equal rows.
    let result = run(&base_request());

    assert_eq!(result.payment_schedule.len(), 12);
    match result.monthly_payment {
        MonthlyPayment::Fixed(payment) => {
            assert!((payment - dec!(88_848.79)).abs() < dec!(1));
        }
        ref other => panic!("expected a fixed payment, got {other:?}"),
    }
    assert_eq!(
        result.payment_schedule.last().unwrap().remaining_balance,
        Decimal::ZERO
    );
}

#[test]
fn annuity_principal_sums_to_loan_amount() {
    let result = run(&base_request());

    let principal_paid: Decimal = result
        .payment_schedule
        .iter()
        .map(|row| row.principal_payment)
        .sum();
    assert!((principal_paid - dec!(1_000_000)).abs() <= dec!(1));
}

#[test]
fn totals_identity_holds_exactly() {
    let result = run(&base_request());

    let interest_paid: Decimal = result
        .payment_schedule
        .iter()
        .map(|row| row.interest_payment)
        .sum();
    assert_eq!(result.total_overpayment, interest_paid);
    assert_eq!(
        result.total_payment,
        dec!(1_000_000) + result.total_overpayment
    );
}

#[test]
fn balance_is_monotonically_non_increasing() {
    let result = run(&base_request());

    let mut previous = dec!(1_000_000);
    for row in &result.payment_schedule {
        assert!(row.remaining_balance <= previous);
        assert!(row.remaining_balance >= Decimal::ZERO);
        previous = row.remaining_balance;
    }
}

#[test]
fn required_income_reflects_the_policy_ratio() {
    let result = run(&base_request());

    let MonthlyPayment::Fixed(payment) = result.monthly_payment else {
        panic!("expected a fixed payment");
    };
    assert_eq!(
        result.required_income,
        (payment / loan_calc_core::affordability::MAX_PAYMENT_TO_INCOME).round_dp(2)
    );
}

// ===========================================================================
// Differentiated scheme
// ===========================================================================

#[test]
fn differentiated_principal_is_constant_and_payment_declines() {
    let mut request = base_request();
    request.payment_type = PaymentType::Differentiated;
    let result = run(&request);

    assert_eq!(result.payment_schedule.len(), 12);
    for row in &result.payment_schedule {
        assert!((row.principal_payment - dec!(83_333.33)).abs() <= dec!(0.01));
    }
    for pair in result.payment_schedule.windows(2) {
        assert!(pair[1].monthly_payment < pair[0].monthly_payment);
    }
}

#[test]
fn differentiated_quotes_the_payment_range() {
    let mut request = base_request();
    request.payment_type = PaymentType::Differentiated;
    let result = run(&request);

    let MonthlyPayment::Range { first, last } = result.monthly_payment else {
        panic!("expected a payment range");
    };
    assert_eq!(first, result.payment_schedule[0].monthly_payment);
    assert_eq!(
        last,
        result.payment_schedule.last().unwrap().monthly_payment
    );
    // The first payment carries the most interest and drives qualification.
    assert_eq!(result.required_income, (first / dec!(0.40)).round_dp(2));
}

// ===========================================================================
// Installment mode
// ===========================================================================

#[test]
fn installment_mode_accrues_no_interest() {
    let mut request = base_request();
    request.installment = true;
    request.interest_rate = None;
    request.loan_amount = dec!(1_200_000);
    let result = run(&request);

    assert_eq!(result.payment_schedule.len(), 12);
    for row in &result.payment_schedule {
        assert_eq!(row.interest_payment, Decimal::ZERO);
        assert_eq!(row.monthly_payment, dec!(100_000));
    }
    assert_eq!(result.total_overpayment, Decimal::ZERO);
    assert_eq!(result.total_payment, dec!(1_200_000));
}

// ===========================================================================
// Early repayments
// ===========================================================================

#[test]
fn reduce_term_shortens_the_schedule_and_keeps_the_payment() {
    let mut request = base_request();
    request.early_repayments = vec![early(6, dec!(100_000), RepaymentStrategy::ReduceTerm)];
    let result = run(&request);

    let rows = &result.payment_schedule;
    assert!(rows.len() < 12);
    assert_eq!(rows.last().unwrap().remaining_balance, Decimal::ZERO);

    // Every full payment, before and after the event, is the same amount;
    // only the closing partial payment differs.
    let fixed = rows[0].monthly_payment;
    for row in &rows[..rows.len() - 1] {
        assert_eq!(row.monthly_payment, fixed);
    }
}

#[test]
fn reduce_payment_keeps_the_term_and_lowers_the_payment() {
    let mut request = base_request();
    request.early_repayments = vec![early(6, dec!(100_000), RepaymentStrategy::ReducePayment)];
    let result = run(&request);

    let rows = &result.payment_schedule;
    assert_eq!(rows.len(), 12);
    assert!(rows[6].monthly_payment < rows[5].monthly_payment);
    // The new payment holds steady for the remainder of the term.
    assert_eq!(rows[6].monthly_payment, rows[10].monthly_payment);
    assert_eq!(rows.last().unwrap().remaining_balance, Decimal::ZERO);
}

#[test]
fn early_payoff_terminates_the_schedule_immediately() {
    let mut request = base_request();
    // More than the balance remaining after six payments would be rejected;
    // pay the schedule down with a large but valid amount instead.
    request.early_repayments = vec![early(6, dec!(514_000), RepaymentStrategy::ReduceTerm)];
    let result = run(&request);

    let rows = &result.payment_schedule;
    assert!(rows.len() <= 7);
    assert_eq!(rows.last().unwrap().remaining_balance, Decimal::ZERO);
}

#[test]
fn overshooting_the_balance_is_a_domain_error() {
    let mut request = base_request();
    request.early_repayments = vec![early(6, dec!(2_000_000), RepaymentStrategy::ReduceTerm)];

    let err = calculate_loan(&request, start_date()).unwrap_err();
    assert!(matches!(err, LoanCalcError::FinancialImpossibility(_)));
    assert!(!err.is_validation());
}

#[test]
fn unreached_events_surface_as_warnings() {
    let mut request = base_request();
    request.early_repayments = vec![
        early(3, dec!(700_000), RepaymentStrategy::ReduceTerm),
        early(11, dec!(10_000), RepaymentStrategy::ReduceTerm),
    ];
    let output = calculate_loan(&request, start_date()).unwrap();

    assert!(output.result.payment_schedule.len() < 11);
    assert_eq!(output.warnings.len(), 1);
    assert!(output.warnings[0].contains("month 11"));
}

// ===========================================================================
// Validation and serialization
// ===========================================================================

#[test]
fn invalid_request_produces_no_schedule() {
    let mut request = base_request();
    request.loan_amount = dec!(-5);

    let err = calculate_loan(&request, start_date()).unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn result_serializes_to_the_wire_contract() {
    let result = run(&base_request());
    let value = serde_json::to_value(&result).unwrap();

    for field in [
        "monthly_payment",
        "total_overpayment",
        "total_payment",
        "required_income",
        "payment_schedule",
    ] {
        assert!(value.get(field).is_some(), "missing field {field}");
    }

    let row = &value["payment_schedule"][0];
    assert_eq!(row["payment_number"], 1);
    assert_eq!(row["payment_date"], "2025-02-15");
}
