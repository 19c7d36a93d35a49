use chrono::{NaiveDate, Utc};
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use loan_calc_core::request::LoanRequest;
use loan_calc_core::schedule::calculate_loan;
use loan_calc_core::{affordability, annuity, rates, PaymentType};

use crate::input;

/// Payment scheme selector for the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SchemeArg {
    Annuity,
    Differentiated,
}

impl From<SchemeArg> for PaymentType {
    fn from(scheme: SchemeArg) -> Self {
        match scheme {
            SchemeArg::Annuity => PaymentType::Annuity,
            SchemeArg::Differentiated => PaymentType::Differentiated,
        }
    }
}

/// Arguments for a full schedule computation
#[derive(Args)]
pub struct CalculateArgs {
    /// Path to JSON input file (overrides individual flags; early
    /// repayments can only be declared this way)
    #[arg(long)]
    pub input: Option<String>,

    /// Principal amount
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Term in years
    #[arg(long)]
    pub term_years: Option<u32>,

    /// Annual interest rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Payment scheme
    #[arg(long, value_enum)]
    pub payment_type: Option<SchemeArg>,

    /// Interest-free installment plan (the rate may be omitted)
    #[arg(long)]
    pub installment: bool,

    /// Anchor date for the payment calendar (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub start_date: Option<NaiveDate>,
}

/// Arguments for a bare payment quote
#[derive(Args)]
pub struct PaymentArgs {
    /// Principal amount
    #[arg(long)]
    pub amount: Decimal,

    /// Term in years
    #[arg(long)]
    pub term_years: u32,

    /// Annual interest rate in percent (omit for an interest-free plan)
    #[arg(long)]
    pub rate: Option<Decimal>,
}

pub fn run_calculate(args: CalculateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: LoanRequest = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        LoanRequest {
            loan_amount: args
                .amount
                .ok_or("--amount is required (or provide --input)")?,
            term_years: args
                .term_years
                .ok_or("--term-years is required (or provide --input)")?,
            interest_rate: args.rate,
            payment_type: args.payment_type.unwrap_or(SchemeArg::Annuity).into(),
            installment: args.installment,
            early_repayments: Vec::new(),
            start_date: None,
        }
    };

    let start_date = args
        .start_date
        .or(request.start_date)
        .unwrap_or_else(|| Utc::now().date_naive());

    let result = calculate_loan(&request, start_date)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_payment(args: PaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let term_months = args
        .term_years
        .checked_mul(12)
        .ok_or("--term-years is out of range")?;
    let monthly_rate = rates::monthly_rate(args.rate.unwrap_or_default());

    let payment = annuity::annuity_payment(args.amount, monthly_rate, term_months)?.round_dp(2);

    Ok(serde_json::json!({
        "monthly_payment": payment,
        "required_income": affordability::required_income(payment),
    }))
}
