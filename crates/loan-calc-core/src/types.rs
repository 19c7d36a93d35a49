use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.01 = 1% per month). Never as percentages.
pub type Rate = Decimal;

/// Payment scheme for the recurring installment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    /// Fixed total payment; interest share shrinks, principal share grows.
    #[default]
    Annuity,
    /// Fixed principal share; total payment declines over the term.
    Differentiated,
}

/// One settled period of the schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub payment_number: u32,
    pub payment_date: NaiveDate,
    pub monthly_payment: Money,
    pub principal_payment: Money,
    pub interest_payment: Money,
    pub remaining_balance: Money,
}

/// The headline payment figure of a schedule.
///
/// Annuity schedules quote a single fixed amount; differentiated schedules
/// quote the declining range and serialize it as `"<first> ... <last>"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonthlyPayment {
    Fixed(Money),
    Range { first: Money, last: Money },
}

impl Serialize for MonthlyPayment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MonthlyPayment::Fixed(payment) => Serialize::serialize(payment, serializer),
            MonthlyPayment::Range { first, last } => {
                serializer.serialize_str(&format!("{first} ... {last}"))
            }
        }
    }
}

/// Aggregate result of a loan computation.
#[derive(Debug, Clone, Serialize)]
pub struct LoanResult {
    pub monthly_payment: MonthlyPayment,
    pub total_overpayment: Money,
    pub total_payment: Money,
    pub required_income: Money,
    pub payment_schedule: Vec<ScheduleRow>,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
