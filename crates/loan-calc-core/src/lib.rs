pub mod affordability;
pub mod annuity;
pub mod early_repayment;
pub mod error;
pub mod rates;
pub mod request;
pub mod schedule;
pub mod types;

pub use error::LoanCalcError;
pub use types::*;

/// Standard result type for all loan-calc operations
pub type LoanCalcResult<T> = Result<T, LoanCalcError>;
