//! Client-facing request model: serde shapes, separator-tolerant numeric
//! parsing, and the validation pass that turns a raw request into
//! normalised computation terms.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

use crate::early_repayment::EarlyRepayment;
use crate::error::LoanCalcError;
use crate::types::{Money, PaymentType, Rate};
use crate::LoanCalcResult;

/// A loan computation request as submitted by a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanRequest {
    /// Principal, as a JSON number or a string with thousands separators.
    #[serde(deserialize_with = "flexible_decimal")]
    pub loan_amount: Money,
    pub term_years: u32,
    /// Annual rate in percent. May be omitted only in installment mode.
    #[serde(default, deserialize_with = "flexible_decimal_opt")]
    pub interest_rate: Option<Rate>,
    #[serde(default)]
    pub payment_type: PaymentType,
    /// Interest-free installment mode: the rate is normalised to zero.
    #[serde(default)]
    pub installment: bool,
    #[serde(default)]
    pub early_repayments: Vec<EarlyRepayment>,
    /// Anchor for the payment calendar; transport layers default it to today.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

/// Validated and normalised input consumed by the schedule builder.
#[derive(Debug, Clone)]
pub struct LoanTerms {
    pub principal: Money,
    pub term_months: u32,
    /// Annual rate in percent; exactly zero in installment mode.
    pub annual_rate: Rate,
    pub scheme: PaymentType,
    /// Early repayments, stably sorted by month.
    pub events: Vec<EarlyRepayment>,
}

impl LoanRequest {
    /// Validate the request and normalise it into [`LoanTerms`].
    ///
    /// Validation short-circuits before any schedule computation.
    pub fn validate(&self) -> LoanCalcResult<LoanTerms> {
        if self.loan_amount <= Decimal::ZERO {
            return Err(invalid("loan_amount", "must be positive"));
        }
        if self.term_years == 0 {
            return Err(invalid("term_years", "must be at least one year"));
        }
        let term_months = self
            .term_years
            .checked_mul(12)
            .ok_or_else(|| invalid("term_years", "is out of range"))?;

        let annual_rate = if self.installment {
            Decimal::ZERO
        } else {
            match self.interest_rate {
                None => {
                    return Err(invalid(
                        "interest_rate",
                        "required unless installment mode is selected",
                    ))
                }
                Some(rate) if rate < Decimal::ZERO => {
                    return Err(invalid("interest_rate", "cannot be negative"))
                }
                Some(rate) if rate.is_zero() => {
                    return Err(invalid(
                        "interest_rate",
                        "a zero rate is only valid in installment mode",
                    ))
                }
                Some(rate) => rate,
            }
        };

        for event in &self.early_repayments {
            if event.month == 0 {
                return Err(invalid("early_repayments", "month must be at least 1"));
            }
            if event.amount <= Decimal::ZERO {
                return Err(invalid("early_repayments", "amount must be positive"));
            }
            if event.month > term_months {
                return Err(invalid(
                    "early_repayments",
                    &format!(
                        "month {} exceeds the {}-month term",
                        event.month, term_months
                    ),
                ));
            }
        }

        let mut events = self.early_repayments.clone();
        events.sort_by_key(|event| event.month);

        Ok(LoanTerms {
            principal: self.loan_amount,
            term_months,
            annual_rate,
            scheme: self.payment_type,
            events,
        })
    }
}

fn invalid(field: &str, reason: &str) -> LoanCalcError {
    LoanCalcError::InvalidInput {
        field: field.into(),
        reason: reason.into(),
    }
}

/// Accept a decimal as a JSON number or as a string, stripping the
/// formatting characters clients tend to leave in ("1 000 000", "1,000,000").
pub(crate) fn flexible_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(Decimal),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Ok(value),
        Raw::Text(text) => {
            let cleaned: String = text
                .chars()
                .filter(|c| !matches!(c, ' ' | ',' | '_' | '\u{a0}'))
                .collect();
            Decimal::from_str(&cleaned)
                .map_err(|_| Error::custom(format!("invalid decimal value: {text:?}")))
        }
    }
}

pub(crate) fn flexible_decimal_opt<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "flexible_decimal")] Decimal);

    Ok(Option::<Wrapper>::deserialize(deserializer)?.map(|wrapper| wrapper.0))
}
