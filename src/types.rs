use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::{CurrencyPrecision, Money, Rate};
use crate::errors::{Result, ScheduleError};

/// unique identifier for a loan
pub type LoanId = Uuid;

/// loan terms supplied once per calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    pub annual_rate: Rate,
    pub term_months: u32,
    /// the first installment falls due one calendar month after this date
    pub start_date: NaiveDate,
}

impl LoanTerms {
    pub fn new(principal: Money, annual_rate: Rate, term_months: u32, start_date: NaiveDate) -> Self {
        Self {
            principal,
            annual_rate,
            term_months,
            start_date,
        }
    }

    pub fn builder() -> LoanTermsBuilder {
        LoanTermsBuilder::new()
    }

    /// principal rounded to the minor unit; this is the amount the schedule repays
    pub fn financed_principal(&self, precision: &CurrencyPrecision) -> Money {
        precision.round_money(self.principal)
    }

    /// check the terms before any computation starts
    pub fn validate(&self, precision: &CurrencyPrecision) -> Result<()> {
        validate_amounts(self.financed_principal(precision), self.annual_rate, self.term_months)
    }
}

pub(crate) fn validate_amounts(principal: Money, annual_rate: Rate, term_months: u32) -> Result<()> {
    if !principal.is_positive() {
        return Err(ScheduleError::invalid_argument(format!(
            "principal must be positive, got {principal}"
        )));
    }

    if annual_rate.is_negative() {
        return Err(ScheduleError::invalid_argument(format!(
            "annual rate must not be negative, got {annual_rate}"
        )));
    }

    if term_months == 0 {
        return Err(ScheduleError::invalid_argument("term must be at least one month"));
    }

    Ok(())
}

/// builder for loan terms
#[derive(Debug, Default)]
pub struct LoanTermsBuilder {
    principal: Option<Money>,
    annual_rate: Option<Rate>,
    term_months: Option<u32>,
    start_date: Option<NaiveDate>,
}

impl LoanTermsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn principal(mut self, principal: Money) -> Self {
        self.principal = Some(principal);
        self
    }

    pub fn annual_rate(mut self, rate: Rate) -> Self {
        self.annual_rate = Some(rate);
        self
    }

    pub fn term_months(mut self, months: u32) -> Self {
        self.term_months = Some(months);
        self
    }

    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    /// build and validate against the default two-digit precision
    pub fn build(self) -> Result<LoanTerms> {
        self.build_with(&CurrencyPrecision::default())
    }

    pub fn build_with(self, precision: &CurrencyPrecision) -> Result<LoanTerms> {
        let principal = self
            .principal
            .ok_or_else(|| ScheduleError::invalid_argument("principal required"))?;

        // qard hasan: no rate given means interest-free
        let annual_rate = self.annual_rate.unwrap_or(Rate::ZERO);

        let term_months = self
            .term_months
            .ok_or_else(|| ScheduleError::invalid_argument("term required"))?;

        let start_date = self
            .start_date
            .ok_or_else(|| ScheduleError::invalid_argument("start date required"))?;

        let terms = LoanTerms::new(principal, annual_rate, term_months, start_date);
        terms.validate(precision)?;
        Ok(terms)
    }
}

/// one period of an amortization schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentRow {
    pub installment_number: u32,
    pub due_date: NaiveDate,
    pub principal_amount: Money,
    pub interest_amount: Money,
    pub total_amount: Money,
    /// balance left after this installment is applied
    pub remaining_amount: Money,
}
