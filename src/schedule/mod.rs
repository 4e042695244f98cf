pub mod generator;
pub mod payment;
pub mod verify;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::{CurrencyPrecision, Money};
use crate::errors::Result;
use crate::types::{InstallmentRow, LoanTerms};

pub use generator::{generate_schedule, generate_schedule_with};
pub use payment::{compute_level_payment, compute_level_payment_with};
pub use verify::verify_schedule;

/// a generated schedule together with the terms and totals it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub terms: LoanTerms,
    pub level_payment: Money,
    pub installments: Vec<InstallmentRow>,
    pub total_interest: Money,
    pub total_paid: Money,
}

impl AmortizationSchedule {
    /// generate and verify a schedule
    ///
    /// The stored terms carry the principal rounded to the minor unit.
    pub fn generate(mut terms: LoanTerms, precision: &CurrencyPrecision) -> Result<Self> {
        terms.principal = terms.financed_principal(precision);
        let level_payment =
            compute_level_payment_with(terms.principal, terms.annual_rate, terms.term_months, precision)?;
        let installments = generate_schedule_with(&terms, precision)?;
        verify_schedule(&terms, &installments, precision)?;

        let total_interest = installments.iter().map(|r| r.interest_amount).sum();
        let total_paid = installments.iter().map(|r| r.total_amount).sum();

        Ok(Self {
            terms,
            level_payment,
            installments,
            total_interest,
            total_paid,
        })
    }

    /// get installment by its 1-based number
    pub fn get(&self, installment_number: u32) -> Option<&InstallmentRow> {
        installment_number
            .checked_sub(1)
            .and_then(|i| self.installments.get(i as usize))
    }

    /// due date of the final installment
    pub fn maturity_date(&self) -> Option<NaiveDate> {
        self.installments.last().map(|r| r.due_date)
    }

    pub fn next_due(&self, as_of: NaiveDate) -> Option<&InstallmentRow> {
        next_due(&self.installments, as_of)
    }

    pub fn elapsed(&self, as_of: NaiveDate) -> &[InstallmentRow] {
        elapsed(&self.installments, as_of)
    }

    pub fn balance_as_of(&self, as_of: NaiveDate) -> Money {
        balance_as_of(&self.installments, self.terms.principal, as_of)
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// first installment falling due on or after the given date
pub fn next_due(rows: &[InstallmentRow], as_of: NaiveDate) -> Option<&InstallmentRow> {
    rows.iter().find(|r| r.due_date >= as_of)
}

/// installments whose due date is strictly before the given date
pub fn elapsed(rows: &[InstallmentRow], as_of: NaiveDate) -> &[InstallmentRow] {
    let count = rows.partition_point(|r| r.due_date < as_of);
    &rows[..count]
}

/// scheduled balance once every installment due before `as_of` has been paid
pub fn balance_as_of(rows: &[InstallmentRow], principal: Money, as_of: NaiveDate) -> Money {
    elapsed(rows, as_of)
        .last()
        .map(|r| r.remaining_amount)
        .unwrap_or(principal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Rate;
    use rust_decimal_macros::dec;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> AmortizationSchedule {
        let terms = LoanTerms::new(
            Money::from_major(100_000),
            Rate::from_percent(dec!(6)),
            24,
            ymd(2024, 1, 1),
        );
        AmortizationSchedule::generate(terms, &CurrencyPrecision::default()).unwrap()
    }

    #[test]
    fn test_totals() {
        let schedule = sample();

        assert_eq!(schedule.level_payment, Money::from_decimal(dec!(4432.06)));
        assert_eq!(schedule.installments.len(), 24);
        assert_eq!(
            schedule.total_paid,
            schedule.terms.principal + schedule.total_interest
        );
        // 23 level payments plus a last row that absorbed the rounding
        assert_eq!(schedule.total_interest, Money::from_decimal(dec!(6369.48)));
    }

    #[test]
    fn test_lookup_and_maturity() {
        let schedule = sample();

        assert_eq!(schedule.get(1).unwrap().installment_number, 1);
        assert_eq!(schedule.get(24).unwrap().remaining_amount, Money::ZERO);
        assert!(schedule.get(0).is_none());
        assert!(schedule.get(25).is_none());
        assert_eq!(schedule.maturity_date(), Some(ymd(2026, 1, 1)));
    }

    #[test]
    fn test_date_queries() {
        let schedule = sample();

        // before the first due date nothing has elapsed
        assert!(schedule.elapsed(ymd(2024, 1, 15)).is_empty());
        assert_eq!(schedule.balance_as_of(ymd(2024, 1, 15)), Money::from_major(100_000));
        assert_eq!(schedule.next_due(ymd(2024, 1, 15)).unwrap().installment_number, 1);

        // on a due date that installment is next, not elapsed
        assert_eq!(schedule.next_due(ymd(2024, 3, 1)).unwrap().installment_number, 2);
        assert_eq!(schedule.elapsed(ymd(2024, 3, 1)).len(), 1);
        assert_eq!(
            schedule.balance_as_of(ymd(2024, 3, 1)),
            Money::from_decimal(dec!(96067.94))
        );

        // past maturity
        assert!(schedule.next_due(ymd(2027, 1, 1)).is_none());
        assert_eq!(schedule.elapsed(ymd(2027, 1, 1)).len(), 24);
        assert_eq!(schedule.balance_as_of(ymd(2027, 1, 1)), Money::ZERO);
    }

    #[test]
    fn test_terms_keep_the_rounded_principal() {
        let terms = LoanTerms::new(
            Money::from_decimal(dec!(1000.005)),
            Rate::from_percent(dec!(5)),
            12,
            ymd(2024, 1, 1),
        );
        let schedule = AmortizationSchedule::generate(terms, &CurrencyPrecision::default()).unwrap();

        assert_eq!(schedule.terms.principal.to_string(), "1000.01");
        assert_eq!(schedule.balance_as_of(ymd(2024, 1, 1)).to_string(), "1000.01");
        assert_eq!(schedule.total_paid, schedule.terms.principal + schedule.total_interest);
    }

    #[test]
    fn test_json_view() {
        let json = sample().to_json_pretty().unwrap();
        assert!(json.contains("\"level_payment\": \"4432.06\""));
        assert!(json.contains("\"installment_number\": 24"));
        assert!(json.contains("\"due_date\": \"2024-02-01\""));
    }
}
